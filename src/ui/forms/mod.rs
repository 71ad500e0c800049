//! Wizard form rendering

mod field_renderer;
mod wizard_form;

pub use wizard_form::draw as draw_wizard;
