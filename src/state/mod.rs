//! Application state module

mod app_state;
pub mod wizard;

pub use app_state::*;
