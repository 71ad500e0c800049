//! UI module for rendering the TUI

mod components;
mod config_panel;
mod devices;
mod forms;
mod layout;
mod observations;
mod projects;
mod reports;
mod uploads;

use crate::app::App;
use crate::state::View;
use ratatui::Frame;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let (sidebar_area, main_area) = layout::create_layout(area);

    layout::draw_sidebar(frame, sidebar_area, app);

    match &app.state.current_view {
        View::Devices => devices::draw(frame, main_area, app),
        View::DeviceWizard => forms::draw_wizard(frame, main_area, app),
        View::Projects => projects::draw(frame, main_area, app),
        View::Observations => observations::draw(frame, main_area, app),
        View::ObservationWizard => forms::draw_wizard(frame, main_area, app),
        View::Reports => reports::draw(frame, main_area, app),
        View::ReportWizard => forms::draw_wizard(frame, main_area, app),
        View::Uploads => uploads::draw(frame, main_area, app),
        View::Config => config_panel::draw(frame, main_area, app),
    }

    layout::draw_status_bar(frame, app);
}
