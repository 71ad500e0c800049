//! Application state and core logic

use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tokio::sync::mpsc;

use crate::api::payload::{
    device_payload, observation_payload, report_payload, DevicePayload, ObservationPayload,
    ReportPayload,
};
use crate::api::{ApiError, BackendClient, RestClient};
use crate::config::ConsoleConfig;
use crate::prefs::{FilePreferences, PreferencesStore, TOUR_SEEN};
use crate::state::wizard::{
    registry, FieldControl, RemoteOption, SubmissionOutcome, WizardEvent, WizardKind, WizardState,
};
use crate::state::{AppState, DeviceSortField, Notice, SortDirection, View};

/// A wire payload ready to hand to the backend, one variant per wizard
enum PendingPayload {
    Device(DevicePayload),
    Observation(ObservationPayload),
    Report(ReportPayload),
}

/// Main application struct
pub struct App {
    /// Current application state
    pub state: AppState,
    /// Backend client for REST communication
    pub api: Arc<dyn BackendClient>,
    /// User preference flags (tour hints)
    pub prefs: Box<dyn PreferencesStore>,
    /// Config as loaded at startup; sort and filter settings are written
    /// back through it on quit
    config: ConsoleConfig,
    /// Whether the app should quit
    quit: bool,
    /// Submission epoch: bumped whenever a wizard is cancelled or reset so
    /// a late-arriving response can be recognized and ignored
    submission_epoch: u64,
    outcome_tx: mpsc::UnboundedSender<SubmissionOutcome>,
    outcome_rx: mpsc::UnboundedReceiver<SubmissionOutcome>,
}

impl App {
    /// Create a new App instance wired to the real backend
    pub async fn new() -> Result<Self> {
        let config = ConsoleConfig::load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "failed to load config, using defaults");
            ConsoleConfig::default()
        });
        let api = RestClient::new(config.api_base_url.clone())?;
        let prefs = FilePreferences::load()?;

        let mut app = Self::with_parts(Arc::new(api), Box::new(prefs), config);
        app.state.api_connected = app.api.check_connection().await;
        if app.state.api_connected {
            app.refresh_devices().await;
        }
        Ok(app)
    }

    /// Assemble an App from its collaborators (also the test seam)
    pub fn with_parts(
        api: Arc<dyn BackendClient>,
        prefs: Box<dyn PreferencesStore>,
        config: ConsoleConfig,
    ) -> Self {
        let mut state = AppState::default();
        state.device_sort_field = match config.device_sort_field.as_deref() {
            Some("status") => DeviceSortField::Status,
            Some("category") => DeviceSortField::Category,
            Some("registered") => DeviceSortField::RegisteredAt,
            _ => DeviceSortField::Name,
        };
        state.device_sort_direction = match config.device_sort_direction.as_deref() {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        state.show_offline_devices = config.show_offline_devices.unwrap_or(false);
        state.show_tour_hint = !prefs.flag(TOUR_SEEN);

        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        Self {
            state,
            api,
            prefs,
            config,
            quit: false,
            submission_epoch: 0,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// The current device-list settings in their persisted form
    fn settings(&self) -> ConsoleConfig {
        ConsoleConfig {
            api_base_url: self.config.api_base_url.clone(),
            device_sort_field: Some(self.state.device_sort_field.key().to_string()),
            device_sort_direction: Some(self.state.device_sort_direction.key().to_string()),
            show_offline_devices: Some(self.state.show_offline_devices),
        }
    }

    /// Write the device-list settings back to the config file so the next
    /// session starts with the same sort and filter
    pub fn persist_settings(&self) {
        if let Err(err) = self.settings().save() {
            tracing::warn!(error = %err, "failed to persist settings");
        }
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.state.current_view.is_wizard() {
            self.handle_wizard_key(key).await;
        } else {
            self.handle_list_key(key).await;
        }
        Ok(())
    }

    async fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('1') => self.switch_view(View::Devices).await,
            KeyCode::Char('2') => self.switch_view(View::Projects).await,
            KeyCode::Char('3') => self.switch_view(View::Observations).await,
            KeyCode::Char('4') => self.switch_view(View::Reports).await,
            KeyCode::Char('5') => self.switch_view(View::Uploads).await,
            KeyCode::Char('6') => self.switch_view(View::Config).await,
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.state.list_len();
                self.state.move_selection_down(max);
            }
            KeyCode::Up | KeyCode::Char('k') => self.state.move_selection_up(),
            KeyCode::Char('r') => self.refresh_current().await,
            KeyCode::Char('n') => self.open_wizard_for_view().await,
            KeyCode::Char('s') if self.state.current_view == View::Devices => {
                self.state.cycle_device_sort_field();
            }
            KeyCode::Char('x') if self.state.current_view == View::Devices => {
                self.state.toggle_device_sort_direction();
            }
            KeyCode::Char('f') if self.state.current_view == View::Devices => {
                self.state.show_offline_devices = !self.state.show_offline_devices;
                self.state.reset_selection();
            }
            KeyCode::Char('y') if key.modifiers.contains(crate::platform::COPY_MODIFIER) => {
                self.copy_selected_id();
            }
            KeyCode::Char('t') if self.state.show_tour_hint => {
                self.state.show_tour_hint = false;
                self.prefs.set_flag(TOUR_SEEN, true);
            }
            _ => {}
        }
    }

    async fn handle_wizard_key(&mut self, key: KeyEvent) {
        // Submit shortcut works from any field of the last step
        if key.code == KeyCode::Char('s') && key.modifiers.contains(KeyModifiers::CONTROL) {
            let advance = match &self.state.wizard {
                Some(wizard) => !wizard.is_last_step(),
                None => return,
            };
            if advance {
                if let Some(wizard) = self.state.wizard.as_mut() {
                    wizard.next_step();
                }
            } else {
                self.submit_wizard();
            }
            return;
        }

        if key.code == KeyCode::Esc {
            self.cancel_wizard().await;
            return;
        }

        let Some(wizard) = self.state.wizard.as_mut() else {
            return;
        };

        if wizard.on_button_row() {
            match key.code {
                KeyCode::Tab | KeyCode::Down => wizard.next_field(),
                KeyCode::BackTab | KeyCode::Up => wizard.prev_field(),
                KeyCode::Left => wizard.prev_button(),
                KeyCode::Right => wizard.next_button(),
                KeyCode::Enter => {
                    match wizard.selected_button {
                        0 => wizard.prev_step(),
                        1 => self.cancel_wizard().await,
                        _ => {
                            if wizard.is_last_step() {
                                self.submit_wizard();
                            } else {
                                wizard.next_step();
                            }
                        }
                    };
                }
                _ => {}
            }
            return;
        }

        let active_control = wizard.active_spec().map(|f| f.control);
        match key.code {
            KeyCode::Tab | KeyCode::Down => wizard.next_field(),
            KeyCode::BackTab | KeyCode::Up => wizard.prev_field(),
            KeyCode::Left => {
                wizard.cycle_choice(false);
                wizard.adjust_slider(-1);
            }
            KeyCode::Right => {
                wizard.cycle_choice(true);
                wizard.adjust_slider(1);
            }
            KeyCode::Enter => match active_control {
                Some(FieldControl::Text { multiline: true }) => wizard.input_char('\n'),
                Some(FieldControl::Toggle { .. }) => wizard.toggle_active(),
                _ => wizard.next_field(),
            },
            KeyCode::Char(' ') if matches!(active_control, Some(FieldControl::Toggle { .. })) => {
                wizard.toggle_active();
            }
            KeyCode::Char(c) => wizard.input_char(c),
            KeyCode::Backspace => wizard.backspace(),
            _ => {}
        }
    }

    async fn switch_view(&mut self, view: View) {
        self.state.current_view = view;
        self.state.reset_selection();
        self.refresh_current().await;
    }

    /// Open the wizard belonging to the current list screen
    async fn open_wizard_for_view(&mut self) {
        match self.state.current_view {
            View::Devices => self.open_device_wizard(),
            View::Observations => self.open_observation_wizard().await,
            View::Reports => self.open_report_wizard().await,
            _ => {}
        }
    }

    pub fn open_device_wizard(&mut self) {
        self.state.wizard = Some(WizardState::new(registry::device_registration()));
        self.state.current_view = View::DeviceWizard;
    }

    pub async fn open_observation_wizard(&mut self) {
        self.ensure_reference_data().await;
        let mut wizard = WizardState::new(registry::observation_capture());
        wizard.set_remote_options(registry::remote::PROJECTS, self.project_options());
        wizard.set_remote_options(
            registry::remote::DEVICES,
            self.state
                .devices
                .iter()
                .map(|d| RemoteOption::new(d.id.clone(), d.name.clone()))
                .collect(),
        );
        wizard.set_remote_options(
            registry::remote::PACP_CODES,
            self.state
                .pacp_codes
                .iter()
                .map(|c| RemoteOption::new(c.code.clone(), c.label.clone()))
                .collect(),
        );
        self.state.wizard = Some(wizard);
        self.state.current_view = View::ObservationWizard;
    }

    pub async fn open_report_wizard(&mut self) {
        self.ensure_reference_data().await;
        let mut wizard = WizardState::new(registry::report_creation());
        wizard.set_remote_options(registry::remote::PROJECTS, self.project_options());
        self.state.wizard = Some(wizard);
        self.state.current_view = View::ReportWizard;
    }

    fn project_options(&self) -> Vec<RemoteOption> {
        self.state
            .projects
            .iter()
            .map(|p| RemoteOption::new(p.id.clone(), p.name.clone()))
            .collect()
    }

    async fn ensure_reference_data(&mut self) {
        if self.state.projects.is_empty() {
            self.refresh_projects().await;
        }
        if self.state.devices.is_empty() {
            self.refresh_devices().await;
        }
        if self.state.pacp_codes.is_empty() {
            self.refresh_pacp_codes().await;
        }
    }

    /// Kick off the current wizard's submission. Only reachable from the
    /// last step, only after that step validates, and never while another
    /// submission of the same draft is outstanding.
    pub fn submit_wizard(&mut self) {
        let Some(wizard) = self.state.wizard.as_mut() else {
            return;
        };
        if !wizard.is_last_step() || !wizard.validate_current() {
            return;
        }
        if !wizard.begin_submission() {
            tracing::debug!("submission already outstanding, ignoring trigger");
            return;
        }

        let kind = wizard.kind();
        let payload = match kind {
            WizardKind::DeviceRegistration => PendingPayload::Device(device_payload(wizard.draft())),
            WizardKind::ObservationCapture => {
                PendingPayload::Observation(observation_payload(wizard.draft()))
            }
            WizardKind::ReportCreation => PendingPayload::Report(report_payload(wizard.draft())),
        };

        let api = Arc::clone(&self.api);
        let tx = self.outcome_tx.clone();
        let epoch = self.submission_epoch;
        let call = tokio::spawn(async move {
            match payload {
                PendingPayload::Device(p) => api.create_device(p).await.map(|d| d.id),
                PendingPayload::Observation(p) => api.create_observation(p).await.map(|o| o.id),
                PendingPayload::Report(p) => api.create_report(p).await.map(|r| r.id),
            }
        });
        tokio::spawn(async move {
            // A panicked or aborted call must still produce an outcome, or
            // the wizard would stay locked in its submitting state
            let result = match call.await {
                Ok(result) => result,
                Err(err) => {
                    tracing::error!(error = %err, ?kind, "submission task died");
                    Err(ApiError::Internal("submission ended unexpectedly".into()))
                }
            };
            if let Err(err) = &result {
                tracing::warn!(error = %err, ?kind, "submission failed");
            }
            let _ = tx.send(SubmissionOutcome {
                epoch,
                kind,
                result,
            });
        });

        self.state.notify(Notice::info("Submitting..."));
    }

    /// Drain submission outcomes delivered since the last loop tick
    pub async fn poll_submissions(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.handle_outcome(outcome).await;
        }
    }

    async fn handle_outcome(&mut self, outcome: SubmissionOutcome) {
        if outcome.epoch != self.submission_epoch || self.state.wizard.is_none() {
            // The wizard was cancelled or reset while this response was in
            // flight; it no longer has a home
            tracing::info!(?outcome.kind, "discarding late submission response");
            return;
        }

        match outcome.result {
            Ok(id) => {
                if let Some(wizard) = self.state.wizard.as_mut() {
                    wizard.reset();
                }
                self.submission_epoch += 1;
                self.on_wizard_event(WizardEvent::Submitted {
                    kind: outcome.kind,
                    id,
                })
                .await;
            }
            Err(err) => {
                // Leave the draft intact so nothing has to be re-entered
                if let Some(wizard) = self.state.wizard.as_mut() {
                    wizard.finish_submission();
                }
                self.state
                    .notify(Notice::error(format!("Submission failed: {err}")));
            }
        }
    }

    /// Close the wizard, abandoning the draft. Any in-flight submission
    /// response is invalidated by bumping the epoch.
    pub async fn cancel_wizard(&mut self) {
        let Some(wizard) = self.state.wizard.as_ref() else {
            return;
        };
        let kind = wizard.kind();
        self.submission_epoch += 1;
        tracing::debug!(?kind, "wizard cancelled");
        self.state
            .notify(Notice::info(format!("{} cancelled", kind.label())));
        self.on_wizard_event(WizardEvent::Cancelled { kind }).await;
    }

    /// React to a finished wizard run: close it and refresh the owning list
    async fn on_wizard_event(&mut self, event: WizardEvent) {
        match event {
            WizardEvent::Submitted { kind, id } => {
                self.state.wizard = None;
                self.state.current_view = self.state.current_view.parent();
                let noun = match kind {
                    WizardKind::DeviceRegistration => "Device registered",
                    WizardKind::ObservationCapture => "Observation recorded",
                    WizardKind::ReportCreation => "Report requested",
                };
                self.state
                    .notify(Notice::success(format!("{noun} ({id})")));
                match kind {
                    WizardKind::DeviceRegistration => self.refresh_devices().await,
                    WizardKind::ObservationCapture => self.refresh_observations().await,
                    WizardKind::ReportCreation => self.refresh_reports().await,
                }
            }
            WizardEvent::Cancelled { .. } => {
                self.state.wizard = None;
                self.state.current_view = self.state.current_view.parent();
            }
        }
    }

    async fn refresh_current(&mut self) {
        match self.state.current_view {
            View::Devices => self.refresh_devices().await,
            View::Projects => self.refresh_projects().await,
            View::Observations => self.refresh_observations().await,
            View::Reports => self.refresh_reports().await,
            View::Uploads => self.refresh_uploads().await,
            _ => {}
        }
    }

    pub async fn refresh_devices(&mut self) {
        match self.api.list_devices().await {
            Ok(devices) => {
                self.state.devices = devices;
                self.state.api_connected = true;
            }
            Err(err) => self.report_fetch_error("devices", err),
        }
    }

    pub async fn refresh_projects(&mut self) {
        match self.api.list_projects().await {
            Ok(projects) => self.state.projects = projects,
            Err(err) => self.report_fetch_error("projects", err),
        }
    }

    pub async fn refresh_observations(&mut self) {
        match self.api.list_observations().await {
            Ok(observations) => self.state.observations = observations,
            Err(err) => self.report_fetch_error("observations", err),
        }
    }

    pub async fn refresh_reports(&mut self) {
        match self.api.list_reports().await {
            Ok(reports) => self.state.reports = reports,
            Err(err) => self.report_fetch_error("reports", err),
        }
    }

    pub async fn refresh_uploads(&mut self) {
        match self.api.list_uploads().await {
            Ok(uploads) => self.state.uploads = uploads,
            Err(err) => self.report_fetch_error("uploads", err),
        }
    }

    pub async fn refresh_pacp_codes(&mut self) {
        match self.api.list_pacp_codes().await {
            Ok(codes) => self.state.pacp_codes = codes,
            Err(err) => self.report_fetch_error("PACP codes", err),
        }
    }

    fn report_fetch_error(&mut self, what: &str, err: crate::api::ApiError) {
        tracing::warn!(error = %err, what, "failed to load list");
        self.state
            .notify(Notice::error(format!("Failed to load {what}")));
    }

    /// Copy the id of the selected row to the system clipboard
    fn copy_selected_id(&mut self) {
        let id = match self.state.current_view {
            View::Devices => self
                .state
                .sorted_devices()
                .get(self.state.selected_index)
                .map(|d| d.id.clone()),
            View::Observations => self
                .state
                .observations
                .get(self.state.selected_index)
                .map(|o| o.id.clone()),
            View::Reports => self
                .state
                .reports
                .get(self.state.selected_index)
                .map(|r| r.id.clone()),
            _ => None,
        };
        let Some(id) = id else {
            return;
        };
        match arboard::Clipboard::new().and_then(|mut c| c.set_text(id.clone())) {
            Ok(()) => self.state.notify(Notice::info(format!("Copied {id}"))),
            Err(err) => {
                tracing::warn!(error = %err, "clipboard unavailable");
                self.state.notify(Notice::error("Clipboard unavailable"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockBackendClient;
    use crate::prefs::MockPreferencesStore;
    use crate::state::wizard::FieldValue;
    use crate::state::Device;
    use chrono::Utc;

    fn device_fixture(id: &str) -> Device {
        Device {
            id: id.to_string(),
            name: "Cam1".to_string(),
            device_type: "inspection-camera".to_string(),
            category: "field".to_string(),
            location: "Main St".to_string(),
            status: "offline".to_string(),
            operator: Some("J. Smith".to_string()),
            ip_address: None,
            registered_at: Utc::now(),
        }
    }

    fn quiet_prefs() -> Box<MockPreferencesStore> {
        let mut prefs = MockPreferencesStore::new();
        prefs.expect_flag().return_const(true);
        prefs.expect_set_flag().return_const(());
        Box::new(prefs)
    }

    fn app_with(api: MockBackendClient) -> App {
        App::with_parts(Arc::new(api), quiet_prefs(), ConsoleConfig::default())
    }

    /// Walk a device wizard to its last step with a valid draft
    fn drive_device_wizard_to_review(app: &mut App) {
        app.open_device_wizard();
        let wizard = app.state.wizard.as_mut().unwrap();
        wizard.set_field("name", FieldValue::text("Cam1"));
        wizard.set_field(
            "type",
            FieldValue::choice("inspection-camera", "Inspection camera"),
        );
        wizard.set_field("location", FieldValue::text("Main St"));
        wizard.set_field("operator", FieldValue::text("J. Smith"));
        assert!(wizard.next_step());
        wizard.set_field(
            "specifications.resolution",
            FieldValue::choice("1080p", "1080p"),
        );
        wizard.set_field("specifications.frameRate", FieldValue::text("30"));
        assert!(wizard.next_step());
        assert!(wizard.next_step());
        assert!(wizard.is_last_step());
    }

    #[tokio::test]
    async fn test_double_submit_invokes_backend_once() {
        let mut api = MockBackendClient::new();
        api.expect_create_device()
            .times(1)
            .returning(|_| Ok(device_fixture("dev-1")));
        api.expect_list_devices()
            .returning(|| Ok(vec![device_fixture("dev-1")]));

        let mut app = app_with(api);
        drive_device_wizard_to_review(&mut app);

        // Second trigger fires while the first call is still pending
        app.submit_wizard();
        app.submit_wizard();

        let outcome = app.outcome_rx.recv().await.unwrap();
        app.handle_outcome(outcome).await;

        assert!(app.state.wizard.is_none());
        assert_eq!(app.state.current_view, View::Devices);
        assert!(app.outcome_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_draft_for_retry() {
        let mut api = MockBackendClient::new();
        api.expect_create_device()
            .times(1)
            .returning(|_| Err(crate::api::ApiError::Backend("name taken".into())));

        let mut app = app_with(api);
        drive_device_wizard_to_review(&mut app);
        app.submit_wizard();

        let outcome = app.outcome_rx.recv().await.unwrap();
        app.handle_outcome(outcome).await;

        let wizard = app.state.wizard.as_ref().unwrap();
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.draft().text("name"), "Cam1");
        let notice = app.state.notice.as_ref().unwrap();
        assert!(notice.message.contains("name taken"));
    }

    #[tokio::test]
    async fn test_late_response_after_cancel_is_discarded() {
        let mut api = MockBackendClient::new();
        api.expect_create_device()
            .times(1)
            .returning(|_| Ok(device_fixture("dev-1")));
        // A discarded response must not trigger a list refresh
        api.expect_list_devices().times(0);

        let mut app = app_with(api);
        drive_device_wizard_to_review(&mut app);
        app.submit_wizard();
        app.cancel_wizard().await;

        let outcome = app.outcome_rx.recv().await.unwrap();
        app.handle_outcome(outcome).await;

        assert!(app.state.wizard.is_none());
        assert_eq!(app.state.current_view, View::Devices);
    }

    #[tokio::test]
    async fn test_panicking_submission_releases_the_wizard() {
        let mut api = MockBackendClient::new();
        api.expect_create_device().returning(|_| panic!("backend mock blew up"));

        let mut app = app_with(api);
        drive_device_wizard_to_review(&mut app);
        app.submit_wizard();

        // The dead task still delivers a failure outcome
        let outcome = app.outcome_rx.recv().await.unwrap();
        assert!(matches!(outcome.result, Err(ApiError::Internal(_))));
        app.handle_outcome(outcome).await;

        let wizard = app.state.wizard.as_mut().unwrap();
        assert!(!wizard.is_submitting());
        assert_eq!(wizard.draft().text("name"), "Cam1");
        // A retry is accepted again
        assert!(wizard.begin_submission());
        let notice = app.state.notice.as_ref().unwrap();
        assert!(notice.message.contains("Submission failed"));
    }

    #[test]
    fn test_settings_round_trip_through_config() {
        let mut app = app_with(MockBackendClient::new());
        app.state.cycle_device_sort_field();
        app.state.cycle_device_sort_field();
        app.state.toggle_device_sort_direction();
        app.state.show_offline_devices = true;

        let saved = app.settings();
        assert_eq!(saved.device_sort_field.as_deref(), Some("category"));
        assert_eq!(saved.device_sort_direction.as_deref(), Some("desc"));
        assert_eq!(saved.show_offline_devices, Some(true));

        let restored = App::with_parts(Arc::new(MockBackendClient::new()), quiet_prefs(), saved);
        assert_eq!(restored.state.device_sort_field, DeviceSortField::Category);
        assert_eq!(restored.state.device_sort_direction, SortDirection::Desc);
        assert!(restored.state.show_offline_devices);
    }

    #[tokio::test]
    async fn test_submit_off_last_step_is_rejected() {
        let mut api = MockBackendClient::new();
        api.expect_create_device().times(0);

        let mut app = app_with(api);
        app.open_device_wizard();
        app.submit_wizard();

        assert!(!app.state.wizard.as_ref().unwrap().is_submitting());
        assert!(app.outcome_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_cancel_returns_to_parent_view() {
        let api = MockBackendClient::new();
        let mut app = app_with(api);
        app.open_device_wizard();
        assert_eq!(app.state.current_view, View::DeviceWizard);
        app.cancel_wizard().await;
        assert_eq!(app.state.current_view, View::Devices);
        assert!(app.state.wizard.is_none());
    }

    #[tokio::test]
    async fn test_failed_refresh_surfaces_notice() {
        let mut api = MockBackendClient::new();
        api.expect_list_devices()
            .returning(|| Err(crate::api::ApiError::Backend("boom".into())));
        let mut app = app_with(api);
        app.refresh_devices().await;
        let notice = app.state.notice.as_ref().unwrap();
        assert!(notice.message.contains("devices"));
    }
}
