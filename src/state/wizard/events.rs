//! Typed events linking a wizard instance to its owning screen

use super::spec::WizardKind;
use crate::api::ApiError;

/// Emitted by the console when a wizard run ends. The owning screen reacts
/// (close, refresh its list) instead of being handed ad hoc callbacks.
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    Submitted { kind: WizardKind, id: String },
    Cancelled { kind: WizardKind },
}

/// Result of one background submission attempt, delivered to the main loop
/// over the submission channel.
///
/// `epoch` is the console's submission epoch at the time the request was
/// started; the console bumps the epoch whenever a wizard is cancelled or
/// reset, so a response arriving late is recognized and ignored rather than
/// mutating a wizard the user has already closed.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub epoch: u64,
    pub kind: WizardKind,
    pub result: Result<String, ApiError>,
}
