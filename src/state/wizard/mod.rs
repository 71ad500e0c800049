//! Generic multi-step wizard engine.
//!
//! One engine, three configurations (device registration, observation
//! capture, report creation). The engine owns the draft and error state;
//! validation is a pure function over static step descriptors; submission is
//! adapted to the wire by `crate::api::payload`.

mod draft;
mod engine;
mod events;
mod field;
pub mod registry;
mod spec;

pub use draft::{ErrorSet, FormDraft};
pub use engine::{RemoteOption, WizardState};
pub use events::{SubmissionOutcome, WizardEvent};
pub use field::FieldValue;
pub use spec::{
    validate_step, Check, ChoiceOption, FieldControl, FieldSpec, OptionsSource, Requirement,
    StepDescriptor, Visibility, WizardKind, WizardSpec,
};
