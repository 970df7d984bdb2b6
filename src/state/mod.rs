//! Wizard state management.
//!
//! This module holds the canonical record of quote-request progress: the
//! step payloads, the current position, and the submission flags. All
//! transitions run through the pure reducer in [`machine`]; the [`Wizard`]
//! wrapper applies the resulting persistence effects against an injected
//! draft store.

pub mod machine;

mod error;
mod wizard;

pub use error::StateError;
pub use wizard::Wizard;

use serde::{Deserialize, Serialize};

/// The ordered positions of the quote-request flow.
///
/// `Review` is the terminal pre-submission screen; there is no position
/// beyond it, a successful submission flips [`WizardState::is_submitted`]
/// instead.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Step {
    Step1,
    Step2,
    Step3,
    Review,
}

impl Step {
    /// The 1-based position number (Review is 4).
    ///
    pub fn number(&self) -> u8 {
        match self {
            Step::Step1 => 1,
            Step::Step2 => 2,
            Step::Step3 => 3,
            Step::Review => 4,
        }
    }

    /// The preceding position, saturating at the first step.
    ///
    pub fn back(&self) -> Step {
        match self {
            Step::Step1 | Step::Step2 => Step::Step1,
            Step::Step3 => Step::Step2,
            Step::Review => Step::Step3,
        }
    }
}

/// Company details collected on the first step.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step1Data {
    #[serde(default)]
    pub company_name: String,
    #[serde(default)]
    pub contact_email: String,
}

/// Vessel details collected on the second step.
///
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step2Data {
    #[serde(default)]
    pub vessel_name: String,
    #[serde(default)]
    pub vessel_type: String,
}

/// Coverage details collected on the third step.
///
/// `cargo_value` is always a non-negative finite number here; comma-grouped
/// or partially-typed input is a display concern and never reaches the
/// record in invalid form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Step3Data {
    #[serde(default)]
    pub coverage_level: String,
    #[serde(default)]
    pub cargo_value: f64,
}

/// The single source of truth for wizard progress.
///
/// Screens hold only transient local edits; committed values live here and
/// nowhere else.
#[derive(Debug, Clone, PartialEq)]
pub struct WizardState {
    pub current_step: Step,
    pub step1: Step1Data,
    pub step2: Step2Data,
    pub step3: Step3Data,
    pub is_submitting: bool,
    pub submit_error: Option<String>,
    pub is_submitted: bool,
}

impl WizardState {
    /// Return the pristine initial state: step 1, empty payloads, idle.
    ///
    pub fn new() -> WizardState {
        WizardState {
            current_step: Step::Step1,
            step1: Step1Data::default(),
            step2: Step2Data::default(),
            step3: Step3Data::default(),
            is_submitting: false,
            submit_error: None,
            is_submitted: false,
        }
    }
}

impl Default for WizardState {
    fn default() -> WizardState {
        WizardState::new()
    }
}
