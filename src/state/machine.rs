//! Pure transition logic for the quote wizard.
//!
//! [`reduce`] maps a state and an action to the next state plus a list of
//! persistence effects. It performs no I/O itself; the caller (normally
//! [`super::Wizard`]) runs the effects against a draft store. This keeps
//! every transition unit-testable without a terminal or a disk.

use super::{Step, Step1Data, Step2Data, Step3Data, StateError, WizardState};
use crate::draft::DraftPayload;
use crate::utils::validation::{validate_cargo_value, validate_email, validate_required};

/// A requested state transition.
///
#[derive(Debug, Clone)]
pub enum Action {
    /// Apply a previously saved draft and pick the resume position
    LoadDraft(DraftPayload),
    UpdateStep1(Step1Data),
    UpdateStep2(Step2Data),
    UpdateStep3(Step3Data),
    AdvanceFromStep1,
    AdvanceFromStep2,
    AdvanceToReview,
    GoBack,
    SubmitStarted,
    SubmitSucceeded,
    SubmitFailed(String),
    /// Return to the pristine initial state for a fresh quote
    Reset,
}

/// A side effect the caller must run after a successful transition.
///
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    PersistDraft(DraftPayload),
    ClearDraft,
}

/// Project the durable slice of the state: step payloads only, no
/// transient submission flags.
///
pub fn draft_of(state: &WizardState) -> DraftPayload {
    DraftPayload {
        step1: state.step1.clone(),
        step2: state.step2.clone(),
        step3: state.step3.clone(),
    }
}

/// Pick the step to resume on from a saved draft.
///
/// The wizard resumes at the last step with prior data and never jumps
/// straight to review; the user re-confirms the final step's inputs first.
pub fn resume_step(payload: &DraftPayload) -> Step {
    if step3_complete(&payload.step3) {
        Step::Step3
    } else if step2_complete(&payload.step2) {
        Step::Step2
    } else {
        Step::Step1
    }
}

fn step2_complete(data: &Step2Data) -> bool {
    !data.vessel_name.is_empty() && !data.vessel_type.is_empty()
}

fn step3_complete(data: &Step3Data) -> bool {
    !data.coverage_level.is_empty() && data.cargo_value > 0.0
}

/// Validate the first step's payload, reporting the first failing field.
///
pub fn validate_step1(data: &Step1Data) -> Result<(), StateError> {
    let result = validate_required(&data.company_name);
    if let Some(message) = result.error {
        return Err(StateError::validation("companyName", &message));
    }
    let result = validate_email(&data.contact_email);
    if let Some(message) = result.error {
        return Err(StateError::validation("contactEmail", &message));
    }
    Ok(())
}

/// Validate the second step's payload.
///
pub fn validate_step2(data: &Step2Data) -> Result<(), StateError> {
    let result = validate_required(&data.vessel_name);
    if let Some(message) = result.error {
        return Err(StateError::validation("vesselName", &message));
    }
    let result = validate_required(&data.vessel_type);
    if let Some(message) = result.error {
        return Err(StateError::validation("vesselType", &message));
    }
    Ok(())
}

/// Validate the third step's payload.
///
pub fn validate_step3(data: &Step3Data) -> Result<(), StateError> {
    let result = validate_required(&data.coverage_level);
    if let Some(message) = result.error {
        return Err(StateError::validation("coverageLevel", &message));
    }
    let result = validate_cargo_value(&data.cargo_value.to_string());
    if let Some(message) = result.error {
        return Err(StateError::validation("cargoValue", &message));
    }
    Ok(())
}

/// Apply an action, returning the next state and the effects to run.
///
/// On `Err` the transition is refused and the caller's state is untouched;
/// validation failures surface as [`StateError::Validation`] values rather
/// than panics.
pub fn reduce(
    state: &WizardState,
    action: Action,
) -> Result<(WizardState, Vec<Effect>), StateError> {
    if state.is_submitted && !matches!(action, Action::Reset) {
        return Err(StateError::AlreadySubmitted);
    }

    let mut next = state.clone();
    let mut effects = Vec::new();

    match action {
        Action::LoadDraft(payload) => {
            next.current_step = resume_step(&payload);
            next.step1 = payload.step1;
            next.step2 = payload.step2;
            next.step3 = payload.step3;
        }
        Action::UpdateStep1(data) => {
            next.step1 = data;
            effects.push(Effect::PersistDraft(draft_of(&next)));
        }
        Action::UpdateStep2(data) => {
            next.step2 = data;
            effects.push(Effect::PersistDraft(draft_of(&next)));
        }
        Action::UpdateStep3(data) => {
            next.step3 = data;
            effects.push(Effect::PersistDraft(draft_of(&next)));
        }
        Action::AdvanceFromStep1 => {
            validate_step1(&next.step1)?;
            next.current_step = Step::Step2;
            effects.push(Effect::PersistDraft(draft_of(&next)));
        }
        Action::AdvanceFromStep2 => {
            validate_step2(&next.step2)?;
            next.current_step = Step::Step3;
            effects.push(Effect::PersistDraft(draft_of(&next)));
        }
        Action::AdvanceToReview => {
            // Review is gated on every step, not just the one being left.
            validate_step1(&next.step1)?;
            validate_step2(&next.step2)?;
            validate_step3(&next.step3)?;
            next.current_step = Step::Review;
            effects.push(Effect::PersistDraft(draft_of(&next)));
        }
        Action::GoBack => {
            if next.current_step == Step::Review {
                next.submit_error = None;
            }
            next.current_step = next.current_step.back();
        }
        Action::SubmitStarted => {
            next.is_submitting = true;
            next.submit_error = None;
        }
        Action::SubmitSucceeded => {
            next.is_submitting = false;
            next.is_submitted = true;
            next.submit_error = None;
            effects.push(Effect::ClearDraft);
        }
        Action::SubmitFailed(message) => {
            // Draft is retained so the user can retry or go back.
            next.is_submitting = false;
            next.submit_error = Some(message);
        }
        Action::Reset => {
            next = WizardState::new();
        }
    }

    Ok((next, effects))
}
