//! The wizard facade: state plus persistence effects.
//!
//! [`Wizard`] owns the canonical [`WizardState`] and an injected draft
//! store. Every operation dispatches an action through the pure reducer and
//! then runs the returned effects. Persistence trouble is logged and never
//! interrupts the user's flow; losing a draft write must not lose the
//! in-memory record.

use super::machine::{self, Action, Effect};
use super::{StateError, Step1Data, Step2Data, Step3Data, WizardState};
use crate::api::{QuoteApi, QuoteRequest};
use crate::draft::DraftStore;
use log::*;

/// Single source of truth for wizard progress; mediates all transitions.
///
pub struct Wizard {
    state: WizardState,
    store: Box<dyn DraftStore>,
}

impl Wizard {
    /// Build a wizard over the given store, resuming a saved draft if one
    /// loads. A missing or corrupt draft starts the flow fresh at step 1.
    ///
    pub fn initialize(store: Box<dyn DraftStore>) -> Wizard {
        let mut wizard = Wizard {
            state: WizardState::new(),
            store,
        };
        if let Some(payload) = wizard.store.load() {
            info!("Found saved draft, resuming...");
            if let Err(e) = wizard.dispatch(Action::LoadDraft(payload)) {
                warn!("Failed to apply saved draft: {}", e);
            }
        }
        wizard
    }

    /// The current record.
    ///
    pub fn state(&self) -> &WizardState {
        &self.state
    }

    /// Apply an action through the reducer and run its effects.
    ///
    pub fn dispatch(&mut self, action: Action) -> Result<(), StateError> {
        let (next, effects) = machine::reduce(&self.state, action)?;
        self.state = next;
        for effect in effects {
            self.run_effect(effect);
        }
        Ok(())
    }

    fn run_effect(&self, effect: Effect) {
        match effect {
            Effect::PersistDraft(payload) => {
                if let Err(e) = self.store.save(&payload) {
                    warn!("Failed to persist draft: {}", e);
                }
            }
            Effect::ClearDraft => {
                if let Err(e) = self.store.clear() {
                    warn!("Failed to clear draft: {}", e);
                }
            }
        }
    }

    /// Merge-replace the first step's payload and persist the draft.
    ///
    pub fn update_step1(&mut self, data: Step1Data) -> Result<(), StateError> {
        self.dispatch(Action::UpdateStep1(data))
    }

    /// Merge-replace the second step's payload and persist the draft.
    ///
    pub fn update_step2(&mut self, data: Step2Data) -> Result<(), StateError> {
        self.dispatch(Action::UpdateStep2(data))
    }

    /// Merge-replace the third step's payload and persist the draft.
    ///
    pub fn update_step3(&mut self, data: Step3Data) -> Result<(), StateError> {
        self.dispatch(Action::UpdateStep3(data))
    }

    /// Leave step 1 for step 2; fails (and stays put) if step 1 is invalid.
    ///
    pub fn advance_from_step1(&mut self) -> Result<(), StateError> {
        self.dispatch(Action::AdvanceFromStep1)
    }

    /// Leave step 2 for step 3; fails (and stays put) if step 2 is invalid.
    ///
    pub fn advance_from_step2(&mut self) -> Result<(), StateError> {
        self.dispatch(Action::AdvanceFromStep2)
    }

    /// Enter the review screen; requires the whole record to validate.
    ///
    pub fn advance_to_review(&mut self) -> Result<(), StateError> {
        self.dispatch(Action::AdvanceToReview)
    }

    /// Step back one position; no-op at step 1. Leaving review clears any
    /// submit error.
    ///
    pub fn go_back(&mut self) -> Result<(), StateError> {
        self.dispatch(Action::GoBack)
    }

    /// Discard everything and start a fresh quote.
    ///
    pub fn reset(&mut self) -> Result<(), StateError> {
        self.dispatch(Action::Reset)
    }

    /// The merged record as submitted to the quote endpoint.
    ///
    pub fn quote_request(&self) -> QuoteRequest {
        QuoteRequest {
            company_name: self.state.step1.company_name.clone(),
            contact_email: self.state.step1.contact_email.clone(),
            vessel_name: self.state.step2.vessel_name.clone(),
            vessel_type: self.state.step2.vessel_type.clone(),
            coverage_level: self.state.step3.coverage_level.clone(),
            cargo_value: self.state.step3.cargo_value,
        }
    }

    /// Submit the merged record.
    ///
    /// On success the draft is purged and the record becomes terminal. On
    /// failure the error text lands in `submit_error`, the draft is
    /// retained, and the record stays on review so the user can retry; the
    /// outcome is read from [`Wizard::state`], not the return value. A call
    /// while a submission is already in flight is refused.
    pub async fn submit(&mut self, api: &QuoteApi) -> Result<(), StateError> {
        if self.state.is_submitting {
            return Err(StateError::SubmissionInFlight);
        }

        self.dispatch(Action::SubmitStarted)?;
        let request = self.quote_request();
        match api.submit(&request).await {
            Ok(response) => {
                info!("Quote request submitted with id {}", response.id);
                self.dispatch(Action::SubmitSucceeded)
            }
            Err(e) => {
                warn!("Quote submission failed: {}", e);
                self.dispatch(Action::SubmitFailed(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{DraftPayload, MemoryDraftStore};
    use crate::state::Step;
    use httpmock::MockServer;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn wizard_with_store() -> (Wizard, Arc<MemoryDraftStore>) {
        let store = Arc::new(MemoryDraftStore::new());
        let wizard = Wizard::initialize(Box::new(Arc::clone(&store)));
        (wizard, store)
    }

    fn fill_valid_record(wizard: &mut Wizard) {
        wizard
            .update_step1(Step1Data {
                company_name: "Acme Shipping Co".to_string(),
                contact_email: "ops@acme-shipping.com".to_string(),
            })
            .unwrap();
        wizard.advance_from_step1().unwrap();
        wizard
            .update_step2(Step2Data {
                vessel_name: "MV Meridian".to_string(),
                vessel_type: "Oil Tanker".to_string(),
            })
            .unwrap();
        wizard.advance_from_step2().unwrap();
        wizard
            .update_step3(Step3Data {
                coverage_level: "Premium".to_string(),
                cargo_value: 1500000.50,
            })
            .unwrap();
        wizard.advance_to_review().unwrap();
    }

    #[test]
    fn test_initialize_without_draft_starts_at_step1() {
        let (wizard, _) = wizard_with_store();
        assert_eq!(wizard.state().current_step, Step::Step1);
        assert_eq!(wizard.state().step1, Step1Data::default());
    }

    #[test]
    fn test_initialize_with_corrupt_draft_behaves_like_no_draft() {
        let store = Arc::new(MemoryDraftStore::new());
        store.set_raw("{{{ not json");
        let wizard = Wizard::initialize(Box::new(Arc::clone(&store)));
        assert_eq!(wizard.state().current_step, Step::Step1);
        assert_eq!(wizard.state().step1, Step1Data::default());
        assert!(!store.is_present());
    }

    #[test]
    fn test_initialize_resumes_at_last_step_with_data() {
        let store = Arc::new(MemoryDraftStore::new());
        store
            .save(&DraftPayload {
                step1: Step1Data {
                    company_name: "Acme".to_string(),
                    contact_email: "a@b.co".to_string(),
                },
                step2: Step2Data {
                    vessel_name: "MV Meridian".to_string(),
                    vessel_type: "Bulk Carrier".to_string(),
                },
                step3: Step3Data::default(),
            })
            .unwrap();

        let wizard = Wizard::initialize(Box::new(Arc::clone(&store)));
        assert_eq!(wizard.state().current_step, Step::Step2);
        assert_eq!(wizard.state().step2.vessel_name, "MV Meridian");
    }

    #[test]
    fn test_every_update_persists_immediately() {
        let (mut wizard, store) = wizard_with_store();
        wizard
            .update_step1(Step1Data {
                company_name: "A".to_string(),
                contact_email: String::new(),
            })
            .unwrap();
        let saved = store.load().unwrap();
        assert_eq!(saved.step1.company_name, "A");

        wizard
            .update_step1(Step1Data {
                company_name: "Ac".to_string(),
                contact_email: String::new(),
            })
            .unwrap();
        let saved = store.load().unwrap();
        assert_eq!(saved.step1.company_name, "Ac");
    }

    #[test]
    fn test_invalid_advance_is_a_noop() {
        let (mut wizard, _) = wizard_with_store();
        let before = wizard.state().clone();
        assert!(wizard.advance_from_step1().is_err());
        assert_eq!(wizard.state(), &before);
    }

    #[test]
    fn test_quote_request_merges_all_steps() {
        let (mut wizard, _) = wizard_with_store();
        fill_valid_record(&mut wizard);
        let request = wizard.quote_request();
        assert_eq!(request.company_name, "Acme Shipping Co");
        assert_eq!(request.contact_email, "ops@acme-shipping.com");
        assert_eq!(request.vessel_name, "MV Meridian");
        assert_eq!(request.vessel_type, "Oil Tanker");
        assert_eq!(request.coverage_level, "Premium");
        assert_eq!(request.cargo_value, 1500000.50);
    }

    #[tokio::test]
    async fn submit_success_clears_draft_and_terminates() {
        let (mut wizard, store) = wizard_with_store();
        fill_valid_record(&mut wizard);
        assert!(store.is_present());

        let server = MockServer::start();
        server
            .mock_async(|when, then| {
                when.method("POST").path("/posts");
                then.status(201).json_body(json!({ "id": 7 }));
            })
            .await;

        let api = QuoteApi::new(&server.base_url(), Duration::from_secs(3));
        wizard.submit(&api).await.unwrap();

        assert!(wizard.state().is_submitted);
        assert!(!wizard.state().is_submitting);
        assert!(wizard.state().submit_error.is_none());
        assert!(!store.is_present());
    }

    #[tokio::test]
    async fn submit_failure_then_retry_succeeds() {
        let (mut wizard, store) = wizard_with_store();
        fill_valid_record(&mut wizard);

        let server = MockServer::start();
        let mut failing = server
            .mock_async(|when, then| {
                when.method("POST").path("/posts");
                then.status(500);
            })
            .await;

        let api = QuoteApi::new(&server.base_url(), Duration::from_secs(3));
        wizard.submit(&api).await.unwrap();

        // First attempt: error surfaced, draft retained, still on review.
        assert!(!wizard.state().is_submitted);
        assert_eq!(
            wizard.state().submit_error.as_deref(),
            Some("Failed to submit quote request: Internal Server Error")
        );
        assert_eq!(wizard.state().current_step, Step::Review);
        assert!(store.is_present());

        failing.delete_async().await;
        server
            .mock_async(|when, then| {
                when.method("POST").path("/posts");
                then.status(200).json_body(json!({ "id": 8 }));
            })
            .await;

        // Retry is just another submit with the same record.
        wizard.submit(&api).await.unwrap();
        assert!(wizard.state().is_submitted);
        assert!(wizard.state().submit_error.is_none());
        assert!(!store.is_present());
    }

    #[tokio::test]
    async fn submit_while_in_flight_is_refused() {
        let (mut wizard, _) = wizard_with_store();
        fill_valid_record(&mut wizard);
        wizard.dispatch(Action::SubmitStarted).unwrap();

        let api = QuoteApi::new("http://127.0.0.1:9", Duration::from_secs(1));
        let err = wizard.submit(&api).await.unwrap_err();
        assert!(matches!(err, StateError::SubmissionInFlight));
    }

    #[test]
    fn test_go_back_from_review_clears_error() {
        let (mut wizard, _) = wizard_with_store();
        fill_valid_record(&mut wizard);
        wizard
            .dispatch(Action::SubmitFailed("Server error".to_string()))
            .unwrap();
        assert!(wizard.state().submit_error.is_some());

        wizard.go_back().unwrap();
        assert_eq!(wizard.state().current_step, Step::Step3);
        assert!(wizard.state().submit_error.is_none());
    }

    #[test]
    fn test_reset_starts_a_fresh_quote() {
        let (mut wizard, _) = wizard_with_store();
        fill_valid_record(&mut wizard);
        wizard.reset().unwrap();
        assert_eq!(wizard.state(), &WizardState::new());
    }
}
