//! The filing wizard: which step the user is on, which steps they may move to, and the per-step
//! save that happens on "Next".

mod flow;
mod slice;

pub use flow::{is_step_complete, Flow, FlowKind, Section, StepDescriptor};
pub use slice::{StepSlice, WealthSlice};

use crate::api::FilingStore;
use crate::error::FilingError;
use crate::model::{apply_update, DraftPatch, FilingDraft, FilingSnapshot, FilingStatus};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Where the wizard is.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "step")]
pub enum WizardState {
    Step(usize),
    Submitted,
}

/// Drives one filing through a `Flow`. The wizard owns the draft for the whole editing session and
/// persists it one step slice at a time through `store`.
///
/// `advance` takes `&mut self`, so a second save for the same wizard cannot start while one is in
/// flight.
pub struct Wizard<S> {
    store: S,
    flow: Flow,
    filing_id: String,
    draft: FilingDraft,
    state: WizardState,
}

impl<S> Wizard<S>
where
    S: FilingStore,
{
    /// Starts a wizard at step 1 over an existing draft.
    pub fn new(store: S, flow: Flow, filing_id: impl Into<String>, draft: FilingDraft) -> Self {
        Self {
            store,
            flow,
            filing_id: filing_id.into(),
            draft: draft.normalized(),
            state: WizardState::Step(1),
        }
    }

    /// Loads `filing_id` from `store` and starts at step 1.
    pub async fn open(
        store: S,
        flow: Flow,
        filing_id: impl Into<String>,
    ) -> Result<Self, FilingError> {
        let filing_id = filing_id.into();
        let snapshot = store
            .load(&filing_id)
            .await
            .map_err(FilingError::Persistence)?;
        debug!(
            "Opened filing '{filing_id}' with status {}",
            snapshot.draft.status()
        );
        Ok(Self::new(store, flow, filing_id, snapshot.draft))
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn flow(&self) -> &Flow {
        &self.flow
    }

    pub fn filing_id(&self) -> &str {
        &self.filing_id
    }

    pub fn draft(&self) -> &FilingDraft {
        &self.draft
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    /// The current step, or `None` once submitted.
    pub fn current_step(&self) -> Option<usize> {
        match self.state {
            WizardState::Step(n) => Some(n),
            WizardState::Submitted => None,
        }
    }

    pub fn status(&self) -> FilingStatus {
        self.draft.status()
    }

    pub fn is_editable(&self) -> bool {
        self.state != WizardState::Submitted && self.draft.status().is_editable()
    }

    /// Applies one edit to the draft. Nothing is persisted until the next `advance`.
    pub fn apply(&mut self, patch: DraftPatch) -> Result<(), FilingError> {
        self.ensure_editable()?;
        self.draft = apply_update(&self.draft, patch)?;
        Ok(())
    }

    /// Moves to step `target` without saving. Moving back is always allowed. Moving forward
    /// requires every step before `target` to be complete; otherwise the wizard stays put and the
    /// first incomplete step is returned.
    pub fn go_to(&mut self, target: usize) -> Result<(), FilingError> {
        let current = self.current()?;
        if self.flow.step(target).is_none() {
            return Err(FilingError::UnknownStep(target));
        }
        if target > current {
            self.gate(target)?;
        }
        debug!(
            "Filing '{}' moved from step {current} to step {target}",
            self.filing_id
        );
        self.state = WizardState::Step(target);
        Ok(())
    }

    /// Saves the current step's slice and moves to the next step. On the last step the filing is
    /// submitted instead. If the store fails the wizard stays on the current step with the draft
    /// unchanged, so the same call can be retried.
    pub async fn advance(&mut self) -> Result<WizardState, FilingError> {
        let current = self.current()?;
        self.ensure_editable()?;
        self.gate(current + 1)?;

        let snapshot = if current >= self.flow.len() {
            info!("Submitting filing '{}'", self.filing_id);
            self.store
                .submit(&self.filing_id)
                .await
                .map_err(FilingError::Persistence)?
        } else {
            let slice = self
                .flow
                .slice(current, &self.draft)
                .ok_or(FilingError::UnknownStep(current))?;
            debug!("Saving step {current} of filing '{}'", self.filing_id);
            self.store
                .save_slice(&self.filing_id, current, &slice)
                .await
                .map_err(FilingError::Persistence)?
        };

        self.reconcile(&snapshot);
        self.state = if current >= self.flow.len() {
            WizardState::Submitted
        } else {
            WizardState::Step(current + 1)
        };
        info!(
            "Filing '{}' advanced from step {current} to {:?}",
            self.filing_id, self.state
        );
        Ok(self.state)
    }

    /// Gives up the wizard, returning the store and the draft.
    pub fn into_parts(self) -> (S, FilingDraft) {
        (self.store, self.draft)
    }

    fn current(&self) -> Result<usize, FilingError> {
        match self.state {
            WizardState::Step(n) => Ok(n),
            WizardState::Submitted => Err(FilingError::AlreadySubmitted),
        }
    }

    fn ensure_editable(&self) -> Result<(), FilingError> {
        if self.state == WizardState::Submitted {
            return Err(FilingError::AlreadySubmitted);
        }
        if !self.draft.status().is_editable() {
            return Err(FilingError::ReadOnly(self.draft.status()));
        }
        Ok(())
    }

    fn gate(&self, target: usize) -> Result<(), FilingError> {
        match self.flow.first_incomplete(target, &self.draft) {
            None => Ok(()),
            Some((step, reason)) => {
                warn!(
                    "Filing '{}' cannot move to step {target}: step {step} is incomplete: {reason}",
                    self.filing_id
                );
                Err(FilingError::StepIncomplete { step, reason })
            }
        }
    }

    /// The service owns the status; everything else stays as the user entered it.
    fn reconcile(&mut self, snapshot: &FilingSnapshot) {
        let status = snapshot.draft.status();
        if status != self.draft.status() {
            debug!(
                "Filing '{}' status changed from {} to {status}",
                self.filing_id,
                self.draft.status()
            );
            self.draft.status = status;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MemoryStore;
    use crate::model::IncomeSourceKind;
    use crate::test::{complete_draft, draft_through, ready_wizard};
    use proptest::prelude::*;

    #[tokio::test]
    async fn test_backward_moves_are_free() {
        let mut wizard = ready_wizard(Flow::canonical(), complete_draft());
        wizard.go_to(9).unwrap();
        wizard.go_to(2).unwrap();
        assert_eq!(wizard.current_step(), Some(2));
        wizard.go_to(2).unwrap();
        assert_eq!(wizard.current_step(), Some(2));
    }

    #[tokio::test]
    async fn test_jump_blocked_by_income_sources() {
        // Steps 1 and 2 are complete, step 3 has nothing selected.
        let mut wizard = ready_wizard(Flow::canonical(), draft_through(2));
        wizard.go_to(2).unwrap();
        let err = wizard.go_to(5).unwrap_err();
        assert_eq!(err.blocking_step(), Some(3));
        assert_eq!(wizard.current_step(), Some(2));
    }

    #[tokio::test]
    async fn test_unknown_target() {
        let mut wizard = ready_wizard(Flow::legacy_ten(), complete_draft());
        assert!(matches!(wizard.go_to(11), Err(FilingError::UnknownStep(11))));
        assert!(matches!(wizard.go_to(0), Err(FilingError::UnknownStep(0))));
    }

    #[tokio::test]
    async fn test_advance_saves_the_step_slice() {
        let mut wizard = ready_wizard(Flow::canonical(), complete_draft());
        wizard.go_to(4).unwrap();
        let state = wizard.advance().await.unwrap();
        assert_eq!(state, WizardState::Step(5));
        let saves = wizard.store().saves();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].step, 4);
        assert_eq!(saves[0].slice.incomes.as_deref(), Some(wizard.draft().incomes()));
        assert!(saves[0].slice.tax_year.is_none());
    }

    #[tokio::test]
    async fn test_advance_requires_current_step() {
        let mut wizard = ready_wizard(Flow::canonical(), FilingDraft::default());
        let err = wizard.advance().await.unwrap_err();
        assert_eq!(err.blocking_step(), Some(1));
        assert_eq!(wizard.current_step(), Some(1));
        assert!(wizard.store().saves().is_empty());
    }

    #[tokio::test]
    async fn test_persistence_failure_does_not_advance() {
        let mut wizard = ready_wizard(Flow::canonical(), complete_draft());
        let before = wizard.draft().clone();
        wizard.store().fail_next_save();
        let err = wizard.advance().await.unwrap_err();
        assert!(matches!(err, FilingError::Persistence(_)));
        assert_eq!(wizard.current_step(), Some(1));
        assert_eq!(wizard.draft(), &before);

        // Retrying sends the same payload.
        wizard.advance().await.unwrap();
        assert_eq!(wizard.current_step(), Some(2));
        assert_eq!(wizard.store().saves()[0].slice.tax_year, before.tax_year());
    }

    #[tokio::test]
    async fn test_resaving_a_step_is_idempotent() {
        let mut wizard = ready_wizard(Flow::canonical(), complete_draft());
        wizard.go_to(3).unwrap();
        wizard.advance().await.unwrap();
        let first = wizard.store().snapshot("f-1").unwrap();
        wizard.go_to(3).unwrap();
        wizard.advance().await.unwrap();
        let second = wizard.store().snapshot("f-1").unwrap();
        let saves = wizard.store().saves();
        assert_eq!(saves.len(), 2);
        assert_eq!(saves[0], saves[1]);
        assert_eq!(first.draft, second.draft);
    }

    #[tokio::test]
    async fn test_full_run_submits_and_locks() {
        for flow in [Flow::canonical(), Flow::legacy_thirteen(), Flow::legacy_ten()] {
            let steps = flow.len();
            let mut wizard = ready_wizard(flow, complete_draft());
            for n in 1..steps {
                assert_eq!(wizard.advance().await.unwrap(), WizardState::Step(n + 1));
            }
            assert_eq!(wizard.advance().await.unwrap(), WizardState::Submitted);
            assert_eq!(wizard.status(), FilingStatus::UnderReview);
            assert_eq!(wizard.store().saves().len(), steps - 1);
            assert!(matches!(
                wizard.advance().await,
                Err(FilingError::AlreadySubmitted)
            ));
            assert!(matches!(
                wizard.apply(DraftPatch::SetConsent(false)),
                Err(FilingError::AlreadySubmitted)
            ));
            let stored = wizard.store().snapshot("f-1").unwrap();
            assert_eq!(stored.draft.income_source_types(), wizard.draft().income_source_types());
        }
    }

    #[tokio::test]
    async fn test_under_review_filing_is_read_only() {
        let mut snapshot = FilingSnapshot::new("f-1");
        snapshot.draft = complete_draft();
        snapshot.draft.status = FilingStatus::UnderReview;
        let store = MemoryStore::with_filing(snapshot);
        let mut wizard = Wizard::open(store, Flow::canonical(), "f-1").await.unwrap();
        assert!(!wizard.is_editable());
        assert!(matches!(
            wizard.apply(DraftPatch::SetTaxYear(2020)),
            Err(FilingError::ReadOnly(FilingStatus::UnderReview))
        ));
        assert!(matches!(
            wizard.advance().await,
            Err(FilingError::ReadOnly(FilingStatus::UnderReview))
        ));
        // Navigation still works for reading.
        wizard.go_to(14).unwrap();
    }

    #[tokio::test]
    async fn test_rejected_filing_is_editable() {
        let mut snapshot = FilingSnapshot::new("f-1");
        snapshot.draft = complete_draft();
        snapshot.draft.status = FilingStatus::Rejected;
        let store = MemoryStore::with_filing(snapshot);
        let mut wizard = Wizard::open(store, Flow::canonical(), "f-1").await.unwrap();
        wizard
            .apply(DraftPatch::DeselectIncomeSource(IncomeSourceKind::Salary))
            .unwrap();
        wizard.advance().await.unwrap();
    }

    #[tokio::test]
    async fn test_status_is_reconciled_from_the_service() {
        let store = MemoryStore::new();
        let mut wizard = Wizard::new(store.clone(), Flow::canonical(), "f-1", complete_draft());
        store.load("f-1").await.unwrap();
        store.set_status("f-1", FilingStatus::Rejected);
        wizard.advance().await.unwrap();
        assert_eq!(wizard.status(), FilingStatus::Rejected);
    }

    proptest! {
        #[test]
        fn prop_forward_gate(
            complete_through in 0usize..14,
            start in 1usize..=14,
            target in 1usize..=14,
        ) {
            let mut wizard = ready_wizard(Flow::canonical(), draft_through(complete_through));
            let start = start.min(complete_through + 1);
            wizard.go_to(start).unwrap();
            let flow = Flow::canonical();
            let blocked = flow.first_incomplete(target, wizard.draft());
            let any_incomplete_between =
                (start..target).any(|a| !flow.is_step_complete(a, wizard.draft()));
            let result = wizard.go_to(target);
            if any_incomplete_between {
                prop_assert!(result.is_err());
            }
            match blocked {
                Some((step, _)) if target > start => {
                    prop_assert_eq!(result.unwrap_err().blocking_step(), Some(step));
                    prop_assert_eq!(wizard.current_step(), Some(start));
                }
                _ => {
                    prop_assert!(result.is_ok());
                    prop_assert_eq!(wizard.current_step(), Some(target));
                }
            }
        }
    }
}
