//! Implements `FilingStore` in memory.
//!
//! Note: this is compiled even in the "production" version of this app so that the whole program
//! can be run top-to-bottom without a filing service.

use crate::api::FilingStore;
use crate::model::{FilingSnapshot, FilingStatus};
use crate::wizard::StepSlice;
use crate::Result;
use anyhow::bail;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

/// One call to `save_slice` as the store received it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SavedSlice {
    pub filing_id: String,
    pub step: usize,
    pub slice: StepSlice,
}

#[derive(Debug, Default)]
struct State {
    filings: HashMap<String, FilingSnapshot>,
    saves: Vec<SavedSlice>,
    fail_next_save: bool,
}

/// A `FilingStore` that merges saved slices into snapshots held in memory. Clones share the same
/// filings, so a test can keep a handle while the wizard owns another.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `snapshot`.
    pub fn with_filing(snapshot: FilingSnapshot) -> Self {
        let store = Self::new();
        store.insert(snapshot);
        store
    }

    pub fn insert(&self, snapshot: FilingSnapshot) {
        self.state()
            .filings
            .insert(snapshot.filing_id.clone(), snapshot);
    }

    pub fn snapshot(&self, filing_id: &str) -> Option<FilingSnapshot> {
        self.state().filings.get(filing_id).cloned()
    }

    /// Every slice saved so far, oldest first.
    pub fn saves(&self) -> Vec<SavedSlice> {
        self.state().saves.clone()
    }

    /// Make the next `save_slice` fail without storing anything.
    pub fn fail_next_save(&self) {
        self.state().fail_next_save = true;
    }

    /// Change the status of a filing the way a reviewer would.
    pub fn set_status(&self, filing_id: &str, status: FilingStatus) {
        if let Some(snapshot) = self.state().filings.get_mut(filing_id) {
            snapshot.draft.status = status;
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait::async_trait]
impl FilingStore for MemoryStore {
    /// Unknown filings are created empty and pending.
    async fn load(&self, filing_id: &str) -> Result<FilingSnapshot> {
        let mut state = self.state();
        let snapshot = state
            .filings
            .entry(filing_id.to_string())
            .or_insert_with(|| FilingSnapshot::new(filing_id));
        Ok(snapshot.clone())
    }

    async fn save_slice(
        &self,
        filing_id: &str,
        step: usize,
        slice: &StepSlice,
    ) -> Result<FilingSnapshot> {
        let mut state = self.state();
        if std::mem::take(&mut state.fail_next_save) {
            bail!("The filing service rejected step {step} of filing '{filing_id}'");
        }
        let snapshot = state
            .filings
            .entry(filing_id.to_string())
            .or_insert_with(|| FilingSnapshot::new(filing_id));
        if !snapshot.draft.status.is_editable() {
            bail!(
                "Filing '{filing_id}' is {} and cannot be changed",
                snapshot.draft.status
            );
        }
        slice.apply_to(&mut snapshot.draft);
        snapshot.updated_at = Some(Utc::now());
        let updated = snapshot.clone();
        state.saves.push(SavedSlice {
            filing_id: filing_id.to_string(),
            step,
            slice: slice.clone(),
        });
        debug!("Saved step {step} of filing '{filing_id}'");
        Ok(updated)
    }

    async fn submit(&self, filing_id: &str) -> Result<FilingSnapshot> {
        let mut state = self.state();
        let Some(snapshot) = state.filings.get_mut(filing_id) else {
            bail!("Filing '{filing_id}' not found");
        };
        if !snapshot.draft.status.is_editable() {
            bail!(
                "Filing '{filing_id}' is {} and cannot be submitted",
                snapshot.draft.status
            );
        }
        let now = Utc::now();
        snapshot.draft.status = FilingStatus::UnderReview;
        snapshot.updated_at = Some(now);
        snapshot.submitted_at = Some(now);
        debug!("Submitted filing '{filing_id}'");
        Ok(snapshot.clone())
    }
}
