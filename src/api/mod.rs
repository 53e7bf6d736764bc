//! The filing service that stores drafts. The wizard only talks to it through `FilingStore`.

mod http;
mod memory;

pub use http::HttpStore;
pub use memory::{MemoryStore, SavedSlice};

use crate::model::FilingSnapshot;
use crate::wizard::StepSlice;
use crate::{Config, Result};

/// Persists one filing at a time, one step slice per save.
#[async_trait::async_trait]
pub trait FilingStore: Send + Sync {
    /// Fetch the current document for `filing_id`. Absent fields take their defaults.
    async fn load(&self, filing_id: &str) -> Result<FilingSnapshot>;

    /// Save the payload of step `step` and return the service's view of the filing afterwards.
    async fn save_slice(
        &self,
        filing_id: &str,
        step: usize,
        slice: &StepSlice,
    ) -> Result<FilingSnapshot>;

    /// Submit the filing for review.
    async fn submit(&self, filing_id: &str) -> Result<FilingSnapshot>;
}

#[async_trait::async_trait]
impl<T> FilingStore for Box<T>
where
    T: FilingStore + ?Sized,
{
    async fn load(&self, filing_id: &str) -> Result<FilingSnapshot> {
        (**self).load(filing_id).await
    }

    async fn save_slice(
        &self,
        filing_id: &str,
        step: usize,
        slice: &StepSlice,
    ) -> Result<FilingSnapshot> {
        (**self).save_slice(filing_id, step, slice).await
    }

    async fn submit(&self, filing_id: &str) -> Result<FilingSnapshot> {
        (**self).submit(filing_id).await
    }
}

/// Whether the program talks to the real filing service or keeps everything in memory.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    #[default]
    Http,
    Test,
}

impl Mode {
    /// `Mode::Test` when `TAXFILE_IN_TEST_MODE` is set and not empty, otherwise `Mode::Http`.
    pub fn from_env() -> Self {
        match std::env::var("TAXFILE_IN_TEST_MODE") {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::Http,
        }
    }
}

/// Creates the store for `mode`.
pub async fn store(config: &Config, mode: Mode) -> Result<Box<dyn FilingStore>> {
    Ok(match mode {
        Mode::Http => Box::new(HttpStore::from_config(config).await?),
        Mode::Test => Box::new(MemoryStore::default()),
    })
}
