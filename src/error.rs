//! Error types.
//!
//! Plumbing failures (files, JSON, HTTP, configuration) are `anyhow` errors. The filing core
//! reports its own recoverable conditions through `FilingError` and `ValidationError` so callers
//! can match on the reason and show it to the user.

use crate::model::{AssetClass, DeductionKind, FilingStatus, HoldingPeriod, IncomeSourceKind};
use crate::model::PropertyType;

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Why a record could not be committed, or why a step is not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("{record}: '{field}' is required")]
    MissingRequiredField {
        record: &'static str,
        field: &'static str,
    },

    #[error("{record}: '{field}' is not a valid amount: '{value}'")]
    InvalidNumericField {
        record: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("'{field}' has an invalid format: '{value}'")]
    InvalidFormat { field: &'static str, value: String },

    #[error("holding period '{holding_period}' is not valid for a {property_type} sale")]
    InvalidHoldingPeriod {
        property_type: PropertyType,
        holding_period: HoldingPeriod,
    },

    #[error("at least one {0} must be selected")]
    NothingSelected(&'static str),

    #[error("at least one {0} entry is required")]
    NoEntries(&'static str),

    #[error("{0} was declared but has no entries")]
    EmptyDeclaredCategory(&'static str),

    #[error("income source '{0}' is selected but has no income record")]
    MissingIncomeRecord(IncomeSourceKind),

    #[error("income source '{0}' has not been selected")]
    IncomeSourceNotSelected(IncomeSourceKind),

    #[error("deduction '{0}' has not been selected")]
    DeductionNotSelected(DeductionKind),

    #[error("asset class '{0}' has not been selected")]
    AssetClassNotSelected(AssetClass),

    #[error("at least one supporting document must be uploaded")]
    DocumentsRequired,

    #[error("the declaration must be accepted before submitting")]
    ConsentRequired,
}

/// Conditions surfaced by the filing wizard. None of these are fatal; the draft is always left in
/// the state it was in before the failing call.
#[derive(Debug, thiserror::Error)]
pub enum FilingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("step {step} is incomplete: {reason}")]
    StepIncomplete { step: usize, reason: ValidationError },

    #[error("step {0} does not exist in this flow")]
    UnknownStep(usize),

    #[error("the filing is {0} and can no longer be edited")]
    ReadOnly(FilingStatus),

    #[error("the filing has already been submitted")]
    AlreadySubmitted,

    #[error("unable to persist the filing: {0:#}")]
    Persistence(#[source] anyhow::Error),
}

impl FilingError {
    /// The step that blocked a forward transition, if that is what this error is.
    pub fn blocking_step(&self) -> Option<usize> {
        match self {
            FilingError::StepIncomplete { step, .. } => Some(*step),
            _ => None,
        }
    }
}
