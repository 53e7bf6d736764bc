//! Types that represent the filing data model, such as `FilingDraft` and `IncomeRecord`.
mod amount;
mod deduction;
mod entries;
pub(crate) mod fields;
mod filing;
mod income;
mod patch;
mod wealth;

pub use amount::{to_amount, to_digits, to_display, Amount, AmountError};
pub use deduction::{
    BankTransactionDeduction, BankTransactionDraft, DeductionDetails, DeductionDraft,
    DeductionKind, OtherDeduction, UtilityDeduction, UtilityDraft, VehicleDeduction,
    VehicleDeductionDraft,
};
pub use entries::{Entries, Entry, EntryId};
pub use filing::{CreditKind, Expense, FilingDraft, FilingStatus, PersonalInfo, TaxCredit};
pub use income::{
    Agriculture, Business, BusinessDraft, BusinessEntry, Commission, CommissionCategory,
    CommissionLine, Dividend, Freelancer, HoldingPeriod, IncomeEntryDraft, IncomeRecord,
    IncomeSourceKind, Inflow, InflowDraft, OtherIncome, Partnership, Pension, Profession,
    Professional, PropertyIncome, PropertySale, PropertyType, RentalDraft, RentalEntry, Salary,
    SaleDraft, Savings,
};
pub use patch::{apply_update, DraftPatch};
pub use wealth::{
    AssetClass, AssetDraft, Assets, BankAccount, BankAccountDraft, BankLoan, BankLoanDraft, Cash,
    CashDraft, ForeignAsset, ForeignAssetDraft, Insurance, InsuranceDraft, Liabilities,
    LiabilityDraft, OtherAsset, OtherAssetDraft, OtherLiability, OtherLiabilityDraft, Possession,
    PossessionDraft, PropertyAsset, PropertyAssetDraft, Vehicle, VehicleDraft, WealthStatement,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A filing as held by the persistence service: its id, the draft fields and bookkeeping
/// timestamps. Fields absent from the service's document take their defaults.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingSnapshot {
    #[serde(default)]
    pub filing_id: String,
    #[serde(flatten)]
    pub draft: FilingDraft,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl FilingSnapshot {
    pub fn new(filing_id: impl Into<String>) -> Self {
        Self {
            filing_id: filing_id.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_without_filing_id() {
        let snapshot: FilingSnapshot = serde_json::from_str(r#"{"taxYear":2024}"#).unwrap();
        assert_eq!(snapshot.filing_id, "");
        assert_eq!(snapshot.draft.tax_year(), Some(2024));
        assert_eq!(snapshot.draft.status(), FilingStatus::Pending);
    }
}
