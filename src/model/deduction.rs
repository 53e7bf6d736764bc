//! Tax deducted at source on bank transactions, utility bills and vehicles, plus a fixed set of
//! other deductible payments.

use crate::error::ValidationError;
use crate::model::fields::{optional_text, required_amount, required_text};
use crate::model::{Amount, Entries, EntryId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeductionKind {
    BankTransactions,
    Utilities,
    Vehicles,
    Other,
}

serde_plain::derive_display_from_serialize!(DeductionKind);
serde_plain::derive_fromstr_from_deserialize!(DeductionKind);

impl DeductionKind {
    pub const ALL: [DeductionKind; 4] = [
        DeductionKind::BankTransactions,
        DeductionKind::Utilities,
        DeductionKind::Vehicles,
        DeductionKind::Other,
    ];
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeductionDetails {
    pub bank_transactions: Entries<BankTransactionDeduction>,
    pub utilities: Entries<UtilityDeduction>,
    pub vehicles: Entries<VehicleDeduction>,
    pub other: OtherDeduction,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankTransactionDeduction {
    pub bank_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    pub tax_deducted: Amount,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UtilityDeduction {
    pub utility_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consumer_number: Option<String>,
    pub tax_deducted: Amount,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDeduction {
    pub registration_number: String,
    pub tax_deducted: Amount,
}

/// The scalar "other" deduction record.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OtherDeduction {
    pub zakat: Amount,
    pub charitable_donations: Amount,
    pub pension_contribution: Amount,
    pub tuition_fees: Amount,
}

impl OtherDeduction {
    fn fields(&self) -> [Amount; 4] {
        [
            self.zakat,
            self.charitable_donations,
            self.pension_contribution,
            self.tuition_fees,
        ]
    }

    pub fn total(&self) -> Amount {
        self.fields().into_iter().sum()
    }

    /// True once at least one field is above zero.
    pub fn is_populated(&self) -> bool {
        self.fields().iter().any(Amount::is_positive)
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankTransactionDraft {
    pub bank_name: String,
    pub account_number: String,
    pub tax_deducted: String,
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UtilityDraft {
    pub utility_type: String,
    pub consumer_number: String,
    pub tax_deducted: String,
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleDeductionDraft {
    pub registration_number: String,
    pub tax_deducted: String,
}

/// A not-yet-committed record for one of the list-shaped deduction kinds.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DeductionDraft {
    BankTransactions(BankTransactionDraft),
    Utilities(UtilityDraft),
    Vehicles(VehicleDeductionDraft),
}

impl DeductionDraft {
    pub fn kind(&self) -> DeductionKind {
        match self {
            DeductionDraft::BankTransactions(_) => DeductionKind::BankTransactions,
            DeductionDraft::Utilities(_) => DeductionKind::Utilities,
            DeductionDraft::Vehicles(_) => DeductionKind::Vehicles,
        }
    }
}

impl DeductionDetails {
    pub fn check(&self, kind: DeductionKind) -> Result<(), ValidationError> {
        let populated = match kind {
            DeductionKind::BankTransactions => !self.bank_transactions.is_empty(),
            DeductionKind::Utilities => !self.utilities.is_empty(),
            DeductionKind::Vehicles => !self.vehicles.is_empty(),
            DeductionKind::Other => self.other.is_populated(),
        };
        if !populated {
            return Err(ValidationError::NoEntries(match kind {
                DeductionKind::BankTransactions => "bank transaction deduction",
                DeductionKind::Utilities => "utility deduction",
                DeductionKind::Vehicles => "vehicle deduction",
                DeductionKind::Other => "other deduction",
            }));
        }
        Ok(())
    }

    pub fn total(&self, kind: DeductionKind) -> Amount {
        match kind {
            DeductionKind::BankTransactions => self.bank_transactions.sum_by(|d| d.tax_deducted),
            DeductionKind::Utilities => self.utilities.sum_by(|d| d.tax_deducted),
            DeductionKind::Vehicles => self.vehicles.sum_by(|d| d.tax_deducted),
            DeductionKind::Other => self.other.total(),
        }
    }

    pub fn with_deduction(&self, draft: &DeductionDraft) -> Result<Self, ValidationError> {
        let mut next = self.clone();
        match draft {
            DeductionDraft::BankTransactions(d) => {
                const R: &str = "bank transaction deduction";
                next.bank_transactions = self.bank_transactions.append(BankTransactionDeduction {
                    bank_name: required_text(R, "bankName", &d.bank_name)?,
                    account_number: optional_text(&d.account_number),
                    tax_deducted: required_amount(R, "taxDeducted", &d.tax_deducted)?,
                });
            }
            DeductionDraft::Utilities(d) => {
                const R: &str = "utility deduction";
                next.utilities = self.utilities.append(UtilityDeduction {
                    utility_type: required_text(R, "utilityType", &d.utility_type)?,
                    consumer_number: optional_text(&d.consumer_number),
                    tax_deducted: required_amount(R, "taxDeducted", &d.tax_deducted)?,
                });
            }
            DeductionDraft::Vehicles(d) => {
                const R: &str = "vehicle deduction";
                next.vehicles = self.vehicles.append(VehicleDeduction {
                    registration_number: required_text(
                        R,
                        "registrationNumber",
                        &d.registration_number,
                    )?,
                    tax_deducted: required_amount(R, "taxDeducted", &d.tax_deducted)?,
                });
            }
        }
        Ok(next)
    }

    pub fn without_deduction(&self, kind: DeductionKind, id: EntryId) -> Self {
        let mut next = self.clone();
        match kind {
            DeductionKind::BankTransactions => {
                next.bank_transactions = self.bank_transactions.remove_by_id(id)
            }
            DeductionKind::Utilities => next.utilities = self.utilities.remove_by_id(id),
            DeductionKind::Vehicles => next.vehicles = self.vehicles.remove_by_id(id),
            DeductionKind::Other => {}
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_kinds_need_a_record() {
        let details = DeductionDetails::default();
        assert!(details.check(DeductionKind::Utilities).is_err());
        let details = details
            .with_deduction(&DeductionDraft::Utilities(UtilityDraft {
                utility_type: "Electricity".into(),
                consumer_number: "0412345678".into(),
                tax_deducted: "3,200".into(),
            }))
            .unwrap();
        assert!(details.check(DeductionKind::Utilities).is_ok());
        assert_eq!(details.total(DeductionKind::Utilities), Amount::from(3_200u64));
    }

    #[test]
    fn test_other_needs_a_positive_field() {
        let mut details = DeductionDetails::default();
        assert!(details.check(DeductionKind::Other).is_err());
        details.other.tuition_fees = Amount::from(60_000u64);
        assert!(details.check(DeductionKind::Other).is_ok());
    }

    #[test]
    fn test_missing_tax_deducted_is_rejected() {
        let err = DeductionDetails::default()
            .with_deduction(&DeductionDraft::Vehicles(VehicleDeductionDraft {
                registration_number: "ICT-55".into(),
                tax_deducted: "".into(),
            }))
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredField {
                record: "vehicle deduction",
                field: "taxDeducted"
            }
        );
    }

    #[test]
    fn test_remove() {
        let details = DeductionDetails::default()
            .with_deduction(&DeductionDraft::BankTransactions(BankTransactionDraft {
                bank_name: "MCB".into(),
                account_number: "".into(),
                tax_deducted: "900".into(),
            }))
            .unwrap();
        let id = details.bank_transactions.ids()[0];
        let removed = details.without_deduction(DeductionKind::BankTransactions, id);
        assert!(removed.bank_transactions.is_empty());
    }
}
