use crate::error::ValidationError;
use crate::model::fields::{optional_text, required_amount, required_text};
use crate::model::{Amount, Entries, EntryId};
use serde::{Deserialize, Serialize};

const BANK_LOANS: &str = "bank loans";
const OTHER_LIABILITIES: &str = "other liabilities";

/// Liabilities at the end of the year. A category that is `None` was not declared; a category
/// that is `Some` must hold at least one entry.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Liabilities {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bank_loans: Option<Entries<BankLoan>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub other_liabilities: Option<Entries<OtherLiability>>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankLoan {
    pub bank_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_type: Option<String>,
    pub outstanding_loan: Amount,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherLiability {
    pub description: String,
    pub amount: Amount,
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankLoanDraft {
    pub bank_name: String,
    pub loan_type: String,
    pub outstanding_loan: String,
}

impl BankLoanDraft {
    pub fn commit(&self) -> Result<BankLoan, ValidationError> {
        Ok(BankLoan {
            bank_name: required_text("bank loan", "bankName", &self.bank_name)?,
            loan_type: optional_text(&self.loan_type),
            outstanding_loan: required_amount(
                "bank loan",
                "outstandingLoan",
                &self.outstanding_loan,
            )?,
        })
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OtherLiabilityDraft {
    pub description: String,
    pub amount: String,
}

impl OtherLiabilityDraft {
    pub fn commit(&self) -> Result<OtherLiability, ValidationError> {
        Ok(OtherLiability {
            description: required_text("other liability", "description", &self.description)?,
            amount: required_amount("other liability", "amount", &self.amount)?,
        })
    }
}

/// A not-yet-committed liability of either category.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry", rename_all = "camelCase")]
pub enum LiabilityDraft {
    BankLoan(BankLoanDraft),
    OtherLiability(OtherLiabilityDraft),
}

impl Liabilities {
    /// Declared categories must not be empty; undeclared categories are fine.
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.bank_loans.as_ref().is_some_and(Entries::is_empty) {
            return Err(ValidationError::EmptyDeclaredCategory(BANK_LOANS));
        }
        if self.other_liabilities.as_ref().is_some_and(Entries::is_empty) {
            return Err(ValidationError::EmptyDeclaredCategory(OTHER_LIABILITIES));
        }
        Ok(())
    }

    pub fn bank_loan_total(&self) -> Amount {
        self.bank_loans
            .as_ref()
            .map(|l| l.sum_by(|b| b.outstanding_loan))
            .unwrap_or_default()
    }

    pub fn other_total(&self) -> Amount {
        self.other_liabilities
            .as_ref()
            .map(|l| l.sum_by(|o| o.amount))
            .unwrap_or_default()
    }

    pub fn total(&self) -> Amount {
        self.bank_loan_total() + self.other_total()
    }

    pub fn with_liability(&self, draft: &LiabilityDraft) -> Result<Self, ValidationError> {
        let mut next = self.clone();
        match draft {
            LiabilityDraft::BankLoan(d) => {
                let loan = d.commit()?;
                next.bank_loans = Some(self.bank_loans.clone().unwrap_or_default().append(loan));
            }
            LiabilityDraft::OtherLiability(d) => {
                let other = d.commit()?;
                next.other_liabilities = Some(
                    self.other_liabilities
                        .clone()
                        .unwrap_or_default()
                        .append(other),
                );
            }
        }
        Ok(next)
    }

    /// Removes the liability identified by `id` from whichever category holds it. The category
    /// stays declared, even when this empties it.
    pub fn without_liability(&self, id: EntryId) -> Self {
        Self {
            bank_loans: self.bank_loans.as_ref().map(|l| l.remove_by_id(id)),
            other_liabilities: self.other_liabilities.as_ref().map(|l| l.remove_by_id(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan(amount: &str) -> LiabilityDraft {
        LiabilityDraft::BankLoan(BankLoanDraft {
            bank_name: "HBL".into(),
            loan_type: "Car financing".into(),
            outstanding_loan: amount.into(),
        })
    }

    #[test]
    fn test_omitted_categories_are_fine() {
        assert!(Liabilities::default().check().is_ok());
        assert_eq!(Liabilities::default().total(), Amount::ZERO);
    }

    #[test]
    fn test_declared_empty_category_is_invalid() {
        let liabilities = Liabilities {
            bank_loans: None,
            other_liabilities: Some(Entries::default()),
        };
        assert_eq!(
            liabilities.check(),
            Err(ValidationError::EmptyDeclaredCategory("other liabilities"))
        );
    }

    #[test]
    fn test_totals() {
        let liabilities = Liabilities::default()
            .with_liability(&loan("1,000,000"))
            .unwrap()
            .with_liability(&loan("250000"))
            .unwrap()
            .with_liability(&LiabilityDraft::OtherLiability(OtherLiabilityDraft {
                description: "Loan from brother".into(),
                amount: "50000".into(),
            }))
            .unwrap();
        assert_eq!(liabilities.total(), Amount::from(1_300_000u64));
        assert!(liabilities.check().is_ok());
    }

    #[test]
    fn test_removing_last_entry_leaves_declared_category() {
        let liabilities = Liabilities::default().with_liability(&loan("10")).unwrap();
        let id = liabilities.bank_loans.as_ref().unwrap().ids()[0];
        let emptied = liabilities.without_liability(id);
        assert!(emptied.check().is_err());
    }

    #[test]
    fn test_serialized_omits_undeclared() {
        let json = serde_json::to_value(Liabilities::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}
