use crate::error::ValidationError;
use crate::model::fields::{optional_amount, required_amount, required_text};
use crate::model::{Amount, Entries, EntryId};
use serde::{Deserialize, Serialize};

const BUSINESS: &str = "business";

/// Business income is declared per business, each with its own turnover and expenses.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    #[serde(default)]
    pub entries: Entries<BusinessEntry>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessEntry {
    pub business_name: String,
    pub income: Amount,
    #[serde(default)]
    pub expenses: Amount,
}

impl BusinessEntry {
    /// Income less expenses. Losses are kept negative so they offset other businesses.
    pub fn net(&self) -> Amount {
        self.income - self.expenses
    }
}

/// Raw text for a business that has not been added yet.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessDraft {
    pub business_name: String,
    pub income: String,
    pub expenses: String,
}

impl BusinessDraft {
    pub fn commit(&self) -> Result<BusinessEntry, ValidationError> {
        Ok(BusinessEntry {
            business_name: required_text(BUSINESS, "businessName", &self.business_name)?,
            income: required_amount(BUSINESS, "income", &self.income)?,
            expenses: optional_amount(BUSINESS, "expenses", &self.expenses)?,
        })
    }
}

impl Business {
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.entries.is_empty() {
            return Err(ValidationError::NoEntries(BUSINESS));
        }
        Ok(())
    }

    pub fn net_total(&self) -> Amount {
        self.entries.sum_by(BusinessEntry::net)
    }

    pub fn with_entry(&self, draft: &BusinessDraft) -> Result<Self, ValidationError> {
        let entry = draft.commit()?;
        Ok(Self {
            entries: self.entries.append(entry),
        })
    }

    pub fn without_entry(&self, id: EntryId) -> Self {
        Self {
            entries: self.entries.remove_by_id(id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, income: &str, expenses: &str) -> BusinessDraft {
        BusinessDraft {
            business_name: name.into(),
            income: income.into(),
            expenses: expenses.into(),
        }
    }

    #[test]
    fn test_losses_offset_other_businesses() {
        let business = Business::default()
            .with_entry(&draft("Shop", "100000", "30000"))
            .unwrap()
            .with_entry(&draft("Stall", "20000", "25000"))
            .unwrap();
        assert_eq!(business.net_total(), Amount::from(65_000i64));
    }

    #[test]
    fn test_incomplete_without_entries() {
        assert_eq!(
            Business::default().check(),
            Err(ValidationError::NoEntries("business"))
        );
    }

    #[test]
    fn test_missing_name_is_rejected() {
        let business = Business::default();
        let err = business.with_entry(&draft("", "100", "")).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingRequiredField {
                record: "business",
                field: "businessName"
            }
        );
        assert!(business.entries.is_empty());
    }

    #[test]
    fn test_remove_entry() {
        let business = Business::default()
            .with_entry(&draft("Shop", "10", "0"))
            .unwrap();
        let id = business.entries.ids()[0];
        let removed = business.without_entry(id);
        assert!(removed.check().is_err());
        assert_eq!(business.entries.len(), 1);
    }
}
