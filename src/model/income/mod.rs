//! Income sources. Each selected `IncomeSourceKind` has exactly one `IncomeRecord` whose shape is
//! fixed by the kind. Records are values: every edit returns a new record.

mod business;
mod commission;
mod property;
mod sources;

pub use business::{Business, BusinessDraft, BusinessEntry};
pub use commission::{Commission, CommissionCategory, CommissionLine};
pub use property::{
    HoldingPeriod, PropertyIncome, PropertySale, PropertyType, RentalDraft, RentalEntry, SaleDraft,
};
pub use sources::{
    Agriculture, Dividend, Freelancer, Inflow, InflowDraft, OtherIncome, Partnership, Pension,
    Profession, Professional, Salary, Savings,
};

use crate::error::ValidationError;
use crate::model::{Amount, EntryId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IncomeSourceKind {
    Salary,
    Business,
    Freelancer,
    Professional,
    Pension,
    Agriculture,
    Commission,
    Partnership,
    Property,
    Savings,
    Dividend,
    Other,
}

serde_plain::derive_display_from_serialize!(IncomeSourceKind);
serde_plain::derive_fromstr_from_deserialize!(IncomeSourceKind);

impl IncomeSourceKind {
    pub const ALL: [IncomeSourceKind; 12] = [
        IncomeSourceKind::Salary,
        IncomeSourceKind::Business,
        IncomeSourceKind::Freelancer,
        IncomeSourceKind::Professional,
        IncomeSourceKind::Pension,
        IncomeSourceKind::Agriculture,
        IncomeSourceKind::Commission,
        IncomeSourceKind::Partnership,
        IncomeSourceKind::Property,
        IncomeSourceKind::Savings,
        IncomeSourceKind::Dividend,
        IncomeSourceKind::Other,
    ];

    /// True for kinds whose details are a list of sub-entries rather than scalar fields.
    pub fn is_multi_instance(&self) -> bool {
        matches!(
            self,
            IncomeSourceKind::Business | IncomeSourceKind::Property | IncomeSourceKind::Other
        )
    }

    /// The empty record created when this kind is selected.
    pub fn empty_record(&self) -> IncomeRecord {
        match self {
            IncomeSourceKind::Salary => IncomeRecord::Salary(Salary::default()),
            IncomeSourceKind::Business => IncomeRecord::Business(Business::default()),
            IncomeSourceKind::Freelancer => IncomeRecord::Freelancer(Freelancer::default()),
            IncomeSourceKind::Professional => IncomeRecord::Professional(Professional::default()),
            IncomeSourceKind::Pension => IncomeRecord::Pension(Pension::default()),
            IncomeSourceKind::Agriculture => IncomeRecord::Agriculture(Agriculture::default()),
            IncomeSourceKind::Commission => IncomeRecord::Commission(Commission::default()),
            IncomeSourceKind::Partnership => IncomeRecord::Partnership(Partnership::default()),
            IncomeSourceKind::Property => IncomeRecord::Property(PropertyIncome::default()),
            IncomeSourceKind::Savings => IncomeRecord::Savings(Savings::default()),
            IncomeSourceKind::Dividend => IncomeRecord::Dividend(Dividend::default()),
            IncomeSourceKind::Other => IncomeRecord::Other(OtherIncome::default()),
        }
    }
}

/// The declared details of one income source, discriminated by `type` on the wire.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum IncomeRecord {
    Salary(Salary),
    Business(Business),
    Freelancer(Freelancer),
    Professional(Professional),
    Pension(Pension),
    Agriculture(Agriculture),
    Commission(Commission),
    Partnership(Partnership),
    Property(PropertyIncome),
    Savings(Savings),
    Dividend(Dividend),
    Other(OtherIncome),
}

/// A not-yet-committed sub-entry for one of the multi-instance income kinds.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entry", rename_all = "camelCase")]
pub enum IncomeEntryDraft {
    Business(BusinessDraft),
    Rental(RentalDraft),
    Sale(SaleDraft),
    Inflow(InflowDraft),
}

impl IncomeEntryDraft {
    /// The income kind this entry belongs to.
    pub fn kind(&self) -> IncomeSourceKind {
        match self {
            IncomeEntryDraft::Business(_) => IncomeSourceKind::Business,
            IncomeEntryDraft::Rental(_) | IncomeEntryDraft::Sale(_) => IncomeSourceKind::Property,
            IncomeEntryDraft::Inflow(_) => IncomeSourceKind::Other,
        }
    }
}

impl IncomeRecord {
    pub fn kind(&self) -> IncomeSourceKind {
        match self {
            IncomeRecord::Salary(_) => IncomeSourceKind::Salary,
            IncomeRecord::Business(_) => IncomeSourceKind::Business,
            IncomeRecord::Freelancer(_) => IncomeSourceKind::Freelancer,
            IncomeRecord::Professional(_) => IncomeSourceKind::Professional,
            IncomeRecord::Pension(_) => IncomeSourceKind::Pension,
            IncomeRecord::Agriculture(_) => IncomeSourceKind::Agriculture,
            IncomeRecord::Commission(_) => IncomeSourceKind::Commission,
            IncomeRecord::Partnership(_) => IncomeSourceKind::Partnership,
            IncomeRecord::Property(_) => IncomeSourceKind::Property,
            IncomeRecord::Savings(_) => IncomeSourceKind::Savings,
            IncomeRecord::Dividend(_) => IncomeSourceKind::Dividend,
            IncomeRecord::Other(_) => IncomeSourceKind::Other,
        }
    }

    /// Returns the reason this record is not yet complete, if any.
    pub fn check(&self) -> Result<(), ValidationError> {
        match self {
            IncomeRecord::Salary(r) => r.check(),
            IncomeRecord::Business(r) => r.check(),
            IncomeRecord::Freelancer(r) => r.check(),
            IncomeRecord::Professional(r) => r.check(),
            IncomeRecord::Pension(r) => r.check(),
            IncomeRecord::Agriculture(r) => r.check(),
            IncomeRecord::Commission(r) => r.check(),
            IncomeRecord::Partnership(r) => r.check(),
            IncomeRecord::Property(r) => r.check(),
            IncomeRecord::Savings(r) => r.check(),
            IncomeRecord::Dividend(r) => r.check(),
            IncomeRecord::Other(r) => r.check(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.check().is_ok()
    }

    /// Checks the sub-entries already in the record the same way committing them one by one
    /// would. An incomplete record passes; an entry no draft could have produced does not.
    pub fn check_entries(&self) -> Result<(), ValidationError> {
        match self {
            IncomeRecord::Property(r) => r.sales.records().try_for_each(PropertySale::check),
            _ => Ok(()),
        }
    }

    /// The net income this record contributes to the summary.
    pub fn net_total(&self) -> Amount {
        match self {
            IncomeRecord::Salary(r) => r.annual_salary.unwrap_or_default(),
            IncomeRecord::Business(r) => r.net_total(),
            IncomeRecord::Freelancer(r) => r.freelancer_income.unwrap_or_default(),
            IncomeRecord::Professional(r) => r.professional_income.unwrap_or_default(),
            IncomeRecord::Pension(r) => r.pension_income.unwrap_or_default(),
            IncomeRecord::Agriculture(r) => r.agriculture_income.unwrap_or_default(),
            IncomeRecord::Commission(r) => r.net_total(),
            IncomeRecord::Partnership(r) => r.partnership_income.unwrap_or_default(),
            IncomeRecord::Property(r) => r.net_total(),
            IncomeRecord::Savings(r) => r.savings_income.unwrap_or_default(),
            IncomeRecord::Dividend(r) => r.net_total(),
            IncomeRecord::Other(r) => r.net_total(),
        }
    }

    /// Tax already deducted or withheld at source for this income.
    pub fn tax_withheld(&self) -> Amount {
        match self {
            IncomeRecord::Salary(r) => r.tax_deducted.unwrap_or_default(),
            IncomeRecord::Property(r) => r.tax_withheld(),
            IncomeRecord::Savings(r) => r.tax_deducted.unwrap_or_default(),
            IncomeRecord::Dividend(r) => r.tax_deducted.unwrap_or_default(),
            _ => Amount::ZERO,
        }
    }

    /// Returns a new record with `draft` committed as a sub-entry. Fails if the draft is invalid or
    /// belongs to a different income kind.
    pub fn with_entry(&self, draft: &IncomeEntryDraft) -> Result<Self, ValidationError> {
        match (self, draft) {
            (IncomeRecord::Business(r), IncomeEntryDraft::Business(d)) => {
                Ok(IncomeRecord::Business(r.with_entry(d)?))
            }
            (IncomeRecord::Property(r), IncomeEntryDraft::Rental(d)) => {
                Ok(IncomeRecord::Property(r.with_rental(d)?))
            }
            (IncomeRecord::Property(r), IncomeEntryDraft::Sale(d)) => {
                Ok(IncomeRecord::Property(r.with_sale(d)?))
            }
            (IncomeRecord::Other(r), IncomeEntryDraft::Inflow(d)) => {
                Ok(IncomeRecord::Other(r.with_inflow(d)?))
            }
            (_, d) => Err(ValidationError::IncomeSourceNotSelected(d.kind())),
        }
    }

    /// Returns a new record without the sub-entry identified by `id`. Scalar kinds and unknown
    /// ids are returned unchanged.
    pub fn without_entry(&self, id: EntryId) -> Self {
        match self {
            IncomeRecord::Business(r) => IncomeRecord::Business(r.without_entry(id)),
            IncomeRecord::Property(r) => IncomeRecord::Property(r.without_entry(id)),
            IncomeRecord::Other(r) => IncomeRecord::Other(r.without_entry(id)),
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record_matches_kind() {
        for kind in IncomeSourceKind::ALL {
            assert_eq!(kind.empty_record().kind(), kind);
            assert!(!kind.empty_record().is_complete(), "{kind} should start incomplete");
        }
    }

    #[test]
    fn test_wire_names() {
        let names: Vec<String> = IncomeSourceKind::ALL.iter().map(|k| k.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "salary",
                "business",
                "freelancer",
                "professional",
                "pension",
                "agriculture",
                "commission",
                "partnership",
                "property",
                "savings",
                "dividend",
                "other"
            ]
        );
    }

    #[test]
    fn test_record_is_tagged_by_type() {
        let record = IncomeRecord::Salary(Salary {
            annual_salary: Some(Amount::from(50_000u64)),
            tax_deducted: Some(Amount::from(5_000u64)),
            employer_name: None,
        });
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "salary", "annualSalary": 50000, "taxDeducted": 5000})
        );
        let back: IncomeRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_hydrate_sparse_record() {
        let record: IncomeRecord =
            serde_json::from_value(serde_json::json!({"type": "business"})).unwrap();
        assert_eq!(record, IncomeSourceKind::Business.empty_record());
    }

    #[test]
    fn test_entry_for_other_kind_is_rejected() {
        let salary = IncomeSourceKind::Salary.empty_record();
        let draft = IncomeEntryDraft::Inflow(InflowDraft {
            description: "gift".into(),
            amount: "1".into(),
        });
        assert_eq!(
            salary.with_entry(&draft).unwrap_err(),
            ValidationError::IncomeSourceNotSelected(IncomeSourceKind::Other)
        );
    }

    #[test]
    fn test_with_entry_leaves_original() {
        let record = IncomeSourceKind::Business.empty_record();
        let draft = IncomeEntryDraft::Business(BusinessDraft {
            business_name: "Shop".into(),
            income: "100".into(),
            expenses: "".into(),
        });
        let next = record.with_entry(&draft).unwrap();
        assert!(next.is_complete());
        assert!(!record.is_complete());
    }

    #[test]
    fn test_multi_instance_kinds() {
        let multi: Vec<IncomeSourceKind> = IncomeSourceKind::ALL
            .into_iter()
            .filter(|k| k.is_multi_instance())
            .collect();
        assert_eq!(
            multi,
            vec![
                IncomeSourceKind::Business,
                IncomeSourceKind::Property,
                IncomeSourceKind::Other
            ]
        );
    }
}
