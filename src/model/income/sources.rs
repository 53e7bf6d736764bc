//! Single-instance income sources whose details are a handful of scalar fields, plus the
//! multi-instance "other inflows".

use crate::error::ValidationError;
use crate::model::fields::{required_amount, required_text};
use crate::model::{Amount, Entries, EntryId};
use serde::{Deserialize, Serialize};

fn present<T>(
    record: &'static str,
    field: &'static str,
    value: &Option<T>,
) -> Result<(), ValidationError> {
    match value {
        Some(_) => Ok(()),
        None => Err(ValidationError::MissingRequiredField { record, field }),
    }
}

fn present_text(
    record: &'static str,
    field: &'static str,
    value: &Option<String>,
) -> Result<(), ValidationError> {
    match value.as_deref().map(str::trim) {
        Some(s) if !s.is_empty() => Ok(()),
        _ => Err(ValidationError::MissingRequiredField { record, field }),
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Salary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annual_salary: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_deducted: Option<Amount>,
}

impl Salary {
    pub fn check(&self) -> Result<(), ValidationError> {
        present("salary", "annualSalary", &self.annual_salary)?;
        present("salary", "taxDeducted", &self.tax_deducted)
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Freelancer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub freelancer_income: Option<Amount>,
}

impl Freelancer {
    pub fn check(&self) -> Result<(), ValidationError> {
        present("freelancer", "freelancerIncome", &self.freelancer_income)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Profession {
    Doctor,
    Lawyer,
    Engineer,
    Accountant,
    Architect,
    Consultant,
    Other,
}

serde_plain::derive_display_from_serialize!(Profession);
serde_plain::derive_fromstr_from_deserialize!(Profession);

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Professional {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profession: Option<Profession>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub professional_income: Option<Amount>,
}

impl Professional {
    pub fn check(&self) -> Result<(), ValidationError> {
        present("professional", "professionalIncome", &self.professional_income)?;
        present("professional", "profession", &self.profession)
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pension {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pension_income: Option<Amount>,
}

impl Pension {
    pub fn check(&self) -> Result<(), ValidationError> {
        present("pension", "pensionIncome", &self.pension_income)
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Agriculture {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub land_area: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub agriculture_income: Option<Amount>,
}

impl Agriculture {
    pub fn check(&self) -> Result<(), ValidationError> {
        present("agriculture", "agricultureIncome", &self.agriculture_income)
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Partnership {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partnership_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub partnership_income: Option<Amount>,
}

impl Partnership {
    pub fn check(&self) -> Result<(), ValidationError> {
        present("partnership", "partnershipIncome", &self.partnership_income)?;
        present_text("partnership", "partnershipName", &self.partnership_name)
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Savings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub savings_income: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_deducted: Option<Amount>,
}

impl Savings {
    pub fn check(&self) -> Result<(), ValidationError> {
        present("savings", "savingsIncome", &self.savings_income)
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dividend {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dividend_income: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capital_gain: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_deducted: Option<Amount>,
}

impl Dividend {
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.dividend_income.is_none() && self.capital_gain.is_none() {
            return Err(ValidationError::MissingRequiredField {
                record: "dividend",
                field: "dividendIncome",
            });
        }
        Ok(())
    }

    pub fn net_total(&self) -> Amount {
        self.dividend_income.unwrap_or_default() + self.capital_gain.unwrap_or_default()
    }
}

/// Money received outside the other categories: gifts, inheritance, foreign remittances.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherIncome {
    #[serde(default)]
    pub inflows: Entries<Inflow>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inflow {
    pub description: String,
    pub amount: Amount,
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InflowDraft {
    pub description: String,
    pub amount: String,
}

impl InflowDraft {
    pub fn commit(&self) -> Result<Inflow, ValidationError> {
        Ok(Inflow {
            description: required_text("inflow", "description", &self.description)?,
            amount: required_amount("inflow", "amount", &self.amount)?,
        })
    }
}

impl OtherIncome {
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.inflows.is_empty() {
            return Err(ValidationError::NoEntries("inflow"));
        }
        Ok(())
    }

    pub fn net_total(&self) -> Amount {
        self.inflows.sum_by(|i| i.amount)
    }

    pub fn with_inflow(&self, draft: &InflowDraft) -> Result<Self, ValidationError> {
        let inflow = draft.commit()?;
        Ok(Self {
            inflows: self.inflows.append(inflow),
        })
    }

    pub fn without_entry(&self, id: EntryId) -> Self {
        Self {
            inflows: self.inflows.remove_by_id(id),
        }
    }
}
