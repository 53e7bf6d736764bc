use crate::error::ValidationError;
use crate::model::Amount;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommissionCategory {
    LifeInsurance,
    GeneralInsurance,
    RealEstateTravel,
    ServicesConsultancy,
    Other,
}

serde_plain::derive_display_from_serialize!(CommissionCategory);

impl CommissionCategory {
    pub const ALL: [CommissionCategory; 5] = [
        CommissionCategory::LifeInsurance,
        CommissionCategory::GeneralInsurance,
        CommissionCategory::RealEstateTravel,
        CommissionCategory::ServicesConsultancy,
        CommissionCategory::Other,
    ];
}

/// Commission received in one category and the expenses incurred earning it.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommissionLine {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expense: Option<Amount>,
}

impl CommissionLine {
    pub fn new(amount: impl Into<Amount>, expense: impl Into<Amount>) -> Self {
        Self {
            amount: Some(amount.into()),
            expense: Some(expense.into()),
        }
    }

    /// Amount less expense, never below zero.
    pub fn net(&self) -> Amount {
        let amount = self.amount.unwrap_or_default();
        let expense = self.expense.unwrap_or_default();
        (amount - expense).floor_zero()
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Commission {
    pub life_insurance: CommissionLine,
    pub general_insurance: CommissionLine,
    pub real_estate_travel: CommissionLine,
    pub services_consultancy: CommissionLine,
    pub other: CommissionLine,
}

impl Commission {
    pub fn line(&self, category: CommissionCategory) -> &CommissionLine {
        match category {
            CommissionCategory::LifeInsurance => &self.life_insurance,
            CommissionCategory::GeneralInsurance => &self.general_insurance,
            CommissionCategory::RealEstateTravel => &self.real_estate_travel,
            CommissionCategory::ServicesConsultancy => &self.services_consultancy,
            CommissionCategory::Other => &self.other,
        }
    }

    /// Returns a copy with the line for `category` replaced.
    pub fn with_line(&self, category: CommissionCategory, line: CommissionLine) -> Self {
        let mut next = self.clone();
        let slot = match category {
            CommissionCategory::LifeInsurance => &mut next.life_insurance,
            CommissionCategory::GeneralInsurance => &mut next.general_insurance,
            CommissionCategory::RealEstateTravel => &mut next.real_estate_travel,
            CommissionCategory::ServicesConsultancy => &mut next.services_consultancy,
            CommissionCategory::Other => &mut next.other,
        };
        *slot = line;
        next
    }

    pub fn check(&self) -> Result<(), ValidationError> {
        let any_amount = CommissionCategory::ALL
            .iter()
            .any(|c| self.line(*c).amount.is_some());
        if !any_amount {
            return Err(ValidationError::MissingRequiredField {
                record: "commission",
                field: "amount",
            });
        }
        Ok(())
    }

    /// Sum of the per-category nets. A category whose expenses exceed its commission contributes
    /// zero rather than reducing the others.
    pub fn net_total(&self) -> Amount {
        CommissionCategory::ALL
            .iter()
            .map(|c| self.line(*c).net())
            .sum()
    }
}
