//! Asset records for each class of the wealth statement and the drafts used to add them.

use crate::error::ValidationError;
use crate::model::fields::{optional_text, required_amount, required_text};
use crate::model::Amount;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyAsset {
    pub property_type: String,
    pub size: String,
    pub unit: String,
    pub address: String,
    /// Valuation notified by the revenue authority.
    pub fbr_value: Amount,
    pub cost: Amount,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub vehicle_type: String,
    pub registration_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make_model: Option<String>,
    pub cost: Amount,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankAccount {
    pub bank_name: String,
    pub account_number: String,
    pub cost: Amount,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insurance {
    pub company: String,
    pub description: String,
    pub premium_paid: Amount,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Possession {
    pub possession_type: String,
    pub description: String,
    pub cost: Amount,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignAsset {
    pub description: String,
    pub cost: Amount,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtherAsset {
    pub transaction_type: String,
    pub description: String,
    pub amount: Amount,
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cash {
    #[serde(default)]
    pub balance: Amount,
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PropertyAssetDraft {
    pub property_type: String,
    pub size: String,
    pub unit: String,
    pub address: String,
    pub fbr_value: String,
    pub cost: String,
}

impl PropertyAssetDraft {
    pub fn commit(&self) -> Result<PropertyAsset, ValidationError> {
        const R: &str = "property";
        Ok(PropertyAsset {
            property_type: required_text(R, "propertyType", &self.property_type)?,
            size: required_text(R, "size", &self.size)?,
            unit: required_text(R, "unit", &self.unit)?,
            address: required_text(R, "address", &self.address)?,
            fbr_value: required_amount(R, "fbrValue", &self.fbr_value)?,
            cost: required_amount(R, "cost", &self.cost)?,
        })
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VehicleDraft {
    pub vehicle_type: String,
    pub registration_number: String,
    pub make_model: String,
    pub cost: String,
}

impl VehicleDraft {
    pub fn commit(&self) -> Result<Vehicle, ValidationError> {
        const R: &str = "vehicle";
        Ok(Vehicle {
            vehicle_type: required_text(R, "vehicleType", &self.vehicle_type)?,
            registration_number: required_text(R, "registrationNumber", &self.registration_number)?,
            make_model: optional_text(&self.make_model),
            cost: required_amount(R, "cost", &self.cost)?,
        })
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BankAccountDraft {
    pub bank_name: String,
    pub account_number: String,
    pub cost: String,
}

impl BankAccountDraft {
    pub fn commit(&self) -> Result<BankAccount, ValidationError> {
        const R: &str = "bank account";
        Ok(BankAccount {
            bank_name: required_text(R, "bankName", &self.bank_name)?,
            account_number: required_text(R, "accountNumber", &self.account_number)?,
            cost: required_amount(R, "cost", &self.cost)?,
        })
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InsuranceDraft {
    pub company: String,
    pub description: String,
    pub premium_paid: String,
}

impl InsuranceDraft {
    pub fn commit(&self) -> Result<Insurance, ValidationError> {
        const R: &str = "insurance";
        Ok(Insurance {
            company: required_text(R, "company", &self.company)?,
            description: required_text(R, "description", &self.description)?,
            premium_paid: required_amount(R, "premiumPaid", &self.premium_paid)?,
        })
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PossessionDraft {
    pub possession_type: String,
    pub description: String,
    pub cost: String,
}

impl PossessionDraft {
    pub fn commit(&self) -> Result<Possession, ValidationError> {
        const R: &str = "possession";
        Ok(Possession {
            possession_type: required_text(R, "possessionType", &self.possession_type)?,
            description: required_text(R, "description", &self.description)?,
            cost: required_amount(R, "cost", &self.cost)?,
        })
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForeignAssetDraft {
    pub description: String,
    pub cost: String,
}

impl ForeignAssetDraft {
    pub fn commit(&self) -> Result<ForeignAsset, ValidationError> {
        const R: &str = "foreign asset";
        Ok(ForeignAsset {
            description: required_text(R, "description", &self.description)?,
            cost: required_amount(R, "cost", &self.cost)?,
        })
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OtherAssetDraft {
    pub transaction_type: String,
    pub description: String,
    pub amount: String,
}

impl OtherAssetDraft {
    pub fn commit(&self) -> Result<OtherAsset, ValidationError> {
        const R: &str = "other asset";
        Ok(OtherAsset {
            transaction_type: required_text(R, "transactionType", &self.transaction_type)?,
            description: required_text(R, "description", &self.description)?,
            amount: required_amount(R, "amount", &self.amount)?,
        })
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CashDraft {
    pub balance: String,
}

impl CashDraft {
    pub fn commit(&self) -> Result<Cash, ValidationError> {
        Ok(Cash {
            balance: required_amount("cash", "balance", &self.balance)?,
        })
    }
}
