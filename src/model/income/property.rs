//! Property income: rented-out properties and properties sold during the year.
//!
//! A sale carries a holding-period bucket. The set of valid buckets depends on the kind of property
//! sold; the bucket is stored as declared and is never used here to scale the gain.

use crate::error::ValidationError;
use crate::model::fields::{optional_amount, required_amount, required_text};
use crate::model::{Amount, Entries, EntryId};
use serde::{Deserialize, Serialize};

const RENTAL: &str = "rental property";
const SALE: &str = "property sale";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    OpenPlot,
    ConstructedPlot,
    Flat,
}

serde_plain::derive_display_from_serialize!(PropertyType);
serde_plain::derive_fromstr_from_deserialize!(PropertyType);

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum HoldingPeriod {
    #[serde(rename = "within-tax-year")]
    WithinTaxYear,
    #[serde(rename = "1-2-years")]
    OneToTwoYears,
    #[serde(rename = "2-3-years")]
    TwoToThreeYears,
    #[serde(rename = "3-4-years")]
    ThreeToFourYears,
    #[serde(rename = "4-5-years")]
    FourToFiveYears,
    #[serde(rename = "5-6-years")]
    FiveToSixYears,
    #[serde(rename = "more-than-2-years")]
    MoreThanTwoYears,
    #[serde(rename = "more-than-4-years")]
    MoreThanFourYears,
    #[serde(rename = "more-than-6-years")]
    MoreThanSixYears,
}

serde_plain::derive_display_from_serialize!(HoldingPeriod);
serde_plain::derive_fromstr_from_deserialize!(HoldingPeriod);

impl PropertyType {
    /// The holding-period buckets that may be declared for a sale of this type of property.
    pub fn holding_periods(&self) -> &'static [HoldingPeriod] {
        use HoldingPeriod::*;
        match self {
            PropertyType::OpenPlot => &[
                WithinTaxYear,
                OneToTwoYears,
                TwoToThreeYears,
                ThreeToFourYears,
                FourToFiveYears,
                FiveToSixYears,
                MoreThanSixYears,
            ],
            PropertyType::ConstructedPlot => &[
                WithinTaxYear,
                OneToTwoYears,
                TwoToThreeYears,
                ThreeToFourYears,
                MoreThanFourYears,
            ],
            PropertyType::Flat => &[WithinTaxYear, OneToTwoYears, MoreThanTwoYears],
        }
    }

    pub fn accepts(&self, holding_period: HoldingPeriod) -> bool {
        self.holding_periods().contains(&holding_period)
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertyIncome {
    #[serde(default)]
    pub rentals: Entries<RentalEntry>,
    #[serde(default)]
    pub sales: Entries<PropertySale>,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RentalEntry {
    pub address: String,
    pub annual_rent: Amount,
    #[serde(default)]
    pub expenses: Amount,
    /// Tracked for the withholding summary; not deducted from the net.
    #[serde(default)]
    pub tax_withheld: Amount,
}

impl RentalEntry {
    pub fn net(&self) -> Amount {
        self.annual_rent - self.expenses
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PropertySale {
    pub property_type: PropertyType,
    pub holding_period: HoldingPeriod,
    pub address: String,
    pub purchase_price: Amount,
    pub sale_price: Amount,
}

impl PropertySale {
    /// Sale price less purchase price; negative for a loss.
    pub fn gain(&self) -> Amount {
        self.sale_price - self.purchase_price
    }

    pub fn check(&self) -> Result<(), ValidationError> {
        if !self.property_type.accepts(self.holding_period) {
            return Err(ValidationError::InvalidHoldingPeriod {
                property_type: self.property_type,
                holding_period: self.holding_period,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RentalDraft {
    pub address: String,
    pub annual_rent: String,
    pub expenses: String,
    pub tax_withheld: String,
}

impl RentalDraft {
    pub fn commit(&self) -> Result<RentalEntry, ValidationError> {
        Ok(RentalEntry {
            address: required_text(RENTAL, "address", &self.address)?,
            annual_rent: required_amount(RENTAL, "annualRent", &self.annual_rent)?,
            expenses: optional_amount(RENTAL, "expenses", &self.expenses)?,
            tax_withheld: optional_amount(RENTAL, "taxWithheld", &self.tax_withheld)?,
        })
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaleDraft {
    pub property_type: Option<PropertyType>,
    pub holding_period: Option<HoldingPeriod>,
    pub address: String,
    pub purchase_price: String,
    pub sale_price: String,
}

impl SaleDraft {
    pub fn commit(&self) -> Result<PropertySale, ValidationError> {
        let property_type = self
            .property_type
            .ok_or(ValidationError::MissingRequiredField {
                record: SALE,
                field: "propertyType",
            })?;
        let holding_period = self
            .holding_period
            .ok_or(ValidationError::MissingRequiredField {
                record: SALE,
                field: "holdingPeriod",
            })?;
        let sale = PropertySale {
            property_type,
            holding_period,
            address: required_text(SALE, "address", &self.address)?,
            purchase_price: required_amount(SALE, "purchasePrice", &self.purchase_price)?,
            sale_price: required_amount(SALE, "salePrice", &self.sale_price)?,
        };
        sale.check()?;
        Ok(sale)
    }
}

impl PropertyIncome {
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.rentals.is_empty() && self.sales.is_empty() {
            return Err(ValidationError::NoEntries("rental property or property sale"));
        }
        self.sales.records().try_for_each(PropertySale::check)
    }

    pub fn rental_total(&self) -> Amount {
        self.rentals.sum_by(RentalEntry::net)
    }

    pub fn gain_total(&self) -> Amount {
        self.sales.sum_by(PropertySale::gain)
    }

    pub fn net_total(&self) -> Amount {
        self.rental_total() + self.gain_total()
    }

    pub fn tax_withheld(&self) -> Amount {
        self.rentals.sum_by(|r| r.tax_withheld)
    }

    pub fn with_rental(&self, draft: &RentalDraft) -> Result<Self, ValidationError> {
        let entry = draft.commit()?;
        Ok(Self {
            rentals: self.rentals.append(entry),
            sales: self.sales.clone(),
        })
    }

    pub fn with_sale(&self, draft: &SaleDraft) -> Result<Self, ValidationError> {
        let sale = draft.commit()?;
        Ok(Self {
            rentals: self.rentals.clone(),
            sales: self.sales.append(sale),
        })
    }

    /// Removes the rental or the sale identified by `id`.
    pub fn without_entry(&self, id: EntryId) -> Self {
        Self {
            rentals: self.rentals.remove_by_id(id),
            sales: self.sales.remove_by_id(id),
        }
    }
}
