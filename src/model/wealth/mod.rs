//! The wealth statement: opening wealth, assets held at year end by class, and liabilities.
//!
//! Totals are for display only. Nothing here reconciles opening wealth, income and liabilities
//! against the closing assets.

mod assets;
mod liabilities;

pub use assets::{
    BankAccount, BankAccountDraft, Cash, CashDraft, ForeignAsset, ForeignAssetDraft, Insurance,
    InsuranceDraft, OtherAsset, OtherAssetDraft, Possession, PossessionDraft, PropertyAsset,
    PropertyAssetDraft, Vehicle, VehicleDraft,
};
pub use liabilities::{
    BankLoan, BankLoanDraft, Liabilities, LiabilityDraft, OtherLiability, OtherLiabilityDraft,
};

use crate::error::ValidationError;
use crate::model::{Amount, Entries, EntryId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetClass {
    Properties,
    Vehicles,
    BankAccounts,
    Insurances,
    Possessions,
    ForeignAssets,
    Cash,
    OtherAssets,
}

serde_plain::derive_display_from_serialize!(AssetClass);
serde_plain::derive_fromstr_from_deserialize!(AssetClass);

impl AssetClass {
    pub const ALL: [AssetClass; 8] = [
        AssetClass::Properties,
        AssetClass::Vehicles,
        AssetClass::BankAccounts,
        AssetClass::Insurances,
        AssetClass::Possessions,
        AssetClass::ForeignAssets,
        AssetClass::Cash,
        AssetClass::OtherAssets,
    ];
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WealthStatement {
    pub opening_wealth: Amount,
    pub assets: Assets,
    pub liabilities: Liabilities,
}

impl WealthStatement {
    pub fn check_opening_wealth(&self) -> Result<(), ValidationError> {
        if self.opening_wealth.is_negative() {
            return Err(ValidationError::InvalidNumericField {
                record: "wealth statement",
                field: "openingWealth",
                value: self.opening_wealth.to_string(),
            });
        }
        Ok(())
    }
}

/// Assets held at the end of the year, one collection per class. Cash is a single balance.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Assets {
    pub properties: Entries<PropertyAsset>,
    pub vehicles: Entries<Vehicle>,
    pub bank_accounts: Entries<BankAccount>,
    pub insurances: Entries<Insurance>,
    pub possessions: Entries<Possession>,
    pub foreign_assets: Entries<ForeignAsset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cash: Option<Cash>,
    pub other_assets: Entries<OtherAsset>,
}

/// A not-yet-committed asset for one class.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "class", rename_all = "camelCase")]
pub enum AssetDraft {
    Properties(PropertyAssetDraft),
    Vehicles(VehicleDraft),
    BankAccounts(BankAccountDraft),
    Insurances(InsuranceDraft),
    Possessions(PossessionDraft),
    ForeignAssets(ForeignAssetDraft),
    Cash(CashDraft),
    OtherAssets(OtherAssetDraft),
}

impl AssetDraft {
    pub fn class(&self) -> AssetClass {
        match self {
            AssetDraft::Properties(_) => AssetClass::Properties,
            AssetDraft::Vehicles(_) => AssetClass::Vehicles,
            AssetDraft::BankAccounts(_) => AssetClass::BankAccounts,
            AssetDraft::Insurances(_) => AssetClass::Insurances,
            AssetDraft::Possessions(_) => AssetClass::Possessions,
            AssetDraft::ForeignAssets(_) => AssetClass::ForeignAssets,
            AssetDraft::Cash(_) => AssetClass::Cash,
            AssetDraft::OtherAssets(_) => AssetClass::OtherAssets,
        }
    }
}

impl Assets {
    /// Returns the reason `class` is not yet complete, if any. List classes need an entry; cash
    /// needs a balance above zero.
    pub fn check(&self, class: AssetClass) -> Result<(), ValidationError> {
        let has_entries = match class {
            AssetClass::Properties => !self.properties.is_empty(),
            AssetClass::Vehicles => !self.vehicles.is_empty(),
            AssetClass::BankAccounts => !self.bank_accounts.is_empty(),
            AssetClass::Insurances => !self.insurances.is_empty(),
            AssetClass::Possessions => !self.possessions.is_empty(),
            AssetClass::ForeignAssets => !self.foreign_assets.is_empty(),
            AssetClass::OtherAssets => !self.other_assets.is_empty(),
            AssetClass::Cash => {
                return match self.cash {
                    Some(cash) if cash.balance.is_positive() => Ok(()),
                    Some(_) => Err(ValidationError::InvalidNumericField {
                        record: "cash",
                        field: "balance",
                        value: self.total(AssetClass::Cash).to_string(),
                    }),
                    None => Err(ValidationError::MissingRequiredField {
                        record: "cash",
                        field: "balance",
                    }),
                };
            }
        };
        if !has_entries {
            return Err(ValidationError::NoEntries(class_label(class)));
        }
        Ok(())
    }

    pub fn is_complete(&self, class: AssetClass) -> bool {
        self.check(class).is_ok()
    }

    /// The sum of the class's value field: cost, premium paid, amount or balance.
    pub fn total(&self, class: AssetClass) -> Amount {
        match class {
            AssetClass::Properties => self.properties.sum_by(|p| p.cost),
            AssetClass::Vehicles => self.vehicles.sum_by(|v| v.cost),
            AssetClass::BankAccounts => self.bank_accounts.sum_by(|b| b.cost),
            AssetClass::Insurances => self.insurances.sum_by(|i| i.premium_paid),
            AssetClass::Possessions => self.possessions.sum_by(|p| p.cost),
            AssetClass::ForeignAssets => self.foreign_assets.sum_by(|f| f.cost),
            AssetClass::Cash => self.cash.map(|c| c.balance).unwrap_or_default(),
            AssetClass::OtherAssets => self.other_assets.sum_by(|o| o.amount),
        }
    }

    pub fn grand_total(&self) -> Amount {
        AssetClass::ALL.iter().map(|c| self.total(*c)).sum()
    }

    /// Returns a copy with `draft` committed. Cash replaces the current balance; every other class
    /// appends. On error nothing changes.
    pub fn with_asset(&self, draft: &AssetDraft) -> Result<Self, ValidationError> {
        let mut next = self.clone();
        match draft {
            AssetDraft::Properties(d) => next.properties = self.properties.append(d.commit()?),
            AssetDraft::Vehicles(d) => next.vehicles = self.vehicles.append(d.commit()?),
            AssetDraft::BankAccounts(d) => {
                next.bank_accounts = self.bank_accounts.append(d.commit()?)
            }
            AssetDraft::Insurances(d) => next.insurances = self.insurances.append(d.commit()?),
            AssetDraft::Possessions(d) => next.possessions = self.possessions.append(d.commit()?),
            AssetDraft::ForeignAssets(d) => {
                next.foreign_assets = self.foreign_assets.append(d.commit()?)
            }
            AssetDraft::Cash(d) => next.cash = Some(d.commit()?),
            AssetDraft::OtherAssets(d) => {
                next.other_assets = self.other_assets.append(d.commit()?)
            }
        }
        Ok(next)
    }

    /// Returns a copy without the entry `id` of `class`. For cash the balance is cleared.
    pub fn without_asset(&self, class: AssetClass, id: Option<EntryId>) -> Self {
        let mut next = self.clone();
        let Some(id) = id else {
            if class == AssetClass::Cash {
                next.cash = None;
            }
            return next;
        };
        match class {
            AssetClass::Properties => next.properties = self.properties.remove_by_id(id),
            AssetClass::Vehicles => next.vehicles = self.vehicles.remove_by_id(id),
            AssetClass::BankAccounts => next.bank_accounts = self.bank_accounts.remove_by_id(id),
            AssetClass::Insurances => next.insurances = self.insurances.remove_by_id(id),
            AssetClass::Possessions => next.possessions = self.possessions.remove_by_id(id),
            AssetClass::ForeignAssets => next.foreign_assets = self.foreign_assets.remove_by_id(id),
            AssetClass::Cash => next.cash = None,
            AssetClass::OtherAssets => next.other_assets = self.other_assets.remove_by_id(id),
        }
        next
    }
}

fn class_label(class: AssetClass) -> &'static str {
    match class {
        AssetClass::Properties => "property",
        AssetClass::Vehicles => "vehicle",
        AssetClass::BankAccounts => "bank account",
        AssetClass::Insurances => "insurance",
        AssetClass::Possessions => "possession",
        AssetClass::ForeignAssets => "foreign asset",
        AssetClass::Cash => "cash",
        AssetClass::OtherAssets => "other asset",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(cost: &str) -> AssetDraft {
        AssetDraft::Vehicles(VehicleDraft {
            vehicle_type: "Car".into(),
            registration_number: "LEB-77".into(),
            make_model: "".into(),
            cost: cost.into(),
        })
    }

    #[test]
    fn test_zero_cash_is_incomplete() {
        let assets = Assets::default()
            .with_asset(&AssetDraft::Cash(CashDraft {
                balance: "0".into(),
            }))
            .unwrap();
        assert!(!assets.is_complete(AssetClass::Cash));
        let assets = assets
            .with_asset(&AssetDraft::Cash(CashDraft {
                balance: "1".into(),
            }))
            .unwrap();
        assert!(assets.is_complete(AssetClass::Cash));
    }

    #[test]
    fn test_list_classes_need_an_entry() {
        let assets = Assets::default();
        for class in AssetClass::ALL {
            assert!(!assets.is_complete(class));
        }
        let assets = assets.with_asset(&vehicle("100")).unwrap();
        assert!(assets.is_complete(AssetClass::Vehicles));
        assert_eq!(
            assets.check(AssetClass::Properties),
            Err(ValidationError::NoEntries("property"))
        );
    }

    #[test]
    fn test_invalid_draft_leaves_assets_unchanged() {
        let assets = Assets::default().with_asset(&vehicle("100")).unwrap();
        let err = assets.with_asset(&vehicle("1O0")).unwrap_err();
        assert!(matches!(err, ValidationError::InvalidNumericField { .. }));
        assert_eq!(assets.vehicles.len(), 1);
    }

    #[test]
    fn test_totals_use_class_value_field() {
        let assets = Assets::default()
            .with_asset(&vehicle("1,000"))
            .unwrap()
            .with_asset(&vehicle("500"))
            .unwrap()
            .with_asset(&AssetDraft::Insurances(InsuranceDraft {
                company: "State Life".into(),
                description: "Endowment".into(),
                premium_paid: "120000".into(),
            }))
            .unwrap()
            .with_asset(&AssetDraft::Cash(CashDraft {
                balance: "75000".into(),
            }))
            .unwrap();
        assert_eq!(assets.total(AssetClass::Vehicles), Amount::from(1_500u64));
        assert_eq!(assets.total(AssetClass::Insurances), Amount::from(120_000u64));
        assert_eq!(assets.grand_total(), Amount::from(196_500u64));
    }

    #[test]
    fn test_remove_then_incomplete() {
        let assets = Assets::default().with_asset(&vehicle("100")).unwrap();
        let id = assets.vehicles.ids()[0];
        let removed = assets.without_asset(AssetClass::Vehicles, Some(id));
        assert!(!removed.is_complete(AssetClass::Vehicles));
        assert!(assets.is_complete(AssetClass::Vehicles));
    }

    #[test]
    fn test_class_wire_names() {
        assert_eq!(AssetClass::BankAccounts.to_string(), "bankAccounts");
        assert_eq!(
            "foreignAssets".parse::<AssetClass>().unwrap(),
            AssetClass::ForeignAssets
        );
    }

    #[test]
    fn test_negative_opening_wealth() {
        let statement = WealthStatement {
            opening_wealth: Amount::from(-1i64),
            ..Default::default()
        };
        assert!(statement.check_opening_wealth().is_err());
        assert!(WealthStatement::default().check_opening_wealth().is_ok());
    }
}
