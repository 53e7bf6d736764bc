//! The part of a draft that one step persists.

use crate::model::{
    Amount, AssetClass, Assets, CreditKind, DeductionDetails, DeductionKind, Expense, FilingDraft,
    IncomeRecord, IncomeSourceKind, Liabilities, PersonalInfo, TaxCredit,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The payload of a per-step save. Only the fields owned by the step's sections are `Some`, and
/// only those are serialized, so the persistence service never receives fields of other steps.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StepSlice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_year: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_info: Option<PersonalInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income_source_types: Option<Vec<IncomeSourceKind>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub incomes: Option<Vec<IncomeRecord>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deduction_selections: Option<Vec<DeductionKind>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deduction_details: Option<DeductionDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wealth_statement: Option<WealthSlice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_asset_classes: Option<Vec<AssetClass>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expenses: Option<Expense>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_credits: Option<BTreeMap<CreditKind, TaxCredit>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documents_uploaded: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consent_given: Option<bool>,
}

/// The wealth statement is saved by three different steps, each sending one of its parts.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WealthSlice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_wealth: Option<Amount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assets: Option<Assets>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub liabilities: Option<Liabilities>,
}

impl WealthSlice {
    fn merge(self, other: WealthSlice) -> Self {
        Self {
            opening_wealth: other.opening_wealth.or(self.opening_wealth),
            assets: other.assets.or(self.assets),
            liabilities: other.liabilities.or(self.liabilities),
        }
    }
}

impl StepSlice {
    /// True when no field is set.
    pub fn is_empty(&self) -> bool {
        self == &StepSlice::default()
    }

    /// Combines two slices. Fields set in `other` win.
    pub fn merge(self, other: StepSlice) -> Self {
        let wealth_statement = match (self.wealth_statement, other.wealth_statement) {
            (Some(a), Some(b)) => Some(a.merge(b)),
            (a, b) => b.or(a),
        };
        Self {
            tax_year: other.tax_year.or(self.tax_year),
            personal_info: other.personal_info.or(self.personal_info),
            income_source_types: other.income_source_types.or(self.income_source_types),
            incomes: other.incomes.or(self.incomes),
            deduction_selections: other.deduction_selections.or(self.deduction_selections),
            deduction_details: other.deduction_details.or(self.deduction_details),
            wealth_statement,
            selected_asset_classes: other.selected_asset_classes.or(self.selected_asset_classes),
            expenses: other.expenses.or(self.expenses),
            tax_credits: other.tax_credits.or(self.tax_credits),
            documents_uploaded: other.documents_uploaded.or(self.documents_uploaded),
            consent_given: other.consent_given.or(self.consent_given),
        }
    }

    /// Writes every field that is set into `draft`, leaving the rest of the draft alone.
    pub fn apply_to(&self, draft: &mut FilingDraft) {
        if let Some(v) = self.tax_year {
            draft.tax_year = Some(v);
        }
        if let Some(v) = &self.personal_info {
            draft.personal_info = v.clone();
        }
        if let Some(v) = &self.income_source_types {
            draft.income_source_types = v.clone();
        }
        if let Some(v) = &self.incomes {
            draft.incomes = v.clone();
        }
        if let Some(v) = &self.deduction_selections {
            draft.deduction_selections = v.clone();
        }
        if let Some(v) = &self.deduction_details {
            draft.deduction_details = v.clone();
        }
        if let Some(wealth) = &self.wealth_statement {
            if let Some(v) = wealth.opening_wealth {
                draft.wealth_statement.opening_wealth = v;
            }
            if let Some(v) = &wealth.assets {
                draft.wealth_statement.assets = v.clone();
            }
            if let Some(v) = &wealth.liabilities {
                draft.wealth_statement.liabilities = v.clone();
            }
        }
        if let Some(v) = &self.selected_asset_classes {
            draft.selected_asset_classes = v.clone();
        }
        if let Some(v) = self.expenses {
            draft.expense = Some(v);
        }
        if let Some(v) = &self.tax_credits {
            draft.tax_credits = v.clone();
        }
        if let Some(v) = self.documents_uploaded {
            draft.documents_uploaded = v;
        }
        if let Some(v) = self.consent_given {
            draft.consent_given = v;
        }
    }
}
