use crate::error::ValidationError;
use crate::model::{
    Amount, AssetClass, DeductionDetails, DeductionKind, IncomeRecord, IncomeSourceKind,
    WealthStatement,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Computerized national identity card number, `NNNNN-NNNNNNN-N`.
static NATIONAL_ID: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^\d{5}-\d{7}-\d$").ok());

/// Whether `value` is a well-formed national id. Nothing matches if the pattern failed to build.
fn is_national_id(value: &str) -> bool {
    NATIONAL_ID
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(value))
}

/// Where a filing is in its review lifecycle. Owned by the persistence service.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilingStatus {
    #[default]
    Pending,
    UnderReview,
    Completed,
    Rejected,
}

serde_plain::derive_display_from_serialize!(FilingStatus);
serde_plain::derive_fromstr_from_deserialize!(FilingStatus);

impl FilingStatus {
    /// Pending and rejected filings can still be edited by their owner.
    pub fn is_editable(&self) -> bool {
        matches!(self, FilingStatus::Pending | FilingStatus::Rejected)
    }
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalInfo {
    pub full_name: String,
    pub email: String,
    pub national_id: String,
    pub date_of_birth: String,
    pub nationality: String,
    pub residential_status: String,
}

impl PersonalInfo {
    /// Every field is required, and the national id must match `NNNNN-NNNNNNN-N`.
    pub fn check(&self) -> Result<(), ValidationError> {
        const R: &str = "personal information";
        let fields = [
            ("fullName", &self.full_name),
            ("email", &self.email),
            ("nationalId", &self.national_id),
            ("dateOfBirth", &self.date_of_birth),
            ("nationality", &self.nationality),
            ("residentialStatus", &self.residential_status),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ValidationError::MissingRequiredField { record: R, field });
            }
        }
        if !is_national_id(self.national_id.trim()) {
            return Err(ValidationError::InvalidFormat {
                field: "nationalId",
                value: self.national_id.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Expense {
    pub household_expenses: Amount,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CreditKind {
    CharitableDonations,
    PensionFund,
    ShareInvestment,
    HealthInsurance,
}

serde_plain::derive_display_from_serialize!(CreditKind);
serde_plain::derive_fromstr_from_deserialize!(CreditKind);

#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaxCredit {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_credit_amount: Option<Amount>,
}

/// Everything the user has declared for one filing. Hydrated from a snapshot (absent fields take
/// their defaults) and changed only through `apply_update`.
#[derive(Debug, Default, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilingDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) tax_year: Option<u16>,
    pub(crate) personal_info: PersonalInfo,
    pub(crate) income_source_types: Vec<IncomeSourceKind>,
    pub(crate) incomes: Vec<IncomeRecord>,
    pub(crate) deduction_selections: Vec<DeductionKind>,
    pub(crate) deduction_details: DeductionDetails,
    pub(crate) wealth_statement: WealthStatement,
    pub(crate) selected_asset_classes: Vec<AssetClass>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) expense: Option<Expense>,
    pub(crate) tax_credits: BTreeMap<CreditKind, TaxCredit>,
    pub(crate) documents_uploaded: bool,
    pub(crate) consent_given: bool,
    pub(crate) status: FilingStatus,
}

impl FilingDraft {
    pub fn tax_year(&self) -> Option<u16> {
        self.tax_year
    }

    pub fn personal_info(&self) -> &PersonalInfo {
        &self.personal_info
    }

    /// Selected income sources, in the order they were selected.
    pub fn income_source_types(&self) -> &[IncomeSourceKind] {
        &self.income_source_types
    }

    pub fn incomes(&self) -> &[IncomeRecord] {
        &self.incomes
    }

    pub fn income(&self, kind: IncomeSourceKind) -> Option<&IncomeRecord> {
        self.incomes.iter().find(|r| r.kind() == kind)
    }

    pub fn deduction_selections(&self) -> &[DeductionKind] {
        &self.deduction_selections
    }

    pub fn deduction_details(&self) -> &DeductionDetails {
        &self.deduction_details
    }

    pub fn wealth_statement(&self) -> &WealthStatement {
        &self.wealth_statement
    }

    pub fn selected_asset_classes(&self) -> &[AssetClass] {
        &self.selected_asset_classes
    }

    pub fn expense(&self) -> Option<&Expense> {
        self.expense.as_ref()
    }

    pub fn tax_credits(&self) -> &BTreeMap<CreditKind, TaxCredit> {
        &self.tax_credits
    }

    pub fn documents_uploaded(&self) -> bool {
        self.documents_uploaded
    }

    pub fn consent_given(&self) -> bool {
        self.consent_given
    }

    pub fn status(&self) -> FilingStatus {
        self.status
    }

    /// Restores the one-record-per-selected-source invariant on a hydrated draft: duplicate
    /// records keep the first, missing records are created empty and records for sources that are
    /// not selected are dropped.
    pub fn normalized(mut self) -> Self {
        let mut kinds: Vec<IncomeSourceKind> = Vec::new();
        for kind in self.income_source_types {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        let incomes = kinds
            .iter()
            .map(|kind| {
                self.incomes
                    .iter()
                    .find(|r| r.kind() == *kind)
                    .cloned()
                    .unwrap_or_else(|| kind.empty_record())
            })
            .collect();
        self.income_source_types = kinds;
        self.incomes = incomes;
        dedup(&mut self.deduction_selections);
        dedup(&mut self.selected_asset_classes);
        self
    }
}

fn dedup<T: PartialEq + Copy>(items: &mut Vec<T>) {
    let mut seen: Vec<T> = Vec::with_capacity(items.len());
    items.retain(|item| {
        if seen.contains(item) {
            false
        } else {
            seen.push(*item);
            true
        }
    });
}
