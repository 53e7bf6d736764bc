//! Step lists. A `Flow` is an ordered list of steps, and each step owns one or more `Section`s of
//! the draft. What a step requires and what it saves both come from its sections.

use crate::error::ValidationError;
use crate::model::FilingDraft;
use crate::wizard::slice::{StepSlice, WealthSlice};
use serde::{Deserialize, Serialize};

/// One indivisible part of the draft, with its own completeness rule and payload.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    TaxYear,
    PersonalInfo,
    IncomeSources,
    IncomeDetails,
    DeductionSelection,
    DeductionDetails,
    OpeningWealth,
    AssetSelection,
    AssetDetails,
    Liabilities,
    Expenses,
    TaxCredits,
    Documents,
    Consent,
}

serde_plain::derive_display_from_serialize!(Section);
serde_plain::derive_fromstr_from_deserialize!(Section);

impl Section {
    /// Returns the reason this section of `draft` is incomplete, if any.
    pub fn check(&self, draft: &FilingDraft) -> Result<(), ValidationError> {
        match self {
            Section::TaxYear => match draft.tax_year() {
                Some(_) => Ok(()),
                None => Err(ValidationError::MissingRequiredField {
                    record: "filing",
                    field: "taxYear",
                }),
            },
            Section::PersonalInfo => draft.personal_info().check(),
            Section::IncomeSources => non_empty(draft.income_source_types(), "income source"),
            Section::IncomeDetails => {
                for kind in draft.income_source_types() {
                    draft
                        .income(*kind)
                        .ok_or(ValidationError::MissingIncomeRecord(*kind))?
                        .check()?;
                }
                Ok(())
            }
            Section::DeductionSelection | Section::TaxCredits => Ok(()),
            Section::DeductionDetails => draft
                .deduction_selections()
                .iter()
                .try_for_each(|kind| draft.deduction_details().check(*kind)),
            Section::OpeningWealth => draft.wealth_statement().check_opening_wealth(),
            Section::AssetSelection => non_empty(draft.selected_asset_classes(), "asset class"),
            Section::AssetDetails => draft
                .selected_asset_classes()
                .iter()
                .try_for_each(|class| draft.wealth_statement().assets.check(*class)),
            Section::Liabilities => draft.wealth_statement().liabilities.check(),
            Section::Expenses => match draft.expense() {
                Some(_) => Ok(()),
                None => Err(ValidationError::MissingRequiredField {
                    record: "expenses",
                    field: "householdExpenses",
                }),
            },
            Section::Documents => match draft.documents_uploaded() {
                true => Ok(()),
                false => Err(ValidationError::DocumentsRequired),
            },
            Section::Consent => match draft.consent_given() {
                true => Ok(()),
                false => Err(ValidationError::ConsentRequired),
            },
        }
    }

    /// Adds this section's fields of `draft` to `slice`.
    fn project(&self, draft: &FilingDraft, slice: StepSlice) -> StepSlice {
        let wealth = draft.wealth_statement();
        let part = match self {
            Section::TaxYear => StepSlice {
                tax_year: draft.tax_year(),
                ..Default::default()
            },
            Section::PersonalInfo => StepSlice {
                personal_info: Some(draft.personal_info().clone()),
                ..Default::default()
            },
            Section::IncomeSources => StepSlice {
                income_source_types: Some(draft.income_source_types().to_vec()),
                ..Default::default()
            },
            Section::IncomeDetails => StepSlice {
                incomes: Some(draft.incomes().to_vec()),
                ..Default::default()
            },
            Section::DeductionSelection => StepSlice {
                deduction_selections: Some(draft.deduction_selections().to_vec()),
                ..Default::default()
            },
            Section::DeductionDetails => StepSlice {
                deduction_details: Some(draft.deduction_details().clone()),
                ..Default::default()
            },
            Section::OpeningWealth => StepSlice {
                wealth_statement: Some(WealthSlice {
                    opening_wealth: Some(wealth.opening_wealth),
                    ..Default::default()
                }),
                ..Default::default()
            },
            Section::AssetSelection => StepSlice {
                selected_asset_classes: Some(draft.selected_asset_classes().to_vec()),
                ..Default::default()
            },
            Section::AssetDetails => StepSlice {
                wealth_statement: Some(WealthSlice {
                    assets: Some(wealth.assets.clone()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            Section::Liabilities => StepSlice {
                wealth_statement: Some(WealthSlice {
                    liabilities: Some(wealth.liabilities.clone()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            Section::Expenses => StepSlice {
                expenses: draft.expense().copied(),
                ..Default::default()
            },
            Section::TaxCredits => StepSlice {
                tax_credits: Some(draft.tax_credits().clone()),
                ..Default::default()
            },
            Section::Documents => StepSlice {
                documents_uploaded: Some(draft.documents_uploaded()),
                ..Default::default()
            },
            Section::Consent => StepSlice {
                consent_given: Some(draft.consent_given()),
                ..Default::default()
            },
        };
        slice.merge(part)
    }
}

fn non_empty<T>(items: &[T], what: &'static str) -> Result<(), ValidationError> {
    if items.is_empty() {
        return Err(ValidationError::NothingSelected(what));
    }
    Ok(())
}

/// One step of a flow.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct StepDescriptor {
    pub number: usize,
    pub id: &'static str,
    pub title: &'static str,
    pub sections: &'static [Section],
}

impl StepDescriptor {
    /// The first unmet requirement among this step's sections.
    pub fn check(&self, draft: &FilingDraft) -> Result<(), ValidationError> {
        self.sections.iter().try_for_each(|s| s.check(draft))
    }

    /// The payload this step sends when it is saved.
    pub fn slice(&self, draft: &FilingDraft) -> StepSlice {
        self.sections
            .iter()
            .fold(StepSlice::default(), |slice, s| s.project(draft, slice))
    }
}

/// Which step list the wizard runs.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum FlowKind {
    /// Fourteen steps, one section each.
    #[default]
    #[serde(rename = "canonical")]
    Canonical,
    /// Thirteen steps: deduction selection and details share a step.
    #[serde(rename = "legacy13")]
    LegacyThirteen,
    /// Ten steps: basic information, income, deductions and assets each share a step.
    #[serde(rename = "legacy10")]
    LegacyTen,
}

serde_plain::derive_display_from_serialize!(FlowKind);
serde_plain::derive_fromstr_from_deserialize!(FlowKind);

type StepTable = &'static [(&'static str, &'static str, &'static [Section])];

const CANONICAL: StepTable = &[
    ("tax-year", "Tax Year", &[Section::TaxYear]),
    ("personal-info", "Personal Information", &[Section::PersonalInfo]),
    ("income-sources", "Income Sources", &[Section::IncomeSources]),
    ("income-details", "Income Details", &[Section::IncomeDetails]),
    ("deductions", "Deductions", &[Section::DeductionSelection]),
    ("deduction-details", "Deduction Details", &[Section::DeductionDetails]),
    ("opening-wealth", "Opening Wealth", &[Section::OpeningWealth]),
    ("assets", "Assets", &[Section::AssetSelection]),
    ("asset-details", "Asset Details", &[Section::AssetDetails]),
    ("liabilities", "Liabilities", &[Section::Liabilities]),
    ("expenses", "Expenses", &[Section::Expenses]),
    ("tax-credits", "Tax Credits", &[Section::TaxCredits]),
    ("documents", "Documents", &[Section::Documents]),
    ("consent", "Review and Consent", &[Section::Consent]),
];

const LEGACY_THIRTEEN: StepTable = &[
    ("tax-year", "Tax Year", &[Section::TaxYear]),
    ("personal-info", "Personal Information", &[Section::PersonalInfo]),
    ("income-sources", "Income Sources", &[Section::IncomeSources]),
    ("income-details", "Income Details", &[Section::IncomeDetails]),
    (
        "deductions",
        "Deductions",
        &[Section::DeductionSelection, Section::DeductionDetails],
    ),
    ("opening-wealth", "Opening Wealth", &[Section::OpeningWealth]),
    ("assets", "Assets", &[Section::AssetSelection]),
    ("asset-details", "Asset Details", &[Section::AssetDetails]),
    ("liabilities", "Liabilities", &[Section::Liabilities]),
    ("expenses", "Expenses", &[Section::Expenses]),
    ("tax-credits", "Tax Credits", &[Section::TaxCredits]),
    ("documents", "Documents", &[Section::Documents]),
    ("consent", "Review and Consent", &[Section::Consent]),
];

const LEGACY_TEN: StepTable = &[
    (
        "basic-info",
        "Basic Information",
        &[Section::TaxYear, Section::PersonalInfo],
    ),
    (
        "income",
        "Income",
        &[Section::IncomeSources, Section::IncomeDetails],
    ),
    (
        "deductions",
        "Deductions",
        &[Section::DeductionSelection, Section::DeductionDetails],
    ),
    ("opening-wealth", "Opening Wealth", &[Section::OpeningWealth]),
    (
        "assets",
        "Assets",
        &[Section::AssetSelection, Section::AssetDetails],
    ),
    ("liabilities", "Liabilities", &[Section::Liabilities]),
    ("expenses", "Expenses", &[Section::Expenses]),
    ("tax-credits", "Tax Credits", &[Section::TaxCredits]),
    ("documents", "Documents", &[Section::Documents]),
    ("consent", "Review and Consent", &[Section::Consent]),
];

/// An ordered list of steps, numbered from 1.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Flow {
    kind: FlowKind,
    steps: Vec<StepDescriptor>,
}

impl Flow {
    pub fn new(kind: FlowKind) -> Self {
        let table = match kind {
            FlowKind::Canonical => CANONICAL,
            FlowKind::LegacyThirteen => LEGACY_THIRTEEN,
            FlowKind::LegacyTen => LEGACY_TEN,
        };
        let steps = table
            .iter()
            .enumerate()
            .map(|(i, &(id, title, sections))| StepDescriptor {
                number: i + 1,
                id,
                title,
                sections,
            })
            .collect();
        Self { kind, steps }
    }

    pub fn canonical() -> Self {
        Self::new(FlowKind::Canonical)
    }

    pub fn legacy_thirteen() -> Self {
        Self::new(FlowKind::LegacyThirteen)
    }

    pub fn legacy_ten() -> Self {
        Self::new(FlowKind::LegacyTen)
    }

    pub fn kind(&self) -> FlowKind {
        self.kind
    }

    /// The number of steps, which is also the number of the last step.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[StepDescriptor] {
        &self.steps
    }

    pub fn step(&self, number: usize) -> Option<&StepDescriptor> {
        number.checked_sub(1).and_then(|i| self.steps.get(i))
    }

    /// The reason step `number` is incomplete. Step numbers outside the flow are complete.
    pub fn check(&self, number: usize, draft: &FilingDraft) -> Result<(), ValidationError> {
        match self.step(number) {
            Some(step) => step.check(draft),
            None => Ok(()),
        }
    }

    pub fn is_step_complete(&self, number: usize, draft: &FilingDraft) -> bool {
        self.check(number, draft).is_ok()
    }

    /// The first incomplete step among `1..before`, with its reason.
    pub fn first_incomplete(
        &self,
        before: usize,
        draft: &FilingDraft,
    ) -> Option<(usize, ValidationError)> {
        (1..before).find_map(|n| self.check(n, draft).err().map(|reason| (n, reason)))
    }

    /// The payload step `number` saves, or `None` if the flow has no such step.
    pub fn slice(&self, number: usize, draft: &FilingDraft) -> Option<StepSlice> {
        self.step(number).map(|step| step.slice(draft))
    }
}

impl Default for Flow {
    fn default() -> Self {
        Self::canonical()
    }
}

impl From<FlowKind> for Flow {
    fn from(kind: FlowKind) -> Self {
        Self::new(kind)
    }
}

/// Completeness of step `step` in the fourteen-step flow.
pub fn is_step_complete(step: usize, draft: &FilingDraft) -> bool {
    Flow::canonical().is_step_complete(step, draft)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        apply_update, AssetClass, AssetDraft, CashDraft, DraftPatch, Entries, IncomeRecord,
        IncomeSourceKind, Liabilities, Salary,
    };
    use crate::test::{complete_draft, draft_through};
    use proptest::prelude::*;

    fn patched(draft: &FilingDraft, patches: Vec<DraftPatch>) -> FilingDraft {
        patches
            .into_iter()
            .fold(draft.clone(), |d, p| apply_update(&d, p).unwrap())
    }

    #[test]
    fn test_flow_lengths() {
        assert_eq!(Flow::canonical().len(), 14);
        assert_eq!(Flow::legacy_thirteen().len(), 13);
        assert_eq!(Flow::legacy_ten().len(), 10);
        for flow in [Flow::canonical(), Flow::legacy_thirteen(), Flow::legacy_ten()] {
            for (i, step) in flow.steps().iter().enumerate() {
                assert_eq!(step.number, i + 1);
            }
        }
    }

    #[test]
    fn test_every_flow_covers_every_section_once() {
        for flow in [Flow::canonical(), Flow::legacy_thirteen(), Flow::legacy_ten()] {
            let mut sections: Vec<Section> = flow
                .steps()
                .iter()
                .flat_map(|s| s.sections.iter().copied())
                .collect();
            sections.sort();
            assert_eq!(sections.len(), 14, "{}", flow.kind());
            sections.dedup();
            assert_eq!(sections.len(), 14, "{}", flow.kind());
        }
    }

    #[test]
    fn test_empty_draft_rules() {
        let draft = FilingDraft::default();
        let complete: Vec<usize> = (1..=14)
            .filter(|n| is_step_complete(*n, &draft))
            .collect();
        // Income and asset details hold vacuously over an empty selection. Deductions, opening
        // wealth, liabilities and credits need nothing.
        assert_eq!(complete, vec![4, 5, 6, 7, 9, 10, 12]);
    }

    #[test]
    fn test_empty_selections_are_blocked_by_selection_steps() {
        let draft = FilingDraft::default();
        let flow = Flow::canonical();
        assert_eq!(
            flow.check(3, &draft),
            Err(ValidationError::NothingSelected("income source"))
        );
        assert_eq!(
            flow.check(8, &draft),
            Err(ValidationError::NothingSelected("asset class"))
        );
        let blocking = flow.first_incomplete(10, &draft_through(7)).map(|(n, _)| n);
        assert_eq!(blocking, Some(8));
        let blocking = flow.first_incomplete(5, &draft_through(2)).map(|(n, _)| n);
        assert_eq!(blocking, Some(3));
    }

    #[test]
    fn test_unknown_steps_are_complete() {
        let draft = FilingDraft::default();
        assert!(is_step_complete(0, &draft));
        assert!(is_step_complete(15, &draft));
        assert!(Flow::legacy_ten().is_step_complete(11, &draft));
    }

    #[test]
    fn test_complete_draft_passes_every_step() {
        let draft = complete_draft();
        for flow in [Flow::canonical(), Flow::legacy_thirteen(), Flow::legacy_ten()] {
            for n in 1..=flow.len() {
                assert_eq!(flow.check(n, &draft), Ok(()), "{} step {n}", flow.kind());
            }
        }
    }

    #[test]
    fn test_salary_scenario() {
        let draft = patched(
            &FilingDraft::default(),
            vec![DraftPatch::SelectIncomeSource(IncomeSourceKind::Salary)],
        );
        assert!(!is_step_complete(4, &draft));
        let draft = patched(
            &draft,
            vec![DraftPatch::ReplaceIncome(IncomeRecord::Salary(Salary {
                employer_name: None,
                annual_salary: Some("50000".parse().unwrap()),
                tax_deducted: Some("5000".parse().unwrap()),
            }))],
        );
        assert!(is_step_complete(4, &draft));
    }

    #[test]
    fn test_cash_scenario() {
        let draft = patched(
            &FilingDraft::default(),
            vec![
                DraftPatch::SelectAssetClass(AssetClass::Cash),
                DraftPatch::AddAsset(AssetDraft::Cash(CashDraft {
                    balance: "0".into(),
                })),
            ],
        );
        assert!(!is_step_complete(9, &draft));
        let draft = patched(
            &draft,
            vec![DraftPatch::AddAsset(AssetDraft::Cash(CashDraft {
                balance: "1".into(),
            }))],
        );
        assert!(is_step_complete(9, &draft));
    }

    #[test]
    fn test_declared_empty_liabilities() {
        let draft = patched(
            &FilingDraft::default(),
            vec![DraftPatch::SetLiabilities(Liabilities {
                bank_loans: Some(Entries::default()),
                other_liabilities: None,
            })],
        );
        assert_eq!(
            Flow::canonical().check(10, &draft),
            Err(ValidationError::EmptyDeclaredCategory("bank loans"))
        );
        assert_eq!(
            Flow::legacy_ten().check(6, &draft),
            Err(ValidationError::EmptyDeclaredCategory("bank loans"))
        );
    }

    #[test]
    fn test_merged_step_needs_all_sections() {
        let draft = patched(&FilingDraft::default(), vec![DraftPatch::SetTaxYear(2024)]);
        assert!(is_step_complete(1, &draft));
        assert!(matches!(
            Flow::legacy_ten().check(1, &draft),
            Err(ValidationError::MissingRequiredField { record: "personal information", .. })
        ));
    }

    #[test]
    fn test_slices_are_step_shaped() {
        let draft = complete_draft();
        let flow = Flow::canonical();
        let keys = |n: usize| -> Vec<String> {
            let value = serde_json::to_value(flow.slice(n, &draft).unwrap()).unwrap();
            value.as_object().unwrap().keys().cloned().collect()
        };
        assert_eq!(keys(1), vec!["taxYear"]);
        assert_eq!(keys(4), vec!["incomes"]);
        assert_eq!(keys(11), vec!["expenses"]);
        assert_eq!(keys(14), vec!["consentGiven"]);
        let opening = serde_json::to_value(flow.slice(7, &draft).unwrap()).unwrap();
        assert_eq!(
            opening["wealthStatement"].as_object().unwrap().len(),
            1,
            "{opening}"
        );
        assert!(flow.slice(15, &draft).is_none());
    }

    #[test]
    fn test_merged_step_slice_is_union() {
        let draft = complete_draft();
        let slice = Flow::legacy_ten().slice(1, &draft).unwrap();
        assert_eq!(slice.tax_year, draft.tax_year());
        assert_eq!(slice.personal_info.as_ref(), Some(draft.personal_info()));
        assert!(slice.incomes.is_none());
    }

    #[test]
    fn test_first_incomplete() {
        let draft = patched(&FilingDraft::default(), vec![DraftPatch::SetTaxYear(2024)]);
        let (step, _) = Flow::canonical().first_incomplete(5, &draft).unwrap();
        assert_eq!(step, 2);
        assert!(Flow::canonical().first_incomplete(2, &draft).is_none());
    }

    proptest! {
        #[test]
        fn prop_complete_steps_are_a_function_of_the_draft(
            year in proptest::option::of(2000u16..2100),
            consent in any::<bool>(),
            step in 0usize..20,
        ) {
            let mut patches = vec![DraftPatch::SetConsent(consent)];
            if let Some(year) = year {
                patches.push(DraftPatch::SetTaxYear(year));
            }
            let draft = patched(&FilingDraft::default(), patches);
            prop_assert_eq!(is_step_complete(step, &draft), is_step_complete(step, &draft.clone()));
            prop_assert_eq!(is_step_complete(1, &draft), year.is_some());
            prop_assert_eq!(is_step_complete(14, &draft), consent);
        }

        #[test]
        fn prop_append_then_remove_keeps_step_incomplete(
            balance in 1u64..1_000_000,
        ) {
            let draft = patched(
                &FilingDraft::default(),
                vec![DraftPatch::SelectAssetClass(AssetClass::Vehicles)],
            );
            prop_assert!(!is_step_complete(9, &draft));
            let added = patched(
                &draft,
                vec![DraftPatch::AddAsset(AssetDraft::Vehicles(crate::model::VehicleDraft {
                    vehicle_type: "Car".into(),
                    registration_number: "LE-1".into(),
                    make_model: String::new(),
                    cost: balance.to_string(),
                }))],
            );
            let id = added.wealth_statement().assets.vehicles.ids()[0];
            let removed = patched(
                &added,
                vec![DraftPatch::RemoveAsset { class: AssetClass::Vehicles, id: Some(id) }],
            );
            prop_assert!(!is_step_complete(9, &removed));
        }
    }
}
