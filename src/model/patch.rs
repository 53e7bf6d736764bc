//! Every edit a user can make to a `FilingDraft`, and the single function that applies them.

use crate::error::ValidationError;
use crate::model::{
    Amount, AssetClass, AssetDraft, CreditKind, DeductionDraft, DeductionKind, EntryId, Expense,
    FilingDraft, IncomeEntryDraft, IncomeRecord, IncomeSourceKind, Liabilities, LiabilityDraft,
    OtherDeduction, PersonalInfo, TaxCredit,
};

/// One edit to a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DraftPatch {
    SetTaxYear(u16),
    SetPersonalInfo(PersonalInfo),
    /// Selects an income source and creates its empty record. Selecting twice is a no-op.
    SelectIncomeSource(IncomeSourceKind),
    /// Deselects an income source and drops its record.
    DeselectIncomeSource(IncomeSourceKind),
    /// Replaces the record of an already selected income source.
    ReplaceIncome(IncomeRecord),
    AddIncomeEntry(IncomeEntryDraft),
    RemoveIncomeEntry {
        kind: IncomeSourceKind,
        id: EntryId,
    },
    SelectDeduction(DeductionKind),
    DeselectDeduction(DeductionKind),
    AddDeduction(DeductionDraft),
    RemoveDeduction {
        kind: DeductionKind,
        id: EntryId,
    },
    SetOtherDeduction(OtherDeduction),
    SetOpeningWealth(Amount),
    SelectAssetClass(AssetClass),
    DeselectAssetClass(AssetClass),
    AddAsset(AssetDraft),
    /// Removes one entry of a class. For cash, `id` is ignored and the balance is cleared.
    RemoveAsset {
        class: AssetClass,
        id: Option<EntryId>,
    },
    AddLiability(LiabilityDraft),
    RemoveLiability(EntryId),
    SetLiabilities(Liabilities),
    SetHouseholdExpenses(Amount),
    SetTaxCredit {
        kind: CreditKind,
        credit: TaxCredit,
    },
    SetDocumentsUploaded(bool),
    SetConsent(bool),
}

/// Applies `patch` to `draft` and returns the edited copy. On error `draft` is untouched and the
/// reason is returned.
pub fn apply_update(
    draft: &FilingDraft,
    patch: DraftPatch,
) -> Result<FilingDraft, ValidationError> {
    let mut next = draft.clone();
    match patch {
        DraftPatch::SetTaxYear(year) => next.tax_year = Some(year),
        DraftPatch::SetPersonalInfo(info) => next.personal_info = info,
        DraftPatch::SelectIncomeSource(kind) => {
            if !next.income_source_types.contains(&kind) {
                next.income_source_types.push(kind);
            }
            if next.income(kind).is_none() {
                next.incomes.push(kind.empty_record());
            }
        }
        DraftPatch::DeselectIncomeSource(kind) => {
            next.income_source_types.retain(|k| *k != kind);
            next.incomes.retain(|r| r.kind() != kind);
        }
        DraftPatch::ReplaceIncome(record) => {
            record.check_entries()?;
            let slot = income_slot(&mut next, record.kind())?;
            *slot = record;
        }
        DraftPatch::AddIncomeEntry(entry) => {
            let slot = income_slot(&mut next, entry.kind())?;
            *slot = slot.with_entry(&entry)?;
        }
        DraftPatch::RemoveIncomeEntry { kind, id } => {
            let slot = income_slot(&mut next, kind)?;
            *slot = slot.without_entry(id);
        }
        DraftPatch::SelectDeduction(kind) => {
            if !next.deduction_selections.contains(&kind) {
                next.deduction_selections.push(kind);
            }
        }
        DraftPatch::DeselectDeduction(kind) => next.deduction_selections.retain(|k| *k != kind),
        DraftPatch::AddDeduction(deduction) => {
            require_deduction(&next, deduction.kind())?;
            next.deduction_details = next.deduction_details.with_deduction(&deduction)?;
        }
        DraftPatch::RemoveDeduction { kind, id } => {
            next.deduction_details = next.deduction_details.without_deduction(kind, id);
        }
        DraftPatch::SetOtherDeduction(other) => {
            require_deduction(&next, DeductionKind::Other)?;
            for (field, value) in [
                ("zakat", other.zakat),
                ("charitableDonations", other.charitable_donations),
                ("pensionContribution", other.pension_contribution),
                ("tuitionFees", other.tuition_fees),
            ] {
                non_negative("other deduction", field, value)?;
            }
            next.deduction_details.other = other;
        }
        DraftPatch::SetOpeningWealth(amount) => {
            non_negative("wealth statement", "openingWealth", amount)?;
            next.wealth_statement.opening_wealth = amount;
        }
        DraftPatch::SelectAssetClass(class) => {
            if !next.selected_asset_classes.contains(&class) {
                next.selected_asset_classes.push(class);
            }
        }
        DraftPatch::DeselectAssetClass(class) => {
            next.selected_asset_classes.retain(|c| *c != class)
        }
        DraftPatch::AddAsset(asset) => {
            if !next.selected_asset_classes.contains(&asset.class()) {
                return Err(ValidationError::AssetClassNotSelected(asset.class()));
            }
            next.wealth_statement.assets = next.wealth_statement.assets.with_asset(&asset)?;
        }
        DraftPatch::RemoveAsset { class, id } => {
            next.wealth_statement.assets = next.wealth_statement.assets.without_asset(class, id);
        }
        DraftPatch::AddLiability(liability) => {
            next.wealth_statement.liabilities =
                next.wealth_statement.liabilities.with_liability(&liability)?;
        }
        DraftPatch::RemoveLiability(id) => {
            next.wealth_statement.liabilities =
                next.wealth_statement.liabilities.without_liability(id);
        }
        DraftPatch::SetLiabilities(liabilities) => next.wealth_statement.liabilities = liabilities,
        DraftPatch::SetHouseholdExpenses(amount) => {
            non_negative("expense", "householdExpenses", amount)?;
            next.expense = Some(Expense {
                household_expenses: amount,
            });
        }
        DraftPatch::SetTaxCredit { kind, credit } => {
            if let Some(amount) = credit.tax_credit_amount {
                non_negative("tax credit", "taxCreditAmount", amount)?;
            }
            next.tax_credits.insert(kind, credit);
        }
        DraftPatch::SetDocumentsUploaded(uploaded) => next.documents_uploaded = uploaded,
        DraftPatch::SetConsent(given) => next.consent_given = given,
    }
    Ok(next)
}

fn income_slot(
    draft: &mut FilingDraft,
    kind: IncomeSourceKind,
) -> Result<&mut IncomeRecord, ValidationError> {
    if !draft.income_source_types.contains(&kind) {
        return Err(ValidationError::IncomeSourceNotSelected(kind));
    }
    draft
        .incomes
        .iter_mut()
        .find(|r| r.kind() == kind)
        .ok_or(ValidationError::MissingIncomeRecord(kind))
}

fn require_deduction(draft: &FilingDraft, kind: DeductionKind) -> Result<(), ValidationError> {
    if draft.deduction_selections.contains(&kind) {
        Ok(())
    } else {
        Err(ValidationError::DeductionNotSelected(kind))
    }
}

fn non_negative(
    record: &'static str,
    field: &'static str,
    amount: Amount,
) -> Result<(), ValidationError> {
    if amount.is_negative() {
        return Err(ValidationError::InvalidNumericField {
            record,
            field,
            value: amount.to_string(),
        });
    }
    Ok(())
}
