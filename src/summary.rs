//! Totals shown on the consent step and by `taxfile summary`.

use crate::model::{
    Amount, AssetClass, CreditKind, DeductionKind, FilingDraft, FilingStatus, IncomeSourceKind,
};
use serde::Serialize;

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeLine {
    pub kind: IncomeSourceKind,
    pub net_income: Amount,
    pub tax_withheld: Amount,
    pub complete: bool,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeductionLine {
    pub kind: DeductionKind,
    pub total: Amount,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetLine {
    pub class: AssetClass,
    pub total: Amount,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreditLine {
    pub kind: CreditKind,
    pub amount: Amount,
}

/// What the draft adds up to. Only selected income sources, deduction kinds and asset classes
/// are counted, and only enabled credits. No tax is computed here.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilingSummary {
    pub tax_year: Option<u16>,
    pub status: FilingStatus,
    pub incomes: Vec<IncomeLine>,
    pub total_income: Amount,
    pub total_tax_withheld: Amount,
    pub deductions: Vec<DeductionLine>,
    pub total_deductions: Amount,
    pub opening_wealth: Amount,
    pub assets: Vec<AssetLine>,
    pub total_assets: Amount,
    pub total_liabilities: Amount,
    pub household_expenses: Amount,
    pub credits: Vec<CreditLine>,
    pub total_credits: Amount,
}

impl FilingSummary {
    pub fn from_draft(draft: &FilingDraft) -> Self {
        let incomes: Vec<IncomeLine> = draft
            .income_source_types()
            .iter()
            .filter_map(|kind| draft.income(*kind))
            .map(|record| IncomeLine {
                kind: record.kind(),
                net_income: record.net_total(),
                tax_withheld: record.tax_withheld(),
                complete: record.is_complete(),
            })
            .collect();

        let deductions: Vec<DeductionLine> = draft
            .deduction_selections()
            .iter()
            .map(|kind| DeductionLine {
                kind: *kind,
                total: draft.deduction_details().total(*kind),
            })
            .collect();

        let wealth = draft.wealth_statement();
        let assets: Vec<AssetLine> = draft
            .selected_asset_classes()
            .iter()
            .map(|class| AssetLine {
                class: *class,
                total: wealth.assets.total(*class),
            })
            .collect();

        let credits: Vec<CreditLine> = draft
            .tax_credits()
            .iter()
            .filter(|(_, credit)| credit.enabled)
            .map(|(kind, credit)| CreditLine {
                kind: *kind,
                amount: credit.tax_credit_amount.unwrap_or_default(),
            })
            .collect();

        Self {
            tax_year: draft.tax_year(),
            status: draft.status(),
            total_income: incomes.iter().map(|l| l.net_income).sum(),
            total_tax_withheld: incomes.iter().map(|l| l.tax_withheld).sum(),
            incomes,
            total_deductions: deductions.iter().map(|l| l.total).sum(),
            deductions,
            opening_wealth: wealth.opening_wealth,
            total_assets: assets.iter().map(|l| l.total).sum(),
            assets,
            total_liabilities: wealth.liabilities.total(),
            household_expenses: draft
                .expense()
                .map(|e| e.household_expenses)
                .unwrap_or_default(),
            total_credits: credits.iter().map(|l| l.amount).sum(),
            credits,
        }
    }

    /// One line per total, for printing.
    pub fn describe(&self) -> String {
        let year = self
            .tax_year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "(no tax year)".to_string());
        format!(
            "Tax year {year}, status {}: income {}, tax withheld {}, deductions {}, \
            opening wealth {}, assets {}, liabilities {}, household expenses {}, credits {}",
            self.status,
            self.total_income,
            self.total_tax_withheld,
            self.total_deductions,
            self.opening_wealth,
            self.total_assets,
            self.total_liabilities,
            self.household_expenses,
            self.total_credits
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{apply_update, BusinessDraft, DraftPatch, IncomeEntryDraft};
    use crate::test::complete_draft;

    #[test]
    fn test_complete_draft_totals() {
        let summary = FilingSummary::from_draft(&complete_draft());
        assert_eq!(summary.tax_year, Some(2024));
        // Salary 2,400,000 + business 500,000 + commission 120,000.
        assert_eq!(summary.total_income, Amount::from(3_020_000u64));
        assert_eq!(summary.total_tax_withheld, Amount::from(180_000u64));
        assert_eq!(summary.total_deductions, Amount::from(37_000u64));
        assert_eq!(summary.total_assets, Amount::from(9_850_000u64));
        assert_eq!(summary.total_liabilities, Amount::from(2_000_000u64));
        assert_eq!(summary.household_expenses, Amount::from(1_200_000u64));
        assert_eq!(summary.total_credits, Amount::from(20_000u64));
        assert!(summary.incomes.iter().all(|l| l.complete));
    }

    #[test]
    fn test_business_loss_offsets_income() {
        let draft = apply_update(&complete_draft(), DraftPatch::AddIncomeEntry(
            IncomeEntryDraft::Business(BusinessDraft {
                business_name: "Online Store".into(),
                income: "100,000".into(),
                expenses: "700,000".into(),
            }),
        ))
        .unwrap();
        let summary = FilingSummary::from_draft(&draft);
        let business = summary
            .incomes
            .iter()
            .find(|l| l.kind == IncomeSourceKind::Business)
            .unwrap();
        assert_eq!(business.net_income, Amount::from(-100_000i64));
        assert_eq!(summary.total_income, Amount::from(2_420_000u64));
    }

    #[test]
    fn test_deselected_deductions_are_not_counted() {
        let draft = apply_update(
            &complete_draft(),
            DraftPatch::DeselectDeduction(DeductionKind::Other),
        )
        .unwrap();
        assert_eq!(
            FilingSummary::from_draft(&draft).total_deductions,
            Amount::from(12_000u64)
        );
    }

    #[test]
    fn test_describe_groups_thousands() {
        let text = FilingSummary::from_draft(&complete_draft()).describe();
        assert!(text.contains("income 3,020,000"), "{text}");
        assert!(text.contains("status pending"), "{text}");
    }
}
