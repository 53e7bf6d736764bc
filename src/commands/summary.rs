use crate::commands::Out;
use crate::model::FilingDraft;
use crate::summary::FilingSummary;
use crate::{utils, Result};
use std::path::Path;

/// Adds up the draft in `draft_path`.
pub async fn summary(draft_path: &Path) -> Result<Out<FilingSummary>> {
    let draft: FilingDraft = utils::deserialize(draft_path).await?;
    let summary = FilingSummary::from_draft(&draft.normalized());
    Ok(Out::new(summary.describe(), summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use crate::test::complete_draft;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_summary_of_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("draft.json");
        utils::serialize(&path, &complete_draft()).await.unwrap();
        let out = summary(&path).await.unwrap();
        assert_eq!(
            out.structure().unwrap().total_liabilities,
            Amount::from(2_000_000u64)
        );
        assert!(out.message().starts_with("Tax year 2024"));
    }
}
