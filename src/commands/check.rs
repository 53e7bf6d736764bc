use crate::commands::Out;
use crate::model::FilingDraft;
use crate::wizard::Flow;
use crate::{utils, Result};
use serde::Serialize;
use std::path::Path;
use tracing::warn;

/// Completeness of one step.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub number: usize,
    pub id: &'static str,
    pub title: &'static str,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Reports, for every step of `flow`, whether the draft in `draft_path` completes it and, if not,
/// why.
pub async fn check(flow: &Flow, draft_path: &Path) -> Result<Out<Vec<StepReport>>> {
    let draft: FilingDraft = utils::deserialize(draft_path).await?;
    let draft = draft.normalized();
    let reports = check_draft(flow, &draft);
    for report in reports.iter().filter(|r| !r.complete) {
        warn!(
            "Step {} ({}) is incomplete: {}",
            report.number,
            report.title,
            report.reason.as_deref().unwrap_or_default()
        );
    }
    let complete = reports.iter().filter(|r| r.complete).count();
    Ok(Out::new(
        format!("{complete} of {} steps are complete", reports.len()),
        reports,
    ))
}

fn check_draft(flow: &Flow, draft: &FilingDraft) -> Vec<StepReport> {
    flow.steps()
        .iter()
        .map(|step| {
            let reason = step.check(draft).err().map(|e| e.to_string());
            StepReport {
                number: step.number,
                id: step.id,
                title: step.title,
                complete: reason.is_none(),
                reason,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::{complete_draft, draft_through};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_check_complete_draft() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("draft.json");
        utils::serialize(&path, &complete_draft()).await.unwrap();
        let out = check(&Flow::legacy_ten(), &path).await.unwrap();
        assert_eq!(out.message(), "10 of 10 steps are complete");
    }

    #[test]
    fn test_reasons_for_incomplete_steps() {
        let reports = check_draft(&Flow::canonical(), &draft_through(8));
        let asset_details = &reports[8];
        assert_eq!(asset_details.id, "asset-details");
        assert!(!asset_details.complete);
        assert_eq!(
            asset_details.reason.as_deref(),
            Some("at least one property entry is required")
        );
        assert!(reports[..8].iter().all(|r| r.complete));
    }
}
