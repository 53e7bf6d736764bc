use crate::api::{FilingStore, Mode};
use crate::commands::Out;
use crate::error::FilingError;
use crate::model::{FilingDraft, FilingStatus};
use crate::wizard::{Flow, Wizard, WizardState};
use crate::{utils, Config, Result};
use anyhow::Context;
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// The outcome of `push`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PushReport {
    pub filing_id: String,
    pub saved_steps: Vec<usize>,
    pub state: WizardState,
    pub status: FilingStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked_at: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Downloads filing `filing_id` and writes it as JSON to `out_path`.
pub async fn pull(config: Config, mode: Mode, filing_id: &str, out_path: &Path) -> Result<Out<()>> {
    let store = crate::api::store(&config, mode).await?;
    let snapshot = store
        .load(filing_id)
        .await
        .with_context(|| format!("Unable to load filing '{filing_id}'"))?;
    utils::serialize(out_path, &snapshot).await?;
    Ok(format!(
        "Wrote filing '{filing_id}' ({}) to {}",
        snapshot.draft.status(),
        out_path.display()
    )
    .into())
}

/// Walks the draft in `draft_path` through the configured flow, saving each complete step. Stops
/// at the first incomplete step. The last step submits the filing, which only happens when
/// `submit` is true.
pub async fn push(
    config: Config,
    mode: Mode,
    filing_id: &str,
    draft_path: &Path,
    submit: bool,
) -> Result<Out<PushReport>> {
    let draft: FilingDraft = utils::deserialize(draft_path).await?;
    let store = crate::api::store(&config, mode).await?;
    push_draft(store, Flow::new(config.flow()), filing_id, draft, submit).await
}

async fn push_draft<S>(
    store: S,
    flow: Flow,
    filing_id: &str,
    mut draft: FilingDraft,
    submit: bool,
) -> Result<Out<PushReport>>
where
    S: FilingStore,
{
    let remote = store
        .load(filing_id)
        .await
        .with_context(|| format!("Unable to load filing '{filing_id}'"))?;
    debug!(
        "Filing '{filing_id}' is {} on the service",
        remote.draft.status()
    );
    draft.status = remote.draft.status();

    let last = flow.len();
    let mut wizard = Wizard::new(store, flow, filing_id, draft);
    let mut saved_steps = Vec::new();
    let mut blocked = None;
    while let Some(current) = wizard.current_step() {
        if current == last && !submit {
            break;
        }
        match wizard.advance().await {
            Ok(_) => saved_steps.push(current),
            Err(FilingError::StepIncomplete { step, reason }) => {
                blocked = Some((step, reason.to_string()));
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    let report = PushReport {
        filing_id: filing_id.to_string(),
        saved_steps,
        state: wizard.state(),
        status: wizard.status(),
        blocked_at: blocked.as_ref().map(|(step, _)| *step),
        reason: blocked.map(|(_, reason)| reason),
    };
    let message = match (&report.state, report.blocked_at) {
        (WizardState::Submitted, _) => format!("Submitted filing '{filing_id}'"),
        (_, Some(step)) => format!(
            "Saved {} step(s) of filing '{filing_id}', stopped at incomplete step {step}",
            report.saved_steps.len()
        ),
        _ => format!(
            "Saved {} step(s) of filing '{filing_id}', not submitted",
            report.saved_steps.len()
        ),
    };
    info!("{message}");
    Ok(Out::new(message, report))
}
