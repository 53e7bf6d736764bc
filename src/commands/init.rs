use crate::commands::Out;
use crate::wizard::FlowKind;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and an initial `config.json`.
///
/// # Arguments
/// - `taxfile_home` - The directory that will be the root of data directory, e.g. `$HOME/taxfile`
/// - `api_url` - The base URL of the filing service
/// - `flow` - The step flow the wizard runs
///
/// # Errors
/// - Returns an error if the URL is invalid or any file operations fail.
pub async fn init(taxfile_home: &Path, api_url: &str, flow: FlowKind) -> Result<Out<()>> {
    let config = Config::create(taxfile_home, api_url, flow)
        .await
        .context("Unable to create the data directory and configs")?;
    Ok(format!(
        "Successfully created the taxfile directory and config at {}",
        config.config_path().display()
    )
    .into())
}
