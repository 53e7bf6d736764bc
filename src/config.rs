//! Configuration file handling for taxfile.
//!
//! The configuration file is stored at `$TAXFILE_HOME/config.json` and holds the address of the
//! filing service, the step flow the wizard runs and the optional path of an API token file.

use crate::wizard::FlowKind;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const APP_NAME: &str = "taxfile";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$TAXFILE_HOME` and from there it loads `$TAXFILE_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory and an initial `config.json` in it.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of data directory, e.g. `$HOME/taxfile`
    /// - `api_url` - The base URL of the filing service, e.g. `https://filing.example.com/api`
    /// - `flow` - The step flow the wizard will run
    ///
    /// # Errors
    /// - Returns an error if `api_url` is not a URL or if any file operations fail.
    pub async fn create(dir: impl Into<PathBuf>, api_url: &str, flow: FlowKind) -> Result<Self> {
        let api_url = Url::parse(api_url)
            .with_context(|| format!("The filing service URL '{api_url}' is not valid"))?;

        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the taxfile home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        let config_file = ConfigFile {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            api_url,
            flow,
            token_path: None,
        };
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that `taxfile_home` and its config file exist
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(taxfile_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = taxfile_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The taxfile home directory is missing")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn api_url(&self) -> &Url {
        &self.config_file.api_url
    }

    pub fn flow(&self) -> FlowKind {
        self.config_file.flow
    }

    /// Returns the stored `token_path`, resolved against the home directory when it is relative.
    pub fn token_path(&self) -> Option<PathBuf> {
        self.config_file.token_path.as_ref().map(|p| {
            if p.is_absolute() {
                p.clone()
            } else {
                self.root.join(p)
            }
        })
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "taxfile",
///   "config_version": 1,
///   "api_url": "https://filing.example.com/api",
///   "flow": "canonical",
///   "token_path": ".secrets/token"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "taxfile"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Base URL of the filing service
    api_url: Url,

    /// Which step flow the wizard runs
    #[serde(default)]
    flow: FlowKind,

    /// Path to a file holding a bearer token for the filing service (optional, relative to the
    /// home directory or absolute)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token_path: Option<PathBuf>,
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or if it belongs to another app.
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version {} in config file, expected {}",
            config.config_version,
            CONFIG_VERSION
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        utils::serialize(path.as_ref(), self)
            .await
            .context("Unable to write config file")
    }
}
