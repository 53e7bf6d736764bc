//! These structs provide the CLI interface for the taxfile CLI.

use crate::wizard::FlowKind;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// taxfile: A command-line tool for preparing an income tax return.
///
/// A return is kept as a JSON draft on disk. You can check which wizard steps it completes, see
/// what it adds up to, and push it to the filing service one step at a time, finishing with a
/// submission for review.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the data directory and initialize the configuration file.
    ///
    /// - Decide what directory you want to store data in and pass this as --taxfile-home. By
    ///   default, it will be $HOME/taxfile.
    ///
    /// - Pass the base URL of the filing service as --api-url.
    Init(InitArgs),
    /// Report which steps of the wizard a draft completes.
    Check(CheckArgs),
    /// Print the income, deduction, wealth and credit totals of a draft.
    Summary(SummaryArgs),
    /// Download a filing from the filing service into a JSON file.
    Pull(PullArgs),
    /// Save a draft to the filing service step by step, optionally submitting it.
    Push(PushArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where taxfile configuration is held. Defaults to ~/taxfile
    #[arg(long, env = "TAXFILE_HOME", default_value_t = default_taxfile_home())]
    taxfile_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, taxfile_home: PathBuf) -> Self {
        Self {
            log_level,
            taxfile_home: taxfile_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn taxfile_home(&self) -> &DisplayPath {
        &self.taxfile_home
    }
}

/// (Not shown): Args for the `taxfile init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The base URL of the filing service, e.g. https://filing.example.com/api
    #[arg(long)]
    api_url: String,

    /// The wizard flow to use: canonical, legacy13 or legacy10
    #[arg(long, default_value_t = FlowKind::Canonical)]
    flow: FlowKind,
}

impl InitArgs {
    pub fn new(api_url: impl Into<String>, flow: FlowKind) -> Self {
        Self {
            api_url: api_url.into(),
            flow,
        }
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    pub fn flow(&self) -> FlowKind {
        self.flow
    }
}

/// (Not shown): Args for the `taxfile check` command.
#[derive(Debug, Parser, Clone)]
pub struct CheckArgs {
    /// The draft JSON file.
    draft: PathBuf,

    /// The wizard flow to check against. Defaults to the configured flow.
    #[arg(long)]
    flow: Option<FlowKind>,
}

impl CheckArgs {
    pub fn new(draft: impl Into<PathBuf>, flow: Option<FlowKind>) -> Self {
        Self {
            draft: draft.into(),
            flow,
        }
    }

    pub fn draft(&self) -> &Path {
        &self.draft
    }

    pub fn flow(&self) -> Option<FlowKind> {
        self.flow
    }
}

/// (Not shown): Args for the `taxfile summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    /// The draft JSON file.
    draft: PathBuf,
}

impl SummaryArgs {
    pub fn new(draft: impl Into<PathBuf>) -> Self {
        Self {
            draft: draft.into(),
        }
    }

    pub fn draft(&self) -> &Path {
        &self.draft
    }
}

/// (Not shown): Args for the `taxfile pull` command.
#[derive(Debug, Parser, Clone)]
pub struct PullArgs {
    /// The id of the filing on the filing service.
    filing_id: String,

    /// Where to write the filing. Defaults to <filing-id>.json in the current directory.
    #[arg(long)]
    out: Option<PathBuf>,
}

impl PullArgs {
    pub fn new(filing_id: impl Into<String>, out: Option<PathBuf>) -> Self {
        Self {
            filing_id: filing_id.into(),
            out,
        }
    }

    pub fn filing_id(&self) -> &str {
        &self.filing_id
    }

    pub fn out(&self) -> PathBuf {
        self.out
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("{}.json", self.filing_id)))
    }
}

/// (Not shown): Args for the `taxfile push` command.
#[derive(Debug, Parser, Clone)]
pub struct PushArgs {
    /// The id of the filing on the filing service.
    filing_id: String,

    /// The draft JSON file.
    draft: PathBuf,

    /// Submit the filing for review once every step is saved.
    #[arg(long)]
    submit: bool,
}

impl PushArgs {
    pub fn new(filing_id: impl Into<String>, draft: impl Into<PathBuf>, submit: bool) -> Self {
        Self {
            filing_id: filing_id.into(),
            draft: draft.into(),
            submit,
        }
    }

    pub fn filing_id(&self) -> &str {
        &self.filing_id
    }

    pub fn draft(&self) -> &Path {
        &self.draft
    }

    pub fn submit(&self) -> bool {
        self.submit
    }
}

fn default_taxfile_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("taxfile"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --taxfile-home or TAXFILE_HOME instead of relying on the \
                default taxfile home directory.",
            );
            PathBuf::from("taxfile")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
