use clap::Parser;
use std::process::ExitCode;
use taxfile::args::{Args, Command};
use taxfile::wizard::Flow;
use taxfile::{commands, Config, Mode, Result};
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().taxfile_home().path();

    // When TAXFILE_IN_TEST_MODE is set and non-empty the filing service is replaced by an
    // in-memory store.
    let mode = Mode::from_env();

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.api_url(), init_args.flow())
            .await?
            .print(),

        Command::Check(check_args) => {
            let kind = match check_args.flow() {
                Some(kind) => kind,
                None => Config::load(home).await?.flow(),
            };
            commands::check(&Flow::new(kind), check_args.draft())
                .await?
                .print()
        }

        Command::Summary(summary_args) => commands::summary(summary_args.draft()).await?.print(),

        Command::Pull(pull_args) => {
            let config = Config::load(home).await?;
            commands::pull(config, mode, pull_args.filing_id(), &pull_args.out())
                .await?
                .print()
        }

        Command::Push(push_args) => {
            let config = Config::load(home).await?;
            commands::push(
                config,
                mode,
                push_args.filing_id(),
                push_args.draft(),
                push_args.submit(),
            )
            .await?
            .print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        // RUST_LOG exists; use it.
        Some(_) => EnvFilter::from_default_env(),
        // Otherwise only this crate logs, at `level`.
        None => EnvFilter::new(format!(
            "{}={},{}={}",
            env!("CARGO_CRATE_NAME"),
            level,
            env!("CARGO_BIN_NAME"),
            level
        )),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
