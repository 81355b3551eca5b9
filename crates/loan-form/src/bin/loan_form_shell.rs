//! Terminal shell for the loan application form.
//!
//! Reads commands from standard input, keeps the draft in a directory on
//! disk, and submits to the simulated backend. Logs go to standard error so
//! they never interleave with the form.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use loan_form::LoanFormSettings;
use loan_form::domain::ports::{DraftStorageError, StorageKeyValidationError};
use loan_form::domain::{DraftStore, LoanFormSession};
use loan_form::outbound::{FileDraftStorage, SimulatedLoanGateway};
use loan_form::shell::run_shell;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use thiserror::Error;
use tokio::io::BufReader;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

/// Failures that stop the shell.
#[derive(Debug, Error)]
enum ShellStartupError {
    #[error("invalid storage key: {0}")]
    StorageKey(#[from] StorageKeyValidationError),
    #[error(transparent)]
    Storage(#[from] DraftStorageError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    let settings = match LoanFormSettings::load() {
        Ok(settings) => settings,
        Err(err) => {
            report(&format!("failed to load configuration: {err}"));
            return ExitCode::FAILURE;
        }
    };
    init_tracing(settings.log_json);

    match run(&settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "loan form shell stopped");
            report(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: &LoanFormSettings) -> Result<(), ShellStartupError> {
    let storage_dir = settings.storage_dir();
    let storage = FileDraftStorage::open(&storage_dir)?;
    let drafts = DraftStore::new(
        Arc::new(storage),
        settings.storage_key()?,
        Arc::new(DefaultClock),
    );
    let gateway = SimulatedLoanGateway::new(settings.submission_delay());
    info!(
        storage_dir = %storage_dir.display(),
        key = %drafts.key(),
        delay_ms = u64::try_from(settings.submission_delay().as_millis()).unwrap_or(u64::MAX),
        "starting loan form shell"
    );
    let session = LoanFormSession::new(drafts, Arc::new(gateway), settings.submission_timeout());

    let mut stdout = io::stdout();
    run_shell(session, BufReader::new(tokio::io::stdin()), &mut stdout).await?;
    Ok(())
}

fn init_tracing(json: bool) {
    let builder = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(e) = result {
        warn!(error = %e, "tracing init failed");
    }
}

fn report(message: &str) {
    if let Err(write_err) = writeln!(io::stderr().lock(), "{message}") {
        drop(write_err);
    }
}
