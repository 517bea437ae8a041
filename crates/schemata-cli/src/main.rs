mod commands;
mod logging;
mod output;
mod settings;

use std::io;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use schemata_core::{DocumentError, Error as CoreError};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum CliError {
    #[error("core error: {0}")]
    Core(#[from] CoreError),
    #[error("schema document error: {0}")]
    Document(#[from] DocumentError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("unknown record type: {0}")]
    UnknownRecordType(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("{invalid} of {total} records failed validation")]
    ValidationFailed { invalid: usize, total: usize },
}

#[derive(Parser, Debug)]
#[command(name = "schemata", version, about = "Schemata record schema CLI")]
struct Cli {
    /// Settings file; defaults to ./schemata.toml when present.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a schema document and self-validate every record type.
    Check(CheckArgs),
    /// Validate records against a record type.
    Validate(RecordsArgs),
    /// Perfect records against a record type and print them as JSON.
    Perfect(PerfectArgs),
}

#[derive(Args, Debug)]
struct CheckArgs {
    /// Schema document (JSON).
    schema: PathBuf,
}

#[derive(Args, Debug)]
struct RecordsArgs {
    /// Schema document (JSON).
    #[arg(long)]
    schema: PathBuf,
    /// Record type the records belong to.
    #[arg(long, value_name = "NAME")]
    record_type: String,
    /// Records file: one JSON object or an array of objects.
    records: PathBuf,
}

#[derive(Args, Debug)]
struct PerfectArgs {
    #[command(flatten)]
    input: RecordsArgs,
    /// Write the perfected records here instead of stdout.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let settings = settings::load_settings(cli.config.as_deref())?;
    logging::init_logging(&settings.logging)?;

    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::Check(args) => commands::run_check(&args.schema, &mut stdout),
        Command::Validate(args) => {
            let summary = commands::run_validate(
                &args.schema,
                &args.record_type,
                &args.records,
                &settings.validate,
                &mut stdout,
            )?;
            if settings.validate.fail_on_error && summary.invalid > 0 {
                return Err(CliError::ValidationFailed {
                    invalid: summary.invalid,
                    total: summary.total,
                });
            }
            Ok(())
        }
        Command::Perfect(args) => commands::run_perfect(
            &args.input.schema,
            &args.input.record_type,
            &args.input.records,
            args.out.as_deref(),
            &mut stdout,
        ),
    }
}
