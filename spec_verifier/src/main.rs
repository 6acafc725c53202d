#[macro_use]
extern crate log;

use std::io::Write as _;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser as _;
use mlperf_spec_verifier::report::{write_json_report, write_text_report};
use mlperf_spec_verifier::{verify, LogReader};
use spec_verifier_model::load_specification;

use crate::cli::{CliArgs, OutputFormat};

mod cli;

const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> anyhow::Result<ExitCode> {
    env_logger::init();

    let args = CliArgs::parse();
    info!("{CRATE_NAME} {CRATE_VERSION}");

    debug!("Loading specification from {}", args.spec.display());
    let specification = load_specification(&args.spec)?;

    debug!("Reading log from {}", args.log.display());
    let lines = LogReader::read_from_file(&args.log)
        .with_context(|| format!("Failed to read log {}", args.log.display()))?;

    let evaluation = verify(&lines, &specification, &args.model);

    let mut stdout = std::io::stdout().lock();
    match args.format {
        OutputFormat::Text => write_text_report(&mut stdout, &evaluation)?,
        OutputFormat::Json => {
            write_json_report(&mut stdout, &evaluation)?;
            writeln!(stdout)?;
        }
    }

    if let Some(path) = &args.report {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create report {}", path.display()))?;
        write_json_report(file, &evaluation)
            .with_context(|| format!("Failed to write report {}", path.display()))?;
        info!("Wrote report to {}", path.display());
    }

    Ok(ExitCode::from(evaluation.status.exit_code()))
}
