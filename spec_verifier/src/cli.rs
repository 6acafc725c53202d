use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(Parser)]
#[command(about, long_about = None)]
pub struct CliArgs {
    /// Path to the load generator log containing the effective settings.
    #[arg(long, env = "SPEC_VERIFIER_LOG")]
    pub log: PathBuf,

    /// Path to the JSON document of required settings per scenario.
    #[arg(long, env = "SPEC_VERIFIER_SPEC")]
    pub spec: PathBuf,

    /// Name of the model that was tested, for example `resnet50-v1.5`.
    ///
    /// Matched exactly against the model names of per-model requirements.
    #[arg(long, env = "SPEC_VERIFIER_MODEL")]
    pub model: String,

    /// How to print the report.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write the report as JSON to this file.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
