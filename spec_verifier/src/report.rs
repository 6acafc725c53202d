use serde::Serialize;
use std::io::Write;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::evaluate::{ComplianceVerdict, Evaluation, RunStatus};

/// The one line summary printed for each status.
pub fn summary(status: RunStatus) -> &'static str {
    match status {
        RunStatus::Compliant => {
            "Your TestSettings are compliant with the MLPerf specifications."
        }
        RunStatus::SettingError => {
            "One or more of your TestSettings is not compliant with the MLPerf specifications. Please examine below to see which attributes do not comply."
        }
        RunStatus::ParseError => {
            "There is an error with parsing the log file. Please fix before continuing the test."
        }
    }
}

#[derive(Tabled)]
struct VerdictRow {
    #[tabled(rename = "Attribute")]
    attribute: String,
    #[tabled(rename = "Complies?")]
    complies: bool,
}

fn verdict_table(verdict: &ComplianceVerdict) -> Table {
    let rows = verdict
        .iter()
        .map(|(attribute, complies)| VerdictRow {
            attribute: attribute.to_string(),
            complies,
        })
        .collect::<Vec<_>>();

    let mut table = Table::new(rows);
    table.with(Style::modern());
    table
}

/// Write the human readable report: summary, status token, then every checked attribute.
pub fn write_text_report<W: Write>(writer: &mut W, evaluation: &Evaluation) -> std::io::Result<()> {
    writeln!(writer, "\nSummary: {}", summary(evaluation.status))?;
    writeln!(writer, "\nExit Code: {}", evaluation.status)?;
    if let Some(error) = &evaluation.error {
        writeln!(writer, "Reason: {error}")?;
    }

    writeln!(writer, "\nAttribute Complies?")?;
    if evaluation.verdict.is_empty() {
        writeln!(writer, "No attributes were checked")?;
    } else {
        writeln!(writer, "{}", verdict_table(&evaluation.verdict))?;
    }

    Ok(())
}

/// Machine readable form of an [Evaluation].
#[derive(Debug, Serialize)]
pub struct VerificationReport<'a> {
    pub summary: &'static str,
    pub status: RunStatus,
    pub model: &'a str,
    pub scenario: Option<&'a str>,
    pub settings_fingerprint: Option<&'a str>,
    pub error: Option<String>,
    pub verdict: &'a ComplianceVerdict,
}

impl<'a> From<&'a Evaluation> for VerificationReport<'a> {
    fn from(evaluation: &'a Evaluation) -> Self {
        Self {
            summary: summary(evaluation.status),
            status: evaluation.status,
            model: &evaluation.model,
            scenario: evaluation.scenario.as_deref(),
            settings_fingerprint: evaluation.settings_fingerprint.as_deref(),
            error: evaluation.error.as_ref().map(ToString::to_string),
            verdict: &evaluation.verdict,
        }
    }
}

pub fn write_json_report<W: Write>(writer: W, evaluation: &Evaluation) -> serde_json::Result<()> {
    serde_json::to_writer_pretty(writer, &VerificationReport::from(evaluation))
}
