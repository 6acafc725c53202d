/// The log could not be turned into a scenario that the specification knows about.
///
/// Any of these ends the run with [crate::RunStatus::ParseError]; no verdict is produced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("No line contains the marker `{0}`")]
    MissingMarker(&'static str),
    #[error(
        "The effective settings marker on line {effective} does not precede the requested settings marker on line {requested}"
    )]
    MarkersOutOfOrder { effective: usize, requested: usize },
    #[error("Line {line} has fewer than 4 colons before the setting: {content}")]
    MissingFieldPrefix { line: usize, content: String },
    #[error("Line {line} has no colon between the setting name and its value: {content}")]
    MissingFieldSeparator { line: usize, content: String },
    #[error("The effective settings do not include a `Scenario`")]
    MissingScenario,
    #[error("Scenario `{0}` is not in the specification")]
    UnknownScenario(String),
}

/// An error type for [`crate::LogReader::read`].
#[derive(Debug, thiserror::Error)]
pub enum LogReadError {
    #[error("An error occurred while reading the log: {0}")]
    Io(#[from] std::io::Error),
}
