use std::io::{BufRead as _, Read};

use spec_verifier_model::{EffectiveSettings, SettingValue};

use crate::error::{LogReadError, ParseError};

/// Marks the line before the first effective setting.
pub const EFFECTIVE_SETTINGS_MARKER: &str = "Effective Settings:";
/// Marks the end of the effective settings block.
pub const REQUESTED_SETTINGS_MARKER: &str = "Requested Settings:";

/// Colons on a settings line that come before the setting name.
const PREFIX_COLONS: usize = 4;

pub struct LogReader;

impl LogReader {
    /// Reads a log from a reader and returns its lines, without line endings.
    pub fn read<R>(reader: R) -> Result<Vec<String>, LogReadError>
    where
        R: Read,
    {
        let mut lines = Vec::new();
        for line in std::io::BufReader::new(reader).lines() {
            lines.push(line?);
        }

        Ok(lines)
    }

    /// Reads a log from the file at the specified path and returns its lines.
    pub fn read_from_file<P>(path: P) -> Result<Vec<String>, LogReadError>
    where
        P: AsRef<std::path::Path>,
    {
        let file = std::fs::File::open(path)?;
        Self::read(file)
    }
}

/// Extract the effective settings block from the lines of a log.
///
/// The block is every line after the first line containing [EFFECTIVE_SETTINGS_MARKER], up to but
/// not including the line just before the first line containing [REQUESTED_SETTINGS_MARKER]. That
/// line is expected to be a blank separator and is skipped.
///
/// Each line in the block must look like `a:b:c:d: <name>: <value>`. Everything up to the fourth
/// colon is ignored, along with the single character that follows it. The rest is split at its
/// first colon into the setting name, which is trimmed, and the value, which loses only the single
/// character after the colon.
pub fn extract<S: AsRef<str>>(lines: &[S]) -> Result<EffectiveSettings, ParseError> {
    let lines = lines
        .iter()
        .map(|line| line.as_ref().trim())
        .collect::<Vec<_>>();

    let effective = find_marker(&lines, EFFECTIVE_SETTINGS_MARKER)?;
    let requested = find_marker(&lines, REQUESTED_SETTINGS_MARKER)?;
    if effective >= requested {
        return Err(ParseError::MarkersOutOfOrder {
            effective: effective + 1,
            requested: requested + 1,
        });
    }

    let block_start = effective + 1;
    let block_end = (requested - 1).max(block_start);

    let mut settings = EffectiveSettings::new();
    for (index, line) in lines
        .iter()
        .enumerate()
        .take(block_end)
        .skip(block_start)
    {
        let (name, value) = parse_settings_line(line, index + 1)?;
        trace!("Line {}: {name} = {value}", index + 1);
        settings.insert(name, value);
    }

    debug!(
        "Extracted {} effective settings from lines {}..{}",
        settings.len(),
        block_start + 1,
        block_end
    );

    Ok(settings)
}

fn find_marker(lines: &[&str], marker: &'static str) -> Result<usize, ParseError> {
    lines
        .iter()
        .position(|line| line.contains(marker))
        .ok_or(ParseError::MissingMarker(marker))
}

fn parse_settings_line(line: &str, line_number: usize) -> Result<(String, SettingValue), ParseError> {
    let Some((last_prefix_colon, _)) = line.match_indices(':').nth(PREFIX_COLONS - 1) else {
        return Err(ParseError::MissingFieldPrefix {
            line: line_number,
            content: line.to_string(),
        });
    };

    let setting = skip_one_char(&line[last_prefix_colon + 1..]);
    let Some((name, value)) = setting.split_once(':') else {
        return Err(ParseError::MissingFieldSeparator {
            line: line_number,
            content: line.to_string(),
        });
    };

    Ok((
        name.trim().to_string(),
        SettingValue::from_raw(skip_one_char(value)),
    ))
}

fn skip_one_char(s: &str) -> &str {
    let mut chars = s.chars();
    chars.next();
    chars.as_str()
}
