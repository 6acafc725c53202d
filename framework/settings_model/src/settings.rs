use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha3::Digest;
use std::fmt;

/// The settings field that names the scenario a run was configured for.
pub const SCENARIO_FIELD: &str = "Scenario";

/// A single value read from the effective settings block of a log.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Integer(u64),
    Text(String),
}

impl SettingValue {
    /// Interpret a raw value from the log.
    ///
    /// The value becomes an [SettingValue::Integer] only when every character is an ASCII digit.
    /// Signs, decimal points and surrounding whitespace all leave it as text.
    ///
    /// A digit string too large for a `u64` also stays text, even though it is entirely numeric,
    /// so it fails any numeric minimum.
    pub fn from_raw(raw: &str) -> Self {
        if !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit()) {
            if let Ok(n) = raw.parse::<u64>() {
                return SettingValue::Integer(n);
            }
        }

        SettingValue::Text(raw.to_string())
    }

    /// Exact equality against a required value from the specification.
    ///
    /// Integers compare equal to JSON numbers of the same value, text compares equal to JSON
    /// strings with identical content. Every other pairing is unequal.
    pub fn matches(&self, required: &Value) -> bool {
        match (self, required) {
            (SettingValue::Integer(n), Value::Number(r)) => match r.as_u64() {
                Some(r) => r == *n,
                None => r.as_f64().is_some_and(|r| r == *n as f64),
            },
            (SettingValue::Text(s), Value::String(r)) => s == r,
            _ => false,
        }
    }

    /// Check `required <= self`.
    ///
    /// Only an integer can meet a numeric minimum. Text values and non-numeric requirements
    /// never do.
    pub fn meets_minimum(&self, required: &Value) -> bool {
        let (SettingValue::Integer(n), Value::Number(r)) = (self, required) else {
            return false;
        };

        if let Some(r) = r.as_u64() {
            r <= *n
        } else if r.as_i64().is_some() {
            // Negative minimum
            true
        } else {
            r.as_f64().is_some_and(|r| r <= *n as f64)
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Integer(n) => write!(f, "{n}"),
            SettingValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// The settings a run was actually configured with, in the order they were logged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectiveSettings {
    entries: IndexMap<String, SettingValue>,
}

impl EffectiveSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field.
    ///
    /// A repeated field replaces the earlier value but keeps its original position.
    pub fn insert(&mut self, field: String, value: SettingValue) {
        self.entries.insert(field, value);
    }

    pub fn get(&self, field: &str) -> Option<&SettingValue> {
        self.entries.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SettingValue)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The value of the [SCENARIO_FIELD], if one was logged.
    pub fn scenario(&self) -> Option<&SettingValue> {
        self.get(SCENARIO_FIELD)
    }

    /// Compute a fingerprint for these settings
    ///
    /// The fingerprint identifies the exact configuration that a verdict was computed for. Every
    /// field name and value is hashed in logged order using [sha3::Sha3_256].
    pub fn fingerprint(&self) -> String {
        let mut hasher = sha3::Sha3_256::new();
        for (field, value) in &self.entries {
            Digest::update(&mut hasher, field.as_bytes());
            match value {
                SettingValue::Integer(n) => {
                    Digest::update(&mut hasher, b"i");
                    Digest::update(&mut hasher, n.to_le_bytes());
                }
                SettingValue::Text(s) => {
                    Digest::update(&mut hasher, b"s");
                    Digest::update(&mut hasher, s.as_bytes());
                }
            }
        }

        format!("{:x}", hasher.finalize())
    }
}

impl FromIterator<(String, SettingValue)> for EffectiveSettings {
    fn from_iter<T: IntoIterator<Item = (String, SettingValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
