use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::Read;
use std::path::Path;

/// The required value for one field of a scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Requirement {
    /// A required value that depends on the model under test, keyed by model name.
    PerModel(IndexMap<String, Value>),
    /// A single required value that applies to every model.
    Literal(Value),
}

impl Requirement {
    /// The required value for `model`, if this is a per-model requirement that lists it.
    ///
    /// Model names are matched verbatim.
    pub fn for_model(&self, model: &str) -> Option<&Value> {
        match self {
            Requirement::PerModel(values) => values.get(model),
            Requirement::Literal(_) => None,
        }
    }

    pub fn literal(&self) -> Option<&Value> {
        match self {
            Requirement::PerModel(_) => None,
            Requirement::Literal(value) => Some(value),
        }
    }

    pub fn is_per_model(&self) -> bool {
        matches!(self, Requirement::PerModel(_))
    }
}

/// Required values for every constrained field of one scenario, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScenarioRequirements {
    fields: IndexMap<String, Requirement>,
}

impl ScenarioRequirements {
    pub fn get(&self, field: &str) -> Option<&Requirement> {
        self.fields.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Requirement)> {
        self.fields.iter()
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }
}

impl FromIterator<(String, Requirement)> for ScenarioRequirements {
    fn from_iter<T: IntoIterator<Item = (String, Requirement)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

/// Required settings for each scenario, keyed by the exact scenario name that appears in logs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Specification {
    scenarios: IndexMap<String, ScenarioRequirements>,
}

impl Specification {
    /// Look up a scenario by name. The lookup is case-sensitive.
    pub fn scenario(&self, name: &str) -> Option<&ScenarioRequirements> {
        self.scenarios.get(name)
    }

    pub fn scenario_names(&self) -> impl Iterator<Item = &str> {
        self.scenarios.keys().map(String::as_str)
    }
}

impl FromIterator<(String, ScenarioRequirements)> for Specification {
    fn from_iter<T: IntoIterator<Item = (String, ScenarioRequirements)>>(iter: T) -> Self {
        Self {
            scenarios: iter.into_iter().collect(),
        }
    }
}

/// Load a specification from a reader containing a JSON document
pub fn load_specification_from_reader<R: Read>(reader: R) -> anyhow::Result<Specification> {
    let reader = std::io::BufReader::new(reader);
    let specification: Specification = serde_json::from_reader(reader)?;
    Ok(specification)
}

/// Load a specification from a JSON file
pub fn load_specification<P: AsRef<Path>>(path: P) -> anyhow::Result<Specification> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open specification {}", path.display()))?;
    load_specification_from_reader(file)
        .with_context(|| format!("Failed to parse specification {}", path.display()))
}
