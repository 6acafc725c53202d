//! The closed set of per-field compliance rules.
//!
//! Each constrained field name maps to one [FieldRule]. Fields without an entry in
//! [FIELD_RULES] must match their required value exactly.

use spec_verifier_model::{Requirement, SettingValue};

use crate::scenario::Scenario;

pub const TARGET_LATENCY: &str = "target_latency (ns)";
pub const MIN_QUERY_COUNT: &str = "min_query_count";
pub const SAMPLES_PER_QUERY: &str = "samples_per_query";
pub const MIN_DURATION: &str = "min_duration (ms)";
pub const MIN_SAMPLE_COUNT: &str = "min_sample_count";

/// Everything a rule may look at when judging one field.
#[derive(Debug, Clone, Copy)]
pub struct RuleInput<'a> {
    pub field: &'a str,
    /// `None` when the scenario is not one of the known MLPerf scenarios.
    pub scenario: Option<Scenario>,
    pub model: &'a str,
    pub requirement: &'a Requirement,
    /// `None` when the log did not report this field.
    pub observed: Option<&'a SettingValue>,
}

impl RuleInput<'_> {
    fn in_scenario(&self, scenario: Scenario) -> bool {
        self.scenario == Some(scenario)
    }

    fn latency_bound(&self) -> bool {
        self.scenario.is_some_and(Scenario::is_latency_bound)
    }
}

pub type FieldRule = fn(&RuleInput<'_>) -> bool;

pub const FIELD_RULES: &[(&str, FieldRule)] = &[
    (TARGET_LATENCY, target_latency),
    (MIN_QUERY_COUNT, min_query_count),
    (SAMPLES_PER_QUERY, samples_per_query),
    (MIN_DURATION, min_duration),
    (MIN_SAMPLE_COUNT, min_sample_count),
];

/// Find the rule for a field, falling back to [exact_match].
pub fn rule_for(field: &str) -> FieldRule {
    FIELD_RULES
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, rule)| *rule)
        .unwrap_or(exact_match)
}

/// Exact per-model latency target in MultiStream and Server, unconstrained elsewhere.
pub fn target_latency(input: &RuleInput<'_>) -> bool {
    if input.latency_bound() {
        per_model(input, SettingValue::matches)
    } else {
        true
    }
}

pub fn min_query_count(input: &RuleInput<'_>) -> bool {
    if input.latency_bound() {
        per_model(input, SettingValue::meets_minimum)
    } else {
        minimum(input)
    }
}

/// A minimum in Offline, exempt in MultiStream.
///
/// No other scenario has a rule for this field, so it never passes there.
pub fn samples_per_query(input: &RuleInput<'_>) -> bool {
    match input.scenario {
        Some(Scenario::Offline) => minimum(input),
        Some(Scenario::MultiStream) => true,
        _ => {
            warn!(
                "No rule for `{}` in this scenario, it cannot comply",
                input.field
            );
            false
        }
    }
}

pub fn min_duration(input: &RuleInput<'_>) -> bool {
    minimum(input)
}

pub fn min_sample_count(input: &RuleInput<'_>) -> bool {
    if input.in_scenario(Scenario::Server) {
        per_model(input, SettingValue::meets_minimum)
    } else {
        minimum(input)
    }
}

pub fn exact_match(input: &RuleInput<'_>) -> bool {
    literal(input, SettingValue::matches)
}

fn minimum(input: &RuleInput<'_>) -> bool {
    literal(input, SettingValue::meets_minimum)
}

fn literal(input: &RuleInput<'_>, check: fn(&SettingValue, &serde_json::Value) -> bool) -> bool {
    let Some(required) = input.requirement.literal() else {
        warn!(
            "`{}` has a per-model requirement where a single value was expected",
            input.field
        );
        return false;
    };

    input.observed.is_some_and(|observed| check(observed, required))
}

/// Apply `check` against this field's own requirement for the model under test.
fn per_model(input: &RuleInput<'_>, check: fn(&SettingValue, &serde_json::Value) -> bool) -> bool {
    if !input.requirement.is_per_model() {
        warn!(
            "`{}` has a single requirement where a per-model requirement was expected",
            input.field
        );
        return false;
    }

    let Some(required) = input.requirement.for_model(input.model) else {
        debug!(
            "Model `{}` has no requirement for `{}`",
            input.model, input.field
        );
        return false;
    };

    input.observed.is_some_and(|observed| check(observed, required))
}
