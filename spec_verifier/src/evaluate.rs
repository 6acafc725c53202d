use indexmap::IndexMap;
use itertools::Itertools;
use serde::Serialize;
use spec_verifier_model::{
    EffectiveSettings, ScenarioRequirements, SettingValue, Specification, SCENARIO_FIELD,
};

use crate::error::ParseError;
use crate::extract::extract;
use crate::rules::{rule_for, RuleInput};
use crate::scenario::Scenario;

/// Classification of a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, derive_more::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    /// Every required setting complies.
    #[display("COMPLIANT")]
    Compliant,
    /// The log was understood but at least one setting does not comply.
    #[display("SETTING_ERROR")]
    SettingError,
    /// The log could not be parsed, or names a scenario the specification does not cover.
    #[display("PARSE_ERROR")]
    ParseError,
}

impl RunStatus {
    /// Process exit code for this status.
    ///
    /// 1 and 2 are left for tool failures and command line usage errors.
    pub fn exit_code(self) -> u8 {
        match self {
            RunStatus::Compliant => 0,
            RunStatus::SettingError => 3,
            RunStatus::ParseError => 4,
        }
    }
}

/// Whether each required field complied, in specification order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ComplianceVerdict {
    fields: IndexMap<String, bool>,
}

impl ComplianceVerdict {
    pub fn get(&self, field: &str) -> Option<bool> {
        self.fields.get(field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, bool)> {
        self.fields.iter().map(|(field, complies)| (field.as_str(), *complies))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn is_compliant(&self) -> bool {
        self.fields.values().all(|complies| *complies)
    }

    pub fn failing_fields(&self) -> impl Iterator<Item = &str> {
        self.iter()
            .filter(|(_, complies)| !complies)
            .map(|(field, _)| field)
    }
}

/// The outcome of checking one run against the specification.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub status: RunStatus,
    /// Empty when `status` is [RunStatus::ParseError].
    pub verdict: ComplianceVerdict,
    pub model: String,
    /// The scenario the verdict was computed for.
    pub scenario: Option<String>,
    /// [EffectiveSettings::fingerprint] of the settings that were checked, when extraction worked.
    pub settings_fingerprint: Option<String>,
    /// Why the run could not be checked.
    pub error: Option<ParseError>,
}

impl Evaluation {
    fn failed(model: &str, error: ParseError, settings_fingerprint: Option<String>) -> Self {
        warn!("Unable to check settings: {error}");
        Self {
            status: RunStatus::ParseError,
            verdict: ComplianceVerdict::default(),
            model: model.to_string(),
            scenario: None,
            settings_fingerprint,
            error: Some(error),
        }
    }
}

/// Extract the effective settings from the lines of a log and check them.
pub fn verify<S: AsRef<str>>(lines: &[S], specification: &Specification, model: &str) -> Evaluation {
    match extract(lines) {
        Ok(settings) => evaluate(&settings, specification, model),
        Err(e) => Evaluation::failed(model, e, None),
    }
}

/// Check effective settings against the requirements of the scenario they name.
///
/// Every field the scenario requires is judged by its rule from [crate::rules], and `Scenario` is
/// always reported as compliant. A field the settings do not include does not comply.
pub fn evaluate(
    settings: &EffectiveSettings,
    specification: &Specification,
    model: &str,
) -> Evaluation {
    let fingerprint = settings.fingerprint();

    let (scenario, requirements) = match resolve_scenario(settings, specification) {
        Ok(resolved) => resolved,
        Err(e) => return Evaluation::failed(model, e, Some(fingerprint)),
    };

    let verdict = check_requirements(scenario, requirements, settings, model);
    let status = if verdict.is_compliant() {
        RunStatus::Compliant
    } else {
        info!(
            "Non-compliant settings: {}",
            verdict.failing_fields().join(", ")
        );
        RunStatus::SettingError
    };
    info!("Checked {scenario} settings for model `{model}`: {status}");

    Evaluation {
        status,
        verdict,
        model: model.to_string(),
        scenario: Some(scenario.to_string()),
        settings_fingerprint: Some(fingerprint),
        error: None,
    }
}

fn resolve_scenario<'a>(
    settings: &'a EffectiveSettings,
    specification: &'a Specification,
) -> Result<(&'a str, &'a ScenarioRequirements), ParseError> {
    let name = match settings.scenario() {
        Some(SettingValue::Text(name)) => name,
        Some(other) => return Err(ParseError::UnknownScenario(other.to_string())),
        None => return Err(ParseError::MissingScenario),
    };

    match specification.scenario(name) {
        Some(requirements) => Ok((name.as_str(), requirements)),
        None => {
            debug!(
                "Specified scenarios: {}",
                specification.scenario_names().join(", ")
            );
            Err(ParseError::UnknownScenario(name.clone()))
        }
    }
}

fn check_requirements(
    scenario: &str,
    requirements: &ScenarioRequirements,
    settings: &EffectiveSettings,
    model: &str,
) -> ComplianceVerdict {
    let known_scenario = scenario.parse::<Scenario>().ok();
    if known_scenario.is_none() {
        warn!("`{scenario}` is not a known scenario, scenario specific rules will not apply");
    }

    let mut fields = requirements
        .iter()
        .map(|(field, requirement)| {
            let input = RuleInput {
                field,
                scenario: known_scenario,
                model,
                requirement,
                observed: settings.get(field),
            };
            let complies = field == SCENARIO_FIELD || rule_for(field)(&input);
            debug!(
                "{field}: required {requirement:?}, found {:?}, complies: {complies}",
                input.observed
            );

            (field.clone(), complies)
        })
        .collect::<IndexMap<_, _>>();

    // The scenario was found, so it complies
    fields.insert(SCENARIO_FIELD.to_string(), true);

    ComplianceVerdict { fields }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn specification() -> Specification {
        serde_json::from_value(json!({
            "Offline": {
                "min_query_count": 1,
                "min_duration (ms)": 60000,
                "samples_per_query": 24576,
                "target_latency (ns)": {"resnet50-v1.5": 15000000},
                "qsl_rng_seed": 3133965575612453542u64
            },
            "Server": {
                "target_latency (ns)": {"resnet50-v1.5": 15000000, "mobilenet": 10000000},
                "min_query_count": {"resnet50-v1.5": 270336, "mobilenet": 270336},
                "min_duration (ms)": 60000,
                "min_sample_count": {"resnet50-v1.5": 270336}
            }
        }))
        .unwrap()
    }

    fn settings(fields: &[(&str, &str)]) -> EffectiveSettings {
        fields
            .iter()
            .map(|(k, v)| (k.to_string(), SettingValue::from_raw(v)))
            .collect()
    }

    fn offline() -> Vec<(&'static str, &'static str)> {
        vec![
            ("Scenario", "Offline"),
            ("min_query_count", "1"),
            ("min_duration (ms)", "600000"),
            ("samples_per_query", "24576"),
            ("target_latency (ns)", "0"),
            ("qsl_rng_seed", "3133965575612453542"),
        ]
    }

    fn server() -> Vec<(&'static str, &'static str)> {
        vec![
            ("Scenario", "Server"),
            ("target_latency (ns)", "15000000"),
            ("min_query_count", "270336"),
            ("min_duration (ms)", "60000"),
            ("min_sample_count", "300000"),
        ]
    }

    #[test]
    fn compliant_offline_run() {
        let evaluation = evaluate(&settings(&offline()), &specification(), "resnet50-v1.5");

        assert_eq!(evaluation.status, RunStatus::Compliant);
        assert_eq!(
            evaluation.verdict.iter().collect::<Vec<_>>(),
            vec![
                ("min_query_count", true),
                ("min_duration (ms)", true),
                ("samples_per_query", true),
                ("target_latency (ns)", true),
                ("qsl_rng_seed", true),
                ("Scenario", true),
            ]
        );
        assert_eq!(evaluation.scenario.as_deref(), Some("Offline"));
        assert!(evaluation.error.is_none());
    }

    #[test]
    fn single_violation_only_fails_that_field() {
        let mut fields = offline();
        fields[2] = ("min_duration (ms)", "59999");

        let evaluation = evaluate(&settings(&fields), &specification(), "resnet50-v1.5");

        assert_eq!(evaluation.status, RunStatus::SettingError);
        assert_eq!(
            evaluation.verdict.failing_fields().collect::<Vec<_>>(),
            vec!["min_duration (ms)"]
        );
        assert_eq!(evaluation.verdict.len(), 6);
    }

    #[test]
    fn missing_field_fails_without_panicking() {
        let fields = offline()
            .into_iter()
            .filter(|(k, _)| *k != "qsl_rng_seed")
            .collect::<Vec<_>>();

        let evaluation = evaluate(&settings(&fields), &specification(), "resnet50-v1.5");

        assert_eq!(evaluation.status, RunStatus::SettingError);
        assert_eq!(evaluation.verdict.get("qsl_rng_seed"), Some(false));
    }

    #[test]
    fn compliant_server_run() {
        let evaluation = evaluate(&settings(&server()), &specification(), "resnet50-v1.5");
        assert_eq!(evaluation.status, RunStatus::Compliant);
    }

    #[test]
    fn server_model_missing_from_latency_mapping() {
        let evaluation = evaluate(&settings(&server()), &specification(), "ssd-large");

        assert_eq!(evaluation.status, RunStatus::SettingError);
        assert_eq!(evaluation.verdict.get("target_latency (ns)"), Some(false));
        assert_eq!(evaluation.verdict.get("Scenario"), Some(true));
    }

    #[test]
    fn per_model_fields_check_their_own_mapping() {
        // mobilenet has a latency and query count requirement but no sample count requirement
        let mut fields = server();
        fields[1] = ("target_latency (ns)", "10000000");

        let evaluation = evaluate(&settings(&fields), &specification(), "mobilenet");

        assert_eq!(evaluation.verdict.get("target_latency (ns)"), Some(true));
        assert_eq!(evaluation.verdict.get("min_query_count"), Some(true));
        assert_eq!(evaluation.verdict.get("min_sample_count"), Some(false));
    }

    #[test]
    fn unknown_scenario_is_a_parse_error() {
        let mut fields = offline();
        fields[0] = ("Scenario", "SingleStream");

        let evaluation = evaluate(&settings(&fields), &specification(), "resnet50-v1.5");

        assert_eq!(evaluation.status, RunStatus::ParseError);
        assert!(evaluation.verdict.is_empty());
        assert_eq!(
            evaluation.error,
            Some(ParseError::UnknownScenario("SingleStream".to_string()))
        );
    }

    #[test]
    fn scenario_lookup_is_case_sensitive() {
        let mut fields = offline();
        fields[0] = ("Scenario", "offline");

        let evaluation = evaluate(&settings(&fields), &specification(), "resnet50-v1.5");
        assert_eq!(evaluation.status, RunStatus::ParseError);
    }

    #[test]
    fn missing_scenario_is_a_parse_error() {
        let evaluation = evaluate(
            &settings(&[("min_duration (ms)", "60000")]),
            &specification(),
            "resnet50-v1.5",
        );

        assert_eq!(evaluation.status, RunStatus::ParseError);
        assert_eq!(evaluation.error, Some(ParseError::MissingScenario));
        assert!(evaluation.settings_fingerprint.is_some());
    }

    #[test]
    fn scenario_field_in_specification_still_complies() {
        let specification: Specification = serde_json::from_value(json!({
            "Offline": {"Scenario": "Something else", "min_query_count": 1}
        }))
        .unwrap();

        let evaluation = evaluate(&settings(&offline()), &specification, "any");

        assert_eq!(evaluation.status, RunStatus::Compliant);
        assert_eq!(
            evaluation.verdict.iter().collect::<Vec<_>>(),
            vec![("Scenario", true), ("min_query_count", true)]
        );
    }

    #[test]
    fn unrecognised_scenario_name_uses_general_rules() {
        let specification: Specification = serde_json::from_value(json!({
            "Batch": {"target_latency (ns)": 5, "min_query_count": 10}
        }))
        .unwrap();

        let evaluation = evaluate(
            &settings(&[("Scenario", "Batch"), ("min_query_count", "10")]),
            &specification,
            "any",
        );

        // Latency is only constrained for MultiStream and Server
        assert_eq!(evaluation.status, RunStatus::Compliant);
    }

    #[test]
    fn verify_reports_extraction_failure() {
        let lines = ["no markers here"];
        let evaluation = verify(&lines, &specification(), "resnet50-v1.5");

        assert_eq!(evaluation.status, RunStatus::ParseError);
        assert!(evaluation.verdict.is_empty());
        assert!(evaluation.settings_fingerprint.is_none());
        assert!(matches!(evaluation.error, Some(ParseError::MissingMarker(_))));
    }

    #[test]
    fn evaluation_is_deterministic() {
        let first = evaluate(&settings(&server()), &specification(), "resnet50-v1.5");
        let second = evaluate(&settings(&server()), &specification(), "resnet50-v1.5");
        assert_eq!(first, second);
    }

    #[test]
    fn status_tokens_and_exit_codes() {
        assert_eq!(RunStatus::Compliant.to_string(), "COMPLIANT");
        assert_eq!(RunStatus::SettingError.to_string(), "SETTING_ERROR");
        assert_eq!(RunStatus::ParseError.to_string(), "PARSE_ERROR");
        assert_eq!(
            serde_json::to_value(RunStatus::SettingError).unwrap(),
            json!("SETTING_ERROR")
        );

        assert_eq!(RunStatus::Compliant.exit_code(), 0);
        assert_ne!(RunStatus::SettingError.exit_code(), 0);
        assert_ne!(RunStatus::ParseError.exit_code(), 0);
        assert_ne!(
            RunStatus::SettingError.exit_code(),
            RunStatus::ParseError.exit_code()
        );
    }
}
