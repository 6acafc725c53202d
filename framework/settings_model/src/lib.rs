//! Data model shared by the settings compliance verifier.
//!
//! [EffectiveSettings] holds what a benchmark harness reported it actually ran with, and
//! [Specification] holds what each scenario is required to run with.

mod settings;
mod specification;

pub use settings::{EffectiveSettings, SettingValue, SCENARIO_FIELD};
pub use specification::{
    load_specification, load_specification_from_reader, Requirement, ScenarioRequirements,
    Specification,
};
