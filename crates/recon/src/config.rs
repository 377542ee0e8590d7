use serde::{Deserialize, Serialize};

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run configuration, usually loaded from `roster.toml`.
///
/// Every section is optional; an empty file yields the stock file names and
/// the lenient cleaning policies.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RosterConfig {
    #[serde(default)]
    pub inputs: InputConfig,
    #[serde(default)]
    pub outputs: OutputConfig,
    #[serde(default)]
    pub cleaning: CleanOptions,
}

// ---------------------------------------------------------------------------
// Inputs + Outputs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InputConfig {
    #[serde(default = "default_inventory")]
    pub inventory: String,
    #[serde(default = "default_majors")]
    pub majors: String,
    #[serde(default = "default_occupancy")]
    pub occupancy: String,
    #[serde(default = "default_persons")]
    pub persons: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            inventory: default_inventory(),
            majors: default_majors(),
            occupancy: default_occupancy(),
            persons: default_persons(),
        }
    }
}

fn default_inventory() -> String {
    "inventory_data.csv".into()
}

fn default_majors() -> String {
    "majors_data.csv".into()
}

fn default_occupancy() -> String {
    "occupancy_data.csv".into()
}

fn default_persons() -> String {
    "persons_data.csv".into()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    #[serde(default = "default_dir")]
    pub dir: String,
    #[serde(default = "default_with_bookings")]
    pub with_bookings: String,
    #[serde(default = "default_without_bookings")]
    pub without_bookings: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_dir(),
            with_bookings: default_with_bookings(),
            without_bookings: default_without_bookings(),
        }
    }
}

fn default_dir() -> String {
    ".".into()
}

fn default_with_bookings() -> String {
    "person_with_bookings.csv".into()
}

fn default_without_bookings() -> String {
    "person_without_bookings.csv".into()
}

// ---------------------------------------------------------------------------
// Cleaning policies
// ---------------------------------------------------------------------------

/// Policies shared by both cleaning passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CleanOptions {
    #[serde(default)]
    pub dob: DobPolicy,
    #[serde(default)]
    pub address2: Address2Policy,
}

/// What to do with a date of birth that is missing or does not parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DobPolicy {
    /// Keep the row, blank the dob.
    #[default]
    Lenient,
    /// Drop the row.
    Strict,
}

/// How `address2` is rendered when city or state is missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Address2Policy {
    /// Always `"{city}, {state}"`, with `None` standing in for a missing part.
    #[default]
    Legacy,
    /// Leave `address2` absent unless both parts are present.
    Strict,
}

impl std::fmt::Display for DobPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lenient => write!(f, "lenient"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

impl std::fmt::Display for Address2Policy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Legacy => write!(f, "legacy"),
            Self::Strict => write!(f, "strict"),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl RosterConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: RosterConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let named = [
            ("inputs.inventory", &self.inputs.inventory),
            ("inputs.majors", &self.inputs.majors),
            ("inputs.occupancy", &self.inputs.occupancy),
            ("inputs.persons", &self.inputs.persons),
            ("outputs.dir", &self.outputs.dir),
            ("outputs.with_bookings", &self.outputs.with_bookings),
            ("outputs.without_bookings", &self.outputs.without_bookings),
        ];
        for (key, value) in named {
            if value.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!("{key} must not be empty")));
            }
        }

        if self.outputs.with_bookings == self.outputs.without_bookings {
            return Err(ReconError::ConfigValidation(format!(
                "outputs.with_bookings and outputs.without_bookings both name '{}'",
                self.outputs.with_bookings
            )));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
