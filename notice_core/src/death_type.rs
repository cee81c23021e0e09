//! Mapping from attribution cause to message category.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::attribution::DeathCause;

/// The bucket used to pick a phrasing template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DeathCategory {
    Suicide,
    PvP,
    Turret,
    Grid,
    #[serde(rename = "Environment_Oxygen")]
    EnvironmentOxygen,
    #[serde(rename = "Environment_Pressure")]
    EnvironmentPressure,
    #[serde(rename = "Environment_Collision")]
    EnvironmentCollision,
    Accident,
}

impl DeathCategory {
    pub const ALL: [DeathCategory; 8] = [
        DeathCategory::Suicide,
        DeathCategory::PvP,
        DeathCategory::Turret,
        DeathCategory::Grid,
        DeathCategory::EnvironmentOxygen,
        DeathCategory::EnvironmentPressure,
        DeathCategory::EnvironmentCollision,
        DeathCategory::Accident,
    ];

    /// Parse a template configuration key. Case-insensitive.
    pub fn from_key(key: &str) -> Option<Self> {
        DeathCategory::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(key.trim()))
    }

    /// The key used in template configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            DeathCategory::Suicide => "Suicide",
            DeathCategory::PvP => "PvP",
            DeathCategory::Turret => "Turret",
            DeathCategory::Grid => "Grid",
            DeathCategory::EnvironmentOxygen => "Environment_Oxygen",
            DeathCategory::EnvironmentPressure => "Environment_Pressure",
            DeathCategory::EnvironmentCollision => "Environment_Collision",
            DeathCategory::Accident => "Accident",
        }
    }
}

impl fmt::Display for DeathCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a cause to its category. Total over [`DeathCause`].
pub fn classify(cause: DeathCause) -> DeathCategory {
    match cause {
        DeathCause::Player => DeathCategory::PvP,
        DeathCause::Turret | DeathCause::NpcFaction => DeathCategory::Turret,
        DeathCause::Collision => DeathCategory::Grid,
        DeathCause::Fall | DeathCause::Environment => DeathCategory::EnvironmentCollision,
        DeathCause::Oxygen => DeathCategory::EnvironmentOxygen,
        DeathCause::Pressure => DeathCategory::EnvironmentPressure,
        DeathCause::Suicide => DeathCategory::Suicide,
        DeathCause::Unknown => DeathCategory::Accident,
    }
}

/// Classify a cause given by name, e.g. from an external event feed.
/// Names outside the enumeration are accidents.
pub fn classify_name(name: &str) -> DeathCategory {
    match name.parse::<DeathCause>() {
        Ok(cause) => classify(cause),
        Err(_) => DeathCategory::Accident,
    }
}
