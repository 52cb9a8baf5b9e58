use serde::{Deserialize, Serialize};
use std::fmt;

/// The transform applied to an indicator's raw monthly values before scoring.
///
/// Unrecognised names are kept as `Unknown` and treated as a passthrough,
/// so a typo degrades to the raw level instead of failing the run.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Transform {
    #[default]
    Level,
    Delta,
    Mom,
    Yoy,
    Unknown(String),
}

impl Transform {
    pub fn as_str(&self) -> &str {
        match self {
            Transform::Level => "level",
            Transform::Delta => "delta",
            Transform::Mom => "mom",
            Transform::Yoy => "yoy",
            Transform::Unknown(name) => name,
        }
    }
}

impl From<String> for Transform {
    fn from(name: String) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "level" => Transform::Level,
            "delta" => Transform::Delta,
            "mom" => Transform::Mom,
            "yoy" => Transform::Yoy,
            _ => Transform::Unknown(name),
        }
    }
}

impl From<Transform> for String {
    fn from(transform: Transform) -> Self {
        transform.as_str().to_string()
    }
}

/// Natural polarity of an indicator. Scores always read "higher = more stress".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    HigherIsWorse,
    LowerIsWorse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormaliseMethod {
    #[default]
    Zscore,
    Minmax,
}

/// Read-only classification of the most recent state of a score series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Momentum {
    Worsening,
    Easing,
    Stable,
    Unknown,
}

impl fmt::Display for Momentum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Momentum::Worsening => "Worsening",
            Momentum::Easing => "Easing",
            Momentum::Stable => "Stable",
            Momentum::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}
