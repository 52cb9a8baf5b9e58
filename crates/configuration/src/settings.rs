use core_types::{Direction, NormaliseMethod, Transform};
use serde::{Deserialize, Serialize};

/// The root configuration structure for the stress index.
///
/// Loaded once at startup and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Ordered sections; each one becomes a sub-index and a headline input.
    pub sections: Vec<SectionSpec>,
    #[serde(default)] // Use default smoothing if the [composite] section is missing
    pub composite: CompositeSpec,
}

impl Config {
    /// Every indicator id referenced by any section, in config order.
    pub fn indicator_ids(&self) -> Vec<String> {
        self.sections
            .iter()
            .flat_map(|s| s.indicators.iter().map(|i| i.id.clone()))
            .collect()
    }

    pub fn span_months(&self) -> usize {
        self.composite.smoothing.span_months
    }
}

/// A named, weighted group of indicators.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SectionSpec {
    pub id: String,
    /// Weight of this section in the headline composite.
    pub weight: f64,
    pub indicators: Vec<IndicatorSpec>,
}

impl SectionSpec {
    /// Configured weight of the indicator at `index`, defaulting to 1/N.
    pub fn indicator_weight(&self, index: usize) -> f64 {
        self.indicators
            .get(index)
            .and_then(|i| i.section_weight)
            .unwrap_or(1.0 / self.indicators.len().max(1) as f64)
    }
}

/// Per-indicator scoring parameters.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct IndicatorSpec {
    /// Must match a `series_id` in the input for the indicator to contribute.
    pub id: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub direction: Direction,
    /// Weight inside the section. Defaults to 1/N of the configured indicators.
    #[serde(default)]
    pub section_weight: Option<f64>,
    #[serde(default)]
    pub normalise: Option<NormaliseSpec>,
}

impl IndicatorSpec {
    /// A `level`, `higher_is_worse` indicator with default normalisation.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            transform: Transform::Level,
            direction: Direction::HigherIsWorse,
            section_weight: None,
            normalise: None,
        }
    }

    /// The normalisation block, or the zscore default when none was given.
    pub fn normalise_or_default(&self) -> NormaliseSpec {
        self.normalise.clone().unwrap_or_default()
    }
}

/// Rolling normalisation parameters. Unset fields fall back per method.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct NormaliseSpec {
    #[serde(default)]
    pub method: NormaliseMethod,
    #[serde(default)]
    pub window_months: Option<usize>,
    #[serde(default)]
    pub clip: Option<f64>,
    #[serde(default)]
    pub z_to_100_sigma: Option<f64>,
}

pub const DEFAULT_ZSCORE_WINDOW: usize = 12;
pub const DEFAULT_MINMAX_WINDOW: usize = 60;
pub const DEFAULT_CLIP: f64 = 3.0;
pub const DEFAULT_Z_TO_100_SIGMA: f64 = 2.0;
pub const DEFAULT_SPAN_MONTHS: usize = 3;

impl NormaliseSpec {
    pub fn zscore(window_months: usize, clip: f64, z_to_100_sigma: f64) -> Self {
        Self {
            method: NormaliseMethod::Zscore,
            window_months: Some(window_months),
            clip: Some(clip),
            z_to_100_sigma: Some(z_to_100_sigma),
        }
    }

    pub fn minmax(window_months: usize) -> Self {
        Self {
            method: NormaliseMethod::Minmax,
            window_months: Some(window_months),
            clip: None,
            z_to_100_sigma: None,
        }
    }

    pub fn window(&self) -> usize {
        self.window_months.unwrap_or(match self.method {
            NormaliseMethod::Zscore => DEFAULT_ZSCORE_WINDOW,
            NormaliseMethod::Minmax => DEFAULT_MINMAX_WINDOW,
        })
    }

    pub fn clip(&self) -> f64 {
        self.clip.unwrap_or(DEFAULT_CLIP)
    }

    pub fn z_to_100_sigma(&self) -> f64 {
        self.z_to_100_sigma.unwrap_or(DEFAULT_Z_TO_100_SIGMA)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct CompositeSpec {
    #[serde(default)]
    pub smoothing: SmoothingSpec,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SmoothingSpec {
    #[serde(default = "default_span_months")]
    pub span_months: usize,
}

fn default_span_months() -> usize {
    DEFAULT_SPAN_MONTHS
}

impl Default for SmoothingSpec {
    fn default() -> Self {
        Self {
            span_months: DEFAULT_SPAN_MONTHS,
        }
    }
}
