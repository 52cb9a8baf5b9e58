//! # Sanity Index Analytics Engine
//!
//! This crate turns raw monthly macro/market series into comparable 0-100
//! stress scores and combines them into section sub-indices and a headline
//! composite (50 = baseline, higher = more stress).
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It does no I/O and depends
//!   only on `core-types` and `configuration`.
//! - **Stateless Calculation:** `CompositeEngine` holds nothing but its
//!   immutable config. Each `compute` call rebuilds every series from the
//!   observations it is given.
//! - **Missing data is expected:** undefined values (short windows, zero
//!   variance, zero denominators) flow through as `None` and are absorbed by
//!   per-month weight renormalisation instead of raising errors.
//!
//! ## Public API
//!
//! - `CompositeEngine`: runs the full indicator -> section -> headline pipeline.
//! - `CompositeReport`: the aligned section, raw and smoothed headline series.
//! - `score_indicator`, `aggregate`, `ewma`, `momentum_label`: the building blocks.
//! - `AnalyticsError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod aggregate;
pub mod engine;
pub mod error;
pub mod momentum;
pub mod normalise;
pub mod report;
pub mod rolling;
pub mod scorer;
pub mod smoothing;
pub mod transform;

// Re-export the key components to create a clean, public-facing API.
pub use aggregate::{aggregate, weighted_mean, WeightedSeries};
pub use engine::CompositeEngine;
pub use error::AnalyticsError;
pub use momentum::momentum_label;
pub use normalise::{minmax_normalise, normalise, zscore_normalise};
pub use report::{CompositeReport, IndicatorScores, SectionScores, SkippedIndicator};
pub use scorer::score_indicator;
pub use smoothing::ewma;
pub use transform::apply_transform;
