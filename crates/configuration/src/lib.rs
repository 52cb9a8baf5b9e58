use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;
pub mod validation;

// Re-export the core types to provide a clean public API.
pub use config::FileFormat;
pub use settings::{Config, CompositeSpec, IndicatorSpec, NormaliseSpec, SectionSpec, SmoothingSpec};
pub use validation::validate_config;

/// Loads and validates the stress-index configuration from `path`.
///
/// The file format follows the extension (`.json` or `.toml`). Structural
/// problems fail here, before any data is touched.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let builder = config::Config::builder()
        .add_source(config::File::from(path))
        .build()?;

    finish(builder)
}

/// Loads and validates a configuration document held in memory.
pub fn load_config_str(content: &str, format: config::FileFormat) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(content, format))
        .build()?;

    finish(builder)
}

fn finish(builder: config::Config) -> Result<Config, ConfigError> {
    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;

    validate_config(&config).map_err(ConfigError::ValidationError)?;

    tracing::debug!(
        sections = config.sections.len(),
        indicators = config.indicator_ids().len(),
        "Configuration loaded"
    );
    Ok(config)
}
