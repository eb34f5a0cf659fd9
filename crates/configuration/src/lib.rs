use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod pot_name;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use logging::init_logging;
pub use pot_name::{parse_pot_name, ResolvedPotName};
pub use settings::{ApiConfig, Config, EngineConfig, LoggingConfig, ACCESS_TOKEN_ENV};

/// Loads the application configuration from a TOML file plus `APP__` environment overrides.
///
/// The file is optional: every section has defaults, so a missing file yields the
/// default configuration (dry-run enabled). The result is validated before it is returned.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path.as_ref()).required(false))
        // e.g. `APP__ENGINE__DRY_RUN=false`
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    Ok(config)
}
