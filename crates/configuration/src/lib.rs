use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
#[cfg(feature = "clap")]
pub mod overrides;
pub mod settings;

// Re-export the core types to provide a clean public API.
#[cfg(feature = "clap")]
pub use overrides::Overrides;
pub use error::ConfigError;
pub use settings::{AnalysisSettings, Config, DataSettings};

/// Prefix of the environment variables read on top of the file, e.g.
/// `LENS__ANALYSIS__RISK_FREE_RATE=0.07`.
pub const ENV_PREFIX: &str = "LENS";

/// Loads the application configuration.
///
/// Values come from, in increasing priority: built-in defaults, the TOML file at
/// `path` (skipped when it does not exist), and `LENS__*` environment variables.
/// The result is validated before it is returned.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_with_env(path, None)
}

fn load_with_env(
    path: &Path,
    env: Option<config::Map<String, String>>,
) -> Result<Config, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(env),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(
        path = %path.display(),
        risk_free_rate = config.analysis.risk_free_rate,
        period = %config.data.period,
        "Loaded configuration"
    );

    Ok(config)
}
