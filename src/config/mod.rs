mod settings;

use config::{Config, ConfigError, Environment, File};

use settings::PartialSettings;

pub use settings::{LoggingSettings, RunnerSettings, Settings, TopologySettings};

/// Default configuration file, looked up relative to the working directory
/// with any extension the `config` crate understands.
pub const DEFAULT_CONFIG_FILE: &str = "config/default";

/// Prefix for environment overrides, e.g. `TOPICSUB_RUNNER__WAIT_TIMEOUT_MS`.
pub const ENV_PREFIX: &str = "TOPICSUB";

/// Loads the configuration from the default file and environment variables.
pub fn load_config() -> Result<Settings, ConfigError> {
    load_config_from(DEFAULT_CONFIG_FILE)
}

/// Loads `path` (optional) and the environment, merging the result with
/// default values.
pub fn load_config_from(path: &str) -> Result<Settings, ConfigError> {
    let builder = Config::builder()
        .add_source(File::with_name(path).required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    Ok(partial.merge(Settings::default()))
}
