//! Configuration management for the intpack tool
use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use intpack::FormatTag;
use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::EnvFilter;

mod error;

pub use error::IntpackConfigError;

/// Default filter directives when neither the config nor `RUST_LOG` set any.
pub const DEFAULT_LOG_DIRECTIVES: &str = "info,intpack=debug";

/// Trait for validating configuration values.
trait Validatable {
    /// Validate the configuration values.
    fn validate(&self, cfg: &Settings) -> Result<(), ConfigError>;
}

/// Top-level configuration for the intpack tool
#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    /// Packing and unpacking configuration
    pub pack: PackConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Settings for the `pack` and `unpack` commands.
#[derive(Deserialize, Clone, Debug)]
pub struct PackConfig {
    /// The largest container payload, in bytes, that will be decoded.
    pub alloc_bytes_limit: u64,
    /// Format forced when packing without an explicit `--format`.
    pub default_format: Option<FormatTag>,
}

impl Validatable for PackConfig {
    fn validate(&self, _: &Settings) -> Result<(), ConfigError> {
        if self.alloc_bytes_limit == 0 {
            return Err(ConfigError::Message(
                IntpackConfigError::ZeroAllocationLimit.to_string(),
            ));
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Deserialize, Clone, Debug)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directives.
    pub directives: String,
}

impl Validatable for LoggingConfig {
    fn validate(&self, _: &Settings) -> Result<(), ConfigError> {
        if let Err(err) = EnvFilter::try_new(&self.directives) {
            let err = IntpackConfigError::InvalidLogDirectives(self.directives.clone(), err);
            return Err(ConfigError::Message(err.to_string()));
        }

        Ok(())
    }
}

impl Settings {
    /// Initializing the global config first with default values, then with
    /// the optional config file and finally with environment variables.
    ///
    /// The environment variables are prefixed with `INTPACK_` and the nested
    /// fields are separated with double underscores. For example, the path
    /// `pack.alloc_bytes_limit` is parsed as following:
    ///
    /// ```text
    /// INTPACK_PACK__ALLOC_BYTES_LIMIT
    /// ^^^^^^^ ^^^^  ^^^^^^^^^^^^^^^^^
    ///    │   ^  │ ^^       │
    ///    │   │  │ │        └ The `alloc_bytes_limit` field of the `pack` object
    ///    │   │  │ └ separator("__")
    ///    │   │  └ The `pack` field of the root object (`Settings`)
    ///    │   └ prefix_separator("_")
    ///    └ with_prefix("INTPACK")
    /// ```
    pub fn new(config_path: Option<impl AsRef<Path>>) -> Result<Self, ConfigError> {
        Self::build(config_path, None)
    }

    /// Same as [`Settings::new`], but reads environment overrides from
    /// `env` instead of the process environment.
    pub fn new_with_env(
        config_path: Option<impl AsRef<Path>>,
        env: config::Map<String, String>,
    ) -> Result<Self, ConfigError> {
        Self::build(config_path, Some(env))
    }

    fn build(
        config_path: Option<impl AsRef<Path>>,
        env_source: Option<config::Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let env = Environment::with_prefix("INTPACK")
            .separator("__")
            .try_parsing(true)
            .prefix_separator("_")
            .source(env_source);

        let mut cfg_builder = Config::builder();

        cfg_builder = cfg_builder.set_default("pack.alloc_bytes_limit", intpack::ALLOC_BYTES_LIMIT)?;
        cfg_builder = cfg_builder.set_default("logging.directives", DEFAULT_LOG_DIRECTIVES)?;

        if let Some(path) = config_path {
            cfg_builder = cfg_builder.add_source(File::from(path.as_ref()));
        }
        cfg_builder = cfg_builder.add_source(env);

        let cfg = cfg_builder.build()?;

        let settings: Settings = cfg.try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    /// Perform validation on the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        self.pack.validate(self)?;
        self.logging.validate(self)?;

        Ok(())
    }
}
