//! Settings loading.
//!
//! Sources, lowest precedence first:
//! 1. Built-in defaults (`Settings::default`)
//! 2. TOML file (`<config dir>/ycs3/config.toml` unless overridden)
//! 3. `YANDEX_CLOUD_*` environment variables

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use tracing::debug;
use ycs3_domain::{ConfigurationError, Settings};

/// Prefix of the environment variables read into [`Settings`].
pub const ENV_PREFIX: &str = "YANDEX_CLOUD";

/// Default location of the settings file, if a config directory exists.
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("ycs3").join("config.toml"))
}

/// Layers defaults, an optional TOML file and the environment into
/// [`Settings`].
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    file: Option<PathBuf>,
    file_required: bool,
    env: Option<HashMap<String, String>>,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    /// Loader reading the default file (if present) and the process
    /// environment.
    #[must_use]
    pub fn new() -> Self {
        Self {
            file: default_config_path(),
            file_required: false,
            env: None,
        }
    }

    /// Reads `path` instead of the default file. The file must exist.
    #[must_use]
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.file = Some(path.as_ref().to_path_buf());
        self.file_required = true;
        self
    }

    /// Skips the settings file entirely.
    #[must_use]
    pub fn without_file(mut self) -> Self {
        self.file = None;
        self
    }

    /// Reads variables from `vars` instead of the process environment.
    #[must_use]
    pub fn with_env(mut self, vars: HashMap<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::Load`] if a required file is missing or
    /// any source cannot be parsed into [`Settings`].
    pub fn load(&self) -> Result<Settings, ConfigurationError> {
        let mut builder = Config::builder();

        if let Some(path) = &self.file {
            debug!(path = %path.display(), required = self.file_required, "settings file");
            builder = builder.add_source(
                File::from(path.as_path())
                    .format(FileFormat::Toml)
                    .required(self.file_required),
            );
        }

        let settings: Settings = builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .try_parsing(true)
                    .source(self.env.clone()),
            )
            .build()
            .map_err(load_error)?
            .try_deserialize()
            .map_err(load_error)?;

        debug!(
            endpoint = %settings.endpoint,
            region = %settings.region,
            has_token = settings.oauth_token.is_some(),
            "settings loaded"
        );
        Ok(settings)
    }
}

fn load_error(e: config::ConfigError) -> ConfigurationError {
    ConfigurationError::Load(e.to_string())
}
