/// Host configuration
use aura_playback::{SessionConfig, SourceKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuraConfig {
    #[serde(default)]
    pub session: SessionConfig,

    #[serde(default = "default_renderer")]
    pub renderer: RendererSettings,

    /// Stored queue document to play
    #[serde(default)]
    pub queue_path: Option<PathBuf>,

    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

/// Behaviour of the simulated renderer
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RendererSettings {
    /// How long "buffering" takes before the renderer reports ready
    #[serde(default = "default_load_delay_ms")]
    pub load_delay_ms: u64,

    /// Kinds the renderer cannot embed; loads of these never become ready
    #[serde(default)]
    pub unsupported: Vec<SourceKind>,
}

impl AuraConfig {
    /// Load configuration from file and environment
    ///
    /// `path` defaults to `aura.toml` in the working directory; a missing
    /// default file is fine, a missing explicit one is not.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from("aura.toml");
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (e.g. AURA_SESSION__SIMULATE_PROGRESS)
        settings = settings.add_source(
            config::Environment::with_prefix("AURA")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: Self = settings.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.session.initial_volume) {
            return Err(ConfigError::Invalid(format!(
                "session.initial_volume must be within 0.0-1.0, got {}",
                self.session.initial_volume
            )));
        }

        if self.session.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "session.tick_interval_ms must be positive".to_string(),
            ));
        }

        if self.session.stall_timeout_ms == Some(0) {
            return Err(ConfigError::Invalid(
                "session.stall_timeout_ms must be positive when set".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_renderer() -> RendererSettings {
    RendererSettings {
        load_delay_ms: default_load_delay_ms(),
        unsupported: Vec::new(),
    }
}

fn default_load_delay_ms() -> u64 {
    300
}

fn default_log_filter() -> String {
    "aura=info,aura_playback=info".to_string()
}

impl Default for AuraConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            renderer: default_renderer(),
            queue_path: None,
            log_filter: default_log_filter(),
        }
    }
}
