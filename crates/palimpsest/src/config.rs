//! Layered configuration loading.
//!
//! - Bundled defaults (include_str! from palimpsest.toml)
//! - User overrides (~/.config/palimpsest/palimpsest.toml, then ./palimpsest.toml)
//! - Later sources override earlier ones key by key

use config::{Config, File, FileFormat};
use palimpsest_error::{ConfigError, PalimpsestError, PalimpsestResult};
use palimpsest_session::SessionConfig;
use palimpsest_tree::LayoutConfig;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../../../palimpsest.toml");

/// Top-level Palimpsest configuration.
///
/// # Example
///
/// ```no_run
/// use palimpsest::PalimpsestConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = PalimpsestConfig::load()?;
/// println!("Node width: {}", config.tree.node_width());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PalimpsestConfig {
    /// Edit session and run dispatch settings
    #[serde(default)]
    pub session: SessionConfig,

    /// Version tree geometry
    #[serde(default)]
    pub tree: LayoutConfig,
}

impl PalimpsestConfig {
    /// Load configuration from a specific file path, on top of nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> PalimpsestResult<Self> {
        debug!("Loading configuration from file");

        let built = Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                PalimpsestError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?;
        Self::deserialize_built(built)
    }

    /// The bundled defaults alone.
    pub fn bundled() -> PalimpsestResult<Self> {
        let built = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .map_err(|e| {
                PalimpsestError::from(ConfigError::new(format!(
                    "Failed to read bundled configuration: {}",
                    e
                )))
            })?;
        Self::deserialize_built(built)
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> PalimpsestResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/palimpsest/palimpsest.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("palimpsest").required(false));

        let built = builder.build().map_err(|e| {
            PalimpsestError::from(ConfigError::new(format!(
                "Failed to build configuration: {}",
                e
            )))
        })?;
        Self::deserialize_built(built)
    }

    fn deserialize_built(built: Config) -> PalimpsestResult<Self> {
        let config: Self = built.try_deserialize().map_err(|e| {
            PalimpsestError::from(ConfigError::new(format!(
                "Failed to parse configuration: {}",
                e
            )))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the layout and dispatcher cannot work with.
    pub fn validate(&self) -> PalimpsestResult<()> {
        if self.session.max_concurrent_runs() == &Some(0) {
            return Err(ConfigError::new("session.max_concurrent_runs must be at least 1").into());
        }
        let tree = &self.tree;
        for (name, value) in [
            ("tree.node_width", tree.node_width()),
            ("tree.node_height", tree.node_height()),
            ("tree.viewport_width", tree.viewport_width()),
            ("tree.viewport_height", tree.viewport_height()),
        ] {
            if *value <= 0.0 {
                return Err(ConfigError::new(format!("{} must be positive", name)).into());
            }
        }
        if *tree.horizontal_gap() < 0.0 || *tree.vertical_gap() < 0.0 {
            return Err(ConfigError::new("tree gaps must not be negative").into());
        }
        Ok(())
    }
}
