//! Configuration source loading and composition

use crate::validation::Validate;
use crate::{ConfigResult, MoqueryConfig};
use std::path::Path;

/// Trait for layering configuration from different sources
pub trait ConfigurationSource {
    /// Apply this source's values on top of `config`
    ///
    /// Values the source does not mention must be left as they are. On error
    /// `config` must be unchanged.
    ///
    /// # Errors
    /// Returns configuration loading errors
    fn apply(&self, config: &mut MoqueryConfig) -> ConfigResult<()>;

    /// Get the name of this configuration source
    fn name(&self) -> &str;

    /// Get the priority of this source (higher number = higher priority)
    fn priority(&self) -> u8;
}

/// Override configuration from the `MOQUERY_*` variables that are set
pub struct EnvironmentSource;

impl ConfigurationSource for EnvironmentSource {
    fn apply(&self, config: &mut MoqueryConfig) -> ConfigResult<()> {
        config.apply_env();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "environment"
    }

    fn priority(&self) -> u8 {
        100 // environment variables override everything
    }
}

/// Load configuration from a TOML file
///
/// Sections and keys left out of the file keep the values configured so far.
pub struct TomlFileSource {
    path: std::path::PathBuf,
}

impl TomlFileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ConfigurationSource for TomlFileSource {
    fn apply(&self, config: &mut MoqueryConfig) -> ConfigResult<()> {
        let content = std::fs::read_to_string(&self.path)?;
        let overlay: toml::Table = content.parse()?;

        let mut merged = toml::Table::try_from(&*config)?;
        merge_tables(&mut merged, overlay);
        *config = toml::Value::Table(merged).try_into()?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "toml_file"
    }

    fn priority(&self) -> u8 {
        50
    }
}

/// Deep-merge `overlay` into `base`; overlay scalars and arrays win
fn merge_tables(base: &mut toml::Table, overlay: toml::Table) {
    for (key, value) in overlay {
        if let toml::Value::Table(incoming) = value {
            if let Some(toml::Value::Table(existing)) = base.get_mut(&key) {
                merge_tables(existing, incoming);
            } else {
                base.insert(key, toml::Value::Table(incoming));
            }
        } else {
            base.insert(key, value);
        }
    }
}

/// Type alias for configuration sources
type ConfigSources = Vec<Box<dyn ConfigurationSource>>;

/// Configuration loader that combines multiple sources
pub struct ConfigurationLoader {
    sources: ConfigSources,
}

impl ConfigurationLoader {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn add_source(mut self, source: Box<dyn ConfigurationSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// Layer all sources over the defaults, lowest priority first
    ///
    /// Each source overrides only the values it carries, so a key set by a
    /// higher-priority source wins. Sources that fail are logged and skipped.
    ///
    /// # Errors
    /// Returns validation errors for the resulting configuration
    pub fn load(&self) -> ConfigResult<MoqueryConfig> {
        let mut config = MoqueryConfig::default();

        // Lowest priority first so higher priorities overwrite
        let mut sorted_sources = self.sources.iter().collect::<Vec<_>>();
        sorted_sources.sort_by_key(|source| source.priority());

        for source in sorted_sources {
            match source.apply(&mut config) {
                Ok(()) => {
                    tracing::debug!("Applied configuration from source: {}", source.name());
                }
                Err(e) => {
                    tracing::warn!("Failed to load from source {}: {}", source.name(), e);
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

impl Default for ConfigurationLoader {
    fn default() -> Self {
        Self::new()
    }
}
