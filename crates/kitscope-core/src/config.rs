use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{KitscopeError, Result};

/// Root application configuration, loaded from `~/.config/kitscope/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub matching: MatchingConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

/// Which duplicate detector a scan runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStrategy {
    /// Hash buckets on the coarse normalized key.
    #[default]
    Exact,
    /// Pairwise token-sort similarity within each equipment type.
    Fuzzy,
}

impl MatchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Fuzzy => "fuzzy",
        }
    }
}

impl fmt::Display for MatchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MatchStrategy {
    type Err = KitscopeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "fuzzy" => Ok(Self::Fuzzy),
            other => Err(KitscopeError::ConfigError(format!(
                "unknown match strategy '{other}' (expected 'exact' or 'fuzzy')"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub strategy: MatchStrategy,
    /// Fuzzy similarity threshold, 0..=100.
    pub threshold: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
    pub changes_file: String,
    pub review_file: String,
    pub mapping_file: String,
    pub updates_file: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `tracing_subscriber::EnvFilter` directive, overridden by `RUST_LOG`.
    pub filter: String,
}

// ─── Defaults ──────────────────────────────────────────────

pub const DEFAULT_THRESHOLD: u8 = 90;

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::default(),
            threshold: DEFAULT_THRESHOLD,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            changes_file: "suggested_changes.csv".to_string(),
            review_file: "duplicates_review.csv".to_string(),
            mapping_file: "manufacturer_mapping.csv".to_string(),
            updates_file: "manufacturer_updates.csv".to_string(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "kitscope=info".to_string(),
        }
    }
}

// ─── Load / Save ───────────────────────────────────────────

impl AppConfig {
    /// Standard config file path: `~/.config/kitscope/config.toml`
    pub fn config_path() -> PathBuf {
        if let Ok(path) = std::env::var("KITSCOPE_CONFIG") {
            return PathBuf::from(path);
        }

        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("~/.config"))
            .join("kitscope")
            .join("config.toml")
    }

    /// Load config from disk, falling back to defaults if file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        Self::load_from(&path)
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save config to the standard path.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        self.save_to(&path)
    }

    /// Save config to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_str)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.matching.threshold > 100 {
            return Err(KitscopeError::ConfigError(format!(
                "matching.threshold must be within 0..=100, got {}",
                self.matching.threshold
            )));
        }
        Ok(())
    }

    // ─── Derived paths ─────────────────────────────────────

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(&self.output.directory)
    }

    pub fn changes_path(&self) -> PathBuf {
        self.output_dir().join(&self.output.changes_file)
    }

    pub fn review_path(&self) -> PathBuf {
        self.output_dir().join(&self.output.review_file)
    }

    pub fn mapping_path(&self) -> PathBuf {
        self.output_dir().join(&self.output.mapping_file)
    }

    pub fn updates_path(&self) -> PathBuf {
        self.output_dir().join(&self.output.updates_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.matching.threshold, 90);
        assert_eq!(cfg.matching.strategy, MatchStrategy::Exact);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = AppConfig::default();
        cfg.matching.strategy = MatchStrategy::Fuzzy;
        cfg.matching.threshold = 85;
        cfg.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.matching.strategy, MatchStrategy::Fuzzy);
        assert_eq!(loaded.matching.threshold, 85);
        assert_eq!(loaded.output.changes_file, cfg.output.changes_file);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[matching]\nstrategy = \"fuzzy\"\n").unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.matching.strategy, MatchStrategy::Fuzzy);
        assert_eq!(loaded.matching.threshold, DEFAULT_THRESHOLD);
        assert_eq!(loaded.logging.filter, "kitscope=info");
    }

    #[test]
    fn test_out_of_range_threshold_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[matching]\nthreshold = 150\n").unwrap();

        let err = AppConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, KitscopeError::ConfigError(_)));
    }

    #[test]
    fn test_load_nonexistent_returns_default() {
        let cfg = AppConfig::load_from(Path::new("/tmp/nonexistent_kitscope_config.toml")).unwrap();
        assert_eq!(cfg.matching.threshold, 90);
    }

    #[test]
    fn test_strategy_parsing() {
        assert_eq!("Fuzzy".parse::<MatchStrategy>().unwrap(), MatchStrategy::Fuzzy);
        assert_eq!(" exact ".parse::<MatchStrategy>().unwrap(), MatchStrategy::Exact);
        assert!("levenshtein".parse::<MatchStrategy>().is_err());
    }

    #[test]
    fn test_derived_paths() {
        let mut cfg = AppConfig::default();
        cfg.output.directory = "/tmp/out".to_string();
        assert_eq!(cfg.changes_path(), PathBuf::from("/tmp/out/suggested_changes.csv"));
        assert!(cfg.review_path().ends_with("duplicates_review.csv"));
        assert!(cfg.mapping_path().ends_with("manufacturer_mapping.csv"));
        assert!(cfg.updates_path().ends_with("manufacturer_updates.csv"));
    }
}
