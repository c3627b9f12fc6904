use crate::error::{RecipeError, Result};
use crate::paths;
use crate::types::SortOrder;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Delay presets offered for auto-advance, in seconds.
pub const DELAY_PRESETS: &[u32] = &[0, 5, 15, 30, 60];

const MAX_SANE_DELAY_SECS: u32 = 3600;

// ---------------------------------------------------------------------------
// ConfigWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// WalkthroughConfig
// ---------------------------------------------------------------------------

/// Timer behaviour for a walkthrough session.
///
/// When `auto_advance` is set, cooking-step countdowns start on their own and
/// an expired countdown moves to the next step after
/// `auto_advance_delay_seconds`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkthroughConfig {
    #[serde(default, alias = "timer_starts_automatically")]
    pub auto_advance: bool,
    #[serde(default, alias = "timer_delay")]
    pub auto_advance_delay_seconds: u32,
}

impl Default for WalkthroughConfig {
    fn default() -> Self {
        Self {
            auto_advance: false,
            auto_advance_delay_seconds: 0,
        }
    }
}

impl WalkthroughConfig {
    pub fn new(auto_advance: bool, auto_advance_delay_seconds: u32) -> Self {
        Self {
            auto_advance,
            auto_advance_delay_seconds,
        }
    }
}

// ---------------------------------------------------------------------------
// LibraryConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LibraryConfig {
    #[serde(default)]
    pub sort: SortOrder,
}

// ---------------------------------------------------------------------------
// Config (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub walkthrough: WalkthroughConfig,
    #[serde(default)]
    pub library: LibraryConfig,
}

fn default_version() -> u32 {
    1
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            walkthrough: WalkthroughConfig::default(),
            library: LibraryConfig::default(),
        }
    }
}

impl Config {
    pub fn load(root: &Path) -> Result<Self> {
        let path = paths::config_path(root);
        if !path.exists() {
            return Err(RecipeError::NotInitialized);
        }
        let data = std::fs::read_to_string(&path)?;
        let cfg: Config = serde_yaml::from_str(&data)?;
        Ok(cfg)
    }

    /// Load the config, falling back to defaults when the library has no
    /// config file yet.
    pub fn load_or_default(root: &Path) -> Result<Self> {
        match Self::load(root) {
            Ok(cfg) => Ok(cfg),
            Err(RecipeError::NotInitialized) => Ok(Self::default()),
            Err(e) => Err(e),
        }
    }

    pub fn save(&self, root: &Path) -> Result<()> {
        let path = paths::config_path(root);
        let data = serde_yaml::to_string(self)?;
        crate::io::atomic_write(&path, data.as_bytes())
    }

    /// Write the config only when the library has none yet. Returns true if
    /// a file was written.
    pub fn save_if_missing(&self, root: &Path) -> Result<bool> {
        let data = serde_yaml::to_string(self)?;
        crate::io::write_if_missing(&paths::config_path(root), data.as_bytes())
    }

    /// Set a single key from its string form. Returns `Ok(false)` for an
    /// unknown key.
    pub fn set(&mut self, key: &str, value: &str) -> Result<bool> {
        match key {
            "auto_advance" | "walkthrough.auto_advance" => {
                self.walkthrough.auto_advance = parse_bool(value)?;
            }
            "auto_advance_delay_seconds" | "delay" | "walkthrough.auto_advance_delay_seconds" => {
                self.walkthrough.auto_advance_delay_seconds = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid_value(key, value))?;
            }
            "sort" | "library.sort" => {
                self.library.sort = value.trim().parse()?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    pub fn validate(&self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let delay = self.walkthrough.auto_advance_delay_seconds;

        if delay > MAX_SANE_DELAY_SECS {
            warnings.push(ConfigWarning {
                level: WarnLevel::Error,
                message: format!(
                    "auto_advance_delay_seconds={delay} exceeds {MAX_SANE_DELAY_SECS}s"
                ),
            });
        } else if !DELAY_PRESETS.contains(&delay) {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!(
                    "auto_advance_delay_seconds={delay} is not one of the presets {DELAY_PRESETS:?}"
                ),
            });
        }

        if !self.walkthrough.auto_advance && delay > 0 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: "auto_advance_delay_seconds has no effect while auto_advance is off"
                    .to_string(),
            });
        }

        if self.version != 1 {
            warnings.push(ConfigWarning {
                level: WarnLevel::Warning,
                message: format!("unknown config version {}", self.version),
            });
        }

        warnings
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.trim() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        other => Err(invalid_value("auto_advance", other)),
    }
}

fn invalid_value(key: &str, value: &str) -> RecipeError {
    RecipeError::InvalidConfigValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn save_if_missing_keeps_existing_settings() {
        let dir = TempDir::new().unwrap();
        assert!(Config::default().save_if_missing(dir.path()).unwrap());

        let mut cfg = Config::load(dir.path()).unwrap();
        cfg.set("auto_advance", "true").unwrap();
        cfg.save(dir.path()).unwrap();

        assert!(!Config::default().save_if_missing(dir.path()).unwrap());
        assert!(Config::load(dir.path()).unwrap().walkthrough.auto_advance);
    }

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let yaml = serde_yaml::to_string(&cfg).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.version, 1);
        assert!(!parsed.walkthrough.auto_advance);
        assert_eq!(parsed.walkthrough.auto_advance_delay_seconds, 0);
        assert_eq!(parsed.library.sort, SortOrder::MostRecent);
    }

    #[test]
    fn missing_sections_use_defaults() {
        let cfg: Config = serde_yaml::from_str("version: 1\n").unwrap();
        assert_eq!(cfg.walkthrough, WalkthroughConfig::default());
        assert_eq!(cfg.library.sort, SortOrder::MostRecent);
    }

    #[test]
    fn legacy_setting_names_accepted() {
        let yaml = r#"
walkthrough:
  timer_starts_automatically: true
  timer_delay: 15
library:
  sort: alphabetical
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(cfg.walkthrough.auto_advance);
        assert_eq!(cfg.walkthrough.auto_advance_delay_seconds, 15);
        assert_eq!(cfg.library.sort, SortOrder::Alphabetical);
    }

    #[test]
    fn load_missing_is_not_initialized() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            Config::load(dir.path()),
            Err(RecipeError::NotInitialized)
        ));
        let cfg = Config::load_or_default(dir.path()).unwrap();
        assert_eq!(cfg.version, 1);
    }

    #[test]
    fn save_then_load() {
        let dir = TempDir::new().unwrap();
        let mut cfg = Config::default();
        cfg.walkthrough = WalkthroughConfig::new(true, 5);
        cfg.save(dir.path()).unwrap();

        let loaded = Config::load(dir.path()).unwrap();
        assert_eq!(loaded.walkthrough, WalkthroughConfig::new(true, 5));
    }

    #[test]
    fn set_known_keys() {
        let mut cfg = Config::default();
        assert!(cfg.set("auto_advance", "yes").unwrap());
        assert!(cfg.set("delay", "30").unwrap());
        assert!(cfg.set("sort", "alphabetical").unwrap());
        assert!(cfg.walkthrough.auto_advance);
        assert_eq!(cfg.walkthrough.auto_advance_delay_seconds, 30);
        assert_eq!(cfg.library.sort, SortOrder::Alphabetical);
    }

    #[test]
    fn set_unknown_key_or_bad_value() {
        let mut cfg = Config::default();
        assert!(!cfg.set("theme", "dark").unwrap());
        assert!(cfg.set("auto_advance", "maybe").is_err());
        assert!(cfg.set("delay", "-5").is_err());
        assert!(cfg.set("sort", "by-color").is_err());
    }

    #[test]
    fn validate_default_no_warnings() {
        assert!(Config::default().validate().is_empty());
    }

    #[test]
    fn validate_off_preset_delay() {
        let mut cfg = Config::default();
        cfg.walkthrough = WalkthroughConfig::new(true, 7);
        let warnings = cfg.validate();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("not one of the presets"));
        assert_eq!(warnings[0].level, WarnLevel::Warning);
    }

    #[test]
    fn validate_delay_without_auto_advance() {
        let mut cfg = Config::default();
        cfg.walkthrough = WalkthroughConfig::new(false, 5);
        let warnings = cfg.validate();
        assert!(warnings
            .iter()
            .any(|w| w.message.contains("no effect while auto_advance is off")));
    }

    #[test]
    fn validate_huge_delay_is_error() {
        let mut cfg = Config::default();
        cfg.walkthrough = WalkthroughConfig::new(true, 7200);
        let warnings = cfg.validate();
        assert!(warnings.iter().any(|w| w.level == WarnLevel::Error));
    }
}
