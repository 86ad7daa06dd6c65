//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. CLI flags (handled at the call-site, not here)
//! 2. `PRIMER__<SECTION>__<KEY>` environment variables
//! 3. `--config FILE`, or `.primer.toml` in the working directory over the
//!    user config file
//! 4. Built-in defaults (always present)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use primer_core::domain::{CodeStyle, Focus, Preferences};

/// File name of the per-project config written by `primer init --local`.
pub const LOCAL_CONFIG_FILE: &str = ".primer.toml";

/// Every key understood by `primer config get/set`.
pub const KEYS: &[&str] = &[
    "defaults.code_style",
    "defaults.focus",
    "defaults.generate_secondary",
    "output.no_color",
    "output.format",
    "templates.local_path",
    "security.strict",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Preferences applied when `generate` flags are absent.
    pub defaults: Defaults,
    pub output: OutputConfig,
    pub templates: TemplateConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    pub code_style: CodeStyle,
    pub focus: Focus,
    pub generate_secondary: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            code_style: CodeStyle::default(),
            focus: Focus::default(),
            generate_secondary: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
    /// `auto`, `human`, `plain` or `json`.
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            no_color: false,
            format: "auto".into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Directory of user templates; same ids override the built-ins.
    pub local_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    pub strict: bool,
}

impl AppConfig {
    /// Load configuration from defaults, files, and the environment.
    ///
    /// An explicit `config_file` must exist; the implicit locations are
    /// optional.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let mut builder = Config::builder()
            .set_default("defaults.code_style", defaults.defaults.code_style.as_str())?
            .set_default("defaults.focus", defaults.defaults.focus.as_str())?
            .set_default(
                "defaults.generate_secondary",
                defaults.defaults.generate_secondary,
            )?
            .set_default("output.no_color", defaults.output.no_color)?
            .set_default("output.format", defaults.output.format.as_str())?
            .set_default("security.strict", defaults.security.strict)?;

        match config_file {
            Some(path) => {
                builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml));
            }
            None => {
                builder = builder
                    .add_source(
                        File::from(Self::config_path())
                            .format(FileFormat::Toml)
                            .required(false),
                    )
                    .add_source(
                        File::from(Path::new(LOCAL_CONFIG_FILE))
                            .format(FileFormat::Toml)
                            .required(false),
                    );
            }
        }

        builder
            .add_source(
                Environment::with_prefix("PRIMER")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Read a single config file without layering, or defaults if it is absent.
    pub fn load_file(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("Invalid TOML in '{}'", path.display()))
    }

    /// Path to the user configuration file.
    ///
    /// Uses `directories::ProjectDirs` for cross-platform correctness,
    /// falling back to `.primer.toml` in the current directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("dev", "primer", "primer")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// The file `config set` writes to: `--config`, a local `.primer.toml`
    /// if present, then the user config file.
    pub fn active_path(config_file: Option<&PathBuf>) -> PathBuf {
        if let Some(path) = config_file {
            return path.clone();
        }
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            local
        } else {
            Self::config_path()
        }
    }

    /// Starting preferences for `generate`, before CLI flags.
    pub fn preferences(&self) -> Preferences {
        Preferences::default()
            .with_code_style(self.defaults.code_style)
            .with_focus(self.defaults.focus)
            .with_secondary(self.defaults.generate_secondary)
    }

    /// Current value of a dotted key, as text.
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "defaults.code_style" => self.defaults.code_style.to_string(),
            "defaults.focus" => self.defaults.focus.to_string(),
            "defaults.generate_secondary" => self.defaults.generate_secondary.to_string(),
            "output.no_color" => self.output.no_color.to_string(),
            "output.format" => self.output.format.clone(),
            "templates.local_path" => self
                .templates
                .local_path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "security.strict" => self.security.strict.to_string(),
            _ => return None,
        };
        Some(value)
    }

    /// Set a dotted key from text. Errors describe why `value` was rejected.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        match key {
            "defaults.code_style" => {
                self.defaults.code_style = value.parse::<CodeStyle>().map_err(|e| format!("{e}"))?;
            }
            "defaults.focus" => {
                self.defaults.focus = value.parse::<Focus>().map_err(|e| format!("{e}"))?;
            }
            "defaults.generate_secondary" => self.defaults.generate_secondary = parse_bool(value)?,
            "output.no_color" => self.output.no_color = parse_bool(value)?,
            "output.format" => match value {
                "auto" | "human" | "plain" | "json" => self.output.format = value.to_string(),
                _ => return Err(format!("'{value}' is not one of auto, human, plain, json")),
            },
            "templates.local_path" => {
                self.templates.local_path = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "security.strict" => self.security.strict = parse_bool(value)?,
            _ => return Err(format!("Unknown config key: '{key}'")),
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Ok(true),
        "false" | "no" | "0" | "off" => Ok(false),
        _ => Err(format!("'{value}' is not a boolean")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_generate_secondary() {
        let cfg = AppConfig::default();
        assert!(cfg.defaults.generate_secondary);
        assert_eq!(cfg.output.format, "auto");
        assert!(!cfg.security.strict);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("primer.toml");
        std::fs::write(
            &path,
            "[defaults]\nfocus = \"security\"\n\n[security]\nstrict = true\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.defaults.focus, Focus::Security);
        assert!(cfg.security.strict);
        assert!(cfg.defaults.generate_secondary);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        assert!(AppConfig::load(Some(&temp.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn init_output_round_trips_through_toml() {
        let cfg = AppConfig::default();
        let raw = toml::to_string_pretty(&cfg).unwrap();
        assert_eq!(toml::from_str::<AppConfig>(&raw).unwrap(), cfg);
    }

    #[test]
    fn get_and_set_every_key() {
        let mut cfg = AppConfig::default();
        for key in KEYS {
            assert!(cfg.get(key).is_some(), "{key} not readable");
        }

        cfg.set("defaults.code_style", "oop").unwrap();
        cfg.set("security.strict", "yes").unwrap();
        cfg.set("templates.local_path", "/srv/templates").unwrap();
        assert_eq!(cfg.get("defaults.code_style").as_deref(), Some("oop"));
        assert_eq!(cfg.get("security.strict").as_deref(), Some("true"));
        assert_eq!(
            cfg.templates.local_path,
            Some(PathBuf::from("/srv/templates"))
        );
    }

    #[test]
    fn set_rejects_bad_values() {
        let mut cfg = AppConfig::default();
        assert!(cfg.set("defaults.focus", "speed").is_err());
        assert!(cfg.set("output.format", "yaml").is_err());
        assert!(cfg.set("output.no_color", "maybe").is_err());
        assert!(cfg.set("does.not.exist", "1").is_err());
        assert!(cfg.get("does.not.exist").is_none());
    }

    #[test]
    fn preferences_follow_defaults() {
        let mut cfg = AppConfig::default();
        cfg.defaults.generate_secondary = false;
        cfg.defaults.focus = Focus::Performance;
        let prefs = cfg.preferences();
        assert!(!prefs.generate_secondary);
        assert_eq!(prefs.focus, Focus::Performance);
    }

    #[test]
    fn load_file_tolerates_absent_file() {
        let temp = TempDir::new().unwrap();
        let cfg = AppConfig::load_file(&temp.path().join("none.toml")).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }
}
