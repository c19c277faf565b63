//! User configuration for annotation defaults.
//!
//! Configuration is layered: built-in defaults, then a JSON file in the
//! platform config directory, then environment variables.

use crate::annotation::Color;
use crate::error::ConfigError;
use crate::tool::{HIGHLIGHTER_WIDTH_RANGE, PEN_WIDTH_RANGE};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const ENV_PEN_COLOR: &str = "PDF_ANNOTATOR_PEN_COLOR";
const ENV_PEN_WIDTH: &str = "PDF_ANNOTATOR_PEN_WIDTH";
const ENV_HIGHLIGHTER_COLOR: &str = "PDF_ANNOTATOR_HIGHLIGHTER_COLOR";
const ENV_HIGHLIGHTER_WIDTH: &str = "PDF_ANNOTATOR_HIGHLIGHTER_WIDTH";

/// Initial tool settings and layout options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotatorConfig {
    /// Initial pen color
    pub pen_color: Color,
    /// Initial pen width, within 1..=10
    pub pen_width: u32,
    /// Initial highlighter color
    pub highlighter_color: Color,
    /// Initial highlighter width, within 5..=20
    pub highlighter_width: u32,
    /// Space kept around the page inside the viewport, in logical pixels
    pub page_padding: f32,
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self {
            pen_color: Color::BLACK,
            pen_width: 2,
            highlighter_color: Color::YELLOW,
            highlighter_width: 10,
            page_padding: 20.0,
        }
    }
}

impl AnnotatorConfig {
    /// Defaults, overlaid with the config file (if present) and the environment
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_config_path();
        let config = if path.is_file() {
            debug!(path = %path.display(), "loading configuration file");
            Self::from_file(&path)?
        } else {
            Self::default()
        };
        config.with_env_overrides()
    }

    /// Returns the default configuration file location.
    ///
    /// - macOS: ~/Library/Application Support/pdf-annotator/config.json
    /// - Linux: ~/.config/pdf-annotator/config.json
    /// - Windows: %APPDATA%\pdf-annotator\config.json
    pub fn default_config_path() -> PathBuf {
        if let Some(config_dir) = dirs::config_dir() {
            config_dir.join("pdf-annotator").join("config.json")
        } else {
            PathBuf::from("pdf-annotator.json")
        }
    }

    /// Loads configuration from a JSON file.
    ///
    /// Missing keys keep their defaults.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_json(&contents)
    }

    /// Parses and validates configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment variable overrides.
    ///
    /// Environment variables:
    /// - `PDF_ANNOTATOR_PEN_COLOR`: hex color, e.g. `#FF0000`
    /// - `PDF_ANNOTATOR_PEN_WIDTH`: 1-10
    /// - `PDF_ANNOTATOR_HIGHLIGHTER_COLOR`: hex color
    /// - `PDF_ANNOTATOR_HIGHLIGHTER_WIDTH`: 5-20
    pub fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        if let Ok(val) = std::env::var(ENV_PEN_COLOR) {
            self.pen_color = parse_color(ENV_PEN_COLOR, &val)?;
        }

        if let Ok(val) = std::env::var(ENV_PEN_WIDTH) {
            self.pen_width = parse_width(ENV_PEN_WIDTH, &val)?;
        }

        if let Ok(val) = std::env::var(ENV_HIGHLIGHTER_COLOR) {
            self.highlighter_color = parse_color(ENV_HIGHLIGHTER_COLOR, &val)?;
        }

        if let Ok(val) = std::env::var(ENV_HIGHLIGHTER_WIDTH) {
            self.highlighter_width = parse_width(ENV_HIGHLIGHTER_WIDTH, &val)?;
        }

        self.validate()?;
        Ok(self)
    }

    /// Saves configuration as pretty-printed JSON, creating parent directories.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Checks widths against the tool ranges and the padding for sanity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !PEN_WIDTH_RANGE.contains(&self.pen_width) {
            return Err(invalid("pen_width", format!("{} not in 1..=10", self.pen_width)));
        }
        if !HIGHLIGHTER_WIDTH_RANGE.contains(&self.highlighter_width) {
            return Err(invalid(
                "highlighter_width",
                format!("{} not in 5..=20", self.highlighter_width),
            ));
        }
        if !self.page_padding.is_finite() || self.page_padding < 0.0 {
            return Err(invalid("page_padding", format!("{}", self.page_padding)));
        }
        Ok(())
    }
}

fn invalid(key: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        reason,
    }
}

fn parse_color(key: &str, value: &str) -> Result<Color, ConfigError> {
    Color::from_hex(value).map_err(|e| invalid(key, e.to_string()))
}

fn parse_width(key: &str, value: &str) -> Result<u32, ConfigError> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| invalid(key, format!("'{}' is not a width", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_default_config() {
        let config = AnnotatorConfig::default();
        assert_eq!(config.pen_color, Color::BLACK);
        assert_eq!(config.pen_width, 2);
        assert_eq!(config.highlighter_color, Color::YELLOW);
        assert_eq!(config.highlighter_width, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_json_partial() {
        let config = AnnotatorConfig::from_json(r##"{ "pen_color": "#FF0000" }"##).unwrap();
        assert_eq!(config.pen_color, Color::RED);
        assert_eq!(config.pen_width, 2); // default
        assert_eq!(config.highlighter_width, 10); // default
    }

    #[test]
    fn test_from_json_rejects_out_of_range_width() {
        let result = AnnotatorConfig::from_json(r#"{ "pen_width": 11 }"#);
        assert!(matches!(result, Err(ConfigError::InvalidValue { ref key, .. }) if key == "pen_width"));

        let result = AnnotatorConfig::from_json(r#"{ "highlighter_width": 4 }"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_json_rejects_malformed() {
        assert!(matches!(
            AnnotatorConfig::from_json(r#"{ "pen_color": "red" }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            AnnotatorConfig::from_json("not json"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_file_save_and_load() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("nested").join("config.json");

        let config = AnnotatorConfig {
            pen_color: Color::RED,
            pen_width: 6,
            highlighter_color: Color::rgb(0, 255, 0),
            highlighter_width: 15,
            page_padding: 8.0,
        };
        config.save_to_file(&path).unwrap();

        let loaded = AnnotatorConfig::from_file(&path).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn test_from_missing_file() {
        let temp = tempfile::tempdir().unwrap();
        let result = AnnotatorConfig::from_file(temp.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        let _guard = EnvGuard::new(&[
            ENV_PEN_COLOR,
            ENV_PEN_WIDTH,
            ENV_HIGHLIGHTER_COLOR,
            ENV_HIGHLIGHTER_WIDTH,
        ]);

        env::set_var(ENV_PEN_COLOR, "#0000FF");
        env::set_var(ENV_PEN_WIDTH, "4");
        env::set_var(ENV_HIGHLIGHTER_COLOR, "#00FF00");
        env::set_var(ENV_HIGHLIGHTER_WIDTH, "12");

        let config = AnnotatorConfig::default().with_env_overrides().unwrap();
        assert_eq!(config.pen_color, Color::rgb(0, 0, 255));
        assert_eq!(config.pen_width, 4);
        assert_eq!(config.highlighter_color, Color::rgb(0, 255, 0));
        assert_eq!(config.highlighter_width, 12);
    }

    #[test]
    #[serial]
    fn test_env_overrides_partial() {
        let _guard = EnvGuard::new(&[
            ENV_PEN_COLOR,
            ENV_PEN_WIDTH,
            ENV_HIGHLIGHTER_COLOR,
            ENV_HIGHLIGHTER_WIDTH,
        ]);

        env::remove_var(ENV_PEN_COLOR);
        env::remove_var(ENV_HIGHLIGHTER_COLOR);
        env::remove_var(ENV_HIGHLIGHTER_WIDTH);
        env::set_var(ENV_PEN_WIDTH, "9");

        let config = AnnotatorConfig::default().with_env_overrides().unwrap();
        assert_eq!(config.pen_width, 9);
        assert_eq!(config.pen_color, Color::BLACK); // default
    }

    #[test]
    #[serial]
    fn test_env_overrides_invalid() {
        let _guard = EnvGuard::new(&[ENV_PEN_WIDTH, ENV_HIGHLIGHTER_COLOR]);

        env::set_var(ENV_PEN_WIDTH, "thick");
        assert!(AnnotatorConfig::default().with_env_overrides().is_err());

        env::set_var(ENV_PEN_WIDTH, "20");
        assert!(AnnotatorConfig::default().with_env_overrides().is_err());

        env::remove_var(ENV_PEN_WIDTH);
        env::set_var(ENV_HIGHLIGHTER_COLOR, "#XYZ");
        assert!(AnnotatorConfig::default().with_env_overrides().is_err());
    }

    // Helper to save and restore environment variables
    struct EnvGuard {
        vars: Vec<(String, Option<String>)>,
    }

    impl EnvGuard {
        fn new(var_names: &[&str]) -> Self {
            let vars = var_names
                .iter()
                .map(|name| (name.to_string(), env::var(name).ok()))
                .collect();
            Self { vars }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (name, value) in &self.vars {
                match value {
                    Some(v) => env::set_var(name, v),
                    None => env::remove_var(name),
                }
            }
        }
    }
}
