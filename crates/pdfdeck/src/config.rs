use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::viewer::ViewerOptions;

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "pdfdeck";

pub const VALID_KEYS: &str = "defaults.theme, defaults.slideshow_interval, defaults.render_scale, defaults.start_fullscreen";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    /// Seconds between automatic page advances.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slideshow_interval: Option<u32>,

    /// Multiplier applied to a page's natural size when rasterising.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render_scale: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_fullscreen: Option<bool>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `pdfdeck config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# pdfdeck configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn defaults(&self) -> DefaultsConfig {
        self.defaults.clone().unwrap_or_default()
    }

    pub fn theme(&self) -> String {
        self.defaults().theme.unwrap_or_else(|| "dark".to_string())
    }

    pub fn start_fullscreen(&self) -> bool {
        self.defaults().start_fullscreen.unwrap_or(true)
    }

    /// Viewer tunables, with `interval_override` (from the command line)
    /// taking precedence over the file.
    pub fn viewer_options(&self, interval_override: Option<u32>) -> ViewerOptions {
        let defaults = self.defaults();
        let fallback = ViewerOptions::default();
        ViewerOptions {
            slideshow_interval_secs: interval_override
                .or(defaults.slideshow_interval)
                .unwrap_or(fallback.slideshow_interval_secs),
            render_scale: defaults.render_scale.unwrap_or(fallback.render_scale),
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let defaults = self.defaults.get_or_insert_with(DefaultsConfig::default);
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                defaults.theme = Some(value.to_string());
            }
            "defaults.slideshow_interval" => {
                let secs = value
                    .parse::<u32>()
                    .ok()
                    .filter(|s| (1..=3600).contains(s))
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "Invalid slideshow_interval: {value}. Must be a number of seconds between 1 and 3600."
                        )
                    })?;
                defaults.slideshow_interval = Some(secs);
            }
            "defaults.render_scale" => {
                let scale = value
                    .parse::<f32>()
                    .ok()
                    .filter(|s| (0.5..=4.0).contains(s))
                    .ok_or_else(|| {
                        anyhow::anyhow!(
                            "Invalid render_scale: {value}. Must be between 0.5 and 4.0."
                        )
                    })?;
                defaults.render_scale = Some(scale);
            }
            "defaults.start_fullscreen" => {
                let flag = match value {
                    "true" | "yes" | "on" => true,
                    "false" | "no" | "off" => false,
                    _ => anyhow::bail!(
                        "Invalid start_fullscreen: {value}. Must be 'true' or 'false'."
                    ),
                };
                defaults.start_fullscreen = Some(flag);
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {VALID_KEYS}"),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = Config::default();
        assert_eq!(config.theme(), "dark");
        assert!(config.start_fullscreen());
        let options = config.viewer_options(None);
        assert_eq!(options.slideshow_interval_secs, 45);
        assert_eq!(options.render_scale, 2.0);
    }

    #[test]
    fn test_cli_interval_overrides_file() {
        let mut config = Config::default();
        config.set("defaults.slideshow_interval", "20").unwrap();
        assert_eq!(config.viewer_options(None).slideshow_interval_secs, 20);
        assert_eq!(config.viewer_options(Some(5)).slideshow_interval_secs, 5);
    }

    #[test]
    fn test_set_validates_values() {
        let mut config = Config::default();
        assert!(config.set("defaults.theme", "neon").is_err());
        assert!(config.set("defaults.slideshow_interval", "0").is_err());
        assert!(config.set("defaults.slideshow_interval", "soon").is_err());
        assert!(config.set("defaults.render_scale", "9").is_err());
        assert!(config.set("defaults.start_fullscreen", "maybe").is_err());

        config.set("defaults.theme", "light").unwrap();
        config.set("defaults.render_scale", "1.5").unwrap();
        config.set("defaults.start_fullscreen", "off").unwrap();
        assert_eq!(config.theme(), "light");
        assert_eq!(config.viewer_options(None).render_scale, 1.5);
        assert!(!config.start_fullscreen());
    }

    #[test]
    fn test_unknown_key() {
        let mut config = Config::default();
        let err = config.set("viewer.zoom", "2").unwrap_err();
        assert!(err.to_string().contains("Unknown config key"));
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(FILENAME);

        let mut config = Config::default();
        config.set("defaults.slideshow_interval", "30").unwrap();
        config.set("defaults.theme", "light").unwrap();
        config.save_to(&path).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("# pdfdeck configuration"));

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.theme(), "light");
        assert_eq!(loaded.viewer_options(None).slideshow_interval_secs, 30);
    }

    #[test]
    fn test_missing_file_message() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join(FILENAME)).unwrap_err();
        assert!(err.to_string().contains("No config found"));
    }
}
