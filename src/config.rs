use std::path::PathBuf;
use std::str::FromStr;

use color_eyre::eyre::{eyre, Result, WrapErr};
use serde::Deserialize;
use tracing::debug;

use crate::style::ThemeConfig;

const APP_NAME: &str = "reminders";
const CONFIG_ENV: &str = "REMINDERS_CONFIG";
const BACKEND_ENV: &str = "REMINDERS_BACKEND";
const STORE_PATH_ENV: &str = "REMINDERS_STORE_PATH";

/// Where reminders live.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// The macOS reminders service.
    #[serde(rename = "eventkit")]
    EventKit,
    /// A local JSON document.
    File,
}

impl Default for Backend {
    fn default() -> Self {
        if cfg!(target_os = "macos") {
            Backend::EventKit
        } else {
            Backend::File
        }
    }
}

impl FromStr for Backend {
    type Err = color_eyre::Report;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "eventkit" => Ok(Backend::EventKit),
            "file" => Ok(Backend::File),
            other => Err(eyre!("unknown backend {other:?}, expected \"eventkit\" or \"file\"")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend: Backend,
    pub store_path: Option<PathBuf>,
    /// List used by `add` when none is given on the command line.
    pub default_list: Option<String>,
    pub color: bool,
    pub theme: ThemeConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            store_path: None,
            default_list: None,
            color: true,
            theme: ThemeConfig::default(),
        }
    }
}

impl FromStr for Config {
    type Err = toml::de::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        toml::from_str(s)
    }
}

impl Config {
    /// Load the config file (if any), then apply environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match config_path() {
            Some(path) if path.exists() => std::fs::read_to_string(&path)
                .wrap_err_with(|| format!("failed to read config file {}", path.display()))?
                .parse::<Config>()
                .wrap_err_with(|| format!("failed to parse config file {}", path.display()))?,
            Some(path) => {
                debug!(path = %path.display(), "no config file, using defaults");
                Config::default()
            }
            None => Config::default(),
        };

        if let Ok(backend) = std::env::var(BACKEND_ENV) {
            config.backend = backend
                .parse()
                .wrap_err_with(|| format!("invalid {BACKEND_ENV}"))?;
        }
        if let Ok(path) = std::env::var(STORE_PATH_ENV) {
            config.store_path = Some(PathBuf::from(path));
        }

        debug!(?config, "configuration loaded");
        Ok(config)
    }

    /// JSON store location for the file backend.
    pub fn store_path(&self) -> Option<PathBuf> {
        self.store_path
            .clone()
            .or_else(|| dirs::data_dir().map(|d| d.join(APP_NAME).join("store.json")))
    }
}

fn config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .or_else(|| dirs::config_dir().map(|d| d.join(APP_NAME).join("config.toml")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config.backend, Backend::default());
        assert!(config.color);
        assert!(config.default_list.is_none());
    }

    #[test]
    fn parses_all_keys() {
        let config: Config = r##"
            backend = "file"
            store_path = "/tmp/reminders.json"
            default_list = "Work"
            color = false

            [theme]
            preset = "mono"
            high = "#ff0000"
        "##
        .parse()
        .unwrap();

        assert_eq!(config.backend, Backend::File);
        assert_eq!(config.store_path(), Some(PathBuf::from("/tmp/reminders.json")));
        assert_eq!(config.default_list.as_deref(), Some("Work"));
        assert!(!config.color);
        assert_eq!(config.theme.preset.as_deref(), Some("mono"));
    }

    #[test]
    fn backend_names() {
        assert_eq!("EventKit".parse::<Backend>().unwrap(), Backend::EventKit);
        assert_eq!(" file ".parse::<Backend>().unwrap(), Backend::File);
        assert!("sqlite".parse::<Backend>().is_err());
    }

    #[test]
    fn rejects_unknown_backend_in_file() {
        assert!(r#"backend = "cloud""#.parse::<Config>().is_err());
    }
}
