use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// JSON file holding every document
    pub documents_path: PathBuf,
    /// Where archives are written; the current directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    /// `md`, `html` or `jsx`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_format: Option<String>,
}

impl Config {
    pub fn new(documents_path: impl Into<PathBuf>) -> Self {
        Self {
            documents_path: documents_path.into(),
            export_dir: None,
            default_format: None,
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        // Expand shell variables and tilde in configured paths
        config.documents_path =
            Self::expand_path(&config.documents_path).unwrap_or(config.documents_path);
        config.export_dir = config
            .export_dir
            .map(|dir| Self::expand_path(&dir).unwrap_or(dir));

        Ok(Some(config))
    }

    /// Load the config at `config_path`, writing a default one first if the
    /// file does not exist yet
    pub fn load_or_create_at<P: AsRef<Path>>(config_path: P) -> anyhow::Result<Self> {
        let config_path = config_path.as_ref();
        if let Some(config) = Self::load_from_path(config_path)? {
            return Ok(config);
        }

        let config = Self::new(Self::default_documents_path());
        config.save_to_path(config_path)?;
        log::info!("Wrote default config to {}", config_path.display());
        Ok(config)
    }

    pub fn load_or_create() -> anyhow::Result<Self> {
        Self::load_or_create_at(Self::config_path())
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/docbuilder");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// Default location of the document store
    pub fn default_documents_path() -> PathBuf {
        let data_dir = shellexpand::tilde("~/.local/share/docbuilder");
        PathBuf::from(data_dir.as_ref()).join("documents.json")
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
