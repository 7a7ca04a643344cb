//! Server configuration

use crate::cli::{Cli, Commands};
use herolens_classifiers::ModelConfig;
use herolens_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Remote location of the model artifact
    #[serde(default = "default_artifact_url")]
    pub artifact_url: String,

    /// File name of the artifact inside `model_dir`
    #[serde(default = "default_artifact_name")]
    pub artifact_name: String,

    /// Directory the artifact is downloaded to and loaded from
    #[serde(default = "default_model_dir")]
    pub model_dir: PathBuf,

    /// Classifier settings
    #[serde(default)]
    pub model: ModelConfig,

    /// Directory served under `/static`
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Upload page returned by `GET /`
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,

    /// Listen address
    #[serde(default = "default_listen")]
    pub listen: String,

    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest accepted request body for `/analyze`
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl ServerConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> Result<Self> {
        let mut config = Self::from_file(config_path)?;

        if let Some(Commands::Serve { listen, port }) = &cli.command {
            if let Some(listen) = listen {
                config.listen = listen.clone();
            }
            if let Some(port) = port {
                config.port = *port;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Read a YAML file, falling back to defaults when it does not exist
    pub fn from_file(config_path: impl AsRef<Path>) -> Result<Self> {
        let path = config_path.as_ref();
        if !path.exists() {
            tracing::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::config(format!("Failed to parse {}: {}", path.display(), e)))
    }

    /// Reject settings the service cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.artifact_name.is_empty() {
            return Err(Error::config("artifact_name must not be empty"));
        }
        if self.model.classes.is_empty() {
            return Err(Error::config("model.classes must list at least one class"));
        }
        if self.max_upload_bytes == 0 {
            return Err(Error::config("max_upload_bytes must be greater than zero"));
        }
        Ok(())
    }

    /// Local path of the artifact
    pub fn artifact_path(&self) -> PathBuf {
        self.model_dir.join(&self.artifact_name)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            artifact_url: default_artifact_url(),
            artifact_name: default_artifact_name(),
            model_dir: default_model_dir(),
            model: ModelConfig::default(),
            static_dir: default_static_dir(),
            index_path: default_index_path(),
            listen: default_listen(),
            port: default_port(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_artifact_url() -> String {
    "https://github.com/herolens/herolens/releases/download/v0.1.0/export.safetensors".to_string()
}

fn default_artifact_name() -> String {
    "export.safetensors".to_string()
}

fn default_model_dir() -> PathBuf {
    PathBuf::from("app")
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("app/static")
}

fn default_index_path() -> PathBuf {
    PathBuf::from("app/view/index.html")
}

fn default_listen() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_max_upload_bytes() -> usize {
    32 * 1024 * 1024
}
