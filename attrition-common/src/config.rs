//! Bootstrap configuration loading and artifact path resolution
//!
//! Settings sources, highest priority first:
//! 1. Command-line arguments (applied by the binary via [`TomlConfig::apply_overrides`])
//! 2. Environment variables (read by clap alongside the arguments)
//! 3. TOML configuration file
//! 4. Built-in defaults (code constants below)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "attrition.toml";

/// Bootstrap configuration loaded from TOML file
///
/// Read once at startup; the service must restart to pick up changes.
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Interface to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// First directory searched for model artifacts; its parent is the fallback
    #[serde(default = "default_artifact_dir")]
    pub artifact_dir: PathBuf,

    /// Trained classifier file name
    #[serde(default = "default_model_file")]
    pub model_file: String,

    /// Trained preprocessor file name
    #[serde(default = "default_preprocessor_file")]
    pub preprocessor_file: String,

    /// Origins allowed to call the API from a browser
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Upper bound on an uploaded request body
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            artifact_dir: default_artifact_dir(),
            model_file: default_model_file(),
            preprocessor_file: default_preprocessor_file(),
            cors_origins: default_cors_origins(),
            max_upload_bytes: default_max_upload_bytes(),
            logging: LoggingConfig::default(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_artifact_dir() -> PathBuf {
    PathBuf::from("backend")
}

fn default_model_file() -> String {
    "best_attrition_model.json".to_string()
}

fn default_preprocessor_file() -> String {
    "preprocessor.json".to_string()
}

fn default_cors_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
    ]
}

fn default_max_upload_bytes() -> usize {
    50 * 1024 * 1024
}

fn default_log_level() -> String {
    "info".to_string()
}

impl TomlConfig {
    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Parse TOML failed: {}", e)))
    }

    /// Load configuration
    ///
    /// An explicitly named file must exist. Without one, `attrition.toml`
    /// in the working directory is used when present, else built-in defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::Config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                path.to_path_buf()
            }
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.exists() {
                    info!("No config file found, using built-in defaults");
                    return Ok(Self::default());
                }
                fallback
            }
        };

        let content = std::fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Read TOML failed: {}", e)))?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Apply command-line / environment overrides on top of file values
    pub fn apply_overrides(
        &mut self,
        host: Option<String>,
        port: Option<u16>,
        artifact_dir: Option<PathBuf>,
    ) {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(dir) = artifact_dir {
            self.artifact_dir = dir;
        }
    }

    /// Candidate directories for artifacts: the configured one, then its parent
    pub fn artifact_candidates(&self) -> Vec<PathBuf> {
        let mut dirs = vec![self.artifact_dir.clone()];
        match self.artifact_dir.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => dirs.push(parent.to_path_buf()),
            // "backend" has an empty parent; fall back to the working directory
            Some(_) => dirs.push(PathBuf::from(".")),
            None => {}
        }
        dirs
    }

    /// Resolved classifier artifact path
    pub fn model_path(&self) -> Result<PathBuf> {
        resolve_artifact(&self.artifact_candidates(), &self.model_file)
    }

    /// Resolved preprocessor artifact path
    pub fn preprocessor_path(&self) -> Result<PathBuf> {
        resolve_artifact(&self.artifact_candidates(), &self.preprocessor_file)
    }
}

/// Find `file_name` in the first candidate directory that contains it
pub fn resolve_artifact(candidates: &[PathBuf], file_name: &str) -> Result<PathBuf> {
    let mut last_tried = None;
    for dir in candidates {
        let path = dir.join(file_name);
        if path.exists() {
            return Ok(path);
        }
        warn!("Artifact {} not found at {}", file_name, path.display());
        last_tried = Some(path);
    }

    let tried = last_tried
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| file_name.to_string());
    Err(Error::Artifact(format!("{} not found at {}", file_name, tried)))
}
