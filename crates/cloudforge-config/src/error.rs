use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "Configuration file not found. Looked in:\n\
        - current directory: cloudforge.local.yaml, cloudforge.yaml\n\
        - ./.cloudforge/ directory\n\
        - ~/.config/cloudforge/cloudforge.yaml\n\
        Set CLOUDFORGE_CONFIG_PATH to point at a file directly"
    )]
    ConfigFileNotFound,

    #[error("Error reading config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Error parsing config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
