pub mod error;

pub use error::*;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Account id LocalStack uses for every request. Policy ARNs built from it
/// only resolve against the emulator.
pub const LOCALSTACK_ACCOUNT_ID: &str = "000000000000";

pub const DEFAULT_ENDPOINT_URL: &str = "http://localhost:4566";
pub const DEFAULT_REGION: &str = "us-east-1";

/// Environment variable pointing at a config file directly
pub const CONFIG_PATH_ENV: &str = "CLOUDFORGE_CONFIG_PATH";
pub const ENDPOINT_URL_ENV: &str = "CLOUDFORGE_ENDPOINT_URL";
pub const REGION_ENV: &str = "CLOUDFORGE_REGION";

const CONFIG_FILE_CANDIDATES: [&str; 2] = ["cloudforge.local.yaml", "cloudforge.yaml"];

/// CloudForge configuration (`cloudforge.yaml`)
///
/// Every key is optional; missing keys take the LocalStack defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project_name: String,
    pub environment: String,
    pub region: String,

    /// Endpoint override; `None` talks to the real AWS endpoints
    pub endpoint_url: Option<String>,

    /// Account id used to build policy ARNs
    pub account_id: String,

    /// Static keys; `None` defers to the SDK credential chain
    pub credentials: Option<Credentials>,

    pub resources: Resources,
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

/// Names of the resources the provisioning commands manage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resources {
    pub user_name: String,
    pub policy_name: String,

    /// Object ARN pattern the managed policy grants access to
    pub policy_resource: String,

    pub bucket_name: String,
}

impl Default for Resources {
    fn default() -> Self {
        Self {
            user_name: "cloudforge-user-5".to_string(),
            policy_name: "CloudForgeS3AccessPolicyV2".to_string(),
            policy_resource: "arn:aws:s3:::cloudforge-*/*".to_string(),
            bucket_name: "cloudforge-artifacts".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project_name: "CloudForge".to_string(),
            environment: "dev".to_string(),
            region: DEFAULT_REGION.to_string(),
            endpoint_url: Some(DEFAULT_ENDPOINT_URL.to_string()),
            account_id: LOCALSTACK_ACCOUNT_ID.to_string(),
            credentials: Some(Credentials {
                access_key_id: "test".to_string(),
                secret_access_key: "test".to_string(),
            }),
            resources: Resources::default(),
            tags: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Read and parse a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load the first config file [`find_config_file`] finds, or the defaults
    /// when there is none. Environment overrides are applied either way.
    pub fn discover() -> Result<(Self, Option<PathBuf>)> {
        let (mut config, path) = match find_config_file() {
            Ok(path) => (Self::load(&path)?, Some(path)),
            Err(ConfigError::ConfigFileNotFound) => (Self::default(), None),
            Err(e) => return Err(e),
        };
        config.apply_env_overrides();
        Ok((config, path))
    }

    /// `CLOUDFORGE_ENDPOINT_URL` and `CLOUDFORGE_REGION` win over the file.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(endpoint) = std::env::var(ENDPOINT_URL_ENV) {
            self.endpoint_url = Some(endpoint);
        }
        if let Ok(region) = std::env::var(REGION_ENV) {
            self.region = region;
        }
    }

    /// Whether the endpoint points at this machine (LocalStack).
    pub fn is_local_endpoint(&self) -> bool {
        self.endpoint_url.as_deref().is_some_and(|url| {
            url.contains("localhost") || url.contains("127.0.0.1") || url.contains("localstack")
        })
    }

    /// The LocalStack placeholder account only works against LocalStack.
    /// Warns and returns `false` when it is combined with any other endpoint.
    pub fn check_account_portability(&self) -> bool {
        if self.account_id == LOCALSTACK_ACCOUNT_ID && !self.is_local_endpoint() {
            tracing::warn!(
                "account_id {} is the LocalStack placeholder; policy ARNs will not resolve against {}",
                self.account_id,
                self.endpoint_url.as_deref().unwrap_or("AWS")
            );
            return false;
        }
        true
    }
}

/// Locate cloudforge.yaml
///
/// Search order:
/// 1. `CLOUDFORGE_CONFIG_PATH` (direct path)
/// 2. current directory: cloudforge.local.yaml, cloudforge.yaml
/// 3. ./.cloudforge/ with the same names
/// 4. ~/.config/cloudforge/cloudforge.yaml (global)
pub fn find_config_file() -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!("{} points at a missing file: {}", CONFIG_PATH_ENV, path.display());
    }

    let current_dir = std::env::current_dir()?;

    for filename in &CONFIG_FILE_CANDIDATES {
        let path = current_dir.join(filename);
        if path.exists() {
            return Ok(path);
        }
    }

    let local_dir = current_dir.join(".cloudforge");
    if local_dir.is_dir() {
        for filename in &CONFIG_FILE_CANDIDATES {
            let path = local_dir.join(filename);
            if path.exists() {
                return Ok(path);
            }
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("cloudforge").join("cloudforge.yaml");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}
