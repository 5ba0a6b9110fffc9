//! Configuration types for guest-toolhub

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::{net::SocketAddr, path::Path, path::PathBuf, time::Duration};
use utoipa::ToSchema;

/// Batch combiner configuration
///
/// Groups settings related to how credential files are read and how the
/// combined artifact is delivered. Used as a nested sub-config within [`Config`].
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CombinerConfig {
    /// Maximum number of inputs read concurrently (default: 16)
    #[serde(default = "default_max_concurrent_reads")]
    pub max_concurrent_reads: usize,

    /// Maximum size of a single input in bytes (default: None = unlimited)
    ///
    /// Inputs over the limit are skipped like any other unreadable input.
    #[serde(default)]
    pub max_file_size: Option<u64>,

    /// Directory the artifact is written to by file-based callers (default: ".")
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// What to do when the artifact filename already exists in `output_dir`
    #[serde(default)]
    pub file_collision: FileCollisionAction,
}

impl Default for CombinerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_reads: default_max_concurrent_reads(),
            max_file_size: None,
            output_dir: default_output_dir(),
            file_collision: FileCollisionAction::default(),
        }
    }
}

/// File collision handling
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FileCollisionAction {
    /// Append (1), (2), etc. to the filename
    #[default]
    Rename,
    /// Overwrite the existing file
    Overwrite,
    /// Refuse to write and report a collision
    Skip,
}

/// Upstream ban-status service configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BanCheckConfig {
    /// Upstream endpoint queried with `lang` and `uid` parameters
    #[serde(default = "default_ban_check_endpoint")]
    pub endpoint: String,

    /// Value of the `lang` query parameter (default: "en")
    #[serde(default = "default_language")]
    pub language: String,

    /// Timeout for the single upstream request (default: 10s)
    #[serde(default = "default_ban_check_timeout", with = "duration_secs")]
    #[schema(value_type = u64)]
    pub timeout: Duration,

    /// User-Agent header sent upstream
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Referer header sent upstream (None = omitted)
    #[serde(default = "default_referer")]
    pub referer: Option<String>,
}

impl Default for BanCheckConfig {
    fn default() -> Self {
        Self {
            endpoint: default_ban_check_endpoint(),
            language: default_language(),
            timeout: default_ban_check_timeout(),
            user_agent: default_user_agent(),
            referer: default_referer(),
        }
    }
}

/// Server integration configuration (API)
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct ServerIntegrationConfig {
    /// REST API configuration
    #[serde(default)]
    pub api: ApiConfig,
}

/// REST API configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:6789)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,

    /// Maximum accepted request body for uploads in bytes (default: 16 MiB)
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Main configuration for [`ToolHub`](crate::ToolHub)
///
/// Every field has a sensible default, so `Config::default()` works out of
/// the box and partial JSON documents are accepted.
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Credential file combiner settings
    #[serde(default)]
    pub combiner: CombinerConfig,

    /// Upstream ban-status service settings
    #[serde(default)]
    pub ban_check: BanCheckConfig,

    /// REST API settings
    #[serde(default)]
    pub server: ServerIntegrationConfig,
}

impl Config {
    /// Load configuration from a JSON file
    ///
    /// Missing fields fall back to their defaults. The loaded configuration is
    /// validated before it is returned.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`Config::validate`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content).map_err(|e| Error::Config {
            message: format!("failed to parse {}: {}", path.display(), e),
            key: None,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Check settings that serde cannot enforce on its own
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending key.
    pub fn validate(&self) -> Result<()> {
        if self.combiner.max_concurrent_reads == 0 {
            return Err(Error::Config {
                message: "max_concurrent_reads must be at least 1".to_string(),
                key: Some("combiner.max_concurrent_reads".to_string()),
            });
        }

        if let Err(e) = url::Url::parse(&self.ban_check.endpoint) {
            return Err(Error::Config {
                message: format!("invalid ban check endpoint: {}", e),
                key: Some("ban_check.endpoint".to_string()),
            });
        }

        if self.ban_check.timeout.is_zero() {
            return Err(Error::Config {
                message: "ban check timeout must be greater than zero".to_string(),
                key: Some("ban_check.timeout".to_string()),
            });
        }

        Ok(())
    }
}

/// Serialize a `Duration` as whole seconds
mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_secs(u64::deserialize(deserializer)?))
    }
}

fn default_max_concurrent_reads() -> usize {
    16
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_ban_check_endpoint() -> String {
    "https://ff.garena.com/api/antihack/check_banned".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

fn default_ban_check_timeout() -> Duration {
    Duration::from_secs(10)
}

fn default_user_agent() -> String {
    concat!("guest-toolhub/", env!("CARGO_PKG_VERSION")).to_string()
}

fn default_referer() -> Option<String> {
    Some("https://ff.garena.com/en/support/".to_string())
}

fn default_true() -> bool {
    true
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 6789))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".into()]
}

fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024
}
