//! Environment-backed configuration.
//!
//! Every setting has a default matching the original fixed-path deployment
//! (artifacts next to the working directory). Override with `VERITAS_*`
//! environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::encoder::EmbeddingSource;
use crate::labels::LabelMap;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `VERITAS_*` overrides on top of defaults,
/// then [`Config::validate`] before loading artifacts.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Tokenizer definition: a `tokenizer.json` file or a directory
    /// containing one. Default: `./tokenizer`.
    pub tokenizer_path: PathBuf,

    /// Encoder checkpoint directory (`config.json` + `model.safetensors`).
    /// Default: `./model`.
    pub encoder_path: PathBuf,

    /// Serialized classifier head file. Default: `./classifier.safetensors`.
    pub classifier_path: PathBuf,

    /// Landing-page asset directory. Default: `./static`.
    pub static_path: PathBuf,

    /// Which encoder output feeds the classifier. Default: CLS token.
    pub embedding_source: EmbeddingSource,

    /// Class index → public label table. Default: `fake,true`.
    pub labels: LabelMap,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            tokenizer_path: PathBuf::from("./tokenizer"),
            encoder_path: PathBuf::from("./model"),
            classifier_path: PathBuf::from("./classifier.safetensors"),
            static_path: PathBuf::from("./static"),
            embedding_source: EmbeddingSource::Cls,
            labels: LabelMap::default(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "VERITAS_PORT";
    const ENV_BIND_ADDR: &'static str = "VERITAS_BIND_ADDR";
    const ENV_TOKENIZER_PATH: &'static str = "VERITAS_TOKENIZER_PATH";
    const ENV_ENCODER_PATH: &'static str = "VERITAS_ENCODER_PATH";
    const ENV_CLASSIFIER_PATH: &'static str = "VERITAS_CLASSIFIER_PATH";
    const ENV_STATIC_PATH: &'static str = "VERITAS_STATIC_PATH";
    const ENV_EMBEDDING_SOURCE: &'static str = "VERITAS_EMBEDDING_SOURCE";
    const ENV_LABELS: &'static str = "VERITAS_LABELS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let tokenizer_path =
            Self::parse_path_from_env(Self::ENV_TOKENIZER_PATH, defaults.tokenizer_path);
        let encoder_path = Self::parse_path_from_env(Self::ENV_ENCODER_PATH, defaults.encoder_path);
        let classifier_path =
            Self::parse_path_from_env(Self::ENV_CLASSIFIER_PATH, defaults.classifier_path);
        let static_path = Self::parse_path_from_env(Self::ENV_STATIC_PATH, defaults.static_path);
        let embedding_source = Self::parse_embedding_source_from_env(defaults.embedding_source)?;
        let labels = Self::parse_labels_from_env(defaults.labels)?;

        Ok(Self {
            port,
            bind_addr,
            tokenizer_path,
            encoder_path,
            classifier_path,
            static_path,
            embedding_source,
            labels,
        })
    }

    /// Validates artifact paths (does not load anything).
    ///
    /// Tokenizer, encoder, and classifier paths must exist with the right
    /// kind: the server refuses to start without them. The static directory
    /// is only checked for kind; a missing one degrades the landing page to
    /// 404 without blocking the API.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.tokenizer_path.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.tokenizer_path.clone(),
            });
        }

        if !self.encoder_path.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.encoder_path.clone(),
            });
        }
        if !self.encoder_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.encoder_path.clone(),
            });
        }

        if !self.classifier_path.exists() {
            return Err(ConfigError::PathNotFound {
                path: self.classifier_path.clone(),
            });
        }
        if !self.classifier_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: self.classifier_path.clone(),
            });
        }

        if self.static_path.exists() && !self.static_path.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.static_path.clone(),
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_embedding_source_from_env(
        default: EmbeddingSource,
    ) -> Result<EmbeddingSource, ConfigError> {
        match env::var(Self::ENV_EMBEDDING_SOURCE) {
            Ok(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidEmbeddingSource { value }),
            Err(_) => Ok(default),
        }
    }

    fn parse_labels_from_env(default: LabelMap) -> Result<LabelMap, ConfigError> {
        match env::var(Self::ENV_LABELS) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidLabels { value, source: e }),
            Err(_) => Ok(default),
        }
    }
}
