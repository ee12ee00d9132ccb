//! Server configuration

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ServeError;
use crate::DEFAULT_PORT;

/// What to serve when a path matches neither a route nor an asset.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
    /// Serve the index document (client-side routing)
    Index,
    /// Plain 404
    #[default]
    NotFound,
}

impl FromStr for FallbackPolicy {
    type Err = ServeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "index" => Ok(Self::Index),
            "404" | "not_found" | "not-found" => Ok(Self::NotFound),
            other => Err(ServeError::Config(format!("unknown fallback policy: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Interface to bind
    pub bind: String,
    pub port: u16,
    /// Static asset directory. `None` serves generated routes only.
    pub assets: Option<PathBuf>,
    pub fallback: FallbackPolicy,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            assets: None,
            fallback: FallbackPolicy::default(),
        }
    }
}

impl ServeConfig {
    /// Load from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ServeError> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            ServeError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        serde_json::from_str(&json)
            .map_err(|e| ServeError::Config(format!("invalid config {}: {}", path.display(), e)))
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ServeError> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e| ServeError::Config(format!("invalid bind address {}: {}", self.bind, e)))
    }
}
