use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use validator::Validate;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Parse error for {field}: {value} - {source}")]
    Parse {
        field: String,
        value: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// Per-graph client configuration with validation
#[derive(Clone, Debug, PartialEq, Validate, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Key of the graph on the engine
    #[validate(length(min = 1, max = 512, message = "Graph name must be 1-512 characters"))]
    pub graph_name: String,

    /// Ask the engine for the compact, dictionary-indexed reply form
    pub compact: bool,

    /// Empty the schema cache after queries that may change the schema
    pub refresh_schema_on_write: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            graph_name: "default".to_string(),
            compact: true,
            refresh_schema_on_write: true,
        }
    }
}

impl GraphConfig {
    pub fn new(graph_name: impl Into<String>) -> Result<Self, ConfigError> {
        let config = Self {
            graph_name: graph_name.into(),
            ..Default::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from environment variables with validation
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            graph_name: env::var("GRAPHWIRE_GRAPH").unwrap_or_else(|_| "default".to_string()),
            compact: parse_env_var("GRAPHWIRE_COMPACT", "true")?,
            refresh_schema_on_write: parse_env_var("GRAPHWIRE_REFRESH_SCHEMA_ON_WRITE", "true")?,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from YAML file
    pub fn from_yaml_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Parse {
            field: "yaml_file".to_string(),
            value: "file read failed".to_string(),
            source: Box::new(e),
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            field: "yaml_content".to_string(),
            value: content,
            source: Box::new(e),
        })?;

        config.validate()?;
        Ok(config)
    }
}

/// Parse an environment variable with a default value
fn parse_env_var<T: std::str::FromStr>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = env::var(key).unwrap_or_else(|_| default.to_string());
    value.parse().map_err(|e| ConfigError::Parse {
        field: key.to_string(),
        value,
        source: Box::new(e),
    })
}
