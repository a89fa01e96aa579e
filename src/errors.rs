//! Error Types
//!
//! Every failure surfaced by this crate is a [`GraphError`]. The variants map
//! one-to-one onto the conditions a caller may want to tell apart:
//!
//! - **Transport**: the request/response client failed; passed through untouched
//! - **SchemaStale**: a dictionary index stayed out of range after one cache refresh
//! - **UnsupportedType**: the reply carries a value kind this client cannot decode
//! - **MalformedReply**: the reply does not have the compact result shape
//!
//! A decode either produces a complete `QueryResult` or one of these errors.
//! Nothing is dropped or padded silently.

use crate::config::ConfigError;
use crate::metadata::Dictionary;
use crate::protocol::TypeTag;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GraphError {
    /// The underlying request failed
    #[error("Transport error: {message}")]
    Transport { message: String },

    /// Dictionary index still out of range after the cache was refreshed
    #[error("Stale schema: {dictionary} index {index} out of range (cached {cached} entries after refresh)")]
    SchemaStale {
        dictionary: Dictionary,
        index: usize,
        cached: usize,
    },

    /// Value kind that has no decoding (UNKNOWN, PATH)
    #[error("Unsupported value type: {tag:?}")]
    UnsupportedType { tag: TypeTag },

    /// Reply does not match the expected shape
    #[error("Malformed reply: {message}")]
    MalformedReply { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for graph client operations
pub type GraphResult<T> = Result<T, GraphError>;

impl GraphError {
    /// Create a new transport error
    pub fn transport<S: Into<String>>(message: S) -> Self {
        GraphError::Transport {
            message: message.into(),
        }
    }

    /// Create a new malformed reply error
    pub fn malformed<S: Into<String>>(message: S) -> Self {
        GraphError::MalformedReply {
            message: message.into(),
        }
    }

    pub fn unsupported(tag: TypeTag) -> Self {
        GraphError::UnsupportedType { tag }
    }

    /// Stable code for logging and for mapping errors across an API boundary
    pub fn error_code(&self) -> &'static str {
        match self {
            GraphError::Transport { .. } => "Graph.TransportError",
            GraphError::SchemaStale { .. } => "Graph.SchemaStaleError",
            GraphError::UnsupportedType { .. } => "Graph.UnsupportedTypeError",
            GraphError::MalformedReply { .. } => "Graph.MalformedReplyError",
            GraphError::Config(_) => "Graph.ConfigError",
            GraphError::Serialization(_) => "Graph.SerializationError",
        }
    }

    /// True for errors that come from the reply content rather than from I/O
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            GraphError::SchemaStale { .. }
                | GraphError::UnsupportedType { .. }
                | GraphError::MalformedReply { .. }
        )
    }
}
