//! Error taxonomy for the agents crate.
//!
//! | Error           | Scope          | Fatal to the run |
//! |-----------------|----------------|------------------|
//! | `GatewayError`  | one model call | no (becomes an absent result) |
//! | `DatasetError`  | dataset load   | yes, before any question runs |
//! | `ConfigError`   | startup        | yes |
//! | `EvalError`     | after the pass | reported after evaluation |

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

// ── Gateway ─────────────────────────────────────────────────────────

/// Transport failure of a single chat-completion call.
///
/// Never escapes [`crate::gateway::GatewayClient`]; the client logs it and
/// hands the strategy an absent result instead.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("request failed: {0}")]
    RequestFailed(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

// ── Dataset ─────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid record at {path}:{line}: {source}")]
    InvalidRecord {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("invalid dataset document {path}: {source}")]
    InvalidDocument {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("unsupported dataset path {0} (expected .jsonl, .json or a directory with data.jsonl)")]
    UnsupportedPath(PathBuf),

    #[error("hub request failed: {0}")]
    Hub(String),

    #[error("dataset {dataset} has no splits")]
    NoSplits { dataset: String },

    #[error("failed to write snapshot {path}: {source}")]
    Snapshot {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ── Configuration ───────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

// ── Evaluation ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum EvalError {
    #[error("failed to persist run log: {0}")]
    Sink(#[from] scoring::SinkError),
}
