//! Persisted store snapshot and its versioned envelope.
//!
//! # Responsibility
//! - Define the full in-memory state owned by the store.
//! - Encode/decode the `{"version": N, "state": {...}}` envelope.
//!
//! # Invariants
//! - Only `SNAPSHOT_VERSION` payloads decode; anything else is rejected
//!   rather than partially loaded.
//! - Missing required fields reject the payload.

use crate::model::focus::{ActiveFocus, FocusSession, Settings};
use crate::model::mindmap::{Edge, MindMap, Node};
use crate::model::task::Task;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Shape version written into every persisted envelope.
pub const SNAPSHOT_VERSION: u64 = 1;

/// Complete application state held by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    pub tasks: Vec<Task>,
    pub maps: Vec<MindMap>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub sessions: Vec<FocusSession>,
    pub settings: Settings,
    pub active_focus: ActiveFocus,
}

#[derive(Debug)]
pub enum SnapshotError {
    /// Payload is not JSON, or `state` does not match the current shape.
    Malformed(serde_json::Error),
    /// Envelope carries no usable `version` tag.
    MissingVersion,
    UnsupportedVersion { found: u64, expected: u64 },
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed(err) => write!(f, "malformed snapshot: {err}"),
            Self::MissingVersion => write!(f, "snapshot has no version tag"),
            Self::UnsupportedVersion { found, expected } => write!(
                f,
                "snapshot version {found} is not supported (expected {expected})"
            ),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Malformed(err) => Some(err),
            Self::MissingVersion => None,
            Self::UnsupportedVersion { .. } => None,
        }
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value)
    }
}

impl SnapshotError {
    /// Stable short code for log lines.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Malformed(_) => "malformed",
            Self::MissingVersion => "missing_version",
            Self::UnsupportedVersion { .. } => "unsupported_version",
        }
    }
}

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    version: u64,
    state: &'a AppState,
}

/// Serializes `state` into a versioned envelope.
pub fn encode_snapshot(state: &AppState) -> Result<String, SnapshotError> {
    let envelope = EnvelopeRef {
        version: SNAPSHOT_VERSION,
        state,
    };
    Ok(serde_json::to_string(&envelope)?)
}

/// Parses a versioned envelope back into state.
pub fn decode_snapshot(payload: &str) -> Result<AppState, SnapshotError> {
    let mut envelope: Value = serde_json::from_str(payload)?;
    let version = envelope
        .get("version")
        .and_then(Value::as_u64)
        .ok_or(SnapshotError::MissingVersion)?;
    if version != SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion {
            found: version,
            expected: SNAPSHOT_VERSION,
        });
    }
    let state = envelope
        .get_mut("state")
        .map(Value::take)
        .unwrap_or(Value::Null);
    Ok(serde_json::from_value(state)?)
}
