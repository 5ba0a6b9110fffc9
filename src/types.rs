//! Core types for guest-toolhub

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Credentials extracted from one guest account file
///
/// Both fields are always present: an input that cannot yield both never
/// produces a record.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct ParsedRecord {
    /// Guest account UID
    pub uid: String,
    /// Guest account password
    pub password: String,
}

impl ParsedRecord {
    /// Create a new record
    pub fn new(uid: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            password: password.into(),
        }
    }
}

/// Stage at which an input was rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Content could not be read or decoded
    Read,
    /// Content is not valid JSON
    Malformed,
    /// JSON lacks the required fields
    MissingFields,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureKind::Read => "read",
            FailureKind::Malformed => "malformed",
            FailureKind::MissingFields => "missing_fields",
        };
        f.write_str(s)
    }
}

/// An input that was elided from a batch
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InputFailure {
    /// Position of the input in the original sequence
    pub index: usize,
    /// Display name of the input
    pub name: String,
    /// Stage that rejected the input
    pub kind: FailureKind,
    /// Human-readable reason
    pub reason: String,
}

/// Outcome of combining one batch of inputs
///
/// `records` follows the order in which inputs were supplied, never the order
/// in which they finished. `failures` is diagnostic only and is never part of
/// the emitted artifact.
#[must_use]
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BatchResult {
    /// Records in original input order
    pub records: Vec<ParsedRecord>,
    /// Inputs that were skipped, in original input order
    pub failures: Vec<InputFailure>,
}

impl BatchResult {
    /// Whether no input produced a record
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Number of inputs that were skipped
    pub fn skipped(&self) -> usize {
        self.failures.len()
    }
}

/// Two-valued ban verdict
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BanVerdict {
    /// The account is banned
    #[serde(rename = "BANNED")]
    Banned,
    /// The account is not banned
    #[serde(rename = "NOT BANNED")]
    NotBanned,
}

impl std::fmt::Display for BanVerdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BanVerdict::Banned => f.write_str("BANNED"),
            BanVerdict::NotBanned => f.write_str("NOT BANNED"),
        }
    }
}

/// Result of a single ban-status lookup
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BanStatus {
    /// Player identifier that was looked up
    pub player_id: String,
    /// Whether the upstream service reports the player as banned
    pub is_banned: bool,
    /// When the lookup completed
    pub checked_at: DateTime<Utc>,
}

impl BanStatus {
    /// The two-valued verdict for this status
    pub fn verdict(&self) -> BanVerdict {
        if self.is_banned {
            BanVerdict::Banned
        } else {
            BanVerdict::NotBanned
        }
    }

    /// Status message shown to users, e.g. `UID = 123\nStatus = NOT BANNED`
    pub fn message(&self) -> String {
        format!("UID = {}\nStatus = {}", self.player_id, self.verdict())
    }
}

/// Event emitted by [`ToolHub`](crate::ToolHub)
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// An input was dropped from a batch
    InputSkipped {
        /// Position of the input in its batch
        index: usize,
        /// Display name of the input
        name: String,
        /// Stage that rejected the input
        kind: FailureKind,
        /// Human-readable reason
        reason: String,
    },

    /// A batch finished
    BatchCompleted {
        /// Number of records produced
        records: usize,
        /// Number of inputs skipped
        skipped: usize,
    },

    /// A ban lookup succeeded
    BanChecked {
        /// Player identifier
        player_id: String,
        /// Reported ban state
        is_banned: bool,
    },

    /// A ban lookup failed
    BanCheckFailed {
        /// Player identifier
        player_id: String,
        /// Error message
        error: String,
    },

    /// Service is shutting down
    Shutdown,
}

impl Event {
    /// Short name used as the SSE event type
    pub fn kind(&self) -> &'static str {
        match self {
            Event::InputSkipped { .. } => "input_skipped",
            Event::BatchCompleted { .. } => "batch_completed",
            Event::BanChecked { .. } => "ban_checked",
            Event::BanCheckFailed { .. } => "ban_check_failed",
            Event::Shutdown => "shutdown",
        }
    }
}
