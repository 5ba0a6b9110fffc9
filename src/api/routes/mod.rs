//! Route handlers for the REST API
//!
//! Handlers are organized by domain:
//! - [`ban_check`] — Player ban-status lookups
//! - [`combine`] — Guest credential file combining
//! - [`system`] — Health, events, OpenAPI

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod ban_check;
mod combine;
mod system;

// Re-export all handlers so `routes::function_name` works
pub use ban_check::*;
pub use combine::*;
pub use system::*;

// ============================================================================
// Query/Request Types (shared across handlers)
// ============================================================================

/// Only value of `check` accepted by `/api/check`
pub const CHECK_BANNED_ACTION: &str = "checkbanned";

/// Response header carrying the number of combined records
pub const RECORDS_COUNT_HEADER: &str = "x-records-count";

/// Response header carrying the number of skipped uploads
pub const SKIPPED_COUNT_HEADER: &str = "x-skipped-count";

/// Query parameters for GET|POST /api/check
#[derive(Debug, Default, Deserialize, Serialize, utoipa::IntoParams, utoipa::ToSchema)]
#[into_params(parameter_in = Query)]
pub struct CheckQuery {
    /// Requested action; must be "checkbanned"
    pub check: Option<String>,
    /// Player ID to look up
    pub id: Option<String>,
}

/// Response body for a successful ban lookup
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct BanCheckResponse {
    /// Player ID that was looked up
    pub player_id: String,
    /// Whether the player is banned
    pub is_banned: bool,
    /// "BANNED" or "NOT BANNED"
    pub status: crate::types::BanVerdict,
    /// Display message, e.g. "UID = 123\nStatus = NOT BANNED"
    pub message: String,
    /// When the lookup completed
    pub checked_at: DateTime<Utc>,
}

impl From<crate::types::BanStatus> for BanCheckResponse {
    fn from(status: crate::types::BanStatus) -> Self {
        Self {
            status: status.verdict(),
            message: status.message(),
            player_id: status.player_id,
            is_banned: status.is_banned,
            checked_at: status.checked_at,
        }
    }
}
