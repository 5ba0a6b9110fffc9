//! Application state for the API server

use crate::{Config, ToolHub};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned for each request (cheap Arc clone).
#[derive(Clone)]
pub struct AppState {
    /// The service facade
    pub hub: Arc<ToolHub>,

    /// Configuration (read-only)
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(hub: Arc<ToolHub>, config: Arc<Config>) -> Self {
        Self { hub, config }
    }
}
