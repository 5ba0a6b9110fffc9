//! # guest-toolhub
//!
//! Backend library for two small account utilities:
//!
//! - **Guest file combiner** - merge any number of guest account files into
//!   a single `combined_guest.json` credential list
//! - **Ban checker** - look up whether a player account is banned
//!
//! ## Design Philosophy
//!
//! guest-toolhub is designed to be:
//! - **Order-preserving** - combined records always follow input order, no
//!   matter which file finished reading first
//! - **Failure-isolating** - one broken file is skipped and reported, never
//!   fatal to its batch
//! - **Sensible defaults** - Works out of the box with zero configuration
//! - **Event-driven** - Consumers subscribe to events, no polling required
//!
//! ## Quick Start
//!
//! ```no_run
//! use guest_toolhub::{CombineOutcome, Config, RawInput, ToolHub};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let hub = ToolHub::new(Config::default())?;
//!
//!     // Subscribe to events
//!     let mut events = hub.subscribe();
//!     tokio::spawn(async move {
//!         while let Ok(event) = events.recv().await {
//!             println!("Event: {:?}", event);
//!         }
//!     });
//!
//!     let inputs = vec![
//!         RawInput::from_path("guest100.dat"),
//!         RawInput::from_path("guest101.dat"),
//!     ];
//!     if let CombineOutcome::Ready { artifact, .. } = hub.combine_files(inputs).await? {
//!         std::fs::write(artifact.filename, &artifact.bytes)?;
//!     }
//!
//!     let status = hub.check_ban("123456789").await?;
//!     println!("{}", status.message());
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// REST API module
pub mod api;
/// Upstream ban-status client
pub mod ban_check;
/// Concurrent guest file combiner
pub mod combiner;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Service facade
pub mod hub;
/// Core types and events
pub mod types;
/// Utility functions
pub mod utils;

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
pub(crate) mod test_helpers;

// Re-export commonly used types
pub use ban_check::BanChecker;
pub use combiner::{Artifact, CombineOutcome, Combiner, ContentReader, RawInput};
pub use config::{Config, FileCollisionAction};
pub use error::{
    ApiError, BanCheckError, EmitError, Error, ErrorDetail, ExtractError, ReadError, Result,
    ToHttpStatus,
};
pub use hub::ToolHub;
pub use types::{BanStatus, BanVerdict, BatchResult, Event, FailureKind, InputFailure, ParsedRecord};

/// Helper function to run the hub with graceful signal handling.
///
/// Waits for a termination signal and then calls the hub's `shutdown()` method.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use guest_toolhub::{Config, ToolHub, run_with_shutdown};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let hub = Arc::new(ToolHub::new(Config::default())?);
///     let _api = hub.spawn_api_server();
///
///     // Run with automatic signal handling
///     run_with_shutdown(&hub).await?;
///
///     Ok(())
/// }
/// ```
pub async fn run_with_shutdown(hub: &ToolHub) -> Result<()> {
    wait_for_signal().await;
    hub.shutdown().await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal registration can fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
