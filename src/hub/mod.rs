//! Service facade tying the combiner and the ban checker together.
//!
//! [`ToolHub`] is what the REST API and embedding applications talk to. It
//! owns the configuration, publishes [`Event`]s for every batch and lookup,
//! and coordinates shutdown.

use crate::ban_check::BanChecker;
use crate::combiner::{CombineOutcome, Combiner, RawInput};
use crate::config::Config;
use crate::error::{BanCheckError, Error, Result};
use crate::types::{BanStatus, Event};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::broadcast;

/// Capacity of the event broadcast channel
const EVENT_CHANNEL_CAPACITY: usize = 1000;

/// Main service instance (cloneable - all fields are Arc-wrapped)
#[derive(Clone, Debug)]
pub struct ToolHub {
    /// Configuration (wrapped in Arc for sharing across tasks)
    pub(crate) config: Arc<Config>,
    /// Credential file combiner
    pub(crate) combiner: Combiner,
    /// Upstream ban-status client
    pub(crate) ban_checker: BanChecker,
    /// Event broadcast channel sender (multiple subscribers supported)
    pub(crate) event_tx: broadcast::Sender<Event>,
    /// Cleared on shutdown; new work is refused afterwards
    accepting_new: Arc<AtomicBool>,
}

impl ToolHub {
    /// Create a new ToolHub instance
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the configuration fails validation, or a
    /// ban-check error if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let combiner = Combiner::new(&config.combiner);
        let ban_checker = BanChecker::new(&config.ban_check)?;
        let (event_tx, _rx) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        tracing::info!(
            max_concurrent_reads = config.combiner.max_concurrent_reads,
            ban_check_endpoint = %ban_checker.endpoint(),
            "tool hub initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            combiner,
            ban_checker,
            event_tx,
            accepting_new: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Replace the combiner, e.g. to plug in a custom
    /// [`ContentReader`](crate::combiner::ContentReader)
    pub fn with_combiner(mut self, combiner: Combiner) -> Self {
        self.combiner = combiner;
        self
    }

    /// The active configuration
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Subscribe to service events
    ///
    /// Each subscriber receives every event published after it subscribed.
    /// Slow subscribers may observe `RecvError::Lagged`.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.event_tx.subscribe()
    }

    fn emit_event(&self, event: Event) {
        // No subscribers is fine
        let _ = self.event_tx.send(event);
    }

    fn ensure_accepting(&self) -> Result<()> {
        if self.accepting_new.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(Error::ShuttingDown)
        }
    }

    /// Combine a batch of guest account files
    ///
    /// Publishes one [`Event::InputSkipped`] per rejected input, then an
    /// [`Event::BatchCompleted`]. An all-skipped batch is reported as
    /// [`CombineOutcome::NoValidData`], not as an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoFiles`] for an empty batch, [`Error::ShuttingDown`]
    /// after [`shutdown`](Self::shutdown), or [`Error::Emit`] if serialization
    /// fails.
    pub async fn combine_files(&self, inputs: Vec<RawInput>) -> Result<CombineOutcome> {
        self.ensure_accepting()?;
        if inputs.is_empty() {
            return Err(Error::NoFiles);
        }

        let outcome = self.combiner.run(inputs).await?;
        let result = outcome.result();

        for failure in &result.failures {
            self.emit_event(Event::InputSkipped {
                index: failure.index,
                name: failure.name.clone(),
                kind: failure.kind,
                reason: failure.reason.clone(),
            });
        }
        self.emit_event(Event::BatchCompleted {
            records: result.len(),
            skipped: result.skipped(),
        });

        Ok(outcome)
    }

    /// Combine a batch and write the artifact into the configured output directory
    ///
    /// Name collisions are resolved per `combiner.file_collision`.
    ///
    /// # Errors
    ///
    /// Everything [`combine_files`](Self::combine_files) returns, plus
    /// [`Error::NoValidData`] when no input produced a record and I/O or
    /// collision errors from writing the file.
    pub async fn combine_to_dir(&self, inputs: Vec<RawInput>) -> Result<PathBuf> {
        match self.combine_files(inputs).await? {
            CombineOutcome::Ready { artifact, .. } => {
                artifact
                    .write_to_dir(
                        &self.config.combiner.output_dir,
                        self.config.combiner.file_collision,
                    )
                    .await
            }
            CombineOutcome::NoValidData(result) => Err(Error::NoValidData {
                skipped: result.skipped(),
            }),
        }
    }

    /// Look up the ban status of a player
    ///
    /// Publishes [`Event::BanChecked`] or [`Event::BanCheckFailed`]. A missing
    /// player ID is rejected without contacting the upstream service and
    /// without publishing an event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BanCheck`] if the lookup fails, or
    /// [`Error::ShuttingDown`] after [`shutdown`](Self::shutdown).
    pub async fn check_ban(&self, player_id: &str) -> Result<BanStatus> {
        self.ensure_accepting()?;

        match self.ban_checker.check(player_id).await {
            Ok(status) => {
                self.emit_event(Event::BanChecked {
                    player_id: status.player_id.clone(),
                    is_banned: status.is_banned,
                });
                Ok(status)
            }
            Err(BanCheckError::MissingPlayerId) => Err(BanCheckError::MissingPlayerId.into()),
            Err(e) => {
                tracing::warn!(player_id = player_id.trim(), error = %e, "ban check failed");
                self.emit_event(Event::BanCheckFailed {
                    player_id: player_id.trim().to_string(),
                    error: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Spawn the REST API server in a background task
    ///
    /// The server binds to `server.api.bind_address` and runs until the task
    /// is aborted or fails.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use guest_toolhub::{Config, ToolHub};
    /// use std::sync::Arc;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let hub = Arc::new(ToolHub::new(Config::default())?);
    /// let api_handle = hub.spawn_api_server();
    /// # api_handle.abort();
    /// # Ok(())
    /// # }
    /// ```
    pub fn spawn_api_server(self: &Arc<Self>) -> tokio::task::JoinHandle<Result<()>> {
        let hub = self.clone();
        let config = self.config.clone();

        tokio::spawn(async move { crate::api::start_api_server(hub, config).await })
    }

    /// Stop accepting new work and notify subscribers
    ///
    /// Batches and lookups already in flight run to completion. Calling this
    /// more than once is harmless.
    ///
    /// # Errors
    ///
    /// Does not currently fail.
    pub async fn shutdown(&self) -> Result<()> {
        if !self.accepting_new.swap(false, Ordering::SeqCst) {
            tracing::debug!("shutdown already requested");
            return Ok(());
        }

        tracing::info!("Initiating graceful shutdown");
        self.emit_event(Event::Shutdown);
        tracing::info!("Shutdown complete");
        Ok(())
    }

    /// Whether [`shutdown`](Self::shutdown) has been requested
    pub fn is_shutting_down(&self) -> bool {
        !self.accepting_new.load(Ordering::SeqCst)
    }
}
