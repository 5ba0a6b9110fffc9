//! Batch combiner for guest credential files
//!
//! Reads any number of guest account files concurrently, extracts the
//! (uid, password) pair from each, and produces one ordered collection that
//! can be emitted as a single JSON artifact.
//!
//! ## Pipeline
//!
//! ```text
//! Vec<RawInput> ──┬─▶ read ─▶ extract ──┐
//!                 ├─▶ read ─▶ extract ──┼─▶ reassemble by index ─▶ BatchResult ─▶ emit ─▶ Artifact
//!                 └─▶ read ─▶ extract ──┘
//! ```
//!
//! Each input runs its own read→extract pipeline. A failing input is dropped
//! and recorded in [`BatchResult::failures`]; it never fails the batch and
//! never stops its siblings.
//!
//! ## Usage
//!
//! ```no_run
//! use guest_toolhub::combiner::{CombineOutcome, Combiner, RawInput};
//! use guest_toolhub::config::CombinerConfig;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let combiner = Combiner::new(&CombinerConfig::default());
//!     let inputs = vec![
//!         RawInput::from_path("guest100.dat"),
//!         RawInput::from_path("guest101.dat"),
//!     ];
//!
//!     match combiner.run(inputs).await? {
//!         CombineOutcome::Ready { artifact, result } => {
//!             println!("{} records, {} skipped", result.len(), result.skipped());
//!             std::fs::write(artifact.filename, &artifact.bytes)?;
//!         }
//!         CombineOutcome::NoValidData(result) => {
//!             println!("no valid data ({} skipped)", result.skipped());
//!         }
//!     }
//!     Ok(())
//! }
//! ```

mod emit;
mod extract;
mod reader;

pub use emit::{ARTIFACT_CONTENT_TYPE, ARTIFACT_FILENAME, Artifact, emit};
pub use extract::{ACCOUNT_INFO_KEY, PASSWORD_KEY, UID_KEY, extract};
pub use reader::{ContentReader, FsContentReader, InputSource, RawInput};

use crate::config::CombinerConfig;
use crate::error::{EmitError, ExtractError, ReadError};
use crate::types::{BatchResult, FailureKind, InputFailure, ParsedRecord};
use futures::stream::{self, StreamExt};
use std::sync::Arc;

/// Why a single input produced no record
#[derive(Debug, thiserror::Error)]
enum InputError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Extract(#[from] ExtractError),
}

impl InputError {
    fn kind(&self) -> FailureKind {
        match self {
            InputError::Read(_) => FailureKind::Read,
            InputError::Extract(ExtractError::Malformed(_)) => FailureKind::Malformed,
            InputError::Extract(ExtractError::MissingFields { .. }) => FailureKind::MissingFields,
        }
    }
}

/// Outcome of [`Combiner::run`]
#[must_use]
#[derive(Clone, Debug)]
pub enum CombineOutcome {
    /// At least one record was produced and serialized
    Ready {
        /// The serialized artifact
        artifact: Artifact,
        /// The batch it was built from
        result: BatchResult,
    },
    /// Every input was skipped (or there were none); nothing was emitted
    NoValidData(BatchResult),
}

impl CombineOutcome {
    /// The underlying batch result
    pub fn result(&self) -> &BatchResult {
        match self {
            CombineOutcome::Ready { result, .. } => result,
            CombineOutcome::NoValidData(result) => result,
        }
    }
}

/// Concurrent, order-preserving combiner
#[derive(Clone)]
pub struct Combiner {
    reader: Arc<dyn ContentReader>,
    max_concurrent_reads: usize,
}

impl std::fmt::Debug for Combiner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Combiner")
            .field("reader", &self.reader.name())
            .field("max_concurrent_reads", &self.max_concurrent_reads)
            .finish()
    }
}

impl Combiner {
    /// Create a combiner backed by [`FsContentReader`]
    pub fn new(config: &CombinerConfig) -> Self {
        Self::with_reader(
            Arc::new(FsContentReader::new(config.max_file_size)),
            config.max_concurrent_reads,
        )
    }

    /// Create a combiner with a custom content reader
    ///
    /// A concurrency of zero is treated as one.
    pub fn with_reader(reader: Arc<dyn ContentReader>, max_concurrent_reads: usize) -> Self {
        Self {
            reader,
            max_concurrent_reads: max_concurrent_reads.max(1),
        }
    }

    /// Combine `inputs` into one ordered [`BatchResult`]
    ///
    /// Every input is read and extracted independently, up to
    /// `max_concurrent_reads` at a time. The returned records follow the
    /// order of `inputs` regardless of which pipeline finished first. Inputs
    /// that fail are recorded in `failures` and otherwise ignored. Returns
    /// only once every pipeline has settled.
    pub async fn combine(&self, inputs: Vec<RawInput>) -> BatchResult {
        let total = inputs.len();
        if total == 0 {
            tracing::debug!("combine called with no inputs");
            return BatchResult::default();
        }

        tracing::debug!(
            inputs = total,
            concurrency = self.max_concurrent_reads,
            reader = self.reader.name(),
            "combining inputs"
        );

        let reader = self.reader.as_ref();
        let mut outcomes: Vec<(usize, String, Result<ParsedRecord, InputError>)> =
            stream::iter(inputs.into_iter().enumerate())
                .map(|(index, input)| async move {
                    let name = input.name.clone();
                    let outcome = process_input(reader, input).await;
                    (index, name, outcome)
                })
                .buffer_unordered(self.max_concurrent_reads)
                .collect()
                .await;

        // Completion order is arbitrary; restore input order.
        outcomes.sort_unstable_by_key(|(index, _, _)| *index);

        let mut result = BatchResult::default();
        for (index, name, outcome) in outcomes {
            match outcome {
                Ok(record) => result.records.push(record),
                Err(e) => {
                    tracing::warn!(index, name = %name, error = %e, "skipping input");
                    result.failures.push(InputFailure {
                        index,
                        name,
                        kind: e.kind(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            inputs = total,
            records = result.len(),
            skipped = result.skipped(),
            "batch combined"
        );
        result
    }

    /// Combine `inputs` and emit the artifact when there is something to emit
    ///
    /// # Errors
    ///
    /// Returns [`EmitError`] only if serializing a non-empty batch fails.
    pub async fn run(&self, inputs: Vec<RawInput>) -> Result<CombineOutcome, EmitError> {
        let result = self.combine(inputs).await;
        if result.is_empty() {
            return Ok(CombineOutcome::NoValidData(result));
        }

        let artifact = emit(&result)?;
        Ok(CombineOutcome::Ready { artifact, result })
    }
}

async fn process_input(
    reader: &dyn ContentReader,
    input: RawInput,
) -> Result<ParsedRecord, InputError> {
    let text = reader.read(input).await?;
    Ok(extract(&text)?)
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
