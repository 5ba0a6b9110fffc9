use super::*;
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tempfile::tempdir;

use crate::test_helpers::{guest_file, guest_file_without_password};

/// Reader that serves in-memory inputs after a per-input delay and records
/// the order in which reads complete.
struct DelayedReader {
    delays: Vec<(String, Duration)>,
    completed: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl DelayedReader {
    fn new(delays: Vec<(String, Duration)>) -> Self {
        Self {
            delays,
            completed: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
        }
    }

    fn delay_for(&self, name: &str) -> Duration {
        self.delays
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, d)| *d)
            .unwrap_or_default()
    }
}

#[async_trait]
impl ContentReader for DelayedReader {
    async fn read(&self, input: RawInput) -> Result<String, ReadError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        tokio::time::sleep(self.delay_for(&input.name)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        self.completed.lock().unwrap().push(input.name.clone());

        let text = FsContentReader::default().read(input).await?;
        Ok(text)
    }

    fn name(&self) -> &'static str {
        "delayed"
    }
}

fn combiner() -> Combiner {
    Combiner::new(&CombinerConfig::default())
}

fn memory_inputs(contents: &[String]) -> Vec<RawInput> {
    contents
        .iter()
        .enumerate()
        .map(|(i, c)| RawInput::from_bytes(format!("guest{}.dat", i), c.clone()))
        .collect()
}

#[tokio::test]
async fn test_empty_batch() {
    let result = combiner().combine(vec![]).await;

    assert!(result.is_empty());
    assert_eq!(result.skipped(), 0);
    assert_eq!(result, BatchResult::default());
}

#[tokio::test]
async fn test_middle_input_malformed_is_skipped() {
    let inputs = memory_inputs(&[
        guest_file("A1", "P1"),
        "not json".to_string(),
        guest_file("A2", "P2"),
    ]);

    let result = combiner().combine(inputs).await;

    assert_eq!(
        result.records,
        vec![ParsedRecord::new("A1", "P1"), ParsedRecord::new("A2", "P2")]
    );
    assert_eq!(result.skipped(), 1);

    let failure = &result.failures[0];
    assert_eq!(failure.index, 1);
    assert_eq!(failure.name, "guest1.dat");
    assert_eq!(failure.kind, FailureKind::Malformed);
}

#[tokio::test]
async fn test_single_input_missing_password() {
    let inputs = memory_inputs(&[guest_file_without_password("A1")]);

    let result = combiner().combine(inputs).await;

    assert!(result.records.is_empty());
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].kind, FailureKind::MissingFields);
    assert!(result.failures[0].reason.contains(PASSWORD_KEY));
}

#[tokio::test]
async fn test_run_reports_no_valid_data() {
    let inputs = memory_inputs(&[guest_file_without_password("A1")]);

    let outcome = combiner().run(inputs).await.unwrap();

    match outcome {
        CombineOutcome::NoValidData(result) => assert_eq!(result.skipped(), 1),
        CombineOutcome::Ready { .. } => panic!("nothing should be emitted"),
    }
}

#[tokio::test]
async fn test_run_with_no_inputs_reports_no_valid_data() {
    let outcome = combiner().run(vec![]).await.unwrap();
    assert!(matches!(outcome, CombineOutcome::NoValidData(_)));
    assert!(outcome.result().is_empty());
}

#[tokio::test]
async fn test_order_preserved_when_completion_is_reversed() {
    let count = 6;
    let contents: Vec<String> = (0..count)
        .map(|i| guest_file(&format!("A{i}"), &format!("P{i}")))
        .collect();
    let inputs = memory_inputs(&contents);

    // First input finishes last, last input finishes first.
    let delays = (0..count)
        .map(|i| {
            (
                format!("guest{i}.dat"),
                Duration::from_millis(((count - i) * 30) as u64),
            )
        })
        .collect();
    let reader = Arc::new(DelayedReader::new(delays));
    let combiner = Combiner::with_reader(reader.clone(), count);

    let result = combiner.combine(inputs).await;

    let completed = reader.completed.lock().unwrap().clone();
    assert_eq!(completed.first().map(String::as_str), Some("guest5.dat"));
    assert_eq!(completed.last().map(String::as_str), Some("guest0.dat"));

    let uids: Vec<&str> = result.records.iter().map(|r| r.uid.as_str()).collect();
    assert_eq!(uids, vec!["A0", "A1", "A2", "A3", "A4", "A5"]);
}

#[tokio::test]
async fn test_failures_are_reported_in_input_order() {
    let contents = vec![
        "{".to_string(),
        guest_file("A1", "P1"),
        guest_file_without_password("A2"),
        "[]".to_string(),
    ];
    let delays = vec![
        ("guest0.dat".to_string(), Duration::from_millis(60)),
        ("guest2.dat".to_string(), Duration::from_millis(30)),
    ];
    let reader = Arc::new(DelayedReader::new(delays));
    let combiner = Combiner::with_reader(reader, 4);

    let result = combiner.combine(memory_inputs(&contents)).await;

    let indices: Vec<usize> = result.failures.iter().map(|f| f.index).collect();
    assert_eq!(indices, vec![0, 2, 3]);
    let kinds: Vec<FailureKind> = result.failures.iter().map(|f| f.kind).collect();
    assert_eq!(
        kinds,
        vec![
            FailureKind::Malformed,
            FailureKind::MissingFields,
            FailureKind::MissingFields
        ]
    );
    assert_eq!(result.records, vec![ParsedRecord::new("A1", "P1")]);
}

#[tokio::test]
async fn test_inputs_run_concurrently() {
    let count = 8;
    let contents: Vec<String> = (0..count).map(|i| guest_file(&format!("A{i}"), "P")).collect();
    let delays = (0..count)
        .map(|i| (format!("guest{i}.dat"), Duration::from_millis(50)))
        .collect();
    let reader = Arc::new(DelayedReader::new(delays));
    let combiner = Combiner::with_reader(reader.clone(), 16);

    let result = combiner.combine(memory_inputs(&contents)).await;

    assert_eq!(result.len(), count);
    assert!(
        reader.peak_in_flight.load(Ordering::SeqCst) > 1,
        "reads should overlap"
    );
}

#[tokio::test]
async fn test_concurrency_limit_is_respected() {
    let count = 6;
    let contents: Vec<String> = (0..count).map(|i| guest_file(&format!("A{i}"), "P")).collect();
    let delays = (0..count)
        .map(|i| (format!("guest{i}.dat"), Duration::from_millis(20)))
        .collect();
    let reader = Arc::new(DelayedReader::new(delays));
    let combiner = Combiner::with_reader(reader.clone(), 2);

    let result = combiner.combine(memory_inputs(&contents)).await;

    assert_eq!(result.len(), count);
    assert!(reader.peak_in_flight.load(Ordering::SeqCst) <= 2);
}

#[tokio::test]
async fn test_zero_concurrency_is_treated_as_one() {
    let combiner = Combiner::with_reader(Arc::new(FsContentReader::default()), 0);
    let result = combiner
        .combine(memory_inputs(&[guest_file("A1", "P1")]))
        .await;
    assert_eq!(result.len(), 1);
}

#[tokio::test]
async fn test_combine_is_idempotent() {
    let inputs = memory_inputs(&[
        guest_file("A1", "P1"),
        "garbage".to_string(),
        guest_file("A2", "P2"),
    ]);
    let combiner = combiner();

    let first = combiner.combine(inputs.clone()).await;
    let second = combiner.combine(inputs).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_emitted_artifact_matches_valid_inputs() {
    let inputs = memory_inputs(&[
        guest_file("A1", "P1"),
        guest_file_without_password("A2"),
        guest_file("A3", "P3"),
        "not json".to_string(),
        guest_file("A4", "P4"),
    ]);

    let outcome = combiner().run(inputs).await.unwrap();
    let CombineOutcome::Ready { artifact, result } = outcome else {
        panic!("expected an artifact");
    };

    let decoded: Vec<ParsedRecord> = serde_json::from_slice(&artifact.bytes).unwrap();
    assert_eq!(
        decoded,
        vec![
            ParsedRecord::new("A1", "P1"),
            ParsedRecord::new("A3", "P3"),
            ParsedRecord::new("A4", "P4"),
        ]
    );
    assert_eq!(decoded, result.records);
    assert_eq!(result.skipped(), 2);
}

#[tokio::test]
async fn test_unreadable_file_does_not_affect_siblings() {
    let dir = tempdir().unwrap();
    let good = dir.path().join("guest100.dat");
    std::fs::write(&good, guest_file("A1", "P1")).unwrap();
    let missing = dir.path().join("guest101.dat");

    let inputs = vec![RawInput::from_path(&missing), RawInput::from_path(&good)];
    let result = combiner().combine(inputs).await;

    assert_eq!(result.records, vec![ParsedRecord::new("A1", "P1")]);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].name, "guest101.dat");
    assert_eq!(result.failures[0].kind, FailureKind::Read);
}

#[tokio::test]
async fn test_size_limit_skips_only_oversized_input() {
    let config = CombinerConfig {
        max_file_size: Some(200),
        ..Default::default()
    };
    let oversized = format!(
        "{}{}",
        guest_file("A2", "P2"),
        " ".repeat(500)
    );
    let inputs = memory_inputs(&[guest_file("A1", "P1"), oversized]);

    let result = Combiner::new(&config).combine(inputs).await;

    assert_eq!(result.records, vec![ParsedRecord::new("A1", "P1")]);
    assert_eq!(result.failures[0].kind, FailureKind::Read);
    assert_eq!(result.failures[0].index, 1);
}

#[tokio::test]
async fn test_duplicate_records_are_kept() {
    let inputs = memory_inputs(&[guest_file("A1", "P1"), guest_file("A1", "P1")]);

    let result = combiner().combine(inputs).await;

    assert_eq!(result.len(), 2);
}
