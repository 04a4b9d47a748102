//! Bounded-concurrency batch processing with per-item failure isolation

use crate::error::{Error, Result};
use crate::files::MediaKind;
use futures::stream::{self, StreamExt};
use log::{debug, warn};
use serde::Serialize;
use std::future::Future;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

/// Options for batch processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchOptions {
    /// Maximum number of requests in flight at once
    pub concurrency: usize,

    /// Stop launching new items after the first failure
    pub fail_fast: bool,

    /// When set, item `i` is tagged with the external ID `{prefix}_{i}`
    pub external_id_prefix: Option<String>,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self::for_kind(MediaKind::Image)
    }
}

impl BatchOptions {
    /// Default options for batches of the given media kind
    pub fn for_kind(kind: MediaKind) -> Self {
        Self {
            concurrency: kind.default_concurrency(),
            fail_fast: false,
            external_id_prefix: None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.concurrency == 0 {
            return Err(Error::InvalidRequest(
                "Batch concurrency must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn external_id(&self, index: usize) -> Option<String> {
        self.external_id_prefix
            .as_ref()
            .map(|prefix| format!("{prefix}_{index}"))
    }
}

/// Receives `(completed, total)` after each batch item finishes.
///
/// Called in completion order on the task driving the batch. Any
/// `Fn(usize, usize)` closure is an observer.
pub trait ProgressObserver: Send + Sync {
    fn on_progress(&self, completed: usize, total: usize);
}

impl<F> ProgressObserver for F
where
    F: Fn(usize, usize) + Send + Sync,
{
    fn on_progress(&self, completed: usize, total: usize) {
        self(completed, total)
    }
}

/// Outcome of a single batch item
#[derive(Debug)]
pub enum BatchOutcome<T> {
    Success(T),
    Failure(Error),
}

/// Result of a single batch item
#[derive(Debug)]
pub struct BatchResult<T> {
    /// Position of the item in the submitted sequence
    pub index: usize,
    /// Description of the input (path, URL or text)
    pub input: String,
    pub outcome: BatchOutcome<T>,
    pub duration_ms: Option<f64>,
}

impl<T> BatchResult<T> {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, BatchOutcome::Success(_))
    }

    pub fn result(&self) -> Option<&T> {
        match &self.outcome {
            BatchOutcome::Success(result) => Some(result),
            BatchOutcome::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&Error> {
        match &self.outcome {
            BatchOutcome::Success(_) => None,
            BatchOutcome::Failure(error) => Some(error),
        }
    }
}

#[derive(Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum JsonlRecord<'a, T> {
    Success {
        input: &'a str,
        result: &'a T,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_ms: Option<f64>,
    },
    Error {
        input: &'a str,
        error: &'static str,
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        duration_ms: Option<f64>,
    },
    Summary {
        total: usize,
        succeeded: usize,
        failed: usize,
        success_rate: f64,
    },
}

/// Results of a batch and their aggregated counts.
///
/// `total` counts attempted items only, so with `fail_fast` it can be lower
/// than the number of submitted items.
#[derive(Debug)]
pub struct BatchSummary<T> {
    /// Results sorted by submission index
    pub results: Vec<BatchResult<T>>,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl<T> BatchSummary<T> {
    pub fn from_results(mut results: Vec<BatchResult<T>>) -> Self {
        results.sort_by_key(|result| result.index);
        let succeeded = results.iter().filter(|result| result.is_success()).count();
        let total = results.len();

        Self {
            results,
            total,
            succeeded,
            failed: total - succeeded,
        }
    }

    /// Fraction of attempted items that succeeded, 0 for an empty batch
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.succeeded as f64 / self.total as f64
        }
    }

    /// Successful reports, in submission order
    pub fn successful(&self) -> impl Iterator<Item = &T> {
        self.results.iter().filter_map(|result| result.result())
    }

    /// Failed items, in submission order
    pub fn errors(&self) -> impl Iterator<Item = &BatchResult<T>> {
        self.results.iter().filter(|result| !result.is_success())
    }

    /// One-line human summary
    pub fn summary_line(&self) -> String {
        format!(
            "Processed {} files: {} succeeded, {} failed ({:.1}% success rate)",
            self.total,
            self.succeeded,
            self.failed,
            self.success_rate() * 100.0
        )
    }
}

impl<T: Serialize> BatchSummary<T> {
    /// JSONL lines for every result followed by the summary line
    pub fn to_jsonl(&self) -> Result<Vec<String>> {
        let mut lines = Vec::with_capacity(self.results.len() + 1);
        for result in &self.results {
            let record = match &result.outcome {
                BatchOutcome::Success(report) => JsonlRecord::Success {
                    input: &result.input,
                    result: report,
                    duration_ms: result.duration_ms,
                },
                BatchOutcome::Failure(error) => JsonlRecord::Error {
                    input: &result.input,
                    error: error.kind(),
                    message: error.to_string(),
                    duration_ms: result.duration_ms,
                },
            };
            lines.push(serde_json::to_string(&record)?);
        }

        let summary: JsonlRecord<'_, T> = JsonlRecord::Summary {
            total: self.total,
            succeeded: self.succeeded,
            failed: self.failed,
            success_rate: self.success_rate(),
        };
        lines.push(serde_json::to_string(&summary)?);
        Ok(lines)
    }

    /// Write the JSONL lines, newline-terminated
    pub fn write_jsonl<W: Write>(&self, mut writer: W) -> Result<()> {
        for line in self.to_jsonl()? {
            writeln!(writer, "{line}")?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Run `operation` over every item with at most `options.concurrency` calls in flight.
///
/// Each item is a `(input description, value)` pair; the operation receives the
/// item index and value. A failing item never aborts the others unless
/// `fail_fast` is set, in which case no further items are launched after the
/// first failure while items already in flight complete normally.
pub async fn process_batch<I, T, F, Fut>(
    items: Vec<(String, I)>,
    options: &BatchOptions,
    progress: Option<&dyn ProgressObserver>,
    operation: F,
) -> Result<BatchSummary<T>>
where
    F: Fn(usize, I) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    options.validate()?;

    let total = items.len();
    let fail_fast = options.fail_fast;
    let halted = AtomicBool::new(false);
    let halted = &halted;
    let operation = &operation;
    debug!(
        "Processing batch of {total} items with concurrency {}",
        options.concurrency
    );

    let mut pending = stream::iter(items.into_iter().enumerate())
        .map(|(index, (input, item))| async move {
            if halted.load(Ordering::SeqCst) {
                return None;
            }

            let started = Instant::now();
            let outcome = match operation(index, item).await {
                Ok(report) => BatchOutcome::Success(report),
                Err(error) => {
                    warn!("Batch item {index} ({input}) failed: {error}");
                    if fail_fast {
                        halted.store(true, Ordering::SeqCst);
                    }
                    BatchOutcome::Failure(error)
                }
            };

            Some(BatchResult {
                index,
                input,
                outcome,
                duration_ms: Some(started.elapsed().as_secs_f64() * 1000.0),
            })
        })
        .buffer_unordered(options.concurrency);

    let mut results = Vec::with_capacity(total);
    while let Some(finished) = pending.next().await {
        let Some(result) = finished else {
            continue;
        };
        results.push(result);
        if let Some(observer) = progress {
            observer.on_progress(results.len(), total);
        }
    }

    let summary = BatchSummary::from_results(results);
    if summary.total < total {
        debug!("Batch halted after {} of {total} items", summary.total);
    }
    Ok(summary)
}
