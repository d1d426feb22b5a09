//! Dataset worker.
//!
//! Runs on the Zellij worker thread so that file I/O never blocks rendering.
//! The binary wraps [`DatasetWorker`] in the `ZellijWorker` interface and
//! forwards raw payloads to [`DatasetWorker::on_payload`].

use crate::dataset::{self, DatasetSource};
use crate::domain::error::Result;
use crate::worker::{WorkerMessage, WorkerResponse};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};

/// Handles dataset loads and selection exports.
#[derive(Debug, Default)]
pub struct DatasetWorker {
    handled: usize,
}

/// Set once worker tracing has been installed.
static WORKER_TRACING_INITIALIZED: AtomicBool = AtomicBool::new(false);

impl DatasetWorker {
    /// Creates a worker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of messages handled so far.
    #[must_use]
    pub const fn handled(&self) -> usize {
        self.handled
    }

    /// Maps an operation result to a response, logging either outcome.
    fn respond<T, F>(operation: &str, result: Result<T>, on_success: F) -> WorkerResponse
    where
        F: FnOnce(T) -> WorkerResponse,
    {
        match result {
            Ok(value) => {
                tracing::debug!(operation, "worker operation successful");
                on_success(value)
            }
            Err(e) => {
                tracing::warn!(operation, error = %e, "worker operation failed");
                WorkerResponse::Error {
                    message: format!("{operation}: {e}"),
                }
            }
        }
    }

    fn handle_load_dataset(path: Option<&str>) -> WorkerResponse {
        let source = dataset::source_for(path);
        let origin = source.describe();

        Self::respond("load dataset", source.load(), |dataset| {
            tracing::info!(source = %origin, rows = dataset.rows.len(), "dataset ready");
            WorkerResponse::DatasetLoaded {
                source: origin,
                dataset,
            }
        })
    }

    fn handle_export_selection(path: String, rows: &[crate::domain::Record]) -> WorkerResponse {
        Self::respond(
            "export selection",
            dataset::export_selection(Path::new(&path), rows),
            |count| WorkerResponse::SelectionExported { path, count },
        )
    }

    /// Re-parents the current thread's OpenTelemetry context onto the
    /// sender's span. The guard must live for the whole operation.
    fn attach_parent_trace_context(message: &WorkerMessage) -> Option<opentelemetry::ContextGuard> {
        use opentelemetry::trace::{SpanContext, SpanId, TraceContextExt, TraceFlags, TraceId, TraceState};

        let trace_context = message.trace_context()?;
        let trace_id = TraceId::from_hex(&trace_context.trace_id).ok()?;
        let span_id = SpanId::from_hex(&trace_context.parent_span_id).ok()?;

        let span_context = SpanContext::new(trace_id, span_id, TraceFlags::SAMPLED, true, TraceState::default());
        Some(opentelemetry::Context::current().with_remote_span_context(span_context).attach())
    }

    /// Handles one request.
    pub fn handle_message(&mut self, message: WorkerMessage) -> WorkerResponse {
        let _context_guard = Self::attach_parent_trace_context(&message);
        let _span = tracing::debug_span!("worker_handle_message", kind = message.kind()).entered();

        self.handled += 1;

        match message {
            WorkerMessage::LoadDataset { path, .. } => Self::handle_load_dataset(path.as_deref()),
            WorkerMessage::ExportSelection { path, rows, .. } => Self::handle_export_selection(path, &rows),
        }
    }

    /// Handles a JSON-encoded [`WorkerMessage`] and returns the JSON-encoded
    /// response.
    ///
    /// Installs worker tracing on first use. Returns `None` when the payload
    /// is not a valid message or the response cannot be encoded.
    pub fn on_payload(&mut self, payload: &str) -> Option<String> {
        if !WORKER_TRACING_INITIALIZED.swap(true, Ordering::Relaxed) {
            crate::observability::init_tracing(&crate::Config::default());
        }

        let message: WorkerMessage = match serde_json::from_str(payload) {
            Ok(message) => message,
            Err(e) => {
                tracing::warn!(error = %e, "failed to deserialize worker message");
                return None;
            }
        };

        let response = self.handle_message(message);
        serde_json::to_string(&response)
            .map_err(|e| tracing::warn!(error = %e, "failed to serialize worker response"))
            .ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Record;
    use tempfile::TempDir;

    #[test]
    fn loads_sample_when_no_path_is_given() {
        let mut worker = DatasetWorker::new();
        let response = worker.handle_message(WorkerMessage::LoadDataset {
            path: None,
            trace_context: None,
        });

        match response {
            WorkerResponse::DatasetLoaded { source, dataset } => {
                assert_eq!(source, "sample users");
                assert_eq!(dataset.rows.len(), 5);
            }
            other => panic!("unexpected response: {other:?}"),
        }
        assert_eq!(worker.handled(), 1);
    }

    #[test]
    fn missing_file_becomes_error_response() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.json").display().to_string();

        let response = DatasetWorker::new().handle_message(WorkerMessage::LoadDataset {
            path: Some(path),
            trace_context: None,
        });
        assert!(matches!(response, WorkerResponse::Error { message } if message.starts_with("load dataset")));
    }

    #[test]
    fn exports_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("selected.json").display().to_string();

        let response = DatasetWorker::new().handle_message(WorkerMessage::ExportSelection {
            path: path.clone(),
            rows: vec![Record::new().with("id", 1), Record::new().with("id", 2)],
            trace_context: None,
        });
        assert_eq!(response, WorkerResponse::SelectionExported { path, count: 2 });
    }
}
