//! Worker protocol.
//!
//! The plugin thread sends [`WorkerMessage`]s to the dataset worker and gets
//! [`WorkerResponse`]s back, both as JSON payloads. Requests carry an optional
//! [`TraceContext`] so worker spans join the plugin's trace.

use crate::dataset::Dataset;
use crate::domain::Record;
use serde::{Deserialize, Serialize};

/// Trace and parent span IDs of the sending span, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceContext {
    /// OpenTelemetry trace ID (32 hex digits).
    pub trace_id: String,

    /// Span ID of the sender (16 hex digits).
    pub parent_span_id: String,
}

impl TraceContext {
    /// Captures the OpenTelemetry context of the current tracing span.
    ///
    /// Returns `None` when the span has no valid context, e.g. when tracing
    /// is disabled.
    pub fn from_current() -> Option<Self> {
        use opentelemetry::trace::TraceContextExt;
        use tracing_opentelemetry::OpenTelemetrySpanExt;

        let otel_context = tracing::Span::current().context();
        let span_ref = otel_context.span();
        let span_context = span_ref.span_context();

        if !span_context.is_valid() {
            return None;
        }

        Some(Self {
            trace_id: format!("{:032x}", span_context.trace_id()),
            parent_span_id: format!("{:016x}", span_context.span_id()),
        })
    }
}

/// Generates constructors that attach the current trace context.
macro_rules! worker_message_builders {
    (
        $(
            $builder_name:ident($variant:ident { $($field:ident: $ty:ty),* $(,)? })
        ),* $(,)?
    ) => {
        impl WorkerMessage {
            $(
                #[doc = concat!("Creates a `", stringify!($variant), "` message in the current trace.")]
                #[must_use]
                pub fn $builder_name($($field: $ty),*) -> Self {
                    Self::$variant {
                        $($field,)*
                        trace_context: TraceContext::from_current(),
                    }
                }
            )*
        }
    };
}

worker_message_builders! {
    load_dataset(LoadDataset { path: Option<String> }),
    export_selection(ExportSelection { path: String, rows: Vec<Record> }),
}

/// Requests handled by the dataset worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerMessage {
    /// Load a dataset file, or the sample users when `path` is `None`.
    LoadDataset {
        /// Dataset file path inside the plugin sandbox.
        path: Option<String>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },

    /// Write the given rows to `path` as a JSON array.
    ExportSelection {
        /// Destination path inside the plugin sandbox.
        path: String,

        /// Selected rows, in selection order.
        rows: Vec<Record>,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        trace_context: Option<TraceContext>,
    },
}

impl WorkerMessage {
    /// Trace context attached to the message.
    #[must_use]
    pub const fn trace_context(&self) -> Option<&TraceContext> {
        match self {
            Self::LoadDataset { trace_context, .. } | Self::ExportSelection { trace_context, .. } => {
                trace_context.as_ref()
            }
        }
    }

    /// Variant name, for span fields.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::LoadDataset { .. } => "load_dataset",
            Self::ExportSelection { .. } => "export_selection",
        }
    }
}

/// Replies from the dataset worker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorkerResponse {
    /// A dataset was loaded.
    DatasetLoaded {
        /// Where it came from, for the status line.
        source: String,

        /// The dataset.
        dataset: Dataset,
    },

    /// A selection was written.
    SelectionExported {
        /// Destination path.
        path: String,

        /// Number of rows written.
        count: usize,
    },

    /// The request failed.
    Error {
        /// Human-readable error message.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_round_trip_without_trace_context() {
        let message = WorkerMessage::LoadDataset {
            path: Some("/host/users.json".to_string()),
            trace_context: None,
        };
        let json = serde_json::to_string(&message).unwrap();
        assert!(!json.contains("trace_context"));
        assert_eq!(serde_json::from_str::<WorkerMessage>(&json).unwrap(), message);
    }

    #[test]
    fn builders_work_without_a_subscriber() {
        let message = WorkerMessage::export_selection("/data/out.json".to_string(), Vec::new());
        assert_eq!(message.kind(), "export_selection");
        assert!(message.trace_context().is_none());
    }
}
