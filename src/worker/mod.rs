//! Background dataset worker.
//!
//! # Architecture
//!
//! - `messages`: request/response protocol with trace context propagation
//! - `handler`: message processing (dataset loading, selection export)

pub mod handler;
pub mod messages;

pub use handler::DatasetWorker;
pub use messages::{TraceContext, WorkerMessage, WorkerResponse};
