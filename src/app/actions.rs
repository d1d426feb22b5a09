//! Side effects requested by the event handler.
//!
//! The handler stays free of Zellij calls; the plugin runtime executes the
//! returned actions in order.

use crate::worker::WorkerMessage;

/// Commands executed by the plugin runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Hides the plugin pane.
    CloseFocus,

    /// Sends a request to the dataset worker.
    PostToWorker(WorkerMessage),
}
