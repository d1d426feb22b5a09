//! Event handling and state transition logic.
//!
//! [`handle_event`] is the single entry point: it mutates [`AppState`] and
//! returns whether a re-render is needed plus the side effects to run.
//!
//! # Event Types
//!
//! - **Navigation**: `KeyDown`, `KeyUp`, `ColumnLeft`, `ColumnRight`
//! - **Sorting**: `SortFocused`, `SortColumn`
//! - **Selection**: `ToggleRow`, `ToggleSelectAll`, `Escape` in normal mode
//! - **Search**: `SearchMode`, `FocusSearchBar`, `FocusResults`, `ExitSearch`,
//!   `Char`, `Backspace`
//! - **System**: `Reload`, `CloseFocus`, `WorkerResponse`
//!
//! Selection changes reported by the table are drained after every event and,
//! when an export file is configured, turned into export requests.
//!
//! # Example
//!
//! ```rust
//! use tabula::app::{handle_event, AppState, Event};
//! use tabula::dataset::sample_users;
//! use tabula::table::TableOptions;
//! use tabula::ui::Theme;
//! use tabula::worker::WorkerResponse;
//!
//! let mut state = AppState::new(TableOptions::selectable(), Theme::default());
//! let loaded = WorkerResponse::DatasetLoaded { source: "sample users".into(), dataset: sample_users() };
//! handle_event(&mut state, &Event::WorkerResponse(loaded))?;
//!
//! let (render, _) = handle_event(&mut state, &Event::ToggleRow)?;
//! assert!(render);
//! assert_eq!(state.table.summary().selected, 1);
//! # Ok::<(), tabula::TabulaError>(())
//! ```

use super::modes::{InputMode, SearchFocus};
use super::state::StatusLine;
use crate::app::{Action, AppState};
use crate::domain::error::Result;
use crate::worker::{WorkerMessage, WorkerResponse};

/// Events triggered by user input or worker responses.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Moves the row cursor down (wraps to top).
    KeyDown,
    /// Moves the row cursor up (wraps to bottom).
    KeyUp,
    /// Focuses the previous column.
    ColumnLeft,
    /// Focuses the next column.
    ColumnRight,
    /// Clicks the header of the focused column.
    SortFocused,
    /// Clicks the header of the column at this zero-based index.
    SortColumn(usize),
    /// Toggles the row under the cursor.
    ToggleRow,
    /// Clicks the select-all checkbox.
    ToggleSelectAll,
    /// Enters search mode with typing focus.
    SearchMode,
    /// Focuses the search input (from navigating focus).
    FocusSearchBar,
    /// Focuses the filtered rows (from typing focus).
    FocusResults,
    /// Leaves search mode and clears the query.
    ExitSearch,
    /// Appends a character to the search query.
    Char(char),
    /// Removes the last character from the search query.
    Backspace,
    /// Leaves search mode, or clears the selection in normal mode.
    Escape,
    /// Reloads the dataset.
    Reload,
    /// Hides the plugin pane.
    CloseFocus,
    /// Wraps a response from the dataset worker.
    WorkerResponse(WorkerResponse),
}

/// Processes an event, mutates application state, and returns actions to
/// execute.
///
/// The boolean is `true` when the UI needs a re-render.
///
/// # Errors
///
/// Currently infallible; the `Result` leaves room for handlers that validate
/// worker payloads.
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?EventKind(event)).entered();

    let (render, mut actions) = dispatch(state, event);
    actions.extend(selection_exports(state));
    Ok((render, actions))
}

fn dispatch(state: &mut AppState, event: &Event) -> (bool, Vec<Action>) {
    match event {
        Event::KeyDown => {
            state.move_cursor_down();
            (true, vec![])
        }
        Event::KeyUp => {
            state.move_cursor_up();
            (true, vec![])
        }
        Event::ColumnLeft => {
            state.move_column_left();
            (true, vec![])
        }
        Event::ColumnRight => {
            state.move_column_right();
            (true, vec![])
        }
        Event::SortFocused => (state.sort_focused(), vec![]),
        Event::SortColumn(index) => (state.sort_column(*index), vec![]),
        Event::ToggleRow => (state.toggle_cursor_row(), vec![]),
        Event::ToggleSelectAll => (state.table.toggle_select_all(), vec![]),
        Event::CloseFocus => (false, vec![Action::CloseFocus]),
        Event::SearchMode => {
            tracing::debug!("entering search mode");
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            state.search_query.clear();
            state.apply_search_filter();
            (true, vec![])
        }
        Event::FocusSearchBar => {
            if !state.input_mode.is_search() {
                return (false, vec![]);
            }
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            (true, vec![])
        }
        Event::FocusResults => {
            if state.search_query.trim().is_empty() {
                exit_search(state);
            } else {
                state.input_mode = InputMode::Search(SearchFocus::Navigating);
            }
            (true, vec![])
        }
        Event::ExitSearch => {
            exit_search(state);
            (true, vec![])
        }
        Event::Char(c) => {
            if !state.input_mode.is_typing() {
                return (false, vec![]);
            }
            state.search_query.push(*c);
            tracing::trace!(query = %state.search_query, "search query updated");
            state.apply_search_filter();
            (true, vec![])
        }
        Event::Backspace => {
            if !state.input_mode.is_typing() || state.search_query.pop().is_none() {
                return (false, vec![]);
            }
            state.apply_search_filter();
            (true, vec![])
        }
        Event::Escape => {
            if state.input_mode.is_search() {
                exit_search(state);
                (true, vec![])
            } else {
                (state.table.clear_selection(), vec![])
            }
        }
        Event::Reload => {
            tracing::debug!(data_file = ?state.data_file, "reloading dataset");
            state.table.set_loading(true);
            state.status = Some(StatusLine::Info("Reloading…".to_string()));
            (
                true,
                vec![Action::PostToWorker(WorkerMessage::load_dataset(state.data_file.clone()))],
            )
        }
        Event::WorkerResponse(response) => handle_worker_response(state, response),
    }
}

fn exit_search(state: &mut AppState) {
    tracing::debug!(query = %state.search_query, "exiting search mode");
    state.input_mode = InputMode::Normal;
    state.search_query.clear();
    state.apply_search_filter();
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> (bool, Vec<Action>) {
    match response {
        WorkerResponse::DatasetLoaded { source, dataset } => {
            tracing::debug!(source = %source, rows = dataset.rows.len(), "dataset loaded");
            state.install_dataset(source, dataset.clone());
            state.status = Some(StatusLine::Info(format!("Loaded {} rows from {source}", dataset.rows.len())));
            (true, vec![])
        }
        WorkerResponse::SelectionExported { path, count } => {
            tracing::debug!(path = %path, count, "selection exported");
            let noun = if *count == 1 { "row" } else { "rows" };
            state.status = Some(StatusLine::Info(format!("Exported {count} {noun} to {path}")));
            (true, vec![])
        }
        WorkerResponse::Error { message } => {
            tracing::error!(error = %message, "worker error");
            state.table.set_loading(false);
            state.status = Some(StatusLine::Error(message.clone()));
            (true, vec![])
        }
    }
}

/// Export requests for selections reported since the last event.
fn selection_exports(state: &mut AppState) -> Vec<Action> {
    let changes = state.take_selection_changes();
    let Some(path) = state.export_path.clone() else {
        return vec![];
    };
    changes
        .into_iter()
        .map(|rows| Action::PostToWorker(WorkerMessage::export_selection(path.clone(), rows)))
        .collect()
}

/// Span label that omits worker payloads.
struct EventKind<'a>(&'a Event);

impl std::fmt::Debug for EventKind<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Event::WorkerResponse(WorkerResponse::DatasetLoaded { .. }) => f.write_str("DatasetLoaded"),
            Event::WorkerResponse(WorkerResponse::SelectionExported { .. }) => f.write_str("SelectionExported"),
            Event::WorkerResponse(WorkerResponse::Error { .. }) => f.write_str("WorkerError"),
            other => write!(f, "{other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::sample_users;
    use crate::table::TableOptions;
    use crate::ui::theme::Theme;

    fn loaded_state() -> AppState {
        let mut state = AppState::new(TableOptions::selectable(), Theme::default());
        let response = WorkerResponse::DatasetLoaded {
            source: "sample users".to_string(),
            dataset: sample_users(),
        };
        handle_event(&mut state, &Event::WorkerResponse(response)).unwrap();
        state
    }

    fn exported_rows(actions: &[Action]) -> Vec<usize> {
        actions
            .iter()
            .filter_map(|action| match action {
                Action::PostToWorker(WorkerMessage::ExportSelection { rows, .. }) => Some(rows.len()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn dataset_loaded_installs_rows_and_status() {
        let state = loaded_state();
        assert_eq!(state.table.len(), 5);
        assert!(!state.table.options().loading);
        assert_eq!(
            state.status,
            Some(StatusLine::Info("Loaded 5 rows from sample users".to_string()))
        );
    }

    #[test]
    fn selection_changes_become_exports_when_configured() {
        let mut state = loaded_state();
        let (_, actions) = handle_event(&mut state, &Event::ToggleRow).unwrap();
        assert!(actions.is_empty());

        state.export_path = Some("/data/selected.json".to_string());
        let (_, actions) = handle_event(&mut state, &Event::ToggleSelectAll).unwrap();
        assert_eq!(exported_rows(&actions), vec![5]);
    }

    #[test]
    fn sorting_never_exports() {
        let mut state = loaded_state();
        state.export_path = Some("/data/selected.json".to_string());
        handle_event(&mut state, &Event::ToggleRow).unwrap();

        let (render, actions) = handle_event(&mut state, &Event::SortColumn(0)).unwrap();
        assert!(render);
        assert!(actions.is_empty());
    }

    #[test]
    fn escape_clears_selection_in_normal_mode() {
        let mut state = loaded_state();
        handle_event(&mut state, &Event::ToggleRow).unwrap();

        let (render, _) = handle_event(&mut state, &Event::Escape).unwrap();
        assert!(render);
        assert_eq!(state.table.summary().selected, 0);

        let (render, _) = handle_event(&mut state, &Event::Escape).unwrap();
        assert!(!render);
    }

    #[test]
    fn typing_filters_and_escape_restores() {
        let mut state = loaded_state();
        handle_event(&mut state, &Event::SearchMode).unwrap();
        for c in "jane".chars() {
            handle_event(&mut state, &Event::Char(c)).unwrap();
        }
        assert_eq!(state.table.len(), 1);

        handle_event(&mut state, &Event::FocusResults).unwrap();
        assert_eq!(state.input_mode, InputMode::Search(SearchFocus::Navigating));

        let (render, _) = handle_event(&mut state, &Event::Char('x')).unwrap();
        assert!(!render);

        handle_event(&mut state, &Event::Escape).unwrap();
        assert_eq!(state.input_mode, InputMode::Normal);
        assert_eq!(state.table.len(), 5);
    }

    #[test]
    fn focus_results_with_blank_query_leaves_search() {
        let mut state = loaded_state();
        handle_event(&mut state, &Event::SearchMode).unwrap();
        handle_event(&mut state, &Event::FocusResults).unwrap();
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn reload_requests_configured_file() {
        let mut state = loaded_state();
        state.data_file = Some("/host/users.json".to_string());

        let (_, actions) = handle_event(&mut state, &Event::Reload).unwrap();
        assert!(state.table.options().loading);
        assert!(matches!(
            actions.as_slice(),
            [Action::PostToWorker(WorkerMessage::LoadDataset { path: Some(p), .. })] if p == "/host/users.json"
        ));
    }

    #[test]
    fn worker_error_stops_loading_and_reports() {
        let mut state = AppState::new(TableOptions::selectable(), Theme::default());
        let response = WorkerResponse::Error {
            message: "missing file".to_string(),
        };
        handle_event(&mut state, &Event::WorkerResponse(response)).unwrap();

        assert!(!state.table.options().loading);
        assert_eq!(state.status, Some(StatusLine::Error("missing file".to_string())));
    }

    #[test]
    fn close_focus_emits_action() {
        let mut state = loaded_state();
        let (render, actions) = handle_event(&mut state, &Event::CloseFocus).unwrap();
        assert!(!render);
        assert_eq!(actions, vec![Action::CloseFocus]);
    }
}
