//! Rendering entry point.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → components → ANSI output
//! ```

use crate::app::AppState;
use crate::ui::components;

/// Renders the plugin UI for a `rows` × `cols` pane to stdout.
///
/// Does not clear the screen; Zellij hands the plugin a fresh frame.
pub fn render(state: &AppState, rows: usize, cols: usize) {
    let viewmodel = state.compute_viewmodel(rows, cols);
    components::render_layout(&viewmodel, &state.theme, cols, rows);
}
