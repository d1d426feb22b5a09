//! Terminal rendering.
//!
//! ```text
//! AppState → compute_viewmodel → UIViewModel → render → ANSI Output
//! ```
//!
//! # Modules
//!
//! - [`viewmodel`]: display-ready view model types
//! - [`renderer`]: top-level render entry point
//! - [`components`]: per-element renderers and layout
//! - [`helpers`]: text measurement, truncation, column fitting, highlighting
//! - [`theme`]: color schemes and ANSI escapes

pub mod components;
pub mod helpers;
pub mod renderer;
pub mod theme;
pub mod viewmodel;

pub use renderer::render;
pub use theme::Theme;
pub use viewmodel::{
    CheckState, ColumnHeader, DisplayCell, DisplayRow, EmptyState, FooterInfo, HeaderInfo, SearchBarInfo,
    StatusBarInfo, TableBody, UIViewModel,
};
