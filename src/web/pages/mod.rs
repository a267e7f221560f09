//! Maud-based page templates for the web UI.
//!
//! Each page module exports a render function that produces the complete HTML.

pub mod index;
pub mod missing_config;

pub use index::render_index_page;
pub use missing_config::render_missing_config_page;
