//! Maud HTML template components for the web UI.
//!
//! - `layout`: base page layout and navigation
//! - `alert`: alert messages and status boxes

pub mod alert;
pub mod layout;

pub use alert::{Alert, AlertVariant};
pub use layout::BaseLayout;
