//! exitscore-report — Report rendering.
//!
//! Renders assessment reports as self-contained HTML pages.

pub mod html;

pub use html::{generate_html, write_html_report};
