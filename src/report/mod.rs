//! Report rendering.
//!
//! Markdown and JSON file reports plus the HTML pages served over HTTP.

pub mod generator;
pub mod html;

pub use generator::{generate_json_report, generate_markdown_report, ReportOptions};
pub use html::{render_analysis_page, render_home_page};
