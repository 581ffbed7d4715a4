//! Reporting surface for the command-line tool
//!
//! Builds a single report value from located observations and renders it as
//! text or JSON.

pub mod report;
pub mod formatting;

pub use report::WarehouseReport;
pub use formatting::{JsonFormatter, OutputFormat, TextFormatter};
