// Data Review - Core Library
// Exposes the record model, filters, and CSV export for the dashboard, API server, and tests

pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod record;
pub mod review;
pub mod store;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use config::Config;
pub use error::{ConfigError, LoadError};
pub use export::{
    export_csv, export_csv_today, export_filename, to_csv, validation_errors_cell,
    CsvExport, CSV_HEADERS, CSV_MIME,
};
pub use filter::{filter_records, FilterParseError, SeverityFilter, StatusFilter};
pub use loader::{parse_payload, spawn_load, DataSource};
pub use record::{Field, FieldErrors, Record, Severity, Status, ValidationError};
pub use review::{error_summary, Action, LoadState, ReviewState, NO_ISSUES_MESSAGE};
pub use store::{DataPayload, RecordStore, StoreSummary};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
