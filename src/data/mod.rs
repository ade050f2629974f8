//! Data module - CSV loading, schema and cleaning

pub mod cleaner;
pub mod encoding;
pub mod loader;
pub mod schema;
pub mod values;

pub use cleaner::{CleanError, CleanedTable, CleaningSummary, DataCleaner};
pub use encoding::{CategoryCodes, CategoryEncodings, MISSING_CODE};
pub use loader::{DataLoader, LoadError};
pub use schema::SchemaError;
