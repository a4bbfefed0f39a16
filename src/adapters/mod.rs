// Adapters layer: concrete implementations for external systems (sqlite store, dataset loading, rendering).

pub mod loader;
pub mod output;
pub mod sqlite;

pub use output::OutputFormat;
pub use sqlite::SqliteSource;
