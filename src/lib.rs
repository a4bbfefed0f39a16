pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{OutputFormat, SqliteSource};
pub use config::toml_config::ReportsConfig;
pub use crate::core::engine::ReportEngine;
pub use domain::model::{ReportId, ReportParams, Row, Value};
pub use utils::error::{ReportError, Result};
