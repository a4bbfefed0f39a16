pub mod engine;
pub mod reports;

pub use crate::domain::model::{ReportId, ReportParams, Row, Value};
pub use crate::domain::ports::{ConfigProvider, ReportSource};
pub use crate::utils::error::Result;
