use crate::core::reports::ReportQuery;
use crate::domain::model::Row;
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read side of the tourism data store.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn fetch(&self, query: &ReportQuery) -> Result<Vec<Row>>;
}

pub trait ConfigProvider: Send + Sync {
    fn database_path(&self) -> &str;
    fn default_limit(&self) -> usize;
    fn default_max_price(&self) -> f64;
    fn default_type_prefix(&self) -> &str;
}
