use crate::core::reports::{build_query, ReportDefaults};
use crate::core::{ConfigProvider, ReportSource};
use crate::domain::model::{ReportId, ReportParams, Row};
use crate::utils::error::Result;

/// Runs named reports against a [`ReportSource`]. Holds no per-call state.
pub struct ReportEngine<S: ReportSource> {
    source: S,
    defaults: ReportDefaults,
}

impl<S: ReportSource> ReportEngine<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            defaults: ReportDefaults::default(),
        }
    }

    pub fn with_defaults(source: S, defaults: ReportDefaults) -> Self {
        Self { source, defaults }
    }

    pub fn from_config(source: S, config: &impl ConfigProvider) -> Self {
        Self::with_defaults(
            source,
            ReportDefaults {
                limit: config.default_limit(),
                max_price: config.default_max_price(),
                type_prefix: config.default_type_prefix().to_string(),
            },
        )
    }

    pub fn defaults(&self) -> &ReportDefaults {
        &self.defaults
    }

    /// Runs one report. No matching rows yields an empty vector, not an error.
    pub async fn run_report(&self, report: ReportId, params: &ReportParams) -> Result<Vec<Row>> {
        let query = build_query(report, params, &self.defaults)?;
        tracing::debug!(report = %report, sql = %query.sql, params = ?query.params, "running report");

        let rows = self.source.fetch(&query).await?;

        if rows.is_empty() {
            tracing::info!(report = %report, "report returned no rows");
        } else {
            tracing::info!(report = %report, rows = rows.len(), "report completed");
        }
        Ok(rows)
    }

    pub async fn run_named(&self, report: &str, params: &ReportParams) -> Result<Vec<Row>> {
        let report: ReportId = report.parse()?;
        self.run_report(report, params).await
    }
}
