use crate::domain::model::{ReportId, ReportParams, Value};
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::require_param;

pub const DEFAULT_LIMIT: usize = 5;
pub const DEFAULT_MAX_PRICE: f64 = 15.0;
pub const DEFAULT_TYPE_PREFIX: &str = "Adult";

/// Weekday names in schedule order, Monday first.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Sort key for unrecognized weekday values.
pub const UNKNOWN_WEEKDAY_RANK: u8 = 99;

/// Monday = 1 .. Sunday = 7, anything else sorts last.
pub fn weekday_rank(day: &str) -> u8 {
    WEEKDAYS
        .iter()
        .position(|d| *d == day)
        .map(|i| i as u8 + 1)
        .unwrap_or(UNKNOWN_WEEKDAY_RANK)
}

fn weekday_order_expr(column: &str) -> String {
    let arms: Vec<String> = WEEKDAYS
        .iter()
        .map(|day| format!("WHEN '{}' THEN {}", day, weekday_rank(day)))
        .collect();
    format!(
        "CASE {} {} ELSE {} END",
        column,
        arms.join(" "),
        UNKNOWN_WEEKDAY_RANK
    )
}

/// How a result column is converted when read back from the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Real,
    Flag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn text(name: &'static str) -> Column {
    Column {
        name,
        kind: ColumnKind::Text,
    }
}

const fn real(name: &'static str) -> Column {
    Column {
        name,
        kind: ColumnKind::Real,
    }
}

const fn flag(name: &'static str) -> Column {
    Column {
        name,
        kind: ColumnKind::Flag,
    }
}

const ATTRACTION_COLUMNS: &[Column] = &[text("name"), text("category"), text("city")];

const OPEN_COLUMNS: &[Column] = &[
    text("name"),
    text("day_of_week"),
    text("open_time"),
    text("close_time"),
];

const CLOSED_COLUMNS: &[Column] = &[text("name"), text("day_of_week"), flag("is_closed")];

const TICKET_COLUMNS: &[Column] = &[
    text("name"),
    text("ticket_type"),
    real("price"),
    text("currency"),
];

const SCHEDULE_COLUMNS: &[Column] = &[
    text("day_of_week"),
    text("open_time"),
    text("close_time"),
    flag("is_closed"),
];

const NAME_COLUMNS: &[Column] = &[text("name")];

/// Result columns of each report, in output order.
pub fn columns(report: ReportId) -> &'static [Column] {
    match report {
        ReportId::AttractionsByCity => ATTRACTION_COLUMNS,
        ReportId::OpenOnDay => OPEN_COLUMNS,
        ReportId::ClosedOnDay => CLOSED_COLUMNS,
        ReportId::TopExpensiveTickets
        | ReportId::CheapTickets
        | ReportId::TicketPriceByTypePrefix => TICKET_COLUMNS,
        ReportId::ScheduleForAttraction => SCHEDULE_COLUMNS,
        ReportId::FreeAttractions => NAME_COLUMNS,
    }
}

pub fn column_names(report: ReportId) -> Vec<&'static str> {
    columns(report).iter().map(|c| c.name).collect()
}

/// Fallback values for the optional report parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDefaults {
    pub limit: usize,
    pub max_price: f64,
    pub type_prefix: String,
}

impl Default for ReportDefaults {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            max_price: DEFAULT_MAX_PRICE,
            type_prefix: DEFAULT_TYPE_PREFIX.to_string(),
        }
    }
}

/// A read-only SQL statement with its positional parameters and result columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportQuery {
    pub report: ReportId,
    pub sql: String,
    pub params: Vec<Value>,
    pub columns: Vec<Column>,
}

impl ReportQuery {
    fn new(report: ReportId, sql: impl Into<String>) -> Self {
        Self {
            report,
            sql: sql.into(),
            params: Vec::new(),
            columns: columns(report).to_vec(),
        }
    }

    fn bind(mut self, value: impl Into<Value>) -> Self {
        self.params.push(value.into());
        self
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|c| c.name).collect()
    }
}

/// Escapes LIKE wildcards so the prefix is matched literally.
fn like_prefix(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn resolve_limit(params: &ReportParams, defaults: &ReportDefaults) -> Result<usize> {
    let limit = params.limit.unwrap_or(defaults.limit);
    if limit == 0 {
        return Err(ReportError::InvalidParameter {
            parameter: "limit".to_string(),
            value: limit.to_string(),
            reason: "limit must be at least 1".to_string(),
        });
    }
    Ok(limit)
}

fn resolve_max_price(params: &ReportParams, defaults: &ReportDefaults) -> Result<f64> {
    let max_price = params.max_price.unwrap_or(defaults.max_price);
    if !max_price.is_finite() || max_price < 0.0 {
        return Err(ReportError::InvalidParameter {
            parameter: "max_price".to_string(),
            value: max_price.to_string(),
            reason: "price ceiling must be a non-negative number".to_string(),
        });
    }
    Ok(max_price)
}

fn resolve_type_prefix<'a>(params: &'a ReportParams, defaults: &'a ReportDefaults) -> &'a str {
    match params.type_prefix.as_deref() {
        Some(prefix) if !prefix.trim().is_empty() => prefix,
        _ => &defaults.type_prefix,
    }
}

/// Builds the query for a report, checking required parameters and applying defaults.
pub fn build_query(
    report: ReportId,
    params: &ReportParams,
    defaults: &ReportDefaults,
) -> Result<ReportQuery> {
    let name = report.name();
    let query = match report {
        ReportId::AttractionsByCity => {
            let city = require_param(name, "city", &params.city)?;
            ReportQuery::new(
                report,
                "SELECT name, category, city FROM attractions \
                 WHERE city = ?1 \
                 ORDER BY category ASC, name ASC",
            )
            .bind(city)
        }
        ReportId::OpenOnDay => {
            let day = require_param(name, "day_of_week", &params.day_of_week)?;
            ReportQuery::new(
                report,
                "SELECT attraction_name AS name, day_of_week, open_time, close_time \
                 FROM opening_hours \
                 WHERE day_of_week = ?1 AND is_closed = 0 \
                 ORDER BY open_time ASC, name ASC",
            )
            .bind(day)
        }
        ReportId::ClosedOnDay => {
            let day = require_param(name, "day_of_week", &params.day_of_week)?;
            ReportQuery::new(
                report,
                "SELECT attraction_name AS name, day_of_week, is_closed \
                 FROM opening_hours \
                 WHERE day_of_week = ?1 AND is_closed = 1 \
                 ORDER BY name ASC",
            )
            .bind(day)
        }
        ReportId::TopExpensiveTickets => {
            let limit = resolve_limit(params, defaults)?;
            ReportQuery::new(
                report,
                "SELECT attraction_name AS name, ticket_type, price, currency \
                 FROM tickets \
                 ORDER BY price DESC, name ASC \
                 LIMIT ?1",
            )
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        }
        ReportId::CheapTickets => {
            let max_price = resolve_max_price(params, defaults)?;
            ReportQuery::new(
                report,
                "SELECT attraction_name AS name, ticket_type, price, currency \
                 FROM tickets \
                 WHERE price <= ?1 \
                 ORDER BY price ASC, name ASC",
            )
            .bind(max_price)
        }
        ReportId::TicketPriceByTypePrefix => {
            let prefix = resolve_type_prefix(params, defaults);
            ReportQuery::new(
                report,
                r"SELECT attraction_name AS name, ticket_type, price, currency
                  FROM tickets
                  WHERE ticket_type LIKE ?1 ESCAPE '\'
                  ORDER BY price DESC, name ASC",
            )
            .bind(like_prefix(prefix))
        }
        ReportId::ScheduleForAttraction => {
            let attraction = require_param(name, "attraction_name", &params.attraction_name)?;
            let sql = format!(
                "SELECT day_of_week, \
                 CASE WHEN is_closed THEN NULL ELSE open_time END AS open_time, \
                 CASE WHEN is_closed THEN NULL ELSE close_time END AS close_time, \
                 is_closed \
                 FROM opening_hours \
                 WHERE attraction_name = ?1 \
                 ORDER BY {}, day_of_week ASC",
                weekday_order_expr("day_of_week")
            );
            ReportQuery::new(report, sql).bind(attraction)
        }
        ReportId::FreeAttractions => ReportQuery::new(
            report,
            "SELECT DISTINCT attraction_name AS name FROM tickets \
             WHERE price = 0 \
             ORDER BY name ASC",
        ),
    };
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_weekday_rank() {
        assert_eq!(weekday_rank("Monday"), 1);
        assert_eq!(weekday_rank("Sunday"), 7);
        assert_eq!(weekday_rank("Holiday"), UNKNOWN_WEEKDAY_RANK);
        assert_eq!(weekday_rank("monday"), UNKNOWN_WEEKDAY_RANK);
    }

    #[test]
    fn test_weekday_order_expr_covers_every_day() {
        let expr = weekday_order_expr("day_of_week");
        assert!(expr.starts_with("CASE day_of_week WHEN 'Monday' THEN 1"));
        assert!(expr.contains("WHEN 'Sunday' THEN 7"));
        assert!(expr.ends_with("ELSE 99 END"));
    }

    #[test]
    fn test_like_prefix_escapes_wildcards() {
        assert_eq!(like_prefix("Adult"), "Adult%");
        assert_eq!(like_prefix("50%_off"), r"50\%\_off%");
    }

    #[test]
    fn test_missing_required_parameter() {
        let defaults = ReportDefaults::default();
        let err = build_query(ReportId::AttractionsByCity, &ReportParams::new(), &defaults)
            .unwrap_err();
        match err {
            ReportError::ParameterMissing { report, parameter } => {
                assert_eq!(report, "attractions_by_city");
                assert_eq!(parameter, "city");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_defaults_are_bound() {
        let defaults = ReportDefaults::default();
        let params = ReportParams::new();

        let top = build_query(ReportId::TopExpensiveTickets, &params, &defaults).unwrap();
        assert_eq!(top.params, vec![Value::Integer(5)]);

        let cheap = build_query(ReportId::CheapTickets, &params, &defaults).unwrap();
        assert_eq!(cheap.params, vec![Value::Real(15.0)]);

        let prefix = build_query(ReportId::TicketPriceByTypePrefix, &params, &defaults).unwrap();
        assert_eq!(prefix.params, vec![Value::Text("Adult%".to_string())]);

        let free = build_query(ReportId::FreeAttractions, &params, &defaults).unwrap();
        assert!(free.params.is_empty());
        assert_eq!(free.column_names(), vec!["name"]);
    }

    #[test]
    fn test_invalid_limit_and_price() {
        let defaults = ReportDefaults::default();
        assert!(matches!(
            build_query(ReportId::TopExpensiveTickets, &ReportParams::new().limit(0), &defaults),
            Err(ReportError::InvalidParameter { .. })
        ));
        assert!(matches!(
            build_query(ReportId::CheapTickets, &ReportParams::new().max_price(-3.0), &defaults),
            Err(ReportError::InvalidParameter { .. })
        ));
    }
}
