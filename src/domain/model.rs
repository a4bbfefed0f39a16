use crate::utils::error::{ReportError, Result};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single column value as read from the data store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Boolean(bool),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Real(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Integer(v) => write!(f, "{}", v),
            Value::Real(v) => write!(f, "{:.2}", v),
            Value::Text(s) => f.write_str(s),
            Value::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

/// One record returned by a report. Columns keep the order of the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    fields: Vec<(String, Value)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &str, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    pub fn push(&mut self, column: &str, value: impl Into<Value>) {
        self.fields.push((column.to_string(), value.into()));
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn text(&self, column: &str) -> Option<&str> {
        self.get(column).and_then(Value::as_str)
    }

    pub fn number(&self, column: &str) -> Option<f64> {
        self.get(column).and_then(Value::as_f64)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.fields.iter().map(|(_, value)| value)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl Serialize for Row {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

/// The eight reports the layer knows how to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportId {
    AttractionsByCity,
    OpenOnDay,
    ClosedOnDay,
    TopExpensiveTickets,
    CheapTickets,
    TicketPriceByTypePrefix,
    ScheduleForAttraction,
    FreeAttractions,
}

impl ReportId {
    pub const ALL: [ReportId; 8] = [
        ReportId::AttractionsByCity,
        ReportId::OpenOnDay,
        ReportId::ClosedOnDay,
        ReportId::TopExpensiveTickets,
        ReportId::CheapTickets,
        ReportId::TicketPriceByTypePrefix,
        ReportId::ScheduleForAttraction,
        ReportId::FreeAttractions,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReportId::AttractionsByCity => "attractions_by_city",
            ReportId::OpenOnDay => "open_on_day",
            ReportId::ClosedOnDay => "closed_on_day",
            ReportId::TopExpensiveTickets => "top_expensive_tickets",
            ReportId::CheapTickets => "cheap_tickets",
            ReportId::TicketPriceByTypePrefix => "ticket_price_by_type_prefix",
            ReportId::ScheduleForAttraction => "schedule_for_attraction",
            ReportId::FreeAttractions => "free_attractions",
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            ReportId::AttractionsByCity => "Attractions in a city, by category then name",
            ReportId::OpenOnDay => "Attractions open on a day, earliest opening first",
            ReportId::ClosedOnDay => "Attractions closed on a day",
            ReportId::TopExpensiveTickets => "Most expensive tickets",
            ReportId::CheapTickets => "Tickets at or below a price ceiling",
            ReportId::TicketPriceByTypePrefix => "Ticket prices for a ticket type prefix",
            ReportId::ScheduleForAttraction => "Weekly schedule of one attraction, Monday first",
            ReportId::FreeAttractions => "Attractions with a free ticket",
        }
    }

    /// Parameters that must be supplied by the caller; defaulted ones are not listed.
    pub fn required_parameters(&self) -> &'static [&'static str] {
        match self {
            ReportId::AttractionsByCity => &["city"],
            ReportId::OpenOnDay | ReportId::ClosedOnDay => &["day_of_week"],
            ReportId::ScheduleForAttraction => &["attraction_name"],
            ReportId::TopExpensiveTickets
            | ReportId::CheapTickets
            | ReportId::TicketPriceByTypePrefix
            | ReportId::FreeAttractions => &[],
        }
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ReportId {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        ReportId::ALL
            .into_iter()
            .find(|id| id.name() == normalized)
            .ok_or_else(|| ReportError::UnknownReport {
                name: s.to_string(),
            })
    }
}

/// Optional inputs for a report. Which ones matter depends on the report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportParams {
    pub city: Option<String>,
    pub day_of_week: Option<String>,
    pub attraction_name: Option<String>,
    pub limit: Option<usize>,
    pub max_price: Option<f64>,
    pub type_prefix: Option<String>,
}

impl ReportParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn day_of_week(mut self, day: impl Into<String>) -> Self {
        self.day_of_week = Some(day.into());
        self
    }

    pub fn attraction_name(mut self, name: impl Into<String>) -> Self {
        self.attraction_name = Some(name.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn max_price(mut self, max_price: f64) -> Self {
        self.max_price = Some(max_price);
        self
    }

    pub fn type_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.type_prefix = Some(prefix.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_id_parsing() {
        assert_eq!(
            "cheap_tickets".parse::<ReportId>().unwrap(),
            ReportId::CheapTickets
        );
        assert_eq!(
            "Schedule-For-Attraction".parse::<ReportId>().unwrap(),
            ReportId::ScheduleForAttraction
        );
        assert!(matches!(
            "all_tickets".parse::<ReportId>(),
            Err(ReportError::UnknownReport { .. })
        ));
    }

    #[test]
    fn test_every_report_name_round_trips() {
        for id in ReportId::ALL {
            assert_eq!(id.name().parse::<ReportId>().unwrap(), id);
        }
    }

    #[test]
    fn test_row_serializes_in_column_order() {
        let row = Row::new()
            .with("name", "Louvre Museum")
            .with("price", 22.0)
            .with("open_time", Value::Null);

        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, r#"{"name":"Louvre Museum","price":22.0,"open_time":null}"#);
        assert_eq!(row.text("name"), Some("Louvre Museum"));
        assert_eq!(row.number("price"), Some(22.0));
        assert!(row.get("missing").is_none());
    }
}
