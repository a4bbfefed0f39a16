//! Offline loading of the tourism dataset.
//!
//! The reporting layer only ever reads; this module creates the schema and
//! fills it, either from CSV files or from the bundled Paris demo data.

use crate::utils::error::{ReportError, Result};
use chrono::NaiveTime;
use rusqlite::{params, Connection, Transaction};
use serde::Deserialize;
use std::path::Path;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS attractions (
    name TEXT NOT NULL,
    category TEXT NOT NULL,
    city TEXT NOT NULL,
    PRIMARY KEY (name, city)
);
CREATE TABLE IF NOT EXISTS opening_hours (
    attraction_name TEXT NOT NULL,
    day_of_week TEXT NOT NULL,
    open_time TEXT,
    close_time TEXT,
    is_closed INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (attraction_name, day_of_week)
);
CREATE TABLE IF NOT EXISTS tickets (
    attraction_name TEXT NOT NULL,
    ticket_type TEXT NOT NULL,
    price REAL NOT NULL CHECK (price >= 0),
    currency TEXT NOT NULL,
    PRIMARY KEY (attraction_name, ticket_type)
);
"#;

pub const ATTRACTIONS_FILE: &str = "attractions.csv";
pub const OPENING_HOURS_FILE: &str = "opening_hours.csv";
pub const TICKETS_FILE: &str = "tickets.csv";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AttractionRecord {
    pub name: String,
    pub category: String,
    pub city: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OpeningHoursRecord {
    pub attraction_name: String,
    pub day_of_week: String,
    pub open_time: Option<String>,
    pub close_time: Option<String>,
    pub is_closed: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TicketRecord {
    pub attraction_name: String,
    pub ticket_type: String,
    pub price: f64,
    pub currency: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub attractions: usize,
    pub opening_hours: usize,
    pub tickets: usize,
}

/// Where `init_database` takes its rows from.
#[derive(Debug, Clone)]
pub enum DatasetSource<'a> {
    Demo,
    CsvDir(&'a Path),
}

pub fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    Ok(())
}

/// Creates (or reuses) the database file, ensures the schema and loads rows.
pub fn init_database(path: &Path, source: DatasetSource<'_>) -> Result<LoadStats> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut conn = Connection::open(path)?;
    create_schema(&conn)?;

    let stats = match source {
        DatasetSource::Demo => load_demo_dataset(&mut conn)?,
        DatasetSource::CsvDir(dir) => load_csv_dir(&mut conn, dir)?,
    };
    tracing::info!(
        "Loaded {} attractions, {} opening hours, {} tickets into {}",
        stats.attractions,
        stats.opening_hours,
        stats.tickets,
        path.display()
    );
    Ok(stats)
}

fn parse_flag(file: &str, raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Ok(true),
        "0" | "false" | "no" | "n" | "" => Ok(false),
        other => Err(ReportError::LoadError {
            file: file.to_string(),
            message: format!("invalid is_closed value '{}'", other),
        }),
    }
}

fn read_csv<T: serde::de::DeserializeOwned>(dir: &Path, file: &str) -> Result<Vec<T>> {
    let path = dir.join(file);
    if !path.is_file() {
        return Err(ReportError::LoadError {
            file: path.display().to_string(),
            message: "file not found".to_string(),
        });
    }
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(&path)?;
    let mut records = Vec::new();
    for record in reader.deserialize() {
        records.push(record?);
    }
    tracing::debug!("Read {} records from {}", records.len(), path.display());
    Ok(records)
}

fn insert_attractions(tx: &Transaction<'_>, records: &[AttractionRecord]) -> Result<usize> {
    let mut stmt = tx.prepare(
        "INSERT OR REPLACE INTO attractions (name, category, city) VALUES (?1, ?2, ?3)",
    )?;
    for r in records {
        stmt.execute(params![r.name, r.category, r.city])?;
    }
    Ok(records.len())
}

fn insert_opening_hours(tx: &Transaction<'_>, records: &[OpeningHoursRecord]) -> Result<usize> {
    let mut stmt = tx.prepare(
        "INSERT OR REPLACE INTO opening_hours \
         (attraction_name, day_of_week, open_time, close_time, is_closed) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
    )?;
    for r in records {
        let closed = parse_flag(OPENING_HOURS_FILE, &r.is_closed)?;
        let open_time = parse_time(r, r.open_time.as_deref())?;
        let close_time = parse_time(r, r.close_time.as_deref())?;
        if !closed && (open_time.is_none() || close_time.is_none()) {
            return Err(ReportError::LoadError {
                file: OPENING_HOURS_FILE.to_string(),
                message: format!(
                    "{} / {} is open but has no opening or closing time",
                    r.attraction_name, r.day_of_week
                ),
            });
        }
        stmt.execute(params![r.attraction_name, r.day_of_week, open_time, close_time, closed])?;
    }
    Ok(records.len())
}

/// Normalizes a time cell to zero-padded `HH:MM` so text ordering matches
/// clock ordering. Blank cells are `None`.
fn parse_time(record: &OpeningHoursRecord, raw: Option<&str>) -> Result<Option<String>> {
    let raw = match raw.map(str::trim) {
        Some(t) if !t.is_empty() => t,
        _ => return Ok(None),
    };
    let time = NaiveTime::parse_from_str(raw, "%H:%M").map_err(|e| ReportError::LoadError {
        file: OPENING_HOURS_FILE.to_string(),
        message: format!(
            "invalid time '{}' for {} / {} (expected HH:MM): {}",
            raw, record.attraction_name, record.day_of_week, e
        ),
    })?;
    Ok(Some(time.format("%H:%M").to_string()))
}

fn insert_tickets(tx: &Transaction<'_>, records: &[TicketRecord]) -> Result<usize> {
    let mut stmt = tx.prepare(
        "INSERT OR REPLACE INTO tickets (attraction_name, ticket_type, price, currency) \
         VALUES (?1, ?2, ?3, ?4)",
    )?;
    for r in records {
        if !r.price.is_finite() || r.price < 0.0 {
            return Err(ReportError::LoadError {
                file: TICKETS_FILE.to_string(),
                message: format!(
                    "negative or invalid price {} for {} / {}",
                    r.price, r.attraction_name, r.ticket_type
                ),
            });
        }
        stmt.execute(params![r.attraction_name, r.ticket_type, r.price, r.currency])?;
    }
    Ok(records.len())
}

fn load_records(
    conn: &mut Connection,
    attractions: &[AttractionRecord],
    hours: &[OpeningHoursRecord],
    tickets: &[TicketRecord],
) -> Result<LoadStats> {
    let tx = conn.transaction()?;
    let stats = LoadStats {
        attractions: insert_attractions(&tx, attractions)?,
        opening_hours: insert_opening_hours(&tx, hours)?,
        tickets: insert_tickets(&tx, tickets)?,
    };
    tx.commit()?;
    Ok(stats)
}

/// Loads the three CSV files from `dir` in a single transaction.
pub fn load_csv_dir(conn: &mut Connection, dir: &Path) -> Result<LoadStats> {
    let attractions: Vec<AttractionRecord> = read_csv(dir, ATTRACTIONS_FILE)?;
    let hours: Vec<OpeningHoursRecord> = read_csv(dir, OPENING_HOURS_FILE)?;
    let tickets: Vec<TicketRecord> = read_csv(dir, TICKETS_FILE)?;
    load_records(conn, &attractions, &hours, &tickets)
}

const DEMO_ATTRACTIONS: &[(&str, &str, &str)] = &[
    ("Louvre Museum", "Museum", "Paris"),
    ("Musée d'Orsay", "Museum", "Paris"),
    ("Centre Pompidou", "Museum", "Paris"),
    ("Eiffel Tower", "Landmark", "Paris"),
    ("Arc de Triomphe", "Landmark", "Paris"),
    ("Notre-Dame Cathedral", "Religious Site", "Paris"),
    ("Sacré-Cœur Basilica", "Religious Site", "Paris"),
    ("Seine River Cruise", "Tour", "Paris"),
    ("Palace of Versailles", "Palace", "Versailles"),
    ("Parc Guell", "Park", "Barcelona"),
];

// (attraction, open, close, days closed)
const DEMO_HOURS: &[(&str, &str, &str, &[&str])] = &[
    ("Louvre Museum", "09:00", "18:00", &["Tuesday"]),
    ("Musée d'Orsay", "09:30", "18:00", &["Monday"]),
    ("Centre Pompidou", "11:00", "21:00", &["Tuesday"]),
    ("Eiffel Tower", "09:30", "23:45", &[]),
    ("Arc de Triomphe", "10:00", "22:30", &[]),
    ("Notre-Dame Cathedral", "07:45", "19:00", &[]),
    ("Sacré-Cœur Basilica", "06:30", "22:30", &[]),
    ("Seine River Cruise", "10:00", "22:00", &[]),
    ("Palace of Versailles", "09:00", "18:30", &["Monday"]),
];

const DEMO_TICKETS: &[(&str, &str, f64)] = &[
    ("Louvre Museum", "Adult", 22.0),
    ("Louvre Museum", "Under 18", 0.0),
    ("Louvre Museum", "Under 26 EU Resident", 0.0),
    ("Musée d'Orsay", "Adult", 16.0),
    ("Musée d'Orsay", "Reduced", 13.0),
    ("Musée d'Orsay", "Under 18", 0.0),
    ("Centre Pompidou", "Adult", 15.0),
    ("Centre Pompidou", "Reduced", 12.0),
    ("Eiffel Tower", "Adult Summit", 35.3),
    ("Eiffel Tower", "Adult Second Floor", 22.6),
    ("Eiffel Tower", "Youth Summit", 17.7),
    ("Eiffel Tower", "Child Summit", 8.9),
    ("Arc de Triomphe", "Adult", 16.0),
    ("Notre-Dame Cathedral", "General Admission", 0.0),
    ("Sacré-Cœur Basilica", "General Admission", 0.0),
    ("Sacré-Cœur Basilica", "Dome Access", 7.0),
    ("Seine River Cruise", "Adult", 17.0),
    ("Seine River Cruise", "Child", 8.0),
    ("Palace of Versailles", "Adult Passport", 32.0),
];

/// Bundled Paris dataset used by `init-db --demo`.
pub fn demo_records() -> (Vec<AttractionRecord>, Vec<OpeningHoursRecord>, Vec<TicketRecord>) {
    let attractions = DEMO_ATTRACTIONS
        .iter()
        .map(|(name, category, city)| AttractionRecord {
            name: name.to_string(),
            category: category.to_string(),
            city: city.to_string(),
        })
        .collect();

    let mut hours = Vec::new();
    for (name, open, close, closed_days) in DEMO_HOURS {
        for day in crate::core::reports::WEEKDAYS {
            let closed = closed_days.contains(&day);
            hours.push(OpeningHoursRecord {
                attraction_name: name.to_string(),
                day_of_week: day.to_string(),
                open_time: (!closed).then(|| open.to_string()),
                close_time: (!closed).then(|| close.to_string()),
                is_closed: if closed { "1" } else { "0" }.to_string(),
            });
        }
    }

    let tickets = DEMO_TICKETS
        .iter()
        .map(|(name, ticket_type, price)| TicketRecord {
            attraction_name: name.to_string(),
            ticket_type: ticket_type.to_string(),
            price: *price,
            currency: "EUR".to_string(),
        })
        .collect();

    (attractions, hours, tickets)
}

pub fn load_demo_dataset(conn: &mut Connection) -> Result<LoadStats> {
    let (attractions, hours, tickets) = demo_records();
    load_records(conn, &attractions, &hours, &tickets)
}
