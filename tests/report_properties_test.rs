use anyhow::Result;
use rusqlite::{params, Connection};
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;
use tourism_reports::adapters::loader::{self, DatasetSource};
use tourism_reports::{ReportEngine, ReportError, ReportId, ReportParams, Row, SqliteSource, Value};

// Keeps the temp dir alive for as long as the database is used
struct DemoDb {
    _dir: TempDir,
    path: PathBuf,
}

fn demo_db() -> Result<DemoDb> {
    let dir = TempDir::new()?;
    let path = dir.path().join("tourism.db");
    loader::init_database(&path, DatasetSource::Demo)?;
    Ok(DemoDb { _dir: dir, path })
}

fn engine(db: &DemoDb) -> ReportEngine<SqliteSource> {
    ReportEngine::new(SqliteSource::new(&db.path))
}

fn text<'a>(row: &'a Row, column: &str) -> &'a str {
    row.text(column).unwrap_or_default()
}

fn price(row: &Row) -> f64 {
    row.number("price").expect("price column")
}

#[tokio::test]
async fn test_attractions_by_city_sorted_by_category_then_name() -> Result<()> {
    let db = demo_db()?;
    let rows = engine(&db)
        .run_report(ReportId::AttractionsByCity, &ReportParams::new().city("Paris"))
        .await?;

    assert_eq!(rows.len(), 8);
    assert!(rows.iter().all(|r| text(r, "city") == "Paris"));

    let keys: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (text(r, "category"), text(r, "name")))
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
    assert_eq!(keys[0], ("Landmark", "Arc de Triomphe"));
    Ok(())
}

#[tokio::test]
async fn test_attractions_by_city_is_exact_match() -> Result<()> {
    let db = demo_db()?;
    let engine = engine(&db);

    let lower = engine
        .run_report(ReportId::AttractionsByCity, &ReportParams::new().city("paris"))
        .await?;
    assert!(lower.is_empty());

    let versailles = engine
        .run_report(ReportId::AttractionsByCity, &ReportParams::new().city("Versailles"))
        .await?;
    assert_eq!(versailles.len(), 1);
    assert_eq!(text(&versailles[0], "name"), "Palace of Versailles");
    Ok(())
}

#[tokio::test]
async fn test_open_on_day_excludes_closed_and_orders_by_opening() -> Result<()> {
    let db = demo_db()?;
    let rows = engine(&db)
        .run_report(ReportId::OpenOnDay, &ReportParams::new().day_of_week("Monday"))
        .await?;

    let names: Vec<&str> = rows.iter().map(|r| text(r, "name")).collect();
    assert!(!names.contains(&"Musée d'Orsay"));
    assert!(!names.contains(&"Palace of Versailles"));
    assert_eq!(names.first(), Some(&"Sacré-Cœur Basilica"));

    let opens: Vec<&str> = rows.iter().map(|r| text(r, "open_time")).collect();
    assert!(opens.windows(2).all(|w| w[0] <= w[1]));
    Ok(())
}

#[tokio::test]
async fn test_closed_on_day_has_no_hours() -> Result<()> {
    let db = demo_db()?;
    let rows = engine(&db)
        .run_report(ReportId::ClosedOnDay, &ReportParams::new().day_of_week("Tuesday"))
        .await?;

    let names: Vec<&str> = rows.iter().map(|r| text(r, "name")).collect();
    assert_eq!(names, vec!["Centre Pompidou", "Louvre Museum"]);
    for row in &rows {
        assert_eq!(row.get("is_closed"), Some(&Value::Boolean(true)));
        assert!(row.get("open_time").map_or(true, Value::is_null));
        assert!(row.get("close_time").map_or(true, Value::is_null));
    }
    Ok(())
}

#[tokio::test]
async fn test_top_expensive_tickets_capped_and_descending() -> Result<()> {
    let db = demo_db()?;
    let engine = engine(&db);

    let rows = engine
        .run_report(ReportId::TopExpensiveTickets, &ReportParams::new().limit(5))
        .await?;
    assert_eq!(rows.len(), 5);
    assert!(rows.windows(2).all(|w| price(&w[0]) >= price(&w[1])));
    assert_eq!(price(&rows[0]), 35.3);

    let defaulted = engine
        .run_report(ReportId::TopExpensiveTickets, &ReportParams::new())
        .await?;
    assert_eq!(defaulted, rows);

    let all = engine
        .run_report(ReportId::TopExpensiveTickets, &ReportParams::new().limit(1000))
        .await?;
    assert!(all.len() < 1000);
    Ok(())
}

#[tokio::test]
async fn test_cheap_tickets_inclusive_threshold() -> Result<()> {
    let db = demo_db()?;
    let rows = engine(&db)
        .run_report(ReportId::CheapTickets, &ReportParams::new().max_price(15.0))
        .await?;

    assert!(!rows.is_empty());
    assert!(rows.iter().all(|r| price(r) <= 15.0));

    let keys: Vec<(f64, &str)> = rows.iter().map(|r| (price(r), text(r, "name"))).collect();
    assert!(keys
        .windows(2)
        .all(|w| w[0].0 < w[1].0 || (w[0].0 == w[1].0 && w[0].1 <= w[1].1)));

    // 15.00 Centre Pompidou Adult sits exactly on the threshold
    let last = rows.last().expect("at least one row");
    assert_eq!(price(last), 15.0);
    assert_eq!(text(last, "name"), "Centre Pompidou");
    Ok(())
}

#[tokio::test]
async fn test_ticket_price_by_type_prefix() -> Result<()> {
    let db = demo_db()?;
    let engine = engine(&db);

    let adult = engine
        .run_report(ReportId::TicketPriceByTypePrefix, &ReportParams::new())
        .await?;
    assert!(!adult.is_empty());
    assert!(adult.iter().all(|r| text(r, "ticket_type").starts_with("Adult")));
    assert!(adult.windows(2).all(|w| price(&w[0]) >= price(&w[1])));

    let child = engine
        .run_report(
            ReportId::TicketPriceByTypePrefix,
            &ReportParams::new().type_prefix("Child"),
        )
        .await?;
    let names: Vec<&str> = child.iter().map(|r| text(r, "name")).collect();
    assert_eq!(names, vec!["Eiffel Tower", "Seine River Cruise"]);

    let wildcard = engine
        .run_report(
            ReportId::TicketPriceByTypePrefix,
            &ReportParams::new().type_prefix("%"),
        )
        .await?;
    assert!(wildcard.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_schedule_uses_weekday_order_and_unknown_days_last() -> Result<()> {
    let db = demo_db()?;
    {
        let conn = Connection::open(&db.path)?;
        conn.execute(
            "INSERT INTO opening_hours (attraction_name, day_of_week, open_time, close_time, is_closed) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params!["Louvre Museum", "Bastille Day", "10:00", "16:00", false],
        )?;
    }

    let rows = engine(&db)
        .run_report(
            ReportId::ScheduleForAttraction,
            &ReportParams::new().attraction_name("Louvre Museum"),
        )
        .await?;

    let days: Vec<&str> = rows.iter().map(|r| text(r, "day_of_week")).collect();
    assert_eq!(
        days,
        vec![
            "Monday",
            "Tuesday",
            "Wednesday",
            "Thursday",
            "Friday",
            "Saturday",
            "Sunday",
            "Bastille Day"
        ]
    );

    let tuesday = &rows[1];
    assert_eq!(tuesday.get("is_closed"), Some(&Value::Boolean(true)));
    assert_eq!(tuesday.get("open_time"), Some(&Value::Null));
    assert_eq!(text(&rows[0], "open_time"), "09:00");
    Ok(())
}

#[tokio::test]
async fn test_free_attractions_are_distinct() -> Result<()> {
    let db = demo_db()?;
    let rows = engine(&db)
        .run_report(ReportId::FreeAttractions, &ReportParams::new())
        .await?;

    let names: Vec<&str> = rows.iter().map(|r| text(r, "name")).collect();
    assert_eq!(
        names,
        vec![
            "Louvre Museum",
            "Musée d'Orsay",
            "Notre-Dame Cathedral",
            "Sacré-Cœur Basilica"
        ]
    );

    let conn = Connection::open(&db.path)?;
    for name in names {
        let free: i64 = conn.query_row(
            "SELECT count(*) FROM tickets WHERE attraction_name = ?1 AND price = 0",
            [name],
            |row| row.get(0),
        )?;
        assert!(free >= 1);
    }
    Ok(())
}

#[tokio::test]
async fn test_missing_parameter_and_empty_result() -> Result<()> {
    let db = demo_db()?;
    let engine = engine(&db);

    for report in [
        ReportId::AttractionsByCity,
        ReportId::OpenOnDay,
        ReportId::ClosedOnDay,
        ReportId::ScheduleForAttraction,
    ] {
        let err = engine
            .run_report(report, &ReportParams::new())
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::ParameterMissing { .. }), "{report}: {err}");
    }

    let rows = engine
        .run_report(
            ReportId::ScheduleForAttraction,
            &ReportParams::new().attraction_name("Big Ben"),
        )
        .await?;
    assert!(rows.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_missing_database_is_unavailable() -> Result<()> {
    let dir = TempDir::new()?;
    let engine = ReportEngine::new(SqliteSource::new(dir.path().join("missing.db")));

    let err = engine
        .run_report(ReportId::FreeAttractions, &ReportParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::DataStoreUnavailable { .. }));
    Ok(())
}

#[tokio::test]
async fn test_database_without_schema_reports_query_error() -> Result<()> {
    let dir = TempDir::new()?;
    let path = dir.path().join("empty.db");
    Connection::open(&path)?.execute_batch("CREATE TABLE unrelated (id INTEGER);")?;

    let engine = ReportEngine::new(SqliteSource::new(&path));
    let err = engine
        .run_report(ReportId::FreeAttractions, &ReportParams::new())
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::Query(_)));
    Ok(())
}

#[tokio::test]
async fn test_concurrent_reports_are_independent() -> Result<()> {
    let db = demo_db()?;
    let engine = Arc::new(engine(&db));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .run_report(ReportId::AttractionsByCity, &ReportParams::new().city("Paris"))
                    .await
            })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(handle.await??);
    }
    assert!(results.windows(2).all(|w| w[0] == w[1]));
    Ok(())
}
