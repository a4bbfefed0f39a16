use crate::core::{ReportId, Row};
use crate::utils::error::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    pub const NAMES: [&'static str; 4] = ["table", "csv", "tsv", "json"];
}

impl FromStr for OutputFormat {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            other => Err(ReportError::InvalidConfigValueError {
                field: "output.format".to_string(),
                value: other.to_string(),
                reason: format!("Unsupported format. Valid formats: {}", Self::NAMES.join(", ")),
            }),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Table => "table",
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        };
        f.write_str(name)
    }
}

#[derive(Serialize)]
struct JsonReport<'a> {
    report: &'a str,
    generated_at: String,
    row_count: usize,
    rows: &'a [Row],
}

/// Renders report rows. `columns` is used for the header so empty results still show one.
pub fn render(report: ReportId, columns: &[&str], rows: &[Row], format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(columns, rows)),
        OutputFormat::Csv => render_delimited(columns, rows, b','),
        OutputFormat::Tsv => render_delimited(columns, rows, b'\t'),
        OutputFormat::Json => {
            let payload = JsonReport {
                report: report.name(),
                generated_at: chrono::Utc::now().to_rfc3339(),
                row_count: rows.len(),
                rows,
            };
            Ok(serde_json::to_string_pretty(&payload)?)
        }
    }
}

fn cells(columns: &[&str], row: &Row) -> Vec<String> {
    columns
        .iter()
        .map(|c| row.get(c).map(|v| v.to_string()).unwrap_or_default())
        .collect()
}

fn render_delimited(columns: &[&str], rows: &[Row], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(cells(columns, row))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn render_table(columns: &[&str], rows: &[Row]) -> String {
    let body: Vec<Vec<String>> = rows.iter().map(|row| cells(columns, row)).collect();

    let mut widths: Vec<usize> = columns.iter().map(|c| c.chars().count()).collect();
    for line in &body {
        for (i, cell) in line.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let format_line = |values: &[String]| -> String {
        values
            .iter()
            .zip(&widths)
            .map(|(v, w)| format!("{:<width$}", v, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let header: Vec<String> = columns.iter().map(|c| c.to_string()).collect();
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();

    let mut out = String::new();
    out.push_str(&format_line(header.as_slice()));
    out.push('\n');
    out.push_str(&format_line(separator.as_slice()));
    out.push('\n');
    if body.is_empty() {
        out.push_str("(no rows)\n");
    }
    for line in &body {
        out.push_str(&format_line(line.as_slice()));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Value;

    fn sample_rows() -> Vec<Row> {
        vec![
            Row::new()
                .with("name", "Louvre Museum")
                .with("open_time", Value::Null)
                .with("price", 22.0),
            Row::new()
                .with("name", "Eiffel Tower")
                .with("open_time", "09:30")
                .with("price", 35.3),
        ]
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xml".parse::<OutputFormat>().is_err());
    }

    #[test]
    fn test_render_csv() {
        let out = render(
            ReportId::CheapTickets,
            &["name", "open_time", "price"],
            &sample_rows(),
            OutputFormat::Csv,
        )
        .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "name,open_time,price");
        assert_eq!(lines[1], "Louvre Museum,,22.00");
        assert_eq!(lines[2], "Eiffel Tower,09:30,35.30");
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let out = render(
            ReportId::CheapTickets,
            &["name", "price"],
            &sample_rows(),
            OutputFormat::Table,
        )
        .unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "name           price");
        assert_eq!(lines[1], "-------------  -----");
        assert_eq!(lines[2], "Louvre Museum  22.00");
    }

    #[test]
    fn test_render_empty_table() {
        let out = render(ReportId::FreeAttractions, &["name"], &[], OutputFormat::Table).unwrap();
        assert!(out.ends_with("(no rows)\n"));
    }

    #[test]
    fn test_render_json_envelope() {
        let out = render(
            ReportId::CheapTickets,
            &["name", "open_time", "price"],
            &sample_rows(),
            OutputFormat::Json,
        )
        .unwrap();
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["report"], "cheap_tickets");
        assert_eq!(json["row_count"], 2);
        assert!(json["rows"][0]["open_time"].is_null());
        assert_eq!(json["rows"][1]["name"], "Eiffel Tower");
    }
}
