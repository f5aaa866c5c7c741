//! Stock-take report generation.
//!
//! A stock-take is a literal snapshot of the ledger: every stored row, joined
//! with its reference names, with no grouping and no filtering of empty lines.
//! Each row carries its own value and the time the report was generated.

use crate::{
    config::settings::Settings,
    core::inventory::{JoinedLine, load_joined_lines},
    errors::{Error, Result},
};
use chrono::NaiveDateTime;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::{io::Write, path::PathBuf};
use tracing::info;

/// File name of the stock-take export
pub const STOCK_TAKE_FILE_NAME: &str = "stock_take.csv";

/// Format of the generation date column
pub const REPORT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// CSV header, in `ReportRow` field order
pub const REPORT_HEADER: [&str; 7] = [
    "name", "category", "supplier", "quantity", "price", "value", "date",
];

/// One exported stock-take row. Field order must match `REPORT_HEADER`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    /// Product name
    pub name: String,
    /// Category name, if resolvable
    pub category: Option<String>,
    /// Supplier name, if suppliers are tracked
    pub supplier: Option<String>,
    /// Stored quantity
    pub quantity: i64,
    /// Unit price
    pub price: f64,
    /// `quantity * price`
    pub value: f64,
    /// When the report was generated
    pub date: String,
}

/// Shapes joined lines into report rows, all stamped with `generated_at`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn build_report_rows(lines: Vec<JoinedLine>, generated_at: NaiveDateTime) -> Vec<ReportRow> {
    let date = generated_at.format(REPORT_DATE_FORMAT).to_string();
    lines
        .into_iter()
        .map(|line| ReportRow {
            value: line.quantity as f64 * line.price,
            name: line.name,
            category: line.category,
            supplier: line.supplier,
            quantity: line.quantity,
            price: line.price,
            date: date.clone(),
        })
        .collect()
}

/// Builds the stock-take report from the current store state.
pub async fn build_stock_take_report(
    db: &DatabaseConnection,
    settings: &Settings,
) -> Result<Vec<ReportRow>> {
    let lines = load_joined_lines(db, settings).await?;
    let generated_at = chrono::Local::now().naive_local();
    Ok(build_report_rows(lines, generated_at))
}

/// Writes report rows as CSV with a header row.
///
/// # Errors
/// Returns an error if serialization or the underlying writer fails.
pub fn write_csv<W: Write>(rows: &[ReportRow], writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    if rows.is_empty() {
        wtr.write_record(REPORT_HEADER)?;
    }
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Renders report rows as a CSV string.
pub fn render_csv(rows: &[ReportRow]) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(rows, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))
}

/// Builds the stock-take report and writes it to `STOCK_TAKE_FILE_NAME` in the
/// configured report directory. Returns the path written.
pub async fn export_stock_take(db: &DatabaseConnection, settings: &Settings) -> Result<PathBuf> {
    let rows = build_stock_take_report(db, settings).await?;
    let mut buffer = Vec::new();
    write_csv(&rows, &mut buffer)?;

    tokio::fs::create_dir_all(&settings.report_dir).await?;
    let path = settings.report_dir.join(STOCK_TAKE_FILE_NAME);
    tokio::fs::write(&path, buffer).await?;
    info!("Exported {} stock-take rows to {}", rows.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::core::inventory::get_inventory_view;
    use crate::test_utils::*;
    use chrono::NaiveDate;

    fn fixed_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(14, 5, 9)
            .unwrap()
    }

    #[test]
    fn test_build_report_rows() {
        let lines = vec![
            JoinedLine {
                id: 1,
                name: "Widget".to_string(),
                quantity: 5,
                price: 12.0,
                category: Some("Electronics".to_string()),
                supplier: Some("AcmeCo".to_string()),
            },
            JoinedLine {
                id: 2,
                name: "Widget".to_string(),
                quantity: 0,
                price: 3.0,
                category: None,
                supplier: None,
            },
        ];
        let rows = build_report_rows(lines, fixed_time());

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].value, 60.0);
        assert_eq!(rows[0].date, "2024-03-01 14:05:09");
        assert_eq!(rows[1].value, 0.0);
        assert_eq!(rows[1].date, rows[0].date);
    }

    #[test]
    fn test_render_csv() -> Result<()> {
        let rows = vec![ReportRow {
            name: "Widget".to_string(),
            category: Some("Electronics".to_string()),
            supplier: None,
            quantity: 5,
            price: 12.5,
            value: 62.5,
            date: "2024-03-01 14:05:09".to_string(),
        }];
        let csv = render_csv(&rows)?;
        let mut lines = csv.lines();
        assert_eq!(
            lines.next(),
            Some("name,category,supplier,quantity,price,value,date")
        );
        assert_eq!(
            lines.next(),
            Some("Widget,Electronics,,5,12.5,62.5,2024-03-01 14:05:09")
        );
        assert_eq!(lines.next(), None);
        Ok(())
    }

    #[test]
    fn test_render_csv_empty_has_header() -> Result<()> {
        let csv = render_csv(&[])?;
        assert_eq!(csv, "name,category,supplier,quantity,price,value,date\n");
        Ok(())
    }

    #[test]
    fn test_empty_and_serialized_headers_match() -> Result<()> {
        let row = ReportRow {
            name: "Widget".to_string(),
            category: None,
            supplier: None,
            quantity: 1,
            price: 1.0,
            value: 1.0,
            date: "2024-03-01 14:05:09".to_string(),
        };
        let expected = REPORT_HEADER.join(",");
        let populated = render_csv(&[row])?;
        let empty = render_csv(&[])?;

        assert_eq!(populated.lines().next(), Some(expected.as_str()));
        assert_eq!(empty.lines().next(), Some(expected.as_str()));
        Ok(())
    }

    #[tokio::test]
    async fn test_report_is_unaggregated_snapshot() -> Result<()> {
        let (db, category, supplier) = setup_with_catalog().await?;
        insert_raw_item(&db, "Widget", 3, Some(10.0), Some(category.id), Some(supplier.id))
            .await?;
        insert_raw_item(&db, "Widget", 2, Some(12.0), Some(category.id), Some(supplier.id))
            .await?;
        insert_raw_item(&db, "Empty", 0, Some(4.0), None, None).await?;
        insert_raw_item(&db, "Legacy", 2, None, Some(404), None).await?;

        let settings = Settings::default();
        let rows = build_stock_take_report(&db, &settings).await?;
        let view = get_inventory_view(&db, &settings).await?;

        assert_eq!(rows.len(), 4);
        assert_eq!(view.rows.len(), 2);

        assert_eq!(rows[0].name, "Widget");
        assert_eq!(rows[0].value, 30.0);
        assert_eq!(rows[0].category.as_deref(), Some("Electronics"));
        assert_eq!(rows[0].supplier.as_deref(), Some("AcmeCo"));
        assert_eq!(rows[1].value, 24.0);
        assert_eq!(rows[2].name, "Empty");
        assert_eq!(rows[2].quantity, 0);
        assert_eq!(rows[3].price, 0.0);
        assert_eq!(rows[3].category, None);
        assert!(rows.iter().all(|r| r.date == rows[0].date));
        assert!(NaiveDateTime::parse_from_str(&rows[0].date, REPORT_DATE_FORMAT).is_ok());
        Ok(())
    }

    #[tokio::test]
    async fn test_report_on_empty_store() -> Result<()> {
        let db = setup_test_db().await?;
        let rows = build_stock_take_report(&db, &Settings::default()).await?;
        assert!(rows.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_export_stock_take_writes_file() -> Result<()> {
        let db = setup_test_db().await?;
        insert_raw_item(&db, "Widget", 3, Some(10.0), None, None).await?;

        let dir = std::env::temp_dir().join(format!("stockroom-export-{}", std::process::id()));
        let settings = Settings {
            report_dir: dir.clone(),
            ..Settings::default()
        };
        let path = export_stock_take(&db, &settings).await?;

        assert_eq!(path, dir.join(STOCK_TAKE_FILE_NAME));
        let contents = std::fs::read_to_string(&path)?;
        assert_eq!(contents.lines().count(), 2);
        assert!(contents.contains("Widget,,no data,3,10.0,30.0,"));

        std::fs::remove_dir_all(&dir)?;
        Ok(())
    }
}
