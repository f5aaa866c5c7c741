//! Operator command line - parses commands and renders results as text.
//!
//! This layer holds no inventory rules. It resolves names typed by the operator
//! to ids, calls into `core`, and formats what comes back.

use crate::{
    config::settings::Settings,
    core::{
        audit, catalog,
        inventory::{self, InventoryView, ViewRow},
        receiving::{self, MutationOutcome, ReceiptOutcome, ReceiptRequest},
        report,
    },
    entities::history,
    errors::{Error, Result},
};
use clap::{Parser, Subcommand};
use sea_orm::DatabaseConnection;
use std::{collections::HashMap, fmt::Write, path::PathBuf};

/// Warehouse inventory manager
#[derive(Debug, Parser)]
#[command(name = "stockroom")]
#[command(about = "Warehouse inventory: receive goods, track stock, export stock-takes")]
pub struct Cli {
    /// Settings file
    #[arg(long, default_value = crate::config::settings::DEFAULT_SETTINGS_PATH)]
    pub config: PathBuf,

    /// Command to run
    #[command(subcommand)]
    pub command: Command,
}

/// Operator commands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show current stock with low-stock alerts and totals
    View,

    /// Receive goods, topping up an existing line or creating a new one
    Receive {
        /// Product name
        name: String,
        /// Units received
        quantity: i64,
        /// Unit purchase price
        price: f64,
        /// Category name
        #[arg(long)]
        category: Option<String>,
        /// Supplier name
        #[arg(long)]
        supplier: Option<String>,
    },

    /// Overwrite quantity and price of a stock line
    Edit {
        /// Stock line id
        id: i64,
        /// New quantity
        quantity: i64,
        /// New unit price
        price: f64,
    },

    /// Issue goods from a stock line
    Issue {
        /// Stock line id
        id: i64,
        /// Units leaving the warehouse
        quantity: i64,
    },

    /// Permanently remove a stock line
    Delete {
        /// Stock line id
        id: i64,
    },

    /// Show the activity log, newest first
    History,

    /// Export the stock-take report as CSV
    Report,

    /// List categories
    Categories,

    /// List suppliers
    Suppliers,

    /// Add a category
    AddCategory {
        /// Category name
        name: String,
    },

    /// Add a supplier
    AddSupplier {
        /// Supplier name
        name: String,
        /// Tax identification number
        #[arg(default_value = "")]
        tax_id: String,
    },
}

/// Runs one operator command against the store and returns the text to print.
pub async fn run(command: Command, db: &DatabaseConnection, settings: &Settings) -> Result<String> {
    match command {
        Command::View => {
            let view = inventory::get_inventory_view(db, settings).await?;
            Ok(render_view(&view))
        }
        Command::Receive {
            name,
            quantity,
            price,
            category,
            supplier,
        } => {
            let category_id = match &category {
                Some(category_name) => Some(resolve(
                    &catalog::category_lookup(&catalog::list_categories(db).await?),
                    category_name,
                    "category",
                )?),
                None => None,
            };
            let supplier_id = match supplier {
                Some(supplier_name) => Some(resolve(
                    &catalog::supplier_lookup(&catalog::list_suppliers(db).await?),
                    &supplier_name,
                    "supplier",
                )?),
                None => None,
            };
            let outcome = receiving::receive(
                db,
                settings,
                ReceiptRequest {
                    name: name.clone(),
                    quantity,
                    price,
                    category_id,
                    supplier_id,
                },
            )
            .await?;
            Ok(render_receipt(name.trim(), &outcome, category.is_some()))
        }
        Command::Edit {
            id,
            quantity,
            price,
        } => {
            let name = item_name(db, id).await?;
            let outcome = receiving::edit_item(db, id, quantity, price, &name).await?;
            Ok(render_mutation(&name, &outcome))
        }
        Command::Issue { id, quantity } => {
            let name = item_name(db, id).await?;
            let outcome = receiving::issue_item(db, id, quantity, &name).await?;
            Ok(render_mutation(&name, &outcome))
        }
        Command::Delete { id } => {
            let name = item_name(db, id).await?;
            let outcome = receiving::delete_item(db, id, &name).await?;
            Ok(render_mutation(&name, &outcome))
        }
        Command::History => Ok(render_history(&audit::list_history(db).await?)),
        Command::Report => {
            let path = report::export_stock_take(db, settings).await?;
            Ok(format!("Stock-take written to {}", path.display()))
        }
        Command::Categories => {
            let categories = catalog::list_categories(db).await?;
            Ok(render_list(
                "No categories defined.",
                categories.iter().map(|c| format!("{:>4}  {}", c.id, c.name)),
            ))
        }
        Command::Suppliers => {
            let suppliers = catalog::list_suppliers(db).await?;
            Ok(render_list(
                "No suppliers defined.",
                suppliers
                    .iter()
                    .map(|s| format!("{:>4}  {}  (tax id: {})", s.id, s.name, s.tax_id)),
            ))
        }
        Command::AddCategory { name } => {
            let saved = catalog::create_category(db, &name).await?;
            Ok(format!("Added category '{}' (ID: {})", saved.name, saved.id))
        }
        Command::AddSupplier { name, tax_id } => {
            let saved = catalog::create_supplier(db, &name, &tax_id).await?;
            Ok(format!("Added supplier '{}' (ID: {})", saved.name, saved.id))
        }
    }
}

fn resolve(lookup: &HashMap<String, i64>, name: &str, kind: &str) -> Result<i64> {
    lookup
        .get(name.trim())
        .copied()
        .ok_or_else(|| Error::Validation {
            message: format!("Unknown {kind} '{}'", name.trim()),
        })
}

async fn item_name(db: &DatabaseConnection, item_id: i64) -> Result<String> {
    inventory::get_item(db, item_id)
        .await?
        .map(|line| line.name)
        .ok_or(Error::ItemNotFound { id: item_id })
}

fn format_row(row: &ViewRow) -> String {
    let mut line = row.name.clone();
    if let Some(category) = &row.category {
        let _ = write!(line, " [{category}]");
    }
    if let Some(supplier) = &row.supplier {
        let _ = write!(line, " from {supplier}");
    }
    format!(
        "{line}: {} pcs @ {:.2} = {:.2}",
        row.quantity, row.price, row.value
    )
}

/// Renders the inventory view: alerts first, then every row, then totals.
#[must_use]
pub fn render_view(view: &InventoryView) -> String {
    if view.is_empty() {
        return "The warehouse is empty.".to_string();
    }

    let mut out = String::new();
    if !view.alerts.is_empty() {
        let _ = writeln!(out, "Low stock:");
        for row in &view.alerts {
            let _ = writeln!(out, "  ! {}", format_row(row));
        }
        let _ = writeln!(out);
    }

    let _ = writeln!(out, "Stock:");
    for row in &view.rows {
        let _ = writeln!(out, "  {}", format_row(row));
    }
    let _ = writeln!(out);
    let _ = write!(
        out,
        "Total units: {}  SKUs: {}  Value: {:.2}",
        view.totals.total_quantity, view.totals.sku_count, view.totals.total_value
    );
    out
}

/// Renders a receipt. A merge keeps the existing line's category, so a
/// requested category is called out as not applied.
fn render_receipt(name: &str, outcome: &ReceiptOutcome, category_requested: bool) -> String {
    match outcome {
        ReceiptOutcome::Merged {
            item_id,
            old_quantity,
            new_quantity,
        } => {
            let mut text =
                format!("Restocked '{name}' (ID: {item_id}): {old_quantity} -> {new_quantity}");
            if category_requested {
                text.push_str(" (existing category kept)");
            }
            text
        }
        ReceiptOutcome::Created { item_id } => format!("Added '{name}' as new item (ID: {item_id})"),
    }
}

fn render_mutation(name: &str, outcome: &MutationOutcome) -> String {
    match outcome {
        MutationOutcome::Updated {
            item_id,
            old_quantity,
            new_quantity,
            old_price,
            new_price,
        } => format!(
            "Updated '{name}' (ID: {item_id}): quantity {old_quantity} -> {new_quantity}, price {old_price:.2} -> {new_price:.2}"
        ),
        MutationOutcome::Issued {
            item_id,
            old_quantity,
            new_quantity,
        } => format!("Issued '{name}' (ID: {item_id}): {old_quantity} -> {new_quantity}"),
        MutationOutcome::Deleted { item_id } => format!("Deleted '{name}' (ID: {item_id})"),
    }
}

/// Renders history entries one per line with their timestamp.
#[must_use]
pub fn render_history(entries: &[history::Model]) -> String {
    render_list(
        "No activity recorded.",
        entries.iter().map(|e| {
            format!(
                "{}  {}",
                e.created_at.format(report::REPORT_DATE_FORMAT),
                e.description
            )
        }),
    )
}

fn render_list(empty: &str, lines: impl Iterator<Item = String>) -> String {
    let lines: Vec<String> = lines.collect();
    if lines.is_empty() {
        empty.to_string()
    } else {
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::core::inventory::{InventoryTotals, JoinedLine, aggregate};
    use crate::test_utils::*;

    fn joined(name: &str, quantity: i64) -> JoinedLine {
        JoinedLine {
            id: 1,
            name: name.to_string(),
            quantity,
            price: 2.0,
            category: Some("Tools".to_string()),
            supplier: Some("AcmeCo".to_string()),
        }
    }

    #[test]
    fn test_cli_parses_receive() {
        let cli = Cli::try_parse_from([
            "stockroom",
            "receive",
            "Widget",
            "3",
            "10.5",
            "--category",
            "Electronics",
        ])
        .unwrap();
        assert_eq!(cli.config, PathBuf::from("stockroom.toml"));
        let Command::Receive {
            name,
            quantity,
            category,
            supplier,
            ..
        } = cli.command
        else {
            panic!("Expected receive command");
        };
        assert_eq!(name, "Widget");
        assert_eq!(quantity, 3);
        assert_eq!(category.as_deref(), Some("Electronics"));
        assert_eq!(supplier, None);
    }

    #[test]
    fn test_render_view_lists_alerts_first() {
        let view = aggregate(&[joined("Hammer", 2), joined("Nails", 40)], 5).unwrap();
        let text = render_view(&view);

        let alert_pos = text.find("Low stock:").unwrap();
        let stock_pos = text.find("Stock:").unwrap();
        assert!(alert_pos < stock_pos);
        assert!(text.contains("! Hammer [Tools] from AcmeCo: 2 pcs @ 2.00 = 4.00"));
        assert!(text.contains("Total units: 42  SKUs: 2  Value: 84.00"));
    }

    #[test]
    fn test_render_empty_view() {
        let view = InventoryView {
            totals: InventoryTotals::default(),
            ..InventoryView::default()
        };
        assert_eq!(render_view(&view), "The warehouse is empty.");
    }

    #[tokio::test]
    async fn test_run_receive_resolves_names() -> Result<()> {
        let (db, _category, _supplier) = setup_with_catalog().await?;
        let settings = Settings::default();

        let out = run(
            Command::Receive {
                name: "Widget".to_string(),
                quantity: 3,
                price: 10.0,
                category: Some("Electronics".to_string()),
                supplier: Some("AcmeCo".to_string()),
            },
            &db,
            &settings,
        )
        .await?;
        assert!(out.starts_with("Added 'Widget' as new item"));

        let view = run(Command::View, &db, &settings).await?;
        assert!(view.contains("Widget [Electronics] from AcmeCo: 3 pcs @ 10.00 = 30.00"));

        let result = run(
            Command::Receive {
                name: "Widget".to_string(),
                quantity: 1,
                price: 10.0,
                category: Some("Unknown".to_string()),
                supplier: None,
            },
            &db,
            &settings,
        )
        .await;
        assert!(result.unwrap_err().is_validation());
        Ok(())
    }

    #[tokio::test]
    async fn test_run_receive_merge_reports_kept_category() -> Result<()> {
        let (db, _category, _supplier) = setup_with_catalog().await?;
        catalog::create_category(&db, "Tools").await?;
        let settings = Settings::default();
        let receipt = |quantity, category: Option<&str>| Command::Receive {
            name: "Widget".to_string(),
            quantity,
            price: 10.0,
            category: category.map(str::to_string),
            supplier: Some("AcmeCo".to_string()),
        };

        run(receipt(3, Some("Electronics")), &db, &settings).await?;
        let out = run(receipt(2, Some("Tools")), &db, &settings).await?;
        assert!(out.starts_with("Restocked 'Widget'"));
        assert!(out.ends_with("3 -> 5 (existing category kept)"));

        let out = run(receipt(1, None), &db, &settings).await?;
        assert!(out.ends_with("5 -> 6"));

        let view = run(Command::View, &db, &settings).await?;
        assert!(view.contains("Widget [Electronics] from AcmeCo: 6 pcs"));
        assert!(!view.contains("[Tools]"));
        Ok(())
    }

    #[tokio::test]
    async fn test_run_mutations_by_id() -> Result<()> {
        let db = setup_test_db().await?;
        let settings = Settings::default();
        let stored = insert_raw_item(&db, "Widget", 5, Some(1.0), None, None).await?;

        let out = run(
            Command::Issue {
                id: stored.id,
                quantity: 2,
            },
            &db,
            &settings,
        )
        .await?;
        assert_eq!(out, format!("Issued 'Widget' (ID: {}): 5 -> 3", stored.id));

        let out = run(Command::Delete { id: stored.id }, &db, &settings).await?;
        assert_eq!(out, format!("Deleted 'Widget' (ID: {})", stored.id));

        let result = run(Command::Delete { id: stored.id }, &db, &settings).await;
        assert!(matches!(result.unwrap_err(), Error::ItemNotFound { .. }));

        let history = run(Command::History, &db, &settings).await?;
        assert_eq!(history.lines().count(), 2);
        assert!(history.lines().next().unwrap().contains("Deleted 'Widget'"));
        Ok(())
    }
}
