//! Inventory view business logic - join, grouping and valuation.
//!
//! Raw stock lines are left-joined with category and supplier names, grouped by
//! product identity and rolled up into the view the operator sees. Grouping sums
//! quantities and averages prices, groups with nothing left on the shelf are
//! dropped, and groups below the low-stock threshold are raised as alerts.
//!
//! The join and the aggregation are plain functions over already loaded rows;
//! `get_inventory_view` only adds the store reads in front of them.

use crate::{
    config::settings::Settings,
    core::{catalog, records::StockLine},
    entities::{Item, category, item, supplier},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, prelude::*};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Placeholder shown for a supplier reference that does not resolve
pub const MISSING_REFERENCE: &str = "no data";

/// A stock line with its reference names resolved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JoinedLine {
    /// Id of the stored row
    pub id: i64,
    /// Product name
    pub name: String,
    /// Units on hand as stored
    pub quantity: i64,
    /// Unit price (0.0 for legacy rows without one)
    pub price: f64,
    /// Category name, `None` when the reference is missing or dangling
    pub category: Option<String>,
    /// Supplier name or `MISSING_REFERENCE`; `None` when suppliers are not tracked
    pub supplier: Option<String>,
}

/// One product group of the aggregated view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRow {
    /// Product name
    pub name: String,
    /// Category name, if resolvable
    pub category: Option<String>,
    /// Supplier name, if suppliers are tracked
    pub supplier: Option<String>,
    /// Summed quantity across the group
    pub quantity: i64,
    /// Mean unit price across the group
    pub price: f64,
    /// `quantity * price`
    pub value: f64,
    /// Number of stored rows folded into this group
    pub line_count: usize,
    /// Whether the quantity is below the low-stock threshold
    pub low_stock: bool,
}

/// Totals over the rows of the view.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryTotals {
    /// Sum of all group quantities
    pub total_quantity: i64,
    /// Number of distinct groups
    pub sku_count: usize,
    /// Sum of all group values
    pub total_value: f64,
}

/// The aggregated inventory as shown to the operator.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InventoryView {
    /// Low-stock groups, shown before the main table
    pub alerts: Vec<ViewRow>,
    /// Every group with stock on hand, ordered by name, category, supplier
    pub rows: Vec<ViewRow>,
    /// Totals over `rows`
    pub totals: InventoryTotals,
}

impl InventoryView {
    /// True when no group has stock on hand.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Resolves category and supplier references of each line.
///
/// Lines are never dropped: an unknown category becomes `None`, an unknown or
/// missing supplier becomes `MISSING_REFERENCE`. Passing `None` for `suppliers`
/// leaves the supplier column out entirely.
#[must_use]
pub fn join_references(
    lines: Vec<StockLine>,
    categories: &[category::Model],
    suppliers: Option<&[supplier::Model]>,
) -> Vec<JoinedLine> {
    let category_names: HashMap<i64, &str> =
        categories.iter().map(|c| (c.id, c.name.as_str())).collect();
    let supplier_names: Option<HashMap<i64, &str>> =
        suppliers.map(|s| s.iter().map(|s| (s.id, s.name.as_str())).collect());

    lines
        .into_iter()
        .map(|line| {
            let category = line
                .category_id
                .and_then(|id| category_names.get(&id))
                .map(|name| (*name).to_string());
            let supplier = supplier_names.as_ref().map(|names| {
                line.supplier_id
                    .and_then(|id| names.get(&id))
                    .map_or_else(|| MISSING_REFERENCE.to_string(), |name| (*name).to_string())
            });
            JoinedLine {
                id: line.id,
                name: line.name,
                quantity: line.quantity,
                price: line.price,
                category,
                supplier,
            }
        })
        .collect()
}

#[derive(Default)]
struct GroupAccumulator {
    quantity: i128,
    price_sum: f64,
    line_count: usize,
}

/// Groups joined lines into the operator view.
///
/// Groups are keyed by (name, category, supplier). Quantity is summed, price is
/// the arithmetic mean of the grouped rows, and groups whose summed quantity is
/// not positive are left out. A group is low on stock when its quantity is
/// strictly below `low_stock_threshold`.
///
/// # Errors
/// Returns `Error::QuantityOverflow` if a group's quantity or the total
/// quantity does not fit in an `i64`.
#[allow(clippy::cast_precision_loss)]
pub fn aggregate(lines: &[JoinedLine], low_stock_threshold: i64) -> Result<InventoryView> {
    let mut groups: BTreeMap<(String, Option<String>, Option<String>), GroupAccumulator> =
        BTreeMap::new();

    for line in lines {
        let key = (
            line.name.clone(),
            line.category.clone(),
            line.supplier.clone(),
        );
        let group = groups.entry(key).or_default();
        group.quantity += i128::from(line.quantity);
        group.price_sum += line.price;
        group.line_count += 1;
    }

    let mut rows = Vec::with_capacity(groups.len());
    for ((name, category, supplier), group) in groups {
        if group.quantity <= 0 {
            continue;
        }
        let quantity = i64::try_from(group.quantity).map_err(|_| Error::QuantityOverflow {
            what: format!("'{name}'"),
        })?;
        let price = group.price_sum / group.line_count as f64;
        rows.push(ViewRow {
            name,
            category,
            supplier,
            quantity,
            price,
            value: quantity as f64 * price,
            line_count: group.line_count,
            low_stock: quantity < low_stock_threshold,
        });
    }

    let total_quantity = rows
        .iter()
        .try_fold(0_i64, |sum, r| sum.checked_add(r.quantity))
        .ok_or_else(|| Error::QuantityOverflow {
            what: "total quantity".to_string(),
        })?;
    let totals = InventoryTotals {
        total_quantity,
        sku_count: rows.len(),
        total_value: rows.iter().map(|r| r.value).sum(),
    };
    let alerts = rows.iter().filter(|r| r.low_stock).cloned().collect();

    Ok(InventoryView {
        alerts,
        rows,
        totals,
    })
}

/// Loads every stored item row with its reference names resolved.
///
/// Reference sets are only fetched when there is at least one item. Suppliers
/// are joined only when supplier tracking is enabled.
pub async fn load_joined_lines(
    db: &DatabaseConnection,
    settings: &Settings,
) -> Result<Vec<JoinedLine>> {
    let items = Item::find().order_by_asc(item::Column::Id).all(db).await?;
    if items.is_empty() {
        debug!("No stock lines stored.");
        return Ok(Vec::new());
    }

    let categories = catalog::list_categories(db).await?;
    let suppliers = if settings.track_suppliers {
        Some(catalog::list_suppliers(db).await?)
    } else {
        None
    };

    let lines = items.into_iter().map(StockLine::from).collect();
    let joined = join_references(lines, &categories, suppliers.as_deref());
    debug!("Joined {} stock lines.", joined.len());
    Ok(joined)
}

/// Builds the aggregated inventory view from the current store state.
///
/// # Errors
/// Returns an error if any store read fails or a quantity sum overflows; no
/// partial view is returned.
pub async fn get_inventory_view(
    db: &DatabaseConnection,
    settings: &Settings,
) -> Result<InventoryView> {
    let lines = load_joined_lines(db, settings).await?;
    let view = aggregate(&lines, settings.low_stock_threshold)?;
    debug!(
        "Inventory view: {} groups, {} alerts.",
        view.rows.len(),
        view.alerts.len()
    );
    Ok(view)
}

/// Fetches a single stored stock line by id.
pub async fn get_item(db: &DatabaseConnection, item_id: i64) -> Result<Option<StockLine>> {
    Ok(Item::find_by_id(item_id)
        .one(db)
        .await?
        .map(StockLine::from))
}
