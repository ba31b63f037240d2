use crate::board::GestureBoard;
use crate::catalog::{Catalog, product_slug};
use crate::ledger::OrderLedger;
use crate::models::{HistoryDay, Quantity, RowKey};
use crate::storage::OrderStore;
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Serialize, Deserialize)]
pub struct CafeteriaSummary {
    pub name: String,
    pub total_items: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HomeView {
    pub date: String,
    pub cafeterias: Vec<CafeteriaSummary>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductRow {
    pub id: String,
    pub product: String,
    pub quantity: Quantity,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DetailView {
    pub date: String,
    pub cafeteria: String,
    pub rows: Vec<ProductRow>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WeekView {
    pub cafeteria: String,
    pub days: Vec<HistoryDay>,
}

/// One row after a pointer event, enough to patch it without a full render.
#[derive(Debug, Serialize, Deserialize)]
pub struct RowView {
    pub id: String,
    pub date: String,
    pub cafeteria: String,
    pub product: String,
    pub quantity: Quantity,
    pub state: String,
    pub active: bool,
    pub clearing: bool,
    pub haptic_pulses: u64,
    pub render_requested: bool,
    pub render_epoch: u64,
}

pub fn build_home<S: OrderStore>(catalog: &Catalog, ledger: &OrderLedger<S>, date: &str) -> HomeView {
    let cafeterias = catalog
        .cafeterias()
        .map(|name| CafeteriaSummary {
            name: name.to_string(),
            total_items: ledger.day_total(date, name),
        })
        .collect();

    HomeView {
        date: date.to_string(),
        cafeterias,
    }
}

pub fn build_detail<S: OrderStore>(
    catalog: &Catalog,
    ledger: &OrderLedger<S>,
    cafeteria: &str,
    date: &str,
) -> Option<DetailView> {
    let rows = catalog
        .products(cafeteria)?
        .into_iter()
        .map(|product| ProductRow {
            id: product_slug(product),
            product: product.to_string(),
            quantity: ledger.quantity(date, cafeteria, product),
        })
        .collect();

    Some(DetailView {
        date: date.to_string(),
        cafeteria: cafeteria.to_string(),
        rows,
    })
}

pub fn build_week<S: OrderStore>(ledger: &OrderLedger<S>, cafeteria: &str) -> WeekView {
    WeekView {
        cafeteria: cafeteria.to_string(),
        days: ledger.history(cafeteria),
    }
}

pub fn build_row<S: OrderStore>(
    board: &GestureBoard,
    ledger: &OrderLedger<S>,
    row: &RowKey,
    render_requested: bool,
    now: Instant,
) -> RowView {
    let feedback = board.feedback(row);
    let quantity = feedback
        .shown_quantity
        .unwrap_or_else(|| ledger.quantity(&row.date, &row.cafeteria, &row.product));

    RowView {
        id: product_slug(&row.product),
        date: row.date.clone(),
        cafeteria: row.cafeteria.clone(),
        product: row.product.clone(),
        quantity,
        state: board.state(row).label().to_string(),
        active: feedback.active,
        clearing: feedback.clearing(now),
        haptic_pulses: feedback.haptic_pulses,
        render_requested,
        render_epoch: board.render_epoch(),
    }
}
