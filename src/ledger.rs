use crate::models::{HistoryDay, HistoryItem, Orders, Quantity};
use crate::storage::OrderStore;
use tracing::{debug, error};

/// Running tally of product orders, written through to its store on every
/// mutation.
///
/// The ledger never refuses a key: cafeterias and products need not be in the
/// catalog. Quantities never go below zero.
pub struct OrderLedger<S> {
    orders: Orders,
    store: S,
    failed_saves: u64,
}

impl<S: OrderStore> OrderLedger<S> {
    /// Loads the persisted orders once. Unreadable data is dropped and the
    /// ledger starts empty.
    pub fn open(store: S) -> Self {
        let orders = match store.load() {
            Ok(orders) => orders,
            Err(err) => {
                error!("failed to load orders, starting empty: {err}");
                Orders::default()
            }
        };

        Self {
            orders,
            store,
            failed_saves: 0,
        }
    }

    pub fn quantity(&self, date: &str, cafeteria: &str, product: &str) -> Quantity {
        self.orders.quantity(date, cafeteria, product)
    }

    /// Adds `delta` to the slot, clamping at zero, and persists.
    pub fn apply_delta(&mut self, date: &str, cafeteria: &str, product: &str, delta: i64) -> Quantity {
        let slot = self.orders.slot_mut(date, cafeteria, product);
        let next = i64::from(*slot).saturating_add(delta).clamp(0, i64::from(Quantity::MAX));
        *slot = Quantity::try_from(next).unwrap_or(Quantity::MAX);
        let quantity = *slot;

        debug!(date, cafeteria, product, delta, quantity, "applied delta");
        self.persist();
        quantity
    }

    /// Forces the slot to zero, whatever it held, and persists.
    pub fn reset_product(&mut self, date: &str, cafeteria: &str, product: &str) -> Quantity {
        *self.orders.slot_mut(date, cafeteria, product) = 0;

        debug!(date, cafeteria, product, "reset product");
        self.persist();
        0
    }

    pub fn day_total(&self, date: &str, cafeteria: &str) -> u64 {
        self.orders
            .cafeteria_day(date, cafeteria)
            .map(|products| products.values().map(|&qty| u64::from(qty)).sum())
            .unwrap_or(0)
    }

    /// Days with a non-zero total for `cafeteria`, newest first. Products
    /// cleared back to zero are left out of each day's items.
    pub fn history(&self, cafeteria: &str) -> Vec<HistoryDay> {
        self.orders
            .dates_desc()
            .filter_map(|date| {
                let products = self.orders.cafeteria_day(date, cafeteria)?;
                let total: u64 = products.values().map(|&qty| u64::from(qty)).sum();
                if total == 0 {
                    return None;
                }
                let items = products
                    .iter()
                    .filter(|(_, qty)| **qty > 0)
                    .map(|(product, qty)| HistoryItem {
                        product: product.clone(),
                        quantity: *qty,
                    })
                    .collect();
                Some(HistoryDay {
                    date: date.to_string(),
                    total,
                    items,
                })
            })
            .collect()
    }

    pub fn orders(&self) -> &Orders {
        &self.orders
    }

    /// Saves that the store rejected since the ledger was opened.
    pub fn failed_saves(&self) -> u64 {
        self.failed_saves
    }

    fn persist(&mut self) {
        if let Err(err) = self.store.save(&self.orders) {
            self.failed_saves += 1;
            error!(failed_saves = self.failed_saves, "failed to persist orders: {err}");
        }
    }
}
