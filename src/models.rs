use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type Quantity = u32;
pub type ProductOrders = BTreeMap<String, Quantity>;
pub type CafeteriaOrders = BTreeMap<String, ProductOrders>;

/// Every order ever tallied, keyed `date -> cafeteria -> product`.
///
/// Serializes as the bare nested object, with no wrapper or version field.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Orders {
    days: BTreeMap<String, CafeteriaOrders>,
}

impl Orders {
    pub fn quantity(&self, date: &str, cafeteria: &str, product: &str) -> Quantity {
        self.days
            .get(date)
            .and_then(|cafeterias| cafeterias.get(cafeteria))
            .and_then(|products| products.get(product))
            .copied()
            .unwrap_or(0)
    }

    /// Returns the slot for the triple, creating any missing level on the way.
    pub fn slot_mut(&mut self, date: &str, cafeteria: &str, product: &str) -> &mut Quantity {
        self.days
            .entry(date.to_string())
            .or_default()
            .entry(cafeteria.to_string())
            .or_default()
            .entry(product.to_string())
            .or_default()
    }

    pub fn cafeteria_day(&self, date: &str, cafeteria: &str) -> Option<&ProductOrders> {
        self.days.get(date).and_then(|cafeterias| cafeterias.get(cafeteria))
    }

    pub fn dates_desc(&self) -> impl Iterator<Item = &str> {
        self.days.keys().rev().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

/// Address of one ledger slot, and of the row bound to it on screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey {
    pub date: String,
    pub cafeteria: String,
    pub product: String,
}

impl RowKey {
    pub fn new(
        date: impl Into<String>,
        cafeteria: impl Into<String>,
        product: impl Into<String>,
    ) -> Self {
        Self {
            date: date.into(),
            cafeteria: cafeteria.into(),
            product: product.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryItem {
    pub product: String,
    pub quantity: Quantity,
}

/// One day of one cafeteria's orders, as listed in the week history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryDay {
    pub date: String,
    pub total: u64,
    pub items: Vec<HistoryItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeltaRequest {
    pub date: String,
    pub cafeteria: String,
    pub product: String,
    pub delta: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ResetRequest {
    pub date: String,
    pub cafeteria: String,
    pub product: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuantityResponse {
    pub date: String,
    pub cafeteria: String,
    pub product: String,
    pub quantity: Quantity,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SaveDayResponse {
    pub cafeteria: String,
    pub date: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_path_reads_as_zero() {
        let orders = Orders::default();
        assert_eq!(orders.quantity("2024-01-01", "Breck", "Croissant"), 0);
        assert!(orders.cafeteria_day("2024-01-01", "Breck").is_none());
    }

    #[test]
    fn slot_mut_creates_levels_once() {
        let mut orders = Orders::default();
        *orders.slot_mut("2024-01-01", "Breck", "Croissant") = 2;
        *orders.slot_mut("2024-01-01", "Breck", "Brioche") = 1;

        assert_eq!(orders.quantity("2024-01-01", "Breck", "Croissant"), 2);
        assert_eq!(orders.cafeteria_day("2024-01-01", "Breck").map(|day| day.len()), Some(2));
    }

    #[test]
    fn serializes_as_bare_nested_object() {
        let mut orders = Orders::default();
        *orders.slot_mut("2024-01-01", "Breck", "Croissant") = 3;

        let json = serde_json::to_value(&orders).unwrap();
        assert_eq!(json, serde_json::json!({ "2024-01-01": { "Breck": { "Croissant": 3 } } }));
    }

    #[test]
    fn dates_are_listed_newest_first() {
        let mut orders = Orders::default();
        for date in ["2024-01-02", "2024-01-10", "2023-12-31"] {
            *orders.slot_mut(date, "Blom", "Scone") = 1;
        }
        let dates: Vec<_> = orders.dates_desc().collect();
        assert_eq!(dates, vec!["2024-01-10", "2024-01-02", "2023-12-31"]);
    }
}
