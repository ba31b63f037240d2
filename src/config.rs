use crate::storage::ORDERS_STORAGE_KEY;
use std::{env, path::PathBuf};

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub port: u16,
    pub data_path: PathBuf,
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads `PORT` and `APP_DATA_PATH` through `lookup`. An unparsable port
    /// falls back to the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let port = lookup("PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        let data_path = lookup("APP_DATA_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_data_path);

        Self { port, data_path }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("data").join(format!("{ORDERS_STORAGE_KEY}.json"))
}
