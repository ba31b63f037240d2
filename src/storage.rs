use crate::models::Orders;
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

/// Logical key the whole order history is stored under.
pub const ORDERS_STORAGE_KEY: &str = "deliveryApp_data";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage io failed: {0}")]
    Io(#[from] io::Error),
    #[error("stored orders are malformed: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("storage unavailable")]
    Unavailable,
}

/// Durable home of the order ledger.
///
/// `load` is called once at startup; `save` receives the complete ledger after
/// every mutation.
pub trait OrderStore {
    fn load(&self) -> Result<Orders, StoreError>;
    fn save(&self, orders: &Orders) -> Result<(), StoreError>;
}

/// Stores the ledger as one pretty-printed JSON document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl OrderStore for JsonFileStore {
    fn load(&self) -> Result<Orders, StoreError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Orders::default()),
            Err(err) => Err(err.into()),
        }
    }

    fn save(&self, orders: &Orders) -> Result<(), StoreError> {
        let payload = serde_json::to_vec_pretty(orders)?;
        let staging = self.staging_path();
        fs::write(&staging, payload)?;
        fs::rename(&staging, &self.path)?;
        Ok(())
    }
}

/// In-process key-value slot holding the same JSON bytes a file would.
///
/// Clones share the slot, so a test can keep a handle after giving one to a
/// ledger.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemorySlot>>,
}

#[derive(Debug, Default)]
struct MemorySlot {
    bytes: Option<Vec<u8>>,
    saves: usize,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let store = Self::default();
        store.slot().bytes = Some(bytes.into());
        store
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.slot().fail_writes = fail;
    }

    pub fn saves(&self) -> usize {
        self.slot().saves
    }

    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.slot().bytes.clone()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, MemorySlot> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl OrderStore for MemoryStore {
    fn load(&self) -> Result<Orders, StoreError> {
        match self.slot().bytes.as_deref() {
            Some(bytes) => Ok(serde_json::from_slice(bytes)?),
            None => Ok(Orders::default()),
        }
    }

    fn save(&self, orders: &Orders) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(orders)?;
        let mut slot = self.slot();
        if slot.fail_writes {
            return Err(StoreError::Unavailable);
        }
        slot.bytes = Some(payload);
        slot.saves += 1;
        Ok(())
    }
}
