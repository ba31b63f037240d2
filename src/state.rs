use crate::board::GestureBoard;
use crate::catalog::Catalog;
use crate::gesture::TimerToken;
use crate::ledger::OrderLedger;
use crate::models::RowKey;
use crate::storage::JsonFileStore;
use std::{collections::HashMap, sync::Arc};
use tokio::{sync::Mutex, task::JoinHandle};

/// Everything a pointer event or timer may touch. Held behind one lock, so
/// gesture and ledger work never interleaves.
pub struct Workspace {
    pub ledger: OrderLedger<JsonFileStore>,
    pub gestures: GestureBoard,
    pub(crate) pending_timers: HashMap<RowKey, (TimerToken, JoinHandle<()>)>,
}

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub workspace: Arc<Mutex<Workspace>>,
}

impl AppState {
    pub fn new(catalog: Catalog, ledger: OrderLedger<JsonFileStore>) -> Self {
        Self {
            catalog: Arc::new(catalog),
            workspace: Arc::new(Mutex::new(Workspace {
                ledger,
                gestures: GestureBoard::default(),
                pending_timers: HashMap::new(),
            })),
        }
    }
}
