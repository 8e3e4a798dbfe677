//! StateStore — redb-backed device persistence.
//!
//! [`DeviceStore`] is the contract the rules engine depends on; [`StateStore`]
//! implements it over redb. All values are JSON-serialized into redb's
//! `&[u8]` value columns. The store supports both on-disk and in-memory
//! backends (the latter for testing).

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use redb::{Database, ReadableDatabase, ReadableTable};
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::tables::*;
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Durable keyed storage for device records.
pub trait DeviceStore: Send + Sync {
    /// Persist a new device, assigning its id and creation time.
    fn insert(&self, device: NewDevice) -> StateResult<Device>;

    /// Point lookup by id.
    fn find_by_id(&self, id: DeviceId) -> StateResult<Option<Device>>;

    /// All devices whose brand matches exactly (case-sensitive).
    fn find_by_brand(&self, brand: &str) -> StateResult<Vec<Device>>;

    /// All devices in the given state.
    fn find_by_state(&self, state: DeviceState) -> StateResult<Vec<Device>>;

    /// Every device, in ascending id order.
    fn find_all(&self) -> StateResult<Vec<Device>>;

    /// Upsert by id. The stored creation time of an existing record wins
    /// over the one carried by `device`.
    fn save(&self, device: &Device) -> StateResult<Device>;

    /// Delete by id. Returns true if it existed.
    fn delete_by_id(&self, id: DeviceId) -> StateResult<bool>;
}

/// Thread-safe device store backed by redb.
#[derive(Clone)]
pub struct StateStore {
    db: Arc<Database>,
}

impl StateStore {
    /// Open (or create) a persistent store at the given path.
    pub fn open(path: &Path) -> StateResult<Self> {
        let db = Database::create(path).map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!(?path, "device store opened");
        Ok(store)
    }

    /// Create an ephemeral in-memory store (for testing).
    pub fn open_in_memory() -> StateResult<Self> {
        let backend = redb::backends::InMemoryBackend::new();
        let db = Database::builder()
            .create_with_backend(backend)
            .map_err(map_err!(Open))?;
        let store = Self { db: Arc::new(db) };
        store.ensure_tables()?;
        debug!("in-memory device store opened");
        Ok(store)
    }

    /// Create all tables if they don't exist yet.
    fn ensure_tables(&self) -> StateResult<()> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        // Opening a table in a write transaction creates it if absent.
        txn.open_table(DEVICES).map_err(map_err!(Table))?;
        txn.open_table(META).map_err(map_err!(Table))?;
        txn.commit().map_err(map_err!(Transaction))?;
        Ok(())
    }

    /// Collect every device for which `keep` returns true.
    fn scan(&self, mut keep: impl FnMut(&Device) -> bool) -> StateResult<Vec<Device>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(DEVICES).map_err(map_err!(Table))?;
        let mut results = Vec::new();
        for entry in table.iter().map_err(map_err!(Read))? {
            let (_, value) = entry.map_err(map_err!(Read))?;
            let device = decode(value.value())?;
            if keep(&device) {
                results.push(device);
            }
        }
        Ok(results)
    }
}

/// The id after `id`, or a write error once the id space is exhausted.
fn successor(id: DeviceId) -> StateResult<DeviceId> {
    id.checked_add(1)
        .ok_or_else(|| StateError::Write(format!("device id space exhausted at {id}")))
}

fn decode(bytes: &[u8]) -> StateResult<Device> {
    serde_json::from_slice(bytes).map_err(map_err!(Deserialize))
}

impl DeviceStore for StateStore {
    fn insert(&self, device: NewDevice) -> StateResult<Device> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let device = {
            let mut meta = txn.open_table(META).map_err(map_err!(Table))?;
            let id = meta
                .get(NEXT_DEVICE_ID)
                .map_err(map_err!(Read))?
                .map(|guard| guard.value())
                .unwrap_or(1);
            meta.insert(NEXT_DEVICE_ID, successor(id)?)
                .map_err(map_err!(Write))?;

            let device = device.into_device(id, Utc::now());
            let value = serde_json::to_vec(&device).map_err(map_err!(Serialize))?;
            let mut table = txn.open_table(DEVICES).map_err(map_err!(Table))?;
            table
                .insert(id, value.as_slice())
                .map_err(map_err!(Write))?;
            device
        };
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(id = device.id, "device inserted");
        Ok(device)
    }

    fn find_by_id(&self, id: DeviceId) -> StateResult<Option<Device>> {
        let txn = self.db.begin_read().map_err(map_err!(Transaction))?;
        let table = txn.open_table(DEVICES).map_err(map_err!(Table))?;
        match table.get(id).map_err(map_err!(Read))? {
            Some(guard) => Ok(Some(decode(guard.value())?)),
            None => Ok(None),
        }
    }

    fn find_by_brand(&self, brand: &str) -> StateResult<Vec<Device>> {
        self.scan(|device| device.brand == brand)
    }

    fn find_by_state(&self, state: DeviceState) -> StateResult<Vec<Device>> {
        self.scan(|device| device.state == state)
    }

    fn find_all(&self) -> StateResult<Vec<Device>> {
        self.scan(|_| true)
    }

    fn save(&self, device: &Device) -> StateResult<Device> {
        let mut device = device.clone();
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        {
            let mut table = txn.open_table(DEVICES).map_err(map_err!(Table))?;
            let existing = match table.get(device.id).map_err(map_err!(Read))? {
                Some(guard) => Some(decode(guard.value())?),
                None => None,
            };
            if let Some(existing) = existing {
                device.creation_time = existing.creation_time;
            }
            let value = serde_json::to_vec(&device).map_err(map_err!(Serialize))?;
            table
                .insert(device.id, value.as_slice())
                .map_err(map_err!(Write))?;

            // Keep the id counter ahead of any explicitly saved id.
            let mut meta = txn.open_table(META).map_err(map_err!(Table))?;
            let next = meta
                .get(NEXT_DEVICE_ID)
                .map_err(map_err!(Read))?
                .map(|guard| guard.value())
                .unwrap_or(1);
            if device.id >= next {
                meta.insert(NEXT_DEVICE_ID, successor(device.id)?)
                    .map_err(map_err!(Write))?;
            }
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(id = device.id, state = %device.state, "device saved");
        Ok(device)
    }

    fn delete_by_id(&self, id: DeviceId) -> StateResult<bool> {
        let txn = self.db.begin_write().map_err(map_err!(Transaction))?;
        let existed;
        {
            let mut table = txn.open_table(DEVICES).map_err(map_err!(Table))?;
            existed = table.remove(id).map_err(map_err!(Write))?.is_some();
        }
        txn.commit().map_err(map_err!(Transaction))?;
        debug!(id, existed, "device deleted");
        Ok(existed)
    }
}
