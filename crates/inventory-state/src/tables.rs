//! redb table definitions for the device store.
//!
//! Device records are JSON-serialized into `&[u8]` value columns and keyed
//! by their numeric id, so a full-table iteration yields ascending ids.

use redb::TableDefinition;

/// Device records keyed by `id`.
pub const DEVICES: TableDefinition<u64, &[u8]> = TableDefinition::new("devices");

/// Store bookkeeping counters keyed by name.
pub const META: TableDefinition<&str, u64> = TableDefinition::new("meta");

/// Key in [`META`] holding the next id to hand out.
pub const NEXT_DEVICE_ID: &str = "next_device_id";
