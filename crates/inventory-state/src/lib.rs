//! inventory-state — durable device storage.
//!
//! Backed by [redb](https://docs.rs/redb). Defines the [`Device`] data
//! model, the [`DeviceStore`] contract the rules engine is written against,
//! and [`StateStore`], the redb implementation of that contract.
//!
//! # Architecture
//!
//! Devices are JSON-serialized into redb's `&[u8]` value columns, keyed by
//! a `u64` id. Ids come from a counter kept in a separate `meta` table and
//! are allocated in the same write transaction as the insert, so they are
//! never handed out twice, even across deletes and restarts.
//!
//! The `StateStore` is `Clone` + `Send` + `Sync` (backed by `Arc<Database>`)
//! and can be shared across async tasks.

pub mod error;
pub mod store;
pub mod tables;
pub mod types;

pub use error::{StateError, StateResult};
pub use store::{DeviceStore, StateStore};
pub use types::*;
