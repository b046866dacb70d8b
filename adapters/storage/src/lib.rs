#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Durable persistence for player-modified cells.
//!
//! Only cells a player has interacted with are ever written. They live in a
//! flat key-value [`DurableStore`] as one JSON sequence under [`MEMORY_KEY`],
//! and are indexed by grid coordinate while the game runs.

mod memory;
mod store;
mod transfer;

pub use memory::{decode_records, encode_records, PersistentMemory, RecordError, MEMORY_KEY};
pub use store::{DurableStore, FileStore, MemoryStore};
pub use transfer::{decode_save_code, encode_save_code, TransferError, SAVE_CODE_HEADER};

use thiserror::Error;

/// Errors surfaced by durable stores and persistent memory.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Cell records could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
