use std::collections::HashMap;

use geocache_core::{CellData, GridCoord};
use thiserror::Error;

use crate::{DurableStore, StorageError};

/// Fixed key under which modified cells are stored.
pub const MEMORY_KEY: &str = "geocache.cells";

/// Encodes cell records as the durable JSON sequence.
pub fn encode_records(records: &[CellData]) -> Result<String, serde_json::Error> {
    serde_json::to_string(records)
}

/// Reasons a durable JSON sequence cannot be turned into cell records.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The payload does not match the record layout.
    #[error("malformed cell records: {0}")]
    Malformed(#[from] serde_json::Error),
    /// A record holds a token that is not a positive power of two.
    #[error("cell {coord:?} holds token {value}, which is not a power of two")]
    InvalidToken {
        /// Coordinate of the offending record.
        coord: GridCoord,
        /// Value found in the record.
        value: u32,
    },
}

/// Decodes the durable JSON sequence into cell records.
///
/// Every token must be a positive power of two; a single bad record rejects
/// the whole payload.
pub fn decode_records(payload: &str) -> Result<Vec<CellData>, RecordError> {
    let records: Vec<CellData> = serde_json::from_str(payload)?;
    for data in &records {
        match data.token {
            Some(token) if !token.is_power_of_two() => {
                return Err(RecordError::InvalidToken {
                    coord: data.grid_coord,
                    value: token.value(),
                });
            }
            _ => {}
        }
    }
    Ok(records)
}

/// Durable memory of every cell a player has modified, indexed by coordinate.
#[derive(Debug)]
pub struct PersistentMemory<S> {
    store: S,
    cells: HashMap<GridCoord, CellData>,
}

impl<S: DurableStore> PersistentMemory<S> {
    /// Opens persistent memory over `store` and loads whatever it holds.
    pub fn open(store: S) -> Self {
        let mut memory = Self {
            store,
            cells: HashMap::new(),
        };
        let _ = memory.load();
        memory
    }

    /// Reloads the index from the store and returns the stored records.
    ///
    /// A missing, unreadable or corrupt payload yields an empty memory so the
    /// game can always start.
    pub fn load(&mut self) -> Vec<CellData> {
        self.cells.clear();

        let payload = match self.store.read(MEMORY_KEY) {
            Ok(Some(payload)) => payload,
            Ok(None) => return Vec::new(),
            Err(error) => {
                tracing::warn!(%error, "could not read persistent memory; starting empty");
                return Vec::new();
            }
        };

        let records = match decode_records(&payload) {
            Ok(records) => records,
            Err(error) => {
                tracing::warn!(%error, "discarding corrupt persistent memory");
                return Vec::new();
            }
        };

        for data in &records {
            let _ = self.cells.insert(data.grid_coord, *data);
        }
        tracing::debug!(count = self.cells.len(), "loaded persistent memory");
        self.records()
    }

    /// Stored record for `coord`, if the cell was ever modified.
    #[must_use]
    pub fn get(&self, coord: GridCoord) -> Option<CellData> {
        self.cells.get(&coord).copied()
    }

    /// Inserts or replaces the record for `data.grid_coord` and writes the full
    /// set back to the store.
    pub fn upsert(&mut self, data: CellData) -> Result<(), StorageError> {
        let _ = self.cells.insert(data.grid_coord, data);
        self.flush()
    }

    /// Replaces every record at once and writes the result back to the store.
    pub fn replace_all(&mut self, records: Vec<CellData>) -> Result<(), StorageError> {
        self.cells = records
            .into_iter()
            .map(|data| (data.grid_coord, data))
            .collect();
        self.flush()
    }

    /// Forgets every record, in memory and in the store.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.cells.clear();
        self.store.write(MEMORY_KEY, "[]")
    }

    /// All stored records ordered by coordinate.
    #[must_use]
    pub fn records(&self) -> Vec<CellData> {
        let mut records: Vec<CellData> = self.cells.values().copied().collect();
        records.sort_by_key(|data| data.grid_coord);
        records
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Reports whether no records are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Read access to the backing store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    fn flush(&mut self) -> Result<(), StorageError> {
        let payload = encode_records(&self.records())?;
        self.store.write(MEMORY_KEY, &payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryStore;
    use geocache_core::Token;

    fn modified(x: i32, y: i32, value: Option<u32>) -> CellData {
        CellData {
            token: value.map(Token::new),
            grid_coord: GridCoord::new(x, y),
            modified: true,
        }
    }

    #[test]
    fn upsert_twice_keeps_single_record() {
        let mut memory = PersistentMemory::open(MemoryStore::new());
        let data = modified(1, 2, Some(4));
        memory.upsert(data).expect("upsert");
        memory.upsert(data).expect("upsert");

        assert_eq!(memory.len(), 1);
        let stored = memory.store().read(MEMORY_KEY).expect("read").expect("payload");
        assert_eq!(decode_records(&stored).expect("decode"), vec![data]);
    }

    #[test]
    fn upsert_replaces_existing_coordinate() {
        let mut memory = PersistentMemory::open(MemoryStore::new());
        memory.upsert(modified(0, 0, Some(2))).expect("upsert");
        memory.upsert(modified(0, 0, None)).expect("upsert");
        assert_eq!(memory.get(GridCoord::new(0, 0)), Some(modified(0, 0, None)));
    }

    #[test]
    fn corrupt_payload_loads_empty() {
        let mut store = MemoryStore::new();
        store.write(MEMORY_KEY, "{not json").expect("write");
        let mut memory = PersistentMemory::open(store);
        assert!(memory.is_empty());
        assert!(memory.load().is_empty());
    }

    #[test]
    fn records_with_impossible_tokens_load_empty() {
        let mut store = MemoryStore::new();
        store
            .write(
                MEMORY_KEY,
                r#"[{"token":{"value":4},"gridCoord":{"x":1,"y":0},"modified":true},
                    {"token":{"value":3},"gridCoord":{"x":0,"y":0},"modified":true}]"#,
            )
            .expect("write");

        let memory = PersistentMemory::open(store);

        assert!(memory.is_empty());
        assert_eq!(memory.get(GridCoord::new(1, 0)), None);
    }

    #[test]
    fn zero_token_is_rejected() {
        let payload = r#"[{"token":{"value":0},"gridCoord":{"x":2,"y":5},"modified":true}]"#;
        let error = decode_records(payload).expect_err("zero is not a power of two");
        assert!(matches!(
            error,
            RecordError::InvalidToken { coord, value: 0 } if coord == GridCoord::new(2, 5)
        ));
    }

    #[test]
    fn reset_clears_store() {
        let mut memory = PersistentMemory::open(MemoryStore::new());
        memory.upsert(modified(3, 3, Some(1))).expect("upsert");
        memory.reset().expect("reset");
        assert!(memory.is_empty());
        assert!(memory.load().is_empty());
    }
}
