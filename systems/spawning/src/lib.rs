#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawn determination for grid cells.
//!
//! Whether a cell holds a cache, and which token it starts with, is a pure
//! function of the cell's south-west corner fed through a [`SpawnOracle`].
//! Revisiting an unmodified cell therefore reproduces identical contents and
//! nothing about it needs to be stored.

use geocache_core::{CellData, GridCoord, Rules, SpawnOracle, Token};
use sha2::{Digest, Sha256};

const TOKEN_SEED_LABEL: &str = "initialValue";

/// Oracle that derives luck values from the SHA-256 digest of the seed.
#[derive(Clone, Copy, Debug, Default)]
pub struct Sha256Oracle;

impl SpawnOracle for Sha256Oracle {
    fn luck(&self, seed: &str) -> f64 {
        const SCALE: f64 = 1.0 / ((1u64 << 53) as f64);
        let digest = Sha256::digest(seed.as_bytes());
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&digest[..8]);
        let value = u64::from_le_bytes(bytes) >> 11;
        (value as f64) * SCALE
    }
}

/// Pure system that decides the generated contents of grid cells.
#[derive(Clone, Debug)]
pub struct Spawning<O = Sha256Oracle> {
    oracle: O,
    rules: Rules,
}

impl Spawning<Sha256Oracle> {
    /// Creates a spawning system backed by the default oracle.
    #[must_use]
    pub fn new(rules: Rules) -> Self {
        Self::with_oracle(Sha256Oracle, rules)
    }
}

impl<O: SpawnOracle> Spawning<O> {
    /// Creates a spawning system consulting the provided oracle.
    #[must_use]
    pub fn with_oracle(oracle: O, rules: Rules) -> Self {
        Self { oracle, rules }
    }

    /// Seed string derived from the south-west corner of `coord`.
    #[must_use]
    pub fn seed_for(&self, coord: GridCoord) -> String {
        let corner = self.rules.mapper().to_geo_bounds(coord).south_west();
        format!("{},{}", corner.lat(), corner.lng())
    }

    /// Reports whether the oracle places a cache at `coord`.
    #[must_use]
    pub fn has_cache(&self, coord: GridCoord) -> bool {
        self.oracle.luck(&self.seed_for(coord)) < self.rules.spawn_probability
    }

    /// Generated contents of `coord`, or `None` when no cache exists there.
    #[must_use]
    pub fn determine(&self, coord: GridCoord) -> Option<CellData> {
        if !self.has_cache(coord) {
            return None;
        }

        let token = self.initial_token(&self.seed_for(coord));
        Some(CellData::generated(coord, Some(token)))
    }

    fn initial_token(&self, seed: &str) -> Token {
        let draw = self.oracle.luck(&format!("{seed},{TOKEN_SEED_LABEL}"));
        self.rules.token_tiers.token_for(draw)
    }
}
