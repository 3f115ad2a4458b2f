//! Seeded RNG for loot rolls.
//!
//! Every rolling function takes `&mut impl Rng`; the session owns one
//! `LootRng` so a seed reproduces a whole play session. Sub-streams (balance
//! chunks, per-source streams) are derived with SHA3 the same way floor
//! hashes are derived from the tower seed.

use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use sha3::{Digest, Sha3_256};

/// Generator used across the crate
pub type LootRng = Xoshiro256PlusPlus;

/// Create a generator from a plain seed
pub fn seeded(seed: u64) -> LootRng {
    LootRng::seed_from_u64(seed)
}

/// Deterministic sub-seed from a base seed and a stream index
pub fn derive_seed(base_seed: u64, stream: u64) -> u64 {
    let mut hasher = Sha3_256::new();
    hasher.update(base_seed.to_le_bytes());
    hasher.update(stream.to_le_bytes());
    first_u64(&hasher.finalize())
}

/// Deterministic seed from a text label (e.g. a save slot or table id)
pub fn seed_from_str(label: &str) -> u64 {
    let mut hasher = Sha3_256::new();
    hasher.update(label.as_bytes());
    first_u64(&hasher.finalize())
}

/// Generator for a derived stream
pub fn stream(base_seed: u64, stream: u64) -> LootRng {
    seeded(derive_seed(base_seed, stream))
}

fn first_u64(digest: &[u8]) -> u64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&digest[0..8]);
    u64::from_le_bytes(bytes)
}
