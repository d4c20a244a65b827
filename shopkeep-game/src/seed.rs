//! Seed derivation for shop generation.
//!
//! Seed format: `<WORLD>:<DAY>` for a day's root seed and
//! `<WORLD>:<DAY>:<SLOT>` for a single offer, e.g. `arcadia:17:2`.

use std::fmt::Display;
use thiserror::Error;

use crate::constants::SEED_DELIMITER;

/// Errors raised when a world seed cannot be used for derivation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SeedError {
    #[error("world seed must not be blank")]
    Blank,
    #[error("world seed {seed:?} contains the reserved delimiter ':'")]
    ContainsDelimiter { seed: String },
}

// Word list for generated world seeds
pub const WORD_LIST: [&str; 32] = [
    "ARCADIA", "BRAMBLE", "CINDER", "DUSKMOOR", "EMBERFALL", "FENWICK", "GLOAM", "HOLLOW",
    "IRONVALE", "JUNIPER", "KESTREL", "LANTERN", "MARROW", "NETTLE", "OAKSHADE", "PYRE",
    "QUARRY", "RAVENS", "SALTMARSH", "THORN", "UMBER", "VESPER", "WILLOW", "XANTH", "YARROW",
    "ZEPHYR", "ASHGROVE", "BLACKWATER", "COPPERLEAF", "DRAKEHOLD", "EVERGLOW", "FROSTHELM",
];

fn join_component(prefix: &str, component: impl Display) -> String {
    format!("{prefix}{SEED_DELIMITER}{component}")
}

/// Combine a world seed and day counter into the root seed for that day.
#[must_use]
pub fn root_seed(world_seed: &str, day: u32) -> String {
    join_component(world_seed, day)
}

/// Combine a root seed and zero-based batch slot into a per-offer seed.
#[must_use]
pub fn offer_seed(root_seed: &str, index: usize) -> String {
    join_component(root_seed, index)
}

/// Check that a world seed keeps derived seeds unambiguous.
///
/// # Errors
///
/// Returns [`SeedError::Blank`] for empty or whitespace-only seeds and
/// [`SeedError::ContainsDelimiter`] when the seed embeds the delimiter.
pub fn validate_world_seed(seed: &str) -> Result<(), SeedError> {
    if seed.trim().is_empty() {
        return Err(SeedError::Blank);
    }
    if seed.contains(SEED_DELIMITER) {
        return Err(SeedError::ContainsDelimiter {
            seed: seed.to_string(),
        });
    }
    Ok(())
}

/// Components recovered from a per-offer seed string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferSeedParts {
    pub world_seed: String,
    pub day: u32,
    pub index: usize,
}

/// Split a per-offer seed back into world seed, day, and slot.
///
/// The world seed is everything before the last two delimiters, so this also
/// recovers seeds that were derived from an unvalidated world seed.
#[must_use]
pub fn parse_offer_seed(seed: &str) -> Option<OfferSeedParts> {
    let (rest, index) = seed.rsplit_once(SEED_DELIMITER)?;
    let (world_seed, day) = rest.rsplit_once(SEED_DELIMITER)?;
    Some(OfferSeedParts {
        world_seed: world_seed.to_string(),
        day: day.parse().ok()?,
        index: index.parse().ok()?,
    })
}

/// Build a readable world seed such as `cinder-42` from raw entropy.
#[must_use]
pub fn world_seed_from_entropy(entropy: u64) -> String {
    let word_count = WORD_LIST.len() as u64;
    let word_index = usize::try_from(entropy % word_count).unwrap_or(0);
    let word = WORD_LIST.get(word_index).copied().unwrap_or("ARCADIA");
    let suffix = (entropy >> 17) % 100;
    format!("{}-{suffix:02}", word.to_ascii_lowercase())
}
