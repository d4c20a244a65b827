//! Centralized balance and tuning constants for Shopkeep offer generation.
//!
//! These values define the deterministic math behind every contract offer.
//! Changing any of them changes the output recorded against existing seeds,
//! so they are only adjusted via reviewed code changes.

// Seed derivation ----------------------------------------------------------
pub const SEED_DELIMITER: char = ':';
pub(crate) const STREAM_DOMAIN_TAG: &[u8] = b"shopkeep.offer-stream.v1";

// Batch --------------------------------------------------------------------
pub const OFFER_BATCH_SIZE: usize = 3;
/// Draws consumed from a stream for a single offer.
pub const DRAWS_PER_OFFER: u64 = 6;

// Dungeon tier -------------------------------------------------------------
pub const TIER_MIN: i32 = 1;
pub const TIER_MAX: i32 = 5;
/// Width of the rolled tier band; a roll of `[0, 1)` covers tiers 1..=4.
pub(crate) const TIER_ROLL_SPAN: f64 = 4.0;

// Risk ---------------------------------------------------------------------
pub const RISK_MIN: f64 = 0.0;
pub const RISK_MAX: f64 = 0.95;
pub(crate) const RISK_BASE: f64 = 0.15;
pub(crate) const RISK_SPAN: f64 = 0.7;
pub(crate) const RISK_PER_TIER: f64 = 0.05;
pub(crate) const RISK_DECIMALS: u32 = 2;

// Reward -------------------------------------------------------------------
pub(crate) const GOLD_BASE_PER_TIER: f64 = 50.0;
pub(crate) const GOLD_SPREAD_PER_TIER: f64 = 40.0;
pub(crate) const GOLD_MARGIN_FLOOR: f64 = 40.0;
pub(crate) const GOLD_MARGIN_PER_TIER: f64 = 60.0;

// ETA ----------------------------------------------------------------------
pub const ETA_MIN: i32 = 1;
pub const ETA_MAX: i32 = 5;
pub(crate) const ETA_ROLL_SPAN: f64 = 4.0;

// Logging targets ----------------------------------------------------------
pub(crate) const LOG_TARGET_REFRESH: &str = "shopkeep::refresh";
