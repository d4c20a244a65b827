//! Contract offer synthesis from a deterministic stream.
//!
//! Each offer consumes exactly six draws in a fixed order: tier, objective,
//! risk, minimum gold, gold margin, ETA. Reordering or skipping a draw
//! changes every offer recorded against an existing seed.

use serde::{Deserialize, Serialize};

use crate::config::OfferConfig;
use crate::constants::{
    ETA_MAX, ETA_MIN, ETA_ROLL_SPAN, GOLD_BASE_PER_TIER, GOLD_MARGIN_FLOOR, GOLD_MARGIN_PER_TIER,
    GOLD_SPREAD_PER_TIER, RISK_BASE, RISK_DECIMALS, RISK_MAX, RISK_MIN, RISK_PER_TIER, RISK_SPAN,
    TIER_MAX, TIER_MIN, TIER_ROLL_SPAN,
};
use crate::contract::{ContractDraft, ContractState, ExpectedReward, Objective, ShopId, UserId};
use crate::numbers::{clamp_range, floor_f64_to_i32, round_to_places, usize_to_f64};
use crate::stream::DeterministicStream;

/// Generated terms of one offer, before ownership is stamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferRoll {
    pub dungeon_tier: u8,
    pub objective: Objective,
    pub base_risk: f64,
    pub gold_min: i32,
    pub gold_max: i32,
    pub eta_days: u8,
}

impl OfferRoll {
    /// Roll one offer from the stream.
    pub fn generate(stream: &mut DeterministicStream, tier_floor_bias: u8) -> Self {
        let tier = roll_tier(stream.next_unit(), tier_floor_bias);
        let objective = pick_objective(stream.next_unit());
        let base_risk = roll_risk(stream.next_unit(), tier);
        let gold_min = roll_gold_min(stream.next_unit(), tier);
        let gold_max = gold_min.saturating_add(roll_gold_margin(stream.next_unit(), tier));
        let eta_days = roll_eta(stream.next_unit());

        Self {
            dungeon_tier: u8::try_from(tier).unwrap_or(1),
            objective,
            base_risk,
            gold_min,
            gold_max,
            eta_days: u8::try_from(eta_days).unwrap_or(1),
        }
    }

    /// Stamp ownership and seed onto the roll.
    #[must_use]
    pub fn into_draft(
        self,
        user: &UserId,
        shop: &ShopId,
        seed: String,
        loot_hints: bool,
    ) -> ContractDraft {
        let loot_hint = loot_hints.then(|| loot_hint(self.dungeon_tier, self.objective));
        ContractDraft {
            user: user.clone(),
            shop: shop.clone(),
            dungeon_tier: self.dungeon_tier,
            objective: self.objective,
            base_risk: self.base_risk,
            expected_reward: ExpectedReward {
                gold_min: self.gold_min,
                gold_max: self.gold_max,
                loot_hint,
            },
            eta_days: self.eta_days,
            state: ContractState::Offered,
            seed,
        }
    }
}

/// Build the draft for one batch slot from its per-offer seed.
#[must_use]
pub fn generate_offer(
    offer_seed: &str,
    user: &UserId,
    shop: &ShopId,
    cfg: &OfferConfig,
) -> ContractDraft {
    let mut stream = DeterministicStream::from_seed_str(offer_seed);
    OfferRoll::generate(&mut stream, cfg.tier_floor_bias).into_draft(
        user,
        shop,
        offer_seed.to_string(),
        cfg.loot_hints,
    )
}

fn roll_tier(draw: f64, tier_floor_bias: u8) -> i32 {
    let rolled = TIER_MIN + floor_f64_to_i32(draw * TIER_ROLL_SPAN) + i32::from(tier_floor_bias);
    // Dungeons only go five tiers deep; an unbiased roll tops out at four.
    clamp_range(rolled, TIER_MIN, TIER_MAX)
}

fn pick_objective(draw: f64) -> Objective {
    let slots = usize_to_f64(Objective::ALL.len());
    let index = usize::try_from(floor_f64_to_i32(draw * slots)).unwrap_or(0);
    Objective::ALL
        .get(index)
        .copied()
        .unwrap_or(Objective::Retrieve)
}

fn roll_risk(draw: f64, tier: i32) -> f64 {
    let raw = RISK_BASE + draw * RISK_SPAN + f64::from(tier - 1) * RISK_PER_TIER;
    // Deeper dungeons are riskier, but no contract is a guaranteed loss.
    round_to_places(clamp_range(raw, RISK_MIN, RISK_MAX), RISK_DECIMALS)
}

fn roll_gold_min(draw: f64, tier: i32) -> i32 {
    let tier = f64::from(tier);
    let base = GOLD_BASE_PER_TIER * tier;
    let spread = GOLD_SPREAD_PER_TIER * tier;
    floor_f64_to_i32(base + draw * spread)
}

fn roll_gold_margin(draw: f64, tier: i32) -> i32 {
    floor_f64_to_i32(GOLD_MARGIN_FLOOR + draw * GOLD_MARGIN_PER_TIER * f64::from(tier))
}

fn roll_eta(draw: f64) -> i32 {
    // Nominal trips last 1..=4 days; 5 is the hard ceiling.
    clamp_range(
        ETA_MIN + floor_f64_to_i32(draw * ETA_ROLL_SPAN),
        ETA_MIN,
        ETA_MAX,
    )
}

fn loot_hint(tier: u8, objective: Objective) -> String {
    let prize = match objective {
        Objective::Retrieve => "relic",
        Objective::Scout => "map fragment",
        Objective::Escort => "favor token",
    };
    format!("tier-{tier} {prize}")
}

/// Describe the first design bound a draft breaks, if any.
#[must_use]
pub fn offer_violation(draft: &ContractDraft) -> Option<String> {
    let tier = i32::from(draft.dungeon_tier);
    if !(TIER_MIN..=TIER_MAX).contains(&tier) {
        return Some(format!("dungeon tier {tier} outside {TIER_MIN}..={TIER_MAX}"));
    }
    if !(RISK_MIN..=RISK_MAX).contains(&draft.base_risk) {
        return Some(format!(
            "base risk {} outside {RISK_MIN}..={RISK_MAX}",
            draft.base_risk
        ));
    }
    let reward = &draft.expected_reward;
    if reward.gold_min > reward.gold_max {
        return Some(format!(
            "gold_min {} exceeds gold_max {}",
            reward.gold_min, reward.gold_max
        ));
    }
    let eta = i32::from(draft.eta_days);
    if !(ETA_MIN..=ETA_MAX).contains(&eta) {
        return Some(format!("eta {eta} outside {ETA_MIN}..={ETA_MAX}"));
    }
    if draft.state != ContractState::Offered {
        return Some(format!("generated contract in state {}", draft.state));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::DRAWS_PER_OFFER;

    fn owner() -> (UserId, ShopId) {
        (UserId::new("u-1"), ShopId::new("s-1"))
    }

    #[test]
    fn consumes_exactly_six_draws() {
        let mut stream = DeterministicStream::from_seed_str("arcadia:17:0");
        let _ = OfferRoll::generate(&mut stream, 0);
        assert_eq!(stream.draws(), DRAWS_PER_OFFER);
    }

    #[test]
    fn roll_matches_manual_formulas() {
        let draws: Vec<f64> = DeterministicStream::from_seed_str("arcadia:17:1")
            .take(6)
            .collect();
        let mut stream = DeterministicStream::from_seed_str("arcadia:17:1");
        let roll = OfferRoll::generate(&mut stream, 0);

        let tier = (1.0 + (draws[0] * 4.0).floor()).clamp(1.0, 5.0);
        assert!((f64::from(roll.dungeon_tier) - tier).abs() < f64::EPSILON);
        let objective_index = (draws[1] * 3.0).floor();
        assert_eq!(
            Objective::ALL
                .iter()
                .position(|o| *o == roll.objective)
                .map(usize_to_f64),
            Some(objective_index)
        );
        let risk = ((0.15 + draws[2] * 0.7 + (tier - 1.0) * 0.05).clamp(0.0, 0.95) * 100.0)
            .round()
            / 100.0;
        assert!((roll.base_risk - risk).abs() < 1e-12);
        let gold_min = (50.0 * tier + draws[3] * 40.0 * tier).floor();
        assert!((f64::from(roll.gold_min) - gold_min).abs() < f64::EPSILON);
        let gold_max = gold_min + (40.0 + draws[4] * 60.0 * tier).floor();
        assert!((f64::from(roll.gold_max) - gold_max).abs() < f64::EPSILON);
        let eta = (1.0 + (draws[5] * 4.0).floor()).clamp(1.0, 5.0);
        assert!((f64::from(roll.eta_days) - eta).abs() < f64::EPSILON);
    }

    #[test]
    fn formula_edges_hold_at_draw_extremes() {
        assert_eq!(roll_tier(0.0, 0), 1);
        assert_eq!(roll_tier(0.999_999, 0), 4);
        assert_eq!(roll_tier(0.999_999, 4), 5);
        assert_eq!(pick_objective(0.0), Objective::Retrieve);
        assert_eq!(pick_objective(0.5), Objective::Scout);
        assert_eq!(pick_objective(0.999_999), Objective::Escort);
        assert!((roll_risk(0.0, 1) - 0.15).abs() < 1e-12);
        assert!((roll_risk(0.999_999, 4) - 0.95).abs() < 1e-12);
        assert_eq!(roll_gold_min(0.0, 3), 150);
        assert_eq!(roll_gold_margin(0.0, 5), 40);
        assert_eq!(roll_eta(0.0), 1);
        assert_eq!(roll_eta(0.999_999), 4);
    }

    #[test]
    fn generated_offers_respect_bounds() {
        let (user, shop) = owner();
        let cfg = OfferConfig::default();
        for day in 0..200 {
            for slot in 0..3 {
                let seed = format!("bounds:{day}:{slot}");
                let draft = generate_offer(&seed, &user, &shop, &cfg);
                assert_eq!(offer_violation(&draft), None, "seed {seed}");
                assert!(draft.expected_reward.gold_max >= draft.expected_reward.gold_min + 40);
            }
        }
    }

    #[test]
    fn draft_is_stamped_with_owner_and_offer_seed() {
        let (user, shop) = owner();
        let draft = generate_offer("arcadia:17:2", &user, &shop, &OfferConfig::default());
        assert_eq!(draft.user, user);
        assert_eq!(draft.shop, shop);
        assert_eq!(draft.state, ContractState::Offered);
        assert_eq!(draft.seed, "arcadia:17:2");
        let hint = draft.expected_reward.loot_hint.expect("hints enabled");
        assert!(hint.starts_with(&format!("tier-{}", draft.dungeon_tier)));
    }

    #[test]
    fn loot_hints_can_be_disabled_without_changing_terms() {
        let (user, shop) = owner();
        let with_hint = generate_offer("arcadia:3:0", &user, &shop, &OfferConfig::default());
        let cfg = OfferConfig {
            loot_hints: false,
            ..OfferConfig::default()
        };
        let without = generate_offer("arcadia:3:0", &user, &shop, &cfg);
        assert!(without.expected_reward.loot_hint.is_none());
        assert_eq!(with_hint.dungeon_tier, without.dungeon_tier);
        assert_eq!(
            with_hint.expected_reward.gold_min,
            without.expected_reward.gold_min
        );
    }

    #[test]
    fn violation_reports_inverted_gold() {
        let (user, shop) = owner();
        let mut draft = generate_offer("arcadia:1:0", &user, &shop, &OfferConfig::default());
        draft.expected_reward.gold_min = draft.expected_reward.gold_max + 1;
        let message = offer_violation(&draft).expect("violation detected");
        assert!(message.contains("exceeds"));
    }
}
