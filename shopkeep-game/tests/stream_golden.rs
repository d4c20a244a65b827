use shopkeep_game::{DeterministicStream, Objective, OfferConfig, ShopId, UserId, generate_offer};

#[test]
fn first_draws_for_arcadia_slot_zero_are_pinned() {
    let mut stream = DeterministicStream::from_seed_str("arcadia:17:0");
    assert_eq!(stream.next_unit().to_bits(), 0x3fd8_2764_a7ed_56b4);
    assert_eq!(stream.next_unit().to_bits(), 0x3fd7_3e15_17e5_6522);
    assert_eq!(stream.next_unit().to_bits(), 0x3fe1_cb7c_6ce1_dbab);
}

#[test]
fn neighbouring_days_roll_different_offers() {
    let user = UserId::new("u-1");
    let shop = ShopId::new("s-1");
    let cfg = OfferConfig::default();

    let day_zero = generate_offer("arcadia:0:0", &user, &shop, &cfg);
    assert_eq!(day_zero.dungeon_tier, 3);
    assert_eq!(day_zero.objective, Objective::Scout);
    assert_eq!(day_zero.expected_reward.gold_min, 207);
    assert_eq!(day_zero.expected_reward.gold_max, 283);
    assert_eq!(day_zero.eta_days, 1);

    let day_eighteen = generate_offer("arcadia:18:0", &user, &shop, &cfg);
    assert_eq!(day_eighteen.dungeon_tier, 4);
    assert_eq!(day_eighteen.expected_reward.gold_min, 293);
    assert_eq!(day_eighteen.expected_reward.gold_max, 445);
    assert_eq!(
        day_eighteen.expected_reward.loot_hint.as_deref(),
        Some("tier-4 map fragment")
    );
}
