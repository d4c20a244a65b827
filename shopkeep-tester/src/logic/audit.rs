use colored::Colorize;
use log::debug;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use shopkeep_game::{
    Contract, ContractDraft, ContractFilter, ContractState, MemoryStore, RefreshError,
    RefreshOrchestrator, Shop, ShopId, UserId, offer_seed, offer_violation, root_seed,
};

const AUDIT_SHOP: &str = "audit-shop";
const AUDIT_USER: &str = "audit-user";

/// One generated offer flattened for reports.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OfferRow {
    pub slot: usize,
    pub seed: String,
    pub dungeon_tier: u8,
    pub objective: String,
    pub base_risk: f64,
    pub gold_min: i32,
    pub gold_max: i32,
    pub eta_days: u8,
}

impl OfferRow {
    fn from_contract(slot: usize, contract: &Contract) -> Self {
        Self {
            slot,
            seed: contract.seed.clone(),
            dungeon_tier: contract.dungeon_tier,
            objective: contract.objective.label().to_string(),
            base_risk: contract.base_risk,
            gold_min: contract.expected_reward.gold_min,
            gold_max: contract.expected_reward.gold_max,
            eta_days: contract.eta_days,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditResult {
    pub world_seed: String,
    pub day: u32,
    pub passed: bool,
    pub checks_run: usize,
    pub failures: Vec<String>,
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    pub offers: Vec<OfferRow>,
}

#[derive(Default)]
struct Checklist {
    run: usize,
    failures: Vec<String>,
}

impl Checklist {
    fn check(&mut self, ok: bool, failure: impl FnOnce() -> String) {
        self.run += 1;
        if !ok {
            self.failures.push(failure());
        }
    }
}

/// Audit every world seed for `days` consecutive days starting at `start_day`.
pub fn run_audits(
    seeds: &[String],
    start_day: u32,
    days: u32,
    verbose: bool,
) -> Vec<AuditResult> {
    let mut results = Vec::new();
    for world_seed in seeds {
        for offset in 0..days {
            let day = start_day.saturating_add(offset);
            let result = audit_day(world_seed, day);
            if verbose {
                let status = if result.passed {
                    "ok".green()
                } else {
                    "failed".red()
                };
                println!(
                    "🧪 {} day {} - {} checks {}",
                    world_seed.bright_white(),
                    day,
                    result.checks_run,
                    status
                );
            }
            results.push(result);
        }
    }
    results
}

fn audit_shop(world_seed: &str, day: u32) -> Shop {
    Shop {
        id: ShopId::new(AUDIT_SHOP),
        user: UserId::new(AUDIT_USER),
        world_seed: Some(world_seed.to_string()),
        day: Some(day),
    }
}

fn fresh_store(shop: &Shop) -> MemoryStore {
    let store = MemoryStore::new();
    store.put_shop(shop.clone());
    store
}

fn drafts(batch: &[Contract]) -> Vec<ContractDraft> {
    batch.iter().map(Contract::to_draft).collect()
}

/// Run every generation check for one world seed and day.
pub fn audit_day(world_seed: &str, day: u32) -> AuditResult {
    let start = Instant::now();
    let shop = audit_shop(world_seed, day);
    let mut checklist = Checklist::default();
    debug!("auditing {world_seed} day {day}");

    let primary = fresh_store(&shop);
    let orchestrator = RefreshOrchestrator::new(&primary, &primary);
    let batch = match orchestrator.refresh(&shop.id) {
        Ok(batch) => batch,
        Err(err) => {
            checklist.check(false, || format!("refresh failed: {err}"));
            return finish(world_seed, day, checklist, Vec::new(), start);
        }
    };

    let expected = orchestrator.config().batch_size;
    check_batch_shape(&mut checklist, &shop, expected, &batch);
    check_determinism(&mut checklist, &shop, &batch);
    check_non_destructive(&mut checklist, &shop, &orchestrator, &batch);
    check_not_found(&mut checklist, &shop);

    let rows = batch
        .iter()
        .enumerate()
        .map(|(slot, contract)| OfferRow::from_contract(slot, contract))
        .collect();
    finish(world_seed, day, checklist, rows, start)
}

fn check_batch_shape(
    checklist: &mut Checklist,
    shop: &Shop,
    expected: usize,
    batch: &[Contract],
) {
    checklist.check(batch.len() == expected, || {
        format!("expected {expected} offers, got {}", batch.len())
    });

    let root = root_seed(shop.world_seed_or_default(), shop.day_or_default());
    for (slot, contract) in batch.iter().enumerate() {
        let expected = offer_seed(&root, slot);
        checklist.check(contract.seed == expected, || {
            format!("slot {slot} seed {} != {expected}", contract.seed)
        });
        let violation = offer_violation(&contract.to_draft());
        checklist.check(violation.is_none(), || {
            format!("slot {slot}: {}", violation.clone().unwrap_or_default())
        });
        checklist.check(
            contract.user == shop.user && contract.shop == shop.id,
            || format!("slot {slot} stamped with {}/{}", contract.user, contract.shop),
        );
    }
}

fn check_determinism(checklist: &mut Checklist, shop: &Shop, batch: &[Contract]) {
    let replica = fresh_store(shop);
    let replay = RefreshOrchestrator::new(&replica, &replica).refresh(&shop.id);
    match replay {
        Ok(second) => checklist.check(drafts(batch) == drafts(&second), || {
            "replayed refresh produced different offers".to_string()
        }),
        Err(err) => checklist.check(false, || format!("replay refresh failed: {err}")),
    }
}

fn check_non_destructive(
    checklist: &mut Checklist,
    shop: &Shop,
    orchestrator: &RefreshOrchestrator<&MemoryStore, &MemoryStore>,
    batch: &[Contract],
) {
    let store = orchestrator.contracts();
    let Some(first) = batch.first() else {
        return;
    };
    if let Err(err) = store.accept(&first.id) {
        checklist.check(false, || format!("accepting {} failed: {err}", first.id));
        return;
    }
    let accepted = ContractFilter {
        state: Some(ContractState::Accepted),
        ..ContractFilter::all(&shop.user, &shop.id)
    };
    let before = store.contracts(&accepted);

    if let Err(err) = orchestrator.refresh(&shop.id) {
        checklist.check(false, || format!("second refresh failed: {err}"));
        return;
    }
    checklist.check(store.contracts(&accepted) == before, || {
        "refresh disturbed accepted contracts".to_string()
    });
    let offered = store.count(&ContractFilter::offered(&shop.user, &shop.id));
    let expected = orchestrator.config().batch_size;
    checklist.check(offered == expected, || {
        format!("{offered} offered contracts after second refresh")
    });
}

fn check_not_found(checklist: &mut Checklist, shop: &Shop) {
    let store = fresh_store(shop);
    let missing = ShopId::new("audit-missing");
    let outcome = RefreshOrchestrator::new(&store, &store).refresh(&missing);
    checklist.check(
        matches!(outcome, Err(RefreshError::NotFound { .. })),
        || "refresh of a missing shop did not report NotFound".to_string(),
    );
    checklist.check(
        store.delete_calls() == 0 && store.insert_calls() == 0,
        || "refresh of a missing shop touched storage".to_string(),
    );
}

fn finish(
    world_seed: &str,
    day: u32,
    checklist: Checklist,
    offers: Vec<OfferRow>,
    start: Instant,
) -> AuditResult {
    AuditResult {
        world_seed: world_seed.to_string(),
        day,
        passed: checklist.failures.is_empty(),
        checks_run: checklist.run,
        failures: checklist.failures,
        duration: start.elapsed(),
        offers,
    }
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_micros().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let micros = u128::deserialize(deserializer)?;
        Ok(Duration::from_micros(u64::try_from(micros).unwrap_or(0)))
    }
}
