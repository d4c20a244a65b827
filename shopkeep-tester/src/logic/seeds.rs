use anyhow::{Context, Result};
use shopkeep_game::seed::WORD_LIST;
use shopkeep_game::{validate_world_seed, world_seed_from_entropy};

/// Suffixes paired with every word when `all` is requested.
const ALL_SEED_SUFFIXES: std::ops::RangeInclusive<u8> = 0..=4;

/// Resolve CLI seed arguments into world seeds.
///
/// Supports literal world seeds, integers (expanded through
/// [`world_seed_from_entropy`]), and the keyword `all`, which expands to
/// every word in the seed word list crossed with a few `-NN` suffixes.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<String>> {
    let mut resolved: Vec<String> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        if token.eq_ignore_ascii_case("all") {
            for word in WORD_LIST {
                let word = word.to_ascii_lowercase();
                resolved.extend(ALL_SEED_SUFFIXES.map(|suffix| format!("{word}-{suffix:02}")));
            }
            continue;
        }

        if let Ok(value) = token.parse::<u64>() {
            resolved.push(world_seed_from_entropy(value));
            continue;
        }

        validate_world_seed(token).with_context(|| format!("Unusable world seed: {token}"))?;
        resolved.push(token.clone());
    }

    let mut deduped: Vec<String> = Vec::with_capacity(resolved.len());
    for seed in resolved {
        if !deduped.contains(&seed) {
            deduped.push(seed);
        }
    }

    if deduped.is_empty() {
        deduped.push("arcadia".to_string());
    }

    Ok(deduped)
}
