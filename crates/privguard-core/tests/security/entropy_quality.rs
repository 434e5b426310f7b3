//! Symbol entropy of generated passwords.
//!
//! With a uniform draw over the 69-symbol pool the per-symbol Shannon
//! entropy approaches log2(69) ~= 6.11 bits. The four mandatory symbols skew
//! the distribution slightly towards the smaller classes (digits, specials),
//! so the threshold leaves headroom while still catching a generator stuck
//! on a subset of the pool.

use std::collections::HashMap;

use privguard_core::password::charset::POOL;
use privguard_core::password::generate_password;

#[allow(clippy::cast_precision_loss)]
fn shannon_entropy(counts: &HashMap<u8, u64>) -> f64 {
    let total: u64 = counts.values().sum();
    if total == 0 {
        return 0.0;
    }
    let len = total as f64;
    counts
        .values()
        .filter(|&&f| f > 0)
        .map(|&f| {
            let p = f as f64 / len;
            -p * p.log2()
        })
        .sum()
}

#[test]
fn symbol_entropy_close_to_uniform_pool() {
    let mut counts: HashMap<u8, u64> = HashMap::new();
    for _ in 0..10_000 {
        for b in generate_password().bytes() {
            *counts.entry(b).or_default() += 1;
        }
    }

    let entropy = shannon_entropy(&counts);
    assert!(
        entropy > 5.9,
        "symbol entropy too low: {entropy:.4} bits (expected > 5.9)"
    );
}

#[test]
fn every_pool_symbol_is_reachable() {
    let mut seen = [false; 256];
    for _ in 0..10_000 {
        for b in generate_password().bytes() {
            seen[usize::from(b)] = true;
        }
    }
    for b in POOL {
        assert!(seen[usize::from(*b)], "symbol {} never generated", char::from(*b));
    }
}
