//! Positional randomness of generated passwords.
//!
//! Over 10,000 runs no position may hold a fixed value, and the position of
//! each class's first occurrence must move around (the shuffle must not
//! leave the mandatory symbols in draw order).

use std::collections::HashSet;

use privguard_core::password::charset::CharacterClass;
use privguard_core::password::{generate_password, DEFAULT_PASSWORD_LENGTH};

const RUNS: usize = 10_000;

#[test]
fn no_position_is_constant() {
    let mut per_position: Vec<HashSet<u8>> = vec![HashSet::new(); DEFAULT_PASSWORD_LENGTH];
    for _ in 0..RUNS {
        for (i, b) in generate_password().bytes().enumerate() {
            per_position[i].insert(b);
        }
    }
    for (i, values) in per_position.iter().enumerate() {
        // 10,000 uniform draws over 69 symbols hit nearly all of them.
        assert!(
            values.len() > 50,
            "position {i} only ever held {} distinct symbols",
            values.len()
        );
    }
}

#[test]
fn class_positions_vary_across_runs() {
    for class in CharacterClass::ALL {
        let mut first_positions = HashSet::new();
        for _ in 0..RUNS {
            let pw = generate_password();
            if let Some(pos) = pw.chars().position(|c| class.contains(c)) {
                first_positions.insert(pos);
            }
        }
        assert!(
            first_positions.len() > 1,
            "{} always first appears at the same position",
            class.as_str()
        );
    }
}

#[test]
fn class_order_varies_across_runs() {
    let mut orders = HashSet::new();
    for _ in 0..1_000 {
        let pw = generate_password();
        let mut order: Vec<CharacterClass> = Vec::new();
        for class in pw.chars().filter_map(CharacterClass::classify) {
            if !order.contains(&class) {
                order.push(class);
            }
        }
        orders.insert(order);
    }
    assert!(orders.len() > 1, "classes always appear in the same order");
}
