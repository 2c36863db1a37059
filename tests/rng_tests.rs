// tests/rng_tests.rs

mod common;

use std::collections::HashSet;

use cambio_engine::domain::{CardId, Deck, RuleTable, FULL_DECK_SIZE};
use cambio_engine::engine::{MatchAction, RandomSource};
use cambio_engine::infra::{DeterministicRng, RngSeed, SystemRng};
use cambio_engine::state::MatchState;

use common::*;

fn dealt(seed: u64, match_id: u64) -> MatchState {
    let mut s = MatchState::new(match_id, Default::default(), RngSeed::from_u64(seed));
    for pid in 1..=3 {
        act(
            &mut s,
            MatchAction::Join {
                player_id: pid,
                name: format!("P{pid}"),
            },
        );
    }
    act(&mut s, MatchAction::Start);
    s
}

fn shuffled_ids(rng: &mut impl RandomSource) -> Vec<CardId> {
    let mut cards = Deck::full(&RuleTable::default()).cards;
    rng.shuffle(&mut cards);
    cards.into_iter().map(|c| c.id).collect()
}

#[test]
fn shuffle_is_a_permutation() {
    let mut rng = DeterministicRng::from_seed(7);
    let ids = shuffled_ids(&mut rng);

    assert_eq!(ids.len(), FULL_DECK_SIZE);
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), FULL_DECK_SIZE);

    let ordered: Vec<_> = (0..FULL_DECK_SIZE as u8).map(CardId).collect();
    assert_ne!(ids, ordered);
}

#[test]
fn same_seed_same_order() {
    let a = shuffled_ids(&mut DeterministicRng::from_seed(123));
    let b = shuffled_ids(&mut DeterministicRng::from_seed(123));
    let c = shuffled_ids(&mut DeterministicRng::from_seed(124));

    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn derived_seeds_differ_per_match_and_shuffle() {
    let base = RngSeed::from_u64(1);

    assert_eq!(base.derive(5, 0), base.derive(5, 0));
    assert_ne!(base.derive(5, 0), base.derive(5, 1));
    assert_ne!(base.derive(5, 0), base.derive(6, 0));
    assert_ne!(base.derive(5, 0), base);
}

#[test]
fn system_rng_shuffle_is_a_permutation() {
    let mut rng = SystemRng;
    let ids = shuffled_ids(&mut rng);
    let unique: HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), FULL_DECK_SIZE);

    assert_ne!(rng.fresh_seed(), rng.fresh_seed());
}

//
// ---------- воспроизводимость раздачи ----------
//

#[test]
fn same_seed_and_match_deal_same_hands() {
    let a = dealt(99, 1);
    let b = dealt(99, 1);

    assert_eq!(a.deck, b.deck);
    for (pa, pb) in a.players.iter().zip(&b.players) {
        assert_eq!(pa.hand, pb.hand);
    }
    assert_eq!(a.shuffle_count, 1);
}

#[test]
fn different_match_ids_deal_differently() {
    let a = dealt(99, 1);
    let b = dealt(99, 2);
    assert_ne!(a.deck, b.deck);
}
