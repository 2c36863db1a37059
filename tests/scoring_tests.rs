//! Подсчёт очков: суммы рук, штраф за камбио, ничьи.

use cambio_engine::domain::{Card, CardId, Hand, Player, RuleTable, RuleVariant};
use cambio_engine::engine::scoring::{hand_total, settle};

fn hand_of(rules: RuleTable, faces: &[&str]) -> Hand {
    let cards: Vec<Card> = faces
        .iter()
        .enumerate()
        .map(|(i, f)| rules.card(CardId(i as u8), f.parse().unwrap()))
        .collect();
    Hand::dealt(cards)
}

fn player(id: u64, faces: &[&str]) -> Player {
    let mut p = Player::new(id, format!("P{id}"), (id - 1) as u8);
    p.hand = hand_of(RuleTable::default(), faces);
    p
}

#[test]
fn hand_total_uses_rule_table() {
    let std_hand = hand_of(RuleTable::default(), &["Ah", "Jc", "Kh", "Ks", "X*"]);
    assert_eq!(hand_total(&std_hand), 1 + 10 + 0 + 10 + 0);

    let face = hand_of(
        RuleTable::new(RuleVariant::FaceValue),
        &["Ah", "Jc", "Qd", "Kh", "Ks"],
    );
    assert_eq!(hand_total(&face), 1 + 11 + 12 - 1 + 13);
}

#[test]
fn tombstones_score_zero() {
    let mut hand = hand_of(RuleTable::default(), &["9h", "9c", "2d"]);
    hand.take(0);
    assert_eq!(hand_total(&hand), 11);
    hand.take(1);
    hand.take(2);
    assert_eq!(hand_total(&hand), 0);
}

#[test]
fn lowest_total_wins_without_cambio() {
    let players = vec![player(1, &["9h", "9c"]), player(2, &["Ah", "2c"]), player(3, &["5h"])];
    let s = settle(&players, None, 10);

    assert_eq!(s.winners, vec![2]);
    assert!(!s.caller_penalized);
    assert!(s.scores.iter().all(|sc| sc.penalty == 0));
    assert_eq!(s.score_of(1).unwrap().final_score, 18);
}

#[test]
fn caller_with_lowest_score_is_not_penalized() {
    let players = vec![player(1, &["Ah", "Kh"]), player(2, &["5h"]), player(3, &["9h"])];
    let s = settle(&players, Some(1), 10);

    assert!(!s.caller_penalized);
    assert_eq!(s.score_of(1).unwrap().final_score, 1);
    assert_eq!(s.winners, vec![1]);
}

/// Ничья на минимуме: объявивший освобождён от штрафа, победителей двое.
#[test]
fn caller_tied_for_lowest_is_exempt_and_co_wins() {
    let players = vec![player(1, &["3h"]), player(2, &["Ah", "2c"]), player(3, &["9h"])];
    let s = settle(&players, Some(1), 10);

    assert!(!s.caller_penalized);
    assert_eq!(s.winners, vec![1, 2]);
}

#[test]
fn caller_beaten_by_anyone_pays_penalty() {
    let players = vec![player(1, &["4h"]), player(2, &["3c"]), player(3, &["9h"])];
    let s = settle(&players, Some(1), 10);

    assert!(s.caller_penalized);
    let caller = s.score_of(1).unwrap();
    assert_eq!(caller.hand_total, 4);
    assert_eq!(caller.penalty, 10);
    assert_eq!(caller.final_score, 14);
    assert_eq!(s.winners, vec![2]);
}

#[test]
fn penalty_amount_is_configurable() {
    let players = vec![player(1, &["4h"]), player(2, &["3c"])];
    let s = settle(&players, Some(1), 25);
    assert_eq!(s.score_of(1).unwrap().final_score, 29);

    let s = settle(&players, Some(1), 0);
    assert_eq!(s.winners, vec![2]);
}

#[test]
fn settlement_is_deterministic() {
    let players = vec![player(1, &["4h", "Jd"]), player(2, &["3c", "Ks"]), player(3, &["X*"])];
    assert_eq!(settle(&players, Some(2), 10), settle(&players, Some(2), 10));
}

#[test]
fn unknown_caller_is_ignored() {
    let players = vec![player(1, &["4h"]), player(2, &["3c"])];
    let s = settle(&players, Some(42), 10);
    assert!(!s.caller_penalized);
    assert_eq!(s.winners, vec![2]);
}
