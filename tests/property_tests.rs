//! Property tests: случайные последовательности команд против инвариантов матча.
//!
//! Проверяем:
//! - карты сохраняются (54 после раздачи, с учётом вытянутой карты);
//! - руки не укорачиваются (надгробия остаются на месте);
//! - ход идёт строго по кругу;
//! - отклонённая команда не меняет состояние;
//! - матч заканчивается только когда ход вернулся к объявившему камбио.

mod common;

use proptest::prelude::*;

use cambio_engine::domain::{CardId, PlayerId, FULL_DECK_SIZE};
use cambio_engine::engine::{
    apply_action, DrawSource, MatchAction, MatchEventKind, PowerDecision, SlotRef,
    TurnResolution,
};
use cambio_engine::state::{MatchState, Phase};

use common::*;

/// Абстрактный шаг. Конкретные игроки и цели берутся из текущего состояния.
#[derive(Clone, Debug)]
enum Op {
    Draw { from_deck: bool },
    Resolve { kind: u8, slot: u8, use_power: bool },
    Select { who: u8, slot: u8 },
    Decide { confirm: bool },
    Expire,
    Cambio { who: u8 },
    Race { who: u8, whose: u8, slot: u8 },
    Gift { slot: u8 },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<bool>().prop_map(|from_deck| Op::Draw { from_deck }),
        4 => (0u8..3, 0u8..6, any::<bool>())
            .prop_map(|(kind, slot, use_power)| Op::Resolve { kind, slot, use_power }),
        2 => (0u8..4, 0u8..6).prop_map(|(who, slot)| Op::Select { who, slot }),
        1 => any::<bool>().prop_map(|confirm| Op::Decide { confirm }),
        1 => Just(Op::Expire),
        1 => (0u8..4).prop_map(|who| Op::Cambio { who }),
        2 => (0u8..4, 0u8..4, 0u8..6)
            .prop_map(|(who, whose, slot)| Op::Race { who, whose, slot }),
        1 => (0u8..6).prop_map(|slot| Op::Gift { slot }),
    ]
}

fn player_at(state: &MatchState, idx: u8) -> PlayerId {
    state.players[idx as usize % state.players.len()].id
}

fn turn_owner(state: &MatchState) -> PlayerId {
    state.turn_owner().map(|p| p.id).unwrap_or(0)
}

fn to_action(state: &MatchState, op: &Op) -> MatchAction {
    let owner = turn_owner(state);
    match *op {
        Op::Draw { from_deck } => MatchAction::Draw {
            player_id: owner,
            source: if from_deck {
                DrawSource::Deck
            } else {
                DrawSource::Discard
            },
        },
        Op::Resolve {
            kind,
            slot,
            use_power,
        } => MatchAction::ResolveTurn {
            player_id: owner,
            resolution: match kind {
                0 => TurnResolution::Discard,
                1 => TurnResolution::Swap { slot },
                _ => TurnResolution::Add,
            },
            use_power,
        },
        Op::Select { who, slot } => MatchAction::PowerSelect {
            player_id: owner,
            target: SlotRef::new(player_at(state, who), slot),
        },
        Op::Decide { confirm } => MatchAction::PowerConfirm {
            player_id: owner,
            decision: if confirm {
                PowerDecision::Confirm
            } else {
                PowerDecision::Decline
            },
        },
        Op::Expire => MatchAction::RevealExpired {
            power_seq: state.next_power_seq.saturating_sub(1),
        },
        Op::Cambio { who } => MatchAction::CallCambio {
            player_id: player_at(state, who),
        },
        Op::Race { who, whose, slot } => MatchAction::RaceDiscard {
            player_id: player_at(state, who),
            target: SlotRef::new(player_at(state, whose), slot),
            expected_top: state.discard.top().map(|c| c.id).unwrap_or(CardId(0)),
        },
        Op::Gift { slot } => MatchAction::RaceGift {
            player_id: state.race_gift.as_ref().map(|g| g.actor).unwrap_or(owner),
            slot,
        },
    }
}

fn hand_lens(state: &MatchState) -> Vec<usize> {
    state.players.iter().map(|p| p.hand.len()).collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn random_play_keeps_invariants(
        players in 2u64..=4,
        ops in prop::collection::vec(op(), 1..120),
    ) {
        let mut state = playing(players);
        let n = state.players.len() as u8;

        for op in &ops {
            if state.phase == Phase::Ended {
                break;
            }
            let action = to_action(&state, op);
            let before = state.clone();
            let lens_before = hand_lens(&state);

            match apply_action(&mut state, action) {
                Err(_) => prop_assert_eq!(&state, &before),
                Ok(outcome) => {
                    prop_assert!(state.version > before.version);

                    for e in &outcome.events {
                        if let MatchEventKind::TurnAdvanced { from, to } = e.kind {
                            prop_assert_eq!(to, (from + 1) % n);
                        }
                    }

                    let lens_after = hand_lens(&state);
                    for (b, a) in lens_before.iter().zip(&lens_after) {
                        prop_assert!(a >= b, "hand shrank: {} -> {}", b, a);
                    }
                }
            }

            prop_assert_eq!(state.card_count(), FULL_DECK_SIZE);

            if state.phase == Phase::Ended {
                let caller_seat = state.cambio_caller_seat();
                prop_assert!(caller_seat.is_some());
                prop_assert_eq!(Some(state.turn), caller_seat);
                prop_assert!(state.settlement.is_some());
            }
        }
    }
}
