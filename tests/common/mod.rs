//! Общие помощники для интеграционных тестов: логи, готовые матчи,
//! подкладка нужных карт без нарушения сохранения карт.

#![allow(dead_code)]

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

use cambio_engine::domain::{Card, CardFace, HandCard, MatchConfig, PlayerId, SlotIndex};
use cambio_engine::engine::{apply_action, ActionOutcome, EngineError, MatchAction};
use cambio_engine::infra::RngSeed;
use cambio_engine::state::{MatchState, Phase};

static LOGGING: OnceCell<()> = OnceCell::new();

/// Логи для тестов: TEST_LOG -> RUST_LOG -> "warn".
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

pub const MATCH_ID: u64 = 7;

/// Матч в лобби с игроками 1..=n.
pub fn lobby(players: u64, config: MatchConfig) -> MatchState {
    init_logging();
    let mut state = MatchState::new(MATCH_ID, config, RngSeed::from_u64(42));
    for pid in 1..=players {
        act(
            &mut state,
            MatchAction::Join {
                player_id: pid,
                name: format!("P{pid}"),
            },
        );
    }
    state
}

/// Матч в фазе Playing: карты розданы, все подсмотрели, ход у места 0.
pub fn playing(players: u64) -> MatchState {
    playing_with(players, MatchConfig::default())
}

pub fn playing_with(players: u64, config: MatchConfig) -> MatchState {
    let mut state = lobby(players, config);
    act(&mut state, MatchAction::Start);
    for pid in 1..=players {
        act(&mut state, MatchAction::ConfirmPeeked { player_id: pid });
    }
    assert_eq!(state.phase, Phase::Playing);
    state
}

/// Применить команду, которая обязана пройти.
pub fn act(state: &mut MatchState, action: MatchAction) -> ActionOutcome {
    let name = action.name();
    match apply_action(state, action) {
        Ok(outcome) => outcome,
        Err(e) => panic!("{name} failed: {e}"),
    }
}

/// Применить команду, которая обязана упасть; проверяем, что состояние не изменилось.
pub fn reject(state: &mut MatchState, action: MatchAction) -> EngineError {
    let before = state.clone();
    let name = action.name();
    match apply_action(state, action) {
        Ok(_) => panic!("{name} unexpectedly succeeded"),
        Err(e) => {
            assert_eq!(*state, before, "{name} changed state on error");
            e
        }
    }
}

pub fn face(s: &str) -> CardFace {
    s.parse().expect("valid card face")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Location {
    Deck(usize),
    Discard(usize),
    Hand(PlayerId, SlotIndex),
}

fn locate(state: &MatchState, f: CardFace) -> Option<Location> {
    let hit = |c: &Card| c.rank == f.rank && c.suit == f.suit;
    if let Some(i) = state.deck.cards.iter().position(hit) {
        return Some(Location::Deck(i));
    }
    if let Some(i) = state.discard.cards.iter().position(hit) {
        return Some(Location::Discard(i));
    }
    for p in &state.players {
        for slot in p.hand.occupied_slots() {
            if p.hand.get(slot).map(|hc| hit(&hc.card)).unwrap_or(false) {
                return Some(Location::Hand(p.id, slot));
            }
        }
    }
    None
}

fn card_at(state: &MatchState, at: Location) -> Card {
    match at {
        Location::Deck(i) => state.deck.cards[i],
        Location::Discard(i) => state.discard.cards[i],
        Location::Hand(pid, slot) => {
            state
                .player(pid)
                .and_then(|p| p.hand.get(slot))
                .expect("occupied slot")
                .card
        }
    }
}

fn set_at(state: &mut MatchState, at: Location, card: Card) {
    match at {
        Location::Deck(i) => state.deck.cards[i] = card,
        Location::Discard(i) => state.discard.cards[i] = card,
        Location::Hand(pid, slot) => {
            let player = state.player_mut(pid).expect("player");
            player.hand.slots[slot as usize] = Some(HandCard::face_down(card));
        }
    }
}

fn swap_into(state: &mut MatchState, target: Location, f: CardFace) -> Card {
    let from = locate(state, f).expect("card somewhere in play");
    let wanted = card_at(state, from);
    if from != target {
        let displaced = card_at(state, target);
        set_at(state, from, displaced);
        set_at(state, target, wanted);
    }
    wanted
}

/// Положить карту `f` в слот игрока (обмен местами с текущей картой слота).
pub fn rig_hand(state: &mut MatchState, pid: PlayerId, slot: SlotIndex, f: &str) -> Card {
    swap_into(state, Location::Hand(pid, slot), face(f))
}

/// Положить карту `f` на верх колоды.
pub fn rig_deck_top(state: &mut MatchState, f: &str) -> Card {
    let top = state.deck.len() - 1;
    swap_into(state, Location::Deck(top), face(f))
}

/// Положить карту `f` на верх сброса (карта уходит из колоды).
pub fn rig_discard_top(state: &mut MatchState, f: &str) -> Card {
    rig_deck_top(state, f);
    let card = state.deck.cards.pop().expect("deck not empty");
    state.discard.push(card);
    card
}

/// Карта в слоте игрока.
pub fn card_in(state: &MatchState, pid: PlayerId, slot: SlotIndex) -> Option<Card> {
    state
        .player(pid)
        .and_then(|p| p.hand.get(slot))
        .map(|hc| hc.card)
}
