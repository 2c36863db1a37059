//! Общие проверки перед изменением матча.

use crate::domain::hand::HandCard;
use crate::domain::{PlayerId, SeatIndex};
use crate::engine::actions::SlotRef;
use crate::engine::errors::{EngineError, Missing};
use crate::state::{MatchState, Phase};

/// Матч в розыгрыше (Playing или FinalRound).
pub fn ensure_in_play(state: &MatchState) -> Result<(), EngineError> {
    if state.is_in_play() {
        Ok(())
    } else {
        Err(EngineError::IllegalPhase("матч не в розыгрыше"))
    }
}

pub fn ensure_phase(state: &MatchState, phase: Phase, what: &'static str) -> Result<(), EngineError> {
    if state.phase == phase {
        Ok(())
    } else {
        Err(EngineError::IllegalPhase(what))
    }
}

/// Seat игрока или NotFound.
pub fn seat_of(state: &MatchState, player_id: PlayerId) -> Result<SeatIndex, EngineError> {
    state
        .seat_of(player_id)
        .ok_or(EngineError::NotFound(Missing::Player(player_id)))
}

/// Игрок сидит за столом и сейчас его ход.
pub fn ensure_turn_owner(state: &MatchState, player_id: PlayerId) -> Result<SeatIndex, EngineError> {
    let seat = seat_of(state, player_id)?;
    if seat != state.turn {
        return Err(EngineError::IllegalPhase("сейчас не ход этого игрока"));
    }
    Ok(seat)
}

/// Рука объявившего камбио заморожена для его собственных действий.
pub fn ensure_not_frozen(state: &MatchState, player_id: PlayerId) -> Result<(), EngineError> {
    if state.cambio_caller == Some(player_id) {
        Err(EngineError::IllegalPhase("рука объявившего камбио заморожена"))
    } else {
        Ok(())
    }
}

/// Слот существует и занят картой.
///
/// Несуществующий слот — NotFound, надгробие — StaleTarget
/// (карту уже забрали другим действием).
pub fn occupied_slot(state: &MatchState, target: SlotRef) -> Result<&HandCard, EngineError> {
    let player = state
        .player(target.player)
        .ok_or(EngineError::NotFound(Missing::Player(target.player)))?;
    if !player.hand.has_slot(target.slot) {
        return Err(EngineError::NotFound(Missing::Slot {
            player: target.player,
            slot: target.slot,
        }));
    }
    player.hand.get(target.slot).ok_or(EngineError::StaleTarget)
}
