//! Гонка сброса: любой игрок вне очереди сбрасывает карту того же ранга,
//! что и верх сброса.
//!
//! Исключительность обеспечивается двумя вещами:
//!   - команды матча применяются строго последовательно;
//!   - в команде указан `expected_top`, и после первой удачной гонки верх
//!     сброса меняется, так что вторая попытка получает `StaleTarget`.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::card::CardId;
use crate::domain::{PlayerId, SlotIndex};
use crate::engine::actions::{DrawSource, SlotRef};
use crate::engine::errors::{EngineError, Missing, Pile};
use crate::engine::history::MatchEventKind;
use crate::engine::piles;
use crate::engine::validation::{ensure_in_play, ensure_not_frozen, occupied_slot, seat_of};
use crate::state::MatchState;

/// Ожидающая передача карты: `actor` забрал чужую карту и должен отдать
/// одну из своих в освободившийся слот `recipient`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RaceGift {
    pub actor: PlayerId,
    pub recipient: PlayerId,
    pub vacated_slot: SlotIndex,
}

/// Сбросить карту вне очереди.
///
/// Ранг совпал:
///   - своя карта: слот становится надгробием;
///   - чужая карта: дополнительно ждём `race_gift` от игрока (если у него
///     остались карты).
///
/// Ранг не совпал: карта всё равно уходит в сброс, а штрафную карту из
/// колоды получает тот, кто ошибся.
pub fn race_discard(
    state: &mut MatchState,
    actor: PlayerId,
    target: SlotRef,
    expected_top: CardId,
) -> Result<(), EngineError> {
    ensure_in_play(state)?;
    seat_of(state, actor)?;
    ensure_not_frozen(state, actor)?;

    if state.race_gift.is_some() {
        return Err(EngineError::AlreadyClaimed("гонка ещё не завершена передачей карты"));
    }

    let top = *state
        .discard
        .top()
        .ok_or(EngineError::EmptySource(Pile::Discard))?;
    if top.id != expected_top {
        return Err(EngineError::StaleTarget);
    }

    let card = occupied_slot(state, target)?.card;
    let matched = card.same_rank(&top);

    // Номинированная карта уходит в сброс в любом случае.
    state
        .player_mut(target.player)
        .and_then(|p| p.hand.take(target.slot))
        .ok_or(EngineError::StaleTarget)?;
    piles::discard(state, card);

    state.history.push(MatchEventKind::RaceDiscard {
        actor,
        target,
        card,
        matched,
    });
    info!(
        match_id = state.id,
        actor,
        target_player = target.player,
        slot = target.slot,
        matched,
        "race discard"
    );

    if !matched {
        return give_penalty(state, actor);
    }

    if target.player != actor {
        let actor_has_cards = state
            .player(actor)
            .map(|p| p.hand.occupied_count() > 0)
            .unwrap_or(false);
        if actor_has_cards {
            state.race_gift = Some(RaceGift {
                actor,
                recipient: target.player,
                vacated_slot: target.slot,
            });
            state.history.push(MatchEventKind::RaceGiftPending {
                actor,
                recipient: target.player,
            });
        }
    }
    Ok(())
}

/// Штрафная карта из колоды (с пересборкой при необходимости) рубашкой
/// вверх в первое надгробие или в конец руки.
fn give_penalty(state: &mut MatchState, actor: PlayerId) -> Result<(), EngineError> {
    let card = piles::draw(state, DrawSource::Deck)?;
    let player = state
        .player_mut(actor)
        .ok_or(EngineError::NotFound(Missing::Player(actor)))?;
    let slot = player.hand.add(card);

    state.history.push(MatchEventKind::PenaltyCard {
        player_id: actor,
        slot,
    });
    debug!(match_id = state.id, player_id = actor, slot, "penalty card dealt");
    Ok(())
}

/// Второй шаг гонки: отдать свою карту из `slot` обделённому игроку.
///
/// Карта ложится в освобождённый слот; если его уже заняли, то в первое
/// надгробие или в конец руки получателя.
pub fn race_gift(state: &mut MatchState, actor: PlayerId, slot: SlotIndex) -> Result<(), EngineError> {
    ensure_in_play(state)?;
    let gift = match &state.race_gift {
        Some(g) if g.actor == actor => g.clone(),
        _ => return Err(EngineError::NotFound(Missing::RaceGift)),
    };

    let from = SlotRef::new(actor, slot);
    occupied_slot(state, from)?;
    let card = state
        .player_mut(actor)
        .and_then(|p| p.hand.take(slot))
        .ok_or(EngineError::StaleTarget)?;

    let recipient = state
        .player_mut(gift.recipient)
        .ok_or(EngineError::NotFound(Missing::Player(gift.recipient)))?;
    let to_slot = match recipient.hand.place(gift.vacated_slot, card) {
        Ok(()) => gift.vacated_slot,
        Err(card) => recipient.hand.add(card),
    };

    state.race_gift = None;
    state.history.push(MatchEventKind::RaceGiftGiven {
        actor,
        from_slot: slot,
        recipient: gift.recipient,
        to_slot,
    });
    debug!(
        match_id = state.id,
        actor,
        recipient = gift.recipient,
        to_slot,
        "race gift given"
    );
    Ok(())
}
