//! Колода и сброс: взять карту, сбросить, пересобрать колоду из сброса.

use tracing::debug;

use crate::domain::card::Card;
use crate::engine::actions::DrawSource;
use crate::engine::errors::{EngineError, Pile};
use crate::engine::history::MatchEventKind;
use crate::engine::RandomSource;
use crate::state::MatchState;

/// Взять карту из выбранной стопки.
///
/// Пустая колода при сбросе > 1 карты сначала пересобирается
/// (в рамках той же команды).
pub fn draw(state: &mut MatchState, source: DrawSource) -> Result<Card, EngineError> {
    match source {
        DrawSource::Deck => {
            if state.deck.is_empty() {
                if state.discard.len() > 1 {
                    reshuffle(state)?;
                } else {
                    return Err(EngineError::EmptySource(Pile::Deck));
                }
            }
            state
                .deck
                .draw_one()
                .ok_or(EngineError::EmptySource(Pile::Deck))
        }
        DrawSource::Discard => state
            .discard
            .take_top()
            .ok_or(EngineError::EmptySource(Pile::Discard)),
    }
}

/// Положить карту на верх сброса.
pub fn discard(state: &mut MatchState, card: Card) {
    state.discard.push(card);
}

/// Пересобрать колоду: верх сброса откладывается, остальное перемешивается
/// (Фишер–Йетс) и становится колодой. Возвращает новый размер колоды.
pub fn reshuffle(state: &mut MatchState) -> Result<usize, EngineError> {
    if state.discard.len() < 2 {
        return Err(EngineError::EmptySource(Pile::Discard));
    }

    let mut cards = state.discard.take_all_but_top();
    let mut rng = state.next_rng();
    rng.shuffle(&mut cards);

    // Старые карты колоды (если были) остаются под новыми.
    state.deck.cards.extend(cards);
    let deck_size = state.deck.len();

    debug!(match_id = state.id, deck_size, "discard pile reshuffled into deck");
    state
        .history
        .push(MatchEventKind::Reshuffled { deck_size });

    Ok(deck_size)
}
