use serde::{Deserialize, Serialize};

use crate::domain::hand::Hand;
use crate::domain::{MatchId, PlayerId};
use crate::engine::scoring::Settlement;
use crate::engine::EngineError;
use crate::engine::errors::Missing;
use crate::state::MatchState;

use super::dto::{MatchViewDto, PlayerViewDto, SlotDto, StageDto};

/// Запросы "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Query {
    /// Публичное состояние матча.
    GetMatch { match_id: MatchId },

    /// Итог матча (только после окончания).
    GetSettlement { match_id: MatchId },

    /// Рука игрока глазами самого игрока: видны только открытые карты,
    /// как и у всех остальных. Подсмотренное клиент помнит сам.
    GetHand { match_id: MatchId, player_id: PlayerId },
}

/// Результат запроса "только чтение".
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum QueryResponse {
    Match(MatchViewDto),
    Settlement(Option<Settlement>),
    Hand(Vec<SlotDto>),
}

/// Ответить на запрос по уже загруженному состоянию.
pub fn answer_query(state: &MatchState, query: &Query) -> Result<QueryResponse, EngineError> {
    match query {
        Query::GetMatch { .. } => Ok(QueryResponse::Match(build_match_view(state))),
        Query::GetSettlement { .. } => Ok(QueryResponse::Settlement(state.settlement.clone())),
        Query::GetHand { player_id, .. } => state
            .player(*player_id)
            .map(|p| QueryResponse::Hand(build_slots(&p.hand)))
            .ok_or(EngineError::NotFound(Missing::Player(*player_id))),
    }
}

impl Query {
    pub fn match_id(&self) -> MatchId {
        match self {
            Query::GetMatch { match_id }
            | Query::GetSettlement { match_id }
            | Query::GetHand { match_id, .. } => *match_id,
        }
    }
}

/// Сформировать публичный DTO матча. Карты рубашкой вверх не раскрываются,
/// вытянутая из колоды карта тоже.
pub fn build_match_view(state: &MatchState) -> MatchViewDto {
    let players = state
        .players
        .iter()
        .map(|p| PlayerViewDto {
            player_id: p.id,
            name: p.name.clone(),
            seat: p.seat,
            slots: build_slots(&p.hand),
            ready: p.ready,
            peeked: p.peeked,
            score: p.score,
        })
        .collect();

    MatchViewDto {
        match_id: state.id,
        phase: state.phase,
        version: state.version,
        turn: state.turn,
        stage: StageDto::from_stage(&state.stage),
        deck_size: state.deck.len(),
        discard_top: state.discard.top().copied(),
        discard_size: state.discard.len(),
        players,
        cambio_caller: state.cambio_caller,
        race_gift: state.race_gift.as_ref().map(|g| (g.actor, g.recipient)),
        settlement: state.settlement.clone(),
    }
}

fn build_slots(hand: &Hand) -> Vec<SlotDto> {
    hand.slots
        .iter()
        .map(|slot| match slot {
            None => SlotDto::Empty,
            Some(hc) if hc.face_up => SlotDto::FaceUp(hc.card),
            Some(_) => SlotDto::FaceDown,
        })
        .collect()
}
