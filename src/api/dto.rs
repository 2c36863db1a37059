use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::{MatchId, PlayerId, SeatIndex};
use crate::engine::history::MatchEvent;
use crate::engine::actions::DrawSource;
use crate::engine::scoring::Settlement;
use crate::state::{MatchState, Phase, TurnStage};

use super::queries::build_match_view;

/// Слот руки в публичном виде.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SlotDto {
    /// Надгробие.
    Empty,
    /// Карта рубашкой вверх: номинал никому не виден.
    FaceDown,
    FaceUp(Card),
}

/// DTO игрока в матче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerViewDto {
    pub player_id: PlayerId,
    pub name: String,
    pub seat: SeatIndex,
    pub slots: Vec<SlotDto>,
    pub ready: bool,
    pub peeked: bool,
    /// Итоговые очки (после окончания матча).
    pub score: i32,
}

/// Чем сейчас занят ход.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StageDto {
    AwaitingDraw,
    /// Карта вытянута. Номинал виден только для карты из сброса.
    AwaitingResolution { from_discard: Option<Card> },
    Power {
        power_seq: u64,
        actor: PlayerId,
        targets_chosen: u8,
    },
}

/// Публичное представление матча: никаких скрытых карт.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchViewDto {
    pub match_id: MatchId,
    pub phase: Phase,
    pub version: u64,
    pub turn: SeatIndex,
    pub stage: StageDto,
    pub deck_size: usize,
    pub discard_top: Option<Card>,
    pub discard_size: usize,
    pub players: Vec<PlayerViewDto>,
    pub cambio_caller: Option<PlayerId>,
    /// Кто должен отдать карту после гонки и кому.
    pub race_gift: Option<(PlayerId, PlayerId)>,
    pub settlement: Option<Settlement>,
}

impl StageDto {
    pub(crate) fn from_stage(stage: &TurnStage) -> Self {
        match stage {
            TurnStage::AwaitingDraw => StageDto::AwaitingDraw,
            TurnStage::AwaitingResolution { drawn, source } => StageDto::AwaitingResolution {
                from_discard: match source {
                    DrawSource::Discard => Some(*drawn),
                    DrawSource::Deck => None,
                },
            },
            TurnStage::Power(p) => StageDto::Power {
                power_seq: p.seq,
                actor: p.actor,
                targets_chosen: p.targets_chosen(),
            },
        }
    }
}

/// Уведомление об изменении матча: уходит всем местам после каждой
/// успешной команды.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateChanged {
    pub match_id: MatchId,
    pub version: u64,
    /// Новые события, порождённые командой.
    pub events: Vec<MatchEvent>,
    pub view: MatchViewDto,
}

impl StateChanged {
    pub fn from_state(state: &MatchState, events: Vec<MatchEvent>) -> Self {
        Self {
            match_id: state.id,
            version: state.version,
            events,
            view: build_match_view(state),
        }
    }
}

/// Ответ API на команду.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum CommandResponse {
    /// Создан новый матч.
    MatchCreated(MatchViewDto),

    /// Команда применена: новое публичное состояние и события.
    MatchState(StateChanged),
}
