use core::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{ConfigError, MatchId, PlayerId, SlotIndex};

/// Какую ссылку не удалось разрешить.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Missing {
    Match(MatchId),
    Player(PlayerId),
    Slot { player: PlayerId, slot: SlotIndex },
    /// Нет ожидающей передачи карты после гонки.
    RaceGift,
}

impl fmt::Display for Missing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Missing::Match(id) => write!(f, "матч {id}"),
            Missing::Player(id) => write!(f, "игрок {id}"),
            Missing::Slot { player, slot } => write!(f, "слот {slot} у игрока {player}"),
            Missing::RaceGift => write!(f, "ожидающая передача карты"),
        }
    }
}

/// Стопка карт.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pile {
    Deck,
    Discard,
}

impl fmt::Display for Pile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pile::Deck => write!(f, "колода"),
            Pile::Discard => write!(f, "сброс"),
        }
    }
}

/// Классы ошибок, которые видит клиент.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    IllegalPhase,
    NotFound,
    EmptySource,
    StaleTarget,
    AlreadyClaimed,
    InvalidCambioTiming,
    InvalidTarget,
    InvalidConfig,
}

/// Ошибки движка Камбио. Любая из них оставляет матч без изменений.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Команда недопустима сейчас: {0}")]
    IllegalPhase(&'static str),

    #[error("Не найдено: {0}")]
    NotFound(Missing),

    #[error("Нет карт: {0} пуст(а)")]
    EmptySource(Pile),

    #[error("Цель больше недоступна")]
    StaleTarget,

    #[error("Уже занято: {0}")]
    AlreadyClaimed(&'static str),

    #[error("Камбио можно объявить только сразу после своего хода")]
    InvalidCambioTiming,

    #[error("Недопустимая цель: {0}")]
    InvalidTarget(&'static str),

    #[error("Комната заполнена")]
    MatchFull,

    #[error("Недостаточно игроков для старта")]
    NotEnoughPlayers,

    #[error("Игрок {0} уже в комнате")]
    PlayerAlreadyJoined(PlayerId),

    #[error("Не все игроки готовы")]
    PlayersNotReady,

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl EngineError {
    /// Свести ошибку к клиентской таксономии.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::IllegalPhase(_)
            | EngineError::MatchFull
            | EngineError::NotEnoughPlayers
            | EngineError::PlayersNotReady => ErrorKind::IllegalPhase,
            EngineError::NotFound(_) => ErrorKind::NotFound,
            EngineError::EmptySource(_) => ErrorKind::EmptySource,
            EngineError::StaleTarget => ErrorKind::StaleTarget,
            EngineError::AlreadyClaimed(_) | EngineError::PlayerAlreadyJoined(_) => {
                ErrorKind::AlreadyClaimed
            }
            EngineError::InvalidCambioTiming => ErrorKind::InvalidCambioTiming,
            EngineError::InvalidTarget(_) => ErrorKind::InvalidTarget,
            EngineError::Config(_) => ErrorKind::InvalidConfig,
        }
    }
}
