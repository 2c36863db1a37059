use serde::{Deserialize, Serialize};

use crate::domain::{CardId, PlayerId, SlotIndex};

/// Откуда тянуть карту.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DrawSource {
    Deck,
    Discard,
}

/// Ссылка на конкретный слот конкретного игрока.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SlotRef {
    pub player: PlayerId,
    pub slot: SlotIndex,
}

impl SlotRef {
    pub const fn new(player: PlayerId, slot: SlotIndex) -> Self {
        Self { player, slot }
    }
}

/// Что игрок делает с вытянутой картой.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnResolution {
    /// Сразу сбросить вытянутую карту.
    Discard,
    /// Положить вытянутую карту в слот, вытесненную — в сброс.
    Swap { slot: SlotIndex },
    /// Добавить в руку без сброса (сила не активируется).
    Add,
}

/// Решение по силе: подтвердить обмен / отказаться.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PowerDecision {
    Confirm,
    Decline,
}

/// Команда над конкретным матчем.
///
/// Все команды применяются строго последовательно в рамках одного матча.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchAction {
    Join {
        player_id: PlayerId,
        name: String,
    },
    Leave {
        player_id: PlayerId,
    },
    SetReady {
        player_id: PlayerId,
        ready: bool,
    },
    Start,
    ConfirmPeeked {
        player_id: PlayerId,
    },
    Draw {
        player_id: PlayerId,
        source: DrawSource,
    },
    ResolveTurn {
        player_id: PlayerId,
        resolution: TurnResolution,
        use_power: bool,
    },
    PowerSelect {
        player_id: PlayerId,
        target: SlotRef,
    },
    PowerConfirm {
        player_id: PlayerId,
        decision: PowerDecision,
    },
    /// Таймаут показа подсмотренной карты. Приходит от хоста тем же потоком команд.
    RevealExpired {
        power_seq: u64,
    },
    CallCambio {
        player_id: PlayerId,
    },
    RaceDiscard {
        player_id: PlayerId,
        target: SlotRef,
        /// Верх сброса, на который игрок реагирует.
        expected_top: CardId,
    },
    RaceGift {
        player_id: PlayerId,
        slot: SlotIndex,
    },
    /// Принудительное завершение матча хостом.
    ForceEnd,
}

impl MatchAction {
    /// Короткое имя для логов.
    pub fn name(&self) -> &'static str {
        match self {
            MatchAction::Join { .. } => "join",
            MatchAction::Leave { .. } => "leave",
            MatchAction::SetReady { .. } => "set_ready",
            MatchAction::Start => "start",
            MatchAction::ConfirmPeeked { .. } => "confirm_peeked",
            MatchAction::Draw { .. } => "draw",
            MatchAction::ResolveTurn { .. } => "resolve_turn",
            MatchAction::PowerSelect { .. } => "power_select",
            MatchAction::PowerConfirm { .. } => "power_confirm",
            MatchAction::RevealExpired { .. } => "reveal_expired",
            MatchAction::CallCambio { .. } => "call_cambio",
            MatchAction::RaceDiscard { .. } => "race_discard",
            MatchAction::RaceGift { .. } => "race_gift",
            MatchAction::ForceEnd => "force_end",
        }
    }
}
