use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::{PlayerId, SlotIndex};
use crate::engine::actions::SlotRef;
use crate::engine::history::MatchEvent;

/// Личное уведомление: уходит только одному игроку, никогда не рассылается всем.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PrivateNotice {
    pub player_id: PlayerId,
    pub kind: PrivateKind,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PrivateKind {
    /// Нижние слоты своей руки перед началом игры.
    InitialPeek { cards: Vec<(SlotIndex, Card)> },
    /// Карта, вытянутая из колоды.
    DrawnCard { card: Card },
    /// Результат подсмотра. Хост должен прислать `RevealExpired`
    /// через `reveal_ms`.
    PeekResult {
        power_seq: u64,
        target: SlotRef,
        card: Card,
        reveal_ms: u64,
    },
    /// Карта-кандидат при обмене с просмотром.
    SwapCandidate {
        power_seq: u64,
        target: SlotRef,
        card: Card,
    },
}

/// Результат успешной команды: новые публичные события и личные уведомления.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ActionOutcome {
    pub events: Vec<MatchEvent>,
    pub private: Vec<PrivateNotice>,
}
