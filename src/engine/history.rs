use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, Power};
use crate::domain::{PlayerId, SeatIndex, SlotIndex};
use crate::engine::actions::{DrawSource, SlotRef};
use crate::engine::scoring::Settlement;

/// Публичное событие матча. Личные карты сюда не попадают.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MatchEventKind {
    PlayerJoined {
        player_id: PlayerId,
        seat: SeatIndex,
    },
    PlayerLeft {
        player_id: PlayerId,
    },
    ReadyChanged {
        player_id: PlayerId,
        ready: bool,
    },

    /// Колода собрана и перемешана, карты розданы.
    HandsDealt {
        players: u8,
        cards_per_player: u8,
        deck_size: usize,
    },
    PeekConfirmed {
        player_id: PlayerId,
    },
    /// Все подсмотрели — начинается игра.
    PlayStarted {
        first_seat: SeatIndex,
    },

    /// Карта вытянута. Из сброса карта видна всем, из колоды — нет.
    CardDrawn {
        player_id: PlayerId,
        source: DrawSource,
        card: Option<Card>,
    },
    Reshuffled {
        deck_size: usize,
    },
    CardDiscarded {
        player_id: PlayerId,
        card: Card,
    },
    CardSwapped {
        player_id: PlayerId,
        slot: SlotIndex,
        discarded: Card,
    },
    CardAdded {
        player_id: PlayerId,
        slot: SlotIndex,
    },

    PowerActivated {
        player_id: PlayerId,
        power: Power,
        power_seq: u64,
    },
    PowerSkipped {
        player_id: PlayerId,
        power: Power,
    },
    PowerTargetSelected {
        player_id: PlayerId,
        target: SlotRef,
    },
    CardsExchanged {
        first: SlotRef,
        second: SlotRef,
        blind: bool,
    },
    PowerDeclined {
        player_id: PlayerId,
    },
    PowerResolved {
        player_id: PlayerId,
        power: Power,
    },
    PowerAborted {
        player_id: PlayerId,
        power: Power,
    },

    TurnAdvanced {
        from: SeatIndex,
        to: SeatIndex,
    },
    CambioCalled {
        player_id: PlayerId,
        seat: SeatIndex,
    },

    RaceDiscard {
        actor: PlayerId,
        target: SlotRef,
        card: Card,
        matched: bool,
    },
    PenaltyCard {
        player_id: PlayerId,
        slot: SlotIndex,
    },
    RaceGiftPending {
        actor: PlayerId,
        recipient: PlayerId,
    },
    RaceGiftGiven {
        actor: PlayerId,
        from_slot: SlotIndex,
        recipient: PlayerId,
        to_slot: SlotIndex,
    },

    MatchEnded {
        settlement: Settlement,
    },
}

/// Событие матча с порядковым номером.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchEvent {
    pub index: u32,
    pub kind: MatchEventKind,
}

/// История матча (журнал действий).
///
/// Номера событий сквозные: после обрезки старых событий `base` хранит
/// номер самого раннего оставшегося.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchHistory {
    #[serde(default)]
    pub base: u32,
    pub events: Vec<MatchEvent>,
}

impl MatchHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, kind: MatchEventKind) {
        let index = self.next_index();
        self.events.push(MatchEvent { index, kind });
    }

    /// Номер, который получит следующее событие.
    pub fn next_index(&self) -> u32 {
        self.base + self.events.len() as u32
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Пустой журнал, продолжающий нумерацию этого.
    /// В него пишет одна команда, пока не решено, применится ли она.
    pub fn fork(&self) -> Self {
        Self {
            base: self.next_index(),
            events: Vec::new(),
        }
    }

    /// Дописать события команды. `tail` должен быть получен через `fork`.
    pub fn append(&mut self, tail: &MatchHistory) {
        debug_assert_eq!(tail.base, self.next_index());
        self.events.extend_from_slice(&tail.events);
    }

    /// Оставить не больше `limit` последних событий (0 — без ограничения).
    pub fn trim_to(&mut self, limit: usize) {
        if limit == 0 || self.events.len() <= limit {
            return;
        }
        let dropped = self.events.len() - limit;
        self.events.drain(..dropped);
        self.base += dropped as u32;
    }
}
