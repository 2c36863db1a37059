use serde::{Deserialize, Serialize};

use crate::domain::card::Card;
use crate::domain::deck::{Deck, DiscardPile};
use crate::domain::player::Player;
use crate::domain::settings::MatchConfig;
use crate::domain::{MatchId, PlayerId, SeatIndex};
use crate::engine::actions::DrawSource;
use crate::engine::history::MatchHistory;
use crate::engine::powers::PendingPower;
use crate::engine::race::RaceGift;
use crate::engine::scoring::Settlement;
use crate::infra::rng::DeterministicRng;
use crate::infra::rng_seed::RngSeed;

/// Фаза матча.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Лобби: игроки заходят/выходят, карты не розданы.
    Waiting,
    /// Карты розданы, игроки подсматривают нижние слоты.
    Peeking,
    Playing,
    /// Камбио объявлено, идёт последний круг.
    FinalRound,
    Ended,
}

/// Под-состояние текущего хода.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TurnStage {
    AwaitingDraw,
    /// Карта вытянута и ждёт решения: сброс / обмен / добавить.
    AwaitingResolution { drawn: Card, source: DrawSource },
    /// Идёт протокол силы карты.
    Power(PendingPower),
}

/// Корневой агрегат матча.
///
/// Меняется только через `engine::apply_action`. Всё, что нужно для
/// восстановления матча, лежит здесь, поэтому хранилище сохраняет его целиком.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MatchState {
    pub id: MatchId,
    pub config: MatchConfig,
    pub phase: Phase,

    /// Игроки; индекс вектора = SeatIndex.
    pub players: Vec<Player>,

    /// Чей сейчас ход (seat).
    pub turn: SeatIndex,
    pub stage: TurnStage,

    pub deck: Deck,
    pub discard: DiscardPile,

    pub cambio_caller: Option<PlayerId>,
    /// Seat, чей ход завершился последним.
    pub last_completed_turn: Option<SeatIndex>,
    pub turns_completed: u64,

    /// Ожидающая передача карты после успешной гонки за чужую карту.
    pub race_gift: Option<RaceGift>,

    pub settlement: Option<Settlement>,
    pub history: MatchHistory,

    pub rng_seed: RngSeed,
    pub shuffle_count: u64,
    pub next_power_seq: u64,

    /// Растёт на каждой успешной команде.
    pub version: u64,
}

impl MatchState {
    /// Пустой матч в лобби.
    pub fn new(id: MatchId, config: MatchConfig, rng_seed: RngSeed) -> Self {
        Self {
            id,
            config,
            phase: Phase::Waiting,
            players: Vec::new(),
            turn: 0,
            stage: TurnStage::AwaitingDraw,
            deck: Deck::default(),
            discard: DiscardPile::default(),
            cambio_caller: None,
            last_completed_turn: None,
            turns_completed: 0,
            race_gift: None,
            settlement: None,
            history: MatchHistory::new(),
            rng_seed,
            shuffle_count: 0,
            next_power_seq: 1,
            version: 0,
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn seat_of(&self, player_id: PlayerId) -> Option<SeatIndex> {
        self.players
            .iter()
            .position(|p| p.id == player_id)
            .map(|i| i as SeatIndex)
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == player_id)
    }

    pub fn player_mut(&mut self, player_id: PlayerId) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| p.id == player_id)
    }

    /// Игрок, чей сейчас ход.
    pub fn turn_owner(&self) -> Option<&Player> {
        self.players.get(self.turn as usize)
    }

    /// Идёт ли розыгрыш (ходы, гонки, силы).
    pub fn is_in_play(&self) -> bool {
        matches!(self.phase, Phase::Playing | Phase::FinalRound)
    }

    pub fn cambio_caller_seat(&self) -> Option<SeatIndex> {
        self.cambio_caller.and_then(|id| self.seat_of(id))
    }

    /// Вытянутая, но ещё не разыгранная карта.
    pub fn in_flight_card(&self) -> Option<&Card> {
        match &self.stage {
            TurnStage::AwaitingResolution { drawn, .. } => Some(drawn),
            _ => None,
        }
    }

    /// Сколько карт сейчас в игре: колода + сброс + руки + вытянутая карта.
    /// После раздачи всегда равно размеру полной колоды.
    pub fn card_count(&self) -> usize {
        self.deck.len()
            + self.discard.len()
            + self
                .players
                .iter()
                .map(|p| p.hand.occupied_count())
                .sum::<usize>()
            + usize::from(self.in_flight_card().is_some())
    }

    /// Свежий детерминированный RNG для очередного перемешивания.
    pub(crate) fn next_rng(&mut self) -> DeterministicRng {
        let rng = self.rng_seed.derive(self.id, self.shuffle_count).to_rng();
        self.shuffle_count += 1;
        rng
    }
}
