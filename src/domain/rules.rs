//! Единая таблица правил: ранг/масть -> очки и сила.
//!
//! Все остальные модули берут значения только отсюда (через `Card::value`
//! и `Card::power`, которые заполняются при сборке колоды).

use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, CardFace, CardId, Power, Rank, Suit};

/// Вариант таблицы очков.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RuleVariant {
    /// A=1, 2..10 по номиналу, J=Q=10, красный K=0, чёрный K=10, джокер=0.
    #[default]
    Standard,
    /// A=1, 2..10 по номиналу, J=11, Q=12, красный K=-1, чёрный K=13, джокер=0.
    FaceValue,
}

/// Таблица правил конкретного матча.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleTable {
    pub variant: RuleVariant,
}

impl RuleTable {
    pub const fn new(variant: RuleVariant) -> Self {
        Self { variant }
    }

    /// Очки карты в руке на момент подсчёта.
    pub fn value(&self, rank: Rank, suit: Suit) -> i32 {
        if let Some(pip) = rank.pip() {
            return pip;
        }
        match (self.variant, rank) {
            (_, Rank::Joker) => 0,
            (RuleVariant::Standard, Rank::Jack | Rank::Queen) => 10,
            (RuleVariant::Standard, Rank::King) if suit.is_red() => 0,
            (RuleVariant::Standard, Rank::King) => 10,
            (RuleVariant::FaceValue, Rank::Jack) => 11,
            (RuleVariant::FaceValue, Rank::Queen) => 12,
            (RuleVariant::FaceValue, Rank::King) if suit.is_red() => -1,
            (RuleVariant::FaceValue, Rank::King) => 13,
            // pip() уже покрыл A..10
            (_, _) => 0,
        }
    }

    /// Сила карты. Одинакова для обоих вариантов очков.
    pub fn power(&self, rank: Rank, suit: Suit) -> Power {
        match rank {
            Rank::Seven | Rank::Eight => Power::PeekOwn,
            Rank::Nine | Rank::Ten => Power::PeekOpponent,
            Rank::Jack | Rank::Queen => Power::BlindSwap,
            Rank::King if suit.is_black() => Power::ViewSwap,
            Rank::Joker => Power::Wild,
            _ => Power::None,
        }
    }

    /// Собрать карту с заданным id по таблице.
    pub fn card(&self, id: CardId, face: CardFace) -> Card {
        Card::new(
            id,
            face.suit,
            face.rank,
            self.value(face.rank, face.suit),
            self.power(face.rank, face.suit),
        )
    }
}
