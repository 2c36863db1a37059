use serde::{Deserialize, Serialize};

use crate::domain::card::{Card, CardFace, CardId, Rank, Suit};
use crate::domain::rules::RuleTable;

/// Полный размер колоды: 52 карты + 2 джокера.
pub const FULL_DECK_SIZE: usize = 54;

/// Колода. Верх колоды — конец вектора.
/// Перемешивание делает engine (через RNG из infra), НЕ здесь.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deck {
    pub cards: Vec<Card>,
}

impl Deck {
    /// Полная колода в порядке:
    /// Hearts A..K, Diamonds A..K, Clubs A..K, Spades A..K, два джокера.
    /// Очки и силы берутся из таблицы правил.
    pub fn full(rules: &RuleTable) -> Self {
        let mut cards = Vec::with_capacity(FULL_DECK_SIZE);
        let mut next_id = 0u8;
        let mut push = |face: CardFace| {
            cards.push(rules.card(CardId(next_id), face));
            next_id += 1;
        };

        for suit in Suit::STANDARD {
            for rank in Rank::STANDARD {
                push(CardFace { rank, suit });
            }
        }
        for _ in 0..2 {
            push(CardFace {
                rank: Rank::Joker,
                suit: Suit::Joker,
            });
        }

        Deck { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Взять одну карту сверху колоды.
    pub fn draw_one(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Верхняя карта (без снятия).
    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }
}

/// Стопка сброса. Верх — последняя сброшенная карта.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DiscardPile {
    pub cards: Vec<Card>,
}

impl DiscardPile {
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn top(&self) -> Option<&Card> {
        self.cards.last()
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn take_top(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Забрать всё, кроме верхней карты. Верхняя остаётся единственной в стопке.
    pub fn take_all_but_top(&mut self) -> Vec<Card> {
        match self.cards.pop() {
            Some(top) => {
                let rest = std::mem::take(&mut self.cards);
                self.cards.push(top);
                rest
            }
            None => Vec::new(),
        }
    }
}
