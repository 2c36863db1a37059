use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Масть карты. Джокеры идут отдельной "мастью".
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Suit {
    Hearts,   // ♥
    Diamonds, // ♦
    Clubs,    // ♣
    Spades,   // ♠
    Joker,
}

impl Suit {
    /// Четыре обычные масти в порядке сборки колоды.
    pub const STANDARD: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    pub fn is_red(self) -> bool {
        matches!(self, Suit::Hearts | Suit::Diamonds)
    }

    pub fn is_black(self) -> bool {
        matches!(self, Suit::Clubs | Suit::Spades)
    }
}

/// Ранг карты.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Ord, PartialOrd)]
#[serde(rename_all = "snake_case")]
pub enum Rank {
    Ace = 1,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Joker,
}

impl Rank {
    /// Ранги обычной масти (A..K).
    pub const STANDARD: [Rank; 13] = [
        Rank::Ace,
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
    ];

    /// Номинал для числовых карт (A=1 .. 10=10).
    pub fn pip(self) -> Option<i32> {
        match self {
            Rank::Jack | Rank::Queen | Rank::King | Rank::Joker => None,
            r => Some(r as i32),
        }
    }
}

/// Сила карты: что карта даёт при сбросе.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Power {
    None,
    PeekOwn,
    PeekOpponent,
    BlindSwap,
    ViewSwap,
    /// Джокер. Помечен, но никогда не активируется.
    Wild,
}

impl Power {
    /// Можно ли запустить протокол силы для этой карты.
    pub fn is_activatable(self) -> bool {
        !matches!(self, Power::None | Power::Wild)
    }
}

/// Идентификатор карты внутри одной колоды (0..54).
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Ord, PartialOrd)]
pub struct CardId(pub u8);

/// Карта. Значение и сила фиксируются таблицей правил при сборке колоды.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Card {
    pub id: CardId,
    pub suit: Suit,
    pub rank: Rank,
    pub value: i32,
    pub power: Power,
}

impl Card {
    pub const fn new(id: CardId, suit: Suit, rank: Rank, value: i32, power: Power) -> Self {
        Self {
            id,
            suit,
            rank,
            value,
            power,
        }
    }

    /// Совпадение по рангу (для гонки сброса).
    pub fn same_rank(&self, other: &Card) -> bool {
        self.rank == other.rank
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ch = match self {
            Suit::Hearts => 'h',
            Suit::Diamonds => 'd',
            Suit::Clubs => 'c',
            Suit::Spades => 's',
            Suit::Joker => '*',
        };
        write!(f, "{ch}")
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rank::Ace => write!(f, "A"),
            Rank::Ten => write!(f, "T"),
            Rank::Jack => write!(f, "J"),
            Rank::Queen => write!(f, "Q"),
            Rank::King => write!(f, "K"),
            Rank::Joker => write!(f, "X"),
            r => write!(f, "{}", *r as u8),
        }
    }
}

impl fmt::Display for Card {
    /// Формат вида `Ah`, `Td`, `Kc`, `X*` (джокер).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// Лицо карты без привязки к колоде: ранг + масть.
///
/// Нужен для разбора строк вида "Ah" в тестах и CLI. Полная `Card`
/// получается через таблицу правил.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CardFace {
    pub rank: Rank,
    pub suit: Suit,
}

/// Парсинг строки вида "Ah", "Td", "7c", "X*".
impl FromStr for CardFace {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (Some(r_ch), Some(s_ch), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err("Card string must have length 2".into());
        };

        let rank = match r_ch {
            'A' | 'a' => Rank::Ace,
            '2' => Rank::Two,
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' | 't' => Rank::Ten,
            'J' | 'j' => Rank::Jack,
            'Q' | 'q' => Rank::Queen,
            'K' | 'k' => Rank::King,
            'X' | 'x' => Rank::Joker,
            _ => return Err(format!("Invalid rank: {r_ch}")),
        };

        let suit = match s_ch {
            'h' | 'H' => Suit::Hearts,
            'd' | 'D' => Suit::Diamonds,
            'c' | 'C' => Suit::Clubs,
            's' | 'S' => Suit::Spades,
            '*' => Suit::Joker,
            _ => return Err(format!("Invalid suit: {s_ch}")),
        };

        if (rank == Rank::Joker) != (suit == Suit::Joker) {
            return Err(format!("Joker rank and suit must go together: {s}"));
        }

        Ok(CardFace { rank, suit })
    }
}
