//! Доменная модель Камбио: карты, таблица правил, колода, руки, игроки, конфиг.

pub mod card;
pub mod deck;
pub mod hand;
pub mod player;
pub mod rules;
pub mod settings;

// Базовые идентификаторы. Генерирует их внешний код (комнаты/лобби).
pub type PlayerId = u64;
pub type MatchId = u64;
/// Индекс места за столом (= порядок ходов).
pub type SeatIndex = u8;
/// Индекс слота в руке.
pub type SlotIndex = u8;

pub use card::*;
pub use deck::*;
pub use hand::*;
pub use player::*;
pub use rules::*;
pub use settings::*;
