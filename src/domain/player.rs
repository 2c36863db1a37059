use serde::{Deserialize, Serialize};

use crate::domain::hand::Hand;
use crate::domain::{PlayerId, SeatIndex};

/// Игрок в матче.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    /// Отображаемое имя (для фронта).
    pub name: String,
    /// Место за столом = порядок ходов.
    pub seat: SeatIndex,
    pub hand: Hand,
    /// Итоговые очки (заполняются при расчёте).
    pub score: i32,
    /// Готовность в лобби.
    pub ready: bool,
    /// Подтвердил ли игрок начальный подсмотр.
    pub peeked: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, seat: SeatIndex) -> Self {
        Self {
            id,
            name: name.into(),
            seat,
            hand: Hand::default(),
            score: 0,
            ready: false,
            peeked: false,
        }
    }
}
