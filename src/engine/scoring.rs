//! Подсчёт очков в конце матча. Чистые функции: результат зависит
//! только от рук, объявившего камбио и размера штрафа.

use serde::{Deserialize, Serialize};

use crate::domain::hand::Hand;
use crate::domain::player::Player;
use crate::domain::{PlayerId, SeatIndex};

/// Итог одного игрока.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlayerScore {
    pub player_id: PlayerId,
    pub seat: SeatIndex,
    /// Сумма карт в руке.
    pub hand_total: i32,
    /// Штраф за камбио (0, если не применялся).
    pub penalty: i32,
    pub final_score: i32,
}

/// Результат матча.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settlement {
    pub scores: Vec<PlayerScore>,
    /// Все игроки с минимальным итоговым счётом.
    pub winners: Vec<PlayerId>,
    pub cambio_caller: Option<PlayerId>,
    pub caller_penalized: bool,
}

impl Settlement {
    pub fn score_of(&self, player_id: PlayerId) -> Option<&PlayerScore> {
        self.scores.iter().find(|s| s.player_id == player_id)
    }
}

/// Сумма очков руки. Надгробия дают 0.
pub fn hand_total(hand: &Hand) -> i32 {
    hand.cards().map(|c| c.value).sum()
}

/// Посчитать итог матча.
///
/// Объявивший камбио получает `penalty`, если его сумма больше суммы
/// хотя бы одного другого игрока. Ничьи не разбиваются.
pub fn settle(players: &[Player], cambio_caller: Option<PlayerId>, penalty: i32) -> Settlement {
    let mut scores: Vec<PlayerScore> = players
        .iter()
        .map(|p| {
            let total = hand_total(&p.hand);
            PlayerScore {
                player_id: p.id,
                seat: p.seat,
                hand_total: total,
                penalty: 0,
                final_score: total,
            }
        })
        .collect();

    let mut caller_penalized = false;
    if let Some(caller_id) = cambio_caller {
        let caller_total = scores
            .iter()
            .find(|s| s.player_id == caller_id)
            .map(|s| s.hand_total);

        if let Some(caller_total) = caller_total {
            let exempt = scores
                .iter()
                .filter(|s| s.player_id != caller_id)
                .all(|s| caller_total <= s.hand_total);

            if !exempt {
                if let Some(s) = scores.iter_mut().find(|s| s.player_id == caller_id) {
                    s.penalty = penalty;
                    s.final_score += penalty;
                    caller_penalized = true;
                }
            }
        }
    }

    let winners = match scores.iter().map(|s| s.final_score).min() {
        Some(best) => scores
            .iter()
            .filter(|s| s.final_score == best)
            .map(|s| s.player_id)
            .collect(),
        None => Vec::new(),
    };

    Settlement {
        scores,
        winners,
        cambio_caller,
        caller_penalized,
    }
}
