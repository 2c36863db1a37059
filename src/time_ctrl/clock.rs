// src/time_ctrl/clock.rs
//! Таймер показа подсмотренной карты.

use serde::{Deserialize, Serialize};

use crate::domain::MatchId;

/// Один взведённый таймер: показ карты в матче `match_id`
/// для активации силы `power_seq`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RevealTimer {
    pub match_id: MatchId,
    pub power_seq: u64,
    /// Сколько миллисекунд показа ещё осталось.
    pub remaining_ms: u64,
}

/// Набор активных таймеров показа.
///
/// Сам ничего не меняет в матче: истёкшие таймеры возвращаются наружу
/// и превращаются в команды `RevealExpired` того же потока команд.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct RevealClock {
    pub timers: Vec<RevealTimer>,
}

impl RevealClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Взвести таймер. Повторный вызов для той же активации перезапускает его.
    pub fn arm(&mut self, match_id: MatchId, power_seq: u64, reveal_ms: u64) {
        self.timers
            .retain(|t| !(t.match_id == match_id && t.power_seq == power_seq));
        self.timers.push(RevealTimer {
            match_id,
            power_seq,
            remaining_ms: reveal_ms,
        });
    }

    /// Снять все таймеры матча (сила закрылась раньше таймаута).
    pub fn disarm_match(&mut self, match_id: MatchId) {
        self.timers.retain(|t| t.match_id != match_id);
    }

    pub fn is_armed(&self, match_id: MatchId, power_seq: u64) -> bool {
        self.timers
            .iter()
            .any(|t| t.match_id == match_id && t.power_seq == power_seq)
    }

    /// Протекание `delta_ms`. Возвращает истёкшие таймеры (и удаляет их).
    pub fn elapse(&mut self, delta_ms: u64) -> Vec<RevealTimer> {
        let mut expired = Vec::new();
        self.timers.retain_mut(|t| {
            if t.remaining_ms <= delta_ms {
                expired.push(RevealTimer {
                    remaining_ms: 0,
                    ..t.clone()
                });
                false
            } else {
                t.remaining_ms -= delta_ms;
                true
            }
        });
        expired
    }
}
