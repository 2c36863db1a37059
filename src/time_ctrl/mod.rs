// src/time_ctrl/mod.rs
//! Контроль времени вокруг движка.
//!
//! Движок не ждёт таймеров: таймаут показа подсмотренной карты приходит
//! обычной командой `RevealExpired`. Этот модуль помогает хосту понять,
//! когда её отправить.

pub mod clock;

pub use clock::{RevealClock, RevealTimer};

use crate::api::commands::MatchCommand;
use crate::domain::MatchId;
use crate::engine::actions::MatchAction;
use crate::engine::history::MatchEventKind;
use crate::engine::notices::{ActionOutcome, PrivateKind};

/// Высокоуровневый контроллер времени для набора матчей.
#[derive(Clone, Debug, Default)]
pub struct TimeController {
    pub clock: RevealClock,
}

impl TimeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Учесть результат успешной команды: взвести таймер на показ карты
    /// или снять таймеры, если сила уже закрыта.
    pub fn observe(&mut self, match_id: MatchId, outcome: &ActionOutcome) {
        let power_closed = outcome.events.iter().any(|e| {
            matches!(
                e.kind,
                MatchEventKind::PowerResolved { .. }
                    | MatchEventKind::PowerAborted { .. }
                    | MatchEventKind::PowerDeclined { .. }
                    | MatchEventKind::PowerSkipped { .. }
                    | MatchEventKind::MatchEnded { .. }
            )
        });
        if power_closed {
            self.clock.disarm_match(match_id);
        }

        for notice in &outcome.private {
            if let PrivateKind::PeekResult {
                power_seq,
                reveal_ms,
                ..
            } = notice.kind
            {
                self.clock.arm(match_id, power_seq, reveal_ms);
            }
        }
    }

    /// "Протекание" времени. Возвращает команды, которые хост должен
    /// отправить в соответствующие матчи.
    pub fn on_time_passed(&mut self, delta_ms: u64) -> Vec<MatchCommand> {
        self.clock
            .elapse(delta_ms)
            .into_iter()
            .map(|t| MatchCommand {
                match_id: t.match_id,
                action: MatchAction::RevealExpired {
                    power_seq: t.power_seq,
                },
            })
            .collect()
    }
}
