//! Движок Камбио: ходы, силы карт, гонка сброса, подсчёт очков.
//!
//! Высокоуровневый объект: `MatchManager`
//! Основные операции:
//!   - `apply_action` – применить команду к состоянию матча (атомарно)
//!   - `MatchManager::execute` – load → apply → save → broadcast под замком матча
//!   - `scoring::settle` – итог матча по финальным рукам

pub mod actions;
pub mod errors;
pub mod game_loop;
pub mod history;
pub mod match_manager;
pub mod notices;
pub mod piles;
pub mod positions;
pub mod powers;
pub mod race;
pub mod scoring;
pub mod validation;

pub use actions::{DrawSource, MatchAction, PowerDecision, SlotRef, TurnResolution};
pub use errors::{EngineError, ErrorKind};
pub use game_loop::apply_action;
pub use history::{MatchEvent, MatchEventKind, MatchHistory};
pub use match_manager::{ManagerError, MatchManager};
pub use notices::{ActionOutcome, PrivateKind, PrivateNotice};
pub use powers::PendingPower;
pub use race::RaceGift;
pub use scoring::{PlayerScore, Settlement};

/// RNG интерфейс для engine.
/// Реализации лежат в infra (обёртки над `rand`).
pub trait RandomSource {
    /// Равномерно перемешать срез.
    fn shuffle<T>(&mut self, slice: &mut [T]);
}
