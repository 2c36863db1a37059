//! Движок правил карточной игры Камбио.
//!
//! Движок владеет перемешиванием, очерёдностью ходов, силами карт,
//! гонкой сброса и подсчётом очков. Комнаты, транспорт и физическое
//! хранение — внешние: движок принимает команды и работает через
//! абстракции хранилища (`infra::MatchStore`) и рассылки (`infra::EventSink`).

pub mod api;
pub mod domain;
pub mod engine;
pub mod infra;
pub mod state;
pub mod time_ctrl;

pub use engine::{apply_action, EngineError, MatchAction, MatchManager};
pub use state::{MatchState, Phase, TurnStage};
