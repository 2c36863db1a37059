//! Инфраструктурный слой вокруг движка Камбио:
//! - RNG-реализации и seed'ы матчей;
//! - абстракция хранения (тесты / внешние сервисы);
//! - рассылка уведомлений.

pub mod broadcast;
pub mod persistence;
pub mod rng;
pub mod rng_seed;

pub use broadcast::{EventSink, RecordingSink, TracingSink};
pub use persistence::{InMemoryMatchStore, MatchStore, StoreError};
pub use rng::*;
pub use rng_seed::RngSeed;
