//! Внешний API движка Камбио.
//!
//! Здесь описываются:
//! - команды (commands.rs) — всё, что меняет состояние (создать матч, действие игрока);
//! - запросы (queries.rs) — только чтение;
//! - DTO (dto.rs) — публичное представление матча без скрытых карт;
//! - ошибки (errors.rs) — то, что видит клиент.

pub mod commands;
pub mod dto;
pub mod errors;
pub mod queries;

pub use commands::*;
pub use dto::*;
pub use errors::*;
pub use queries::*;
