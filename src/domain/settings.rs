use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::deck::FULL_DECK_SIZE;
use crate::domain::rules::{RuleTable, RuleVariant};

/// Ошибки конфигурации матча.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Некорректный JSON конфигурации: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Некорректное значение `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Конфиг матча: вместимость, размер руки, штрафы, окна времени.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct MatchConfig {
    /// Максимум игроков в комнате.
    pub max_players: u8,
    /// Минимум игроков для старта.
    pub min_players: u8,
    /// Сколько карт раздаётся каждому.
    pub cards_per_player: u8,
    /// Сколько "нижних" слотов игрок подсматривает перед началом.
    pub initial_peek_count: u8,
    /// Разрешены ли силы карт.
    pub allow_card_powers: bool,
    /// Штраф объявившему камбио, если у него не минимальный счёт.
    pub cambio_penalty: i32,
    /// Окно реакции для гонки сброса (подсказка клиентам, движок его не ждёт).
    pub reaction_window_ms: u64,
    /// Сколько длится показ подсмотренной карты.
    pub peek_reveal_ms: u64,
    pub rule_variant: RuleVariant,
    /// Требовать `ready` от всех перед стартом.
    pub require_ready_to_start: bool,
    /// Сколько последних событий хранить в истории матча (0 — все).
    pub history_limit: usize,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            max_players: 8,
            min_players: 2,
            cards_per_player: 4,
            initial_peek_count: 2,
            allow_card_powers: true,
            cambio_penalty: 10,
            reaction_window_ms: 2000,
            peek_reveal_ms: 3000,
            rule_variant: RuleVariant::Standard,
            require_ready_to_start: false,
            history_limit: 1000,
        }
    }
}

impl MatchConfig {
    /// Разобрать JSON и сразу проверить.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let cfg: MatchConfig = serde_json::from_str(raw)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn rules(&self) -> RuleTable {
        RuleTable::new(self.rule_variant)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_players < 2 {
            return Err(invalid("min_players", "нужно минимум 2 игрока"));
        }
        if self.max_players < self.min_players {
            return Err(invalid("max_players", "меньше чем min_players"));
        }
        if self.cards_per_player == 0 {
            return Err(invalid("cards_per_player", "рука не может быть пустой"));
        }
        if self.initial_peek_count > self.cards_per_player {
            return Err(invalid(
                "initial_peek_count",
                format!("больше размера руки ({})", self.cards_per_player),
            ));
        }
        // После раздачи в колоде должна остаться хотя бы одна карта.
        let dealt = self.max_players as usize * self.cards_per_player as usize;
        if dealt >= FULL_DECK_SIZE {
            return Err(invalid(
                "cards_per_player",
                format!("{dealt} карт на раздачу, в колоде {FULL_DECK_SIZE}"),
            ));
        }
        if self.cambio_penalty < 0 {
            return Err(invalid("cambio_penalty", "штраф не может быть отрицательным"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
