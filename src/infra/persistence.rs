use std::collections::HashMap;

use parking_lot::RwLock;
use thiserror::Error;

use crate::domain::MatchId;
use crate::state::MatchState;

/// Ошибки хранилища. Никогда не глотаются: менеджер матчей
/// отдаёт их вызывающему коду.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Матч {0} не найден в хранилище")]
    NotFound(MatchId),

    #[error("Матч {0} уже существует")]
    AlreadyExists(MatchId),

    #[error("Ошибка сериализации: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Ошибка хранилища: {0}")]
    Backend(String),
}

/// Абстракция хранилища матчей.
///
/// Менеджер вызывает `load` и `save` внутри замка матча, поэтому
/// реализации не обязаны сами сериализовать доступ к одному матчу.
pub trait MatchStore: Send + Sync {
    fn load(&self, id: MatchId) -> Result<MatchState, StoreError>;

    fn save(&self, state: &MatchState) -> Result<(), StoreError>;

    /// Сохранить новый матч; существующий не перезаписывается.
    fn insert_new(&self, state: &MatchState) -> Result<(), StoreError>;
}

/// Простая in-memory реализация для тестов и локального запуска.
///
/// Состояние хранится как JSON, чтобы каждый `load` возвращал независимую
/// копию и сериализация проверялась на каждом шаге.
#[derive(Debug, Default)]
pub struct InMemoryMatchStore {
    matches: RwLock<HashMap<MatchId, String>>,
}

impl InMemoryMatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.matches.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.read().is_empty()
    }
}

impl MatchStore for InMemoryMatchStore {
    fn load(&self, id: MatchId) -> Result<MatchState, StoreError> {
        let guard = self.matches.read();
        let raw = guard.get(&id).ok_or(StoreError::NotFound(id))?;
        Ok(serde_json::from_str(raw)?)
    }

    fn save(&self, state: &MatchState) -> Result<(), StoreError> {
        let raw = serde_json::to_string(state)?;
        self.matches.write().insert(state.id, raw);
        Ok(())
    }

    fn insert_new(&self, state: &MatchState) -> Result<(), StoreError> {
        let raw = serde_json::to_string(state)?;
        let mut guard = self.matches.write();
        if guard.contains_key(&state.id) {
            return Err(StoreError::AlreadyExists(state.id));
        }
        guard.insert(state.id, raw);
        Ok(())
    }
}
