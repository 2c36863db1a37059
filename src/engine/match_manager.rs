// src/engine/match_manager.rs

use std::sync::Arc;

use dashmap::DashMap;
use parking_lot::Mutex;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::domain::settings::MatchConfig;
use crate::domain::MatchId;
use crate::engine::{self, ActionOutcome, EngineError, ErrorKind, MatchAction};
use crate::infra::broadcast::EventSink;
use crate::infra::persistence::{MatchStore, StoreError};
use crate::infra::rng_seed::RngSeed;
use crate::state::{MatchState, Phase};

/// Ошибки уровня менеджера матчей (над движком одного матча).
#[derive(Debug, Error)]
pub enum ManagerError {
    /// Проброшенная ошибка из движка; матч не изменился.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Ошибка хранилища. Состояние могло не сохраниться, рассылки не было.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ManagerError {
    /// Клиентский класс ошибки (для ошибок хранилища его нет).
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            ManagerError::Engine(e) => Some(e.kind()),
            ManagerError::Store(StoreError::NotFound(_)) => Some(ErrorKind::NotFound),
            ManagerError::Store(_) => None,
        }
    }
}

/// Менеджер матчей:
/// - у каждого матча своя эксклюзивная секция (mutex);
/// - внутри секции: load → apply_action → save → рассылка;
/// - разные матчи обрабатываются полностью параллельно.
///
/// Секция заводится только для существующего матча и убирается, когда
/// матч завершён: завершённый матч больше не меняется.
pub struct MatchManager<S: MatchStore, B: EventSink> {
    store: S,
    sink: B,
    sections: DashMap<MatchId, Arc<Mutex<()>>>,
}

impl<S: MatchStore, B: EventSink> MatchManager<S, B> {
    pub fn new(store: S, sink: B) -> Self {
        Self {
            store,
            sink,
            sections: DashMap::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn sink(&self) -> &B {
        &self.sink
    }

    /// Сколько матчей сейчас держат секцию.
    pub fn open_sections(&self) -> usize {
        self.sections.len()
    }

    /// Замок матча.
    ///
    /// Неизвестный ID даёт NotFound и ничего не заводит. Для завершённого
    /// матча замок не нужен (`None`).
    fn section(&self, match_id: MatchId) -> Result<Option<Arc<Mutex<()>>>, ManagerError> {
        if let Some(section) = self.sections.get(&match_id) {
            return Ok(Some(Arc::clone(section.value())));
        }

        let state = self.store.load(match_id)?;
        if state.phase == Phase::Ended {
            return Ok(None);
        }

        Ok(Some(
            self.sections
                .entry(match_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone(),
        ))
    }

    fn release(&self, match_id: MatchId) {
        if self.sections.remove(&match_id).is_some() {
            debug!(match_id, "match section released");
        }
    }

    /// Создать матч в лобби.
    pub fn create_match(
        &self,
        match_id: MatchId,
        config: MatchConfig,
        seed: RngSeed,
    ) -> Result<MatchState, ManagerError> {
        config.validate().map_err(EngineError::from)?;

        let section = self
            .sections
            .entry(match_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = section.lock();

        let state = MatchState::new(match_id, config, seed);
        if let Err(e) = self.store.insert_new(&state) {
            error!(match_id, error = %e, "failed to persist new match");
            if !matches!(e, StoreError::AlreadyExists(_)) {
                self.release(match_id);
            }
            return Err(e.into());
        }

        info!(match_id, "match created");
        self.sink.state_changed(&state, &[]);
        Ok(state)
    }

    /// Выполнить команду над матчем атомарно.
    ///
    /// Ошибка движка оставляет сохранённое состояние нетронутым.
    /// Ошибка сохранения возвращается как есть, и рассылки не происходит.
    pub fn execute(
        &self,
        match_id: MatchId,
        action: MatchAction,
    ) -> Result<ActionOutcome, ManagerError> {
        self.execute_committed(match_id, action)
            .map(|(outcome, _)| outcome)
    }

    /// То же, что `execute`, плюс состояние, которое эта команда сохранила.
    ///
    /// Состояние берётся внутри секции, поэтому ответ клиенту не может
    /// смешать эту команду с чужой, выполненной следом.
    pub fn execute_committed(
        &self,
        match_id: MatchId,
        action: MatchAction,
    ) -> Result<(ActionOutcome, MatchState), ManagerError> {
        let section = self.section(match_id)?;
        let _guard = section.as_ref().map(|s| s.lock());

        let mut state = self.store.load(match_id)?;
        let name = action.name();

        let outcome = match engine::apply_action(&mut state, action) {
            Ok(outcome) => outcome,
            Err(e) => {
                debug!(match_id, action = name, error = %e, "command rejected");
                if state.phase == Phase::Ended {
                    self.release(match_id);
                }
                return Err(e.into());
            }
        };

        if let Err(e) = self.store.save(&state) {
            error!(match_id, action = name, error = %e, "failed to persist match state");
            return Err(e.into());
        }

        debug!(match_id, action = name, version = state.version, "command applied");

        // Рассылка внутри секции: порядок уведомлений = порядок команд.
        self.sink.state_changed(&state, &outcome.events);
        for notice in &outcome.private {
            self.sink.private(notice);
        }

        if state.phase == Phase::Ended {
            info!(match_id, "match ended");
            self.release(match_id);
        }

        Ok((outcome, state))
    }

    /// Текущее состояние матча (согласованное с последней командой).
    pub fn snapshot(&self, match_id: MatchId) -> Result<MatchState, ManagerError> {
        let section = self.section(match_id)?;
        let _guard = section.as_ref().map(|s| s.lock());
        Ok(self.store.load(match_id)?)
    }
}
