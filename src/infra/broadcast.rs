//! Рассылка изменений матча наружу.
//!
//! Движок ничего не знает о транспорте: менеджер матчей отдаёт сюда
//! публичное уведомление для всех мест и личные уведомления по одному.

use parking_lot::Mutex;
use tracing::debug;

use crate::api::dto::StateChanged;
use crate::engine::history::MatchEvent;
use crate::engine::notices::PrivateNotice;
use crate::state::MatchState;

/// Получатель уведомлений (websocket-хаб, очередь, тестовый рекордер).
pub trait EventSink: Send + Sync {
    /// Публичное изменение состояния: рассылается всем местам матча.
    /// `events` — события, которые привели к этому состоянию.
    fn state_changed(&self, state: &MatchState, events: &[MatchEvent]);

    /// Личное уведомление: только `notice.player_id`.
    fn private(&self, notice: &PrivateNotice);
}

/// Ничего не рассылает, только пишет в лог.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn state_changed(&self, state: &MatchState, events: &[MatchEvent]) {
        debug!(
            match_id = state.id,
            version = state.version,
            events = events.len(),
            "state changed"
        );
    }

    fn private(&self, notice: &PrivateNotice) {
        debug!(player_id = notice.player_id, "private notice");
    }
}

/// Запоминает всё отправленное в публичном виде (для тестов и dev CLI).
#[derive(Debug, Default)]
pub struct RecordingSink {
    updates: Mutex<Vec<StateChanged>>,
    notices: Mutex<Vec<PrivateNotice>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn updates(&self) -> Vec<StateChanged> {
        self.updates.lock().clone()
    }

    pub fn notices(&self) -> Vec<PrivateNotice> {
        self.notices.lock().clone()
    }

    /// Личные уведомления конкретного игрока.
    pub fn notices_for(&self, player_id: u64) -> Vec<PrivateNotice> {
        self.notices
            .lock()
            .iter()
            .filter(|n| n.player_id == player_id)
            .cloned()
            .collect()
    }

    pub fn clear(&self) {
        self.updates.lock().clear();
        self.notices.lock().clear();
    }
}

impl EventSink for RecordingSink {
    fn state_changed(&self, state: &MatchState, events: &[MatchEvent]) {
        self.updates
            .lock()
            .push(StateChanged::from_state(state, events.to_vec()));
    }

    fn private(&self, notice: &PrivateNotice) {
        self.notices.lock().push(notice.clone());
    }
}
