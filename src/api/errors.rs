use serde::{Deserialize, Serialize};

use crate::engine::{EngineError, ErrorKind, ManagerError};

/// Ошибки внешнего API (то, что отдаём клиенту, вызвавшему команду).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiError {
    /// Класс ошибки. `None` — внутренняя ошибка сервера (хранилище).
    pub kind: Option<ErrorKind>,
    pub message: String,
}

impl ApiError {
    pub fn is_internal(&self) -> bool {
        self.kind.is_none()
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError {
            kind: Some(err.kind()),
            message: err.to_string(),
        }
    }
}

impl From<ManagerError> for ApiError {
    fn from(err: ManagerError) -> Self {
        ApiError {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}
