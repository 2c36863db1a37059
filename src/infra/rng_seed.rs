//! RngSeed — доменный seed для RNG матча.
//!
//! Позволяет:
//!   - хранить базовый seed ([u8;32]) прямо в состоянии матча;
//!   - делать детерминированное hash-reseeding:
//!         new = H(domain || seed || match_id || shuffle_index)
//!   - создавать DeterministicRng из seed.
//!
//! Каждое перемешивание матча получает свой поток случайности,
//! а весь матч воспроизводим по одному seed.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::MatchId;
use crate::infra::rng::DeterministicRng;

/// 32-байтовый seed для RNG.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RngSeed {
    pub bytes: [u8; 32],
}

impl RngSeed {
    /// Создать seed из 32 байт.
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Создать seed из u64 (для удобства тестов).
    pub fn from_u64(x: u64) -> Self {
        let mut b = [0u8; 32];
        b[..8].copy_from_slice(&x.to_le_bytes());
        Self { bytes: b }
    }

    /// Доменное хэш-расширение с контекстом матча и номером перемешивания.
    pub fn derive(&self, match_id: MatchId, shuffle_index: u64) -> Self {
        let mut hasher = Sha256::new();

        hasher.update(b"CAMBIO_ENGINE_RNG_V1");
        hasher.update(self.bytes);
        hasher.update(match_id.to_le_bytes());
        hasher.update(shuffle_index.to_le_bytes());

        let hash = hasher.finalize();

        let mut out = [0u8; 32];
        out.copy_from_slice(&hash[..32]);

        Self { bytes: out }
    }

    /// Создать DeterministicRng из seed.
    pub fn to_rng(&self) -> DeterministicRng {
        DeterministicRng::from_seed_bytes(self.bytes)
    }
}
