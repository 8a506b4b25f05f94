use std::time::{SystemTime, UNIX_EPOCH};

use crate::engine::TimeSource;

/// Боевые часы: миллисекунды от эпохи.
#[derive(Clone, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Часы с ручным управлением — для тестов таймаутов.
#[derive(Clone, Debug, Default)]
pub struct FixedClock {
    now_ms: u64,
}

impl FixedClock {
    pub fn at(now_ms: u64) -> Self {
        Self { now_ms }
    }

    pub fn set(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
    }

    pub fn advance(&mut self, delta_ms: u64) {
        self.now_ms += delta_ms;
    }
}

impl TimeSource for FixedClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }
}
