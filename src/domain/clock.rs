// src/domain/clock.rs
use chrono::{DateTime, SubsecRound, Utc};

/// Where "now" comes from. Injected so tests can pin and move time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// "Now" at microsecond precision, which is what the SQLite store keeps.
pub fn now_micros(clock: &dyn Clock) -> DateTime<Utc> {
    clock.now().trunc_subsecs(6)
}
