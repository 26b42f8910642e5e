//! Game Clock
//!
//! Time capability injected into combat and replication. Cast cooldowns,
//! respawn delays, heartbeats, and disconnect thresholds are all comparisons
//! against this clock's epoch-millisecond readings, never scheduled tasks,
//! so a faked clock drives the full timeout surface in tests.

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of epoch milliseconds for timestamp comparisons.
///
/// Readings must be non-decreasing within a session. Across peers the
/// values are compared against each other (liveness timestamps), so
/// production clocks should be wall time.
pub trait GameClock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// Wall-clock time via the system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl GameClock for SystemClock {
    fn now_ms(&self) -> u64 {
        // Pre-epoch system time would be a misconfigured host; treat as 0.
        chrono::Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Manually stepped clock for tests and deterministic demos.
///
/// Shared freely (`Arc<ManualClock>`): advancing through one handle is
/// observed by every reader.
#[derive(Debug, Default)]
pub struct ManualClock {
    now_ms: AtomicU64,
}

impl ManualClock {
    /// Create a clock starting at the given millisecond timestamp.
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: AtomicU64::new(start_ms),
        }
    }

    /// Advance the clock by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::SeqCst);
    }

    /// Jump the clock to an absolute timestamp.
    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::SeqCst);
    }
}

impl GameClock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::SeqCst)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_manual_clock_advances() {
        let clock = ManualClock::new(1_000);
        assert_eq!(clock.now_ms(), 1_000);

        clock.advance(16);
        assert_eq!(clock.now_ms(), 1_016);

        clock.set(5_000);
        assert_eq!(clock.now_ms(), 5_000);
    }

    #[test]
    fn test_manual_clock_shared_handle() {
        let clock = Arc::new(ManualClock::new(0));
        let reader: Arc<dyn GameClock> = clock.clone();

        clock.advance(250);
        assert_eq!(reader.now_ms(), 250);
    }

    #[test]
    fn test_system_clock_is_sane() {
        // 2020-01-01 in epoch millis; any current host is past this.
        let clock = SystemClock;
        assert!(clock.now_ms() > 1_577_836_800_000);
    }
}
