//! # Circuit Breaker Module
//!
//! Fail-fast guard wrapped around each remote collaborator. After repeated
//! failures the breaker opens and requests are rejected locally until the
//! reset timeout elapses.

use parking_lot::Mutex;
use std::time::{Duration, Instant};

use crate::service_config::RecoveryConfig;

/// Circuit breaker for collaborator requests
///
/// ```text
/// CLOSED ────failures ≥ threshold────► OPEN
///    ▲                                      │
///    │                                      │
///    └─────────reset timeout───────────────┘
/// ```
///
/// - **CLOSED → OPEN**: When failure count reaches `circuit_breaker_threshold`
/// - **OPEN → CLOSED**: After `circuit_breaker_reset_secs` elapses; the next
///   request is let through as a probe
/// - Any success resets the failure count
#[derive(Debug)]
pub struct CircuitBreaker {
    state: Mutex<BreakerState>,
    config: RecoveryConfig,
}

#[derive(Debug, Default)]
struct BreakerState {
    failure_count: u32,
    last_failure_time: Option<Instant>,
}

impl CircuitBreaker {
    /// Create a new circuit breaker with the given configuration
    ///
    /// ```rust
    /// use nutricheck::service_config::RecoveryConfig;
    /// use nutricheck::circuit_breaker::CircuitBreaker;
    ///
    /// let circuit_breaker = CircuitBreaker::new(RecoveryConfig::default());
    /// assert!(!circuit_breaker.is_open());
    /// ```
    pub fn new(config: RecoveryConfig) -> Self {
        Self {
            state: Mutex::new(BreakerState::default()),
            config,
        }
    }

    /// Check if circuit breaker is open (blocking requests)
    ///
    /// Returns `true` when the failure count has reached the threshold and the
    /// reset timeout has not yet elapsed. Once it has, the counters are cleared
    /// and the breaker closes again.
    pub fn is_open(&self) -> bool {
        let mut state = self.state.lock();

        if state.failure_count >= self.config.circuit_breaker_threshold {
            if let Some(last_time) = state.last_failure_time {
                if last_time.elapsed() < Duration::from_secs(self.config.circuit_breaker_reset_secs) {
                    return true;
                }
                *state = BreakerState::default();
            }
        }
        false
    }

    /// Record a failure to increment the failure counter
    pub fn record_failure(&self) {
        let mut state = self.state.lock();
        state.failure_count += 1;
        state.last_failure_time = Some(Instant::now());
    }

    /// Record a success to reset the failure counter
    pub fn record_success(&self) {
        *self.state.lock() = BreakerState::default();
    }

    pub fn failure_count(&self) -> u32 {
        self.state.lock().failure_count
    }
}
