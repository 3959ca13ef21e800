// src/image/circuit_breaker.rs
// Circuit breaker for image providers: skips providers that keep failing

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// How many failures within the tracking window before we trip the circuit.
const FAILURE_THRESHOLD: u32 = 3;

/// Window in which failures are counted. Failures older than this are ignored.
const FAILURE_WINDOW: Duration = Duration::from_secs(5 * 60);

/// How long a tripped circuit stays open before allowing a single trial request.
const COOLDOWN: Duration = Duration::from_secs(2 * 60);

/// Circuit state for a single provider.
#[derive(Debug, Clone)]
enum State {
    /// Normal operation, tracking recent failures.
    Closed { failures: Vec<Instant> },
    /// Tripped. All requests are rejected until cooldown expires.
    Open { tripped_at: Instant },
    /// Cooldown expired, allow exactly one trial request. A trial that never reports
    /// back (its request was dropped) goes stale after another cooldown.
    HalfOpen { trial_started: Instant },
}

impl Default for State {
    fn default() -> Self {
        Self::Closed {
            failures: Vec::new(),
        }
    }
}

/// Thread-safe circuit breaker keyed by provider name.
#[derive(Debug, Clone)]
pub struct CircuitBreaker {
    states: Arc<Mutex<HashMap<String, State>>>,
    threshold: u32,
    window: Duration,
    cooldown: Duration,
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitBreaker {
    pub fn new() -> Self {
        Self::with_limits(FAILURE_THRESHOLD, FAILURE_WINDOW, COOLDOWN)
    }

    pub fn with_limits(threshold: u32, window: Duration, cooldown: Duration) -> Self {
        Self {
            states: Arc::new(Mutex::new(HashMap::new())),
            threshold,
            window,
            cooldown,
        }
    }

    /// Check whether a provider may be called now.
    ///
    /// Returns `true` if the circuit is Closed or transitions to HalfOpen
    /// (allowing a single trial). Returns `false` while Open or while a trial is in flight.
    pub fn is_available(&self, provider: &str) -> bool {
        let Ok(mut states) = self.states.lock() else {
            return true; // If mutex is poisoned, allow the request
        };
        let state = states.entry(provider.to_string()).or_default();

        match state {
            State::Closed { .. } => true,
            State::Open { tripped_at } => {
                if tripped_at.elapsed() >= self.cooldown {
                    info!(provider = provider, "Circuit half-open, allowing trial request");
                    *state = State::HalfOpen {
                        trial_started: Instant::now(),
                    };
                    true
                } else {
                    false
                }
            }
            State::HalfOpen { trial_started } => {
                if trial_started.elapsed() >= self.cooldown {
                    *trial_started = Instant::now();
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Record a successful batch. Closes the circuit.
    pub fn record_success(&self, provider: &str) {
        let Ok(mut states) = self.states.lock() else {
            return;
        };
        let state = states.entry(provider.to_string()).or_default();
        if matches!(state, State::HalfOpen { .. }) {
            info!(provider = provider, "Trial request succeeded, circuit closed");
        }
        *state = State::default();
    }

    /// Record a failed batch. May trip the circuit.
    pub fn record_failure(&self, provider: &str) {
        let Ok(mut states) = self.states.lock() else {
            return;
        };
        let state = states.entry(provider.to_string()).or_default();

        match state {
            State::Closed { failures } => {
                let now = Instant::now();
                failures.retain(|t| now.duration_since(*t) < self.window);
                failures.push(now);
                if failures.len() as u32 >= self.threshold {
                    warn!(
                        provider = provider,
                        failures = failures.len(),
                        "Circuit tripped, skipping provider for {:?}",
                        self.cooldown
                    );
                    *state = State::Open { tripped_at: now };
                }
            }
            State::HalfOpen { .. } => {
                warn!(provider = provider, "Trial request failed, circuit re-opened");
                *state = State::Open {
                    tripped_at: Instant::now(),
                };
            }
            State::Open { .. } => {}
        }
    }
}
