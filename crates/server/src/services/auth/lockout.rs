//! Sliding-window login lockout.
//!
//! Tracks consecutive failed login attempts per identifier (normalized
//! email) and locks the identifier out after too many failures in a short
//! window. State is in-memory and process-local: this slows brute-force
//! attempts on a single instance, it is not a security boundary on its own.
//! The IP-level governor layer in `middleware::rate_limit` backs it up.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Failures within the window before the identifier locks.
const MAX_FAILURES: u32 = 5;

/// How far back failures count toward the limit.
const FAILURE_WINDOW: Duration = Duration::from_secs(15 * 60);

/// How long a locked identifier stays locked.
const LOCKOUT_COOLDOWN: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Default)]
struct AttemptState {
    /// Timestamps of recent failures, oldest first.
    failures: Vec<Instant>,
    locked_until: Option<Instant>,
}

impl AttemptState {
    fn prune(&mut self, now: Instant, window: Duration) {
        self.failures
            .retain(|&at| now.saturating_duration_since(at) < window);
        if self.locked_until.is_some_and(|until| now >= until) {
            self.locked_until = None;
        }
    }

    const fn is_locked(&self) -> bool {
        self.locked_until.is_some()
    }

    fn is_idle(&self) -> bool {
        self.failures.is_empty() && self.locked_until.is_none()
    }
}

/// Per-identifier login attempt limiter.
///
/// Identifiers move Clear → Locked after [`MAX_FAILURES`] failures inside
/// [`FAILURE_WINDOW`], and back to Clear once [`LOCKOUT_COOLDOWN`] passes
/// or [`LoginGate::clear`] runs on a successful login.
pub struct LoginGate {
    max_failures: u32,
    window: Duration,
    cooldown: Duration,
    state: Mutex<HashMap<String, AttemptState>>,
}

impl Default for LoginGate {
    fn default() -> Self {
        Self::new()
    }
}

impl LoginGate {
    /// Create a gate with the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(MAX_FAILURES, FAILURE_WINDOW, LOCKOUT_COOLDOWN)
    }

    /// Create a gate with an explicit policy.
    #[must_use]
    pub fn with_policy(max_failures: u32, window: Duration, cooldown: Duration) -> Self {
        Self {
            max_failures,
            window,
            cooldown,
            state: Mutex::new(HashMap::new()),
        }
    }

    /// Whether a login attempt for this identifier may proceed.
    pub fn can_attempt(&self, identifier: &str) -> bool {
        self.can_attempt_at(identifier, Instant::now())
    }

    /// Record a failed login attempt for this identifier.
    pub fn record_failure(&self, identifier: &str) {
        self.record_failure_at(identifier, Instant::now());
    }

    /// Forget all attempt state for this identifier.
    ///
    /// Called after a successful login, and available to support tooling.
    pub fn clear(&self, identifier: &str) {
        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        state.remove(identifier);
    }

    fn can_attempt_at(&self, identifier: &str, now: Instant) -> bool {
        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let Some(entry) = state.get_mut(identifier) else {
            return true;
        };

        entry.prune(now, self.window);
        let allowed = !entry.is_locked();
        if entry.is_idle() {
            state.remove(identifier);
        }
        allowed
    }

    fn record_failure_at(&self, identifier: &str, now: Instant) {
        let mut state = self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let entry = state.entry(identifier.to_owned()).or_default();

        entry.prune(now, self.window);
        entry.failures.push(now);

        if entry.failures.len() >= self.max_failures as usize {
            entry.locked_until = Some(now + self.cooldown);
            entry.failures.clear();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn gate() -> LoginGate {
        LoginGate::with_policy(3, Duration::from_secs(60), Duration::from_secs(120))
    }

    #[test]
    fn test_fresh_identifier_can_attempt() {
        let gate = gate();
        assert!(gate.can_attempt("a@example.com"));
    }

    #[test]
    fn test_locks_after_exactly_max_failures() {
        let gate = gate();
        let now = Instant::now();

        gate.record_failure_at("a@example.com", now);
        gate.record_failure_at("a@example.com", now);
        assert!(gate.can_attempt_at("a@example.com", now));

        gate.record_failure_at("a@example.com", now);
        assert!(!gate.can_attempt_at("a@example.com", now));
    }

    #[test]
    fn test_failures_outside_window_do_not_count() {
        let gate = gate();
        let start = Instant::now();

        gate.record_failure_at("a@example.com", start);
        gate.record_failure_at("a@example.com", start);

        // Third failure lands after the first two have aged out.
        let later = start + Duration::from_secs(61);
        gate.record_failure_at("a@example.com", later);
        assert!(gate.can_attempt_at("a@example.com", later));
    }

    #[test]
    fn test_lock_expires_after_cooldown() {
        let gate = gate();
        let now = Instant::now();

        for _ in 0..3 {
            gate.record_failure_at("a@example.com", now);
        }
        assert!(!gate.can_attempt_at("a@example.com", now));
        assert!(!gate.can_attempt_at("a@example.com", now + Duration::from_secs(119)));
        assert!(gate.can_attempt_at("a@example.com", now + Duration::from_secs(120)));
    }

    #[test]
    fn test_clear_unlocks_immediately() {
        let gate = gate();
        let now = Instant::now();

        for _ in 0..3 {
            gate.record_failure_at("a@example.com", now);
        }
        assert!(!gate.can_attempt_at("a@example.com", now));

        gate.clear("a@example.com");
        assert!(gate.can_attempt_at("a@example.com", now));
    }

    #[test]
    fn test_identifiers_are_independent() {
        let gate = gate();
        let now = Instant::now();

        for _ in 0..3 {
            gate.record_failure_at("a@example.com", now);
        }
        assert!(!gate.can_attempt_at("a@example.com", now));
        assert!(gate.can_attempt_at("b@example.com", now));
    }
}
