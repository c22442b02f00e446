//! Caller-supplied call context.

use std::time::{Duration, Instant};

/// Carries the caller's deadline into a call.
///
/// The deadline caps the effective timeout of every attempt; once it has
/// passed, calls fail as transport errors without reaching the network.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallContext {
    deadline: Option<Instant>,
}

impl CallContext {
    /// A context without a deadline.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Time left before the deadline, zero once it has passed.
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_some_and(|left| left.is_zero())
    }

    /// Clamp `timeout` to the time left before the deadline.
    pub(crate) fn cap(&self, timeout: Duration) -> Duration {
        match self.remaining() {
            Some(left) => timeout.min(left),
            None => timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_deadline_never_expires_or_caps() {
        let ctx = CallContext::new();
        assert!(ctx.remaining().is_none());
        assert!(!ctx.is_expired());
        assert_eq!(ctx.cap(Duration::from_secs(20)), Duration::from_secs(20));
    }

    #[test]
    fn past_deadline_is_expired() {
        let ctx = CallContext::with_deadline(Instant::now() - Duration::from_millis(1));
        assert!(ctx.is_expired());
        assert_eq!(ctx.cap(Duration::from_secs(20)), Duration::ZERO);
    }

    #[test]
    fn deadline_caps_longer_timeouts_only() {
        let ctx = CallContext::with_timeout(Duration::from_secs(60));
        assert_eq!(ctx.cap(Duration::from_secs(5)), Duration::from_secs(5));
        assert!(ctx.cap(Duration::from_secs(600)) <= Duration::from_secs(60));
    }
}
