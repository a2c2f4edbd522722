use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerToken(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Pending {
    token: TimerToken,
    due: Duration,
}

/// A single-shot deadline. Scheduling replaces whatever was pending, so a
/// stale deferral can never fire after a newer one was requested.
///
/// Time is whatever monotonic `Duration` the host feeds in; nothing here
/// reads a clock.
#[derive(Clone, Debug, Default)]
pub struct Deferred {
    pending: Option<Pending>,
    next_token: u64,
}

impl Deferred {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, now: Duration, delay: Duration) -> TimerToken {
        self.next_token = self.next_token.wrapping_add(1);
        let token = TimerToken(self.next_token);
        self.pending = Some(Pending {
            token,
            due: now.saturating_add(delay),
        });
        token
    }

    pub fn cancel(&mut self) -> Option<TimerToken> {
        self.pending.take().map(|pending| pending.token)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn due(&self) -> Option<Duration> {
        self.pending.map(|pending| pending.due)
    }

    /// Returns the token once, the first time it is polled at or after its
    /// deadline.
    pub fn fire(&mut self, now: Duration) -> Option<TimerToken> {
        match self.pending {
            Some(pending) if now >= pending.due => {
                self.pending = None;
                Some(pending.token)
            }
            _ => None,
        }
    }
}
