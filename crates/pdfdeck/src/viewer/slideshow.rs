use std::time::{Duration, Instant};

pub const DEFAULT_INTERVAL_SECS: u32 = 45;
const TICK: Duration = Duration::from_secs(1);

/// A running countdown. The tick deadline and the pending advance live in
/// the same value, so dropping the session cancels both.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Session {
    seconds_remaining: u32,
    next_tick: Instant,
}

/// Result of polling the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tick {
    /// No session, or no tick was due.
    Idle,
    /// At least one second elapsed; the readout changed.
    Counted,
    /// The countdown reached zero. The caller decides whether to advance and
    /// [`Slideshow::restart`] or to stop.
    Expired,
}

#[derive(Debug)]
pub struct Slideshow {
    interval_secs: u32,
    session: Option<Session>,
}

impl Slideshow {
    pub fn new(interval_secs: u32) -> Self {
        Self {
            interval_secs: interval_secs.max(1),
            session: None,
        }
    }

    pub fn interval_secs(&self) -> u32 {
        self.interval_secs
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    /// Start a fresh countdown, tearing down any existing session first.
    pub fn start(&mut self, now: Instant) {
        self.stop();
        self.session = Some(Session {
            seconds_remaining: self.interval_secs,
            next_tick: now + TICK,
        });
    }

    /// Drop the session. Returns whether one was running.
    pub fn stop(&mut self) -> bool {
        self.session.take().is_some()
    }

    /// Refill the countdown after an expiry, keeping the tick phase.
    pub fn restart(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.seconds_remaining = self.interval_secs;
        }
    }

    /// Seconds shown on the countdown readout. When stopped this is the full
    /// interval, so the readout starts from the top next time it appears.
    pub fn readout(&self) -> u32 {
        self.session
            .map(|s| s.seconds_remaining)
            .unwrap_or(self.interval_secs)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.session.map(|s| s.next_tick)
    }

    /// Process every tick that is due at `now`. Stops at the first expiry so
    /// the caller can act on it before further ticks are counted.
    pub fn poll(&mut self, now: Instant) -> Tick {
        let Some(session) = self.session.as_mut() else {
            return Tick::Idle;
        };

        let mut counted = false;
        while now >= session.next_tick {
            session.next_tick += TICK;
            session.seconds_remaining = session.seconds_remaining.saturating_sub(1);
            counted = true;
            if session.seconds_remaining == 0 {
                return Tick::Expired;
            }
        }

        if counted { Tick::Counted } else { Tick::Idle }
    }
}

impl Default for Slideshow {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL_SECS)
    }
}
