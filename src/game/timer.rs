//! Countdown clock and deferred actions
//!
//! Both are driven by elapsed time handed in by the event loop, so the game
//! never blocks and tests can step time exactly.

use std::time::Duration;

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Repeating one-second countdown that can be stopped and resumed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Countdown {
    remaining: u32,
    /// Time accumulated toward the next tick
    carry: Duration,
    running: bool,
}

impl Countdown {
    /// A stopped countdown showing `seconds`
    pub fn new(seconds: u32) -> Self {
        Self {
            remaining: seconds,
            carry: Duration::ZERO,
            running: false,
        }
    }

    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_expired(&self) -> bool {
        self.remaining == 0
    }

    /// Start (or resume) ticking
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Cancel ticking. Partial progress toward the next tick is dropped.
    pub fn stop(&mut self) {
        self.running = false;
        self.carry = Duration::ZERO;
    }

    /// Set a new duration without changing whether it runs
    pub fn reset(&mut self, seconds: u32) {
        self.remaining = seconds;
        self.carry = Duration::ZERO;
    }

    /// Remove seconds from the clock, floored at zero.
    /// Returns true if this emptied the clock.
    pub fn penalize(&mut self, seconds: u32) -> bool {
        let was_expired = self.is_expired();
        self.remaining = self.remaining.saturating_sub(seconds);
        !was_expired && self.is_expired()
    }

    /// Feed elapsed time. Returns true if the clock reached zero during this call.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        if !self.running || self.is_expired() {
            return false;
        }

        self.carry += elapsed;
        while self.carry >= ONE_SECOND && self.remaining > 0 {
            self.carry -= ONE_SECOND;
            self.remaining -= 1;
        }

        if self.is_expired() {
            self.stop();
            return true;
        }
        false
    }
}

/// An action that becomes due after a delay. Dropping it cancels it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deferred<T> {
    action: T,
    remaining: Duration,
}

impl<T> Deferred<T> {
    pub fn new(action: T, delay: Duration) -> Self {
        Self {
            action,
            remaining: delay,
        }
    }

    pub fn action(&self) -> &T {
        &self.action
    }

    #[cfg(test)]
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    /// Feed elapsed time. Returns true once the delay has fully elapsed.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        self.remaining = self.remaining.saturating_sub(elapsed);
        self.is_due()
    }

    pub fn is_due(&self) -> bool {
        self.remaining.is_zero()
    }

    pub fn into_action(self) -> T {
        self.action
    }
}
