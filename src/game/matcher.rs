//! Selection handling and match evaluation
//!
//! Holds at most one selection per column. Once both columns hold one the
//! pair is evaluated exactly once and input is latched until the feedback
//! delay has run out and the outcome has been handed back to the session.

use super::pool::Column;
use super::timer::Deferred;
use super::{MATCH_FEEDBACK_DELAY, MISMATCH_FEEDBACK_DELAY};
use std::time::Duration;

/// Result of evaluating a selected pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Both columns picked the same word
    Match { id: u32 },
    /// The columns picked different words
    Mismatch { source: u32, target: u32 },
}

impl Outcome {
    /// Feedback delay before the outcome resolves
    pub fn delay(self) -> Duration {
        match self {
            Outcome::Match { .. } => MATCH_FEEDBACK_DELAY,
            Outcome::Mismatch { .. } => MISMATCH_FEEDBACK_DELAY,
        }
    }
}

/// How a visible word should be drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    None,
    Selected,
    Correct,
    Incorrect,
}

/// What a selection event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectResult {
    /// Input is latched, nothing changed
    Ignored,
    /// The column's selection was set or toggled off
    Updated,
    /// Both columns are now selected and the pair is being evaluated
    Evaluating(Outcome),
}

/// Per-column selections plus the evaluation latch
#[derive(Debug, Clone, Default)]
pub struct Selection {
    source: Option<u32>,
    target: Option<u32>,
    pending: Option<Deferred<Outcome>>,
    /// Held outside of evaluation, e.g. while a round-complete dialog is up
    held: bool,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while input is not accepted
    pub fn is_locked(&self) -> bool {
        self.pending.is_some() || self.held
    }

    pub fn selected(&self, column: Column) -> Option<u32> {
        match column {
            Column::Source => self.source,
            Column::Target => self.target,
        }
    }

    /// Outcome waiting for its feedback delay, if any
    pub fn pending(&self) -> Option<Outcome> {
        self.pending.as_ref().map(|p| *p.action())
    }

    /// Select `id` in `column`. Selecting the held item again clears it.
    pub fn select(&mut self, column: Column, id: u32) -> SelectResult {
        if self.is_locked() {
            return SelectResult::Ignored;
        }

        let slot = match column {
            Column::Source => &mut self.source,
            Column::Target => &mut self.target,
        };
        *slot = if *slot == Some(id) { None } else { Some(id) };

        match (self.source, self.target) {
            (Some(source), Some(target)) => {
                let outcome = if source == target {
                    Outcome::Match { id: source }
                } else {
                    Outcome::Mismatch { source, target }
                };
                self.pending = Some(Deferred::new(outcome, outcome.delay()));
                SelectResult::Evaluating(outcome)
            }
            _ => SelectResult::Updated,
        }
    }

    /// Feed elapsed time. Returns the outcome once its delay has run out;
    /// selections are cleared and the latch released at that point.
    pub fn advance(&mut self, elapsed: Duration) -> Option<Outcome> {
        let due = self.pending.as_mut()?.advance(elapsed);
        if !due {
            return None;
        }
        let outcome = self.pending.take().map(Deferred::into_action);
        self.source = None;
        self.target = None;
        outcome
    }

    /// Lock input without a pending evaluation
    pub fn hold(&mut self) {
        self.held = true;
    }

    /// Drop selections, cancel any pending evaluation and release the latch
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Display status for word `id` in `column`
    pub fn status(&self, column: Column, id: u32) -> Status {
        let is_selected = self.selected(column) == Some(id);

        match self.pending() {
            Some(Outcome::Match { .. }) if is_selected => Status::Correct,
            Some(Outcome::Mismatch { source, target })
                if id == source || id == target =>
            {
                Status::Incorrect
            }
            _ if is_selected => Status::Selected,
            _ => Status::None,
        }
    }
}
