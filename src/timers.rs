//! One-shot deadlines on the game clock.
//!
//! Each [`TimerKind`] has at most one pending deadline.  Arming a kind that
//! is already pending replaces it, so two overlapping schedules of the same
//! kind can never both fire.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    NextWave,
    /// End of the grace window after a game or level start.
    GraceExpiry,
    ConfirmCompletion,
    /// Armed after the last wave of a level spawns.
    CompletionFallback,
    LevelAdvance,
    SafetyPoll,
}

impl TimerKind {
    pub const ALL: [TimerKind; 6] = [
        TimerKind::NextWave,
        TimerKind::GraceExpiry,
        TimerKind::ConfirmCompletion,
        TimerKind::CompletionFallback,
        TimerKind::LevelAdvance,
        TimerKind::SafetyPoll,
    ];

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Scheduler {
    deadlines: [Option<u64>; 6],
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fire `kind` at `now + delay_ms`, replacing any pending deadline.
    pub fn arm(&mut self, kind: TimerKind, now: u64, delay_ms: u64) {
        let at = now.saturating_add(delay_ms);
        let slot = &mut self.deadlines[kind.index()];
        if let Some(previous) = slot.replace(at) {
            tracing::debug!(?kind, previous, at, "Timer replaced");
        } else {
            tracing::debug!(?kind, at, "Timer armed");
        }
    }

    /// Returns whether a deadline was pending.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        let was_pending = self.deadlines[kind.index()].take().is_some();
        if was_pending {
            tracing::debug!(?kind, "Timer cancelled");
        }
        was_pending
    }

    pub fn cancel_all(&mut self) {
        for kind in TimerKind::ALL {
            self.cancel(kind);
        }
    }

    pub fn is_armed(&self, kind: TimerKind) -> bool {
        self.deadlines[kind.index()].is_some()
    }

    pub fn deadline(&self, kind: TimerKind) -> Option<u64> {
        self.deadlines[kind.index()]
    }

    pub fn pending(&self) -> usize {
        self.deadlines.iter().filter(|d| d.is_some()).count()
    }

    /// Disarm and return the earliest timer due at `now`.  Ties go to the
    /// kind listed first in [`TimerKind::ALL`].
    pub fn pop_due(&mut self, now: u64) -> Option<TimerKind> {
        let kind = TimerKind::ALL
            .into_iter()
            .filter_map(|kind| self.deadline(kind).map(|at| (at, kind)))
            .filter(|&(at, _)| at <= now)
            .min_by_key(|&(at, kind)| (at, kind.index()))
            .map(|(_, kind)| kind)?;
        self.deadlines[kind.index()] = None;
        Some(kind)
    }
}
