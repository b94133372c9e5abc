//! Pause-aware play duration.
//!
//! Duration is derived on read as `accumulated + (now - last_resume_at)` while
//! running. Nothing ticks in the background.

/// Running/paused bookkeeping for one playthrough.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Timer {
    accumulated_ms: i64,
    last_resume_at: i64,
    running: bool,
}

impl Timer {
    /// A stopped timer at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero the timer and start running from `now`.
    pub fn start(&mut self, now: i64) {
        self.accumulated_ms = 0;
        self.last_resume_at = now;
        self.running = true;
    }

    /// Fold the running interval into the accumulated total and stop.
    pub fn pause(&mut self, now: i64) {
        if self.running {
            self.accumulated_ms += (now - self.last_resume_at).max(0);
            self.running = false;
        }
    }

    /// Start running again from `now`.
    pub fn resume(&mut self, now: i64) {
        if !self.running {
            self.last_resume_at = now;
            self.running = true;
        }
    }

    /// Zero the timer and stop.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Whether time is currently accruing.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Time folded in by previous pauses.
    pub fn accumulated_ms(&self) -> i64 {
        self.accumulated_ms
    }

    /// When the timer last started running.
    pub fn last_resume_at(&self) -> i64 {
        self.last_resume_at
    }

    /// Total running time as of `now`.
    pub fn elapsed_ms(&self, now: i64) -> i64 {
        if self.running {
            self.accumulated_ms + (now - self.last_resume_at).max(0)
        } else {
            self.accumulated_ms
        }
    }
}
