use foundation::time::Time;

/// Host-driven clock.
///
/// Time only moves when the host says so, which keeps deferred work
/// deterministic and replayable. The clock never runs backwards.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Clock {
    now: Time,
}

impl Clock {
    pub fn new(start: Time) -> Self {
        Self { now: start }
    }

    pub fn now(&self) -> Time {
        self.now
    }

    /// Moves the clock to `t`. Earlier timestamps are ignored.
    ///
    /// Returns the resulting current time.
    pub fn advance_to(&mut self, t: Time) -> Time {
        if t > self.now {
            self.now = t;
        }
        self.now
    }

    pub fn advance_by(&mut self, delta: std::time::Duration) -> Time {
        self.now = self.now.saturating_add(delta);
        self.now
    }
}
