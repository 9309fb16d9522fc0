use std::time::Duration;

/// Host event-loop timestamp in milliseconds.
///
/// The controller never reads a wall clock; the host feeds it `Time` values so
/// deferred work stays deterministic and replayable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Time(pub u64);

impl Time {
    pub const ZERO: Time = Time(0);

    pub const fn from_millis(ms: u64) -> Self {
        Time(ms)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    pub fn saturating_add(self, delay: Duration) -> Self {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        Time(self.0.saturating_add(ms))
    }
}

#[cfg(test)]
mod tests {
    use super::Time;
    use std::time::Duration;

    #[test]
    fn adds_delays_without_overflow() {
        assert_eq!(Time(100).saturating_add(Duration::from_millis(150)), Time(250));
        assert_eq!(
            Time(u64::MAX - 1).saturating_add(Duration::from_millis(10)),
            Time(u64::MAX)
        );
    }
}
