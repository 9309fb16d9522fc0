use foundation::time::Time;

/// Deterministic timer queue for deferred single-threaded work.
///
/// Key properties:
/// - Total ordering on `(due, id)`: timers due at the same instant fire in
///   the order they were scheduled.
/// - Cancellation does not perturb the order of remaining timers.
/// - Nothing fires on its own; the owner pops due entries as its clock moves.
///
/// Vec-backed: the expected number of pending timers is tiny.

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct Key {
    due: Time,
    id: TimerId,
}

#[derive(Debug)]
struct Entry<T> {
    key: Key,
    payload: T,
    canceled: bool,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.iter().filter(|e| !e.canceled).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn schedule(&mut self, due: Time, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry {
            key: Key { due, id },
            payload,
            canceled: false,
        });
        id
    }

    pub fn cancel(&mut self, id: TimerId) -> bool {
        if let Some(entry) = self
            .entries
            .iter_mut()
            .find(|e| e.key.id == id && !e.canceled)
        {
            entry.canceled = true;
            return true;
        }
        false
    }

    /// Drops every pending timer. Returns how many were live.
    pub fn clear(&mut self) -> usize {
        let live = self.len();
        self.entries.clear();
        live
    }

    /// Earliest due time among live timers.
    pub fn next_due(&self) -> Option<Time> {
        self.entries
            .iter()
            .filter(|e| !e.canceled)
            .map(|e| e.key.due)
            .min()
    }

    /// Pops the earliest live timer whose due time is `<= now`.
    pub fn pop_due(&mut self, now: Time) -> Option<(TimerId, T)> {
        self.entries.retain(|e| !e.canceled);

        let mut best_idx: Option<usize> = None;
        for (idx, entry) in self.entries.iter().enumerate() {
            if entry.key.due > now {
                continue;
            }
            match best_idx {
                None => best_idx = Some(idx),
                Some(best) => {
                    if entry.key < self.entries[best].key {
                        best_idx = Some(idx);
                    }
                }
            }
        }

        let idx = best_idx?;
        let entry = self.entries.remove(idx);
        Some((entry.key.id, entry.payload))
    }

    /// Pops every timer due at or before `now`, in firing order.
    pub fn drain_due(&mut self, now: Time) -> Vec<(TimerId, T)> {
        let mut out = Vec::new();
        while let Some(item) = self.pop_due(now) {
            out.push(item);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::TimerQueue;
    use foundation::time::Time;

    #[test]
    fn same_due_is_insertion_order() {
        let mut q = TimerQueue::new();
        q.schedule(Time(150), "a");
        q.schedule(Time(150), "b");
        q.schedule(Time(150), "c");

        let got: Vec<_> = q.drain_due(Time(150)).into_iter().map(|(_, v)| v).collect();
        assert_eq!(got, vec!["a", "b", "c"]);
    }

    #[test]
    fn nothing_fires_early() {
        let mut q = TimerQueue::new();
        q.schedule(Time(150), "a");
        assert!(q.pop_due(Time(149)).is_none());
        assert_eq!(q.next_due(), Some(Time(150)));
        assert_eq!(q.pop_due(Time(150)).map(|(_, v)| v), Some("a"));
        assert!(q.is_empty());
    }

    #[test]
    fn earlier_due_fires_first_regardless_of_insertion() {
        let mut q = TimerQueue::new();
        q.schedule(Time(300), "late");
        q.schedule(Time(100), "early");
        let got: Vec<_> = q.drain_due(Time(1000)).into_iter().map(|(_, v)| v).collect();
        assert_eq!(got, vec!["early", "late"]);
    }

    #[test]
    fn cancel_skips_timer() {
        let mut q = TimerQueue::new();
        let a = q.schedule(Time(10), "a");
        q.schedule(Time(10), "b");
        assert!(q.cancel(a));
        assert!(!q.cancel(a));
        assert_eq!(q.len(), 1);

        let (_, v) = q.pop_due(Time(10)).unwrap();
        assert_eq!(v, "b");
        assert!(q.pop_due(Time(10)).is_none());
    }

    #[test]
    fn clear_reports_live_count() {
        let mut q = TimerQueue::new();
        let a = q.schedule(Time(10), 1);
        q.schedule(Time(20), 2);
        q.cancel(a);
        assert_eq!(q.clear(), 1);
        assert!(q.is_empty());
        assert!(q.next_due().is_none());
    }
}
