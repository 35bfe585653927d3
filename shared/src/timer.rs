//! Cooperative timer queue
//!
//! Timers are scheduled against a caller-supplied millisecond clock and fire
//! only when the owner polls [`TimerQueue::pop_due`]. Each scheduled timer
//! gets a unique [`TimerHandle`]; cancelling removes it from the queue so a
//! cancelled timer can never be returned afterwards.

/// Token identifying one scheduled timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
struct Entry<K> {
    handle: TimerHandle,
    due_ms: f64,
    kind: K,
}

/// Pending timers ordered by due time, then by scheduling order
#[derive(Debug, Clone)]
pub struct TimerQueue<K> {
    entries: Vec<Entry<K>>,
    next_id: u64,
}

impl<K> Default for TimerQueue<K> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }
}

impl<K: Copy> TimerQueue<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire at `due_ms`
    pub fn schedule(&mut self, kind: K, due_ms: f64) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;

        // Insert after every entry due at or before this one
        let at = self
            .entries
            .iter()
            .position(|e| e.due_ms > due_ms)
            .unwrap_or(self.entries.len());
        self.entries.insert(at, Entry { handle, due_ms, kind });
        handle
    }

    /// Cancel a timer; returns false if it already fired or was cancelled
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        match self.entries.iter().position(|e| e.handle == handle) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Drop every pending timer
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Due time of a pending timer
    pub fn due_ms(&self, handle: TimerHandle) -> Option<f64> {
        self.entries
            .iter()
            .find(|e| e.handle == handle)
            .map(|e| e.due_ms)
    }

    /// Remove and return the earliest timer due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: f64) -> Option<(TimerHandle, K, f64)> {
        match self.entries.first() {
            Some(first) if first.due_ms <= now_ms => {
                let entry = self.entries.remove(0);
                Some((entry.handle, entry.kind, entry.due_ms))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Kind {
        A,
        B,
        C,
    }

    #[test]
    fn test_pops_in_due_order_with_stable_ties() {
        let mut q = TimerQueue::new();
        q.schedule(Kind::A, 300.0);
        q.schedule(Kind::B, 100.0);
        q.schedule(Kind::C, 100.0);

        assert!(q.pop_due(99.0).is_none());
        assert_eq!(q.pop_due(500.0).map(|(_, k, _)| k), Some(Kind::B));
        assert_eq!(q.pop_due(500.0).map(|(_, k, _)| k), Some(Kind::C));
        assert_eq!(q.pop_due(500.0).map(|(_, k, due)| (k, due)), Some((Kind::A, 300.0)));
        assert!(q.pop_due(f64::MAX).is_none());
    }

    #[test]
    fn test_cancelled_timer_never_fires() {
        let mut q = TimerQueue::new();
        let a = q.schedule(Kind::A, 10.0);
        let b = q.schedule(Kind::B, 20.0);

        assert!(q.cancel(a));
        assert!(!q.cancel(a));
        assert_eq!(q.due_ms(a), None);
        assert_eq!(q.due_ms(b), Some(20.0));

        let fired: Vec<_> = std::iter::from_fn(|| q.pop_due(1000.0)).collect();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].0, b);
    }

    #[test]
    fn test_handles_are_unique() {
        let mut q = TimerQueue::new();
        let a = q.schedule(Kind::A, 10.0);
        q.pop_due(10.0);
        let b = q.schedule(Kind::A, 10.0);
        assert_ne!(a, b);
        q.clear();
        assert_eq!(q.due_ms(b), None);
        assert!(q.pop_due(f64::MAX).is_none());
    }
}
