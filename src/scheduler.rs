//! Virtual-time timers.
//!
//! The scheduler never runs callbacks itself.  The owner pulls due timers
//! one at a time with [`Scheduler::pop_due`] and reacts to each before asking
//! for the next, so a handler that cancels another timer stops it from
//! firing even when both were due in the same advance.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

/// What a timer drives.  The owner dispatches on this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerKind {
    GameLoop,
    HardcoreSpawn,
    Countdown,
    Movement,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Fired {
    pub id: TimerId,
    pub kind: TimerKind,
    pub at_ms: u64,
}

#[derive(Clone, Debug)]
struct Timer {
    id: TimerId,
    kind: TimerKind,
    due_ms: u64,
    /// `Some(period)` for repeating timers.
    period_ms: Option<u64>,
}

#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_id: u64,
    timers: Vec<Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Repeating timer, first firing one period from now.  Periods of zero
    /// are bumped to 1 ms so an interval can never fire twice at one instant.
    pub fn set_interval(&mut self, kind: TimerKind, period_ms: u64) -> TimerId {
        let period_ms = period_ms.max(1);
        self.insert(kind, period_ms, Some(period_ms))
    }

    pub fn set_timeout(&mut self, kind: TimerKind, delay_ms: u64) -> TimerId {
        self.insert(kind, delay_ms, None)
    }

    fn insert(&mut self, kind: TimerKind, delay_ms: u64, period_ms: Option<u64>) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            kind,
            due_ms: self.now_ms + delay_ms,
            period_ms,
        });
        id
    }

    /// Returns false if the timer had already fired (timeout) or been cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    pub fn cancel_all(&mut self) {
        self.timers.clear();
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.timers.iter().any(|t| t.id == id)
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// Pop the earliest timer due at or before `until_ms`, moving the clock to
    /// its due time.  Ties fire in creation order.  Intervals are re-armed
    /// before returning, so the handler may cancel them.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<Fired> {
        let idx = self
            .timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= until_ms)
            .min_by_key(|(_, t)| (t.due_ms, t.id.0))
            .map(|(i, _)| i)?;

        let Timer { id, kind, due_ms, period_ms } = self.timers[idx].clone();
        self.now_ms = self.now_ms.max(due_ms);
        match period_ms {
            Some(period) => self.timers[idx].due_ms += period,
            None => {
                self.timers.remove(idx);
            }
        }
        Some(Fired { id, kind, at_ms: due_ms })
    }

    /// Move the clock forward after all due timers have been popped.
    pub fn settle(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interval_fires_every_period() {
        let mut s = Scheduler::new();
        s.set_interval(TimerKind::GameLoop, 10);
        let mut hits = Vec::new();
        while let Some(f) = s.pop_due(35) {
            hits.push(f.at_ms);
        }
        s.settle(35);
        assert_eq!(hits, vec![10, 20, 30]);
        assert_eq!(s.now_ms(), 35);
    }

    #[test]
    fn timeout_fires_once() {
        let mut s = Scheduler::new();
        let id = s.set_timeout(TimerKind::Countdown, 5);
        assert_eq!(s.pop_due(100).map(|f| f.id), Some(id));
        assert!(s.pop_due(100).is_none());
        assert!(!s.is_active(id));
    }

    #[test]
    fn ties_fire_in_creation_order() {
        let mut s = Scheduler::new();
        let a = s.set_interval(TimerKind::GameLoop, 10);
        let b = s.set_interval(TimerKind::HardcoreSpawn, 10);
        assert_eq!(s.pop_due(10).map(|f| f.id), Some(a));
        assert_eq!(s.pop_due(10).map(|f| f.id), Some(b));
    }

    #[test]
    fn cancel_during_drain_suppresses_later_timer() {
        let mut s = Scheduler::new();
        s.set_timeout(TimerKind::Countdown, 5);
        let later = s.set_interval(TimerKind::GameLoop, 10);
        let first = s.pop_due(20).unwrap();
        assert_eq!(first.kind, TimerKind::Countdown);
        assert!(s.cancel(later));
        assert!(s.pop_due(20).is_none());
        assert!(!s.cancel(later));
    }

    #[test]
    fn zero_period_interval_is_bumped() {
        let mut s = Scheduler::new();
        s.set_interval(TimerKind::GameLoop, 0);
        let mut n = 0;
        while s.pop_due(3).is_some() {
            n += 1;
        }
        assert_eq!(n, 3);
    }
}
