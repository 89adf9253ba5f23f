use std::time::Duration;

use super::Task;

/// Handle returned by [`super::Dom::set_timeout`], used to cancel a pending task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

struct Timer {
    id: TimerId,
    due: Duration,
    task: Task,
}

/// Pending deferred tasks ordered by due time, then by scheduling order.
#[derive(Default)]
pub(crate) struct TimerQueue {
    timers: Vec<Timer>,
    next_id: u64,
}

impl TimerQueue {
    pub(crate) fn schedule(&mut self, due: Duration, task: Task) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.timers.push(Timer { id, due, task });
        id
    }

    pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != id);
        self.timers.len() != before
    }

    /// Ids of timers due at `now`, in firing order. Timers scheduled while
    /// these run are not part of the snapshot; they belong to a later turn.
    pub(crate) fn due_ids(&self, now: Duration) -> Vec<TimerId> {
        let mut due: Vec<(Duration, TimerId)> = self
            .timers
            .iter()
            .filter(|t| t.due <= now)
            .map(|t| (t.due, t.id))
            .collect();
        due.sort();
        due.into_iter().map(|(_, id)| id).collect()
    }

    pub(crate) fn take(&mut self, id: TimerId) -> Option<Task> {
        let index = self.timers.iter().position(|t| t.id == id)?;
        Some(self.timers.remove(index).task)
    }

    pub(crate) fn next_due(&self) -> Option<Duration> {
        self.timers.iter().map(|t| t.due).min()
    }

    pub(crate) fn len(&self) -> usize {
        self.timers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn due_ids_are_ordered_and_cancellable() {
        let mut q = TimerQueue::default();
        let late = q.schedule(Duration::from_millis(20), Box::new(|_| {}));
        let early = q.schedule(Duration::from_millis(5), Box::new(|_| {}));
        let _future = q.schedule(Duration::from_millis(500), Box::new(|_| {}));
        assert_eq!(q.due_ids(Duration::from_millis(30)), vec![early, late]);
        assert!(q.cancel(early));
        assert!(!q.cancel(early));
        assert_eq!(q.due_ids(Duration::from_millis(30)), vec![late]);
        assert_eq!(q.next_due(), Some(Duration::from_millis(20)));
        assert_eq!(q.len(), 2);
    }
}
