use std::{
    any::Any,
    cmp::Ordering,
    fmt,
    time::{Duration, Instant},
};

use crate::{
    heap::Compare,
    scheduler::{
        MissedTicks, Scheduler, TimerDriver,
        driver::{deadline_after, far_future},
    },
};

/// Opaque identity of a scheduled task, unique within one [`Scheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub(crate) u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// Callback invoked each time a task fires. Receives the scheduler so it
/// can schedule or cancel tasks, including itself.
pub type Callback<D> = Box<dyn FnMut(&mut Scheduler<D>) -> anyhow::Result<()>>;

/// Failure of a single task invocation. Logged and handed to the error
/// hook; never propagated out of the scheduler.
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("{id} failed: {source:#}")]
    Failed {
        id: TaskId,
        #[source]
        source: anyhow::Error,
    },
    #[error("{id} panicked: {message}")]
    Panicked { id: TaskId, message: String },
}

impl TaskError {
    pub fn task_id(&self) -> TaskId {
        match self {
            Self::Failed { id, .. } | Self::Panicked { id, .. } => *id,
        }
    }

    pub(crate) fn from_panic(id: TaskId, payload: &(dyn Any + Send)) -> Self {
        let message = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_owned()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_owned()
        };
        Self::Panicked { id, message }
    }
}

pub(crate) struct Task<D: TimerDriver> {
    pub(crate) id: TaskId,
    pub(crate) callback: Callback<D>,
    pub(crate) interval: Duration,
    pub(crate) repeat: bool,
    pub(crate) start: Instant,
    pub(crate) next: Instant,
    pub(crate) times: u32,
}

impl<D: TimerDriver> Task<D> {
    pub(crate) fn new(
        id: TaskId,
        callback: Callback<D>,
        interval: Duration,
        repeat: bool,
        start: Instant,
    ) -> Self {
        Self {
            id,
            callback,
            interval,
            repeat,
            start,
            next: deadline_after(start, interval),
            times: 1,
        }
    }

    /// Advance `next` to the following tick, anchored on `start` rather
    /// than on when the callback actually ran.
    pub(crate) fn reschedule(&mut self, now: Instant, missed: MissedTicks) {
        self.times = self.times.saturating_add(1);
        self.next = self.tick(self.times);

        if missed == MissedTicks::Skip && self.next <= now {
            let period = self.interval.as_nanos().max(1);
            let elapsed = now.saturating_duration_since(self.start).as_nanos();
            self.times = u32::try_from(elapsed / period + 1).unwrap_or(u32::MAX);
            self.next = self.tick(self.times);
        }
    }

    /// Deadline of the `times`-th fire.
    fn tick(&self, times: u32) -> Instant {
        match self.interval.checked_mul(times) {
            Some(offset) => deadline_after(self.start, offset),
            None => far_future(self.start),
        }
    }
}

impl<D: TimerDriver> fmt::Debug for Task<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("interval", &self.interval)
            .field("repeat", &self.repeat)
            .field("next", &self.next)
            .field("times", &self.times)
            .finish_non_exhaustive()
    }
}

/// Earliest `next` first, ties broken by id so equal deadlines fire in
/// scheduling order.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ByDeadline;

impl<D: TimerDriver> Compare<Task<D>> for ByDeadline {
    #[inline(always)]
    fn compare(&self, a: &Task<D>, b: &Task<D>) -> Ordering {
        a.next.cmp(&b.next).then(a.id.cmp(&b.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduler::ManualDriver;

    fn noop() -> Callback<ManualDriver> {
        Box::new(|_| Ok(()))
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_new_task_first_fire() {
        let start = Instant::now();
        let task = Task::new(TaskId(1), noop(), ms(10), true, start);
        assert_eq!(task.next, start + ms(10));
        assert_eq!(task.times, 1);
    }

    #[test]
    fn test_reschedule_anchors_on_start() {
        let start = Instant::now();
        let mut task = Task::new(TaskId(1), noop(), ms(10), true, start);

        // Ran 7ms late; the next tick is still on the original grid
        task.reschedule(start + ms(17), MissedTicks::CatchUp);
        assert_eq!(task.next, start + ms(20));
        assert_eq!(task.times, 2);
    }

    #[test]
    fn test_reschedule_catch_up_keeps_missed_ticks() {
        let start = Instant::now();
        let mut task = Task::new(TaskId(1), noop(), ms(10), true, start);

        task.reschedule(start + ms(45), MissedTicks::CatchUp);
        assert_eq!(task.next, start + ms(20));
    }

    #[test]
    fn test_reschedule_skip_jumps_past_now() {
        let start = Instant::now();
        let mut task = Task::new(TaskId(1), noop(), ms(10), true, start);

        task.reschedule(start + ms(45), MissedTicks::Skip);
        assert_eq!(task.next, start + ms(50));
        assert_eq!(task.times, 5);

        // Exactly on a tick counts as missed
        task.reschedule(start + ms(60), MissedTicks::Skip);
        assert_eq!(task.next, start + ms(70));
    }

    #[test]
    fn test_huge_interval_saturates() {
        let start = Instant::now();
        let mut task = Task::new(TaskId(1), noop(), Duration::MAX, true, start);
        assert_eq!(task.next, far_future(start));

        task.reschedule(start + ms(1), MissedTicks::CatchUp);
        assert_eq!(task.next, far_future(start));
        assert_eq!(task.times, 2);
    }

    #[test]
    fn test_times_saturates() {
        let start = Instant::now();
        let mut task = Task::new(TaskId(1), noop(), Duration::from_nanos(1), true, start);
        task.times = u32::MAX;

        task.reschedule(start, MissedTicks::CatchUp);
        assert_eq!(task.times, u32::MAX);
        assert_eq!(task.next, start + Duration::from_nanos(u64::from(u32::MAX)));
    }

    #[test]
    fn test_by_deadline_breaks_ties_by_id() {
        let start = Instant::now();
        let early = Task::new(TaskId(2), noop(), ms(5), false, start);
        let late = Task::new(TaskId(1), noop(), ms(9), false, start);
        let tie = Task::new(TaskId(3), noop(), ms(5), false, start);

        assert_eq!(ByDeadline.compare(&early, &late), Ordering::Less);
        assert_eq!(ByDeadline.compare(&early, &tie), Ordering::Less);
        assert_eq!(ByDeadline.compare(&tie, &early), Ordering::Greater);
    }

    #[test]
    fn test_panic_message_extraction() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        let err = TaskError::from_panic(TaskId(4), &*payload);
        assert_eq!(err.to_string(), "task#4 panicked: boom");

        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        let err = TaskError::from_panic(TaskId(5), &*payload);
        assert_eq!(err.task_id(), TaskId(5));
        assert_eq!(err.to_string(), "task#5 panicked: bang");
    }

    #[test]
    fn test_failed_display_includes_source() {
        let err = TaskError::Failed {
            id: TaskId(9),
            source: anyhow::anyhow!("disk full"),
        };
        assert_eq!(err.to_string(), "task#9 failed: disk full");
    }
}
