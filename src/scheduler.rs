//! Deferred and repeating tasks multiplexed onto one platform timer.
//!
//! Pending tasks sit in a [`Heap`] ordered by their next fire time. Only the
//! earliest one has the driver's timer armed for it. When the timer fires
//! the scheduler pops that task, runs it, puts it back if it repeats, and
//! arms the timer for whatever is earliest now.
//!
//! Cancellation is lazy: [`Scheduler::cancel`] only records a tombstone,
//! and the task is thrown away when it reaches the front of the heap.
//!
//! # Example
//!
//! ```
//! use std::{cell::Cell, rc::Rc, time::Duration};
//! use taskheap::{ManualDriver, Scheduler};
//!
//! let mut scheduler = Scheduler::with_driver(ManualDriver::new());
//! let ticks = Rc::new(Cell::new(0));
//!
//! let counter = Rc::clone(&ticks);
//! let id = scheduler.set_interval(
//!     move |_| {
//!         counter.set(counter.get() + 1);
//!         Ok(())
//!     },
//!     Duration::from_millis(10),
//! );
//!
//! scheduler.run_for(Duration::from_millis(35));
//! assert_eq!(ticks.get(), 3);
//!
//! scheduler.clear_interval(id);
//! scheduler.run();
//! assert_eq!(ticks.get(), 3);
//! ```

mod driver;
mod task;

use std::{
    collections::HashSet,
    panic::{self, AssertUnwindSafe},
    time::{Duration, Instant},
};

pub use driver::{ArmHandle, ManualDriver, SleepDriver, TimerDriver};
pub use task::{Callback, TaskError, TaskId};

use crate::heap::Heap;
use driver::deadline_after;
use task::{ByDeadline, Task};

pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Floor under any configured `min_period`. A zero period would never let
/// the clock move.
const MIN_REPEAT: Duration = Duration::from_nanos(1);

/// What a repeating task does after it fell behind its cadence, e.g.
/// because a callback ran long.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissedTicks {
    /// Fire once for every missed tick, back to back, until caught up.
    #[default]
    CatchUp,
    /// Drop missed ticks and resume at the next tick after now.
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulerConfig {
    /// Repeat intervals below this are raised to it. Never below 1ns.
    pub min_period: Duration,
    pub missed_ticks: MissedTicks,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            min_period: MIN_PERIOD,
            missed_ticks: MissedTicks::CatchUp,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Armed<H> {
    handle: H,
    task: TaskId,
    at: Instant,
}

type ErrorHook = Box<dyn FnMut(TaskId, &TaskError)>;

/// Single-threaded task scheduler.
///
/// # Ownership
///
/// The scheduler owns its heap, its tombstones, its driver and the one
/// armed timer. Task ids come from a per-instance counter, so ids from two
/// schedulers are never interchangeable.
///
/// # Re-entrancy
///
/// Callbacks get `&mut Scheduler` and may schedule or cancel anything,
/// including the task that is running. The running task has already been
/// popped, so there is no aliasing with the heap.
pub struct Scheduler<D: TimerDriver = SleepDriver> {
    tasks: Heap<Task<D>, ByDeadline>,
    cancelled: HashSet<TaskId>,
    live: HashSet<TaskId>,
    armed: Option<Armed<D::Handle>>,
    driver: D,
    config: SchedulerConfig,
    next_id: u64,
    error_hook: Option<ErrorHook>,
}

impl Default for Scheduler<SleepDriver> {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler<SleepDriver> {
    pub fn new() -> Self {
        Self::with_driver(SleepDriver::new())
    }
}

impl<D: TimerDriver> Scheduler<D> {
    pub fn with_driver(driver: D) -> Self {
        Self::with_config(driver, SchedulerConfig::default())
    }

    pub fn with_config(driver: D, config: SchedulerConfig) -> Self {
        Self {
            tasks: Heap::with_order(ByDeadline),
            cancelled: HashSet::new(),
            live: HashSet::new(),
            armed: None,
            driver,
            config,
            next_id: 1,
            error_hook: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    #[inline]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Direct access to the driver, e.g. to move a manual clock.
    #[inline]
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    /// Install a hook that sees every task failure, in addition to the
    /// `tracing` error event.
    pub fn on_error<F>(&mut self, hook: F)
    where
        F: FnMut(TaskId, &TaskError) + 'static,
    {
        self.error_hook = Some(Box::new(hook));
    }

    /// Schedule `callback` to run `delay` from now, and every `delay`
    /// thereafter if `repeat` is set.
    pub fn schedule<F>(&mut self, callback: F, delay: Duration, repeat: bool) -> TaskId
    where
        F: FnMut(&mut Self) -> anyhow::Result<()> + 'static,
    {
        let now = self.driver.now();
        let interval = if repeat {
            delay.max(self.config.min_period).max(MIN_REPEAT)
        } else {
            delay
        };

        let id = TaskId(self.next_id);
        self.next_id += 1;

        self.live.insert(id);
        self.tasks
            .push(Task::new(id, Box::new(callback), interval, repeat, now));
        tracing::trace!(task = %id, ?interval, repeat, "task scheduled");

        self.rearm();
        id
    }

    /// Like [`schedule`](Scheduler::schedule), with `args` handed to every
    /// invocation.
    pub fn schedule_with<A, F>(
        &mut self,
        mut args: A,
        mut callback: F,
        delay: Duration,
        repeat: bool,
    ) -> TaskId
    where
        A: 'static,
        F: FnMut(&mut Self, &mut A) -> anyhow::Result<()> + 'static,
    {
        self.schedule(move |scheduler| callback(scheduler, &mut args), delay, repeat)
    }

    pub fn set_timeout<F>(&mut self, callback: F, delay: Duration) -> TaskId
    where
        F: FnMut(&mut Self) -> anyhow::Result<()> + 'static,
    {
        self.schedule(callback, delay, false)
    }

    pub fn set_interval<F>(&mut self, callback: F, period: Duration) -> TaskId
    where
        F: FnMut(&mut Self) -> anyhow::Result<()> + 'static,
    {
        self.schedule(callback, period, true)
    }

    /// Cancel a one-shot or repeating task. See [`cancel`](Scheduler::cancel).
    #[inline]
    pub fn clear_timeout(&mut self, id: TaskId) -> bool {
        self.cancel(id)
    }

    #[inline]
    pub fn clear_interval(&mut self, id: TaskId) -> bool {
        self.cancel(id)
    }

    /// Tombstone a task so it never fires again.
    ///
    /// Returns `false` for ids that already finished, were already
    /// cancelled, or were never issued. A callback that is running right
    /// now is not interrupted, but it will not be rescheduled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        if !self.live.contains(&id) {
            return false;
        }
        let tombstoned = self.cancelled.insert(id);
        if tombstoned {
            tracing::trace!(task = %id, "task cancelled");
        }
        tombstoned
    }

    /// `true` while the task may still fire.
    #[inline]
    pub fn is_scheduled(&self, id: TaskId) -> bool {
        self.live.contains(&id) && !self.cancelled.contains(&id)
    }

    /// Number of tasks that may still fire.
    #[inline]
    pub fn pending(&self) -> usize {
        self.live.len() - self.cancelled.len()
    }

    #[inline]
    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }

    /// When the armed timer is due, if one is armed.
    #[inline]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.armed.map(|armed| armed.at)
    }

    /// Platform-timer fire entry point.
    ///
    /// Runs the earliest due task, if any, after discarding cancelled tasks
    /// in front of it, then re-arms for the next one. Returns the number of
    /// callbacks invoked.
    pub fn fire(&mut self) -> usize {
        // The platform timer is single-shot; whatever was armed is spent.
        // Called off-timer, the driver may still hold it.
        if let Some(armed) = self.armed.take() {
            self.driver.disarm(armed.handle);
            tracing::trace!(task = %armed.task, "timer fired");
        }

        let now = self.driver.now();
        self.discard_cancelled();

        let due = self.tasks.peek().is_some_and(|task| task.next <= now);
        let fired = match due.then(|| self.tasks.pop()).flatten() {
            Some(task) => {
                self.execute(task);
                1
            }
            None => 0,
        };

        self.discard_cancelled();
        self.rearm();
        fired
    }

    /// Drive the timer until no task is pending. Returns the number of
    /// callbacks invoked.
    ///
    /// Never returns while an uncancelled repeating task exists.
    pub fn run(&mut self) -> usize {
        let mut fired = 0;
        while self.armed.is_some() {
            if !self.driver.wait(None) {
                break;
            }
            fired += self.fire();
        }
        fired
    }

    /// Drive the timer until `deadline`, firing everything due by then.
    pub fn run_until(&mut self, deadline: Instant) -> usize {
        let mut fired = 0;
        while self.driver.wait(Some(deadline)) {
            fired += self.fire();
        }
        fired
    }

    pub fn run_for(&mut self, duration: Duration) -> usize {
        let deadline = deadline_after(self.driver.now(), duration);
        self.run_until(deadline)
    }

    fn execute(&mut self, mut task: Task<D>) {
        let id = task.id;
        tracing::trace!(task = %id, times = task.times, "running task");

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| (task.callback)(self)));
        let error = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(source)) => Some(TaskError::Failed { id, source }),
            Err(payload) => Some(TaskError::from_panic(id, &*payload)),
        };
        if let Some(error) = error {
            self.report(&error);
        }

        if task.repeat && !self.cancelled.contains(&id) {
            task.reschedule(self.driver.now(), self.config.missed_ticks);
            self.tasks.push(task);
        } else {
            self.finalize(id);
        }
    }

    fn report(&mut self, error: &TaskError) {
        let id = error.task_id();
        tracing::error!(task = %id, error = %error, "scheduled task failed");
        if let Some(hook) = self.error_hook.as_mut() {
            hook(id, error);
        }
    }

    /// Drop tombstoned tasks sitting at the front of the heap.
    fn discard_cancelled(&mut self) {
        while let Some(task) = self.tasks.peek() {
            if !self.cancelled.contains(&task.id) {
                break;
            }
            let id = task.id;
            self.tasks.pop();
            self.finalize(id);
            tracing::debug!(task = %id, "discarded cancelled task");
        }
    }

    fn finalize(&mut self, id: TaskId) {
        self.cancelled.remove(&id);
        self.live.remove(&id);
    }

    /// Arm the timer for the earliest task if nothing is armed or it is due
    /// sooner than the armed one. Otherwise leave the timer alone.
    fn rearm(&mut self) {
        let Some(earliest) = self.tasks.peek() else {
            return;
        };
        let (task, at) = (earliest.id, earliest.next);

        if let Some(armed) = self.armed {
            if at >= armed.at {
                return;
            }
            self.driver.disarm(armed.handle);
        }

        let delay = at.saturating_duration_since(self.driver.now());
        let handle = self.driver.arm(delay);
        self.armed = Some(Armed { handle, task, at });
        tracing::trace!(task = %task, ?delay, "timer armed");
    }
}
