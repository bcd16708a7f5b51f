use std::{
    fmt::Debug,
    time::{Duration, Instant},
};

/// Single-shot platform timer.
///
/// A [`Scheduler`](crate::Scheduler) owns exactly one driver and keeps at
/// most one timer armed on it at a time.
pub trait TimerDriver {
    type Handle: Copy + Eq + Debug;

    fn now(&self) -> Instant;

    /// Arm the timer to expire `delay` from now, replacing any armed timer.
    fn arm(&mut self, delay: Duration) -> Self::Handle;

    /// Disarm a previously armed timer. Stale handles are ignored.
    fn disarm(&mut self, handle: Self::Handle);

    /// Block until the armed timer expires and return `true`.
    ///
    /// Returns `false` without consuming the timer if `limit` comes first,
    /// in which case the driver waits until `limit`. Returns `false`
    /// immediately when nothing is armed and there is no limit.
    ///
    /// Must never return `true` before the armed deadline.
    fn wait(&mut self, limit: Option<Instant>) -> bool;
}

/// Identifies one call to [`TimerDriver::arm`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArmHandle(u64);

#[derive(Debug, Clone, Copy)]
struct ArmedTimer {
    handle: ArmHandle,
    deadline: Instant,
}

/// Stand-in for deadlines too far out for [`Instant`] to represent.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// About thirty years after `from`.
pub(crate) fn far_future(from: Instant) -> Instant {
    from.checked_add(FAR_FUTURE).unwrap_or(from)
}

/// `from + delay`, saturating to [`far_future`] instead of overflowing.
pub(crate) fn deadline_after(from: Instant, delay: Duration) -> Instant {
    from.checked_add(delay).unwrap_or_else(|| far_future(from))
}

// ==================== SleepDriver ====================

/// Wall-clock driver that blocks the calling thread with
/// [`std::thread::sleep`].
#[derive(Debug, Default)]
pub struct SleepDriver {
    armed: Option<ArmedTimer>,
    generation: u64,
}

impl SleepDriver {
    pub fn new() -> Self {
        Self::default()
    }

    fn sleep_until(deadline: Instant) {
        // sleep may wake early on some platforms
        loop {
            let now = Instant::now();
            if now >= deadline {
                break;
            }
            std::thread::sleep(deadline - now);
        }
    }
}

impl TimerDriver for SleepDriver {
    type Handle = ArmHandle;

    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn arm(&mut self, delay: Duration) -> ArmHandle {
        self.generation += 1;
        let handle = ArmHandle(self.generation);
        self.armed = Some(ArmedTimer {
            handle,
            deadline: deadline_after(Instant::now(), delay),
        });
        handle
    }

    fn disarm(&mut self, handle: ArmHandle) {
        if self.armed.is_some_and(|armed| armed.handle == handle) {
            self.armed = None;
        }
    }

    fn wait(&mut self, limit: Option<Instant>) -> bool {
        match self.armed {
            Some(armed) if limit.is_none_or(|limit| armed.deadline <= limit) => {
                Self::sleep_until(armed.deadline);
                self.armed = None;
                true
            }
            _ => {
                if let Some(limit) = limit {
                    Self::sleep_until(limit);
                }
                false
            }
        }
    }
}

// ==================== ManualDriver ====================

/// Virtual-clock driver. Waiting jumps the clock straight to the deadline,
/// so schedules can be replayed deterministically and instantly.
#[derive(Debug)]
pub struct ManualDriver {
    now: Instant,
    armed: Option<ArmedTimer>,
    generation: u64,
    arms: usize,
}

impl Default for ManualDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualDriver {
    pub fn new() -> Self {
        Self::with_epoch(Instant::now())
    }

    pub fn with_epoch(epoch: Instant) -> Self {
        Self {
            now: epoch,
            armed: None,
            generation: 0,
            arms: 0,
        }
    }

    /// Move the clock forward without firing anything.
    pub fn advance(&mut self, by: Duration) {
        self.now = deadline_after(self.now, by);
    }

    pub fn armed_deadline(&self) -> Option<Instant> {
        self.armed.map(|armed| armed.deadline)
    }

    /// How many times the timer has been armed so far.
    pub fn arm_count(&self) -> usize {
        self.arms
    }
}

impl TimerDriver for ManualDriver {
    type Handle = ArmHandle;

    #[inline]
    fn now(&self) -> Instant {
        self.now
    }

    fn arm(&mut self, delay: Duration) -> ArmHandle {
        self.generation += 1;
        self.arms += 1;
        let handle = ArmHandle(self.generation);
        self.armed = Some(ArmedTimer {
            handle,
            deadline: deadline_after(self.now, delay),
        });
        handle
    }

    fn disarm(&mut self, handle: ArmHandle) {
        if self.armed.is_some_and(|armed| armed.handle == handle) {
            self.armed = None;
        }
    }

    fn wait(&mut self, limit: Option<Instant>) -> bool {
        match self.armed {
            Some(armed) if limit.is_none_or(|limit| armed.deadline <= limit) => {
                self.now = self.now.max(armed.deadline);
                self.armed = None;
                true
            }
            _ => {
                if let Some(limit) = limit {
                    self.now = self.now.max(limit);
                }
                false
            }
        }
    }
}
