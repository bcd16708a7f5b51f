//! Sequence containers and a single-timer task scheduler.
//!
//! - [`Deque`]: double-ended queue over fixed-size buckets, O(1) at both
//!   ends, growing by whole buckets and never moving stored items in place.
//! - [`Heap`]: binary heap with a pluggable [`Compare`] ordering.
//! - [`Queue`] and [`Stack`]: FIFO and LIFO views over any [`Sequence`].
//! - [`Scheduler`]: many deferred or repeating tasks multiplexed onto one
//!   armed [`TimerDriver`] timer, with lazy cancellation.

pub mod container;
pub mod deque;
pub mod heap;
mod queue;
pub mod scheduler;
mod stack;

pub use container::{Container, Sequence};
pub use deque::{DEFAULT_BUCKET_SIZE, Deque, LargeDeque, SmallDeque};
pub use heap::{ByKey, Compare, Drain, Heap, MaxOrder, MinOrder, PriorityQueue};
pub use queue::Queue;
pub use scheduler::{
    ArmHandle, Callback, MIN_PERIOD, ManualDriver, MissedTicks, Scheduler, SchedulerConfig,
    SleepDriver, TaskError, TaskId, TimerDriver,
};
pub use stack::Stack;
