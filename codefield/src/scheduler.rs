//! # Repeating Tasks
//!
//! The panel-follow loop runs as a repeating task on a host scheduler rather
//! than on a thread of its own. Hosts with their own timer facility implement
//! [`Scheduler`] over it; hosts that only have a frame callback can use
//! [`FrameScheduler`] and feed it the elapsed time of every frame.
//!
//! ## Usage
//!
//! ```
//! use std::{
//!     sync::{Arc, atomic::{AtomicUsize, Ordering}},
//!     time::Duration,
//! };
//! use codefield::{FrameScheduler, Scheduler};
//!
//! let scheduler = FrameScheduler::new();
//! let runs = Arc::new(AtomicUsize::new(0));
//! let counter = runs.clone();
//! let handle = scheduler.schedule_repeating(
//!     Duration::from_millis(100),
//!     Box::new(move || {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     }),
//! );
//!
//! scheduler.advance(Duration::from_millis(250));
//! assert_eq!(runs.load(Ordering::SeqCst), 2);
//!
//! handle.cancel();
//! scheduler.advance(Duration::from_millis(250));
//! assert_eq!(runs.load(Ordering::SeqCst), 2);
//! ```

use std::{
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use parking_lot::Mutex;

/// Body of a repeating task.
pub type RepeatingTask = Box<dyn FnMut() + Send>;

/// Handle to a scheduled task.
///
/// Clones share the same task. Dropping a handle leaves the task running.
#[derive(Clone, Debug, Default)]
pub struct TaskHandle {
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle {
    /// Creates a handle for a task that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stops the task. Runs already in progress complete.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Whether [`cancel`](Self::cancel) was called on this task.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Host facility that runs tasks periodically on the UI thread.
pub trait Scheduler: Send + Sync {
    /// Runs `task` every `interval`, first after one full interval.
    fn schedule_repeating(&self, interval: Duration, task: RepeatingTask) -> TaskHandle;
}

struct ScheduledTask {
    interval: Duration,
    elapsed: Duration,
    task: RepeatingTask,
    handle: TaskHandle,
}

impl ScheduledTask {
    fn advance(&mut self, delta: Duration) {
        if self.interval.is_zero() {
            (self.task)();
            return;
        }
        self.elapsed += delta;
        while self.elapsed >= self.interval && !self.handle.is_cancelled() {
            self.elapsed -= self.interval;
            (self.task)();
        }
    }
}

/// A [`Scheduler`] driven by the host's frame loop.
///
/// Tasks run inside [`advance`](Self::advance), on the caller's thread. A task
/// whose interval elapsed several times during one advance runs once per
/// elapsed interval. A zero interval runs once per advance.
#[derive(Default)]
pub struct FrameScheduler {
    tasks: Mutex<Vec<ScheduledTask>>,
}

impl FrameScheduler {
    /// Creates a scheduler with no tasks.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock by `delta` and runs every task that came due.
    ///
    /// Tasks scheduled from inside a running task start counting from the
    /// next advance.
    pub fn advance(&self, delta: Duration) {
        let mut tasks = std::mem::take(&mut *self.tasks.lock());
        for task in &mut tasks {
            if !task.handle.is_cancelled() {
                task.advance(delta);
            }
        }
        tasks.retain(|task| !task.handle.is_cancelled());

        let mut slot = self.tasks.lock();
        tasks.append(&mut slot);
        *slot = tasks;
    }

    /// Number of tasks that have not been cancelled.
    pub fn active_tasks(&self) -> usize {
        self.tasks
            .lock()
            .iter()
            .filter(|task| !task.handle.is_cancelled())
            .count()
    }
}

impl Scheduler for FrameScheduler {
    fn schedule_repeating(&self, interval: Duration, task: RepeatingTask) -> TaskHandle {
        let handle = TaskHandle::new();
        self.tasks.lock().push(ScheduledTask {
            interval,
            elapsed: Duration::ZERO,
            task,
            handle: handle.clone(),
        });
        handle
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn counting_task(runs: &Arc<AtomicUsize>) -> RepeatingTask {
        let runs = runs.clone();
        Box::new(move || {
            runs.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn first_run_waits_one_interval() {
        let scheduler = FrameScheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));
        scheduler.schedule_repeating(Duration::from_millis(100), counting_task(&runs));

        scheduler.advance(Duration::from_millis(60));
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        scheduler.advance(Duration::from_millis(40));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn long_frames_catch_up() {
        let scheduler = FrameScheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));
        scheduler.schedule_repeating(Duration::from_millis(100), counting_task(&runs));

        scheduler.advance(Duration::from_millis(350));
        assert_eq!(runs.load(Ordering::SeqCst), 3);
        scheduler.advance(Duration::from_millis(50));
        assert_eq!(runs.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn cancelled_tasks_are_dropped() {
        let scheduler = FrameScheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));
        let handle =
            scheduler.schedule_repeating(Duration::from_millis(100), counting_task(&runs));
        assert_eq!(scheduler.active_tasks(), 1);

        handle.cancel();
        scheduler.advance(Duration::from_secs(1));
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert_eq!(scheduler.active_tasks(), 0);
    }

    #[test]
    fn zero_interval_runs_every_advance() {
        let scheduler = FrameScheduler::new();
        let runs = Arc::new(AtomicUsize::new(0));
        scheduler.schedule_repeating(Duration::ZERO, counting_task(&runs));

        scheduler.advance(Duration::from_millis(16));
        scheduler.advance(Duration::from_millis(16));
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }
}
