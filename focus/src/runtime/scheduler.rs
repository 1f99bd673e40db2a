//! Virtual-clock timers.
//!
//! Time only moves when [`Runtime::advance`](super::Runtime::advance) is
//! called. Due tasks run in due-time order, ties in scheduling order, and
//! each one runs to completion before the next starts.

use std::ops::ControlFlow;
use std::time::Duration;

use super::Runtime;

/// Handle returned by `set_timeout` / `set_interval`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

pub(crate) type OnceTask = Box<dyn FnOnce(&mut Runtime)>;
pub(crate) type RepeatTask = Box<dyn FnMut(&mut Runtime) -> ControlFlow<()>>;

pub(crate) enum Callback {
    Once(OnceTask),
    Repeat { period: Duration, task: RepeatTask },
}

pub(crate) struct Task {
    pub id: TimerId,
    pub due: Duration,
    seq: u64,
    pub callback: Callback,
}

/// Smallest interval period. Keeps a zero period from spinning forever
/// inside one `advance` call.
const MIN_PERIOD: Duration = Duration::from_millis(1);

#[derive(Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    next_seq: u64,
    tasks: Vec<Task>,
    running: Option<TimerId>,
    running_cleared: bool,
}

impl Scheduler {
    /// Time elapsed since the runtime was created.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of scheduled tasks.
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_scheduled(&self, id: TimerId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    pub(crate) fn schedule(&mut self, delay: Duration, callback: Callback) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.push(id, self.now + delay, callback);
        id
    }

    fn push(&mut self, id: TimerId, due: Duration, callback: Callback) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.tasks.push(Task {
            id,
            due,
            seq,
            callback,
        });
    }

    pub(crate) fn clear(&mut self, id: TimerId) {
        if self.running == Some(id) {
            self.running_cleared = true;
        }
        self.tasks.retain(|t| t.id != id);
    }

    /// Remove the earliest task due at or before `until` and move the clock
    /// to its due time.
    pub(crate) fn pop_due(&mut self, until: Duration) -> Option<Task> {
        let index = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= until)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(i, _)| i)?;
        let task = self.tasks.swap_remove(index);
        self.now = self.now.max(task.due);
        self.running = Some(task.id);
        self.running_cleared = false;
        Some(task)
    }

    /// Called after a task ran. Reschedules a repeating task unless it asked
    /// to stop or cleared itself.
    pub(crate) fn finish(&mut self, id: TimerId, due: Duration, next: Option<(Duration, RepeatTask)>) {
        let cleared = self.running_cleared;
        self.running = None;
        self.running_cleared = false;
        if let Some((period, task)) = next {
            if !cleared {
                let period = period.max(MIN_PERIOD);
                self.push(id, due + period, Callback::Repeat { period, task });
            }
        }
    }

    pub(crate) fn settle(&mut self, until: Duration) {
        self.now = self.now.max(until);
    }
}

impl Runtime {
    /// Run `task` once after `delay`.
    pub fn set_timeout(
        &mut self,
        delay: Duration,
        task: impl FnOnce(&mut Runtime) + 'static,
    ) -> TimerId {
        self.scheduler
            .schedule(delay, Callback::Once(Box::new(task)))
    }

    /// Run `task` every `period` until it returns [`ControlFlow::Break`] or
    /// the timer is cleared.
    pub fn set_interval(
        &mut self,
        period: Duration,
        task: impl FnMut(&mut Runtime) -> ControlFlow<()> + 'static,
    ) -> TimerId {
        self.scheduler.schedule(
            period,
            Callback::Repeat {
                period,
                task: Box::new(task),
            },
        )
    }

    pub fn clear_timer(&mut self, id: TimerId) {
        self.scheduler.clear(id);
    }

    /// Move the clock forward by `duration`, running every task that comes
    /// due on the way. `Duration::ZERO` runs the tasks that are due now.
    pub fn advance(&mut self, duration: Duration) {
        let until = self.scheduler.now() + duration;
        while let Some(task) = self.scheduler.pop_due(until) {
            let Task {
                id, due, callback, ..
            } = task;
            let next = match callback {
                Callback::Once(task) => {
                    task(self);
                    None
                }
                Callback::Repeat { period, mut task } => match task(self) {
                    ControlFlow::Continue(()) => Some((period, task)),
                    ControlFlow::Break(()) => None,
                },
            };
            self.scheduler.finish(id, due, next);
        }
        self.scheduler.settle(until);
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }
}
