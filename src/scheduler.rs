//! delayed and repeating callbacks measured in ticks

use std::sync::{
    Arc, Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
};

pub type Task = Box<dyn FnOnce() + Send + 'static>;
pub type RepeatingTask = Box<dyn FnMut() + Send + 'static>;

pub trait Scheduler: Send + Sync {
    fn schedule_once(&self, delay_ticks: u32, task: Task);
    fn schedule_repeating(&self, interval_ticks: u32, task: RepeatingTask) -> TaskHandle;
}

/// Cancels a repeating task. Cloning shares the same flag.
#[derive(Debug, Clone, Default)]
pub struct TaskHandle {
    cancelled: Arc<AtomicBool>,
}

impl TaskHandle {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

enum Job {
    Once(Task),
    Repeating {
        task: RepeatingTask,
        interval: u32,
        handle: TaskHandle,
    },
}

struct Entry {
    due: u64,
    seq: u64,
    job: Job,
}

#[derive(Default)]
struct ClockState {
    now: u64,
    next_seq: u64,
    entries: Vec<Entry>,
}

/// Scheduler driven by explicit `tick` calls. Tasks run on the ticking thread, in due order,
/// and may schedule more work while running.
#[derive(Default)]
pub struct TickScheduler {
    state: Mutex<ClockState>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u64 {
        self.lock().now
    }

    /// Number of queued tasks, including repeating ones that were cancelled but not yet reaped.
    pub fn pending(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn advance(&self, ticks: u32) {
        for _ in 0..ticks {
            self.tick();
        }
    }

    pub fn tick(&self) {
        let (now, mut due) = {
            let mut state = self.lock();
            state.now += 1;
            let now = state.now;
            let (due, waiting): (Vec<Entry>, Vec<Entry>) =
                state.entries.drain(..).partition(|entry| entry.due <= now);
            state.entries = waiting;
            (now, due)
        };
        due.sort_by_key(|entry| (entry.due, entry.seq));

        for entry in due {
            match entry.job {
                Job::Once(task) => task(),
                Job::Repeating {
                    mut task,
                    interval,
                    handle,
                } => {
                    if handle.is_cancelled() {
                        continue;
                    }
                    task();
                    if handle.is_cancelled() {
                        continue;
                    }
                    self.push(
                        now + u64::from(interval),
                        Job::Repeating {
                            task,
                            interval,
                            handle,
                        },
                    );
                }
            }
        }
    }

    fn push(&self, due: u64, job: Job) {
        let mut state = self.lock();
        let seq = state.next_seq;
        state.next_seq += 1;
        state.entries.push(Entry { due, seq, job });
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ClockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for TickScheduler {
    fn schedule_once(&self, delay_ticks: u32, task: Task) {
        let due = self.now() + u64::from(delay_ticks.max(1));
        self.push(due, Job::Once(task));
    }

    fn schedule_repeating(&self, interval_ticks: u32, task: RepeatingTask) -> TaskHandle {
        let interval = interval_ticks.max(1);
        let handle = TaskHandle::default();
        let due = self.now() + u64::from(interval);
        self.push(
            due,
            Job::Repeating {
                task,
                interval,
                handle: handle.clone(),
            },
        );
        handle
    }
}
