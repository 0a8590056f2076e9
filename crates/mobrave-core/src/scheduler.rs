//! Cooperative, single-threaded task execution.
//!
//! Everything in the front-end runs on one logical thread and only yields at
//! `.await` points. [`Spawner`] is the seam between code that wants to start
//! background work and whatever actually drives it: the browser microtask
//! queue in the web frontend, or a [`TaskQueue`] on the host.

use fnv::FnvHashMap;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::task::{Context, Wake, Waker};

/// A boxed, non-`Send` future driven to completion by a [`Spawner`].
pub type LocalTask = Pin<Box<dyn Future<Output = ()>>>;

/// A plain closure posted onto the task queue.
pub type Job = Box<dyn FnOnce()>;

pub trait Spawner {
    fn spawn(&self, task: LocalTask);

    /// Queue `job` to run later on the cooperative thread instead of running
    /// it on the caller's stack.
    fn post(&self, job: Job) {
        self.spawn(Box::pin(async move { job() }));
    }
}

impl<S: Spawner + ?Sized> Spawner for Rc<S> {
    fn spawn(&self, task: LocalTask) {
        (**self).spawn(task)
    }

    fn post(&self, job: Job) {
        (**self).post(job)
    }
}

type ReadyQueue = Arc<Mutex<VecDeque<usize>>>;

struct TaskWaker {
    id: usize,
    ready: ReadyQueue,
}

impl Wake for TaskWaker {
    fn wake(self: Arc<Self>) {
        self.wake_by_ref();
    }

    fn wake_by_ref(self: &Arc<Self>) {
        if let Ok(mut queue) = self.ready.lock() {
            if !queue.contains(&self.id) {
                queue.push_back(self.id);
            }
        }
    }
}

#[derive(Default)]
struct Shared {
    jobs: RefCell<VecDeque<Job>>,
    tasks: RefCell<FnvHashMap<usize, LocalTask>>,
    ready: ReadyQueue,
    next_id: Cell<usize>,
    running: Cell<bool>,
}

/// Run queue used to drive tasks outside the browser.
///
/// Cloning yields another handle to the same queue. Posted jobs always run
/// before the next task poll, in the order they were posted.
#[derive(Clone, Default)]
pub struct TaskQueue {
    shared: Rc<Shared>,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of spawned tasks that have not completed yet.
    pub fn pending_tasks(&self) -> usize {
        self.shared.tasks.borrow().len()
    }

    /// Number of posted jobs waiting to run.
    pub fn queued_jobs(&self) -> usize {
        self.shared.jobs.borrow().len()
    }

    /// Run jobs and poll woken tasks until nothing can make progress.
    ///
    /// Returns the number of jobs run plus task polls made. Calling this from
    /// inside a running job or task returns 0 immediately.
    pub fn run_until_stalled(&self) -> usize {
        if self.shared.running.replace(true) {
            return 0;
        }
        let _running = RunningGuard(&self.shared.running);
        let mut steps = 0;
        loop {
            let job = self.shared.jobs.borrow_mut().pop_front();
            if let Some(job) = job {
                job();
                steps += 1;
                continue;
            }

            let next = self
                .shared
                .ready
                .lock()
                .ok()
                .and_then(|mut queue| queue.pop_front());
            let Some(id) = next else {
                break;
            };
            let task = self.shared.tasks.borrow_mut().remove(&id);
            let Some(mut task) = task else {
                continue;
            };

            let waker = Waker::from(Arc::new(TaskWaker {
                id,
                ready: self.shared.ready.clone(),
            }));
            let mut cx = Context::from_waker(&waker);
            steps += 1;
            if task.as_mut().poll(&mut cx).is_pending() {
                self.shared.tasks.borrow_mut().insert(id, task);
            }
        }
        steps
    }
}

/// Clears the running flag on exit, including when a job or task panics.
struct RunningGuard<'a>(&'a Cell<bool>);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl Spawner for TaskQueue {
    fn spawn(&self, task: LocalTask) {
        let id = self.shared.next_id.get();
        self.shared.next_id.set(id.wrapping_add(1));
        self.shared.tasks.borrow_mut().insert(id, task);
        if let Ok(mut queue) = self.shared.ready.lock() {
            queue.push_back(id);
        }
    }

    fn post(&self, job: Job) {
        self.shared.jobs.borrow_mut().push_back(job);
    }
}
