//! Deferred values whose readiness can be queried without suspending.
//!
//! A [`Tracked`] stands in for a resource that some other part of the page
//! will produce later: the audio context created by a click, the engine
//! module, a fetched patch. Consumers can `.await` it from async code or ask
//! [`Tracked::is_resolved`] from code that must never yield, such as the
//! gesture handler that creates the audio context.
//!
//! The first settlement wins. Later `resolve`/`reject` calls are ignored and
//! report `false`, so a producer that fires twice cannot replace a value that
//! has already been handed out.

use crate::scheduler::Spawner;
use smallvec::SmallVec;
use std::cell::RefCell;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackState {
    Pending,
    Resolved,
    Rejected,
}

impl TrackState {
    pub fn as_str(self) -> &'static str {
        match self {
            TrackState::Pending => "pending",
            TrackState::Resolved => "resolved",
            TrackState::Rejected => "rejected",
        }
    }

    pub fn is_settled(self) -> bool {
        self != TrackState::Pending
    }
}

impl fmt::Display for TrackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The failure a rejected tracker hands to its waiters.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
#[error("tracked resource was rejected: {0:?}")]
pub struct SettlementError<E>(pub E);

impl<E> SettlementError<E> {
    pub fn inner(&self) -> &E {
        &self.0
    }

    pub fn into_inner(self) -> E {
        self.0
    }
}

enum Slot<T, E> {
    Pending(SmallVec<[Waker; 2]>),
    Resolved(T),
    Rejected(E),
}

impl<T, E> Slot<T, E> {
    fn state(&self) -> TrackState {
        match self {
            Slot::Pending(_) => TrackState::Pending,
            Slot::Resolved(_) => TrackState::Resolved,
            Slot::Rejected(_) => TrackState::Rejected,
        }
    }
}

/// A value that becomes available exactly once at some unknown later time.
///
/// Clones share the same slot; any clone may settle it and every clone sees
/// the outcome.
pub struct Tracked<T, E> {
    slot: Rc<RefCell<Slot<T, E>>>,
}

impl<T, E> Clone for Tracked<T, E> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
        }
    }
}

impl<T, E> Default for Tracked<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for Tracked<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tracked")
            .field("state", &self.state())
            .finish()
    }
}

impl<T, E> Tracked<T, E> {
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot::Pending(SmallVec::new()))),
        }
    }

    pub fn state(&self) -> TrackState {
        self.slot.borrow().state()
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        self.state() == TrackState::Resolved
    }

    #[inline]
    pub fn is_rejected(&self) -> bool {
        self.state() == TrackState::Rejected
    }

    #[inline]
    pub fn is_settled(&self) -> bool {
        self.state().is_settled()
    }

    /// Settle with `value`. Returns `false` if the tracker was already settled.
    pub fn resolve(&self, value: T) -> bool {
        self.settle(Slot::Resolved(value))
    }

    /// Settle with `error`. Returns `false` if the tracker was already settled.
    pub fn reject(&self, error: E) -> bool {
        self.settle(Slot::Rejected(error))
    }

    fn settle(&self, outcome: Slot<T, E>) -> bool {
        let waiters = {
            let mut slot = self.slot.borrow_mut();
            if !matches!(*slot, Slot::Pending(_)) {
                return false;
            }
            match std::mem::replace(&mut *slot, outcome) {
                Slot::Pending(waiters) => waiters,
                _ => SmallVec::new(),
            }
        };
        // Wake outside the borrow so a waiter that re-enters sees the final state.
        for waker in waiters {
            waker.wake();
        }
        true
    }

    /// Future that completes once the tracker settles.
    pub fn wait(&self) -> Wait<T, E> {
        Wait {
            slot: self.slot.clone(),
        }
    }

    /// Mirror an already-started operation: resolve with its `Ok` value or
    /// reject with its `Err` value once `operation` finishes on `spawner`.
    pub fn adapt<S, F>(spawner: &S, operation: F) -> Self
    where
        S: Spawner + ?Sized,
        F: Future<Output = Result<T, E>> + 'static,
        T: 'static,
        E: 'static,
    {
        let tracked = Self::new();
        let producer = tracked.clone();
        spawner.spawn(Box::pin(async move {
            match operation.await {
                Ok(value) => {
                    producer.resolve(value);
                }
                Err(error) => {
                    producer.reject(error);
                }
            }
        }));
        tracked
    }

    /// Producer handle for callbacks that arrive from a foreign runtime.
    pub fn settler(&self, spawner: Rc<dyn Spawner>) -> Settler<T, E> {
        Settler {
            target: self.clone(),
            spawner,
        }
    }
}

impl<T: Clone, E> Tracked<T, E> {
    /// The resolved value, if any. Never suspends.
    pub fn value(&self) -> Option<T> {
        match &*self.slot.borrow() {
            Slot::Resolved(value) => Some(value.clone()),
            _ => None,
        }
    }
}

impl<T, E: Clone> Tracked<T, E> {
    /// The rejection error, if any. Never suspends.
    pub fn error(&self) -> Option<E> {
        match &*self.slot.borrow() {
            Slot::Rejected(error) => Some(error.clone()),
            _ => None,
        }
    }
}

/// Future returned by [`Tracked::wait`].
///
/// Dropping it before settlement is fine; the tracker still settles later.
pub struct Wait<T, E> {
    slot: Rc<RefCell<Slot<T, E>>>,
}

impl<T: Clone, E: Clone> Future for Wait<T, E> {
    type Output = Result<T, SettlementError<E>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut slot = self.slot.borrow_mut();
        match &mut *slot {
            Slot::Resolved(value) => Poll::Ready(Ok(value.clone())),
            Slot::Rejected(error) => Poll::Ready(Err(SettlementError(error.clone()))),
            Slot::Pending(waiters) => {
                if !waiters.iter().any(|w| w.will_wake(cx.waker())) {
                    waiters.push(cx.waker().clone());
                }
                Poll::Pending
            }
        }
    }
}

/// Settles a tracker by posting onto the cooperative queue.
///
/// Foreign code (the engine's worklet callback, RNBO events) may call in from
/// an arbitrary stack. Going through the queue keeps every state change on the
/// same task loop as the readers.
pub struct Settler<T, E> {
    target: Tracked<T, E>,
    spawner: Rc<dyn Spawner>,
}

impl<T, E> Clone for Settler<T, E> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
            spawner: self.spawner.clone(),
        }
    }
}

impl<T: 'static, E: 'static> Settler<T, E> {
    pub fn resolve(&self, value: T) {
        let target = self.target.clone();
        self.spawner.post(Box::new(move || {
            if !target.resolve(value) {
                log::debug!("ignoring duplicate resolve of {:?}", target);
            }
        }));
    }

    pub fn reject(&self, error: E) {
        let target = self.target.clone();
        self.spawner.post(Box::new(move || {
            if !target.reject(error) {
                log::debug!("ignoring duplicate reject of {:?}", target);
            }
        }));
    }
}

/// Wait on several trackers at once, yielding their values in order.
///
/// Fails with the first rejection found in slice order.
pub async fn wait_all<T: Clone, E: Clone>(
    trackers: &[Tracked<T, E>],
) -> Result<Vec<T>, SettlementError<E>> {
    let mut values = Vec::with_capacity(trackers.len());
    for tracked in trackers {
        values.push(tracked.wait().await?);
    }
    Ok(values)
}

/// Wait on two trackers of different types at once.
///
/// Completes with both values, or with whichever rejection is seen first.
pub fn wait_both<A, B, E>(first: &Tracked<A, E>, second: &Tracked<B, E>) -> WaitBoth<A, B, E> {
    WaitBoth {
        first: first.wait(),
        second: second.wait(),
        a: None,
        b: None,
    }
}

/// Future returned by [`wait_both`].
pub struct WaitBoth<A, B, E> {
    first: Wait<A, E>,
    second: Wait<B, E>,
    a: Option<A>,
    b: Option<B>,
}

// Neither value is ever pinned.
impl<A, B, E> Unpin for WaitBoth<A, B, E> {}

impl<A: Clone, B: Clone, E: Clone> Future for WaitBoth<A, B, E> {
    type Output = Result<(A, B), SettlementError<E>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.a.is_none() {
            if let Poll::Ready(result) = Pin::new(&mut this.first).poll(cx) {
                this.a = Some(result?);
            }
        }
        if this.b.is_none() {
            if let Poll::Ready(result) = Pin::new(&mut this.second).poll(cx) {
                this.b = Some(result?);
            }
        }
        match (this.a.take(), this.b.take()) {
            (Some(a), Some(b)) => Poll::Ready(Ok((a, b))),
            (a, b) => {
                this.a = a;
                this.b = b;
                Poll::Pending
            }
        }
    }
}
