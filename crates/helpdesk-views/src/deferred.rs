//! Delayed state publication.
//!
//! A [`Deferred`] owns one piece of view state behind a watch channel.
//! Updates can be applied now or scheduled to land after a delay on a tokio
//! task; every scheduled task carries a [`CancellationToken`] so it can be
//! withdrawn before it fires.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// What happens to an outstanding update when another one is scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Overlap {
    /// Cancel the outstanding update; the newest request wins.
    #[default]
    Supersede,
    /// Let both fire; whichever lands last wins.
    Independent,
}

impl Overlap {
    pub fn from_supersede(supersede: bool) -> Self {
        if supersede {
            Self::Supersede
        } else {
            Self::Independent
        }
    }
}

pub type Update<T> = Box<dyn FnOnce(&mut T) + Send + 'static>;

/// One step of a scheduled sequence: wait `after`, then apply `update`.
pub struct Step<T> {
    pub after: Duration,
    pub update: Update<T>,
}

impl<T> Step<T> {
    pub fn new(after: Duration, update: impl FnOnce(&mut T) + Send + 'static) -> Self {
        Self { after, update: Box::new(update) }
    }
}

pub struct Deferred<T> {
    name: &'static str,
    tx: Arc<watch::Sender<T>>,
    overlap: Overlap,
    pending: Arc<AtomicUsize>,
    root: CancellationToken,
    latest: Option<CancellationToken>,
}

impl<T> Deferred<T>
where
    T: Send + Sync + 'static,
{
    pub fn new(name: &'static str, initial: T, overlap: Overlap) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            name,
            tx: Arc::new(tx),
            overlap,
            pending: Arc::new(AtomicUsize::new(0)),
            root: CancellationToken::new(),
            latest: None,
        }
    }

    pub fn overlap(&self) -> Overlap {
        self.overlap
    }

    pub fn borrow(&self) -> watch::Ref<'_, T> {
        self.tx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<T> {
        self.tx.subscribe()
    }

    /// Scheduled updates that have neither fired nor been cancelled.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    pub fn is_pending(&self) -> bool {
        self.pending() > 0
    }

    /// Apply `update` immediately. Outstanding scheduled updates are left alone.
    pub fn update_now(&self, update: impl FnOnce(&mut T)) {
        self.tx.send_modify(update);
    }

    pub fn set_now(&self, value: T) {
        self.tx.send_replace(value);
    }

    /// Replace the value after `delay`.
    pub fn schedule(&mut self, delay: Duration, value: T) -> JoinHandle<bool> {
        self.schedule_steps(vec![Step::new(delay, move |v: &mut T| *v = value)])
    }

    /// Apply `update` to the value after `delay`.
    pub fn schedule_update(&mut self, delay: Duration, update: impl FnOnce(&mut T) + Send + 'static) -> JoinHandle<bool> {
        self.schedule_steps(vec![Step::new(delay, update)])
    }

    /// Run `steps` in order on one task, each after its own delay. The whole
    /// sequence is cancelled as a unit. The handle resolves to `true` when
    /// every step was applied.
    pub fn schedule_steps(&mut self, steps: Vec<Step<T>>) -> JoinHandle<bool> {
        self.schedule_steps_with(self.overlap, steps)
    }

    /// [`schedule_steps`](Self::schedule_steps) with the overlap policy chosen
    /// for this call. An `Independent` sequence neither cancels outstanding
    /// work nor is cancelled by later superseding work; only `cancel_all`
    /// and drop reach it.
    pub fn schedule_steps_with(&mut self, overlap: Overlap, steps: Vec<Step<T>>) -> JoinHandle<bool> {
        let token = self.root.child_token();
        if overlap == Overlap::Supersede {
            if let Some(previous) = self.latest.replace(token.clone()) {
                if !previous.is_cancelled() {
                    tracing::debug!(state = self.name, "superseding outstanding update");
                    previous.cancel();
                }
            }
        }

        let tx = Arc::clone(&self.tx);
        let pending = Arc::clone(&self.pending);
        let name = self.name;
        pending.fetch_add(1, Ordering::SeqCst);
        let total: Duration = steps.iter().map(|s| s.after).sum();
        tracing::debug!(state = name, steps = steps.len(), delay_ms = total.as_millis() as u64, "scheduled update");

        tokio::spawn(async move {
            let mut completed = true;
            for step in steps {
                tokio::select! {
                    biased;
                    () = token.cancelled() => {
                        completed = false;
                        break;
                    }
                    () = tokio::time::sleep(step.after) => {
                        tx.send_modify(step.update);
                    }
                }
            }
            pending.fetch_sub(1, Ordering::SeqCst);
            if !completed {
                tracing::debug!(state = name, "update cancelled");
            }
            completed
        })
    }

    /// Withdraw every outstanding scheduled update.
    pub fn cancel_all(&mut self) {
        std::mem::replace(&mut self.root, CancellationToken::new()).cancel();
        self.latest = None;
    }
}

impl<T: Clone> Deferred<T> {
    pub fn get(&self) -> T {
        self.tx.borrow().clone()
    }
}

impl<T> Drop for Deferred<T> {
    fn drop(&mut self) {
        self.root.cancel();
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deferred")
            .field("name", &self.name)
            .field("value", &*self.tx.borrow())
            .field("overlap", &self.overlap)
            .field("pending", &self.pending.load(Ordering::SeqCst))
            .finish()
    }
}
