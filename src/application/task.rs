//! Background operations
//!
//! An export or import runs on its own thread. Progress and the final outcome
//! are sent back over a channel and delivered on the thread that calls
//! [`OperationHandle::wait`], so callbacks can touch caller-owned state.

use crate::error::{NotepadError, Result};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Weak};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Cooperative cancellation flag, checked once before an operation starts
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        CancelToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Message from a running operation
#[derive(Debug)]
pub enum OperationEvent<T> {
    /// Percentage complete, 0..=100
    Progress(u8),
    /// Terminal outcome, sent exactly once
    Finished(Result<T>),
}

/// Forwards progress percentages, dropping any that would go backwards
pub struct ProgressReporter<F: FnMut(u8)> {
    last: Option<u8>,
    sink: F,
}

impl<F: FnMut(u8)> ProgressReporter<F> {
    pub fn new(sink: F) -> Self {
        ProgressReporter { last: None, sink }
    }

    pub fn report(&mut self, percent: u8) {
        let percent = percent.min(100);
        if self.last.is_some_and(|last| percent <= last) {
            return;
        }
        self.last = Some(percent);
        (self.sink)(percent);
    }
}

/// Caller-side end of a background operation
pub struct OperationHandle<T> {
    label: &'static str,
    events: Receiver<OperationEvent<T>>,
    cancel: CancelToken,
    worker: Option<JoinHandle<()>>,
}

impl<T> OperationHandle<T> {
    /// Request cancellation; only honored if the operation has not started yet
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Block until the operation finishes, calling `on_progress` for each update
    pub fn wait(mut self, mut on_progress: impl FnMut(u8)) -> Result<T> {
        let outcome = loop {
            match self.events.recv() {
                Ok(OperationEvent::Progress(percent)) => on_progress(percent),
                Ok(OperationEvent::Finished(result)) => break result,
                Err(_) => {
                    break Err(NotepadError::TaskFailed(format!(
                        "{} stopped without reporting a result",
                        self.label
                    )))
                }
            }
        };

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!(operation = self.label, "worker thread panicked");
            }
        }

        outcome
    }
}

/// Run `work` against `owner` on a background thread.
///
/// The thread keeps only a weak reference to `owner`; if the owner is gone
/// by the time the thread starts, the outcome is `CoordinatorGone`.
pub fn spawn_operation<M, T, F>(
    owner: &Arc<M>,
    label: &'static str,
    cancel: CancelToken,
    work: F,
) -> OperationHandle<T>
where
    M: Send + Sync + 'static,
    T: Send + 'static,
    F: FnOnce(&M, &mut dyn FnMut(u8)) -> Result<T> + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    let owner = Arc::downgrade(owner);
    let token = cancel.clone();
    let worker_tx = tx.clone();

    let spawned = thread::Builder::new()
        .name(format!("notepad-{}", label))
        .spawn(move || {
            let outcome = run_operation(&owner, label, &token, &worker_tx, work);
            // The handle may already have been dropped.
            let _ = worker_tx.send(OperationEvent::Finished(outcome));
        });

    let worker = match spawned {
        Ok(handle) => Some(handle),
        Err(err) => {
            let _ = tx.send(OperationEvent::Finished(Err(NotepadError::Io(err))));
            None
        }
    };

    OperationHandle {
        label,
        events: rx,
        cancel,
        worker,
    }
}

fn run_operation<M, T, F>(
    owner: &Weak<M>,
    label: &'static str,
    token: &CancelToken,
    events: &Sender<OperationEvent<T>>,
    work: F,
) -> Result<T>
where
    F: FnOnce(&M, &mut dyn FnMut(u8)) -> Result<T>,
{
    if token.is_cancelled() {
        info!(operation = label, "cancelled before start");
        return Err(NotepadError::Cancelled(label.to_string()));
    }

    let Some(owner) = owner.upgrade() else {
        warn!(operation = label, "owner dropped before start");
        return Err(NotepadError::CoordinatorGone(format!("{} coordinator", label)));
    };

    debug!(operation = label, "started");
    let mut reporter = ProgressReporter::new(|percent| {
        let _ = events.send(OperationEvent::Progress(percent));
    });
    work(&owner, &mut |percent| reporter.report(percent))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter {
        steps: u8,
    }

    #[test]
    fn test_progress_reporter_is_monotonic() {
        let mut seen = Vec::new();
        {
            let mut reporter = ProgressReporter::new(|p| seen.push(p));
            for p in [10, 5, 10, 50, 200, 100] {
                reporter.report(p);
            }
        }
        assert_eq!(seen, vec![10, 50, 100]);
    }

    #[test]
    fn test_operation_delivers_progress_then_outcome() {
        let owner = Arc::new(Counter { steps: 4 });
        let handle = spawn_operation(&owner, "count", CancelToken::new(), |counter, progress| {
            for step in 1..=counter.steps {
                progress(step * 25);
            }
            Ok(counter.steps)
        });

        let mut seen = Vec::new();
        let outcome = handle.wait(|p| seen.push(p)).unwrap();

        assert_eq!(outcome, 4);
        assert_eq!(seen, vec![25, 50, 75, 100]);
    }

    #[test]
    fn test_error_outcome_is_delivered() {
        let owner = Arc::new(Counter { steps: 1 });
        let handle: OperationHandle<()> =
            spawn_operation(&owner, "fail", CancelToken::new(), |_, _| {
                Err(NotepadError::Storage("disk full".to_string()))
            });

        assert!(matches!(handle.wait(|_| {}), Err(NotepadError::Storage(_))));
    }

    #[test]
    fn test_cancelled_before_start() {
        let owner = Arc::new(Counter { steps: 1 });
        let token = CancelToken::new();
        token.cancel();

        let handle = spawn_operation(&owner, "export", token, |_, _| {
            panic!("work must not run after cancellation")
        });
        let result: Result<()> = handle.wait(|_| {});

        match result {
            Err(NotepadError::Cancelled(label)) => assert_eq!(label, "export"),
            other => panic!("Expected Cancelled, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_dropped_owner_is_reported() {
        let owner = Arc::new(Counter { steps: 1 });
        let weak = Arc::downgrade(&owner);
        drop(owner);

        let (tx, _rx) = mpsc::channel::<OperationEvent<()>>();
        let result = run_operation(&weak, "import", &CancelToken::new(), &tx, |_, _| Ok(()));

        assert!(matches!(result, Err(NotepadError::CoordinatorGone(_))));
    }

    #[test]
    fn test_panicking_worker_reports_task_failure() {
        let owner = Arc::new(Counter { steps: 1 });
        let handle: OperationHandle<()> =
            spawn_operation(&owner, "boom", CancelToken::new(), |_, _| panic!("boom"));

        assert!(matches!(
            handle.wait(|_| {}),
            Err(NotepadError::TaskFailed(_))
        ));
    }
}
