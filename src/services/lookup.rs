use crate::Result;
use crossbeam_channel::{unbounded, Receiver, Sender};
use futures::Future;
use tokio::{runtime::Handle, task::JoinHandle};

/// Result of one lookup, tagged with the sequence number it was started with
struct Stamped<T> {
    sequence: u64,
    result: Result<T>,
}

/// Runs one lookup at a time on a tokio runtime and hands results to a
/// polling (UI) thread.
///
/// Starting a lookup aborts the one in flight. Every lookup gets a new
/// sequence number and [`poll`](Self::poll) only yields the result of the
/// latest one, so a slow answer to an old query never overwrites a newer one.
pub struct LookupTracker<T> {
    runtime: Handle,
    sender: Sender<Stamped<T>>,
    receiver: Receiver<Stamped<T>>,
    latest: u64,
    in_flight: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> LookupTracker<T> {
    pub fn new(runtime: Handle) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            runtime,
            sender,
            receiver,
            latest: 0,
            in_flight: None,
        }
    }

    /// Spawns `lookup`, superseding any lookup still running.
    /// Returns the new sequence number.
    pub fn start<F>(&mut self, lookup: F) -> u64
    where
        F: Future<Output = Result<T>> + Send + 'static,
    {
        self.abort_in_flight();
        self.latest += 1;
        let sequence = self.latest;

        let sender = self.sender.clone();
        self.in_flight = Some(self.runtime.spawn(async move {
            let result = lookup.await;
            // The tracker may be gone by now
            let _ = sender.send(Stamped { sequence, result });
        }));
        log::debug!("lookup #{} started", sequence);
        sequence
    }

    /// Aborts the running lookup; anything it already produced is discarded
    pub fn cancel(&mut self) {
        if self.in_flight.is_some() {
            self.abort_in_flight();
            self.latest += 1;
        }
    }

    /// Returns the latest lookup's result once it has arrived
    pub fn poll(&mut self) -> Option<Result<T>> {
        let mut current = None;
        for stamped in self.receiver.try_iter() {
            if stamped.sequence == self.latest {
                current = Some(stamped.result);
            } else {
                log::debug!(
                    "discarding stale lookup #{} (latest #{})",
                    stamped.sequence,
                    self.latest
                );
            }
        }
        if current.is_some() {
            self.in_flight = None;
        }
        current
    }

    pub fn is_pending(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Sequence number of the most recent lookup
    pub fn latest(&self) -> u64 {
        self.latest
    }

    fn abort_in_flight(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                log::debug!("aborting lookup #{}", self.latest);
            }
            handle.abort();
        }
    }
}

impl<T> Drop for LookupTracker<T> {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
