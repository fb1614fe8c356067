//! Last-request-wins bookkeeping shared by the search and detail loaders.
//!
//! Every new request bumps a generation counter and cancels the token of the
//! request it supersedes. A finished request may only publish its result while
//! its stamp is still current, and that check has to happen under the same
//! lock that publishes the result.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Identity of one issued request.
#[derive(Debug, Clone)]
pub struct RequestStamp {
    generation: u64,
    counter: Arc<AtomicU64>,
    token: CancellationToken,
}

impl RequestStamp {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True until a newer request is issued or this one is cancelled.
    pub fn is_current(&self) -> bool {
        !self.token.is_cancelled() && self.counter.load(Ordering::SeqCst) == self.generation
    }

    /// Drive `fut` unless the request gets cancelled first.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        tokio::select! {
            biased;
            _ = self.token.cancelled() => None,
            out = fut => Some(out),
        }
    }
}

struct InFlight {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Holds at most one live request.
pub struct RequestSlot {
    counter: Arc<AtomicU64>,
    inflight: Mutex<Option<InFlight>>,
}

impl Default for RequestSlot {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestSlot {
    pub fn new() -> Self {
        Self {
            counter: Arc::new(AtomicU64::new(0)),
            inflight: Mutex::new(None),
        }
    }

    /// Cancel whatever is in flight without starting anything new.
    pub fn cancel(&self) {
        let mut inflight = self.lock();
        self.supersede(&mut inflight);
    }

    /// Cancel the in-flight request and spawn `work` as the new one.
    ///
    /// `prepare` runs after the old request is invalidated and before the new
    /// task exists, so state it publishes (e.g. "loading") can never be
    /// overwritten by the old request or clobber the new one's result.
    /// Must be called from within a tokio runtime.
    pub fn begin<P, W, Fut>(&self, prepare: P, work: W) -> u64
    where
        P: FnOnce(),
        W: FnOnce(RequestStamp) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut inflight = self.lock();
        let generation = self.supersede(&mut inflight);

        prepare();

        let stamp = RequestStamp {
            generation,
            counter: Arc::clone(&self.counter),
            token: CancellationToken::new(),
        };
        let token = stamp.token.clone();
        let handle = tokio::spawn(work(stamp));

        *inflight = Some(InFlight { token, handle });
        generation
    }

    fn supersede(&self, inflight: &mut Option<InFlight>) -> u64 {
        let generation = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(previous) = inflight.take() {
            previous.token.cancel();
            previous.handle.abort();
        }
        generation
    }

    fn lock(&self) -> MutexGuard<'_, Option<InFlight>> {
        self.inflight.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Drop for RequestSlot {
    fn drop(&mut self) {
        if let Some(previous) = self.lock().take() {
            previous.token.cancel();
            previous.handle.abort();
        }
    }
}
