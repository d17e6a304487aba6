//! Advice requests tied to plan submissions
//!
//! Each request runs as its own tokio task. A newer submission supersedes any
//! request still in flight: the old task is aborted on a best-effort basis and
//! its result, if it arrives anyway, is reported as superseded.

use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::task::{AbortHandle, JoinHandle};

use crate::plan::RetirementPlan;
use super::{AdviceError, AdviceProvider};

/// Final state of one advice request
#[derive(Debug)]
pub enum AdviceOutcome {
    /// Advice for the current submission
    Advice(String),
    /// The request for the current submission failed
    Failed(AdviceError),
    /// A newer submission replaced this request; discard it
    Superseded,
}

/// Issues advice requests and tracks which submission is current
pub struct AdviceSession {
    provider: Arc<dyn AdviceProvider>,
    generation: Arc<AtomicU64>,
    in_flight: Mutex<Option<AbortHandle>>,
}

impl AdviceSession {
    pub fn new(provider: Arc<dyn AdviceProvider>) -> Self {
        Self {
            provider,
            generation: Arc::new(AtomicU64::new(0)),
            in_flight: Mutex::new(None),
        }
    }

    /// Generation of the latest submission
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Mark a new plan submission; any outstanding request becomes stale
    pub fn supersede(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Ok(mut in_flight) = self.in_flight.lock() {
            if let Some(handle) = in_flight.take() {
                debug!("supersede: aborting stale advice request");
                handle.abort();
            }
        }
        generation
    }

    /// Start an advice request for a plan
    ///
    /// Must be called from within a tokio runtime.
    pub fn request(&self, plan: RetirementPlan) -> PendingAdvice {
        let generation = self.supersede();
        let provider = Arc::clone(&self.provider);

        info!("request: advice request #{} started", generation);
        let handle = tokio::spawn(async move { provider.request_advice(&plan).await });

        if let Ok(mut in_flight) = self.in_flight.lock() {
            *in_flight = Some(handle.abort_handle());
        }

        PendingAdvice {
            generation,
            latest: Arc::clone(&self.generation),
            handle,
        }
    }
}

/// An advice request in flight
pub struct PendingAdvice {
    generation: u64,
    latest: Arc<AtomicU64>,
    handle: JoinHandle<Result<String, AdviceError>>,
}

impl PendingAdvice {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A newer submission exists
    pub fn is_superseded(&self) -> bool {
        self.latest.load(Ordering::SeqCst) != self.generation
    }

    /// Wait for the request to finish
    pub async fn outcome(self) -> AdviceOutcome {
        let result = self.handle.await;

        if self.latest.load(Ordering::SeqCst) != self.generation {
            debug!("outcome: discarding result of superseded request #{}", self.generation);
            return AdviceOutcome::Superseded;
        }

        match result {
            Ok(Ok(advice)) => AdviceOutcome::Advice(advice),
            Ok(Err(err)) => {
                warn!("outcome: advice request #{} failed: {}", self.generation, err);
                AdviceOutcome::Failed(err)
            }
            Err(join_err) if join_err.is_cancelled() => AdviceOutcome::Superseded,
            Err(join_err) => AdviceOutcome::Failed(AdviceError::TaskFailed(join_err.to_string())),
        }
    }
}
