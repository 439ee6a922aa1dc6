//! Bounded-concurrency fetch of every segment, reassembled in input order.
//!
//! Each segment becomes one task on a [`JoinSet`]. A task must hold a permit
//! from the admission [`Semaphore`] for as long as it is talking to the
//! endpoint, including retries, so at most `concurrency` requests are ever in
//! flight. Tasks finish in any order; every result carries the index of its
//! segment and lands in that slot of the output.

mod progress;

pub use progress::DispatchProgress;

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::chunker::Segment;
use crate::speechkit::{FetchError, SpeechParams, SpeechTransport, SynthesisRequest};

/// Default number of simultaneous requests
pub const DEFAULT_CONCURRENCY: usize = 100;
/// Default number of attempts per segment
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// What to do when a segment cannot be fetched
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Record the failure as an empty payload and keep going
    #[default]
    Resilient,
    /// Cancel every other fetch and fail the whole dispatch
    AbortOnFirstFailure,
}

/// Dispatcher tuning
#[derive(Debug, Clone, Copy)]
pub struct DispatchOptions {
    /// Maximum requests in flight at once
    pub concurrency: usize,
    /// Attempts per segment, first try included
    pub max_attempts: u32,
    pub failure_policy: FailurePolicy,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            failure_policy: FailurePolicy::default(),
        }
    }
}

/// Outcome for one segment
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Index of the segment this result belongs to
    pub index: usize,
    /// Audio bytes; empty when the fetch failed
    pub payload: Bytes,
    /// Last error seen, for failed segments
    pub failure: Option<FetchError>,
}

impl FetchResult {
    pub fn ok(index: usize, payload: Bytes) -> Self {
        Self {
            index,
            payload,
            failure: None,
        }
    }

    pub fn err(index: usize, error: FetchError) -> Self {
        Self {
            index,
            payload: Bytes::new(),
            failure: Some(error),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("segment {index} failed, dispatch aborted: {source}")]
    Aborted { index: usize, source: FetchError },
}

/// Fetches synthesized audio for a batch of segments.
pub struct Dispatcher {
    transport: Arc<dyn SpeechTransport>,
    options: DispatchOptions,
    progress: Arc<DispatchProgress>,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    /// Create a dispatcher.
    ///
    /// A zero `concurrency` or `max_attempts` is raised to one.
    pub fn new(transport: Arc<dyn SpeechTransport>, options: DispatchOptions) -> Self {
        let options = DispatchOptions {
            concurrency: options.concurrency.clamp(1, Semaphore::MAX_PERMITS),
            max_attempts: options.max_attempts.max(1),
            ..options
        };
        Self {
            transport,
            options,
            progress: Arc::new(DispatchProgress::noop()),
        }
    }

    /// Builder: attach a progress observer.
    pub fn with_progress(mut self, progress: DispatchProgress) -> Self {
        self.progress = Arc::new(progress);
        self
    }

    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    /// Fetch audio for every segment.
    ///
    /// Returns one [`FetchResult`] per segment, where `results[i]` belongs to
    /// `segments[i]` regardless of completion order. Under
    /// [`FailurePolicy::Resilient`] this never fails; failed segments carry an
    /// empty payload. Under [`FailurePolicy::AbortOnFirstFailure`] the first
    /// failure cancels all outstanding fetches and is returned.
    pub async fn dispatch(
        &self,
        segments: Vec<Segment>,
        params: &SpeechParams,
    ) -> Result<Vec<FetchResult>, DispatchError> {
        let total = segments.len();
        let admission = Arc::new(Semaphore::new(self.options.concurrency));
        let params = Arc::new(params.clone());

        debug!(
            segments = total,
            concurrency = self.options.concurrency,
            max_attempts = self.options.max_attempts,
            policy = ?self.options.failure_policy,
            "Dispatching segments"
        );

        let mut tasks = JoinSet::new();
        let mut task_indices = HashMap::with_capacity(total);

        for (index, segment) in segments.into_iter().enumerate() {
            let handle = tasks.spawn(fetch_segment(
                Arc::clone(&self.transport),
                Arc::clone(&admission),
                Arc::clone(&params),
                index,
                segment.text,
                self.options.max_attempts,
            ));
            task_indices.insert(handle.id(), index);
        }

        let mut slots: Vec<Option<FetchResult>> = vec![None; total];
        let mut completed = 0;

        while let Some(joined) = tasks.join_next().await {
            let result = match joined {
                Ok(result) => result,
                Err(err) => {
                    let Some(&index) = task_indices.get(&err.id()) else {
                        continue;
                    };
                    let error = FetchError::transport(format!("fetch task failed: {err}"));
                    FetchResult::err(index, error)
                }
            };

            completed += 1;
            self.progress.send(completed, total);

            if let Some(error) = &result.failure {
                warn!(index = result.index, error = %error, "Segment failed");
                if self.options.failure_policy == FailurePolicy::AbortOnFirstFailure {
                    tasks.abort_all();
                    return Err(DispatchError::Aborted {
                        index: result.index,
                        source: error.clone(),
                    });
                }
            }

            let index = result.index;
            slots[index] = Some(result);
        }

        Ok(slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| FetchResult::err(index, FetchError::Cancelled))
            })
            .collect())
    }
}

/// Body of one segment task: wait for admission, then attempt until success,
/// a non-retryable error, or the attempt budget runs out.
async fn fetch_segment(
    transport: Arc<dyn SpeechTransport>,
    admission: Arc<Semaphore>,
    params: Arc<SpeechParams>,
    index: usize,
    text: String,
    max_attempts: u32,
) -> FetchResult {
    let Ok(_permit) = admission.acquire_owned().await else {
        return FetchResult::err(index, FetchError::Cancelled);
    };

    let mut attempt = 1;
    loop {
        let request = SynthesisRequest {
            text: &text,
            params: &params,
        };

        match transport.synthesize(request).await {
            Ok(payload) => {
                debug!(index, attempt, bytes = payload.len(), "Segment fetched");
                return FetchResult::ok(index, payload);
            }
            Err(error) if error.is_retryable() && attempt < max_attempts => {
                warn!(index, attempt, max_attempts, error = %error, "Retrying segment");
                attempt += 1;
            }
            Err(error) => return FetchResult::err(index, error),
        }
    }
}
