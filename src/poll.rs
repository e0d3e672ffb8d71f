//! Review polling state machine.
//!
//! Reconciles client-visible review state with server-side asynchronous
//! review generation using interval polling (the backend offers no push
//! channel). The controller owns at most one poll task at a time: every
//! terminal transition stops it, [`ReviewPoller::request_new`] replaces it,
//! and dropping the controller aborts it.
//!
//! Polls are serialized: the loop awaits each response before taking the
//! next tick, so overlapping in-flight requests (and the stale-response
//! reordering they would allow) cannot occur.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::align::{align, Segment};
use crate::client::{ApiError, ReviewBackend};
use crate::models::{Review, ReviewStatus};

/// A finished review merged with the canonical submission text.
///
/// The review lookup does not embed the essay text, so the controller
/// fetches it separately once the review reaches `done`.
#[derive(Debug, Clone)]
pub struct ReviewView {
    pub review: Review,
    pub submission_text: String,
}

impl ReviewView {
    /// Partition the submission text against the review's annotations.
    pub fn segments(&self) -> Vec<Segment> {
        let annotations = self.review.annotations.as_deref().unwrap_or(&[]);
        align(&self.submission_text, annotations)
    }
}

/// Observable phase of the polling controller.
#[derive(Debug, Clone)]
pub enum ReviewPhase {
    /// No review exists yet for the submission.
    NoReview,
    /// A review id is known; the server is still working.
    Reviewing,
    /// Terminal: review finished and merged with the submission text.
    Done(Arc<ReviewView>),
    /// Terminal: the server reported the review as failed.
    Failed,
    /// Terminal: the submission or review does not exist on the server.
    NotFound,
    /// Terminal: transport or unexpected failure; recovery is manual.
    Error(String),
}

impl ReviewPhase {
    /// True for phases the controller will not leave on its own.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ReviewPhase::NoReview | ReviewPhase::Reviewing)
    }
}

/// Drives acquisition of a review through its lifecycle.
///
/// Single-writer discipline: only the poll task and the two user-triggered
/// operations ([`lookup_existing`](Self::lookup_existing),
/// [`request_new`](Self::request_new)) write the phase.
pub struct ReviewPoller {
    backend: Arc<dyn ReviewBackend>,
    interval: Duration,
    phase_tx: watch::Sender<ReviewPhase>,
    task: Option<JoinHandle<()>>,
}

impl ReviewPoller {
    pub fn new(backend: Arc<dyn ReviewBackend>, interval: Duration) -> Self {
        let (phase_tx, _) = watch::channel(ReviewPhase::Reviewing);
        Self {
            backend,
            interval,
            phase_tx,
            task: None,
        }
    }

    /// Subscribe to phase changes.
    pub fn subscribe(&self) -> watch::Receiver<ReviewPhase> {
        self.phase_tx.subscribe()
    }

    /// Current phase snapshot.
    pub fn phase(&self) -> ReviewPhase {
        self.phase_tx.borrow().clone()
    }

    /// Look up a review already associated with the submission.
    ///
    /// An empty result leaves the controller in `NoReview`; a hit records
    /// the review id, enters `Reviewing`, and starts polling.
    pub async fn lookup_existing(&mut self, submission_id: &str) {
        match self.backend.review_of_submission(submission_id).await {
            Ok(None) => self.set_phase(ReviewPhase::NoReview),
            Ok(Some(review)) => {
                self.set_phase(ReviewPhase::Reviewing);
                self.start_polling(submission_id.to_string(), review.id);
            }
            Err(err) => self.set_phase(terminal_for(err)),
        }
    }

    /// Queue a new review job and (re-)start polling for it.
    ///
    /// Any previous poll task is cancelled before the fresh one is spawned,
    /// so at most one timer is live at a time.
    pub async fn request_new(&mut self, submission_id: &str) {
        match self.backend.request_review(submission_id).await {
            Ok(review_id) => {
                self.set_phase(ReviewPhase::Reviewing);
                self.start_polling(submission_id.to_string(), review_id);
            }
            Err(err) => self.set_phase(terminal_for(err)),
        }
    }

    /// Stop polling without tearing down the controller.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn set_phase(&self, phase: ReviewPhase) {
        self.phase_tx.send_replace(phase);
    }

    fn start_polling(&mut self, submission_id: String, review_id: String) {
        self.stop();
        let backend = Arc::clone(&self.backend);
        let phase_tx = self.phase_tx.clone();
        let interval = self.interval;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // A slow poll delays the next tick instead of bursting.
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                // First tick completes immediately, so the initial poll
                // happens as soon as the review id is known.
                ticker.tick().await;
                match poll_once(backend.as_ref(), &submission_id, &review_id).await {
                    PollOutcome::InProgress => continue,
                    PollOutcome::Terminal(phase) => {
                        phase_tx.send_replace(phase);
                        break;
                    }
                }
            }
        }));
    }
}

impl Drop for ReviewPoller {
    fn drop(&mut self) {
        self.stop();
    }
}

enum PollOutcome {
    InProgress,
    Terminal(ReviewPhase),
}

/// One poll round: fetch the review and, when it is done, the canonical
/// submission text to merge into the final view.
async fn poll_once(
    backend: &dyn ReviewBackend,
    submission_id: &str,
    review_id: &str,
) -> PollOutcome {
    let review = match backend.review(review_id).await {
        Ok(review) => review,
        Err(err) => return PollOutcome::Terminal(terminal_for(err)),
    };
    match review.status {
        ReviewStatus::Reviewing => {
            debug!(review_id, "review still in progress");
            PollOutcome::InProgress
        }
        ReviewStatus::Failed => {
            warn!(review_id, "server reported review as failed");
            PollOutcome::Terminal(ReviewPhase::Failed)
        }
        ReviewStatus::Done => match backend.submission(submission_id).await {
            Ok(submission) => PollOutcome::Terminal(ReviewPhase::Done(Arc::new(ReviewView {
                review,
                submission_text: submission.submission,
            }))),
            Err(err) => PollOutcome::Terminal(terminal_for(err)),
        },
    }
}

/// Map a backend error to its terminal phase: 404 is surfaced as
/// `NotFound`, everything else as `Error`.
fn terminal_for(err: ApiError) -> ReviewPhase {
    match err {
        ApiError::NotFound => ReviewPhase::NotFound,
        other => ReviewPhase::Error(other.to_string()),
    }
}
