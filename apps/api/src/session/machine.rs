//! Analysis session: owns the inputs and the Idle → Submitting → Success/Failed lifecycle.
//!
//! `submit` is split in two so the presentation layer can hand the slow half to a
//! task: the synchronous half validates and enters `Submitting`, the returned
//! `Submission` performs the request. A submission only holds a weak handle on
//! the session, so a reply for a torn-down session is dropped on arrival.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Weak};

use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::extraction::parse;
use crate::session::gate::{self, GateError};
use crate::session::inputs::{Document, Role};
use crate::session::state::{AnalysisState, FailureReason};
use crate::session::transport::AnalysisTransport;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Rejected(#[from] GateError),

    #[error("An analysis is already in progress")]
    AlreadySubmitting,
}

struct Shared {
    state: watch::Sender<AnalysisState>,
    pending: AtomicUsize,
}

pub struct AnalysisSession {
    id: Uuid,
    transport: Arc<dyn AnalysisTransport>,
    document: Option<Document>,
    role: Option<Role>,
    shared: Arc<Shared>,
}

impl AnalysisSession {
    pub fn new(transport: Arc<dyn AnalysisTransport>) -> Self {
        let (state, _) = watch::channel(AnalysisState::Idle);
        let id = Uuid::new_v4();
        debug!(session_id = %id, "Analysis session created");

        Self {
            id,
            transport,
            document: None,
            role: None,
            shared: Arc::new(Shared {
                state,
                pending: AtomicUsize::new(0),
            }),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn set_document(&mut self, document: Document) {
        self.document = Some(document);
    }

    pub fn clear_document(&mut self) {
        self.document = None;
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = Some(role);
    }

    pub fn clear_role(&mut self) {
        self.role = None;
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    pub fn role(&self) -> Option<&Role> {
        self.role.as_ref()
    }

    pub fn can_submit(&self) -> bool {
        gate::can_submit(self.document.as_ref(), self.role.as_ref())
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> AnalysisState {
        self.shared.state.borrow().clone()
    }

    /// Receiver notified on every transition. Closes when the session is dropped.
    pub fn subscribe(&self) -> watch::Receiver<AnalysisState> {
        self.shared.state.subscribe()
    }

    /// Requests issued but not yet settled. Never more than one.
    pub fn pending_requests(&self) -> usize {
        self.shared.pending.load(Ordering::SeqCst)
    }

    /// Validates the inputs and enters `Submitting` before returning.
    ///
    /// Rejections leave the state untouched and send nothing.
    pub fn submit(&self) -> Result<Submission, SubmitError> {
        let (document, role) = gate::check(self.document.as_ref(), self.role.as_ref())?;
        let (document, role) = (document.clone(), role.clone());

        let accepted = self.shared.state.send_if_modified(|state| {
            if state.is_submitting() {
                return false;
            }
            *state = AnalysisState::Submitting;
            true
        });
        if !accepted {
            debug!(session_id = %self.id, "Submit ignored: analysis already in flight");
            return Err(SubmitError::AlreadySubmitting);
        }

        self.shared.pending.fetch_add(1, Ordering::SeqCst);
        info!(
            session_id = %self.id,
            document = %document.name,
            role = %role.label,
            "Submitting resume for analysis"
        );

        Ok(Submission {
            session_id: self.id,
            transport: Arc::clone(&self.transport),
            document,
            role,
            shared: Arc::downgrade(&self.shared),
            settled: false,
        })
    }
}

/// An accepted, in-flight analysis request.
///
/// Dropping it unfinished fails the session with `FailureReason::Abandoned`
/// so a new submit is always possible.
pub struct Submission {
    session_id: Uuid,
    transport: Arc<dyn AnalysisTransport>,
    document: Document,
    role: Role,
    shared: Weak<Shared>,
    settled: bool,
}

impl Submission {
    /// Sends the request and applies the outcome.
    ///
    /// Returns the state that was applied, or `None` if the session no longer exists.
    pub async fn complete(mut self) -> Option<AnalysisState> {
        let outcome = match self.transport.analyze(&self.document, &self.role).await {
            Ok(raw) => {
                let record = parse(&raw);
                if record.is_empty() {
                    warn!(session_id = %self.session_id, "Analysis reply had no recognisable sections");
                }
                AnalysisState::Success(record)
            }
            Err(e) => {
                warn!(session_id = %self.session_id, "Analysis request failed: {e}");
                AnalysisState::Failed(FailureReason::from(e))
            }
        };

        self.settle(outcome)
    }

    fn settle(&mut self, outcome: AnalysisState) -> Option<AnalysisState> {
        self.settled = true;

        let Some(shared) = self.shared.upgrade() else {
            debug!(session_id = %self.session_id, "Session gone, discarding analysis result");
            return None;
        };

        shared.pending.fetch_sub(1, Ordering::SeqCst);
        shared.state.send_replace(outcome.clone());
        Some(outcome)
    }
}

impl Drop for Submission {
    fn drop(&mut self) {
        if !self.settled {
            self.settle(AnalysisState::Failed(FailureReason::Abandoned));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::ResultRecord;
    use crate::session::transport::TransportError;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    type Reply = Box<dyn Fn() -> Result<String, TransportError> + Send + Sync>;

    struct ScriptedTransport {
        reply: Reply,
        release: Option<Arc<Notify>>,
        calls: AtomicUsize,
    }

    impl ScriptedTransport {
        fn replying(text: &'static str) -> Arc<Self> {
            Arc::new(Self {
                reply: Box::new(move || Ok(text.to_string())),
                release: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(make: fn() -> TransportError) -> Arc<Self> {
            Arc::new(Self {
                reply: Box::new(move || Err(make())),
                release: None,
                calls: AtomicUsize::new(0),
            })
        }

        fn gated(text: &'static str, release: Arc<Notify>) -> Arc<Self> {
            Arc::new(Self {
                reply: Box::new(move || Ok(text.to_string())),
                release: Some(release),
                calls: AtomicUsize::new(0),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalysisTransport for ScriptedTransport {
        async fn analyze(&self, _document: &Document, _role: &Role) -> Result<String, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(release) = &self.release {
                release.notified().await;
            }
            (self.reply)()
        }
    }

    const REPLY: &str = "ATS Score: 73\n\nMatched Skills:\n- SQL\n\nRewritten Professional Summary:\nAnalyst.";

    fn ready_session(transport: Arc<ScriptedTransport>) -> AnalysisSession {
        let mut session = AnalysisSession::new(transport);
        session.set_document(Document::pdf("cv.pdf", b"%PDF".to_vec()));
        session.set_role(Role::new("Data Analyst"));
        session
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = AnalysisSession::new(ScriptedTransport::replying(REPLY));
        assert_eq!(session.state(), AnalysisState::Idle);
        assert_eq!(session.pending_requests(), 0);
        assert!(!session.can_submit());
    }

    #[test]
    fn test_submit_without_document_is_rejected_without_effect() {
        let transport = ScriptedTransport::replying(REPLY);
        let mut session = AnalysisSession::new(transport.clone());
        session.set_role(Role::new("Data Analyst"));
        let rx = session.subscribe();

        let err = session.submit().err().unwrap();
        assert_eq!(err, SubmitError::Rejected(GateError::MissingDocument));
        assert_eq!(session.state(), AnalysisState::Idle);
        assert_eq!(session.pending_requests(), 0);
        assert!(!rx.has_changed().unwrap());
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_submit_with_blank_role_is_rejected() {
        let mut session = ready_session(ScriptedTransport::replying(REPLY));
        session.set_role(Role::new("  "));
        assert_eq!(
            session.submit().err(),
            Some(SubmitError::Rejected(GateError::MissingRole))
        );

        session.clear_role();
        assert_eq!(
            session.submit().err(),
            Some(SubmitError::Rejected(GateError::MissingRole))
        );
        assert_eq!(session.state(), AnalysisState::Idle);
    }

    #[tokio::test]
    async fn test_accepted_submit_is_submitting_before_completion() {
        let transport = ScriptedTransport::replying(REPLY);
        let session = ready_session(transport.clone());
        let mut rx = session.subscribe();

        let submission = session.submit().unwrap();
        assert_eq!(session.state(), AnalysisState::Submitting);
        assert_eq!(*rx.borrow_and_update(), AnalysisState::Submitting);
        assert_eq!(session.pending_requests(), 1);
        assert_eq!(transport.calls(), 0);

        let applied = submission.complete().await;
        let state = session.state();
        assert_eq!(applied.as_ref(), Some(&state));

        let record = state.record().unwrap();
        assert_eq!(record.score, Some(73));
        assert_eq!(record.matched_skills, vec!["SQL"]);
        assert_eq!(record.summary, "Analyst.");
        assert_eq!(session.pending_requests(), 0);
        assert_eq!(transport.calls(), 1);
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn test_second_submit_while_in_flight_is_ignored() {
        let release = Arc::new(Notify::new());
        let transport = ScriptedTransport::gated(REPLY, release.clone());
        let session = ready_session(transport.clone());

        let first = session.submit().unwrap();
        let handle = tokio::spawn(first.complete());
        tokio::task::yield_now().await;

        assert_eq!(session.submit().err(), Some(SubmitError::AlreadySubmitting));
        assert_eq!(session.state(), AnalysisState::Submitting);
        assert_eq!(session.pending_requests(), 1);

        release.notify_one();
        handle.await.unwrap();

        assert!(session.state().record().is_some());
        assert_eq!(transport.calls(), 1);
        assert_eq!(session.pending_requests(), 0);
    }

    #[tokio::test]
    async fn test_transport_failure_then_retry() {
        let session = ready_session(ScriptedTransport::failing(|| {
            TransportError::Network("connection refused".into())
        }));

        session.submit().unwrap().complete().await;
        assert!(matches!(
            session.state(),
            AnalysisState::Failed(FailureReason::Network(_))
        ));

        // failure is retryable
        let retry = session.submit().unwrap();
        assert_eq!(session.state(), AnalysisState::Submitting);
        retry.complete().await;
        assert!(session.state().failure().is_some());
    }

    #[tokio::test]
    async fn test_server_and_malformed_failures_are_distinguished() {
        let session = ready_session(ScriptedTransport::failing(|| TransportError::Server {
            status: 500,
            message: "Internal server error.".into(),
        }));
        session.submit().unwrap().complete().await;
        assert!(matches!(
            session.state().failure(),
            Some(FailureReason::Server { status: 500, .. })
        ));

        let session = ready_session(ScriptedTransport::failing(|| {
            TransportError::Malformed("expected value".into())
        }));
        session.submit().unwrap().complete().await;
        assert!(matches!(
            session.state().failure(),
            Some(FailureReason::MalformedResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_new_submit_clears_previous_result() {
        let session = ready_session(ScriptedTransport::replying(REPLY));
        session.submit().unwrap().complete().await;
        assert!(session.state().record().is_some());

        let again = session.submit().unwrap();
        assert_eq!(session.state(), AnalysisState::Submitting);
        assert!(session.state().record().is_none());
        again.complete().await;
    }

    #[tokio::test]
    async fn test_unstructured_reply_is_empty_success() {
        let session = ready_session(ScriptedTransport::replying("Sorry, no idea."));
        session.submit().unwrap().complete().await;
        assert_eq!(session.state(), AnalysisState::Success(ResultRecord::default()));
    }

    #[tokio::test]
    async fn test_result_for_torn_down_session_is_discarded() {
        let release = Arc::new(Notify::new());
        let transport = ScriptedTransport::gated(REPLY, release.clone());
        let session = ready_session(transport.clone());
        let mut rx = session.subscribe();

        let submission = session.submit().unwrap();
        rx.borrow_and_update();
        let handle = tokio::spawn(submission.complete());
        tokio::task::yield_now().await;

        drop(session);
        release.notify_one();

        assert_eq!(handle.await.unwrap(), None);
        assert_eq!(*rx.borrow(), AnalysisState::Submitting);
        assert!(rx.has_changed().is_err());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_dropped_submission_fails_as_abandoned() {
        let session = ready_session(ScriptedTransport::replying(REPLY));

        let submission = session.submit().unwrap();
        drop(submission);

        assert_eq!(
            session.state(),
            AnalysisState::Failed(FailureReason::Abandoned)
        );
        assert_eq!(session.pending_requests(), 0);
        assert!(session.submit().is_ok());
    }

    #[tokio::test]
    async fn test_inputs_can_change_while_in_flight() {
        let mut session = ready_session(ScriptedTransport::replying(REPLY));
        let submission = session.submit().unwrap();

        session.set_role(Role::new("DevOps Engineer"));
        session.clear_document();
        assert!(!session.can_submit());

        submission.complete().await;
        assert!(session.state().record().is_some());
        assert_eq!(session.role().map(|r| r.label.as_str()), Some("DevOps Engineer"));
        assert!(session.document().is_none());
    }
}
