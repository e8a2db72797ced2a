//! SessionController — drives the question-by-question interview, including
//! follow-up branching, backward navigation, and the skip-to-end shortcut.
//!
//! The controller exclusively owns its [`Session`]; the review stage amends
//! it only through [`SessionController::amend_answer`] and
//! [`SessionController::rewind_to`], which preserve the prefix invariant.
//! At most one advancing operation runs at a time: anything issued while a
//! transition or collaborator call is in flight is a silent no-op.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::advisor::Advisor;
use crate::catalog::{Question, QuestionCatalog};
use crate::clock::Clock;
use crate::config::FlowTiming;
use crate::error::Error;
use crate::webhook::WebhookForwarder;

use super::animation::{AnimationController, AnimationPhase};
use super::model::{Response, Session, StepMode};
use super::note::AssistantNote;

/// Everything a session controller depends on.
#[derive(Clone)]
pub struct FlowDeps {
    pub catalog: Arc<QuestionCatalog>,
    pub advisor: Arc<dyn Advisor>,
    pub forwarder: Arc<dyn WebhookForwarder>,
    pub clock: Arc<dyn Clock>,
    pub timing: FlowTiming,
}

/// Result of an advancing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Input was invalid or another operation is in flight; nothing changed.
    Ignored,
    /// Entered the follow-up sub-step for the current question.
    FollowUp { question: String },
    /// Committed the response and moved to the next question.
    Advanced { next_step: u32 },
    /// Committed the final response; the session is complete.
    Completed,
}

/// Result of a backward navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum Rewind {
    /// Nothing to rewind, or another operation is in flight.
    Ignored,
    /// Left the follow-up sub-step, back to answering the same question.
    ToAnswering,
    /// Dropped the most recent response and stepped back.
    ToStep(u32),
}

/// Releases the in-flight claim when the operation ends, on every path.
struct OpGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Owns one onboarding session and all transitions between its steps.
pub struct SessionController {
    catalog: Arc<QuestionCatalog>,
    advisor: Arc<dyn Advisor>,
    forwarder: Arc<dyn WebhookForwarder>,
    clock: Arc<dyn Clock>,
    timing: FlowTiming,
    session: RwLock<Session>,
    mode: RwLock<StepMode>,
    animation: AnimationController,
    note: AssistantNote,
    op_in_flight: AtomicBool,
    last_error: RwLock<Option<String>>,
}

impl SessionController {
    /// Create a controller for a fresh session. The id is threaded in
    /// explicitly so concurrent sessions and tests stay deterministic.
    pub fn new(session_id: impl Into<String>, deps: FlowDeps) -> Arc<Self> {
        let FlowDeps {
            catalog,
            advisor,
            forwarder,
            clock,
            timing,
        } = deps;
        let session = Session::new(session_id, clock.now());
        tracing::info!(session_id = %session.id, questions = catalog.len(), "Onboarding session started");
        Arc::new(Self {
            animation: AnimationController::new(Arc::clone(&clock), timing.phase),
            session: RwLock::new(session),
            mode: RwLock::new(StepMode::Answering),
            note: AssistantNote::new(),
            op_in_flight: AtomicBool::new(false),
            last_error: RwLock::new(None),
            catalog,
            advisor,
            forwarder,
            clock,
            timing,
        })
    }

    // ── Snapshots ────────────────────────────────────────────────────────

    /// Snapshot of the session record.
    pub fn session_snapshot(&self) -> Session {
        self.session_read().clone()
    }

    /// Current per-step mode.
    pub fn mode(&self) -> StepMode {
        self.mode_read().clone()
    }

    /// The question at the current step, if the interview is still running.
    pub fn current_question(&self) -> Option<Question> {
        let step = self.session_read().current_step;
        self.catalog.get(step).cloned()
    }

    /// Current animation phase.
    pub fn phase(&self) -> AnimationPhase {
        self.animation.phase()
    }

    /// True while an exit-and-enter transition is running.
    pub fn is_transitioning(&self) -> bool {
        self.animation.is_transitioning()
    }

    /// True while any advancing operation (including a collaborator call) is
    /// in flight.
    pub fn is_busy(&self) -> bool {
        self.op_in_flight.load(Ordering::SeqCst) || self.animation.is_transitioning()
    }

    /// The currently-visible assistant note, if any.
    pub fn assistant_note(&self) -> Option<String> {
        self.note.current()
    }

    /// The most recent collaborator error, for inline display.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().expect("error lock poisoned").clone()
    }

    /// The catalog this session runs over.
    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    // ── Advancing operations ─────────────────────────────────────────────

    /// Submit the draft answer for the current question.
    ///
    /// Silently ignored when the draft is invalid or an operation is in
    /// flight. A question with a pending follow-up asks the advisor for one
    /// and enters the follow-up sub-step; advisor failure blocks advancement
    /// and is surfaced for retry. Otherwise the response is committed and the
    /// step advances through the forward transition.
    pub async fn submit_answer(self: &Arc<Self>, draft: &str) -> Result<Advance, Error> {
        let Some(_op) = self.try_claim() else {
            return Ok(Advance::Ignored);
        };
        let Some((step, question)) = self.active_question() else {
            return Ok(Advance::Ignored);
        };
        if !matches!(*self.mode_read(), StepMode::Answering) {
            return Ok(Advance::Ignored);
        }
        if !question.accepts(draft) {
            return Ok(Advance::Ignored);
        }
        let draft = draft.trim().to_string();

        if question.follow_up {
            let prior = self.session_read().responses.clone();
            let follow_up = match self
                .advisor
                .generate_follow_up(&question.prompt, &draft, &prior)
                .await
            {
                Ok(text) => text,
                Err(e) => {
                    self.record_error(format!("Could not generate a follow-up question: {e}"));
                    return Err(e.into());
                }
            };
            self.clear_error();
            self.animation
                .run_forward(|| {
                    *self.mode_write() = StepMode::FollowUp {
                        question: follow_up.clone(),
                        answer: draft,
                    };
                })
                .await;
            return Ok(Advance::FollowUp {
                question: follow_up,
            });
        }

        self.clear_error();
        self.spawn_encouragement(step, question.prompt.clone(), draft.clone(), None);
        self.commit_and_advance(Response {
            question_id: step,
            answer: draft,
            follow_up_answer: None,
            assistant_note: None,
        })
        .await
    }

    /// Submit the draft answer for the generated follow-up question,
    /// committing the response with both answers.
    pub async fn submit_follow_up(self: &Arc<Self>, draft: &str) -> Result<Advance, Error> {
        let Some(_op) = self.try_claim() else {
            return Ok(Advance::Ignored);
        };
        let Some((step, question)) = self.active_question() else {
            return Ok(Advance::Ignored);
        };
        let answer = match &*self.mode_read() {
            StepMode::FollowUp { answer, .. } => answer.clone(),
            StepMode::Answering => return Ok(Advance::Ignored),
        };
        let draft = draft.trim();
        if draft.is_empty() {
            return Ok(Advance::Ignored);
        }
        let draft = draft.to_string();

        self.clear_error();
        self.spawn_encouragement(step, question.prompt.clone(), answer.clone(), Some(draft.clone()));
        self.commit_and_advance(Response {
            question_id: step,
            answer,
            follow_up_answer: Some(draft),
            assistant_note: None,
        })
        .await
    }

    /// Step backward: out of the follow-up sub-step, or rewinding exactly one
    /// committed response. Rejected after completion.
    pub async fn go_back(&self) -> Rewind {
        let Some(_op) = self.try_claim() else {
            return Rewind::Ignored;
        };
        if self.session_read().is_complete() {
            return Rewind::Ignored;
        }

        if matches!(&*self.mode_read(), StepMode::FollowUp { .. }) {
            self.animation
                .run_backward(|| {
                    *self.mode_write() = StepMode::Answering;
                })
                .await;
            return Rewind::ToAnswering;
        }

        let step = self.session_read().current_step;
        if step <= 1 {
            return Rewind::Ignored;
        }
        self.animation
            .run_backward(|| {
                self.session_write().rewind_one();
                *self.mode_write() = StepMode::Answering;
            })
            .await;
        Rewind::ToStep(step - 1)
    }

    /// Bypass the interview: fill every response from the catalog sample
    /// answers, complete the session, and forward the sample payload for
    /// diagnostics. Forwarding failure is logged, never surfaced.
    pub async fn skip_to_end(self: &Arc<Self>) -> Advance {
        let Some(_op) = self.try_claim() else {
            return Advance::Ignored;
        };
        if self.session_read().is_complete() {
            return Advance::Ignored;
        }

        let now = self.clock.now();
        {
            let mut session = self.session_write();
            session.responses = self
                .catalog
                .questions()
                .iter()
                .map(|q| Response {
                    question_id: q.id,
                    answer: q.sample_answer.clone(),
                    follow_up_answer: None,
                    assistant_note: None,
                })
                .collect();
            session.current_step = self.catalog.len() as u32 + 1;
            session.completed_at = Some(now);
            *self.mode_write() = StepMode::Answering;
        }

        if let Some(payload) = self
            .session_read()
            .submission_payload(self.catalog.len(), true)
        {
            let forwarder = Arc::clone(&self.forwarder);
            tokio::spawn(async move {
                match forwarder.forward(&payload).await {
                    Ok(_) => {
                        tracing::info!(session_id = %payload.session_id, "Sample session forwarded")
                    }
                    Err(e) => {
                        tracing::warn!(session_id = %payload.session_id, error = %e, "Sample session forward failed")
                    }
                }
            });
        }
        Advance::Completed
    }

    // ── Review support ───────────────────────────────────────────────────

    /// In-place correction from the review stage. Later responses are left
    /// untouched. Returns false for unknown ids or invalid answers.
    pub fn amend_answer(&self, question_id: u32, new_answer: &str) -> bool {
        if self.is_busy() {
            return false;
        }
        let Some(question) = self.catalog.get(question_id) else {
            return false;
        };
        if !question.accepts(new_answer) {
            return false;
        }
        self.session_write().amend(question_id, new_answer.trim())
    }

    /// Flow rewind from the review stage: re-enter the interview at
    /// `question_id`, discarding that response and everything after it.
    pub fn rewind_to(&self, question_id: u32) -> bool {
        if self.is_busy() || question_id == 0 {
            return false;
        }
        let mut session = self.session_write();
        if question_id as usize > session.responses.len() {
            return false;
        }
        session.rewind_to(question_id);
        drop(session);
        *self.mode_write() = StepMode::Answering;
        true
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn try_claim(&self) -> Option<OpGuard<'_>> {
        self.op_in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| OpGuard {
                flag: &self.op_in_flight,
            })
    }

    /// The current step and its catalog question, unless the session is
    /// complete.
    fn active_question(&self) -> Option<(u32, Question)> {
        let session = self.session_read();
        if session.is_complete() {
            return None;
        }
        let step = session.current_step;
        self.catalog.get(step).map(|q| (step, q.clone()))
    }

    /// Commit a response at the transition midpoint and advance, stamping
    /// completion when the catalog is exhausted.
    async fn commit_and_advance(self: &Arc<Self>, response: Response) -> Result<Advance, Error> {
        let step = response.question_id;
        let total = self.catalog.len() as u32;
        let now = self.clock.now();
        self.animation
            .run_forward(|| {
                let mut response = response;
                response.assistant_note = self.note.current_for(step);
                let mut session = self.session_write();
                session.commit(response);
                if session.current_step > total {
                    session.completed_at = Some(now);
                }
                *self.mode_write() = StepMode::Answering;
            })
            .await;

        let session = self.session_read();
        if session.is_complete() {
            tracing::info!(session_id = %session.id, "Onboarding session complete");
            Ok(Advance::Completed)
        } else {
            Ok(Advance::Advanced {
                next_step: session.current_step,
            })
        }
    }

    /// Fire the encouragement request in the background. The note is
    /// cosmetic: it may land after the step has advanced, and it auto-clears
    /// after the display window.
    fn spawn_encouragement(
        self: &Arc<Self>,
        question_id: u32,
        question: String,
        answer: String,
        follow_up_answer: Option<String>,
    ) {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            match controller
                .advisor
                .generate_encouragement(&question, &answer, follow_up_answer.as_deref())
                .await
            {
                Ok(text) => {
                    // Persist onto the committed response when it is already
                    // there; otherwise the commit itself picks the note up.
                    controller.session_write().attach_note(question_id, &text);
                    let window = controller.timing.note_display;
                    controller
                        .note
                        .show_for(question_id, text, window, controller.clock.as_ref())
                        .await;
                }
                Err(e) => {
                    tracing::debug!(error = %e, "Encouragement generation failed");
                }
            }
        });
    }

    fn record_error(&self, message: String) {
        tracing::warn!(error = %message, "Collaborator call failed");
        *self.last_error.write().expect("error lock poisoned") = Some(message);
    }

    fn clear_error(&self) {
        *self.last_error.write().expect("error lock poisoned") = None;
    }

    fn session_read(&self) -> RwLockReadGuard<'_, Session> {
        self.session.read().expect("session lock poisoned")
    }

    fn session_write(&self) -> RwLockWriteGuard<'_, Session> {
        self.session.write().expect("session lock poisoned")
    }

    fn mode_read(&self) -> RwLockReadGuard<'_, StepMode> {
        self.mode.read().expect("mode lock poisoned")
    }

    fn mode_write(&self) -> RwLockWriteGuard<'_, StepMode> {
        self.mode.write().expect("mode lock poisoned")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, InputKind};
    use crate::clock::VirtualClock;
    use crate::error::{AdvisorError, WebhookError};
    use crate::webhook::{ForwardOutcome, SubmissionPayload};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    struct StubAdvisor {
        fail_follow_up: bool,
    }

    #[async_trait]
    impl Advisor for StubAdvisor {
        fn model_name(&self) -> &str {
            "stub"
        }

        async fn generate_follow_up(
            &self,
            _question: &str,
            answer: &str,
            _prior: &[Response],
        ) -> Result<String, AdvisorError> {
            if self.fail_follow_up {
                return Err(AdvisorError::RequestFailed {
                    reason: "stub outage".to_string(),
                });
            }
            Ok(format!("What does \"{answer}\" mean for your customers?"))
        }

        async fn generate_encouragement(
            &self,
            _question: &str,
            _answer: &str,
            _follow_up_answer: Option<&str>,
        ) -> Result<String, AdvisorError> {
            Ok("Great progress!".to_string())
        }

        async fn generate_final_analysis(
            &self,
            _responses: &[Response],
        ) -> Result<String, AdvisorError> {
            Ok("BUILD".to_string())
        }
    }

    struct RecordingForwarder {
        calls: Mutex<Vec<SubmissionPayload>>,
    }

    impl RecordingForwarder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                calls: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> Vec<SubmissionPayload> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl WebhookForwarder for RecordingForwarder {
        async fn forward(
            &self,
            payload: &SubmissionPayload,
        ) -> Result<ForwardOutcome, WebhookError> {
            self.calls.lock().unwrap().push(payload.clone());
            Ok(ForwardOutcome::WorkflowStarted(
                "Workflow was started".to_string(),
            ))
        }
    }

    fn two_question_catalog() -> QuestionCatalog {
        QuestionCatalog::new(vec![
            Question {
                id: 1,
                category: Category::Basic,
                prompt: "What's the name of your startup?".to_string(),
                input: InputKind::Text,
                options: Vec::new(),
                follow_up: false,
                sample_answer: "Acme".to_string(),
            },
            Question {
                id: 2,
                category: Category::Basic,
                prompt: "Describe what your startup does.".to_string(),
                input: InputKind::Textarea,
                options: Vec::new(),
                follow_up: true,
                sample_answer: "We sell widgets".to_string(),
            },
        ])
        .unwrap()
    }

    struct Harness {
        controller: Arc<SessionController>,
        forwarder: Arc<RecordingForwarder>,
        clock: Arc<VirtualClock>,
    }

    fn harness_with(phase: Duration, fail_follow_up: bool) -> Harness {
        let clock = VirtualClock::new();
        let forwarder = RecordingForwarder::new();
        let controller = SessionController::new(
            "test-session",
            FlowDeps {
                catalog: Arc::new(two_question_catalog()),
                advisor: Arc::new(StubAdvisor { fail_follow_up }),
                forwarder: Arc::clone(&forwarder) as Arc<dyn WebhookForwarder>,
                clock: Arc::clone(&clock) as Arc<dyn Clock>,
                timing: FlowTiming {
                    phase,
                    note_display: Duration::from_secs(4),
                },
            },
        );
        Harness {
            controller,
            forwarder,
            clock,
        }
    }

    fn harness() -> Harness {
        harness_with(Duration::ZERO, false)
    }

    async fn drain_tasks() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn scenario_answer_follow_up_complete() {
        let h = harness();
        let c = &h.controller;

        // Q1 has no follow-up: commits and advances.
        let outcome = c.submit_answer("Acme").await.unwrap();
        assert_eq!(outcome, Advance::Advanced { next_step: 2 });
        let session = c.session_snapshot();
        assert_eq!(session.responses.len(), 1);
        assert_eq!(session.responses[0].answer, "Acme");
        assert_eq!(session.current_step, 2);
        assert!(session.is_prefix_consistent());

        // Q2 has a follow-up: enters the sub-step, step does not move.
        let outcome = c.submit_answer("We sell widgets").await.unwrap();
        let Advance::FollowUp { question } = outcome else {
            panic!("expected follow-up, got {outcome:?}");
        };
        assert!(question.contains("We sell widgets"));
        assert_eq!(c.session_snapshot().current_step, 2);
        assert!(matches!(c.mode(), StepMode::FollowUp { .. }));

        // Follow-up answer commits both answers and completes the session.
        let outcome = c.submit_follow_up("To retailers").await.unwrap();
        assert_eq!(outcome, Advance::Completed);
        let session = c.session_snapshot();
        assert_eq!(session.current_step, 3);
        assert_eq!(session.responses[1].answer, "We sell widgets");
        assert_eq!(
            session.responses[1].follow_up_answer.as_deref(),
            Some("To retailers")
        );
        assert!(session.is_complete());
        assert!(session.is_prefix_consistent());
    }

    #[tokio::test]
    async fn completed_session_rejects_further_mutation() {
        let h = harness();
        let c = &h.controller;
        c.submit_answer("Acme").await.unwrap();
        c.submit_answer("We sell widgets").await.unwrap();
        c.submit_follow_up("To retailers").await.unwrap();
        let before = c.session_snapshot();

        assert_eq!(c.submit_answer("more").await.unwrap(), Advance::Ignored);
        assert_eq!(c.go_back().await, Rewind::Ignored);
        assert_eq!(c.skip_to_end().await, Advance::Ignored);

        let after = c.session_snapshot();
        assert_eq!(after.responses, before.responses);
        assert_eq!(after.current_step, before.current_step);
    }

    #[tokio::test]
    async fn empty_or_whitespace_draft_is_ignored() {
        let h = harness();
        assert_eq!(h.controller.submit_answer("").await.unwrap(), Advance::Ignored);
        assert_eq!(h.controller.submit_answer("   ").await.unwrap(), Advance::Ignored);
        assert_eq!(h.controller.session_snapshot().responses.len(), 0);
    }

    #[tokio::test]
    async fn follow_up_submit_outside_follow_up_is_ignored() {
        let h = harness();
        assert_eq!(
            h.controller.submit_follow_up("eager").await.unwrap(),
            Advance::Ignored
        );
    }

    #[tokio::test]
    async fn go_back_rewinds_exactly_one_response() {
        let h = harness();
        let c = &h.controller;
        c.submit_answer("Acme").await.unwrap();
        assert_eq!(c.session_snapshot().current_step, 2);

        assert_eq!(c.go_back().await, Rewind::ToStep(1));
        let session = c.session_snapshot();
        assert_eq!(session.current_step, 1);
        assert!(session.responses.is_empty());
        assert!(session.is_prefix_consistent());

        // At step 1 there is nothing left to rewind.
        assert_eq!(c.go_back().await, Rewind::Ignored);
    }

    #[tokio::test]
    async fn go_back_from_follow_up_returns_to_answering() {
        let h = harness();
        let c = &h.controller;
        c.submit_answer("Acme").await.unwrap();
        c.submit_answer("We sell widgets").await.unwrap();
        assert!(matches!(c.mode(), StepMode::FollowUp { .. }));

        assert_eq!(c.go_back().await, Rewind::ToAnswering);
        assert_eq!(c.mode(), StepMode::Answering);
        // Same step, no response committed for it.
        let session = c.session_snapshot();
        assert_eq!(session.current_step, 2);
        assert_eq!(session.responses.len(), 1);
    }

    #[tokio::test]
    async fn follow_up_generation_failure_blocks_advancement() {
        let h = harness_with(Duration::ZERO, true);
        let c = &h.controller;
        c.submit_answer("Acme").await.unwrap();

        let result = c.submit_answer("We sell widgets").await;
        assert!(result.is_err());
        // No state moved; the user may retry the same action.
        let session = c.session_snapshot();
        assert_eq!(session.current_step, 2);
        assert_eq!(session.responses.len(), 1);
        assert_eq!(c.mode(), StepMode::Answering);
        assert!(c.last_error().is_some());
        assert!(!c.is_busy());
    }

    #[tokio::test]
    async fn skip_to_end_completes_and_forwards_once() {
        let h = harness();
        let c = &h.controller;

        assert_eq!(c.skip_to_end().await, Advance::Completed);
        let session = c.session_snapshot();
        assert!(session.is_complete());
        assert_eq!(session.responses.len(), c.catalog().len());
        assert!(session.is_prefix_consistent());

        drain_tasks().await;
        let calls = h.forwarder.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].skipped);
        assert_eq!(calls[0].responses.len(), c.catalog().len());
        assert_eq!(calls[0].session_id, "test-session");
    }

    #[tokio::test]
    async fn operations_during_transition_are_ignored() {
        let h = harness_with(Duration::from_millis(600), false);
        let c = Arc::clone(&h.controller);

        let first = {
            let c = Arc::clone(&c);
            tokio::spawn(async move { c.submit_answer("Acme").await.unwrap() })
        };
        drain_tasks().await;
        assert!(c.is_busy());
        assert_eq!(c.phase(), AnimationPhase::Exiting);

        // Everything issued mid-transition is a silent no-op.
        assert_eq!(c.submit_answer("Twice").await.unwrap(), Advance::Ignored);
        assert_eq!(c.go_back().await, Rewind::Ignored);
        assert_eq!(c.skip_to_end().await, Advance::Ignored);

        h.clock.advance(Duration::from_millis(600));
        drain_tasks().await;
        h.clock.advance(Duration::from_millis(600));
        assert_eq!(first.await.unwrap(), Advance::Advanced { next_step: 2 });

        let session = c.session_snapshot();
        assert_eq!(session.responses.len(), 1);
        assert_eq!(session.responses[0].answer, "Acme");
        assert!(!c.is_busy());
    }

    #[tokio::test]
    async fn assistant_note_attaches_and_auto_clears() {
        let h = harness();
        let c = &h.controller;
        c.submit_answer("Acme").await.unwrap();

        drain_tasks().await;
        assert_eq!(c.assistant_note().as_deref(), Some("Great progress!"));
        assert_eq!(
            c.session_snapshot().responses[0].assistant_note.as_deref(),
            Some("Great progress!")
        );

        // The display window elapses; the committed note stays.
        h.clock.advance(Duration::from_secs(4));
        drain_tasks().await;
        assert!(c.assistant_note().is_none());
        assert!(c.session_snapshot().responses[0].assistant_note.is_some());
    }

    #[tokio::test]
    async fn amend_answer_changes_one_response_in_place() {
        let h = harness();
        let c = &h.controller;
        c.submit_answer("Acme").await.unwrap();
        c.submit_answer("We sell widgets").await.unwrap();
        c.submit_follow_up("To retailers").await.unwrap();

        assert!(c.amend_answer(1, "NewName"));
        let session = c.session_snapshot();
        assert_eq!(session.responses[0].answer, "NewName");
        assert_eq!(session.responses.len(), 2);
        assert_eq!(session.current_step, 3);
        // Later responses keep their follow-up data.
        assert_eq!(
            session.responses[1].follow_up_answer.as_deref(),
            Some("To retailers")
        );

        assert!(!c.amend_answer(9, "nope"));
        assert!(!c.amend_answer(1, "   "));
    }

    #[tokio::test]
    async fn rewind_to_truncates_and_reopens_the_interview() {
        let h = harness();
        let c = &h.controller;
        c.submit_answer("Acme").await.unwrap();
        c.submit_answer("We sell widgets").await.unwrap();
        c.submit_follow_up("To retailers").await.unwrap();
        assert!(c.session_snapshot().is_complete());

        assert!(c.rewind_to(2));
        let session = c.session_snapshot();
        assert_eq!(session.current_step, 2);
        assert_eq!(session.responses.len(), 1);
        assert!(!session.is_complete());
        assert!(session.is_prefix_consistent());

        // The interview can resume from the reopened step.
        let outcome = c.submit_answer("We build robots").await.unwrap();
        assert!(matches!(outcome, Advance::FollowUp { .. }));
    }

    #[tokio::test]
    async fn rewind_to_unanswered_step_is_rejected() {
        let h = harness();
        let c = &h.controller;
        c.submit_answer("Acme").await.unwrap();
        assert!(!c.rewind_to(2));
        assert!(!c.rewind_to(0));
    }
}
