//! Review stage — amend committed answers and gate final submission behind
//! an explicit disclaimer acknowledgement.
//!
//! In-place corrections and flow rewinds both route through the session
//! controller's mutation contract, so the prefix invariant stays with one
//! owner.

use std::sync::Arc;

use crate::webhook::{ForwardOutcome, WebhookForwarder};

use super::controller::SessionController;

/// Result of a submission attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum ApprovalOutcome {
    /// The acknowledgement box is not checked (or approval was never
    /// requested); nothing was sent.
    NotAcknowledged,
    /// The session is not complete yet; nothing was sent.
    NotReady,
    /// Forwarded successfully; carries the classified collaborator reply.
    Submitted(ForwardOutcome),
    /// Forwarding failed. The session still counts as submitted; the error is
    /// surfaced as supplementary information.
    SubmittedWithError(String),
}

/// Presents the committed response set for amendment and drives the final
/// submission.
pub struct ReviewController {
    controller: Arc<SessionController>,
    forwarder: Arc<dyn WebhookForwarder>,
    editing: Option<u32>,
    awaiting_acknowledgement: bool,
    acknowledged: bool,
    submitted: bool,
}

impl ReviewController {
    /// The review stage receives the session by reference; it never
    /// constructs or destroys it.
    pub fn new(controller: Arc<SessionController>, forwarder: Arc<dyn WebhookForwarder>) -> Self {
        Self {
            controller,
            forwarder,
            editing: None,
            awaiting_acknowledgement: false,
            acknowledged: false,
            submitted: false,
        }
    }

    /// The question currently open for editing, if any.
    pub fn editing(&self) -> Option<u32> {
        self.editing
    }

    /// Whether the session has been submitted (successfully or not).
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Open one committed answer for editing. Only one question is editable
    /// at a time; a second call switches to the other question.
    pub fn begin_edit(&mut self, question_id: u32) -> bool {
        let known = self
            .controller
            .session_snapshot()
            .responses
            .iter()
            .any(|r| r.question_id == question_id);
        if !known {
            return false;
        }
        self.editing = Some(question_id);
        true
    }

    /// Discard the open edit.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Replace the open question's answer in place. Unlike a flow rewind,
    /// this leaves every later response untouched.
    pub fn save_edit(&mut self, question_id: u32, new_answer: &str) -> bool {
        if self.editing != Some(question_id) {
            return false;
        }
        if !self.controller.amend_answer(question_id, new_answer) {
            return false;
        }
        self.editing = None;
        true
    }

    /// Re-enter the interview at `question_id`, truncating all responses at
    /// or after it.
    pub fn edit_from_review(&mut self, question_id: u32) -> bool {
        self.editing = None;
        self.controller.rewind_to(question_id)
    }

    /// Open the disclaimer acknowledgement prompt. Does not submit.
    pub fn request_approval(&mut self) {
        self.awaiting_acknowledgement = true;
    }

    /// Record the acknowledgement checkbox.
    pub fn set_acknowledged(&mut self, agreed: bool) {
        self.acknowledged = agreed;
    }

    /// Submit the session to the workflow webhook.
    ///
    /// A no-op unless approval was requested and acknowledged. Forwarding
    /// failure still marks the session submitted; there is no rollback into
    /// the interview.
    pub async fn confirm_approval(&mut self) -> ApprovalOutcome {
        if !(self.awaiting_acknowledgement && self.acknowledged) {
            return ApprovalOutcome::NotAcknowledged;
        }

        let session = self.controller.session_snapshot();
        let Some(payload) = session.submission_payload(self.controller.catalog().len(), false)
        else {
            return ApprovalOutcome::NotReady;
        };

        self.submitted = true;
        self.awaiting_acknowledgement = false;
        match self.forwarder.forward(&payload).await {
            Ok(outcome) => {
                tracing::info!(session_id = %payload.session_id, "Session submitted for analysis");
                ApprovalOutcome::Submitted(outcome)
            }
            Err(e) => {
                tracing::warn!(session_id = %payload.session_id, error = %e, "Submission forward failed");
                ApprovalOutcome::SubmittedWithError(e.to_string())
            }
        }
    }
}
