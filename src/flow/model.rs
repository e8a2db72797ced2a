//! Session data model — committed responses, per-step mode, and the session
//! record with its prefix invariant.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::webhook::SubmissionPayload;

/// A committed answer for one catalog question.
///
/// Immutable once the step advances; changed only via review amend (in place)
/// or rewind (which discards it together with everything after it).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub question_id: u32,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assistant_note: Option<String>,
}

/// Per-step sub-state of the interview.
#[derive(Debug, Clone, PartialEq)]
pub enum StepMode {
    /// Collecting the primary answer for the current question.
    Answering,
    /// Collecting the answer to a generated follow-up. Carries the generated
    /// question and the already-validated primary answer.
    FollowUp { question: String, answer: String },
}

/// One founder's onboarding session.
///
/// `responses` is always the contiguous catalog prefix `1..current_step`, and
/// `completed_at` is set exactly when `current_step` is past the catalog end.
/// Every mutation rebuilds the response sequence rather than patching it, so
/// the prefix stays auditable.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub current_step: u32,
    pub responses: Vec<Response>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new(id: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            current_step: 1,
            responses: Vec::new(),
            started_at,
            completed_at: None,
        }
    }

    /// Whether the interview has run past the last catalog question.
    pub fn is_complete(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Responses form the contiguous catalog prefix and `current_step` sits
    /// one past them.
    pub fn is_prefix_consistent(&self) -> bool {
        self.responses
            .iter()
            .enumerate()
            .all(|(i, r)| r.question_id as usize == i + 1)
            && self.current_step as usize == self.responses.len() + 1
    }

    /// Append a committed response and advance one step.
    pub(crate) fn commit(&mut self, response: Response) {
        debug_assert_eq!(response.question_id, self.current_step);
        let mut responses = self.responses.clone();
        responses.push(response);
        self.responses = responses;
        self.current_step += 1;
        debug_assert!(self.is_prefix_consistent());
    }

    /// Drop the most recent committed response and step back by one.
    pub(crate) fn rewind_one(&mut self) {
        if self.responses.is_empty() {
            return;
        }
        self.responses = self.responses[..self.responses.len() - 1].to_vec();
        self.current_step -= 1;
        debug_assert!(self.is_prefix_consistent());
    }

    /// Re-enter the interview at `question_id`, discarding that response and
    /// everything after it. Clears the completion stamp, since the step is no
    /// longer past the catalog end.
    pub(crate) fn rewind_to(&mut self, question_id: u32) {
        self.responses = self
            .responses
            .iter()
            .take_while(|r| r.question_id < question_id)
            .cloned()
            .collect();
        self.current_step = question_id;
        self.completed_at = None;
        debug_assert!(self.is_prefix_consistent());
    }

    /// Replace one committed answer in place, leaving later responses alone.
    /// Returns false when no response with that id exists.
    pub(crate) fn amend(&mut self, question_id: u32, new_answer: &str) -> bool {
        if !self.responses.iter().any(|r| r.question_id == question_id) {
            return false;
        }
        self.responses = self
            .responses
            .iter()
            .map(|r| {
                if r.question_id == question_id {
                    Response {
                        answer: new_answer.to_string(),
                        ..r.clone()
                    }
                } else {
                    r.clone()
                }
            })
            .collect();
        true
    }

    /// Attach an assistant note to an already-committed response. No-op when
    /// the response is not committed yet; the note is cosmetic.
    pub(crate) fn attach_note(&mut self, question_id: u32, note: &str) -> bool {
        if !self.responses.iter().any(|r| r.question_id == question_id) {
            return false;
        }
        self.responses = self
            .responses
            .iter()
            .map(|r| {
                if r.question_id == question_id {
                    Response {
                        assistant_note: Some(note.to_string()),
                        ..r.clone()
                    }
                } else {
                    r.clone()
                }
            })
            .collect();
        true
    }

    /// Build the webhook submission payload. None until the session is
    /// complete.
    pub fn submission_payload(&self, total_questions: usize, skipped: bool) -> Option<SubmissionPayload> {
        let completed_at = self.completed_at?;
        Some(SubmissionPayload {
            session_id: self.id.clone(),
            responses: self.responses.clone(),
            completed_at,
            total_questions,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(id: u32, answer: &str) -> Response {
        Response {
            question_id: id,
            answer: answer.to_string(),
            follow_up_answer: None,
            assistant_note: None,
        }
    }

    fn session_with(n: u32) -> Session {
        let mut session = Session::new("s-1", Utc::now());
        for id in 1..=n {
            session.commit(response(id, &format!("answer {id}")));
        }
        session
    }

    #[test]
    fn commit_advances_and_keeps_prefix() {
        let session = session_with(3);
        assert_eq!(session.current_step, 4);
        assert_eq!(session.responses.len(), 3);
        assert!(session.is_prefix_consistent());
    }

    #[test]
    fn rewind_one_drops_latest() {
        let mut session = session_with(3);
        session.rewind_one();
        assert_eq!(session.current_step, 3);
        assert_eq!(session.responses.len(), 2);
        assert_eq!(session.responses.last().unwrap().question_id, 2);
        assert!(session.is_prefix_consistent());
    }

    #[test]
    fn rewind_to_truncates_at_and_after() {
        let mut session = session_with(3);
        session.completed_at = Some(Utc::now());
        session.rewind_to(2);
        assert_eq!(session.current_step, 2);
        assert_eq!(session.responses.len(), 1);
        assert_eq!(session.responses[0].question_id, 1);
        assert!(session.completed_at.is_none());
        assert!(session.is_prefix_consistent());
    }

    #[test]
    fn amend_changes_only_the_target() {
        let mut session = session_with(3);
        assert!(session.amend(1, "NewName"));
        assert_eq!(session.responses[0].answer, "NewName");
        assert_eq!(session.responses.len(), 3);
        assert_eq!(session.current_step, 4);
        assert_eq!(session.responses[1].answer, "answer 2");
    }

    #[test]
    fn amend_unknown_id_is_rejected() {
        let mut session = session_with(2);
        assert!(!session.amend(5, "nope"));
    }

    #[test]
    fn attach_note_only_on_committed_responses() {
        let mut session = session_with(2);
        assert!(session.attach_note(2, "Nice answer!"));
        assert_eq!(
            session.responses[1].assistant_note.as_deref(),
            Some("Nice answer!")
        );
        assert!(!session.attach_note(3, "too early"));
    }

    #[test]
    fn submission_payload_requires_completion() {
        let mut session = session_with(2);
        assert!(session.submission_payload(2, false).is_none());

        session.completed_at = Some(Utc::now());
        let payload = session.submission_payload(2, true).unwrap();
        assert_eq!(payload.responses.len(), 2);
        assert_eq!(payload.total_questions, 2);
        assert!(payload.skipped);
    }

    #[test]
    fn response_serde_skips_absent_fields() {
        let value = serde_json::to_value(response(1, "Acme")).unwrap();
        assert!(value.get("followUpAnswer").is_none());
        assert!(value.get("assistantNote").is_none());
    }
}
