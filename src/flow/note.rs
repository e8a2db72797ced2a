//! Assistant note — transient encouragement text with a fixed display window.
//!
//! The note is cosmetic: it may arrive after the step has already advanced
//! and auto-clears after the display window. A newer note supersedes an older
//! one; the older one's scheduled clear then does nothing.

use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::clock::Clock;

struct NoteState {
    question_id: u32,
    text: String,
    seq: u64,
}

/// Holder for the currently-visible assistant note.
#[derive(Default)]
pub struct AssistantNote {
    state: RwLock<Option<NoteState>>,
    seq: AtomicU64,
}

impl AssistantNote {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently-visible note, if any.
    pub fn current(&self) -> Option<String> {
        self.state
            .read()
            .expect("note lock poisoned")
            .as_ref()
            .map(|s| s.text.clone())
    }

    /// The currently-visible note, if it belongs to `question_id`.
    pub fn current_for(&self, question_id: u32) -> Option<String> {
        self.state
            .read()
            .expect("note lock poisoned")
            .as_ref()
            .filter(|s| s.question_id == question_id)
            .map(|s| s.text.clone())
    }

    fn set(&self, question_id: u32, text: String) -> u64 {
        let seq = self.seq.fetch_add(1, Ordering::SeqCst) + 1;
        *self.state.write().expect("note lock poisoned") = Some(NoteState {
            question_id,
            text,
            seq,
        });
        seq
    }

    fn clear_if_current(&self, seq: u64) {
        let mut state = self.state.write().expect("note lock poisoned");
        if state.as_ref().is_some_and(|s| s.seq == seq) {
            *state = None;
        }
    }

    /// Show a note for `question_id` and clear it after `window`, unless a
    /// newer note has replaced it in the meantime.
    pub async fn show_for(
        &self,
        question_id: u32,
        text: String,
        window: Duration,
        clock: &dyn Clock,
    ) {
        let seq = self.set(question_id, text);
        clock.sleep(window).await;
        self.clear_if_current(seq);
    }
}
