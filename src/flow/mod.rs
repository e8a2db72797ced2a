//! Interview flow — the session state machine and its transition model.
//!
//! The flow walks the question catalog one step at a time. Each step collects
//! an answer, optionally branches into a generated follow-up sub-question,
//! and commits a response; visible step changes run through a timed two-phase
//! transition so state mutation never races the rendering layer. After the
//! last question the review stage takes over for amendments and the final
//! webhook submission.

pub mod animation;
pub mod controller;
pub mod model;
pub mod note;
pub mod review;

pub use animation::{AnimationController, AnimationPhase, Direction};
pub use controller::{Advance, FlowDeps, Rewind, SessionController};
pub use model::{Response, Session, StepMode};
pub use note::AssistantNote;
pub use review::{ApprovalOutcome, ReviewController};
