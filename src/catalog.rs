//! Question catalog — the fixed, ordered list of onboarding questions.
//!
//! Question ids run 1..N without gaps and define the interview order. The
//! catalog is consumed read-only by the session controller.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Topic area a question belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Basic,
    Market,
    Product,
    Business,
    Validation,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Basic => "basic",
            Self::Market => "market",
            Self::Product => "product",
            Self::Business => "business",
            Self::Validation => "validation",
        };
        write!(f, "{s}")
    }
}

/// Which input widget collects the answer, and therefore which validity rule
/// applies to a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Textarea,
    Select,
    Multiselect,
}

impl InputKind {
    /// Whether this kind carries a fixed option list.
    pub fn is_choice(&self) -> bool {
        matches!(self, Self::Select | Self::Multiselect)
    }
}

/// One catalog question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub category: Category,
    pub prompt: String,
    pub input: InputKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    /// If true, answering this question triggers exactly one generated
    /// follow-up sub-question before advancing.
    pub follow_up: bool,
    /// Canned answer used by the skip-to-end diagnostic path.
    pub sample_answer: String,
}

impl Question {
    /// Whether a draft answer satisfies this question's input kind.
    ///
    /// Free-text answers must be non-empty after trimming. A select answer
    /// must match one option exactly; a multiselect answer is a
    /// comma-separated list where every entry matches an option.
    pub fn accepts(&self, draft: &str) -> bool {
        let draft = draft.trim();
        if draft.is_empty() {
            return false;
        }
        match self.input {
            InputKind::Text | InputKind::Textarea => true,
            InputKind::Select => self.options.iter().any(|o| o == draft),
            InputKind::Multiselect => draft
                .split(',')
                .map(str::trim)
                .all(|part| !part.is_empty() && self.options.iter().any(|o| o == part)),
        }
    }
}

/// The ordered, validated question list.
#[derive(Debug, Clone)]
pub struct QuestionCatalog {
    questions: Vec<Question>,
}

impl QuestionCatalog {
    /// Build a catalog, enforcing contiguous 1..N ids and the
    /// options-iff-choice rule.
    pub fn new(questions: Vec<Question>) -> Result<Self, CatalogError> {
        if questions.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (position, question) in questions.iter().enumerate() {
            if question.id as usize != position + 1 {
                return Err(CatalogError::NonContiguousId {
                    position,
                    id: question.id,
                });
            }
            if question.input.is_choice() && question.options.is_empty() {
                return Err(CatalogError::MissingOptions { id: question.id });
            }
            if !question.input.is_choice() && !question.options.is_empty() {
                return Err(CatalogError::UnexpectedOptions { id: question.id });
            }
        }
        Ok(Self { questions })
    }

    /// The built-in founder questionnaire.
    pub fn standard() -> Self {
        let text = |id, category, prompt: &str, follow_up, sample: &str| Question {
            id,
            category,
            prompt: prompt.to_string(),
            input: InputKind::Text,
            options: Vec::new(),
            follow_up,
            sample_answer: sample.to_string(),
        };
        let textarea = |id, category, prompt: &str, follow_up, sample: &str| Question {
            input: InputKind::Textarea,
            ..text(id, category, prompt, follow_up, sample)
        };
        let choice = |id, category, prompt: &str, input, options: &[&str], sample: &str| Question {
            id,
            category,
            prompt: prompt.to_string(),
            input,
            options: options.iter().map(|o| o.to_string()).collect(),
            follow_up: false,
            sample_answer: sample.to_string(),
        };

        let questions = vec![
            text(
                1,
                Category::Basic,
                "What's the name of your startup?",
                false,
                "Acme Robotics",
            ),
            textarea(
                2,
                Category::Basic,
                "Describe what your startup does in one or two sentences.",
                true,
                "We build autonomous delivery robots that move lab samples and supplies around hospital campuses.",
            ),
            textarea(
                3,
                Category::Market,
                "Who is your target customer?",
                true,
                "Operations directors at mid-size hospitals with multiple buildings.",
            ),
            textarea(
                4,
                Category::Market,
                "How large is the market you are going after?",
                false,
                "Roughly $4B annually across North American hospital logistics.",
            ),
            textarea(
                5,
                Category::Product,
                "What makes your product different from existing alternatives?",
                true,
                "Our robots navigate elevators and badge-controlled doors without any building retrofit.",
            ),
            choice(
                6,
                Category::Product,
                "What stage is your product at?",
                InputKind::Select,
                &["Idea", "Prototype", "Beta", "Launched", "Scaling"],
                "Prototype",
            ),
            choice(
                7,
                Category::Business,
                "What is your primary revenue model?",
                InputKind::Select,
                &[
                    "Subscription",
                    "Transaction fees",
                    "Licensing",
                    "Advertising",
                    "Not sure yet",
                ],
                "Subscription",
            ),
            textarea(
                8,
                Category::Business,
                "How do you plan to acquire your first customers?",
                false,
                "Pilot programs with two hospital networks we already have warm introductions to.",
            ),
            choice(
                9,
                Category::Validation,
                "Which forms of validation do you have so far?",
                InputKind::Multiselect,
                &[
                    "Customer interviews",
                    "Waitlist signups",
                    "Letters of intent",
                    "Paying customers",
                    "None yet",
                ],
                "Customer interviews, Letters of intent",
            ),
            textarea(
                10,
                Category::Validation,
                "What is the biggest risk that could kill this startup?",
                true,
                "Hospital procurement cycles are slow enough to outlast our runway.",
            ),
        ];

        Self::new(questions).expect("standard catalog is valid")
    }

    /// Number of questions.
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// Look up a question by catalog id.
    pub fn get(&self, id: u32) -> Option<&Question> {
        if id == 0 {
            return None;
        }
        self.questions.get(id as usize - 1)
    }

    /// All questions in catalog order.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}
