use serde::{Deserialize, Serialize};

use super::error::ValidationError;
use super::validate::validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
/// Kind of question being graded.
pub enum QuestionType {
    /// Short free-text answer; graded strictly.
    #[default]
    ShortAnswer,
    /// Long free-text answer; partial credit allowed.
    Essay,
    /// Selected option; graded by deterministic equality only.
    MultipleChoice,
}

impl QuestionType {
    /// Wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestionType::ShortAnswer => "SHORT_ANSWER",
            QuestionType::Essay => "ESSAY",
            QuestionType::MultipleChoice => "MULTIPLE_CHOICE",
        }
    }

    /// Returns `true` for question types that may go through semantic scoring.
    pub fn is_free_text(&self) -> bool {
        !matches!(self, QuestionType::MultipleChoice)
    }
}

impl std::fmt::Display for QuestionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unvalidated grading request as received on the wire.
///
/// Every field is optional so that validation can report all problems at once.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GradingRequestPayload {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub student_answer: Option<String>,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub max_points: Option<f64>,
    #[serde(default)]
    pub question_type: Option<QuestionType>,
}

impl GradingRequestPayload {
    /// Validates the payload into an immutable [`GradingRequest`].
    pub fn validate(self) -> Result<GradingRequest, ValidationError> {
        validate(self)
    }
}

/// A validated, immutable grading request.
///
/// Only constructible through validation, so every instance satisfies:
/// non-blank `question` and `student_answer`, finite `max_points > 0`, and a
/// `correct_answer` that is either absent or non-blank.
#[derive(Debug, Clone, PartialEq)]
pub struct GradingRequest {
    pub(super) question: String,
    pub(super) student_answer: String,
    pub(super) correct_answer: Option<String>,
    pub(super) max_points: f64,
    pub(super) question_type: QuestionType,
}

impl GradingRequest {
    /// Builds and validates a request in one step.
    pub fn new(
        question: impl Into<String>,
        student_answer: impl Into<String>,
        correct_answer: Option<String>,
        max_points: f64,
        question_type: QuestionType,
    ) -> Result<Self, ValidationError> {
        GradingRequestPayload {
            question: Some(question.into()),
            student_answer: Some(student_answer.into()),
            correct_answer,
            max_points: Some(max_points),
            question_type: Some(question_type),
        }
        .validate()
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn student_answer(&self) -> &str {
        &self.student_answer
    }

    pub fn correct_answer(&self) -> Option<&str> {
        self.correct_answer.as_deref()
    }

    pub fn max_points(&self) -> f64 {
        self.max_points
    }

    pub fn question_type(&self) -> QuestionType {
        self.question_type
    }

    /// Returns `true` when there is no reference answer (open rubric).
    pub fn is_open_rubric(&self) -> bool {
        self.correct_answer.is_none()
    }

    /// Text the student answer is compared against when no semantic backend
    /// is involved: the reference answer, or the question for open rubrics.
    pub fn comparison_text(&self) -> &str {
        self.correct_answer.as_deref().unwrap_or(&self.question)
    }
}
