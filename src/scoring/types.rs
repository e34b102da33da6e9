use crate::request::{GradingRequest, QuestionType};

#[derive(Debug, Clone, PartialEq)]
/// Raw backend output, before clamping and rounding.
pub struct ScoringBackendResponse {
    /// Score on the `[0, max_points]` scale (not yet trusted).
    pub raw_score: f64,
    /// Short natural-language justification.
    pub rationale: String,
}

impl ScoringBackendResponse {
    pub fn new(raw_score: f64, rationale: impl Into<String>) -> Self {
        Self {
            raw_score,
            rationale: rationale.into(),
        }
    }

    /// Returns `true` if the score is a finite number within `[0, max_points]`.
    pub fn is_on_scale(&self, max_points: f64) -> bool {
        self.raw_score.is_finite() && (0.0..=max_points).contains(&self.raw_score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// How generously a backend should award partial credit.
pub enum RubricMode {
    /// Short answers: require strong overlap with the expected answer.
    Strict,
    /// Essays: award credit for partially correct spans.
    PartialCredit,
}

impl RubricMode {
    pub fn for_question_type(question_type: QuestionType) -> Self {
        match question_type {
            QuestionType::Essay => RubricMode::PartialCredit,
            QuestionType::ShortAnswer | QuestionType::MultipleChoice => RubricMode::Strict,
        }
    }
}

#[derive(Debug, Clone, Copy)]
/// Everything a backend may look at. Borrowed from the request.
pub struct ScoringContext<'a> {
    pub question: &'a str,
    pub student_answer: &'a str,
    pub reference_answer: Option<&'a str>,
    pub max_points: f64,
    pub question_type: QuestionType,
    pub rubric: RubricMode,
}

impl<'a> ScoringContext<'a> {
    pub fn from_request(request: &'a GradingRequest) -> Self {
        Self {
            question: request.question(),
            student_answer: request.student_answer(),
            reference_answer: request.correct_answer(),
            max_points: request.max_points(),
            question_type: request.question_type(),
            rubric: RubricMode::for_question_type(request.question_type()),
        }
    }

    /// Reference answer, or the question itself for open rubrics.
    pub fn rubric_text(&self) -> &'a str {
        self.reference_answer.unwrap_or(self.question)
    }

    pub fn is_open_rubric(&self) -> bool {
        self.reference_answer.is_none()
    }
}
