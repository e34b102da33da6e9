use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::debug;

use crate::constants::MAX_TEXT_CHARS;

use super::error::{FieldError, FieldIssue, ValidationError};
use super::types::{GradingRequest, GradingRequestPayload, QuestionType};

pub const FIELD_QUESTION: &str = "question";
pub const FIELD_STUDENT_ANSWER: &str = "studentAnswer";
pub const FIELD_CORRECT_ANSWER: &str = "correctAnswer";
pub const FIELD_MAX_POINTS: &str = "maxPoints";
pub const FIELD_QUESTION_TYPE: &str = "questionType";

const EXPECTED_TEXT: &str = "a string";
const EXPECTED_NUMBER: &str = "a number";
const EXPECTED_QUESTION_TYPE: &str = "one of SHORT_ANSWER, ESSAY, MULTIPLE_CHOICE";

/// Reads a wire payload from a JSON object one field at a time.
///
/// A value of the wrong JSON type is reported as [`FieldIssue::InvalidType`]
/// under its wire name, together with whatever [`validate`] finds wrong with
/// the remaining fields. `null` counts as absent and unknown keys are ignored.
pub fn payload_from_json(
    object: &Map<String, Value>,
) -> Result<GradingRequestPayload, ValidationError> {
    let mut errors = Vec::new();

    let payload = GradingRequestPayload {
        question: typed_field(object, FIELD_QUESTION, EXPECTED_TEXT, &mut errors),
        student_answer: typed_field(object, FIELD_STUDENT_ANSWER, EXPECTED_TEXT, &mut errors),
        correct_answer: typed_field(object, FIELD_CORRECT_ANSWER, EXPECTED_TEXT, &mut errors),
        max_points: typed_field(object, FIELD_MAX_POINTS, EXPECTED_NUMBER, &mut errors),
        question_type: typed_field(
            object,
            FIELD_QUESTION_TYPE,
            EXPECTED_QUESTION_TYPE,
            &mut errors,
        ),
    };

    if errors.is_empty() {
        return Ok(payload);
    }

    if let Err(rest) = validate(payload) {
        for problem in rest.fields {
            if !errors.iter().any(|e| e.field == problem.field) {
                errors.push(problem);
            }
        }
    }
    Err(ValidationError::new(errors))
}

fn typed_field<T: DeserializeOwned>(
    object: &Map<String, Value>,
    field: &'static str,
    expected: &'static str,
    errors: &mut Vec<FieldError>,
) -> Option<T> {
    let value = object.get(field)?;
    match Option::<T>::deserialize(value) {
        Ok(parsed) => parsed,
        Err(e) => {
            debug!(field, error = %e, "Field has the wrong JSON type");
            errors.push(FieldError::new(field, FieldIssue::InvalidType { expected }));
            None
        }
    }
}

/// Validates a wire payload into a [`GradingRequest`].
///
/// Collects every problem before failing so callers can report all offending
/// fields in a single client error.
pub fn validate(payload: GradingRequestPayload) -> Result<GradingRequest, ValidationError> {
    let mut errors = Vec::new();

    let question_type = payload.question_type.unwrap_or_default();

    let question = required_text(FIELD_QUESTION, payload.question, &mut errors);
    let student_answer = required_text(FIELD_STUDENT_ANSWER, payload.student_answer, &mut errors);

    let correct_answer = payload
        .correct_answer
        .filter(|answer| !answer.trim().is_empty());
    if let Some(ref answer) = correct_answer {
        check_length(FIELD_CORRECT_ANSWER, answer, &mut errors);
    }
    if question_type == QuestionType::MultipleChoice && correct_answer.is_none() {
        errors.push(FieldError::new(
            FIELD_CORRECT_ANSWER,
            FieldIssue::RequiredFor { question_type },
        ));
    }

    let max_points = match payload.max_points {
        None => {
            errors.push(FieldError::new(FIELD_MAX_POINTS, FieldIssue::Missing));
            None
        }
        Some(value) if !value.is_finite() => {
            errors.push(FieldError::new(FIELD_MAX_POINTS, FieldIssue::NotFinite));
            None
        }
        Some(value) if value <= 0.0 => {
            errors.push(FieldError::new(
                FIELD_MAX_POINTS,
                FieldIssue::NotPositive { value },
            ));
            None
        }
        Some(value) => Some(value),
    };

    match (question, student_answer, max_points) {
        (Some(question), Some(student_answer), Some(max_points)) if errors.is_empty() => {
            Ok(GradingRequest {
                question,
                student_answer,
                correct_answer,
                max_points,
                question_type,
            })
        }
        _ => {
            debug!(fields = ?errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(), "Rejected grading request");
            Err(ValidationError::new(errors))
        }
    }
}

fn required_text(
    field: &'static str,
    value: Option<String>,
    errors: &mut Vec<FieldError>,
) -> Option<String> {
    match value {
        None => {
            errors.push(FieldError::new(field, FieldIssue::Missing));
            None
        }
        Some(text) if text.trim().is_empty() => {
            errors.push(FieldError::new(field, FieldIssue::Blank));
            None
        }
        Some(text) => {
            if check_length(field, &text, errors) {
                Some(text)
            } else {
                None
            }
        }
    }
}

fn check_length(field: &'static str, text: &str, errors: &mut Vec<FieldError>) -> bool {
    let actual = text.chars().count();
    if actual > MAX_TEXT_CHARS {
        errors.push(FieldError::new(
            field,
            FieldIssue::TooLong {
                max: MAX_TEXT_CHARS,
                actual,
            },
        ));
        return false;
    }
    true
}
