//! Grading request types and input validation.
//!
//! A [`GradingRequestPayload`] is what arrives from a caller; a
//! [`GradingRequest`] is what the pipeline consumes. The only way from one to
//! the other is [`validate`], which reports every missing or invalid field.

pub mod error;
pub mod types;
pub mod validate;


pub use error::{FieldError, FieldErrorBody, FieldIssue, ValidationError};
pub use types::{GradingRequest, GradingRequestPayload, QuestionType};
pub use validate::{
    FIELD_CORRECT_ANSWER, FIELD_MAX_POINTS, FIELD_QUESTION, FIELD_QUESTION_TYPE,
    FIELD_STUDENT_ANSWER, payload_from_json, validate,
};
