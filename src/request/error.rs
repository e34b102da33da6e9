use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::types::QuestionType;

/// What is wrong with a single request field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldIssue {
    /// Field was absent (or `null`).
    Missing,
    /// Field was present but empty after trimming.
    Blank,
    /// Numeric field must be strictly positive.
    NotPositive { value: f64 },
    /// Numeric field was NaN or infinite.
    NotFinite,
    /// Text exceeded the character limit.
    TooLong { max: usize, actual: usize },
    /// Field is optional in general but required for this question type.
    RequiredFor { question_type: QuestionType },
    /// JSON value has the wrong type (or an unknown enum variant).
    InvalidType { expected: &'static str },
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldIssue::Missing => write!(f, "is required"),
            FieldIssue::Blank => write!(f, "must not be empty"),
            FieldIssue::NotPositive { value } => write!(f, "must be greater than 0 (got {})", value),
            FieldIssue::NotFinite => write!(f, "must be a finite number"),
            FieldIssue::TooLong { max, actual } => {
                write!(f, "must be at most {} characters (got {})", max, actual)
            }
            FieldIssue::RequiredFor { question_type } => {
                write!(f, "is required for {} questions", question_type.as_str())
            }
            FieldIssue::InvalidType { expected } => write!(f, "must be {}", expected),
        }
    }
}

/// A single invalid or missing field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldError {
    /// Wire (camelCase) field name.
    pub field: String,
    pub issue: FieldIssue,
}

impl FieldError {
    pub fn new(field: impl Into<String>, issue: FieldIssue) -> Self {
        Self {
            field: field.into(),
            issue,
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` {}", self.field, self.issue)
    }
}

/// Serializable view of a [`FieldError`] for error responses.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldErrorBody {
    pub field: String,
    pub reason: String,
}

impl From<&FieldError> for FieldErrorBody {
    fn from(err: &FieldError) -> Self {
        Self {
            field: err.field.clone(),
            reason: err.issue.to_string(),
        }
    }
}

/// A grading request was malformed. Enumerates every offending field.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("invalid grading request: {}", summarize(.fields))]
pub struct ValidationError {
    pub fields: Vec<FieldError>,
}

fn summarize(fields: &[FieldError]) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    pub fn new(fields: Vec<FieldError>) -> Self {
        Self { fields }
    }

    /// Returns `true` if `field` is among the offending fields.
    pub fn names(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.field.as_str()).collect()
    }

    /// Prefixes every field name, e.g. `requests[2].maxPoints` for batch requests.
    pub fn with_prefix(self, prefix: &str) -> Self {
        Self {
            fields: self
                .fields
                .into_iter()
                .map(|f| FieldError::new(format!("{}.{}", prefix, f.field), f.issue))
                .collect(),
        }
    }

    pub fn bodies(&self) -> Vec<FieldErrorBody> {
        self.fields.iter().map(FieldErrorBody::from).collect()
    }
}
