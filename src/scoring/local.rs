//! In-process scoring backends that need no network or model.

use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::normalize::{content_tokens, term_frequencies};

use super::backend::ScoringBackend;
use super::error::BackendError;
use super::types::{RubricMode, ScoringBackendResponse, ScoringContext};

/// Below this keyword recall a strict (short-answer) rubric awards nothing.
const STRICT_MIN_RECALL: f64 = 0.5;

const MAX_LISTED_TERMS: usize = 6;

pub const KEYWORD_CONFIDENCE: f64 = 0.55;
pub const TERM_VECTOR_CONFIDENCE: f64 = 0.6;

/// Awards credit for the rubric's key terms found in the answer.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordBackend;

impl KeywordBackend {
    pub fn new() -> Self {
        Self
    }

    fn evaluate(&self, context: &ScoringContext<'_>) -> Result<ScoringBackendResponse, BackendError> {
        require_reference(self.name(), context)?;
        let keywords = content_tokens(context.rubric_text());
        if keywords.is_empty() {
            return Err(BackendError::rejected(
                self.name(),
                "rubric has no key terms to look for",
            ));
        }

        let answer = content_tokens(context.student_answer);
        let (matched, missing): (Vec<&String>, Vec<&String>) =
            keywords.iter().partition(|k| answer.contains(*k));

        let recall = matched.len() as f64 / keywords.len() as f64;
        let fraction = match context.rubric {
            RubricMode::Strict if recall < STRICT_MIN_RECALL => 0.0,
            _ => recall,
        };

        let mut rationale = format!(
            "Found {} of {} key terms",
            matched.len(),
            keywords.len()
        );
        if !matched.is_empty() {
            rationale.push_str(&format!(" ({})", list_terms(&matched)));
        }
        rationale.push('.');
        if !missing.is_empty() {
            rationale.push_str(&format!(" Missing: {}.", list_terms(&missing)));
        }

        Ok(ScoringBackendResponse::new(
            fraction * context.max_points,
            rationale,
        ))
    }
}

#[async_trait]
impl ScoringBackend for KeywordBackend {
    fn name(&self) -> &str {
        "keyword"
    }

    fn confidence(&self) -> f64 {
        KEYWORD_CONFIDENCE
    }

    async fn score(
        &self,
        context: &ScoringContext<'_>,
    ) -> Result<ScoringBackendResponse, BackendError> {
        self.evaluate(context)
    }
}

/// Cosine similarity of term-frequency vectors.
///
/// Strict rubrics pass the similarity through a logistic curve so that weak
/// overlap earns close to nothing and strong overlap close to full credit.
#[derive(Debug, Clone, Copy, Default)]
pub struct TermVectorBackend;

impl TermVectorBackend {
    pub fn new() -> Self {
        Self
    }

    fn evaluate(&self, context: &ScoringContext<'_>) -> Result<ScoringBackendResponse, BackendError> {
        require_reference(self.name(), context)?;
        let rubric = term_frequencies(context.rubric_text());
        if rubric.is_empty() {
            return Err(BackendError::rejected(
                self.name(),
                "rubric has no terms to compare against",
            ));
        }
        let answer = term_frequencies(context.student_answer);

        let similarity = cosine_similarity(&answer, &rubric);
        let fraction = match context.rubric {
            RubricMode::Strict => sharpen(similarity),
            RubricMode::PartialCredit => similarity,
        };

        let rationale = format!(
            "Answer wording is {:.0}% similar to the expected answer.",
            similarity * 100.0
        );

        Ok(ScoringBackendResponse::new(
            fraction * context.max_points,
            rationale,
        ))
    }
}

#[async_trait]
impl ScoringBackend for TermVectorBackend {
    fn name(&self) -> &str {
        "term-vector"
    }

    fn confidence(&self) -> f64 {
        TERM_VECTOR_CONFIDENCE
    }

    async fn score(
        &self,
        context: &ScoringContext<'_>,
    ) -> Result<ScoringBackendResponse, BackendError> {
        self.evaluate(context)
    }
}

/// Local backends only grade against a reference answer.
fn require_reference(backend: &str, context: &ScoringContext<'_>) -> Result<(), BackendError> {
    if context.is_open_rubric() {
        return Err(BackendError::rejected(
            backend,
            "no reference answer to compare against",
        ));
    }
    Ok(())
}

/// Cosine similarity in `[0, 1]`; zero if either vector is empty.
pub fn cosine_similarity(a: &BTreeMap<String, u32>, b: &BTreeMap<String, u32>) -> f64 {
    let dot: f64 = a
        .iter()
        .filter_map(|(term, &x)| b.get(term).map(|&y| x as f64 * y as f64))
        .sum();
    let norm = |v: &BTreeMap<String, u32>| v.values().map(|&x| (x as f64).powi(2)).sum::<f64>().sqrt();
    let denom = norm(a) * norm(b);
    if denom == 0.0 {
        return 0.0;
    }
    (dot / denom).clamp(0.0, 1.0)
}

/// Logistic curve centred on 0.5, pinned to 0 and 1 at the ends.
fn sharpen(x: f64) -> f64 {
    let logistic = |v: f64| 1.0 / (1.0 + (-8.0 * (v - 0.5)).exp());
    let lo = logistic(0.0);
    let hi = logistic(1.0);
    ((logistic(x) - lo) / (hi - lo)).clamp(0.0, 1.0)
}

fn list_terms(terms: &[&String]) -> String {
    let shown: Vec<&str> = terms.iter().take(MAX_LISTED_TERMS).map(|t| t.as_str()).collect();
    let mut listed = shown.join(", ");
    if terms.len() > MAX_LISTED_TERMS {
        listed.push_str(", ...");
    }
    listed
}
