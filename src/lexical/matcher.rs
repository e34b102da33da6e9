use std::collections::BTreeSet;

use tracing::debug;

use crate::constants::{EXACT_CONFIDENCE, NEAR_EXACT_CONFIDENCE};
use crate::normalize::{normalize, tokens};
use crate::request::{GradingRequest, QuestionType};

use super::config::MatcherConfig;
use super::types::{LexicalCredit, MatchKind};

/// Cheap, deterministic pre-check run before any semantic scoring.
#[derive(Debug, Clone, Default)]
pub struct LexicalMatcher {
    config: MatcherConfig,
}

impl LexicalMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Returns credit when the request can be settled lexically.
    ///
    /// Multiple-choice requests always settle here. Free-text requests settle
    /// only when a reference answer exists and the answer matches it exactly or
    /// near-exactly; `None` means "fall through to semantic scoring".
    pub fn evaluate(&self, request: &GradingRequest) -> Option<LexicalCredit> {
        let reference = request.correct_answer()?;

        if request.question_type() == QuestionType::MultipleChoice {
            return Some(self.multiple_choice(request.student_answer(), reference));
        }

        self.compare(request.student_answer(), reference)
    }

    /// Free-text comparison against a reference answer.
    pub fn compare(&self, student: &str, reference: &str) -> Option<LexicalCredit> {
        let student_norm = normalize(student);
        let reference_norm = normalize(reference);

        if reference_norm.is_empty() {
            debug!("Reference normalizes to empty text, skipping lexical match");
            return None;
        }

        if student_norm == reference_norm {
            debug!("Exact normalized match");
            return Some(LexicalCredit::new(MatchKind::Exact, 1.0, EXACT_CONFIDENCE));
        }

        let student_tokens = tokens(student);
        let reference_tokens = tokens(reference);
        if reference_tokens.is_empty() {
            return None;
        }

        let near_exact = self.config.near_exact_discount;

        if contains_phrase(&student_tokens, &reference_tokens) {
            debug!("Reference phrase contained in student answer");
            return Some(LexicalCredit::new(
                MatchKind::Contained,
                near_exact,
                NEAR_EXACT_CONFIDENCE,
            ));
        }

        let coverage = token_coverage(&student_tokens, &reference_tokens);
        if coverage >= self.config.overlap_threshold {
            debug!(
                coverage = coverage,
                threshold = self.config.overlap_threshold,
                "Token overlap above threshold"
            );
            return Some(LexicalCredit::new(
                MatchKind::TokenOverlap { coverage },
                near_exact,
                NEAR_EXACT_CONFIDENCE,
            ));
        }

        debug!(
            coverage = coverage,
            threshold = self.config.overlap_threshold,
            "No lexical match"
        );
        None
    }

    /// Deterministic equality for multiple-choice answers.
    pub fn multiple_choice(&self, selected: &str, correct: &str) -> LexicalCredit {
        if normalize(selected) == normalize(correct) {
            LexicalCredit::new(MatchKind::ChoiceSelected, 1.0, EXACT_CONFIDENCE)
        } else {
            LexicalCredit::new(MatchKind::ChoiceMismatch, 0.0, EXACT_CONFIDENCE)
        }
    }
}

/// Share of distinct reference tokens present in the student answer.
pub fn token_coverage(student: &[String], reference: &[String]) -> f64 {
    let reference_set: BTreeSet<&str> = reference.iter().map(String::as_str).collect();
    if reference_set.is_empty() {
        return 0.0;
    }
    let student_set: BTreeSet<&str> = student.iter().map(String::as_str).collect();
    let found = reference_set.intersection(&student_set).count();
    found as f64 / reference_set.len() as f64
}

fn contains_phrase(haystack: &[String], needle: &[String]) -> bool {
    if needle.is_empty() || needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|window| window == needle)
}
