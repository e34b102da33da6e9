#[derive(Debug, Clone, Copy, PartialEq)]
/// How a lexical match was established.
pub enum MatchKind {
    /// Normalized strings are identical.
    Exact,
    /// The reference appears as a whole-token phrase inside the student answer.
    Contained,
    /// Enough reference tokens appear in the student answer.
    TokenOverlap {
        /// Share of reference tokens found.
        coverage: f64,
    },
    /// Multiple-choice answer equals the correct option.
    ChoiceSelected,
    /// Multiple-choice answer differs from the correct option.
    ChoiceMismatch,
}

impl MatchKind {
    /// Short debug string.
    pub fn debug_status(&self) -> &'static str {
        match self {
            MatchKind::Exact => "EXACT",
            MatchKind::Contained => "CONTAINED",
            MatchKind::TokenOverlap { .. } => "TOKEN_OVERLAP",
            MatchKind::ChoiceSelected => "CHOICE_SELECTED",
            MatchKind::ChoiceMismatch => "CHOICE_MISMATCH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
/// Credit awarded by the lexical matcher; short-circuits the pipeline.
pub struct LexicalCredit {
    pub kind: MatchKind,
    /// Fraction of `max_points` to award, in `[0, 1]`.
    pub credit: f64,
    pub confidence: f64,
}

impl LexicalCredit {
    pub fn new(kind: MatchKind, credit: f64, confidence: f64) -> Self {
        Self {
            kind,
            credit,
            confidence,
        }
    }
}
