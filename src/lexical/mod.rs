//! Exact and near-exact lexical matching.
//!
//! Settles the common case of a literally correct answer without calling a
//! semantic backend, so those grades are reproducible regardless of backend
//! availability or drift.

pub mod config;
pub mod matcher;
pub mod types;


pub use config::MatcherConfig;
pub use matcher::{LexicalMatcher, token_coverage};
pub use types::{LexicalCredit, MatchKind};
