//! Core domain types for the flashcards trainer.
//!
//! This module defines the fundamental types used throughout the system:
//! - Cards and their mistake counters
//! - Quiz verdicts
//! - Hardest-card reports

use std::fmt;

// ============================================================================
// Cards
// ============================================================================

/// A single flashcard with its mistake counter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub term: String,
    pub definition: String,
    pub mistakes: u32,
}

impl Card {
    /// Create a card with no recorded mistakes
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
            mistakes: 0,
        }
    }
}

// ============================================================================
// Quiz
// ============================================================================

/// Outcome of checking one answer against the store
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Correct,

    /// Wrong, but the answer is the definition of another card
    CrossMatch { expected: String, matched_term: String },

    Wrong { expected: String },
}

impl Verdict {
    pub fn is_correct(&self) -> bool {
        matches!(self, Verdict::Correct)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Correct => write!(f, "Correct!"),
            Verdict::CrossMatch {
                expected,
                matched_term,
            } => write!(
                f,
                "Wrong. The right answer is \"{}\", but your definition is correct for \"{}\".",
                expected, matched_term
            ),
            Verdict::Wrong { expected } => {
                write!(f, "Wrong. The right answer is \"{}\".", expected)
            }
        }
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Cards sharing the highest non-zero mistake count
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HardestCards {
    /// Terms in insertion order
    pub terms: Vec<String>,
    pub mistakes: u32,
}

impl fmt::Display for HardestCards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self.terms.iter().map(|t| format!("\"{}\"", t)).collect();
        let (noun, verb, pronoun) = if self.terms.len() == 1 {
            ("card", "is", "it")
        } else {
            ("cards", "are", "them")
        };
        let errors = if self.mistakes == 1 { "error" } else { "errors" };

        write!(
            f,
            "The hardest {} {} {}. You have {} {} answering {}.",
            noun,
            verb,
            quoted.join(", "),
            self.mistakes,
            errors,
            pronoun
        )
    }
}
