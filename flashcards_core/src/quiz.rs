//! Quiz selection and answer evaluation.
//!
//! Selection rules:
//! - `n <= cards`: sample `n` distinct terms
//! - `n > cards`: every term once (shuffled), then `n - cards` uniform
//!   picks with replacement

use crate::{CardStore, Error, Result, Verdict};
use rand::seq::SliceRandom;
use rand::Rng;

/// Order in which quiz terms are asked
///
/// Only the distinct first pass is materialized; repeat picks are drawn one
/// at a time, so memory stays bounded by the store size whatever `n` is.
#[derive(Clone, Debug)]
pub struct QuizPlan {
    first_pass: Vec<String>,
    terms: Vec<String>,
    asked: usize,
    total: usize,
}

impl QuizPlan {
    /// Plan `n` questions over the current cards
    pub fn new<R: Rng + ?Sized>(store: &CardStore, n: usize, rng: &mut R) -> Self {
        let terms: Vec<String> = store.terms().into_iter().map(String::from).collect();
        let total = if terms.is_empty() { 0 } else { n };

        let mut first_pass: Vec<String> = terms
            .choose_multiple(rng, total.min(terms.len()))
            .cloned()
            .collect();
        first_pass.reverse();

        tracing::debug!("Planned {} questions over {} cards", total, terms.len());
        Self {
            first_pass,
            terms,
            asked: 0,
            total,
        }
    }

    /// Questions not asked yet
    pub fn remaining(&self) -> usize {
        self.total - self.asked
    }

    /// Next term to ask, `None` once the plan is exhausted
    pub fn next_term<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<String> {
        if self.asked >= self.total {
            return None;
        }

        let term = match self.first_pass.pop() {
            Some(term) => term,
            None => self.terms.choose(rng)?.clone(),
        };
        self.asked += 1;
        Some(term)
    }
}

/// Judge `answer` for the card `term` without touching mistake counts
pub fn evaluate(store: &CardStore, term: &str, answer: &str) -> Result<Verdict> {
    let expected = store
        .definition_of(term)
        .ok_or_else(|| Error::CardNotFound(term.to_string()))?;

    if answer == expected {
        return Ok(Verdict::Correct);
    }

    let matched = store.other_term_for_definition(term, answer).map(String::from);

    Ok(match matched {
        Some(matched_term) => Verdict::CrossMatch {
            expected: expected.to_string(),
            matched_term,
        },
        None => Verdict::Wrong {
            expected: expected.to_string(),
        },
    })
}

/// Judge `answer` and count a mistake against `term` when it is wrong
pub fn check_answer(store: &mut CardStore, term: &str, answer: &str) -> Result<Verdict> {
    let verdict = evaluate(store, term, answer)?;
    if !verdict.is_correct() {
        let mistakes = store.record_mistake(term)?;
        tracing::debug!("{:?} now has {} mistakes", term, mistakes);
    }
    Ok(verdict)
}
