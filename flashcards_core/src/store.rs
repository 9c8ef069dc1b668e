//! In-memory card store with per-card mistake tracking.
//!
//! Cards are kept in insertion order so that exports are deterministic.
//! Each entry carries its own mistake counter, which keeps the set of
//! tracked terms identical to the set of cards. Hash indexes over terms and
//! definitions keep lookups constant-time as decks grow.

use crate::{Card, Error, HardestCards, Result};
use std::collections::HashMap;
use std::path::Path;

/// Owned collection of flashcards
#[derive(Clone, Debug, Default)]
pub struct CardStore {
    cards: Vec<Card>,

    /// Term -> position in `cards`
    by_term: HashMap<String, usize>,

    /// Definition -> positions in `cards`, ascending. Imports may share a
    /// definition between several terms.
    by_definition: HashMap<String, Vec<usize>>,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> {
        self.cards.iter()
    }

    /// Terms in insertion order
    pub fn terms(&self) -> Vec<&str> {
        self.cards.iter().map(|c| c.term.as_str()).collect()
    }

    pub fn get(&self, term: &str) -> Option<&Card> {
        self.by_term.get(term).map(|&idx| &self.cards[idx])
    }

    pub fn definition_of(&self, term: &str) -> Option<&str> {
        self.get(term).map(|c| c.definition.as_str())
    }

    pub fn mistakes_of(&self, term: &str) -> Option<u32> {
        self.get(term).map(|c| c.mistakes)
    }

    /// Term of the earliest card whose definition equals `definition`
    pub fn term_for_definition(&self, definition: &str) -> Option<&str> {
        self.by_definition
            .get(definition)
            .and_then(|positions| positions.first())
            .map(|&idx| self.cards[idx].term.as_str())
    }

    /// Term of the earliest card other than `term` defined as `definition`
    pub fn other_term_for_definition(&self, term: &str, definition: &str) -> Option<&str> {
        self.by_definition
            .get(definition)?
            .iter()
            .map(|&idx| self.cards[idx].term.as_str())
            .find(|other| *other != term)
    }

    /// Fail with `DuplicateTerm` if the term is taken
    pub fn check_term(&self, term: &str) -> Result<()> {
        if self.by_term.contains_key(term) {
            return Err(Error::DuplicateTerm(term.to_string()));
        }
        Ok(())
    }

    /// Fail with `DuplicateDefinition` if another card uses the definition
    pub fn check_definition(&self, definition: &str) -> Result<()> {
        if self.by_definition.contains_key(definition) {
            return Err(Error::DuplicateDefinition(definition.to_string()));
        }
        Ok(())
    }

    /// Add a new card with a zero mistake count
    ///
    /// The store is left untouched when either check fails.
    pub fn add(&mut self, term: &str, definition: &str) -> Result<()> {
        self.check_term(term)?;
        self.check_definition(definition)?;

        self.push(Card::new(term, definition));
        tracing::debug!("Added card {:?}", term);
        Ok(())
    }

    /// Remove a card together with its mistake count
    pub fn remove(&mut self, term: &str) -> Result<Card> {
        let idx = *self
            .by_term
            .get(term)
            .ok_or_else(|| Error::CardNotFound(term.to_string()))?;

        let card = self.cards.remove(idx);
        self.reindex();
        tracing::debug!("Removed card {:?}", term);
        Ok(card)
    }

    /// Insert or overwrite a card
    ///
    /// An existing term keeps its mistake count; a new term starts at 0.
    pub fn upsert(&mut self, term: &str, definition: &str) {
        let Some(&idx) = self.by_term.get(term) else {
            self.push(Card::new(term, definition));
            return;
        };

        if self.cards[idx].definition == definition {
            return;
        }

        let old = std::mem::replace(&mut self.cards[idx].definition, definition.to_string());
        self.unlink_definition(&old, idx);
        self.link_definition(definition, idx);
    }

    /// Write all cards to `path`, returning how many were written
    pub fn export(&self, path: &Path) -> Result<usize> {
        let pairs: Vec<(&str, &str)> = self
            .cards
            .iter()
            .map(|c| (c.term.as_str(), c.definition.as_str()))
            .collect();

        crate::cardfile::write_cards(path, &pairs)?;
        tracing::info!("Exported {} cards to {:?}", pairs.len(), path);
        Ok(pairs.len())
    }

    /// Load cards from `path`, returning how many were read
    ///
    /// Imported definitions overwrite existing ones. Mistake counts of
    /// already tracked terms are preserved.
    pub fn import(&mut self, path: &Path) -> Result<usize> {
        let pairs = crate::cardfile::read_cards(path)?;
        for (term, definition) in &pairs {
            self.upsert(term, definition);
        }

        tracing::info!("Imported {} cards from {:?}", pairs.len(), path);
        Ok(pairs.len())
    }

    /// Count one wrong answer against `term`
    pub fn record_mistake(&mut self, term: &str) -> Result<u32> {
        let idx = *self
            .by_term
            .get(term)
            .ok_or_else(|| Error::CardNotFound(term.to_string()))?;

        let card = &mut self.cards[idx];
        card.mistakes += 1;
        Ok(card.mistakes)
    }

    /// Cards with the highest mistake count, or `None` when nobody has errors
    pub fn hardest_cards(&self) -> Option<HardestCards> {
        let max = self.cards.iter().map(|c| c.mistakes).max().unwrap_or(0);
        if max == 0 {
            return None;
        }

        let terms = self
            .cards
            .iter()
            .filter(|c| c.mistakes == max)
            .map(|c| c.term.clone())
            .collect();

        Some(HardestCards {
            terms,
            mistakes: max,
        })
    }

    pub fn reset_stats(&mut self) {
        for card in &mut self.cards {
            card.mistakes = 0;
        }
    }

    fn push(&mut self, card: Card) {
        let idx = self.cards.len();
        self.by_term.insert(card.term.clone(), idx);
        self.link_definition(&card.definition, idx);
        self.cards.push(card);
    }

    fn link_definition(&mut self, definition: &str, idx: usize) {
        let positions = self.by_definition.entry(definition.to_string()).or_default();
        if let Err(pos) = positions.binary_search(&idx) {
            positions.insert(pos, idx);
        }
    }

    fn unlink_definition(&mut self, definition: &str, idx: usize) {
        if let Some(positions) = self.by_definition.get_mut(definition) {
            positions.retain(|&p| p != idx);
            if positions.is_empty() {
                self.by_definition.remove(definition);
            }
        }
    }

    /// Rebuild both indexes after positions shift
    fn reindex(&mut self) {
        self.by_term.clear();
        self.by_definition.clear();
        for (idx, card) in self.cards.iter().enumerate() {
            self.by_term.insert(card.term.clone(), idx);
            self.by_definition
                .entry(card.definition.clone())
                .or_default()
                .push(idx);
        }
    }
}
