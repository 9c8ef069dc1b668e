#![forbid(unsafe_code)]

//! Core domain model and business logic for the flashcards trainer.
//!
//! This crate provides:
//! - Domain types (cards, quiz verdicts, hardest-card reports)
//! - The card store with per-card mistake tracking
//! - The plain-text card file format
//! - Quiz selection and answer evaluation
//! - Configuration and logging setup
//! - The interactive command session

pub mod types;
pub mod error;
pub mod store;
pub mod cardfile;
pub mod quiz;
pub mod config;
pub mod logging;
pub mod session;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use store::CardStore;
pub use config::Config;
pub use quiz::{evaluate, QuizPlan};
pub use session::{Command, Session, SessionOptions};
