//! Error types for the flashcards_core library.

use std::io;
use std::path::PathBuf;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for flashcards_core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// TOML parsing error
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A card with this term is already in the store
    #[error("The card \"{0}\" already exists.")]
    DuplicateTerm(String),

    /// Another card already uses this definition
    #[error("The definition \"{0}\" already exists.")]
    DuplicateDefinition(String),

    /// No card with this term
    #[error("Can't remove \"{0}\": there is no such card.")]
    CardNotFound(String),

    /// Card file to import from does not exist
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Quiz length was not a whole number
    #[error("Invalid number of questions: {0:?}")]
    InvalidCount(String),
}
