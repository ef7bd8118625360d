//! Parse-time diagnostics.

use vesper_ast::Position;

/// A lexing or parsing failure. Carries the position it was raised at
/// so the embedder can point at the offending line, but nothing fancier
/// (no multi-span diagnostics, no recovery) — conformance-grade
/// diagnostics are out of scope for this crate.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{position:?}: {message}")]
pub struct Error {
    pub message: String,
    pub position: Position,
}

impl Error {
    pub fn new(message: impl Into<String>, position: Position) -> Self {
        Self {
            message: message.into(),
            position,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
