//! Error types for the metadata indexing pipeline.
//!
//! The taxonomy separates invariant violations (programming or data
//! errors that must fail loudly) from structural failures of the
//! external collaborators (metadata store, embedding source), so callers
//! can decide to abort a build or log and continue.

use thiserror::Error;

use crate::metadata::MetadataError;
use crate::vector::{EmbeddingError, VectorError};

/// Main error type for building and querying metadata indices.
#[derive(Error, Debug)]
pub enum IndexError {
    /// Batch insertion called with vector and value lists of different
    /// lengths. Nothing is inserted when this is returned.
    #[error(
        "vector/value arity mismatch: {vectors} vectors for {values} values\nSuggestion: batch insertion requires one value string per embedding vector"
    )]
    LengthMismatch { vectors: usize, values: usize },

    /// Top-k query issued with k = 0.
    #[error("query limit must be at least 1")]
    InvalidLimit,

    /// Dimension, encoding, or hashing-parameter violations.
    #[error(transparent)]
    Vector(#[from] VectorError),

    /// The embedding source failed structurally (model initialization or
    /// lookup I/O), as opposed to a token merely having no embedding.
    #[error("embedding source failure: {0}")]
    Embedding(#[from] EmbeddingError),

    /// The metadata store cursor failed while reading or closing.
    #[error("metadata source failure: {0}")]
    Metadata(#[from] MetadataError),
}

impl IndexError {
    /// True for programming or data errors that should abort the caller,
    /// as opposed to I/O failures of an external collaborator.
    #[must_use]
    pub fn is_invariant_violation(&self) -> bool {
        matches!(
            self,
            Self::LengthMismatch { .. } | Self::InvalidLimit | Self::Vector(_)
        )
    }
}

/// Result type alias for index operations
pub type IndexResult<T> = Result<T, IndexError>;
