//! Type-safe wrappers and error types for vector operations.
//!
//! Newtypes here prevent primitive obsession at the index boundary:
//! dimensions are validated once at construction, and scores carry a
//! total ordering so result lists can be sorted without NaN panics.

use thiserror::Error;

/// Type-safe wrapper for vector dimensions.
///
/// The dimension of an index is fixed by the embedding source that feeds
/// it; every vector inserted into (or queried against) one index must
/// match it exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorDimension(usize);

impl VectorDimension {
    /// Creates a new `VectorDimension` with validation.
    ///
    /// Returns an error if the dimension is zero.
    pub fn new(dim: usize) -> Result<Self, VectorError> {
        if dim == 0 {
            return Err(VectorError::InvalidDimension {
                dimension: 0,
                reason: "vector dimension cannot be zero",
            });
        }
        Ok(Self(dim))
    }

    /// Returns the underlying dimension value.
    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }

    /// Validates that a vector has the expected dimension.
    pub fn validate_vector(&self, vector: &[f32]) -> Result<(), VectorError> {
        if vector.len() != self.0 {
            return Err(VectorError::DimensionMismatch {
                expected: self.0,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

/// Type-safe wrapper for similarity scores.
///
/// Cosine scores land in [-1, 1]; inner-product scores are unbounded.
/// Construction rejects NaN, which is what makes the `Ord` impl total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Score(f32);

impl Score {
    /// Creates a new `Score` with validation.
    ///
    /// Returns an error if the value is NaN.
    pub fn new(value: f32) -> Result<Self, VectorError> {
        if value.is_nan() {
            return Err(VectorError::InvalidScore {
                value,
                reason: "score cannot be NaN",
            });
        }
        Ok(Self(value))
    }

    /// Returns the underlying f32 value.
    #[must_use]
    pub fn get(&self) -> f32 {
        self.0
    }
}

impl Eq for Score {}

impl PartialOrd for Score {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Score {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Errors that can occur during vector operations.
#[derive(Error, Debug)]
pub enum VectorError {
    #[error(
        "vector dimension mismatch: expected {expected}, got {actual}\nSuggestion: ensure all vectors come from the same embedding source"
    )]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid vector dimension: {dimension}\nReason: {reason}")]
    InvalidDimension {
        dimension: usize,
        reason: &'static str,
    },

    #[error("invalid score value: {value}\nReason: {reason}")]
    InvalidScore { value: f32, reason: &'static str },

    #[error(
        "invalid vector encoding: {len} bytes is not a whole number of little-endian f32 values"
    )]
    InvalidEncoding { len: usize },

    #[error("invalid hashing parameters: {reason}")]
    InvalidLshParams { reason: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_construction_rejects_zero() {
        let dim = VectorDimension::new(300).unwrap();
        assert_eq!(dim.get(), 300);

        assert!(VectorDimension::new(0).is_err());
    }

    #[test]
    fn dimension_validates_vectors() {
        let dim = VectorDimension::new(4).unwrap();

        assert!(dim.validate_vector(&[0.1, 0.2, 0.3, 0.4]).is_ok());
        assert!(dim.validate_vector(&[0.1, 0.2]).is_err());
    }

    #[test]
    fn score_rejects_nan_and_orders_totally() {
        assert!(Score::new(f32::NAN).is_err());

        let low = Score::new(-0.5).unwrap();
        let high = Score::new(2.5).unwrap();
        assert!(low < high);
        assert_eq!(high.get(), 2.5);
    }
}
