//! Exact inner-product search over a flat vector table.
//!
//! The engine follows the classic flat-index contract: `search` always
//! fills exactly k score and label slots, padding exhausted slots with
//! the [`NO_MATCH`] sentinel. Callers are expected to filter the
//! sentinel and slice the scores to the real match count; the
//! [`Backend`](crate::vector::Backend) wrapper does exactly that.

use crate::vector::distance::inner_product;
use crate::vector::types::{VectorDimension, VectorError};

/// Sentinel label for a result slot with no match.
pub const NO_MATCH: i64 = -1;

/// Exact inner-product index over a contiguous vector table.
#[derive(Debug)]
pub struct FlatInnerProduct {
    dimension: VectorDimension,

    /// Row-major vector table; row i starts at i × dimension.
    data: Vec<f32>,
}

impl FlatInnerProduct {
    /// Creates an empty index for the given dimension.
    #[must_use]
    pub fn new(dimension: VectorDimension) -> Self {
        Self {
            dimension,
            data: Vec::new(),
        }
    }

    /// Number of stored vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len() / self.dimension.get()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Vector dimension of this index.
    #[must_use]
    pub fn dimension(&self) -> VectorDimension {
        self.dimension
    }

    /// Appends one vector; its offset is the previous length.
    pub fn add(&mut self, vector: &[f32]) -> Result<(), VectorError> {
        self.dimension.validate_vector(vector)?;
        self.data.extend_from_slice(vector);
        Ok(())
    }

    /// Exact top-k by inner product.
    ///
    /// Returns exactly k score slots and k label slots. When fewer than
    /// k vectors are stored, trailing labels hold [`NO_MATCH`] and their
    /// score slots are meaningless.
    pub fn search(&self, query: &[f32], k: usize) -> Result<(Vec<f32>, Vec<i64>), VectorError> {
        self.dimension.validate_vector(query)?;

        let dim = self.dimension.get();
        let mut scored: Vec<(usize, f32)> = self
            .data
            .chunks_exact(dim)
            .enumerate()
            .map(|(offset, row)| (offset, inner_product(query, row)))
            .collect();
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);

        let mut scores = vec![f32::NEG_INFINITY; k];
        let mut labels = vec![NO_MATCH; k];
        for (slot, (offset, score)) in scored.into_iter().enumerate() {
            scores[slot] = score;
            labels[slot] = offset as i64;
        }
        Ok((scores, labels))
    }
}
