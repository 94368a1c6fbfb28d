//! One search capability over two interchangeable engines.
//!
//! The variant is selected at construction and fixed for the lifetime of
//! the index. Both engines identify vectors by insertion-order offset;
//! mapping offsets back to dataset identity happens one layer up, in
//! [`MetadataIndex`](crate::index::MetadataIndex).

use crate::vector::flat::{FlatInnerProduct, NO_MATCH};
use crate::vector::lsh::{CosineLsh, LshParams};
use crate::vector::types::{Score, VectorDimension, VectorError};

/// A similarity-search backend: approximate cosine or exact inner
/// product.
#[derive(Debug)]
pub enum Backend {
    Cosine(CosineLsh),
    InnerProduct(FlatInnerProduct),
}

impl Backend {
    /// Approximate cosine backend with the given hashing parameters.
    pub fn cosine(dimension: VectorDimension, params: &LshParams) -> Result<Self, VectorError> {
        Ok(Self::Cosine(CosineLsh::new(dimension, params)?))
    }

    /// Exact inner-product backend.
    #[must_use]
    pub fn inner_product(dimension: VectorDimension) -> Self {
        Self::InnerProduct(FlatInnerProduct::new(dimension))
    }

    /// Vector dimension enforced by this backend.
    #[must_use]
    pub fn dimension(&self) -> VectorDimension {
        match self {
            Self::Cosine(index) => index.dimension(),
            Self::InnerProduct(index) => index.dimension(),
        }
    }

    /// Number of stored vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Cosine(index) => index.len(),
            Self::InnerProduct(index) => index.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts a vector at the next insertion-order offset.
    pub fn insert(&mut self, vector: &[f32]) -> Result<(), VectorError> {
        match self {
            Self::Cosine(index) => index.insert(vector),
            Self::InnerProduct(index) => index.add(vector),
        }
    }

    /// Top-k by this backend's similarity measure.
    ///
    /// Returns `(offset, score)` pairs, descending, with engine-level
    /// sentinel slots already filtered out and scores sliced to the real
    /// match count.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, Score)>, VectorError> {
        match self {
            Self::Cosine(index) => index
                .search(query, k)?
                .into_iter()
                .map(|(offset, score)| Ok((offset, Score::new(score)?)))
                .collect(),
            Self::InnerProduct(index) => {
                let (scores, labels) = index.search(query, k)?;
                let mut results = Vec::new();
                for (&score, &label) in scores.iter().zip(&labels) {
                    if label == NO_MATCH {
                        break;
                    }
                    results.push((label as usize, Score::new(score)?));
                }
                Ok(results)
            }
        }
    }
}
