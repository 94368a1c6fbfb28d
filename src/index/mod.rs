//! Building and querying the metadata similarity index.
//!
//! The lifecycle is linear: a [`MetadataIndexBuilder`] accumulates
//! points, `finalize` consumes it into an immutable [`MetadataIndex`],
//! and the index answers top-k queries until dropped. Insertion after
//! finalize is unrepresentable because finalize takes the builder by
//! value.

mod aggregate;
mod attribute;
mod builder;

pub use aggregate::{
    category_points, description_points, metadata_points, name_point, tag_points,
};
pub use attribute::{attribute_vector_rows, build_attribute_index};
pub use builder::{MetadataIndexBuilder, build_metadata_index};

use crate::error::{IndexError, IndexResult};
use crate::metadata::DatasetId;
use crate::vector::{Backend, Score, VectorDimension};

/// Identity of one point: which dataset it belongs to and which metadata
/// value produced it.
///
/// An explicit composite key, so "dataset `a`, value `bc`" can never
/// collide with "dataset `ab`, value `c`".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PointKey {
    pub dataset_id: DatasetId,
    pub value: String,
}

/// One embedding vector keyed by dataset identity.
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub vector: Vec<f32>,
    pub key: PointKey,
}

impl Point {
    #[must_use]
    pub fn new(vector: Vec<f32>, dataset_id: DatasetId, value: impl Into<String>) -> Self {
        Self {
            vector,
            key: PointKey {
                dataset_id,
                value: value.into(),
            },
        }
    }
}

/// One ranked query hit.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    pub dataset_id: DatasetId,
    pub score: Score,
}

/// Finalized, query-only similarity index over metadata points.
///
/// Immutable after finalize; queries take `&self` and are safe to issue
/// from multiple threads concurrently.
#[derive(Debug)]
pub struct MetadataIndex {
    backend: Backend,

    /// Offset → point key, appended in lockstep with backend insertion,
    /// so every offset the backend returns is a valid index here.
    keys: Vec<PointKey>,
}

impl MetadataIndex {
    pub(crate) fn new(backend: Backend, keys: Vec<PointKey>) -> Self {
        Self { backend, keys }
    }

    /// Number of indexed points.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Vector dimension of this index.
    #[must_use]
    pub fn dimension(&self) -> VectorDimension {
        self.backend.dimension()
    }

    /// Top-k datasets whose indexed points are most similar to `vector`.
    ///
    /// Results are descending by score, at most k long, and empty when
    /// the index is empty or nothing matches. A dataset appears once per
    /// matching point. Internal offsets never escape this call.
    pub fn query(&self, vector: &[f32], k: usize) -> IndexResult<Vec<SearchResult>> {
        if k == 0 {
            return Err(IndexError::InvalidLimit);
        }

        let hits = self.backend.search(vector, k)?;
        Ok(hits
            .into_iter()
            .map(|(offset, score)| SearchResult {
                dataset_id: self.keys[offset].dataset_id.clone(),
                score,
            })
            .collect())
    }
}
