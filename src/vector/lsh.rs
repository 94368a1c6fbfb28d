//! Approximate cosine-similarity search via random-hyperplane hashing.
//!
//! Each of the L tables hashes a vector to a signature of H sign bits,
//! one per random hyperplane (H ≤ 64, packed in a `u64`). Vectors with
//! small angles collide with high probability; querying unions the
//! bucket contents across tables and ranks the candidates by true
//! cosine similarity. False negatives are acceptable by design.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};

use crate::vector::distance::cosine_similarity;
use crate::vector::types::{VectorDimension, VectorError};

/// Hashing parameters, fixed for the whole lifetime of an index.
///
/// More tables raise recall; more hashes per table raise precision of
/// each bucket. The seed makes hyperplane generation reproducible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LshParams {
    pub tables: usize,
    pub hashes_per_table: usize,
    pub seed: u64,
}

impl Default for LshParams {
    fn default() -> Self {
        Self {
            tables: 8,
            hashes_per_table: 16,
            seed: 42,
        }
    }
}

impl LshParams {
    /// Validates table and hash counts.
    pub fn validate(&self) -> Result<(), VectorError> {
        if self.tables == 0 {
            return Err(VectorError::InvalidLshParams {
                reason: "at least one hash table is required",
            });
        }
        if self.hashes_per_table == 0 || self.hashes_per_table > 64 {
            return Err(VectorError::InvalidLshParams {
                reason: "hashes per table must be between 1 and 64",
            });
        }
        Ok(())
    }
}

/// Approximate cosine-similarity index.
#[derive(Debug)]
pub struct CosineLsh {
    dimension: VectorDimension,
    hashes_per_table: usize,

    /// tables × hashes_per_table hyperplanes, generated once at
    /// construction from the seed.
    hyperplanes: Vec<Vec<f32>>,

    /// signature → offsets, one map per table.
    tables: Vec<HashMap<u64, Vec<u32>>>,

    /// Flat vector storage for candidate re-ranking; offset i starts at
    /// i × dimension.
    vectors: Vec<f32>,
}

impl CosineLsh {
    /// Creates an empty index with hyperplanes drawn from the seed.
    pub fn new(dimension: VectorDimension, params: &LshParams) -> Result<Self, VectorError> {
        params.validate()?;

        let mut rng = StdRng::seed_from_u64(params.seed);
        let plane_count = params.tables * params.hashes_per_table;
        let mut hyperplanes = Vec::with_capacity(plane_count);
        for _ in 0..plane_count {
            let plane: Vec<f32> = (0..dimension.get())
                .map(|_| rng.random::<f32>() * 2.0 - 1.0)
                .collect();
            hyperplanes.push(plane);
        }

        Ok(Self {
            dimension,
            hashes_per_table: params.hashes_per_table,
            hyperplanes,
            tables: vec![HashMap::new(); params.tables],
            vectors: Vec::new(),
        })
    }

    /// Number of stored vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.vectors.len() / self.dimension.get()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vector dimension of this index.
    #[must_use]
    pub fn dimension(&self) -> VectorDimension {
        self.dimension
    }

    /// Sign-bit signature of a vector under one table's hyperplanes.
    fn signature(&self, table: usize, vector: &[f32]) -> u64 {
        let base = table * self.hashes_per_table;
        let mut bits = 0u64;
        for hash in 0..self.hashes_per_table {
            let plane = &self.hyperplanes[base + hash];
            let dot: f32 = plane.iter().zip(vector).map(|(p, v)| p * v).sum();
            if dot >= 0.0 {
                bits |= 1 << hash;
            }
        }
        bits
    }

    /// Inserts a vector, assigning it the next insertion-order offset.
    pub fn insert(&mut self, vector: &[f32]) -> Result<(), VectorError> {
        self.dimension.validate_vector(vector)?;

        let offset = self.len() as u32;
        for table in 0..self.tables.len() {
            let signature = self.signature(table, vector);
            self.tables[table]
                .entry(signature)
                .or_default()
                .push(offset);
        }
        self.vectors.extend_from_slice(vector);
        Ok(())
    }

    fn stored(&self, offset: u32) -> &[f32] {
        let dim = self.dimension.get();
        let start = offset as usize * dim;
        &self.vectors[start..start + dim]
    }

    /// Approximate top-k by cosine similarity.
    ///
    /// Candidates come from the query's bucket in every table; each
    /// candidate is then scored with true cosine similarity. Returns
    /// `(offset, similarity)` pairs, descending, at most k.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, VectorError> {
        self.dimension.validate_vector(query)?;

        let mut candidates = HashSet::new();
        for table in 0..self.tables.len() {
            let signature = self.signature(table, query);
            if let Some(bucket) = self.tables[table].get(&signature) {
                candidates.extend(bucket.iter().copied());
            }
        }

        let mut scored: Vec<(usize, f32)> = candidates
            .into_iter()
            .map(|offset| {
                (
                    offset as usize,
                    cosine_similarity(query, self.stored(offset)),
                )
            })
            .collect();

        // Descending by similarity; ties break on insertion order so
        // results are stable across runs
        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);
        Ok(scored)
    }
}
