//! Shared helpers for integration tests.

use datalink::{EmbeddingError, EmbeddingSource, VectorDimension};
use std::collections::HashSet;

/// Deterministic embedding source: every token maps to a unit vector
/// derived from its bytes, except tokens registered as unknown.
pub struct StubEmbeddings {
    dimension: VectorDimension,
    missing: HashSet<String>,
}

impl StubEmbeddings {
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension: VectorDimension::new(dimension).unwrap(),
            missing: HashSet::new(),
        }
    }

    #[allow(dead_code)]
    pub fn with_missing(mut self, tokens: &[&str]) -> Self {
        self.missing = tokens.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn token_vector(&self, token: &str) -> Vec<f32> {
        let dim = self.dimension.get();
        let mut state: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in token.bytes() {
            state ^= u64::from(byte);
            state = state.wrapping_mul(0x0000_0100_0000_01b3);
        }

        let mut vector = Vec::with_capacity(dim);
        for _ in 0..dim {
            state = state
                .wrapping_mul(6_364_136_223_846_793_005)
                .wrapping_add(1_442_695_040_888_963_407);
            let unit = (state >> 40) as f32 / (1u32 << 24) as f32;
            vector.push(unit * 2.0 - 1.0);
        }
        normalize(&mut vector);
        vector
    }

    pub fn sequence_vector(&self, tokens: &[&str]) -> Vec<f32> {
        let mut sum = vec![0.0f32; self.dimension.get()];
        for token in tokens {
            for (acc, value) in sum.iter_mut().zip(self.token_vector(token)) {
                *acc += value;
            }
        }
        normalize(&mut sum);
        sum
    }
}

fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 1e-10 {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}

impl EmbeddingSource for StubEmbeddings {
    fn embedding(&self, token: &str) -> Result<Option<Vec<f32>>, EmbeddingError> {
        if self.missing.contains(token) {
            return Ok(None);
        }
        Ok(Some(self.token_vector(token)))
    }

    fn sequence_embedding(&self, tokens: &[&str]) -> Result<Option<Vec<f32>>, EmbeddingError> {
        if tokens.is_empty() || tokens.iter().any(|t| self.missing.contains(*t)) {
            return Ok(None);
        }
        Ok(Some(self.sequence_vector(tokens)))
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }
}
