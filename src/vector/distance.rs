//! Distance kernels shared by both search backends.

/// Epsilon for floating-point norm comparisons.
const EPSILON: f32 = 1e-10;

/// Computes cosine similarity between two vectors.
///
/// Returns a value in [-1, 1], where 1 is most similar. A zero vector on
/// either side yields 0.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// Computes the inner product of two vectors.
#[must_use]
pub fn inner_product(a: &[f32], b: &[f32]) -> f32 {
    debug_assert_eq!(a.len(), b.len(), "vectors must have same dimension");

    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Normalizes a vector in-place to unit length.
///
/// A vector with near-zero norm is left unchanged.
pub fn normalize(vector: &mut [f32]) {
    let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > EPSILON {
        for value in vector.iter_mut() {
            *value /= norm;
        }
    }
}
