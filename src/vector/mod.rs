//! Vector primitives for the similarity index.
//!
//! This module owns everything that works on raw `f32` vectors: the byte
//! codec used at the storage boundary, the distance kernels, the
//! embedding-source seam, and the two search engines (approximate cosine
//! LSH and exact inner-product flat scan) unified behind [`Backend`].

mod backend;
mod codec;
mod distance;
mod embedding;
mod flat;
mod lsh;
mod types;

// Re-export core types for public API
pub use backend::Backend;
pub use codec::{from_bytes, from_bytes_with_dimension, to_bytes};
pub use distance::{cosine_similarity, inner_product, normalize};
#[cfg(test)]
pub use embedding::MockEmbeddingSource;
pub use embedding::{EmbeddingError, EmbeddingSource, FastEmbedSource, parse_embedding_model};
pub use flat::{FlatInnerProduct, NO_MATCH};
pub use lsh::{CosineLsh, LshParams};
pub use types::{Score, VectorDimension, VectorError};
