//! Semantic similarity search over dataset metadata.
//!
//! The crate turns structured metadata records (name, description,
//! categories, tags, attribute names) into fixed-dimension embedding
//! vectors, accumulates them in a write-oriented builder, and finalizes
//! the result into an immutable index answering top-k similarity queries
//! keyed by dataset identity.
//!
//! Two interchangeable backends sit behind one capability: an
//! approximate cosine index based on random-hyperplane hashing, and an
//! exact inner-product index over a flat vector table.

pub mod config;
pub mod error;
pub mod index;
pub mod metadata;
pub mod vector;

// Explicit exports for better API clarity
pub use config::{BackendKind, EmbeddingConfig, IndexConfig, Settings};
pub use error::{IndexError, IndexResult};
pub use index::{
    MetadataIndex, MetadataIndexBuilder, Point, PointKey, SearchResult, attribute_vector_rows,
    build_attribute_index, build_metadata_index, metadata_points,
};
pub use metadata::{
    AttributeVectorRow, AttributeVectorSource, DatasetId, MemoryAttributeVectorSource,
    MemoryMetadataSource, Metadata, MetadataError, MetadataSource,
};
pub use vector::{
    Backend, CosineLsh, EmbeddingError, EmbeddingSource, FastEmbedSource, FlatInnerProduct,
    LshParams, Score, VectorDimension, VectorError,
};
