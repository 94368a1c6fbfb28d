//! Attribute-name vectors: produced as encoded rows for storage, and
//! consumed back into an exact inner-product index.
//!
//! Attribute names are indexed separately from the rest of the metadata
//! because their vectors are precomputed at ingestion time and kept in a
//! blob column; the index is rebuilt from those stored rows.

use tracing::{debug, info};

use crate::config::{BackendKind, IndexConfig};
use crate::error::IndexResult;
use crate::metadata::{AttributeVectorRow, AttributeVectorSource, Metadata};
use crate::vector::{self, EmbeddingError, EmbeddingSource, VectorDimension};

use super::{MetadataIndex, MetadataIndexBuilder, Point};

/// Encodes one storable row per attribute name with a known embedding.
///
/// For n attribute names of which m have embeddings, exactly m rows come
/// back.
pub fn attribute_vector_rows(
    metadata: &Metadata,
    embeddings: &dyn EmbeddingSource,
) -> Result<Vec<AttributeVectorRow>, EmbeddingError> {
    let mut rows = Vec::new();
    for name in &metadata.attribute_names {
        match embeddings.embedding(name)? {
            Some(embedding) => rows.push(AttributeVectorRow {
                dataset_id: metadata.dataset_id.clone(),
                attribute_name: name.clone(),
                embedding: vector::to_bytes(&embedding),
            }),
            None => {
                debug!(dataset = %metadata.dataset_id, attribute = %name, "no embedding for attribute, skipping");
            }
        }
    }
    Ok(rows)
}

/// Builds an exact inner-product index from stored attribute-vector rows.
///
/// Every blob is decoded through the vector codec and checked against
/// the expected dimension; a malformed blob aborts the build.
pub fn build_attribute_index(
    dimension: VectorDimension,
    source: &mut dyn AttributeVectorSource,
) -> IndexResult<MetadataIndex> {
    let config = IndexConfig {
        backend: BackendKind::InnerProduct,
        ..IndexConfig::default()
    };
    let mut builder = MetadataIndexBuilder::new(dimension, &config)?;

    while let Some(row) = source.next_row()? {
        let embedding = vector::from_bytes_with_dimension(&row.embedding, dimension)?;
        builder.insert(Point::new(embedding, row.dataset_id, row.attribute_name))?;
    }
    source.close()?;

    info!(points = builder.len(), "attribute index built");
    Ok(builder.finalize())
}
