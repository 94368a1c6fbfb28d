//! Write-oriented accumulation of points and the build driver.

use tracing::info;

use crate::config::{BackendKind, IndexConfig};
use crate::error::{IndexError, IndexResult};
use crate::metadata::{DatasetId, Metadata, MetadataSource};
use crate::vector::{Backend, EmbeddingSource, VectorDimension};

use super::{MetadataIndex, Point, aggregate};

/// Accumulates points into a similarity backend, then finalizes into an
/// immutable [`MetadataIndex`].
///
/// The builder holds exclusive ownership of the backend while building;
/// `finalize` consumes it, so inserting after finalize does not compile.
#[derive(Debug)]
pub struct MetadataIndexBuilder {
    backend: Backend,
    keys: Vec<super::PointKey>,
}

impl MetadataIndexBuilder {
    /// Creates an empty builder for the backend selected by `config`.
    pub fn new(dimension: VectorDimension, config: &IndexConfig) -> IndexResult<Self> {
        let backend = match config.backend {
            BackendKind::Cosine => Backend::cosine(dimension, &config.lsh_params())?,
            BackendKind::InnerProduct => Backend::inner_product(dimension),
        };

        Ok(Self {
            backend,
            keys: Vec::new(),
        })
    }

    /// Number of points inserted so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Vector dimension enforced by this builder.
    #[must_use]
    pub fn dimension(&self) -> VectorDimension {
        self.backend.dimension()
    }

    /// Appends one point.
    pub fn insert(&mut self, point: Point) -> IndexResult<()> {
        self.backend.insert(&point.vector)?;
        self.keys.push(point.key);
        Ok(())
    }

    /// Appends one point per (vector, value) pair, all keyed by
    /// `dataset_id`.
    ///
    /// The two lists must have equal length; a mismatch returns
    /// [`IndexError::LengthMismatch`] and inserts nothing. Dimensions
    /// are validated for the whole batch before the first insertion.
    pub fn insert_batch(
        &mut self,
        vectors: Vec<Vec<f32>>,
        dataset_id: &DatasetId,
        values: &[String],
    ) -> IndexResult<()> {
        if vectors.len() != values.len() {
            return Err(IndexError::LengthMismatch {
                vectors: vectors.len(),
                values: values.len(),
            });
        }
        for vector in &vectors {
            self.dimension().validate_vector(vector)?;
        }

        for (vector, value) in vectors.into_iter().zip(values) {
            self.insert(Point::new(vector, dataset_id.clone(), value.clone()))?;
        }
        Ok(())
    }

    /// Aggregates one metadata record and inserts all resulting points.
    pub fn insert_metadata(
        &mut self,
        metadata: &Metadata,
        embeddings: &dyn EmbeddingSource,
    ) -> IndexResult<()> {
        for point in aggregate::metadata_points(metadata, embeddings)? {
            self.insert(point)?;
        }
        Ok(())
    }

    /// Consumes the builder and yields the immutable, query-only index.
    #[must_use]
    pub fn finalize(self) -> MetadataIndex {
        MetadataIndex::new(self.backend, self.keys)
    }
}

/// Builds a metadata index by sequentially scanning a metadata source.
///
/// An empty source yields an empty index; a cursor or embedding-source
/// failure aborts the build.
pub fn build_metadata_index(
    dimension: VectorDimension,
    config: &IndexConfig,
    source: &mut dyn MetadataSource,
    embeddings: &dyn EmbeddingSource,
) -> IndexResult<MetadataIndex> {
    let mut builder = MetadataIndexBuilder::new(dimension, config)?;

    let mut records = 0usize;
    while let Some(metadata) = source.next_record()? {
        builder.insert_metadata(&metadata, embeddings)?;
        records += 1;
    }
    source.close()?;

    info!(records, points = builder.len(), "metadata index built");
    Ok(builder.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IndexConfig;
    use crate::metadata::MemoryMetadataSource;
    use crate::vector::{MockEmbeddingSource, VectorDimension};

    fn dim(n: usize) -> VectorDimension {
        VectorDimension::new(n).unwrap()
    }

    fn flat_config() -> IndexConfig {
        IndexConfig {
            backend: BackendKind::InnerProduct,
            ..IndexConfig::default()
        }
    }

    #[test]
    fn batch_arity_mismatch_fails_and_inserts_nothing() {
        let mut builder = MetadataIndexBuilder::new(dim(2), &flat_config()).unwrap();

        let result = builder.insert_batch(
            vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            &DatasetId::new("ds"),
            &["only-one".to_string()],
        );

        assert!(matches!(
            result,
            Err(IndexError::LengthMismatch {
                vectors: 2,
                values: 1
            })
        ));
        assert!(builder.is_empty());
    }

    #[test]
    fn batch_dimension_mismatch_fails_before_any_insertion() {
        let mut builder = MetadataIndexBuilder::new(dim(2), &flat_config()).unwrap();

        // Second vector has the wrong dimension; the first must not land
        let result = builder.insert_batch(
            vec![vec![1.0, 0.0], vec![0.0]],
            &DatasetId::new("ds"),
            &["a".to_string(), "b".to_string()],
        );

        assert!(result.is_err());
        assert!(builder.is_empty());
    }

    #[test]
    fn batch_insert_keys_every_point_by_the_dataset() {
        let mut builder = MetadataIndexBuilder::new(dim(2), &flat_config()).unwrap();

        builder
            .insert_batch(
                vec![vec![1.0, 0.0], vec![0.0, 1.0]],
                &DatasetId::new("ds"),
                &["a".to_string(), "b".to_string()],
            )
            .unwrap();
        assert_eq!(builder.len(), 2);

        let index = builder.finalize();
        let results = index.query(&[1.0, 1.0], 5).unwrap();
        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.dataset_id.as_str() == "ds"));
    }

    #[test]
    fn build_from_empty_source_succeeds_with_empty_index() {
        let mut source = MemoryMetadataSource::new(Vec::new());
        let embeddings = MockEmbeddingSource::new(dim(8));

        let index =
            build_metadata_index(dim(8), &IndexConfig::default(), &mut source, &embeddings)
                .unwrap();

        assert!(index.is_empty());
        let query = embeddings.token_vector("anything");
        assert!(index.query(&query, 3).unwrap().is_empty());
    }

    #[test]
    fn build_scans_every_record() {
        let records = vec![
            Metadata {
                dataset_id: DatasetId::new("ds-1"),
                name: "air quality".to_string(),
                description: "hourly sensor readings".to_string(),
                categories: vec![],
                tags: vec![],
                attribute_names: vec![],
            },
            Metadata {
                dataset_id: DatasetId::new("ds-2"),
                name: "water quality".to_string(),
                description: String::new(),
                categories: vec!["environment".to_string()],
                tags: vec![],
                attribute_names: vec![],
            },
        ];
        let mut source = MemoryMetadataSource::new(records);
        let embeddings = MockEmbeddingSource::new(dim(8));

        let index =
            build_metadata_index(dim(8), &IndexConfig::default(), &mut source, &embeddings)
                .unwrap();

        // ds-1: name + 3 description words; ds-2: name + 1 category
        assert_eq!(index.len(), 6);
    }
}
