//! Turning one metadata record into index points.
//!
//! Each semantically atomic unit becomes its own point: the whole name
//! (one aggregated lookup for the token sequence), every description
//! word, every category, and every tag. A unit whose embedding is
//! missing is skipped without failing the record; a structural failure
//! of the embedding source aborts the whole record.

use tracing::debug;

use crate::metadata::Metadata;
use crate::vector::{EmbeddingError, EmbeddingSource};

use super::Point;

/// All points for one record: name, description words, categories, tags.
///
/// Attribute names are not included here; they flow through the separate
/// exact-match pipeline in [`attribute_vector_rows`](super::attribute_vector_rows).
pub fn metadata_points(
    metadata: &Metadata,
    embeddings: &dyn EmbeddingSource,
) -> Result<Vec<Point>, EmbeddingError> {
    let mut points = Vec::new();

    match name_point(metadata, embeddings)? {
        Some(point) => points.push(point),
        None => debug!(dataset = %metadata.dataset_id, "no embedding for name, skipping"),
    }
    points.extend(description_points(metadata, embeddings)?);
    points.extend(category_points(metadata, embeddings)?);
    points.extend(tag_points(metadata, embeddings)?);

    Ok(points)
}

/// One aggregated point for the whole name, `None` when the source has
/// no embedding for the token sequence.
pub fn name_point(
    metadata: &Metadata,
    embeddings: &dyn EmbeddingSource,
) -> Result<Option<Point>, EmbeddingError> {
    let tokens = metadata.name_tokens();
    if tokens.is_empty() {
        return Ok(None);
    }

    Ok(embeddings.sequence_embedding(&tokens)?.map(|vector| {
        Point::new(vector, metadata.dataset_id.clone(), metadata.name.clone())
    }))
}

/// One point per description word with a known embedding.
pub fn description_points(
    metadata: &Metadata,
    embeddings: &dyn EmbeddingSource,
) -> Result<Vec<Point>, EmbeddingError> {
    let mut points = Vec::new();
    for word in metadata.description_tokens() {
        match embeddings.embedding(word)? {
            Some(vector) => {
                points.push(Point::new(vector, metadata.dataset_id.clone(), word));
            }
            None => {
                debug!(dataset = %metadata.dataset_id, word, "no embedding for description word, skipping");
            }
        }
    }
    Ok(points)
}

/// One point per category with a known embedding.
pub fn category_points(
    metadata: &Metadata,
    embeddings: &dyn EmbeddingSource,
) -> Result<Vec<Point>, EmbeddingError> {
    listed_value_points(metadata, &metadata.categories, "category", embeddings)
}

/// One point per tag with a known embedding.
pub fn tag_points(
    metadata: &Metadata,
    embeddings: &dyn EmbeddingSource,
) -> Result<Vec<Point>, EmbeddingError> {
    listed_value_points(metadata, &metadata.tags, "tag", embeddings)
}

fn listed_value_points(
    metadata: &Metadata,
    values: &[String],
    field: &'static str,
    embeddings: &dyn EmbeddingSource,
) -> Result<Vec<Point>, EmbeddingError> {
    let mut points = Vec::new();
    for value in values {
        match embeddings.embedding(value)? {
            Some(vector) => {
                points.push(Point::new(
                    vector,
                    metadata.dataset_id.clone(),
                    value.clone(),
                ));
            }
            None => {
                debug!(dataset = %metadata.dataset_id, field, value = %value, "no embedding, skipping");
            }
        }
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::DatasetId;
    use crate::vector::{MockEmbeddingSource, VectorDimension};

    fn source() -> MockEmbeddingSource {
        MockEmbeddingSource::new(VectorDimension::new(16).unwrap())
    }

    fn record() -> Metadata {
        Metadata {
            dataset_id: DatasetId::new("ocean-1"),
            name: "ocean temperature".to_string(),
            description: "daily ocean surface readings".to_string(),
            categories: vec!["climate".to_string()],
            tags: vec!["ocean".to_string()],
            attribute_names: vec![],
        }
    }

    #[test]
    fn full_record_produces_one_point_per_atomic_unit() {
        let points = metadata_points(&record(), &source()).unwrap();

        // 1 name + 4 description words + 1 category + 1 tag
        assert_eq!(points.len(), 7);
        assert!(points.iter().all(|p| p.key.dataset_id.as_str() == "ocean-1"));

        let values: Vec<&str> = points.iter().map(|p| p.key.value.as_str()).collect();
        assert!(values.contains(&"ocean temperature"));
        assert!(values.contains(&"readings"));
        assert!(values.contains(&"climate"));
    }

    #[test]
    fn known_embeddings_out_of_n_listed_values_yield_exactly_m_points() {
        let mut metadata = record();
        metadata.categories = vec![
            "climate".to_string(),
            "zxqv".to_string(),
            "weather".to_string(),
        ];
        let source = source().with_missing(&["zxqv"]);

        let points = category_points(&metadata, &source).unwrap();
        assert_eq!(points.len(), 2);
    }

    #[test]
    fn missing_name_token_skips_only_the_name_point() {
        let mut metadata = record();
        metadata.name = "ocean zxqv".to_string();
        let source = source().with_missing(&["zxqv"]);

        assert!(name_point(&metadata, &source).unwrap().is_none());

        // The rest of the record still aggregates
        let points = metadata_points(&metadata, &source).unwrap();
        assert_eq!(points.len(), 6);
    }

    #[test]
    fn empty_name_produces_no_point() {
        let mut metadata = record();
        metadata.name = String::new();

        assert!(name_point(&metadata, &source()).unwrap().is_none());
    }

    #[test]
    fn description_words_skip_individually() {
        let mut metadata = record();
        metadata.description = "daily zxqv readings".to_string();
        let source = source().with_missing(&["zxqv"]);

        let points = description_points(&metadata, &source).unwrap();
        let values: Vec<&str> = points.iter().map(|p| p.key.value.as_str()).collect();
        assert_eq!(values, vec!["daily", "readings"]);
    }

    #[test]
    fn structural_failure_aborts_the_record() {
        let source = source().with_failure("surface");

        assert!(matches!(
            metadata_points(&record(), &source),
            Err(EmbeddingError::Lookup(_))
        ));
    }
}
