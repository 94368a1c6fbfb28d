//! End-to-end tests: metadata records through aggregation, building,
//! finalization, and querying, on both backends.

mod common;

use common::StubEmbeddings;
use datalink::{
    BackendKind, DatasetId, IndexConfig, MemoryAttributeVectorSource, MemoryMetadataSource,
    Metadata, VectorDimension, attribute_vector_rows, build_attribute_index, build_metadata_index,
};

const DIM: usize = 32;

fn dim() -> VectorDimension {
    VectorDimension::new(DIM).unwrap()
}

fn ocean_record() -> Metadata {
    Metadata {
        dataset_id: DatasetId::new("ocean-1"),
        name: "ocean temperature".to_string(),
        description: "daily ocean surface readings".to_string(),
        categories: vec!["climate".to_string()],
        tags: vec!["ocean".to_string()],
        attribute_names: vec!["sea_surface_temp".to_string(), "reading_date".to_string()],
    }
}

fn noise_record() -> Metadata {
    Metadata {
        dataset_id: DatasetId::new("transit-9"),
        name: "bus ridership".to_string(),
        description: "monthly boarding counts".to_string(),
        categories: vec!["transportation".to_string()],
        tags: vec!["transit".to_string()],
        attribute_names: vec!["route".to_string()],
    }
}

#[test]
fn name_query_finds_its_dataset_on_the_cosine_backend() {
    let embeddings = StubEmbeddings::new(DIM);
    let mut source = MemoryMetadataSource::new(vec![ocean_record(), noise_record()]);

    let index =
        build_metadata_index(dim(), &IndexConfig::default(), &mut source, &embeddings).unwrap();

    // ocean-1 contributes 1 name + 4 description words + 1 category +
    // 1 tag; transit-9 contributes 6 more
    assert_eq!(index.len(), 13);

    // Querying with the name's own vector must surface its dataset first
    let query = embeddings.sequence_vector(&["ocean", "temperature"]);
    let results = index.query(&query, 5).unwrap();
    assert!(!results.is_empty());
    assert_eq!(results[0].dataset_id, DatasetId::new("ocean-1"));

    for pair in results.windows(2) {
        assert!(pair[0].score >= pair[1].score);
    }
}

#[test]
fn exact_backend_agrees_with_the_same_pipeline() {
    let embeddings = StubEmbeddings::new(DIM);
    let mut source = MemoryMetadataSource::new(vec![ocean_record(), noise_record()]);
    let config = IndexConfig {
        backend: BackendKind::InnerProduct,
        ..IndexConfig::default()
    };

    let index = build_metadata_index(dim(), &config, &mut source, &embeddings).unwrap();
    assert_eq!(index.len(), 13);

    let query = embeddings.sequence_vector(&["ocean", "temperature"]);
    let results = index.query(&query, 3).unwrap();
    assert_eq!(results[0].dataset_id, DatasetId::new("ocean-1"));
}

#[test]
fn unknown_tokens_shrink_the_index_without_failing_the_build() {
    let embeddings = StubEmbeddings::new(DIM).with_missing(&["surface", "transit"]);
    let mut source = MemoryMetadataSource::new(vec![ocean_record(), noise_record()]);

    let index =
        build_metadata_index(dim(), &IndexConfig::default(), &mut source, &embeddings).unwrap();

    // One description word and one tag dropped
    assert_eq!(index.len(), 11);
}

#[test]
fn empty_source_builds_an_empty_index() {
    let embeddings = StubEmbeddings::new(DIM);
    let mut source = MemoryMetadataSource::new(Vec::new());

    let index =
        build_metadata_index(dim(), &IndexConfig::default(), &mut source, &embeddings).unwrap();

    assert!(index.is_empty());
    let query = embeddings.token_vector("anything");
    assert!(index.query(&query, 10).unwrap().is_empty());
}

#[test]
fn attribute_rows_round_trip_into_an_exact_index() {
    let embeddings = StubEmbeddings::new(DIM);

    let mut rows = attribute_vector_rows(&ocean_record(), &embeddings).unwrap();
    rows.extend(attribute_vector_rows(&noise_record(), &embeddings).unwrap());
    assert_eq!(rows.len(), 3);

    let mut source = MemoryAttributeVectorSource::new(rows);
    let index = build_attribute_index(dim(), &mut source).unwrap();
    assert_eq!(index.len(), 3);

    // Two-vector dataset, k far above the table size: sentinel-filtered
    let query = embeddings.token_vector("sea_surface_temp");
    let results = index.query(&query, 10).unwrap();
    assert_eq!(results.len(), 3);
    assert_eq!(results[0].dataset_id, DatasetId::new("ocean-1"));
}
