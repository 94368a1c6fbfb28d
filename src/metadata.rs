//! Dataset metadata records and the cursors that deliver them.
//!
//! The relational store that owns the metadata is an external
//! collaborator; this module defines the record shape the index consumes
//! and the forward-only cursor traits a store implementation provides.
//! In-memory implementations back tests and embedders without a store.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Opaque catalog identifier of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatasetId(String);

impl DatasetId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatasetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DatasetId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// One dataset's metadata as read from the external store.
///
/// Read-only to this crate; the schema is owned by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub dataset_id: DatasetId,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub attribute_names: Vec<String>,
}

impl Metadata {
    /// Whitespace-separated words of the name field.
    #[must_use]
    pub fn name_tokens(&self) -> Vec<&str> {
        self.name.split_whitespace().collect()
    }

    /// Whitespace-separated words of the description field.
    #[must_use]
    pub fn description_tokens(&self) -> Vec<&str> {
        self.description.split_whitespace().collect()
    }
}

/// One precomputed attribute-name vector as stored by the ingestion side.
///
/// The embedding is carried as the codec's byte encoding so rows can move
/// through a blob column unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeVectorRow {
    pub dataset_id: DatasetId,
    pub attribute_name: String,
    pub embedding: Vec<u8>,
}

/// Errors raised by metadata store cursors.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("failed to read metadata record: {source}")]
    Read {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to close metadata cursor: {source}")]
    Close {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl MetadataError {
    /// Wrap a store-specific read failure.
    pub fn read(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Read {
            source: Box::new(source),
        }
    }

    /// Wrap a store-specific close failure.
    pub fn close(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Close {
            source: Box::new(source),
        }
    }
}

/// Forward-only cursor over metadata records.
///
/// `next_record` returns `Ok(None)` once the cursor is exhausted; `close`
/// releases store resources and surfaces any deferred error.
pub trait MetadataSource {
    fn next_record(&mut self) -> Result<Option<Metadata>, MetadataError>;

    fn close(&mut self) -> Result<(), MetadataError>;
}

/// Forward-only cursor over stored attribute-vector rows.
pub trait AttributeVectorSource {
    fn next_row(&mut self) -> Result<Option<AttributeVectorRow>, MetadataError>;

    fn close(&mut self) -> Result<(), MetadataError>;
}

/// Vec-backed metadata source.
#[derive(Debug, Default)]
pub struct MemoryMetadataSource {
    records: std::vec::IntoIter<Metadata>,
}

impl MemoryMetadataSource {
    #[must_use]
    pub fn new(records: Vec<Metadata>) -> Self {
        Self {
            records: records.into_iter(),
        }
    }
}

impl MetadataSource for MemoryMetadataSource {
    fn next_record(&mut self) -> Result<Option<Metadata>, MetadataError> {
        Ok(self.records.next())
    }

    fn close(&mut self) -> Result<(), MetadataError> {
        Ok(())
    }
}

/// Vec-backed attribute-vector source.
#[derive(Debug, Default)]
pub struct MemoryAttributeVectorSource {
    rows: std::vec::IntoIter<AttributeVectorRow>,
}

impl MemoryAttributeVectorSource {
    #[must_use]
    pub fn new(rows: Vec<AttributeVectorRow>) -> Self {
        Self {
            rows: rows.into_iter(),
        }
    }
}

impl AttributeVectorSource for MemoryAttributeVectorSource {
    fn next_row(&mut self) -> Result<Option<AttributeVectorRow>, MetadataError> {
        Ok(self.rows.next())
    }

    fn close(&mut self) -> Result<(), MetadataError> {
        Ok(())
    }
}
