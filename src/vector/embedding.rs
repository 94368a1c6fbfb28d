//! The embedding-source seam between metadata aggregation and a model.
//!
//! The index never talks to a model directly: it consumes the
//! [`EmbeddingSource`] trait, where `Ok(None)` means "this token has no
//! embedding" (non-fatal, the point is skipped) and `Err` means the
//! source itself failed (fatal for the record being aggregated).
//!
//! [`FastEmbedSource`] is the production implementation, wrapping a
//! fastembed `TextEmbedding`. Subword models never report a missing
//! token, so it only returns `Ok(None)` for empty input.

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::sync::Mutex;
use thiserror::Error;

use crate::config::Settings;
use crate::vector::types::{VectorDimension, VectorError};

/// Errors raised by embedding sources.
///
/// A token without an embedding is NOT an error; sources report that as
/// `Ok(None)`. These variants are structural failures.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    #[error(
        "embedding model directory is not configured\nSuggestion: set [embedding] model_dir in .datalink/settings.toml or DATALINK_EMBEDDING__MODEL_DIR"
    )]
    ModelDirNotConfigured,

    #[error(
        "unknown embedding model '{0}'\nSuggestion: supported models are AllMiniLML6V2, AllMiniLML6V2Q, BGESmallENV15"
    )]
    UnknownModel(String),

    #[error("failed to initialize embedding model: {0}")]
    ModelInit(String),

    #[error("embedding lookup failed: {0}")]
    Lookup(String),

    #[error(transparent)]
    Vector(#[from] VectorError),
}

/// Capability for turning tokens into fixed-dimension vectors.
///
/// Implementations should be thread-safe; a single source is shared
/// across the whole build.
pub trait EmbeddingSource: Send + Sync {
    /// Look up the embedding of a single token.
    ///
    /// Returns `Ok(None)` when the token has no embedding.
    fn embedding(&self, token: &str) -> Result<Option<Vec<f32>>, EmbeddingError>;

    /// Look up one aggregated embedding for an ordered token sequence.
    ///
    /// Returns `Ok(None)` when no embedding can be produced for the
    /// sequence (for lookup-table models: when any required token is
    /// missing).
    fn sequence_embedding(&self, tokens: &[&str]) -> Result<Option<Vec<f32>>, EmbeddingError>;

    /// Dimension of every vector this source produces.
    #[must_use]
    fn dimension(&self) -> VectorDimension;
}

/// Resolve a configured model name to a fastembed model.
pub fn parse_embedding_model(name: &str) -> Result<EmbeddingModel, EmbeddingError> {
    match name {
        "AllMiniLML6V2" => Ok(EmbeddingModel::AllMiniLML6V2),
        "AllMiniLML6V2Q" => Ok(EmbeddingModel::AllMiniLML6V2Q),
        "BGESmallENV15" => Ok(EmbeddingModel::BGESmallENV15),
        other => Err(EmbeddingError::UnknownModel(other.to_string())),
    }
}

/// Embedding source backed by a fastembed text-embedding model.
pub struct FastEmbedSource {
    model: Mutex<TextEmbedding>,
    dimension: VectorDimension,
}

impl FastEmbedSource {
    /// Initialize the model named in the settings.
    ///
    /// The configured model directory is required; its absence is a fatal
    /// configuration error raised here, before any build work starts.
    pub fn new(settings: &Settings) -> Result<Self, EmbeddingError> {
        let model_dir = settings
            .embedding
            .model_dir
            .as_ref()
            .ok_or(EmbeddingError::ModelDirNotConfigured)?;
        let model_kind = parse_embedding_model(&settings.embedding.model)?;

        let mut model = TextEmbedding::try_new(
            InitOptions::new(model_kind)
                .with_cache_dir(model_dir.clone())
                .with_show_download_progress(false),
        )
        .map_err(|e| EmbeddingError::ModelInit(e.to_string()))?;

        // Probe the model once to learn the dimension
        let probe = model
            .embed(vec!["dimension probe"], None)
            .map_err(|e| EmbeddingError::ModelInit(e.to_string()))?;
        let dimension = probe
            .first()
            .map(|v| v.len())
            .ok_or_else(|| EmbeddingError::ModelInit("model produced no output".to_string()))?;

        Ok(Self {
            model: Mutex::new(model),
            dimension: VectorDimension::new(dimension)?,
        })
    }

    fn embed_text(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let embeddings = self
            .model
            .lock()
            .map_err(|_| {
                EmbeddingError::Lookup(
                    "embedding model lock poisoned by a panic in another thread".to_string(),
                )
            })?
            .embed(vec![text], None)
            .map_err(|e| EmbeddingError::Lookup(e.to_string()))?;

        let embedding = embeddings
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::Lookup("model returned no embedding".to_string()))?;
        self.dimension.validate_vector(&embedding)?;
        Ok(embedding)
    }
}

impl EmbeddingSource for FastEmbedSource {
    fn embedding(&self, token: &str) -> Result<Option<Vec<f32>>, EmbeddingError> {
        if token.trim().is_empty() {
            return Ok(None);
        }
        self.embed_text(token).map(Some)
    }

    fn sequence_embedding(&self, tokens: &[&str]) -> Result<Option<Vec<f32>>, EmbeddingError> {
        if tokens.is_empty() {
            return Ok(None);
        }
        self.embed_text(&tokens.join(" ")).map(Some)
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }
}

/// Mock embedding source for testing.
///
/// Produces deterministic unit vectors derived from token bytes, with a
/// configurable set of "unknown" tokens and an optional token that
/// triggers a structural failure.
#[cfg(test)]
pub struct MockEmbeddingSource {
    dimension: VectorDimension,
    missing: std::collections::HashSet<String>,
    fail_on: Option<String>,
}

#[cfg(test)]
impl MockEmbeddingSource {
    #[must_use]
    pub fn new(dimension: VectorDimension) -> Self {
        Self {
            dimension,
            missing: std::collections::HashSet::new(),
            fail_on: None,
        }
    }

    /// Tokens that report no embedding.
    #[must_use]
    pub fn with_missing(mut self, tokens: &[&str]) -> Self {
        self.missing = tokens.iter().map(|t| t.to_string()).collect();
        self
    }

    /// Token whose lookup fails structurally.
    #[must_use]
    pub fn with_failure(mut self, token: &str) -> Self {
        self.fail_on = Some(token.to_string());
        self
    }

    pub fn token_vector(&self, token: &str) -> Vec<f32> {
        let dim = self.dimension.get();
        // FNV-1a over the token bytes seeds a small LCG per component
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
        crate::vector::distance::normalize(&mut vector);
        vector
    }

    fn check_token(&self, token: &str) -> Result<bool, EmbeddingError> {
        if self.fail_on.as_deref() == Some(token) {
            return Err(EmbeddingError::Lookup(format!(
                "injected failure for token '{token}'"
            )));
        }
        Ok(!self.missing.contains(token))
    }
}

#[cfg(test)]
impl EmbeddingSource for MockEmbeddingSource {
    fn embedding(&self, token: &str) -> Result<Option<Vec<f32>>, EmbeddingError> {
        if !self.check_token(token)? {
            return Ok(None);
        }
        Ok(Some(self.token_vector(token)))
    }

    fn sequence_embedding(&self, tokens: &[&str]) -> Result<Option<Vec<f32>>, EmbeddingError> {
        if tokens.is_empty() {
            return Ok(None);
        }
        let mut sum = vec![0.0f32; self.dimension.get()];
        for token in tokens {
            if !self.check_token(token)? {
                return Ok(None);
            }
            for (acc, value) in sum.iter_mut().zip(self.token_vector(token)) {
                *acc += value;
            }
        }
        crate::vector::distance::normalize(&mut sum);
        Ok(Some(sum))
    }

    fn dimension(&self) -> VectorDimension {
        self.dimension
    }
}
