//! Byte codec for embedding vectors at the storage boundary.
//!
//! A vector of dimension D is encoded as D × 4 bytes, each component a
//! little-endian `f32`. Encoding and decoding are exact inverses.

use crate::vector::types::{VectorDimension, VectorError};

/// Number of bytes per f32 value.
const BYTES_PER_F32: usize = 4;

/// Encodes a vector as a flat little-endian byte sequence.
#[must_use]
pub fn to_bytes(vector: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vector.len() * BYTES_PER_F32);
    for &value in vector {
        bytes.extend_from_slice(&value.to_le_bytes());
    }
    bytes
}

/// Decodes a flat little-endian byte sequence into a vector.
///
/// Returns an error if the length is not a multiple of the element size.
pub fn from_bytes(bytes: &[u8]) -> Result<Vec<f32>, VectorError> {
    if bytes.len() % BYTES_PER_F32 != 0 {
        return Err(VectorError::InvalidEncoding { len: bytes.len() });
    }

    Ok(bytes
        .chunks_exact(BYTES_PER_F32)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect())
}

/// Decodes a byte sequence and checks it yields the expected dimension.
pub fn from_bytes_with_dimension(
    bytes: &[u8],
    dimension: VectorDimension,
) -> Result<Vec<f32>, VectorError> {
    let vector = from_bytes(bytes)?;
    dimension.validate_vector(&vector)?;
    Ok(vector)
}
