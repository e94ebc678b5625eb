//! The attribute record describing an embedded payload, and its wire codec.
//!
//! On the wire the record is UTF-8 JSON with camelCase keys, prefixed by a
//! 4-byte big-endian length. Key names are part of the format and must not
//! change between revisions that share a `version` tag.

use std::time::{SystemTime, UNIX_EPOCH};

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use serde::{Deserialize, Serialize};

use crate::error::DisguiseError;
use crate::result::Result;

/// Wire format revision understood by the detector.
pub const FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    pub original_name: String,
    pub original_size: u64,
    pub original_type: String,
    /// Epoch milliseconds at composition time.
    pub timestamp: u64,
    pub version: String,
}

impl Metadata {
    /// Creates the record for a payload about to be composed, stamped with
    /// the current time and the fixed format version.
    pub fn for_payload(name: &str, size: u64, mime: &str) -> Self {
        Self {
            original_name: name.to_string(),
            original_size: size,
            original_type: mime.to_string(),
            timestamp: epoch_millis(),
            version: FORMAT_VERSION.to_string(),
        }
    }
}

fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Serializes the record and prefixes it with its exact byte length.
pub fn encode(metadata: &Metadata) -> Result<Vec<u8>> {
    let text = serde_json::to_vec(metadata)?;
    let mut buf = Vec::with_capacity(4 + text.len());
    buf.write_u32::<BigEndian>(text.len() as u32)?;
    buf.extend_from_slice(&text);
    Ok(buf)
}

/// Decodes a record at `offset` in `buf`, returning it together with the
/// number of bytes consumed (length prefix included).
///
/// Returns [`DisguiseError::TruncatedMetadata`] when the declared length
/// runs past the buffer and [`DisguiseError::MetadataParseError`] when the
/// slice is not a valid record. Both are recoverable: the detection scan
/// treats them as a false separator candidate and keeps going.
pub fn decode(buf: &[u8], offset: usize) -> Result<(Metadata, usize)> {
    if offset + 4 > buf.len() {
        return Err(DisguiseError::TruncatedMetadata);
    }
    let len = BigEndian::read_u32(&buf[offset..offset + 4]) as usize;
    let end = offset
        .checked_add(4)
        .and_then(|o| o.checked_add(len))
        .ok_or(DisguiseError::TruncatedMetadata)?;
    if end > buf.len() {
        return Err(DisguiseError::TruncatedMetadata);
    }
    let metadata: Metadata = serde_json::from_slice(&buf[offset + 4..end])?;
    Ok((metadata, 4 + len))
}
