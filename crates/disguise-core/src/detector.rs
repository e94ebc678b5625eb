//! Scans arbitrary buffers for the separator convention and recovers the
//! payload. The exact inverse consumer of what [`crate::composer`] writes.

use log::debug;

use crate::composer::Strategy;
use crate::error::DisguiseError;
use crate::markers::{self, METADATA_MARKER, SEPARATOR};
use crate::metadata::{self, Metadata};
use crate::result::Result;

/// A successful detection. The payload region is given explicitly per
/// strategy: behind the metadata for [`Strategy::CoverFirst`], in front of
/// the separator (offset 0) for [`Strategy::PayloadFirst`].
#[derive(Debug)]
pub struct DetectionResult {
    pub metadata: Metadata,
    pub strategy: Strategy,
    pub payload_offset: usize,
    pub payload_len: usize,
}

#[derive(Debug, Default)]
pub struct Detector;

impl Detector {
    pub fn new() -> Self {
        Self
    }

    /// Scans forward for a separator followed by a decodable metadata
    /// block. Candidates that fail to decode (truncation, parse error) are
    /// skipped and the scan continues; no error ever escapes this method.
    pub fn detect(&self, data: &[u8]) -> Option<DetectionResult> {
        let mut from = 0;
        while let Some(pos) = markers::find(data, &SEPARATOR, from) {
            let after = pos + SEPARATOR.len();

            if data[after..].starts_with(&METADATA_MARKER) {
                if let Ok((metadata, consumed)) =
                    metadata::decode(data, after + METADATA_MARKER.len())
                {
                    let payload_offset = after + METADATA_MARKER.len() + consumed;
                    let available = data.len() - payload_offset;
                    // a chunk-carried composite has the chunk CRC and the
                    // IEND trailer behind the payload, the recorded size
                    // strips them
                    let payload_len = (metadata.original_size as usize).min(available);
                    return Some(DetectionResult {
                        metadata,
                        strategy: Strategy::CoverFirst,
                        payload_offset,
                        payload_len,
                    });
                }
            }

            // without the marker the record follows the separator directly
            // and the payload is everything in front of it
            if let Ok((metadata, _)) = metadata::decode(data, after) {
                return Some(DetectionResult {
                    metadata,
                    strategy: Strategy::PayloadFirst,
                    payload_offset: 0,
                    payload_len: pos,
                });
            }

            debug!("separator candidate at offset {pos} carried no valid metadata");
            from = pos + 1;
        }

        None
    }

    /// Recovers the metadata and the payload bytes, or fails with
    /// [`DisguiseError::NotDisguised`] when no candidate in the buffer
    /// yields a valid record.
    pub fn extract(&self, data: &[u8]) -> Result<(Metadata, Vec<u8>)> {
        let detection = self.detect(data).ok_or(DisguiseError::NotDisguised)?;
        let payload = data
            [detection.payload_offset..detection.payload_offset + detection.payload_len]
            .to_vec();

        Ok((detection.metadata, payload))
    }
}
