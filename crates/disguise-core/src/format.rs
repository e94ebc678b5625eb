//! Cover formats and the locator for their natural end boundary.

use std::fmt;

use byteorder::{ByteOrder, LittleEndian};
use log::debug;

use crate::error::DisguiseError;
use crate::markers;
use crate::result::Result;

const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];
const GIF_TRAILER: [u8; 2] = [0x00, 0x3B];
const PNG_IEND_TYPE: &[u8; 4] = b"IEND";
const BMP_MAGIC: [u8; 2] = [0x42, 0x4D];

/// The supported cover image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverFormat {
    Jpeg,
    Png,
    Gif,
    Bmp,
}

impl CoverFormat {
    /// Parses a user-provided format tag such as `"jpg"` or `"png"`.
    pub fn from_tag(tag: &str) -> Result<Self> {
        match tag.to_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "png" => Ok(Self::Png),
            "gif" => Ok(Self::Gif),
            "bmp" => Ok(Self::Bmp),
            other => Err(DisguiseError::UnsupportedOutputFormat(other.to_string())),
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Jpeg => "jpg",
            Self::Png => "png",
            Self::Gif => "gif",
            Self::Bmp => "bmp",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Gif => "image/gif",
            Self::Bmp => "image/bmp",
        }
    }
}

impl fmt::Display for CoverFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Jpeg => "JPEG",
            Self::Png => "PNG",
            Self::Gif => "GIF",
            Self::Bmp => "BMP",
        };
        write!(f, "{name}")
    }
}

/// Returns the offset marking the end of the cover's self-contained
/// structure, i.e. where appended engine data becomes invisible to a
/// well-behaved decoder of that format.
///
/// For JPEG and GIF this is the offset right after the last end-of-stream
/// marker. For PNG it is the start offset of the `IEND` chunk. For BMP it
/// is the total file size declared in the header.
pub fn payload_boundary(format: CoverFormat, cover: &[u8]) -> Result<usize> {
    match format {
        CoverFormat::Jpeg => end_marker_boundary(format, cover, &JPEG_EOI),
        CoverFormat::Gif => end_marker_boundary(format, cover, &GIF_TRAILER),
        CoverFormat::Png => iend_chunk_start(cover),
        CoverFormat::Bmp => declared_bmp_size(cover),
    }
}

fn end_marker_boundary(format: CoverFormat, cover: &[u8], marker: &[u8]) -> Result<usize> {
    markers::rfind(cover, marker)
        .map(|pos| pos + marker.len())
        .ok_or(DisguiseError::InvalidCoverImage(format))
}

/// Scans backward for the 4-byte `IEND` type located 4 bytes after a
/// candidate chunk-length field and returns the chunk's start offset.
fn iend_chunk_start(cover: &[u8]) -> Result<usize> {
    if cover.len() < 20 {
        return Err(DisguiseError::InvalidCoverImage(CoverFormat::Png));
    }
    for start in (8..=cover.len() - 12).rev() {
        if &cover[start + 4..start + 8] == PNG_IEND_TYPE {
            debug!("found IEND chunk at offset {start}");
            return Ok(start);
        }
    }
    Err(DisguiseError::InvalidCoverImage(CoverFormat::Png))
}

fn declared_bmp_size(cover: &[u8]) -> Result<usize> {
    if cover.len() < 6 || cover[..2] != BMP_MAGIC {
        return Err(DisguiseError::InvalidCoverImage(CoverFormat::Bmp));
    }
    let declared = LittleEndian::read_u32(&cover[2..6]) as usize;
    // a header claiming more bytes than the buffer holds cannot be sliced
    if declared > cover.len() {
        return Err(DisguiseError::InvalidCoverImage(CoverFormat::Bmp));
    }
    Ok(declared)
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    #[test]
    fn should_parse_known_tags() {
        assert_eq!(CoverFormat::from_tag("jpg").unwrap(), CoverFormat::Jpeg);
        assert_eq!(CoverFormat::from_tag("JPEG").unwrap(), CoverFormat::Jpeg);
        assert_eq!(CoverFormat::from_tag("png").unwrap(), CoverFormat::Png);
        assert_eq!(CoverFormat::from_tag("gif").unwrap(), CoverFormat::Gif);
        assert_eq!(CoverFormat::from_tag("bmp").unwrap(), CoverFormat::Bmp);
    }

    #[test]
    fn should_reject_unknown_tag() {
        match CoverFormat::from_tag("tiff") {
            Err(DisguiseError::UnsupportedOutputFormat(tag)) => assert_eq!(tag, "tiff"),
            other => panic!("expected UnsupportedOutputFormat, got {other:?}"),
        }
    }

    #[test]
    fn should_locate_jpeg_end_of_image() {
        let jpeg = minimal_jpeg();
        let boundary = payload_boundary(CoverFormat::Jpeg, &jpeg).unwrap();
        assert_eq!(boundary, jpeg.len());
    }

    #[test]
    fn should_pick_the_last_jpeg_end_marker() {
        // an FF D9 inside the entropy-coded stream must not win
        let mut jpeg = minimal_jpeg();
        jpeg.splice(4..4, [0xFF, 0xD9]);
        let boundary = payload_boundary(CoverFormat::Jpeg, &jpeg).unwrap();
        assert_eq!(boundary, jpeg.len());
    }

    #[test]
    fn should_fail_on_jpeg_without_end_marker() {
        let buf = vec![0xFF, 0xD8, 0x00, 0x01, 0x02];
        match payload_boundary(CoverFormat::Jpeg, &buf) {
            Err(DisguiseError::InvalidCoverImage(CoverFormat::Jpeg)) => (),
            other => panic!("expected InvalidCoverImage, got {other:?}"),
        }
    }

    #[test]
    fn should_locate_gif_trailer() {
        let gif = minimal_gif();
        assert_eq!(payload_boundary(CoverFormat::Gif, &gif).unwrap(), gif.len());
    }

    #[test]
    fn should_locate_png_iend_chunk_start() {
        let png = minimal_png();
        let start = payload_boundary(CoverFormat::Png, &png).unwrap();
        assert_eq!(start, png.len() - 12);
        assert_eq!(&png[start + 4..start + 8], b"IEND");
    }

    #[test]
    fn should_fail_on_png_without_iend() {
        let buf = vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];
        match payload_boundary(CoverFormat::Png, &buf) {
            Err(DisguiseError::InvalidCoverImage(CoverFormat::Png)) => (),
            other => panic!("expected InvalidCoverImage, got {other:?}"),
        }
    }

    #[test]
    fn should_read_declared_bmp_size() {
        let bmp = minimal_bmp();
        assert_eq!(payload_boundary(CoverFormat::Bmp, &bmp).unwrap(), 26);
    }

    #[test]
    fn should_fail_on_bad_bmp_magic() {
        let buf = b"XX\x1a\x00\x00\x00".to_vec();
        match payload_boundary(CoverFormat::Bmp, &buf) {
            Err(DisguiseError::InvalidCoverImage(CoverFormat::Bmp)) => (),
            other => panic!("expected InvalidCoverImage, got {other:?}"),
        }
    }

    #[test]
    fn should_fail_on_bmp_size_exceeding_buffer() {
        let mut bmp = minimal_bmp();
        bmp[2..6].copy_from_slice(&1000u32.to_le_bytes());
        match payload_boundary(CoverFormat::Bmp, &bmp) {
            Err(DisguiseError::InvalidCoverImage(CoverFormat::Bmp)) => (),
            other => panic!("expected InvalidCoverImage, got {other:?}"),
        }
    }
}
