//! Assembles composite buffers from a payload and a cover image.

use crate::crc32;
use crate::error::DisguiseError;
use crate::format::{self, CoverFormat};
use crate::markers::{METADATA_MARKER, SEPARATOR};
use crate::metadata::{self, Metadata};
use crate::mime;
use crate::result::Result;

/// Chunk type of the ancillary, private, safe-to-copy PNG chunk that
/// carries the delimited engine block inside a PNG composite.
const PNG_CHUNK_TYPE: &[u8; 4] = b"prIv";

/// The two composition orderings. They are mutually exclusive and the
/// detector tells them apart by their marker convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Cover bytes first, payload appended behind the cover's natural end
    /// boundary. The composite still renders as the cover image; the
    /// metadata block is introduced by [`METADATA_MARKER`].
    #[default]
    CoverFirst,
    /// Payload bytes first, cover appended behind the separator. Renaming
    /// the composite to the payload's original extension yields a working
    /// prefix for tools that ignore trailing bytes; the file no longer
    /// renders as an image. No [`METADATA_MARKER`] is written.
    ///
    /// Known limitation: the payload length is implicit (everything before
    /// the separator), so a payload that itself contains the separator
    /// sequence followed by a decodable record would be truncated early on
    /// extraction.
    PayloadFirst,
}

/// Composer configuration. Exposed explicitly so the two strategies are a
/// named choice rather than a silent behavioral fork.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComposeOptions {
    pub strategy: Strategy,
}

impl ComposeOptions {
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }
}

/// A borrowed view of the payload file to embed. The composer never keeps
/// references past the call.
#[derive(Debug, Clone, Copy)]
pub struct Payload<'a> {
    pub name: &'a str,
    pub bytes: &'a [u8],
    /// MIME type override; guessed from the file name when `None`.
    pub mime: Option<&'a str>,
}

impl<'a> Payload<'a> {
    pub fn new(name: &'a str, bytes: &'a [u8]) -> Self {
        Self {
            name,
            bytes,
            mime: None,
        }
    }

    pub fn with_mime(mut self, mime: &'a str) -> Self {
        self.mime = Some(mime);
        self
    }
}

/// The outcome of a composition. Immutable once returned.
#[derive(Debug)]
pub struct CompositionResult {
    pub bytes: Vec<u8>,
    pub suggested_name: String,
    pub original_size: u64,
    pub disguised_size: u64,
}

/// Orchestrates the format locator, the metadata codec and (for PNG) the
/// crc32 engine into the final composite buffer.
#[derive(Debug, Default)]
pub struct Composer {
    options: ComposeOptions,
}

impl Composer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ComposeOptions) -> Self {
        Self { options }
    }

    pub fn strategy(&self) -> Strategy {
        self.options.strategy
    }

    /// Builds the composite for `payload` and `cover` under the configured
    /// strategy. Fails before any output allocation when the cover is not a
    /// valid instance of `format`; inputs are never mutated.
    pub fn compose(
        &self,
        payload: &Payload<'_>,
        cover: &[u8],
        format: CoverFormat,
    ) -> Result<CompositionResult> {
        let mime = payload.mime.unwrap_or_else(|| mime::guess_from_name(payload.name));
        let metadata = Metadata::for_payload(payload.name, payload.bytes.len() as u64, mime);

        let bytes = match self.options.strategy {
            Strategy::CoverFirst => match format {
                CoverFormat::Png => png_chunk_composite(payload.bytes, cover, &metadata)?,
                _ => appended_composite(payload.bytes, cover, format, &metadata)?,
            },
            Strategy::PayloadFirst => payload_first_composite(payload.bytes, cover, &metadata)?,
        };

        let suggested_name = suggested_name(payload.name, format, metadata.timestamp);
        let disguised_size = bytes.len() as u64;

        Ok(CompositionResult {
            bytes,
            suggested_name,
            original_size: metadata.original_size,
            disguised_size,
        })
    }
}

/// Cover bytes up to and including the format boundary, then the delimited
/// engine block. Well-behaved decoders ignore the appended tail.
fn appended_composite(
    payload: &[u8],
    cover: &[u8],
    format: CoverFormat,
    metadata: &Metadata,
) -> Result<Vec<u8>> {
    let boundary = format::payload_boundary(format, cover)?;
    let meta = metadata::encode(metadata)?;

    let mut out = Vec::with_capacity(
        boundary + SEPARATOR.len() + METADATA_MARKER.len() + meta.len() + payload.len(),
    );
    out.extend_from_slice(&cover[..boundary]);
    out.extend_from_slice(&SEPARATOR);
    out.extend_from_slice(&METADATA_MARKER);
    out.extend_from_slice(&meta);
    out.extend_from_slice(payload);

    Ok(out)
}

/// Carries the delimited engine block inside a private ancillary chunk
/// inserted right before `IEND`, keeping the composite a structurally valid
/// PNG.
fn png_chunk_composite(payload: &[u8], cover: &[u8], metadata: &Metadata) -> Result<Vec<u8>> {
    let iend_start = format::payload_boundary(CoverFormat::Png, cover)?;
    if iend_start + 12 > cover.len() {
        return Err(DisguiseError::InvalidCoverImage(CoverFormat::Png));
    }
    let meta = metadata::encode(metadata)?;

    let mut chunk_body = Vec::with_capacity(
        PNG_CHUNK_TYPE.len() + SEPARATOR.len() + METADATA_MARKER.len() + meta.len() + payload.len(),
    );
    chunk_body.extend_from_slice(PNG_CHUNK_TYPE);
    chunk_body.extend_from_slice(&SEPARATOR);
    chunk_body.extend_from_slice(&METADATA_MARKER);
    chunk_body.extend_from_slice(&meta);
    chunk_body.extend_from_slice(payload);

    let data_len = (chunk_body.len() - PNG_CHUNK_TYPE.len()) as u32;
    let crc = crc32::checksum(&chunk_body);

    let mut out = Vec::with_capacity(cover.len() + chunk_body.len() + 8);
    out.extend_from_slice(&cover[..iend_start]);
    out.extend_from_slice(&data_len.to_be_bytes());
    out.extend_from_slice(&chunk_body);
    out.extend_from_slice(&crc.to_be_bytes());
    out.extend_from_slice(&cover[iend_start..iend_start + 12]);

    Ok(out)
}

/// Payload first, then separator, metadata and the full cover bytes. No
/// format boundary is located and no metadata marker is written.
fn payload_first_composite(payload: &[u8], cover: &[u8], metadata: &Metadata) -> Result<Vec<u8>> {
    let meta = metadata::encode(metadata)?;

    let mut out = Vec::with_capacity(payload.len() + SEPARATOR.len() + meta.len() + cover.len());
    out.extend_from_slice(payload);
    out.extend_from_slice(&SEPARATOR);
    out.extend_from_slice(&meta);
    out.extend_from_slice(cover);

    Ok(out)
}

fn suggested_name(original_name: &str, format: CoverFormat, timestamp: u64) -> String {
    let stem = match original_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => original_name,
    };
    format!(
        "{stem}_disguised_{}.{}",
        base36(timestamp),
        format.extension()
    )
}

fn base36(mut n: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::new();
    while n > 0 {
        out.push(DIGITS[(n % 36) as usize]);
        n /= 36;
    }
    out.reverse();
    String::from_utf8(out).expect("base36 digits are ASCII")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures::{minimal_bmp, minimal_gif, minimal_jpeg, minimal_png};
    use crate::markers;

    const PAYLOAD: &[u8] = b"hello world";

    fn compose(strategy: Strategy, cover: &[u8], format: CoverFormat) -> CompositionResult {
        Composer::with_options(ComposeOptions::default().with_strategy(strategy))
            .compose(&Payload::new("hello.zip", PAYLOAD), cover, format)
            .unwrap()
    }

    #[test]
    fn cover_first_jpeg_layout_is_cover_separator_marker_meta_payload() {
        let cover = minimal_jpeg();
        let result = compose(Strategy::CoverFirst, &cover, CoverFormat::Jpeg);
        let bytes = &result.bytes;

        assert_eq!(&bytes[..cover.len()], &cover[..]);
        let sep = cover.len();
        assert_eq!(&bytes[sep..sep + 16], &markers::SEPARATOR[..]);
        let marker = sep + 16;
        assert_eq!(&bytes[marker..marker + 4], &markers::METADATA_MARKER[..]);

        let (meta, consumed) = crate::metadata::decode(bytes, marker + 4).unwrap();
        assert_eq!(meta.original_name, "hello.zip");
        assert_eq!(meta.original_size, 11);
        assert_eq!(meta.original_type, "application/zip");
        assert_eq!(&bytes[marker + 4 + consumed..], PAYLOAD);
    }

    #[test]
    fn output_size_is_the_exact_sum_of_parts() {
        let cover = minimal_bmp();
        let result = compose(Strategy::CoverFirst, &cover, CoverFormat::Bmp);
        let meta_len = result.bytes.len() - cover.len() - 16 - 4 - PAYLOAD.len();
        // the only variable-size part is the metadata block
        let (_, consumed) = crate::metadata::decode(&result.bytes, cover.len() + 20).unwrap();
        assert_eq!(meta_len, consumed);
        assert_eq!(result.disguised_size, result.bytes.len() as u64);
        assert_eq!(result.original_size, 11);
    }

    #[test]
    fn png_composite_keeps_a_valid_chunk_sequence() {
        let cover = minimal_png();
        let result = compose(Strategy::CoverFirst, &cover, CoverFormat::Png);
        let bytes = &result.bytes;
        let iend_start = cover.len() - 12;

        assert_eq!(&bytes[..iend_start], &cover[..iend_start]);
        assert_eq!(&bytes[iend_start + 4..iend_start + 8], b"prIv");
        assert_eq!(&bytes[bytes.len() - 12..], &cover[iend_start..]);

        let data_len =
            u32::from_be_bytes(bytes[iend_start..iend_start + 4].try_into().unwrap()) as usize;
        let body = &bytes[iend_start + 4..iend_start + 8 + data_len];
        let crc = u32::from_be_bytes(
            bytes[iend_start + 8 + data_len..iend_start + 12 + data_len]
                .try_into()
                .unwrap(),
        );
        assert_eq!(crc, crate::crc32::checksum(body));
    }

    #[test]
    fn payload_first_layout_is_payload_separator_meta_cover() {
        let cover = minimal_gif();
        let result = compose(Strategy::PayloadFirst, &cover, CoverFormat::Gif);
        let bytes = &result.bytes;

        assert_eq!(&bytes[..PAYLOAD.len()], PAYLOAD);
        let sep = PAYLOAD.len();
        assert_eq!(&bytes[sep..sep + 16], &markers::SEPARATOR[..]);
        // no metadata marker in this variant
        assert_ne!(&bytes[sep + 16..sep + 20], &markers::METADATA_MARKER[..]);

        let (meta, consumed) = crate::metadata::decode(bytes, sep + 16).unwrap();
        assert_eq!(meta.original_size, 11);
        assert_eq!(&bytes[sep + 16 + consumed..], &cover[..]);
    }

    #[test]
    fn payload_first_never_touches_the_locator() {
        // an invalid cover is fine here, the cover is carried verbatim
        let bogus_cover = b"not an image at all";
        let result = Composer::with_options(
            ComposeOptions::default().with_strategy(Strategy::PayloadFirst),
        )
        .compose(&Payload::new("x.bin", PAYLOAD), bogus_cover, CoverFormat::Jpeg)
        .unwrap();
        assert!(result.bytes.ends_with(bogus_cover));
    }

    #[test]
    fn invalid_cover_aborts_before_any_output() {
        let err = Composer::new()
            .compose(
                &Payload::new("x.bin", PAYLOAD),
                b"no end marker here",
                CoverFormat::Jpeg,
            )
            .unwrap_err();
        match err {
            DisguiseError::InvalidCoverImage(CoverFormat::Jpeg) => (),
            other => panic!("expected InvalidCoverImage, got {other:?}"),
        }
    }

    #[test]
    fn mime_override_wins_over_the_guess() {
        let cover = minimal_jpeg();
        let result = Composer::new()
            .compose(
                &Payload::new("data.bin", PAYLOAD).with_mime("application/x-custom"),
                &cover,
                CoverFormat::Jpeg,
            )
            .unwrap();
        let (meta, _) = crate::metadata::decode(&result.bytes, cover.len() + 20).unwrap();
        assert_eq!(meta.original_type, "application/x-custom");
    }

    #[test]
    fn suggested_name_keeps_the_stem_and_format_extension() {
        let name = suggested_name("backup.tar.gz", CoverFormat::Png, 42);
        assert!(name.starts_with("backup.tar_disguised_"));
        assert!(name.ends_with(".png"));

        let no_ext = suggested_name("Makefile", CoverFormat::Jpeg, 42);
        assert!(no_ext.starts_with("Makefile_disguised_"));
    }

    #[test]
    fn base36_encodes_like_js_to_string_36() {
        assert_eq!(base36(0), "0");
        assert_eq!(base36(35), "z");
        assert_eq!(base36(36), "10");
        assert_eq!(base36(1_700_000_000_000), "loyw3v28");
    }
}
