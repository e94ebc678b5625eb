//! The byte signatures that delimit engine data inside a composite.
//!
//! Both constants are process-wide and never mutated. The separator starts
//! with the PNG magic followed by a descending byte run, a pattern with a
//! low probability of occurring in natural image or payload data.

/// Marks the boundary between cover data and the engine's own block.
pub const SEPARATOR: [u8; 16] = [
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0xFF, 0xFE, 0xFD, 0xFC, 0xFB, 0xFA, 0xF9,
    0xF8,
];

/// Precedes the metadata block in the cover-first strategy.
pub const METADATA_MARKER: [u8; 4] = [0xDE, 0xAD, 0xBE, 0xEF];

/// Finds the first occurrence of `needle` in `haystack` at or after `from`.
pub(crate) fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (from..=haystack.len() - needle.len()).find(|&i| &haystack[i..i + needle.len()] == needle)
}

/// Finds the last occurrence of `needle` in `haystack`.
///
/// Scanning backward matters for end-of-image markers: natural image content
/// may contain false positives earlier in the stream, the true marker is the
/// last occurrence before end-of-file.
pub(crate) fn rfind(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .rev()
        .find(|&i| &haystack[i..i + needle.len()] == needle)
}
