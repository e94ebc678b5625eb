//! # Disguise Core API
//!
//! The engine behind the file disguise tool: it combines an arbitrary
//! payload file with a cover image so the composite still opens as a normal
//! image, and recovers the payload byte-for-byte later on.
//!
//! The two boundary operations are exposed via [`Composer`] and
//! [`Detector`]; path-based wrappers live in [`commands`] and fluent
//! builders in [`api`].
//!
//! # Usage Examples
//!
//! ## Compose and recover in memory
//!
//! ```rust
//! use disguise_core::{Composer, CoverFormat, Detector, Payload};
//!
//! // a tiny but structurally valid JPEG as the cover
//! let cover: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x02, 0xFF, 0xD9];
//!
//! let composite = Composer::new()
//!     .compose(&Payload::new("notes.txt", b"hello world"), cover, CoverFormat::Jpeg)
//!     .expect("Failed to compose");
//!
//! // the composite still starts with the full cover image
//! assert!(composite.bytes.starts_with(cover));
//!
//! let (metadata, payload) = Detector::new()
//!     .extract(&composite.bytes)
//!     .expect("Failed to extract");
//! assert_eq!(payload, b"hello world");
//! assert_eq!(metadata.original_size, 11);
//! ```
//!
//! ## Disguise a file on disk
//!
//! ```rust,no_run
//! disguise_core::api::disguise::prepare()
//!     .with_payload("backup.zip")
//!     .with_cover("vacation.jpg")
//!     .with_format("jpg")
//!     .with_output_folder("out/")
//!     .execute()
//!     .expect("Failed to disguise file");
//! ```

#![warn(clippy::redundant_else)]

pub mod api;
pub mod commands;
pub mod composer;
pub mod crc32;
pub mod detector;
pub mod error;
pub mod format;
pub mod markers;
pub mod metadata;
pub mod mime;
pub mod result;

pub use crate::composer::{ComposeOptions, Composer, CompositionResult, Payload, Strategy};
pub use crate::detector::{DetectionResult, Detector};
pub use crate::error::DisguiseError;
pub use crate::format::CoverFormat;
pub use crate::metadata::Metadata;
pub use crate::result::Result;

/// Entry point bundling the constructed-once engine services. Callers hold
/// and pass these instances themselves; there are no ambient globals.
pub struct DisguiseCore;

impl DisguiseCore {
    pub fn composer() -> Composer {
        Composer::with_options(ComposeOptions::default())
    }

    pub fn composer_with_options(opts: ComposeOptions) -> Composer {
        Composer::with_options(opts)
    }

    pub fn detector() -> Detector {
        Detector::new()
    }
}
