//! Path based operations wrapping the buffer-level engine with file I/O.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{debug, error};

use crate::composer::{ComposeOptions, Composer, Payload};
use crate::detector::{DetectionResult, Detector};
use crate::error::DisguiseError;
use crate::format::CoverFormat;
use crate::result::Result;

/// Composes `payload_file` with `cover_file` and writes the composite under
/// its suggested name into the `destination` directory. Returns the path of
/// the written file.
pub fn disguise(
    payload_file: &Path,
    cover_file: &Path,
    format_tag: &str,
    destination: &Path,
    options: ComposeOptions,
) -> Result<PathBuf> {
    let format = CoverFormat::from_tag(format_tag)?;
    let payload_name = file_name(payload_file)?;
    let payload_bytes = read_file(payload_file)?;
    let cover_bytes = read_file(cover_file)?;

    let result = Composer::with_options(options).compose(
        &Payload::new(payload_name, &payload_bytes),
        &cover_bytes,
        format,
    )?;
    debug!(
        "composed {} ({} bytes) behind {} as {} ({} bytes)",
        payload_name,
        result.original_size,
        cover_file.display(),
        result.suggested_name,
        result.disguised_size
    );

    let target = destination.join(&result.suggested_name);
    write_file(&target, &result.bytes)?;

    Ok(target)
}

/// Extracts the payload hidden in `suspect_file` and writes it under its
/// recorded original name into the `destination` directory.
pub fn reveal(suspect_file: &Path, destination: &Path) -> Result<PathBuf> {
    let data = read_file(suspect_file)?;
    let (metadata, payload) = Detector::new().extract(&data)?;

    // only the file-name component of the recorded name is trusted
    let name = Path::new(&metadata.original_name)
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(DisguiseError::InvalidFileName)?;

    let target = destination.join(name);
    write_file(&target, &payload)?;

    Ok(target)
}

/// Scans `suspect_file` for a recoverable payload without extracting it.
pub fn detect_file(suspect_file: &Path) -> Result<Option<DetectionResult>> {
    let data = read_file(suspect_file)?;
    Ok(Detector::new().detect(&data))
}

fn file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|n| n.to_str())
        .ok_or(DisguiseError::InvalidFileName)
}

fn read_file(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| {
        error!("Error reading file {}: {source}", path.display());
        DisguiseError::ReadError { source }
    })
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|source| {
        error!("Error creating file {}: {source}", path.display());
        DisguiseError::WriteError { source }
    })?;
    file.write_all(bytes)
        .map_err(|source| DisguiseError::WriteError { source })
}
