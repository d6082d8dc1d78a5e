//! File boundary for the container codec.
//!
//! Encoding always produces the complete byte sequence in memory first; the
//! write itself goes through a temp file and an atomic rename, so an
//! interrupted save never leaves a partial container behind.

use super::codec::SaveContainer;
use super::error::SaveError;
use crate::compress::Compression;
use std::fs::{self, rename, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Default suffix for the derived output directory and file name.
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_HACKED";

/// Reads and decodes a save file.
pub fn load(path: &Path, compression: &dyn Compression) -> Result<SaveContainer, SaveError> {
    let bytes = fs::read(path)?;
    let container = SaveContainer::decode(&bytes, compression)?;
    log::debug!("loaded {} bytes from {:?}", bytes.len(), path);
    Ok(container)
}

/// Encodes the container and writes it to `path` atomically.
pub fn save(
    container: &mut SaveContainer,
    path: &Path,
    compression: &dyn Compression,
) -> Result<(), SaveError> {
    let bytes = container.encode(compression)?;
    write_bytes(path, &bytes)?;
    Ok(())
}

/// Writes already-encoded container bytes to `path`.
///
/// Creates the parent directory if absent, writes to a sibling temp file,
/// syncs, then renames over the destination.
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), SaveError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&temp_path)?;
        file.write_all(bytes)?;
        file.flush()?;
        file.sync_all()?;
    }
    rename(&temp_path, path)?;

    log::debug!("wrote {} bytes to {:?}", bytes.len(), path);
    Ok(())
}

/// Derives the output location for an edited save.
///
/// The suffix is appended to both the containing directory name and the file
/// base name, keeping the extension: `/saves/Ranger/Ranger.xml` with suffix
/// `_HACKED` becomes `/saves/Ranger_HACKED/Ranger_HACKED.xml`. The result
/// never collides with the input for a non-empty suffix, so the original
/// file is never overwritten.
pub fn derived_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let mut file_name = format!("{stem}{suffix}");
    if let Some(ext) = input.extension() {
        file_name.push('.');
        file_name.push_str(&ext.to_string_lossy());
    }

    let parent = input.parent().unwrap_or_else(|| Path::new(""));
    let out_dir = match parent.file_name() {
        Some(dir) => parent.with_file_name(format!("{}{}", dir.to_string_lossy(), suffix)),
        // Bare file name: fall back to a sibling directory named after the stem.
        None => PathBuf::from(format!("{stem}{suffix}")),
    };

    out_dir.join(file_name)
}
