//! Filesystem helpers shared by the commands.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};

/// Move a file, falling back to copy-and-rename when a plain rename fails
/// (e.g. across filesystems, which is common when the source sits in the
/// system temp dir). The fallback stages the copy in the destination's
/// parent directory and renames it into place only once the copy is
/// complete, so a failed copy never leaves a partial file at the
/// destination.
pub fn move_file(source: &Path, destination: &Path) -> Result<()> {
    if std::fs::rename(source, destination).is_ok() {
        return Ok(());
    }

    copy_then_rename(source, destination)
}

/// Cross-filesystem move: copy into a staging file next to the destination,
/// rename it over the destination, then remove the source. The staging file
/// is removed if any step fails before the rename.
fn copy_then_rename(source: &Path, destination: &Path) -> Result<()> {
    let parent = destination.parent().unwrap_or_else(|| Path::new("."));

    let mut staged = tempfile::NamedTempFile::new_in(parent).with_context(|| {
        format!(
            "Creating staging file for '{}' in '{}'",
            destination.display(),
            parent.display()
        )
    })?;

    let mut reader = File::open(source)
        .with_context(|| format!("Opening '{}' for copy", source.display()))?;
    std::io::copy(&mut reader, staged.as_file_mut()).with_context(|| {
        format!(
            "Copying '{}' to '{}'",
            source.display(),
            destination.display()
        )
    })?;

    // The persist error owns the staging file; take just the I/O error so
    // the staging file is removed here rather than living on in the error.
    staged.persist(destination).map_err(|persist_err| {
        anyhow::Error::new(persist_err.error)
            .context(format!("Renaming staged copy to '{}'", destination.display()))
    })?;

    std::fs::remove_file(source)
        .with_context(|| format!("Removing '{}' after copy", source.display()))?;
    Ok(())
}

/// SHA-256 of a file's content, hex-encoded.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path)
        .with_context(|| format!("Opening '{}' for digest", path.display()))?;

    let mut hasher = Sha256::new();
    let mut buffer = [0u8; 64 * 1024];
    loop {
        let read = file
            .read(&mut buffer)
            .with_context(|| format!("Reading '{}' for digest", path.display()))?;
        if read == 0 {
            break;
        }
        hasher.update(&buffer[..read]);
    }

    Ok(hex::encode(hasher.finalize()))
}
