//! Input resolution: validate a user-supplied document path.
//!
//! The resolver enforces every constraint the rest of the pipeline relies
//! on — the file can be stat'd, carries a `.pdf` extension, fits the 5 MiB
//! synthesis cap, and starts with the `%PDF` magic bytes — and derives
//! the sibling output path. Checking the magic here means a misnamed file
//! produces a meaningful error instead of a parser failure three stages
//! later.

use crate::error::Pdf2Mp3Error;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Maximum accepted document size: 5 MiB.
pub const MAX_DOCUMENT_BYTES: u64 = 5 * 1024 * 1024;

/// A validated source document plus its derived output location.
#[derive(Debug, Clone)]
pub struct ResolvedDocument {
    /// Path of the source PDF.
    pub path: PathBuf,
    /// Size of the source PDF in bytes.
    pub size_bytes: u64,
    /// Sibling output path: same directory, same stem, audio extension.
    pub output_path: PathBuf,
    /// File name component of `output_path`; doubles as the storage
    /// object name the synthesis service writes to.
    pub output_filename: String,
}

/// Validate a document path and derive the output artifact location.
///
/// `audio_extension` is the extension of the configured
/// [`crate::config::AudioEncoding`], normally `"mp3"`.
///
/// # Errors
/// * [`Pdf2Mp3Error::FileNotFound`] / [`Pdf2Mp3Error::PermissionDenied`]
///   when the path cannot be stat'd or opened
/// * [`Pdf2Mp3Error::UnsupportedExtension`] for anything but `.pdf`
///   (case-insensitive)
/// * [`Pdf2Mp3Error::DocumentTooLarge`] above [`MAX_DOCUMENT_BYTES`]
/// * [`Pdf2Mp3Error::NotAPdf`] when the leading bytes are not `%PDF`
pub fn resolve_document(
    path_str: &str,
    audio_extension: &str,
) -> Result<ResolvedDocument, Pdf2Mp3Error> {
    let path = PathBuf::from(path_str);

    let meta = std::fs::metadata(&path).map_err(|e| stat_error(&path, e))?;
    if !meta.is_file() {
        return Err(Pdf2Mp3Error::FileNotFound { path });
    }

    check_extension(&path)?;

    let size_bytes = meta.len();
    if size_bytes > MAX_DOCUMENT_BYTES {
        return Err(Pdf2Mp3Error::DocumentTooLarge {
            path,
            size_bytes,
            limit_bytes: MAX_DOCUMENT_BYTES,
        });
    }

    check_magic(&path)?;

    let output_path = path.with_extension(audio_extension);
    let output_filename = output_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| Pdf2Mp3Error::Internal(format!("no file name in {}", path.display())))?;

    debug!(
        "Resolved document: {} ({} bytes) → {}",
        path.display(),
        size_bytes,
        output_path.display()
    );

    Ok(ResolvedDocument {
        path,
        size_bytes,
        output_path,
        output_filename,
    })
}

fn stat_error(path: &Path, e: std::io::Error) -> Pdf2Mp3Error {
    if e.kind() == std::io::ErrorKind::PermissionDenied {
        Pdf2Mp3Error::PermissionDenied {
            path: path.to_path_buf(),
        }
    } else {
        Pdf2Mp3Error::FileNotFound {
            path: path.to_path_buf(),
        }
    }
}

fn check_extension(path: &Path) -> Result<(), Pdf2Mp3Error> {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase());
    if ext.as_deref() != Some("pdf") {
        return Err(Pdf2Mp3Error::UnsupportedExtension {
            path: path.to_path_buf(),
            extension: ext.map(|e| format!(".{e}")).unwrap_or_else(|| "(none)".into()),
        });
    }
    Ok(())
}

/// Verify the `%PDF` magic bytes so downstream parsing gets a real PDF.
fn check_magic(path: &Path) -> Result<(), Pdf2Mp3Error> {
    let mut file = std::fs::File::open(path).map_err(|e| stat_error(path, e))?;
    let mut magic = [0u8; 4];
    if file.read_exact(&mut magic).is_err() || &magic != b"%PDF" {
        return Err(Pdf2Mp3Error::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}
