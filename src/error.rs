//! Error types for the pdf2mp3 library.
//!
//! One enum covers the three failure classes the pipeline distinguishes:
//!
//! * **Input validation** (bad path, wrong extension, oversize document) —
//!   the CLI recovers from these by re-prompting for a new path.
//! * **Extraction outcomes** (corrupt document, no text found) — reported
//!   and the pipeline aborts cleanly before any remote call is made.
//! * **Remote service failures** (synthesis timeout, auth, missing audio
//!   object) — terminal; nothing is retried and the error surfaces to the
//!   caller with the underlying diagnostic.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the pdf2mp3 library.
#[derive(Debug, Error)]
pub enum Pdf2Mp3Error {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists but does not carry the expected `.pdf` extension.
    #[error("Only PDF documents are supported: '{path}' has extension '{extension}'")]
    UnsupportedExtension { path: PathBuf, extension: String },

    /// The document exceeds the synthesis size limit.
    #[error(
        "PDF file size {size_bytes} bytes exceeds the maximum of {limit_bytes} bytes (5 MiB)\n\
         Split the document or select fewer pages."
    )]
    DocumentTooLarge {
        path: PathBuf,
        size_bytes: u64,
        limit_bytes: u64,
    },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// The document could not be parsed at all.
    #[error("PDF '{path}' could not be parsed: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// Text extraction failed for a specific page.
    #[error("Text extraction failed for page {page}: {detail}")]
    ExtractionFailed { page: u32, detail: String },

    /// The selected pages (or the whole document) yielded no text.
    ///
    /// A valid terminal outcome for scanned/image-only documents; the
    /// pipeline aborts before issuing any remote synthesis request.
    #[error(
        "No text was extracted from '{path}'.\n\
         Scanned or image-only PDFs carry no extractable text."
    )]
    NoTextExtracted { path: PathBuf },

    // ── Remote service errors ─────────────────────────────────────────────
    /// The speech backend is missing required configuration.
    #[error("Speech backend is not configured.\n{hint}")]
    BackendNotConfigured { hint: String },

    /// The synthesis API rejected the request or the call itself failed.
    #[error("Speech synthesis request failed: {detail}")]
    SynthesisFailed { detail: String },

    /// The long-running synthesis operation reported an error.
    #[error("Speech synthesis operation '{operation}' failed: {detail}")]
    OperationFailed { operation: String, detail: String },

    /// Synthesis did not complete within the configured deadline.
    #[error(
        "Speech synthesis did not complete within {secs}s.\n\
         Raise --synthesis-timeout for long documents."
    )]
    SynthesisTimeout { secs: u64 },

    /// The service returned an authentication error (401/403).
    #[error(
        "Authentication with the speech service failed: {detail}\n\
         Set GOOGLE_ACCESS_TOKEN to a valid OAuth2 bearer token."
    )]
    AuthFailed { detail: String },

    /// The synthesised audio object was not found in the storage bucket.
    #[error(
        "Audio object '{object}' not found in bucket '{bucket}' after synthesis completed.\n\
         The service may still be finalising the object."
    )]
    AudioObjectMissing { bucket: String, object: String },

    /// Downloading the audio object failed.
    #[error("Failed to download synthesised audio: {detail}")]
    DownloadFailed { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output audio file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Pdf2Mp3Error {
    /// Whether the CLI may recover from this error by asking for a new path.
    ///
    /// Remote-service and I/O failures are terminal; only pre-extraction
    /// input problems loop back to the prompt.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Pdf2Mp3Error::FileNotFound { .. }
                | Pdf2Mp3Error::PermissionDenied { .. }
                | Pdf2Mp3Error::UnsupportedExtension { .. }
                | Pdf2Mp3Error::DocumentTooLarge { .. }
                | Pdf2Mp3Error::NotAPdf { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn too_large_display() {
        let e = Pdf2Mp3Error::DocumentTooLarge {
            path: PathBuf::from("big.pdf"),
            size_bytes: 6 * 1024 * 1024,
            limit_bytes: 5 * 1024 * 1024,
        };
        let msg = e.to_string();
        assert!(msg.contains("6291456"), "got: {msg}");
        assert!(msg.contains("5 MiB"));
    }

    #[test]
    fn unsupported_extension_display() {
        let e = Pdf2Mp3Error::UnsupportedExtension {
            path: PathBuf::from("report.docx"),
            extension: ".docx".into(),
        };
        assert!(e.to_string().contains(".docx"));
    }

    #[test]
    fn synthesis_timeout_display() {
        let e = Pdf2Mp3Error::SynthesisTimeout { secs: 300 };
        assert!(e.to_string().contains("300s"));
    }

    #[test]
    fn audio_object_missing_display() {
        let e = Pdf2Mp3Error::AudioObjectMissing {
            bucket: "speech-out".into(),
            object: "report.mp3".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("speech-out"));
        assert!(msg.contains("report.mp3"));
    }

    #[test]
    fn input_errors_are_recoverable() {
        assert!(Pdf2Mp3Error::FileNotFound {
            path: PathBuf::from("x.pdf")
        }
        .is_input_error());
        assert!(!Pdf2Mp3Error::SynthesisTimeout { secs: 300 }.is_input_error());
        assert!(!Pdf2Mp3Error::NoTextExtracted {
            path: PathBuf::from("x.pdf")
        }
        .is_input_error());
    }
}
