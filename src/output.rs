//! Result types returned by the conversion pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The result of a successful PDF-to-MP3 conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionOutput {
    /// Local path of the downloaded audio artifact.
    pub audio_path: PathBuf,
    /// Size of the audio artifact in bytes.
    pub audio_bytes: u64,
    /// Metadata of the source document.
    pub metadata: DocumentMetadata,
    /// Timing and coverage statistics for the run.
    pub stats: ConversionStats,
}

/// Metadata extracted from the source document without any remote call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Document title from the info dictionary, if present.
    pub title: Option<String>,
    /// Document author from the info dictionary, if present.
    pub author: Option<String>,
    /// Total number of pages.
    pub page_count: u32,
    /// Size of the PDF file in bytes.
    pub file_size_bytes: u64,
}

/// Statistics about a conversion run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversionStats {
    /// Total pages in the document.
    pub total_pages: u32,
    /// Pages actually extracted (after filtering the selection).
    pub selected_pages: u32,
    /// Requested pages dropped for being out of range.
    pub dropped_pages: u32,
    /// Characters of text sent to the synthesiser, after normalisation.
    pub extracted_chars: usize,
    /// Wall-clock time spent in text extraction.
    pub extract_duration_ms: u64,
    /// Wall-clock time the remote synthesis operation took.
    pub synthesis_duration_ms: u64,
    /// Wall-clock time spent downloading the audio object.
    pub download_duration_ms: u64,
    /// Total wall-clock time for the whole pipeline.
    pub total_duration_ms: u64,
}
