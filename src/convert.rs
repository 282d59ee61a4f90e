//! Conversion entry points.
//!
//! The pipeline is strictly linear — each stage consumes the previous
//! stage's output and nothing loops back. Validation problems are returned
//! to the caller (the CLI turns them into a re-prompt); anything that goes
//! wrong at or after the synthesis request is terminal.
//!
//! ```text
//! Idle → PathValidated → PagesFiltered → TextExtracted
//!      → SynthesisRequested → SynthesisComplete → Downloaded
//! ```

use crate::config::ConversionConfig;
use crate::error::Pdf2Mp3Error;
use crate::output::{ConversionOutput, ConversionStats, DocumentMetadata};
use crate::pipeline::{extract, input, normalize, pages};
use crate::synth::{output_gcs_uri, GoogleCloudBackend, SpeechBackend, SynthesisRequest};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Convert a PDF file to an audio artifact.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str` — Path to a local PDF file
/// * `config` — Conversion configuration (voice, cloud identifiers, pages)
///
/// # Errors
/// * Input validation failures (`FileNotFound`, `UnsupportedExtension`,
///   `DocumentTooLarge`, `NotAPdf`) — recoverable by supplying a new path
/// * [`Pdf2Mp3Error::NoTextExtracted`] when the selected pages carry no
///   text; no remote call is made in that case
/// * Remote failures (`SynthesisFailed`, `SynthesisTimeout`, `AuthFailed`,
///   `AudioObjectMissing`, …) — terminal, never retried
pub async fn convert(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2Mp3Error> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting conversion: {}", input_str);

    // ── Step 1: Resolve and validate the document ────────────────────────
    let document = input::resolve_document(input_str, config.audio_encoding.extension())?;

    // ── Step 2: Read document metadata ───────────────────────────────────
    let metadata = extract::inspect_document(&document.path, document.size_bytes).await?;
    info!("PDF has {} pages", metadata.page_count);

    // ── Step 3: Filter the page selection ────────────────────────────────
    let filter = pages::filter_pages(&config.pages, metadata.page_count);
    if !filter.is_whole_document() && filter.kept.is_empty() {
        // Every requested page was out of range. Extracting with an empty
        // list would mean "whole document", which is not what was asked.
        warn!("All requested pages are out of range; nothing to extract");
        return Err(Pdf2Mp3Error::NoTextExtracted {
            path: document.path,
        });
    }

    // ── Step 4: Extract text ─────────────────────────────────────────────
    let extract_start = Instant::now();
    let raw_text = extract::extract_text(&document.path, &filter.kept).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    // ── Step 5: Normalise for speech ─────────────────────────────────────
    let text = normalize::normalize_text(&raw_text);
    if text.is_empty() {
        return Err(Pdf2Mp3Error::NoTextExtracted {
            path: document.path,
        });
    }
    let extracted_chars = text.chars().count();
    info!("Extracted {} chars of text", extracted_chars);

    // ── Step 6: Resolve the speech backend ───────────────────────────────
    let backend = resolve_backend(config)?;

    // ── Step 7: Synthesise ───────────────────────────────────────────────
    let request = SynthesisRequest::new(
        config,
        text,
        output_gcs_uri(&config.bucket, &document.output_filename),
    );
    let synthesis_start = Instant::now();
    backend.synthesize(&request).await?;
    let synthesis_duration_ms = synthesis_start.elapsed().as_millis() as u64;
    info!("Synthesis complete in {}ms", synthesis_duration_ms);

    // ── Step 8: Download the audio object ────────────────────────────────
    let download_start = Instant::now();
    let audio_bytes = backend
        .download(&document.output_filename, &document.output_path)
        .await?;
    let download_duration_ms = download_start.elapsed().as_millis() as u64;

    let selected_pages = if filter.is_whole_document() {
        metadata.page_count
    } else {
        filter.kept.len() as u32
    };

    let stats = ConversionStats {
        total_pages: metadata.page_count,
        selected_pages,
        dropped_pages: filter.dropped.len() as u32,
        extracted_chars,
        extract_duration_ms,
        synthesis_duration_ms,
        download_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Conversion complete: {} pages → {} bytes of audio in {}ms",
        selected_pages, audio_bytes, stats.total_duration_ms
    );

    Ok(ConversionOutput {
        audio_path: document.output_path,
        audio_bytes,
        metadata,
        stats,
    })
}

/// Synchronous wrapper around [`convert`].
///
/// Creates a temporary tokio runtime internally.
pub fn convert_sync(
    input_str: impl AsRef<str>,
    config: &ConversionConfig,
) -> Result<ConversionOutput, Pdf2Mp3Error> {
    tokio::runtime::Runtime::new()
        .map_err(|e| Pdf2Mp3Error::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(convert(input_str, config))
}

/// Validate a document and read its metadata without any remote call.
pub async fn inspect(input_str: impl AsRef<str>) -> Result<DocumentMetadata, Pdf2Mp3Error> {
    let document = input::resolve_document(input_str.as_ref(), "mp3")?;
    extract::inspect_document(&document.path, document.size_bytes).await
}

/// Resolve the speech backend, most-specific first.
///
/// 1. A pre-built backend injected via `config.backend` — used as-is
///    (tests, custom providers).
/// 2. The Google Cloud backend assembled from the config's project,
///    bucket, and bearer token.
fn resolve_backend(config: &ConversionConfig) -> Result<Arc<dyn SpeechBackend>, Pdf2Mp3Error> {
    if let Some(ref backend) = config.backend {
        return Ok(Arc::clone(backend));
    }
    Ok(Arc::new(GoogleCloudBackend::from_config(config)?))
}
