//! # pdf2mp3
//!
//! Convert PDF documents to MP3 audio via Google Cloud Text-to-Speech.
//!
//! ## Why this crate?
//!
//! Listening to a paper or report is often more practical than reading it.
//! This crate extracts the text of a PDF (optionally restricted to chosen
//! pages), hands it to the cloud long-audio synthesis API, and downloads
//! the finished audio next to the source document. Everything substantive
//! — PDF parsing, neural speech synthesis, object storage — is delegated;
//! the crate's job is validating input and driving the four-stage pipeline
//! reliably.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input      validate path, extension, 5 MiB cap; derive output path
//!  ├─ 2. Pages      filter the requested pages against the page count
//!  ├─ 3. Extract    per-page text via lopdf, concatenated in page order
//!  ├─ 4. Normalize  de-hyphenate, collapse whitespace for clean speech
//!  ├─ 5. Synthesize long-audio request, poll the operation to completion
//!  └─ 6. Download   fetch the audio object from Cloud Storage
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf2mp3::{convert, ConversionConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Bearer token read from GOOGLE_ACCESS_TOKEN
//!     let config = ConversionConfig::builder()
//!         .project_id("my-project")
//!         .bucket("my-speech-bucket")
//!         .build()?;
//!     let output = convert("document.pdf", &config).await?;
//!     println!("wrote {}", output.audio_path.display());
//!     eprintln!("{} pages, {} chars, {}ms",
//!         output.stats.selected_pages,
//!         output.stats.extracted_chars,
//!         output.stats.total_duration_ms);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdf2mp3` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdf2mp3 = { version = "0.1", default-features = false }
//! ```
//!
//! ## Failure model
//!
//! Input problems (missing file, wrong extension, oversize document) are
//! ordinary errors a caller can recover from by supplying another path.
//! A document with no extractable text aborts the run *before* any remote
//! call. Remote failures — synthesis timeout, authentication, a missing
//! audio object — are terminal and never retried; the service's diagnostic
//! is carried in the error.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod synth;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{AudioEncoding, ConversionConfig, ConversionConfigBuilder};
pub use convert::{convert, convert_sync, inspect};
pub use error::Pdf2Mp3Error;
pub use output::{ConversionOutput, ConversionStats, DocumentMetadata};
pub use pipeline::input::ResolvedDocument;
pub use synth::{GoogleCloudBackend, SpeechBackend, SynthesisRequest};
