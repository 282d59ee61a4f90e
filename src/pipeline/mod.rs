//! Pipeline stages for PDF-to-MP3 conversion.
//!
//! Each submodule implements exactly one transformation step. Keeping
//! stages separate makes each independently testable and lets us swap
//! implementations (e.g. a different extraction backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ pages ──▶ extract ──▶ normalize ──▶ synth
//! (path)    (filter)   (lopdf)     (cleanup)     (remote TTS + download)
//! ```
//!
//! 1. [`input`]     — validate the user-supplied path (existence, `.pdf`
//!    extension, 5 MiB cap, magic bytes) and derive the output location
//! 2. [`pages`]     — filter the requested page numbers against the
//!    document's page count; empty selection means "whole document"
//! 3. [`extract`]   — per-page text extraction and concatenation; runs in
//!    `spawn_blocking` because lopdf parsing is CPU-bound
//! 4. [`normalize`] — deterministic text cleanup so the synthesiser reads
//!    prose, not typesetting artefacts
//!
//! The remote synthesis and storage download stages live in
//! [`crate::synth`], the only module with network I/O.

pub mod extract;
pub mod input;
pub mod normalize;
pub mod pages;
