//! Integration tests for the conversion pipeline.
//!
//! A recording [`SpeechBackend`] stands in for the remote service, so
//! these tests exercise everything up to (and including) the synthesis
//! request boundary without network access: validation, page filtering,
//! extraction, the empty-text abort, and the request actually handed to
//! the synthesiser.

mod common;

use async_trait::async_trait;
use pdf2mp3::{convert, ConversionConfig, Pdf2Mp3Error, SpeechBackend, SynthesisRequest};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Backend double: records every synthesis request and writes canned
/// audio bytes on download.
struct RecordingBackend {
    synth_calls: AtomicUsize,
    requests: Mutex<Vec<SynthesisRequest>>,
    audio: Vec<u8>,
}

impl RecordingBackend {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            synth_calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            audio: b"not-really-mp3-bytes".to_vec(),
        })
    }

    fn calls(&self) -> usize {
        self.synth_calls.load(Ordering::SeqCst)
    }

    fn last_request(&self) -> SynthesisRequest {
        self.requests.lock().unwrap().last().cloned().expect("a request was recorded")
    }
}

#[async_trait]
impl SpeechBackend for RecordingBackend {
    async fn synthesize(&self, request: &SynthesisRequest) -> Result<(), Pdf2Mp3Error> {
        self.synth_calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn download(&self, _object_name: &str, dest: &Path) -> Result<u64, Pdf2Mp3Error> {
        std::fs::write(dest, &self.audio).map_err(|e| Pdf2Mp3Error::OutputWriteFailed {
            path: dest.to_path_buf(),
            source: e,
        })?;
        Ok(self.audio.len() as u64)
    }
}

fn config_with(backend: &Arc<RecordingBackend>, pages: Vec<u32>) -> ConversionConfig {
    ConversionConfig::builder()
        .pages(pages)
        .bucket("test-bucket")
        .backend(Arc::clone(backend) as Arc<dyn SpeechBackend>)
        .build()
        .unwrap()
}

// ── Happy path ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn whole_document_is_synthesised_once() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = common::build_pdf(&dir, "doc.pdf", &["alpha page", "bravo page"]);

    let backend = RecordingBackend::new();
    let config = config_with(&backend, vec![]);

    let output = convert(pdf.to_str().unwrap(), &config).await.unwrap();

    assert_eq!(backend.calls(), 1);
    let request = backend.last_request();
    assert!(request.input.text.contains("alpha page"));
    assert!(request.input.text.contains("bravo page"));
    assert_eq!(request.output_gcs_uri, "gs://test-bucket/doc.mp3");
    assert_eq!(request.voice.language_code, "en-GB");
    assert_eq!(request.voice.name, "en-GB-Standard-B");

    // The artifact lands next to the source with the audio extension.
    assert_eq!(output.audio_path, dir.path().join("doc.mp3"));
    assert_eq!(
        std::fs::read(&output.audio_path).unwrap(),
        b"not-really-mp3-bytes"
    );
    assert_eq!(output.stats.total_pages, 2);
    assert_eq!(output.stats.selected_pages, 2);
    assert_eq!(output.stats.dropped_pages, 0);
}

#[tokio::test]
async fn out_of_range_pages_are_dropped_and_rest_synthesised() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = common::build_pdf(&dir, "doc.pdf", &["alpha", "bravo", "charlie"]);

    let backend = RecordingBackend::new();
    // Page 5 does not exist in the 3-page document.
    let config = config_with(&backend, vec![1, 2, 5]);

    let output = convert(pdf.to_str().unwrap(), &config).await.unwrap();

    assert_eq!(backend.calls(), 1);
    let request = backend.last_request();
    assert!(request.input.text.contains("alpha"));
    assert!(request.input.text.contains("bravo"));
    assert!(
        !request.input.text.contains("charlie"),
        "page 3 was not selected and must not be synthesised"
    );
    assert_eq!(output.stats.selected_pages, 2);
    assert_eq!(output.stats.dropped_pages, 1);
}

// ── Abort paths: the backend must never be called ────────────────────────────

#[tokio::test]
async fn empty_extraction_aborts_before_synthesis() {
    let dir = tempfile::tempdir().unwrap();
    // Parses fine, but both pages have empty content streams.
    let pdf = common::build_pdf(&dir, "scanned.pdf", &["", ""]);

    let backend = RecordingBackend::new();
    let config = config_with(&backend, vec![]);

    let err = convert(pdf.to_str().unwrap(), &config).await.unwrap_err();
    assert!(matches!(err, Pdf2Mp3Error::NoTextExtracted { .. }));
    assert_eq!(backend.calls(), 0, "synthesiser must not be invoked");
}

#[tokio::test]
async fn wrong_extension_rejected_before_extraction_or_synthesis() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.docx");
    std::fs::write(&path, b"%PDF-1.4 content does not matter").unwrap();

    let backend = RecordingBackend::new();
    let config = config_with(&backend, vec![]);

    let err = convert(path.to_str().unwrap(), &config).await.unwrap_err();
    assert!(matches!(err, Pdf2Mp3Error::UnsupportedExtension { .. }));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn oversize_document_rejected_before_synthesis() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("big.pdf");
    {
        use std::io::Write;
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(b"%PDF-1.4").unwrap();
        f.set_len(5 * 1024 * 1024 + 1).unwrap();
    }

    let backend = RecordingBackend::new();
    let config = config_with(&backend, vec![]);

    let err = convert(path.to_str().unwrap(), &config).await.unwrap_err();
    assert!(matches!(err, Pdf2Mp3Error::DocumentTooLarge { .. }));
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn entirely_out_of_range_selection_aborts() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = common::build_pdf(&dir, "short.pdf", &["only page"]);

    let backend = RecordingBackend::new();
    let config = config_with(&backend, vec![7, 8]);

    let err = convert(pdf.to_str().unwrap(), &config).await.unwrap_err();
    assert!(matches!(err, Pdf2Mp3Error::NoTextExtracted { .. }));
    assert_eq!(backend.calls(), 0);
}

// ── Request construction ─────────────────────────────────────────────────────

#[tokio::test]
async fn voice_configuration_is_passed_through() {
    let dir = tempfile::tempdir().unwrap();
    let pdf = common::build_pdf(&dir, "doc.pdf", &["spoken text"]);

    let backend = RecordingBackend::new();
    let config = ConversionConfig::builder()
        .language_code("de-DE")
        .voice_name("de-DE-Standard-A")
        .speaking_rate(1.5)
        .pitch(-2.0)
        .bucket("test-bucket")
        .backend(Arc::clone(&backend) as Arc<dyn SpeechBackend>)
        .build()
        .unwrap();

    convert(pdf.to_str().unwrap(), &config).await.unwrap();

    let request = backend.last_request();
    assert_eq!(request.voice.language_code, "de-DE");
    assert_eq!(request.voice.name, "de-DE-Standard-A");
    assert_eq!(request.audio_config.speaking_rate, 1.5);
    assert_eq!(request.audio_config.pitch, -2.0);
    assert_eq!(request.audio_config.audio_encoding, "MP3");
}
