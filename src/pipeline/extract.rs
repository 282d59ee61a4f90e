//! Text extraction: read selected pages via lopdf and concatenate.
//!
//! ## Why spawn_blocking?
//!
//! lopdf parses the whole cross-reference table and decompresses content
//! streams on the calling thread. `tokio::task::spawn_blocking` moves that
//! CPU-bound work onto the blocking pool so the async runtime's worker
//! threads are not stalled while a large document is parsed.
//!
//! Extraction itself is permissive about content: a page that decodes to
//! no text contributes nothing, and an entirely text-free document yields
//! an empty string. The orchestrator decides that an empty result aborts
//! the run; at this layer it is a valid outcome, not an error.

use crate::error::Pdf2Mp3Error;
use crate::output::DocumentMetadata;
use lopdf::{Document, Object};
use std::path::Path;
use tracing::debug;

/// Read document metadata (page count, title, author) without extracting text.
pub async fn inspect_document(
    pdf_path: &Path,
    file_size_bytes: u64,
) -> Result<DocumentMetadata, Pdf2Mp3Error> {
    let path = pdf_path.to_path_buf();
    tokio::task::spawn_blocking(move || inspect_blocking(&path, file_size_bytes))
        .await
        .map_err(|e| Pdf2Mp3Error::Internal(format!("Inspect task panicked: {e}")))?
}

/// Extract the concatenated text of the given pages (1-indexed).
///
/// An empty `pages` slice extracts the whole document in natural page
/// order; an explicit selection is extracted in the order given, which the
/// page filter has already sorted ascending.
pub async fn extract_text(pdf_path: &Path, pages: &[u32]) -> Result<String, Pdf2Mp3Error> {
    let path = pdf_path.to_path_buf();
    let pages = pages.to_vec();
    tokio::task::spawn_blocking(move || extract_text_blocking(&path, &pages))
        .await
        .map_err(|e| Pdf2Mp3Error::Internal(format!("Extraction task panicked: {e}")))?
}

fn load_document(pdf_path: &Path) -> Result<Document, Pdf2Mp3Error> {
    let doc = Document::load(pdf_path).map_err(|e| Pdf2Mp3Error::CorruptPdf {
        path: pdf_path.to_path_buf(),
        detail: e.to_string(),
    })?;
    if doc.is_encrypted() {
        return Err(Pdf2Mp3Error::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail: "document is encrypted".into(),
        });
    }
    Ok(doc)
}

fn inspect_blocking(
    pdf_path: &Path,
    file_size_bytes: u64,
) -> Result<DocumentMetadata, Pdf2Mp3Error> {
    let doc = load_document(pdf_path)?;
    let page_count = doc.get_pages().len() as u32;
    debug!("PDF loaded: {} pages", page_count);

    Ok(DocumentMetadata {
        title: info_text(&doc, b"Title"),
        author: info_text(&doc, b"Author"),
        page_count,
        file_size_bytes,
    })
}

fn extract_text_blocking(pdf_path: &Path, pages: &[u32]) -> Result<String, Pdf2Mp3Error> {
    let doc = load_document(pdf_path)?;

    let page_numbers: Vec<u32> = if pages.is_empty() {
        // BTreeMap keys: natural document order.
        doc.get_pages().keys().copied().collect()
    } else {
        pages.to_vec()
    };

    let mut text = String::new();
    for page in page_numbers {
        let content = doc
            .extract_text(&[page])
            .map_err(|e| Pdf2Mp3Error::ExtractionFailed {
                page,
                detail: e.to_string(),
            })?;
        debug!("Page {}: extracted {} chars", page, content.len());
        text.push_str(&content);
        text.push('\n');
    }

    Ok(text)
}

/// Look up a text entry in the document information dictionary.
fn info_text(doc: &Document, key: &[u8]) -> Option<String> {
    let info = match doc.trailer.get(b"Info").ok()? {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok()?,
        Object::Dictionary(dict) => dict,
        _ => return None,
    };
    match info.get(key).ok()? {
        Object::String(bytes, _) => {
            let text = String::from_utf8_lossy(bytes).trim().to_string();
            (!text.is_empty()).then_some(text)
        }
        _ => None,
    }
}
