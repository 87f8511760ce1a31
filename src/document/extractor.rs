/*!
 * Source document text extraction.
 *
 * PDFs are read page by page with `lopdf`; if that fails the whole document
 * is handed to `pdf-extract` and split on form feeds. Plain text sources are
 * split on form feeds directly. A page that yields nothing is kept as an
 * empty string so page order never shifts.
 */

use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::errors::SourceError;

/// Page separator used by text sources and by `pdf-extract` output
const FORM_FEED: char = '\x0C';

/// Ordered page texts of one source document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDocument {
    /// Page texts, possibly empty
    pub pages: Vec<String>,
}

impl RawDocument {
    pub fn from_pages(pages: Vec<String>) -> Self {
        Self { pages }
    }

    /// Split a text blob into pages on form feed characters
    pub fn from_text(text: &str) -> Self {
        Self {
            pages: text.split(FORM_FEED).map(str::to_string).collect(),
        }
    }

    /// All page texts joined with newlines, page order preserved
    pub fn text(&self) -> String {
        self.pages.join("\n")
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// True when no page carries any non-whitespace text
    pub fn is_blank(&self) -> bool {
        self.pages.iter().all(|p| p.trim().is_empty())
    }
}

/// Supported source formats, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pdf,
    Text,
}

impl SourceFormat {
    // @returns: Format for a path, text for anything that is not a PDF
    pub fn for_path(path: &Path) -> Self {
        let is_pdf = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("pdf"));
        if is_pdf { Self::Pdf } else { Self::Text }
    }
}

/// Extract the pages of a source document
pub fn extract_document<P: AsRef<Path>>(path: P) -> Result<RawDocument, SourceError> {
    let path = path.as_ref();

    if !path.is_file() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }

    info!("Extracting content from: {}", path.display());

    let document = match SourceFormat::for_path(path) {
        SourceFormat::Pdf => extract_pdf(path)?,
        SourceFormat::Text => {
            let text = fs::read_to_string(path).map_err(|e| unreadable(path, e))?;
            RawDocument::from_text(&text)
        }
    };

    if document.is_blank() {
        return Err(SourceError::Empty(path.to_path_buf()));
    }

    debug!("Extracted {} page(s) from {}", document.page_count(), path.display());
    Ok(document)
}

fn extract_pdf(path: &Path) -> Result<RawDocument, SourceError> {
    match extract_with_lopdf(path) {
        Ok(document) if !document.is_blank() => return Ok(document),
        Ok(_) => warn!("lopdf found no text in {}, trying pdf-extract", path.display()),
        Err(e) => warn!("lopdf failed on {}: {}, trying pdf-extract", path.display(), e),
    }

    extract_with_pdf_extract(path).map_err(|e| unreadable(path, e))
}

fn extract_with_lopdf(path: &Path) -> Result<RawDocument, String> {
    let doc = lopdf::Document::load(path).map_err(|e| e.to_string())?;

    let pages = doc
        .get_pages()
        .keys()
        .map(|&page_number| match doc.extract_text(&[page_number]) {
            Ok(text) => text,
            Err(e) => {
                debug!("No text on page {}: {}", page_number, e);
                String::new()
            }
        })
        .collect();

    Ok(RawDocument::from_pages(pages))
}

fn extract_with_pdf_extract(path: &Path) -> Result<RawDocument, String> {
    // pdf-extract panics on some malformed font tables
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| pdf_extract::extract_text(path)));

    match outcome {
        Ok(Ok(text)) => Ok(RawDocument::from_text(&text)),
        Ok(Err(e)) => Err(e.to_string()),
        Err(_) => Err("pdf-extract panicked while reading the document".to_string()),
    }
}

fn unreadable(path: &Path, reason: impl ToString) -> SourceError {
    SourceError::Unreadable {
        path: PathBuf::from(path),
        reason: reason.to_string(),
    }
}
