/*!
 * Source document handling.
 *
 * - `extractor`: page text extraction from PDF and text sources
 * - `segmenter`: marker-based chapter blocks and the page-scan fallback
 * - `source`: title lookups against a document on disk
 */

pub mod extractor;
pub mod segmenter;
pub mod source;

pub use extractor::{RawDocument, SourceFormat, extract_document};
pub use segmenter::{ChapterBlock, ChapterSegmenter, ChapterSet, MIN_CONTENT_LENGTH, scan_pages_for_title};
pub use source::{ChapterSource, ChapterText, story_in};
