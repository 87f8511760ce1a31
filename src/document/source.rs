use std::path::{Path, PathBuf};

use log::{debug, info};

use super::extractor::{RawDocument, extract_document};
use super::segmenter::{ChapterSegmenter, ChapterSet, scan_pages_for_title};
use crate::errors::SourceError;
use crate::matching::resolve;

// @module: Chapter lookups against one source document

/// Where a piece of narration text came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChapterText {
    /// A marker-delimited chapter, resolved by title
    Marked { chapter_title: String, text: String },
    /// Text collected by the page-scan heuristic
    Scanned { text: String },
}

impl ChapterText {
    pub fn text(&self) -> &str {
        match self {
            Self::Marked { text, .. } | Self::Scanned { text } => text,
        }
    }

    pub fn into_text(self) -> String {
        match self {
            Self::Marked { text, .. } | Self::Scanned { text } => text,
        }
    }
}

/// A source document that is re-read and re-parsed on every call
#[derive(Debug, Clone)]
pub struct ChapterSource {
    path: PathBuf,
    segmenter: ChapterSegmenter,
}

impl ChapterSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            segmenter: ChapterSegmenter::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Extract the raw pages of the document
    pub fn pages(&self) -> Result<RawDocument, SourceError> {
        extract_document(&self.path)
    }

    /// Full parse into chapter blocks
    pub fn chapters(&self) -> Result<ChapterSet, SourceError> {
        let document = self.pages()?;
        Ok(self.segmenter.segment(&document.text()))
    }

    /// Story text of the chapter matching a catalog title, if any
    pub fn chapter_text_for(&self, title: &str) -> Result<Option<String>, SourceError> {
        let chapters = self.chapters()?;
        Ok(story_in(&chapters, title))
    }

    /// Narration text for a title: marker-based chapters first, then the page scan
    pub fn lookup(&self, title: &str) -> Result<Option<ChapterText>, SourceError> {
        let document = self.pages()?;
        let chapters = self.segmenter.segment(&document.text());

        if let Some(resolution) = resolve(title, &chapters.corpus()) {
            if let Some(block) = chapters.get(&resolution.key) {
                info!("Using chapter '{}' for '{}' ({} chars)", block.title, title, block.char_count);
                return Ok(Some(ChapterText::Marked {
                    chapter_title: block.title.clone(),
                    text: block.story_text.clone(),
                }));
            }
        }

        debug!("No marked chapter for '{}', scanning pages", title);
        Ok(scan_pages_for_title(&document.pages, title).map(|text| ChapterText::Scanned { text }))
    }
}

/// Resolve a title against an already parsed chapter set
pub fn story_in(chapters: &ChapterSet, title: &str) -> Option<String> {
    let resolution = resolve(title, &chapters.corpus())?;
    chapters.get(&resolution.key).map(|b| b.story_text.clone())
}
