/*!
 * Chapter segmentation.
 *
 * Two strategies live here and stay separate:
 * - `ChapterSegmenter` reads documents annotated with `CHAPTER_TITLE:` lines and
 *   `--- STORY START ---` / `--- STORY END ---` markers.
 * - `scan_pages_for_title` is a heuristic for documents without markers: it
 *   follows a title from the page where it first appears until the next page
 *   that carries an all-caps heading.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};
use log::{debug, info};

use crate::matching::Corpus;

/// Chapters at or below this many characters of story text are dropped
pub const MIN_CONTENT_LENGTH: usize = 100;

// @const: Chapter marker line
static CHAPTER_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"CHAPTER_TITLE:[ \t]*([^\r\n]*)").unwrap()
});

// @const: Story body between START and END markers, dash count tolerant
static STORY_BODY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)-+[ \t]*STORY START[ \t]*-+(.*?)-+[ \t]*STORY END[ \t]*-*").unwrap()
});

// @const: Page heading signalling the next chapter in unmarked documents
static PAGE_HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mR)^[A-Z][A-Z \t]{5,}$").unwrap()
});

// @const: Blank line runs
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n\s*\n").unwrap()
});

/// One chapter's narration text
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChapterBlock {
    /// Raw chapter title as found after the marker
    #[serde(rename = "CHAPTER_TITLE")]
    pub title: String,

    /// Story text with all whitespace runs collapsed to single spaces
    #[serde(rename = "STORY")]
    pub story_text: String,

    #[serde(rename = "WORD_COUNT")]
    pub word_count: usize,

    /// Length of `story_text` in characters
    #[serde(rename = "CHARACTER_COUNT")]
    pub char_count: usize,
}

impl ChapterBlock {
    /// Build a block from raw story text, collapsing whitespace
    pub fn new(title: &str, raw_story: &str) -> Self {
        let story_text = collapse_whitespace(raw_story);
        Self {
            title: title.to_string(),
            word_count: story_text.split_whitespace().count(),
            char_count: story_text.chars().count(),
            story_text,
        }
    }
}

/// Chapters of one document, in first-appearance order
///
/// A repeated title keeps its original position but takes the later text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterSet {
    blocks: Vec<ChapterBlock>,
}

impl ChapterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a block, replacing any earlier block with the same title
    pub fn insert(&mut self, block: ChapterBlock) {
        match self.blocks.iter_mut().find(|b| b.title == block.title) {
            Some(existing) => {
                debug!("Duplicate chapter '{}', keeping the later one", block.title);
                *existing = block;
            }
            None => self.blocks.push(block),
        }
    }

    pub fn get(&self, title: &str) -> Option<&ChapterBlock> {
        self.blocks.iter().find(|b| b.title == title)
    }

    pub fn titles(&self) -> impl Iterator<Item = &str> {
        self.blocks.iter().map(|b| b.title.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ChapterBlock> {
        self.blocks.iter()
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Chapter titles as a resolver corpus
    pub fn corpus(&self) -> Corpus {
        Corpus::chapters(self.titles())
    }
}

// Serialized as a JSON object keyed by title, in chapter order
impl Serialize for ChapterSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.blocks.len()))?;
        for block in &self.blocks {
            map.serialize_entry(&block.title, block)?;
        }
        map.end()
    }
}

/// Marker-based chapter segmenter
#[derive(Debug, Clone)]
pub struct ChapterSegmenter {
    min_content_length: usize,
}

impl Default for ChapterSegmenter {
    fn default() -> Self {
        Self {
            min_content_length: MIN_CONTENT_LENGTH,
        }
    }
}

impl ChapterSegmenter {
    pub fn new(min_content_length: usize) -> Self {
        Self { min_content_length }
    }

    /// Split a full document text into chapter blocks
    pub fn segment(&self, text: &str) -> ChapterSet {
        let markers: Vec<(usize, String)> = CHAPTER_MARKER
            .captures_iter(text)
            .filter_map(|caps| {
                let start = caps.get(0)?.start();
                let title = caps.get(1)?.as_str().trim().to_string();
                Some((start, title))
            })
            .collect();

        let mut chapters = ChapterSet::new();

        for (i, (start, title)) in markers.iter().enumerate() {
            if title.is_empty() {
                debug!("Skipping chapter marker without a title at byte {}", start);
                continue;
            }

            let end = markers.get(i + 1).map_or(text.len(), |(next, _)| *next);
            let window = &text[*start..end];

            let Some(body) = STORY_BODY.captures(window).and_then(|c| c.get(1)) else {
                debug!("No story found for: {}", title);
                continue;
            };

            let block = ChapterBlock::new(title, body.as_str());
            if block.char_count <= self.min_content_length {
                debug!("Chapter too short: {} ({} chars)", title, block.char_count);
                continue;
            }

            debug!("Found chapter: {} ({} chars)", title, block.char_count);
            chapters.insert(block);
        }

        info!("Parsed {} chapters", chapters.len());
        chapters
    }
}

/// Follow a title through pages of a document that has no chapter markers
///
/// Takes the text after the first case-insensitive occurrence of `title`,
/// then whole following pages until one carries an all-caps heading line.
/// Returns `None` if the title never appears or nothing follows it.
pub fn scan_pages_for_title(pages: &[String], title: &str) -> Option<String> {
    let title = title.trim();
    if title.is_empty() {
        return None;
    }

    let pattern = Regex::new(&format!("(?i){}", regex::escape(title))).ok()?;
    let first = pages.iter().position(|page| pattern.is_match(page))?;

    let mut extracted = String::new();
    if let Some(m) = pattern.find(&pages[first]) {
        extracted.push_str(pages[first][m.end()..].trim());
    }

    for page in &pages[first + 1..] {
        if PAGE_HEADING.is_match(page) {
            break;
        }
        extracted.push('\n');
        extracted.push_str(page.trim());
    }

    let cleaned = BLANK_LINES.replace_all(&extracted, "\n").trim().to_string();
    if cleaned.is_empty() { None } else { Some(cleaned) }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
