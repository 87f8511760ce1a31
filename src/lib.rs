/*!
 * # OmStream - narrated mythology episodes
 *
 * A Rust library that turns a marker-annotated mythology source document
 * into chapters, matches catalog episode titles to those chapters and to
 * audio files on disk, and narrates episodes that have no audio yet.
 *
 * ## Features
 *
 * - Page text extraction from PDF and plain text sources
 * - Chapter segmentation on `CHAPTER_TITLE:` / `STORY START` / `STORY END` markers
 * - Diacritic-insensitive title normalization
 * - Tiered title matching with avatar, numbered list and deity alias heuristics
 * - A persisted, deterministic audio map built from the catalog
 * - On-demand and batch narration through pluggable synthesis and mixing tools
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document`: Source documents:
 *   - `document::extractor`: Page text extraction
 *   - `document::segmenter`: Chapter segmentation and page scanning
 *   - `document::source`: Title lookups against a document on disk
 * - `matching`: Title matching:
 *   - `matching::normalizer`: Title normalization
 *   - `matching::aliases`: Deity alias table
 *   - `matching::resolver`: Tiered match resolution
 * - `catalog`: Episode catalog and its cache
 * - `audio_map`: Audio map persistence and building
 * - `narration`: Speech synthesis, mixing and the narration service
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod audio_map;
pub mod catalog;
pub mod document;
pub mod errors;
pub mod file_utils;
pub mod matching;
pub mod narration;

// Re-export main types for easier usage
pub use app_config::{Config, Voice};
pub use audio_map::{AudioMap, AudioMapBuilder, AudioMapEntry, BuildReport};
pub use catalog::{Catalog, CatalogCache, CatalogEntry};
pub use document::{ChapterBlock, ChapterSegmenter, ChapterSet, ChapterSource, RawDocument, extract_document};
pub use errors::{AppError, AudioMapError, CatalogError, NarrationError, SourceError};
pub use matching::{Corpus, MatchTier, Resolution, normalize_title, resolve};
pub use narration::{NarrationService, Playback};
