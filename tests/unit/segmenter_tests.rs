/*!
 * Tests for chapter segmentation
 */

use omstream::document::{ChapterSegmenter, MIN_CONTENT_LENGTH, RawDocument, scan_pages_for_title};

const INDRA_STORY: &str = "Hero tale spanning at least 101 characters of narrative text about Indra and his deeds,\n\n   the slaying of Vritra and the release of the waters.";

/// Test the basic marker round trip
#[test]
fn test_segment_withSingleChapter_shouldYieldOneBlock() {
    let text = format!(
        "CHAPTER_TITLE: Indra\n--- STORY START ---\n{}\n--- STORY END ---\n",
        INDRA_STORY
    );
    let chapters = ChapterSegmenter::default().segment(&text);

    assert_eq!(chapters.len(), 1);
    let block = chapters.get("Indra").unwrap();
    assert!(!block.story_text.contains('\n'));
    assert!(!block.story_text.contains("  "));
    assert_eq!(block.char_count, block.story_text.chars().count());
    assert_eq!(block.word_count, block.story_text.split_whitespace().count());
    assert!(block.char_count > MIN_CONTENT_LENGTH);
}

/// Test that a short chapter is dropped
#[test]
fn test_segment_withShortChapter_shouldYieldNothing() {
    let text = "CHAPTER_TITLE: Agni\n--- STORY START ---\nThe god of fire.\n--- STORY END ---\n";
    assert!(ChapterSegmenter::default().segment(text).is_empty());
}

/// Test that exactly MIN_CONTENT_LENGTH characters is still too short
#[test]
fn test_segment_atThreshold_shouldDropChapter() {
    let story = "a".repeat(MIN_CONTENT_LENGTH);
    let text = format!("CHAPTER_TITLE: Vayu\n--- STORY START ---\n{}\n--- STORY END ---", story);
    assert!(ChapterSegmenter::default().segment(&text).is_empty());

    let story = "a".repeat(MIN_CONTENT_LENGTH + 1);
    let text = format!("CHAPTER_TITLE: Vayu\n--- STORY START ---\n{}\n--- STORY END ---", story);
    assert_eq!(ChapterSegmenter::default().segment(&text).len(), 1);
}

/// Test the last-wins duplicate policy
#[test]
fn test_segment_withDuplicateTitles_shouldKeepLaterBlock() {
    let first = "Shiva sat upon Mount Kailasa in deep meditation for ages upon ages while the worlds turned around him unnoticed.";
    let second = "Shiva drank the poison that rose from the churning ocean, and his throat turned blue, earning him the name Nilakantha.";
    let text = format!(
        "CHAPTER_TITLE: Shiva\n--- STORY START ---\n{}\n--- STORY END ---\n\
         CHAPTER_TITLE: Ganesa\n--- STORY START ---\n{}\n--- STORY END ---\n\
         CHAPTER_TITLE: Shiva\n--- STORY START ---\n{}\n--- STORY END ---\n",
        first, first, second
    );

    let chapters = ChapterSegmenter::default().segment(&text);
    assert_eq!(chapters.len(), 2);
    assert_eq!(chapters.get("Shiva").unwrap().story_text, second);
    assert_eq!(chapters.titles().collect::<Vec<_>>(), vec!["Shiva", "Ganesa"]);
}

/// Test that the story must sit inside its own chapter window
#[test]
fn test_segment_withMissingEndMarker_shouldNotBorrowNextChapter() {
    let story = "Yama, the first mortal to die, found the path to the other world and became king of the departed ancestors.";
    let text = format!(
        "CHAPTER_TITLE: Yama\n--- STORY START ---\n{}\n\
         CHAPTER_TITLE: Kubera\n--- STORY START ---\n{}\n--- STORY END ---\n",
        story, story
    );

    let chapters = ChapterSegmenter::default().segment(&text);
    assert!(chapters.get("Yama").is_none());
    assert!(chapters.get("Kubera").is_some());
}

/// Test tolerant markers with extra dashes
#[test]
fn test_segment_withLongDashMarkers_shouldParse() {
    let story = "Sarasvati, goddess of speech and learning, gave the gods the gift of language and the sacred sounds of the Veda.";
    let text = format!(
        "CHAPTER_TITLE:   Sarasvati   \n------ STORY START -------\n{}\n----- STORY END --------\n",
        story
    );

    let chapters = ChapterSegmenter::default().segment(&text);
    assert_eq!(chapters.get("Sarasvati").unwrap().story_text, story);
}

/// Test the page-scan fallback stops at an all-caps heading page
#[test]
fn test_scanPages_shouldStopAtNextHeading() {
    let document = RawDocument::from_text(
        "Preface\x0CThe legend of Dhruva begins here.\n\nHe was a prince.\x0Cstill Dhruva's tale\x0CTHE STORY OF PRAHLADA\nother",
    );

    let text = scan_pages_for_title(&document.pages, "legend of dhruva").unwrap();
    assert_eq!(text, "begins here.\nHe was a prince.\nstill Dhruva's tale");
}

/// Test the page-scan fallback with an absent title
#[test]
fn test_scanPages_withAbsentTitle_shouldReturnNone() {
    let document = RawDocument::from_text("nothing here\x0Cor here");
    assert_eq!(scan_pages_for_title(&document.pages, "Hanuman"), None);
}
