/*!
 * Tests for title normalization
 */

use omstream::matching::{fold, normalize_title, strip_ordinal};

/// Test that ordinal prefixes with a letter suffix are removed
#[test]
fn test_normalize_withLetteredOrdinal_shouldMatchUnnumberedTitle() {
    assert_eq!(normalize_title("8a. Kūrma Avatāra"), normalize_title("Kūrma Avatāra"));
    assert_eq!(normalize_title("8a. Kūrma Avatāra"), "kurma_avatara");
}

/// Test that normalizing twice changes nothing
#[test]
fn test_normalize_appliedTwice_shouldBeIdempotent() {
    let titles = [
        "1. The Matsya or Fish Avatāra",
        "2. Soma (Moon)",
        "  Umā,   the   Mountain's Daughter  ",
        "Brahma_Creation_Story",
        "ŚIVA — Mahādeva!",
        "12. 3 Worlds",
        "",
    ];

    for title in titles {
        let once = normalize_title(title);
        assert_eq!(normalize_title(&once), once, "not idempotent for {:?}", title);
    }
}

/// Test that punctuation is dropped and whitespace runs become one underscore
#[test]
fn test_normalize_withPunctuation_shouldJoinWordsWithUnderscores() {
    assert_eq!(normalize_title("Soma (Chandra)"), "soma_chandra");
    assert_eq!(normalize_title("Ravi\t\tor  Surya"), "ravi_or_surya");
    assert_eq!(normalize_title("Nārada's Curse!"), "naradas_curse");
}

/// Test that only a leading ordinal is stripped
#[test]
fn test_stripOrdinal_withInnerNumbers_shouldKeepThem() {
    assert_eq!(strip_ordinal("3. The 10 Avatāras"), "The 10 Avatāras");
    assert_eq!(strip_ordinal("The 10. Avatāras"), "The 10. Avatāras");
    assert_eq!(strip_ordinal("2004 Retold"), "2004 Retold");
}

/// Test that folding keeps punctuation but drops diacritics and case
#[test]
fn test_fold_shouldKeepStructure() {
    assert_eq!(fold("KŪRMA (Tortoise)"), "kurma (tortoise)");
}
