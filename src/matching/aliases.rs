/*!
 * Deity name aliases.
 *
 * Catalog titles for the principal deities use spellings and epithets that
 * differ from the chapter titles of the source text. This table maps the
 * normalized catalog form to the canonical chapter name. It is only consulted
 * when the whole normalized title equals a key.
 */

/// Normalized catalog title -> canonical chapter title
pub const DEITY_ALIASES: &[(&str, &str)] = &[
    ("brahma", "Brahman"),
    ("vishnu", "Vishnu"),
    ("sarasvati", "Sarasvati"),
    ("lakshmi", "Lakshmi"),
    ("uma", "Umā"),
    ("parvati", "Umā"),
    ("durga", "Umā"),
    ("ganesa", "Ganesa"),
    ("kartikeya", "Kartikeya"),
];

/// Look up the canonical chapter title for an already normalized title
pub fn canonical_for(normalized_title: &str) -> Option<&'static str> {
    DEITY_ALIASES
        .iter()
        .find(|(alias, _)| *alias == normalized_title)
        .map(|(_, canonical)| *canonical)
}
