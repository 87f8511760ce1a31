/*!
 * Catalog title resolution.
 *
 * Resolves a catalog title against a corpus of chapter titles or generated
 * audio filenames. Matching runs as a fixed, ordered list of tiers; the first
 * tier that yields a candidate wins and ties inside a tier go to the earliest
 * corpus key. A miss is an ordinary `None`.
 */

use std::fmt;
use std::path::Path;

use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;

use super::aliases;
use super::normalizer::{fold, normalize_title, strip_ordinal};

// @const: Category prefixes used by generated audio filenames (already normalized)
static FILENAME_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(puranic|inferior|general)_((vishnu|shiva|brahma|planets|rishis|avatar)_)?").unwrap()
});

// @const: "The <head> [or <alternate>] Avatāra", applied to folded text
static AVATAR_WITH_ARTICLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bthe\s+(.+?)\s+avatar").unwrap()
});

// @const: "<head> Avatāra" without an article, applied to folded text
static AVATAR_BARE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\w+)\s+avatar").unwrap()
});

// @const: Numbered list entry "3. Something"
static NUMBERED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+\.\s+(.+)$").unwrap()
});

// @const: "Name (Alias)"
static PARENTHETICAL_ALIAS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\w+)\s+\([^)]+\)").unwrap()
});

/// Folded tokens marking a chapter that carries an alias, besides a parenthesis
const KNOWN_ALIAS_TOKENS: &[&str] = &["surya", "soma"];

const AVATAR_KEYWORD: &str = "avatar";

/// Words never taken as an avatar head
const HEAD_STOP_WORDS: &[&str] = &["the", "of", "and", "or", "a", "an"];

/// What the corpus keys are
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CorpusKind {
    /// Raw chapter titles from the segmenter
    Chapters,
    /// Generated audio filenames, extension included
    AudioFiles,
}

/// An ordered set of keys to resolve against, with precomputed comparison forms
#[derive(Debug, Clone)]
pub struct Corpus {
    kind: CorpusKind,
    keys: Vec<String>,
    // @field: normalize_title of each key (prefix and extension stripped for files)
    normalized: Vec<String>,
    // @field: fold of each key
    folded: Vec<String>,
}

impl Corpus {
    /// Build a corpus of chapter titles, in iteration order
    pub fn chapters<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(CorpusKind::Chapters, keys)
    }

    /// Build a corpus of audio filenames, in iteration order
    pub fn audio_files<I, S>(files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(CorpusKind::AudioFiles, files)
    }

    fn new<I, S>(kind: CorpusKind, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        let normalized = keys.iter().map(|k| comparison_key(k, kind)).collect();
        let folded = keys.iter().map(|k| fold(k)).collect();
        Self { kind, keys, normalized, folded }
    }

    pub fn kind(&self) -> CorpusKind {
        self.kind
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    fn position(&self, predicate: impl Fn(usize) -> bool) -> Option<usize> {
        (0..self.keys.len()).find(|&i| predicate(i))
    }
}

/// Comparison form of a corpus key
///
/// Audio filenames lose their extension and category prefix before
/// normalization so they compare like the titles they were generated from.
pub fn comparison_key(key: &str, kind: CorpusKind) -> String {
    match kind {
        CorpusKind::Chapters => normalize_title(key),
        CorpusKind::AudioFiles => {
            let stem = Path::new(key)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| key.to_string());
            let normalized = normalize_title(&stem);
            FILENAME_PREFIX.replace(&normalized, "").into_owned()
        }
    }
}

/// Which strategy produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchTier {
    Exact,
    CaseInsensitive,
    NormalizedSubstring,
    Avatar,
    NumberedList,
    NumberedAlias,
    DeityAlias,
}

impl fmt::Display for MatchTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Exact => "exact",
            Self::CaseInsensitive => "case-insensitive",
            Self::NormalizedSubstring => "normalized substring",
            Self::Avatar => "avatar heuristic",
            Self::NumberedList => "numbered list",
            Self::NumberedAlias => "numbered alias",
            Self::DeityAlias => "deity alias",
        };
        f.write_str(name)
    }
}

/// Successful resolution of a catalog title
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The matched corpus key, verbatim
    pub key: String,
    /// Position of the key in the corpus
    pub index: usize,
    /// Tier that produced the match
    pub tier: MatchTier,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    tier: MatchTier,
}

type Tier = fn(&str, &Corpus) -> Option<Candidate>;

/// Tiers in priority order
const TIERS: &[Tier] = &[exact, case_insensitive, normalized_substring, domain_heuristics];

/// The generic tiers, re-run on the stripped form of numbered titles
const GENERIC_TIERS: &[Tier] = &[exact, case_insensitive, normalized_substring];

/// Resolve a catalog title to the best corpus key, or `None`
pub fn resolve(title: &str, corpus: &Corpus) -> Option<Resolution> {
    let hit = run_tiers(TIERS, title, corpus);

    match &hit {
        Some(c) => debug!("'{}' -> '{}' ({})", title, corpus.keys[c.index], c.tier),
        None => trace!("No match for '{}' among {} keys", title, corpus.len()),
    }

    hit.map(|c| Resolution {
        key: corpus.keys[c.index].clone(),
        index: c.index,
        tier: c.tier,
    })
}

fn run_tiers(tiers: &[Tier], title: &str, corpus: &Corpus) -> Option<Candidate> {
    tiers.iter().find_map(|tier| tier(title, corpus))
}

fn exact(title: &str, corpus: &Corpus) -> Option<Candidate> {
    corpus
        .position(|i| corpus.keys[i] == title)
        .map(|index| Candidate { index, tier: MatchTier::Exact })
}

fn case_insensitive(title: &str, corpus: &Corpus) -> Option<Candidate> {
    let lowered = title.to_lowercase();
    corpus
        .position(|i| corpus.keys[i].to_lowercase() == lowered)
        .map(|index| Candidate { index, tier: MatchTier::CaseInsensitive })
}

fn normalized_substring(title: &str, corpus: &Corpus) -> Option<Candidate> {
    let wanted = normalize_title(title);
    if wanted.is_empty() {
        return None;
    }

    corpus
        .position(|i| {
            let key = &corpus.normalized[i];
            !key.is_empty() && (key.contains(&wanted) || wanted.contains(key.as_str()))
        })
        .map(|index| Candidate { index, tier: MatchTier::NormalizedSubstring })
}

/// Shapes of catalog titles that have a dedicated heuristic
#[derive(Debug, Clone, PartialEq, Eq)]
enum TitleShape<'a> {
    Avatar {
        head: Option<String>,
        alternate: Option<String>,
    },
    Numbered {
        rest: &'a str,
        alias_name: Option<String>,
    },
    DeityAlias(&'static str),
    Plain,
}

fn classify(title: &str) -> TitleShape<'_> {
    let folded = fold(title);

    if folded.contains(AVATAR_KEYWORD) {
        if let Some(caps) = AVATAR_WITH_ARTICLE.captures(&folded) {
            let names = caps[1].trim();
            let (head, alternate) = match names.split_once(" or ") {
                Some((head, alt)) => (head.trim().to_string(), Some(alt.trim().to_string())),
                None => (names.to_string(), None),
            };
            return TitleShape::Avatar {
                head: Some(head).filter(|h| !h.is_empty()),
                alternate: alternate.filter(|a| !a.is_empty()),
            };
        }

        let bare = fold(strip_ordinal(title));
        let head = AVATAR_BARE
            .captures(&bare)
            .map(|caps| caps[1].to_string())
            .filter(|head| !HEAD_STOP_WORDS.contains(&head.as_str()));
        return TitleShape::Avatar { head, alternate: None };
    }

    if let Some(caps) = NUMBERED.captures(title) {
        let rest = caps.get(1).map_or("", |m| m.as_str()).trim();
        let alias_name = PARENTHETICAL_ALIAS
            .captures(rest)
            .map(|c| c[1].to_string());
        return TitleShape::Numbered { rest, alias_name };
    }

    if let Some(canonical) = aliases::canonical_for(&normalize_title(title)) {
        return TitleShape::DeityAlias(canonical);
    }

    TitleShape::Plain
}

fn domain_heuristics(title: &str, corpus: &Corpus) -> Option<Candidate> {
    match classify(title) {
        TitleShape::Avatar { head, alternate } => [head, alternate]
            .into_iter()
            .flatten()
            .find_map(|name| avatar_key(&name, corpus))
            .map(|index| Candidate { index, tier: MatchTier::Avatar }),

        TitleShape::Numbered { rest, alias_name } => {
            if let Some(hit) = run_tiers(GENERIC_TIERS, rest, corpus) {
                return Some(Candidate { index: hit.index, tier: MatchTier::NumberedList });
            }
            alias_name
                .and_then(|name| parenthetical_key(&name, corpus))
                .map(|index| Candidate { index, tier: MatchTier::NumberedAlias })
        }

        TitleShape::DeityAlias(canonical) => {
            let wanted = normalize_title(canonical);
            corpus
                .position(|i| corpus.normalized[i] == wanted)
                .map(|index| Candidate { index, tier: MatchTier::DeityAlias })
        }

        TitleShape::Plain => None,
    }
}

fn avatar_key(name: &str, corpus: &Corpus) -> Option<usize> {
    corpus.position(|i| {
        let key = &corpus.folded[i];
        key.contains(name) && key.contains(AVATAR_KEYWORD)
    })
}

fn parenthetical_key(name: &str, corpus: &Corpus) -> Option<usize> {
    let name = fold(name);
    corpus.position(|i| {
        let key = &corpus.folded[i];
        key.contains(&name)
            && (key.contains('(') || KNOWN_ALIAS_TOKENS.iter().any(|t| key.contains(t)))
    })
}
