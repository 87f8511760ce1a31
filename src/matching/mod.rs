/*!
 * Title normalization and matching.
 *
 * - `normalizer`: canonical comparison keys for titles
 * - `aliases`: fixed deity alias table
 * - `resolver`: tiered resolution of catalog titles against chapter keys or audio filenames
 */

pub mod aliases;
pub mod normalizer;
pub mod resolver;

pub use normalizer::{fold, normalize_title, strip_ordinal};
pub use resolver::{Corpus, CorpusKind, MatchTier, Resolution, resolve};
