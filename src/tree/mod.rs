//! The heterogeneous value tree backing a parsed project.
//!
//! A pbxproj file is an ordered, comment-annotated tree: mappings whose
//! iteration order is the authoring order, sequences, strings that remember
//! whether the source quoted them, and small integers. The parser builds
//! this tree, the project mutator edits it in place, and the writer walks it
//! back out to text.
//!
//! Inline comments are not trivia here. A key `K` may be accompanied by a
//! sibling entry `K_comment` holding the human-readable label Xcode renders
//! beside `K`'s value, and mutators maintain the two in lockstep.

mod ordered_map;
mod value;

pub use ordered_map::OrderedMap;
pub use value::{CommentedEntry, Value};

/// Suffix pairing a key with its inline-comment companion entry.
pub const COMMENT_KEY_SUFFIX: &str = "_comment";

/// The companion comment key for `key`.
pub fn comment_key(key: &str) -> String {
    format!("{key}{COMMENT_KEY_SUFFIX}")
}

/// The base key for a comment key; returns the input unchanged otherwise.
pub fn strip_comment_key(key: &str) -> &str {
    key.strip_suffix(COMMENT_KEY_SUFFIX).unwrap_or(key)
}

/// Whether `key` is a comment companion entry.
pub fn is_comment_key(key: &str) -> bool {
    key.ends_with(COMMENT_KEY_SUFFIX)
}

/// Strip one surrounding pair of double quotes, if present.
///
/// Leading and trailing quotes are stripped independently, mirroring how the
/// format's consumers tolerate half-quoted values.
pub fn unquoted(text: &str) -> &str {
    let text = text.strip_prefix('"').unwrap_or(text);
    text.strip_suffix('"').unwrap_or(text)
}

/// Wrap `text` in double quotes.
pub fn quoted(text: &str) -> String {
    format!("\"{text}\"")
}
