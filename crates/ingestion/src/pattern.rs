//! Pattern compiler: placeholder templates to glob + regex.
//!
//! A template mixes literal path text with placeholders: `{}` matches
//! anything without contributing to the key, `{name}` captures one
//! alphanumeric key value, and `{{` / `}}` escape literal braces.
//! Compilation produces two views of the same template: a glob used
//! for cheap filesystem enumeration, and an anchored regex used to
//! re-derive key tuples from the (much smaller) set of glob hits. No
//! regex is ever run against the filesystem tree itself.

use regex::Regex;
use thiserror::Error;

use raster_common::KeyTuple;

/// Character class for captured key values.
const KEY_VALUE_CLASS: &str = "([0-9A-Za-z]+)";

/// Template errors, all reported before any filesystem access.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Unmatched '{{' in pattern")]
    UnclosedBrace,

    #[error("Unmatched '}}' in pattern")]
    UnmatchedBrace,

    #[error("Pattern must contain at least one named placeholder")]
    NoPlaceholders,

    #[error("Key names must be alphanumeric, got '{0}'")]
    InvalidKeyName(String),

    #[error("Pattern produced an invalid expression: {0}")]
    Regex(String),
}

/// What each capture group in the compiled regex stands for.
///
/// Group `i + 1` of the regex corresponds to entry `i` here; unnamed
/// placeholders compile to non-capturing groups and have no entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupRole {
    /// First occurrence of the key at this index.
    Key(usize),
    /// Repeated occurrence; must equal the key's first capture.
    Repeat(usize),
}

/// A compiled path template.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    glob: String,
    regex: Regex,
    key_names: Vec<String>,
    groups: Vec<GroupRole>,
}

impl CompiledPattern {
    /// Glob pattern for filesystem enumeration.
    pub fn glob(&self) -> &str {
        &self.glob
    }

    /// Key names in order of first appearance in the template.
    pub fn key_names(&self) -> &[String] {
        &self.key_names
    }

    /// Extract the key tuple from a candidate path string.
    ///
    /// Returns `None` if the candidate doesn't match the template, or
    /// if two occurrences of a repeated placeholder captured different
    /// substrings.
    pub fn extract(&self, candidate: &str) -> Option<KeyTuple> {
        let caps = self.regex.captures(candidate)?;

        let mut values: Vec<Option<&str>> = vec![None; self.key_names.len()];
        for (i, role) in self.groups.iter().enumerate() {
            let text = caps.get(i + 1)?.as_str();
            match role {
                GroupRole::Key(k) => values[*k] = Some(text),
                GroupRole::Repeat(k) => {
                    if values[*k] != Some(text) {
                        return None;
                    }
                }
            }
        }

        let values: Option<Vec<String>> = values
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        Some(KeyTuple::new(values?))
    }
}

/// Compile a placeholder template into glob and regex form.
pub fn compile(template: &str) -> Result<CompiledPattern, PatternError> {
    let mut glob = String::new();
    let mut regex_src = String::from("^");
    let mut key_names: Vec<String> = Vec::new();
    let mut groups: Vec<GroupRole> = Vec::new();
    let mut literal = String::new();

    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '}' => return Err(PatternError::UnmatchedBrace),
            '{' => {
                glob.push_str(&literal);
                regex_src.push_str(&regex::escape(&literal));
                literal.clear();

                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => return Err(PatternError::UnclosedBrace),
                        Some(c) => name.push(c),
                    }
                }

                glob.push('*');
                if name.is_empty() {
                    // Unnamed placeholder: match anything, shortest,
                    // without contributing to the key.
                    regex_src.push_str("(?:.*?)");
                } else {
                    if !name.chars().all(|c| c.is_ascii_alphanumeric()) {
                        return Err(PatternError::InvalidKeyName(name));
                    }
                    if let Some(idx) = key_names.iter().position(|k| k == &name) {
                        // The regex crate has no backreferences, so a
                        // repeated name gets its own group and the
                        // captures are compared after matching.
                        regex_src.push_str(KEY_VALUE_CLASS);
                        groups.push(GroupRole::Repeat(idx));
                    } else {
                        regex_src.push_str(KEY_VALUE_CLASS);
                        groups.push(GroupRole::Key(key_names.len()));
                        key_names.push(name);
                    }
                }
            }
            c => literal.push(c),
        }
    }
    glob.push_str(&literal);
    regex_src.push_str(&regex::escape(&literal));
    regex_src.push('$');

    if key_names.is_empty() {
        return Err(PatternError::NoPlaceholders);
    }

    let regex = Regex::new(&regex_src).map_err(|e| PatternError::Regex(e.to_string()))?;

    Ok(CompiledPattern {
        glob,
        regex,
        key_names,
        groups,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_placeholders_fails() {
        assert_eq!(
            compile("/data/red.tif").unwrap_err(),
            PatternError::NoPlaceholders
        );
    }

    #[test]
    fn test_only_unnamed_placeholders_fails() {
        assert_eq!(
            compile("/data/{}.tif").unwrap_err(),
            PatternError::NoPlaceholders
        );
    }

    #[test]
    fn test_key_names_in_order_of_first_appearance() {
        let pattern = compile("/{name}/{date}_{band}.tif").unwrap();
        assert_eq!(pattern.key_names(), ["name", "date", "band"]);
        assert_eq!(pattern.glob(), "/*/*_*.tif");
    }

    #[test]
    fn test_extract_round_trip() {
        let pattern = compile("/{name}/{date}_{band}.tif").unwrap();
        assert_eq!(
            pattern.extract("/gfs/2024_red.tif"),
            Some(KeyTuple::from(["gfs", "2024", "red"]))
        );
    }

    #[test]
    fn test_unnamed_placeholder_excluded_from_key() {
        let pattern = compile("/{name}/{band}{}.tif").unwrap();
        assert_eq!(pattern.key_names(), ["name", "band"]);
        assert_eq!(
            pattern.extract("/gfs/red_final.tif"),
            Some(KeyTuple::from(["gfs", "red"]))
        );
    }

    #[test]
    fn test_repeated_placeholder_must_capture_same_value() {
        let pattern = compile("/{band}/{band}.tif").unwrap();
        assert_eq!(pattern.key_names(), ["band"]);
        assert_eq!(
            pattern.extract("/red/red.tif"),
            Some(KeyTuple::from(["red"]))
        );
        assert_eq!(pattern.extract("/red/green.tif"), None);
    }

    #[test]
    fn test_non_alphanumeric_key_name_fails() {
        assert_eq!(
            compile("/{ba_nd}.tif").unwrap_err(),
            PatternError::InvalidKeyName("ba_nd".to_string())
        );
    }

    #[test]
    fn test_key_values_reject_non_alphanumeric_characters() {
        let pattern = compile("/{band}.tif").unwrap();
        assert_eq!(pattern.extract("/red-ish.tif"), None);
        assert_eq!(pattern.extract("/sub/dir.tif"), None);
    }

    #[test]
    fn test_escaped_braces_are_literal() {
        let pattern = compile("/{{x}}/{band}.tif").unwrap();
        assert_eq!(pattern.glob(), "/{x}/*.tif");
        assert_eq!(
            pattern.extract("/{x}/red.tif"),
            Some(KeyTuple::from(["red"]))
        );
    }

    #[test]
    fn test_malformed_braces_fail() {
        assert_eq!(compile("/{band.tif").unwrap_err(), PatternError::UnclosedBrace);
        assert_eq!(compile("/{ba{nd}.tif").unwrap_err(), PatternError::UnclosedBrace);
        assert_eq!(compile("/band}.tif").unwrap_err(), PatternError::UnmatchedBrace);
    }

    #[test]
    fn test_regex_is_anchored() {
        let pattern = compile("/{band}.tif").unwrap();
        assert_eq!(pattern.extract("/red.tif.bak"), None);
        assert_eq!(pattern.extract("prefix/red.tif"), None);
    }
}
