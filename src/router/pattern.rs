use std::fmt;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::errors::DispatchError;

/// Accepted flags, in the order they are stored and displayed.
const FLAG_ORDER: &str = "gimsux";

/// A trigger pattern: regex source text plus flags.
///
/// Two patterns are equal when their source and flags are equal, which is
/// what duplicate-registration checks compare.
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    flags: String,
    regex: Regex,
}

impl Pattern {
    /// # Errors
    ///
    /// Returns `DispatchError::InvalidPattern` if `source` is not a valid regex.
    pub fn new(source: impl Into<String>) -> Result<Self, DispatchError> {
        Self::with_flags(source, "")
    }

    /// Build a pattern with `i`, `m`, `s` or `x` flags. `g` and `u` are kept
    /// for display but do not change matching. Flags are stored in the fixed
    /// order `gimsux`, so `"mi"` and `"im"` are the same pattern.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::InvalidPattern` on an unknown or repeated flag,
    /// or a bad regex.
    pub fn with_flags(
        source: impl Into<String>,
        flags: impl AsRef<str>,
    ) -> Result<Self, DispatchError> {
        let source = source.into();
        let raw = flags.as_ref();
        let invalid = |reason: String| DispatchError::InvalidPattern {
            pattern: format!("/{source}/{raw}"),
            reason,
        };

        let mut seen = [false; FLAG_ORDER.len()];
        for flag in raw.chars() {
            let slot = FLAG_ORDER
                .find(flag)
                .ok_or_else(|| invalid(format!("unsupported flag '{flag}'")))?;
            if std::mem::replace(&mut seen[slot], true) {
                return Err(invalid(format!("repeated flag '{flag}'")));
            }
        }
        let flags: String = FLAG_ORDER
            .chars()
            .zip(seen)
            .filter_map(|(flag, set)| set.then_some(flag))
            .collect();

        let regex = RegexBuilder::new(&source)
            .case_insensitive(flags.contains('i'))
            .multi_line(flags.contains('m'))
            .dot_matches_new_line(flags.contains('s'))
            .ignore_whitespace(flags.contains('x'))
            .build()
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Self {
            source,
            flags,
            regex,
        })
    }

    /// Catch-all pattern used by default responses.
    pub(crate) fn catch_all() -> Self {
        static CATCH_ALL: Lazy<Pattern> =
            Lazy::new(|| Pattern::new("(.*)").expect("static regex compile"));
        CATCH_ALL.clone()
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn flags(&self) -> &str {
        &self.flags
    }

    #[must_use]
    pub fn is_match(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    /// Match `key` and collect the full match plus every capture group.
    #[must_use]
    pub fn captures(&self, key: &str) -> Option<Captures> {
        self.regex.captures(key).map(|caps| {
            Captures(
                caps.iter()
                    .map(|group| group.map(|m| m.as_str().to_string()))
                    .collect(),
            )
        })
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

impl Eq for Pattern {}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/{}", self.source, self.flags)
    }
}

/// Conversion used by registration methods so callers can pass a plain
/// regex string or a prebuilt [`Pattern`].
pub trait IntoPattern {
    /// # Errors
    ///
    /// Returns `DispatchError::InvalidPattern` if the pattern does not compile.
    fn into_pattern(self) -> Result<Pattern, DispatchError>;
}

impl IntoPattern for Pattern {
    fn into_pattern(self) -> Result<Pattern, DispatchError> {
        Ok(self)
    }
}

impl IntoPattern for &str {
    fn into_pattern(self) -> Result<Pattern, DispatchError> {
        Pattern::new(self)
    }
}

impl IntoPattern for String {
    fn into_pattern(self) -> Result<Pattern, DispatchError> {
        Pattern::new(self)
    }
}

/// Match result handed to a handler: index 0 is the whole match, then one
/// entry per capture group (`None` when the group did not participate).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Captures(Vec<Option<String>>);

impl Captures {
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).and_then(|g| g.as_deref())
    }

    #[must_use]
    pub fn full(&self) -> Option<&str> {
        self.get(0)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equality_compares_source_and_flags() {
        let a = Pattern::new("some_cb").unwrap();
        let b = Pattern::new("some_cb").unwrap();
        let c = Pattern::with_flags("some_cb", "i").unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(c.to_string(), "/some_cb/i");
    }

    #[test]
    fn captures_include_groups() {
        let pattern = Pattern::new(r"^reaction_added:(\w+)$").unwrap();
        let caps = pattern.captures("reaction_added:thumbsup").unwrap();

        assert_eq!(caps.full(), Some("reaction_added:thumbsup"));
        assert_eq!(caps.get(1), Some("thumbsup"));
        assert!(pattern.captures("message:general").is_none());
    }

    #[test]
    fn case_insensitive_flag_applies() {
        let pattern = Pattern::with_flags("^/deploy$", "i").unwrap();
        assert!(pattern.is_match("/DEPLOY"));
    }

    #[test]
    fn flags_are_stored_in_canonical_order() {
        let im = Pattern::with_flags("cb", "im").unwrap();
        let mi = Pattern::with_flags("cb", "mi").unwrap();

        assert_eq!(im, mi);
        assert_eq!(mi.flags(), "im");
        assert_eq!(mi.to_string(), "/cb/im");
    }

    #[test]
    fn rejects_repeated_flag() {
        assert!(matches!(
            Pattern::with_flags("cb", "ii"),
            Err(DispatchError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn catch_all_captures_whole_key() {
        let caps = Pattern::catch_all().captures("any:key").unwrap();
        assert_eq!(caps.get(1), Some("any:key"));
    }

    #[test]
    fn rejects_unknown_flag_and_bad_regex() {
        assert!(matches!(
            Pattern::with_flags("abc", "y"),
            Err(DispatchError::InvalidPattern { .. })
        ));
        assert!(matches!(
            Pattern::new("(unclosed"),
            Err(DispatchError::InvalidPattern { .. })
        ));
    }
}
