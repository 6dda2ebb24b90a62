//! Paths exempt from the gate.
//!
//! A whitelist is built once from configuration and matched against every
//! request path. Invalid patterns are rejected while building, so matching
//! itself can never fail.

use regex::Regex;

use crate::error::ConfigurationError;

#[derive(Debug, Clone)]
pub enum Whitelist {
    /// Exact path equality.
    Literal(String),
    /// A pattern where `*` matches any run of characters, `/` included.
    /// Anchored at both ends.
    Glob { pattern: String, compiled: Regex },
    /// Matches when the expression is found anywhere in the path.
    Regex(Regex),
    /// Matches when any element matches, evaluated left to right.
    AnyOf(Vec<Whitelist>),
}

impl Whitelist {
    /// Build a whitelist entry from a configuration string.
    ///
    /// Strings containing `*` become globs, everything else is a literal.
    pub fn parse(entry: &str) -> Result<Self, ConfigurationError> {
        if entry.contains('*') {
            Self::glob(entry)
        } else {
            Ok(Self::literal(entry))
        }
    }

    pub fn literal(path: impl Into<String>) -> Self {
        Self::Literal(path.into())
    }

    pub fn glob(pattern: &str) -> Result<Self, ConfigurationError> {
        let translated = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");

        let compiled = Regex::new(&format!("(?s)^{translated}$")).map_err(|source| {
            ConfigurationError::InvalidWhitelistPattern {
                pattern: pattern.to_owned(),
                source,
            }
        })?;

        Ok(Self::Glob {
            pattern: pattern.to_owned(),
            compiled,
        })
    }

    pub fn regex(expression: &str) -> Result<Self, ConfigurationError> {
        Regex::new(expression)
            .map(Self::Regex)
            .map_err(|source| ConfigurationError::InvalidWhitelistPattern {
                pattern: expression.to_owned(),
                source,
            })
    }

    pub fn any_of(entries: impl IntoIterator<Item = Whitelist>) -> Self {
        Self::AnyOf(entries.into_iter().collect())
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Literal(literal) => literal == path,
            Self::Glob { compiled, .. } => compiled.is_match(path),
            Self::Regex(expression) => expression.is_match(path),
            Self::AnyOf(entries) => entries.iter().any(|entry| entry.matches(path)),
        }
    }
}

/// Whether `path` is exempt from the gate. No whitelist never matches.
pub fn matches(whitelist: Option<&Whitelist>, path: &str) -> bool {
    whitelist.is_some_and(|whitelist| whitelist.matches(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_literal_matches_exact_path_only() {
        let whitelist = Whitelist::parse("/foo/bar").unwrap();

        assert!(whitelist.matches("/foo/bar"));
        assert!(!whitelist.matches("/foo/bar/baz"));
        assert!(!whitelist.matches("/foo"));
    }

    #[test]
    fn test_literal_prefix_does_not_match_longer_path() {
        let whitelist = Whitelist::parse("/foo").unwrap();

        assert!(!whitelist.matches("/foo/bar"));
    }

    #[test]
    fn test_glob_matches_across_segments() {
        let whitelist = Whitelist::parse("/foo/*").unwrap();

        assert!(matches!(whitelist, Whitelist::Glob { .. }));
        assert!(whitelist.matches("/foo/bar"));
        assert!(whitelist.matches("/foo/baz/qux"));
        assert!(!whitelist.matches("/foo"));
        assert!(!whitelist.matches("/other"));
    }

    #[test]
    fn test_glob_escapes_regex_metacharacters() {
        let whitelist = Whitelist::glob("/assets/*.css").unwrap();

        assert!(whitelist.matches("/assets/site.css"));
        assert!(!whitelist.matches("/assets/sitexcss"));
    }

    #[test]
    fn test_glob_with_inner_wildcard() {
        let whitelist = Whitelist::glob("/repos/*/status").unwrap();

        assert!(whitelist.matches("/repos/travis/status"));
        assert!(whitelist.matches("/repos/a/b/status"));
        assert!(!whitelist.matches("/repos/travis/status/x"));
    }

    #[test]
    fn test_regex_is_unanchored() {
        let whitelist = Whitelist::regex("/foo/").unwrap();

        assert!(whitelist.matches("/foo/bar"));
        assert!(whitelist.matches("/xfoo/"));
        assert!(!whitelist.matches("/bar"));
    }

    #[test]
    fn test_any_of_matches_if_either_matches() {
        let whitelist = Whitelist::any_of([
            Whitelist::literal("/bar"),
            Whitelist::regex("foo").unwrap(),
        ]);

        assert!(whitelist.matches("/foo/bar"));
        assert!(whitelist.matches("/bar"));
        assert!(!whitelist.matches("/baz"));
    }

    #[test]
    fn test_no_whitelist_never_matches() {
        assert!(!matches(None, "/"));
        assert!(!matches(None, "/health"));
    }

    #[test]
    fn test_invalid_regex_is_a_configuration_error() {
        let result = Whitelist::regex("(unclosed");

        assert!(matches!(
            result,
            Err(ConfigurationError::InvalidWhitelistPattern { .. })
        ));
    }

    #[quickcheck]
    fn literal_matches_only_itself(literal: String, path: String) -> bool {
        Whitelist::literal(literal.clone()).matches(&path) == (literal == path)
    }

    #[quickcheck]
    fn bare_wildcard_matches_everything(path: String) -> bool {
        Whitelist::glob("*").unwrap().matches(&path)
    }

    #[quickcheck]
    fn empty_any_of_matches_nothing(path: String) -> bool {
        !Whitelist::AnyOf(Vec::new()).matches(&path)
    }
}
