//! Placeholder registry.
//!
//! Route patterns may contain `:tag` tokens, e.g. `users/(:num)`. Before a
//! route is compiled every token is replaced with the regex fragment
//! registered for its tag.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Matches `:tag`, and `?:tag` so that non-capturing groups are left alone.
static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\?)?:([A-Za-z_][A-Za-z0-9_]*)").expect("placeholder token regex")
});

/// The tag used for resource ids when no default constraint is set.
pub const DEFAULT_PLACEHOLDER: &str = "any";

/// An ordered mapping of placeholder tags to regex fragments.
///
/// Registration is additive: re-registering a tag overrides its pattern
/// in place, nothing is ever removed.
#[derive(Debug, Clone)]
pub struct Placeholders {
    entries: Vec<(String, String)>,
}

impl Default for Placeholders {
    fn default() -> Self {
        let entries = [
            ("any", ".*"),
            ("segment", "[^/]+"),
            ("alphanum", "[a-zA-Z0-9]+"),
            ("num", "[0-9]+"),
            ("alpha", "[a-zA-Z]+"),
            ("hash", "[^/]+"),
        ]
        .into_iter()
        .map(|(tag, pattern)| (tag.to_string(), pattern.to_string()))
        .collect();

        Self { entries }
    }
}

impl Placeholders {
    /// Creates a registry holding the built-in tags.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers or overrides a tag.
    pub fn register(&mut self, tag: impl Into<String>, pattern: impl Into<String>) {
        let tag = tag.into();
        let pattern = pattern.into();

        match self
            .entries
            .iter_mut()
            .find(|(t, _)| t.eq_ignore_ascii_case(&tag))
        {
            Some(entry) => entry.1 = pattern,
            None => self.entries.push((tag, pattern)),
        }
    }

    /// Returns the fragment for `tag`, if registered.
    pub fn get(&self, tag: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(t, _)| t.eq_ignore_ascii_case(tag))
            .map(|(_, p)| p.as_str())
    }

    /// Returns `true` if `tag` is registered.
    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// Resolves a tag to its fragment, or returns the tag unchanged.
    pub fn resolve<'a>(&'a self, tag: &'a str) -> &'a str {
        self.get(tag).unwrap_or(tag)
    }

    /// Rewrites every known `:tag` token in `path`.
    ///
    /// Unknown tokens are kept verbatim, colon included.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_routing::Placeholders;
    ///
    /// let placeholders = Placeholders::new();
    /// assert_eq!(placeholders.substitute("users/(:num)"), "users/([0-9]+)");
    /// assert_eq!(placeholders.substitute("users/(:nope)"), "users/(:nope)");
    /// ```
    pub fn substitute(&self, path: &str) -> String {
        TOKEN
            .replace_all(path, |caps: &Captures<'_>| {
                if caps.get(1).is_some() {
                    return caps[0].to_string();
                }
                match self.get(&caps[2]) {
                    Some(pattern) => pattern.to_string(),
                    None => caps[0].to_string(),
                }
            })
            .into_owned()
    }

    /// Iterates over `(tag, pattern)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, p)| (t.as_str(), p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tags() {
        let p = Placeholders::new();
        assert_eq!(p.resolve("num"), "[0-9]+");
        assert_eq!(p.resolve("segment"), "[^/]+");
        assert_eq!(p.resolve("unknown"), "unknown");
    }

    #[test]
    fn test_override_keeps_position() {
        let mut p = Placeholders::new();
        p.register("num", r"\d+");
        p.register("uuid", "[0-9a-f-]{36}");

        let tags: Vec<_> = p.iter().map(|(t, _)| t).collect();
        assert_eq!(tags[3], "num");
        assert_eq!(tags.last(), Some(&"uuid"));
        assert_eq!(p.resolve("num"), r"\d+");
    }

    #[test]
    fn test_substitute_multiple_tokens() {
        let p = Placeholders::new();
        assert_eq!(
            p.substitute("blog/(:alpha)/(:alphanum)/(:any)"),
            "blog/([a-zA-Z]+)/([a-zA-Z0-9]+)/(.*)"
        );
    }

    #[test]
    fn test_substitute_is_case_insensitive() {
        let p = Placeholders::new();
        assert_eq!(p.substitute("users/(:NUM)"), "users/([0-9]+)");
    }

    #[test]
    fn test_non_capturing_group_untouched() {
        let p = Placeholders::new();
        assert_eq!(p.substitute("(?:num)/(:num)"), "(?:num)/([0-9]+)");
    }
}
