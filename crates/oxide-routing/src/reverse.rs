//! Reverse routing: from a route name or target back to a path.

use regex::Regex;
use tracing::debug;

use crate::collection::{LOCALE_MARKER, RouteCollection};
use crate::error::{Result, RouterError};
use crate::target::{NAMESPACE_SEPARATOR, StaticTarget};
use crate::uri::Uri;
use crate::verb::Verb;

impl RouteCollection {
    /// Builds the path for a route.
    ///
    /// `search` is tried as a route key first (an `as` name or a pattern),
    /// then as the beginning of a target such as `Photos::show`; for targets
    /// the number of `$` markers must equal `params.len()`. Each value must
    /// satisfy the capture group it replaces.
    ///
    /// The target scan takes the first candidate in registration order, so
    /// `Users` also matches a `UsersAdmin::show/$1` registered earlier.
    ///
    /// # Example
    ///
    /// ```
    /// use oxide_routing::{RouteCollection, RouteOptions};
    ///
    /// let mut routes = RouteCollection::default();
    /// routes.get("photos/(:num)", "Photos::show/$1", Some(RouteOptions::new().name("photo")));
    ///
    /// assert_eq!(routes.reverse_route("photo", &["5"]).unwrap().as_deref(), Some("/photos/5"));
    /// assert_eq!(routes.reverse_route("Photos::show", &["5"]).unwrap().as_deref(), Some("/photos/5"));
    /// assert!(routes.reverse_route("photo", &["five"]).is_err());
    /// assert_eq!(routes.reverse_route("Videos::show", &["5"]).unwrap(), None);
    /// ```
    pub fn reverse_route(&self, search: &str, params: &[&str]) -> Result<Option<String>> {
        if let Some(entry) = Verb::ALL.iter().find_map(|v| self.find(*v, search)) {
            return self.fill(&entry.name, &entry.from, params).map(Some);
        }

        let search = search.trim_start_matches(NAMESPACE_SEPARATOR);
        let namespace = self
            .default_namespace()
            .trim_start_matches(NAMESPACE_SEPARATOR);

        for entry in self.iter() {
            let Some(target) = entry.target.as_static() else {
                continue;
            };

            let target = target.trim_start_matches(NAMESPACE_SEPARATOR);
            let bare = target.strip_prefix(namespace).unwrap_or(target);
            if !(target.starts_with(search) || bare.starts_with(search)) {
                continue;
            }
            if StaticTarget::parse(target).markers != params.len() {
                continue;
            }

            debug!(%search, route = %entry.name, "reverse routed by target");
            return self.fill(&entry.name, &entry.from, params).map(Some);
        }

        Ok(None)
    }

    /// Reverse routes `search` and resolves the path against `base`.
    pub fn url_to(&self, base: &Uri, search: &str, params: &[&str]) -> Result<Option<Uri>> {
        match self.reverse_route(search, params)? {
            Some(path) => base.join(&path).map(Some),
            None => Ok(None),
        }
    }

    fn fill(&self, route: &str, from: &str, params: &[&str]) -> Result<String> {
        let mut path = String::with_capacity(from.len());
        let mut rest = 0;

        for (index, (start, end)) in capture_groups(from).into_iter().enumerate() {
            let pattern = &from[start..end];
            let value = params.get(index).ok_or_else(|| RouterError::MissingParameter {
                route: route.to_string(),
                pattern: pattern.to_string(),
            })?;

            let matches = Regex::new(&format!("^(?:{pattern})$"))
                .map(|re| re.is_match(value))
                .unwrap_or(false);
            if !matches {
                return Err(RouterError::ReverseRouteMismatch {
                    route: route.to_string(),
                    value: (*value).to_string(),
                    pattern: pattern.to_string(),
                });
            }

            path.push_str(&from[rest..start]);
            path.push_str(value);
            rest = end;
        }
        path.push_str(&from[rest..]);

        let path = path.replace(LOCALE_MARKER, &self.config().default_locale);
        Ok(format!("/{}", path.trim_start_matches('/')))
    }
}

/// Whether a group opening before `rest` captures: plain groups and the
/// named forms `(?<name>` and `(?P<name>` do, lookarounds and `(?:` or
/// flag groups do not.
fn is_capturing(rest: &[u8]) -> bool {
    match rest {
        [b'?', b'P', b'<', ..] => true,
        [b'?', b'<', next, ..] => !matches!(next, b'=' | b'!'),
        [b'?', ..] => false,
        _ => true,
    }
}

/// Byte spans of the top-level capturing groups in a pattern, parentheses
/// included. Escaped parentheses and non-capturing groups are skipped.
fn capture_groups(pattern: &str) -> Vec<(usize, usize)> {
    let bytes = pattern.as_bytes();
    let mut groups = Vec::new();
    let mut depth = 0usize;
    let mut start = None;
    let mut in_class = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'[' if !in_class => in_class = true,
            b']' if in_class => in_class = false,
            b'(' if !in_class => {
                if depth == 0 && is_capturing(&bytes[i + 1..]) {
                    start = Some(i);
                }
                depth += 1;
            }
            b')' if !in_class && depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    if let Some(s) = start.take() {
                        groups.push((s, i + 1));
                    }
                }
            }
            _ => {}
        }
        i += 1;
    }

    groups
}
