//! Route targets.

use std::fmt;
use std::sync::Arc;

/// Separates namespace components in controller identifiers.
pub const NAMESPACE_SEPARATOR: char = '\\';

/// Separates the controller from the method in a static target.
pub const METHOD_SEPARATOR: &str = "::";

/// A closure route handler. Receives the captured groups in order.
pub type Handler = Arc<dyn Fn(&[String]) -> String + Send + Sync>;

/// What a route dispatches to.
#[derive(Clone)]
pub enum RouteTarget {
    /// `"Namespace\Controller::method/$1/$2"`.
    Static(String),
    /// A closure invoked with the captured groups.
    Dynamic(Handler),
}

impl RouteTarget {
    /// Wraps a closure as a target.
    pub fn closure<F>(f: F) -> Self
    where
        F: Fn(&[String]) -> String + Send + Sync + 'static,
    {
        Self::Dynamic(Arc::new(f))
    }

    /// Returns the string form of a static target.
    pub fn as_static(&self) -> Option<&str> {
        match self {
            Self::Static(s) => Some(s),
            Self::Dynamic(_) => None,
        }
    }

    /// Returns `true` for closure targets.
    pub fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic(_))
    }
}

impl From<&str> for RouteTarget {
    fn from(s: &str) -> Self {
        Self::Static(s.to_string())
    }
}

impl From<String> for RouteTarget {
    fn from(s: String) -> Self {
        Self::Static(s)
    }
}

impl fmt::Debug for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(s) => f.debug_tuple("Static").field(s).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(<closure>)"),
        }
    }
}

impl fmt::Display for RouteTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(s) => f.write_str(s),
            Self::Dynamic(_) => f.write_str("(closure)"),
        }
    }
}

/// The parts of a static target string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticTarget<'a> {
    /// Fully-qualified controller, leading separator removed.
    pub controller: &'a str,
    /// Method, if the target names one.
    pub method: Option<&'a str>,
    /// Number of `$N` back-reference markers.
    pub markers: usize,
}

impl<'a> StaticTarget<'a> {
    /// Splits `"\NS\Ctrl::method/$1"` into its parts.
    pub fn parse(target: &'a str) -> Self {
        let target = target.trim_start_matches(NAMESPACE_SEPARATOR);
        let head = target.split('/').next().unwrap_or(target);
        let (controller, method) = match head.split_once(METHOD_SEPARATOR) {
            Some((c, m)) => (c, (!m.is_empty()).then_some(m)),
            None => (head, None),
        };

        Self {
            controller,
            method,
            markers: count_markers(target),
        }
    }
}

/// Counts `$` back-reference markers in a target string.
pub(crate) fn count_markers(target: &str) -> usize {
    target.matches('$').count()
}

/// Upper-cases the first character, as controller names are.
pub(crate) fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
