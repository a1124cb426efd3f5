//! Request verbs and the wildcard bucket.

use std::fmt;
use std::str::FromStr;

use crate::error::RouterError;

/// The verb a route is registered under.
///
/// `Cli` is used for command-line invocations and `Any` is the
/// verb-agnostic `*` bucket filled by [`RouteCollection::add`].
///
/// [`RouteCollection::add`]: crate::RouteCollection::add
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verb {
    /// `*`, matches every verb
    Any,
    /// OPTIONS method
    Options,
    /// GET method
    Get,
    /// HEAD method
    Head,
    /// POST method
    Post,
    /// PUT method
    Put,
    /// PATCH method
    Patch,
    /// DELETE method
    Delete,
    /// TRACE method
    Trace,
    /// CONNECT method
    Connect,
    /// Command-line request
    Cli,
}

impl Verb {
    /// Every bucket, in lookup order.
    pub const ALL: [Self; 11] = [
        Self::Any,
        Self::Options,
        Self::Get,
        Self::Head,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Delete,
        Self::Trace,
        Self::Connect,
        Self::Cli,
    ];

    /// Returns the lower-cased verb name (`*` for [`Verb::Any`]).
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Any => "*",
            Self::Options => "options",
            Self::Get => "get",
            Self::Head => "head",
            Self::Post => "post",
            Self::Put => "put",
            Self::Patch => "patch",
            Self::Delete => "delete",
            Self::Trace => "trace",
            Self::Connect => "connect",
            Self::Cli => "cli",
        }
    }
}

impl FromStr for Verb {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "*" | "add" | "any" => Ok(Self::Any),
            "options" => Ok(Self::Options),
            "get" => Ok(Self::Get),
            "head" => Ok(Self::Head),
            "post" => Ok(Self::Post),
            "put" => Ok(Self::Put),
            "patch" => Ok(Self::Patch),
            "delete" => Ok(Self::Delete),
            "trace" => Ok(Self::Trace),
            "connect" => Ok(Self::Connect),
            "cli" => Ok(Self::Cli),
            _ => Err(RouterError::UnknownVerb(s.to_string())),
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}
