//! Error types for routing.

use thiserror::Error;

/// Router-specific errors.
///
/// A request that matches nothing is not an error: it is reported as
/// [`Dispatch::NotFound`](crate::Dispatch::NotFound). Redirects are
/// likewise a [`Dispatch`](crate::Dispatch) outcome.
#[derive(Debug, Error)]
pub enum RouterError {
    /// A URI reference could not be parsed.
    #[error("unable to parse URI '{uri}': {reason}")]
    UriParse { uri: String, reason: String },

    /// A 1-based URI segment index lies beyond the end of the path.
    #[error("URI segment is out of range: {0}")]
    SegmentOutOfRange(usize),

    /// A port outside 1..=65535.
    #[error("ports must be between 1 and 65535, given: {0}")]
    InvalidPort(u32),

    /// A reverse-routing parameter does not satisfy its capture group.
    #[error("parameter '{value}' for route '{route}' does not match '{pattern}'")]
    ReverseRouteMismatch {
        route: String,
        value: String,
        pattern: String,
    },

    /// Fewer reverse-routing parameters than capture groups.
    #[error("route '{route}' expects a parameter for '{pattern}'")]
    MissingParameter { route: String, pattern: String },

    /// A verb name in a route definition is not recognised.
    #[error("unknown HTTP verb: {0}")]
    UnknownVerb(String),

    /// The empty path was requested but no default controller is set.
    #[error("no default controller has been specified")]
    NoDefaultController,

    /// The registry has no factory for the controller.
    #[error("controller not found: {0}")]
    ControllerNotFound(String),

    /// The controller does not respond to the method.
    #[error("method '{method}' not found on controller '{controller}'")]
    MethodNotFound { controller: String, method: String },

    /// IO error while reading a definition file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error while decoding a definition file.
    #[error("invalid route definitions: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for router operations.
pub type Result<T> = std::result::Result<T, RouterError>;
