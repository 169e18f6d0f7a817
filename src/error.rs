use hyper::Method;
use thiserror::Error;

/// Errors returned by route registration, dispatch and URI generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The request method is outside the router's allowed set.
    #[error("request method {0} is not supported")]
    UnsupportedMethod(Method),

    /// A route with this name is already registered.
    #[error("a route named `{0}` is already registered")]
    DuplicateRouteName(String),

    /// The path template contains malformed wildcard syntax.
    #[error("invalid path pattern `{pattern}`: {reason}")]
    Pattern { pattern: String, reason: String },

    /// No route matches the requested path, or no route carries the requested name.
    #[error("no route found for `{0}`")]
    RouteNotFound(String),

    /// URI generation is missing the value of a wildcard.
    #[error("route `{route}` requires a value for parameter `{key}`")]
    MissingParameter { route: String, key: String },
}

impl Error {
    pub(crate) fn pattern(pattern: &str, reason: impl Into<String>) -> Self {
        Error::Pattern {
            pattern: pattern.to_owned(),
            reason: reason.into(),
        }
    }
}
