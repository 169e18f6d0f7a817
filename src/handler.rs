use crate::params::Params;

use std::fmt;

/// Represents a route handler.
///
/// A handler receives the wildcard values captured from the request path and
/// produces an output of type `R`, which the router hands back to the caller
/// without inspecting it. How the values are delivered is picked at
/// registration time:
///
/// - [`Handler::Positional`] receives the values as an ordered slice, in the
///   order the wildcards appear in the path template.
/// - [`Handler::Named`] receives the [`Params`], which can be queried by name.
///
/// ```rust
/// use flyrouter::Handler;
///
/// let positional: Handler<String> = Handler::positional(|args| format!("Hola {}.", args[0]));
/// let named: Handler<String> =
///     Handler::named(|params| format!("Hola {}.", params.get("name").unwrap_or("mundo")));
/// ```
pub enum Handler<R> {
    Positional(Box<dyn Fn(&[&str]) -> R + Send + Sync>),
    Named(Box<dyn Fn(&Params) -> R + Send + Sync>),
}

impl<R> Handler<R> {
    pub fn positional<F>(f: F) -> Self
    where
        F: Fn(&[&str]) -> R + Send + Sync + 'static,
    {
        Handler::Positional(Box::new(f))
    }

    pub fn named<F>(f: F) -> Self
    where
        F: Fn(&Params) -> R + Send + Sync + 'static,
    {
        Handler::Named(Box::new(f))
    }

    /// Invokes the handler with the captured parameters.
    pub fn call(&self, params: &Params) -> R {
        match self {
            Handler::Positional(f) => f(&params.values()),
            Handler::Named(f) => f(params),
        }
    }
}

impl<R> fmt::Debug for Handler<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Handler::Positional(_) => f.write_str("Handler::Positional(..)"),
            Handler::Named(_) => f.write_str("Handler::Named(..)"),
        }
    }
}
