//! # flyrouter
//!
//! flyrouter is a minimal request router with named routes and reverse URI generation.
//!
//! Routes bind a request method and a path template to a handler. Templates are compiled once, at registration time, into anchored case-insensitive matchers. A request is dispatched to the **first** route, in registration order, whose template accepts its path.
//!
//! ## Features
//!
//! **Ordered matching:** Routes are tried in the order they were declared, and the first match wins. There are no longest-match or specificity rules: if `/users/{id}` is registered before `/users/new`, the former handles both.
//!
//! **Named routes:** Every route has a unique name, given at registration or generated. [`Router::generate_uri`] turns a name and its parameters back into a URI, which makes redirects and links independent of the URL layout.
//!
//! **Namespaces:** [`Router::namespace`] prefixes every route declared inside a block. Namespaces nest and are always restored when the block returns, even when it fails.
//!
//! **Base path:** An application mounted under a subdirectory sets [`Router::set_base_path`] once. The base path is stripped before matching and prepended to generated URIs.
//!
//! **One-shot dispatch:** A [`Dispatcher`] invokes at most one handler. Any further dispatch through the same dispatcher is a silent no-op. Each request gets its own dispatcher, so one router can serve many requests concurrently.
//!
//! ## Usage
//!
//! ```rust
//! use flyrouter::{Error, Handler, Router};
//! use hyper::Method;
//!
//! # fn main() -> Result<(), Error> {
//! let mut router: Router<String> = Router::new();
//!
//! router.register(Method::GET, "/", Some("homepage"), Handler::named(|_| "hola mundo".to_owned()))?;
//!
//! router.namespace("/foo", |r| {
//!     r.get("/", |_| "Foo".to_owned())?;
//!     r.register(Method::GET, "/bar", Some("foo_bar_page"), Handler::named(|_| "Bar".to_owned()))?;
//!     Ok(())
//! })?;
//!
//! router.register(
//!     Method::GET,
//!     "/hola/{name}",
//!     Some("hola_page"),
//!     Handler::positional(|args| format!("Hola {}.", args[0])),
//! )?;
//!
//! assert_eq!(router.uri_for("foo_bar_page")?, "/foo/bar");
//! assert_eq!(router.generate_uri("hola_page", [("name", "Ana")])?, "/hola/Ana");
//!
//! let mut dispatcher = router.dispatcher();
//! assert_eq!(dispatcher.dispatch(&Method::GET, "/hola/Ana")?, Some("Hola Ana.".to_owned()));
//! # Ok(())
//! # }
//! ```
//!
//! ### Wildcards
//!
//! `{name}` is a *wildcard*. It matches one or more word characters:
//!
//! ```ignore
//! Pattern: /user/{user}
//!
//!  /user/gordon              match
//!  /user/you                 match
//!  /user/gordon/profile      no match
//!  /user/                    no match
//! ```
//!
//! Handlers receive the captured values either as an ordered slice ([`Handler::positional`]) or as [`Params`] that can be queried by name ([`Handler::named`]).
//!
//! ### Errors
//!
//! Registration fails fast on unsupported methods, malformed templates and duplicate names. Dispatch fails on unsupported methods and unmatched paths. URI generation fails on unknown names and missing parameters. All of these are reported through [`Error`].
//!
//! ### Serving with hyper
//!
//! A `Router<ResponseFuture>` can be served directly with hyper, see the [`service`] module.

#![forbid(unsafe_code)]

pub mod dispatch;
pub mod error;
pub mod handler;
pub mod params;
pub(crate) mod path;
pub mod pattern;

#[doc(hidden)]
pub mod router;

pub mod service;

#[doc(inline)]
pub use router::{Match, Route, Router};

pub use dispatch::{Dispatcher, State};
pub use error::Error;
pub use handler::Handler;
pub use params::{Param, Params};
pub use pattern::{Pattern, Segment};

// test the code examples in README.md
#[cfg(doctest)]
mod test_readme {
    macro_rules! doc_comment {
        ($x:expr) => {
            #[doc = $x]
            extern "C" {}
        };
    }

    doc_comment!(include_str!("../README.md"));
}
