//! [`Router`](crate::Router) is a minimal request router with ordered matching.
//!
//! Routes are registered per request method and evaluated in registration
//! order: the first route whose pattern accepts the request path wins.
//! Declaration order is therefore significant. A broad pattern registered
//! before a specific one shadows it:
//! ```ignore
//!  GET /users/{id}     registered first, matches /users/new
//!  GET /users/new      never reached
//! ```
//!
//! The registered path can contain named wildcards, written `{name}`. They
//! match one or more word characters:
//! ```ignore
//!  Path: /blog/{category}/{post}
//!
//!  /blog/rust/request_routers            match: category="rust", post="request_routers"
//!  /blog/rust/request_routers/           match, the trailing slash is ignored
//!  /blog/rust/                           no match
//!  /blog/rust/request_routers/comments   no match
//! ```
//!
//! Every route has a unique name, either given at registration or generated,
//! and [`Router::generate_uri`] maps a name back to a concrete URI:
//!
//! ```rust
//! use flyrouter::{Handler, Router};
//! use hyper::Method;
//!
//! # fn main() -> Result<(), flyrouter::Error> {
//! let mut router: Router<String> = Router::new();
//! router
//!     .get("/", |_| "home".to_owned())?
//!     .register(
//!         Method::GET,
//!         "/hola/{name}",
//!         Some("hola_page"),
//!         Handler::positional(|args| format!("Hola {}.", args[0])),
//!     )?;
//!
//! let mut dispatcher = router.dispatcher();
//! let output = dispatcher.dispatch(&Method::GET, "/hola/Ana")?;
//! assert_eq!(output.as_deref(), Some("Hola Ana."));
//!
//! assert_eq!(router.generate_uri("hola_page", [("name", "Ana")])?, "/hola/Ana");
//! # Ok(())
//! # }
//! ```
use crate::dispatch::Dispatcher;
use crate::error::Error;
use crate::handler::Handler;
use crate::params::Params;
use crate::path;
use crate::pattern::Pattern;

use hyper::Method;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

// Generated names are unique for the lifetime of the process.
static NEXT_ROUTE_ID: AtomicU64 = AtomicU64::new(0);

/// A registered binding of method, path template, name and handler.
#[derive(Debug)]
pub struct Route<R> {
    method: Method,
    name: String,
    pattern: Pattern,
    handler: Handler<R>,
}

impl<R> Route<R> {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The fully resolved template, including any namespace prefixes.
    pub fn template(&self) -> &str {
        self.pattern.template()
    }

    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    pub fn handler(&self) -> &Handler<R> {
        &self.handler
    }
}

/// The route selected for a request along with the values it captured.
#[derive(Debug)]
pub struct Match<'r, R> {
    pub route: &'r Route<R>,
    pub params: Params,
}

/// Router dispatches requests to different handlers via configurable routes.
pub struct Router<R> {
    routes: HashMap<Method, Vec<Route<R>>>,
    names: HashMap<String, (Method, usize)>,
    methods: Vec<Method>,
    namespaces: Vec<String>,
    base_path: String,
    pub(crate) not_found: Option<Handler<R>>,
}

impl<R> Router<R> {
    /// Creates an empty router accepting `GET`, `POST`, `PUT` and `DELETE`.
    pub fn new() -> Self {
        Self {
            routes: HashMap::new(),
            names: HashMap::new(),
            methods: vec![Method::GET, Method::POST, Method::PUT, Method::DELETE],
            namespaces: Vec::new(),
            base_path: String::new(),
            not_found: None,
        }
    }

    /// Sets the path the application is mounted under.
    ///
    /// The base path is stripped from request paths before matching and is
    /// prepended to every generated URI.
    /// ```rust
    /// use flyrouter::Router;
    ///
    /// let mut router: Router<()> = Router::new();
    /// router.set_base_path("app/");
    /// assert_eq!(router.base_path(), "/app");
    /// ```
    pub fn set_base_path(&mut self, base_path: &str) -> &mut Self {
        let base_path = path::normalize(base_path);
        self.base_path = if base_path == "/" {
            String::new()
        } else {
            base_path
        };
        self
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    /// Adds a request method to the set this router accepts.
    pub fn allow_method(&mut self, method: Method) -> &mut Self {
        if !self.methods.contains(&method) {
            self.methods.push(method);
        }
        self
    }

    /// Returns true if routes can be registered and dispatched for `method`.
    pub fn is_allowed(&self, method: &Method) -> bool {
        self.methods.contains(method)
    }

    /// Configurable handler which the hyper service calls when no matching
    /// route is found.
    pub fn not_found(&mut self, handler: Handler<R>) -> &mut Self {
        self.not_found = Some(handler);
        self
    }

    /// Registers a handler for `method` and `path`.
    ///
    /// The path is composed with the active namespaces, normalized and compiled.
    /// When `name` is `None` a unique name is generated. Nothing is registered
    /// if an error is returned.
    /// ```rust
    /// use flyrouter::{Error, Handler, Router};
    /// use hyper::Method;
    ///
    /// let mut router: Router<&'static str> = Router::new();
    /// router
    ///     .register(Method::GET, "/teapot", Some("teapot"), Handler::named(|_| "I am a teapot!"))
    ///     .unwrap();
    ///
    /// let err = router
    ///     .register(Method::POST, "/kettle", Some("teapot"), Handler::named(|_| "..."))
    ///     .unwrap_err();
    /// assert_eq!(err, Error::DuplicateRouteName("teapot".to_owned()));
    /// ```
    pub fn register(
        &mut self,
        method: Method,
        path: &str,
        name: Option<&str>,
        handler: Handler<R>,
    ) -> Result<&mut Self, Error> {
        if !self.is_allowed(&method) {
            return Err(Error::UnsupportedMethod(method));
        }

        if let Some(name) = name {
            if self.names.contains_key(name) {
                return Err(Error::DuplicateRouteName(name.to_owned()));
            }
        }

        let template = path::join(&self.namespace_prefix(), &path::normalize(path));
        let pattern = Pattern::compile(&template)?;

        let name = match name {
            Some(name) => name.to_owned(),
            None => self.generate_name(),
        };

        debug!(
            method = %method,
            route_name = %name,
            template = %pattern.template(),
            "Route registered"
        );

        let routes = self.routes.entry(method.clone()).or_insert_with(Vec::new);
        self.names.insert(name.clone(), (method.clone(), routes.len()));
        routes.push(Route {
            method,
            name,
            pattern,
            handler,
        });

        Ok(self)
    }

    /// Register a handler for `GET` requests
    pub fn get<F>(&mut self, path: &str, handler: F) -> Result<&mut Self, Error>
    where
        F: Fn(&Params) -> R + Send + Sync + 'static,
    {
        self.register(Method::GET, path, None, Handler::named(handler))
    }

    /// Register a handler for `POST` requests
    pub fn post<F>(&mut self, path: &str, handler: F) -> Result<&mut Self, Error>
    where
        F: Fn(&Params) -> R + Send + Sync + 'static,
    {
        self.register(Method::POST, path, None, Handler::named(handler))
    }

    /// Register a handler for `PUT` requests
    pub fn put<F>(&mut self, path: &str, handler: F) -> Result<&mut Self, Error>
    where
        F: Fn(&Params) -> R + Send + Sync + 'static,
    {
        self.register(Method::PUT, path, None, Handler::named(handler))
    }

    /// Register a handler for `DELETE` requests
    pub fn delete<F>(&mut self, path: &str, handler: F) -> Result<&mut Self, Error>
    where
        F: Fn(&Params) -> R + Send + Sync + 'static,
    {
        self.register(Method::DELETE, path, None, Handler::named(handler))
    }

    /// Registers the routes declared by `block` under `prefix`.
    ///
    /// Namespaces nest by concatenation. The prefix is popped when `block`
    /// returns, whether it succeeded, failed or panicked.
    /// ```rust
    /// use flyrouter::{Handler, Router};
    /// use hyper::Method;
    ///
    /// # fn main() -> Result<(), flyrouter::Error> {
    /// let mut router: Router<&'static str> = Router::new();
    /// router
    ///     .namespace("/foo", |r| {
    ///         r.register(Method::GET, "/bar", Some("foo_bar_page"), Handler::named(|_| "Bar"))?;
    ///         Ok(())
    ///     })?
    ///     .register(Method::GET, "/baz", Some("baz_page"), Handler::named(|_| "Baz"))?;
    ///
    /// assert_eq!(router.resolve_name("foo_bar_page"), Some("/foo/bar"));
    /// assert_eq!(router.resolve_name("baz_page"), Some("/baz"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn namespace<F>(&mut self, prefix: &str, block: F) -> Result<&mut Self, Error>
    where
        F: FnOnce(&mut Self) -> Result<(), Error>,
    {
        let prefix = path::normalize(prefix);
        debug!(prefix = %prefix, depth = self.namespaces.len() + 1, "Entering namespace");
        self.namespaces.push(prefix);

        {
            let mut guard = NamespaceGuard {
                router: &mut *self,
            };
            block(&mut *guard.router)?;
        }

        Ok(self)
    }

    fn namespace_prefix(&self) -> String {
        self.namespaces
            .iter()
            .fold(String::from("/"), |prefix, next| path::join(&prefix, next))
    }

    fn generate_name(&self) -> String {
        loop {
            let name = format!("fly_{}", NEXT_ROUTE_ID.fetch_add(1, Ordering::Relaxed));
            if !self.names.contains_key(&name) {
                return name;
            }
        }
    }

    fn route_by_name(&self, name: &str) -> Option<&Route<R>> {
        let (method, idx) = self.names.get(name)?;
        self.routes.get(method).and_then(|routes| routes.get(*idx))
    }

    /// Returns the resolved path template of a named route.
    pub fn resolve_name(&self, name: &str) -> Option<&str> {
        self.route_by_name(name).map(Route::template)
    }

    /// Routes registered for `method`, in registration order.
    pub fn routes(&self, method: &Method) -> &[Route<R>] {
        self.routes.get(method).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total number of registered routes.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Lookup allows the manual lookup of the route for a specific method and path,
    /// without invoking its handler.
    ///
    /// The query string and a single trailing slash are ignored, and the base
    /// path is stripped before the routes of `method` are tried in registration
    /// order.
    /// ```rust
    /// use flyrouter::Router;
    /// use hyper::Method;
    ///
    /// let mut router: Router<()> = Router::new();
    /// router.get("/home", |_| ()).unwrap();
    ///
    /// let matched = router.lookup(&Method::GET, "/home/").unwrap();
    /// assert!(matched.params.is_empty());
    /// assert_eq!(matched.route.template(), "/home");
    /// ```
    pub fn lookup(&self, method: &Method, path: &str) -> Result<Match<'_, R>, Error> {
        if !self.is_allowed(method) {
            return Err(Error::UnsupportedMethod(method.clone()));
        }

        let requested = match path::without_query(path) {
            "" => "/",
            requested => path::trim_trailing_slash(requested),
        };

        let found = path::strip_base(&self.base_path, requested).and_then(|relative| {
            self.routes(method).iter().find_map(|route| {
                route
                    .pattern
                    .captures(relative)
                    .map(|params| Match { route, params })
            })
        });

        match found {
            Some(found) => {
                debug!(
                    method = %method,
                    path = %requested,
                    route_name = %found.route.name,
                    template = %found.route.template(),
                    path_params = ?found.params,
                    "Route matched"
                );
                Ok(found)
            }
            None => {
                debug!(method = %method, path = %requested, "No route matched");
                Err(Error::RouteNotFound(requested.to_owned()))
            }
        }
    }

    /// Returns a list of the methods with a route matching `path`.
    /// ```rust
    /// use flyrouter::Router;
    ///
    /// let mut router: Router<()> = Router::new();
    /// router.get("/home", |_| ()).unwrap();
    /// router.post("/home", |_| ()).unwrap();
    ///
    /// assert_eq!(router.allowed("/home"), vec!["GET", "POST"]);
    /// ```
    pub fn allowed(&self, path: &str) -> Vec<&str> {
        self.methods
            .iter()
            .filter(|method| self.lookup(method, path).is_ok())
            .map(Method::as_str)
            .collect()
    }

    /// Creates a one-shot dispatcher over this router's routes.
    ///
    /// Each request should get its own dispatcher.
    pub fn dispatcher(&self) -> Dispatcher<'_, R> {
        Dispatcher::new(self)
    }

    /// Builds the URI of a named route, substituting its wildcards with `params`.
    ///
    /// Values are inserted verbatim. Parameters are ignored for routes without
    /// wildcards. The base path is prepended to the result.
    /// ```rust
    /// use flyrouter::{Error, Handler, Router};
    /// use hyper::Method;
    ///
    /// let mut router: Router<()> = Router::new();
    /// router.set_base_path("/app");
    /// router
    ///     .register(Method::GET, "/users/{id}", Some("user"), Handler::named(|_| ()))
    ///     .unwrap();
    ///
    /// assert_eq!(router.generate_uri("user", [("id", "42")]).unwrap(), "/app/users/42");
    /// assert!(matches!(
    ///     router.uri_for("user"),
    ///     Err(Error::MissingParameter { .. })
    /// ));
    /// ```
    pub fn generate_uri<I, K, V>(&self, name: &str, params: I) -> Result<String, Error>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let route = self
            .route_by_name(name)
            .ok_or_else(|| Error::RouteNotFound(name.to_owned()))?;

        let params: Vec<(K, V)> = params.into_iter().collect();
        let path = route
            .pattern
            .expand(|key| {
                params
                    .iter()
                    .find(|(k, _)| k.as_ref() == key)
                    .map(|(_, v)| v.as_ref())
            })
            .map_err(|key| Error::MissingParameter {
                route: name.to_owned(),
                key: key.to_owned(),
            })?;

        Ok(self.with_base_path(&path))
    }

    /// Builds the URI of a named route that has no wildcards.
    pub fn uri_for(&self, name: &str) -> Result<String, Error> {
        self.generate_uri(name, std::iter::empty::<(&str, &str)>())
    }

    fn with_base_path(&self, path: &str) -> String {
        match (self.base_path.as_str(), path) {
            ("", _) => path.to_owned(),
            (base, "/") => base.to_owned(),
            (base, _) => [base, path].concat(),
        }
    }
}

impl<R> fmt::Debug for Router<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("names", &self.names)
            .field("methods", &self.methods)
            .field("base_path", &self.base_path)
            .finish()
    }
}

impl<R> Default for Router<R> {
    fn default() -> Self {
        Self::new()
    }
}

// Pops the innermost namespace on drop, including while unwinding.
struct NamespaceGuard<'a, R> {
    router: &'a mut Router<R>,
}

impl<R> Drop for NamespaceGuard<'_, R> {
    fn drop(&mut self) {
        self.router.namespaces.pop();
    }
}
