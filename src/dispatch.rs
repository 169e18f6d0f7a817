//! One-shot dispatch of a request to its handler.
//!
//! A [`Dispatcher`] represents the dispatch slot of a single request. The first
//! successful [`dispatch`](Dispatcher::dispatch) invokes the matched handler and
//! closes the slot. Every later call is a no-op that neither matches nor
//! invokes anything. A failed dispatch leaves the slot open.
//!
//! ```ignore
//!  Idle --dispatch(match)--> Dispatched --dispatch(..)--> Dispatched (no-op)
//!  Idle --dispatch(error)--> Idle
//! ```
//!
//! Dispatchers borrow the router immutably, so any number of them can run
//! concurrently against a router shared behind an `Arc`.
use crate::error::Error;
use crate::router::Router;

use hyper::Method;
use tracing::trace;

/// The state of a request's dispatch slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    Dispatched,
}

/// Dispatches at most one request to a handler.
pub struct Dispatcher<'r, R> {
    router: &'r Router<R>,
    state: State,
}

impl<'r, R> Dispatcher<'r, R> {
    pub fn new(router: &'r Router<R>) -> Self {
        Self {
            router,
            state: State::Idle,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_dispatched(&self) -> bool {
        self.state == State::Dispatched
    }

    /// Resolves `method` and `path` to the first matching route and invokes its handler.
    ///
    /// Returns `Ok(Some(output))` with the handler's output on the first
    /// successful call and `Ok(None)` on every call after that.
    /// ```rust
    /// use flyrouter::{Error, Router};
    /// use hyper::Method;
    ///
    /// let mut router: Router<&'static str> = Router::new();
    /// router.get("/", |_| "home").unwrap();
    ///
    /// let mut dispatcher = router.dispatcher();
    /// assert_eq!(
    ///     dispatcher.dispatch(&Method::GET, "/unknown"),
    ///     Err(Error::RouteNotFound("/unknown".to_owned()))
    /// );
    /// assert_eq!(dispatcher.dispatch(&Method::GET, "/"), Ok(Some("home")));
    /// assert_eq!(dispatcher.dispatch(&Method::GET, "/"), Ok(None));
    /// ```
    pub fn dispatch(&mut self, method: &Method, path: &str) -> Result<Option<R>, Error> {
        if self.is_dispatched() {
            trace!(method = %method, path = %path, "Request already dispatched, ignoring");
            return Ok(None);
        }

        let found = self.router.lookup(method, path)?;
        self.state = State::Dispatched;

        Ok(Some(found.route.handler().call(&found.params)))
    }
}
