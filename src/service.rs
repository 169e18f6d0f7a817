//! Serving a [`Router`](crate::Router) with hyper.
//!
//! A router whose handlers produce a [`ResponseFuture`] can be served directly:
//!
//! ```rust,no_run
//! use flyrouter::service::{boxed, ResponseFuture};
//! use flyrouter::{Handler, Router};
//! use hyper::{Body, Method, Response};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut router: Router<ResponseFuture> = Router::new();
//!     router
//!         .get("/", |_| boxed(async { Ok(Response::new(Body::from("Hello, World!"))) }))?
//!         .register(
//!             Method::GET,
//!             "/hello/{user}",
//!             Some("hello"),
//!             Handler::named(|params| {
//!                 let body = format!("Hello, {}", params.get("user").unwrap_or_default());
//!                 boxed(async move { Ok(Response::new(Body::from(body))) })
//!             }),
//!         )?;
//!
//!     hyper::Server::bind(&([127, 0, 0, 1], 3000).into())
//!         .serve(router.into_service())
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! Each request is dispatched through its own [`Dispatcher`](crate::Dispatcher),
//! so concurrent requests never share a dispatch slot.
use crate::error::Error;
use crate::params::Params;
use crate::router::Router;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::{future, ready};
use hyper::header::{self, HeaderValue};
use hyper::service::Service;
use hyper::{Body, Method, Request, Response, StatusCode};
use tracing::{debug, warn};

/// The output of a handler served through hyper.
pub type ResponseFuture = Pin<Box<dyn Future<Output = hyper::Result<Response<Body>>> + Send>>;

/// Boxes a response future so it can be returned from a handler.
pub fn boxed<F>(fut: F) -> ResponseFuture
where
    F: Future<Output = hyper::Result<Response<Body>>> + Send + 'static,
{
    Box::pin(fut)
}

#[doc(hidden)]
pub struct MakeRouterService(RouterService);

impl<T> Service<T> for MakeRouterService {
    type Response = RouterService;
    type Error = hyper::Error;
    type Future = future::Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _: T) -> Self::Future {
        let service = self.0.clone();
        future::ok(service)
    }
}

#[doc(hidden)]
#[derive(Clone)]
pub struct RouterService(Arc<Router<ResponseFuture>>);

impl RouterService {
    fn new(router: Router<ResponseFuture>) -> Self {
        RouterService(Arc::new(router))
    }
}

impl Service<Request<Body>> for RouterService {
    type Response = Response<Body>;
    type Error = hyper::Error;
    type Future = ResponseFut;

    fn poll_ready(&mut self, _: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        self.0.serve(req)
    }
}

impl Router<ResponseFuture> {
    /// Converts the `Router` into a `Service` which you can serve directly with `Hyper`.
    ///
    /// The router is frozen behind an `Arc`; no routes can be added afterwards.
    pub fn into_service(self) -> MakeRouterService {
        MakeRouterService(RouterService::new(self))
    }

    /// An asynchronous function from a `Request` to a `Response`.
    ///
    /// Requests with no matching route are answered with `405 Method Not Allowed`
    /// when the path is routable under another method, and are otherwise handed
    /// to the `not_found` handler, or answered with `404 Not Found`. `OPTIONS`
    /// requests for a routable path are answered with the `Allow` header.
    pub fn serve(&self, req: Request<Body>) -> ResponseFut {
        let method = req.method();
        let path = req.uri().path();

        let err = match self.dispatcher().dispatch(method, path) {
            Ok(Some(fut)) => return ResponseFutKind::Boxed(fut).into(),
            Ok(None) => Error::RouteNotFound(path.to_owned()),
            Err(err) => err,
        };

        debug!(method = %method, path = %path, error = %err, "Request not routed");

        let allow = self.allowed(path);
        if !allow.is_empty() {
            let allow = allow.join(", ");
            return if method == Method::OPTIONS {
                ResponseFutKind::Options(allow).into()
            } else {
                ResponseFutKind::MethodNotAllowed(allow).into()
            };
        }

        match self.not_found {
            Some(ref handler) => ResponseFutKind::Boxed(handler.call(&Params::new())).into(),
            None => ResponseFutKind::NotFound.into(),
        }
    }

    /// Builds a `302 Found` response pointing at `target`.
    ///
    /// Absolute URLs are used as they are. Otherwise `target` is looked up as
    /// the name of a route without wildcards, and used literally if no such
    /// route exists.
    /// ```rust
    /// use flyrouter::service::{boxed, ResponseFuture};
    /// use flyrouter::{Handler, Router};
    /// use hyper::{header, Body, Method, Response};
    ///
    /// let mut router: Router<ResponseFuture> = Router::new();
    /// router.set_base_path("/app");
    /// router
    ///     .register(Method::GET, "/login", Some("login"), Handler::named(|_| {
    ///         boxed(async { Ok(Response::new(Body::empty())) })
    ///     }))
    ///     .unwrap();
    ///
    /// let res = router.redirect("login");
    /// assert_eq!(res.status(), 302);
    /// assert_eq!(res.headers()[header::LOCATION], "/app/login");
    /// ```
    pub fn redirect(&self, target: &str) -> Response<Body> {
        let location = if target.contains("://") {
            target.to_owned()
        } else {
            self.uri_for(target).unwrap_or_else(|_| target.to_owned())
        };

        match HeaderValue::from_str(&location) {
            Ok(value) => {
                let mut res = Response::new(Body::empty());
                *res.status_mut() = StatusCode::FOUND;
                res.headers_mut().insert(header::LOCATION, value);
                res
            }
            Err(_) => {
                warn!(location = %location, "Redirect target is not a valid header value");
                status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

fn status(code: StatusCode) -> Response<Body> {
    let mut res = Response::new(Body::empty());
    *res.status_mut() = code;
    res
}

fn with_allow(mut res: Response<Body>, allowed: &str) -> Response<Body> {
    if let Ok(value) = HeaderValue::from_str(allowed) {
        res.headers_mut().insert(header::ALLOW, value);
    }
    res
}

pub struct ResponseFut {
    kind: ResponseFutKind,
}

impl From<ResponseFutKind> for ResponseFut {
    fn from(kind: ResponseFutKind) -> Self {
        Self { kind }
    }
}

enum ResponseFutKind {
    Boxed(ResponseFuture),
    MethodNotAllowed(String),
    Options(String),
    NotFound,
}

impl Future for ResponseFut {
    type Output = hyper::Result<Response<Body>>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let ready = match self.kind {
            ResponseFutKind::Boxed(ref mut fut) => ready!(fut.as_mut().poll(cx)),
            ResponseFutKind::NotFound => Ok(status(StatusCode::NOT_FOUND)),
            ResponseFutKind::Options(ref allowed) => Ok(with_allow(status(StatusCode::OK), allowed)),
            ResponseFutKind::MethodNotAllowed(ref allowed) => Ok(with_allow(
                status(StatusCode::METHOD_NOT_ALLOWED),
                allowed,
            )),
        };

        Poll::Ready(ready)
    }
}
