use flyrouter::{Dispatcher, Error, Handler, Router, State};
use hyper::Method;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn label(label: &'static str) -> Handler<String> {
    Handler::named(move |_| label.to_owned())
}

fn greeter() -> Router<String> {
    let mut router = Router::new();
    router
        .register(Method::GET, "/", Some("homepage"), label("home"))
        .unwrap()
        .register(
            Method::GET,
            "/hola/{name}",
            Some("hola_page"),
            Handler::positional(|args| format!("Hola {}.", args[0])),
        )
        .unwrap();
    router
}

#[test]
fn hola_scenario() {
    let router = greeter();

    let mut dispatcher = router.dispatcher();
    assert_eq!(
        dispatcher.dispatch(&Method::GET, "/hola/Ana"),
        Ok(Some("Hola Ana.".to_owned()))
    );
    assert_eq!(
        router.generate_uri("hola_page", [("name", "Ana")]),
        Ok("/hola/Ana".to_owned())
    );
}

#[test]
fn named_handler_receives_params_by_name() {
    let mut router = Router::new();
    router
        .register(
            Method::GET,
            "/blog/{category}/{post}",
            Some("post"),
            Handler::named(|params| {
                format!(
                    "{}:{}",
                    params.get("category").unwrap_or("-"),
                    params.get("post").unwrap_or("-")
                )
            }),
        )
        .unwrap();

    let mut dispatcher = router.dispatcher();
    assert_eq!(
        dispatcher.dispatch(&Method::GET, "/blog/rust/routers"),
        Ok(Some("rust:routers".to_owned()))
    );
}

#[test]
fn first_registered_route_wins() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/users/{id}", Some("user"), label("user"))
        .unwrap()
        .register(Method::GET, "/users/new", Some("new_user"), label("new_user"))
        .unwrap()
        .register(Method::GET, "/users/{name}", Some("by_name"), label("by_name"))
        .unwrap();

    for path in &["/users/new", "/users/42", "/users/ana"] {
        let matched = router.lookup(&Method::GET, path).unwrap();
        assert_eq!(matched.route.name(), "user", "{}", path);
    }

    // duplicate paths under different names are accepted, the first one shadows the rest
    router
        .register(Method::GET, "/users/new", Some("new_user_again"), label("again"))
        .unwrap();
    assert_eq!(router.routes(&Method::GET).len(), 4);
}

#[test]
fn routes_are_partitioned_by_method() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/items", Some("list"), label("list"))
        .unwrap()
        .register(Method::POST, "/items", Some("create"), label("create"))
        .unwrap()
        .register(Method::PUT, "/items/{id}", Some("replace"), label("replace"))
        .unwrap()
        .register(Method::DELETE, "/items/{id}", Some("remove"), label("remove"))
        .unwrap();

    let cases = [
        (Method::GET, "/items", "list"),
        (Method::POST, "/items", "create"),
        (Method::PUT, "/items/1", "replace"),
        (Method::DELETE, "/items/1", "remove"),
    ];
    for (method, path, expected) in cases.iter() {
        let mut dispatcher = router.dispatcher();
        assert_eq!(
            dispatcher.dispatch(method, path),
            Ok(Some(expected.to_string()))
        );
    }

    assert_eq!(
        router.dispatcher().dispatch(&Method::DELETE, "/items"),
        Err(Error::RouteNotFound("/items".to_owned()))
    );
}

#[test]
fn duplicate_names_are_rejected_atomically() {
    let mut router = greeter();

    let err = router
        .register(Method::POST, "/other", Some("hola_page"), label("other"))
        .unwrap_err();
    assert_eq!(err, Error::DuplicateRouteName("hola_page".to_owned()));

    assert_eq!(router.len(), 2);
    assert!(router.routes(&Method::POST).is_empty());
    assert_eq!(router.resolve_name("hola_page"), Some("/hola/{name}"));
}

#[test]
fn namespace_scenario() {
    let mut router = Router::new();
    router
        .namespace("/foo", |r| {
            r.register(Method::GET, "/", Some("foo_page"), label("Foo"))?;
            r.register(Method::GET, "/bar", Some("foo_bar_page"), label("Bar"))?;
            Ok(())
        })
        .unwrap();
    router
        .register(Method::GET, "/baz", Some("baz_page"), label("Baz"))
        .unwrap();

    assert_eq!(router.resolve_name("foo_bar_page"), Some("/foo/bar"));
    assert_eq!(router.uri_for("foo_bar_page"), Ok("/foo/bar".to_owned()));
    assert_eq!(router.uri_for("foo_page"), Ok("/foo".to_owned()));
    assert_eq!(router.resolve_name("baz_page"), Some("/baz"));

    let mut dispatcher = router.dispatcher();
    assert_eq!(
        dispatcher.dispatch(&Method::GET, "/foo/bar"),
        Ok(Some("Bar".to_owned()))
    );
    assert_eq!(
        router.dispatcher().dispatch(&Method::GET, "/foo/baz"),
        Err(Error::RouteNotFound("/foo/baz".to_owned()))
    );
}

#[test]
fn unsupported_method() {
    let router = greeter();
    assert_eq!(
        router.dispatcher().dispatch(&Method::PATCH, "/anything"),
        Err(Error::UnsupportedMethod(Method::PATCH))
    );
}

#[test]
fn unknown_path() {
    let router = greeter();
    assert_eq!(
        router.dispatcher().dispatch(&Method::GET, "/unknown"),
        Err(Error::RouteNotFound("/unknown".to_owned()))
    );
}

#[test]
fn trailing_slash_is_ignored() {
    let mut router = Router::new();
    router
        .register(Method::GET, "/", Some("root"), label("root"))
        .unwrap()
        .register(Method::GET, "/foo", Some("foo"), label("foo"))
        .unwrap();

    let with = router.lookup(&Method::GET, "/foo/").unwrap();
    let without = router.lookup(&Method::GET, "/foo").unwrap();
    assert_eq!(with.route.name(), without.route.name());

    assert_eq!(router.lookup(&Method::GET, "/").unwrap().route.name(), "root");
    assert!(router.lookup(&Method::GET, "/foo//").is_err());
}

#[test]
fn matching_ignores_case_and_query() {
    let router = greeter();
    let matched = router.lookup(&Method::GET, "/HOLA/Ana?lang=es").unwrap();
    assert_eq!(matched.route.name(), "hola_page");
    assert_eq!(matched.params.get("name"), Some("Ana"));
}

#[test]
fn second_dispatch_is_a_no_op() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();

    let mut router = Router::new();
    router
        .get("/", move |_| counter.fetch_add(1, Ordering::SeqCst))
        .unwrap();

    let mut dispatcher = router.dispatcher();
    assert_eq!(dispatcher.state(), State::Idle);
    assert_eq!(dispatcher.dispatch(&Method::GET, "/"), Ok(Some(0)));
    assert_eq!(dispatcher.state(), State::Dispatched);

    assert_eq!(dispatcher.dispatch(&Method::GET, "/"), Ok(None));
    // not even validated: an unsupported method is ignored once dispatched
    assert_eq!(dispatcher.dispatch(&Method::PATCH, "/"), Ok(None));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_dispatch_can_be_retried() {
    let router = greeter();
    let mut dispatcher = Dispatcher::new(&router);

    assert!(dispatcher.dispatch(&Method::GET, "/nope").is_err());
    assert_eq!(dispatcher.state(), State::Idle);

    assert_eq!(
        dispatcher.dispatch(&Method::GET, "/"),
        Ok(Some("home".to_owned()))
    );
    assert!(dispatcher.is_dispatched());
}

#[test]
fn dispatchers_are_independent() {
    let router = greeter();
    let mut first = router.dispatcher();
    let mut second = router.dispatcher();

    assert!(first.dispatch(&Method::GET, "/").unwrap().is_some());
    assert!(second.dispatch(&Method::GET, "/").unwrap().is_some());
}

#[test]
fn generated_uris_dispatch_back_to_their_route() {
    let mut router = Router::new();
    router.set_base_path("/app/");
    router
        .register(Method::GET, "/", Some("home"), label("home"))
        .unwrap()
        .register(Method::GET, "/static/about", Some("about"), label("about"))
        .unwrap()
        .register(
            Method::GET,
            "/users/{id}/posts/{post}",
            Some("user_post"),
            label("user_post"),
        )
        .unwrap()
        .namespace("/admin", |r| {
            r.register(Method::POST, "/users/{id}", Some("admin_user"), label("admin_user"))?;
            Ok(())
        })
        .unwrap();

    let cases = [
        (Method::GET, "home", vec![]),
        (Method::GET, "about", vec![]),
        (Method::GET, "user_post", vec![("id", "7"), ("post", "hello_world")]),
        (Method::POST, "admin_user", vec![("id", "ana")]),
    ];

    for (method, name, params) in cases.iter() {
        let uri = router.generate_uri(name, params.iter().cloned()).unwrap();
        assert!(uri.starts_with("/app"), "{}", uri);

        let matched = router.lookup(method, &uri).unwrap();
        assert_eq!(matched.route.name(), *name);
        for (key, value) in params {
            assert_eq!(matched.params.get(key), Some(*value));
        }
    }
}

#[test]
fn uri_generation_errors() {
    let router = greeter();

    assert_eq!(
        router.uri_for("nope"),
        Err(Error::RouteNotFound("nope".to_owned()))
    );
    assert_eq!(
        router.uri_for("hola_page"),
        Err(Error::MissingParameter {
            route: "hola_page".to_owned(),
            key: "name".to_owned(),
        })
    );
    assert_eq!(
        router.generate_uri("hola_page", [("other", "x")]),
        Err(Error::MissingParameter {
            route: "hola_page".to_owned(),
            key: "name".to_owned(),
        })
    );

    // literal routes ignore parameters entirely
    assert_eq!(
        router.generate_uri("homepage", [("name", "Ana")]),
        Ok("/".to_owned())
    );
}

#[test]
fn uri_generation_substitutes_verbatim() {
    let router = greeter();
    assert_eq!(
        router.generate_uri("hola_page", [("name", "Ana María")]),
        Ok("/hola/Ana María".to_owned())
    );
}

#[test]
fn generate_uri_accepts_maps() {
    let router = greeter();
    let mut params = std::collections::HashMap::new();
    params.insert("name".to_owned(), "Ana".to_owned());
    assert_eq!(
        router.generate_uri("hola_page", &params),
        Ok("/hola/Ana".to_owned())
    );
}

#[test]
fn shared_router_dispatches_concurrently() {
    let router = Arc::new(greeter());

    let handles: Vec<_> = ["Ana", "Luis", "Sofia", "Mateo"]
        .iter()
        .map(|name| {
            let router = router.clone();
            let path = format!("/hola/{}", name);
            std::thread::spawn(move || router.dispatcher().dispatch(&Method::GET, &path))
        })
        .collect();

    for (handle, name) in handles.into_iter().zip(["Ana", "Luis", "Sofia", "Mateo"].iter()) {
        assert_eq!(handle.join().unwrap(), Ok(Some(format!("Hola {}.", name))));
    }
}
