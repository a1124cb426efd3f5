#![allow(dead_code)]

use oxide_routing::{Dispatch, RouteCollection, RouteMatch, Router, RoutingConfig, Uri, Verb};

pub fn routes() -> RouteCollection {
    RouteCollection::new(RoutingConfig::default())
}

pub fn dispatch(routes: &RouteCollection, verb: Verb, uri: &str) -> Dispatch {
    Router::new(routes, verb)
        .handle(Some(uri))
        .unwrap_or_else(|e| panic!("Failed to route: {verb} {uri}\nError: {e:?}"))
}

pub fn resolve(routes: &RouteCollection, verb: Verb, uri: &str) -> RouteMatch {
    match dispatch(routes, verb, uri) {
        Dispatch::Matched(m) => m,
        other => panic!("Expected a match for {verb} {uri}, got {other:?}"),
    }
}

pub fn assert_not_found(routes: &RouteCollection, verb: Verb, uri: &str) {
    match dispatch(routes, verb, uri) {
        Dispatch::NotFound => {}
        other => panic!("Expected NotFound for {verb} {uri}, got {other:?}"),
    }
}

/// Formats a match as `Controller::method(p1, p2)`.
pub fn call(m: &RouteMatch) -> String {
    format!(
        "{}::{}({})",
        m.controller().unwrap_or("(closure)"),
        m.method().unwrap_or(""),
        m.params.join(", ")
    )
}

/// The base URI of RFC 3986 section 5.4.
pub fn rfc_base() -> Uri {
    Uri::parse("http://a/b/c/d;p?q").expect("RFC base URI")
}

pub fn resolve_ref(reference: &str) -> String {
    rfc_base()
        .join(reference)
        .unwrap_or_else(|e| panic!("Failed to resolve: {reference}\nError: {e:?}"))
        .to_string()
}

/// Verifies that `to_string()` is a fixed point under re-parsing.
pub fn round_trip(uri: &str) {
    let rendered1 = Uri::parse(uri).unwrap().to_string();
    let rendered2 = Uri::parse(&rendered1).unwrap().to_string();
    assert_eq!(
        rendered1, rendered2,
        "Round-trip failed.\n  Input:    {uri}\n  First:    {rendered1}\n  Second:   {rendered2}"
    );
}
