//! Tests for loading route tables from JSON definition files.

mod common;
use common::*;

use std::io::Write;

use oxide_routing::{RouterError, RoutesFile, Verb};

const ROUTES: &str = r#"{
    "config": {
        "default_namespace": "App\\Controllers",
        "environment": "development",
        "host": "admin.example.com",
        "override_404": "Errors::missing"
    },
    "placeholders": [{ "tag": "slug", "pattern": "[a-z0-9-]+" }],
    "routes": [
        { "kind": "route", "verbs": ["get"], "from": "/", "to": "Home::index" },
        { "kind": "route", "verbs": ["get", "head"], "from": "posts/(:slug)", "to": "Posts::show/$1",
          "options": { "as": "post" } },
        { "kind": "redirect", "from": "articles/(:slug)", "to": "post", "status": 301 },
        { "kind": "resource", "name": "photos", "options": { "only": "index,show", "placeholder": "(:num)" } },
        { "kind": "presenter", "name": "albums", "options": { "only": ["index"] } },
        { "kind": "group", "prefix": "admin", "options": { "filter": "auth", "subdomain": "admin" },
          "routes": [
            { "kind": "route", "verbs": ["get"], "from": "dashboard", "to": "Admin\\Dashboard::index" }
          ] },
        { "kind": "environment", "name": "development", "routes": [
            { "kind": "route", "verbs": ["cli"], "from": "seed", "to": "Tools::seed" }
        ] },
        { "kind": "environment", "name": "production", "routes": [
            { "kind": "route", "from": "debug", "to": "Debug::index" }
        ] }
    ]
}"#;

fn write_routes(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file
}

#[test]
fn loads_every_definition_kind() {
    let file = write_routes(ROUTES);
    let routes = RoutesFile::load(file.path()).unwrap().into_collection().unwrap();

    assert_eq!(call(&resolve(&routes, Verb::Get, "/")), "App\\Controllers\\Home::index()");
    assert_eq!(
        call(&resolve(&routes, Verb::Head, "posts/hello-world")),
        "App\\Controllers\\Posts::show(hello-world)"
    );
    assert_eq!(
        call(&resolve(&routes, Verb::Get, "photos/3")),
        "App\\Controllers\\Photos::show(3)"
    );
    assert!(routes.find(Verb::Get, "albums").is_some());
    assert!(routes.find(Verb::Get, "albums/new").is_none());

    let m = resolve(&routes, Verb::Get, "admin/dashboard");
    assert_eq!(call(&m), "App\\Controllers\\Admin\\Dashboard::index()");
    assert_eq!(m.filter.as_deref(), Some("auth"));

    assert_eq!(
        call(&resolve(&routes, Verb::Cli, "seed")),
        "App\\Controllers\\Tools::seed()"
    );
    assert!(routes.find(Verb::Any, "debug").is_none());
}

#[test]
fn redirect_to_named_route_uses_its_pattern() {
    let routes = RoutesFile::from_json(ROUTES).unwrap().into_collection().unwrap();

    assert_eq!(routes.redirect_code("articles/([a-z0-9-]+)"), Some(301));
    match dispatch(&routes, Verb::Get, "articles/intro") {
        oxide_routing::Dispatch::Redirect(redirect) => {
            assert_eq!(redirect.status, 301);
            assert_eq!(redirect.target, "posts/([a-z0-9-]+)");
        }
        other => panic!("expected a redirect, got {other:?}"),
    }
}

#[test]
fn override_404_comes_from_config() {
    let routes = RoutesFile::from_json(ROUTES).unwrap().into_collection().unwrap();
    let router = oxide_routing::Router::new(&routes, Verb::Get);

    match router.override_404() {
        Some(oxide_routing::Endpoint::Controller { controller, method }) => {
            assert_eq!(controller, "Errors");
            assert_eq!(method, "missing");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn reverse_routes_from_file() {
    let routes = RoutesFile::from_json(ROUTES).unwrap().into_collection().unwrap();

    assert_eq!(
        routes.reverse_route("post", &["intro"]).unwrap().as_deref(),
        Some("/posts/intro")
    );
    assert_eq!(
        routes.reverse_route("Photos::show", &["8"]).unwrap().as_deref(),
        Some("/photos/8")
    );
}

#[test]
fn host_gated_group_is_skipped_elsewhere() {
    let mut file = RoutesFile::from_json(ROUTES).unwrap();
    file.config.host = Some("www.example.com".to_string());
    let routes = file.into_collection().unwrap();

    assert!(routes.find(Verb::Get, "admin/dashboard").is_none());
}

#[test]
fn invalid_files_are_rejected() {
    assert!(matches!(
        RoutesFile::from_json(r#"{ "routes": [{ "kind": "teleport" }] }"#),
        Err(RouterError::Json(_))
    ));
    assert!(matches!(
        RoutesFile::from_json(
            r#"{ "routes": [{ "kind": "route", "from": "a", "to": "A", "options": { "bogus": 1 } }] }"#
        ),
        Err(RouterError::Json(_))
    ));
    assert!(matches!(
        RoutesFile::load("/definitely/not/here.json"),
        Err(RouterError::Io(_))
    ));
}
