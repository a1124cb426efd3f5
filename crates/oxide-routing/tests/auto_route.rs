//! Tests for the segment-probing auto-route fallback.

mod common;
use common::*;

use oxide_routing::{
    Controller, ControllerRegistry, Dispatch, FsLocator, RouteCollection, Router, RoutingConfig,
    Verb,
};

fn controller_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("Admin/Reports")).unwrap();
    std::fs::write(dir.path().join("Admin/Users.rs"), "").unwrap();
    std::fs::write(dir.path().join("Admin/Reports/Sales.rs"), "").unwrap();
    std::fs::write(dir.path().join("Pages.rs"), "").unwrap();
    dir
}

#[test]
fn descends_into_namespaces() {
    let dir = controller_tree();
    let locator = FsLocator::new(dir.path());
    let routes = routes();

    let route = |uri: &str| match Router::new(&routes, Verb::Get)
        .with_locator(&locator)
        .handle(Some(uri))
        .unwrap()
    {
        Dispatch::Matched(m) => m,
        other => panic!("unexpected {other:?}"),
    };

    let m = route("admin/users/edit/5");
    assert_eq!(call(&m), "Admin\\Users::edit(5)");
    assert_eq!(m.directory.as_deref(), Some("Admin/"));
    assert_eq!(m.route_key, None);

    assert_eq!(call(&route("admin/reports/sales")), "Admin\\Reports\\Sales::index()");
    assert_eq!(call(&route("pages/about/team")), "Pages::about(team)");
    assert_eq!(call(&route("admin")), "Admin\\Home::index()");
}

#[test]
fn without_locator_first_segment_is_controller() {
    let routes = routes();
    assert_eq!(call(&resolve(&routes, Verb::Get, "admin/users/edit")), "Admin::users(edit)");
    assert_eq!(call(&resolve(&routes, Verb::Get, "//blog//")), "Blog::index()");
}

#[test]
fn default_namespace_is_applied() {
    let config = RoutingConfig {
        default_namespace: "App\\Controllers".to_string(),
        ..RoutingConfig::default()
    };
    let routes = RouteCollection::new(config);

    assert_eq!(
        call(&resolve(&routes, Verb::Get, "users/list")),
        "App\\Controllers\\Users::list()"
    );
    assert_eq!(
        call(&resolve(&routes, Verb::Get, "")),
        "App\\Controllers\\Home::index()"
    );
}

#[test]
fn cli_route_shadows_auto_routing() {
    let mut routes = routes();
    routes.cli("qtcs(:any)", "Qtcs::index$1", None);

    assert_not_found(&routes, Verb::Get, "qtcs");
    assert_not_found(&routes, Verb::Get, "qtcs/index/now");
    assert_eq!(call(&resolve(&routes, Verb::Get, "other/index")), "Other::index()");

    assert_eq!(call(&resolve(&routes, Verb::Cli, "qtcs/now")), "Qtcs::index(now)");
}

#[test]
fn wildcard_route_shadows_auto_routing() {
    let mut routes = routes();
    routes.add("blog", "Blog::index", None);

    assert_eq!(call(&resolve(&routes, Verb::Get, "blog")), "Blog::index()");
    assert_not_found(&routes, Verb::Get, "blog/index");
}

#[test]
fn disabled_auto_routing_is_not_found() {
    let mut routes = routes();
    routes.set_auto_route(false);
    assert_not_found(&routes, Verb::Get, "anything/here");
}

struct Reports;

impl Controller for Reports {
    fn invoke(&self, method: &str, params: &[String]) -> Option<String> {
        match method {
            "index" => Some("all reports".to_string()),
            "year" => Some(format!("reports for {}", params.first()?)),
            _ => None,
        }
    }
}

#[test]
fn registry_locates_and_dispatches() {
    let mut registry = ControllerRegistry::new();
    registry.register("Admin\\Reports", || Reports);
    let routes = routes();

    let dispatch = Router::new(&routes, Verb::Get)
        .with_locator(&registry)
        .handle(Some("admin/reports/year/2023"))
        .unwrap();
    let Dispatch::Matched(m) = dispatch else {
        panic!("expected a match, got {dispatch:?}");
    };

    assert_eq!(call(&m), "Admin\\Reports::year(2023)");
    assert_eq!(registry.dispatch(&m).unwrap(), "reports for 2023");
}
