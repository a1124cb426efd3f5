//! Tests for explicit route dispatch and reverse routing.

mod common;
use common::*;

use oxide_routing::{
    Dispatch, RouteCollection, RouteOptions, RouteTarget, Router, RoutingConfig, Uri, Verb,
};

#[test]
fn exact_match_dispatches_with_ordered_params() {
    let mut routes = routes();
    routes.get("archive/(:num)/(:num)/(:segment)", "Blog::archive/$1/$2/$3", None);

    let m = resolve(&routes, Verb::Get, "archive/2024/05/launch");
    assert_eq!(call(&m), "Blog::archive(2024, 05, launch)");
}

#[test]
fn verb_bucket_beats_wildcard() {
    let mut routes = routes();
    routes.add("feed", "Feed::any", None);
    routes.get("feed", "Feed::get", None);

    assert_eq!(call(&resolve(&routes, Verb::Get, "feed")), "Feed::get()");
    assert_eq!(call(&resolve(&routes, Verb::Post, "feed")), "Feed::any()");
}

#[test]
fn first_registration_wins() {
    let mut routes = routes();
    routes.get("page", "First::index", None);
    routes.get("page", "Second::index", None);

    assert_eq!(call(&resolve(&routes, Verb::Get, "page")), "First::index()");
}

#[test]
fn resource_crud_table() {
    let mut routes = routes();
    routes.resource("photos", None);

    let cases = [
        (Verb::Get, "photos", "Photos::index()"),
        (Verb::Get, "photos/new", "Photos::new()"),
        (Verb::Get, "photos/9/edit", "Photos::edit(9)"),
        (Verb::Get, "photos/9", "Photos::show(9)"),
        (Verb::Post, "photos", "Photos::create()"),
        (Verb::Put, "photos/9", "Photos::update(9)"),
        (Verb::Patch, "photos/9", "Photos::update(9)"),
        (Verb::Delete, "photos/9", "Photos::delete(9)"),
    ];

    for (verb, uri, expected) in cases {
        assert_eq!(call(&resolve(&routes, verb, uri)), expected, "{verb} {uri}");
    }
}

#[test]
fn websafe_resource_accepts_form_posts() {
    let mut routes = routes();
    routes.set_auto_route(false);
    routes.resource("photos", Some(RouteOptions::new().websafe()));

    assert_eq!(call(&resolve(&routes, Verb::Post, "photos/3/delete")), "Photos::delete(3)");
    assert_eq!(call(&resolve(&routes, Verb::Post, "photos/3")), "Photos::update(3)");
}

#[test]
fn reverse_route_by_target() {
    let mut routes = routes();
    routes.resource("photos", Some(RouteOptions::new().placeholder("(:num)")));

    assert_eq!(
        routes.reverse_route("Photos::show", &["5"]).unwrap().as_deref(),
        Some("/photos/5")
    );
    assert_eq!(routes.reverse_route("Videos::show", &["5"]).unwrap(), None);
    assert!(routes.reverse_route("Photos::show", &["abc"]).is_err());
}

#[test]
fn reverse_route_prefix_scan_takes_first_candidate() {
    let mut routes = routes();
    routes.get("admins/(:num)", "UsersAdmin::show/$1", None);
    routes.get("users/(:num)", "Users::show/$1", None);

    // `Users` is a prefix of `UsersAdmin`, registered first
    assert_eq!(
        routes.reverse_route("Users", &["7"]).unwrap().as_deref(),
        Some("/admins/7")
    );
    assert_eq!(
        routes.reverse_route("Users::show", &["7"]).unwrap().as_deref(),
        Some("/users/7")
    );
}

#[test]
fn named_route_reverse_and_url() {
    let mut routes = routes();
    routes.get(
        "{locale}/profile/(:alphanum)",
        "Profiles::show/$1",
        Some(RouteOptions::new().name("profile")),
    );

    assert_eq!(
        routes.reverse_route("profile", &["ada"]).unwrap().as_deref(),
        Some("/en/profile/ada")
    );

    let base = Uri::parse("https://example.com/").unwrap();
    let url = routes.url_to(&base, "profile", &["ada"]).unwrap().unwrap();
    assert_eq!(url.to_string(), "https://example.com/en/profile/ada");

    let m = resolve(&routes, Verb::Get, "fr/profile/ada");
    assert_eq!(m.locale.as_deref(), Some("fr"));
    assert_eq!(m.route_key.as_deref(), Some("profile"));
}

#[test]
fn redirect_routes() {
    let mut routes = routes();
    routes.get("blog/(:num)", "Blog::show/$1", Some(RouteOptions::new().name("post")));
    routes.add_redirect("news", "/blog", 301);

    match dispatch(&routes, Verb::Get, "news") {
        Dispatch::Redirect(redirect) => {
            assert_eq!(redirect.status, 301);
            let base = Uri::parse("https://example.com/news").unwrap();
            assert_eq!(
                redirect.location(&base).unwrap().to_string(),
                "https://example.com/blog"
            );
        }
        other => panic!("expected a redirect, got {other:?}"),
    }
    assert!(routes.is_redirect("news"));
    assert_eq!(routes.redirect_code("news"), Some(301));
    assert!(!routes.is_redirect("blog/([0-9]+)"));
}

#[test]
fn hostname_routes_follow_current_host() {
    let build = |host: &str| {
        let mut routes = RouteCollection::new(RoutingConfig::default().with_host(host));
        routes.set_auto_route(false);
        routes.get("status", "Site::status", None);
        routes.get(
            "status",
            "Api::status",
            Some(RouteOptions::new().hostname("api.example.com")),
        );
        routes.get(
            "metrics",
            "Api::metrics",
            Some(RouteOptions::new().hostname("api.example.com")),
        );
        routes
    };

    let api = build("api.example.com");
    assert_eq!(call(&resolve(&api, Verb::Get, "status")), "Api::status()");
    assert_eq!(call(&resolve(&api, Verb::Get, "metrics")), "Api::metrics()");

    let www = build("www.example.com");
    assert_eq!(call(&resolve(&www, Verb::Get, "status")), "Site::status()");
    assert_not_found(&www, Verb::Get, "metrics");
}

#[test]
fn subdomain_routes() {
    let mut routes = RouteCollection::new(RoutingConfig::default().with_host("shop.example.co.uk"));
    routes.get("/", "Home::index", None);
    routes.get("/", "Shop::index", Some(RouteOptions::new().subdomain("shop")));
    routes.get("cart", "Cart::index", Some(RouteOptions::new().subdomain("*")));
    routes.get("blog", "Blog::index", Some(RouteOptions::new().subdomain("blog")));

    assert_eq!(call(&resolve(&routes, Verb::Get, "/")), "Shop::index()");
    assert_eq!(call(&resolve(&routes, Verb::Get, "cart")), "Cart::index()");
    assert!(routes.find(Verb::Get, "blog").is_none());
}

#[test]
fn group_namespace_and_filter() {
    let mut routes = routes();
    routes.group(
        "api",
        Some(RouteOptions::new().namespace("App\\Api").filter("token")),
        |api| {
            api.get("users/(:num)", "Users::show/$1", None);
            api.group("v2", Some(RouteOptions::new().filter("token-v2")), |v2| {
                v2.get("users/(:num)", "V2\\Users::show/$1", None);
            });
        },
    );
    routes.get("open", "Pages::open", None);

    let m = resolve(&routes, Verb::Get, "api/users/4");
    assert_eq!(call(&m), "App\\Api\\Users::show(4)");
    assert_eq!(m.filter.as_deref(), Some("token"));

    let m = resolve(&routes, Verb::Get, "api/v2/users/4");
    assert_eq!(call(&m), "App\\Api\\V2\\Users::show(4)");
    assert_eq!(m.filter.as_deref(), Some("token-v2"));

    let m = resolve(&routes, Verb::Get, "open");
    assert_eq!(m.filter, None);
}

#[test]
fn offset_shifts_back_references() {
    let mut routes = routes();
    routes.get(
        "(:segment)/articles/(:num)",
        "Articles::show/$1",
        Some(RouteOptions::new().offset(1)),
    );

    assert_eq!(call(&resolve(&routes, Verb::Get, "tech/articles/12")), "Articles::show(12)");
}

#[test]
fn closure_routes_receive_captures() {
    let mut routes = routes();
    routes.get(
        "greet/(:alpha)/(:num)",
        RouteTarget::closure(|p| format!("{} x{}", p[0], p[1])),
        None,
    );

    let m = resolve(&routes, Verb::Get, "greet/ada/3");
    assert_eq!(m.params, vec!["ada", "3"]);
    let router = Router::new(&routes, Verb::Get);
    assert!(router.override_404().is_none());
}

#[test]
fn custom_placeholders() {
    let mut routes = routes();
    routes.add_placeholder("slug", "[a-z0-9-]+");
    routes.get("posts/(:slug)", "Posts::show/$1", None);
    routes.set_auto_route(false);

    assert_eq!(call(&resolve(&routes, Verb::Get, "posts/hello-world")), "Posts::show(hello-world)");
    assert_not_found(&routes, Verb::Get, "posts/Hello_World");
}
