//! # oxide-routing
//!
//! Request routing and URI resolution.
//!
//! This crate provides:
//! - A verb-partitioned route table with `:tag` placeholders
//! - Back-reference targets (`Users::show/$1`) and closure routes
//! - Route groups, RESTful resources and presenters
//! - Hostname, subdomain and environment scoped registration
//! - A segment-probing auto-route fallback
//! - Reverse routing
//! - RFC 3986 URI parsing, normalization and reference resolution
//!
//! ## Quick Start
//!
//! ```
//! use oxide_routing::{Dispatch, RouteCollection, Router, RoutingConfig, Verb};
//!
//! let mut routes = RouteCollection::new(RoutingConfig::default());
//! routes.get("posts/(:num)/(:segment)", "Blog::post/$1/$2", None);
//!
//! let router = Router::new(&routes, Verb::Get);
//! if let Dispatch::Matched(m) = router.handle(Some("/posts/7/hello")).unwrap() {
//!     assert_eq!(m.controller(), Some("Blog"));
//!     assert_eq!(m.params, vec!["7", "hello"]);
//! }
//! ```
//!
//! ## Placeholders
//!
//! | tag        | fragment         |
//! |------------|------------------|
//! | `any`      | `.*`             |
//! | `segment`  | `[^/]+`          |
//! | `alphanum` | `[a-zA-Z0-9]+`   |
//! | `num`      | `[0-9]+`         |
//! | `alpha`    | `[a-zA-Z]+`      |
//! | `hash`     | `[^/]+`          |
//!
//! Custom tags are added with
//! [`RouteCollection::add_placeholder`].
//!
//! ## Groups and Resources
//!
//! ```
//! use oxide_routing::{RouteCollection, RouteOptions, Verb};
//!
//! let mut routes = RouteCollection::default();
//! routes.group("admin", Some(RouteOptions::new().filter("auth")), |admin| {
//!     admin.resource("users", Some(RouteOptions::new().only(&["index", "show"])));
//! });
//!
//! assert!(routes.find(Verb::Get, "admin/users").is_some());
//! assert_eq!(routes.filter_for("admin/users"), Some("auth"));
//! ```
//!
//! ## URIs
//!
//! ```
//! use oxide_routing::Uri;
//!
//! let base = Uri::parse("http://a/b/c/d;p?q").unwrap();
//! assert_eq!(base.join("../../../g").unwrap().to_string(), "http://a/g");
//! ```

mod collection;
mod config;
mod controller;
mod error;
mod host;
mod locator;
mod options;
mod placeholder;
mod resource;
mod reverse;
mod router;
mod target;
mod uri;
mod verb;

pub use collection::{LOCALE_MARKER, Override404, RouteCollection, RouteEntry};
pub use config::{Definition, PlaceholderDefinition, RoutesFile, RoutingConfig};
pub use controller::{Controller, ControllerRegistry};
pub use error::{Result, RouterError};
pub use host::current_subdomain;
pub use locator::{ControllerLocator, FsLocator, NoLocator};
pub use options::RouteOptions;
pub use placeholder::{DEFAULT_PLACEHOLDER, Placeholders};
pub use router::{Dispatch, Endpoint, Redirect, RouteMatch, Router};
pub use target::{Handler, METHOD_SEPARATOR, NAMESPACE_SEPARATOR, RouteTarget, StaticTarget};
pub use uri::{Query, Uri, normalize_path, remove_dot_segments};
pub use verb::Verb;
