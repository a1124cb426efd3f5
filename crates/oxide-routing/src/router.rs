//! Per-request route resolution.

use std::fmt;

use regex::Regex;
use tracing::{debug, trace, warn};

use crate::collection::{Override404, RouteCollection, RouteEntry};
use crate::error::{Result, RouterError};
use crate::locator::{ControllerLocator, NoLocator};
use crate::options::RouteOptions;
use crate::target::{Handler, METHOD_SEPARATOR, NAMESPACE_SEPARATOR, RouteTarget, ucfirst};
use crate::uri::Uri;
use crate::verb::Verb;

static NO_LOCATOR: NoLocator = NoLocator;

/// What a matched request runs.
#[derive(Clone)]
pub enum Endpoint {
    /// A controller method. The controller is fully qualified with a
    /// leading namespace separator.
    Controller {
        /// `\Namespace\Controller`.
        controller: String,
        /// Method name.
        method: String,
    },
    /// A closure route.
    Closure(Handler),
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Controller { controller, method } => f
                .debug_struct("Controller")
                .field("controller", controller)
                .field("method", method)
                .finish(),
            Self::Closure(_) => f.write_str("Closure(<closure>)"),
        }
    }
}

/// A request resolved to an endpoint.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    /// What to run.
    pub endpoint: Endpoint,
    /// Positional parameters.
    pub params: Vec<String>,
    /// Namespace directories consumed by auto-routing, slash-separated
    /// with a trailing slash (`Admin/`).
    pub directory: Option<String>,
    /// Key of the matched route; `None` for default and auto routes.
    pub route_key: Option<String>,
    /// Target after back-reference substitution.
    pub route_target: Option<String>,
    /// Options of the matched route.
    pub route_options: Option<RouteOptions>,
    /// Locale taken from the `{locale}` segment.
    pub locale: Option<String>,
    /// Filter alias from the matched route's own options.
    pub filter: Option<String>,
}

impl RouteMatch {
    fn endpoint(endpoint: Endpoint, params: Vec<String>) -> Self {
        Self {
            endpoint,
            params,
            directory: None,
            route_key: None,
            route_target: None,
            route_options: None,
            locale: None,
            filter: None,
        }
    }

    /// Controller identifier without the leading separator.
    pub fn controller(&self) -> Option<&str> {
        match &self.endpoint {
            Endpoint::Controller { controller, .. } => {
                Some(controller.trim_start_matches(NAMESPACE_SEPARATOR))
            }
            Endpoint::Closure(_) => None,
        }
    }

    /// Method name, for controller endpoints.
    pub fn method(&self) -> Option<&str> {
        match &self.endpoint {
            Endpoint::Controller { method, .. } => Some(method),
            Endpoint::Closure(_) => None,
        }
    }

    /// Returns `true` if a `{locale}` segment was matched.
    pub fn has_locale(&self) -> bool {
        self.locale.is_some()
    }
}

/// A request that should be redirected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Redirect {
    /// Destination path or URI.
    pub target: String,
    /// HTTP status code.
    pub status: u16,
}

impl Redirect {
    /// Resolves the destination against `base`.
    ///
    /// A bare path is taken relative to the site root.
    pub fn location(&self, base: &Uri) -> Result<Uri> {
        let reference = Uri::parse(&self.target)?;
        if reference.is_absolute() || reference.has_authority() {
            return Ok(base.resolve(&reference));
        }
        base.join(&format!("/{}", self.target.trim_start_matches('/')))
    }
}

/// Outcome of [`Router::handle`].
#[derive(Debug, Clone)]
pub enum Dispatch {
    /// Run an endpoint.
    Matched(RouteMatch),
    /// Redirect the client.
    Redirect(Redirect),
    /// Nothing handles the request.
    NotFound,
}

/// Resolves request paths against a borrowed [`RouteCollection`].
pub struct Router<'a> {
    routes: &'a RouteCollection,
    verb: Verb,
    locator: &'a dyn ControllerLocator,
}

impl<'a> Router<'a> {
    /// Creates a router for requests made with `verb`.
    ///
    /// Auto-routing uses [`NoLocator`] until another locator is set.
    pub fn new(routes: &'a RouteCollection, verb: Verb) -> Self {
        Self {
            routes,
            verb,
            locator: &NO_LOCATOR,
        }
    }

    /// Sets the locator used by auto-routing.
    #[must_use]
    pub fn with_locator(mut self, locator: &'a dyn ControllerLocator) -> Self {
        self.locator = locator;
        self
    }

    /// The request verb.
    pub fn verb(&self) -> Verb {
        self.verb
    }

    /// Resolves `uri`.
    ///
    /// An absent or empty path runs the default controller. Otherwise the
    /// routes visible to the verb are tried in order and the first match
    /// wins; auto-routing is the fallback when enabled.
    pub fn handle(&self, uri: Option<&str>) -> Result<Dispatch> {
        let uri = match uri {
            None | Some("") => return self.default_route().map(Dispatch::Matched),
            Some(uri) => uri,
        };

        if let Some(dispatch) = self.check_routes(uri) {
            return Ok(dispatch);
        }

        if !self.routes.should_auto_route() {
            debug!(verb = %self.verb, %uri, "no route matched");
            return Ok(Dispatch::NotFound);
        }

        Ok(self.auto_route(uri))
    }

    /// The configured 404 override, if any. String overrides without a
    /// method run `index`.
    pub fn override_404(&self) -> Option<Endpoint> {
        match self.routes.override_404()? {
            Override404::Controller(target) => {
                let (controller, method) = target
                    .split_once(METHOD_SEPARATOR)
                    .unwrap_or((target.as_str(), "index"));
                Some(Endpoint::Controller {
                    controller: controller.to_string(),
                    method: method.to_string(),
                })
            }
            Override404::Closure(handler) => Some(Endpoint::Closure(handler.clone())),
        }
    }

    /// Splits the default controller into controller and method.
    fn default_parts(&self) -> (&str, &str) {
        let default = self.routes.default_controller();
        // `home/welcome` names the method as well
        match default.split_once('/') {
            Some((c, m)) if !m.is_empty() => (c, m),
            _ => (default, self.routes.default_method()),
        }
    }

    fn default_route(&self) -> Result<RouteMatch> {
        if self.routes.default_controller().is_empty() {
            return Err(RouterError::NoDefaultController);
        }

        let (controller, method) = self.default_parts();

        let controller = if controller.contains(NAMESPACE_SEPARATOR) {
            controller.to_string()
        } else {
            format!("{}{}", self.routes.default_namespace(), ucfirst(controller))
        };

        debug!(%controller, %method, "using the default controller");
        Ok(RouteMatch::endpoint(
            Endpoint::Controller {
                controller: self.translate(&qualified(&controller)),
                method: self.translate(method),
            },
            Vec::new(),
        ))
    }

    fn check_routes(&self, uri: &str) -> Option<Dispatch> {
        let uri = if uri == "/" {
            uri
        } else {
            uri.trim_start_matches(['/', ' '])
        };

        for entry in self.routes.routes(self.verb) {
            trace!(key = %entry.name, pattern = %entry.from, %uri, "testing route");
            let Some(caps) = entry.regex().captures(uri) else {
                continue;
            };

            if let Some(status) = entry.redirect() {
                let target = entry.target.to_string();
                debug!(%uri, %target, status, "route redirects");
                return Some(Dispatch::Redirect(Redirect { target, status }));
            }

            let locale = entry
                .locale_segment()
                .and_then(|i| uri.split('/').nth(i))
                .map(str::to_string);

            let captures: Vec<String> = caps
                .iter()
                .skip(1)
                .map(|m| m.map_or_else(String::new, |m| m.as_str().to_string()))
                .collect();

            let (endpoint, params, rewritten) = match &entry.target {
                RouteTarget::Dynamic(handler) => (Endpoint::Closure(handler.clone()), captures, None),
                RouteTarget::Static(target) => {
                    let rewritten = rewrite_target(entry, target, uri);
                    let (endpoint, params) = self.split_target(&rewritten);
                    (endpoint, params, Some(rewritten))
                }
            };

            debug!(verb = %self.verb, %uri, key = %entry.name, ?endpoint, "route matched");

            return Some(Dispatch::Matched(RouteMatch {
                endpoint,
                params,
                directory: None,
                route_key: Some(entry.name.clone()),
                route_target: rewritten,
                route_options: Some(entry.options.clone()),
                locale,
                filter: entry.options.filter.clone(),
            }));
        }

        None
    }

    /// Splits `\NS\Ctrl::method/p1/p2` into an endpoint and params.
    fn split_target(&self, target: &str) -> (Endpoint, Vec<String>) {
        let mut parts = target.split('/');
        let head = parts.next().unwrap_or_default();
        let params = parts.map(str::to_string).collect();

        let (controller, method) = match head.split_once(METHOD_SEPARATOR) {
            Some((c, m)) if !m.is_empty() => (c, m),
            Some((c, _)) => (c, self.routes.default_method()),
            None => (head, self.routes.default_method()),
        };

        let endpoint = Endpoint::Controller {
            controller: self.translate(controller),
            method: self.translate(method),
        };
        (endpoint, params)
    }

    fn auto_route(&self, uri: &str) -> Dispatch {
        let mut segments: Vec<&str> = uri.split('/').filter(|s| !s.is_empty()).collect();

        let directory = match self.consume_directories(&mut segments) {
            Ok(directory) => directory,
            Err(err) => {
                warn!(%uri, error = %err, "controller lookup failed");
                return Dispatch::NotFound;
            }
        };

        let mut segments = segments.into_iter();
        let (controller, method) = match segments.next() {
            Some(controller) => (
                ucfirst(controller),
                segments
                    .next()
                    .unwrap_or_else(|| self.routes.default_method())
                    .to_string(),
            ),
            None => {
                let (controller, method) = self.default_parts();
                (ucfirst(controller), method.to_string())
            }
        };
        let params: Vec<String> = segments.map(str::to_string).collect();

        let controller = qualified(&format!(
            "{}{}{}",
            self.routes.default_namespace(),
            directory.replace('/', &NAMESPACE_SEPARATOR.to_string()),
            controller
        ));

        if self.verb != Verb::Cli && self.is_shadowed(&controller, &method) {
            debug!(%uri, %controller, %method, "auto-route shadowed by an explicit route");
            return Dispatch::NotFound;
        }

        debug!(%uri, %controller, %method, "auto-routed");
        let mut matched = RouteMatch::endpoint(
            Endpoint::Controller {
                controller: self.translate(&controller),
                method: self.translate(&method),
            },
            params,
        );
        matched.directory = (!directory.is_empty()).then_some(directory);
        Dispatch::Matched(matched)
    }

    /// Moves leading segments that name namespaces (and not controllers)
    /// into the returned directory.
    fn consume_directories(&self, segments: &mut Vec<&str>) -> std::io::Result<String> {
        let mut directory = String::new();

        while let Some(segment) = segments.first() {
            let name = ucfirst(&segment.replace('.', ""));
            let candidate = format!("{directory}{name}");
            if name.is_empty()
                || self.locator.is_controller(&candidate)?
                || !self.locator.is_namespace(&candidate)?
            {
                break;
            }
            directory = format!("{candidate}/");
            segments.remove(0);
        }

        Ok(directory)
    }

    /// Returns `true` if an explicit CLI or verb-agnostic route already
    /// targets `controller::method`.
    fn is_shadowed(&self, controller: &str, method: &str) -> bool {
        let controller = controller
            .trim_start_matches(NAMESPACE_SEPARATOR)
            .to_lowercase();
        let wanted = format!("{controller}{METHOD_SEPARATOR}{}", method.to_lowercase());

        [Verb::Cli, Verb::Any]
            .iter()
            .flat_map(|v| self.routes.entries(*v))
            .filter_map(|e| e.target.as_static())
            .map(|t| t.trim_start_matches(NAMESPACE_SEPARATOR).to_lowercase())
            .any(|t| t.starts_with(&wanted) || t == controller)
    }

    fn translate(&self, name: &str) -> String {
        if self.routes.should_translate_uri_dashes() {
            name.replace('-', "_")
        } else {
            name.to_string()
        }
    }
}

/// Gives a controller identifier exactly one leading separator.
fn qualified(controller: &str) -> String {
    format!(
        "{NAMESPACE_SEPARATOR}{}",
        controller.trim_start_matches(NAMESPACE_SEPARATOR)
    )
}

/// Applies the matched pattern's captures to a static target.
fn rewrite_target(entry: &RouteEntry, target: &str, uri: &str) -> String {
    let has_markers = target.contains('$');
    let has_group = entry.from.contains('(');

    if has_markers && has_group {
        let replaced = entry
            .regex()
            .replace(uri, braced_markers(target).as_str())
            .into_owned();

        if !entry.from.contains('/') {
            return replaced;
        }

        // `admin/users/(.*)` → `Admin/Users::show/$1`: the literal prefix
        // names namespaces, not path segments
        let prefix = entry.from[..entry.from.find('(').unwrap_or(0)].trim_end_matches('/');
        if prefix.is_empty() {
            return replaced;
        }
        let namespaced = prefix.replace('/', &NAMESPACE_SEPARATOR.to_string());
        return match replaced.split_once(METHOD_SEPARATOR) {
            Some((controller, rest)) => format!(
                "{}{METHOD_SEPARATOR}{rest}",
                controller.replace(prefix, &namespaced)
            ),
            None => replaced.replace(prefix, &namespaced),
        };
    }

    if target.contains('/') {
        if let Some((controller, method)) = target.split_once(METHOD_SEPARATOR) {
            return format!(
                "{}{METHOD_SEPARATOR}{method}",
                controller.replace('/', &NAMESPACE_SEPARATOR.to_string())
            );
        }
    }

    target.to_string()
}

/// Rewrites `$1` as `${1}` so a following letter is not read as part of
/// the group name.
fn braced_markers(target: &str) -> String {
    static MARKER: std::sync::LazyLock<Regex> = std::sync::LazyLock::new(|| {
        Regex::new(r"\$(\d+)").expect("back-reference marker regex")
    });
    MARKER.replace_all(target, "$${${1}}").into_owned()
}
