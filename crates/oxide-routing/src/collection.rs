//! The route table.
//!
//! Routes are registered once, at boot, into verb buckets. A
//! [`Router`](crate::Router) then borrows the finished collection for each
//! request.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use tracing::{debug, warn};

use crate::config::RoutingConfig;
use crate::host::{self, Gate};
use crate::options::RouteOptions;
use crate::placeholder::Placeholders;
use crate::target::{Handler, NAMESPACE_SEPARATOR, RouteTarget};
use crate::verb::Verb;

/// Marker for the locale segment of a pattern.
pub const LOCALE_MARKER: &str = "{locale}";

static MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\d+").expect("back-reference marker regex"));

/// A registered route.
#[derive(Debug, Clone)]
pub struct RouteEntry {
    /// Bucket the route lives in.
    pub verb: Verb,
    /// Bucket key: the `as` option, or the pattern.
    pub name: String,
    /// Pattern after group prefixing and placeholder substitution.
    pub from: String,
    /// Dispatch target.
    pub target: RouteTarget,
    /// Effective options (group options merged with the route's).
    pub options: RouteOptions,
    regex: Regex,
    locale_segment: Option<usize>,
}

impl RouteEntry {
    /// The anchored, compiled pattern.
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Index of the `{locale}` segment within the pattern, if any.
    pub fn locale_segment(&self) -> Option<usize> {
        self.locale_segment
    }

    /// Redirect status, if this route is a redirect.
    pub fn redirect(&self) -> Option<u16> {
        self.options.redirect
    }
}

#[derive(Debug, Clone, Default)]
struct Bucket {
    entries: Vec<RouteEntry>,
    index: HashMap<String, usize>,
}

impl Bucket {
    fn get(&self, name: &str) -> Option<&RouteEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    fn insert(&mut self, entry: RouteEntry) {
        match self.index.get(&entry.name) {
            Some(&i) => self.entries[i] = entry,
            None => {
                self.index.insert(entry.name.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }
}

/// What to run when nothing matches.
#[derive(Clone)]
pub enum Override404 {
    /// `Controller::method`.
    Controller(String),
    /// A closure.
    Closure(Handler),
}

impl std::fmt::Debug for Override404 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Controller(s) => f.debug_tuple("Controller").field(s).finish(),
            Self::Closure(_) => f.write_str("Closure(<closure>)"),
        }
    }
}

/// The verb-partitioned route table.
///
/// # Example
///
/// ```
/// use oxide_routing::{Dispatch, RouteCollection, Router, RoutingConfig, Verb};
///
/// let mut routes = RouteCollection::new(RoutingConfig::default());
/// routes
///     .get("/", "Home::index", None)
///     .get("users/(:num)", "Users::show/$1", None);
///
/// let router = Router::new(&routes, Verb::Get);
/// match router.handle(Some("users/42")).unwrap() {
///     Dispatch::Matched(m) => {
///         assert_eq!(m.controller(), Some("Users"));
///         assert_eq!(m.method(), Some("show"));
///         assert_eq!(m.params, vec!["42".to_string()]);
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RouteCollection {
    config: RoutingConfig,
    placeholders: Placeholders,
    buckets: HashMap<Verb, Bucket>,
    route_options: HashMap<String, RouteOptions>,
    redirects: HashMap<String, u16>,
    group: Option<String>,
    group_options: Option<RouteOptions>,
    override_404: Option<Override404>,
}

impl Default for RouteCollection {
    fn default() -> Self {
        Self::new(RoutingConfig::default())
    }
}

impl RouteCollection {
    /// Creates an empty collection.
    pub fn new(config: RoutingConfig) -> Self {
        let override_404 = config.override_404.clone().map(Override404::Controller);
        let mut config = config;
        config.default_namespace = normalize_namespace(&config.default_namespace);

        Self {
            config,
            placeholders: Placeholders::new(),
            buckets: Verb::ALL.iter().map(|v| (*v, Bucket::default())).collect(),
            route_options: HashMap::new(),
            redirects: HashMap::new(),
            group: None,
            group_options: None,
            override_404,
        }
    }

    /// Returns the table-wide configuration.
    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Returns the placeholder registry.
    pub fn placeholders(&self) -> &Placeholders {
        &self.placeholders
    }

    /// Registers or overrides a placeholder.
    pub fn add_placeholder(
        &mut self,
        tag: impl Into<String>,
        pattern: impl Into<String>,
    ) -> &mut Self {
        self.placeholders.register(tag, pattern);
        self
    }

    /// Sets the default namespace; it always ends in one separator.
    pub fn set_default_namespace(&mut self, namespace: &str) -> &mut Self {
        self.config.default_namespace = normalize_namespace(namespace);
        self
    }

    /// Sets the default controller.
    pub fn set_default_controller(&mut self, controller: impl Into<String>) -> &mut Self {
        self.config.default_controller = controller.into();
        self
    }

    /// Sets the default method.
    pub fn set_default_method(&mut self, method: impl Into<String>) -> &mut Self {
        self.config.default_method = method.into();
        self
    }

    /// Sets the placeholder used for resource ids. Unknown tags are ignored.
    pub fn set_default_constraint(&mut self, tag: &str) -> &mut Self {
        if self.placeholders.contains(tag) {
            self.config.default_constraint = tag.to_string();
        }
        self
    }

    /// Enables `-` to `_` translation of resolved names.
    pub fn set_translate_uri_dashes(&mut self, value: bool) -> &mut Self {
        self.config.translate_uri_dashes = value;
        self
    }

    /// Enables or disables the auto-route fallback.
    pub fn set_auto_route(&mut self, value: bool) -> &mut Self {
        self.config.auto_route = value;
        self
    }

    /// Sets (or clears) the 404 override.
    pub fn set_404_override(&mut self, value: Option<Override404>) -> &mut Self {
        self.override_404 = value;
        self
    }

    /// Returns the 404 override.
    pub fn override_404(&self) -> Option<&Override404> {
        self.override_404.as_ref()
    }

    /// Default namespace, ending in a separator.
    pub fn default_namespace(&self) -> &str {
        &self.config.default_namespace
    }

    /// Default controller.
    pub fn default_controller(&self) -> &str {
        &self.config.default_controller
    }

    /// Default method.
    pub fn default_method(&self) -> &str {
        &self.config.default_method
    }

    /// Returns `true` when resolved names translate dashes.
    pub fn should_translate_uri_dashes(&self) -> bool {
        self.config.translate_uri_dashes
    }

    /// Returns `true` when auto-routing is enabled.
    pub fn should_auto_route(&self) -> bool {
        self.config.auto_route
    }

    /// Registers a route for every verb.
    pub fn add(
        &mut self,
        from: &str,
        to: impl Into<RouteTarget>,
        options: Option<RouteOptions>,
    ) -> &mut Self {
        self.register(Verb::Any, from, to, options)
    }

    /// Registers several verb-agnostic routes sharing options.
    pub fn map<T>(&mut self, routes: &[(&str, T)], options: Option<RouteOptions>) -> &mut Self
    where
        T: Clone + Into<RouteTarget>,
    {
        for (from, to) in routes {
            self.register(Verb::Any, from, to.clone(), options.clone());
        }
        self
    }

    /// Registers the same route under several verbs.
    pub fn match_verbs(
        &mut self,
        verbs: &[Verb],
        from: &str,
        to: impl Into<RouteTarget>,
        options: Option<RouteOptions>,
    ) -> &mut Self {
        let to = to.into();
        for verb in verbs {
            self.register(*verb, from, to.clone(), options.clone());
        }
        self
    }

    /// Registers a GET route.
    pub fn get(
        &mut self,
        from: &str,
        to: impl Into<RouteTarget>,
        options: Option<RouteOptions>,
    ) -> &mut Self {
        self.register(Verb::Get, from, to, options)
    }

    /// Registers a POST route.
    pub fn post(
        &mut self,
        from: &str,
        to: impl Into<RouteTarget>,
        options: Option<RouteOptions>,
    ) -> &mut Self {
        self.register(Verb::Post, from, to, options)
    }

    /// Registers a PUT route.
    pub fn put(
        &mut self,
        from: &str,
        to: impl Into<RouteTarget>,
        options: Option<RouteOptions>,
    ) -> &mut Self {
        self.register(Verb::Put, from, to, options)
    }

    /// Registers a DELETE route.
    pub fn delete(
        &mut self,
        from: &str,
        to: impl Into<RouteTarget>,
        options: Option<RouteOptions>,
    ) -> &mut Self {
        self.register(Verb::Delete, from, to, options)
    }

    /// Registers a HEAD route.
    pub fn head(
        &mut self,
        from: &str,
        to: impl Into<RouteTarget>,
        options: Option<RouteOptions>,
    ) -> &mut Self {
        self.register(Verb::Head, from, to, options)
    }

    /// Registers a PATCH route.
    pub fn patch(
        &mut self,
        from: &str,
        to: impl Into<RouteTarget>,
        options: Option<RouteOptions>,
    ) -> &mut Self {
        self.register(Verb::Patch, from, to, options)
    }

    /// Registers an OPTIONS route.
    pub fn options(
        &mut self,
        from: &str,
        to: impl Into<RouteTarget>,
        options: Option<RouteOptions>,
    ) -> &mut Self {
        self.register(Verb::Options, from, to, options)
    }

    /// Registers a command-line route.
    pub fn cli(
        &mut self,
        from: &str,
        to: impl Into<RouteTarget>,
        options: Option<RouteOptions>,
    ) -> &mut Self {
        self.register(Verb::Cli, from, to, options)
    }

    /// Registers a redirect from `from` to `to`.
    ///
    /// If `to` names an existing verb-agnostic or GET route, that route's
    /// pattern becomes the destination.
    pub fn add_redirect(&mut self, from: &str, to: &str, status: u16) -> &mut Self {
        let destination = [Verb::Any, Verb::Get]
            .iter()
            .find_map(|v| self.bucket(*v).get(to))
            .map_or_else(|| to.to_string(), |entry| entry.from.clone());

        self.register(
            Verb::Any,
            from,
            destination,
            Some(RouteOptions::new().redirect(status)),
        )
    }

    /// Registers the routes added by `body` under a shared prefix.
    ///
    /// The prefix is joined to any enclosing group's prefix and `options`
    /// are merged over the enclosing group's options. Both are restored
    /// once `body` returns, so groups nest freely.
    pub fn group<F>(&mut self, prefix: &str, options: Option<RouteOptions>, body: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        let old_group = self.group.clone();
        let old_options = self.group_options.clone();

        let prefix = prefix.trim_matches('/');
        self.group = Some(match old_group.as_deref() {
            Some(outer) if !outer.is_empty() => format!("{outer}/{prefix}"),
            _ => prefix.to_string(),
        });

        if let Some(options) = options {
            self.group_options = Some(match &old_options {
                Some(outer) => outer.merge(&options),
                None => options,
            });
        }

        body(self);

        self.group = old_group;
        self.group_options = old_options;
        self
    }

    /// Runs `body` only in the named environment.
    pub fn environment<F>(&mut self, name: &str, body: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        if self.config.environment == name {
            body(self);
        }
        self
    }

    /// Registers a route under `verb`.
    pub fn register(
        &mut self,
        verb: Verb,
        from: &str,
        to: impl Into<RouteTarget>,
        options: Option<RouteOptions>,
    ) -> &mut Self {
        self.create(verb, from, to.into(), options.unwrap_or_default());
        self
    }

    fn create(&mut self, verb: Verb, from: &str, to: RouteTarget, options: RouteOptions) {
        let from = match self.group.as_deref() {
            Some(group) if !group.is_empty() => format!("{group}/{from}"),
            _ => from.to_string(),
        };
        let mut from = sanitize(&from);
        if from != "/" {
            from = from.trim_matches('/').to_string();
        }

        let options = match &self.group_options {
            Some(group) => group.merge(&options),
            None => options,
        };

        let overwrite = match host::check(&options, self.config.host.as_deref()) {
            Gate::Closed => {
                debug!(%verb, %from, "route gated out by host restriction");
                return;
            }
            Gate::Satisfied => true,
            Gate::Open => false,
        };

        let mut to = to;
        if let (Some(offset), RouteTarget::Static(target)) = (options.offset, &to) {
            to = RouteTarget::Static(shift_markers(target, offset));
        }

        let from = self.placeholders.substitute(&from);

        if let RouteTarget::Static(target) = &to {
            if options.redirect.is_none() {
                to = RouteTarget::Static(self.qualify_target(target, options.namespace.as_deref()));
            }
        }

        let name = options.name.clone().unwrap_or_else(|| from.clone());

        if self.bucket(verb).contains(&name) && !overwrite {
            debug!(%verb, %name, "route already registered, keeping the first");
            return;
        }

        let locale_segment = from
            .trim_start_matches('/')
            .split('/')
            .position(|segment| segment == LOCALE_MARKER);
        let pattern = from.replace(LOCALE_MARKER, "[^/]+");
        let regex = match Regex::new(&format!("^(?:{pattern})$")) {
            Ok(regex) => regex,
            Err(err) => {
                warn!(%verb, %from, error = %err, "invalid route pattern, skipping");
                return;
            }
        };

        debug!(%verb, %name, %from, target = %to, "registered route");

        self.route_options.insert(from.clone(), options.clone());
        if let Some(status) = options.redirect {
            self.redirects.insert(name.clone(), status);
            self.redirects.insert(from.clone(), status);
        }

        self.bucket_mut(verb).insert(RouteEntry {
            verb,
            name,
            from,
            target: to,
            options,
            regex,
            locale_segment,
        });
    }

    /// Prefixes a namespace-less target and gives it one leading separator.
    fn qualify_target(&self, target: &str, namespace: Option<&str>) -> String {
        let target = if target.starts_with(NAMESPACE_SEPARATOR) {
            target.to_string()
        } else {
            let namespace = namespace.unwrap_or(&self.config.default_namespace);
            let namespace = namespace.trim_matches(NAMESPACE_SEPARATOR);
            if namespace.is_empty() {
                target.to_string()
            } else {
                format!("{namespace}{NAMESPACE_SEPARATOR}{target}")
            }
        };

        format!(
            "{NAMESPACE_SEPARATOR}{}",
            target.trim_start_matches(NAMESPACE_SEPARATOR)
        )
    }

    fn bucket(&self, verb: Verb) -> &Bucket {
        &self.buckets[&verb]
    }

    fn bucket_mut(&mut self, verb: Verb) -> &mut Bucket {
        self.buckets.entry(verb).or_default()
    }

    /// Routes visible to `verb`, in match order.
    ///
    /// The verb's own bucket comes first, followed by verb-agnostic routes
    /// whose key it does not already use.
    pub fn routes(&self, verb: Verb) -> Vec<&RouteEntry> {
        let own = self.bucket(verb);
        let mut routes: Vec<&RouteEntry> = own.entries.iter().collect();

        if verb != Verb::Any {
            routes.extend(
                self.bucket(Verb::Any)
                    .entries
                    .iter()
                    .filter(|e| !own.contains(&e.name)),
            );
        }

        routes
    }

    /// Entries registered directly under `verb`.
    pub fn entries(&self, verb: Verb) -> &[RouteEntry] {
        &self.bucket(verb).entries
    }

    /// Looks up a route by bucket key.
    pub fn find(&self, verb: Verb, name: &str) -> Option<&RouteEntry> {
        self.bucket(verb).get(name)
    }

    /// Iterates over every registered route, bucket by bucket.
    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        Verb::ALL.iter().flat_map(|v| self.bucket(*v).entries.iter())
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.buckets.values().map(|b| b.entries.len()).sum()
    }

    /// Returns `true` if no route is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Options stored for a pattern.
    pub fn route_options(&self, from: &str) -> Option<&RouteOptions> {
        self.route_options.get(from)
    }

    /// Returns `true` if the pattern has a filter alias.
    pub fn is_filtered(&self, from: &str) -> bool {
        self.filter_for(from).is_some()
    }

    /// Filter alias stored for a pattern; the last registration of the
    /// pattern under any verb wins.
    pub fn filter_for(&self, from: &str) -> Option<&str> {
        self.route_options
            .get(from)
            .and_then(|o| o.filter.as_deref())
    }

    /// Returns `true` if `key` (a route name or pattern) is a redirect.
    pub fn is_redirect(&self, key: &str) -> bool {
        self.redirect_code(key).is_some()
    }

    /// Redirect status for `key`, if it is a redirect.
    pub fn redirect_code(&self, key: &str) -> Option<u16> {
        self.bucket(Verb::Any)
            .entries
            .iter()
            .find(|e| e.name == key || e.from == key)
            .and_then(RouteEntry::redirect)
            .or_else(|| self.redirects.get(key).copied())
    }

    /// Removes every route, keeping configuration and placeholders.
    pub fn reset_routes(&mut self) -> &mut Self {
        self.buckets = Verb::ALL.iter().map(|v| (*v, Bucket::default())).collect();
        self.route_options.clear();
        self.redirects.clear();
        self
    }
}

/// Trims separators and appends exactly one.
fn normalize_namespace(namespace: &str) -> String {
    let trimmed = sanitize(namespace);
    format!(
        "{}{NAMESPACE_SEPARATOR}",
        trimmed.trim_end_matches(NAMESPACE_SEPARATOR)
    )
}

/// Strips control characters.
fn sanitize(s: &str) -> String {
    s.chars().filter(|c| !c.is_control()).collect()
}

/// Renumbers back-reference markers sequentially from `offset + 1`.
fn shift_markers(target: &str, offset: usize) -> String {
    let mut next = offset;
    MARKER
        .replace_all(target, |_: &Captures<'_>| {
            next += 1;
            format!("${next}")
        })
        .into_owned()
}
