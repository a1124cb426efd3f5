//! Routing configuration and JSON route definition files.
//!
//! A definition file is an ordered list of registration records, replayed
//! against a fresh [`RouteCollection`] in file order:
//!
//! ```json
//! {
//!   "config": { "default_namespace": "App\\Controllers", "auto_route": false },
//!   "placeholders": [{ "tag": "uuid", "pattern": "[0-9a-f-]{36}" }],
//!   "routes": [
//!     { "kind": "route", "verbs": ["get"], "from": "/", "to": "Home::index" },
//!     { "kind": "resource", "name": "photos" },
//!     { "kind": "group", "prefix": "admin", "options": { "filter": "auth" },
//!       "routes": [{ "kind": "route", "verbs": ["get"], "from": "users", "to": "Admin\\Users::index" }] }
//!   ]
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::collection::RouteCollection;
use crate::error::Result;
use crate::options::RouteOptions;
use crate::placeholder::DEFAULT_PLACEHOLDER;
use crate::verb::Verb;

/// Table-wide routing settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutingConfig {
    /// Namespace applied to targets registered without one.
    pub default_namespace: String,
    /// Controller used for the empty path and by auto-routing.
    pub default_controller: String,
    /// Method used when a target or URI names none.
    pub default_method: String,
    /// Placeholder tag used for resource ids.
    pub default_constraint: String,
    /// Translate `-` to `_` in resolved controller and method names.
    pub translate_uri_dashes: bool,
    /// Fall back to segment-based routing when nothing matches.
    pub auto_route: bool,
    /// Substituted for `{locale}` when reverse routing.
    pub default_locale: String,
    /// Current environment; gates `environment` blocks.
    pub environment: String,
    /// Current request host; gates hostname and subdomain routes.
    pub host: Option<String>,
    /// `Controller::method` to run instead of a plain 404.
    pub override_404: Option<String>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            default_namespace: "\\".to_string(),
            default_controller: "Home".to_string(),
            default_method: "index".to_string(),
            default_constraint: DEFAULT_PLACEHOLDER.to_string(),
            translate_uri_dashes: false,
            auto_route: true,
            default_locale: "en".to_string(),
            environment: "production".to_string(),
            host: None,
            override_404: None,
        }
    }
}

impl RoutingConfig {
    /// Sets the current host.
    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the current environment.
    #[must_use]
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.environment = environment.into();
        self
    }
}

/// A custom placeholder declared in a definition file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderDefinition {
    /// Tag used as `:tag` in patterns.
    pub tag: String,
    /// Regex fragment.
    pub pattern: String,
}

/// One registration record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Definition {
    /// A route for one or more verbs (`*` for any).
    Route {
        /// Verbs to register under.
        #[serde(default = "any_verb")]
        verbs: Vec<String>,
        /// Pattern.
        from: String,
        /// Static target.
        to: String,
        /// Options.
        #[serde(default)]
        options: Option<RouteOptions>,
    },
    /// A redirect route.
    Redirect {
        /// Pattern.
        from: String,
        /// Destination path or route name.
        to: String,
        /// Status code.
        #[serde(default = "found")]
        status: u16,
    },
    /// A RESTful resource.
    Resource {
        /// Resource name.
        name: String,
        /// Options.
        #[serde(default)]
        options: Option<RouteOptions>,
    },
    /// A presenter (form-oriented resource).
    Presenter {
        /// Presenter name.
        name: String,
        /// Options.
        #[serde(default)]
        options: Option<RouteOptions>,
    },
    /// Nested definitions sharing a prefix and options.
    Group {
        /// Prefix joined to every nested pattern.
        prefix: String,
        /// Options applied to nested routes.
        #[serde(default)]
        options: Option<RouteOptions>,
        /// Nested definitions.
        routes: Vec<Definition>,
    },
    /// Definitions only registered in one environment.
    Environment {
        /// Environment name.
        name: String,
        /// Nested definitions.
        routes: Vec<Definition>,
    },
}

fn any_verb() -> Vec<String> {
    vec!["*".to_string()]
}

const fn found() -> u16 {
    302
}

/// A complete definition file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RoutesFile {
    /// Table-wide settings.
    pub config: RoutingConfig,
    /// Custom placeholders, registered before any route.
    pub placeholders: Vec<PlaceholderDefinition>,
    /// Registration records, in order.
    pub routes: Vec<Definition>,
}

impl RoutesFile {
    /// Reads a definition file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading route definitions");
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Decodes a definition file from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Builds a route collection from this file.
    pub fn into_collection(self) -> Result<RouteCollection> {
        let mut routes = RouteCollection::new(self.config);
        for placeholder in self.placeholders {
            routes.add_placeholder(placeholder.tag, placeholder.pattern);
        }
        routes.load(&self.routes)?;
        Ok(routes)
    }
}

impl RouteCollection {
    /// Replays registration records against this collection.
    ///
    /// Fails on the first unknown verb; records before it stay registered.
    pub fn load(&mut self, definitions: &[Definition]) -> Result<&mut Self> {
        for definition in definitions {
            self.load_one(definition)?;
        }
        Ok(self)
    }

    fn load_one(&mut self, definition: &Definition) -> Result<()> {
        match definition {
            Definition::Route {
                verbs,
                from,
                to,
                options,
            } => {
                let verbs = verbs
                    .iter()
                    .map(|v| v.parse::<Verb>())
                    .collect::<Result<Vec<_>>>()?;
                for verb in verbs {
                    self.register(verb, from, to.as_str(), options.clone());
                }
            }
            Definition::Redirect { from, to, status } => {
                self.add_redirect(from, to, *status);
            }
            Definition::Resource { name, options } => {
                self.resource(name, options.clone());
            }
            Definition::Presenter { name, options } => {
                self.presenter(name, options.clone());
            }
            Definition::Group {
                prefix,
                options,
                routes,
            } => {
                let mut outcome = Ok(());
                self.group(prefix, options.clone(), |group| {
                    outcome = group.load(routes).map(|_| ());
                });
                outcome?;
            }
            Definition::Environment { name, routes } => {
                let mut outcome = Ok(());
                self.environment(name, |env| {
                    outcome = env.load(routes).map(|_| ());
                });
                outcome?;
            }
        }
        Ok(())
    }
}
