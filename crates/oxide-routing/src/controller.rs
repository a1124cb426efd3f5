//! Controllers and the registry that instantiates them.

use std::collections::HashMap;
use std::fmt;
use std::io;
use std::sync::Arc;

use tracing::debug;

use crate::error::{Result, RouterError};
use crate::locator::ControllerLocator;
use crate::router::{Endpoint, RouteMatch};
use crate::target::NAMESPACE_SEPARATOR;

/// A request handler addressed by method name.
pub trait Controller: Send + Sync {
    /// Runs `method` with the positional `params`.
    ///
    /// Returns `None` if the controller has no such method.
    fn invoke(&self, method: &str, params: &[String]) -> Option<String>;
}

type Factory = Arc<dyn Fn() -> Box<dyn Controller> + Send + Sync>;

/// Maps controller identifiers to factories.
///
/// Identifiers are namespace-qualified (`App\Admin\Users`); a leading
/// separator is optional. Each dispatch gets a fresh controller.
///
/// # Example
///
/// ```
/// use oxide_routing::{Controller, ControllerRegistry, Dispatch, RouteCollection, Router, Verb};
///
/// struct Users;
///
/// impl Controller for Users {
///     fn invoke(&self, method: &str, params: &[String]) -> Option<String> {
///         match method {
///             "show" => Some(format!("user {}", params[0])),
///             _ => None,
///         }
///     }
/// }
///
/// let mut registry = ControllerRegistry::new();
/// registry.register("Users", || Users);
///
/// let mut routes = RouteCollection::default();
/// routes.get("users/(:num)", "Users::show/$1", None);
///
/// let Dispatch::Matched(m) = Router::new(&routes, Verb::Get).handle(Some("users/3")).unwrap() else {
///     unreachable!();
/// };
/// assert_eq!(registry.dispatch(&m).unwrap(), "user 3");
/// ```
#[derive(Clone, Default)]
pub struct ControllerRegistry {
    factories: HashMap<String, Factory>,
}

impl ControllerRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a factory under `id`.
    pub fn register<C, F>(&mut self, id: &str, factory: F) -> &mut Self
    where
        C: Controller + 'static,
        F: Fn() -> C + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move || Box::new(factory()) as Box<dyn Controller>);
        self.factories.insert(normalize_id(id), factory);
        self
    }

    /// Returns `true` if `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(&normalize_id(id))
    }

    /// Number of registered controllers.
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Runs the endpoint of a resolved request.
    pub fn dispatch(&self, matched: &RouteMatch) -> Result<String> {
        match &matched.endpoint {
            Endpoint::Closure(handler) => Ok(handler(&matched.params)),
            Endpoint::Controller { controller, method } => {
                let id = normalize_id(controller);
                let factory = self
                    .factories
                    .get(&id)
                    .ok_or_else(|| RouterError::ControllerNotFound(id.clone()))?;

                debug!(controller = %id, %method, "dispatching");
                factory()
                    .invoke(method, &matched.params)
                    .ok_or_else(|| RouterError::MethodNotFound {
                        controller: id,
                        method: method.clone(),
                    })
            }
        }
    }
}

impl fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&String> = self.factories.keys().collect();
        ids.sort();
        f.debug_struct("ControllerRegistry")
            .field("controllers", &ids)
            .finish()
    }
}

/// Locator paths are slash-separated; a namespace exists if some
/// registered id lives under it.
impl ControllerLocator for ControllerRegistry {
    fn is_controller(&self, path: &str) -> io::Result<bool> {
        Ok(self.factories.keys().any(|id| ends_with_path(id, path)))
    }

    fn is_namespace(&self, path: &str) -> io::Result<bool> {
        let prefix = format!("{}{NAMESPACE_SEPARATOR}", to_id(path));
        let nested = format!("{NAMESPACE_SEPARATOR}{prefix}");
        Ok(self
            .factories
            .keys()
            .any(|id| id.starts_with(&prefix) || id.contains(&nested)))
    }
}

fn normalize_id(id: &str) -> String {
    id.trim_start_matches(NAMESPACE_SEPARATOR).to_string()
}

fn to_id(path: &str) -> String {
    path.trim_matches('/').replace('/', &NAMESPACE_SEPARATOR.to_string())
}

/// Matches `Admin/Users` against `Admin\Users` and `App\Admin\Users`.
fn ends_with_path(id: &str, path: &str) -> bool {
    let wanted = to_id(path);
    id == wanted || id.ends_with(&format!("{NAMESPACE_SEPARATOR}{wanted}"))
}
