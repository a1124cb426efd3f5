//! Per-route registration options.

use serde::{Deserialize, Deserializer, Serialize};

/// Options attached to a route when it is registered.
///
/// Options given to a [`group`](crate::RouteCollection::group) apply to
/// every route inside it; options passed to an individual registration
/// override the group's key by key (see [`RouteOptions::merge`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RouteOptions {
    /// Namespace prefixed to targets that have none.
    pub namespace: Option<String>,
    /// Only register the route when the current host equals this.
    pub hostname: Option<String>,
    /// Only register the route on these subdomains (`*` for any).
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<Vec<String>>,
    /// Shift back-reference markers so they start at `offset + 1`.
    pub offset: Option<usize>,
    /// Route name used as the bucket key instead of the pattern.
    #[serde(rename = "as")]
    pub name: Option<String>,
    /// Redirect status; marks the route as a redirect.
    pub redirect: Option<u16>,
    /// Filter alias handed to the filter chain on match.
    pub filter: Option<String>,
    /// Resource/presenter controller override.
    pub controller: Option<String>,
    /// Resource/presenter id pattern override.
    pub placeholder: Option<String>,
    /// Resource/presenter actions to keep.
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Option::is_none")]
    pub only: Option<Vec<String>>,
    /// Resource/presenter actions to drop.
    #[serde(deserialize_with = "string_list", skip_serializing_if = "Option::is_none")]
    pub except: Option<Vec<String>>,
    /// Emit POST aliases for update/delete for form-only clients.
    pub websafe: Option<bool>,
}

impl RouteOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the namespace.
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Restricts the route to a hostname.
    #[must_use]
    pub fn hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Restricts the route to a single subdomain.
    #[must_use]
    pub fn subdomain(self, subdomain: impl Into<String>) -> Self {
        self.subdomains([subdomain.into()])
    }

    /// Restricts the route to a set of subdomains.
    #[must_use]
    pub fn subdomains<I, S>(mut self, subdomains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.subdomain = Some(subdomains.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the back-reference offset.
    #[must_use]
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Names the route (the `as` option).
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Marks the route as a redirect with the given status.
    #[must_use]
    pub fn redirect(mut self, status: u16) -> Self {
        self.redirect = Some(status);
        self
    }

    /// Sets the filter alias.
    #[must_use]
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Overrides the resource controller.
    #[must_use]
    pub fn controller(mut self, controller: impl Into<String>) -> Self {
        self.controller = Some(controller.into());
        self
    }

    /// Overrides the resource id pattern.
    #[must_use]
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Keeps only the listed resource actions.
    #[must_use]
    pub fn only(mut self, actions: &[&str]) -> Self {
        self.only = Some(actions.iter().map(|s| (*s).to_string()).collect());
        self
    }

    /// Drops the listed resource actions.
    #[must_use]
    pub fn except(mut self, actions: &[&str]) -> Self {
        self.except = Some(actions.iter().map(|s| (*s).to_string()).collect());
        self
    }

    /// Enables web-safe POST aliases.
    #[must_use]
    pub fn websafe(mut self) -> Self {
        self.websafe = Some(true);
        self
    }

    /// Merges `over` on top of `self`; every key set in `over` wins.
    #[must_use]
    pub fn merge(&self, over: &Self) -> Self {
        fn pick<T: Clone>(base: &Option<T>, over: &Option<T>) -> Option<T> {
            over.clone().or_else(|| base.clone())
        }

        Self {
            namespace: pick(&self.namespace, &over.namespace),
            hostname: pick(&self.hostname, &over.hostname),
            subdomain: pick(&self.subdomain, &over.subdomain),
            offset: pick(&self.offset, &over.offset),
            name: pick(&self.name, &over.name),
            redirect: pick(&self.redirect, &over.redirect),
            filter: pick(&self.filter, &over.filter),
            controller: pick(&self.controller, &over.controller),
            placeholder: pick(&self.placeholder, &over.placeholder),
            only: pick(&self.only, &over.only),
            except: pick(&self.except, &over.except),
            websafe: pick(&self.websafe, &over.websafe),
        }
    }

    /// Returns `true` when web-safe aliases were requested.
    pub fn is_websafe(&self) -> bool {
        self.websafe.unwrap_or(false)
    }
}

/// Accepts either a list of strings or a single comma-separated string.
fn string_list<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(Option::<OneOrMany>::deserialize(deserializer)?.map(|v| match v {
        OneOrMany::One(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        OneOrMany::Many(list) => list,
    }))
}
