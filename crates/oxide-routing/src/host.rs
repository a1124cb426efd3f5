//! Hostname and subdomain gating for route registration.

use crate::options::RouteOptions;

/// Outcome of checking a route's host restrictions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Gate {
    /// The route has no host restriction.
    Open,
    /// The restriction is satisfied; the route may replace an existing one.
    Satisfied,
    /// The restriction fails; the route is not registered.
    Closed,
}

/// Checks `options.hostname`, then `options.subdomain`, against `host`.
///
/// A missing host means a command-line request: hostname restrictions pass,
/// subdomain restrictions never do.
pub(crate) fn check(options: &RouteOptions, host: Option<&str>) -> Gate {
    if let Some(hostname) = options.hostname.as_deref().filter(|h| !h.is_empty()) {
        return match host {
            Some(current) if !bare_host(current).eq_ignore_ascii_case(hostname) => Gate::Closed,
            _ => Gate::Satisfied,
        };
    }

    if let Some(subdomains) = options.subdomain.as_ref().filter(|s| !s.is_empty()) {
        let Some(current) = host.and_then(current_subdomain) else {
            return Gate::Closed;
        };

        let allowed = subdomains
            .iter()
            .any(|s| s == "*" || s.eq_ignore_ascii_case(&current));
        return if allowed { Gate::Satisfied } else { Gate::Closed };
    }

    Gate::Open
}

/// Strips a scheme, port and path from a `Host`-style string.
fn bare_host(host: &str) -> &str {
    let host = host.split_once("://").map_or(host, |(_, rest)| rest);
    let host = host.split(['/', '?', '#']).next().unwrap_or(host);
    host.rsplit_once(':')
        .filter(|(_, port)| port.chars().all(|c| c.is_ascii_digit()))
        .map_or(host, |(name, _)| name)
}

/// Determines the subdomain of `host`, if it has one.
///
/// A leading `www` is ignored, as are the top-level domain and a `co`
/// second-level label (`example.co.uk`).
///
/// # Example
///
/// ```
/// use oxide_routing::current_subdomain;
///
/// assert_eq!(current_subdomain("api.example.com").as_deref(), Some("api"));
/// assert_eq!(current_subdomain("www.example.com"), None);
/// assert_eq!(current_subdomain("shop.example.co.uk").as_deref(), Some("shop"));
/// ```
pub fn current_subdomain(host: &str) -> Option<String> {
    let mut labels: Vec<&str> = bare_host(host).split('.').filter(|l| !l.is_empty()).collect();

    if labels.first() == Some(&"www") {
        labels.remove(0);
    }
    labels.pop();
    if labels.last() == Some(&"co") {
        labels.pop();
    }

    if labels.len() < 2 {
        return None;
    }

    Some(labels[0].to_string())
}
