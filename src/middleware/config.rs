//! Static route configuration for the paywall
//!
//! A [`RouteTable`] maps protected path patterns to the price, network, and
//! recipient each route demands. It is built once at process start, validated
//! eagerly, and read-only afterwards; per-request challenges are recomputed
//! from it so repeated challenges for the same route are identical.

use crate::types::{networks, parse_price, FacilitatorConfig, PaymentRequirement};
use crate::{PaygateError, Result};

/// Payment policy for a single protected route
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    /// Dollar-denominated price string, e.g. `"$0.001"`
    pub price: String,
    /// Network identifier
    pub network: String,
    /// Recipient wallet address, normalized to lowercase
    pub pay_to: String,
    /// Human-readable description of the resource
    pub description: String,
    /// Maximum time allowed for payment completion in seconds
    pub max_timeout_seconds: Option<u32>,
}

impl RoutePolicy {
    /// Create a policy with the default testnet network
    pub fn new(price: impl Into<String>, pay_to: impl Into<String>) -> Self {
        Self {
            price: price.into(),
            network: networks::BASE_SEPOLIA.to_string(),
            // Lowercase to avoid EIP-55 checksum mismatches
            pay_to: pay_to.into().to_lowercase(),
            description: "Payment required".to_string(),
            max_timeout_seconds: None,
        }
    }

    /// Set the network identifier
    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = network.into();
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the maximum payment timeout
    pub fn with_max_timeout_seconds(mut self, seconds: u32) -> Self {
        self.max_timeout_seconds = Some(seconds);
        self
    }

    /// Build the payment requirement for a concrete request path.
    ///
    /// Pure function of this policy; the only per-request input is the
    /// resource path itself.
    pub fn requirement(&self, resource: &str) -> PaymentRequirement {
        PaymentRequirement {
            price: self.price.clone(),
            network: self.network.clone(),
            pay_to: self.pay_to.clone(),
            resource: resource.to_string(),
            description: self.description.clone(),
            max_timeout_seconds: self.max_timeout_seconds,
        }
    }

    fn validate(&self, pattern: &str) -> Result<()> {
        parse_price(&self.price)
            .map_err(|e| PaygateError::config(format!("route {pattern}: {e}")))?;
        if !networks::is_supported(&self.network) {
            return Err(PaygateError::config(format!(
                "route {pattern}: unsupported network {}",
                self.network
            )));
        }
        if !is_address(&self.pay_to) {
            return Err(PaygateError::config(format!(
                "route {pattern}: invalid payTo address {}",
                self.pay_to
            )));
        }
        Ok(())
    }
}

/// App metadata carried alongside the route table, used for log context
#[derive(Debug, Clone)]
pub struct AppMetadata {
    /// Display name of the application
    pub app_name: String,
    /// Logo URL or path
    pub app_logo: Option<String>,
}

impl AppMetadata {
    /// Create metadata with just a name
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            app_logo: None,
        }
    }

    /// Set the logo
    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.app_logo = Some(logo.into());
        self
    }
}

/// A path pattern: an exact path, or a trailing-`/*` prefix glob
#[derive(Debug, Clone, PartialEq)]
enum RoutePattern {
    Exact(String),
    Prefix(String),
}

impl RoutePattern {
    fn parse(pattern: &str) -> Result<Self> {
        if !pattern.starts_with('/') {
            return Err(PaygateError::config(format!(
                "route pattern must start with '/': {pattern}"
            )));
        }
        if let Some(prefix) = pattern.strip_suffix("/*") {
            if prefix.is_empty() {
                return Err(PaygateError::config("route pattern '/*' is too broad"));
            }
            Ok(Self::Prefix(prefix.to_string()))
        } else {
            Ok(Self::Exact(pattern.to_string()))
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(exact) => path == exact,
            Self::Prefix(prefix) => {
                path == prefix
                    || path
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }
}

/// One protected route: the raw pattern as declared, its compiled form, and
/// the policy guarding it. The pattern is compiled once when the route is
/// added; a pattern that failed to compile never matches and is reported by
/// [`RouteTable::validate`].
#[derive(Debug, Clone)]
struct Route {
    pattern: String,
    compiled: Option<RoutePattern>,
    policy: RoutePolicy,
}

/// Static mapping of protected paths to payment policies
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    facilitator: FacilitatorConfig,
    app: Option<AppMetadata>,
}

impl RouteTable {
    /// Create an empty table pointing at a facilitator
    pub fn new(facilitator: FacilitatorConfig) -> Self {
        Self {
            routes: Vec::new(),
            facilitator,
            app: None,
        }
    }

    /// Protect a path pattern with a payment policy.
    ///
    /// Patterns are exact paths (`/api/protected`) or trailing-`/*` prefix
    /// globs (`/api/protected/*`). Invalid patterns are reported by
    /// [`RouteTable::validate`].
    pub fn route(mut self, pattern: impl Into<String>, policy: RoutePolicy) -> Self {
        let pattern = pattern.into();
        let compiled = RoutePattern::parse(&pattern).ok();
        self.routes.push(Route {
            pattern,
            compiled,
            policy,
        });
        self
    }

    /// Attach app metadata
    pub fn with_app(mut self, app: AppMetadata) -> Self {
        self.app = Some(app);
        self
    }

    /// Validate every route and the facilitator config. Called by
    /// [`Paywall::new`](super::Paywall::new); a failing table must not serve.
    pub fn validate(&self) -> Result<()> {
        self.facilitator.validate()?;
        if self.routes.is_empty() {
            return Err(PaygateError::config("route table has no protected routes"));
        }
        for route in &self.routes {
            if route.compiled.is_none() {
                // Re-parse to surface the error message
                RoutePattern::parse(&route.pattern)?;
            }
            route.policy.validate(&route.pattern)?;
        }
        Ok(())
    }

    /// Find the policy protecting a request path, if any.
    ///
    /// Routes are checked in declaration order; the first match wins, so
    /// exactly one policy applies per request. Patterns are compiled when
    /// routes are added, so matching does no parsing.
    pub fn match_route(&self, path: &str) -> Option<&RoutePolicy> {
        self.routes
            .iter()
            .find(|route| {
                route
                    .compiled
                    .as_ref()
                    .is_some_and(|pattern| pattern.matches(path))
            })
            .map(|route| &route.policy)
    }

    /// Facilitator configuration
    pub fn facilitator(&self) -> &FacilitatorConfig {
        &self.facilitator
    }

    /// App metadata, if configured
    pub fn app(&self) -> Option<&AppMetadata> {
        self.app.as_ref()
    }
}

fn is_address(s: &str) -> bool {
    s.len() == 42 && s.starts_with("0x") && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}
