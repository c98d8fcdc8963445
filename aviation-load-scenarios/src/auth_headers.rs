//! Authentication header selection
//!
//! Calls that go straight to the router or a subgraph service carry
//! trust-asserted identity headers, because nothing upstream has verified a
//! token. Calls through the gateway carry only the bearer token; the gateway
//! verifies it and injects the identity headers itself.

use crate::identity::IdentityContext;
use aviation_load_config::EndpointsConfig;
use aviation_load_http::Headers;

pub const AUTHORIZATION: &str = "Authorization";
pub const X_ORG_ID: &str = "x-org-id";
pub const X_USER_SUB: &str = "x-user-sub";
pub const X_ORG_NAME: &str = "x-org-name";

/// Which identity headers a target accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderStrategy {
    /// Bearer token (if any) plus `x-org-id`, `x-user-sub`, `x-org-name`
    Direct,
    /// Bearer token only
    BearerOnly,
}

impl HeaderStrategy {
    /// `BearerOnly` for the configured gateway, `Direct` for everything else
    pub fn for_target(url: &str, endpoints: &EndpointsConfig) -> Self {
        if endpoints.is_gateway(url) {
            HeaderStrategy::BearerOnly
        } else {
            HeaderStrategy::Direct
        }
    }
}

/// A GraphQL endpoint together with the header strategy it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScenarioTarget {
    pub url: String,
    pub strategy: HeaderStrategy,
}

impl ScenarioTarget {
    pub fn new(url: impl Into<String>, strategy: HeaderStrategy) -> Self {
        Self {
            url: url.into(),
            strategy,
        }
    }

    /// Target whose strategy is derived from the configured gateway URL
    pub fn resolve(url: impl Into<String>, endpoints: &EndpointsConfig) -> Self {
        let url = url.into();
        let strategy = HeaderStrategy::for_target(&url, endpoints);
        Self { url, strategy }
    }
}

/// Credentials available to a scenario call
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthContext<'a> {
    pub access_token: Option<&'a str>,
    pub identity: Option<&'a IdentityContext>,
}

impl<'a> AuthContext<'a> {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_token(access_token: Option<&'a str>) -> Self {
        Self {
            access_token,
            identity: None,
        }
    }

    pub fn with_identity(identity: Option<&'a IdentityContext>) -> Self {
        Self {
            access_token: None,
            identity,
        }
    }
}

/// Headers for one GraphQL call. An empty token counts as absent.
pub fn build_auth_headers(auth: &AuthContext<'_>, strategy: HeaderStrategy) -> Headers {
    let mut headers = Headers::new();

    if let Some(token) = auth.access_token.filter(|t| !t.is_empty()) {
        headers.insert(AUTHORIZATION.to_string(), format!("Bearer {}", token));
    }

    if let (HeaderStrategy::Direct, Some(identity)) = (strategy, auth.identity) {
        headers.insert(X_ORG_ID.to_string(), identity.organization.id.clone());
        headers.insert(X_USER_SUB.to_string(), identity.admin.id.clone());
        headers.insert(X_ORG_NAME.to_string(), identity.organization.name.clone());
    }

    headers
}
