//! Webhook endpoint selection

/// Reason reported when neither endpoint is usable
pub const NO_WEBHOOK_URL: &str = "no configured webhook URL";

/// Where a selected endpoint came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointSource {
    /// Per-repository override
    Local,
    /// Instance-wide default
    Global,
}

/// Outcome of endpoint resolution for one push. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedEndpoint {
    Selected { url: String, source: EndpointSource },
    Invalid { reason: String },
}

impl ResolvedEndpoint {
    pub fn is_valid(&self) -> bool {
        matches!(self, ResolvedEndpoint::Selected { .. })
    }

    /// The selected URL, if any.
    pub fn url(&self) -> Option<&str> {
        match self {
            ResolvedEndpoint::Selected { url, .. } => Some(url),
            ResolvedEndpoint::Invalid { .. } => None,
        }
    }

    /// Human readable reason for an invalid endpoint.
    pub fn problem(&self) -> Option<&str> {
        match self {
            ResolvedEndpoint::Selected { .. } => None,
            ResolvedEndpoint::Invalid { reason } => Some(reason),
        }
    }
}

/// Picks the webhook endpoint for a push: a non-empty local URL wins over a
/// non-empty global one. Presence is all that is checked; nothing is contacted.
pub struct WebhookResolver;

impl WebhookResolver {
    pub fn resolve(global: Option<&str>, local: Option<&str>) -> ResolvedEndpoint {
        if let Some(url) = non_empty(local) {
            return ResolvedEndpoint::Selected {
                url: url.to_string(),
                source: EndpointSource::Local,
            };
        }
        if let Some(url) = non_empty(global) {
            return ResolvedEndpoint::Selected {
                url: url.to_string(),
                source: EndpointSource::Global,
            };
        }
        ResolvedEndpoint::Invalid {
            reason: NO_WEBHOOK_URL.to_string(),
        }
    }
}

fn non_empty(url: Option<&str>) -> Option<&str> {
    url.filter(|u| !u.is_empty())
}
