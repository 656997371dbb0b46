use thiserror::Error;

/// Unified error type for the avocet workspace.
///
/// This wraps base-fetch failures, provider-tagged failures, argument
/// validation errors, not-found conditions, and the data-integrity and
/// empty-aggregate cases surfaced by trip reconciliation and weather
/// summarization.
#[derive(Debug, Error)]
pub enum AvocetError {
    /// The requested capability is not wired into the orchestrator.
    #[error("unsupported capability: {capability}")]
    Unsupported {
        /// A capability string describing what was requested (e.g. "routing/trip").
        capability: &'static str,
    },

    /// Issues with the returned or expected data (missing fields, malformed payloads, etc.).
    #[error("data issue: {0}")]
    Data(String),

    /// Invalid input argument.
    #[error("invalid argument: {0}")]
    InvalidArg(String),

    /// An individual connector returned an error.
    #[error("{connector} failed: {msg}")]
    Connector {
        /// Connector name that failed.
        connector: String,
        /// Human-readable error message.
        msg: String,
    },

    /// A resource could not be found.
    #[error("not found: {what}")]
    NotFound {
        /// Description of the missing resource, e.g. "address for 42.3,-71.1".
        what: String,
    },

    /// An individual provider call exceeded the configured timeout.
    #[error("provider timed out: {capability} via {connector}")]
    ProviderTimeout {
        /// Connector name that timed out.
        connector: String,
        /// Capability label (e.g. "discovery", "observations", "weather").
        capability: &'static str,
    },

    /// The initial hotspot discovery call failed; fatal to the invocation
    /// because no partial result exists yet.
    #[error("hotspot discovery failed: {0}")]
    Discovery(Box<AvocetError>),

    /// An externally computed trip order is inconsistent with the request
    /// shape. Surfaced immediately; never silently reinterpreted.
    #[error("optimized trip order mismatch: {reason}")]
    OrderMismatch {
        /// What about the order was inconsistent.
        reason: String,
    },

    /// A weather summary was requested over zero successful samples.
    #[error("no weather data available for any requested location")]
    NoWeatherData,

    /// Unknown/opaque error.
    #[error("unknown error: {0}")]
    Other(String),
}

impl AvocetError {
    /// Helper: build an `Unsupported` error for a capability string.
    #[must_use]
    pub const fn unsupported(cap: &'static str) -> Self {
        Self::Unsupported { capability: cap }
    }

    /// Helper: build a `Connector` error with the connector name and message.
    pub fn connector(connector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Connector {
            connector: connector.into(),
            msg: msg.into(),
        }
    }

    /// Helper: build a `NotFound` error for a description of the missing resource.
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound { what: what.into() }
    }

    /// Helper: build a `ProviderTimeout` error.
    pub fn provider_timeout(connector: impl Into<String>, capability: &'static str) -> Self {
        Self::ProviderTimeout {
            connector: connector.into(),
            capability,
        }
    }

    /// Helper: wrap a failure from the initial discovery call.
    #[must_use]
    pub fn discovery(inner: Self) -> Self {
        Self::Discovery(Box::new(inner))
    }

    /// Helper: build an `OrderMismatch` error.
    pub fn order_mismatch(reason: impl Into<String>) -> Self {
        Self::OrderMismatch {
            reason: reason.into(),
        }
    }
}
