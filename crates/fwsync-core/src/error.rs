//! Error types for the firewall synchronizer
//!
//! Every failure aborts the run and is reported to the operator with
//! enough context to self-diagnose. Nothing here is retried.

use thiserror::Error;

/// Result type alias for synchronizer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the firewall synchronizer
#[derive(Error, Debug)]
pub enum Error {
    /// No stored target and no identifiers supplied on the command line
    #[error(
        "no firewall target configured: pass --firewall_id and --label once to store a default"
    )]
    TargetMissing,

    /// The external linode-cli configuration file is absent
    #[error("linode-cli configuration not found at {0}; run `linode-cli configure` first")]
    CredentialNotFound(String),

    /// The linode-cli configuration exists but designates no default user
    #[error("invalid linode-cli configuration: {0}")]
    CredentialInvalid(String),

    /// The designated user section has no token field
    #[error("no API token for user '{0}' in the linode-cli configuration")]
    TokenMissing(String),

    /// Public IP resolution failed (network, timeout, or malformed body)
    #[error("public IP resolution failed: {0}")]
    IpResolution(String),

    /// Transport-level failure talking to the firewall API
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-2xx response from the firewall API, body surfaced verbatim
    #[error("firewall API returned {status}: {body}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, verbatim
        body: String,
    },

    /// Target store I/O failure (permissions, disk)
    #[error("target store error: {0}")]
    Store(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a credential error for a malformed linode-cli config
    pub fn credential_invalid(msg: impl Into<String>) -> Self {
        Self::CredentialInvalid(msg.into())
    }

    /// Create an IP resolution error
    pub fn ip_resolution(msg: impl Into<String>) -> Self {
        Self::IpResolution(msg.into())
    }

    /// Create a transport error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an API error from a status code and response body
    pub fn api(status: u16, body: impl Into<String>) -> Self {
        Self::Api {
            status,
            body: body.into(),
        }
    }

    /// Create a target store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }
}
