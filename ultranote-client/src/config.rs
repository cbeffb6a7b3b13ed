//! Client configuration.

use std::time::Duration;

/// Environment variable holding the Stream Source URL.
pub const ENDPOINT_VAR: &str = "ULTRANOTE_ENDPOINT";

/// Environment variable holding the bearer key sent to the Stream Source.
pub const API_KEY_VAR: &str = "ULTRANOTE_API_KEY";

/// Environment variable holding the connect timeout in whole seconds.
pub const CONNECT_TIMEOUT_VAR: &str = "ULTRANOTE_CONNECT_TIMEOUT_SECS";

/// Errors building a client configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required setting was not provided.
    #[error("missing configuration: {0} is not set")]
    Missing(&'static str),
    /// A setting was provided but could not be used.
    #[error("invalid {name}: {reason}")]
    Invalid {
        /// Name of the setting.
        name: &'static str,
        /// What was wrong with it.
        reason: String,
    },
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Settings for a [`NotesClient`](crate::NotesClient).
///
/// No read timeout is applied: a stalled stream blocks until the Stream
/// Source closes it or the generation is cancelled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Full URL of the Stream Source, e.g.
    /// `https://<project>.supabase.co/functions/v1/generate-notes`.
    pub endpoint: String,
    /// Bearer key sent in the `Authorization` header, if any.
    pub api_key: Option<String>,
    /// Upper bound on establishing the connection.
    pub connect_timeout: Option<Duration>,
}

impl ClientConfig {
    /// Configuration for `endpoint` with no key and no connect timeout.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            connect_timeout: None,
        }
    }

    /// Set the bearer key.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the connect timeout.
    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Read [`ENDPOINT_VAR`], [`API_KEY_VAR`] and [`CONNECT_TIMEOUT_VAR`]
    /// from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let endpoint = get(ENDPOINT_VAR).ok_or(ConfigError::Missing(ENDPOINT_VAR))?;
        validate_endpoint(&endpoint)?;

        let connect_timeout = match get(CONNECT_TIMEOUT_VAR) {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                    name: CONNECT_TIMEOUT_VAR,
                    reason: format!("{raw:?} is not a whole number of seconds: {e}"),
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            endpoint,
            api_key: get(API_KEY_VAR),
            connect_timeout,
        })
    }
}

/// Reject endpoints that are not absolute http(s) URLs.
pub(crate) fn validate_endpoint(endpoint: &str) -> Result<(), ConfigError> {
    let url = reqwest::Url::parse(endpoint).map_err(|e| ConfigError::Invalid {
        name: ENDPOINT_VAR,
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Invalid {
            name: ENDPOINT_VAR,
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}
