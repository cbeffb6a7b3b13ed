//! Stream Source client struct and builder.

use std::time::Duration;

use ultranote_types::{GenerateError, GenerationRequest, IncrementStream};

use crate::config::{ClientConfig, ConfigError, validate_endpoint};
use crate::error::{map_http_status, map_reqwest_error};

/// Client for a note-generation Stream Source.
///
/// Each call to [`open_stream`](Self::open_stream) is independent: the
/// client holds configuration only, never per-request state.
///
/// # Example
///
/// ```no_run
/// use ultranote_client::NotesClient;
///
/// let client = NotesClient::new("http://localhost:54321/functions/v1/generate-notes")
///     .api_key("anon-key");
/// ```
#[derive(Debug, Clone)]
pub struct NotesClient {
    /// Full Stream Source URL.
    pub(crate) endpoint: String,
    /// Bearer key, if the Stream Source requires one.
    pub(crate) api_key: Option<String>,
    /// Connect timeout the HTTP client was built with.
    pub(crate) connect_timeout: Option<Duration>,
    /// Shared HTTP client.
    pub(crate) client: reqwest::Client,
}

impl NotesClient {
    /// Create a client for `endpoint` with no key and default HTTP settings.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: None,
            connect_timeout: None,
            client: reqwest::Client::new(),
        }
    }

    /// Build a client from a validated [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Result<Self, ConfigError> {
        validate_endpoint(&config.endpoint)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        let client = builder.build().map_err(ConfigError::HttpClient)?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key: config.api_key.clone(),
            connect_timeout: config.connect_timeout,
            client,
        })
    }

    /// Set the bearer key sent as `Authorization: Bearer <key>`.
    #[must_use]
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// The Stream Source URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `request` and return the decoded increment stream.
    ///
    /// A non-2xx response is read in full and mapped to a [`GenerateError`]
    /// without touching the decoder.
    pub async fn open_stream(
        &self,
        request: &GenerationRequest,
    ) -> Result<IncrementStream, GenerateError> {
        tracing::debug!(url = %self.endpoint, mode = %request.mode, "sending generation request");

        let mut builder = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .json(request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| map_reqwest_error(e, self.connect_timeout))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| map_reqwest_error(e, self.connect_timeout))?;
            tracing::warn!(status = status.as_u16(), "stream source rejected request");
            return Err(map_http_status(status, &body));
        }

        Ok(IncrementStream::new(ultranote_sse::decode(
            response.bytes_stream(),
        )))
    }
}
