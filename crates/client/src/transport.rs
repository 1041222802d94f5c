//! HTTP transport for the marketplace API.
//!
//! A thin wrapper around one `reqwest::Client` that turns every call into a
//! typed success value or a typed failure. All other modules go through this
//! layer; it carries no business logic and no retry policy - retries belong
//! to callers.

use bytes::Bytes;
use reqwest::multipart::Form;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use furima_core::Credential;

/// Errors produced at the transport boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network-level failure: the request never produced a response.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-2xx status.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message decoded from the server's error envelope, or the status
        /// canonical reason when the envelope did not decode.
        message: String,
    },

    /// A 2xx response body did not decode into the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
}

impl ApiError {
    /// The status and message of a decoded server rejection, if that is what
    /// this error is.
    #[must_use]
    pub fn server_rejection(&self) -> Option<(u16, &str)> {
        match self {
            Self::Api { status, message } => Some((*status, message)),
            Self::Http(_) | Self::Decode(_) => None,
        }
    }
}

/// Marketplace API transport.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct Transport {
    client: reqwest::Client,
    base_url: String,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// Create a transport for the given API base URL.
    #[must_use]
    pub fn new(base_url: &Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.as_str().trim_end_matches('/').to_owned(),
        }
    }

    fn request(
        &self,
        method: Method,
        path: &str,
        credential: Option<&Credential>,
    ) -> reqwest::RequestBuilder {
        let url = format!("{}{path}", self.base_url);
        let builder = self.client.request(method, url);
        match credential {
            Some(credential) => builder.bearer_auth(credential.bearer_token()),
            None => builder,
        }
    }

    /// GET a JSON payload.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        credential: Option<&Credential>,
    ) -> Result<T, ApiError> {
        let response = self.request(Method::GET, path, credential).send().await?;
        handle_json(response).await
    }

    /// GET a raw byte payload (image fetches).
    pub(crate) async fn get_bytes(
        &self,
        path: &str,
        credential: Option<&Credential>,
    ) -> Result<Bytes, ApiError> {
        let response = self.request(Method::GET, path, credential).send().await?;
        let status = response.status();
        if status.is_success() {
            Ok(response.bytes().await?)
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(error_from_body(status, &body))
        }
    }

    /// POST a JSON body and decode a JSON payload.
    pub(crate) async fn post_json<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        credential: Option<&Credential>,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self
            .request(Method::POST, path, credential)
            .json(body)
            .send()
            .await?;
        handle_json(response).await
    }

    /// Send a multipart form (item create/update) and decode a JSON payload.
    pub(crate) async fn send_multipart<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        credential: Option<&Credential>,
        form: Form,
    ) -> Result<T, ApiError> {
        let response = self
            .request(method, path, credential)
            .multipart(form)
            .send()
            .await?;
        handle_json(response).await
    }
}

/// Decode a response: 2xx bodies into the caller's type, everything else
/// into [`ApiError::Api`].
async fn handle_json<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        serde_json::from_str(&body)
            .map_err(|e| ApiError::Decode(format!("failed to decode response: {e}")))
    } else {
        Err(error_from_body(status, &body))
    }
}

/// Build an [`ApiError::Api`] from a non-2xx response body.
///
/// The server wraps rejections in a `{"message": ...}` envelope; when that
/// envelope does not decode, the status canonical reason stands in.
fn error_from_body(status: StatusCode, body: &str) -> ApiError {
    #[derive(serde::Deserialize)]
    struct ErrorEnvelope {
        message: String,
    }

    let message = serde_json::from_str::<ErrorEnvelope>(body).map_or_else(
        |_| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        },
        |envelope| envelope.message,
    );

    ApiError::Api {
        status: status.as_u16(),
        message,
    }
}
