//! The request/response pipeline shared by every service client.
//!
//! # Design
//! `BrikClient` holds only a `base_url` and carries no mutable state between
//! calls. It resolves an `Operation`'s endpoint, applies its method and
//! bearer header, and attaches a JSON or multipart body. `check_status` and
//! `decode` classify whatever came back. `Backend` pairs a `BrikClient` with
//! a `Transport` for callers that want the round-trip done for them; the
//! service clients are thin `build_*` / `parse_*` wrappers over both.
//!
//! Per request: Building -> Sent -> Succeeded | FailedBeforeSend |
//! FailedAfterSend. There is no retry edge.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiError, ErrorKind};
use crate::http::{HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::operation::Operation;
use crate::token::BearerToken;
use crate::transport::Transport;

const CONTENT_TYPE: &str = "content-type";
const AUTHORIZATION: &str = "authorization";
const APPLICATION_JSON: &str = "application/json";

/// Stateless request builder for the Brik API.
#[derive(Debug, Clone)]
pub struct BrikClient {
    base_url: String,
}

impl BrikClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Resolve the operation's path against the base origin.
    pub fn endpoint(&self, operation: Operation) -> Result<Url, ApiError> {
        let invalid = |e: url::ParseError| ApiError::new(operation, ErrorKind::InvalidUrl(e.to_string()));
        let base = Url::parse(&self.base_url).map_err(invalid)?;
        if base.cannot_be_a_base() {
            return Err(ApiError::new(
                operation,
                ErrorKind::InvalidUrl(format!("`{}` cannot be a base URL", self.base_url)),
            ));
        }
        base.join(operation.path()).map_err(invalid)
    }

    /// A bodiless request with method, URL and, when the operation needs it,
    /// the bearer header. Fails with `MissingAuthToken` before anything is
    /// sent if an authenticated operation has no token.
    pub fn request(
        &self,
        operation: Operation,
        token: Option<&BearerToken>,
    ) -> Result<HttpRequest, ApiError> {
        let url = self.endpoint(operation)?;
        let mut headers = Vec::new();
        if operation.requires_auth() {
            let token = token.ok_or_else(|| ApiError::new(operation, ErrorKind::MissingAuthToken))?;
            headers.push((AUTHORIZATION.to_string(), token.authorization()));
        }
        Ok(HttpRequest {
            method: operation.method(),
            url: url.into(),
            headers,
            body: None,
        })
    }

    pub fn json_request<B: Serialize>(
        &self,
        operation: Operation,
        token: Option<&BearerToken>,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let mut request = self.request(operation, token)?;
        let body = serde_json::to_vec(body)
            .map_err(|e| ApiError::new(operation, ErrorKind::Encoding(e.to_string())))?;
        request
            .headers
            .push((CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()));
        request.body = Some(body);
        Ok(request)
    }

    pub fn multipart_request(
        &self,
        operation: Operation,
        token: Option<&BearerToken>,
        form: MultipartForm,
    ) -> Result<HttpRequest, ApiError> {
        let mut request = self.request(operation, token)?;
        let body = form
            .close()
            .map_err(|e| ApiError::new(operation, ErrorKind::Encoding(e.to_string())))?;
        request
            .headers
            .push((CONTENT_TYPE.to_string(), body.content_type));
        request.body = Some(body.bytes);
        Ok(request)
    }
}

#[derive(Deserialize)]
struct ServerMessage {
    #[serde(alias = "error")]
    message: String,
}

/// Map the response status to success or the matching `ErrorKind`.
pub fn check_status(operation: Operation, response: &HttpResponse) -> Result<(), ApiError> {
    let status = response.status;
    if !(100..=599).contains(&status) {
        return Err(ApiError::new(operation, ErrorKind::InvalidResponse { status: None }));
    }
    if (200..=299).contains(&status) {
        return Ok(());
    }
    if status == 404 && operation.is_optional_fetch() {
        return Err(ApiError::new(operation, ErrorKind::NotFound));
    }
    let kind = match serde_json::from_slice::<ServerMessage>(&response.body) {
        Ok(ServerMessage { message }) if !message.is_empty() => ErrorKind::Server { status, message },
        _ => ErrorKind::InvalidResponse {
            status: Some(status),
        },
    };
    Err(ApiError::new(operation, kind))
}

/// Decode a successful response body as JSON.
pub fn decode<T: DeserializeOwned>(operation: Operation, response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_slice(&response.body)
        .map_err(|e| ApiError::new(operation, ErrorKind::Decoding(e.to_string())))
}

/// A `BrikClient` wired to a `Transport`.
///
/// Cheap to clone; every service client holds one.
#[derive(Clone)]
pub struct Backend {
    client: BrikClient,
    transport: Arc<dyn Transport>,
}

impl Backend {
    pub fn new(client: BrikClient, transport: Arc<dyn Transport>) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &BrikClient {
        &self.client
    }

    /// Perform the single round-trip for `request`. Does not classify the
    /// status.
    pub fn send(&self, operation: Operation, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(operation = %operation, method = %request.method, url = %request.url, "sending request");
        match self.transport.execute(&request) {
            Ok(response) => {
                debug!(operation = %operation, status = response.status, "received response");
                Ok(response)
            }
            Err(e) => {
                warn!(operation = %operation, error = %e, "transport failure");
                Err(ApiError::new(operation, ErrorKind::Transport(e.to_string())))
            }
        }
    }
}
