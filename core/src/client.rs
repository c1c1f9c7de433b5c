//! The single chokepoint for every call to the admin API.
//!
//! # Design
//! `ApiClient` keeps building an `HttpRequest` apart from parsing an
//! `HttpResponse`; `send` glues the two together through the injected
//! `Transport`. The credential comes from the `Session`
//! passed in at construction. A 401/403 clears it and surfaces as
//! `ApiError::Unauthorized`; navigating away is left to the caller.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::api::{AdminUserApi, AuthApi, CategoryApi, ServiceApi};
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::session::Session;
use crate::transport::Transport;

const BEARER_PREFIX: &str = "Bearer ";

/// Blocking client for the admin REST API.
pub struct ApiClient {
    base_url: String,
    session: Session,
    transport: Box<dyn Transport>,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, session: Session, transport: impl Transport + 'static) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
            transport: Box::new(transport),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn admin_users(&self) -> AdminUserApi<'_> {
        AdminUserApi::new(self)
    }

    pub fn categories(&self) -> CategoryApi<'_> {
        CategoryApi::new(self)
    }

    pub fn services(&self) -> ServiceApi<'_> {
        ServiceApi::new(self)
    }

    /// Build a request for `path`, attaching the stored credential if any.
    pub fn build_request(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<String>,
    ) -> Result<HttpRequest, ApiError> {
        let mut headers = Vec::new();
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        if let Some(token) = self.session.token()? {
            headers.push(("authorization".to_string(), bearer_header(&token)));
        }
        Ok(HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers,
            body,
        })
    }

    pub fn build_json_request<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.build_request(method, path, Some(body))
    }

    /// Classify a response. Success yields the JSON body, or an empty object
    /// when the body is empty.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        if response.is_success() {
            if response.body.trim().is_empty() {
                return Ok(Value::Object(Default::default()));
            }
            return serde_json::from_str(&response.body)
                .map_err(|e| ApiError::Deserialization(e.to_string()));
        }

        let message = extract_error_message(response.status, &response.body);
        if response.is_auth_failure() {
            warn!(status = response.status, "authentication rejected, clearing credential");
            if let Err(e) = self.session.clear() {
                warn!(error = %e, "failed to clear credential");
            }
            return Err(ApiError::Unauthorized {
                status: response.status,
                message,
            });
        }
        Err(ApiError::Http {
            status: response.status,
            message,
        })
    }

    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    pub fn send(&self, request: HttpRequest) -> Result<Value, ApiError> {
        let response = self.transport.execute(&request)?;
        debug!(status = response.status, "response received");
        self.parse_response(response)
    }

    pub fn call(&self, method: HttpMethod, path: &str) -> Result<Value, ApiError> {
        let request = self.build_request(method, path, None)?;
        self.send(request)
    }

    pub fn call_json<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: &B,
    ) -> Result<Value, ApiError> {
        let request = self.build_json_request(method, path, body)?;
        self.send(request)
    }
}

/// `Bearer <token>`, whether or not the stored value already has the prefix.
pub fn bearer_header(token: &str) -> String {
    let token = token.trim();
    let bare = token.strip_prefix(BEARER_PREFIX).unwrap_or(token).trim_start();
    format!("{BEARER_PREFIX}{bare}")
}

/// Best-effort human-readable message for a failed response.
///
/// Priority: `message` (or the older `mes`) field, a string `error` field,
/// the whole JSON when it carries an `error`/`err` object, the raw text, and
/// finally `server error {status}` for an empty body.
pub fn extract_error_message(status: u16, body: &str) -> String {
    if body.trim().is_empty() {
        return format!("server error {status}");
    }
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.to_string();
    };

    for key in ["message", "mes"] {
        if let Some(text) = non_empty_text(json.get(key)) {
            return text;
        }
    }
    match json.get("error") {
        Some(Value::String(text)) if !text.is_empty() => return text.clone(),
        Some(Value::Object(_)) => return json.to_string(),
        _ => {}
    }
    if json.get("err").is_some_and(|err| !err.is_null()) {
        return json.to_string();
    }
    body.to_string()
}

fn non_empty_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(text) if !text.is_empty() => Some(text.clone()),
        Value::Null | Value::String(_) => None,
        other => Some(other.to_string()),
    }
}
