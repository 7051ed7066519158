//! vSphere VI/JSON API HTTP client with session-based authentication.
//!
//! Communicates with vCenter via `https://{host}:{port}/sdk/vim25/{release}/...`.
//! Every managed object is addressed as `/{type}/{id}`; properties are read
//! with `GET /{type}/{id}/{property}` and methods invoked with
//! `POST /{type}/{id}/{method}`.

use crate::error::{VmwareError, VmwareErrorKind, VmwareResult};
use crate::types::{ManagedObjectReference, VsphereConfig};
use crate::vim::ServiceContent;

use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;
use url::Url;

const SESSION_HEADER: &str = "vmware-api-session-id";

/// vSphere VI/JSON API client.
pub struct VsphereClient {
    client: Client,
    base_url: String,
    session_id: Option<String>,
    content: Option<ServiceContent>,
    config: VsphereConfig,
}

impl VsphereClient {
    /// Build a new client from config (does NOT create a session yet).
    pub fn new(config: &VsphereConfig) -> VmwareResult<Self> {
        if config.host.trim().is_empty() {
            return Err(VmwareError::connection("No vCenter host configured"));
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(config.insecure)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| VmwareError::connection(format!("Failed to build HTTP client: {e}")))?;

        let base_url = Self::build_base_url(config)?;

        Ok(Self {
            client,
            base_url,
            session_id: None,
            content: None,
            config: config.clone(),
        })
    }

    fn build_base_url(config: &VsphereConfig) -> VmwareResult<String> {
        let host = config.host.trim();
        let host = if host.contains(':') && !host.starts_with('[') {
            format!("[{host}]")
        } else {
            host.to_string()
        };
        let raw = format!("https://{}:{}/sdk/vim25/{}", host, config.port, config.api_release);
        let url = Url::parse(&raw)
            .map_err(|e| VmwareError::connection(format!("Invalid vCenter address '{raw}': {e}")))?;
        Ok(url.as_str().trim_end_matches('/').to_string())
    }

    /// Same client aimed at an explicit base URL (plain-HTTP test endpoints).
    #[cfg(test)]
    pub(crate) fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Base URL for API calls.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether we have an active session.
    pub fn is_connected(&self) -> bool {
        self.session_id.is_some()
    }

    /// Current config.
    pub fn config(&self) -> &VsphereConfig {
        &self.config
    }

    /// Service content fetched by [`Self::retrieve_service_content`].
    pub fn content(&self) -> VmwareResult<&ServiceContent> {
        self.content
            .as_ref()
            .ok_or_else(|| VmwareError::connection("Service content not retrieved yet"))
    }

    // ── Session management ──────────────────────────────────────────

    /// Fetch `ServiceInstance.content` (no session required).
    pub async fn retrieve_service_content(&mut self) -> VmwareResult<ServiceContent> {
        let url = format!("{}/ServiceInstance/ServiceInstance/content", self.base_url);
        let resp = self.client.get(&url).send().await?;
        let resp = Self::check_status(resp).await?;
        let content: ServiceContent = Self::parse_response(resp).await?;
        self.content = Some(content.clone());
        Ok(content)
    }

    /// Create a new API session (`SessionManager.Login`).
    pub async fn login(&mut self) -> VmwareResult<String> {
        let session_manager = self.content()?.session_manager.clone();
        let url = format!("{}{}/Login", self.base_url, session_manager.path());

        #[derive(Serialize)]
        #[serde(rename_all = "camelCase")]
        struct LoginBody<'a> {
            user_name: &'a str,
            password: &'a str,
        }

        let resp = self
            .client
            .post(&url)
            .json(&LoginBody {
                user_name: &self.config.username,
                password: &self.config.password,
            })
            .send()
            .await?;

        let resp = Self::check_status(resp).await.map_err(|e| match e.kind {
            VmwareErrorKind::AuthenticationError => VmwareError::auth("Invalid credentials"),
            _ => VmwareError::connection(format!("Login failed: {}", e.message)),
        })?;

        let session_id = resp
            .headers()
            .get(SESSION_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| VmwareError::parse("Login response carried no session header"))?;

        self.session_id = Some(session_id.clone());
        Ok(session_id)
    }

    /// End the current session (`SessionManager.Logout`). Best effort; the
    /// local session is always cleared.
    pub async fn logout(&mut self) -> VmwareResult<()> {
        if let (Some(sid), Some(content)) = (self.session_id.as_deref(), self.content.as_ref()) {
            let url = format!("{}{}/Logout", self.base_url, content.session_manager.path());
            let _ = self
                .client
                .post(&url)
                .header(SESSION_HEADER, sid)
                .send()
                .await;
        }
        self.session_id = None;
        Ok(())
    }

    // ── HTTP helpers ────────────────────────────────────────────────

    fn require_session(&self) -> VmwareResult<&str> {
        self.session_id
            .as_deref()
            .ok_or_else(|| VmwareError::auth("Not logged in: no active session"))
    }

    /// Read one property of a managed object.
    pub async fn get_property<T: DeserializeOwned>(
        &self,
        moref: &ManagedObjectReference,
        property: &str,
    ) -> VmwareResult<T> {
        let sid = self.require_session()?;
        let url = format!("{}{}/{}", self.base_url, moref.path(), property);
        let resp = self
            .client
            .get(&url)
            .header(SESSION_HEADER, sid)
            .send()
            .await?;
        let resp = Self::check_status(resp).await?;
        Self::parse_response(resp).await
    }

    /// Invoke a method on a managed object with a JSON body.
    pub async fn invoke<B: Serialize, T: DeserializeOwned>(
        &self,
        moref: &ManagedObjectReference,
        method: &str,
        body: &B,
    ) -> VmwareResult<T> {
        let resp = self.invoke_raw(moref, method, Some(body)).await?;
        Self::parse_response(resp).await
    }

    /// Invoke a method that takes no arguments and returns nothing.
    pub async fn invoke_void(&self, moref: &ManagedObjectReference, method: &str) -> VmwareResult<()> {
        self.invoke_raw::<()>(moref, method, None).await?;
        Ok(())
    }

    async fn invoke_raw<B: Serialize>(
        &self,
        moref: &ManagedObjectReference,
        method: &str,
        body: Option<&B>,
    ) -> VmwareResult<Response> {
        let sid = self.require_session()?;
        let url = format!("{}{}/{}", self.base_url, moref.path(), method);
        let mut req = self.client.post(&url).header(SESSION_HEADER, sid);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await?;
        Self::check_status(resp).await
    }

    // ── Internal helpers ────────────────────────────────────────────

    async fn check_status(resp: Response) -> VmwareResult<Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        Err(Self::classify_failure(status, &body))
    }

    /// Map an HTTP status plus VI/JSON fault body onto an error kind.
    fn classify_failure(status: StatusCode, body: &str) -> VmwareError {
        let code = status.as_u16();
        let fault = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|v| v.get("_typeName").and_then(|t| t.as_str()).map(str::to_string));
        let excerpt = excerpt(body);

        match (status, fault.as_deref()) {
            (StatusCode::UNAUTHORIZED, _) | (_, Some("InvalidLogin" | "NotAuthenticated")) => {
                VmwareError::auth(format!("Session expired or invalid: {excerpt}"))
            }
            (StatusCode::FORBIDDEN, _) | (_, Some("NoPermission")) => {
                VmwareError::new(VmwareErrorKind::AccessDenied, format!("Access denied: {excerpt}"))
            }
            (StatusCode::NOT_FOUND, _) | (_, Some("ManagedObjectNotFound")) => {
                VmwareError::not_found(format!("Object not found: {excerpt}"))
            }
            _ => VmwareError::api(code, format!("API error {code}: {excerpt}")),
        }
    }

    async fn parse_response<T: DeserializeOwned>(resp: Response) -> VmwareResult<T> {
        let text = resp.text().await.map_err(|e| {
            VmwareError::parse(format!("Failed to read response body: {e}"))
        })?;

        if text.is_empty() {
            // Unset properties come back as an empty body
            return serde_json::from_str("null").map_err(|e| {
                VmwareError::parse(format!("Cannot deserialise empty response: {e}"))
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            VmwareError::parse(format!("JSON parse error: {e}; body: {}", excerpt(&text)))
        })
    }
}

/// First 500 characters of a response body, for error messages.
fn excerpt(body: &str) -> String {
    body.chars().take(500).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(host: &str) -> VsphereConfig {
        VsphereConfig {
            host: host.into(),
            username: "administrator@vsphere.local".into(),
            password: "secret".into(),
            ..VsphereConfig::default()
        }
    }

    #[test]
    fn base_url_includes_release() {
        let client = VsphereClient::new(&config("vc.lab.local")).unwrap();
        assert_eq!(client.base_url(), "https://vc.lab.local/sdk/vim25/8.0.1.0");
        assert!(!client.is_connected());
    }

    #[test]
    fn base_url_brackets_ipv6() {
        let mut cfg = config("fd00::10");
        cfg.port = 8443;
        let client = VsphereClient::new(&cfg).unwrap();
        assert_eq!(client.base_url(), "https://[fd00::10]:8443/sdk/vim25/8.0.1.0");
    }

    #[test]
    fn empty_host_is_rejected() {
        let err = VsphereClient::new(&config("  ")).err().unwrap();
        assert_eq!(err.kind, VmwareErrorKind::ConnectionError);
    }

    #[test]
    fn content_required_before_login() {
        let client = VsphereClient::new(&config("vc")).unwrap();
        assert!(client.content().is_err());
    }

    #[test]
    fn fault_bodies_are_classified() {
        let err = VsphereClient::classify_failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"_typeName":"InvalidLogin","faultMessage":[]}"#,
        );
        assert_eq!(err.kind, VmwareErrorKind::AuthenticationError);

        let err = VsphereClient::classify_failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"_typeName":"ManagedObjectNotFound"}"#,
        );
        assert_eq!(err.kind, VmwareErrorKind::NotFound);

        let err = VsphereClient::classify_failure(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.kind, VmwareErrorKind::ApiError(502));
    }
}
