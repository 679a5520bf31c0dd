//! HTTP client for the workspace backend.
//!
//! Fetches a workspace whole on entry and writes it back whole on save.
//! Requests carry the bearer token from an explicit [`Session`]; nothing
//! is read from ambient state.

use builder_core::{
    CanvasError, EditorSession, SaveBlocked, SaveFailure, SaveOutcome, WorkspaceDocument,
    WorkspaceUpdate,
};
use reqwest::{Client, StatusCode};
use thiserror::Error;
use url::Url;

/// Errors that can occur when talking to the workspace backend.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The API base URL provided is invalid.
    #[error("invalid API URL: {0}")]
    InvalidUrl(String),
    /// The backend rejected the bearer token (HTTP 401).
    #[error("session expired, please log in again")]
    AuthExpired,
    /// No response was received (connection refused, timeout, etc.).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },
    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
    /// The response body was not a workspace.
    #[error("failed to parse workspace payload: {0}")]
    Decode(#[from] serde_json::Error),
    /// Local file access failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Workspace data was rejected by the editor core.
    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

impl GatewayError {
    /// Whether repeating the same request may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Status { status, .. } => *status >= 500,
            _ => false,
        }
    }

    /// How a failed save is reported to the editor session.
    #[must_use]
    pub fn to_save_failure(&self) -> SaveFailure {
        match self {
            Self::AuthExpired => SaveFailure::AuthExpired,
            other => SaveFailure::Failed(other.to_string()),
        }
    }
}

/// Authenticated API context passed to the gateway.
#[derive(Debug, Clone)]
pub struct Session {
    base_url: Url,
    token: String,
}

impl Session {
    /// Create a session for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidUrl`] if the URL is malformed or cannot
    /// have path segments appended.
    pub fn new(base_url: &str, token: impl Into<String>) -> Result<Self, GatewayError> {
        let base_url =
            Url::parse(base_url).map_err(|e| GatewayError::InvalidUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(GatewayError::InvalidUrl(format!(
                "{base_url} cannot be used as a base URL"
            )));
        }
        Ok(Self {
            base_url,
            token: token.into(),
        })
    }

    /// API base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn workspace_url(&self, id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["workspaces", id]);
        }
        url
    }
}

/// Client for `GET`/`PUT /workspaces/{id}`.
#[derive(Debug, Clone)]
pub struct WorkspaceClient {
    http: Client,
    session: Session,
}

impl WorkspaceClient {
    /// Create a client for the given session.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Http`] if the HTTP client fails to build.
    pub fn new(session: Session) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .user_agent(concat!("almabuild/", env!("CARGO_PKG_VERSION")))
            .no_proxy()
            .build()?;
        Ok(Self { http, session })
    }

    /// The session requests are made with.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Fetch a workspace.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::AuthExpired`] on 401, [`GatewayError::Network`]
    /// when no response arrives, [`GatewayError::Status`] on other failures,
    /// or [`GatewayError::Decode`] if the body is not a workspace.
    pub async fn fetch_workspace(&self, id: &str) -> Result<WorkspaceDocument, GatewayError> {
        let url = self.session.workspace_url(id);
        tracing::debug!("GET {url}");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.session.token)
            .send()
            .await
            .map_err(GatewayError::Network)?;
        let body = Self::check(response).await?;
        let doc: WorkspaceDocument = serde_json::from_str(&body)?;
        tracing::info!("Fetched workspace {} ({} elements)", doc.id, doc.elements.len());
        Ok(doc)
    }

    /// Write a workspace back whole.
    ///
    /// # Errors
    ///
    /// Same as [`fetch_workspace`](Self::fetch_workspace), minus decoding.
    pub async fn save_workspace(
        &self,
        id: &str,
        update: &WorkspaceUpdate,
    ) -> Result<(), GatewayError> {
        let url = self.session.workspace_url(id);
        tracing::debug!("PUT {url} ({} elements)", update.elements.len());
        let response = self
            .http
            .put(url)
            .bearer_auth(&self.session.token)
            .json(update)
            .send()
            .await
            .map_err(GatewayError::Network)?;
        Self::check(response).await?;
        Ok(())
    }

    /// Save the session's unsaved changes and apply the result to it.
    ///
    /// # Errors
    ///
    /// Returns [`SaveBlocked`] without a request when there is nothing to
    /// save or a save is already in flight.
    pub async fn persist(&self, editor: &mut EditorSession) -> Result<SaveOutcome, SaveBlocked> {
        let ticket = editor.begin_save()?;
        let result = self
            .save_workspace(ticket.workspace_id(), ticket.body())
            .await
            .map_err(|e| {
                tracing::warn!("Save failed (retryable: {}): {e}", e.is_retryable());
                e.to_save_failure()
            });
        Ok(editor.finish_save(ticket, result))
    }

    async fn check(response: reqwest::Response) -> Result<String, GatewayError> {
        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Backend rejected session token");
            return Err(GatewayError::AuthExpired);
        }
        let body = response.text().await.map_err(GatewayError::Network)?;
        if !status.is_success() {
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_url_joins_segments() {
        let session = Session::new("http://localhost:5000/api", "t").expect("session");
        assert_eq!(
            session.workspace_url("abc").as_str(),
            "http://localhost:5000/api/workspaces/abc"
        );

        let session = Session::new("http://localhost:5000/api/", "t").expect("session");
        assert_eq!(
            session.workspace_url("a b").as_str(),
            "http://localhost:5000/api/workspaces/a%20b"
        );
    }

    #[test]
    fn test_invalid_url_error() {
        let err = Session::new("not-a-valid-url", "t").unwrap_err();
        assert!(matches!(err, GatewayError::InvalidUrl(_)));

        let err = Session::new("mailto:someone@example.com", "t").unwrap_err();
        assert!(matches!(err, GatewayError::InvalidUrl(_)));
    }

    #[test]
    fn test_error_is_retryable() {
        assert!(!GatewayError::AuthExpired.is_retryable());
        assert!(GatewayError::Status {
            status: 503,
            body: String::new()
        }
        .is_retryable());
        assert!(!GatewayError::Status {
            status: 404,
            body: String::new()
        }
        .is_retryable());
    }

    #[test]
    fn test_save_failure_mapping() {
        assert_eq!(
            GatewayError::AuthExpired.to_save_failure(),
            SaveFailure::AuthExpired
        );
        assert!(matches!(
            GatewayError::InvalidUrl("x".into()).to_save_failure(),
            SaveFailure::Failed(_)
        ));
    }
}
