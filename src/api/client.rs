use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use url::Url;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{ArtifactKind, ExportFormat, Folder, Meeting};

/// Which server-side report rendering to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportScope {
    /// The whole-meeting report.
    Meeting,
    /// The comprehensive bundle covering every artifact.
    Comprehensive,
    /// A single artifact tab.
    Kind(ArtifactKind),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

pub struct ApiClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        // Validate up front so a typo fails at startup, not mid-session
        Url::parse(&config.api_base_url)
            .map_err(|e| AppError::Config(format!("invalid api_base_url: {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("meeting-lens/1.0")
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}/{}", self.base_url, path));
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Extract the server's error message from a non-2xx response, if it
    /// supplied one. Callers substitute their own default otherwise.
    async fn error_message(response: reqwest::Response) -> String {
        let status = response.status();
        match response.json::<ErrorBody>().await {
            Ok(ErrorBody { error: Some(msg) }) if !msg.trim().is_empty() => msg,
            _ => {
                tracing::debug!(%status, "error response carried no message");
                String::new()
            }
        }
    }

    pub async fn fetch_meeting(&self, meeting_id: &str) -> Result<Meeting> {
        let response = self
            .request(Method::GET, &format!("meetings/{meeting_id}"))
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = Self::error_message(response).await;
            return Err(AppError::Api(if msg.is_empty() {
                "Failed to fetch meeting details".to_string()
            } else {
                msg
            }));
        }

        Ok(response.json::<Meeting>().await?)
    }

    pub async fn fetch_folders(&self) -> Result<Vec<Folder>> {
        let response = self.request(Method::GET, "meetings/folders").send().await?;

        if !response.status().is_success() {
            let msg = Self::error_message(response).await;
            return Err(AppError::Api(if msg.is_empty() {
                "Failed to fetch folders".to_string()
            } else {
                msg
            }));
        }

        Ok(response.json::<Vec<Folder>>().await?)
    }

    /// Fetch the stored artifact for a meeting. `Ok(None)` means the server
    /// has no stored value (404, or a null/absent artifact field).
    pub async fn fetch_artifact(
        &self,
        kind: ArtifactKind,
        meeting_id: &str,
    ) -> Result<Option<Value>> {
        let spec = kind.spec();
        let response = self
            .request(Method::GET, &format!("{}/{meeting_id}", spec.route))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            let msg = Self::error_message(response).await;
            return Err(AppError::Api(msg));
        }

        let body: Value = response.json().await?;
        Ok(body.get(spec.response_field).filter(|v| !v.is_null()).cloned())
    }

    /// Request generation (or regeneration) of an artifact. The transcript
    /// rides along only for kinds whose generation consumes it.
    pub async fn generate_artifact(
        &self,
        kind: ArtifactKind,
        meeting_id: &str,
        transcript: Option<Value>,
    ) -> Result<Value> {
        let spec = kind.spec();
        let body = match transcript.filter(|_| spec.sends_transcript) {
            Some(transcript) => json!({ "transcript": transcript }),
            None => json!({}),
        };

        let response = self
            .request(Method::POST, &format!("{}/{meeting_id}", spec.route))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let msg = Self::error_message(response).await;
            return Err(AppError::Api(msg));
        }

        let body: Value = response.json().await?;
        body.get(spec.response_field)
            .filter(|v| !v.is_null())
            .cloned()
            .ok_or_else(|| {
                AppError::Api(format!(
                    "Server response did not include a '{}' field",
                    spec.response_field
                ))
            })
    }

    /// Download a server-rendered report into the export directory and
    /// return the written path.
    pub async fn export_report(
        &self,
        meeting_id: &str,
        scope: ExportScope,
        format: ExportFormat,
        export_dir: &Path,
    ) -> Result<PathBuf> {
        let fmt = format.as_str();
        let (path, filename) = match scope {
            ExportScope::Meeting => (
                format!("report/{meeting_id}/{fmt}"),
                format!("meeting_{meeting_id}.{fmt}"),
            ),
            ExportScope::Comprehensive => (
                format!("report/{meeting_id}/comprehensive/{fmt}"),
                format!("meeting_{meeting_id}_complete.{fmt}"),
            ),
            ExportScope::Kind(kind) => (
                format!("report/{meeting_id}/{}/{fmt}", kind.spec().route),
                format!("{}_{meeting_id}.{fmt}", kind.spec().route),
            ),
        };

        let response = self.request(Method::GET, &path).send().await?;

        if !response.status().is_success() {
            let msg = Self::error_message(response).await;
            return Err(AppError::Api(if msg.is_empty() {
                format!("Export failed for {path}")
            } else {
                msg
            }));
        }

        let bytes = response.bytes().await?;
        std::fs::create_dir_all(export_dir)?;
        let dest = export_dir.join(filename);
        std::fs::write(&dest, &bytes)?;

        Ok(dest)
    }
}
