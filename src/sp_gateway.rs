//! Selling-partner platform client implementing [`TransferGateway`] over HTTP.
//!
//! Owns authentication (token refresh with expiry caching) and the internal
//! polling of report generation jobs; callers only see the trait contract.
//! All errors surface as boxed gateway errors for the executor to fold into
//! per-entry outcomes.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::SecondsFormat;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::Credentials;
use crate::error::GatewayError;
use crate::gateway::{FeedStatus, JobHandle, ReportWindow, TransferGateway};
use crate::registry::{FeedType, ReportType};

const DEFAULT_BASE_URL: &str = "https://sellingpartnerapi-na.amazon.com";
const DEFAULT_TOKEN_URL: &str = "https://api.amazon.com/auth/o2/token";
const REPORT_POLL_INTERVAL: Duration = Duration::from_secs(30);
const REPORT_POLL_LIMIT: u32 = 60;

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

pub struct SpGateway {
    http: Client,
    credentials: Credentials,
    base_url: String,
    token_url: String,
    token: Mutex<Option<CachedToken>>,
}

impl SpGateway {
    pub fn new(credentials: Credentials) -> Self {
        SpGateway {
            http: Client::new(),
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            token: Mutex::new(None),
        }
    }

    /// Point the client at an alternate endpoint (sandbox, test server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_token_url(mut self, token_url: impl Into<String>) -> Self {
        self.token_url = token_url.into();
        self
    }

    fn marketplace_id(&self) -> &str {
        match self.credentials.marketplace.as_str() {
            "" | "US" => "ATVPDKIKX0DER",
            "CA" => "A2EUQ1WTGCTBG2",
            "MX" => "A1AM78C64UM0Y8",
            "GB" | "UK" => "A1F83G8C2ARO7P",
            "DE" => "A1PA6795UKMFR9",
            other => other,
        }
    }

    /// Fetch or reuse the LWA access token. Cached until shortly before the
    /// platform-declared expiry.
    async fn access_token(&self) -> Result<String, GatewayError> {
        let mut guard = self.token.lock().await;
        if let Some(cached) = guard.as_ref() {
            if cached.expires_at > Instant::now() {
                return Ok(cached.access_token.clone());
            }
        }

        #[derive(Deserialize)]
        struct TokenResponse {
            access_token: String,
            expires_in: u64,
        }

        debug!("Refreshing platform access token");
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.credentials.refresh_token.as_str()),
                ("client_id", self.credentials.client_id.as_str()),
                ("client_secret", self.credentials.client_secret.as_str()),
            ])
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("token refresh failed: {status}: {body}").into());
        }
        let token: TokenResponse = response.json().await?;

        // Renew a minute early so in-flight calls never carry a stale token.
        let expires_at = Instant::now() + Duration::from_secs(token.expires_in.saturating_sub(60));
        let access_token = token.access_token.clone();
        *guard = Some(CachedToken {
            access_token: token.access_token,
            expires_at,
        });
        Ok(access_token)
    }

    async fn get_json(&self, url: &str) -> Result<serde_json::Value, GatewayError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .get(url)
            .header("x-amz-access-token", token)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("GET {url} failed: {status}: {body}").into());
        }
        Ok(response.json().await?)
    }

    async fn post_json(
        &self,
        url: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, GatewayError> {
        let token = self.access_token().await?;
        let response = self
            .http
            .post(url)
            .header("x-amz-access-token", token)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(format!("POST {url} failed: {status}: {body}").into());
        }
        Ok(response.json().await?)
    }
}

fn string_field(value: &serde_json::Value, field: &str) -> Result<String, GatewayError> {
    value
        .get(field)
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .ok_or_else(|| format!("response missing field {field}: {value}").into())
}

fn map_processing_status(status: &str) -> FeedStatus {
    match status {
        "IN_QUEUE" => FeedStatus::Pending,
        "IN_PROGRESS" => FeedStatus::InProgress,
        "DONE" => FeedStatus::Done,
        _ => FeedStatus::Failed,
    }
}

#[async_trait]
impl TransferGateway for SpGateway {
    async fn submit_feed(
        &self,
        file: &Path,
        feed_type: FeedType,
    ) -> Result<JobHandle, GatewayError> {
        let content = tokio::fs::read(file).await?;

        // Stage the content as a feed document, then reference it from the feed.
        let document = self
            .post_json(
                &format!("{}/feeds/2021-06-30/documents", self.base_url),
                json!({ "contentType": "text/tab-separated-values; charset=utf-8" }),
            )
            .await?;
        let document_id = string_field(&document, "feedDocumentId")?;
        let upload_url = string_field(&document, "url")?;

        let put = self
            .http
            .put(&upload_url)
            .header("Content-Type", "text/tab-separated-values; charset=utf-8")
            .body(content)
            .send()
            .await?;
        if !put.status().is_success() {
            return Err(format!("feed document upload failed: {}", put.status()).into());
        }

        let feed = self
            .post_json(
                &format!("{}/feeds/2021-06-30/feeds", self.base_url),
                json!({
                    "feedType": feed_type.code(),
                    "marketplaceIds": [self.marketplace_id()],
                    "inputFeedDocumentId": document_id,
                }),
            )
            .await?;
        let feed_id = string_field(&feed, "feedId")?;
        info!(file = %file.display(), feed_id, "Feed submitted to platform");
        Ok(JobHandle(feed_id))
    }

    async fn feed_status(&self, handle: &JobHandle) -> Result<FeedStatus, GatewayError> {
        let feed = self
            .get_json(&format!("{}/feeds/2021-06-30/feeds/{}", self.base_url, handle))
            .await?;
        let status = string_field(&feed, "processingStatus")?;
        Ok(map_processing_status(&status))
    }

    async fn generate_report(
        &self,
        report_type: ReportType,
        window: ReportWindow,
        pii: bool,
    ) -> Result<PathBuf, GatewayError> {
        let created = self
            .post_json(
                &format!("{}/reports/2021-06-30/reports", self.base_url),
                json!({
                    "reportType": report_type.code(),
                    "marketplaceIds": [self.marketplace_id()],
                    "dataStartTime": window.start.to_rfc3339_opts(SecondsFormat::Secs, true),
                    "dataEndTime": window.end.to_rfc3339_opts(SecondsFormat::Secs, true),
                    "reportOptions": { "custom": pii.to_string() },
                }),
            )
            .await?;
        let report_id = string_field(&created, "reportId")?;
        info!(report_id, report_type = report_type.code(), "Report generation requested");

        // The platform generates reports asynchronously; poll here so the
        // caller sees a single blocking call that yields the artifact.
        let mut document_id = None;
        for _ in 0..REPORT_POLL_LIMIT {
            let report = self
                .get_json(&format!(
                    "{}/reports/2021-06-30/reports/{}",
                    self.base_url, report_id
                ))
                .await?;
            let status = string_field(&report, "processingStatus")?;
            debug!(report_id, status, "Polled report status");
            match status.as_str() {
                "DONE" => {
                    document_id = Some(string_field(&report, "reportDocumentId")?);
                    break;
                }
                "CANCELLED" | "FATAL" => {
                    return Err(format!("report {report_id} ended as {status}").into());
                }
                _ => tokio::time::sleep(REPORT_POLL_INTERVAL).await,
            }
        }
        let document_id = document_id
            .ok_or_else(|| format!("report {report_id} not finished within poll limit"))?;

        let document = self
            .get_json(&format!(
                "{}/reports/2021-06-30/documents/{}",
                self.base_url, document_id
            ))
            .await?;
        let url = string_field(&document, "url")?;

        let bytes = {
            let response = self.http.get(&url).send().await?;
            if !response.status().is_success() {
                return Err(format!("report download failed: {}", response.status()).into());
            }
            response.bytes().await?
        };

        // Land the artifact on a transient path; the executor moves it into
        // the configured download folder.
        let file = tempfile::NamedTempFile::new()?;
        std::fs::write(file.path(), &bytes)?;
        let path = file.into_temp_path().keep()?;
        info!(report_id, path = %path.display(), "Report artifact fetched");
        Ok(path)
    }
}
