use std::time::Duration;

use harvest_logging::harvest_warn;
use serde::Deserialize;

use crate::types::{FailureKind, PageOutcome, SearchFailure, SearchPage};

/// Error reasons the platform reports when a credential's request budget is
/// spent for the period.
const QUOTA_REASONS: [&str; 2] = ["quotaExceeded", "dailyLimitExceeded"];

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub endpoint: String,
    /// Results requested per page; 50 is the platform maximum.
    pub page_size: u32,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Total transport attempts per call, including the first.
    pub retry_attempts: u32,
    /// Fixed pause between transport attempts.
    pub retry_delay: Duration,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://www.googleapis.com/youtube/v3/search".to_string(),
            page_size: 50,
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(10),
            retry_attempts: 3,
            retry_delay: Duration::from_millis(1500),
        }
    }
}

#[async_trait::async_trait]
pub trait SearchApi: Send + Sync {
    /// Fetches one page of video results for `keyword`, classifying the
    /// response instead of surfacing transport detail.
    async fn search_page(
        &self,
        keyword: &str,
        api_key: &str,
        page_token: Option<&str>,
    ) -> PageOutcome;
}

#[derive(Debug, thiserror::Error)]
#[error("failed to build http client: {0}")]
pub struct ClientBuildError(#[from] reqwest::Error);

#[derive(Debug, Clone)]
pub struct YoutubeSearchClient {
    settings: SearchSettings,
    client: reqwest::Client,
}

impl YoutubeSearchClient {
    pub fn new(settings: SearchSettings) -> Result<Self, ClientBuildError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()?;
        Ok(Self { settings, client })
    }

    /// Runs the GET with the bounded transport retry policy, returning the
    /// status and raw body of the first response that arrives.
    async fn fetch_with_retries(
        &self,
        keyword: &str,
        api_key: &str,
        page_token: Option<&str>,
    ) -> Result<(u16, String), SearchFailure> {
        let page_size = self.settings.page_size.to_string();
        let mut params: Vec<(&str, &str)> = vec![
            ("part", "snippet"),
            ("type", "video"),
            ("q", keyword),
            ("maxResults", page_size.as_str()),
            ("key", api_key),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let mut attempt = 0;
        loop {
            attempt += 1;
            let err = match self
                .client
                .get(&self.settings.endpoint)
                .query(&params)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status().as_u16();
                    match response.text().await {
                        Ok(body) => return Ok((status, body)),
                        Err(err) => err,
                    }
                }
                Err(err) => err,
            };
            if attempt >= self.settings.retry_attempts {
                return Err(map_transport_error(&err));
            }
            harvest_warn!(
                "network error ({}), retrying in {:.1}s",
                err,
                self.settings.retry_delay.as_secs_f32()
            );
            tokio::time::sleep(self.settings.retry_delay).await;
        }
    }
}

#[async_trait::async_trait]
impl SearchApi for YoutubeSearchClient {
    async fn search_page(
        &self,
        keyword: &str,
        api_key: &str,
        page_token: Option<&str>,
    ) -> PageOutcome {
        match self.fetch_with_retries(keyword, api_key, page_token).await {
            Ok((status, body)) => classify(status, &body),
            Err(failure) => PageOutcome::Failed(failure),
        }
    }
}

fn map_transport_error(err: &reqwest::Error) -> SearchFailure {
    if err.is_timeout() {
        SearchFailure::new(FailureKind::Timeout, err.to_string())
    } else {
        SearchFailure::new(FailureKind::Network, err.to_string())
    }
}

fn classify(status: u16, body: &str) -> PageOutcome {
    match status {
        200 => match serde_json::from_str::<SearchResponse>(body) {
            Ok(parsed) => {
                let item_count = parsed.items.len() as u64;
                let channel_ids = parsed
                    .items
                    .into_iter()
                    .filter_map(|item| item.snippet.and_then(|snippet| snippet.channel_id))
                    .collect();
                PageOutcome::Page(SearchPage {
                    channel_ids,
                    item_count,
                    next_page_token: parsed.next_page_token,
                })
            }
            Err(err) => {
                PageOutcome::Failed(SearchFailure::new(FailureKind::MalformedBody, err.to_string()))
            }
        },
        403 if is_quota_denial(body) => PageOutcome::QuotaExhausted,
        other => PageOutcome::Failed(SearchFailure::new(
            FailureKind::HttpStatus(other),
            format!("search request returned status {other}"),
        )),
    }
}

fn is_quota_denial(body: &str) -> bool {
    let envelope: ApiErrorEnvelope = match serde_json::from_str(body) {
        Ok(envelope) => envelope,
        Err(_) => return false,
    };
    envelope.error.errors.iter().any(|entry| {
        entry
            .reason
            .as_deref()
            .is_some_and(|reason| QUOTA_REASONS.contains(&reason))
    })
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    #[serde(rename = "channelId")]
    channel_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorEnvelope {
    #[serde(default)]
    error: ApiErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEntry {
    reason: Option<String>,
}
