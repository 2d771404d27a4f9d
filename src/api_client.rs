use crate::error::SentryError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Deserializer};
use std::env;
use tracing::info;

#[async_trait]
pub trait SentryApi: Send + Sync {
    async fn get_issue(&self, auth_token: &str, issue_id: &str) -> Result<Issue, SentryError>;
    async fn get_issue_hashes(
        &self,
        auth_token: &str,
        issue_id: &str,
    ) -> Result<Vec<IssueHash>, SentryError>;
}

pub struct SentryApiClient {
    client: Client,
    base_url: String,
}

/// Issue metadata as returned by `issues/{id}/`. Only the fields the report
/// uses are declared; everything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub title: String,
    pub status: String,
    pub level: String,
    pub first_seen: String,
    pub last_seen: String,
    #[serde(deserialize_with = "count_from_string_or_number")]
    pub count: u64,
}

/// One element of the `issues/{id}/hashes/` list. The first element's
/// `latestEvent` is the representative event the report is built from.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueHash {
    pub latest_event: Event,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Event {
    #[serde(default)]
    pub entries: Vec<EventEntry>,
}

/// Event entries are tagged by `type`; only exception entries carry data
/// the report reads, everything else collapses to `Other`.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventEntry {
    Exception { data: ExceptionData },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExceptionData {
    #[serde(default)]
    pub values: Vec<ExceptionValue>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExceptionValue {
    #[serde(rename = "type")]
    pub exception_type: String,
    pub value: String,
    #[serde(default)]
    pub stacktrace: Option<Stacktrace>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Stacktrace {
    #[serde(default)]
    pub frames: Vec<StackFrame>,
}

/// A call-stack frame. Sentry omits any of these fields for synthetic or
/// minified frames, so all three identity fields are optional; the formatter
/// substitutes placeholders.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StackFrame {
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub line_no: Option<i64>,
    #[serde(default)]
    pub function: Option<String>,
    #[serde(default)]
    pub context: Vec<ContextLine>,
}

/// Source context entries come over the wire as `[lineNumber, codeText]`
/// pairs; only the code text is rendered.
#[derive(Debug, Clone, Deserialize)]
pub struct ContextLine(pub serde_json::Value, pub String);

/// The API serializes `count` as a decimal string on issue payloads but as
/// a plain number elsewhere; accept both.
fn count_from_string_or_number<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }
    match Count::deserialize(deserializer)? {
        Count::Number(n) => Ok(n),
        Count::Text(s) => s.parse().map_err(serde::de::Error::custom),
    }
}

impl SentryApiClient {
    pub fn new() -> Self {
        let host = env::var("SENTRY_HOST").unwrap_or_else(|_| "sentry.io".to_string());
        let org = env::var("SENTRY_ORG").expect("SENTRY_ORG must be set");
        let base_url = format!("https://{}/api/0/organizations/{}", host, org);
        let mut builder = Client::builder();
        if let Ok(proxy_url) = env::var("SOCKS_PROXY").or_else(|_| env::var("socks_proxy")) {
            if let Ok(proxy) = reqwest::Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        } else if let Ok(proxy_url) = env::var("HTTPS_PROXY").or_else(|_| env::var("https_proxy"))
            && let Ok(proxy) = reqwest::Proxy::https(&proxy_url)
        {
            builder = builder.proxy(proxy);
        }
        let client = builder.build().expect("Failed to build HTTP client");
        Self { client, base_url }
    }
    pub fn with_base_url(client: Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

impl Default for SentryApiClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SentryApi for SentryApiClient {
    async fn get_issue(&self, auth_token: &str, issue_id: &str) -> Result<Issue, SentryError> {
        let url = format!("{}/issues/{}/", self.base_url, issue_id);
        info!("GET {}", url);
        let resp = self.client.get(&url).bearer_auth(auth_token).send().await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(SentryError::Unauthorized);
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(SentryError::Transport(format!("{} - {}", status, text)));
        }
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                "Failed to parse issue JSON: {}. Response: {}",
                e,
                &text[..500.min(text.len())]
            );
            SentryError::Transport(format!("JSON parse error: {}", e))
        })
    }
    async fn get_issue_hashes(
        &self,
        auth_token: &str,
        issue_id: &str,
    ) -> Result<Vec<IssueHash>, SentryError> {
        let url = format!("{}/issues/{}/hashes/", self.base_url, issue_id);
        info!("GET {}", url);
        let resp = self.client.get(&url).bearer_auth(auth_token).send().await?;
        let status = resp.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(SentryError::Unauthorized);
        }
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(SentryError::Transport(format!("{} - {}", status, text)));
        }
        let text = resp.text().await?;
        serde_json::from_str(&text).map_err(|e| {
            tracing::error!(
                "Failed to parse hashes JSON: {}. Response: {}",
                e,
                &text[..1000.min(text.len())]
            );
            SentryError::Transport(format!("JSON parse error: {}", e))
        })
    }
}
