use crate::api_client::{Event, EventEntry, SentryApi};
use crate::error::SentryError;
use crate::session::SentrySession;
use rmcp::model::{
    CallToolResult, GetPromptResult, PromptMessage, PromptMessageRole,
};
use schemars::JsonSchema;
use serde::Deserialize;
use url::Url;

#[derive(Debug, Deserialize, JsonSchema)]
pub struct GetSentryIssueInput {
    #[schemars(description = "Sentry issue ID or URL to analyze")]
    pub issue_id_or_url: String,
}

/// An issue joined with its latest event's stacktrace, ready to render.
/// Built once per invocation and discarded after rendering.
#[derive(Debug, Clone)]
pub struct SentryIssueData {
    pub title: String,
    pub issue_id: String,
    pub status: String,
    pub level: String,
    pub first_seen: String,
    pub last_seen: String,
    pub count: u64,
    pub stacktrace: String,
}

impl SentryIssueData {
    /// Renders the fixed report layout. Downstream consumers treat this as
    /// display text, so labels and field order must not change.
    pub fn to_text(&self) -> String {
        format!(
            "Sentry Issue: {}\n\
             Issue ID: {}\n\
             Status: {}\n\
             Level: {}\n\
             First Seen: {}\n\
             Last Seen: {}\n\
             Event Count: {}\n\
             \n\
             {}",
            self.title,
            self.issue_id,
            self.status,
            self.level,
            self.first_seen,
            self.last_seen,
            self.count,
            self.stacktrace
        )
    }
    pub fn to_tool_result(&self) -> CallToolResult {
        CallToolResult::success(vec![rmcp::model::Content::text(self.to_text())])
    }
    pub fn to_prompt_result(&self) -> GetPromptResult {
        GetPromptResult {
            description: Some(format!("Sentry Issue: {}", self.title)),
            messages: vec![PromptMessage::new_text(
                PromptMessageRole::User,
                self.to_text(),
            )],
        }
    }
}

/// Extracts the numeric issue ID from either a full URL or a standalone ID.
///
/// URLs must point at a `*.sentry.io` host and carry an `/issues/{id}` path;
/// whatever form the input takes, the final token must be all decimal digits.
/// The ID is returned as the original string to keep leading zeros intact.
pub fn extract_issue_id(issue_id_or_url: &str) -> Result<String, SentryError> {
    if issue_id_or_url.is_empty() {
        return Err(SentryError::InvalidIdentifier(
            "Missing issue_id_or_url argument".to_string(),
        ));
    }

    let issue_id = if issue_id_or_url.starts_with("http://")
        || issue_id_or_url.starts_with("https://")
    {
        let parsed = Url::parse(issue_id_or_url).map_err(|_| {
            SentryError::InvalidIdentifier(
                "Invalid Sentry URL. Must be a URL ending with .sentry.io".to_string(),
            )
        })?;
        if !parsed
            .host_str()
            .is_some_and(|host| host.ends_with(".sentry.io"))
        {
            return Err(SentryError::InvalidIdentifier(
                "Invalid Sentry URL. Must be a URL ending with .sentry.io".to_string(),
            ));
        }
        let path_parts: Vec<&str> = parsed
            .path()
            .split('/')
            .filter(|part| !part.is_empty())
            .collect();
        if path_parts.len() < 2 || path_parts[0] != "issues" {
            return Err(SentryError::InvalidIdentifier(
                "Invalid Sentry issue URL. Path must contain '/issues/{issue_id}'".to_string(),
            ));
        }
        path_parts[path_parts.len() - 1].to_string()
    } else {
        issue_id_or_url.to_string()
    };

    if issue_id.is_empty() || !issue_id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SentryError::InvalidIdentifier(
            "Invalid Sentry issue ID. Must be a numeric value.".to_string(),
        ));
    }

    Ok(issue_id)
}

/// Formats the exception stacktraces of an event into display text.
///
/// Each exception renders a header line, then its frames with any source
/// context indented beneath. Events with no exception entries render the
/// sentinel "No stacktrace found".
pub fn create_stacktrace(latest_event: &Event) -> String {
    let mut stacktraces = Vec::new();
    for entry in &latest_event.entries {
        let EventEntry::Exception { data } = entry else {
            continue;
        };
        for exception in &data.values {
            let mut text = format!(
                "Exception: {}: {}\n\n",
                exception.exception_type, exception.value
            );
            if let Some(stacktrace) = &exception.stacktrace {
                text.push_str("Stacktrace:\n");
                for frame in &stacktrace.frames {
                    let filename = frame.filename.as_deref().unwrap_or("Unknown");
                    let line_no = frame
                        .line_no
                        .map_or_else(|| "?".to_string(), |n| n.to_string());
                    let function = frame.function.as_deref().unwrap_or("Unknown");
                    text.push_str(&format!("{}:{} in {}\n", filename, line_no, function));
                    for context_line in &frame.context {
                        text.push_str(&format!("    {}\n", context_line.1));
                    }
                    text.push('\n');
                }
            }
            stacktraces.push(text);
        }
    }
    if stacktraces.is_empty() {
        "No stacktrace found".to_string()
    } else {
        stacktraces.join("\n")
    }
}

/// Resolves the identifier, fetches metadata and the latest event's
/// stacktrace, and assembles the report. The two fetches are sequential;
/// a failure at any step surfaces immediately with no partial result.
pub async fn handle_sentry_issue(
    client: &impl SentryApi,
    auth_token: &str,
    issue_id_or_url: &str,
) -> Result<SentryIssueData, SentryError> {
    let issue_id = extract_issue_id(issue_id_or_url)?;
    let issue = client.get_issue(auth_token, &issue_id).await?;
    let hashes = client.get_issue_hashes(auth_token, &issue_id).await?;
    let Some(first_hash) = hashes.first() else {
        return Err(SentryError::NoEvents);
    };
    let stacktrace = create_stacktrace(&first_hash.latest_event);
    Ok(SentryIssueData {
        title: issue.title,
        issue_id,
        status: issue.status,
        level: issue.level,
        first_seen: issue.first_seen,
        last_seen: issue.last_seen,
        count: issue.count,
        stacktrace,
    })
}

pub async fn execute(
    client: &impl SentryApi,
    session: &SentrySession,
    input: GetSentryIssueInput,
) -> Result<SentryIssueData, SentryError> {
    let auth_token = session.token()?;
    handle_sentry_issue(client, auth_token, &input.issue_id_or_url).await
}
