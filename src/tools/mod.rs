pub mod get_sentry_issue;

use crate::api_client::SentryApiClient;
use crate::error::SentryError;
use crate::session::SentrySession;
use get_sentry_issue::{GetSentryIssueInput, execute};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{
        router::{prompt::PromptRouter, tool::ToolRouter},
        wrapper::Parameters,
    },
    model::*,
    prompt_handler, prompt_router,
    service::RequestContext,
    tool_handler, tool_router,
};
use std::sync::Arc;
use tracing::info;

/// Translates domain failures into the single error shape the transport
/// delivers to callers.
pub fn to_mcp_error(err: SentryError) -> McpError {
    match err {
        SentryError::InvalidIdentifier(_) => McpError::invalid_params(err.to_string(), None),
        SentryError::MissingAuthToken => McpError::invalid_request(err.to_string(), None),
        _ => McpError::internal_error(err.to_string(), None),
    }
}

#[derive(Clone)]
pub struct SentryTools {
    client: Arc<SentryApiClient>,
    session: Arc<SentrySession>,
    tool_router: ToolRouter<SentryTools>,
    prompt_router: PromptRouter<SentryTools>,
}

impl Default for SentryTools {
    fn default() -> Self {
        Self::new()
    }
}

#[tool_router]
impl SentryTools {
    pub fn new() -> Self {
        Self::with_session(SentrySession::from_env())
    }
    pub fn with_session(session: SentrySession) -> Self {
        Self {
            client: Arc::new(SentryApiClient::new()),
            session: Arc::new(session),
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
        }
    }
    #[rmcp::tool(
        description = "Retrieve and analyze a Sentry issue by ID or URL. Use this tool when you need to: \
        investigate production errors and crashes, access detailed stacktraces from Sentry, \
        analyze error patterns and frequencies, get information about when issues first/last occurred, \
        review error counts and status."
    )]
    async fn get_sentry_issue(
        &self,
        Parameters(input): Parameters<GetSentryIssueInput>,
    ) -> Result<CallToolResult, McpError> {
        info!("get_sentry_issue: {:?}", input);
        let issue_data = execute(&*self.client, &self.session, input)
            .await
            .map_err(to_mcp_error)?;
        Ok(issue_data.to_tool_result())
    }
}

#[prompt_router]
impl SentryTools {
    #[rmcp::prompt(
        name = "sentry-issue",
        description = "Retrieve a Sentry issue by ID or URL"
    )]
    async fn sentry_issue(
        &self,
        Parameters(input): Parameters<GetSentryIssueInput>,
    ) -> Result<GetPromptResult, McpError> {
        info!("sentry-issue prompt: {:?}", input);
        let issue_data = execute(&*self.client, &self.session, input)
            .await
            .map_err(to_mcp_error)?;
        Ok(issue_data.to_prompt_result())
    }
}

#[tool_handler]
#[prompt_handler]
impl ServerHandler for SentryTools {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(true),
                }),
                prompts: Some(PromptsCapability {
                    list_changed: Some(true),
                }),
                ..Default::default()
            },
            server_info: Implementation {
                name: "sentry-issue-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                title: None,
                icons: None,
                website_url: None,
            },
            ..Default::default()
        }
    }
}
