use async_trait::async_trait;
use rust_mcp_sdk::macros::{mcp_tool, JsonSchema};
use rust_mcp_sdk::schema::{
    schema_utils::CallToolError, CallToolRequestParams, CallToolResult, ListToolsResult,
    PaginatedRequestParams, RpcError, TextContent,
};
use rust_mcp_sdk::tool_box;
use rust_mcp_sdk::{mcp_server::ServerHandler, McpServer};
use serde::{Deserialize, Serialize};

use daybook_core::assistant::DailyAssistant;
use daybook_core::fetch::{visualize_code, CodeFetcher, ErrorSniffing};

#[derive(Clone)]
pub struct McpContext {
    pub assistant: DailyAssistant,
    pub fetcher: CodeFetcher,
    pub error_sniffing: ErrorSniffing,
}

fn ok_text(content: String) -> Result<CallToolResult, CallToolError> {
    Ok(CallToolResult::text_content(vec![TextContent::from(
        content,
    )]))
}

#[mcp_tool(
    name = "visualize_code",
    description = "Fetch a source file from a GitHub URL and return it wrapped in a prompt for generating an SVG visualization of its structure."
)]
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct VisualizeCodeTool {
    /// GitHub URL of the file (blob URLs are rewritten to raw content)
    pub url: String,
}

#[mcp_tool(
    name = "daily_assistant",
    description = "Daily routine assistant backed by local JSON files. task_type is one of schedule, reminder, note, habit, focus, summary; data is a JSON string (or plain text for notes). Empty data shows the current state."
)]
#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct DailyAssistantTool {
    pub task_type: String,
    /// Task-specific payload, e.g. {"action": "add", "title": "Standup", "time": "09:30"}
    #[serde(default)]
    pub data: String,
}

// Generates enum DaybookTools with variants for each tool
tool_box!(DaybookTools, [VisualizeCodeTool, DailyAssistantTool]);

pub struct DaybookServerHandler {
    pub context: McpContext,
}

#[async_trait]
impl ServerHandler for DaybookServerHandler {
    async fn handle_list_tools_request(
        &self,
        _params: Option<PaginatedRequestParams>,
        _runtime: std::sync::Arc<dyn McpServer>,
    ) -> Result<ListToolsResult, RpcError> {
        Ok(ListToolsResult {
            meta: None,
            next_cursor: None,
            tools: DaybookTools::tools(),
        })
    }

    async fn handle_call_tool_request(
        &self,
        params: CallToolRequestParams,
        _runtime: std::sync::Arc<dyn McpServer>,
    ) -> Result<CallToolResult, CallToolError> {
        let tool = DaybookTools::try_from(params).map_err(CallToolError::new)?;
        match tool {
            DaybookTools::VisualizeCodeTool(tool) => tool.call(&self.context).await,
            DaybookTools::DailyAssistantTool(tool) => tool.call(&self.context),
        }
    }
}

impl VisualizeCodeTool {
    async fn call(&self, context: &McpContext) -> Result<CallToolResult, CallToolError> {
        let reply = visualize_code(&context.fetcher, &self.url, context.error_sniffing).await;
        ok_text(reply)
    }
}

impl DailyAssistantTool {
    fn call(&self, context: &McpContext) -> Result<CallToolResult, CallToolError> {
        tracing::debug!(task_type = %self.task_type, "daily_assistant call");
        ok_text(context.assistant.run(&self.task_type, &self.data))
    }
}
