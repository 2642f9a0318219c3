//! MCP server implementation using rmcp.
//!
//! Exposes the tool registry over stdio or streamable HTTP.

use std::sync::Arc;

use anyhow::Result;
use axum::Router;
use rmcp::transport::streamable_http_server::{
    StreamableHttpServerConfig, StreamableHttpService, session::local::LocalSessionManager,
};
use rmcp::{
    ErrorData as McpError,
    handler::server::ServerHandler,
    model::*,
    service::{RequestContext, RoleServer},
};
use tracing::info;

use crate::api;
use crate::tools::{DispatchError, ToolContext, ToolRegistry};

/// MCP server that handles protocol requests and delegates to tool handlers.
#[derive(Clone)]
pub struct McpServer {
    tool_registry: Arc<ToolRegistry>,
}

impl McpServer {
    pub fn new(tool_registry: Arc<ToolRegistry>) -> Self {
        Self { tool_registry }
    }

    pub fn tool_registry(&self) -> &Arc<ToolRegistry> {
        &self.tool_registry
    }
}

/// Map a dispatch failure onto a protocol error.
fn dispatch_error_to_mcp(err: DispatchError) -> McpError {
    match err {
        DispatchError::NotFound(_) => McpError::invalid_params(err.to_string(), None),
        DispatchError::Validation(ref validation) => {
            McpError::invalid_params(err.to_string(), Some(validation.to_json()))
        }
    }
}

impl ServerHandler for McpServer {
    fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        // The tool set is small and fixed, so everything fits on one page.
        let result = ListToolsResult {
            tools: self.tool_registry.list_tools(),
            next_cursor: None,
            ..Default::default()
        };
        std::future::ready(Ok(result))
    }

    fn call_tool(
        &self,
        request: CallToolRequestParams,
        _context: RequestContext<RoleServer>,
    ) -> impl Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        let tool_name = request.name.to_string();
        let args = request.arguments.unwrap_or_default();
        let registry = self.tool_registry.clone();

        async move {
            registry
                .dispatch(&tool_name, args, &ToolContext::new())
                .await
                .map_err(dispatch_error_to_mcp)
        }
    }

    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_06_18,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "GitHub repository tools (issues, pull requests, repository stats) plus a few \
                 utilities: a calculator, a URL shortener, a weather lookup and a NestJS/Sentry \
                 scaffolding guide."
                    .to_string(),
            ),
        }
    }
}

/// Start the MCP Streamable HTTP server.
///
/// Serves a stateful session endpoint at `/sse`, a stateless endpoint at
/// `/mcp` and the REST routes from [`api::create_router`] on `bind`,
/// e.g. `0.0.0.0:3942`. Returns after ctrl-c.
pub async fn start_mcp_http(server: Arc<McpServer>, bind: &str) -> Result<()> {
    let tool_registry = server.tool_registry().clone();

    let session_service = StreamableHttpService::new(
        {
            let tool_registry = tool_registry.clone();
            move || Ok(McpServer::new(tool_registry.clone()))
        },
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig {
            stateful_mode: true,
            ..Default::default()
        },
    );

    let stateless_service = StreamableHttpService::new(
        {
            let tool_registry = tool_registry.clone();
            move || Ok(McpServer::new(tool_registry.clone()))
        },
        LocalSessionManager::default().into(),
        StreamableHttpServerConfig {
            stateful_mode: false,
            ..Default::default()
        },
    );

    let router = Router::new()
        .nest_service("/sse", session_service)
        .nest_service("/mcp", stateless_service)
        .merge(api::create_router(tool_registry));

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(
        "MCP HTTP server listening on http://{} (/sse, /mcp, /tools)",
        bind
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down MCP HTTP server");
        })
        .await?;

    Ok(())
}
