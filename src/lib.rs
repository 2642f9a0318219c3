// Core modules
mod config;
mod types;
pub mod api;
pub mod github;

pub mod server;
pub mod tools;

// Re-export key types and functions
pub use config::{
    DEFAULT_GITHUB_API_URL, DEFAULT_SHORT_URL_BASE, DEFAULT_USER_AGENT, GithubConfig,
    ServerConfig, load_server_config,
};
pub use server::McpServer;
pub use tools::{ToolContext, ToolHandler, ToolRegistry};
pub use types::{RepoSlug, ToolName};

use anyhow::Result;
use std::sync::Arc;
use github::GithubClient;
use tools::{
    CalculatorHandler, GithubIssuesHandler, GithubPullRequestsHandler, GithubRepoStatsHandler,
    ScaffoldHandler, ShortenUrlHandler, WeatherLookupHandler,
};

/// Build the registry with every built-in tool.
///
/// The GitHub handlers share one HTTP client configured from `config.github`.
pub fn create_registry(config: &ServerConfig) -> Result<ToolRegistry> {
    let github = Arc::new(GithubClient::new(&config.github)?);

    let registry = ToolRegistry::new()
        .register_handler(GithubIssuesHandler::new(github.clone()))
        .register_handler(GithubPullRequestsHandler::new(github.clone()))
        .register_handler(GithubRepoStatsHandler::new(github))
        .register_handler(CalculatorHandler)
        .register_handler(ShortenUrlHandler::new(config.short_url_base.clone()))
        .register_handler(WeatherLookupHandler)
        .register_handler(ScaffoldHandler);

    Ok(registry)
}

/// Convenience function to create a fully configured MCP server.
pub fn create_server(config: &ServerConfig) -> Result<Arc<McpServer>> {
    let tool_registry = Arc::new(create_registry(config)?);
    Ok(Arc::new(McpServer::new(tool_registry)))
}
