use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use github_tools_mcp::{ServerConfig, ToolContext, ToolName, create_registry, load_server_config};
use rmcp::model::{JsonObject, RawContent};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

// rmcp imports for MCP stdio server mode
use rmcp::service::ServiceExt;
use rmcp::transport::stdio;

#[derive(Parser)]
#[command(name = "github-tools-mcp")]
#[command(about = "MCP server exposing GitHub repository tools and a few utilities")]
struct Cli {
    /// Path to a JSON config file (defaults to $GITHUB_TOOLS_CONFIG or ./github-tools.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the GitHub REST API base URL
    #[arg(long, global = true, env = "GITHUB_API_URL")]
    github_api_url: Option<String>,
    /// Override the User-Agent sent to GitHub
    #[arg(long, global = true, env = "GITHUB_TOOLS_USER_AGENT")]
    user_agent: Option<String>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run as an MCP stdio server (for use in mcp.json)
    McpStdio,
    /// Run as an MCP HTTP server
    McpHttp {
        /// Bind address, e.g. 0.0.0.0:3942
        #[arg(long, default_value = "0.0.0.0:3942")]
        bind: String,
    },
    /// Print the registered tools and their input schemas
    ListTools,
    /// Invoke a single tool and print its result
    Call {
        tool: ToolName,
        /// Tool arguments as a JSON object
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

impl Cli {
    fn server_config(&self) -> Result<ServerConfig> {
        let mut config = load_server_config(self.config.as_deref())?;
        if let Some(url) = &self.github_api_url {
            config.github.api_base_url = url.clone();
        }
        if let Some(agent) = &self.user_agent {
            config.github.user_agent = agent.clone();
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout belongs to the stdio transport, so logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("github_tools_mcp=info".parse()?)
                .add_directive("rmcp=warn".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.server_config()?;

    match cli.command {
        Commands::McpStdio => {
            info!("Starting MCP stdio server (rmcp)");

            let server = github_tools_mcp::create_server(&config)?;

            // Run as an MCP stdio server. McpServer implements ServerHandler.
            let service = server
                .as_ref()
                .clone()
                .serve(stdio())
                .await
                .inspect_err(|e| tracing::error!("serving error: {:?}", e))?;

            // Block until the MCP session ends.
            service.waiting().await?;
            info!("MCP stdio server session ended");
        }
        Commands::McpHttp { bind } => {
            info!("Starting MCP HTTP server (rmcp) on {}", bind);

            let server = github_tools_mcp::create_server(&config)?;
            github_tools_mcp::server::start_mcp_http(server, &bind).await?;
        }
        Commands::ListTools => {
            let registry = create_registry(&config)?;
            for tool in registry.list_tools() {
                println!("{}", tool.name);
                if let Some(description) = &tool.description {
                    println!("  {}", description);
                }
                println!("  {}", serde_json::to_string(tool.input_schema.as_ref())?);
                println!();
            }
        }
        Commands::Call { tool, args } => {
            let args: JsonObject = serde_json::from_str(&args)
                .context("--args must be a JSON object")?;

            let registry = create_registry(&config)?;
            let result = registry
                .dispatch(tool.as_str(), args, &ToolContext::new())
                .await?;

            for content in &result.content {
                match &content.raw {
                    RawContent::Text(text) => println!("{}", text.text),
                    other => println!("{}", serde_json::to_string(other)?),
                }
            }

            if result.is_error == Some(true) {
                bail!("tool `{}` reported an error", tool);
            }
        }
    }

    Ok(())
}
