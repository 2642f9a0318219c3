//! Handler for the `github_pull_requests` tool.

use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, JsonObject};

use super::listing::{ListingArgs, format_date};
use super::registry::{ToolContext, ToolFuture, ToolHandler, parse_args};
use super::schema::schema_for;
use crate::github::{GithubClient, PullRequest};

/// Handler for the `github_pull_requests` tool.
pub struct GithubPullRequestsHandler {
    github: Arc<GithubClient>,
}

impl GithubPullRequestsHandler {
    pub fn new(github: Arc<GithubClient>) -> Self {
        Self { github }
    }
}

fn format_pull_requests(prs: &[PullRequest]) -> String {
    prs.iter()
        .map(|pr| {
            format!(
                "• #{}: {}\n  By: {} | Created: {} | Updated: {}\n  {}",
                pr.number,
                pr.title,
                pr.user.login,
                format_date(&pr.created_at),
                format_date(&pr.updated_at),
                pr.html_url
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

impl ToolHandler for GithubPullRequestsHandler {
    fn name(&self) -> &str {
        "github_pull_requests"
    }

    fn title(&self) -> Option<&str> {
        Some("GitHub: List Pull Requests")
    }

    fn description(&self) -> &str {
        "List pull requests of a GitHub repository with author and dates, filtered by state."
    }

    fn input_schema(&self) -> JsonObject {
        schema_for::<ListingArgs>()
    }

    fn execute(&self, args: JsonObject, _ctx: &ToolContext) -> ToolFuture<'_> {
        Box::pin(async move {
            let args: ListingArgs = parse_args(args)?;
            let prs = self
                .github
                .list_pull_requests(&args.repo, args.status, args.count)
                .await?;

            Ok(CallToolResult::success(vec![Content::text(
                format_pull_requests(&prs),
            )]))
        })
    }
}
