//! Handler for the `github_repo_stats` tool.
//!
//! Fetches repository metadata and the language breakdown concurrently and
//! renders a fixed multi-section report. Either request failing fails the
//! whole call; there is no partial report.

use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, JsonObject};

use super::listing::{RepoArgs, format_date};
use super::registry::{ToolContext, ToolFuture, ToolHandler, parse_args};
use super::schema::schema_for;
use crate::github::{GithubClient, Languages, Repository};
use crate::types::RepoSlug;

/// Number of languages listed in the report.
const TOP_LANGUAGES: usize = 5;

const NO_DESCRIPTION: &str = "No description provided";

/// Handler for the `github_repo_stats` tool.
pub struct GithubRepoStatsHandler {
    github: Arc<GithubClient>,
}

impl GithubRepoStatsHandler {
    pub fn new(github: Arc<GithubClient>) -> Self {
        Self { github }
    }
}

/// Top languages by byte count, e.g. `Rust: 120.5KB, Shell: 2.0KB`.
///
/// Ties are broken by name so the output is stable.
fn format_top_languages(languages: &Languages) -> String {
    let mut entries: Vec<(&String, &u64)> = languages.iter().collect();
    entries.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    entries
        .into_iter()
        .take(TOP_LANGUAGES)
        .map(|(lang, bytes)| format!("{}: {:.1}KB", lang, *bytes as f64 / 1024.0))
        .collect::<Vec<_>>()
        .join(", ")
}

fn format_report(repo: &RepoSlug, data: &Repository, languages: &Languages) -> String {
    let description = data
        .description
        .as_deref()
        .filter(|d| !d.is_empty())
        .unwrap_or(NO_DESCRIPTION);

    format!(
        "Repository: {repo}\n\
         Description: {description}\n\
         \n\
         📊 Statistics:\n\
         • Stars: {stars}\n\
         • Forks: {forks}\n\
         • Watchers: {watchers}\n\
         • Open Issues: {open_issues}\n\
         • Subscribers: {subscribers}\n\
         • Network Size: {network}\n\
         \n\
         🔧 Technical Details:\n\
         • Default Branch: {branch}\n\
         • Top Languages: {languages}\n\
         • Created: {created}\n\
         • Last Updated: {updated}",
        stars = data.stargazers_count,
        forks = data.forks_count,
        watchers = data.watchers_count,
        open_issues = data.open_issues_count,
        subscribers = data.subscribers_count,
        network = data.network_count,
        branch = data.default_branch,
        languages = format_top_languages(languages),
        created = format_date(&data.created_at),
        updated = format_date(&data.updated_at),
    )
}

impl ToolHandler for GithubRepoStatsHandler {
    fn name(&self) -> &str {
        "github_repo_stats"
    }

    fn title(&self) -> Option<&str> {
        Some("GitHub: Repository Statistics")
    }

    fn description(&self) -> &str {
        "Show statistics for a GitHub repository: stars, forks, watchers, issues, \
         default branch, top languages and dates."
    }

    fn input_schema(&self) -> JsonObject {
        schema_for::<RepoArgs>()
    }

    fn execute(&self, args: JsonObject, _ctx: &ToolContext) -> ToolFuture<'_> {
        Box::pin(async move {
            let RepoArgs { repo } = parse_args(args)?;

            let (data, languages) = tokio::try_join!(
                self.github.get_repository(&repo),
                self.github.get_languages(&repo),
            )?;

            Ok(CallToolResult::success(vec![Content::text(format_report(
                &repo, &data, &languages,
            ))]))
        })
    }
}
