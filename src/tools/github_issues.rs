//! Handler for the `github_issues` tool.
//!
//! Lists issues of a repository, one bullet per issue.

use std::sync::Arc;

use rmcp::model::{CallToolResult, Content, JsonObject};

use super::listing::ListingArgs;
use super::registry::{ToolContext, ToolFuture, ToolHandler, parse_args};
use super::schema::schema_for;
use crate::github::{GithubClient, Issue};

/// Handler for the `github_issues` tool.
pub struct GithubIssuesHandler {
    github: Arc<GithubClient>,
}

impl GithubIssuesHandler {
    pub fn new(github: Arc<GithubClient>) -> Self {
        Self { github }
    }
}

/// `• #12: Title` followed by the indented URL; entries separated by a blank line.
fn format_issues(issues: &[Issue]) -> String {
    issues
        .iter()
        .map(|issue| format!("• #{}: {}\n  {}", issue.number, issue.title, issue.html_url))
        .collect::<Vec<_>>()
        .join("\n\n")
}

impl ToolHandler for GithubIssuesHandler {
    fn name(&self) -> &str {
        "github_issues"
    }

    fn title(&self) -> Option<&str> {
        Some("GitHub: List Issues")
    }

    fn description(&self) -> &str {
        "List issues of a GitHub repository, filtered by state."
    }

    fn input_schema(&self) -> JsonObject {
        schema_for::<ListingArgs>()
    }

    fn execute(&self, args: JsonObject, _ctx: &ToolContext) -> ToolFuture<'_> {
        Box::pin(async move {
            let args: ListingArgs = parse_args(args)?;
            let issues = self
                .github
                .list_issues(&args.repo, args.status, args.count)
                .await?;

            Ok(CallToolResult::success(vec![Content::text(format_issues(
                &issues,
            ))]))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GithubConfig;
    use crate::tools::{DispatchError, ToolRegistry};
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn registry_for(server: &MockServer) -> ToolRegistry {
        let github = GithubClient::new(&GithubConfig {
            api_base_url: server.uri(),
            ..Default::default()
        })
        .unwrap();
        ToolRegistry::new().register_handler(GithubIssuesHandler::new(Arc::new(github)))
    }

    fn text(result: &CallToolResult) -> String {
        result.content[0]
            .as_text()
            .map(|t| t.text.clone())
            .unwrap_or_default()
    }

    #[tokio::test]
    async fn test_lists_issues_in_order() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/issues"))
            .and(query_param("state", "all"))
            .and(query_param("per_page", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "number": 9, "title": "Newest", "html_url": "https://github.com/octo/hello/issues/9" },
                { "number": 3, "title": "Older", "html_url": "https://github.com/octo/hello/issues/3" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let args = json!({ "repo": "octo/hello", "status": "all", "count": 2 });
        let result = registry_for(&server)
            .dispatch("github_issues", args.as_object().cloned().unwrap(), &ToolContext::new())
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(
            text(&result),
            "• #9: Newest\n  https://github.com/octo/hello/issues/9\n\n\
             • #3: Older\n  https://github.com/octo/hello/issues/3"
        );
    }

    #[tokio::test]
    async fn test_defaults_sent_upstream() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/issues"))
            .and(query_param("state", "open"))
            .and(query_param("per_page", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let args = json!({ "repo": "octo/hello" });
        let result = registry_for(&server)
            .dispatch("github_issues", args.as_object().cloned().unwrap(), &ToolContext::new())
            .await
            .unwrap();

        // An empty listing is not an error.
        assert_eq!(result.is_error, Some(false));
        assert_eq!(result.content.len(), 1);
        assert_eq!(text(&result), "");
    }

    #[tokio::test]
    async fn test_count_above_page_limit_is_forwarded() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/issues"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "number": 1, "title": "Only", "html_url": "https://github.com/octo/hello/issues/1" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let args = json!({ "repo": "octo/hello", "count": 150 });
        let result = registry_for(&server)
            .dispatch("github_issues", args.as_object().cloned().unwrap(), &ToolContext::new())
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(false));
        assert_eq!(
            text(&result),
            "• #1: Only\n  https://github.com/octo/hello/issues/1"
        );
    }

    #[tokio::test]
    async fn test_invalid_status_makes_no_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let args = json!({ "repo": "octo/hello", "status": "archived" });
        let err = registry_for(&server)
            .dispatch("github_issues", args.as_object().cloned().unwrap(), &ToolContext::new())
            .await
            .unwrap_err();

        match err {
            DispatchError::Validation(e) => assert!(e.has_field("status")),
            other => panic!("unexpected error: {other:?}"),
        }
        server.verify().await;
    }

    #[tokio::test]
    async fn test_upstream_failure_is_error_result() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/issues"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "message": "API rate limit exceeded"
            })))
            .mount(&server)
            .await;

        let args = json!({ "repo": "octo/hello" });
        let result = registry_for(&server)
            .dispatch("github_issues", args.as_object().cloned().unwrap(), &ToolContext::new())
            .await
            .unwrap();

        assert_eq!(result.is_error, Some(true));
        assert_eq!(
            text(&result),
            "GitHub API returned 403: API rate limit exceeded"
        );
    }
}
