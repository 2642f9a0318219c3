//! HTTP plumbing for the GitHub REST API.

use std::fmt;
use std::time::Duration;

use anyhow::Result;
use http::header::{ACCEPT, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

use super::error::UpstreamError;
use super::models::{Issue, Languages, PullRequest, Repository};
use crate::config::GithubConfig;
use crate::types::RepoSlug;

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github+json";

/// GitHub caps `per_page` at 100; larger requests are clamped.
pub const MAX_PER_PAGE: u64 = 100;

/// `state` filter accepted by the issue and pull request listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum StateFilter {
    #[default]
    Open,
    Closed,
    All,
}

impl StateFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::All => "all",
        }
    }
}

impl fmt::Display for StateFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Shape of GitHub's JSON error bodies.
#[derive(Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Unauthenticated GitHub API client.
///
/// Cheap to share behind an `Arc`; the inner `reqwest::Client` pools
/// connections across calls.
#[derive(Debug, Clone)]
pub struct GithubClient {
    base_url: Url,
    client: reqwest::Client,
}

impl GithubClient {
    /// Build a client from configuration.
    ///
    /// Fails if the base URL does not parse or cannot carry a path.
    pub fn new(config: &GithubConfig) -> Result<Self> {
        let base_url = Url::parse(&config.api_base_url).map_err(|e| {
            anyhow::anyhow!("Invalid GitHub API URL `{}`: {}", config.api_base_url, e)
        })?;
        if base_url.cannot_be_a_base() {
            return Err(anyhow::anyhow!(
                "GitHub API URL `{}` cannot be used as a base URL",
                config.api_base_url
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_MEDIA_TYPE));

        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { base_url, client })
    }

    /// The API root requests are issued against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /repos/{owner}/{repo}/issues?state=..&per_page=..`
    pub async fn list_issues(
        &self,
        repo: &RepoSlug,
        state: StateFilter,
        per_page: u64,
    ) -> Result<Vec<Issue>, UpstreamError> {
        let url = self.listing_url(repo, "issues", state, per_page)?;
        self.get_json(url).await
    }

    /// `GET /repos/{owner}/{repo}/pulls?state=..&per_page=..`
    pub async fn list_pull_requests(
        &self,
        repo: &RepoSlug,
        state: StateFilter,
        per_page: u64,
    ) -> Result<Vec<PullRequest>, UpstreamError> {
        let url = self.listing_url(repo, "pulls", state, per_page)?;
        self.get_json(url).await
    }

    /// `GET /repos/{owner}/{repo}`
    pub async fn get_repository(&self, repo: &RepoSlug) -> Result<Repository, UpstreamError> {
        let url = self.repo_url(repo, &[])?;
        self.get_json(url).await
    }

    /// `GET /repos/{owner}/{repo}/languages`
    pub async fn get_languages(&self, repo: &RepoSlug) -> Result<Languages, UpstreamError> {
        let url = self.repo_url(repo, &["languages"])?;
        self.get_json(url).await
    }

    fn listing_url(
        &self,
        repo: &RepoSlug,
        resource: &str,
        state: StateFilter,
        per_page: u64,
    ) -> Result<Url, UpstreamError> {
        let mut url = self.repo_url(repo, &[resource])?;
        url.query_pairs_mut()
            .append_pair("state", state.as_str())
            .append_pair("per_page", &per_page.min(MAX_PER_PAGE).to_string());
        Ok(url)
    }

    fn repo_url(&self, repo: &RepoSlug, tail: &[&str]) -> Result<Url, UpstreamError> {
        let (owner, name) = repo
            .owner()
            .zip(repo.repo())
            .ok_or_else(|| UpstreamError::Network(format!("Invalid repository `{}`", repo)))?;

        let mut url = self.base_url.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|_| {
                UpstreamError::Network(format!("Invalid base URL `{}`", self.base_url))
            })?;
            segments.pop_if_empty().extend(["repos", owner, name]);
            segments.extend(tail);
        }
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, UpstreamError> {
        debug!(url = %url, "GitHub API request");

        let response = self.client.get(url.clone()).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "GitHub API request failed");
            UpstreamError::from(e)
        })?;

        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ApiErrorBody>(&body)
                .map(|b| b.message)
                .unwrap_or_else(|_| {
                    status
                        .canonical_reason()
                        .unwrap_or("Unknown error")
                        .to_string()
                });
            warn!(url = %url, status = status.as_u16(), %message, "GitHub API returned an error");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GithubClient {
        GithubClient::new(&GithubConfig {
            api_base_url: server.uri(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_base_url() {
        let cfg = GithubConfig {
            api_base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(GithubClient::new(&cfg).is_err());

        let cfg = GithubConfig {
            api_base_url: "mailto:octocat@github.com".to_string(),
            ..Default::default()
        };
        assert!(GithubClient::new(&cfg).is_err());
    }

    #[test]
    fn test_repo_url_building() {
        let client = GithubClient::new(&GithubConfig {
            api_base_url: "https://ghe.example.com/api/v3/".to_string(),
            ..Default::default()
        })
        .unwrap();

        let url = client
            .repo_url(&RepoSlug::new("rust-lang/rust"), &["languages"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://ghe.example.com/api/v3/repos/rust-lang/rust/languages"
        );
    }

    #[test]
    fn test_state_filter_serde() {
        let state: StateFilter = serde_json::from_value(json!("closed")).unwrap();
        assert_eq!(state, StateFilter::Closed);
        assert_eq!(StateFilter::default(), StateFilter::Open);
        assert!(serde_json::from_value::<StateFilter>(json!("archived")).is_err());
        assert_eq!(StateFilter::All.to_string(), "all");
    }

    #[tokio::test]
    async fn test_list_issues_sends_query_and_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/issues"))
            .and(query_param("state", "closed"))
            .and(query_param("per_page", "3"))
            .and(header("user-agent", "mcp-lambda-agent"))
            .and(header("accept", "application/vnd.github+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "number": 7, "title": "Bug", "html_url": "https://github.com/octo/hello/issues/7" }
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let issues = client_for(&server)
            .list_issues(&RepoSlug::new("octo/hello"), StateFilter::Closed, 3)
            .await
            .unwrap();

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].number, 7);
    }

    #[tokio::test]
    async fn test_per_page_clamped_to_github_limit() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/pulls"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let pulls = client_for(&server)
            .list_pull_requests(&RepoSlug::new("octo/hello"), StateFilter::All, 150)
            .await
            .unwrap();
        assert!(pulls.is_empty());
    }

    #[tokio::test]
    async fn test_error_status_uses_github_message() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octo/missing"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })),
            )
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_repository(&RepoSlug::new("octo/missing"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            UpstreamError::Status {
                status: 404,
                message: "Not Found".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_error_status_without_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/languages"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .get_languages(&RepoSlug::new("octo/hello"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            UpstreamError::Status {
                status: 503,
                message: "Service Unavailable".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/repos/octo/hello/pulls"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "not": "a list" })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .list_pull_requests(&RepoSlug::new("octo/hello"), StateFilter::Open, 10)
            .await
            .unwrap_err();

        assert!(matches!(err, UpstreamError::Decode(_)));
    }

    #[tokio::test]
    async fn test_network_failure() {
        // Nothing listens on port 1, so the connection is refused.
        let client = GithubClient::new(&GithubConfig {
            api_base_url: "http://127.0.0.1:1".to_string(),
            timeout_secs: 2,
            ..Default::default()
        })
        .unwrap();

        let err = client
            .get_repository(&RepoSlug::new("octo/hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, UpstreamError::Network(_)));
    }
}
