//! Built-in tools and the registry that validates and routes calls to them.
//!
//! Each tool's arguments are a typed record deriving `JsonSchema`. The
//! registry compiles that schema once and checks raw arguments against it
//! before the handler decodes them.

mod error;
mod listing;
mod registry;
mod schema;

pub use error::{DispatchError, FieldError, FieldProblem, ToolError, ValidationError};
pub use registry::{RegisterError, ToolContext, ToolFuture, ToolHandler, ToolRegistry, parse_args};
pub use schema::{ArgsValidator, schema_for};

// Tool handler implementations
mod calculator;
mod github_issues;
mod github_pull_requests;
mod github_repo_stats;
mod scaffold;
mod shorten_url;
mod weather_lookup;

pub use calculator::{CalculatorHandler, Operation};
pub use github_issues::GithubIssuesHandler;
pub use github_pull_requests::GithubPullRequestsHandler;
pub use github_repo_stats::GithubRepoStatsHandler;
pub use scaffold::ScaffoldHandler;
pub use shorten_url::ShortenUrlHandler;
pub use weather_lookup::WeatherLookupHandler;
