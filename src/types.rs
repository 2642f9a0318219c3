//! NewType wrappers for strong typing across tools and the GitHub client.
//!
//! These types prevent accidental mixing of semantically different strings
//! (e.g., passing a tool name where a repository slug is expected).

use schemars::{JsonSchema, Schema, SchemaGenerator, json_schema};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Macro to generate a NewType wrapper with standard trait implementations.
macro_rules! newtype_string {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new instance.
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Get the inner value as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner String.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

newtype_string!(
    /// Name of a registered tool as advertised through `tools/list`
    /// (e.g., "github_issues").
    ToolName
);

newtype_string!(
    /// GitHub repository identifier in `owner/name` form.
    ///
    /// The wrapper does not validate on construction. Its schema carries
    /// [`REPO_SLUG_PATTERN`], which tool arguments are checked against
    /// before a handler ever builds one.
    RepoSlug
);

impl RepoSlug {
    /// Owner half of the slug, if the slug is well formed.
    pub fn owner(&self) -> Option<&str> {
        self.0.split_once('/').map(|(owner, _)| owner)
    }

    /// Repository half of the slug, if the slug is well formed.
    pub fn repo(&self) -> Option<&str> {
        self.0.split_once('/').map(|(_, repo)| repo)
    }
}

/// Accepted form of a [`RepoSlug`]: `owner/name`, both halves made of ASCII
/// alphanumerics, `-`, `_` and `.`, and neither half `.` or `..`. This also
/// keeps the slug from escaping the `/repos/{owner}/{name}` path.
pub const REPO_SLUG_PATTERN: &str = r"^(?!\.\.?/)[A-Za-z0-9_.-]+/(?!\.\.?$)[A-Za-z0-9_.-]+$";

impl JsonSchema for RepoSlug {
    fn schema_name() -> Cow<'static, str> {
        "RepoSlug".into()
    }

    fn inline_schema() -> bool {
        true
    }

    fn json_schema(_generator: &mut SchemaGenerator) -> Schema {
        json_schema!({
            "type": "string",
            "pattern": REPO_SLUG_PATTERN,
        })
    }
}
