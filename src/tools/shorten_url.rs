//! Handler for the `shorten_url` tool.
//!
//! A mock: nothing is stored and the short URL does not resolve anywhere.

use rand::Rng;
use rmcp::model::{CallToolResult, Content, JsonObject};
use schemars::JsonSchema;
use serde::Deserialize;

use super::registry::{ToolContext, ToolFuture, ToolHandler, parse_args};
use super::schema::schema_for;

const TOKEN_LEN: usize = 6;
const TOKEN_CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ShortenUrlArgs {
    /// URL to shorten.
    #[schemars(url)]
    pub url: String,
    /// Custom alias for the short URL (3-20 characters).
    #[serde(rename = "customAlias", default)]
    #[schemars(length(min = 3, max = 20))]
    pub custom_alias: Option<String>,
}

/// Random path segment of [`TOKEN_LEN`] lowercase alphanumerics.
pub fn generate_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..TOKEN_LEN)
        .map(|_| TOKEN_CHARSET[rng.gen_range(0..TOKEN_CHARSET.len())] as char)
        .collect()
}

/// Handler for the `shorten_url` tool.
pub struct ShortenUrlHandler {
    base: String,
}

impl ShortenUrlHandler {
    /// `base` is the short-link domain, e.g. `https://short.url`.
    pub fn new(base: impl Into<String>) -> Self {
        let base: String = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn shorten(&self, args: ShortenUrlArgs) -> CallToolResult {
        let segment = match args.custom_alias {
            Some(alias) => alias,
            None => generate_token(&mut rand::thread_rng()),
        };
        let short = format!("{}/{}", self.base, segment);

        CallToolResult::success(vec![Content::text(format!(
            "Original URL: {}\nShortened URL: {}",
            args.url, short
        ))])
    }
}

impl ToolHandler for ShortenUrlHandler {
    fn name(&self) -> &str {
        "shorten_url"
    }

    fn title(&self) -> Option<&str> {
        Some("URL Shortener (mock)")
    }

    fn description(&self) -> &str {
        "Create a mock shortened URL, optionally with a custom alias. Nothing is persisted."
    }

    fn input_schema(&self) -> JsonObject {
        schema_for::<ShortenUrlArgs>()
    }

    fn execute(&self, args: JsonObject, _ctx: &ToolContext) -> ToolFuture<'_> {
        let result = parse_args::<ShortenUrlArgs>(args).map(|args| self.shorten(args));
        Box::pin(std::future::ready(result))
    }
}
