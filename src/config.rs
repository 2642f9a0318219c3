use serde::Deserialize;
use std::{env, fs, path::{Path, PathBuf}};

/// Default GitHub REST API root.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// User-Agent sent with every upstream request. GitHub rejects requests
/// without one.
pub const DEFAULT_USER_AGENT: &str = "mcp-lambda-agent";

/// Domain used by the mock URL shortener.
pub const DEFAULT_SHORT_URL_BASE: &str = "https://short.url";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Settings for the outbound GitHub client.
#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    #[serde(default = "default_api_base_url", rename = "apiBaseUrl")]
    pub api_base_url: String,
    #[serde(default = "default_user_agent", rename = "userAgent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs", rename = "timeoutSecs")]
    pub timeout_secs: u64,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Top-level server configuration, built once at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub github: GithubConfig,
    #[serde(default = "default_short_url_base", rename = "shortUrlBase")]
    pub short_url_base: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            github: GithubConfig::default(),
            short_url_base: default_short_url_base(),
        }
    }
}

fn default_api_base_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_short_url_base() -> String {
    DEFAULT_SHORT_URL_BASE.to_string()
}

/// Locate the optional JSON config file.
///
/// An explicit path wins, then `GITHUB_TOOLS_CONFIG`, then `./github-tools.json`.
/// Returns `None` when no file is configured; a missing explicit path is an error.
pub fn resolve_config_path(explicit: Option<&Path>) -> anyhow::Result<Option<PathBuf>> {
    if let Some(p) = explicit {
        if !p.exists() {
            return Err(anyhow::anyhow!(
                "Config file `{}` does not exist",
                p.display()
            ));
        }
        return Ok(Some(p.to_path_buf()));
    }

    if let Ok(p) = env::var("GITHUB_TOOLS_CONFIG") {
        return Ok(Some(PathBuf::from(p)));
    }

    let candidate = PathBuf::from("github-tools.json");
    if candidate.exists() {
        return Ok(Some(candidate));
    }

    Ok(None)
}

/// Replace each `${NAME}` with the value of `NAME`.
///
/// Unset variables and an unterminated `${` are left as written.
fn expand_env_vars(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        let (head, tail) = rest.split_at(start);
        out.push_str(head);

        let Some(end) = tail.find('}') else {
            rest = tail;
            break;
        };
        let reference = &tail[..=end];
        match env::var(&tail[2..end]) {
            Ok(value) => out.push_str(&value),
            Err(_) => out.push_str(reference),
        }
        rest = &tail[end + 1..];
    }

    out.push_str(rest);
    out
}

impl ServerConfig {
    fn with_env_expanded(mut self) -> Self {
        for value in [
            &mut self.github.api_base_url,
            &mut self.github.user_agent,
            &mut self.short_url_base,
        ] {
            *value = expand_env_vars(value);
        }
        self
    }
}

/// Parse a config file, expanding `${VAR}` references in string values.
pub fn load_config_file(path: &Path) -> anyhow::Result<ServerConfig> {
    let raw = fs::read_to_string(path)?;
    let cfg: ServerConfig = serde_json::from_str(&raw)
        .map_err(|e| anyhow::anyhow!("Invalid config file `{}`: {}", path.display(), e))?;
    Ok(cfg.with_env_expanded())
}

/// Load the server configuration: defaults overlaid with the config file, if any.
pub fn load_server_config(explicit: Option<&Path>) -> anyhow::Result<ServerConfig> {
    match resolve_config_path(explicit)? {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            load_config_file(&path)
        }
        None => Ok(ServerConfig::default()),
    }
}
