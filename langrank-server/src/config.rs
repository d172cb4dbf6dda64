//! Server configuration loaded from the environment.

use std::str::FromStr;

use langrank_core::{LangRankError, RankOptions, Result, ViewerQuery};

/// GitHub GraphQL connection settings.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
    /// GraphQL endpoint URL.
    pub graphql_url: String,
    /// Token used as the query viewer.
    pub token: Option<String>,
    /// User agent sent with every request.
    pub user_agent: String,
    /// Page sizes for the viewer query.
    pub query: ViewerQuery,
}

/// Full server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Listen host.
    pub host: String,
    /// Listen port.
    pub port: u16,
    /// `max-age` for the badge cache directive, in seconds.
    pub cache_seconds: u32,
    /// Origins allowed by CORS.
    pub ui_origins: Vec<String>,
    /// GitHub connection settings.
    pub github: GitHubConfig,
    /// Ranking options.
    pub options: RankOptions,
}

impl ServerConfig {
    /// Build config from environment variables.
    #[cfg_attr(test, allow(dead_code))]
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = ViewerQuery::default();
        let ui_origins = lookup("LANGRANK_UI_ORIGINS")
            .unwrap_or_else(|| "http://127.0.0.1:4200,http://localhost:4200".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(String::from)
            .collect();

        Ok(Self {
            host: lookup("LANGRANK_HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "LANGRANK_PORT", 8080)?,
            cache_seconds: parse_or(&lookup, "LANGRANK_CACHE_SECONDS", 3600)?,
            ui_origins,
            github: GitHubConfig {
                graphql_url: lookup("GITHUB_GRAPHQL_URL")
                    .unwrap_or_else(|| "https://api.github.com/graphql".to_string()),
                token: lookup("GITHUB_TOKEN").filter(|token| !token.trim().is_empty()),
                user_agent: lookup("GITHUB_USER_AGENT")
                    .unwrap_or_else(|| "langrank-server".to_string()),
                query: ViewerQuery {
                    repositories: parse_or(
                        &lookup,
                        "LANGRANK_REPOSITORIES",
                        defaults.repositories,
                    )?,
                    languages: parse_or(
                        &lookup,
                        "LANGRANK_LANGUAGES_PER_REPO",
                        defaults.languages,
                    )?,
                },
            },
            options: RankOptions::from_lookup(&lookup)?,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| LangRankError::invalid_input(format!("{key} has invalid value: {raw}"))),
        _ => Ok(default),
    }
}
