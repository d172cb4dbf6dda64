//! GitHub GraphQL fetching for the langrank CLI.

use crate::CliResult;
use clap::Args;
use langrank_core::{GraphqlResponse, RepositoryLanguageProfile, ViewerQuery};
use reqwest::Client;

const DEFAULT_GRAPHQL_URL: &str = "https://api.github.com/graphql";

/// CLI arguments for reaching the GitHub GraphQL API.
#[derive(Args, Clone, Debug)]
pub struct GithubArgs {
    /// GitHub token used as the query viewer.
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
    /// GraphQL endpoint URL.
    #[arg(long, env = "GITHUB_GRAPHQL_URL", default_value = DEFAULT_GRAPHQL_URL)]
    pub api_url: String,
    /// Number of recently updated repositories to fetch.
    #[arg(long, default_value_t = langrank_core::github::DEFAULT_REPOSITORIES)]
    pub repositories: u32,
    /// Number of languages to fetch per repository.
    #[arg(long, default_value_t = langrank_core::github::DEFAULT_LANGUAGES_PER_REPOSITORY)]
    pub languages_per_repo: u32,
    /// User agent sent to GitHub.
    #[arg(long, default_value = "langrank-cli")]
    pub user_agent: String,
}

impl GithubArgs {
    fn query(&self) -> ViewerQuery {
        ViewerQuery {
            repositories: self.repositories,
            languages: self.languages_per_repo,
        }
    }
}

/// Fetch the viewer's repository language profiles.
pub async fn fetch_profiles(
    client: &Client,
    args: &GithubArgs,
) -> CliResult<Vec<RepositoryLanguageProfile>> {
    let token = args
        .token
        .as_deref()
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or("a GitHub token is required (--token or GITHUB_TOKEN)")?;
    let response = client
        .post(&args.api_url)
        .header("User-Agent", &args.user_agent)
        .bearer_auth(token)
        .json(&args.query().request())
        .send()
        .await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(format!("github api error ({status}): {body}").into());
    }
    let body = response.text().await?;
    let profiles = GraphqlResponse::from_json(&body)?.into_profiles()?;
    Ok(profiles)
}
