//! GitHub GraphQL profile source.

use std::fmt;

use langrank_core::{GraphqlResponse, RepositoryLanguageProfile};
use log::debug;
use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::config::GitHubConfig;

/// Errors raised while fetching profiles from upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Missing or rejected credentials.
    Auth(String),
    /// Transport failures and unexpected statuses.
    Network(String),
    /// Undecodable or error-bearing responses.
    Decode(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auth(message) => write!(f, "github auth error: {message}"),
            Self::Network(message) => write!(f, "github network error: {message}"),
            Self::Decode(message) => write!(f, "github decode error: {message}"),
        }
    }
}

impl std::error::Error for FetchError {}

/// Supplies repository language profiles for ranking.
pub trait ProfileSource {
    /// Fetch the current snapshot of profiles.
    fn fetch_profiles(&self) -> Result<Vec<RepositoryLanguageProfile>, FetchError>;
}

/// Blocking GitHub GraphQL client.
#[derive(Debug, Clone)]
pub struct GitHubGraphqlClient {
    config: GitHubConfig,
    client: Client,
}

impl GitHubGraphqlClient {
    /// Build a client. Must run outside the async runtime.
    pub fn new(config: GitHubConfig) -> Self {
        Self {
            config,
            client: Client::new(),
        }
    }
}

impl ProfileSource for GitHubGraphqlClient {
    fn fetch_profiles(&self) -> Result<Vec<RepositoryLanguageProfile>, FetchError> {
        let token = self
            .config
            .token
            .as_ref()
            .ok_or_else(|| FetchError::Auth("GITHUB_TOKEN is required".to_string()))?;
        let response = self
            .client
            .post(&self.config.graphql_url)
            .header("User-Agent", &self.config.user_agent)
            .bearer_auth(token)
            .json(&self.config.query.request())
            .send()
            .map_err(|err| FetchError::Network(format!("request failed: {err}")))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(FetchError::Auth(format!("credentials rejected ({status})")));
        }
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(FetchError::Network(format!("api error ({status}): {body}")));
        }

        let body = response
            .text()
            .map_err(|err| FetchError::Network(format!("read body failed: {err}")))?;
        let profiles = GraphqlResponse::from_json(&body)
            .and_then(GraphqlResponse::into_profiles)
            .map_err(|err| FetchError::Decode(err.to_string()))?;
        debug!("fetched {} repository profiles", profiles.len());
        Ok(profiles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::Method::POST;
    use httpmock::MockServer;
    use langrank_core::{LanguageSample, ViewerQuery};

    fn client_for(server: &MockServer, token: Option<&str>) -> GitHubGraphqlClient {
        GitHubGraphqlClient::new(GitHubConfig {
            graphql_url: server.url("/graphql"),
            token: token.map(String::from),
            user_agent: "langrank-tests".to_string(),
            query: ViewerQuery::default(),
        })
    }

    #[test]
    fn fetch_decodes_profiles() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/graphql")
                .header("authorization", "Bearer token")
                .header("user-agent", "langrank-tests")
                .body_contains("ViewerLanguages");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(serde_json::json!({
                    "data": {"viewer": {"repositories": {"nodes": [
                        {"nameWithOwner": "octo/app", "languages": {"edges": [
                            {"size": 10, "node": {"name": "Rust"}}
                        ]}}
                    ]}}}
                }));
        });

        let profiles = client_for(&server, Some("token"))
            .fetch_profiles()
            .expect("profiles");

        mock.assert();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].samples, vec![LanguageSample::new("Rust", 10)]);
    }

    #[test]
    fn missing_token_is_auth_error() {
        let server = MockServer::start();
        let err = client_for(&server, None).fetch_profiles().unwrap_err();
        assert!(matches!(err, FetchError::Auth(_)));
    }

    #[test]
    fn rejected_credentials_are_auth_errors() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(401).body("Bad credentials");
        });

        let err = client_for(&server, Some("bad")).fetch_profiles().unwrap_err();

        mock.assert();
        assert!(matches!(err, FetchError::Auth(_)));
    }

    #[test]
    fn server_errors_are_network_errors() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(502).body("bad gateway");
        });

        let err = client_for(&server, Some("token")).fetch_profiles().unwrap_err();

        mock.assert();
        assert!(matches!(err, FetchError::Network(_)));
        assert!(err.to_string().contains("bad gateway"));
    }

    #[test]
    fn graphql_errors_are_decode_errors() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(POST).path("/graphql");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(serde_json::json!({"errors": [{"message": "rate limited"}]}));
        });

        let err = client_for(&server, Some("token")).fetch_profiles().unwrap_err();

        mock.assert();
        assert_eq!(
            err,
            FetchError::Decode("graphql errors: rate limited".to_string())
        );
    }
}
