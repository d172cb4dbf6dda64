//! GitHub GraphQL request and response shapes.
//!
//! Transport lives in the server and CLI; this module only builds the
//! request body and turns a decoded response into profiles.

use serde::{Deserialize, Serialize};

use crate::domain::{LanguageSample, RepositoryLanguageProfile};
use crate::error::{LangRankError, Result};

/// Default number of repositories requested.
pub const DEFAULT_REPOSITORIES: u32 = 96;
/// Default number of languages requested per repository.
pub const DEFAULT_LANGUAGES_PER_REPOSITORY: u32 = 6;

/// Viewer repositories with their largest languages, most recently updated first.
pub const VIEWER_LANGUAGES_QUERY: &str = r#"
query ViewerLanguages($repositories: Int!, $languages: Int!) {
  viewer {
    repositories(
      first: $repositories
      ownerAffiliations: [OWNER, COLLABORATOR, ORGANIZATION_MEMBER]
      isFork: false
      orderBy: { field: UPDATED_AT, direction: DESC }
    ) {
      nodes {
        nameWithOwner
        languages(first: $languages, orderBy: { field: SIZE, direction: DESC }) {
          edges {
            size
            node {
              name
            }
          }
        }
      }
    }
  }
}
"#;

/// Page sizes for the viewer query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewerQuery {
    /// Repositories to fetch.
    pub repositories: u32,
    /// Languages to fetch per repository.
    pub languages: u32,
}

impl Default for ViewerQuery {
    fn default() -> Self {
        Self {
            repositories: DEFAULT_REPOSITORIES,
            languages: DEFAULT_LANGUAGES_PER_REPOSITORY,
        }
    }
}

impl ViewerQuery {
    /// Build the JSON body for a GraphQL POST.
    pub fn request(&self) -> GraphqlRequest<ViewerQuery> {
        GraphqlRequest {
            query: VIEWER_LANGUAGES_QUERY,
            variables: *self,
        }
    }
}

/// A GraphQL request body.
#[derive(Debug, Clone, Serialize)]
pub struct GraphqlRequest<V: Serialize> {
    /// Query document.
    pub query: &'static str,
    /// Query variables.
    pub variables: V,
}

/// A GraphQL response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlResponse {
    /// Query data, absent when the query failed entirely.
    pub data: Option<ViewerData>,
    /// Errors reported by the API.
    #[serde(default)]
    pub errors: Vec<GraphqlError>,
}

/// A single GraphQL error.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphqlError {
    /// Error message.
    pub message: String,
}

/// Data payload of the viewer query.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerData {
    /// The authenticated user.
    pub viewer: Viewer,
}

/// The authenticated user.
#[derive(Debug, Clone, Deserialize)]
pub struct Viewer {
    /// Repository page.
    pub repositories: RepositoryConnection,
}

/// Page of repositories.
#[derive(Debug, Clone, Deserialize)]
pub struct RepositoryConnection {
    /// Repositories in the page; GitHub may return null entries.
    #[serde(default)]
    pub nodes: Vec<Option<RepositoryNode>>,
}

/// One repository.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepositoryNode {
    /// `owner/name` handle.
    #[serde(default)]
    pub name_with_owner: Option<String>,
    /// Languages by size, null when GitHub cannot compute them.
    #[serde(default)]
    pub languages: Option<LanguageConnection>,
}

/// Page of languages for a repository.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageConnection {
    /// Language edges carrying sizes; null entries are skipped.
    #[serde(default)]
    pub edges: Vec<Option<LanguageEdge>>,
}

/// A language with its byte size.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageEdge {
    /// Bytes of source in the language.
    pub size: i64,
    /// Language node.
    pub node: LanguageNode,
}

/// A language.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageNode {
    /// Language name.
    pub name: String,
}

impl GraphqlResponse {
    /// Parse a raw response body.
    pub fn from_json(body: &str) -> Result<Self> {
        serde_json::from_str(body)
            .map_err(|err| LangRankError::Other(format!("graphql response decode failed: {err}")))
    }

    /// Convert the response into repository profiles.
    pub fn into_profiles(self) -> Result<Vec<RepositoryLanguageProfile>> {
        if !self.errors.is_empty() {
            let messages: Vec<String> = self.errors.into_iter().map(|err| err.message).collect();
            return Err(LangRankError::Other(format!(
                "graphql errors: {}",
                messages.join("; ")
            )));
        }
        let data = self
            .data
            .ok_or_else(|| LangRankError::Other("graphql response missing data".to_string()))?;

        data.viewer
            .repositories
            .nodes
            .into_iter()
            .flatten()
            .map(|repo| {
                let samples = repo
                    .languages
                    .map(|languages| languages.edges)
                    .unwrap_or_default()
                    .into_iter()
                    .flatten()
                    .map(|edge| LanguageSample::from_signed(edge.node.name, edge.size))
                    .collect::<Result<Vec<_>>>()?;
                Ok(RepositoryLanguageProfile {
                    repository: repo.name_with_owner,
                    samples,
                })
            })
            .collect()
    }
}
