//! Domain entities for langrank.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::ScoreTransform;
use crate::error::{LangRankError, Result};

/// One language's byte contribution within a single repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageSample {
    /// Language name as reported by the data source.
    pub name: String,
    /// Bytes of source attributed to the language.
    pub bytes: u64,
}

impl LanguageSample {
    /// Create a new sample.
    pub fn new(name: impl Into<String>, bytes: u64) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// Create a sample from a signed size, rejecting negative values.
    pub fn from_signed(name: impl Into<String>, bytes: i64) -> Result<Self> {
        let name = name.into();
        let bytes = u64::try_from(bytes).map_err(|_| {
            LangRankError::invalid_input(format!("negative byte count {bytes} for {name}"))
        })?;
        Ok(Self { name, bytes })
    }
}

/// Language measurements for one repository snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryLanguageProfile {
    /// Repository name, when the source knows it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Language samples, usually ordered by size descending.
    pub samples: Vec<LanguageSample>,
}

impl RepositoryLanguageProfile {
    /// Create an anonymous profile from samples.
    pub fn new(samples: Vec<LanguageSample>) -> Self {
        Self {
            repository: None,
            samples,
        }
    }

    /// Attach a repository name to the profile.
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }
}

/// A ranked language and its rescaled score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RankedEntry {
    /// Canonical language name.
    pub name: String,
    /// Rescaled score.
    pub score: f64,
}

/// Detailed ranker output for presentation layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ranking {
    /// Ranked entries, highest score first.
    pub entries: Vec<RankedEntry>,
    /// Largest accumulated score before rescaling, 0 when empty.
    pub max_raw_score: f64,
    /// Transform applied to the retained scores.
    pub transform: ScoreTransform,
}

impl Ranking {
    /// Returns true when no language survived ranking.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
