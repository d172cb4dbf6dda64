//! Ranking configuration.
//!
//! Options can be built from defaults, a JSON file, environment variables,
//! or any mix of those. Environment values overlay whatever the JSON file
//! (named by `LANGRANK_CONFIG`) provides.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{LangRankError, Result};

/// Default number of ranked entries.
pub const DEFAULT_TOP_K: usize = 12;

/// Environment variable naming a JSON options file.
pub const ENV_CONFIG: &str = "LANGRANK_CONFIG";
/// Environment variable with comma-separated excluded languages.
pub const ENV_EXCLUDE: &str = "LANGRANK_EXCLUDE";
/// Environment variable with comma-separated `Variant=Canonical` aliases.
pub const ENV_ALIASES: &str = "LANGRANK_ALIASES";
/// Environment variable with the number of retained entries.
pub const ENV_TOP_K: &str = "LANGRANK_TOP_K";
/// Environment variable with the score transform name.
pub const ENV_TRANSFORM: &str = "LANGRANK_TRANSFORM";

/// Final rescaling applied to retained scores.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ScoreTransform {
    /// Scores become percentages of the shown total and sum to 100.
    #[default]
    LinearNormalize,
    /// Scores are log10-compressed and divided by the log of the total.
    LogCompress,
}

impl ScoreTransform {
    /// Stable configuration name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoreTransform::LinearNormalize => "linear-normalize",
            ScoreTransform::LogCompress => "log-compress",
        }
    }
}

impl fmt::Display for ScoreTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoreTransform {
    type Err = LangRankError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "linear-normalize" | "linear" => Ok(ScoreTransform::LinearNormalize),
            "log-compress" | "log" => Ok(ScoreTransform::LogCompress),
            other => Err(LangRankError::invalid_input(format!(
                "unknown score transform: {other}"
            ))),
        }
    }
}

/// Options controlling filtering, aliasing, truncation and rescaling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RankOptions {
    /// Languages dropped before aggregation.
    pub excluded_languages: BTreeSet<String>,
    /// Variant name to canonical name.
    ///
    /// Exclusion is checked against the name as reported, before aliasing,
    /// so an alias pointing at an excluded name still counts under it.
    pub alias_map: BTreeMap<String, String>,
    /// Number of entries retained after ranking.
    pub top_k: usize,
    /// Final rescaling.
    pub score_transform: ScoreTransform,
}

impl Default for RankOptions {
    fn default() -> Self {
        Self {
            excluded_languages: ["HTML", "CSS"].into_iter().map(String::from).collect(),
            alias_map: BTreeMap::new(),
            top_k: DEFAULT_TOP_K,
            score_transform: ScoreTransform::default(),
        }
    }
}

impl RankOptions {
    /// Parse options from JSON; missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Build options from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build options from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut options = match non_empty(lookup(ENV_CONFIG)) {
            Some(path) => Self::from_json_file(Path::new(&path))?,
            None => Self::default(),
        };
        if let Some(raw) = lookup(ENV_EXCLUDE) {
            options.excluded_languages = parse_list(&raw).collect();
        }
        if let Some(raw) = non_empty(lookup(ENV_ALIASES)) {
            options.alias_map.extend(parse_aliases(&raw)?);
        }
        if let Some(raw) = non_empty(lookup(ENV_TOP_K)) {
            options.top_k = parse_top_k(&raw)?;
        }
        if let Some(raw) = non_empty(lookup(ENV_TRANSFORM)) {
            options.score_transform = raw.parse()?;
        }
        options.validate()?;
        Ok(options)
    }

    /// Reject option values the ranker cannot work with.
    pub fn validate(&self) -> Result<()> {
        if self.top_k == 0 {
            return Err(LangRankError::invalid_input("top_k must be positive"));
        }
        Ok(())
    }

    /// Resolve a language name through the alias map.
    pub fn canonical_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.alias_map.get(name).map(String::as_str).unwrap_or(name)
    }

    /// Returns true when the language is excluded.
    pub fn is_excluded(&self, name: &str) -> bool {
        self.excluded_languages.contains(name)
    }
}

/// Parse a single `Variant=Canonical` alias.
pub fn parse_alias(raw: &str) -> Result<(String, String)> {
    let (variant, canonical) = raw
        .split_once('=')
        .ok_or_else(|| LangRankError::invalid_input(format!("alias missing '=': {raw}")))?;
    let variant = variant.trim();
    let canonical = canonical.trim();
    if variant.is_empty() || canonical.is_empty() {
        return Err(LangRankError::invalid_input(format!(
            "alias needs both names: {raw}"
        )));
    }
    Ok((variant.to_string(), canonical.to_string()))
}

/// Parse a positive `top_k` value.
pub fn parse_top_k(raw: &str) -> Result<usize> {
    let value: usize = raw
        .trim()
        .parse()
        .map_err(|_| LangRankError::invalid_input(format!("top_k must be an integer: {raw}")))?;
    if value == 0 {
        return Err(LangRankError::invalid_input("top_k must be positive"));
    }
    Ok(value)
}

fn parse_aliases(raw: &str) -> Result<Vec<(String, String)>> {
    parse_list(raw).map(|item| parse_alias(&item)).collect()
}

fn parse_list(raw: &str) -> impl Iterator<Item = String> + '_ {
    raw.split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(String::from)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}
