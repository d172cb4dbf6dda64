#![deny(missing_docs)]
//! langrank core library.
//!
//! Turns per-repository language byte counts into a ranked, rescaled list
//! of languages, and renders that list as reports or an SVG badge.

pub mod badge;
pub mod config;
pub mod domain;
pub mod error;
pub mod fs;
/// GitHub GraphQL query and response decoding.
pub mod github;
pub mod inspector;
pub mod ranker;
pub mod report;

pub use badge::{BadgeStyle, render_badge};
pub use config::{RankOptions, ScoreTransform, parse_alias, parse_top_k};
pub use domain::{LanguageSample, RankedEntry, Ranking, RepositoryLanguageProfile};
pub use error::{LangRankError, Result};
pub use fs::{FileSystem, StdFileSystem};
pub use github::{GraphqlResponse, ViewerQuery};
pub use inspector::TokeiInspector;
pub use ranker::{rank, rank_detailed};
pub use report::{format_score, render_json, render_ranking_markdown};
