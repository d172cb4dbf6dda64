#![deny(missing_docs)]
//! langrank command-line interface.
//!
//! Ranks the languages of a GitHub viewer's repositories or of local
//! checkouts and prints the result as text, JSON, Markdown or SVG.

mod github;

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use github::GithubArgs;
use langrank_core::{
    BadgeStyle, RankOptions, Ranking, RepositoryLanguageProfile, ScoreTransform, StdFileSystem,
    TokeiInspector, format_score, parse_alias, parse_top_k, rank_detailed, render_badge,
    render_json, render_ranking_markdown,
};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

pub(crate) type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

#[derive(Parser)]
#[command(name = "langrank", version, about = "Rank your most used programming languages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Debug, Default)]
struct RankArgs {
    /// JSON file with ranking options.
    #[arg(long, env = "LANGRANK_CONFIG")]
    config: Option<PathBuf>,
    /// Languages to exclude (repeatable or comma-separated). Replaces the configured set.
    #[arg(long, value_delimiter = ',')]
    exclude: Vec<String>,
    /// Merge a language variant into a canonical name, as `Variant=Canonical`.
    #[arg(long, value_parser = parse_alias_arg)]
    alias: Vec<(String, String)>,
    /// Number of languages to keep.
    #[arg(long, value_parser = parse_top_k_arg)]
    top_k: Option<usize>,
    /// Score rescaling.
    #[arg(long, value_enum)]
    transform: Option<TransformArg>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum TransformArg {
    LinearNormalize,
    LogCompress,
}

impl From<TransformArg> for ScoreTransform {
    fn from(value: TransformArg) -> Self {
        match value {
            TransformArg::LinearNormalize => ScoreTransform::LinearNormalize,
            TransformArg::LogCompress => ScoreTransform::LogCompress,
        }
    }
}

#[derive(Args, Clone)]
struct OutputArgs {
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
    /// Write the output to a file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(ValueEnum, Copy, Clone, Debug, Eq, PartialEq)]
enum OutputFormat {
    Text,
    Json,
    Markdown,
    Svg,
}

#[derive(Args, Clone)]
#[command(group(
    ArgGroup::new("source")
        .required(true)
        .multiple(true)
        .args(&["dir", "path"])
))]
struct LocalSourceArgs {
    /// Directory whose subdirectories are repositories.
    #[arg(long)]
    dir: Option<PathBuf>,
    /// Repository checkout to include (repeatable).
    #[arg(long)]
    path: Vec<PathBuf>,
    /// Maximum number of checkouts inspected at once.
    #[arg(short = 'j', long, default_value_t = 4)]
    concurrency: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the languages of the GitHub viewer's repositories.
    Github {
        #[command(flatten)]
        github: GithubArgs,
        #[command(flatten)]
        rank: RankArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Rank the languages of local repository checkouts.
    Local {
        #[command(flatten)]
        source: LocalSourceArgs,
        #[command(flatten)]
        rank: RankArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
}

#[cfg(not(test))]
#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Github {
            github,
            rank,
            output,
        } => {
            let options = build_options(&rank)?;
            let client = reqwest::Client::new();
            let profiles = github::fetch_profiles(&client, &github).await?;
            emit_ranking(&profiles, &options, &output).await?
        }
        Commands::Local {
            source,
            rank,
            output,
        } => {
            let options = build_options(&rank)?;
            rank_local_checkouts(&source, &options, &output).await?
        }
    }

    Ok(())
}

#[cfg(test)]
fn main() {}

fn parse_alias_arg(raw: &str) -> Result<(String, String), String> {
    parse_alias(raw).map_err(|err| err.to_string())
}

fn parse_top_k_arg(raw: &str) -> Result<usize, String> {
    parse_top_k(raw).map_err(|err| err.to_string())
}

fn build_options(args: &RankArgs) -> CliResult<RankOptions> {
    let mut options = match &args.config {
        Some(path) => RankOptions::from_json_file(path)?,
        None => RankOptions::default(),
    };
    if !args.exclude.is_empty() {
        options.excluded_languages = args
            .exclude
            .iter()
            .map(|name| name.trim())
            .filter(|name| !name.is_empty())
            .map(String::from)
            .collect();
    }
    options.alias_map.extend(args.alias.iter().cloned());
    if let Some(top_k) = args.top_k {
        options.top_k = top_k;
    }
    if let Some(transform) = args.transform {
        options.score_transform = transform.into();
    }
    options.validate()?;
    Ok(options)
}

async fn rank_local_checkouts(
    source: &LocalSourceArgs,
    options: &RankOptions,
    output: &OutputArgs,
) -> CliResult<()> {
    let paths = resolve_local_paths(source).await?;
    if paths.is_empty() {
        eprintln!("No repositories found to rank.");
    }
    let profiles = inspect_checkouts(paths, source.concurrency).await;
    emit_ranking(&profiles, options, output).await
}

async fn resolve_local_paths(source: &LocalSourceArgs) -> CliResult<Vec<PathBuf>> {
    let mut paths = Vec::new();
    if let Some(dir) = &source.dir {
        paths.extend(load_repo_paths_from_dir(dir).await?);
    }
    paths.extend(source.path.iter().cloned());
    Ok(paths)
}

async fn load_repo_paths_from_dir(path: &Path) -> CliResult<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(path).await?;
    let mut repos = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let file_type = entry.file_type().await?;
        if !file_type.is_dir() {
            continue;
        }
        let entry_path = entry.path();
        if is_hidden_path(&entry_path) {
            continue;
        }
        repos.push(entry_path);
    }
    repos.sort();
    Ok(repos)
}

fn is_hidden_path(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// Inspect checkouts concurrently, keeping input order. Failures are reported and skipped.
async fn inspect_checkouts(
    paths: Vec<PathBuf>,
    concurrency: usize,
) -> Vec<RepositoryLanguageProfile> {
    let concurrency = if concurrency == 0 { 1 } else { concurrency };
    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();

    for (index, path) in paths.into_iter().enumerate() {
        let semaphore = semaphore.clone();
        tasks.spawn(async move {
            let _permit = semaphore.acquire_owned().await;
            let display = path.display().to_string();
            let result = tokio::task::spawn_blocking(move || {
                TokeiInspector::new(StdFileSystem::new()).inspect(&path)
            })
            .await;
            (index, display, result)
        });
    }

    let mut profiles = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, _, Ok(Ok(profile)))) => profiles.push((index, profile)),
            Ok((_, path, Ok(Err(err)))) => eprintln!("Skipping {path}: {err}"),
            Ok((_, path, Err(err))) => eprintln!("Skipping {path}: inspection task failed: {err}"),
            Err(err) => eprintln!("Inspection task failed: {err}"),
        }
    }
    profiles.sort_by_key(|(index, _)| *index);
    profiles.into_iter().map(|(_, profile)| profile).collect()
}

async fn emit_ranking(
    profiles: &[RepositoryLanguageProfile],
    options: &RankOptions,
    output: &OutputArgs,
) -> CliResult<()> {
    let ranking = rank_detailed(profiles, options)?;
    let contents = render_output(&ranking, output.format)?;
    emit_output(output, contents).await
}

fn render_output(ranking: &Ranking, format: OutputFormat) -> CliResult<String> {
    let contents = match format {
        OutputFormat::Text => render_ranking_text(ranking),
        OutputFormat::Json => {
            let mut json = render_json(ranking)?;
            json.push('\n');
            json
        }
        OutputFormat::Markdown => render_ranking_markdown(ranking),
        OutputFormat::Svg => render_badge(ranking, &BadgeStyle::default()),
    };
    Ok(contents)
}

async fn emit_output(output: &OutputArgs, contents: String) -> CliResult<()> {
    if let Some(path) = &output.output {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, contents).await?;
    } else {
        print!("{contents}");
    }
    Ok(())
}

fn render_ranking_text(ranking: &Ranking) -> String {
    let mut output = String::new();
    if ranking.is_empty() {
        let _ = writeln!(output, "No languages ranked.");
        return output;
    }
    let width = ranking
        .entries
        .iter()
        .map(|entry| entry.name.chars().count())
        .max()
        .unwrap_or(0);
    for (index, entry) in ranking.entries.iter().enumerate() {
        let _ = writeln!(
            output,
            "{:>2}. {:<width$}  {}",
            index + 1,
            entry.name,
            format_score(entry.score, ranking.transform),
        );
    }
    output
}
