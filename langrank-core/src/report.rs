//! Report formatting utilities for rankings.

use std::fmt::Write;

use serde::Serialize;

use crate::config::ScoreTransform;
use crate::domain::Ranking;

/// Format a score for display according to the transform that produced it.
pub fn format_score(score: f64, transform: ScoreTransform) -> String {
    match transform {
        ScoreTransform::LinearNormalize => format!("{score:.2}%"),
        ScoreTransform::LogCompress => format!("{score:.3}"),
    }
}

/// Render a ranking as a Markdown table.
pub fn render_ranking_markdown(ranking: &Ranking) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# Language Ranking\n");
    let _ = writeln!(output, "- Transform: `{}`", ranking.transform);
    let _ = writeln!(output, "- Top raw score: {:.2}\n", ranking.max_raw_score);

    if ranking.is_empty() {
        let _ = writeln!(output, "No languages ranked.");
        return output;
    }

    let _ = writeln!(output, "| # | Language | Score |");
    let _ = writeln!(output, "|---|----------|-------|");
    for (index, entry) in ranking.entries.iter().enumerate() {
        let _ = writeln!(
            output,
            "| {} | {} | {} |",
            index + 1,
            escape_table_cell(&entry.name),
            format_score(entry.score, ranking.transform)
        );
    }
    output
}

/// Render any serializable payload as JSON.
pub fn render_json<T: Serialize + ?Sized>(payload: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(payload)
}

fn escape_table_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
