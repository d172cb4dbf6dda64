//! SVG badge rendering.

use std::fmt::Write;

use crate::domain::Ranking;
use crate::report::format_score;

const PADDING: u32 = 12;
const TITLE_HEIGHT: u32 = 28;
const LABEL_WIDTH: u32 = 110;
const VALUE_WIDTH: u32 = 64;

/// Visual parameters for the badge.
#[derive(Debug, Clone, PartialEq)]
pub struct BadgeStyle {
    /// Total width in pixels.
    pub width: u32,
    /// Heading text.
    pub title: String,
    /// Height of each bar.
    pub bar_height: u32,
    /// Vertical gap between rows.
    pub row_gap: u32,
    /// Bar colors, picked by a stable hash of the language name.
    pub palette: Vec<String>,
}

impl Default for BadgeStyle {
    fn default() -> Self {
        Self {
            width: 360,
            title: "Most Used Languages".to_string(),
            bar_height: 10,
            row_gap: 10,
            palette: [
                "#f1502f", "#3572a5", "#dea584", "#00add8", "#f1e05a", "#b07219", "#3178c6",
                "#555555", "#701516", "#178600", "#a97bff", "#e34c26",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

/// Render a ranking as a fixed-width SVG document.
pub fn render_badge(ranking: &Ranking, style: &BadgeStyle) -> String {
    let row_height = style.bar_height + style.row_gap;
    let rows = ranking.entries.len().max(1) as u32;
    let height = PADDING * 2 + TITLE_HEIGHT + rows * row_height;
    let bar_span = style
        .width
        .saturating_sub(PADDING * 2 + LABEL_WIDTH + VALUE_WIDTH)
        .max(1);
    let top = ranking
        .entries
        .first()
        .map(|entry| entry.score)
        .filter(|score| *score > 0.0)
        .unwrap_or(1.0);

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{height}" viewBox="0 0 {w} {height}" role="img" aria-label="{title}">"#,
        w = style.width,
        title = escape_xml(&style.title),
    );
    let _ = writeln!(
        svg,
        r##"<rect width="100%" height="100%" rx="6" fill="#fffefe" stroke="#e4e2e2"/>"##
    );
    let _ = writeln!(
        svg,
        r##"<text x="{PADDING}" y="{y}" font-family="Segoe UI,Helvetica,Arial,sans-serif" font-size="15" font-weight="600" fill="#2f80ed">{}</text>"##,
        escape_xml(&style.title),
        y = PADDING + 16,
    );

    if ranking.is_empty() {
        let _ = writeln!(
            svg,
            r##"<text x="{PADDING}" y="{y}" font-family="Segoe UI,Helvetica,Arial,sans-serif" font-size="12" fill="#434d58">No languages</text>"##,
            y = PADDING + TITLE_HEIGHT + style.bar_height,
        );
    }

    for (index, entry) in ranking.entries.iter().enumerate() {
        let y = PADDING + TITLE_HEIGHT + index as u32 * row_height;
        let text_y = y + style.bar_height;
        let ratio = (entry.score / top).clamp(0.0, 1.0);
        let bar_width = (ratio * f64::from(bar_span)).round().max(2.0);
        let color = color_for(&entry.name, &style.palette);
        let _ = writeln!(
            svg,
            r##"<text x="{PADDING}" y="{text_y}" font-family="Segoe UI,Helvetica,Arial,sans-serif" font-size="12" fill="#434d58">{}</text>"##,
            escape_xml(&entry.name),
        );
        let _ = writeln!(
            svg,
            r#"<rect x="{x}" y="{y}" width="{bar_width}" height="{h}" rx="3" fill="{color}"/>"#,
            x = PADDING + LABEL_WIDTH,
            h = style.bar_height,
        );
        let _ = writeln!(
            svg,
            r##"<text x="{x}" y="{text_y}" font-family="Segoe UI,Helvetica,Arial,sans-serif" font-size="11" fill="#434d58">{}</text>"##,
            format_score(entry.score, ranking.transform),
            x = PADDING + LABEL_WIDTH + bar_span + 8,
        );
    }

    svg.push_str("</svg>\n");
    svg
}

fn color_for<'a>(name: &str, palette: &'a [String]) -> &'a str {
    if palette.is_empty() {
        return "#858585";
    }
    // FNV-1a, stable across runs and toolchains.
    let hash = name.bytes().fold(0xcbf2_9ce4_8422_2325u64, |acc, byte| {
        (acc ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    });
    &palette[(hash % palette.len() as u64) as usize]
}

fn escape_xml(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
