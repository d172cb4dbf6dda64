//! Language ranking across repositories.
//!
//! The pipeline is filter, aggregate, rank, rescale. Each repository
//! contributes its within-repository percentages, so every repository gets
//! an equal vote no matter how large it is. Percentages are summed rather
//! than averaged, which rewards languages used across many repositories.

use indexmap::IndexMap;
use log::debug;

use crate::config::{RankOptions, ScoreTransform};
use crate::domain::{RankedEntry, Ranking, RepositoryLanguageProfile};
use crate::error::{LangRankError, Result};

/// Rank languages across profiles and return the rescaled top entries.
pub fn rank(
    profiles: &[RepositoryLanguageProfile],
    options: &RankOptions,
) -> Result<Vec<RankedEntry>> {
    Ok(rank_detailed(profiles, options)?.entries)
}

/// Rank languages and keep the pre-rescale maximum score alongside the entries.
pub fn rank_detailed(
    profiles: &[RepositoryLanguageProfile],
    options: &RankOptions,
) -> Result<Ranking> {
    if options.top_k == 0 {
        return Err(LangRankError::invalid_input("top_k must be positive"));
    }

    let totals = aggregate(profiles, options)?;
    let mut entries: Vec<RankedEntry> = totals
        .into_iter()
        .map(|(name, score)| RankedEntry { name, score })
        .collect();

    // Stable sort keeps first-seen order for equal scores.
    entries.sort_by(|a, b| b.score.total_cmp(&a.score));
    entries.truncate(options.top_k);

    let max_raw_score = entries.first().map(|entry| entry.score).unwrap_or(0.0);
    rescale(&mut entries, options.score_transform);

    Ok(Ranking {
        entries,
        max_raw_score,
        transform: options.score_transform,
    })
}

fn aggregate(
    profiles: &[RepositoryLanguageProfile],
    options: &RankOptions,
) -> Result<IndexMap<String, f64>> {
    let mut totals: IndexMap<String, f64> = IndexMap::new();
    let mut skipped = 0usize;

    for profile in profiles {
        let surviving: Vec<(&str, u64)> = profile
            .samples
            .iter()
            .filter(|sample| !options.is_excluded(&sample.name))
            .map(|sample| (options.canonical_name(&sample.name), sample.bytes))
            .collect();

        let repo_total = surviving.iter().try_fold(0u64, |acc, (_, bytes)| {
            acc.checked_add(*bytes).ok_or_else(|| {
                LangRankError::invalid_input(format!(
                    "byte total overflows for repository {}",
                    profile.repository.as_deref().unwrap_or("<unnamed>")
                ))
            })
        })?;
        if repo_total == 0 {
            skipped += 1;
            continue;
        }

        for (name, bytes) in surviving {
            let percentage = 100.0 * bytes as f64 / repo_total as f64;
            *totals.entry(name.to_string()).or_insert(0.0) += percentage;
        }
    }

    if let Some((name, score)) = totals.iter().find(|(_, score)| !score.is_finite()) {
        return Err(LangRankError::invalid_input(format!(
            "non-finite score {score} for {name}"
        )));
    }

    debug!(
        "aggregated {} languages from {} profiles ({} skipped as empty)",
        totals.len(),
        profiles.len(),
        skipped
    );
    Ok(totals)
}

fn rescale(entries: &mut [RankedEntry], transform: ScoreTransform) {
    let sum: f64 = entries.iter().map(|entry| entry.score).sum();
    if sum <= 0.0 {
        return;
    }
    match transform {
        ScoreTransform::LinearNormalize => {
            for entry in entries.iter_mut() {
                entry.score = entry.score / sum * 100.0;
            }
        }
        ScoreTransform::LogCompress => {
            let denominator = (sum + 1.0).log10();
            for entry in entries.iter_mut() {
                entry.score = (entry.score + 1.0).log10() / denominator;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LanguageSample;
    use std::collections::BTreeSet;

    const EPSILON: f64 = 1e-9;

    fn profile(samples: &[(&str, u64)]) -> RepositoryLanguageProfile {
        RepositoryLanguageProfile::new(
            samples
                .iter()
                .map(|(name, bytes)| LanguageSample::new(*name, *bytes))
                .collect(),
        )
    }

    fn options(top_k: usize, transform: ScoreTransform) -> RankOptions {
        RankOptions {
            excluded_languages: BTreeSet::new(),
            top_k,
            score_transform: transform,
            ..RankOptions::default()
        }
    }

    fn score_of(entries: &[RankedEntry], name: &str) -> f64 {
        entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.score)
            .unwrap_or_else(|| panic!("missing {name}"))
    }

    #[test]
    fn empty_profiles_rank_to_nothing() {
        let ranking = rank_detailed(&[], &RankOptions::default()).expect("rank");
        assert!(ranking.is_empty());
        assert_eq!(ranking.max_raw_score, 0.0);
    }

    #[test]
    fn linear_normalize_matches_worked_example() {
        let profiles = vec![
            profile(&[("X", 80), ("Y", 20)]),
            profile(&[("X", 50), ("Z", 50)]),
        ];
        let ranking =
            rank_detailed(&profiles, &options(3, ScoreTransform::LinearNormalize)).expect("rank");

        let names: Vec<&str> = ranking.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["X", "Z", "Y"]);
        assert!((score_of(&ranking.entries, "X") - 65.0).abs() < EPSILON);
        assert!((score_of(&ranking.entries, "Z") - 25.0).abs() < EPSILON);
        assert!((score_of(&ranking.entries, "Y") - 10.0).abs() < EPSILON);
        assert!((ranking.max_raw_score - 130.0).abs() < EPSILON);
    }

    #[test]
    fn exclusion_happens_before_repository_total() {
        let mut opts = options(5, ScoreTransform::LinearNormalize);
        opts.excluded_languages.insert("HTML".to_string());
        let ranking = rank_detailed(&[profile(&[("HTML", 90), ("X", 10)])], &opts).expect("rank");

        assert_eq!(ranking.entries.len(), 1);
        assert_eq!(ranking.entries[0].name, "X");
        assert!((ranking.max_raw_score - 100.0).abs() < EPSILON);
    }

    #[test]
    fn exclusion_uses_name_before_aliasing() {
        let mut opts = options(5, ScoreTransform::LinearNormalize);
        opts.excluded_languages.insert("CSS".to_string());
        opts.alias_map.insert("SCSS".to_string(), "CSS".to_string());

        let entries = rank(
            &[profile(&[("CSS", 50), ("SCSS", 50), ("Rust", 100)])],
            &opts,
        )
        .expect("rank");

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Rust", "CSS"]);
        assert!((score_of(&entries, "Rust") - 2.0 / 3.0 * 100.0).abs() < 1e-6);
    }

    #[test]
    fn fully_excluded_profile_is_skipped() {
        let mut opts = options(5, ScoreTransform::LinearNormalize);
        opts.excluded_languages.insert("HTML".to_string());
        opts.excluded_languages.insert("CSS".to_string());

        let only_markup = rank(&[profile(&[("HTML", 10), ("CSS", 5)])], &opts).expect("rank");
        assert!(only_markup.is_empty());

        let mixed = rank(
            &[profile(&[("HTML", 10)]), profile(&[("Go", 40), ("Rust", 60)])],
            &opts,
        )
        .expect("rank");
        assert!((score_of(&mixed, "Rust") - 60.0).abs() < EPSILON);
        assert!((score_of(&mixed, "Go") - 40.0).abs() < EPSILON);
    }

    #[test]
    fn zero_byte_profile_contributes_nothing() {
        let opts = options(5, ScoreTransform::LinearNormalize);
        let base = vec![profile(&[("Rust", 3), ("Go", 1)])];
        let mut with_empty = base.clone();
        with_empty.push(profile(&[("Python", 0), ("Rust", 0)]));
        with_empty.push(profile(&[]));

        let a = rank_detailed(&base, &opts).expect("rank");
        let b = rank_detailed(&with_empty, &opts).expect("rank");
        assert_eq!(a, b);
    }

    #[test]
    fn entries_are_truncated_and_sorted() {
        let profiles = vec![
            profile(&[("A", 1), ("B", 2), ("C", 3)]),
            profile(&[("D", 4), ("E", 5), ("F", 6)]),
        ];
        let entries = rank(&profiles, &options(4, ScoreTransform::LinearNormalize)).expect("rank");

        assert_eq!(entries.len(), 4);
        assert!(entries.windows(2).all(|pair| pair[0].score >= pair[1].score));
        let sum: f64 = entries.iter().map(|entry| entry.score).sum();
        assert!((sum - 100.0).abs() < 1e-6);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let profiles = vec![
            profile(&[("Zig", 50), ("Ada", 50)]),
            profile(&[("Nim", 100)]),
        ];
        let entries = rank(&profiles, &options(3, ScoreTransform::LinearNormalize)).expect("rank");
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Nim", "Zig", "Ada"]);

        let again = rank(&profiles, &options(3, ScoreTransform::LinearNormalize)).expect("rank");
        assert_eq!(entries, again);
    }

    #[test]
    fn aliases_merge_regardless_of_order() {
        let mut opts = options(5, ScoreTransform::LinearNormalize);
        opts.alias_map
            .insert("TSX".to_string(), "TypeScript".to_string());

        let forward = vec![
            profile(&[("TSX", 50), ("Rust", 50)]),
            profile(&[("TypeScript", 100)]),
        ];
        let backward = vec![
            profile(&[("TypeScript", 100)]),
            profile(&[("TSX", 50), ("Rust", 50)]),
        ];

        let a = rank_detailed(&forward, &opts).expect("rank");
        let b = rank_detailed(&backward, &opts).expect("rank");
        assert!(a.entries.iter().all(|entry| entry.name != "TSX"));
        assert!((a.max_raw_score - 150.0).abs() < EPSILON);
        assert!(
            (score_of(&a.entries, "TypeScript") - score_of(&b.entries, "TypeScript")).abs()
                < EPSILON
        );
    }

    #[test]
    fn alias_sum_equals_independent_contributions() {
        let mut opts = options(5, ScoreTransform::LinearNormalize);
        opts.alias_map
            .insert("Cuda".to_string(), "C++".to_string());
        let merged = rank_detailed(
            &[profile(&[("Cuda", 1), ("Go", 3)]), profile(&[("C++", 1), ("Go", 1)])],
            &opts,
        )
        .expect("rank");
        // 25% from the first profile plus 50% from the second.
        let cpp_raw = merged.max_raw_score
            * score_of(&merged.entries, "C++")
            / score_of(&merged.entries, "Go");
        assert!((cpp_raw - 75.0).abs() < 1e-6);
        assert!((merged.max_raw_score - 125.0).abs() < EPSILON);
    }

    #[test]
    fn log_compress_bounds_scores_and_keeps_order() {
        let profiles = vec![
            profile(&[("Rust", 9_000), ("Go", 1_000)]),
            profile(&[("Rust", 500), ("Python", 500)]),
            profile(&[("Rust", 100)]),
            profile(&[("Shell", 1)]),
        ];
        let linear =
            rank_detailed(&profiles, &options(10, ScoreTransform::LinearNormalize)).expect("rank");
        let log = rank_detailed(&profiles, &options(10, ScoreTransform::LogCompress)).expect("rank");

        assert!(log.entries.iter().all(|entry| entry.score <= 1.0 + EPSILON));
        assert_eq!(log.entries[0].name, "Rust");
        let linear_names: Vec<&str> = linear.entries.iter().map(|e| e.name.as_str()).collect();
        let log_names: Vec<&str> = log.entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(linear_names, log_names);
        assert_eq!(linear.max_raw_score, log.max_raw_score);

        // Rust 240, Shell 100, Python 50, Go 10.
        let expected_top = (240.0f64 + 1.0).log10() / (400.0f64 + 1.0).log10();
        assert!((log.entries[0].score - expected_top).abs() < 1e-9);
    }

    #[test]
    fn single_language_log_compress_is_one() {
        let entries = rank(
            &[profile(&[("Rust", 42)])],
            &options(3, ScoreTransform::LogCompress),
        )
        .expect("rank");
        assert_eq!(entries.len(), 1);
        assert!((entries[0].score - 1.0).abs() < EPSILON);
    }

    #[test]
    fn zero_top_k_is_invalid() {
        let err = rank(&[], &options(0, ScoreTransform::LinearNormalize)).unwrap_err();
        assert!(matches!(err, LangRankError::InvalidInput(_)));
    }

    #[test]
    fn overflowing_repository_total_is_invalid() {
        let profiles = vec![
            profile(&[("Rust", u64::MAX), ("Go", 1)]).with_repository("octo/huge"),
        ];
        let err = rank(&profiles, &options(3, ScoreTransform::LinearNormalize)).unwrap_err();
        assert!(matches!(err, LangRankError::InvalidInput(_)));
        assert!(err.to_string().contains("octo/huge"));
    }

    #[test]
    fn zero_byte_sample_is_seen_with_zero_score() {
        let entries = rank(
            &[profile(&[("Rust", 10), ("Go", 0)])],
            &options(5, ScoreTransform::LinearNormalize),
        )
        .expect("rank");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].name, "Go");
        assert_eq!(entries[1].score, 0.0);
    }
}
