//! Local checkout inspection.
//!
//! Builds a [`RepositoryLanguageProfile`] from files on disk so local
//! repositories can be ranked the same way as GitHub data.

use std::collections::BTreeMap;
use std::path::Path;

use tokei::{Config, LanguageType};

use crate::domain::{LanguageSample, RepositoryLanguageProfile};
use crate::error::{LangRankError, Result};
use crate::fs::FileSystem;

/// Classifies files with `tokei` and sums their sizes per language.
pub struct TokeiInspector<F: FileSystem> {
    fs: F,
    config: Config,
}

impl<F: FileSystem> TokeiInspector<F> {
    /// Create a new inspector with default `tokei` configuration.
    pub fn new(fs: F) -> Self {
        Self {
            fs,
            config: Config::default(),
        }
    }

    /// Inspect a checkout and return its language profile, largest first.
    pub fn inspect(&self, root: &Path) -> Result<RepositoryLanguageProfile> {
        let files = self.fs.list_files(root)?;
        let mut sizes: BTreeMap<String, u64> = BTreeMap::new();

        for path in files {
            let Some(language) = LanguageType::from_path(&path, &self.config) else {
                continue;
            };
            let len = self.fs.file_len(&path)?;
            let total = sizes.entry(language.to_string()).or_insert(0);
            *total = total.checked_add(len).ok_or_else(|| {
                LangRankError::invalid_input(format!("byte total overflows for {language}"))
            })?;
        }

        let mut samples: Vec<LanguageSample> = sizes
            .into_iter()
            .map(|(name, bytes)| LanguageSample { name, bytes })
            .collect();
        samples.sort_by(|a, b| b.bytes.cmp(&a.bytes));

        let mut profile = RepositoryLanguageProfile::new(samples);
        if let Some(name) = root.file_name().and_then(|name| name.to_str()) {
            profile = profile.with_repository(name);
        }
        Ok(profile)
    }
}
