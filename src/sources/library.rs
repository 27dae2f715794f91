use crate::core::matcher::TermMatcher;
use crate::domain::model::{Exercise, ExerciseOrigin, SearchPattern, Tense};
use crate::domain::ports::ExerciseSource;
use crate::utils::error::Result;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::path::Path;

const EMBEDDED_LIBRARY: &str = include_str!("../../data/library.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryEntry {
    pub verb: String,
    pub tense: Tense,
    pub english: String,
    pub spanish: String,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
struct LibraryFile {
    #[serde(default)]
    entry: Vec<LibraryEntry>,
}

/// Static, hand-checked sentences. Small, but the translations are real.
#[derive(Debug, Clone)]
pub struct CuratedLibrary {
    entries: Vec<(LibraryEntry, TermMatcher)>,
}

impl CuratedLibrary {
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_LIBRARY)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: LibraryFile = toml::from_str(content)?;

        let mut entries = Vec::with_capacity(file.entry.len());
        for entry in file.entry {
            let matcher = TermMatcher::new(&entry.answer)?;
            if !matcher.is_match(&entry.english) {
                tracing::warn!(
                    "Skipping library entry for {}: '{}' not found in '{}'",
                    entry.verb,
                    entry.answer,
                    entry.english
                );
                continue;
            }
            entries.push((entry, matcher));
        }

        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> impl Iterator<Item = &LibraryEntry> {
        self.entries.iter().map(|(entry, _)| entry)
    }

    fn pick(&self, pattern: &SearchPattern) -> Option<Exercise> {
        let candidates: Vec<&(LibraryEntry, TermMatcher)> = self
            .entries
            .iter()
            .filter(|(entry, _)| {
                entry.tense == pattern.tense && entry.verb.eq_ignore_ascii_case(&pattern.verb)
            })
            .collect();

        let (entry, matcher) = candidates.choose(&mut rand::thread_rng())?;
        let split = matcher.split(&entry.english)?;

        Some(Exercise {
            id: ExerciseOrigin::Library.new_exercise_id(),
            verb: pattern.verb.clone(),
            spanish_verb: pattern.spanish_verb.clone(),
            tense: pattern.tense,
            parts: split.parts,
            spanish_sentence: entry.spanish.clone(),
            hint: format!("The answer is '{}' (Curated library)", split.matched),
            answer: split.matched,
            origin: ExerciseOrigin::Library,
        })
    }
}

#[async_trait]
impl ExerciseSource for CuratedLibrary {
    fn name(&self) -> &'static str {
        "library"
    }

    async fn fetch(&self, pattern: &SearchPattern) -> Result<Option<Exercise>> {
        Ok(self.pick(pattern))
    }
}
