//! Verb catalog: the verbs on offer and the conjugated forms derived from them.

pub mod inflect;
pub mod patterns;

use crate::domain::model::{SearchPattern, Selection, Tense, Verb};
use crate::utils::error::{Result, TrainerError};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;

const EMBEDDED_VERBS: &str = include_str!("../../data/verbs.toml");

#[derive(Debug, Deserialize)]
struct VerbFile {
    #[serde(default)]
    irregular: Vec<IrregularEntry>,
    #[serde(default)]
    regular: Vec<RegularEntry>,
}

#[derive(Debug, Deserialize)]
struct IrregularEntry {
    english: String,
    spanish: String,
    base: String,
    past: String,
    past_participle: String,
    gerund: String,
    third_person: String,
    object: Option<String>,
    object_spanish: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RegularEntry {
    english: String,
    spanish: String,
    object: Option<String>,
    object_spanish: Option<String>,
}

impl From<IrregularEntry> for Verb {
    fn from(entry: IrregularEntry) -> Self {
        let english = entry.english.trim();
        let infinitive = if english.to_lowercase().starts_with("to ") {
            english.to_string()
        } else {
            format!("To {}", english)
        };
        Verb {
            infinitive,
            spanish: entry.spanish,
            base: entry.base,
            past: entry.past,
            past_participle: entry.past_participle,
            gerund: entry.gerund,
            third_person: entry.third_person,
            object: entry.object.filter(|o| !o.is_empty()),
            object_spanish: entry.object_spanish.filter(|o| !o.is_empty()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct VerbCatalog {
    verbs: Vec<Verb>,
    patterns: Vec<SearchPattern>,
}

impl VerbCatalog {
    /// The verb list shipped with the binary.
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_VERBS)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: VerbFile = toml::from_str(content)?;

        let irregular: Vec<Verb> = file.irregular.into_iter().map(Verb::from).collect();

        // 規則動詞若已出現在不規則清單中則略過
        let regular = file
            .regular
            .into_iter()
            .map(|entry| {
                inflect::regular_verb(
                    &entry.english,
                    &entry.spanish,
                    entry.object.as_deref(),
                    entry.object_spanish.as_deref(),
                )
            })
            .filter(|verb| {
                !irregular
                    .iter()
                    .any(|iv| iv.infinitive == verb.infinitive || iv.base == verb.base)
            })
            .collect::<Vec<_>>();

        let mut verbs = irregular;
        verbs.extend(regular);
        verbs.sort_by(|a, b| a.infinitive.cmp(&b.infinitive));
        verbs.dedup_by(|a, b| a.infinitive == b.infinitive);

        if verbs.is_empty() {
            return Err(TrainerError::CatalogError {
                message: "verb list is empty".to_string(),
            });
        }

        let patterns = verbs.iter().flat_map(patterns::patterns_for_verb).collect();
        tracing::debug!("Loaded {} verbs", verbs.len());

        Ok(Self { verbs, patterns })
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    pub fn patterns(&self) -> &[SearchPattern] {
        &self.patterns
    }

    /// Patterns whose tense and verb are both selected.
    pub fn eligible_patterns(&self, selection: &Selection) -> Vec<SearchPattern> {
        self.patterns
            .iter()
            .filter(|p| selection.includes(p))
            .cloned()
            .collect()
    }

    /// Looks a verb up by "go", "Go" or "To Go".
    pub fn find(&self, name: &str) -> Option<&Verb> {
        let wanted = name.trim().to_lowercase();
        let wanted = wanted.strip_prefix("to ").unwrap_or(&wanted).trim().to_string();
        self.verbs.iter().find(|v| {
            v.base == wanted
                || v.infinitive
                    .to_lowercase()
                    .strip_prefix("to ")
                    .is_some_and(|rest| rest == wanted)
        })
    }

    pub fn search(&self, term: &str) -> Vec<&Verb> {
        let needle = term.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.verbs
            .iter()
            .filter(|v| {
                v.infinitive.to_lowercase().contains(&needle)
                    || v.spanish.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn all_verbs(&self) -> Vec<String> {
        self.verbs.iter().map(|v| v.infinitive.clone()).collect()
    }

    /// Resolves user-typed names ("go", "past-simple", "all") into a selection.
    pub fn resolve_selection(&self, tenses: &[String], verbs: &[String]) -> Result<Selection> {
        let mut selection = Selection::default();

        if tenses.iter().any(|t| t.trim().eq_ignore_ascii_case("all")) {
            selection.select_all_tenses();
        } else {
            for name in tenses {
                let tense = name
                    .parse::<Tense>()
                    .map_err(|reason| TrainerError::InvalidConfigValueError {
                        field: "tenses".to_string(),
                        value: name.clone(),
                        reason,
                    })?;
                if !selection.tenses.contains(&tense) {
                    selection.tenses.push(tense);
                }
            }
        }

        if verbs.iter().any(|v| v.trim().eq_ignore_ascii_case("all")) {
            selection.select_all_verbs(&self.all_verbs());
        } else {
            for name in verbs {
                let verb = self
                    .find(name)
                    .ok_or_else(|| TrainerError::InvalidConfigValueError {
                        field: "verbs".to_string(),
                        value: name.clone(),
                        reason: "Verb not in catalog (see --list-verbs)".to_string(),
                    })?;
                if !selection.verbs.contains(&verb.infinitive) {
                    selection.verbs.push(verb.infinitive.clone());
                }
            }
        }

        Ok(selection)
    }

    pub fn all_tenses(&self) -> Vec<Tense> {
        let set: BTreeSet<&'static str> = self.patterns.iter().map(|p| p.tense.label()).collect();
        Tense::sorted()
            .into_iter()
            .filter(|t| set.contains(t.label()))
            .collect()
    }
}
