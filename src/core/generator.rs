use crate::catalog::VerbCatalog;
use crate::config::{SourceKind, TomlConfig};
use crate::domain::model::{Exercise, SearchPattern, Selection};
use crate::domain::ports::{ConfigProvider, ExerciseSource};
use crate::sources::{CorpusSource, CuratedLibrary, GenerativeSource, TemplateBank};
use crate::utils::error::{Result, TrainerError};
use futures::future::join_all;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOptions {
    pub max_remote_patterns: usize,
    pub max_batch: usize,
    pub fallback_attempts_per_exercise: usize,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            max_remote_patterns: 25,
            max_batch: 5,
            fallback_attempts_per_exercise: 10,
        }
    }
}

impl GeneratorOptions {
    pub fn from_provider<C: ConfigProvider>(config: &C) -> Self {
        Self {
            max_remote_patterns: config.max_remote_patterns(),
            max_batch: config.max_batch().max(1),
            fallback_attempts_per_exercise: config.fallback_attempts_per_exercise().max(1),
        }
    }
}

/// Builds rounds of exercises: remote/curated sources first, templates to fill the gaps.
pub struct ExerciseGenerator {
    catalog: Arc<VerbCatalog>,
    templates: TemplateBank,
    sources: Vec<Arc<dyn ExerciseSource>>,
    options: GeneratorOptions,
    rng: Mutex<StdRng>,
}

impl ExerciseGenerator {
    pub fn new(
        catalog: Arc<VerbCatalog>,
        templates: TemplateBank,
        sources: Vec<Arc<dyn ExerciseSource>>,
        options: GeneratorOptions,
    ) -> Self {
        Self {
            catalog,
            templates,
            sources,
            options,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    /// Wires catalog, templates and the enabled sources from configuration.
    pub fn from_config(config: &TomlConfig) -> Result<Self> {
        let catalog = match &config.data.verbs_path {
            Some(path) => VerbCatalog::from_file(path)?,
            None => VerbCatalog::embedded()?,
        };
        let templates = match &config.data.templates_path {
            Some(path) => TemplateBank::from_file(path)?,
            None => TemplateBank::embedded()?,
        };

        let mut sources: Vec<Arc<dyn ExerciseSource>> = Vec::new();
        for kind in config.enabled_sources() {
            match kind {
                SourceKind::Corpus => {
                    let corpus = &config.corpus;
                    sources.push(Arc::new(
                        CorpusSource::new(&corpus.endpoint, config.request_timeout())
                            .with_proxies(corpus.proxies.clone())
                            .with_languages(&corpus.from_language, &corpus.to_language),
                    ));
                }
                SourceKind::Generative => {
                    let generative = &config.generative;
                    sources.push(Arc::new(
                        GenerativeSource::new(
                            &generative.endpoint,
                            &generative.model,
                            Duration::from_secs(generative.timeout_seconds),
                        )
                        .with_api_key(generative.api_key.clone())
                        .with_temperature(generative.temperature),
                    ));
                }
                SourceKind::Library => {
                    let library = match &config.library.path {
                        Some(path) => CuratedLibrary::from_file(path)?,
                        None => CuratedLibrary::embedded()?,
                    };
                    sources.push(Arc::new(library));
                }
            }
        }

        tracing::info!(
            "🧩 Sources: {}",
            if sources.is_empty() {
                "templates only".to_string()
            } else {
                sources.iter().map(|s| s.name()).collect::<Vec<_>>().join(" → ")
            }
        );

        let generator = Self::new(
            Arc::new(catalog),
            templates,
            sources,
            GeneratorOptions::from_provider(config),
        );
        Ok(match config.seed() {
            Some(seed) => generator.with_seed(seed),
            None => generator,
        })
    }

    pub fn catalog(&self) -> &VerbCatalog {
        &self.catalog
    }

    pub fn source_names(&self) -> Vec<&'static str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    fn rng(&self) -> MutexGuard<'_, StdRng> {
        // 鎖只在同步區段內持有，poison 時沿用內部狀態即可
        self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Tries each source in order; the first exercise wins.
    async fn fetch_from_sources(&self, pattern: &SearchPattern) -> Option<Exercise> {
        for source in &self.sources {
            match source.fetch(pattern).await {
                Ok(Some(exercise)) => {
                    tracing::debug!("✅ {} supplied '{}'", source.name(), pattern.term);
                    return Some(exercise);
                }
                Ok(None) => {
                    tracing::debug!("{} had nothing for '{}'", source.name(), pattern.term);
                }
                Err(e) => {
                    tracing::debug!("⚠️ {} failed for '{}': {}", source.name(), pattern.term, e);
                }
            }
        }
        None
    }

    /// Produces up to `target` exercises for the selection, unique by Spanish sentence.
    pub async fn get_exercises(&self, target: usize, selection: &Selection) -> Result<Vec<Exercise>> {
        let eligible = self.catalog.eligible_patterns(selection);
        if eligible.is_empty() {
            return Err(TrainerError::NoEligiblePatterns);
        }

        let mut shuffled = eligible.clone();
        shuffled.shuffle(&mut *self.rng());

        let mut results: Vec<Exercise> = Vec::with_capacity(target);
        let mut seen: HashSet<String> = HashSet::new();

        // 第一階段：分批平行查詢外部來源
        if !self.sources.is_empty() {
            let attempts = shuffled.len().min(self.options.max_remote_patterns);
            let mut index = 0;

            while results.len() < target && index < attempts {
                let needed = target - results.len();
                let batch_size = (needed + 2).min(self.options.max_batch);
                let end = (index + batch_size).min(attempts);
                let batch = &shuffled[index..end];
                index = end;

                tracing::debug!("📦 Fetching batch of {} patterns", batch.len());
                let fetched = join_all(batch.iter().map(|p| self.fetch_from_sources(p))).await;

                for exercise in fetched.into_iter().flatten() {
                    if results.len() < target && seen.insert(exercise.spanish_sentence.clone()) {
                        results.push(exercise);
                    }
                }
            }

            tracing::debug!("Remote phase produced {} of {}", results.len(), target);
        }

        // 第二階段：用模板補足
        let max_attempts = target * self.options.fallback_attempts_per_exercise;
        let mut attempts = 0;
        while results.len() < target && attempts < max_attempts {
            attempts += 1;

            let generated = {
                let mut rng = self.rng();
                eligible.choose(&mut *rng).and_then(|pattern| {
                    let verb = self.catalog.find(&pattern.verb)?;
                    self.templates.synthesize(verb, pattern.tense, &mut *rng)
                })
            };

            if let Some(exercise) = generated {
                if seen.insert(exercise.spanish_sentence.clone()) {
                    results.push(exercise);
                }
            }
        }

        if results.len() < target {
            tracing::warn!(
                "Only {} unique exercises available for this selection (wanted {})",
                results.len(),
                target
            );
        }

        Ok(results)
    }
}
