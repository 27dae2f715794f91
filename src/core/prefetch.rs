use crate::core::generator::ExerciseGenerator;
use crate::domain::model::{Exercise, Selection};
use crate::utils::error::Result;
use futures::FutureExt;
use std::sync::Arc;
use tokio::task::{JoinError, JoinHandle};

enum Pending {
    Loading(JoinHandle<Result<Vec<Exercise>>>),
    /// Finished with at least one exercise.
    Loaded(Vec<Exercise>),
}

/// Keeps the next round loading in the background while the current one is played.
pub struct Prefetcher {
    generator: Arc<ExerciseGenerator>,
    round_size: usize,
    pending: Option<(Selection, Pending)>,
}

impl Prefetcher {
    pub fn new(generator: Arc<ExerciseGenerator>, round_size: usize) -> Self {
        Self {
            generator,
            round_size,
            pending: None,
        }
    }

    pub fn generator(&self) -> &ExerciseGenerator {
        &self.generator
    }

    /// Starts loading the next round unless one is already loading or loaded.
    pub fn start(&mut self, selection: &Selection) {
        if let Some((pending_selection, _)) = &self.pending {
            if pending_selection == selection {
                return;
            }
            self.invalidate();
        }

        let generator = Arc::clone(&self.generator);
        let round_size = self.round_size;
        let wanted = selection.clone();
        let handle = tokio::spawn(async move { generator.get_exercises(round_size, &wanted).await });

        tracing::debug!("🔄 Prefetching next round in the background");
        self.pending = Some((selection.clone(), Pending::Loading(handle)));
    }

    pub fn is_loading(&self) -> bool {
        matches!(&self.pending, Some((_, Pending::Loading(h))) if !h.is_finished())
    }

    /// The next round is loaded and has exercises in it.
    pub fn is_ready(&mut self) -> bool {
        self.settle();
        matches!(self.pending, Some((_, Pending::Loaded(_))))
    }

    /// Drops any prefetched or in-flight round, e.g. after the selection changed.
    pub fn invalidate(&mut self) {
        if let Some((_, Pending::Loading(handle))) = self.pending.take() {
            handle.abort();
        }
    }

    /// Returns the prefetched round for this selection if there is one,
    /// otherwise fetches a round right away.
    pub async fn next_round(&mut self, selection: &Selection) -> Result<Vec<Exercise>> {
        if let Some((pending_selection, pending)) = self.pending.take() {
            if &pending_selection == selection {
                let batch = match pending {
                    Pending::Loaded(batch) => Some(batch),
                    Pending::Loading(handle) => Self::accept(handle.await),
                };
                if let Some(batch) = batch {
                    tracing::debug!("⚡ Using prefetched round of {}", batch.len());
                    return Ok(batch);
                }
            } else if let Pending::Loading(handle) = pending {
                handle.abort();
            }
        }

        self.generator.get_exercises(self.round_size, selection).await
    }

    /// Moves a finished task's result into the slot; failed or empty rounds are dropped.
    fn settle(&mut self) {
        match self.pending.take() {
            Some((selection, Pending::Loading(mut handle))) if handle.is_finished() => {
                match (&mut handle).now_or_never() {
                    Some(outcome) => {
                        if let Some(batch) = Self::accept(outcome) {
                            self.pending = Some((selection, Pending::Loaded(batch)));
                        }
                    }
                    None => self.pending = Some((selection, Pending::Loading(handle))),
                }
            }
            other => self.pending = other,
        }
    }

    fn accept(outcome: std::result::Result<Result<Vec<Exercise>>, JoinError>) -> Option<Vec<Exercise>> {
        match outcome {
            Ok(Ok(batch)) if !batch.is_empty() => Some(batch),
            Ok(Ok(_)) => {
                tracing::warn!("Background prefetch returned no exercises");
                None
            }
            Ok(Err(e)) => {
                tracing::warn!("Background prefetch failed silently: {}", e);
                None
            }
            Err(e) => {
                tracing::warn!("Background prefetch task ended: {}", e);
                None
            }
        }
    }
}

impl Drop for Prefetcher {
    fn drop(&mut self) {
        self.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::VerbCatalog;
    use crate::core::generator::GeneratorOptions;
    use crate::domain::model::{ExerciseOrigin, Tense};
    use crate::sources::TemplateBank;

    fn prefetcher() -> Prefetcher {
        let generator = ExerciseGenerator::new(
            Arc::new(VerbCatalog::embedded().unwrap()),
            TemplateBank::embedded().unwrap(),
            Vec::new(),
            GeneratorOptions::default(),
        );
        Prefetcher::new(Arc::new(generator), 4)
    }

    fn selection(verb: &str) -> Selection {
        Selection::new(vec![Tense::PresentPerfect, Tense::PastSimple], vec![verb.to_string()])
    }

    async fn wait_for_task(prefetcher: &Prefetcher) {
        while prefetcher.is_loading() {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_next_round_without_prefetch_fetches_directly() {
        let mut prefetcher = prefetcher();
        let round = prefetcher.next_round(&selection("To Go")).await.unwrap();

        assert_eq!(round.len(), 4);
        assert!(round.iter().all(|e| e.origin == ExerciseOrigin::Template));
        assert!(!prefetcher.is_ready());
    }

    #[tokio::test]
    async fn test_prefetched_round_is_used_once() {
        let mut prefetcher = prefetcher();
        let wanted = selection("To Eat");

        prefetcher.start(&wanted);
        wait_for_task(&prefetcher).await;
        assert!(prefetcher.is_ready());

        let round = prefetcher.next_round(&wanted).await.unwrap();
        assert_eq!(round.len(), 4);
        assert!(round.iter().all(|e| e.verb == "To Eat"));
        assert!(!prefetcher.is_loading());
        assert!(!prefetcher.is_ready());
    }

    #[tokio::test]
    async fn test_selection_change_discards_prefetch() {
        let mut prefetcher = prefetcher();
        prefetcher.start(&selection("To Eat"));

        let round = prefetcher.next_round(&selection("To Go")).await.unwrap();
        assert!(round.iter().all(|e| e.verb == "To Go"));
    }

    #[tokio::test]
    async fn test_failed_prefetch_is_not_ready() {
        let mut prefetcher = prefetcher();
        let empty = Selection::new(vec![Tense::PastSimple], vec![]);

        prefetcher.start(&empty);
        wait_for_task(&prefetcher).await;

        assert!(!prefetcher.is_loading());
        assert!(!prefetcher.is_ready());
        assert!(prefetcher.next_round(&empty).await.is_err());
    }
}
