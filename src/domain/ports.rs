use crate::domain::model::{Exercise, SearchPattern};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// A place exercises can come from for a given conjugated form.
///
/// `Ok(None)` means the source had nothing usable for this pattern; `Err`
/// means it could not be reached. Callers move on to the next source either way.
#[async_trait]
pub trait ExerciseSource: Send + Sync {
    fn name(&self) -> &'static str;
    async fn fetch(&self, pattern: &SearchPattern) -> Result<Option<Exercise>>;
}

pub trait ConfigProvider: Send + Sync {
    fn round_size(&self) -> usize;
    fn max_remote_patterns(&self) -> usize;
    fn max_batch(&self) -> usize;
    fn fallback_attempts_per_exercise(&self) -> usize;
    fn request_timeout(&self) -> Duration;
    fn seed(&self) -> Option<u64>;
}
