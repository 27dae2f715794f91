pub mod generator;
pub mod matcher;
pub mod prefetch;
pub mod session;

pub use crate::domain::model::{Exercise, Selection, Tense};
pub use crate::domain::ports::{ConfigProvider, ExerciseSource};
pub use crate::utils::error::Result;
pub use generator::{ExerciseGenerator, GeneratorOptions};
pub use prefetch::Prefetcher;
pub use session::{AnswerStatus, PracticeSession, Scoreboard};
