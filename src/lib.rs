pub mod app;
pub mod catalog;
pub mod config;
pub mod core;
pub mod domain;
pub mod sources;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use catalog::VerbCatalog;
pub use config::TomlConfig;
pub use core::{ExerciseGenerator, Prefetcher};
pub use utils::error::{Result, TrainerError};
