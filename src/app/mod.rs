pub mod practice;

pub use practice::{PracticeApp, PracticeOutcome};
