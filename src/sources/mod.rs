// Sources layer: every place an exercise can come from.

pub mod corpus;
pub mod generative;
pub mod library;
pub mod template;

pub use corpus::CorpusSource;
pub use generative::GenerativeSource;
pub use library::CuratedLibrary;
pub use template::TemplateBank;
