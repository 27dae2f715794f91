use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Tense {
    #[serde(rename = "Present Simple")]
    PresentSimple,
    #[serde(rename = "Present Continuous")]
    PresentContinuous,
    #[serde(rename = "Present Perfect")]
    PresentPerfect,
    #[serde(rename = "Present Perfect Continuous")]
    PresentPerfectContinuous,
    #[serde(rename = "Past Simple")]
    PastSimple,
    #[serde(rename = "Past Continuous")]
    PastContinuous,
    #[serde(rename = "Past Perfect")]
    PastPerfect,
    #[serde(rename = "Past Perfect Continuous")]
    PastPerfectContinuous,
    #[serde(rename = "Future Simple")]
    FutureSimple,
    #[serde(rename = "Future Continuous")]
    FutureContinuous,
    #[serde(rename = "Future Perfect")]
    FuturePerfect,
    #[serde(rename = "Future Perfect Continuous")]
    FuturePerfectContinuous,
}

impl Tense {
    pub const ALL: [Tense; 12] = [
        Tense::PresentSimple,
        Tense::PresentContinuous,
        Tense::PresentPerfect,
        Tense::PresentPerfectContinuous,
        Tense::PastSimple,
        Tense::PastContinuous,
        Tense::PastPerfect,
        Tense::PastPerfectContinuous,
        Tense::FutureSimple,
        Tense::FutureContinuous,
        Tense::FuturePerfect,
        Tense::FuturePerfectContinuous,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Tense::PresentSimple => "Present Simple",
            Tense::PresentContinuous => "Present Continuous",
            Tense::PresentPerfect => "Present Perfect",
            Tense::PresentPerfectContinuous => "Present Perfect Continuous",
            Tense::PastSimple => "Past Simple",
            Tense::PastContinuous => "Past Continuous",
            Tense::PastPerfect => "Past Perfect",
            Tense::PastPerfectContinuous => "Past Perfect Continuous",
            Tense::FutureSimple => "Future Simple",
            Tense::FutureContinuous => "Future Continuous",
            Tense::FuturePerfect => "Future Perfect",
            Tense::FuturePerfectContinuous => "Future Perfect Continuous",
        }
    }

    /// Tenses in the order the settings screen lists them (alphabetical by label).
    pub fn sorted() -> Vec<Tense> {
        let mut tenses = Tense::ALL.to_vec();
        tenses.sort_by_key(|t| t.label());
        tenses
    }
}

impl fmt::Display for Tense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Tense {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .map(|c| if c == '-' || c == '_' { ' ' } else { c })
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ");

        Tense::ALL
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| format!("Unknown tense: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verb {
    /// "To Go"
    pub infinitive: String,
    pub spanish: String,
    pub base: String,
    pub past: String,
    pub past_participle: String,
    pub gerund: String,
    pub third_person: String,
    pub object: Option<String>,
    pub object_spanish: Option<String>,
}

/// A conjugated form to look for, e.g. "has been going".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPattern {
    pub term: String,
    pub verb: String,
    pub spanish_verb: String,
    pub tense: Tense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseOrigin {
    Corpus,
    Generative,
    Library,
    Template,
}

impl ExerciseOrigin {
    pub fn id_prefix(&self) -> &'static str {
        match self {
            ExerciseOrigin::Corpus => "corpus",
            ExerciseOrigin::Generative => "generative",
            ExerciseOrigin::Library => "library",
            ExerciseOrigin::Template => "fallback",
        }
    }

    /// Machine-written sentences get the "Generated" badge.
    pub fn is_generated(&self) -> bool {
        matches!(self, ExerciseOrigin::Template | ExerciseOrigin::Generative)
    }

    /// `<prefix>-<unix millis>-<random>`
    pub fn new_exercise_id(&self) -> String {
        format!(
            "{}-{}-{}",
            self.id_prefix(),
            chrono::Utc::now().timestamp_millis(),
            rand::random::<u32>()
        )
    }
}

/// English sentence text on either side of the blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentenceParts {
    pub before: String,
    pub after: String,
}

impl SentenceParts {
    pub fn new(before: impl Into<String>, after: impl Into<String>) -> Self {
        Self {
            before: before.into(),
            after: after.into(),
        }
    }

    /// Joins the parts around `blank` exactly as they were split, so quotes
    /// and hyphens next to the blank keep their spacing.
    pub fn render(&self, blank: &str) -> String {
        format!("{}{}{}", self.before, blank, self.after)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: String,
    pub verb: String,
    pub spanish_verb: String,
    pub tense: Tense,
    pub parts: SentenceParts,
    pub spanish_sentence: String,
    pub answer: String,
    pub hint: String,
    pub origin: ExerciseOrigin,
}

impl Exercise {
    pub fn english_sentence(&self) -> String {
        self.parts.render(&self.answer)
    }
}

/// Tenses and verbs picked on the settings screen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub tenses: Vec<Tense>,
    pub verbs: Vec<String>,
}

impl Selection {
    pub fn new(tenses: Vec<Tense>, verbs: Vec<String>) -> Self {
        Self { tenses, verbs }
    }

    pub fn is_startable(&self) -> bool {
        !self.tenses.is_empty() && !self.verbs.is_empty()
    }

    pub fn includes(&self, pattern: &SearchPattern) -> bool {
        self.tenses.contains(&pattern.tense) && self.verbs.iter().any(|v| v == &pattern.verb)
    }

    pub fn toggle_tense(&mut self, tense: Tense) {
        if let Some(pos) = self.tenses.iter().position(|t| *t == tense) {
            self.tenses.remove(pos);
        } else {
            self.tenses.push(tense);
        }
    }

    pub fn toggle_verb(&mut self, infinitive: &str) {
        if let Some(pos) = self.verbs.iter().position(|v| v == infinitive) {
            self.verbs.remove(pos);
        } else {
            self.verbs.push(infinitive.to_string());
        }
    }

    pub fn select_all_tenses(&mut self) {
        self.tenses = Tense::sorted();
    }

    pub fn clear_tenses(&mut self) {
        self.tenses.clear();
    }

    pub fn select_all_verbs(&mut self, all: &[String]) {
        self.verbs = all.to_vec();
    }

    pub fn clear_verbs(&mut self) {
        self.verbs.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tense_parsing_accepts_separators() {
        assert_eq!("present perfect".parse::<Tense>().unwrap(), Tense::PresentPerfect);
        assert_eq!(
            "past-perfect-continuous".parse::<Tense>().unwrap(),
            Tense::PastPerfectContinuous
        );
        assert_eq!("FUTURE_SIMPLE".parse::<Tense>().unwrap(), Tense::FutureSimple);
        assert!("pluperfect".parse::<Tense>().is_err());
    }

    #[test]
    fn test_sorted_tenses_are_alphabetical() {
        let sorted = Tense::sorted();
        assert_eq!(sorted.len(), 12);
        assert_eq!(sorted[0], Tense::FutureContinuous);
        assert_eq!(sorted[11], Tense::PresentSimple);
    }

    #[test]
    fn test_render_parts() {
        let parts = SentenceParts::new("I ", " home.");
        assert_eq!(parts.render("___"), "I ___ home.");

        let parts = SentenceParts::new("Yesterday I ", ".");
        assert_eq!(parts.render("went"), "Yesterday I went.");

        let parts = SentenceParts::new("", " is here.");
        assert_eq!(parts.render("She"), "She is here.");
    }

    #[test]
    fn test_render_keeps_spacing_next_to_quotes() {
        let parts = SentenceParts::new("\"", " home,\" she said.");
        assert_eq!(parts.render("_____"), "\"_____ home,\" she said.");

        let parts = SentenceParts::new("A well-", " plan.");
        assert_eq!(parts.render("_____"), "A well-_____ plan.");
    }

    #[test]
    fn test_exercise_id_prefix() {
        let id = ExerciseOrigin::Template.new_exercise_id();
        assert!(id.starts_with("fallback-"));
        assert!(ExerciseOrigin::Template.is_generated());
        assert!(!ExerciseOrigin::Corpus.is_generated());
    }

    #[test]
    fn test_selection_toggles() {
        let mut selection = Selection::default();
        assert!(!selection.is_startable());

        selection.toggle_tense(Tense::PastSimple);
        selection.toggle_verb("To Go");
        assert!(selection.is_startable());

        selection.toggle_verb("To Go");
        assert!(selection.verbs.is_empty());

        selection.select_all_tenses();
        assert_eq!(selection.tenses.len(), 12);
        selection.clear_tenses();
        assert!(selection.tenses.is_empty());
    }
}
