use crate::core::matcher::split_on_answer;
use crate::domain::model::{Exercise, ExerciseOrigin, Tense, Verb};
use crate::utils::error::{Result, TrainerError};
use rand::seq::SliceRandom;
use rand::Rng;
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const EMBEDDED_TEMPLATES: &str = include_str!("../../data/templates.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct SentenceTemplate {
    pub tense: Tense,
    pub english: String,
    pub spanish: String,
    pub answer: String,
}

#[derive(Debug, Deserialize)]
struct TemplateFile {
    #[serde(default)]
    template: Vec<SentenceTemplate>,
}

/// Fill-in-the-blank templates, the last-resort source that always works offline.
#[derive(Debug, Clone)]
pub struct TemplateBank {
    by_tense: HashMap<Tense, Vec<SentenceTemplate>>,
    whitespace: Regex,
}

impl TemplateBank {
    pub fn embedded() -> Result<Self> {
        Self::from_toml_str(EMBEDDED_TEMPLATES)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: TemplateFile = toml::from_str(content)?;

        let mut by_tense: HashMap<Tense, Vec<SentenceTemplate>> = HashMap::new();
        for template in file.template {
            by_tense.entry(template.tense).or_default().push(template);
        }

        if !by_tense.contains_key(&Tense::PresentSimple) {
            return Err(TrainerError::CatalogError {
                message: "templates must include Present Simple".to_string(),
            });
        }

        let whitespace = Regex::new(r"\s+").map_err(|e| TrainerError::ConfigError {
            message: e.to_string(),
        })?;

        Ok(Self {
            by_tense,
            whitespace,
        })
    }

    pub fn templates_for(&self, tense: Tense) -> &[SentenceTemplate] {
        self.by_tense
            .get(&tense)
            .or_else(|| self.by_tense.get(&Tense::PresentSimple))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Picks a random template for the tense and fills it in for the verb.
    pub fn synthesize<R: Rng + ?Sized>(&self, verb: &Verb, tense: Tense, rng: &mut R) -> Option<Exercise> {
        let template = self.templates_for(tense).choose(rng)?;
        Some(self.fill(template, verb, tense))
    }

    pub fn fill(&self, template: &SentenceTemplate, verb: &Verb, tense: Tense) -> Exercise {
        let object = verb.object.as_deref().unwrap_or("");
        let object_spanish = verb.object_spanish.as_deref().unwrap_or("");

        let english_forms = |text: &str| {
            text.replace("{base}", &verb.base)
                .replace("{s}", &verb.third_person)
                .replace("{past}", &verb.past)
                .replace("{pp}", &verb.past_participle)
                .replace("{ing}", &verb.gerund)
        };

        let sentence = self.collapse(&english_forms(&template.english).replace("{obj}", object));
        let answer = self.collapse(&english_forms(&template.answer));

        // 西語部分只給提示，不做變位
        let spanish = template
            .spanish
            .replace("{spa}", &format!("[{}]", verb.spanish))
            .replace("{ingSpa}", &format!("[{} (ando/iendo)]", verb.spanish))
            .replace("{ppSpa}", &format!("[{} (ado/ido)]", verb.spanish))
            .replace("{pastSpa}", &format!("[{} (pasado)]", verb.spanish))
            .replace("{infSpa}", &format!("[{}]", verb.spanish))
            .replace("{objSpa}", object_spanish);
        let spanish_sentence = self.collapse(&spanish);

        Exercise {
            id: ExerciseOrigin::Template.new_exercise_id(),
            verb: verb.infinitive.clone(),
            spanish_verb: verb.spanish.clone(),
            tense,
            parts: split_on_answer(&sentence, &answer),
            spanish_sentence,
            hint: format!("The answer is '{}'", answer),
            answer,
            origin: ExerciseOrigin::Template,
        }
    }

    fn collapse(&self, text: &str) -> String {
        self.whitespace.replace_all(text, " ").trim().to_string()
    }
}
