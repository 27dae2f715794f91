use crate::domain::model::{SearchPattern, Tense, Verb};

/// Every conjugated form worth searching for, across the twelve tenses.
pub fn patterns_for_verb(verb: &Verb) -> Vec<SearchPattern> {
    let pattern = |term: String, tense: Tense| SearchPattern {
        term,
        verb: verb.infinitive.clone(),
        spanish_verb: verb.spanish.clone(),
        tense,
    };

    let Verb {
        base,
        past,
        past_participle: pp,
        gerund: ing,
        third_person: s,
        ..
    } = verb;
    let is_be = verb.infinitive == "To Be";

    let mut patterns = Vec::with_capacity(20);

    // Present
    if is_be {
        for form in ["am", "is", "are"] {
            patterns.push(pattern(form.to_string(), Tense::PresentSimple));
        }
    } else {
        patterns.push(pattern(base.clone(), Tense::PresentSimple));
        patterns.push(pattern(s.clone(), Tense::PresentSimple));
    }
    for aux in ["am", "is", "are"] {
        patterns.push(pattern(format!("{} {}", aux, ing), Tense::PresentContinuous));
    }
    for aux in ["have", "has"] {
        patterns.push(pattern(format!("{} {}", aux, pp), Tense::PresentPerfect));
    }
    for aux in ["have", "has"] {
        patterns.push(pattern(
            format!("{} been {}", aux, ing),
            Tense::PresentPerfectContinuous,
        ));
    }

    // Past
    if is_be {
        for form in ["was", "were"] {
            patterns.push(pattern(form.to_string(), Tense::PastSimple));
        }
    } else {
        patterns.push(pattern(past.clone(), Tense::PastSimple));
    }
    for aux in ["was", "were"] {
        patterns.push(pattern(format!("{} {}", aux, ing), Tense::PastContinuous));
    }
    patterns.push(pattern(format!("had {}", pp), Tense::PastPerfect));
    patterns.push(pattern(format!("had been {}", ing), Tense::PastPerfectContinuous));

    // Future
    patterns.push(pattern(format!("will {}", base), Tense::FutureSimple));
    patterns.push(pattern(format!("will be {}", ing), Tense::FutureContinuous));
    patterns.push(pattern(format!("will have {}", pp), Tense::FuturePerfect));
    patterns.push(pattern(
        format!("will have been {}", ing),
        Tense::FuturePerfectContinuous,
    ));

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::inflect::regular_verb;

    #[test]
    fn test_regular_verb_patterns() {
        let verb = regular_verb("Work", "Trabajar", None, None);
        let patterns = patterns_for_verb(&verb);

        assert_eq!(patterns.len(), 18);
        let terms: Vec<&str> = patterns.iter().map(|p| p.term.as_str()).collect();
        assert!(terms.contains(&"work"));
        assert!(terms.contains(&"works"));
        assert!(terms.contains(&"has been working"));
        assert!(terms.contains(&"worked"));
        assert!(terms.contains(&"will have been working"));
        assert!(patterns.iter().all(|p| p.verb == "To Work"));
    }

    #[test]
    fn test_be_is_special_cased() {
        let verb = Verb {
            infinitive: "To Be".into(),
            spanish: "Ser/Estar".into(),
            base: "be".into(),
            past: "was".into(),
            past_participle: "been".into(),
            gerund: "being".into(),
            third_person: "is".into(),
            object: None,
            object_spanish: None,
        };
        let patterns = patterns_for_verb(&verb);

        let present: Vec<&str> = patterns
            .iter()
            .filter(|p| p.tense == Tense::PresentSimple)
            .map(|p| p.term.as_str())
            .collect();
        assert_eq!(present, vec!["am", "is", "are"]);

        let past: Vec<&str> = patterns
            .iter()
            .filter(|p| p.tense == Tense::PastSimple)
            .map(|p| p.term.as_str())
            .collect();
        assert_eq!(past, vec!["was", "were"]);
        assert_eq!(patterns.len(), 20);
    }

    #[test]
    fn test_every_tense_is_covered() {
        let verb = regular_verb("Walk", "Caminar", None, None);
        let patterns = patterns_for_verb(&verb);
        for tense in Tense::ALL {
            assert!(patterns.iter().any(|p| p.tense == tense), "missing {}", tense);
        }
    }
}
