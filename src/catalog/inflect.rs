use crate::domain::model::Verb;

const VOWELS: [char; 5] = ['a', 'e', 'i', 'o', 'u'];

fn is_vowel(c: char) -> bool {
    VOWELS.contains(&c)
}

fn strip_to(english: &str) -> &str {
    let trimmed = english.trim();
    match trimmed.get(..3) {
        Some(prefix) if prefix.eq_ignore_ascii_case("to ") => trimmed[3..].trim(),
        _ => trimmed,
    }
}

/// "stop", "plan", "grab": one vowel, consonant-vowel-consonant ending.
fn doubles_final_consonant(base: &str) -> bool {
    let chars: Vec<char> = base.chars().collect();
    let n = chars.len();
    if n < 3 {
        return false;
    }
    let (c1, v, c2) = (chars[n - 3], chars[n - 2], chars[n - 1]);
    if is_vowel(c1) || !is_vowel(v) || is_vowel(c2) || matches!(c2, 'w' | 'x' | 'y') {
        return false;
    }
    chars.iter().filter(|c| is_vowel(**c)).count() == 1
}

/// The final consonant to repeat before "-ed"/"-ing", if any.
fn doubled_consonant(base: &str) -> Option<char> {
    if doubles_final_consonant(base) {
        base.chars().last()
    } else {
        None
    }
}

fn third_person(base: &str) -> String {
    if base.ends_with('y') && !base[..base.len() - 1].ends_with(is_vowel) {
        return format!("{}ies", &base[..base.len() - 1]);
    }
    if ["s", "sh", "ch", "x", "z"].iter().any(|end| base.ends_with(end)) {
        return format!("{}es", base);
    }
    format!("{}s", base)
}

fn gerund(base: &str) -> String {
    if let Some(stem) = base.strip_suffix("ie") {
        return format!("{}ying", stem);
    }
    if base.ends_with('e') && !["ee", "ye", "oe"].iter().any(|end| base.ends_with(end)) && base.len() > 2 {
        return format!("{}ing", &base[..base.len() - 1]);
    }
    if let Some(last) = doubled_consonant(base) {
        return format!("{}{}ing", base, last);
    }
    format!("{}ing", base)
}

fn past(base: &str) -> String {
    if base.ends_with('e') {
        return format!("{}d", base);
    }
    if base.ends_with('y') && !base[..base.len() - 1].ends_with(is_vowel) {
        return format!("{}ied", &base[..base.len() - 1]);
    }
    if let Some(last) = doubled_consonant(base) {
        return format!("{}{}ed", base, last);
    }
    format!("{}ed", base)
}

/// Builds every form of a regular verb from its English name ("Accept" or "To Accept").
pub fn regular_verb(english: &str, spanish: &str, object: Option<&str>, object_spanish: Option<&str>) -> Verb {
    let clean = strip_to(english);
    let base = clean.to_lowercase();
    let past = past(&base);

    Verb {
        infinitive: format!("To {}", clean),
        spanish: spanish.to_string(),
        past_participle: past.clone(),
        past,
        gerund: gerund(&base),
        third_person: third_person(&base),
        object: object.filter(|o| !o.is_empty()).map(str::to_string),
        object_spanish: object_spanish.filter(|o| !o.is_empty()).map(str::to_string),
        base,
    }
}
