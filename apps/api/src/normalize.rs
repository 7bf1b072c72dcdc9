//! Schema normalization.
//!
//! Resume records arrive in several dialects: the editor's native shape,
//! JSON Resume, and hand-rolled mixtures of both. `normalize` folds all of
//! them into one [`ResumeDocument`]. It never fails and never drops data:
//! aliases are copied into canonical locations and everything else is
//! carried through untouched.

use serde_json::{Map, Value};
use tracing::{debug, error};

use crate::models::lenient::is_truthy;
use crate::models::ResumeDocument;

/// Top-level keys that belong in `basics` when `basics` lacks them.
const PROMOTED_BASICS: &[&str] = &["name", "title", "email", "phone", "location"];

/// Normalizes an arbitrary resume record.
///
/// Works on a deep copy; the input is never modified. A non-object input
/// yields an empty document.
pub fn normalize(raw: &Value) -> ResumeDocument {
    let Value::Object(source) = raw else {
        debug!("Resume record is not an object; normalizing to an empty document");
        return ResumeDocument::default();
    };
    let mut root = source.clone();

    normalize_basics(&mut root);
    for_each_entry(&mut root, "experience", normalize_experience);
    for_each_entry(&mut root, "education", normalize_education);
    map_entries(&mut root, "skills", normalize_skill);
    map_entries(&mut root, "languages", normalize_language);
    for_each_entry(&mut root, "projects", normalize_project);
    derive_achievements(&mut root);
    map_entries(&mut root, "interests", |entry| match entry {
        Value::String(name) => Value::Object(single("name", Value::String(name))),
        other => other,
    });

    serde_json::from_value(Value::Object(root)).unwrap_or_else(|e| {
        error!("Normalized record failed to decode, rendering an empty document: {e}");
        ResumeDocument::default()
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Rules
// ────────────────────────────────────────────────────────────────────────────

fn normalize_basics(root: &mut Map<String, Value>) {
    if !matches!(root.get("basics"), Some(Value::Object(_))) {
        root.insert("basics".to_string(), Value::Object(Map::new()));
    }

    let promoted: Vec<(String, Value)> = PROMOTED_BASICS
        .iter()
        .filter_map(|key| {
            root.get(*key)
                .filter(|v| is_truthy(v))
                .map(|v| (key.to_string(), v.clone()))
        })
        .collect();

    let basics_summary = match root.get_mut("basics") {
        Some(Value::Object(basics)) => {
            for (key, value) in promoted {
                if !basics.get(&key).map(is_truthy).unwrap_or(false) {
                    basics.insert(key, value);
                }
            }
            basics.get("summary").filter(|v| is_truthy(v)).cloned()
        }
        _ => None,
    };

    if let Some(summary) = basics_summary {
        if !root.get("summary").map(is_truthy).unwrap_or(false) {
            root.insert("summary".to_string(), summary);
        }
    }
}

fn normalize_experience(entry: &mut Map<String, Value>) {
    if !entry.get("highlights").map(is_truthy).unwrap_or(false) {
        let highlights = match entry.get("description") {
            Some(desc) if is_truthy(desc) => vec![desc.clone()],
            _ => Vec::new(),
        };
        entry.insert("highlights".to_string(), Value::Array(highlights));
    }
    coerce_dates(entry);
}

fn normalize_education(entry: &mut Map<String, Value>) {
    copy_if_absent(entry, "studyType", "degree");
    copy_if_absent(entry, "institution", "school");
    coerce_dates(entry);
}

fn normalize_skill(entry: Value) -> Value {
    let mut skill = match entry {
        Value::Object(skill) => skill,
        other => return other,
    };
    let has_name = skill.get("name").map(is_truthy).unwrap_or(false);
    let has_keywords = skill.get("keywords").map(is_truthy).unwrap_or(false);
    if has_name && has_keywords {
        let name = skill.remove("name").unwrap_or(Value::Null);
        let keywords = skill.remove("keywords").unwrap_or(Value::Null);
        skill.insert("category".to_string(), name);
        skill.insert("items".to_string(), into_list(keywords));
    }
    Value::Object(skill)
}

fn normalize_language(entry: Value) -> Value {
    match entry {
        Value::String(language) => Value::Object(single("language", Value::String(language))),
        Value::Object(mut lang) => {
            copy_if_absent(&mut lang, "fluency", "proficiency");
            Value::Object(lang)
        }
        other => other,
    }
}

fn normalize_project(entry: &mut Map<String, Value>) {
    let has_technologies = entry.get("technologies").map(is_truthy).unwrap_or(false);
    if !has_technologies {
        if let Some(keywords) = entry.get("keywords").filter(|v| is_truthy(v)).cloned() {
            entry.insert("technologies".to_string(), into_list(keywords));
        }
    }
}

/// Derives `achievements` from the legacy `awards` list.
fn derive_achievements(root: &mut Map<String, Value>) {
    if root.get("achievements").map(is_truthy).unwrap_or(false) {
        return;
    }
    let Some(Value::Array(awards)) = root.get("awards") else {
        return;
    };

    let achievements: Vec<Value> = awards
        .iter()
        .filter_map(Value::as_object)
        .map(|award| {
            let pick = |key: &str, fallback: &str| {
                award
                    .get(key)
                    .filter(|v| is_truthy(v))
                    .cloned()
                    .unwrap_or_else(|| Value::String(fallback.to_string()))
            };
            let mut achievement = Map::new();
            achievement.insert("title".to_string(), pick("title", "Award"));
            achievement.insert("date".to_string(), pick("date", ""));
            achievement.insert("organization".to_string(), pick("awarder", ""));
            achievement.insert("description".to_string(), pick("summary", ""));
            Value::Object(achievement)
        })
        .collect();

    root.insert("achievements".to_string(), Value::Array(achievements));
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn for_each_entry(
    root: &mut Map<String, Value>,
    key: &str,
    mut f: impl FnMut(&mut Map<String, Value>),
) {
    if let Some(Value::Array(items)) = root.get_mut(key) {
        for item in items.iter_mut() {
            if let Value::Object(entry) = item {
                f(entry);
            }
        }
    }
}

fn map_entries(root: &mut Map<String, Value>, key: &str, f: impl Fn(Value) -> Value) {
    if let Some(Value::Array(items)) = root.get_mut(key) {
        let taken = std::mem::take(items);
        *items = taken.into_iter().map(f).collect();
    }
}

fn copy_if_absent(entry: &mut Map<String, Value>, from: &str, to: &str) {
    if entry.get(to).map(is_truthy).unwrap_or(false) {
        return;
    }
    if let Some(value) = entry.get(from).filter(|v| is_truthy(v)).cloned() {
        entry.insert(to.to_string(), value);
    }
}

/// Dates sometimes arrive as bare years (`2019`) or other scalars.
fn coerce_dates(entry: &mut Map<String, Value>) {
    for key in ["startDate", "endDate"] {
        if let Some(value) = entry.get_mut(key) {
            match value {
                Value::Number(n) => *value = Value::String(n.to_string()),
                Value::Bool(b) => *value = Value::String(b.to_string()),
                _ => {}
            }
        }
    }
}

fn into_list(value: Value) -> Value {
    match value {
        Value::Array(_) => value,
        other => Value::Array(vec![other]),
    }
}

fn single(key: &str, value: Value) -> Map<String, Value> {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    map
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::Skill;
    use serde_json::json;

    fn renormalize(doc: &ResumeDocument) -> ResumeDocument {
        normalize(&serde_json::to_value(doc).expect("document serializes"))
    }

    #[test]
    fn test_top_level_contact_fields_promoted_into_basics() {
        let doc = normalize(&json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "basics": { "phone": "555-0100" }
        }));
        assert_eq!(doc.basics.name.as_deref(), Some("Jane Doe"));
        assert_eq!(doc.basics.email.as_deref(), Some("jane@example.com"));
        assert_eq!(doc.basics.phone.as_deref(), Some("555-0100"));
    }

    #[test]
    fn test_basics_values_win_over_top_level() {
        let doc = normalize(&json!({
            "name": "Top",
            "basics": { "name": "Inner" }
        }));
        assert_eq!(doc.basics.name.as_deref(), Some("Inner"));
        assert_eq!(doc.extra.get("name"), Some(&json!("Top")), "original key kept");
    }

    #[test]
    fn test_basics_summary_mirrored_to_top_level() {
        let doc = normalize(&json!({ "basics": { "summary": "Builds things." } }));
        assert_eq!(doc.summary.as_deref(), Some("Builds things."));
    }

    #[test]
    fn test_experience_description_becomes_single_highlight() {
        let doc = normalize(&json!({
            "experience": [
                { "title": "Dev", "description": "Built X" },
                { "title": "Ops" },
                { "title": "Lead", "highlights": ["A", "B"], "description": "ignored" }
            ]
        }));
        assert_eq!(doc.experience[0].highlights, vec!["Built X"]);
        assert!(doc.experience[1].highlights.is_empty());
        assert_eq!(doc.experience[2].highlights, vec!["A", "B"]);
    }

    #[test]
    fn test_numeric_dates_coerced_to_strings() {
        let doc = normalize(&json!({
            "experience": [{ "startDate": 2019, "endDate": 2021 }],
            "education": [{ "startDate": 2015 }]
        }));
        assert_eq!(doc.experience[0].start_date.as_deref(), Some("2019"));
        assert_eq!(doc.experience[0].end_date.as_deref(), Some("2021"));
        assert_eq!(doc.education[0].start_date.as_deref(), Some("2015"));
    }

    #[test]
    fn test_education_aliases_filled() {
        let doc = normalize(&json!({
            "education": [{ "studyType": "BSc", "institution": "MIT", "area": "CS" }]
        }));
        let edu = &doc.education[0];
        assert_eq!(edu.degree.as_deref(), Some("BSc"));
        assert_eq!(edu.school.as_deref(), Some("MIT"));
        assert_eq!(edu.institution.as_deref(), Some("MIT"), "source key untouched");
    }

    #[test]
    fn test_skill_with_keywords_becomes_category() {
        let doc = normalize(&json!({
            "skills": [
                { "name": "Languages", "keywords": ["Rust", "Go"] },
                { "name": "Cloud", "keywords": "AWS" },
                { "name": "Docker" },
                "SQL"
            ]
        }));
        match &doc.skills[0] {
            Skill::Categorized(c) => {
                assert_eq!(c.category, "Languages");
                assert_eq!(c.items, vec!["Rust", "Go"]);
            }
            other => panic!("expected categorized skill, got {other:?}"),
        }
        match &doc.skills[1] {
            Skill::Categorized(c) => assert_eq!(c.items, vec!["AWS"]),
            other => panic!("expected categorized skill, got {other:?}"),
        }
        assert!(matches!(doc.skills[2], Skill::Named(_)));
        assert!(matches!(doc.skills[3], Skill::Plain(_)));
    }

    #[test]
    fn test_language_fluency_copied_to_proficiency() {
        let doc = normalize(&json!({
            "languages": [{ "language": "Spanish", "fluency": "Native" }, "French"]
        }));
        assert_eq!(doc.languages[0].proficiency.as_deref(), Some("Native"));
        assert_eq!(doc.languages[1].language.as_deref(), Some("French"));
    }

    #[test]
    fn test_project_keywords_become_technologies() {
        let doc = normalize(&json!({
            "projects": [{ "name": "P", "keywords": ["wasm"] }]
        }));
        assert_eq!(doc.projects[0].technologies, vec!["wasm"]);
        assert_eq!(doc.projects[0].keywords, vec!["wasm"]);
    }

    #[test]
    fn test_awards_become_achievements_with_defaults() {
        let doc = normalize(&json!({
            "awards": [
                { "title": "Best Paper", "awarder": "ACM", "date": "2020-05", "summary": "Top pick" },
                { "awarder": "IEEE" }
            ]
        }));
        assert_eq!(doc.achievements.len(), 2);
        let first = &doc.achievements[0];
        assert_eq!(first.title.as_deref(), Some("Best Paper"));
        assert_eq!(first.organization.as_deref(), Some("ACM"));
        assert_eq!(first.description.as_deref(), Some("Top pick"));
        let second = &doc.achievements[1];
        assert_eq!(second.title.as_deref(), Some("Award"));
        assert_eq!(second.date.as_deref(), Some(""));
        assert!(doc.extra.contains_key("awards"), "awards preserved");
    }

    #[test]
    fn test_existing_achievements_not_overwritten() {
        let doc = normalize(&json!({
            "achievements": [{ "title": "Kept" }],
            "awards": [{ "title": "Ignored" }]
        }));
        assert_eq!(doc.achievements.len(), 1);
        assert_eq!(doc.achievements[0].title.as_deref(), Some("Kept"));
    }

    #[test]
    fn test_non_object_input_yields_empty_document() {
        assert_eq!(normalize(&json!([1, 2])), ResumeDocument::default());
        assert_eq!(normalize(&json!(null)), ResumeDocument::default());
    }

    #[test]
    fn test_input_is_not_mutated() {
        let raw = json!({ "name": "Jane", "experience": [{ "description": "x" }] });
        let before = raw.clone();
        let _ = normalize(&raw);
        assert_eq!(raw, before);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let raw = json!({
            "name": "Jane Doe",
            "title": "Engineer",
            "basics": {
                "summary": "Systems person.",
                "location": { "city": "Oslo", "region": "NO" },
                "profiles": [{ "network": "LinkedIn", "url": "https://linkedin.com/in/jd" }]
            },
            "experience": [
                { "title": "Dev", "company": "Acme", "startDate": 2019, "description": "Shipped" },
                { "title": "SRE", "highlights": ["Cut costs"], "endDate": "present" }
            ],
            "education": [{ "studyType": "BSc", "area": "CS", "institution": "MIT", "gpa": 3.9 }],
            "skills": [{ "name": "Lang", "keywords": ["Rust"] }, "SQL", { "name": "Go", "level": "Expert" }],
            "projects": [{ "name": "P", "keywords": "cli" }],
            "languages": [{ "language": "German", "fluency": "B2" }, "Italian"],
            "awards": [{ "title": "Prize" }],
            "interests": ["Chess", { "name": "Climbing", "keywords": ["bouldering"] }],
            "volunteer": [{ "organization": "Food bank", "position": "Driver" }],
            "unknown": { "nested": true }
        });

        let once = normalize(&raw);
        let twice = renormalize(&once);
        assert_eq!(once, twice, "normalize must be idempotent");
    }

    #[test]
    fn test_empty_achievements_stay_empty_on_renormalize() {
        let once = normalize(&json!({ "achievements": [], "awards": [{ "title": "A" }] }));
        // An explicit empty list counts as present; awards are not re-derived.
        assert!(once.achievements.is_empty());
        assert_eq!(renormalize(&once), once);
    }
}
