//! Canonical resume document.
//!
//! This is the single shape every renderer consumes. It is produced by
//! [`crate::normalize::normalize`]; renderers never look at alternate field
//! names. Unrecognized keys at every object level are kept in `extra` so that
//! serializing a document and normalizing it again yields the same document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::lenient::{entries, object_or_default, opt_string, str_field, string_list};

/// Returns the string when it is present and non-empty.
pub fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

// ────────────────────────────────────────────────────────────────────────────
// Document
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    #[serde(default, deserialize_with = "object_or_default")]
    pub basics: Basics,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "entries")]
    pub experience: Vec<Experience>,
    #[serde(default, deserialize_with = "entries")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "entries")]
    pub skills: Vec<Skill>,
    #[serde(default, deserialize_with = "entries")]
    pub projects: Vec<Project>,
    #[serde(default, deserialize_with = "entries")]
    pub certifications: Vec<Certification>,
    #[serde(default, deserialize_with = "entries")]
    pub languages: Vec<Language>,
    #[serde(default, deserialize_with = "entries")]
    pub achievements: Vec<Achievement>,
    #[serde(default, deserialize_with = "entries")]
    pub volunteer: Vec<Volunteer>,
    #[serde(default, deserialize_with = "entries")]
    pub publications: Vec<Publication>,
    #[serde(default, deserialize_with = "entries")]
    pub interests: Vec<Interest>,
    #[serde(default, deserialize_with = "entries")]
    pub references: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ResumeDocument {
    fn top_level(&self, key: &str) -> Option<&str> {
        str_field(&self.extra, key)
    }

    pub fn name(&self) -> Option<&str> {
        present(&self.basics.name).or_else(|| self.top_level("name"))
    }

    /// Headline: `basics.title`, then a top-level `title`, then `basics.label`.
    pub fn title(&self) -> Option<&str> {
        present(&self.basics.title)
            .or_else(|| self.top_level("title"))
            .or_else(|| present(&self.basics.label))
    }

    pub fn email(&self) -> Option<&str> {
        present(&self.basics.email).or_else(|| self.top_level("email"))
    }

    pub fn phone(&self) -> Option<&str> {
        present(&self.basics.phone).or_else(|| self.top_level("phone"))
    }

    pub fn location(&self) -> Option<String> {
        self.basics
            .location
            .as_ref()
            .and_then(Location::display)
            .or_else(|| self.top_level("location").map(str::to_string))
    }

    pub fn summary(&self) -> Option<&str> {
        present(&self.summary).or_else(|| present(&self.basics.summary))
    }

    pub fn website(&self) -> Option<&str> {
        present(&self.basics.url)
            .or_else(|| present(&self.basics.website))
            .or_else(|| self.top_level("website"))
    }

    /// `basics.linkedin`, else the first profile on a LinkedIn network.
    pub fn linkedin(&self) -> Option<&str> {
        present(&self.basics.linkedin).or_else(|| {
            self.basics
                .profiles
                .iter()
                .find(|p| {
                    present(&p.network)
                        .map(|n| n.to_lowercase().contains("linkedin"))
                        .unwrap_or(false)
                })
                .and_then(|p| present(&p.url).or_else(|| present(&p.username)))
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Basics
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Basics {
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "opt_location", skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, deserialize_with = "entries")]
    pub profiles: Vec<Profile>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub network: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A location is either free text or a JSON-Resume style address object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Location {
    Text(String),
    Structured(StructuredLocation),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredLocation {
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Location {
    /// Display form. Structured locations show `"City, Region"` and nothing
    /// at all without a city.
    pub fn display(&self) -> Option<String> {
        match self {
            Location::Text(s) if !s.is_empty() => Some(s.clone()),
            Location::Text(_) => None,
            Location::Structured(loc) => {
                let city = present(&loc.city)?;
                Some(match present(&loc.region) {
                    Some(region) => format!("{city}, {region}"),
                    None => city.to_string(),
                })
            }
        }
    }
}

fn opt_location<'de, D>(deserializer: D) -> Result<Option<Location>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(Location::Text(s)),
        Some(Value::Number(n)) => Some(Location::Text(n.to_string())),
        Some(v @ Value::Object(_)) => serde_json::from_value(v).ok().map(Location::Structured),
        _ => None,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Sections
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, deserialize_with = "opt_location", skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Absent means the role is ongoing.
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub highlights: Vec<String>,
    /// Fallback prose, rendered only when `highlights` is empty.
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Experience {
    pub fn location_text(&self) -> Option<String> {
        self.location.as_ref().and_then(Location::display)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub study_type: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub area: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub school: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Education {
    /// `"Bachelor in Physics"`, `"Bachelor"`, `"Degree in Physics"` or nothing.
    pub fn degree_line(&self) -> Option<String> {
        let kind = present(&self.study_type).or_else(|| present(&self.degree));
        match (kind, present(&self.area)) {
            (Some(kind), Some(area)) => Some(format!("{kind} in {area}")),
            (Some(kind), None) => Some(kind.to_string()),
            (None, Some(area)) => Some(format!("Degree in {area}")),
            (None, None) => None,
        }
    }

    pub fn institution_name(&self) -> Option<&str> {
        present(&self.institution).or_else(|| present(&self.school))
    }
}

/// Skill entries come in three shapes, resolved once at decode time.
///
/// Variant order matters for untagged decoding: an object with a `category`
/// is categorized, one with a `name` is named, and any other object is kept
/// verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Skill {
    Categorized(SkillCategory),
    Named(NamedSkill),
    Plain(String),
    Other(Map<String, Value>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    #[serde(deserialize_with = "required_string")]
    pub category: String,
    #[serde(default, deserialize_with = "string_list")]
    pub items: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedSkill {
    #[serde(deserialize_with = "required_string")]
    pub name: String,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn required_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    crate::models::lenient::scalar_to_string(value)
        .ok_or_else(|| serde::de::Error::custom("expected a string"))
}

impl Skill {
    /// One-line label. `max_items` truncates categorized item lists and
    /// appends `...` when anything was cut.
    pub fn label(&self, max_items: Option<usize>) -> Option<String> {
        match self {
            Skill::Categorized(c) => {
                let limit = max_items.unwrap_or(usize::MAX);
                let mut items = c
                    .items
                    .iter()
                    .take(limit)
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ");
                if c.items.len() > limit {
                    items.push_str(", ...");
                }
                Some(format!("{}: {}", c.category, items))
            }
            Skill::Named(n) => Some(match present(&n.level) {
                Some(level) => format!("{}: {}", n.name, level),
                None => n.name.clone(),
            }),
            Skill::Plain(s) if !s.is_empty() => Some(s.clone()),
            Skill::Plain(_) => None,
            Skill::Other(map) => {
                let keywords: Vec<String> = map
                    .get("keywords")
                    .and_then(Value::as_array)
                    .map(|items| {
                        items
                            .iter()
                            .filter_map(|v| crate::models::lenient::scalar_to_string(v.clone()))
                            .collect()
                    })
                    .unwrap_or_default();
                (!keywords.is_empty()).then(|| keywords.join(", "))
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub highlights: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub technologies: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub keywords: Vec<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Certification {
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Language {
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub fluency: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub proficiency: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Language {
    /// `"Spanish: Native"`; the level defaults to `Fluent`.
    pub fn label(&self) -> String {
        let level = present(&self.proficiency)
            .or_else(|| present(&self.fluency))
            .unwrap_or("Fluent");
        format!("{}: {}", present(&self.language).unwrap_or_default(), level)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Achievement {
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub highlights: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Interest {
    #[serde(default, deserialize_with = "opt_string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub keywords: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
