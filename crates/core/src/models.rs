// ABOUTME: Canonical program, language requirement, score, and institution models.
// ABOUTME: Field names match the serialized output consumed by the matching service.

use serde::{Deserialize, Serialize};

pub const UNKNOWN: &str = "Unknown";
pub const UNKNOWN_PROGRAM: &str = "Unknown Program";
pub const UNKNOWN_UNIVERSITY: &str = "Unknown University";
pub const NOT_AVAILABLE: &str = "N/A";

/// Language proficiency thresholds pulled from a requirements field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageRequirements {
    pub english_required: bool,
    pub toefl_min: Option<u32>,
    pub ielts_min: Option<f64>,
    pub duolingo_min: Option<u32>,
    /// Non-English requirements are not extracted yet, so this stays empty.
    pub other_languages: Vec<String>,
}

impl LanguageRequirements {
    pub fn has_any_threshold(&self) -> bool {
        self.toefl_min.is_some() || self.ielts_min.is_some() || self.duolingo_min.is_some()
    }
}

/// Per-dimension fit scores, each in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchingScores {
    pub academic_fit: f64,
    pub financial_fit: f64,
    pub location_fit: f64,
    pub language_fit: f64,
    pub overall_fit: f64,
}

/// A value that the source may give either as one string or as a list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TextOrList {
    Text(String),
    List(Vec<String>),
}

impl TextOrList {
    /// Flattens to one string, joining list elements with a single space.
    pub fn joined(&self) -> String {
        match self {
            TextOrList::Text(s) => s.clone(),
            TextOrList::List(items) => items.join(" "),
        }
    }
}

/// A program after extraction and normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProgram {
    pub id: String,
    pub title: String,
    pub university: String,
    pub country: String,
    pub city: String,
    pub discipline: String,
    pub duration_months: Option<u32>,
    pub tuition_eur: Option<u64>,
    pub deadline: String,
    pub url: String,
    pub scraped_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_requirements: Option<LanguageRequirements>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specializations: Option<TextOrList>,
    pub matching_scores: MatchingScores,
}

/// Derived summary of all programs offered by one university.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstitutionProfile {
    pub name: String,
    /// Program ids in the order they were seen.
    pub program_ids: Vec<String>,
    pub countries: Vec<String>,
    pub cities: Vec<String>,
    pub disciplines: Vec<String>,
    pub min_tuition: Option<u64>,
    pub max_tuition: Option<u64>,
    pub avg_tuition: Option<f64>,
}
