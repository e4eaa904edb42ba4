// ABOUTME: Maps raw scraped program records into canonical programs.
// ABOUTME: Never fails; missing or malformed fields degrade to documented sentinel defaults.

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::config::DEFAULT_OVERVIEW_LIMIT;
use crate::extract::{extract_language_requirements, extract_tuition_amount, parse_duration_months};
use crate::models::{
    CanonicalProgram, MatchingScores, TextOrList, NOT_AVAILABLE, UNKNOWN, UNKNOWN_PROGRAM,
    UNKNOWN_UNIVERSITY,
};
use crate::raw::{RawField, RawProgramRecord};

const FALLBACK_ID_PREFIX: &str = "prog_";
const FALLBACK_ID_HEX_LEN: usize = 16;

/// Turns raw records into [`CanonicalProgram`]s.
#[derive(Debug, Clone)]
pub struct Normalizer {
    overview_limit: usize,
    /// Used as `scraped_at` when the record carries none.
    processed_at: String,
}

impl Normalizer {
    pub fn new(processed_at: impl Into<String>) -> Self {
        Self {
            overview_limit: DEFAULT_OVERVIEW_LIMIT,
            processed_at: processed_at.into(),
        }
    }

    pub fn overview_limit(mut self, limit: usize) -> Self {
        self.overview_limit = limit;
        self
    }

    pub fn normalize(&self, raw: &RawProgramRecord) -> CanonicalProgram {
        let title = raw.text("title").unwrap_or(UNKNOWN_PROGRAM).to_string();
        let university = raw.text("university").unwrap_or(UNKNOWN_UNIVERSITY).to_string();
        let country = raw
            .text("country")
            .or_else(|| raw.text("search_country"))
            .unwrap_or(UNKNOWN)
            .to_string();
        let url = raw.text("url").unwrap_or_default().to_string();

        let id = match id_from_url(&url) {
            Some(id) => id.to_string(),
            None => {
                let id = fallback_id(&title, &university, &country);
                debug!(%id, %title, "no url path segment, using fallback id");
                id
            }
        };

        let (language_requirements, requirements_text) = match raw.field("requirements") {
            None | Some(RawField::Other(serde_json::Value::Null)) => (None, None),
            Some(field) => {
                let text = match &field {
                    RawField::Text(s) => Some(s.to_string()),
                    RawField::List(items) => Some(items.join(" ")),
                    RawField::Map(_) | RawField::Other(_) => {
                        debug!(%id, "requirements is neither text nor list");
                        None
                    }
                };
                (Some(extract_language_requirements(&field)), text)
            }
        };

        CanonicalProgram {
            id,
            title,
            university,
            country,
            city: raw.text("city").unwrap_or(UNKNOWN).to_string(),
            discipline: raw.text("search_discipline").unwrap_or(UNKNOWN).to_string(),
            duration_months: raw.text("duration").and_then(parse_duration_months),
            tuition_eur: raw.text("tuition_fee").and_then(extract_tuition_amount),
            deadline: raw.text("deadline").unwrap_or(NOT_AVAILABLE).to_string(),
            url,
            scraped_at: raw
                .text("scraped_at")
                .map(str::to_string)
                .unwrap_or_else(|| self.processed_at.clone()),
            language_requirements,
            requirements_text,
            overview: raw
                .raw_text("overview")
                .map(|s| truncate_chars(s, self.overview_limit)),
            specializations: raw.field("subjects").and_then(specializations),
            matching_scores: MatchingScores::default(),
        }
    }

    pub fn normalize_all(&self, records: &[RawProgramRecord]) -> Vec<CanonicalProgram> {
        records.iter().map(|r| self.normalize(r)).collect()
    }
}

/// Text after the last `/` of the url, if any.
fn id_from_url(url: &str) -> Option<&str> {
    url.rsplit('/').next().filter(|seg| !seg.is_empty())
}

/// Deterministic id from the normalized (title, university, country) tuple.
pub fn fallback_id(title: &str, university: &str, country: &str) -> String {
    let key = [title, university, country]
        .iter()
        .map(|part| part.trim().to_lowercase())
        .collect::<Vec<_>>()
        .join("|");

    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("{}{}", FALLBACK_ID_PREFIX, &digest[..FALLBACK_ID_HEX_LEN])
}

fn truncate_chars(s: &str, limit: usize) -> String {
    s.chars().take(limit).collect()
}

fn specializations(field: RawField<'_>) -> Option<TextOrList> {
    match field {
        RawField::Text(s) => Some(TextOrList::Text(s.to_string())),
        RawField::List(items) => Some(TextOrList::List(
            items.into_iter().map(str::to_string).collect(),
        )),
        RawField::Map(_) | RawField::Other(_) => None,
    }
}
