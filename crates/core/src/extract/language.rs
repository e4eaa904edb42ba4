// ABOUTME: Language proficiency extraction from program requirement text.
// ABOUTME: Detects an English requirement and the nearest TOEFL/IELTS/Duolingo minimum scores.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::LanguageRequirements;
use crate::raw::RawField;

/// Proficiency tests with a recognized minimum score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreKind {
    Toefl,
    Ielts,
    Duolingo,
}

/// A test name followed, lazily across any text, by its minimum score.
#[derive(Debug, Clone, Copy)]
pub struct ScorePattern {
    pub kind: ScoreKind,
    pub pattern: &'static str,
}

/// Patterns run against the lowercased requirement text; first match wins per test.
pub const SCORE_PATTERNS: &[ScorePattern] = &[
    ScorePattern {
        kind: ScoreKind::Toefl,
        pattern: r"toefl.*?(\d+)",
    },
    ScorePattern {
        kind: ScoreKind::Ielts,
        pattern: r"ielts.*?(\d+(?:\.\d+)?)",
    },
    ScorePattern {
        kind: ScoreKind::Duolingo,
        pattern: r"duolingo.*?(\d+)",
    },
];

static COMPILED: Lazy<Vec<(ScoreKind, Regex)>> = Lazy::new(|| {
    SCORE_PATTERNS
        .iter()
        .map(|p| (p.kind, Regex::new(p.pattern).unwrap()))
        .collect()
});

const ENGLISH_TOKEN: &str = "english";

/// Extracts language requirements from a requirements field.
///
/// Strings and lists of strings are matched (lists joined with spaces). Any
/// other shape yields the default block with nothing required.
pub fn extract_language_requirements(field: &RawField<'_>) -> LanguageRequirements {
    let text = match field {
        RawField::Text(s) => s.to_lowercase(),
        RawField::List(items) => items.join(" ").to_lowercase(),
        RawField::Map(_) | RawField::Other(_) => return LanguageRequirements::default(),
    };
    requirements_from_text(&text)
}

fn requirements_from_text(text: &str) -> LanguageRequirements {
    let mut reqs = LanguageRequirements {
        english_required: text.contains(ENGLISH_TOKEN),
        ..Default::default()
    };

    for (kind, re) in COMPILED.iter() {
        let Some(score) = re.captures(text).map(|caps| caps[1].to_string()) else {
            continue;
        };
        match kind {
            ScoreKind::Toefl => reqs.toefl_min = score.parse().ok(),
            ScoreKind::Ielts => reqs.ielts_min = score.parse().ok(),
            ScoreKind::Duolingo => reqs.duolingo_min = score.parse().ok(),
        }
    }

    reqs
}
