// ABOUTME: Rule-based fit scoring between a user profile and a canonical program.
// ABOUTME: Four sub-scores (academic, financial, location, language) and a fixed weighted overall.

use crate::models::{CanonicalProgram, LanguageRequirements, MatchingScores};
use crate::profile::{TestScores, UserProfile};

/// Placeholder until academic criteria are scored; changing it is a new scoring rule.
pub const ACADEMIC_BASE_SCORE: f64 = 0.5;

/// Used when tuition or budget is unknown, or no language scores can be compared.
pub const UNKNOWN_FIT: f64 = 0.5;

const LOCATION_MISMATCH: f64 = 0.3;
const LANGUAGE_FAILED: f64 = 0.2;
/// Fraction of financial fit lost per 100% over budget.
const OVER_BUDGET_DECAY: f64 = 0.5;

/// Weights of the overall score. They sum to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Weights {
    pub academic: f64,
    pub financial: f64,
    pub location: f64,
    pub language: f64,
}

pub const WEIGHTS: Weights = Weights {
    academic: 0.30,
    financial: 0.25,
    location: 0.25,
    language: 0.20,
};

impl Weights {
    pub fn total(&self) -> f64 {
        self.academic + self.financial + self.location + self.language
    }

    fn combine(&self, scores: &MatchingScores) -> f64 {
        let overall = scores.academic_fit * self.academic
            + scores.financial_fit * self.financial
            + scores.location_fit * self.location
            + scores.language_fit * self.language;
        overall.clamp(0.0, 1.0)
    }
}

/// Computes fit scores for one (profile, program) pair.
///
/// Implementations must not panic on missing data and must return every
/// score in `0.0..=1.0`.
pub trait Scorer {
    fn score(&self, profile: &UserProfile, program: &CanonicalProgram) -> MatchingScores;
}

/// The deterministic rule set used by the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleScorer;

impl Scorer for RuleScorer {
    fn score(&self, profile: &UserProfile, program: &CanonicalProgram) -> MatchingScores {
        let mut scores = MatchingScores {
            academic_fit: ACADEMIC_BASE_SCORE,
            financial_fit: financial_fit(
                program.tuition_eur,
                profile.preferences.effective_budget(),
            ),
            location_fit: location_fit(&program.country, &profile.preferences.countries),
            language_fit: language_fit(
                program.language_requirements.as_ref(),
                &profile.academic.test_scores,
            ),
            overall_fit: 0.0,
        };
        scores.overall_fit = WEIGHTS.combine(&scores);
        scores
    }
}

/// 1.0 within budget, then linear decay reaching 0.0 at three times the budget.
pub fn financial_fit(tuition_eur: Option<u64>, budget_eur: Option<u64>) -> f64 {
    let (Some(tuition), Some(budget)) = (tuition_eur, budget_eur.filter(|b| *b > 0)) else {
        return UNKNOWN_FIT;
    };
    if tuition <= budget {
        return 1.0;
    }
    let over_budget_ratio = tuition as f64 / budget as f64;
    (1.0 - (over_budget_ratio - 1.0) * OVER_BUDGET_DECAY).max(0.0)
}

pub fn location_fit(country: &str, preferred: &[String]) -> f64 {
    if preferred.iter().any(|c| c == country) {
        1.0
    } else {
        LOCATION_MISMATCH
    }
}

/// Any passing comparable test is enough; no comparable test at all is unknown.
pub fn language_fit(requirements: Option<&LanguageRequirements>, scores: &TestScores) -> f64 {
    let Some(reqs) = requirements.filter(|r| r.english_required) else {
        return 1.0;
    };

    let comparisons = [
        reqs.toefl_min
            .zip(scores.toefl)
            .map(|(min, user)| user >= min),
        reqs.ielts_min
            .zip(scores.ielts)
            .map(|(min, user)| user >= min),
        reqs.duolingo_min
            .zip(scores.duolingo)
            .map(|(min, user)| user >= min),
    ];

    let mut compared = comparisons.iter().flatten().peekable();
    if compared.peek().is_none() {
        return UNKNOWN_FIT;
    }
    if compared.any(|passed| *passed) {
        1.0
    } else {
        LANGUAGE_FAILED
    }
}
