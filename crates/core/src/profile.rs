// ABOUTME: User profile models read by the scorer, plus the flat applicant form they come from.
// ABOUTME: Accepts either the structured profile JSON or the flat form and converts the latter.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::PipelineError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TestScores {
    pub sat: Option<u32>,
    pub toefl: Option<u32>,
    pub ielts: Option<f64>,
    pub duolingo: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcademicProfile {
    #[serde(deserialize_with = "lenient_f64")]
    pub gpa: Option<f64>,
    pub degree_level: String,
    pub field_of_study: String,
    pub test_scores: TestScores,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub countries: Vec<String>,
    #[serde(deserialize_with = "lenient_whole")]
    pub budget_eur: Option<u64>,
    pub funding_sources: String,
    pub disciplines: Vec<String>,
}

impl Preferences {
    /// Budget usable as a divisor; zero means the user gave none.
    pub fn effective_budget(&self) -> Option<u64> {
        self.budget_eur.filter(|b| *b > 0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageSkill {
    pub language: String,
    pub proficiency: String,
}

/// The profile a program is scored against. Read-only to the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub academic: AcademicProfile,
    pub preferences: Preferences,
    pub languages: Vec<LanguageSkill>,
}

/// Flat questionnaire shape collected from applicants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicantForm {
    #[serde(deserialize_with = "lenient_f64")]
    pub gpa: Option<f64>,
    pub degree_level: String,
    pub field_of_study: String,
    #[serde(deserialize_with = "lenient_whole")]
    pub sat_score: Option<u32>,
    #[serde(deserialize_with = "lenient_whole")]
    pub toefl_score: Option<u32>,
    #[serde(deserialize_with = "lenient_f64")]
    pub ielts_score: Option<f64>,
    #[serde(deserialize_with = "lenient_whole")]
    pub duolingo_score: Option<u32>,
    pub preferred_countries: Vec<String>,
    #[serde(deserialize_with = "lenient_whole")]
    pub budget_range: Option<u64>,
    pub funding_sources: String,
    pub languages: Vec<LanguageSkill>,
}

impl From<ApplicantForm> for UserProfile {
    fn from(form: ApplicantForm) -> Self {
        UserProfile {
            academic: AcademicProfile {
                gpa: form.gpa,
                degree_level: form.degree_level,
                field_of_study: form.field_of_study.clone(),
                test_scores: TestScores {
                    sat: form.sat_score,
                    toefl: form.toefl_score,
                    ielts: form.ielts_score,
                    duolingo: form.duolingo_score,
                },
            },
            preferences: Preferences {
                countries: form.preferred_countries,
                budget_eur: form.budget_range,
                funding_sources: form.funding_sources,
                disciplines: vec![form.field_of_study],
            },
            languages: form.languages,
        }
    }
}

impl UserProfile {
    /// Parses either a structured profile or a flat applicant form.
    ///
    /// Documents carrying an `academic` or `preferences` object are read as
    /// structured profiles; anything else is read as the flat form.
    pub fn from_json(data: &str) -> Result<Self, PipelineError> {
        let value: Value = serde_json::from_str(data)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self, PipelineError> {
        let Some(doc) = value.as_object() else {
            return Err(PipelineError::invalid_profile("expected a json object"));
        };
        let structured = ["academic", "preferences"]
            .iter()
            .any(|key| doc.get(*key).is_some_and(Value::is_object));

        if structured {
            Ok(serde_json::from_value(value)?)
        } else {
            let form: ApplicantForm = serde_json::from_value(value)?;
            Ok(form.into())
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

/// Accepts a number, a numeric string, or null. Unparsable strings become `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<NumberOrText>::deserialize(deserializer)? {
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// Like [`lenient_f64`], but the value must be a non-negative whole number
/// that fits the target type (`15000`, `15000.0`, and `"15000"` all work).
fn lenient_whole<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<u64>,
{
    let Some(n) = lenient_f64(deserializer)? else {
        return Ok(None);
    };
    if !n.is_finite() || n < 0.0 || n.fract() != 0.0 || n > u64::MAX as f64 {
        return Ok(None);
    }
    Ok(T::try_from(n as u64).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FLAT_FORM: &str = r#"{
        "gpa": "3.5",
        "degree_level": "high_school",
        "field_of_study": "Computer Science",
        "sat_score": 1400,
        "toefl_score": 95,
        "ielts_score": 7.0,
        "duolingo_score": 120,
        "preferred_countries": ["Germany", "Canada", "Netherlands"],
        "budget_range": 15000,
        "funding_sources": "self_funded",
        "languages": [
            {"language": "English", "proficiency": "Advanced"},
            {"language": "German", "proficiency": "Beginner"}
        ]
    }"#;

    #[test]
    fn flat_form_converts_to_structured_profile() {
        let profile = UserProfile::from_json(FLAT_FORM).unwrap();
        assert_eq!(profile.academic.gpa, Some(3.5));
        assert_eq!(profile.academic.test_scores.toefl, Some(95));
        assert_eq!(profile.academic.test_scores.ielts, Some(7.0));
        assert_eq!(profile.preferences.budget_eur, Some(15000));
        assert_eq!(profile.preferences.disciplines, vec!["Computer Science"]);
        assert_eq!(profile.preferences.countries.len(), 3);
        assert_eq!(profile.languages[1].language, "German");
    }

    #[test]
    fn structured_profile_is_read_as_is() {
        let json = r#"{
            "academic": {"gpa": 3.9, "test_scores": {"ielts": 6.0}},
            "preferences": {"countries": ["France"], "budget_eur": 9000}
        }"#;
        let profile = UserProfile::from_json(json).unwrap();
        assert_eq!(profile.academic.gpa, Some(3.9));
        assert_eq!(profile.academic.test_scores.ielts, Some(6.0));
        assert_eq!(profile.academic.test_scores.toefl, None);
        assert_eq!(profile.preferences.countries, vec!["France"]);
        assert!(profile.languages.is_empty());
    }

    #[test]
    fn unparsable_gpa_becomes_none() {
        let profile = UserProfile::from_json(r#"{"gpa": "excellent"}"#).unwrap();
        assert_eq!(profile.academic.gpa, None);
    }

    #[test]
    fn flat_form_numbers_may_be_floats_or_strings() {
        let json = r#"{
            "budget_range": 15000.0,
            "toefl_score": "95",
            "duolingo_score": 110,
            "sat_score": "n/a",
            "ielts_score": "6.5"
        }"#;
        let profile = UserProfile::from_json(json).unwrap();
        assert_eq!(profile.preferences.budget_eur, Some(15000));
        assert_eq!(profile.academic.test_scores.toefl, Some(95));
        assert_eq!(profile.academic.test_scores.duolingo, Some(110));
        assert_eq!(profile.academic.test_scores.sat, None);
        assert_eq!(profile.academic.test_scores.ielts, Some(6.5));

        let profile = UserProfile::from_json(r#"{"budget_range": "15000"}"#).unwrap();
        assert_eq!(profile.preferences.budget_eur, Some(15000));
    }

    #[test]
    fn fractional_or_negative_scores_are_dropped() {
        let json = r#"{"toefl_score": 95.5, "budget_range": -1}"#;
        let profile = UserProfile::from_json(json).unwrap();
        assert_eq!(profile.academic.test_scores.toefl, None);
        assert_eq!(profile.preferences.budget_eur, None);
    }

    #[test]
    fn zero_budget_is_not_effective() {
        let prefs = Preferences {
            budget_eur: Some(0),
            ..Default::default()
        };
        assert_eq!(prefs.effective_budget(), None);
    }

    #[test]
    fn non_object_profile_is_rejected() {
        let err = UserProfile::from_json("[]").unwrap_err();
        assert!(matches!(err, PipelineError::InvalidProfile(_)));
    }
}
