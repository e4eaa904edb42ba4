// ABOUTME: End-to-end tests for the pipeline from scraper JSON to the output envelope.
// ABOUTME: Checks scoring order, institution profiles, metadata, and the CSV projection.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::Value;
use unimatch_core::{
    sort_by_overall_fit, to_json_string, write_programs_csv, Pipeline, PipelineConfig,
    ProcessedDataset, ScrapedBatch, UserProfile,
};

const BATCH: &str = r#"{
  "scraped_at": "2024-03-15T12:00:00",
  "programs": [
    {
      "title": "Computer Science",
      "university": "TU Munich",
      "country": "Germany",
      "city": "Munich",
      "search_discipline": "Computer Science",
      "duration": "3 years",
      "tuition_fee": "12,000 EUR / year",
      "deadline": "2024-07-15",
      "url": "https://www.bachelorsportal.com/studies/1001/computer-science.html",
      "requirements": ["High school diploma", "English: TOEFL 88 or IELTS 6.5"],
      "overview": "A rigorous program in computing.",
      "subjects": ["Algorithms", "Databases"],
      "scraped_at": "2024-03-15T12:00:01"
    },
    {
      "title": "Data Science",
      "university": "Harvard College",
      "country": "United States",
      "city": "Cambridge",
      "search_discipline": "Computer Science",
      "duration": "4 years",
      "tuition_fee": "$54,000 / year",
      "url": "https://www.bachelorsportal.com/studies/1002/data-science.html",
      "requirements": "English proficiency: TOEFL 100",
      "scraped_at": "2024-03-15T12:00:02"
    },
    {
      "title": "Informatics",
      "university": "TU Munich",
      "search_country": "Germany",
      "city": "Heilbronn",
      "search_discipline": "Computer Science",
      "duration": "36 months",
      "tuition_fee": "18,000 EUR",
      "url": "https://www.bachelorsportal.com/studies/1003/informatics.html",
      "scraped_at": "2024-03-15T12:00:03"
    },
    {
      "title": "Mystery Program"
    }
  ]
}"#;

const PROFILE: &str = r#"{
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
  "languages": [{"language": "English", "proficiency": "Advanced"}]
}"#;

fn run(profile: Option<&UserProfile>) -> ProcessedDataset {
    let batch = ScrapedBatch::from_json(BATCH).unwrap();
    Pipeline::new(PipelineConfig::default())
        .with_processed_at(Utc.with_ymd_and_hms(2024, 3, 16, 8, 30, 0).unwrap())
        .run(&batch.programs, profile)
}

fn ids(dataset: &ProcessedDataset) -> Vec<&str> {
    dataset.programs.iter().map(|p| p.id.as_str()).collect()
}

#[test]
fn test_scored_run_sorts_by_overall_fit() {
    let profile = UserProfile::from_json(PROFILE).unwrap();
    let dataset = run(Some(&profile));

    // computer-science: 0.15 + 0.25 + 0.25 + 0.20 = 0.85
    // informatics:      0.15 + 0.25 * 0.9 + 0.25 + 0.20 = 0.825
    // mystery:          0.15 + 0.125 + 0.075 + 0.20 = 0.55
    // data-science:     0.15 + 0 + 0.075 + 0.20 * 0.2 = 0.265
    assert_eq!(
        ids(&dataset),
        vec![
            "computer-science.html",
            "informatics.html",
            dataset.programs[2].id.as_str(),
            "data-science.html"
        ]
    );
    assert!(dataset.programs[2].id.starts_with("prog_"));

    let top = &dataset.programs[0].matching_scores;
    assert!((top.overall_fit - 0.85).abs() < 1e-9);

    let harvard = &dataset.programs[3];
    assert_eq!(harvard.tuition_eur, Some(45900));
    assert_eq!(harvard.matching_scores.financial_fit, 0.0);
    assert_eq!(harvard.matching_scores.language_fit, 0.2);

    for program in &dataset.programs {
        let s = &program.matching_scores;
        let all = [
            s.academic_fit,
            s.financial_fit,
            s.location_fit,
            s.language_fit,
            s.overall_fit,
        ];
        for score in all {
            assert!((0.0..=1.0).contains(&score));
        }
    }
}

#[test]
fn test_sorted_output_is_a_fixed_point() {
    let profile = UserProfile::from_json(PROFILE).unwrap();
    let mut programs = run(Some(&profile)).programs;
    let before = programs.clone();
    sort_by_overall_fit(&mut programs);
    assert_eq!(programs, before);
}

#[test]
fn test_institution_profiles() {
    let dataset = run(None);
    assert_eq!(dataset.universities.len(), 3);

    let tum = &dataset.universities["TU Munich"];
    assert_eq!(tum.program_ids, vec!["computer-science.html", "informatics.html"]);
    assert_eq!(tum.countries, vec!["Germany"]);
    assert_eq!(tum.cities, vec!["Heilbronn", "Munich"]);
    assert_eq!(tum.min_tuition, Some(12000));
    assert_eq!(tum.max_tuition, Some(18000));
    assert_eq!(tum.avg_tuition, Some(15000.0));

    let unknown = &dataset.universities["Unknown University"];
    assert_eq!(unknown.min_tuition, None);
    assert_eq!(unknown.max_tuition, None);
    assert_eq!(unknown.avg_tuition, None);

    for profile in dataset.universities.values() {
        let tuition = (profile.min_tuition, profile.avg_tuition, profile.max_tuition);
        if let (Some(min), Some(avg), Some(max)) = tuition {
            assert!(min as f64 <= avg + 1e-9 && avg <= max as f64 + 1e-9);
        }
    }
}

#[test]
fn test_metadata_and_defaults() {
    let dataset = run(None);
    assert_eq!(dataset.metadata.total_programs, 4);
    assert_eq!(dataset.metadata.total_universities, 3);
    assert_eq!(dataset.metadata.countries, vec!["Germany", "United States", "Unknown"]);
    assert_eq!(dataset.metadata.disciplines, vec!["Computer Science", "Unknown"]);
    assert_eq!(dataset.metadata.processed_at, "2024-03-16T08:30:00+00:00");

    let mystery = dataset.programs.iter().find(|p| p.title == "Mystery Program").unwrap();
    assert_eq!(mystery.duration_months, None);
    assert_eq!(mystery.tuition_eur, None);
    assert_eq!(mystery.language_requirements, None);
    assert_eq!(mystery.deadline, "N/A");
    assert_eq!(mystery.scraped_at, "2024-03-16T08:30:00+00:00");
    assert!(dataset.matching_data.is_none());
}

#[test]
fn test_json_envelope_field_names() {
    let profile = UserProfile::from_json(PROFILE).unwrap();
    let json = to_json_string(&run(Some(&profile)), true).unwrap();
    let value: Value = serde_json::from_str(&json).unwrap();

    for key in ["metadata", "programs", "universities", "matching_data"] {
        assert!(value.get(key).is_some(), "missing {key}");
    }
    let matching = &value["matching_data"];
    assert_eq!(matching["programs"].as_array().unwrap().len(), 4);
    assert_eq!(matching["user_profile"]["preferences"]["budget_eur"], 15000);
    assert_eq!(matching["user_profile"]["academic"]["test_scores"]["toefl"], 95);
    assert!(matching["matching_criteria"]["academic"].is_array());

    let tum = value["universities"]["TU Munich"].as_object().unwrap();
    assert_eq!(
        tum["program_ids"],
        serde_json::json!(["computer-science.html", "informatics.html"])
    );
    assert!(!tum.contains_key("programs"));

    let first = &value["programs"][0];
    assert_eq!(first["language_requirements"]["toefl_min"], 88);
    assert_eq!(first["requirements_text"], "High school diploma English: TOEFL 88 or IELTS 6.5");
    assert_eq!(first["specializations"][1], "Databases");
    assert!(first["matching_scores"]["overall_fit"].is_number());

    // absent optionals are omitted, undefined tuition is null
    let unscored = to_json_string(&run(None), false).unwrap();
    let value: Value = serde_json::from_str(&unscored).unwrap();
    assert!(value.get("matching_data").is_none());
    let mystery = &value["programs"][3];
    assert!(mystery.get("overview").is_none());
    assert!(mystery["tuition_eur"].is_null());
}

#[test]
fn test_csv_projection() {
    let dataset = run(None);
    let mut buf = Vec::new();
    write_programs_csv(&mut buf, &dataset.programs).unwrap();
    let text = String::from_utf8(buf).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 5);
    assert!(lines[0].starts_with(
        "id,title,university,country,city,discipline,duration_months,tuition_eur"
    ));
    assert!(lines[1].starts_with(concat!(
        "computer-science.html,Computer Science,TU Munich,Germany,Munich,",
        "Computer Science,36,12000,2024-07-15,"
    )));
    assert!(lines[1].contains(r#""[""Algorithms"",""Databases""]""#));
    assert!(lines[4].contains("Mystery Program,Unknown University,Unknown,Unknown,Unknown,,,N/A,"));
}

#[test]
fn test_invalid_batch_is_reported() {
    let err = ScrapedBatch::from_json(r#"{"programs": "not a list"}"#).unwrap_err();
    assert!(err.is_invalid_batch());
}
