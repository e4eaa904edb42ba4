// ABOUTME: Serialization of processed datasets to JSON and a flat CSV view of programs.
// ABOUTME: Nested maps and lists become compact JSON text inside CSV cells.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::PipelineError;
use crate::models::{CanonicalProgram, TextOrList};
use crate::pipeline::ProcessedDataset;

/// Column order of the CSV projection.
pub const PROGRAM_COLUMNS: &[&str] = &[
    "id",
    "title",
    "university",
    "country",
    "city",
    "discipline",
    "duration_months",
    "tuition_eur",
    "deadline",
    "url",
    "scraped_at",
    "language_requirements",
    "requirements_text",
    "overview",
    "specializations",
    "matching_scores",
];

pub fn to_json_string(dataset: &ProcessedDataset, pretty: bool) -> Result<String, PipelineError> {
    let json = if pretty {
        serde_json::to_string_pretty(dataset)?
    } else {
        serde_json::to_string(dataset)?
    };
    Ok(json)
}

pub fn write_json<W: Write>(
    writer: W,
    dataset: &ProcessedDataset,
    pretty: bool,
) -> Result<(), PipelineError> {
    if pretty {
        serde_json::to_writer_pretty(writer, dataset)?;
    } else {
        serde_json::to_writer(writer, dataset)?;
    }
    Ok(())
}

/// Writes one row per program with a header row.
pub fn write_programs_csv<W: Write>(
    writer: W,
    programs: &[CanonicalProgram],
) -> Result<(), PipelineError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(PROGRAM_COLUMNS)?;
    for program in programs {
        wtr.write_record(program_row(program)?)?;
    }
    wtr.flush()?;
    Ok(())
}

/// `out/result.json` -> `out/result_programs.csv`.
pub fn csv_path_for(json_path: &Path) -> PathBuf {
    let stem = json_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    json_path.with_file_name(format!("{stem}_programs.csv"))
}

fn program_row(p: &CanonicalProgram) -> Result<Vec<String>, PipelineError> {
    Ok(vec![
        p.id.clone(),
        p.title.clone(),
        p.university.clone(),
        p.country.clone(),
        p.city.clone(),
        p.discipline.clone(),
        optional(p.duration_months),
        optional(p.tuition_eur),
        p.deadline.clone(),
        p.url.clone(),
        p.scraped_at.clone(),
        p.language_requirements.as_ref().map(compact).transpose()?.unwrap_or_default(),
        p.requirements_text.clone().unwrap_or_default(),
        p.overview.clone().unwrap_or_default(),
        match &p.specializations {
            Some(TextOrList::Text(s)) => s.clone(),
            Some(list) => compact(list)?,
            None => String::new(),
        },
        compact(&p.matching_scores)?,
    ])
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn compact<T: Serialize>(value: &T) -> Result<String, PipelineError> {
    Ok(serde_json::to_string(value)?)
}
