// ABOUTME: Core normalization and scoring library for scraped study program data.
// ABOUTME: Provides field extractors, the normalizer, institution aggregation, fit scoring, and export.

//! unimatch-core turns loosely-structured scraped program records into a
//! normalized, scored dataset for a downstream matcher.
//!
//! # Example
//!
//! ```
//! use unimatch_core::{Pipeline, PipelineConfig, RawProgramRecord, UserProfile};
//!
//! let records = vec![RawProgramRecord::new()
//!     .with("title", "Computer Science")
//!     .with("university", "TU Berlin")
//!     .with("country", "Germany")
//!     .with("tuition_fee", "€1,500 per year")
//!     .with("url", "https://example.com/programs/cs-tub")];
//!
//! let profile = UserProfile::default();
//! let dataset = Pipeline::new(PipelineConfig::default()).run(&records, Some(&profile));
//! assert_eq!(dataset.programs[0].id, "cs-tub");
//! assert_eq!(dataset.programs[0].tuition_eur, Some(1500));
//! ```

pub mod aggregate;
pub mod config;
pub mod criteria;
pub mod error;
pub mod export;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod profile;
pub mod raw;
pub mod scoring;

pub use aggregate::{aggregate_institutions, InstitutionAggregator};
pub use config::PipelineConfig;
pub use criteria::MatchingCriteria;
pub use error::PipelineError;
pub use export::{csv_path_for, to_json_string, write_json, write_programs_csv};
pub use extract::{extract_language_requirements, extract_tuition_amount, parse_duration_months};
pub use models::{
    CanonicalProgram, InstitutionProfile, LanguageRequirements, MatchingScores, TextOrList,
};
pub use normalize::{fallback_id, Normalizer};
pub use pipeline::{sort_by_overall_fit, MatchingData, Metadata, Pipeline, ProcessedDataset};
pub use profile::{ApplicantForm, UserProfile};
pub use raw::{RawField, RawProgramRecord, ScrapedBatch};
pub use scoring::{RuleScorer, Scorer, WEIGHTS};
