// ABOUTME: Pipeline orchestration: normalize, optionally score and sort, aggregate, build envelope.
// ABOUTME: Produces the ProcessedDataset consumed by the matcher and export helpers.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregate::aggregate_institutions;
use crate::config::PipelineConfig;
use crate::criteria::MatchingCriteria;
use crate::models::{CanonicalProgram, InstitutionProfile};
use crate::normalize::Normalizer;
use crate::profile::UserProfile;
use crate::raw::RawProgramRecord;
use crate::scoring::{RuleScorer, Scorer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub total_programs: usize,
    pub total_universities: usize,
    pub countries: Vec<String>,
    pub disciplines: Vec<String>,
    pub processed_at: String,
}

/// Snapshot handed to the matcher: the profile, the top programs, and the taxonomy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchingData {
    pub user_profile: UserProfile,
    pub programs: Vec<CanonicalProgram>,
    pub matching_criteria: MatchingCriteria,
}

/// Output envelope of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessedDataset {
    pub metadata: Metadata,
    pub programs: Vec<CanonicalProgram>,
    pub universities: BTreeMap<String, InstitutionProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matching_data: Option<MatchingData>,
}

/// Runs normalization, scoring, and aggregation over an in-memory batch.
#[derive(Debug, Clone)]
pub struct Pipeline<S = RuleScorer> {
    config: PipelineConfig,
    scorer: S,
    processed_at: DateTime<Utc>,
}

impl Pipeline<RuleScorer> {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_scorer(config, RuleScorer)
    }
}

impl Default for Pipeline<RuleScorer> {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl<S: Scorer> Pipeline<S> {
    pub fn with_scorer(config: PipelineConfig, scorer: S) -> Self {
        Self {
            config,
            scorer,
            processed_at: Utc::now(),
        }
    }

    /// Pin the processing timestamp (defaults to construction time).
    pub fn with_processed_at(mut self, processed_at: DateTime<Utc>) -> Self {
        self.processed_at = processed_at;
        self
    }

    pub fn run(
        &self,
        records: &[RawProgramRecord],
        profile: Option<&UserProfile>,
    ) -> ProcessedDataset {
        let processed_at = self
            .processed_at
            .to_rfc3339_opts(SecondsFormat::Secs, false);
        let normalizer =
            Normalizer::new(processed_at.clone()).overview_limit(self.config.overview_limit);

        let mut programs = normalizer.normalize_all(records);

        if let Some(profile) = profile {
            for program in programs.iter_mut() {
                program.matching_scores = self.scorer.score(profile, program);
            }
        }

        // Aggregation sees input order so institution program lists are not score-dependent.
        let universities = aggregate_institutions(&programs);

        if profile.is_some() {
            sort_by_overall_fit(&mut programs);
        }

        let metadata = Metadata {
            total_programs: programs.len(),
            total_universities: universities.len(),
            countries: distinct(programs.iter().map(|p| p.country.as_str())),
            disciplines: distinct(programs.iter().map(|p| p.discipline.as_str())),
            processed_at,
        };

        let matching_data = profile.map(|profile| MatchingData {
            user_profile: profile.clone(),
            programs: programs.iter().take(self.config.top_matches).cloned().collect(),
            matching_criteria: self.config.matching_criteria.clone(),
        });

        info!(
            programs = metadata.total_programs,
            universities = metadata.total_universities,
            scored = profile.is_some(),
            "processed program batch"
        );
        if let Some(best) = programs.first().filter(|_| profile.is_some()) {
            debug!(id = %best.id, overall_fit = best.matching_scores.overall_fit, "top match");
        }

        ProcessedDataset {
            metadata,
            programs,
            universities,
            matching_data,
        }
    }
}

/// Stable sort, highest overall fit first; ties keep their relative order.
pub fn sort_by_overall_fit(programs: &mut [CanonicalProgram]) {
    programs.sort_by(|a, b| {
        b.matching_scores
            .overall_fit
            .total_cmp(&a.matching_scores.overall_fit)
    });
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    values
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}
