// ABOUTME: Pipeline configuration: top-match cap, overview truncation, and criteria taxonomy.
// ABOUTME: Deserializes from TOML with defaults for missing keys and offers builder-style setters.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::criteria::MatchingCriteria;
use crate::error::PipelineError;

pub const DEFAULT_TOP_MATCHES: usize = 50;
pub const DEFAULT_OVERVIEW_LIMIT: usize = 500;

/// Configuration options for a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// How many sorted programs are copied into the matching payload.
    pub top_matches: usize,
    /// Maximum overview length in characters.
    pub overview_limit: usize,
    pub matching_criteria: MatchingCriteria,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            top_matches: DEFAULT_TOP_MATCHES,
            overview_limit: DEFAULT_OVERVIEW_LIMIT,
            matching_criteria: MatchingCriteria::default(),
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, PipelineError> {
        toml::from_str(content).map_err(PipelineError::config)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, PipelineError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Set how many top programs go into the matching payload.
    pub fn top_matches(mut self, n: usize) -> Self {
        self.top_matches = n;
        self
    }

    /// Set the overview truncation limit.
    pub fn overview_limit(mut self, limit: usize) -> Self {
        self.overview_limit = limit;
        self
    }

    /// Replace the criteria taxonomy.
    pub fn matching_criteria(mut self, criteria: MatchingCriteria) -> Self {
        self.matching_criteria = criteria;
        self
    }
}
