// ABOUTME: Matching-criteria taxonomy handed to the downstream matcher with each scored batch.
// ABOUTME: Passed into the pipeline through configuration rather than held as global state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Category name to the criteria the matcher considers in that category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchingCriteria(BTreeMap<String, Vec<String>>);

impl MatchingCriteria {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with_category<I, S>(mut self, category: impl Into<String>, criteria: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0
            .insert(category.into(), criteria.into_iter().map(Into::into).collect());
        self
    }

    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.0.get(category).map(Vec::as_slice)
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for MatchingCriteria {
    fn default() -> Self {
        Self::new()
            .with_category("academic", ["gpa", "test_scores", "subjects"])
            .with_category("financial", ["tuition_range", "funding_available"])
            .with_category("location", ["country", "city", "climate"])
            .with_category("program", ["discipline", "duration", "language"])
            .with_category("requirements", ["english_proficiency", "prerequisites"])
    }
}
