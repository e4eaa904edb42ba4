// ABOUTME: Folds canonical programs into per-institution profiles.
// ABOUTME: Tracks location/discipline sets and min/max/average tuition; partial folds can be merged.

use std::collections::{BTreeMap, BTreeSet};

use crate::models::{CanonicalProgram, InstitutionProfile};

/// Running state for one institution before finalization.
#[derive(Debug, Clone, Default, PartialEq)]
struct Accumulator {
    program_ids: Vec<String>,
    countries: BTreeSet<String>,
    cities: BTreeSet<String>,
    disciplines: BTreeSet<String>,
    /// `None` until a tuition is seen (stands in for +infinity).
    min_tuition: Option<u64>,
    max_tuition: u64,
    tuition_sum: u128,
    tuition_count: u64,
}

impl Accumulator {
    fn push(&mut self, program: &CanonicalProgram) {
        self.program_ids.push(program.id.clone());
        self.countries.insert(program.country.clone());
        self.cities.insert(program.city.clone());
        self.disciplines.insert(program.discipline.clone());

        if let Some(tuition) = program.tuition_eur {
            self.fold_tuition(Some(tuition), tuition, u128::from(tuition), 1);
        }
    }

    fn fold_tuition(&mut self, min: Option<u64>, max: u64, sum: u128, count: u64) {
        self.min_tuition = match (self.min_tuition, min) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
        self.max_tuition = self.max_tuition.max(max);
        self.tuition_sum += sum;
        self.tuition_count += count;
    }

    fn merge(&mut self, other: Accumulator) {
        self.program_ids.extend(other.program_ids);
        self.countries.extend(other.countries);
        self.cities.extend(other.cities);
        self.disciplines.extend(other.disciplines);
        self.fold_tuition(
            other.min_tuition,
            other.max_tuition,
            other.tuition_sum,
            other.tuition_count,
        );
    }

    fn finish(self, name: String) -> InstitutionProfile {
        let has_tuition = self.tuition_count > 0;
        InstitutionProfile {
            name,
            program_ids: self.program_ids,
            countries: self.countries.into_iter().collect(),
            cities: self.cities.into_iter().collect(),
            disciplines: self.disciplines.into_iter().collect(),
            min_tuition: self.min_tuition,
            max_tuition: has_tuition.then_some(self.max_tuition),
            avg_tuition: has_tuition
                .then(|| self.tuition_sum as f64 / self.tuition_count as f64),
        }
    }
}

/// Single-writer fold from programs to institution profiles, keyed by university name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstitutionAggregator {
    institutions: BTreeMap<String, Accumulator>,
}

impl InstitutionAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, program: &CanonicalProgram) {
        self.institutions
            .entry(program.university.clone())
            .or_default()
            .push(program);
    }

    pub fn extend<'a>(&mut self, programs: impl IntoIterator<Item = &'a CanonicalProgram>) {
        for program in programs {
            self.push(program);
        }
    }

    /// Combines a partial fold into this one.
    ///
    /// Sets, min/max, and averages are order-independent; program ids of an
    /// institution are appended in merge order.
    pub fn merge(&mut self, other: InstitutionAggregator) {
        for (name, acc) in other.institutions {
            match self.institutions.get_mut(&name) {
                Some(existing) => existing.merge(acc),
                None => {
                    self.institutions.insert(name, acc);
                }
            }
        }
    }

    pub fn len(&self) -> usize {
        self.institutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.institutions.is_empty()
    }

    pub fn finish(self) -> BTreeMap<String, InstitutionProfile> {
        self.institutions
            .into_iter()
            .map(|(name, acc)| (name.clone(), acc.finish(name)))
            .collect()
    }
}

/// Builds institution profiles from programs in the given order.
pub fn aggregate_institutions(
    programs: &[CanonicalProgram],
) -> BTreeMap<String, InstitutionProfile> {
    let mut aggregator = InstitutionAggregator::new();
    aggregator.extend(programs);
    aggregator.finish()
}
