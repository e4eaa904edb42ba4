// ABOUTME: Pure field extractors turning scraped free text into typed values.
// ABOUTME: Tuition amounts, durations in months, and language proficiency thresholds.

//! Field extractors.
//!
//! Every extractor is infallible: text that matches no known pattern yields
//! `None` (or a default block) and never aborts the caller. Patterns are kept
//! in small tables so a new currency or test can be added as one row.

pub mod duration;
pub mod language;
pub mod tuition;

pub use duration::parse_duration_months;
pub use language::{extract_language_requirements, ScoreKind, ScorePattern, SCORE_PATTERNS};
pub use tuition::{extract_tuition_amount, CurrencyRate, CURRENCY_RATES};
