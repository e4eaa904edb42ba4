// ABOUTME: Program duration parsing from strings like "3 years" or "18 months".
// ABOUTME: Year patterns take priority over month patterns; result is a month count.

use once_cell::sync::Lazy;
use regex::Regex;

static YEARS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*year").unwrap());
static MONTHS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*month").unwrap());

/// Parses a duration string into months.
///
/// Returns `None` when no unit pattern matches or the count is zero.
pub fn parse_duration_months(text: &str) -> Option<u32> {
    // (pattern, months per unit), tried in order
    let units: [(&Regex, u32); 2] = [(&*YEARS_RE, 12), (&*MONTHS_RE, 1)];
    let (caps, per_unit) = units
        .iter()
        .find_map(|(re, per_unit)| re.captures(text).map(|caps| (caps, *per_unit)))?;

    let count: u32 = caps[1].parse().ok()?;
    count.checked_mul(per_unit).filter(|months| *months > 0)
}
