//! Display helpers shared by the listing and detail views.

use crate::model::Timestamp;

/// Shown on the detail view when a recipe has no creation date.
pub const UNDATED_LABEL: &str = "Recently";

/// Formats a date the way the en-US locale does: `M/D/YYYY`.
///
/// Returns an empty string when there is no timestamp.
pub fn format_date(timestamp: Option<&Timestamp>) -> String {
    timestamp
        .map(|ts| ts.format("%-m/%-d/%Y").to_string())
        .unwrap_or_default()
}

/// One decimal place, e.g. `4.5`.
pub fn format_rating(rating: f64) -> String {
    format!("{rating:.1}")
}

pub fn format_prep_time(minutes: u32) -> String {
    format!("{minutes} min")
}
