use chrono::{DateTime, NaiveDate, Utc};

use super::status::{days_left, parse_date, status, UrgencyTier};
use crate::models::Deadline;

/// One visible entry in the deadline list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadlineRow {
    pub id: i64,
    pub title: String,
    pub date: String,
    /// en-GB `DD/MM/YYYY`.
    pub display_date: String,
    pub days_left: i64,
    pub tier: UrgencyTier,
}

/// Builds the visible rows ordered by date; equal dates keep store order.
pub fn build_rows(deadlines: &[Deadline], now: DateTime<Utc>) -> Vec<DeadlineRow> {
    let mut dated: Vec<(NaiveDate, &Deadline)> = deadlines
        .iter()
        .filter_map(|d| match parse_date(&d.date) {
            Some(date) => Some((date, d)),
            None => {
                tracing::warn!(id = d.id, date = %d.date, "skipping deadline with bad date");
                None
            }
        })
        .collect();

    // `sort_by_key` is stable, so ties stay in store order.
    dated.sort_by_key(|(date, _)| *date);

    dated
        .into_iter()
        .map(|(date, d)| {
            let left = days_left(date, now);
            DeadlineRow {
                id: d.id,
                title: d.title.clone(),
                date: d.date.clone(),
                display_date: date.format("%d/%m/%Y").to_string(),
                days_left: left,
                tier: status(left),
            }
        })
        .collect()
}

pub fn days_left_label(days: i64) -> String {
    format!("{days} days left")
}
