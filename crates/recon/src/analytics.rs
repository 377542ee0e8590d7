use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::model::{DroppedRow, ReconMeta, ReconResult};

/// Run-level figures for the console report and `--json` output.
#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub meta: ReconMeta,
    pub joined_rows: usize,
    pub persons_with_bookings: usize,
    pub persons_without_bookings: usize,
    /// Distinct `majorIds` values among booked persons ("" counts).
    pub unique_major_sets: usize,
    pub unique_states: usize,
    /// Mean of (current year − birth year) over booked persons with a dob.
    pub average_age: Option<f64>,
    pub dropped_with_bookings: BTreeMap<String, usize>,
    pub dropped_without_bookings: BTreeMap<String, usize>,
}

pub fn summarize(result: &ReconResult, today: NaiveDate) -> ReconSummary {
    let booked = &result.with_bookings.records;

    let unique_major_sets = booked.iter().map(|r| r.major_ids.as_str()).collect::<HashSet<_>>().len();
    let unique_states = booked.iter().map(|r| r.state.as_str()).collect::<HashSet<_>>().len();

    let ages: Vec<i32> = booked
        .iter()
        .filter_map(|r| NaiveDate::parse_from_str(&r.dob, "%Y-%m-%d").ok())
        .map(|dob| today.year() - dob.year())
        .collect();
    let average_age = if ages.is_empty() {
        None
    } else {
        Some(ages.iter().map(|&a| f64::from(a)).sum::<f64>() / ages.len() as f64)
    };

    ReconSummary {
        meta: result.meta.clone(),
        joined_rows: result.joined_rows,
        persons_with_bookings: booked.len(),
        persons_without_bookings: result.without_bookings.records.len(),
        unique_major_sets,
        unique_states,
        average_age,
        dropped_with_bookings: drop_counts(&result.with_bookings.dropped),
        dropped_without_bookings: drop_counts(&result.without_bookings.dropped),
    }
}

fn drop_counts(dropped: &[DroppedRow]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for row in dropped {
        *counts.entry(row.reason.to_string()).or_insert(0) += 1;
    }
    counts
}
