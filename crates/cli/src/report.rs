//! Console report: assumptions, cleaning strategy, excluded rows, analytics.

use roster_recon::analytics::ReconSummary;
use roster_recon::CleanedRecord;

use crate::util::format_grid;

/// Rows of the without-bookings table echoed to the console.
const EXCLUDED_PREVIEW_ROWS: usize = 5;

/// Widest cell shown in the excluded-rows preview.
const PREVIEW_CELL_WIDTH: usize = 28;

const ASSUMPTIONS: &[&str] = &[
    "Person addresses carry no zip code, so none is extracted.",
    "City and state are taken from the person address.",
    "A successful record has at least one bed booking.",
    "Email is not unique: several records share the same email.",
    "address1 is kept only when street, city and state are all present.",
    "address1 holds the street; address2 holds the \"city, state\" pair.",
];

const STRATEGY: &[&str] = &[
    "Drop repeated (personId, email) pairs, keeping the first.",
    "Keep only emails containing both '@' and '.'.",
    "Replace missing dob, city, state, majorIds, address1 and address2 with an empty string.",
    "Merge firstName and lastName into a single name column.",
    "Keep only addresses that have street, city and state components.",
    "Run persons without a booking through the same rules before writing them out.",
];

pub fn print_assumptions() {
    println!("------------- Assumptions ----------------");
    for line in ASSUMPTIONS {
        println!("{line}");
    }
}

pub fn print_cleaning_strategy() {
    println!("------------- Data Cleaning Strategy ----------------");
    for line in STRATEGY {
        println!("{line}");
    }
}

pub fn print_excluded(records: &[CleanedRecord]) {
    if records.is_empty() {
        println!("No rows were excluded.");
        return;
    }
    println!("Excluded rows (persons without a booking):");
    println!("{}", excluded_preview(records));
    if records.len() > EXCLUDED_PREVIEW_ROWS {
        println!("... {} more", records.len() - EXCLUDED_PREVIEW_ROWS);
    }
}

fn excluded_preview(records: &[CleanedRecord]) -> String {
    let rows: Vec<Vec<String>> = records
        .iter()
        .take(EXCLUDED_PREVIEW_ROWS)
        .map(CleanedRecord::to_row)
        .collect();
    format_grid(&CleanedRecord::COLUMNS, &rows, PREVIEW_CELL_WIDTH)
}

pub fn print_analytics(summary: &ReconSummary) {
    println!("------------- Analytics ----------------");
    println!("Persons with bookings: {}", summary.persons_with_bookings);
    println!("Persons without bookings: {}", summary.persons_without_bookings);

    println!();
    println!("-- Additional Analytics --");
    println!("Unique Majors: {}", summary.unique_major_sets);
    println!("Unique States: {}", summary.unique_states);
    match summary.average_age {
        Some(age) => println!("Average Age of Persons: {age:.2}"),
        None => println!("Average Age of Persons: n/a"),
    }

    print_drops("Dropped while cleaning bookings", &summary.dropped_with_bookings);
    print_drops("Dropped while cleaning persons without bookings", &summary.dropped_without_bookings);
}

fn print_drops(title: &str, counts: &std::collections::BTreeMap<String, usize>) {
    if counts.is_empty() {
        return;
    }
    println!();
    println!("-- {title} --");
    for (reason, count) in counts {
        println!("{reason}: {count}");
    }
}
