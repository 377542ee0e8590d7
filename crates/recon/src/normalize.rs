//! Field normalizers: pure, infallible functions applied cell by cell.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};

use crate::config::Address2Policy;
use crate::error::ReconError;
use crate::model::{cell, Table};

// ---------------------------------------------------------------------------
// Email
// ---------------------------------------------------------------------------

/// An email is accepted when it contains both `@` and `.`, anywhere.
pub fn validate_email(value: Option<&str>) -> bool {
    value.is_some_and(|v| v.contains('@') && v.contains('.'))
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

/// Date-only layouts, tried in order. Month-first wins over day-first for
/// ambiguous slash dates; day-first is only reached when month-first fails.
/// Two-digit years come before their four-digit forms, since `%Y` would read
/// `99` as year 99.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%d/%m/%y",
    "%d/%m/%Y",
    "%d-%m-%y",
    "%d-%m-%Y",
    "%d.%m.%y",
    "%d.%m.%Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%b %d, %Y",
    "%b %d %Y",
    "%d %B %Y",
    "%d %b %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Parse a calendar date from the common spellings found in exported sheets.
///
/// Returns `None` for anything that does not read as a real date, including
/// years before 1000; the time part of a timestamp is discarded.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let s = value.trim();
    if s.is_empty() {
        return None;
    }

    // Compact YYYYMMDD
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year = s.get(0..4)?.parse().ok()?;
        let month = s.get(4..6)?.parse().ok()?;
        let day = s.get(6..8)?.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    DATE_FORMATS
        .iter()
        .filter_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
        .find(|d| d.year() >= MIN_YEAR)
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .filter_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
                .map(|dt| dt.date())
                .find(|d| d.year() >= MIN_YEAR)
        })
}

/// Earliest year accepted from a four-digit field.
const MIN_YEAR: i32 = 1000;

// ---------------------------------------------------------------------------
// Addresses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressParts {
    pub address1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub address2: Option<String>,
}

impl AddressParts {
    /// Street, city and state are all present.
    pub fn is_complete(&self) -> bool {
        self.address1.is_some() && self.city.is_some() && self.state.is_some()
    }
}

/// Split `"street, city, state"` on the literal `", "` separator.
///
/// Missing or empty segments are absent; anything after the third segment is
/// ignored.
pub fn split_address(value: Option<&str>, policy: Address2Policy) -> AddressParts {
    let mut segments = value
        .unwrap_or("")
        .split(", ")
        .map(|s| (!s.is_empty()).then(|| s.to_string()));

    let address1 = segments.next().flatten();
    let city = segments.next().flatten();
    let state = segments.next().flatten();

    let address2 = match policy {
        Address2Policy::Legacy => Some(format!(
            "{}, {}",
            city.as_deref().unwrap_or("None"),
            state.as_deref().unwrap_or("None"),
        )),
        Address2Policy::Strict => match (&city, &state) {
            (Some(c), Some(s)) => Some(format!("{c}, {s}")),
            _ => None,
        },
    };

    AddressParts { address1, city, state, address2 }
}

// ---------------------------------------------------------------------------
// Majors
// ---------------------------------------------------------------------------

/// Major name → major id, built once per run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MajorLookup {
    ids: HashMap<String, String>,
}

impl MajorLookup {
    /// Build from (name, id) pairs. A repeated name keeps its last id.
    pub fn from_pairs<I, N, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        Self {
            ids: pairs.into_iter().map(|(n, v)| (n.into(), v.into())).collect(),
        }
    }

    /// Build from the majors table (`name`, `id` columns).
    pub fn from_table(table: &Table) -> Result<Self, ReconError> {
        let name_idx = table.column_index("majors", "name")?;
        let id_idx = table.column_index("majors", "id")?;

        let mut ids = HashMap::new();
        for row in &table.rows {
            let Some(name) = cell(row, name_idx) else {
                log::debug!("majors: skipping row with no name");
                continue;
            };
            if let Some(previous) = ids.insert(name.clone(), cell(row, id_idx).unwrap_or_default()) {
                log::debug!("majors: '{name}' repeated, replacing id '{previous}'");
            }
        }
        Ok(Self { ids })
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.ids.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Resolve a comma-separated list of major names to ids, position for
/// position. Unknown names resolve to `""`; blank segments are skipped.
pub fn resolve_majors(raw: Option<&str>, lookup: &MajorLookup) -> Vec<String> {
    let Some(raw) = raw else {
        return Vec::new();
    };
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| lookup.get(name).unwrap_or_default().to_string())
        .collect()
}

/// Serialized form of a resolved major list: `["1", ""]` → `"1,"`.
pub fn join_major_ids(ids: &[String]) -> String {
    ids.join(",")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
