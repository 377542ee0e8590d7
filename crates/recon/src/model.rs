use std::fmt;

use serde::Serialize;

use crate::error::ReconError;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A header row plus records, exactly as read from one source file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Position of `column` in the header row.
    pub fn column_index(&self, table: &str, column: &str) -> Result<usize, ReconError> {
        self.headers.iter().position(|h| h == column).ok_or_else(|| {
            ReconError::MissingColumn {
                table: table.into(),
                column: column.into(),
            }
        })
    }
}

/// Cell tokens read as missing, mirroring the usual spreadsheet/CSV null spellings.
const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

pub fn is_missing(value: &str) -> bool {
    MISSING_TOKENS.contains(&value)
}

/// Cell value at `idx`, or `None` when the cell is absent or a null token.
pub fn cell(row: &[String], idx: usize) -> Option<String> {
    row.get(idx)
        .map(String::as_str)
        .filter(|v| !is_missing(v))
        .map(str::to_string)
}

/// The four source tables of one run.
#[derive(Debug, Clone, Default)]
pub struct SourceTables {
    pub inventory: Table,
    pub majors: Table,
    pub occupancy: Table,
    pub persons: Table,
}

// ---------------------------------------------------------------------------
// Typed source records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryRecord {
    pub building_name: Option<String>,
    pub room_name: Option<String>,
    pub bed_name: Option<String>,
    pub bed_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyRecord {
    pub building_name: Option<String>,
    pub room_name: Option<String>,
    pub bed_name: Option<String>,
    pub person_id: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonRecord {
    pub person_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
    /// Comma-separated major names.
    pub majors: Option<String>,
}

/// Composite bed key = (buildingName, roomName, bedName).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BedKey {
    pub building_name: Option<String>,
    pub room_name: Option<String>,
    pub bed_name: Option<String>,
}

impl InventoryRecord {
    pub fn bed_key(&self) -> BedKey {
        BedKey {
            building_name: self.building_name.clone(),
            room_name: self.room_name.clone(),
            bed_name: self.bed_name.clone(),
        }
    }
}

impl OccupancyRecord {
    pub fn bed_key(&self) -> BedKey {
        BedKey {
            building_name: self.building_name.clone(),
            room_name: self.room_name.clone(),
            bed_name: self.bed_name.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Joined + cleaned
// ---------------------------------------------------------------------------

/// One occupancy row with its bed and person attached (left joins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JoinedRecord {
    pub building_name: Option<String>,
    pub room_name: Option<String>,
    pub bed_name: Option<String>,
    pub bed_id: Option<String>,
    pub person_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub dob: Option<String>,
    pub address: Option<String>,
    pub majors: Option<String>,
    /// Resolved major ids, "" for names missing from the lookup.
    pub major_ids: Vec<String>,
}

impl JoinedRecord {
    /// A person row with no booking attached.
    pub fn unbooked(person: &PersonRecord, major_ids: Vec<String>) -> Self {
        Self {
            building_name: None,
            room_name: None,
            bed_name: None,
            bed_id: None,
            person_id: person.person_id.clone(),
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            email: person.email.clone(),
            dob: person.dob.clone(),
            address: person.address.clone(),
            majors: person.majors.clone(),
            major_ids,
        }
    }
}

/// Lifts a cleaned record back into the cleaner's input shape, so the output
/// of one pass can be fed through the cleaner again.
impl From<&CleanedRecord> for JoinedRecord {
    fn from(record: &CleanedRecord) -> Self {
        let present = |v: &str| (!v.is_empty()).then(|| v.to_string());
        let (first_name, last_name) = match record.name.split_once(' ') {
            Some((first, last)) => (Some(first.to_string()), Some(last.to_string())),
            None => (None, None),
        };
        let address = [&record.address1, &record.city, &record.state]
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ");
        let major_ids = if record.major_ids.is_empty() {
            Vec::new()
        } else {
            record.major_ids.split(',').map(str::to_string).collect()
        };

        Self {
            building_name: None,
            room_name: None,
            bed_name: None,
            bed_id: present(&record.bed_id),
            person_id: present(&record.person_id),
            first_name,
            last_name,
            email: present(&record.email),
            dob: present(&record.dob),
            address: present(&address),
            majors: None,
            major_ids,
        }
    }
}

/// Final output row, shared by both output tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanedRecord {
    #[serde(rename = "personId")]
    pub person_id: String,
    pub name: String,
    pub email: String,
    pub dob: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    #[serde(rename = "majorIds")]
    pub major_ids: String,
    #[serde(rename = "bedId")]
    pub bed_id: String,
}

impl CleanedRecord {
    /// Output column order.
    pub const COLUMNS: [&'static str; 10] = [
        "personId", "name", "email", "dob", "address1", "address2", "city", "state", "majorIds",
        "bedId",
    ];

    /// Field values in [`CleanedRecord::COLUMNS`] order.
    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.person_id.clone(),
            self.name.clone(),
            self.email.clone(),
            self.dob.clone(),
            self.address1.clone(),
            self.address2.clone(),
            self.city.clone(),
            self.state.clone(),
            self.major_ids.clone(),
            self.bed_id.clone(),
        ]
    }
}

// ---------------------------------------------------------------------------
// Drop diagnostics
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    Duplicate,
    InvalidDob,
    InvalidEmail,
    IncompleteAddress,
}

impl fmt::Display for DropReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Duplicate => write!(f, "duplicate"),
            Self::InvalidDob => write!(f, "invalid_dob"),
            Self::InvalidEmail => write!(f, "invalid_email"),
            Self::IncompleteAddress => write!(f, "incomplete_address"),
        }
    }
}

/// A row the cleaner removed, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DroppedRow {
    pub person_id: Option<String>,
    pub email: Option<String>,
    pub reason: DropReason,
}

impl DroppedRow {
    pub fn new(record: &JoinedRecord, reason: DropReason) -> Self {
        Self {
            person_id: record.person_id.clone(),
            email: record.email.clone(),
            reason,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanOutcome {
    pub records: Vec<CleanedRecord>,
    pub dropped: Vec<DroppedRow>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ReconResult {
    pub meta: ReconMeta,
    /// Rows produced by the occupancy/inventory/person join.
    pub joined_rows: usize,
    /// Person rows fed into the second cleaning pass.
    pub complement_rows: usize,
    pub with_bookings: CleanOutcome,
    pub without_bookings: CleanOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub engine_version: String,
    pub run_at: String,
    pub dob_policy: crate::config::DobPolicy,
    pub address2_policy: crate::config::Address2Policy,
}
