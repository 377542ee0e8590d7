use std::collections::HashSet;

use crate::config::{CleanOptions, DobPolicy};
use crate::model::{CleanOutcome, CleanedRecord, DropReason, DroppedRow, JoinedRecord};
use crate::normalize::{join_major_ids, parse_date, split_address, validate_email};

/// Validate and normalize joined rows into the output shape.
///
/// Rules, applied in order per row:
/// 1. drop repeats of an already-seen (personId, email) pair;
/// 2. normalize dob (blank it, or drop the row under [`DobPolicy::Strict`]);
/// 3. drop rows whose email fails [`validate_email`];
/// 4. build `name` from first and last name;
/// 5. split the address into address1 / city / state / address2;
/// 6. drop rows missing address1, city or state;
/// 7. blank whatever is still absent.
///
/// Input order is preserved. Dropped rows are returned, not raised.
pub fn clean(records: &[JoinedRecord], options: &CleanOptions) -> CleanOutcome {
    let mut seen: HashSet<(Option<&str>, Option<&str>)> = HashSet::new();
    let mut outcome = CleanOutcome::default();

    for record in records {
        if !seen.insert((record.person_id.as_deref(), record.email.as_deref())) {
            drop_row(&mut outcome, record, DropReason::Duplicate);
            continue;
        }

        match clean_row(record, options) {
            Ok(cleaned) => outcome.records.push(cleaned),
            Err(reason) => drop_row(&mut outcome, record, reason),
        }
    }

    log::info!(
        "cleaned {} rows: kept {}, dropped {}",
        records.len(),
        outcome.records.len(),
        outcome.dropped.len()
    );
    outcome
}

/// Steps 2–7 for a single, already de-duplicated row.
fn clean_row(record: &JoinedRecord, options: &CleanOptions) -> Result<CleanedRecord, DropReason> {
    let dob = record.dob.as_deref().and_then(parse_date);
    if dob.is_none() && options.dob == DobPolicy::Strict {
        return Err(DropReason::InvalidDob);
    }

    if !validate_email(record.email.as_deref()) {
        return Err(DropReason::InvalidEmail);
    }

    let name = match (&record.first_name, &record.last_name) {
        (Some(first), Some(last)) => format!("{first} {last}"),
        _ => String::new(),
    };

    let address = split_address(record.address.as_deref(), options.address2);
    if !address.is_complete() {
        return Err(DropReason::IncompleteAddress);
    }

    Ok(CleanedRecord {
        person_id: record.person_id.clone().unwrap_or_default(),
        name,
        email: record.email.clone().unwrap_or_default(),
        dob: dob.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
        address1: address.address1.unwrap_or_default(),
        address2: address.address2.unwrap_or_default(),
        city: address.city.unwrap_or_default(),
        state: address.state.unwrap_or_default(),
        major_ids: join_major_ids(&record.major_ids),
        bed_id: record.bed_id.clone().unwrap_or_default(),
    })
}

fn drop_row(outcome: &mut CleanOutcome, record: &JoinedRecord, reason: DropReason) {
    log::debug!(
        "dropping row personId={} email={}: {reason}",
        record.person_id.as_deref().unwrap_or("-"),
        record.email.as_deref().unwrap_or("-"),
    );
    outcome.dropped.push(DroppedRow::new(record, reason));
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
