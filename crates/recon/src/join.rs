use std::collections::HashMap;

use crate::error::ReconError;
use crate::model::{
    cell, BedKey, InventoryRecord, JoinedRecord, OccupancyRecord, PersonRecord, SourceTables,
    Table,
};
use crate::normalize::{resolve_majors, MajorLookup};

/// Output of the join stage.
#[derive(Debug, Clone)]
pub struct Joined {
    pub records: Vec<JoinedRecord>,
    /// Lookup built from the majors table; reused by the complement pass.
    pub majors: MajorLookup,
    /// Typed person rows, in source order.
    pub persons: Vec<PersonRecord>,
}

/// Left-join occupancy → inventory (building, room, bed) → persons (personId)
/// and resolve each row's major ids.
///
/// Every required column is checked before any row is joined.
pub fn join(sources: &SourceTables) -> Result<Joined, ReconError> {
    let occupancy = occupancy_records(&sources.occupancy)?;
    let inventory = inventory_records(&sources.inventory)?;
    let persons = person_records(&sources.persons)?;
    let majors = MajorLookup::from_table(&sources.majors)?;
    if majors.is_empty() {
        log::warn!("majors table has no named rows; every majorId will be blank");
    }

    let records = join_records(&occupancy, &inventory, &persons, &majors);
    log::info!(
        "joined {} occupancy rows against {} beds, {} persons and {} majors -> {} rows",
        occupancy.len(),
        inventory.len(),
        persons.len(),
        majors.len(),
        records.len()
    );

    Ok(Joined { records, majors, persons })
}

/// Relational left joins: one output row per match, left order first.
pub fn join_records(
    occupancy: &[OccupancyRecord],
    inventory: &[InventoryRecord],
    persons: &[PersonRecord],
    majors: &MajorLookup,
) -> Vec<JoinedRecord> {
    let mut beds: HashMap<BedKey, Vec<&InventoryRecord>> = HashMap::new();
    for bed in inventory {
        beds.entry(bed.bed_key()).or_default().push(bed);
    }

    let mut people: HashMap<Option<&str>, Vec<&PersonRecord>> = HashMap::new();
    for person in persons {
        people.entry(person.person_id.as_deref()).or_default().push(person);
    }

    let mut out = Vec::with_capacity(occupancy.len());

    for occ in occupancy {
        let bed_ids: Vec<Option<String>> = match beds.get(&occ.bed_key()) {
            Some(matches) => matches.iter().map(|b| b.bed_id.clone()).collect(),
            None => {
                log::warn!(
                    "occupancy for person {:?} references unknown bed {:?}/{:?}/{:?}",
                    occ.person_id,
                    occ.building_name,
                    occ.room_name,
                    occ.bed_name
                );
                vec![None]
            }
        };

        let matched_people = people.get(&occ.person_id.as_deref());
        if matched_people.is_none() {
            log::debug!("occupancy person {:?} not found in persons", occ.person_id);
        }

        for bed_id in &bed_ids {
            let base = JoinedRecord {
                building_name: occ.building_name.clone(),
                room_name: occ.room_name.clone(),
                bed_name: occ.bed_name.clone(),
                bed_id: bed_id.clone(),
                person_id: occ.person_id.clone(),
                ..JoinedRecord::default()
            };

            match matched_people {
                Some(matches) => {
                    for person in matches {
                        out.push(JoinedRecord {
                            first_name: person.first_name.clone(),
                            last_name: person.last_name.clone(),
                            email: person.email.clone(),
                            dob: person.dob.clone(),
                            address: person.address.clone(),
                            majors: person.majors.clone(),
                            major_ids: resolve_majors(person.majors.as_deref(), majors),
                            ..base.clone()
                        });
                    }
                }
                None => out.push(base),
            }
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Table → typed records
// ---------------------------------------------------------------------------

pub fn inventory_records(table: &Table) -> Result<Vec<InventoryRecord>, ReconError> {
    let building = table.column_index("inventory", "buildingName")?;
    let room = table.column_index("inventory", "roomName")?;
    let bed = table.column_index("inventory", "bedName")?;
    let bed_id = table.column_index("inventory", "bedId")?;

    Ok(table
        .rows
        .iter()
        .map(|row| InventoryRecord {
            building_name: cell(row, building),
            room_name: cell(row, room),
            bed_name: cell(row, bed),
            bed_id: cell(row, bed_id),
        })
        .collect())
}

pub fn occupancy_records(table: &Table) -> Result<Vec<OccupancyRecord>, ReconError> {
    let building = table.column_index("occupancy", "buildingName")?;
    let room = table.column_index("occupancy", "roomName")?;
    let bed = table.column_index("occupancy", "bedName")?;
    let person_id = table.column_index("occupancy", "personId")?;

    Ok(table
        .rows
        .iter()
        .map(|row| OccupancyRecord {
            building_name: cell(row, building),
            room_name: cell(row, room),
            bed_name: cell(row, bed),
            person_id: cell(row, person_id),
        })
        .collect())
}

pub fn person_records(table: &Table) -> Result<Vec<PersonRecord>, ReconError> {
    let idx = |column: &str| table.column_index("persons", column);

    let person_id = idx("personId")?;
    let first_name = idx("firstName")?;
    let last_name = idx("lastName")?;
    let email = idx("email")?;
    let dob = idx("dob")?;
    let address = idx("address")?;
    let majors = idx("majors")?;

    Ok(table
        .rows
        .iter()
        .map(|row| PersonRecord {
            person_id: cell(row, person_id),
            first_name: cell(row, first_name),
            last_name: cell(row, last_name),
            email: cell(row, email),
            dob: cell(row, dob),
            address: cell(row, address),
            majors: cell(row, majors),
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
