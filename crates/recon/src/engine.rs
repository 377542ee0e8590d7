use crate::clean::clean;
use crate::config::CleanOptions;
use crate::error::ReconError;
use crate::join::join;
use crate::model::{ReconMeta, ReconResult, SourceTables};
use crate::reconcile::{complement, reconcile};

/// Run the full pipeline: join, clean the booked rows, then reconcile the
/// persons left without a cleaned booking.
///
/// Fails on a missing join/lookup column, or when cleaning leaves no booked
/// row at all. An empty without-bookings set is a normal result.
pub fn run(sources: &SourceTables, options: &CleanOptions) -> Result<ReconResult, ReconError> {
    let joined = join(sources)?;

    let with_bookings = clean(&joined.records, options);
    if with_bookings.records.is_empty() {
        return Err(ReconError::NoValidRecords {
            joined: joined.records.len(),
            dropped: with_bookings.dropped.len(),
        });
    }

    let unbooked = complement(&joined.persons, &with_bookings.records);
    log::info!(
        "{} of {} persons have no cleaned booking",
        unbooked.len(),
        joined.persons.len()
    );
    let without_bookings = reconcile(&unbooked, &joined.majors, options);
    let complement_rows = unbooked.len();

    Ok(ReconResult {
        meta: ReconMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
            dob_policy: options.dob,
            address2_policy: options.address2,
        },
        joined_rows: joined.records.len(),
        complement_rows,
        with_bookings,
        without_bookings,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Table;

    fn table(csv: &str) -> Table {
        let mut lines = csv.lines();
        let split = |l: &str| l.split('|').map(str::to_string).collect::<Vec<_>>();
        let headers = lines.next().map(split).unwrap_or_default();
        Table::new(headers, lines.map(split).collect())
    }

    fn sources() -> SourceTables {
        SourceTables {
            inventory: table("buildingName|roomName|bedName|bedId\nEast|1|A|E1A\nEast|1|B|E1B"),
            majors: table("name|id\nCS|1\nMath|2"),
            occupancy: table("buildingName|roomName|bedName|personId\nEast|1|A|10\nEast|1|B|11"),
            persons: table(
                "personId|firstName|lastName|email|dob|address|majors\n\
                 10|Ann|Ode|ann@u.edu|2000-01-01|1 A St, Ames, IA|CS\n\
                 11|Bo|Lee|bo-at-u|2000-01-01|2 B St, Ames, IA|Math\n\
                 12|Cy|Ray|cy@u.edu|2000-01-01|3 C St, Ames, IA|CS, Math",
            ),
        }
    }

    #[test]
    fn run_produces_both_sets() {
        let result = run(&sources(), &CleanOptions::default()).unwrap();
        assert_eq!(result.joined_rows, 2);
        assert_eq!(result.with_bookings.records.len(), 1);
        assert_eq!(result.with_bookings.records[0].bed_id, "E1A");
        assert_eq!(result.with_bookings.dropped.len(), 1);

        // 11 failed email in both passes; 12 was never booked
        assert_eq!(result.complement_rows, 2);
        let unbooked: Vec<_> = result.without_bookings.records.iter().map(|r| r.person_id.as_str()).collect();
        assert_eq!(unbooked, vec!["12"]);
        assert_eq!(result.without_bookings.records[0].major_ids, "1,2");
    }

    #[test]
    fn run_fails_when_nothing_survives_cleaning() {
        let mut src = sources();
        src.persons = table(
            "personId|firstName|lastName|email|dob|address|majors\n\
             10|Ann|Ode|ann|2000-01-01|1 A St, Ames, IA|CS\n\
             11|Bo|Lee|bo|2000-01-01|2 B St, Ames, IA|Math",
        );
        let err = run(&src, &CleanOptions::default()).unwrap_err();
        assert_eq!(err, ReconError::NoValidRecords { joined: 2, dropped: 2 });
    }

    #[test]
    fn run_surfaces_missing_column() {
        let mut src = sources();
        src.inventory = table("buildingName|roomName|bedName|id\nEast|1|A|E1A");
        let err = run(&src, &CleanOptions::default()).unwrap_err();
        assert!(matches!(err, ReconError::MissingColumn { ref column, .. } if column == "bedId"));
    }
}
