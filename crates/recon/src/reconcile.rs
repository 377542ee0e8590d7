use std::collections::HashSet;

use crate::clean::clean;
use crate::config::CleanOptions;
use crate::model::{CleanOutcome, CleanedRecord, JoinedRecord, PersonRecord};
use crate::normalize::{resolve_majors, MajorLookup};

/// Persons whose personId does not appear in the cleaned with-bookings set.
pub fn complement<'a>(
    persons: &'a [PersonRecord],
    with_bookings: &[CleanedRecord],
) -> Vec<&'a PersonRecord> {
    let booked: HashSet<&str> = with_bookings.iter().map(|r| r.person_id.as_str()).collect();
    persons
        .iter()
        .filter(|p| !booked.contains(p.person_id.as_deref().unwrap_or_default()))
        .collect()
}

/// Second pass: run the complement set (see [`complement`]) through the
/// same cleaner as the booked rows, with no bed attached.
///
/// The complement is taken against the *cleaned* with-bookings rows, so a
/// booked person dropped for data quality gets a second chance here and ends
/// up in neither output only if this pass drops them too.
pub fn reconcile(
    unbooked: &[&PersonRecord],
    majors: &MajorLookup,
    options: &CleanOptions,
) -> CleanOutcome {
    let rows: Vec<JoinedRecord> = unbooked
        .iter()
        .map(|p| JoinedRecord::unbooked(p, resolve_majors(p.majors.as_deref(), majors)))
        .collect();

    clean(&rows, options)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DropReason;

    fn person(id: &str, email: &str, address: &str, majors: &str) -> PersonRecord {
        PersonRecord {
            person_id: Some(id.into()),
            first_name: Some("Ada".into()),
            last_name: Some("King".into()),
            email: Some(email.into()),
            dob: Some("1815-12-10".into()),
            address: Some(address.into()),
            majors: (!majors.is_empty()).then(|| majors.to_string()),
        }
    }

    fn booked(id: &str) -> CleanedRecord {
        CleanedRecord { person_id: id.into(), bed_id: "B-1".into(), ..CleanedRecord::default() }
    }

    #[test]
    fn complement_excludes_booked_ids() {
        let persons = vec![
            person("1", "a@b.c", "1 A St, Reno, NV", ""),
            person("2", "b@b.c", "1 A St, Reno, NV", ""),
            person("1", "a2@b.c", "1 A St, Reno, NV", ""),
        ];
        let rest = complement(&persons, &[booked("1")]);
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].person_id.as_deref(), Some("2"));
    }

    #[test]
    fn reconcile_resolves_majors_and_blanks_bed() {
        let lookup = MajorLookup::from_pairs([("CS", "1"), ("Math", "2")]);
        let persons = vec![person("2", "b@b.c", "1 A St, Reno, NV", "Math, Art")];
        let unbooked = complement(&persons, &[booked("1")]);
        let out = reconcile(&unbooked, &lookup, &CleanOptions::default());
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].major_ids, "2,");
        assert_eq!(out.records[0].bed_id, "");
        assert_eq!(out.records[0].name, "Ada King");
    }

    #[test]
    fn reconcile_applies_cleaning_rules() {
        let lookup = MajorLookup::default();
        let persons = vec![
            person("2", "b@b.c", "1 A St", ""),
            person("3", "no-at-sign.com", "1 A St, Reno, NV", ""),
            person("4", "d@b.c", "1 A St, Reno, NV", ""),
            person("4", "d@b.c", "2 B St, Reno, NV", ""),
        ];
        let unbooked = complement(&persons, &[]);
        assert_eq!(unbooked.len(), 4);
        let out = reconcile(&unbooked, &lookup, &CleanOptions::default());
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].address1, "1 A St");
        let reasons: Vec<_> = out.dropped.iter().map(|d| d.reason).collect();
        assert_eq!(
            reasons,
            vec![DropReason::IncompleteAddress, DropReason::InvalidEmail, DropReason::Duplicate]
        );
    }
}
