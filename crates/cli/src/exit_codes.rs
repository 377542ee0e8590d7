//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain           | Description                              |
//! |---------|------------------|------------------------------------------|
//! | 0       | Universal        | Success                                  |
//! | 2       | Universal        | Usage or config error                    |
//! | 3-5     | load             | Source table could not be read           |
//! | 6-7     | pipeline         | Join / cleaning aborted the run          |
//! | 8       | output           | Output table could not be written        |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant in the appropriate range
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant mapping function below

use roster_io::TableError;
use roster_recon::ReconError;

// =============================================================================
// Universal (0, 2)
// =============================================================================

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// Usage error - bad arguments, unreadable or invalid config.
pub const EXIT_USAGE: u8 = 2;

// =============================================================================
// Load (3-5)
// =============================================================================

/// A required input file does not exist.
pub const EXIT_SOURCE_NOT_FOUND: u8 = 3;

/// A required input file is empty (no header row).
pub const EXIT_SOURCE_EMPTY: u8 = 4;

/// A required input file is not parseable as CSV.
pub const EXIT_SOURCE_MALFORMED: u8 = 5;

// =============================================================================
// Pipeline (6-7)
// =============================================================================

/// A join or lookup column is missing from a source table.
pub const EXIT_MISSING_COLUMN: u8 = 6;

/// Cleaning removed every booked row.
pub const EXIT_NO_VALID_RECORDS: u8 = 7;

// =============================================================================
// Output (8)
// =============================================================================

/// An output table could not be written.
pub const EXIT_WRITE_FAILED: u8 = 8;

// =============================================================================
// Error mapping
// =============================================================================

pub fn table_exit_code(err: &TableError) -> u8 {
    match err {
        TableError::NotFound { .. } => EXIT_SOURCE_NOT_FOUND,
        TableError::Empty { .. } => EXIT_SOURCE_EMPTY,
        TableError::Malformed { .. } => EXIT_SOURCE_MALFORMED,
        TableError::Write { .. } => EXIT_WRITE_FAILED,
    }
}

pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_USAGE,
        ReconError::MissingColumn { .. } => EXIT_MISSING_COLUMN,
        ReconError::NoValidRecords { .. } => EXIT_NO_VALID_RECORDS,
    }
}
