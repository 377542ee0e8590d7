use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum TableError {
    /// Input file does not exist.
    NotFound { path: PathBuf },
    /// Input file has no header row.
    Empty { path: PathBuf },
    /// Input file is not readable as a table (ragged rows, bad quoting, IO failure).
    Malformed { path: PathBuf, message: String },
    /// Output file could not be written.
    Write { path: PathBuf, message: String },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { path } => write!(f, "{} not found", path.display()),
            Self::Empty { path } => write!(f, "{}: no columns to parse from file", path.display()),
            Self::Malformed { path, message } => {
                write!(f, "error parsing {}: {message}", path.display())
            }
            Self::Write { path, message } => {
                write!(f, "cannot write {}: {message}", path.display())
            }
        }
    }
}

impl std::error::Error for TableError {}
