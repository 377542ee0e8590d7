use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty file name, clashing outputs, etc.).
    ConfigValidation(String),
    /// A join or lookup column is absent from a source table.
    MissingColumn { table: String, column: String },
    /// Cleaning removed every booked row.
    NoValidRecords { joined: usize, dropped: usize },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { table, column } => {
                write!(f, "table '{table}': missing column '{column}'")
            }
            Self::NoValidRecords { joined, dropped } => {
                write!(f, "no valid data after cleaning ({dropped} of {joined} joined rows dropped)")
            }
        }
    }
}

impl std::error::Error for ReconError {}
