// CSV table import/export

use std::ffi::OsString;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

use roster_recon::Table;

use crate::error::TableError;

/// Read a header-plus-records CSV file into a [`Table`].
///
/// Missing file, empty file and unparseable content are reported as distinct
/// [`TableError`] variants.
pub fn read_table(path: &Path) -> Result<Table, TableError> {
    let content = read_file_as_utf8(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => TableError::NotFound { path: path.to_path_buf() },
        _ => TableError::Malformed { path: path.to_path_buf(), message: e.to_string() },
    })?;

    let table = table_from_string(&content).map_err(|e| match e {
        ParseFailure::Empty => TableError::Empty { path: path.to_path_buf() },
        ParseFailure::Csv(message) => TableError::Malformed { path: path.to_path_buf(), message },
    })?;

    log::info!(
        "loaded {}: {} columns, {} rows",
        path.display(),
        table.headers.len(),
        table.rows.len()
    );
    Ok(table)
}

/// Read file and convert to UTF-8 if needed (handles Windows-1252, Latin-1, etc.)
pub fn read_file_as_utf8(path: &Path) -> std::io::Result<String> {
    let mut file = std::fs::File::open(path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            log::debug!("{} is not UTF-8, decoding as Windows-1252", path.display());
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum ParseFailure {
    Empty,
    Csv(String),
}

fn table_from_string(content: &str) -> Result<Table, ParseFailure> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    if content.trim().is_empty() {
        return Err(ParseFailure::Empty);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ParseFailure::Csv(e.to_string()))?
        .iter()
        .map(str::to_string)
        .collect();

    // Short records are padded with empty cells; long ones are rejected.
    let width = headers.len();
    let mut rows = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| ParseFailure::Csv(e.to_string()))?;
        if record.len() > width {
            return Err(ParseFailure::Csv(format!(
                "line {}: expected {width} fields, saw {}",
                record.position().map_or(i as u64 + 2, |p| p.line()),
                record.len()
            )));
        }
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    Ok(Table::new(headers, rows))
}

/// Write a header row plus records, with no index column.
///
/// The file is written to `<path>.tmp` first and renamed into place, so a
/// failed run never leaves a partial output behind.
pub fn write_table(path: &Path, headers: &[&str], rows: &[Vec<String>]) -> Result<(), TableError> {
    stage_table(path, headers, rows)?.commit()
}

/// A table fully written to `<path>.tmp`, waiting to be renamed into place.
///
/// Dropping it without calling [`StagedTable::commit`] removes the tmp file,
/// so several outputs can be staged and only published once all succeeded.
#[derive(Debug)]
pub struct StagedTable {
    path: PathBuf,
    tmp_path: PathBuf,
    rows: usize,
    committed: bool,
}

impl StagedTable {
    /// Rename the tmp file over the final path.
    pub fn commit(mut self) -> Result<(), TableError> {
        std::fs::rename(&self.tmp_path, &self.path).map_err(|e| TableError::Write {
            path: self.path.clone(),
            message: format!("failed to rename tmp to output: {e}"),
        })?;
        self.committed = true;
        log::info!("wrote {} ({} rows)", self.path.display(), self.rows);
        Ok(())
    }
}

impl Drop for StagedTable {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.tmp_path);
        }
    }
}

/// Write a header row plus records to `<path>.tmp` without touching `path`.
pub fn stage_table(
    path: &Path,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<StagedTable, TableError> {
    let staged = StagedTable {
        path: path.to_path_buf(),
        tmp_path: tmp_path_for(path),
        rows: rows.len(),
        committed: false,
    };

    let result = (|| -> Result<(), String> {
        let mut writer = csv::WriterBuilder::new()
            .from_path(&staged.tmp_path)
            .map_err(|e| e.to_string())?;
        writer.write_record(headers).map_err(|e| e.to_string())?;
        for row in rows {
            writer.write_record(row).map_err(|e| e.to_string())?;
        }
        writer.flush().map_err(|e| e.to_string())?;
        Ok(())
    })();

    // On error `staged` drops here and takes the tmp file with it.
    result.map_err(|message| TableError::Write { path: path.to_path_buf(), message })?;
    Ok(staged)
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}
