use std::path::{Path, PathBuf};

use csv::StringRecord;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Fatal load conditions
// ---------------------------------------------------------------------------

/// Conditions that stop the whole dashboard from rendering.
///
/// The `Display` text of each variant is shown verbatim on the error page.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("File {} not found. Place the cleaned dataset next to the dashboard.", .0.display())]
    NotFound(PathBuf),

    #[error("Data could not be loaded: {} is empty.", .0.display())]
    Empty(PathBuf),

    #[error("Data could not be loaded: required column '{0}' is missing.")]
    MissingColumn(String),

    #[error("Data could not be loaded: every row of {} has an invalid or missing date.", .0.display())]
    NoValidRows(PathBuf),

    #[error("Data could not be loaded: {0}")]
    Csv(#[from] csv::Error),

    #[error("Data could not be loaded: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// RawTable – CSV contents before cleaning
// ---------------------------------------------------------------------------

/// Text cells exactly as read from the CSV.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<StringRecord>,
}

impl RawTable {
    /// Position of a header, if present.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Like [`RawTable::column`], but a missing column is a load error.
    pub fn require(&self, name: &str) -> Result<usize, LoadError> {
        self.column(name)
            .ok_or_else(|| LoadError::MissingColumn(name.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Read the CSV at `path`.
///
/// A missing file and a file without data rows are reported as distinct
/// errors; nothing is retried.
pub fn load_csv(path: &Path) -> Result<RawTable, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let rows = reader.records().collect::<Result<Vec<_>, _>>()?;

    if rows.is_empty() {
        return Err(LoadError::Empty(path.to_path_buf()));
    }

    log::info!(
        "Read {} rows with columns {:?} from {}",
        rows.len(),
        headers,
        path.display()
    );

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.csv");
        let err = load_csv(&path).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn zero_byte_file_is_empty() {
        let file = csv_file("");
        assert!(matches!(load_csv(file.path()), Err(LoadError::Empty(_))));
    }

    #[test]
    fn header_only_file_is_empty() {
        let file = csv_file("dteday,season,cnt,casual,registered\n");
        let err = load_csv(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Empty(_)));
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn reads_headers_and_rows() {
        let file = csv_file(
            "dteday,season,cnt\n2011-01-01,Spring,10\n2011-01-02,Spring,12\n",
        );
        let raw = load_csv(file.path()).unwrap();
        assert_eq!(raw.headers, vec!["dteday", "season", "cnt"]);
        assert_eq!(raw.rows.len(), 2);
        assert_eq!(raw.column("cnt"), Some(2));
        assert!(matches!(
            raw.require("casual"),
            Err(LoadError::MissingColumn(c)) if c == "casual"
        ));
    }
}
