use serde::{Deserialize, Serialize};

/// A parsed CSV document: one header line followed by data rows.
///
/// Rows are not required to have as many cells as there are headers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        CsvTable { headers, rows }
    }
}
