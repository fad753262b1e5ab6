//! Text formats the job store reads and writes: CSV documents and the JSON
//! backup document.

pub mod backup;
pub mod csv;
