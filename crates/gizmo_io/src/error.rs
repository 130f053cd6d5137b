//! Typed I/O errors; nothing here is a programming-invariant panic.

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error("cannot read {path}: {source}")]
    Read { path: PathBuf, #[source] source: std::io::Error },

    #[error("malformed row in {path}: {source}")]
    Csv { path: PathBuf, #[source] source: csv::Error },

    #[error("{path}: unknown equipment type {value:?} on row {row}")]
    UnknownEquipment { path: PathBuf, row: usize, value: String },

    #[error("{path}: perk id {id} row {row} repeats name/ancient-flag inconsistently with an earlier row for the same id")]
    InconsistentPerkRow { path: PathBuf, id: u8, row: usize },

    #[error("{path}: component id {id} row {row} repeats name/ancient-flag inconsistently with an earlier row for the same id")]
    InconsistentComponentRow { path: PathBuf, id: u8, row: usize },

    #[error(transparent)]
    Catalog(#[from] gizmo_core::CoreError),
}

pub type IoResult<T> = Result<T, IoError>;
