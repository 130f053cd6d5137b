//! gizmo_io — CSV ingestion of the perk, component, and component-cost
//! catalogs. Plain data loading; no algorithmic content lives here.

#![forbid(unsafe_code)]

pub mod error;
pub mod loader;

pub use error::{IoError, IoResult};
pub use loader::load_catalog_from_dir;
