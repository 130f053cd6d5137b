//! gizmo_core — catalog types, the discrete-probability kernel, and the
//! deterministic "RuneScape quicksort" the generator's engine is built on.
//!
//! This crate is pure and I/O-free: loading lives in `gizmo_io`, search in
//! `gizmo_search`, outcome math in `gizmo_algo`. Everything here is either a
//! plain value type or a side-effect-free function over plain value types.

#![forbid(unsafe_code)]

pub mod errors;
pub mod ids;
pub mod catalog;
pub mod prob;
pub mod sort;

pub use errors::CoreError;
pub use ids::{ComponentId, EquipmentType, GizmoType, PerkId, EMPTY_COMPONENT_ID, NO_EFFECT_PERK_ID};
pub use catalog::{Catalog, Component, Contribution, Perk, PerkBitset, PerkRank};
