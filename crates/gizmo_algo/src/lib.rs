//! gizmo_algo — the perk-probability engine. Given a concrete gizmo, computes
//! the probability distribution over generated-perk outcome pairs the
//! generator would produce for it at a given player level.
//!
//! Pure and catalog-borrowing throughout; the only failures are invalid
//! catalog references, which surface as [`gizmo_core::CoreError`] rather
//! than panicking (see the catalog lookups in [`engine`]).

#![forbid(unsafe_code)]

pub mod engine;
pub mod gizmo;

pub use engine::{gizmo_outcome_probabilities, target_probability};
pub use gizmo::{GeneratedPerk, Gizmo, GizmoOutcome, Target, TargetPerk};
