//! Error enum shared by the catalog and probability kernel.

use crate::ids::{ComponentId, PerkId};

/// Failures a caller can actually trigger (bad id, malformed catalog row).
///
/// Violations of internal invariants (a rank index out of bounds after the
/// catalog has already been validated) are programming errors and are
/// signalled with `debug_assert!`/`unreachable!`, not this type.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("unknown perk id {0}")]
    UnknownPerk(PerkId),
    #[error("unknown component id {0}")]
    UnknownComponent(ComponentId),
    #[error("perk {0} already registered")]
    DuplicatePerk(PerkId),
    #[error("component {0} already registered")]
    DuplicateComponent(ComponentId),
    #[error("perk {perk} rank numbers must be contiguous from 1; got {got} after {expected}")]
    NonContiguousRank { perk: PerkId, expected: u8, got: u8 },
    #[error("perk {perk} rank {rank} threshold {threshold} is not strictly greater than the previous rank's threshold")]
    NonIncreasingThreshold { perk: PerkId, rank: u8, threshold: u32 },
    #[error("invalid equipment type: {0}")]
    InvalidEquipment(String),
    #[error("invalid gizmo type: {0}")]
    InvalidGizmoType(String),
    #[error("cost given for unregistered component {0}")]
    CostForUnknownComponent(ComponentId),
}
