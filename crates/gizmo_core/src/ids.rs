//! Small integer ids and the two enums that shape the whole domain.

use crate::errors::CoreError;
use std::fmt;
use std::str::FromStr;

/// The "no effect" sentinel perk id. Always registered first.
pub const NO_EFFECT_PERK_ID: PerkId = PerkId(0);

/// The sentinel empty-component id. Always registered, cost 0, no contributions.
pub const EMPTY_COMPONENT_ID: ComponentId = ComponentId(255);

/// Perk identifier (`id <= 255`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PerkId(pub u8);

impl fmt::Display for PerkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Component identifier (`id <= 255`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(pub u8);

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The item class a gizmo is attached to; selects which contribution table
/// of a component applies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EquipmentType {
    Weapon,
    Tool,
    Armour,
}

impl EquipmentType {
    /// Stable small index, used to key per-equipment contribution arrays.
    pub fn index(self) -> usize {
        match self {
            EquipmentType::Weapon => 0,
            EquipmentType::Tool => 1,
            EquipmentType::Armour => 2,
        }
    }

    pub const ALL: [EquipmentType; 3] = [EquipmentType::Weapon, EquipmentType::Tool, EquipmentType::Armour];
}

impl FromStr for EquipmentType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "weapon" | "w" => Ok(EquipmentType::Weapon),
            "tool" | "t" => Ok(EquipmentType::Tool),
            "armour" | "armor" | "a" => Ok(EquipmentType::Armour),
            other => Err(CoreError::InvalidEquipment(other.to_string())),
        }
    }
}

impl fmt::Display for EquipmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EquipmentType::Weapon => "Weapon",
            EquipmentType::Tool => "Tool",
            EquipmentType::Armour => "Armour",
        };
        write!(f, "{s}")
    }
}

/// Standard (5 slots) or Ancient (9 slots) gizmo variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GizmoType {
    Standard,
    Ancient,
}

impl GizmoType {
    /// Number of component slots for this variant.
    pub fn slots(self) -> usize {
        match self {
            GizmoType::Standard => 5,
            GizmoType::Ancient => 9,
        }
    }

    /// Number of invention-budget dice rolled for this variant.
    pub fn budget_dice(self) -> u8 {
        match self {
            GizmoType::Standard => 5,
            GizmoType::Ancient => 6,
        }
    }

    pub fn is_ancient(self) -> bool {
        matches!(self, GizmoType::Ancient)
    }

    /// Slot labels in declared order, for display purposes.
    pub fn slot_labels(self) -> &'static [&'static str] {
        match self {
            GizmoType::Standard => &["Middle", "Top", "Left", "Right", "Bottom"],
            GizmoType::Ancient => &[
                "Middle",
                "Top",
                "Left",
                "Right",
                "Bottom",
                "Top Left",
                "Top Right",
                "Bottom Left",
                "Bottom Right",
            ],
        }
    }
}

impl FromStr for GizmoType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" | "std" => Ok(GizmoType::Standard),
            "ancient" | "anc" => Ok(GizmoType::Ancient),
            other => Err(CoreError::InvalidGizmoType(other.to_string())),
        }
    }
}

impl fmt::Display for GizmoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GizmoType::Standard => "Standard",
            GizmoType::Ancient => "Ancient",
        };
        write!(f, "{s}")
    }
}
