//! In-memory, read-only catalog: perks, components, and the reverse
//! name→id indices used for CLI/HTTP name resolution.

use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::ids::{ComponentId, EquipmentType, PerkId, EMPTY_COMPONENT_ID, NO_EFFECT_PERK_ID};

/// One achievable rank of a perk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PerkRank {
    pub rank: u8,
    pub cost: u32,
    pub threshold: u32,
    pub ancient: bool,
}

/// A perk and its ordered, contiguous list of ranks (`ranks[i]` is rank `i+1`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Perk {
    pub id: PerkId,
    pub name: String,
    pub two_slot: bool,
    pub ranks: Vec<PerkRank>,
}

impl Perk {
    /// The "no effect" sentinel: id 0, no ranks, not two-slot.
    pub fn no_effect() -> Self {
        Perk {
            id: NO_EFFECT_PERK_ID,
            name: "No Effect".to_string(),
            two_slot: false,
            ranks: Vec::new(),
        }
    }

    pub fn max_rank(&self) -> u8 {
        self.ranks.len() as u8
    }

    /// Rank record for rank number `r` (1-indexed); `None` for rank 0 or out of range.
    pub fn rank(&self, r: u8) -> Option<&PerkRank> {
        if r == 0 {
            return None;
        }
        self.ranks.get(r as usize - 1)
    }

    /// Exactly "Enhanced Devoted" and "Enhanced Efficient" carry this flag.
    pub fn is_two_slot_name(name: &str) -> bool {
        matches!(name, "Enhanced Devoted" | "Enhanced Efficient")
    }
}

/// A *(perk, base, roll)* triple a component supplies for one equipment type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Contribution {
    pub perk: PerkId,
    pub base: u32,
    pub roll: u32,
}

impl Contribution {
    /// `base + roll`, the quantity pruning compares against remaining budget.
    pub fn total_potential_contribution(&self) -> u32 {
        self.base + self.roll
    }
}

/// A component: per-equipment contribution lists, ancient flag, unit cost.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Component {
    pub id: ComponentId,
    pub name: String,
    pub ancient: bool,
    pub cost: u32,
    contributions: [Vec<Contribution>; 3],
}

impl Component {
    pub fn empty() -> Self {
        Component {
            id: EMPTY_COMPONENT_ID,
            name: "Empty".to_string(),
            ancient: false,
            cost: 0,
            contributions: [Vec::new(), Vec::new(), Vec::new()],
        }
    }

    /// Construct a non-empty component with no contributions yet; callers
    /// (loaders) populate contributions via [`Component::push_contribution`].
    pub fn new(id: ComponentId, name: String, ancient: bool, cost: u32) -> Self {
        Component { id, name, ancient, cost, contributions: [Vec::new(), Vec::new(), Vec::new()] }
    }

    pub fn is_empty(&self) -> bool {
        self.id == EMPTY_COMPONENT_ID
    }

    pub fn contributions(&self, equipment: EquipmentType) -> &[Contribution] {
        &self.contributions[equipment.index()]
    }

    pub fn push_contribution(&mut self, equipment: EquipmentType, contrib: Contribution) {
        self.contributions[equipment.index()].push(contrib);
    }

    /// `base + roll` summed over every contribution this component makes to
    /// `perk` under `equipment`; 0 if it makes none.
    pub fn total_potential_contribution(&self, equipment: EquipmentType, perk: PerkId) -> u32 {
        self.contributions(equipment)
            .iter()
            .filter(|c| c.perk == perk)
            .map(Contribution::total_potential_contribution)
            .sum()
    }

    /// A 256-bit set of perk ids this component can produce under `equipment`.
    pub fn possible_perk_bitset(&self, equipment: EquipmentType) -> PerkBitset {
        let mut bits = PerkBitset::new();
        for c in self.contributions(equipment) {
            bits.insert(c.perk);
        }
        bits
    }
}

/// A dense 256-bit set over perk ids (perk ids are `u8`, so this always fits).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PerkBitset([u64; 4]);

impl PerkBitset {
    pub fn new() -> Self {
        PerkBitset([0; 4])
    }

    fn word_and_bit(id: PerkId) -> (usize, u64) {
        let n = id.0 as usize;
        (n / 64, 1u64 << (n % 64))
    }

    pub fn insert(&mut self, id: PerkId) {
        let (w, b) = Self::word_and_bit(id);
        self.0[w] |= b;
    }

    pub fn contains(&self, id: PerkId) -> bool {
        let (w, b) = Self::word_and_bit(id);
        self.0[w] & b != 0
    }

    pub fn union(&self, other: &PerkBitset) -> PerkBitset {
        let mut out = [0u64; 4];
        for i in 0..4 {
            out[i] = self.0[i] | other.0[i];
        }
        PerkBitset(out)
    }

    pub fn union_with(&mut self, other: &PerkBitset) {
        for i in 0..4 {
            self.0[i] |= other.0[i];
        }
    }

    /// True iff every bit set in `other` is also set in `self`.
    pub fn is_superset_of(&self, other: &PerkBitset) -> bool {
        (0..4).all(|i| other.0[i] & !self.0[i] == 0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|w| *w == 0)
    }
}

/// The immutable, process-lifetime catalog of perks and components.
///
/// Built once (by `gizmo_io`) and shared by reference into every engine;
/// nothing here mutates after construction.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    perks: BTreeMap<PerkId, Perk>,
    components: BTreeMap<ComponentId, Component>,
    perk_name_index: BTreeMap<String, PerkId>,
    component_name_index: BTreeMap<String, ComponentId>,
}

impl Catalog {
    pub fn new() -> Self {
        let mut cat = Catalog::default();
        cat.register_perk_no_rank_check(Perk::no_effect())
            .expect("no-effect perk registers once");
        cat.register_component(Component::empty())
            .expect("empty component registers once");
        cat
    }

    fn register_perk_no_rank_check(&mut self, perk: Perk) -> Result<(), CoreError> {
        if self.perks.contains_key(&perk.id) {
            return Err(CoreError::DuplicatePerk(perk.id));
        }
        self.perk_name_index.insert(perk.name.to_ascii_lowercase(), perk.id);
        self.perks.insert(perk.id, perk);
        Ok(())
    }

    /// Register a perk that already carries its full, validated rank list.
    ///
    /// Idempotent on id: registering the same id twice is an error (the
    /// no-effect/empty sentinels are pre-registered by `new`, so loaders
    /// must not attempt to register id 0 or 255 again).
    pub fn register_perk(&mut self, perk: Perk) -> Result<(), CoreError> {
        validate_rank_sequence(&perk)?;
        self.register_perk_no_rank_check(perk)
    }

    pub fn register_component(&mut self, component: Component) -> Result<(), CoreError> {
        if self.components.contains_key(&component.id) {
            return Err(CoreError::DuplicateComponent(component.id));
        }
        self.component_name_index
            .insert(component.name.to_ascii_lowercase(), component.id);
        self.components.insert(component.id, component);
        Ok(())
    }

    /// Overlay a cost onto an already-registered component (`compcost.csv`
    /// is loaded in a second pass, after `compdata.csv`).
    pub fn set_component_cost(&mut self, id: ComponentId, cost: u32) -> Result<(), CoreError> {
        let comp = self
            .components
            .get_mut(&id)
            .ok_or(CoreError::CostForUnknownComponent(id))?;
        comp.cost = cost;
        Ok(())
    }

    pub fn perk(&self, id: PerkId) -> Option<&Perk> {
        self.perks.get(&id)
    }

    pub fn perk_result(&self, id: PerkId) -> Result<&Perk, CoreError> {
        self.perk(id).ok_or(CoreError::UnknownPerk(id))
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.get(&id)
    }

    pub fn component_result(&self, id: ComponentId) -> Result<&Component, CoreError> {
        self.component(id).ok_or(CoreError::UnknownComponent(id))
    }

    pub fn perks(&self) -> impl Iterator<Item = &Perk> {
        self.perks.values()
    }

    pub fn components(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Case-insensitive prefix search: every perk whose name starts with
    /// (lowercased) `prefix`.
    pub fn perks_by_prefix(&self, prefix: &str) -> Vec<&Perk> {
        let needle = prefix.to_ascii_lowercase();
        self.perks()
            .filter(|p| p.name.to_ascii_lowercase().starts_with(&needle))
            .collect()
    }

    /// Case-insensitive prefix search over component names.
    pub fn components_by_prefix(&self, prefix: &str) -> Vec<&Component> {
        let needle = prefix.to_ascii_lowercase();
        self.components()
            .filter(|c| c.name.to_ascii_lowercase().starts_with(&needle))
            .collect()
    }

    /// Exact (case-insensitive) name lookup, for front-ends that take a
    /// full perk name rather than a prefix to resolve (the HTTP query
    /// parameters, per §6).
    pub fn perk_by_name(&self, name: &str) -> Option<&Perk> {
        self.perk_name_index.get(&name.to_ascii_lowercase()).and_then(|id| self.perks.get(id))
    }

    /// Exact (case-insensitive) name lookup over components.
    pub fn component_by_name(&self, name: &str) -> Option<&Component> {
        self.component_name_index.get(&name.to_ascii_lowercase()).and_then(|id| self.components.get(id))
    }
}

fn validate_rank_sequence(perk: &Perk) -> Result<(), CoreError> {
    let mut prev_threshold: Option<u32> = None;
    for (i, r) in perk.ranks.iter().enumerate() {
        let expected = (i + 1) as u8;
        if r.rank != expected {
            return Err(CoreError::NonContiguousRank {
                perk: perk.id,
                expected,
                got: r.rank,
            });
        }
        if let Some(prev) = prev_threshold {
            if r.threshold <= prev {
                return Err(CoreError::NonIncreasingThreshold {
                    perk: perk.id,
                    rank: r.rank,
                    threshold: r.threshold,
                });
            }
        }
        prev_threshold = Some(r.threshold);
    }
    Ok(())
}
