//! The gizmo value type and the outcome types the engine produces/matches.

use gizmo_core::{ComponentId, EquipmentType, GizmoType, PerkId, EMPTY_COMPONENT_ID, NO_EFFECT_PERK_ID};

/// A concrete, ordered arrangement of components in a gizmo's slots.
///
/// `components` is always padded to `gizmo_type.slots()` entries with the
/// empty-component sentinel; slot order is semantically meaningful (it
/// defines insertion order).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Gizmo {
    pub equipment: EquipmentType,
    pub gizmo_type: GizmoType,
    pub components: Vec<ComponentId>,
}

impl Gizmo {
    /// `components` may be shorter than the variant's slot count; the
    /// remainder is filled with the empty-component sentinel.
    pub fn new(equipment: EquipmentType, gizmo_type: GizmoType, mut components: Vec<ComponentId>) -> Self {
        let slots = gizmo_type.slots();
        assert!(components.len() <= slots, "more components than this gizmo variant has slots");
        components.resize(slots, EMPTY_COMPONENT_ID);
        Gizmo { equipment, gizmo_type, components }
    }
}

/// A *(perk, rank)* outcome; rank 0 denotes no effect, and by convention
/// always pairs with [`gizmo_core::NO_EFFECT_PERK_ID`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeneratedPerk {
    pub perk: PerkId,
    pub rank: u8,
}

impl GeneratedPerk {
    pub fn no_effect() -> Self {
        GeneratedPerk { perk: NO_EFFECT_PERK_ID, rank: 0 }
    }

    pub fn is_no_effect(&self) -> bool {
        self.rank == 0
    }
}

/// An ordered, canonicalized pair of generated-perk outcomes: the
/// higher-ranked member (ties broken by higher perk id) is always `first`.
///
/// Two-slot perks force their partner to no-effect. Construct via
/// [`GizmoOutcome::new`], never as a bare struct literal, so canonicalization
/// can never be skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GizmoOutcome {
    pub first: GeneratedPerk,
    pub second: GeneratedPerk,
}

impl GizmoOutcome {
    /// Canonicalize a raw pair of generated perks into a [`GizmoOutcome`]:
    /// rank-0 entries coerce to no-effect, the pair is ordered with the
    /// higher-rank (tie: higher perk id) member first, and only then does a
    /// two-slot `first` evict `second` to no-effect. Order must run before
    /// eviction — the generator orders the raw pair first and evicts based
    /// on the now-canonical `first`, not on whichever raw argument happened
    /// to be two-slot.
    pub fn new(catalog: &gizmo_core::Catalog, mut a: GeneratedPerk, mut b: GeneratedPerk) -> Self {
        if a.rank == 0 {
            a = GeneratedPerk::no_effect();
        }
        if b.rank == 0 {
            b = GeneratedPerk::no_effect();
        }

        if b.rank > a.rank || (b.rank == a.rank && b.perk.0 > a.perk.0) {
            std::mem::swap(&mut a, &mut b);
        }

        if catalog.perk(a.perk).map(|p| p.two_slot).unwrap_or(false) {
            b = GeneratedPerk::no_effect();
        }

        GizmoOutcome { first: a, second: b }
    }

    pub fn no_effect_pair() -> Self {
        GizmoOutcome { first: GeneratedPerk::no_effect(), second: GeneratedPerk::no_effect() }
    }
}

/// A single target slot: a perk at a minimum (or exact) rank.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetPerk {
    pub perk: PerkId,
    pub rank: u8,
}

/// A canonicalized target pair an engine query filters outcomes against.
///
/// A single-perk query is represented with `second` defaulting to
/// no-effect rank 0 — under `exact = false` that slot is a trivial
/// wildcard (`rank >= 0` always holds); under `exact = true` it demands a
/// literal no-effect partner, mirroring the generator's own pairwise
/// equality check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Target {
    outcome: GizmoOutcome,
    pub exact: bool,
}

impl Target {
    pub fn new(catalog: &gizmo_core::Catalog, first: TargetPerk, second: Option<TargetPerk>, exact: bool) -> Self {
        let a = GeneratedPerk { perk: first.perk, rank: first.rank };
        let b = match second {
            Some(t) => GeneratedPerk { perk: t.perk, rank: t.rank },
            None => GeneratedPerk::no_effect(),
        };
        Target { outcome: GizmoOutcome::new(catalog, a, b), exact }
    }

    /// The canonicalized first/second target slots, for callers (the search
    /// engine) that need the underlying perk/rank to bound pruning.
    pub fn first(&self) -> GeneratedPerk {
        self.outcome.first
    }

    pub fn second(&self) -> GeneratedPerk {
        self.outcome.second
    }

    fn rank_matches(candidate_rank: u8, target_rank: u8, exact: bool) -> bool {
        if exact {
            candidate_rank == target_rank
        } else {
            candidate_rank >= target_rank
        }
    }

    pub fn matches(&self, candidate: &GizmoOutcome) -> bool {
        candidate.first.perk == self.outcome.first.perk
            && Self::rank_matches(candidate.first.rank, self.outcome.first.rank, self.exact)
            && candidate.second.perk == self.outcome.second.perk
            && Self::rank_matches(candidate.second.rank, self.outcome.second.rank, self.exact)
    }
}
