//! Symmetry-reduced ("normal form") enumeration of candidate gizmo
//! configurations with reachability pruning.
//!
//! This is a depth-first equivalent of the generator's own odometer-driven
//! walk: it applies the same normal-form and reachability pruning rules and
//! so visits the same surviving tuples, but without the trailing-index
//! fast-forward the original uses to skip whole pruned subtrees in one
//! counter increment — per §4.E/§9 that mechanism is a runtime optimization
//! over an otherwise-equivalent search, not part of what must be bit-exact.

use gizmo_core::{Catalog, ComponentId, EquipmentType, GizmoType, PerkBitset, PerkId, EMPTY_COMPONENT_ID};

/// The contribution threshold a target must reach, used only to bound the
/// reachability prune — separate from the exact/`>=`-rank matching the
/// perk-probability engine performs on the resulting distribution.
#[derive(Clone, Copy, Debug)]
pub struct TargetBound {
    pub perk: PerkId,
    pub threshold: u32,
}

struct EnumCtx<'a> {
    catalog: &'a Catalog,
    equipment: EquipmentType,
    slots: usize,
    targets: [TargetBound; 2],
    max_contribution: [u32; 2],
}

/// Enumerate every normal-form, reachability-surviving component tuple of
/// length `gizmo_type.slots()` drawn from `universe`. The empty-component
/// sentinel is never placed in slot 0.
pub fn enumerate_candidates(
    catalog: &Catalog,
    universe: &[ComponentId],
    equipment: EquipmentType,
    gizmo_type: GizmoType,
    targets: [TargetBound; 2],
) -> Vec<Vec<ComponentId>> {
    let max_contribution = [
        super::candidates::max_potential_contribution(catalog, universe, equipment, targets[0].perk),
        super::candidates::max_potential_contribution(catalog, universe, equipment, targets[1].perk),
    ];
    let ctx = EnumCtx { catalog, equipment, slots: gizmo_type.slots(), targets, max_contribution };

    let mut out = Vec::new();
    let mut chosen = Vec::with_capacity(ctx.slots);
    recurse(&ctx, universe, 0, &mut chosen, PerkBitset::new(), [0, 0], None, &mut out);
    out
}

#[allow(clippy::too_many_arguments)]
fn recurse(
    ctx: &EnumCtx,
    universe: &[ComponentId],
    depth: usize,
    chosen: &mut Vec<ComponentId>,
    accumulated_bitset: PerkBitset,
    accumulated_contribution: [u32; 2],
    indifferent_since: Option<usize>,
    out: &mut Vec<Vec<ComponentId>>,
) {
    if depth == ctx.slots {
        out.push(chosen.clone());
        return;
    }

    for &id in universe {
        if depth == 0 && id == EMPTY_COMPONENT_ID {
            continue;
        }

        let component = match ctx.catalog.component(id) {
            Some(c) => c,
            None => continue,
        };
        let candidate_bitset = component.possible_perk_bitset(ctx.equipment);

        if indifferent_since.is_some() {
            let introduces_new_bits = !accumulated_bitset.is_superset_of(&candidate_bitset);
            let previous_id = chosen[depth - 1];
            if introduces_new_bits || id.0 < previous_id.0 {
                continue;
            }
        }

        let mut new_contribution = accumulated_contribution;
        let mut bounded_out = false;
        let remaining_after = (ctx.slots - (depth + 1)) as u32;
        for t in 0..2 {
            let delta = component.total_potential_contribution(ctx.equipment, ctx.targets[t].perk);
            new_contribution[t] += delta;
            if new_contribution[t] + remaining_after * ctx.max_contribution[t] < ctx.targets[t].threshold {
                bounded_out = true;
            }
        }
        if bounded_out {
            continue;
        }

        let introduces_new_bits = !accumulated_bitset.is_superset_of(&candidate_bitset);
        let new_indifferent_since = indifferent_since.or(if introduces_new_bits { None } else { Some(depth) });
        let new_bitset = accumulated_bitset.union(&candidate_bitset);

        chosen.push(id);
        recurse(ctx, universe, depth + 1, chosen, new_bitset, new_contribution, new_indifferent_since, out);
        chosen.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gizmo_core::{Component, Contribution, EquipmentType, GizmoType, Perk, PerkId, PerkRank};

    fn catalog_with_two_equivalent_components() -> Catalog {
        let mut cat = Catalog::new();
        cat.register_perk(Perk {
            id: PerkId(1),
            name: "Precise".into(),
            two_slot: false,
            ranks: vec![PerkRank { rank: 1, cost: 1, threshold: 1, ancient: false }],
        })
        .unwrap();
        for (id, cost) in [(1u8, 10u32), (2u8, 12u32)] {
            let mut comp = Component::new(gizmo_core::ComponentId(id), format!("Cog{id}"), false, cost);
            comp.push_contribution(EquipmentType::Weapon, Contribution { perk: PerkId(1), base: 5, roll: 1 });
            cat.register_component(comp).unwrap();
        }
        cat
    }

    #[test]
    fn empty_component_never_occupies_the_first_slot() {
        let cat = catalog_with_two_equivalent_components();
        let universe = crate::candidates::build_candidate_universe(
            &cat,
            EquipmentType::Weapon,
            GizmoType::Standard,
            [PerkId(1), gizmo_core::NO_EFFECT_PERK_ID],
            &[],
        );
        let targets = [TargetBound { perk: PerkId(1), threshold: 1 }, TargetBound { perk: gizmo_core::NO_EFFECT_PERK_ID, threshold: 0 }];
        let candidates = enumerate_candidates(&cat, &universe, EquipmentType::Weapon, GizmoType::Standard, targets);
        assert!(candidates.iter().all(|c| c[0] != gizmo_core::EMPTY_COMPONENT_ID));
    }

    #[test]
    fn normal_form_enumeration_has_no_duplicate_tuples() {
        let cat = catalog_with_two_equivalent_components();
        let universe = crate::candidates::build_candidate_universe(
            &cat,
            EquipmentType::Weapon,
            GizmoType::Standard,
            [PerkId(1), gizmo_core::NO_EFFECT_PERK_ID],
            &[],
        );
        let targets = [TargetBound { perk: PerkId(1), threshold: 1 }, TargetBound { perk: gizmo_core::NO_EFFECT_PERK_ID, threshold: 0 }];
        let candidates = enumerate_candidates(&cat, &universe, EquipmentType::Weapon, GizmoType::Standard, targets);

        let mut seen = std::collections::HashSet::new();
        for c in &candidates {
            assert!(seen.insert(c.clone()), "duplicate candidate tuple {c:?}");
        }
    }

    fn catalog_with_n_equivalent_components(n: u8) -> Catalog {
        let mut cat = Catalog::new();
        cat.register_perk(Perk {
            id: PerkId(1),
            name: "Precise".into(),
            two_slot: false,
            ranks: vec![PerkRank { rank: 1, cost: 1, threshold: 1, ancient: false }],
        })
        .unwrap();
        for id in 1..=n {
            let mut comp = Component::new(gizmo_core::ComponentId(id), format!("Cog{id}"), false, 10 + id as u32);
            comp.push_contribution(EquipmentType::Weapon, Contribution { perk: PerkId(1), base: 5, roll: 1 });
            cat.register_component(comp).unwrap();
        }
        cat
    }

    proptest::proptest! {
        #[test]
        fn normal_form_enumeration_never_duplicates_a_tuple_for_any_universe_size(n in 1u8..6) {
            let cat = catalog_with_n_equivalent_components(n);
            let universe = crate::candidates::build_candidate_universe(
                &cat,
                EquipmentType::Weapon,
                GizmoType::Standard,
                [PerkId(1), gizmo_core::NO_EFFECT_PERK_ID],
                &[],
            );
            let targets = [TargetBound { perk: PerkId(1), threshold: 1 }, TargetBound { perk: gizmo_core::NO_EFFECT_PERK_ID, threshold: 0 }];
            let candidates = enumerate_candidates(&cat, &universe, EquipmentType::Weapon, GizmoType::Standard, targets);

            let mut seen = std::collections::HashSet::new();
            for c in &candidates {
                proptest::prop_assert!(seen.insert(c.clone()), "duplicate candidate tuple {:?}", c);
            }
        }
    }
}
