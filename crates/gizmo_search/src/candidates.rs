//! The relevance-filtered candidate universe and the per-target maximum
//! potential-contribution bound the reachability pruning leans on.

use gizmo_core::{Catalog, ComponentId, EquipmentType, GizmoType, PerkId, EMPTY_COMPONENT_ID};

/// Components eligible for this search: non-ancient, or the variant itself
/// is ancient; at least one contribution to `equipment` for either target
/// perk; and not explicitly excluded. The empty-component sentinel is
/// always included (it remains choosable in non-first slots).
pub fn build_candidate_universe(
    catalog: &Catalog,
    equipment: EquipmentType,
    gizmo_type: GizmoType,
    targets: [PerkId; 2],
    excluded: &[ComponentId],
) -> Vec<ComponentId> {
    let mut universe: Vec<ComponentId> = catalog
        .components()
        .filter(|c| c.id != EMPTY_COMPONENT_ID)
        .filter(|c| gizmo_type.is_ancient() || !c.ancient)
        .filter(|c| !excluded.contains(&c.id))
        .filter(|c| {
            let contributions = c.contributions(equipment);
            targets.iter().any(|&t| contributions.iter().any(|contrib| contrib.perk == t))
        })
        .map(|c| c.id)
        .collect();
    universe.push(EMPTY_COMPONENT_ID);
    universe.sort();
    universe
}

/// `M_t`: the largest `total_potential_contribution(equipment, t)` any
/// component in `universe` offers, used by reachability pruning as an
/// upper bound on what a single remaining slot could still contribute.
pub fn max_potential_contribution(catalog: &Catalog, universe: &[ComponentId], equipment: EquipmentType, target: PerkId) -> u32 {
    universe
        .iter()
        .filter_map(|&id| catalog.component(id))
        .map(|c| c.total_potential_contribution(equipment, target))
        .max()
        .unwrap_or(0)
}
