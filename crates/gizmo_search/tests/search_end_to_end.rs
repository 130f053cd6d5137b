//! End-to-end coverage over a small, hand-built catalog: several components
//! contributing to two distinct perks, searched against a single-perk and a
//! two-perk target. Exercises the full universe→enumerate→shard→sort path
//! a front-end actually drives, rather than any one stage in isolation.

use gizmo_algo::{Target, TargetPerk};
use gizmo_core::prob::BudgetCdfCache;
use gizmo_core::{Catalog, Component, Contribution, EquipmentType, GizmoType, Perk, PerkId, PerkRank};
use gizmo_search::{run_search, SearchRequest};

fn build_catalog() -> Catalog {
    let mut cat = Catalog::new();
    cat.register_perk(Perk {
        id: PerkId(1),
        name: "Precise".into(),
        two_slot: false,
        ranks: vec![
            PerkRank { rank: 1, cost: 1, threshold: 3, ancient: false },
            PerkRank { rank: 2, cost: 2, threshold: 6, ancient: false },
        ],
    })
    .unwrap();
    cat.register_perk(Perk {
        id: PerkId(2),
        name: "Equilibrium".into(),
        two_slot: false,
        ranks: vec![PerkRank { rank: 1, cost: 1, threshold: 3, ancient: false }],
    })
    .unwrap();

    let mut precise_cog = Component::new(gizmo_core::ComponentId(10), "Precise Cog".into(), false, 100);
    precise_cog.push_contribution(EquipmentType::Weapon, Contribution { perk: PerkId(1), base: 8, roll: 2 });
    cat.register_component(precise_cog).unwrap();

    let mut precise_spring = Component::new(gizmo_core::ComponentId(11), "Precise Spring".into(), false, 50);
    precise_spring.push_contribution(EquipmentType::Weapon, Contribution { perk: PerkId(1), base: 6, roll: 2 });
    cat.register_component(precise_spring).unwrap();

    let mut equilibrium_gear = Component::new(gizmo_core::ComponentId(12), "Equilibrium Gear".into(), false, 30);
    equilibrium_gear.push_contribution(EquipmentType::Weapon, Contribution { perk: PerkId(2), base: 4, roll: 2 });
    cat.register_component(equilibrium_gear).unwrap();

    let mut filler = Component::new(gizmo_core::ComponentId(13), "Filler Plate".into(), false, 5);
    filler.push_contribution(EquipmentType::Weapon, Contribution { perk: PerkId(1), base: 1, roll: 1 });
    cat.register_component(filler).unwrap();

    cat
}

#[test]
fn single_target_search_returns_sorted_nonzero_probability_candidates() {
    let cat = build_catalog();
    let cache = BudgetCdfCache::new();
    let target = Target::new(&cat, TargetPerk { perk: PerkId(1), rank: 1 }, None, false);
    let request = SearchRequest {
        equipment: EquipmentType::Weapon,
        gizmo_type: GizmoType::Standard,
        level: 120,
        target,
        excluded: Vec::new(),
        worker_count: 4,
    };

    let results = run_search(&cat, &cache, &request);
    assert!(!results.is_empty(), "expected at least one candidate reaching Precise rank 1");

    for pair in results.windows(2) {
        assert!(pair[0].probability >= pair[1].probability - 1e-9, "results must be sorted descending by probability");
    }
    for r in &results {
        assert!((0.0..=1.0).contains(&r.probability));
        assert!(r.cost > 0);
    }
}

#[test]
fn excluded_component_never_appears_in_results() {
    let cat = build_catalog();
    let cache = BudgetCdfCache::new();
    let target = Target::new(&cat, TargetPerk { perk: PerkId(1), rank: 1 }, None, false);
    let request = SearchRequest {
        equipment: EquipmentType::Weapon,
        gizmo_type: GizmoType::Standard,
        level: 120,
        target,
        excluded: vec![gizmo_core::ComponentId(10)],
        worker_count: 2,
    };

    let results = run_search(&cat, &cache, &request);
    for r in &results {
        assert!(!r.components.contains(&gizmo_core::ComponentId(10)));
    }
}

#[test]
fn two_perk_target_only_matches_candidates_reaching_both() {
    let cat = build_catalog();
    let cache = BudgetCdfCache::new();
    let target = Target::new(
        &cat,
        TargetPerk { perk: PerkId(1), rank: 1 },
        Some(TargetPerk { perk: PerkId(2), rank: 1 }),
        false,
    );
    let request = SearchRequest {
        equipment: EquipmentType::Weapon,
        gizmo_type: GizmoType::Standard,
        level: 120,
        target,
        excluded: Vec::new(),
        worker_count: 1,
    };

    let results = run_search(&cat, &cache, &request);
    for r in &results {
        assert!(r.components.contains(&gizmo_core::ComponentId(12)), "needs the Equilibrium contributor");
    }
}
