//! The top-level search entry point: wires the candidate universe,
//! normal-form enumeration, sharded evaluation, and final sort together.

use std::sync::Arc;
use std::time::Duration;

use gizmo_algo::Target;
use gizmo_core::{Catalog, ComponentId, EquipmentType, GizmoType, NO_EFFECT_PERK_ID};

use crate::candidates::build_candidate_universe;
use crate::enumerate::{enumerate_candidates, TargetBound};
use crate::result::{sort_by_probability_desc, SearchResult};
use crate::worker::{evaluate_sharded, make_counters, PaddedCounter};

/// Everything a single search needs beyond the process-lifetime catalog.
pub struct SearchRequest {
    pub equipment: EquipmentType,
    pub gizmo_type: GizmoType,
    pub level: u8,
    pub target: Target,
    pub excluded: Vec<ComponentId>,
    pub worker_count: usize,
}

/// A running search's advisory progress: total candidates and the live sum
/// of per-worker counters. Sampling this must never affect results.
pub struct SearchProgress {
    pub total: usize,
    counters: Vec<Arc<PaddedCounter>>,
}

impl SearchProgress {
    pub fn searched(&self) -> u64 {
        self.counters.iter().map(|c| c.load()).sum()
    }
}

fn target_bound(catalog: &Catalog, target: &Target) -> [TargetBound; 2] {
    let threshold_of = |perk: gizmo_algo::GeneratedPerk| -> TargetBound {
        if perk.perk == NO_EFFECT_PERK_ID || perk.rank == 0 {
            return TargetBound { perk: perk.perk, threshold: 0 };
        }
        let threshold = catalog.perk(perk.perk).and_then(|p| p.rank(perk.rank)).map(|r| r.threshold).unwrap_or(0);
        TargetBound { perk: perk.perk, threshold }
    };
    [threshold_of(target.first()), threshold_of(target.second())]
}

fn build_universe_and_candidates(
    catalog: &Catalog,
    request: &SearchRequest,
) -> (Vec<Vec<ComponentId>>, [TargetBound; 2]) {
    let targets = target_bound(catalog, &request.target);
    let universe = build_candidate_universe(
        catalog,
        request.equipment,
        request.gizmo_type,
        [targets[0].perk, targets[1].perk],
        &request.excluded,
    );
    let candidates = enumerate_candidates(catalog, &universe, request.equipment, request.gizmo_type, targets);
    (candidates, targets)
}

/// Run a full search: build the universe, enumerate normal-form candidates,
/// evaluate them sharded across `request.worker_count` threads, and return
/// the results sorted descending by target probability (ascending
/// component-id tuple as tie-break).
pub fn run_search(
    catalog: &Catalog,
    budget_cache: &gizmo_core::prob::BudgetCdfCache,
    request: &SearchRequest,
) -> Vec<SearchResult> {
    let (candidates, _targets) = build_universe_and_candidates(catalog, request);
    let counters = make_counters(request.worker_count);
    let mut results = evaluate_sharded(
        catalog,
        budget_cache,
        &candidates,
        request.equipment,
        request.gizmo_type,
        request.level,
        &request.target,
        &counters,
    );
    sort_by_probability_desc(&mut results);
    results
}

/// As [`run_search`], but samples progress roughly every `tick_interval`
/// while the search runs, via `on_tick`. Sampling is purely advisory and
/// never influences the returned results.
pub fn run_search_with_progress(
    catalog: &Catalog,
    budget_cache: &gizmo_core::prob::BudgetCdfCache,
    request: &SearchRequest,
    mut on_tick: impl FnMut(&SearchProgress),
    tick_interval: Duration,
) -> Vec<SearchResult> {
    let (candidates, _targets) = build_universe_and_candidates(catalog, request);
    let total = candidates.len();
    let counters = make_counters(request.worker_count);

    let mut results = Vec::new();
    std::thread::scope(|scope| {
        let handle = scope.spawn(|| {
            evaluate_sharded(
                catalog,
                budget_cache,
                &candidates,
                request.equipment,
                request.gizmo_type,
                request.level,
                &request.target,
                &counters,
            )
        });

        while !handle.is_finished() {
            std::thread::sleep(tick_interval);
            let progress = SearchProgress { total, counters: counters.clone() };
            on_tick(&progress);
        }
        results = handle.join().expect("search worker panicked");
    });

    sort_by_probability_desc(&mut results);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use gizmo_algo::TargetPerk;
    use gizmo_core::{Component, Contribution, Perk, PerkId, PerkRank};

    fn tiny_catalog() -> Catalog {
        let mut cat = Catalog::new();
        cat.register_perk(Perk {
            id: PerkId(1),
            name: "Precise".into(),
            two_slot: false,
            ranks: vec![PerkRank { rank: 1, cost: 1, threshold: 1, ancient: false }],
        })
        .unwrap();
        let mut comp = Component::new(gizmo_core::ComponentId(1), "Cog".into(), false, 10);
        comp.push_contribution(EquipmentType::Weapon, Contribution { perk: PerkId(1), base: 5, roll: 1 });
        cat.register_component(comp).unwrap();
        cat
    }

    #[test]
    fn search_with_worker_count_one_and_four_produce_the_same_sorted_results() {
        let cat = tiny_catalog();
        let cache = gizmo_core::prob::BudgetCdfCache::new();
        let target = Target::new(&cat, TargetPerk { perk: PerkId(1), rank: 1 }, None, false);

        let run = |workers: usize| {
            let request = SearchRequest {
                equipment: EquipmentType::Weapon,
                gizmo_type: GizmoType::Standard,
                level: 1,
                target: Target::new(&cat, TargetPerk { perk: PerkId(1), rank: 1 }, None, false),
                excluded: vec![],
                worker_count: workers,
            };
            let _ = &target;
            run_search(&cat, &cache, &request)
        };

        let one = run(1);
        let four = run(4);
        assert_eq!(one, four);
    }
}
