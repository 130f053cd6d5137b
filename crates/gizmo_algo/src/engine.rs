//! The eight-step perk-probability pipeline: insertion order, per-perk
//! contribution CDFs, rank probabilities, Cartesian enumeration, the
//! deterministic combination sort, budget-conditioned pairing, outcome
//! canonicalization, and the final target filter/normalization pass.

use std::collections::BTreeMap;

use gizmo_core::{Catalog, CoreError, GizmoType, PerkBitset, PerkId};

use crate::gizmo::{GeneratedPerk, Gizmo, GizmoOutcome, Target};

/// Step 1: the deterministic insertion order — perks in first-seen order,
/// walking occupied slots in slot order and each slot's contributions for
/// `gizmo.equipment` in file order.
pub fn insertion_order(catalog: &Catalog, gizmo: &Gizmo) -> Result<Vec<PerkId>, CoreError> {
    let mut seen = PerkBitset::new();
    let mut order = Vec::new();
    for &component_id in &gizmo.components {
        let component = catalog.component_result(component_id)?;
        for contribution in component.contributions(gizmo.equipment) {
            if !seen.contains(contribution.perk) {
                seen.insert(contribution.perk);
                order.push(contribution.perk);
            }
        }
    }
    Ok(order)
}

/// Truncating `x * 0.8`, done in integer arithmetic to avoid float rounding
/// drift on the small base/roll magnitudes this domain uses.
fn scale_for_non_ancient_component(x: u32) -> u32 {
    (x * 4) / 5
}

/// Step 2: sum `base` and collect `roll` upper-bounds across every slot that
/// contributes `perk`, scaling non-ancient contributions by 0.8 when the
/// gizmo itself is ancient. Contributions with `roll == 0` add only to
/// `base` (a zero-width uniform contributes no randomness).
fn perk_base_and_rolls(catalog: &Catalog, gizmo: &Gizmo, perk: PerkId) -> Result<(u32, Vec<u32>), CoreError> {
    let mut base = 0u32;
    let mut rolls = Vec::new();
    for &component_id in &gizmo.components {
        let component = catalog.component_result(component_id)?;
        for contribution in component.contributions(gizmo.equipment) {
            if contribution.perk != perk {
                continue;
            }
            let (b, r) = if gizmo.gizmo_type.is_ancient() && !component.ancient {
                (scale_for_non_ancient_component(contribution.base), scale_for_non_ancient_component(contribution.roll))
            } else {
                (contribution.base, contribution.roll)
            };
            base += b;
            if r > 0 {
                rolls.push(r);
            }
        }
    }
    Ok((base, rolls))
}

/// Step 3: the per-perk rank-probability vector, including the residual
/// rank-0 entry when positive. Ranks are returned high-to-low, matching the
/// generator's own iteration order; callers that only need the set need not
/// care about order.
fn rank_probabilities(perk: &gizmo_core::Perk, cdf: &[f64], gizmo_type: GizmoType) -> Vec<(u8, f64)> {
    let max_index = cdf.len() - 1;

    let eligible: Vec<&gizmo_core::PerkRank> =
        perk.ranks.iter().filter(|r| !(r.ancient && !gizmo_type.is_ancient())).collect();

    let reachable: Vec<&gizmo_core::PerkRank> =
        eligible.iter().copied().filter(|r| (r.threshold as usize) <= max_index).collect();

    let mut out = Vec::with_capacity(reachable.len() + 1);
    for (i, rank) in reachable.iter().enumerate() {
        let lower = if rank.threshold == 0 { 0.0 } else { cdf[rank.threshold as usize - 1] };
        let upper = match reachable.get(i + 1) {
            Some(next) => cdf[next.threshold as usize - 1],
            None => 1.0,
        };
        out.push((rank.rank, upper - lower));
    }
    out.reverse();

    let residual = match eligible.first() {
        None => 1.0,
        Some(first) if first.threshold as usize >= cdf.len() => 1.0,
        Some(first) if first.threshold == 0 => 0.0,
        Some(first) => cdf[first.threshold as usize - 1],
    };
    if residual > 0.0 {
        out.push((0, residual));
    }
    out
}

/// Steps 2+3 combined: the full rank-probability vector for one perk in
/// `gizmo`, in insertion order.
fn perk_rank_probabilities_for_gizmo(catalog: &Catalog, gizmo: &Gizmo, perk_id: PerkId) -> Result<Vec<(u8, f64)>, CoreError> {
    let perk = catalog.perk_result(perk_id)?;
    let (base, rolls) = perk_base_and_rolls(catalog, gizmo, perk_id)?;
    let cdf = gizmo_core::prob::contribution_cdf(base, &rolls);
    Ok(rank_probabilities(perk, &cdf, gizmo.gizmo_type))
}

/// Step 4: the Cartesian product of per-perk rank-probability vectors, each
/// combination prefixed with a no-effect sentinel at index 0.
fn enumerate_combinations(
    insertion_order: &[PerkId],
    rank_probs: &[Vec<(u8, f64)>],
) -> Vec<(Vec<GeneratedPerk>, f64)> {
    let mut combos: Vec<(Vec<GeneratedPerk>, f64)> = vec![(vec![GeneratedPerk::no_effect()], 1.0)];
    for (perk_id, probs) in insertion_order.iter().zip(rank_probs) {
        let mut next = Vec::with_capacity(combos.len() * probs.len());
        for (prefix, prob) in &combos {
            for &(rank, p) in probs {
                let mut combo = prefix.clone();
                combo.push(GeneratedPerk { perk: *perk_id, rank });
                next.push((combo, prob * p));
            }
        }
        combos = next;
    }
    combos
}

fn rank_cost(catalog: &Catalog, gp: &GeneratedPerk) -> i64 {
    if gp.rank == 0 {
        return 0;
    }
    catalog.perk(gp.perk).and_then(|p| p.rank(gp.rank)).map(|r| r.cost as i64).unwrap_or(0)
}

/// Step 6: accumulate budget-conditioned outcome-pair probabilities for one
/// (already sorted) combination into `acc`, adding every contribution to
/// `probability_sum` regardless of target (the target filter is applied
/// afterward, over the whole map).
fn accumulate_combination(
    catalog: &Catalog,
    budget_cdf: &[f64],
    combo: &[GeneratedPerk],
    combo_prob: f64,
    acc: &mut BTreeMap<GizmoOutcome, f64>,
    probability_sum: &mut f64,
) {
    let mut prev_cost = (budget_cdf.len() - 1) as i64;
    let n = combo.len();

    'outer: for i in (0..n).rev() {
        if combo[i].rank == 0 {
            continue;
        }
        let cost_i = rank_cost(catalog, &combo[i]);
        for j in (0..i).rev() {
            let cost_j = rank_cost(catalog, &combo[j]);
            let combined_cost = cost_i + cost_j;
            if combined_cost >= prev_cost {
                continue;
            }
            let prob = budget_cdf[prev_cost as usize] - budget_cdf[combined_cost as usize];
            prev_cost = combined_cost;
            if prob <= 0.0 {
                break 'outer;
            }
            let outcome = GizmoOutcome::new(catalog, combo[i], combo[j]);
            *acc.entry(outcome).or_insert(0.0) += prob * combo_prob;
            *probability_sum += prob * combo_prob;
        }
    }
}

/// The full eight-step pipeline: the outcome→probability distribution for
/// `gizmo` at player level `level`, optionally restricted to `target` and
/// optionally folding uncaptured mass into the no-effect/no-effect entry.
pub fn gizmo_outcome_probabilities(
    catalog: &Catalog,
    budget_cache: &gizmo_core::prob::BudgetCdfCache,
    gizmo: &Gizmo,
    level: u8,
    include_no_effect: bool,
    target: Option<&Target>,
) -> Result<BTreeMap<GizmoOutcome, f64>, CoreError> {
    let order = insertion_order(catalog, gizmo)?;
    let mut rank_probs = Vec::with_capacity(order.len());
    for &perk_id in &order {
        rank_probs.push(perk_rank_probabilities_for_gizmo(catalog, gizmo, perk_id)?);
    }

    let combos = enumerate_combinations(&order, &rank_probs);
    let budget_cdf = budget_cache.get(level, gizmo.gizmo_type.is_ancient());

    let mut acc: BTreeMap<GizmoOutcome, f64> = BTreeMap::new();
    let mut probability_sum = 0.0f64;
    for (mut combo, combo_prob) in combos {
        gizmo_core::sort::rs_sort_by_key(&mut combo[1..], |gp| rank_cost(catalog, gp));
        accumulate_combination(catalog, &budget_cdf, &combo, combo_prob, &mut acc, &mut probability_sum);
    }

    let mut filtered: BTreeMap<GizmoOutcome, f64> = match target {
        Some(t) => acc.into_iter().filter(|(outcome, _)| t.matches(outcome)).collect(),
        None => acc,
    };

    let divisor = if include_no_effect && probability_sum < 1.0 {
        let residual = 1.0 - probability_sum;
        *filtered.entry(GizmoOutcome::no_effect_pair()).or_insert(0.0) += residual;
        1.0
    } else {
        probability_sum
    };

    if divisor > 0.0 {
        for p in filtered.values_mut() {
            *p /= divisor;
        }
    }

    Ok(filtered)
}

/// The scalar the candidate search engine ranks by: the total probability
/// mass matching `target` for `gizmo` at `level` (no-effect residual never
/// included — a target-conditioned search cares only about matching mass).
pub fn target_probability(
    catalog: &Catalog,
    budget_cache: &gizmo_core::prob::BudgetCdfCache,
    gizmo: &Gizmo,
    level: u8,
    target: &Target,
) -> Result<f64, CoreError> {
    let dist = gizmo_outcome_probabilities(catalog, budget_cache, gizmo, level, false, Some(target))?;
    Ok(dist.values().sum())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gizmo_core::{Catalog, Component, Contribution, EquipmentType, Perk, PerkId, PerkRank};

    fn tiny_catalog() -> Catalog {
        let mut cat = Catalog::new();
        cat.register_perk(Perk {
            id: PerkId(1),
            name: "Precise".into(),
            two_slot: false,
            ranks: vec![
                PerkRank { rank: 1, cost: 1, threshold: 5, ancient: false },
                PerkRank { rank: 2, cost: 2, threshold: 15, ancient: false },
            ],
        })
        .unwrap();
        let mut comp = Component::new(gizmo_core::ComponentId(1), "Cog".into(), false, 10);
        comp.push_contribution(EquipmentType::Weapon, Contribution { perk: PerkId(1), base: 0, roll: 20 });
        cat.register_component(comp).unwrap();
        cat
    }

    #[test]
    fn empty_gizmo_is_all_no_effect() {
        let cat = Catalog::new();
        let cache = gizmo_core::prob::BudgetCdfCache::new();
        let gizmo = Gizmo::new(EquipmentType::Weapon, GizmoType::Standard, vec![]);
        let dist = gizmo_outcome_probabilities(&cat, &cache, &gizmo, 120, true, None).unwrap();
        assert_eq!(dist.len(), 1);
        assert!((dist[&GizmoOutcome::no_effect_pair()] - 1.0).abs() < gizmo_core::prob::EPSILON);
    }

    #[test]
    fn outcome_probabilities_sum_to_one() {
        let cat = tiny_catalog();
        let cache = gizmo_core::prob::BudgetCdfCache::new();
        let gizmo = Gizmo::new(EquipmentType::Weapon, GizmoType::Standard, vec![gizmo_core::ComponentId(1)]);
        let dist = gizmo_outcome_probabilities(&cat, &cache, &gizmo, 1, true, None).unwrap();
        let total: f64 = dist.values().sum();
        assert!((total - 1.0).abs() < 1e-6, "total={total}");
    }

    #[test]
    fn target_conditioned_probability_is_at_most_unconditioned_mass() {
        let cat = tiny_catalog();
        let cache = gizmo_core::prob::BudgetCdfCache::new();
        let gizmo = Gizmo::new(EquipmentType::Weapon, GizmoType::Standard, vec![gizmo_core::ComponentId(1)]);

        let target = Target::new(&cat, crate::gizmo::TargetPerk { perk: PerkId(1), rank: 1 }, None, false);
        let conditioned = target_probability(&cat, &cache, &gizmo, 1, &target).unwrap();
        assert!(conditioned <= 1.0 + 1e-9);
    }

    #[test]
    fn two_slot_perk_forces_no_effect_partner_when_it_wins_ordering() {
        // Two-slot eviction applies to the *canonical* first, decided by
        // rank/id ordering first. Here both candidates roll rank 1, so the
        // higher perk id (PerkId(2), the two-slot perk) wins the tie and
        // becomes `first`, evicting its partner.
        let mut cat = tiny_catalog();
        cat.register_perk(Perk {
            id: PerkId(2),
            name: "Enhanced Devoted".into(),
            two_slot: true,
            ranks: vec![PerkRank { rank: 1, cost: 1, threshold: 1, ancient: false }],
        })
        .unwrap();
        let outcome = GizmoOutcome::new(&cat, GeneratedPerk { perk: PerkId(2), rank: 1 }, GeneratedPerk { perk: PerkId(1), rank: 1 });
        assert_eq!(outcome.first.perk, PerkId(2));
        assert!(outcome.second.is_no_effect());
    }

    #[test]
    fn two_slot_perk_does_not_evict_when_it_loses_ordering() {
        // A two-slot perk that rolls a lower rank than its partner loses the
        // ordering pass and is never consulted for eviction — its partner
        // survives as `first` with its own rank intact.
        let mut cat = tiny_catalog();
        cat.register_perk(Perk {
            id: PerkId(2),
            name: "Enhanced Devoted".into(),
            two_slot: true,
            ranks: vec![PerkRank { rank: 1, cost: 1, threshold: 1, ancient: false }],
        })
        .unwrap();
        let outcome = GizmoOutcome::new(&cat, GeneratedPerk { perk: PerkId(2), rank: 1 }, GeneratedPerk { perk: PerkId(1), rank: 2 });
        assert_eq!(outcome.first.perk, PerkId(1));
        assert_eq!(outcome.first.rank, 2);
        assert_eq!(outcome.second.perk, PerkId(2));
        assert_eq!(outcome.second.rank, 1);
    }

    #[test]
    fn rank_tie_breaks_on_higher_perk_id() {
        let cat = tiny_catalog();
        let a = GeneratedPerk { perk: PerkId(1), rank: 2 };
        let b = GeneratedPerk { perk: PerkId(200), rank: 2 };
        let outcome = GizmoOutcome::new(&cat, a, b);
        assert_eq!(outcome.first.perk, PerkId(200));
    }

    fn catalog_with_one_contribution(base: u32, roll: u32) -> Catalog {
        let mut cat = Catalog::new();
        cat.register_perk(Perk {
            id: PerkId(1),
            name: "Precise".into(),
            two_slot: false,
            ranks: vec![
                PerkRank { rank: 1, cost: 1, threshold: 5, ancient: false },
                PerkRank { rank: 2, cost: 2, threshold: 15, ancient: false },
            ],
        })
        .unwrap();
        let mut comp = Component::new(gizmo_core::ComponentId(1), "Cog".into(), false, 10);
        comp.push_contribution(EquipmentType::Weapon, Contribution { perk: PerkId(1), base, roll });
        cat.register_component(comp).unwrap();
        cat
    }

    proptest::proptest! {
        #[test]
        fn outcome_probabilities_sum_to_one_for_arbitrary_single_contributor(
            base in 0u32..40,
            roll in 0u32..40,
            level in 1u8..=120,
        ) {
            let cat = catalog_with_one_contribution(base, roll);
            let cache = gizmo_core::prob::BudgetCdfCache::new();
            let gizmo = Gizmo::new(EquipmentType::Weapon, GizmoType::Standard, vec![gizmo_core::ComponentId(1)]);
            let dist = gizmo_outcome_probabilities(&cat, &cache, &gizmo, level, true, None).unwrap();
            let total: f64 = dist.values().sum();
            proptest::prop_assert!((total - 1.0).abs() < 1e-6, "total={total}");
        }
    }
}
