//! The per-candidate evaluation outcome the search engine ranks and returns.

use gizmo_core::ComponentId;

/// One evaluated candidate: its component tuple plus the scalar metrics the
/// front-ends sort and display.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub components: Vec<ComponentId>,
    /// Total probability mass matching the query's target pair.
    pub probability: f64,
    /// Sum of the tuple's component unit costs.
    pub cost: u32,
    /// `cost / probability`; `f64::INFINITY` when `probability` is zero.
    pub expected_cost: f64,
}

impl SearchResult {
    pub fn new(components: Vec<ComponentId>, cost: u32, probability: f64) -> Self {
        let expected_cost = if probability > 0.0 { cost as f64 / probability } else { f64::INFINITY };
        SearchResult { components, probability, cost, expected_cost }
    }
}

/// Sort order for §4.E's final ranking: descending target probability, with
/// an explicit ascending-component-id tuple tie-break for byte-identical
/// output across runs (the reference implementation's own sort has no
/// tie-break and is only platform-stable; this corrects that per §9).
pub fn sort_by_probability_desc(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        b.probability
            .partial_cmp(&a.probability)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.components.cmp(&b.components))
    });
}

/// "Highest probable" ordering for §6's HTTP view: descending probability
/// with an epsilon-aware (`1e-7`) primary comparison, ascending expected
/// cost as the tie-break, then the component-id tuple for byte-identical
/// output. Distinct from [`sort_by_probability_desc`], which is the
/// exact-comparison §4.E engine-level ranking; this is the HTTP-surface
/// variant the reference server's view construction uses.
pub fn sort_by_probability_desc_epsilon_aware(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        let probability_order = if (a.probability - b.probability).abs() < gizmo_core::prob::EPSILON {
            std::cmp::Ordering::Equal
        } else {
            b.probability.partial_cmp(&a.probability).unwrap_or(std::cmp::Ordering::Equal)
        };
        probability_order
            .then_with(|| a.expected_cost.partial_cmp(&b.expected_cost).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| a.components.cmp(&b.components))
    });
}

/// "Cheapest" ordering: ascending expected cost, probability (descending) as
/// an epsilon-aware secondary key, per §6's HTTP `cheapest` view.
pub fn sort_by_expected_cost_asc(results: &mut [SearchResult]) {
    results.sort_by(|a, b| {
        a.expected_cost
            .partial_cmp(&b.expected_cost)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                if (a.probability - b.probability).abs() < gizmo_core::prob::EPSILON {
                    std::cmp::Ordering::Equal
                } else {
                    b.probability.partial_cmp(&a.probability).unwrap_or(std::cmp::Ordering::Equal)
                }
            })
            .then_with(|| a.components.cmp(&b.components))
    });
}
