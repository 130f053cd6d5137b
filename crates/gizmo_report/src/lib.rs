//! gizmo_report — shared result shaping used by both front-ends.
//!
//! Turns a raw [`SearchResult`] list into the slot-labelled view the CLI
//! prints and the HTTP server serializes: per-slot component names, the
//! "cheapest" and "highest probable" top-10 orderings, and the near-equal
//! dedup pass the HTTP front-end applies before either ordering. Nothing
//! here recomputes probability or cost; it only relabels and reorders
//! what `gizmo_search` already produced.

use gizmo_core::{Catalog, ComponentId, GizmoType};
use gizmo_search::{sort_by_expected_cost_asc, sort_by_probability_desc_epsilon_aware, SearchResult};
use serde::ser::SerializeMap;
use serde::Serialize;

/// One evaluated gizmo, slot-labelled for display/serialization.
///
/// Serializes as a flat JSON object (`{"middle": "...", "top": "...", ...,
/// "probability": ..., "expected_cost": ..., "cost": ...}`) per §6, with
/// each slot label lowercased and space-joined with an underscore.
#[derive(Clone, Debug)]
pub struct GizmoView {
    /// `(slot label, component name)` pairs in declared slot order.
    pub slots: Vec<(&'static str, String)>,
    pub probability: f64,
    pub expected_cost: f64,
    pub cost: u32,
}

impl Serialize for GizmoView {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.slots.len() + 3))?;
        for (label, name) in &self.slots {
            map.serialize_entry(&label.to_ascii_lowercase().replace(' ', "_"), name)?;
        }
        map.serialize_entry("probability", &self.probability)?;
        map.serialize_entry("expected_cost", &self.expected_cost)?;
        map.serialize_entry("cost", &self.cost)?;
        map.end()
    }
}

fn component_name(catalog: &Catalog, id: ComponentId) -> String {
    catalog.component(id).map(|c| c.name.clone()).unwrap_or_else(|| format!("component#{id}"))
}

/// Build the display view for one evaluated candidate.
pub fn build_view(catalog: &Catalog, gizmo_type: GizmoType, result: &SearchResult) -> GizmoView {
    let labels = gizmo_type.slot_labels();
    let slots = labels
        .iter()
        .zip(result.components.iter())
        .map(|(&label, &id)| (label, component_name(catalog, id)))
        .collect();
    GizmoView { slots, probability: result.probability, expected_cost: result.expected_cost, cost: result.cost }
}

/// Build views for the first `n` results, in whatever order `results` is
/// already sorted into.
pub fn top_n_views(catalog: &Catalog, gizmo_type: GizmoType, results: &[SearchResult], n: usize) -> Vec<GizmoView> {
    results.iter().take(n).map(|r| build_view(catalog, gizmo_type, r)).collect()
}

/// Collapse adjacent rows that are within [`gizmo_core::prob::EPSILON`] in
/// probability *and* share the same multiset of component ids. Only the
/// "cheapest" ordering applies this; "highest probable" is left
/// undeduplicated. Call this only after sorting — it only ever merges rows
/// already adjacent under the current order.
pub fn dedup_adjacent(results: &mut Vec<SearchResult>) {
    results.dedup_by(|a, b| {
        (a.probability - b.probability).abs() < gizmo_core::prob::EPSILON && {
            let mut ac = a.components.clone();
            let mut bc = b.components.clone();
            ac.sort();
            bc.sort();
            ac == bc
        }
    });
}

/// The HTTP front-end's two top-10 views: ascending-expected-cost
/// ("cheapest", deduplicated) and epsilon-aware descending-probability
/// ("highest probable", left undeduplicated).
pub struct RankedViews {
    pub cheapest: Vec<GizmoView>,
    pub highest_probable: Vec<GizmoView>,
}

const HTTP_TOP_N: usize = 10;

pub fn ranked_views(catalog: &Catalog, gizmo_type: GizmoType, results: &[SearchResult]) -> RankedViews {
    let mut by_cost = results.to_vec();
    sort_by_expected_cost_asc(&mut by_cost);
    dedup_adjacent(&mut by_cost);

    let mut by_probability = results.to_vec();
    sort_by_probability_desc_epsilon_aware(&mut by_probability);

    RankedViews {
        cheapest: top_n_views(catalog, gizmo_type, &by_cost, HTTP_TOP_N),
        highest_probable: top_n_views(catalog, gizmo_type, &by_probability, HTTP_TOP_N),
    }
}
