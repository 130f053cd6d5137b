//! Worker-sharded candidate evaluation: each worker strides the candidate
//! list, writes to a private result vector, and advances its own
//! cache-line-padded progress counter.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use gizmo_algo::{Gizmo, Target};
use gizmo_core::{Catalog, ComponentId, EquipmentType, GizmoType};

use crate::result::SearchResult;

/// A per-worker progress counter alone in its own cache line, so sibling
/// workers' increments never false-share with the monitor thread's reads.
#[repr(align(64))]
#[derive(Default)]
pub struct PaddedCounter(pub AtomicU64);

impl PaddedCounter {
    pub fn new() -> Self {
        PaddedCounter(AtomicU64::new(0))
    }

    pub fn load(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// One counter per worker, each in its own `Arc` so a monitor thread can
/// hold clones and sample them while the workers are still running.
pub fn make_counters(worker_count: usize) -> Vec<Arc<PaddedCounter>> {
    (0..worker_count.max(1)).map(|_| Arc::new(PaddedCounter::new())).collect()
}

/// Evaluate every candidate in `candidates` across `counters.len()` threads,
/// striding the list so worker `w` handles indices `w, w+W, 2w+W, …`. Each
/// worker writes to its own private result vector; the shards are
/// concatenated (unsorted) on return.
#[allow(clippy::too_many_arguments)]
pub fn evaluate_sharded(
    catalog: &Catalog,
    budget_cache: &gizmo_core::prob::BudgetCdfCache,
    candidates: &[Vec<ComponentId>],
    equipment: EquipmentType,
    gizmo_type: GizmoType,
    level: u8,
    target: &Target,
    counters: &[Arc<PaddedCounter>],
) -> Vec<SearchResult> {
    let worker_count = counters.len().max(1);
    let mut shards: Vec<Vec<SearchResult>> = Vec::new();

    std::thread::scope(|scope| {
        let mut handles = Vec::with_capacity(worker_count);
        for (w, counter) in counters.iter().enumerate() {
            handles.push(scope.spawn(move || {
                let mut local = Vec::new();
                let mut idx = w;
                while idx < candidates.len() {
                    let tuple = &candidates[idx];
                    let gizmo = Gizmo::new(equipment, gizmo_type, tuple.clone());
                    let probability =
                        gizmo_algo::target_probability(catalog, budget_cache, &gizmo, level, target)
                            .expect("search candidates only reference catalog ids");
                    let cost: u32 = tuple
                        .iter()
                        .map(|id| catalog.component(*id).map(|c| c.cost).unwrap_or(0))
                        .sum();
                    local.push(SearchResult::new(tuple.clone(), cost, probability));
                    counter.0.fetch_add(1, Ordering::Relaxed);
                    idx += worker_count;
                }
                local
            }));
        }
        for h in handles {
            shards.push(h.join().expect("search worker panicked"));
        }
    });

    shards.into_iter().flatten().collect()
}
