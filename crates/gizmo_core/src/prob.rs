//! Discrete probability kernel: convolution, uniform-sum PDF/CDF, and the
//! memoized per-(level, ancient) invention-budget CDF.
//!
//! Everything here operates on dense `Vec<f64>` distributions indexed by
//! outcome value, matching the generator's own representation. Tolerances
//! that matter for deduplication elsewhere in the workspace use `EPSILON`.

use std::collections::HashMap;
use std::sync::RwLock;

/// Absolute tolerance used wherever two probabilities are compared for
/// "near enough to be the same outcome" (result dedup, invariant tests).
pub const EPSILON: f64 = 1e-7;

/// `conv(a, b)[k] = Σ a[j]·b[k−j]`, for `k` in `0..a.len()+b.len()-1`.
pub fn convolve(a: &[f64], b: &[f64]) -> Vec<f64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut out = vec![0.0; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        if ai == 0.0 {
            continue;
        }
        for (j, &bj) in b.iter().enumerate() {
            out[i + j] += ai * bj;
        }
    }
    out
}

/// PDF of `Uniform{0..roll-1}`: a vector of length `roll`, each entry `1/roll`.
pub fn uniform_pdf(roll: u32) -> Vec<f64> {
    assert!(roll > 0, "a uniform roll upper bound must be positive");
    vec![1.0 / roll as f64; roll as usize]
}

/// PDF of the sum of independent uniforms `Uᵢ ~ Uniform{0..rollsᵢ-1}`.
///
/// Returns the degenerate distribution `[1.0]` (a constant 0) for an empty
/// roll list, so callers that zero-pad a base in front of this never need
/// to special-case "no rolls".
pub fn pdf_of_uniform_sum(rolls: &[u32]) -> Vec<f64> {
    let mut iter = rolls.iter();
    let Some(&first) = iter.next() else {
        return vec![1.0];
    };
    let mut pdf = uniform_pdf(first);
    for &r in iter {
        pdf = convolve(&pdf, &uniform_pdf(r));
    }
    pdf
}

/// Inclusive partial sum of a PDF.
pub fn cdf_from_pdf(pdf: &[f64]) -> Vec<f64> {
    let mut out = Vec::with_capacity(pdf.len());
    let mut acc = 0.0;
    for &p in pdf {
        acc += p;
        out.push(acc);
    }
    out
}

/// Build a per-perk contribution CDF: a zero-padded prefix of length `base`
/// followed by the CDF of the sum of `rolls`.
pub fn contribution_cdf(base: u32, rolls: &[u32]) -> Vec<f64> {
    let roll_pdf = pdf_of_uniform_sum(rolls);
    let mut pdf = vec![0.0; base as usize];
    pdf.extend(roll_pdf);
    cdf_from_pdf(&pdf)
}

/// The invention-budget CDF for a given player level and gizmo variant.
///
/// `m = level/2 + 20`; `k` = 6 dice for ancient gizmos, 5 otherwise; the sum
/// of `k` `Uniform{0..m-1}` dice is computed, then every probability mass
/// below index `level` is floored onto index `level` (a player can never
/// "spend" less than their level in invention budget).
pub fn compute_budget_pdf(level: u8, ancient: bool) -> Vec<f64> {
    let m = level as u32 / 2 + 20;
    let dice = if ancient { 6 } else { 5 };
    let mut pdf = pdf_of_uniform_sum(&vec![m; dice]);

    let level = level as usize;
    if pdf.len() <= level {
        pdf.resize(level + 1, 0.0);
    }
    let floored: f64 = pdf[..level].iter().sum();
    for p in pdf[..level].iter_mut() {
        *p = 0.0;
    }
    pdf[level] += floored;
    pdf
}

/// Thread-safe, memoized cache of budget CDFs keyed by `(level, ancient)`.
///
/// Readers dominate: a read lock is tried first, and only promoted to a
/// write lock on a cache miss, with the key rechecked after acquiring it
/// (double-checked lookup) so concurrent misses for the same key compute
/// the vector at most once each, and once inserted a vector is never
/// mutated again.
#[derive(Default)]
pub struct BudgetCdfCache {
    cache: RwLock<HashMap<(u8, bool), std::sync::Arc<Vec<f64>>>>,
}

impl BudgetCdfCache {
    pub fn new() -> Self {
        BudgetCdfCache { cache: RwLock::new(HashMap::new()) }
    }

    pub fn get(&self, level: u8, ancient: bool) -> std::sync::Arc<Vec<f64>> {
        let key = (level, ancient);
        if let Some(hit) = self.cache.read().expect("budget cdf cache poisoned").get(&key) {
            return hit.clone();
        }
        let mut guard = self.cache.write().expect("budget cdf cache poisoned");
        if let Some(hit) = guard.get(&key) {
            return hit.clone();
        }
        let cdf = std::sync::Arc::new(cdf_from_pdf(&compute_budget_pdf(level, ancient)));
        guard.insert(key, cdf.clone());
        cdf
    }
}
