//! gizmo_search — the candidate search engine. Builds a relevance-filtered
//! component universe, enumerates gizmo configurations in a symmetry-reduced
//! normal form with reachability pruning, evaluates each through
//! `gizmo_algo`, and returns the ranked, deterministically tie-broken result
//! list.

#![forbid(unsafe_code)]

pub mod candidates;
pub mod enumerate;
pub mod result;
pub mod search;
pub mod worker;

pub use candidates::build_candidate_universe;
pub use enumerate::{enumerate_candidates, TargetBound};
pub use result::{sort_by_expected_cost_asc, sort_by_probability_desc, sort_by_probability_desc_epsilon_aware, SearchResult};
pub use search::{run_search, run_search_with_progress, SearchProgress, SearchRequest};
pub use worker::PaddedCounter;
