//! `gizmo-search` — the terminal front-end for the gizmo optimizer.
//!
//! Loads the catalog, resolves the requested target perks and excluded
//! components by name, runs a worker-sharded search, and prints the
//! top-`-n` results with a live progress line. Exit codes follow §6:
//! 0 success, 1 usage/config error, 2 input-resolution error.

mod args;
mod resolve;

use std::process::ExitCode;
use std::time::Duration;

use args::{parse_and_validate, ParsedArgs, RawTarget};
use gizmo_algo::{Target, TargetPerk};
use gizmo_core::{Catalog, ComponentId};
use gizmo_search::{run_search_with_progress, SearchRequest};
use resolve::{resolve_component, resolve_perk, ResolveError};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().skip(1).collect();
    let parsed = match parse_and_validate(&argv) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("[Error] {e}");
            return ExitCode::from(1);
        }
    };
    if parsed.targets.is_empty() {
        eprintln!("[Error] at least one -p target perk is required");
        return ExitCode::from(1);
    }

    println!("Optimal Gizmo Search Tool ({VERSION})");

    let catalog = match gizmo_io::load_catalog_from_dir(&parsed.catalog_dir) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("[Error] could not load catalog from {}: {e}", parsed.catalog_dir.display());
            return ExitCode::from(1);
        }
    };

    let target = match resolve_target(&catalog, &parsed.targets) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("[Error] {e}");
            return ExitCode::from(2);
        }
    };

    let excluded = match resolve_excluded(&catalog, &parsed.excluded) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("[Error] {e}");
            return ExitCode::from(2);
        }
    };

    print_configuration(&catalog, &parsed, &target);

    let worker_count = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    let request = SearchRequest {
        equipment: parsed.equipment,
        gizmo_type: parsed.gizmo_type,
        level: parsed.level,
        target,
        excluded,
        worker_count,
    };

    let budget_cache = gizmo_core::prob::BudgetCdfCache::new();
    print!("Status: Generating candidate gizmos...");
    let _ = std::io::Write::flush(&mut std::io::stdout());

    let start = std::time::Instant::now();
    let results = run_search_with_progress(
        &catalog,
        &budget_cache,
        &request,
        |progress| {
            let pct = if progress.total == 0 { 100.0 } else { progress.searched() as f64 / progress.total as f64 * 100.0 };
            print!("\x1b[2K\rStatus: Searched {}/{} ({pct:.1}%)", progress.searched(), progress.total);
            let _ = std::io::Write::flush(&mut std::io::stdout());
        },
        Duration::from_millis(250),
    );
    let elapsed = start.elapsed();
    println!("\x1b[2K\rSearch completed in {}ms ({} candidates)", elapsed.as_millis(), results.len());

    println!("\nResults:");
    if results.is_empty() {
        println!("  (no candidates survived pruning)");
        return ExitCode::SUCCESS;
    }

    let views = gizmo_report::top_n_views(&catalog, parsed.gizmo_type, &results, parsed.max_results);
    for (i, view) in views.iter().enumerate() {
        println!("\n#{}", i + 1);
        for (label, name) in &view.slots {
            println!("  {label:<12}: {name}");
        }
        println!("  probability  : {:.6}", view.probability);
        println!("  cost         : {}", view.cost);
        println!("  expected_cost: {:.2}", view.expected_cost);
    }

    ExitCode::SUCCESS
}

fn print_configuration(catalog: &Catalog, parsed: &ParsedArgs, target: &Target) {
    println!("\nSearch configuration:");
    println!("  Gizmo type     : {}", parsed.gizmo_type);
    println!("  Equipment type : {}", parsed.equipment);
    println!("  Invention level: {}", parsed.level);
    println!(
        "  Target perks   : {} / {}",
        perk_display(catalog, target.first().perk),
        perk_display(catalog, target.second().perk)
    );
}

fn perk_display(catalog: &Catalog, id: gizmo_core::PerkId) -> String {
    catalog.perk(id).map(|p| p.name.clone()).unwrap_or_else(|| "No Effect".to_string())
}

fn resolve_target(catalog: &Catalog, raw: &[RawTarget]) -> Result<Target, ResolveError> {
    let first = resolve_target_perk(catalog, &raw[0])?;
    let second = match raw.get(1) {
        Some(r) => Some(resolve_target_perk(catalog, r)?),
        None => None,
    };
    Ok(Target::new(catalog, first, second, false))
}

fn resolve_target_perk(catalog: &Catalog, raw: &RawTarget) -> Result<TargetPerk, ResolveError> {
    let perk = resolve_perk(catalog, &raw.name_query)?;
    Ok(TargetPerk { perk, rank: raw.rank })
}

fn resolve_excluded(catalog: &Catalog, raw: &[String]) -> Result<Vec<ComponentId>, ResolveError> {
    raw.iter().map(|q| resolve_component(catalog, q)).collect()
}
