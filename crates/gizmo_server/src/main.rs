//! `gizmo-server` — the HTTP front-end for the gizmo optimizer.
//!
//! A single `GET /gizmo` endpoint, permissive CORS, and a JSON response
//! shaped per §6. Input is resolved by exact (case-insensitive) perk name,
//! not prefix, matching the query-string contract the front-end actually
//! exposes; a request with an unmatched name or an unparseable integer
//! comes back as a structured `{"error": "..."}` body rather than a 4xx
//! with no body, so every failure mode is visible to callers in the same
//! shape.

use std::collections::BTreeMap;
use std::time::Instant;

use actix_cors::Cors;
use actix_web::middleware::Logger;
use actix_web::{web, App, HttpResponse, HttpServer};
use gizmo_algo::{Target, TargetPerk};
use gizmo_core::prob::BudgetCdfCache;
use gizmo_core::{Catalog, EquipmentType, GizmoType};
use gizmo_search::{run_search, SearchRequest};
use serde::{Deserialize, Serialize};
use serde_json::json;

struct AppState {
    catalog: Catalog,
    budget_cache: BudgetCdfCache,
}

#[derive(Debug, Deserialize)]
struct GizmoQuery {
    perk1: Option<String>,
    rank1: Option<String>,
    perk2: Option<String>,
    rank2: Option<String>,
    level: Option<String>,
    #[serde(rename = "type")]
    equipment: Option<String>,
}

#[derive(Serialize)]
struct GizmoResponse {
    search_time_ms: u128,
    num_results: usize,
    cheapest: Vec<gizmo_report::GizmoView>,
    highest_probable: Vec<gizmo_report::GizmoView>,
    component_costs: BTreeMap<String, u32>,
    interp_p1: String,
    interp_p1_rank: u8,
    interp_p2: String,
    interp_p2_rank: u8,
}

fn error_response(message: impl Into<String>) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "error": message.into() }))
}

fn parse_u8(raw: &str, what: &str) -> Result<u8, String> {
    raw.parse::<u8>().map_err(|_| format!("{what} could not be interpreted as integer."))
}

fn component_costs(catalog: &Catalog) -> BTreeMap<String, u32> {
    catalog.components().filter(|c| !c.is_empty()).map(|c| (c.name.clone(), c.cost)).collect()
}

async fn handle_gizmo(query: web::Query<GizmoQuery>, state: web::Data<AppState>) -> HttpResponse {
    let catalog = &state.catalog;
    let query = query.into_inner();

    let Some(perk1_name) = query.perk1.as_deref().filter(|s| !s.is_empty()) else {
        return error_response("Perk 1 name does not exist.");
    };
    let Some(target1) = catalog.perk_by_name(perk1_name) else {
        return error_response("Perk 1 name does not exist.");
    };
    let rank1 = match query.rank1.as_deref() {
        Some(r) => match parse_u8(r, "Perk 1 rank") {
            Ok(v) => v,
            Err(e) => return error_response(e),
        },
        None => return error_response("Perk 1 rank could not be interpreted as integer."),
    };

    let target2 = query.perk2.as_deref().filter(|s| !s.is_empty()).and_then(|name| catalog.perk_by_name(name));
    let rank2 = if target2.is_some() {
        match query.rank2.as_deref() {
            Some(r) => match parse_u8(r, "Perk 2 rank") {
                Ok(v) => v,
                Err(e) => return error_response(e),
            },
            None => return error_response("Perk 2 rank could not be interpreted as integer."),
        }
    } else {
        0
    };

    let level = match query.level.as_deref() {
        Some(r) => match parse_u8(r, "Invention level") {
            Ok(v) => v,
            Err(e) => return error_response(e),
        },
        None => return error_response("Invention level could not be interpreted as integer."),
    };

    let equipment = match query.equipment.as_deref().map(str::to_ascii_lowercase) {
        Some(ref s) if s == "weapon" => EquipmentType::Weapon,
        Some(ref s) if s == "tool" => EquipmentType::Tool,
        Some(ref s) if s == "armour" || s == "armor" => EquipmentType::Armour,
        _ => return error_response("Unknown gizmo type (or type not specified)."),
    };

    let target = Target::new(
        catalog,
        TargetPerk { perk: target1.id, rank: rank1 },
        target2.map(|t| TargetPerk { perk: t.id, rank: rank2 }),
        false,
    );

    let interp_p1 = catalog.perk(target.first().perk).map(|p| p.name.clone()).unwrap_or_else(|| "No Effect".into());
    let interp_p2 = catalog.perk(target.second().perk).map(|p| p.name.clone()).unwrap_or_else(|| "No Effect".into());

    let worker_count = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    let request = SearchRequest {
        equipment,
        gizmo_type: GizmoType::Standard,
        level,
        target,
        excluded: Vec::new(),
        worker_count,
    };

    let start = Instant::now();
    let results = run_search(catalog, &state.budget_cache, &request);
    let search_time_ms = start.elapsed().as_millis();

    if results.is_empty() {
        return error_response("No results found");
    }

    let views = gizmo_report::ranked_views(catalog, request.gizmo_type, &results);

    HttpResponse::Ok().json(GizmoResponse {
        search_time_ms,
        num_results: results.len(),
        cheapest: views.cheapest,
        highest_probable: views.highest_probable,
        component_costs: component_costs(catalog),
        interp_p1,
        interp_p1_rank: target.first().rank,
        interp_p2,
        interp_p2_rank: target.second().rank,
    })
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let catalog_dir = std::env::var("GIZMO_CATALOG_DIR").unwrap_or_else(|_| ".".to_string());
    let catalog = gizmo_io::load_catalog_from_dir(std::path::Path::new(&catalog_dir)).unwrap_or_else(|e| {
        panic!("could not load catalog from {catalog_dir}: {e}");
    });

    let bind_addr = std::env::var("GIZMO_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8001".to_string());
    log::info!("gizmo-server listening on {bind_addr}");

    let state = web::Data::new(AppState { catalog, budget_cache: BudgetCdfCache::new() });

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::new("%r %s %Ts"))
            .wrap(Cors::default().allow_any_origin().allow_any_method().allow_any_header())
            .app_data(state.clone())
            .route("/gizmo", web::get().to(handle_gizmo))
    })
    .bind(&bind_addr)?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use gizmo_core::{Component, ComponentId, Perk, PerkId, PerkRank};

    fn catalog_with_precise() -> Catalog {
        let mut cat = Catalog::new();
        cat.register_perk(Perk {
            id: PerkId(1),
            name: "Precise".into(),
            two_slot: false,
            ranks: vec![PerkRank { rank: 1, cost: 1, threshold: 1, ancient: false }],
        })
        .unwrap();
        cat.register_component(Component::new(ComponentId(1), "Cog".into(), false, 10)).unwrap();
        cat
    }

    #[test]
    fn perk_by_name_is_case_insensitive_exact_match() {
        let cat = catalog_with_precise();
        assert!(cat.perk_by_name("precise").is_some());
        assert!(cat.perk_by_name("prec").is_none());
    }

    #[test]
    fn component_costs_map_covers_every_component() {
        let cat = catalog_with_precise();
        let costs = component_costs(&cat);
        assert_eq!(costs.get("Cog"), Some(&10));
    }

    #[test]
    fn parse_u8_rejects_non_integer_rank() {
        assert!(parse_u8("abc", "Perk 1 rank").is_err());
        assert_eq!(parse_u8("4", "Perk 1 rank").unwrap(), 4);
    }
}
