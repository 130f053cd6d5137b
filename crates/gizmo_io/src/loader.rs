//! Row-shaped deserialization + the two-pass catalog build: components and
//! perks first (from `perkdata.csv`/`compdata.csv`), then costs overlaid on
//! top from `compcost.csv` — loading costs before components is an
//! ordering error the original generator's own loader also avoided.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use gizmo_core::{Catalog, Component, Contribution, EquipmentType, Perk, PerkId, PerkRank};

use crate::error::{IoError, IoResult};

/// `perkdata.csv`: `id,name,rank,cost,threshold,ancient` — one row per (perk, rank).
#[derive(Debug, Deserialize)]
struct PerkRow {
    id: u8,
    name: String,
    rank: u8,
    cost: u32,
    threshold: u32,
    ancient: bool,
}

/// `compdata.csv`: `id,name,equipment,perk,base,roll,ancient` — one row per
/// (component, equipment, contribution).
#[derive(Debug, Deserialize)]
struct ComponentRow {
    id: u8,
    name: String,
    equipment: String,
    perk: u8,
    base: u32,
    roll: u32,
    ancient: bool,
}

/// `compcost.csv`: `id,name,cost` — one row per component.
#[derive(Debug, Deserialize)]
struct CostRow {
    id: u8,
    #[allow(dead_code)]
    name: String,
    cost: u32,
}

fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> IoResult<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| match e.kind() {
            csv::ErrorKind::Io(_) => IoError::Read {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::Other, e.to_string()),
            },
            _ => IoError::Csv { path: path.to_path_buf(), source: e },
        })?;

    rdr.deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(|e| IoError::Csv { path: path.to_path_buf(), source: e })
}

/// Load the three catalog files from `dir` (`perkdata.csv`, `compdata.csv`,
/// `compcost.csv`, in that order) and build the immutable [`Catalog`].
pub fn load_catalog_from_dir(dir: &Path) -> IoResult<Catalog> {
    let perk_rows = read_rows::<PerkRow>(&dir.join("perkdata.csv"))?;
    let comp_rows = read_rows::<ComponentRow>(&dir.join("compdata.csv"))?;
    let cost_path = dir.join("compcost.csv");
    let cost_rows: Vec<CostRow> = if cost_path.exists() {
        read_rows::<CostRow>(&cost_path)?
    } else {
        Vec::new()
    };

    build_catalog(&dir.join("perkdata.csv"), perk_rows, &dir.join("compdata.csv"), comp_rows, &cost_path, cost_rows)
}

fn build_catalog(
    perk_path: &Path,
    perk_rows: Vec<PerkRow>,
    comp_path: &Path,
    comp_rows: Vec<ComponentRow>,
    cost_path: &Path,
    cost_rows: Vec<CostRow>,
) -> IoResult<Catalog> {
    let mut catalog = Catalog::new();

    // --- Perks: group rows by id, preserving first-seen row order per id. ---
    let mut perk_order: Vec<u8> = Vec::new();
    let mut perk_groups: BTreeMap<u8, (String, Vec<PerkRow>)> = BTreeMap::new();
    for (i, row) in perk_rows.into_iter().enumerate() {
        let entry = perk_groups.entry(row.id).or_insert_with(|| {
            perk_order.push(row.id);
            (row.name.clone(), Vec::new())
        });
        if entry.0 != row.name {
            return Err(IoError::InconsistentPerkRow { path: perk_path.to_path_buf(), id: row.id, row: i });
        }
        entry.1.push(row);
    }

    for id in perk_order {
        let (name, rows) = perk_groups.remove(&id).expect("grouped above");
        let mut ranks: Vec<PerkRank> = rows
            .iter()
            .map(|r| PerkRank { rank: r.rank, cost: r.cost, threshold: r.threshold, ancient: r.ancient })
            .collect();
        ranks.sort_by_key(|r| r.rank);
        let two_slot = Perk::is_two_slot_name(&name);
        catalog.register_perk(Perk { id: PerkId(id), name, two_slot, ranks })?;
    }

    // --- Components: group rows by id, one contribution per row. ---
    let mut comp_order: Vec<u8> = Vec::new();
    let mut comp_groups: BTreeMap<u8, (String, bool, Vec<ComponentRow>)> = BTreeMap::new();
    for (i, row) in comp_rows.into_iter().enumerate() {
        let entry = comp_groups.entry(row.id).or_insert_with(|| {
            comp_order.push(row.id);
            (row.name.clone(), row.ancient, Vec::new())
        });
        if entry.0 != row.name || entry.1 != row.ancient {
            return Err(IoError::InconsistentComponentRow { path: comp_path.to_path_buf(), id: row.id, row: i });
        }
        entry.2.push(row);
    }

    for id in comp_order {
        let (name, ancient, rows) = comp_groups.remove(&id).expect("grouped above");
        let mut component = Component::new(gizmo_core::ComponentId(id), name, ancient, 0);
        for (i, row) in rows.iter().enumerate() {
            let equipment: EquipmentType = parse_equipment(&row.equipment).ok_or_else(|| IoError::UnknownEquipment {
                path: comp_path.to_path_buf(),
                row: i,
                value: row.equipment.clone(),
            })?;
            component.push_contribution(
                equipment,
                Contribution { perk: PerkId(row.perk), base: row.base, roll: row.roll },
            );
        }
        catalog.register_component(component)?;
    }

    // --- Costs: second pass, overlaid onto already-registered components. ---
    for row in cost_rows {
        catalog.set_component_cost(gizmo_core::ComponentId(row.id), row.cost)?;
    }
    let _ = cost_path;

    Ok(catalog)
}

fn parse_equipment(s: &str) -> Option<EquipmentType> {
    match s.to_ascii_lowercase().as_str() {
        "weapon" => Some(EquipmentType::Weapon),
        "tool" => Some(EquipmentType::Tool),
        "armour" | "armor" => Some(EquipmentType::Armour),
        _ => None,
    }
}
