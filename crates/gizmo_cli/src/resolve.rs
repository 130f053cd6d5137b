//! Case-insensitive, longest-prefix-unique name resolution for target perks
//! and excluded components, per §6: ambiguity is reported as an error
//! listing every candidate, not silently resolved to the first match.

use gizmo_core::{Catalog, Component, ComponentId, Perk, PerkId};

#[derive(Debug, Clone)]
pub enum ResolveError {
    PerkNotFound(String),
    PerkAmbiguous { query: String, candidates: Vec<String> },
    ComponentNotFound(String),
    ComponentAmbiguous { query: String, candidates: Vec<String> },
}

impl std::fmt::Display for ResolveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResolveError::PerkNotFound(q) => write!(f, "Perk '{q}' could not be found."),
            ResolveError::PerkAmbiguous { query, candidates } => {
                write!(f, "Perk '{query}' is ambiguous. Could be one of: {}", candidates.join(", "))
            }
            ResolveError::ComponentNotFound(q) => write!(f, "Component '{q}' could not be found."),
            ResolveError::ComponentAmbiguous { query, candidates } => {
                write!(f, "Component '{query}' is ambiguous. Could be one of: {}", candidates.join(", "))
            }
        }
    }
}

/// Among multiple case-insensitive prefix matches, a query that is an
/// exact (case-insensitive) match for one candidate's full name is the
/// unique "longest prefix"; otherwise the match is ambiguous.
fn disambiguate<'a, T>(query: &str, matches: Vec<&'a T>, name_of: impl Fn(&T) -> &str) -> Result<&'a T, Vec<String>> {
    match matches.len() {
        0 => unreachable!("caller checks emptiness first"),
        1 => Ok(matches[0]),
        _ => {
            let exact: Vec<&&T> = matches.iter().filter(|m| name_of(m).eq_ignore_ascii_case(query)).collect();
            if exact.len() == 1 {
                Ok(exact[0])
            } else {
                Err(matches.iter().map(|m| name_of(m).to_string()).collect())
            }
        }
    }
}

pub fn resolve_perk(catalog: &Catalog, query: &str) -> Result<PerkId, ResolveError> {
    let matches = catalog.perks_by_prefix(query);
    if matches.is_empty() {
        return Err(ResolveError::PerkNotFound(query.to_string()));
    }
    disambiguate(query, matches, |p: &Perk| p.name.as_str())
        .map(|p| p.id)
        .map_err(|candidates| ResolveError::PerkAmbiguous { query: query.to_string(), candidates })
}

pub fn resolve_component(catalog: &Catalog, query: &str) -> Result<ComponentId, ResolveError> {
    let matches = catalog.components_by_prefix(query);
    if matches.is_empty() {
        return Err(ResolveError::ComponentNotFound(query.to_string()));
    }
    disambiguate(query, matches, |c: &Component| c.name.as_str())
        .map(|c| c.id)
        .map_err(|candidates| ResolveError::ComponentAmbiguous { query: query.to_string(), candidates })
}

#[cfg(test)]
mod tests {
    use super::*;
    use gizmo_core::{Perk, PerkRank};

    fn catalog_with_precise_and_precision() -> Catalog {
        let mut cat = Catalog::new();
        cat.register_perk(Perk {
            id: PerkId(1),
            name: "Precise".into(),
            two_slot: false,
            ranks: vec![PerkRank { rank: 1, cost: 1, threshold: 1, ancient: false }],
        })
        .unwrap();
        cat.register_perk(Perk {
            id: PerkId(2),
            name: "Precise Plus".into(),
            two_slot: false,
            ranks: vec![PerkRank { rank: 1, cost: 1, threshold: 1, ancient: false }],
        })
        .unwrap();
        cat
    }

    #[test]
    fn unique_prefix_resolves() {
        let cat = catalog_with_precise_and_precision();
        assert_eq!(resolve_perk(&cat, "Precise Plus").unwrap(), PerkId(2));
    }

    #[test]
    fn exact_match_disambiguates_among_prefix_matches() {
        let cat = catalog_with_precise_and_precision();
        assert_eq!(resolve_perk(&cat, "precise").unwrap(), PerkId(1));
    }

    #[test]
    fn ambiguous_prefix_lists_candidates() {
        let cat = catalog_with_precise_and_precision();
        let err = resolve_perk(&cat, "prec").unwrap_err();
        match err {
            ResolveError::PerkAmbiguous { candidates, .. } => assert_eq!(candidates.len(), 2),
            _ => panic!("expected ambiguous"),
        }
    }

    #[test]
    fn unknown_name_not_found() {
        let cat = catalog_with_precise_and_precision();
        assert!(matches!(resolve_perk(&cat, "no-such-perk"), Err(ResolveError::PerkNotFound(_))));
    }
}
