//! Flag parsing for the `gizmo-search` binary.
//!
//! The grammar isn't a fixed set of single-valued flags: `-p`/`-x` each
//! consume a run of name tokens up to (but not including) the next
//! flag-looking token, with `-p` additionally treating a trailing integer
//! token as an explicit rank. That shape doesn't map onto a declarative
//! flag parser, so this walks the token stream by hand, the same way the
//! original search tool's argument loop does; the `CliError` enum and
//! `parse_and_validate` entry point otherwise follow the shape of the rest
//! of this workspace's CLI front-ends.

use std::path::PathBuf;

use gizmo_core::{EquipmentType, GizmoType};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliError {
    MissingEquipment,
    MultipleEquipment,
    MissingValue(&'static str),
    NotAnInteger { flag: &'static str, got: String },
    TooManyTargets,
    EmptyTargetTokens,
    EmptyExcludeTokens,
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::MissingEquipment => write!(f, "exactly one of -w/-t/-a (equipment type) is required"),
            CliError::MultipleEquipment => write!(f, "only one of -w/-t/-a may be given"),
            CliError::MissingValue(flag) => write!(f, "{flag} requires a value"),
            CliError::NotAnInteger { flag, got } => write!(f, "{flag} expects an integer, got {got:?}"),
            CliError::TooManyTargets => write!(f, "at most two -p target perks may be given"),
            CliError::EmptyTargetTokens => write!(f, "-p requires at least one name token"),
            CliError::EmptyExcludeTokens => write!(f, "-x requires at least one name token"),
        }
    }
}

impl std::error::Error for CliError {}

/// A raw, unresolved target: the space-joined perk-name tokens plus the
/// rank (defaulting to 1 when no trailing integer token was present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTarget {
    pub name_query: String,
    pub rank: u8,
}

#[derive(Debug, Clone)]
pub struct ParsedArgs {
    pub equipment: EquipmentType,
    pub gizmo_type: GizmoType,
    pub level: u8,
    pub max_results: usize,
    pub targets: Vec<RawTarget>,
    pub excluded: Vec<String>,
    pub catalog_dir: PathBuf,
}

fn looks_like_flag(token: &str) -> bool {
    token.starts_with('-') && token.chars().nth(1).is_some_and(|c| !c.is_ascii_digit())
}

fn parse_u64(flag: &'static str, token: &str) -> Result<u64, CliError> {
    token.parse::<u64>().map_err(|_| CliError::NotAnInteger { flag, got: token.to_string() })
}

/// Parse `args` (the program's argv, excluding argv[0]) into [`ParsedArgs`].
pub fn parse_and_validate(args: &[String]) -> Result<ParsedArgs, CliError> {
    let mut equipment: Option<EquipmentType> = None;
    let mut gizmo_type = GizmoType::Standard;
    let mut level: u8 = 120;
    let mut max_results: usize = 1;
    let mut catalog_dir = PathBuf::from(".");
    let mut targets: Vec<RawTarget> = Vec::new();
    let mut excluded: Vec<String> = Vec::new();

    let mut i = 0;
    while i < args.len() {
        let token = args[i].as_str();
        match token {
            "-w" | "--weapon" => {
                if equipment.is_some() {
                    return Err(CliError::MultipleEquipment);
                }
                equipment = Some(EquipmentType::Weapon);
            }
            "-t" | "--tool" => {
                if equipment.is_some() {
                    return Err(CliError::MultipleEquipment);
                }
                equipment = Some(EquipmentType::Tool);
            }
            "-a" | "--armour" => {
                if equipment.is_some() {
                    return Err(CliError::MultipleEquipment);
                }
                equipment = Some(EquipmentType::Armour);
            }
            "-std" | "--standard" => gizmo_type = GizmoType::Standard,
            "-anc" | "--ancient" => gizmo_type = GizmoType::Ancient,
            "-l" | "--level" => {
                i += 1;
                let v = args.get(i).ok_or(CliError::MissingValue("-l"))?;
                level = parse_u64("-l", v)?.min(u8::MAX as u64) as u8;
            }
            "-n" | "--num-results" => {
                i += 1;
                let v = args.get(i).ok_or(CliError::MissingValue("-n"))?;
                max_results = parse_u64("-n", v)? as usize;
            }
            "--catalog-dir" => {
                i += 1;
                let v = args.get(i).ok_or(CliError::MissingValue("--catalog-dir"))?;
                catalog_dir = PathBuf::from(v);
            }
            "-p" | "--target" => {
                i += 1;
                let mut tokens: Vec<&str> = Vec::new();
                while i < args.len() && !looks_like_flag(&args[i]) {
                    tokens.push(&args[i]);
                    i += 1;
                }
                i -= 1;
                if tokens.is_empty() {
                    return Err(CliError::EmptyTargetTokens);
                }
                if targets.len() >= 2 {
                    return Err(CliError::TooManyTargets);
                }

                let (rank, name_tokens): (u8, &[&str]) = match tokens.last().unwrap().parse::<u8>() {
                    Ok(r) if tokens.len() > 1 => (r, &tokens[..tokens.len() - 1]),
                    Ok(r) => (r, &tokens[..]),
                    Err(_) => (1, &tokens[..]),
                };
                targets.push(RawTarget { name_query: name_tokens.join(" "), rank });
            }
            "-x" | "--exclude" => {
                i += 1;
                let mut tokens: Vec<&str> = Vec::new();
                while i < args.len() && !looks_like_flag(&args[i]) {
                    tokens.push(&args[i]);
                    i += 1;
                }
                i -= 1;
                if tokens.is_empty() {
                    return Err(CliError::EmptyExcludeTokens);
                }
                excluded.push(tokens.join(" "));
            }
            _ => {}
        }
        i += 1;
    }

    let equipment = equipment.ok_or(CliError::MissingEquipment)?;

    Ok(ParsedArgs { equipment, gizmo_type, level, max_results, targets, excluded, catalog_dir })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn parses_a_typical_invocation() {
        let parsed = parse_and_validate(&tokens("-w -p precise 4 -p equilibrium 2 -l 120 -n 1")).unwrap();
        assert_eq!(parsed.equipment, EquipmentType::Weapon);
        assert_eq!(parsed.level, 120);
        assert_eq!(parsed.max_results, 1);
        assert_eq!(parsed.targets.len(), 2);
        assert_eq!(parsed.targets[0], RawTarget { name_query: "precise".into(), rank: 4 });
        assert_eq!(parsed.targets[1], RawTarget { name_query: "equilibrium".into(), rank: 2 });
    }

    #[test]
    fn target_without_trailing_rank_defaults_to_one() {
        let parsed = parse_and_validate(&tokens("-a -p crackling")).unwrap();
        assert_eq!(parsed.targets[0], RawTarget { name_query: "crackling".into(), rank: 1 });
    }

    #[test]
    fn multi_word_target_name_joins_with_spaces() {
        let parsed = parse_and_validate(&tokens("-t -p enhanced devoted 1")).unwrap();
        assert_eq!(parsed.targets[0], RawTarget { name_query: "enhanced devoted".into(), rank: 1 });
    }

    #[test]
    fn exclude_collects_multiple_runs() {
        let parsed = parse_and_validate(&tokens("-w -x base parts -x cog")).unwrap();
        assert_eq!(parsed.excluded, vec!["base parts".to_string(), "cog".to_string()]);
    }

    #[test]
    fn missing_equipment_is_an_error() {
        assert_eq!(parse_and_validate(&tokens("-p precise 1")).unwrap_err(), CliError::MissingEquipment);
    }

    #[test]
    fn third_target_is_rejected() {
        let err = parse_and_validate(&tokens("-w -p a 1 -p b 1 -p c 1")).unwrap_err();
        assert_eq!(err, CliError::TooManyTargets);
    }
}
