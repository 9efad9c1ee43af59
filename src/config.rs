use std::path::PathBuf;

use env_logger::Env;

use crate::stat_rank::{PLAYER_TOP_TIER, TEAM_TOP_TIER};

pub const DB_ENV: &str = "COURTSIDE_DB";
pub const TEAM_TOP_TIER_ENV: &str = "COURTSIDE_TEAM_TOP_TIER";
pub const PLAYER_TOP_TIER_ENV: &str = "COURTSIDE_PLAYER_TOP_TIER";
pub const SHUFFLE_SEED_ENV: &str = "COURTSIDE_SHUFFLE_SEED";

const DATA_DIR: &str = "courtside";
const DB_FILE: &str = "league.sqlite";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub db_path: PathBuf,
    pub team_top_tier: u32,
    pub player_top_tier: u32,
    pub shuffle_seed: Option<u64>,
}

impl Settings {
    /// Reads `.env.local` then `.env`; variables already set in the process are kept.
    pub fn load(args: &[String]) -> Self {
        load_env_files();
        Self::from_lookup(args, |key| std::env::var(key).ok())
    }

    pub fn from_lookup(args: &[String], lookup: impl Fn(&str) -> Option<String>) -> Self {
        let db_path = arg_value(args, "db")
            .or_else(|| non_empty(lookup(DB_ENV)))
            .map(PathBuf::from)
            .or_else(|| default_db_path(&lookup))
            .unwrap_or_else(|| PathBuf::from(DB_FILE));
        let team_top_tier = parse_or(lookup(TEAM_TOP_TIER_ENV), TEAM_TOP_TIER);
        let player_top_tier = parse_or(lookup(PLAYER_TOP_TIER_ENV), PLAYER_TOP_TIER);
        let shuffle_seed = arg_value(args, "seed")
            .or_else(|| lookup(SHUFFLE_SEED_ENV))
            .and_then(|raw| raw.trim().parse::<u64>().ok());
        Self {
            db_path,
            team_top_tier,
            player_top_tier,
            shuffle_seed,
        }
    }
}

pub fn load_env_files() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

pub fn init_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info")).try_init();
}

fn default_db_path(lookup: &impl Fn(&str) -> Option<String>) -> Option<PathBuf> {
    if let Some(base) = non_empty(lookup("XDG_DATA_HOME")) {
        return Some(PathBuf::from(base).join(DATA_DIR).join(DB_FILE));
    }
    let home = non_empty(lookup("HOME"))?;
    Some(
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join(DATA_DIR)
            .join(DB_FILE),
    )
}

/// Value of `--name=value` or `--name value`.
pub fn arg_value(args: &[String], name: &str) -> Option<String> {
    let flag = format!("--{name}");
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() && !next.starts_with("--") {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

pub fn has_flag(args: &[String], name: &str) -> bool {
    let flag = format!("--{name}");
    args.iter().any(|a| *a == flag)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_or(value: Option<String>, default: u32) -> u32 {
    value
        .and_then(|v| v.trim().parse::<u32>().ok())
        .filter(|v| *v > 0)
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn arg_forms() {
        let a = args(&["--db=/tmp/x.sqlite", "--league", "B", "--verbose"]);
        assert_eq!(arg_value(&a, "db").as_deref(), Some("/tmp/x.sqlite"));
        assert_eq!(arg_value(&a, "league").as_deref(), Some("B"));
        assert_eq!(arg_value(&a, "verbose"), None);
        assert!(has_flag(&a, "verbose"));
        assert!(!has_flag(&a, "dry-run"));
    }

    #[test]
    fn db_path_precedence() {
        let vars = env(&[(DB_ENV, "/env/league.sqlite"), ("HOME", "/home/u")]);
        let lookup = |k: &str| vars.get(k).cloned();

        let s = Settings::from_lookup(&args(&["--db", "/arg.sqlite"]), lookup);
        assert_eq!(s.db_path, PathBuf::from("/arg.sqlite"));

        let s = Settings::from_lookup(&[], lookup);
        assert_eq!(s.db_path, PathBuf::from("/env/league.sqlite"));

        let vars = env(&[("HOME", "/home/u")]);
        let s = Settings::from_lookup(&[], |k: &str| vars.get(k).cloned());
        assert_eq!(
            s.db_path,
            PathBuf::from("/home/u/.local/share/courtside/league.sqlite")
        );

        let s = Settings::from_lookup(&[], |_: &str| None);
        assert_eq!(s.db_path, PathBuf::from("league.sqlite"));
    }

    #[test]
    fn tiers_and_seed() {
        let vars = env(&[
            (TEAM_TOP_TIER_ENV, "3"),
            (PLAYER_TOP_TIER_ENV, "zero"),
            (SHUFFLE_SEED_ENV, "42"),
        ]);
        let s = Settings::from_lookup(&[], |k: &str| vars.get(k).cloned());
        assert_eq!(s.team_top_tier, 3);
        assert_eq!(s.player_top_tier, PLAYER_TOP_TIER);
        assert_eq!(s.shuffle_seed, Some(42));

        let s = Settings::from_lookup(&args(&["--seed=7"]), |k: &str| vars.get(k).cloned());
        assert_eq!(s.shuffle_seed, Some(7));
    }
}
