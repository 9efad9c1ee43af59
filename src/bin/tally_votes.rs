use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::Deserialize;

use courtside::config::{self, Settings};
use courtside::model::{Ballot, PlayerId};
use courtside::store;
use courtside::vote_tally::{self, TallyMode};

const USAGE: &str = "usage: tally_votes --event ID [--mode direct|positioned|awards] \
     [--submit BALLOTS.json (user_id, player_id, category, place or weight)] [--override CATEGORY:PLAYER:RANK] [--publish] [--db PATH]";

#[derive(Debug, Deserialize)]
struct BallotInput {
    user_id: u32,
    player_id: PlayerId,
    category: String,
    /// Award placing (1st, 2nd, 3rd); takes precedence over `weight`.
    #[serde(default)]
    place: Option<u32>,
    #[serde(default)]
    weight: Option<i64>,
}

impl BallotInput {
    fn resolved_weight(&self) -> i64 {
        match self.place {
            Some(place) => vote_tally::award_weight(place),
            None => self.weight.unwrap_or(1),
        }
    }
}

fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let settings = Settings::load(&args);
    config::init_logging();

    let event_id = config::arg_value(&args, "event")
        .and_then(|s| s.parse::<u32>().ok())
        .ok_or_else(|| anyhow!(USAGE))?;
    let mode = config::arg_value(&args, "mode")
        .map(|raw| raw.parse::<TallyMode>())
        .transpose()?
        .unwrap_or(TallyMode::Direct);
    let mut conn = store::open_db(&settings.db_path)?;

    if let Some(file) = config::arg_value(&args, "submit") {
        let path = PathBuf::from(file);
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("read ballots file {}", path.display()))?;
        let inputs: Vec<BallotInput> =
            serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
        let mut per_user: BTreeMap<u32, Vec<Ballot>> = BTreeMap::new();
        for b in inputs {
            let weight = b.resolved_weight();
            per_user.entry(b.user_id).or_default().push(Ballot {
                id: 0,
                event_id,
                user_id: b.user_id,
                player_id: b.player_id,
                category: b.category,
                weight,
            });
        }
        for (user_id, ballots) in &per_user {
            let mut categories: Vec<&str> = ballots.iter().map(|b| b.category.as_str()).collect();
            categories.sort_unstable();
            categories.dedup();
            store::submit_ballots(&mut conn, event_id, *user_id, &categories, ballots)?;
        }
        println!("Submitted ballots for {} voters", per_user.len());
    }

    let ballots = store::load_ballots(&conn, event_id)?;
    let mut tallies = vote_tally::tally(event_id, &ballots, mode)?;

    for raw in args
        .iter()
        .enumerate()
        .filter(|(_, a)| a.as_str() == "--override")
        .filter_map(|(idx, _)| args.get(idx + 1))
    {
        let (category, player_id, rank) = parse_override(raw)?;
        if !vote_tally::override_rank(&mut tallies, &category, player_id, rank) {
            warn!("override {raw:?} matched no result");
        }
    }

    for t in &tallies {
        println!("{}{}", t.category, if t.tie { "  (tie)" } else { "" });
        if t.tie {
            warn!("category {:?} has tied scores", t.category);
        }
        for r in &t.results {
            println!("  {:>2}. player {:<6} {:>4}  {}", r.rank, r.player_id, r.score, r.category);
        }
    }

    if config::has_flag(&args, "publish") {
        let results = vote_tally::flatten_results(&tallies);
        let published = store::publish_vote_results(&mut conn, event_id, &results)?;
        println!("Published {published} results for event {event_id}");
    }
    Ok(())
}

/// `CATEGORY:PLAYER:RANK`; the category itself may contain colons.
fn parse_override(raw: &str) -> Result<(String, PlayerId, u32)> {
    let mut parts = raw.rsplitn(3, ':');
    let rank = parts.next();
    let player = parts.next();
    let category = parts.next();
    match (category, player, rank) {
        (Some(category), Some(player), Some(rank)) => Ok((
            category.to_string(),
            player.trim().parse().context("override player id")?,
            rank.trim().parse().context("override rank")?,
        )),
        _ => Err(anyhow!("invalid override {raw:?}, expected CATEGORY:PLAYER:RANK")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placings_map_to_award_weights() {
        let inputs: Vec<BallotInput> = serde_json::from_str(
            r#"[
                {"user_id": 1, "player_id": 40, "category": "Awards A/Center", "place": 1},
                {"user_id": 1, "player_id": 41, "category": "Awards A/Center", "place": 3},
                {"user_id": 1, "player_id": 42, "category": "MVP A", "weight": 2},
                {"user_id": 1, "player_id": 43, "category": "MVP A"}
            ]"#,
        )
        .expect("ballot json");
        let weights: Vec<i64> = inputs.iter().map(BallotInput::resolved_weight).collect();
        assert_eq!(weights, vec![5, 1, 2, 1]);
    }

    #[test]
    fn override_category_may_contain_colons() {
        let (category, player, rank) = parse_override("Awards: A/Center:11:1").expect("override");
        assert_eq!((category.as_str(), player, rank), ("Awards: A/Center", 11, 1));
        assert!(parse_override("11:1").is_err());
    }
}
