use std::collections::BTreeMap;
use std::str::FromStr;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::LeagueError;
use crate::model::{Ballot, PlayerId, VoteResult};

const POSITION_SEPARATOR: char = '/';
const AWARD_TEAMS: [&str; 3] = ["1st Team", "2nd Team", "3rd Team"];

/// Award ballots: 1st place 5, 2nd 3, 3rd 1, anything else 0.
pub fn award_weight(place: u32) -> i64 {
    match place {
        1 => 5,
        2 => 3,
        3 => 1,
        _ => 0,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TallyMode {
    /// Weights summed per (category, player) as cast.
    Direct,
    /// Categories are `<context>/<position>`; each player is moved to their best position.
    Positioned,
    /// Positioned, keeping only ranks 1-3 as "1st/2nd/3rd Team".
    Awards,
}

impl FromStr for TallyMode {
    type Err = LeagueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "direct" => Ok(TallyMode::Direct),
            "positioned" | "positions" => Ok(TallyMode::Positioned),
            "awards" => Ok(TallyMode::Awards),
            _ => Err(LeagueError::UnknownOption(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTally {
    pub category: String,
    /// Results carry an "Nth Team" suffix that follows their rank.
    pub awards: bool,
    pub tie: bool,
    pub results: Vec<VoteResult>,
}

/// `"<category> 1st Team"` for ranks 1-3.
pub fn award_label(category: &str, rank: u32) -> Option<String> {
    let team = AWARD_TEAMS.get(rank.checked_sub(1)? as usize)?;
    Some(format!("{category} {team}"))
}

pub fn split_position(category: &str) -> Result<(&str, &str), LeagueError> {
    category
        .split_once(POSITION_SEPARATOR)
        .map(|(ctx, pos)| (ctx.trim(), pos.trim()))
        .filter(|(ctx, pos)| !ctx.is_empty() && !pos.is_empty())
        .ok_or_else(|| LeagueError::InvalidCategory(category.to_string()))
}

pub fn tally(
    event_id: u32,
    ballots: &[Ballot],
    mode: TallyMode,
) -> Result<Vec<CategoryTally>, LeagueError> {
    let sums = match mode {
        TallyMode::Direct => direct_sums(ballots),
        TallyMode::Positioned | TallyMode::Awards => {
            let by_position = accumulate_by_position(ballots)?;
            finalize_best_positions(by_position)
        }
    };

    let mut out = Vec::with_capacity(sums.len());
    for (category, per_player) in sums {
        let (tie, ranked) = rank_category(per_player);
        let results = ranked
            .into_iter()
            .enumerate()
            .filter_map(|(idx, (player_id, score))| {
                let rank = idx as u32 + 1;
                let category = match mode {
                    TallyMode::Awards => award_label(&category, rank)?,
                    _ => category.clone(),
                };
                Some(VoteResult {
                    id: 0,
                    event_id,
                    category,
                    player_id,
                    score,
                    rank,
                })
            })
            .collect();
        out.push(CategoryTally {
            category,
            awards: mode == TallyMode::Awards,
            tie,
            results,
        });
    }
    debug!("tallied {} ballots into {} categories", ballots.len(), out.len());
    Ok(out)
}

fn direct_sums(ballots: &[Ballot]) -> BTreeMap<String, BTreeMap<PlayerId, i64>> {
    let mut sums: BTreeMap<String, BTreeMap<PlayerId, i64>> = BTreeMap::new();
    for b in ballots {
        *sums
            .entry(b.category.clone())
            .or_default()
            .entry(b.player_id)
            .or_default() += b.weight;
    }
    sums
}

type PositionSums = BTreeMap<(String, PlayerId), BTreeMap<String, i64>>;

/// Pass one: weight per (context, player, position). Nothing is ranked here.
fn accumulate_by_position(ballots: &[Ballot]) -> Result<PositionSums, LeagueError> {
    let mut acc: PositionSums = BTreeMap::new();
    for b in ballots {
        let (context, position) = split_position(&b.category)?;
        *acc.entry((context.to_string(), b.player_id))
            .or_default()
            .entry(position.to_string())
            .or_default() += b.weight;
    }
    Ok(acc)
}

/// Pass two: the player's whole weight goes to their best-represented position.
/// Equal position sums resolve to the alphabetically first position.
fn finalize_best_positions(acc: PositionSums) -> BTreeMap<String, BTreeMap<PlayerId, i64>> {
    let mut sums: BTreeMap<String, BTreeMap<PlayerId, i64>> = BTreeMap::new();
    for ((context, player_id), positions) in acc {
        let mut best: Option<(&String, i64)> = None;
        for (position, weight) in &positions {
            if best.is_none_or(|(_, w)| *weight > w) {
                best = Some((position, *weight));
            }
        }
        let Some((position, _)) = best else {
            continue;
        };
        let total: i64 = positions.values().sum();
        sums.entry(format!("{context}{POSITION_SEPARATOR}{position}"))
            .or_default()
            .insert(player_id, total);
    }
    sums
}

/// Highest weight first, player id breaking ties; `tie` is set when any two scores match.
fn rank_category(per_player: BTreeMap<PlayerId, i64>) -> (bool, Vec<(PlayerId, i64)>) {
    let mut ranked: Vec<(PlayerId, i64)> = per_player.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let tie = ranked.windows(2).any(|w| w[0].1 == w[1].1);
    (tie, ranked)
}

pub fn flatten_results(tallies: &[CategoryTally]) -> Vec<VoteResult> {
    tallies
        .iter()
        .flat_map(|t| t.results.iter().cloned())
        .collect()
}

/// Manual tie-break before publishing. Returns false when the entry does not exist.
pub fn override_rank(
    tallies: &mut [CategoryTally],
    category: &str,
    player_id: PlayerId,
    rank: u32,
) -> bool {
    let Some(result) = tallies
        .iter_mut()
        .filter(|t| t.category == category)
        .flat_map(|t| t.results.iter_mut())
        .find(|r| r.player_id == player_id)
    else {
        return false;
    };
    result.rank = rank;
    for t in tallies.iter_mut().filter(|t| t.category == category) {
        t.results.sort_by_key(|r| r.rank);
        if t.awards {
            for r in &mut t.results {
                r.category = award_label(&t.category, r.rank).unwrap_or_else(|| t.category.clone());
            }
        }
    }
    true
}
