use std::collections::{BTreeMap, HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{
    GameId, League, LeagueSnapshot, PlayerId, SeasonId, StatLine, TeamId, per_game, percentage,
};

pub const LEADERS_LIMIT: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerSeasonStats {
    pub player_id: PlayerId,
    pub player_name: String,
    pub team_id: TeamId,
    pub team_name: String,
    pub games_played: u32,
    pub totals: StatLine,
    pub avg_pts: f64,
    pub avg_reb: f64,
    pub avg_ast: f64,
    pub avg_stl: f64,
    pub avg_blk: f64,
    pub avg_foul: f64,
    pub avg_turnover: f64,
    pub avg_fgm: f64,
    pub avg_fga: f64,
    pub avg_three_pm: f64,
    pub avg_three_pa: f64,
    pub avg_ftm: f64,
    pub avg_fta: f64,
    pub fg_pct: f64,
    pub three_p_pct: f64,
    pub ft_pct: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LeaderCategory {
    Points,
    Assists,
    Rebounds,
    Steals,
    Blocks,
}

impl LeaderCategory {
    pub const ALL: [LeaderCategory; 5] = [
        LeaderCategory::Points,
        LeaderCategory::Assists,
        LeaderCategory::Rebounds,
        LeaderCategory::Steals,
        LeaderCategory::Blocks,
    ];

    pub fn label(self) -> &'static str {
        match self {
            LeaderCategory::Points => "Points per game",
            LeaderCategory::Assists => "Assists per game",
            LeaderCategory::Rebounds => "Rebounds per game",
            LeaderCategory::Steals => "Steals per game",
            LeaderCategory::Blocks => "Blocks per game",
        }
    }

    fn value(self, row: &PlayerSeasonStats) -> f64 {
        match self {
            LeaderCategory::Points => row.avg_pts,
            LeaderCategory::Assists => row.avg_ast,
            LeaderCategory::Rebounds => row.avg_reb,
            LeaderCategory::Steals => row.avg_stl,
            LeaderCategory::Blocks => row.avg_blk,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderEntry {
    pub player_id: PlayerId,
    pub player_name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderBoard {
    pub category: LeaderCategory,
    pub entries: Vec<LeaderEntry>,
}

/// Season averages per player over finished, non-forfeited games.
/// Players without a qualifying box score are left out.
pub fn compute_player_stats(
    snapshot: &LeagueSnapshot,
    season_id: SeasonId,
    league: Option<League>,
) -> Vec<PlayerSeasonStats> {
    let counted: HashSet<GameId> = snapshot
        .games
        .iter()
        .filter(|g| g.season_id == season_id && g.finished && !g.is_forfeit())
        .map(|g| g.id)
        .collect();

    let mut per_player: BTreeMap<PlayerId, (StatLine, HashSet<GameId>)> = BTreeMap::new();
    for entry in snapshot
        .box_scores
        .iter()
        .filter(|e| counted.contains(&e.game_id))
    {
        let (totals, games) = per_player.entry(entry.player_id).or_default();
        totals.add(&entry.line);
        games.insert(entry.game_id);
    }

    let team_names: HashMap<TeamId, (&str, League)> = snapshot
        .teams
        .iter()
        .map(|t| (t.id, (t.name.as_str(), t.league)))
        .collect();

    per_player
        .into_iter()
        .filter_map(|(player_id, (totals, games))| {
            let player = snapshot.player(player_id)?;
            let (team_name, team_league) = team_names.get(&player.team_id).copied()?;
            if league.is_some_and(|l| l != team_league) {
                return None;
            }
            Some(season_row(
                player_id,
                player.name.clone(),
                player.team_id,
                team_name.to_string(),
                games.len() as u32,
                totals,
            ))
        })
        .collect()
}

fn season_row(
    player_id: PlayerId,
    player_name: String,
    team_id: TeamId,
    team_name: String,
    games_played: u32,
    totals: StatLine,
) -> PlayerSeasonStats {
    let n = games_played;
    PlayerSeasonStats {
        player_id,
        player_name,
        team_id,
        team_name,
        games_played,
        avg_pts: per_game(totals.pts, n),
        avg_reb: per_game(totals.reb, n),
        avg_ast: per_game(totals.ast, n),
        avg_stl: per_game(totals.stl, n),
        avg_blk: per_game(totals.blk, n),
        avg_foul: per_game(totals.foul, n),
        avg_turnover: per_game(totals.turnover, n),
        avg_fgm: per_game(totals.fgm, n),
        avg_fga: per_game(totals.fga, n),
        avg_three_pm: per_game(totals.three_pm, n),
        avg_three_pa: per_game(totals.three_pa, n),
        avg_ftm: per_game(totals.ftm, n),
        avg_fta: per_game(totals.fta, n),
        fg_pct: percentage(totals.fgm, totals.fga),
        three_p_pct: percentage(totals.three_pm, totals.three_pa),
        ft_pct: percentage(totals.ftm, totals.fta),
        totals,
    }
}

/// Top `limit` per category; equal averages fall back to player id.
pub fn stats_leaders(rows: &[PlayerSeasonStats], limit: usize) -> Vec<LeaderBoard> {
    LeaderCategory::ALL
        .iter()
        .map(|&category| {
            let mut sorted: Vec<&PlayerSeasonStats> = rows.iter().collect();
            sorted.sort_by(|a, b| {
                category
                    .value(b)
                    .total_cmp(&category.value(a))
                    .then(a.player_id.cmp(&b.player_id))
            });
            LeaderBoard {
                category,
                entries: sorted
                    .into_iter()
                    .take(limit)
                    .map(|row| LeaderEntry {
                        player_id: row.player_id,
                        player_name: row.player_name.clone(),
                        value: category.value(row),
                    })
                    .collect(),
            }
        })
        .collect()
}
