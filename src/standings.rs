use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::model::{
    Game, GameId, League, LeagueSnapshot, Outcome, SeasonId, StatLine, Team, per_game, percentage,
};

pub const WIN_POINTS: u32 = 3;
pub const LOSS_POINTS: u32 = 1;
pub const FORFEIT_LOSS_POINTS: u32 = 0;
const FORM_LEN: usize = 5;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team_id: u32,
    pub team_name: String,
    pub league: Option<League>,
    pub games_played: u32,
    pub wins: u32,
    pub losses: u32,
    pub forfeit_wins: u32,
    pub forfeit_losses: u32,
    pub points: u32,
    pub points_for: u32,
    pub points_against: u32,
    pub diff: i64,
    /// Games that count towards averages (finished, not forfeited).
    pub stats_games_played: u32,
    pub avg_pf: f64,
    pub avg_pa: f64,
    pub avg_reb: f64,
    pub avg_ast: f64,
    pub avg_stl: f64,
    pub avg_blk: f64,
    pub avg_turnover: f64,
    pub avg_foul: f64,
    pub avg_fgm: f64,
    pub avg_fga: f64,
    pub avg_three_pm: f64,
    pub avg_three_pa: f64,
    pub avg_ftm: f64,
    pub avg_fta: f64,
    pub fg_pct: f64,
    pub three_p_pct: f64,
    pub ft_pct: f64,
    /// Last five results, most recent first, e.g. `W-W-L`.
    pub form: String,
    /// Current run, e.g. `W3`.
    pub streak: String,
}

/// League table for one season, optionally restricted to one league.
///
/// Recomputed from games and box scores on every call.
pub fn compute_standings(
    snapshot: &LeagueSnapshot,
    season_id: SeasonId,
    league: Option<League>,
) -> Vec<StandingsRow> {
    let mut rows: Vec<StandingsRow> = snapshot
        .teams
        .iter()
        .filter(|t| league.is_none_or(|l| t.league == l))
        .filter_map(|team| team_row(snapshot, season_id, team))
        .collect();
    sort_standings(&mut rows);
    rows
}

/// Points, then differential, then scoring average. Stable, so full ties keep input order.
pub fn sort_standings(rows: &mut [StandingsRow]) {
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.diff.cmp(&a.diff))
            .then(b.avg_pf.total_cmp(&a.avg_pf))
    });
}

fn team_row(snapshot: &LeagueSnapshot, season_id: SeasonId, team: &Team) -> Option<StandingsRow> {
    let mut games: Vec<&Game> = snapshot
        .games
        .iter()
        .filter(|g| g.season_id == season_id && g.finished && g.involves(team.id))
        .collect();
    if games.is_empty() && !team.active {
        return None;
    }
    // Most recent first.
    games.sort_by(|a, b| {
        b.date
            .cmp(&a.date)
            .then(b.time.cmp(&a.time))
            .then(b.id.cmp(&a.id))
    });

    let mut row = StandingsRow {
        team_id: team.id,
        team_name: team.name.clone(),
        league: Some(team.league),
        games_played: games.len() as u32,
        ..StandingsRow::default()
    };
    let mut counted: HashSet<GameId> = HashSet::new();
    let mut letters = Vec::with_capacity(games.len());

    for game in &games {
        let forfeit = game.is_forfeit();
        let outcome = game.outcome_for(team.id);
        match (outcome, forfeit) {
            (Outcome::Win, false) => row.wins += 1,
            (Outcome::Win, true) => {
                row.wins += 1;
                row.forfeit_wins += 1;
            }
            (Outcome::Loss, false) => row.losses += 1,
            (Outcome::Loss, true) => {
                row.losses += 1;
                row.forfeit_losses += 1;
            }
            (Outcome::NoResult, _) => {}
        }
        letters.push(outcome.letter());

        if !forfeit {
            let (pf, pa) = game.score_for(team.id);
            row.points_for += pf;
            row.points_against += pa;
            counted.insert(game.id);
        }
    }

    row.points = row.wins * WIN_POINTS
        + (row.losses - row.forfeit_losses) * LOSS_POINTS
        + row.forfeit_losses * FORFEIT_LOSS_POINTS;
    row.stats_games_played = counted.len() as u32;
    row.diff = row.points_for as i64 - row.points_against as i64;
    let n = row.stats_games_played;
    row.avg_pf = per_game(row.points_for, n);
    row.avg_pa = per_game(row.points_against, n);

    let mut totals = StatLine::default();
    for entry in snapshot
        .box_scores
        .iter()
        .filter(|e| e.team_id == team.id && counted.contains(&e.game_id))
    {
        totals.add(&entry.line);
    }
    row.avg_reb = per_game(totals.reb, n);
    row.avg_ast = per_game(totals.ast, n);
    row.avg_stl = per_game(totals.stl, n);
    row.avg_blk = per_game(totals.blk, n);
    row.avg_turnover = per_game(totals.turnover, n);
    row.avg_foul = per_game(totals.foul, n);
    row.avg_fgm = per_game(totals.fgm, n);
    row.avg_fga = per_game(totals.fga, n);
    row.avg_three_pm = per_game(totals.three_pm, n);
    row.avg_three_pa = per_game(totals.three_pa, n);
    row.avg_ftm = per_game(totals.ftm, n);
    row.avg_fta = per_game(totals.fta, n);
    // From summed makes and attempts, never an average of per-game percentages.
    row.fg_pct = percentage(totals.fgm, totals.fga);
    row.three_p_pct = percentage(totals.three_pm, totals.three_pa);
    row.ft_pct = percentage(totals.ftm, totals.fta);

    row.form = form_string(&letters);
    row.streak = streak_label(&letters);
    Some(row)
}

/// `letters` must be ordered most recent first.
pub fn form_string(letters: &[char]) -> String {
    if letters.is_empty() {
        return "-".to_string();
    }
    letters
        .iter()
        .take(FORM_LEN)
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("-")
}

/// `letters` must be ordered most recent first.
pub fn streak_label(letters: &[char]) -> String {
    let Some(&current) = letters.first() else {
        return "-".to_string();
    };
    let run = letters.iter().take_while(|&&c| c == current).count();
    format!("{current}{run}")
}
