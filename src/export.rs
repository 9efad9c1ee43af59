use std::path::Path;

use anyhow::{Context, Result};
use log::info;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::model::{League, LeagueSnapshot};
use crate::player_stats::{LEADERS_LIMIT, compute_player_stats, stats_leaders};
use crate::standings::compute_standings;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub standings: usize,
    pub players: usize,
    pub leaders: usize,
    pub games: usize,
}

/// Writes standings, player averages, leaders and the calendar of one season.
pub fn export_season(path: &Path, snapshot: &LeagueSnapshot) -> Result<ExportReport> {
    let season_id = snapshot.season_id;
    let mut report = ExportReport::default();

    let mut standings_rows = vec![header(&[
        "League", "Pos", "Team", "GP", "W", "L", "FW", "FL", "Pts", "PF", "PA", "Diff", "PPG",
        "OPPG", "FG%", "3P%", "FT%", "Form", "Streak",
    ])];
    for league in League::ALL {
        for (pos, row) in compute_standings(snapshot, season_id, Some(league))
            .iter()
            .enumerate()
        {
            standings_rows.push(vec![
                league.to_string(),
                (pos + 1).to_string(),
                row.team_name.clone(),
                row.games_played.to_string(),
                row.wins.to_string(),
                row.losses.to_string(),
                row.forfeit_wins.to_string(),
                row.forfeit_losses.to_string(),
                row.points.to_string(),
                row.points_for.to_string(),
                row.points_against.to_string(),
                row.diff.to_string(),
                fmt1(row.avg_pf),
                fmt1(row.avg_pa),
                fmt1(row.fg_pct),
                fmt1(row.three_p_pct),
                fmt1(row.ft_pct),
                row.form.clone(),
                row.streak.clone(),
            ]);
            report.standings += 1;
        }
    }

    let players = compute_player_stats(snapshot, season_id, None);
    let mut player_rows = vec![header(&[
        "Player", "Team", "GP", "PTS", "REB", "AST", "STL", "BLK", "TOV", "PF", "FG%", "3P%",
        "FT%",
    ])];
    for p in &players {
        player_rows.push(vec![
            p.player_name.clone(),
            p.team_name.clone(),
            p.games_played.to_string(),
            fmt1(p.avg_pts),
            fmt1(p.avg_reb),
            fmt1(p.avg_ast),
            fmt1(p.avg_stl),
            fmt1(p.avg_blk),
            fmt1(p.avg_turnover),
            fmt1(p.avg_foul),
            fmt1(p.fg_pct),
            fmt1(p.three_p_pct),
            fmt1(p.ft_pct),
        ]);
    }
    report.players = players.len();

    let mut leader_rows = vec![header(&["Category", "Rank", "Player", "Value"])];
    for board in stats_leaders(&players, LEADERS_LIMIT) {
        for (idx, entry) in board.entries.iter().enumerate() {
            leader_rows.push(vec![
                board.category.label().to_string(),
                (idx + 1).to_string(),
                entry.player_name.clone(),
                fmt1(entry.value),
            ]);
            report.leaders += 1;
        }
    }

    let team_name = |id: u32| {
        snapshot
            .team(id)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("#{id}"))
    };
    let mut game_rows = vec![header(&["Date", "Time", "Home", "Away", "Score", "Status"])];
    for g in snapshot.games.iter().filter(|g| g.season_id == season_id) {
        let status = if !g.finished {
            "scheduled"
        } else if g.is_forfeit() {
            "forfeit"
        } else {
            "final"
        };
        game_rows.push(vec![
            g.date.clone(),
            g.time.clone(),
            team_name(g.home_team_id),
            team_name(g.away_team_id),
            if g.finished {
                format!("{}-{}", g.home_score, g.away_score)
            } else {
                String::new()
            },
            status.to_string(),
        ]);
        report.games += 1;
    }

    let mut workbook = Workbook::new();
    for (name, rows) in [
        ("Standings", &standings_rows),
        ("PlayerStats", &player_rows),
        ("Leaders", &leader_rows),
        ("Schedule", &game_rows),
    ] {
        let sheet = workbook.add_worksheet();
        sheet.set_name(name)?;
        write_rows(sheet, rows)?;
    }
    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;
    info!(
        "exported season {season_id} to {}: {} standings rows, {} players",
        path.display(),
        report.standings,
        report.players
    );
    Ok(report)
}

fn header(cols: &[&str]) -> Vec<String> {
    cols.iter().map(|c| c.to_string()).collect()
}

fn fmt1(v: f64) -> String {
    format!("{v:.1}")
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (r, row) in rows.iter().enumerate() {
        for (c, value) in row.iter().enumerate() {
            worksheet
                .write_string(r as u32, c as u16, value)
                .with_context(|| format!("write cell ({r},{c})"))?;
        }
    }
    Ok(())
}
