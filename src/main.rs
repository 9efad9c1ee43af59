use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

use courtside::config::{self, Settings};
use courtside::model::{Game, League, LeagueSnapshot};
use courtside::player_stats::{
    LEADERS_LIMIT, LeaderBoard, PlayerSeasonStats, compute_player_stats, stats_leaders,
};
use courtside::slots::parse_date;
use courtside::standings::{StandingsRow, compute_standings};
use courtside::stat_rank::{
    StatRankResult, Tier, analyze_sources, player_fields, team_fields,
};
use courtside::store;

const UPCOMING_LIMIT: usize = 10;

#[derive(Serialize)]
struct Overview {
    season_id: u32,
    standings: Vec<(League, Vec<StandingsRow>)>,
    leaders: Vec<LeaderBoard>,
    upcoming: Vec<Game>,
}

fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let settings = Settings::load(&args);
    config::init_logging();

    let conn = store::open_db(&settings.db_path)?;
    let season_id = store::season_or_current(
        &conn,
        config::arg_value(&args, "season").and_then(|s| s.parse().ok()),
    )?;
    let snapshot = store::load_snapshot(&conn, season_id)?;
    info!(
        "loaded season {season_id}: {} teams, {} games",
        snapshot.teams.len(),
        snapshot.games.len()
    );

    let team_arg = config::arg_value(&args, "team").and_then(|s| s.parse::<u32>().ok());
    if config::has_flag(&args, "schedule") {
        let date = schedule_date(&args)?;
        let games = store::load_schedule(&conn, season_id, team_arg, date.as_deref())?;
        if config::has_flag(&args, "json") {
            let json = serde_json::to_string_pretty(&games).context("serialize schedule")?;
            println!("{json}");
            return Ok(());
        }
        print_schedule(&snapshot, &games);
        return Ok(());
    }
    if let Some(team_id) = team_arg {
        return print_team_report(&snapshot, team_id, settings.team_top_tier);
    }
    if let Some(player_id) = config::arg_value(&args, "player").and_then(|s| s.parse::<u32>().ok())
    {
        return print_player_report(&snapshot, player_id, settings.player_top_tier);
    }

    let overview = Overview {
        season_id,
        standings: League::ALL
            .iter()
            .map(|&l| (l, compute_standings(&snapshot, season_id, Some(l))))
            .collect(),
        leaders: stats_leaders(
            &compute_player_stats(&snapshot, season_id, None),
            LEADERS_LIMIT,
        ),
        upcoming: upcoming_games(&snapshot),
    };

    if config::has_flag(&args, "json") {
        let json = serde_json::to_string_pretty(&overview).context("serialize overview")?;
        println!("{json}");
        return Ok(());
    }
    print_overview(&snapshot, &overview);
    Ok(())
}

fn upcoming_games(snapshot: &LeagueSnapshot) -> Vec<Game> {
    let mut games: Vec<Game> = snapshot
        .games
        .iter()
        .filter(|g| !g.finished)
        .cloned()
        .collect();
    games.sort_by(|a, b| a.date.cmp(&b.date).then(a.time.cmp(&b.time)));
    games.truncate(UPCOMING_LIMIT);
    games
}

fn team_name(snapshot: &LeagueSnapshot, id: u32) -> String {
    snapshot
        .team(id)
        .map(|t| t.name.clone())
        .unwrap_or_else(|| format!("#{id}"))
}

fn print_overview(snapshot: &LeagueSnapshot, overview: &Overview) {
    println!("Season {}", overview.season_id);
    for (league, rows) in &overview.standings {
        println!();
        println!("{league}");
        println!(
            "{:>3}  {:<22} {:>3} {:>3} {:>3} {:>4} {:>5} {:>6}  {:<5} {}",
            "#", "Team", "GP", "W", "L", "Pts", "Diff", "PPG", "Form", "Streak"
        );
        for (idx, row) in rows.iter().enumerate() {
            println!(
                "{:>3}  {:<22} {:>3} {:>3} {:>3} {:>4} {:>5} {:>6.1}  {:<5} {}",
                idx + 1,
                row.team_name,
                row.games_played,
                row.wins,
                row.losses,
                row.points,
                row.diff,
                row.avg_pf,
                row.form,
                row.streak
            );
        }
    }

    println!();
    println!("Leaders");
    for board in &overview.leaders {
        let names = board
            .entries
            .iter()
            .map(|e| format!("{} {:.1}", e.player_name, e.value))
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {}: {}", board.category.label(), names);
    }

    println!();
    println!("Upcoming");
    if overview.upcoming.is_empty() {
        println!("  none scheduled");
    }
    for g in &overview.upcoming {
        println!(
            "  {} {}  {} vs {}",
            g.date,
            g.time,
            team_name(snapshot, g.home_team_id),
            team_name(snapshot, g.away_team_id)
        );
    }
}

/// `--date` normalized to the stored `YYYY-MM-DD` form.
fn schedule_date(args: &[String]) -> Result<Option<String>> {
    let date = config::arg_value(args, "date")
        .map(|raw| parse_date(&raw).map(|d| d.format("%Y-%m-%d").to_string()))
        .transpose()?;
    Ok(date)
}

fn print_schedule(snapshot: &LeagueSnapshot, games: &[Game]) {
    if games.is_empty() {
        println!("no games match");
    }
    for g in games {
        let result = if !g.finished {
            String::new()
        } else if g.is_forfeit() {
            "  forfeit".to_string()
        } else {
            format!("  {}-{}", g.home_score, g.away_score)
        };
        println!(
            "{:>5}  {} {}  {} vs {}{}",
            g.id,
            g.date,
            g.time,
            team_name(snapshot, g.home_team_id),
            team_name(snapshot, g.away_team_id),
            result
        );
    }
}

fn print_team_report(snapshot: &LeagueSnapshot, team_id: u32, cutoff: u32) -> Result<()> {
    let team = snapshot
        .team(team_id)
        .with_context(|| format!("team {team_id} not found"))?;
    let cohort = compute_standings(snapshot, snapshot.season_id, Some(team.league));
    println!("{} ({})", team.name, team.league);
    print_ranks(&analyze_sources(team_id, &cohort, &team_fields(), cutoff));
    Ok(())
}

fn print_player_report(snapshot: &LeagueSnapshot, player_id: u32, cutoff: u32) -> Result<()> {
    let player = snapshot
        .player(player_id)
        .with_context(|| format!("player {player_id} not found"))?;
    let cohort: Vec<PlayerSeasonStats> = compute_player_stats(snapshot, snapshot.season_id, None);
    println!("{}", player.name);
    let ranks = analyze_sources(player_id, &cohort, &player_fields(), cutoff);
    if ranks.is_empty() {
        println!("  no games played this season");
    }
    print_ranks(&ranks);
    Ok(())
}

fn print_ranks(results: &[StatRankResult]) {
    for r in results {
        let tier = match r.tier {
            Tier::Top => "top",
            Tier::Good => "good",
            Tier::Average => "",
        };
        println!(
            "  {:<16} {:>6.1}  #{:<3} avg {:>6.1}  {}",
            r.label, r.value, r.rank, r.average, tier
        );
    }
}
