use anyhow::{Context, Result, anyhow};
use log::{info, warn};

use courtside::config::{self, Settings};
use courtside::error::LeagueError;
use courtside::fixtures::{self, CrossLeaguePolicy, FixturePlan, LegMode};
use courtside::model::{League, TeamId};
use courtside::slots::{self, GameSpec, SlotRequest};
use courtside::store;

const USAGE: &str = "usage: auto_schedule --start YYYY-MM-DD --days 0,2 --times 19:00,20:30 \
     [--legs single|double] [--cross skip|wrap] [--season ID] [--seed N] [--replace] [--dry-run] [--db PATH]";

fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let settings = Settings::load(&args);
    config::init_logging();

    let start_date = config::arg_value(&args, "start").ok_or_else(|| anyhow!(USAGE))?;
    let weekdays = slots::parse_weekdays_list(
        &config::arg_value(&args, "days").ok_or_else(|| anyhow!(USAGE))?,
    )?;
    let times =
        slots::parse_times_list(&config::arg_value(&args, "times").ok_or_else(|| anyhow!(USAGE))?)?;
    let legs = config::arg_value(&args, "legs")
        .map(|raw| raw.parse::<LegMode>())
        .transpose()?
        .unwrap_or(LegMode::Double);
    let policy = config::arg_value(&args, "cross")
        .map(|raw| raw.parse::<CrossLeaguePolicy>())
        .transpose()?
        .unwrap_or_default();

    let mut conn = store::open_db(&settings.db_path)?;
    let season_id = store::season_or_current(
        &conn,
        config::arg_value(&args, "season").and_then(|s| s.parse().ok()),
    )?;

    let teams = store::load_teams(&conn)?;
    let roster = |league: League| -> Vec<TeamId> {
        teams
            .iter()
            .filter(|t| t.active && t.league == league)
            .map(|t| t.id)
            .collect()
    };
    let (a, b) = (roster(League::A), roster(League::B));
    let plan = build_plan(&a, &b, legs, policy)?;
    info!(
        "season {season_id}: {} matches over {} rounds",
        plan.match_count(),
        plan.leg_one.len() + plan.cross.len() + plan.leg_two.len()
    );

    let request = SlotRequest {
        start_date,
        weekdays,
        times,
        shuffle_seed: settings.shuffle_seed,
    };
    let specs: Vec<GameSpec> = slots::assign_slots(&plan.into_rounds(), &request)?
        .into_iter()
        .map(GameSpec::from)
        .collect();

    if config::has_flag(&args, "dry-run") {
        let json = serde_json::to_string_pretty(&specs).context("serialize schedule")?;
        println!("{json}");
        return Ok(());
    }

    if config::has_flag(&args, "replace") {
        let removed = store::delete_season_games(&mut conn, season_id)?;
        if removed > 0 {
            warn!("replaced {removed} existing games in season {season_id}");
        }
    }
    let inserted = store::insert_games(&mut conn, season_id, &specs)?;
    println!("Schedule created");
    println!("DB: {}", settings.db_path.display());
    println!("Season: {season_id}");
    println!("Games: {inserted}");
    if let (Some(first), Some(last)) = (specs.first(), specs.last()) {
        println!("Range: {} .. {}", first.date, last.date);
    }
    Ok(())
}

fn build_plan(
    a: &[TeamId],
    b: &[TeamId],
    legs: LegMode,
    policy: CrossLeaguePolicy,
) -> Result<FixturePlan<TeamId>> {
    match (a.is_empty(), b.is_empty()) {
        (false, false) => {
            fixtures::validate_roster(a)?;
            fixtures::validate_roster(b)?;
            Ok(fixtures::two_leagues(a, b, legs, policy))
        }
        (false, true) => {
            fixtures::validate_roster(a)?;
            Ok(fixtures::single_league(a, legs))
        }
        (true, false) => {
            fixtures::validate_roster(b)?;
            Ok(fixtures::single_league(b, legs))
        }
        (true, true) => Err(LeagueError::NotEnoughTeams(0).into()),
    }
}
