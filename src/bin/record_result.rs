use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;

use courtside::config::{self, Settings};
use courtside::model::{Game, PlayerId, StatLine};
use courtside::slots;
use courtside::store;

const USAGE: &str = "usage: record_result --game ID (--stats FILE.json | --forfeit TEAM_ID | --delete) [--db PATH]\n\
       record_result --add --date YYYY-MM-DD --time HH:MM --home TEAM_ID --away TEAM_ID [--season ID]";

/// One player's line in the box-score file; omitted counters are zero.
#[derive(Debug, Deserialize)]
struct StatInput {
    player_id: PlayerId,
    #[serde(flatten)]
    line: StatLine,
}

fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let settings = Settings::load(&args);
    config::init_logging();
    let mut conn = store::open_db(&settings.db_path)?;

    if config::has_flag(&args, "add") {
        let season_id = store::season_or_current(
            &conn,
            config::arg_value(&args, "season").and_then(|s| s.parse().ok()),
        )?;
        let spec = slots::manual_game(
            &required(&args, "date")?,
            &required(&args, "time")?,
            required_id(&args, "home")?,
            required_id(&args, "away")?,
            None,
        )?;
        let id = store::insert_manual_game(&mut conn, season_id, &spec)?;
        println!("Added game {id}: {} {}", spec.date, spec.time);
        return Ok(());
    }

    let game_id = required_id(&args, "game")?;

    if config::has_flag(&args, "delete") {
        if store::delete_game(&mut conn, game_id)? {
            println!("Deleted game {game_id}");
        } else {
            println!("Game {game_id} not found");
        }
        return Ok(());
    }

    if let Some(winner) = config::arg_value(&args, "forfeit") {
        let winner = winner
            .parse::<u32>()
            .with_context(|| format!("invalid team id {winner:?}"))?;
        let game = store::record_forfeit(&mut conn, game_id, winner)?;
        print_game(&game);
        return Ok(());
    }

    let path = PathBuf::from(required(&args, "stats")?);
    let raw = std::fs::read_to_string(&path)
        .with_context(|| format!("read box score file {}", path.display()))?;
    let inputs: Vec<StatInput> =
        serde_json::from_str(&raw).with_context(|| format!("parse {}", path.display()))?;
    let lines: Vec<(PlayerId, StatLine)> =
        inputs.into_iter().map(|i| (i.player_id, i.line)).collect();
    let game = store::record_result(&mut conn, game_id, &lines)?;
    print_game(&game);
    Ok(())
}

fn required(args: &[String], name: &str) -> Result<String> {
    config::arg_value(args, name).ok_or_else(|| anyhow!("missing --{name}\n{USAGE}"))
}

fn required_id(args: &[String], name: &str) -> Result<u32> {
    let raw = required(args, name)?;
    raw.parse::<u32>()
        .with_context(|| format!("--{name} expects a numeric id, got {raw:?}"))
}

fn print_game(game: &Game) {
    let status = if game.is_forfeit() { " (forfeit)" } else { "" };
    println!(
        "Game {}: {} - {}{}",
        game.id, game.home_score, game.away_score, status
    );
    if let Some(at) = &game.result_recorded_at {
        println!("Recorded at {at}");
    }
}
