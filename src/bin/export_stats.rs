use std::path::PathBuf;

use anyhow::Result;

use courtside::config::{self, Settings};
use courtside::export;
use courtside::store;

fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let settings = Settings::load(&args);
    config::init_logging();

    let conn = store::open_db(&settings.db_path)?;
    let season_id = store::season_or_current(
        &conn,
        config::arg_value(&args, "season").and_then(|s| s.parse().ok()),
    )?;
    let out = config::arg_value(&args, "out")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(format!("courtside_season_{season_id}.xlsx")));

    let snapshot = store::load_snapshot(&conn, season_id)?;
    let report = export::export_season(&out, &snapshot)?;

    println!("Export complete");
    println!("File: {}", out.display());
    println!("Standings rows: {}", report.standings);
    println!("Players: {}", report.players);
    println!("Leader rows: {}", report.leaders);
    println!("Games: {}", report.games);
    Ok(())
}
