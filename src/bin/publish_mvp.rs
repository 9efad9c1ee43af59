use anyhow::Result;
use chrono::Utc;
use log::info;

use courtside::config::{self, Settings};
use courtside::impact::{ImpactWindow, build_candidates};
use courtside::model::{CandidateType, League};
use courtside::store;

fn main() -> Result<()> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let settings = Settings::load(&args);
    config::init_logging();

    let kind = config::arg_value(&args, "type")
        .map(|raw| raw.parse::<CandidateType>())
        .transpose()?
        .unwrap_or(CandidateType::Weekly);
    let leagues = match config::arg_value(&args, "league") {
        Some(raw) => vec![raw.parse::<League>()?],
        None => League::ALL.to_vec(),
    };
    let window = match (config::arg_value(&args, "from"), config::arg_value(&args, "to")) {
        (Some(from), Some(to)) => ImpactWindow::new(&from, &to)?,
        _ => {
            let reference = config::arg_value(&args, "date")
                .unwrap_or_else(|| Utc::now().date_naive().format("%Y-%m-%d").to_string());
            ImpactWindow::for_candidate_type(kind, &reference)?
        }
    };

    let mut conn = store::open_db(&settings.db_path)?;
    let season_id = store::season_or_current(
        &conn,
        config::arg_value(&args, "season").and_then(|s| s.parse().ok()),
    )?;
    let snapshot = store::load_snapshot(&conn, season_id)?;
    info!(
        "{} window {} .. {} over season {season_id}",
        kind.tag(),
        window.from,
        window.to
    );

    for league in leagues {
        let candidates = build_candidates(&snapshot, &window, league, kind);
        store::publish_mvp_candidates(&mut conn, league, kind, &candidates)?;
        println!("{league} {} MVP candidates ({} .. {})", kind.tag(), window.from, window.to);
        if candidates.is_empty() {
            println!("  no games in window");
        }
        for (idx, c) in candidates.iter().enumerate() {
            let name = snapshot
                .player(c.player_id)
                .map(|p| p.name.as_str())
                .unwrap_or("?");
            println!(
                "  {}. {:<20} {:>6.1}  {} GP  {:.1} pts  team {}-{}",
                idx + 1,
                name,
                c.score,
                c.games,
                c.averages.pts,
                c.team_wins,
                c.team_losses
            );
        }
    }
    Ok(())
}
