use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use chrono::Utc;
use log::info;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params};

use crate::error::LeagueError;
use crate::model::{
    AveragedLine, Ballot, BoxScoreEntry, CandidateType, Game, GameId, League, LeagueSnapshot,
    MvpCandidate, Player, PlayerId, Season, SeasonId, StatLine, Team, TeamId, VoteResult,
};
use crate::slots::GameSpec;

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let conn =
        Connection::open(path).with_context(|| format!("open sqlite db {}", path.display()))?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("open in-memory sqlite db")?;
    init_schema(&conn)?;
    Ok(conn)
}

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA journal_mode = WAL;
        PRAGMA foreign_keys = ON;
        CREATE TABLE IF NOT EXISTS teams (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            league TEXT NOT NULL,
            active INTEGER NOT NULL DEFAULT 1
        );
        CREATE TABLE IF NOT EXISTS players (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            team_id INTEGER NOT NULL REFERENCES teams(id),
            active INTEGER NOT NULL DEFAULT 1
        );
        CREATE TABLE IF NOT EXISTS seasons (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            is_current INTEGER NOT NULL DEFAULT 0
        );
        CREATE TABLE IF NOT EXISTS games (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            season_id INTEGER NOT NULL REFERENCES seasons(id),
            game_date TEXT NOT NULL,
            start_time TEXT NOT NULL,
            home_team_id INTEGER NOT NULL REFERENCES teams(id),
            away_team_id INTEGER NOT NULL REFERENCES teams(id),
            home_score INTEGER NOT NULL DEFAULT 0,
            away_score INTEGER NOT NULL DEFAULT 0,
            finished INTEGER NOT NULL DEFAULT 0,
            forfeit INTEGER NOT NULL DEFAULT 0,
            winner_id INTEGER NULL,
            loser_id INTEGER NULL,
            result_recorded_at TEXT NULL,
            access_token TEXT NULL,
            CHECK (home_team_id <> away_team_id)
        );
        CREATE INDEX IF NOT EXISTS idx_games_season ON games(season_id);
        CREATE INDEX IF NOT EXISTS idx_games_date ON games(game_date, start_time);

        CREATE TABLE IF NOT EXISTS box_scores (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            game_id INTEGER NOT NULL REFERENCES games(id) ON DELETE CASCADE,
            player_id INTEGER NOT NULL REFERENCES players(id),
            team_id INTEGER NOT NULL,
            pts INTEGER NOT NULL DEFAULT 0,
            reb INTEGER NOT NULL DEFAULT 0,
            ast INTEGER NOT NULL DEFAULT 0,
            stl INTEGER NOT NULL DEFAULT 0,
            blk INTEGER NOT NULL DEFAULT 0,
            foul INTEGER NOT NULL DEFAULT 0,
            turnover INTEGER NOT NULL DEFAULT 0,
            fgm INTEGER NOT NULL DEFAULT 0,
            fga INTEGER NOT NULL DEFAULT 0,
            three_pm INTEGER NOT NULL DEFAULT 0,
            three_pa INTEGER NOT NULL DEFAULT 0,
            ftm INTEGER NOT NULL DEFAULT 0,
            fta INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_box_scores_game ON box_scores(game_id);

        CREATE TABLE IF NOT EXISTS ballots (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id INTEGER NOT NULL,
            user_id INTEGER NOT NULL,
            player_id INTEGER NOT NULL,
            category TEXT NOT NULL,
            weight INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_ballots_event ON ballots(event_id);

        CREATE TABLE IF NOT EXISTS vote_results (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            event_id INTEGER NOT NULL,
            category TEXT NOT NULL,
            player_id INTEGER NOT NULL,
            score INTEGER NOT NULL,
            rank INTEGER NOT NULL CHECK (rank >= 1)
        );

        CREATE TABLE IF NOT EXISTS mvp_candidates (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            player_id INTEGER NOT NULL,
            league TEXT NOT NULL,
            candidate_type TEXT NOT NULL,
            games INTEGER NOT NULL CHECK (games > 0),
            avg_pts REAL NOT NULL,
            avg_reb REAL NOT NULL,
            avg_ast REAL NOT NULL,
            avg_stl REAL NOT NULL,
            avg_blk REAL NOT NULL,
            avg_turnover REAL NOT NULL,
            avg_fgm REAL NOT NULL,
            avg_fga REAL NOT NULL,
            avg_ftm REAL NOT NULL,
            avg_fta REAL NOT NULL,
            score REAL NOT NULL,
            team_wins INTEGER NOT NULL,
            team_losses INTEGER NOT NULL,
            window_from TEXT NOT NULL,
            window_to TEXT NOT NULL,
            published_at TEXT NOT NULL
        );
        "#,
    )
    .context("create sqlite schema")?;
    Ok(())
}

// --- roster ---------------------------------------------------------------

pub fn insert_team(conn: &Connection, name: &str, league: League) -> Result<TeamId> {
    conn.execute(
        "INSERT INTO teams(name, league, active) VALUES (?1, ?2, 1)",
        params![name, league.tag()],
    )
    .with_context(|| format!("insert team {name}"))?;
    last_id(conn)
}

pub fn set_team_active(conn: &Connection, team_id: TeamId, active: bool) -> Result<()> {
    conn.execute(
        "UPDATE teams SET active = ?1 WHERE id = ?2",
        params![bool_to_i64(active), team_id],
    )
    .context("update team active flag")?;
    Ok(())
}

pub fn insert_player(conn: &Connection, name: &str, team_id: TeamId) -> Result<PlayerId> {
    conn.execute(
        "INSERT INTO players(name, team_id, active) VALUES (?1, ?2, 1)",
        params![name, team_id],
    )
    .with_context(|| format!("insert player {name}"))?;
    last_id(conn)
}

pub fn transfer_player(conn: &Connection, player_id: PlayerId, team_id: TeamId) -> Result<()> {
    let changed = conn
        .execute(
            "UPDATE players SET team_id = ?1 WHERE id = ?2",
            params![team_id, player_id],
        )
        .context("transfer player")?;
    if changed == 0 {
        return Err(anyhow!("player {player_id} not found"));
    }
    Ok(())
}

pub fn load_teams(conn: &Connection) -> Result<Vec<Team>> {
    let mut stmt = conn
        .prepare("SELECT id, name, league, active FROM teams ORDER BY id ASC")
        .context("prepare load teams query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, TeamId>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)? != 0,
            ))
        })
        .context("query load teams")?;
    let mut out = Vec::new();
    for row in rows {
        let (id, name, league, active) = row.context("decode team row")?;
        let league = league.parse::<League>()?;
        out.push(Team {
            id,
            name,
            league,
            active,
        });
    }
    Ok(out)
}

pub fn load_players(conn: &Connection) -> Result<Vec<Player>> {
    let mut stmt = conn
        .prepare("SELECT id, name, team_id, active FROM players ORDER BY id ASC")
        .context("prepare load players query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Player {
                id: row.get(0)?,
                name: row.get(1)?,
                team_id: row.get(2)?,
                active: row.get::<_, i64>(3)? != 0,
            })
        })
        .context("query load players")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode player row")?);
    }
    Ok(out)
}

// --- seasons --------------------------------------------------------------

pub fn insert_season(conn: &Connection, name: &str) -> Result<SeasonId> {
    conn.execute(
        "INSERT INTO seasons(name, is_current) VALUES (?1, 0)",
        params![name],
    )
    .with_context(|| format!("insert season {name}"))?;
    last_id(conn)
}

/// Exactly one season is current afterwards.
pub fn set_current_season(conn: &mut Connection, season_id: SeasonId) -> Result<()> {
    let tx = conn.transaction().context("begin season transaction")?;
    tx.execute("UPDATE seasons SET is_current = 0", [])
        .context("clear current season")?;
    let changed = tx
        .execute(
            "UPDATE seasons SET is_current = 1 WHERE id = ?1",
            params![season_id],
        )
        .context("set current season")?;
    if changed != 1 {
        return Err(anyhow!("season {season_id} not found"));
    }
    tx.commit().context("commit season transaction")?;
    Ok(())
}

pub fn current_season_id(conn: &Connection) -> Result<Option<SeasonId>> {
    conn.query_row(
        "SELECT id FROM seasons WHERE is_current = 1 ORDER BY id DESC LIMIT 1",
        [],
        |row| row.get::<_, SeasonId>(0),
    )
    .optional()
    .context("query current season")
}

/// `explicit` when given, otherwise the current season.
pub fn season_or_current(conn: &Connection, explicit: Option<SeasonId>) -> Result<SeasonId> {
    match explicit {
        Some(id) => Ok(id),
        None => current_season_id(conn)?.ok_or_else(|| anyhow!("no current season set")),
    }
}

pub fn load_seasons(conn: &Connection) -> Result<Vec<Season>> {
    let mut stmt = conn
        .prepare("SELECT id, name, is_current FROM seasons ORDER BY id ASC")
        .context("prepare load seasons query")?;
    let rows = stmt
        .query_map([], |row| {
            Ok(Season {
                id: row.get(0)?,
                name: row.get(1)?,
                is_current: row.get::<_, i64>(2)? != 0,
            })
        })
        .context("query load seasons")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode season row")?);
    }
    Ok(out)
}

// --- games ----------------------------------------------------------------

const GAME_COLUMNS: &str = "id, season_id, game_date, start_time, home_team_id, away_team_id, \
     home_score, away_score, finished, forfeit, winner_id, loser_id, result_recorded_at, access_token";

fn game_from_row(row: &Row<'_>) -> rusqlite::Result<Game> {
    Ok(Game {
        id: row.get(0)?,
        season_id: row.get(1)?,
        date: row.get(2)?,
        time: row.get(3)?,
        home_team_id: row.get(4)?,
        away_team_id: row.get(5)?,
        home_score: row.get(6)?,
        away_score: row.get(7)?,
        finished: row.get::<_, i64>(8)? != 0,
        forfeit: row.get::<_, i64>(9)? != 0,
        winner_id: row.get(10)?,
        loser_id: row.get(11)?,
        result_recorded_at: row.get(12)?,
        access_token: row.get(13)?,
    })
}

fn insert_game_tx(tx: &Transaction<'_>, season_id: SeasonId, spec: &GameSpec) -> Result<()> {
    if spec.home_team_id == spec.away_team_id {
        return Err(LeagueError::SameTeam(spec.home_team_id).into());
    }
    tx.execute(
        "INSERT INTO games(season_id, game_date, start_time, home_team_id, away_team_id, access_token)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            season_id,
            spec.date,
            spec.time,
            spec.home_team_id,
            spec.away_team_id,
            spec.access_token,
        ],
    )
    .context("insert game")?;
    Ok(())
}

/// All-or-nothing insert of a generated schedule.
pub fn insert_games(conn: &mut Connection, season_id: SeasonId, specs: &[GameSpec]) -> Result<usize> {
    let tx = conn.transaction().context("begin schedule transaction")?;
    for spec in specs {
        insert_game_tx(&tx, season_id, spec)?;
    }
    tx.commit().context("commit schedule transaction")?;
    info!("inserted {} games into season {season_id}", specs.len());
    Ok(specs.len())
}

pub fn insert_manual_game(conn: &mut Connection, season_id: SeasonId, spec: &GameSpec) -> Result<GameId> {
    let tx = conn.transaction().context("begin game transaction")?;
    insert_game_tx(&tx, season_id, spec)?;
    let id = u32::try_from(tx.last_insert_rowid()).context("game id out of range")?;
    tx.commit().context("commit game transaction")?;
    Ok(id)
}

pub fn load_game(conn: &Connection, game_id: GameId) -> Result<Option<Game>> {
    conn.query_row(
        &format!("SELECT {GAME_COLUMNS} FROM games WHERE id = ?1"),
        params![game_id],
        game_from_row,
    )
    .optional()
    .context("query game")
}

pub fn load_games(conn: &Connection, season_id: SeasonId) -> Result<Vec<Game>> {
    load_schedule(conn, season_id, None, None)
}

/// Season calendar, optionally narrowed to one team and/or one date, in play order.
pub fn load_schedule(
    conn: &Connection,
    season_id: SeasonId,
    team_id: Option<TeamId>,
    date: Option<&str>,
) -> Result<Vec<Game>> {
    let mut stmt = conn
        .prepare(&format!(
            "SELECT {GAME_COLUMNS} FROM games
             WHERE season_id = ?1
               AND (?2 IS NULL OR home_team_id = ?2 OR away_team_id = ?2)
               AND (?3 IS NULL OR game_date = ?3)
             ORDER BY game_date ASC, start_time ASC, id ASC"
        ))
        .context("prepare load games query")?;
    let rows = stmt
        .query_map(params![season_id, team_id, date], game_from_row)
        .context("query load games")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode game row")?);
    }
    Ok(out)
}

/// Replaces the game's box scores and derives the score from player points.
pub fn record_result(
    conn: &mut Connection,
    game_id: GameId,
    lines: &[(PlayerId, StatLine)],
) -> Result<Game> {
    let game = load_game(conn, game_id)?.ok_or(LeagueError::UnknownGame(game_id))?;
    let teams_by_player: HashMap<PlayerId, TeamId> = load_players(conn)?
        .into_iter()
        .map(|p| (p.id, p.team_id))
        .collect();

    let mut sides = Vec::with_capacity(lines.len());
    let (mut home_score, mut away_score) = (0u32, 0u32);
    for (player_id, line) in lines {
        let team_id = teams_by_player
            .get(player_id)
            .copied()
            .filter(|t| game.involves(*t))
            .ok_or(LeagueError::PlayerNotInGame {
                game: game_id,
                player: *player_id,
            })?;
        if team_id == game.home_team_id {
            home_score += line.pts;
        } else {
            away_score += line.pts;
        }
        sides.push((*player_id, team_id, *line));
    }

    let tx = conn.transaction().context("begin result transaction")?;
    tx.execute("DELETE FROM box_scores WHERE game_id = ?1", params![game_id])
        .context("clear box scores")?;
    for (player_id, team_id, line) in &sides {
        insert_box_score(&tx, game_id, *player_id, *team_id, line)?;
    }
    tx.execute(
        "UPDATE games
         SET home_score = ?1, away_score = ?2, finished = 1, forfeit = 0,
             winner_id = NULL, loser_id = NULL, result_recorded_at = ?3
         WHERE id = ?4",
        params![home_score, away_score, Utc::now().to_rfc3339(), game_id],
    )
    .context("update game result")?;
    tx.commit().context("commit result transaction")?;
    info!("recorded result for game {game_id}: {home_score}-{away_score}");

    load_game(conn, game_id)?.ok_or_else(|| anyhow!("game {game_id} vanished after update"))
}

/// Awards the game to `winner_id` without play; existing box scores are dropped.
pub fn record_forfeit(conn: &mut Connection, game_id: GameId, winner_id: TeamId) -> Result<Game> {
    let game = load_game(conn, game_id)?.ok_or(LeagueError::UnknownGame(game_id))?;
    let loser_id = if winner_id == game.home_team_id {
        game.away_team_id
    } else if winner_id == game.away_team_id {
        game.home_team_id
    } else {
        return Err(LeagueError::WinnerNotParticipant {
            game: game_id,
            team: winner_id,
        }
        .into());
    };

    let tx = conn.transaction().context("begin forfeit transaction")?;
    tx.execute("DELETE FROM box_scores WHERE game_id = ?1", params![game_id])
        .context("clear box scores")?;
    tx.execute(
        "UPDATE games
         SET home_score = 0, away_score = 0, finished = 1, forfeit = 1,
             winner_id = ?1, loser_id = ?2, result_recorded_at = ?3
         WHERE id = ?4",
        params![winner_id, loser_id, Utc::now().to_rfc3339(), game_id],
    )
    .context("update forfeit")?;
    tx.commit().context("commit forfeit transaction")?;
    info!("game {game_id} awarded to team {winner_id} by forfeit");

    load_game(conn, game_id)?.ok_or_else(|| anyhow!("game {game_id} vanished after update"))
}

pub fn delete_game(conn: &mut Connection, game_id: GameId) -> Result<bool> {
    let tx = conn.transaction().context("begin delete transaction")?;
    tx.execute("DELETE FROM box_scores WHERE game_id = ?1", params![game_id])
        .context("delete box scores")?;
    let removed = tx
        .execute("DELETE FROM games WHERE id = ?1", params![game_id])
        .context("delete game")?;
    tx.commit().context("commit delete transaction")?;
    Ok(removed > 0)
}

pub fn delete_season_games(conn: &mut Connection, season_id: SeasonId) -> Result<usize> {
    let tx = conn.transaction().context("begin delete transaction")?;
    tx.execute(
        "DELETE FROM box_scores WHERE game_id IN (SELECT id FROM games WHERE season_id = ?1)",
        params![season_id],
    )
    .context("delete season box scores")?;
    let removed = tx
        .execute("DELETE FROM games WHERE season_id = ?1", params![season_id])
        .context("delete season games")?;
    tx.commit().context("commit delete transaction")?;
    info!("deleted {removed} games from season {season_id}");
    Ok(removed)
}

fn insert_box_score(
    tx: &Transaction<'_>,
    game_id: GameId,
    player_id: PlayerId,
    team_id: TeamId,
    l: &StatLine,
) -> Result<()> {
    tx.execute(
        "INSERT INTO box_scores(
            game_id, player_id, team_id, pts, reb, ast, stl, blk, foul, turnover,
            fgm, fga, three_pm, three_pa, ftm, fta
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)",
        params![
            game_id, player_id, team_id, l.pts, l.reb, l.ast, l.stl, l.blk, l.foul, l.turnover,
            l.fgm, l.fga, l.three_pm, l.three_pa, l.ftm, l.fta,
        ],
    )
    .context("insert box score")?;
    Ok(())
}

pub fn load_box_scores(conn: &Connection, season_id: SeasonId) -> Result<Vec<BoxScoreEntry>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT b.id, b.game_id, b.player_id, b.team_id,
                   b.pts, b.reb, b.ast, b.stl, b.blk, b.foul, b.turnover,
                   b.fgm, b.fga, b.three_pm, b.three_pa, b.ftm, b.fta
            FROM box_scores b
            JOIN games g ON g.id = b.game_id
            WHERE g.season_id = ?1
            ORDER BY b.id ASC
            "#,
        )
        .context("prepare load box scores query")?;
    let rows = stmt
        .query_map(params![season_id], |row| {
            Ok(BoxScoreEntry {
                id: row.get(0)?,
                game_id: row.get(1)?,
                player_id: row.get(2)?,
                team_id: row.get(3)?,
                line: StatLine {
                    pts: row.get(4)?,
                    reb: row.get(5)?,
                    ast: row.get(6)?,
                    stl: row.get(7)?,
                    blk: row.get(8)?,
                    foul: row.get(9)?,
                    turnover: row.get(10)?,
                    fgm: row.get(11)?,
                    fga: row.get(12)?,
                    three_pm: row.get(13)?,
                    three_pa: row.get(14)?,
                    ftm: row.get(15)?,
                    fta: row.get(16)?,
                },
            })
        })
        .context("query load box scores")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode box score row")?);
    }
    Ok(out)
}

pub fn load_snapshot(conn: &Connection, season_id: SeasonId) -> Result<LeagueSnapshot> {
    Ok(LeagueSnapshot {
        season_id,
        teams: load_teams(conn)?,
        players: load_players(conn)?,
        games: load_games(conn, season_id)?,
        box_scores: load_box_scores(conn, season_id)?,
    })
}

// --- voting ---------------------------------------------------------------

/// Replaces the user's ballots for `categories` in one transaction.
pub fn submit_ballots(
    conn: &mut Connection,
    event_id: u32,
    user_id: u32,
    categories: &[&str],
    ballots: &[Ballot],
) -> Result<usize> {
    let tx = conn.transaction().context("begin ballot transaction")?;
    for category in categories {
        tx.execute(
            "DELETE FROM ballots WHERE event_id = ?1 AND user_id = ?2 AND category = ?3",
            params![event_id, user_id, category],
        )
        .context("clear previous ballots")?;
    }
    for b in ballots {
        tx.execute(
            "INSERT INTO ballots(event_id, user_id, player_id, category, weight)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![event_id, user_id, b.player_id, b.category, b.weight],
        )
        .context("insert ballot")?;
    }
    tx.commit().context("commit ballot transaction")?;
    Ok(ballots.len())
}

pub fn load_ballots(conn: &Connection, event_id: u32) -> Result<Vec<Ballot>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, event_id, user_id, player_id, category, weight
             FROM ballots WHERE event_id = ?1 ORDER BY id ASC",
        )
        .context("prepare load ballots query")?;
    let rows = stmt
        .query_map(params![event_id], |row| {
            Ok(Ballot {
                id: row.get(0)?,
                event_id: row.get(1)?,
                user_id: row.get(2)?,
                player_id: row.get(3)?,
                category: row.get(4)?,
                weight: row.get(5)?,
            })
        })
        .context("query load ballots")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode ballot row")?);
    }
    Ok(out)
}

/// Swaps the event's published results; readers see either the old set or the new one.
pub fn publish_vote_results(conn: &mut Connection, event_id: u32, results: &[VoteResult]) -> Result<usize> {
    let tx = conn.transaction().context("begin publish transaction")?;
    tx.execute("DELETE FROM vote_results WHERE event_id = ?1", params![event_id])
        .context("clear vote results")?;
    for r in results {
        tx.execute(
            "INSERT INTO vote_results(event_id, category, player_id, score, rank)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![event_id, r.category, r.player_id, r.score, r.rank],
        )
        .context("insert vote result")?;
    }
    tx.commit().context("commit publish transaction")?;
    info!("published {} vote results for event {event_id}", results.len());
    Ok(results.len())
}

pub fn load_vote_results(conn: &Connection, event_id: u32) -> Result<Vec<VoteResult>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, event_id, category, player_id, score, rank
             FROM vote_results WHERE event_id = ?1 ORDER BY category ASC, rank ASC",
        )
        .context("prepare load vote results query")?;
    let rows = stmt
        .query_map(params![event_id], |row| {
            Ok(VoteResult {
                id: row.get(0)?,
                event_id: row.get(1)?,
                category: row.get(2)?,
                player_id: row.get(3)?,
                score: row.get(4)?,
                rank: row.get(5)?,
            })
        })
        .context("query load vote results")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode vote result row")?);
    }
    Ok(out)
}

// --- mvp ------------------------------------------------------------------

/// Replaces the league's candidates of this type in one transaction.
pub fn publish_mvp_candidates(
    conn: &mut Connection,
    league: League,
    kind: CandidateType,
    candidates: &[MvpCandidate],
) -> Result<usize> {
    let published_at = Utc::now().to_rfc3339();
    let tx = conn.transaction().context("begin publish transaction")?;
    tx.execute(
        "DELETE FROM mvp_candidates WHERE league = ?1 AND candidate_type = ?2",
        params![league.tag(), kind.tag()],
    )
    .context("clear mvp candidates")?;
    for c in candidates {
        let a = &c.averages;
        tx.execute(
            r#"
            INSERT INTO mvp_candidates(
                player_id, league, candidate_type, games,
                avg_pts, avg_reb, avg_ast, avg_stl, avg_blk, avg_turnover,
                avg_fgm, avg_fga, avg_ftm, avg_fta,
                score, team_wins, team_losses, window_from, window_to, published_at
            ) VALUES (
                ?1, ?2, ?3, ?4,
                ?5, ?6, ?7, ?8, ?9, ?10,
                ?11, ?12, ?13, ?14,
                ?15, ?16, ?17, ?18, ?19, ?20
            )
            "#,
            params![
                c.player_id,
                league.tag(),
                kind.tag(),
                c.games,
                a.pts,
                a.reb,
                a.ast,
                a.stl,
                a.blk,
                a.turnover,
                a.fgm,
                a.fga,
                a.ftm,
                a.fta,
                c.score,
                c.team_wins,
                c.team_losses,
                c.window_from,
                c.window_to,
                published_at,
            ],
        )
        .context("insert mvp candidate")?;
    }
    tx.commit().context("commit publish transaction")?;
    info!(
        "published {} {} mvp candidates for {league}",
        candidates.len(),
        kind.tag()
    );
    Ok(candidates.len())
}

pub fn load_mvp_candidates(
    conn: &Connection,
    league: League,
    kind: CandidateType,
) -> Result<Vec<MvpCandidate>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT id, player_id, games,
                   avg_pts, avg_reb, avg_ast, avg_stl, avg_blk, avg_turnover,
                   avg_fgm, avg_fga, avg_ftm, avg_fta,
                   score, team_wins, team_losses, window_from, window_to
            FROM mvp_candidates
            WHERE league = ?1 AND candidate_type = ?2
            ORDER BY score DESC, id ASC
            "#,
        )
        .context("prepare load mvp candidates query")?;
    let rows = stmt
        .query_map(params![league.tag(), kind.tag()], |row| {
            Ok(MvpCandidate {
                id: row.get(0)?,
                player_id: row.get(1)?,
                league,
                candidate_type: kind,
                games: row.get(2)?,
                averages: AveragedLine {
                    pts: row.get(3)?,
                    reb: row.get(4)?,
                    ast: row.get(5)?,
                    stl: row.get(6)?,
                    blk: row.get(7)?,
                    turnover: row.get(8)?,
                    fgm: row.get(9)?,
                    fga: row.get(10)?,
                    ftm: row.get(11)?,
                    fta: row.get(12)?,
                },
                score: row.get(13)?,
                team_wins: row.get(14)?,
                team_losses: row.get(15)?,
                window_from: row.get(16)?,
                window_to: row.get(17)?,
            })
        })
        .context("query load mvp candidates")?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.context("decode mvp candidate row")?);
    }
    Ok(out)
}

fn last_id(conn: &Connection) -> Result<u32> {
    u32::try_from(conn.last_insert_rowid()).context("row id out of range")
}

fn bool_to_i64(v: bool) -> i64 {
    if v { 1 } else { 0 }
}
