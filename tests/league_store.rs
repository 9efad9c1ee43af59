use rusqlite::Connection;

use courtside::error::LeagueError;
use courtside::impact::{ImpactWindow, build_candidates};
use courtside::model::{CandidateType, League, StatLine, TeamId, VoteResult};
use courtside::player_stats::compute_player_stats;
use courtside::slots::manual_game;
use courtside::standings::compute_standings;
use courtside::store;

struct League4 {
    conn: Connection,
    season: u32,
    x: TeamId,
    y: TeamId,
    z: TeamId,
    w: TeamId,
    x_players: [u32; 2],
    y_player: u32,
    z_player: u32,
}

fn pts(pts: u32) -> StatLine {
    StatLine {
        pts,
        fgm: pts / 2,
        fga: pts,
        ..StatLine::default()
    }
}

fn setup() -> League4 {
    let mut conn = store::open_in_memory().expect("in-memory db");
    let season = store::insert_season(&conn, "Spring").expect("season");
    store::set_current_season(&mut conn, season).expect("current season");
    let x = store::insert_team(&conn, "Team X", League::A).expect("team");
    let y = store::insert_team(&conn, "Team Y", League::A).expect("team");
    let z = store::insert_team(&conn, "Team Z", League::A).expect("team");
    let w = store::insert_team(&conn, "Team W", League::A).expect("team");
    let x_players = [
        store::insert_player(&conn, "Ana", x).expect("player"),
        store::insert_player(&conn, "Bo", x).expect("player"),
    ];
    let y_player = store::insert_player(&conn, "Cy", y).expect("player");
    let z_player = store::insert_player(&conn, "Di", z).expect("player");
    League4 {
        conn,
        season,
        x,
        y,
        z,
        w,
        x_players,
        y_player,
        z_player,
    }
}

fn add_game(conn: &mut Connection, season: u32, date: &str, home: TeamId, away: TeamId) -> u32 {
    let spec = manual_game(date, "19:00", home, away, None).expect("valid game");
    store::insert_manual_game(conn, season, &spec).expect("insert game")
}

#[test]
fn team_record_with_a_forfeit() {
    let mut l = setup();
    let g1 = add_game(&mut l.conn, l.season, "2025-04-01", l.x, l.y);
    let g2 = add_game(&mut l.conn, l.season, "2025-04-08", l.z, l.x);
    let g3 = add_game(&mut l.conn, l.season, "2025-04-15", l.x, l.w);

    let [ana, bo] = l.x_players;
    let game = store::record_result(
        &mut l.conn,
        g1,
        &[(ana, pts(30)), (bo, pts(20)), (l.y_player, pts(40))],
    )
    .expect("record g1");
    assert_eq!((game.home_score, game.away_score), (50, 40));
    assert!(game.finished && !game.forfeit);
    assert!(game.result_recorded_at.is_some());

    store::record_result(&mut l.conn, g2, &[(l.z_player, pts(55)), (ana, pts(45))])
        .expect("record g2");
    let forfeit = store::record_forfeit(&mut l.conn, g3, l.x).expect("forfeit");
    assert_eq!(forfeit.winner_id, Some(l.x));
    assert_eq!(forfeit.loser_id, Some(l.w));

    let snapshot = store::load_snapshot(&l.conn, l.season).expect("snapshot");
    let table = compute_standings(&snapshot, l.season, Some(League::A));
    let x = table.iter().find(|r| r.team_id == l.x).expect("team x row");
    assert_eq!((x.wins, x.losses), (2, 1));
    assert_eq!(x.forfeit_wins, 1);
    assert_eq!(x.points, 7);
    assert_eq!(x.avg_pf, 47.5);
    assert_eq!(x.form, "W-L-W");
    assert_eq!(x.streak, "W1");

    let w = table.iter().find(|r| r.team_id == l.w).expect("team w row");
    assert_eq!((w.wins, w.losses, w.points), (0, 1, 0));
    assert_eq!(w.avg_pf, 0.0);

    // Ana: 30 and 45 over two games.
    let players = compute_player_stats(&snapshot, l.season, Some(League::A));
    let ana_row = players.iter().find(|p| p.player_id == ana).expect("ana row");
    assert_eq!(ana_row.games_played, 2);
    assert_eq!(ana_row.avg_pts, 37.5);
}

#[test]
fn forfeit_clears_box_scores_and_result_can_be_reentered() {
    let mut l = setup();
    let g = add_game(&mut l.conn, l.season, "2025-04-01", l.x, l.y);
    let [ana, _] = l.x_players;

    store::record_result(&mut l.conn, g, &[(ana, pts(10)), (l.y_player, pts(12))]).expect("first");
    store::record_result(&mut l.conn, g, &[(ana, pts(21)), (l.y_player, pts(12))]).expect("edit");
    let boxes = store::load_box_scores(&l.conn, l.season).expect("box scores");
    assert_eq!(boxes.len(), 2);
    let game = store::load_game(&l.conn, g).expect("load").expect("game exists");
    assert_eq!((game.home_score, game.away_score), (21, 12));
    assert_eq!(game.winner_id, None);

    store::record_forfeit(&mut l.conn, g, l.y).expect("forfeit");
    assert!(store::load_box_scores(&l.conn, l.season).expect("box scores").is_empty());
    let game = store::load_game(&l.conn, g).expect("load").expect("game exists");
    assert_eq!((game.home_score, game.away_score), (0, 0));
    assert!(game.forfeit);
}

#[test]
fn inconsistent_results_are_rejected_without_writes() {
    let mut l = setup();
    let g = add_game(&mut l.conn, l.season, "2025-04-01", l.x, l.y);

    let err = store::record_forfeit(&mut l.conn, g, l.z).expect_err("z did not play");
    assert_eq!(
        err.downcast_ref::<LeagueError>(),
        Some(&LeagueError::WinnerNotParticipant { game: g, team: l.z })
    );

    let [ana, _] = l.x_players;
    let err = store::record_result(&mut l.conn, g, &[(ana, pts(10)), (l.z_player, pts(3))])
        .expect_err("z player is not in the game");
    assert_eq!(
        err.downcast_ref::<LeagueError>(),
        Some(&LeagueError::PlayerNotInGame { game: g, player: l.z_player })
    );
    let game = store::load_game(&l.conn, g).expect("load").expect("game exists");
    assert!(!game.finished);
    assert!(store::load_box_scores(&l.conn, l.season).expect("box scores").is_empty());

    let err = store::record_result(&mut l.conn, 999, &[]).expect_err("unknown game");
    assert_eq!(err.downcast_ref::<LeagueError>(), Some(&LeagueError::UnknownGame(999)));
}

#[test]
fn deleting_games_cascades_to_box_scores() {
    let mut l = setup();
    let g1 = add_game(&mut l.conn, l.season, "2025-04-01", l.x, l.y);
    let g2 = add_game(&mut l.conn, l.season, "2025-04-02", l.z, l.w);
    let [ana, _] = l.x_players;
    store::record_result(&mut l.conn, g1, &[(ana, pts(10))]).expect("record");
    store::record_result(&mut l.conn, g2, &[(l.z_player, pts(10))]).expect("record");

    assert!(store::delete_game(&mut l.conn, g1).expect("delete"));
    assert!(!store::delete_game(&mut l.conn, g1).expect("second delete"));
    assert_eq!(store::load_box_scores(&l.conn, l.season).expect("box").len(), 1);

    assert_eq!(store::delete_season_games(&mut l.conn, l.season).expect("clear"), 1);
    assert!(store::load_games(&l.conn, l.season).expect("games").is_empty());
    assert!(store::load_box_scores(&l.conn, l.season).expect("box").is_empty());
}

#[test]
fn schedule_view_filters_by_team_and_date() {
    let mut l = setup();
    add_game(&mut l.conn, l.season, "2025-04-08", l.x, l.y);
    add_game(&mut l.conn, l.season, "2025-04-01", l.z, l.x);
    add_game(&mut l.conn, l.season, "2025-04-01", l.y, l.w);

    let all = store::load_games(&l.conn, l.season).expect("games");
    assert_eq!(all.len(), 3);
    assert_eq!(all[0].date, "2025-04-01");

    let x_games = store::load_schedule(&l.conn, l.season, Some(l.x), None).expect("x games");
    assert_eq!(x_games.len(), 2);
    let day = store::load_schedule(&l.conn, l.season, None, Some("2025-04-01")).expect("day");
    assert_eq!(day.len(), 2);
    let both = store::load_schedule(&l.conn, l.season, Some(l.w), Some("2025-04-01")).expect("w");
    assert_eq!(both.len(), 1);
}

#[test]
fn switching_current_season_keeps_exactly_one() {
    let mut l = setup();
    let autumn = store::insert_season(&l.conn, "Autumn").expect("season");
    store::set_current_season(&mut l.conn, autumn).expect("switch");
    assert_eq!(store::current_season_id(&l.conn).expect("current"), Some(autumn));
    let current: Vec<_> = store::load_seasons(&l.conn)
        .expect("seasons")
        .into_iter()
        .filter(|s| s.is_current)
        .collect();
    assert_eq!(current.len(), 1);
    assert!(store::set_current_season(&mut l.conn, 404).is_err());
    assert_eq!(store::current_season_id(&l.conn).expect("current"), Some(autumn));
}

#[test]
fn transferred_players_keep_their_old_box_scores() {
    let mut l = setup();
    let g = add_game(&mut l.conn, l.season, "2025-04-01", l.x, l.y);
    let [ana, _] = l.x_players;
    store::record_result(&mut l.conn, g, &[(ana, pts(20)), (l.y_player, pts(10))]).expect("record");
    store::transfer_player(&l.conn, ana, l.y).expect("transfer");

    let snapshot = store::load_snapshot(&l.conn, l.season).expect("snapshot");
    let table = compute_standings(&snapshot, l.season, None);
    let x = table.iter().find(|r| r.team_id == l.x).expect("x row");
    assert_eq!(x.avg_pf, 20.0);
    assert_eq!(x.avg_fgm, 10.0);
    let y = table.iter().find(|r| r.team_id == l.y).expect("y row");
    assert_eq!(y.avg_fgm, 5.0);
}

#[test]
fn scoreless_recorded_result_still_counts_toward_averages() {
    let mut l = setup();
    let g = add_game(&mut l.conn, l.season, "2025-04-01", l.x, l.y);
    let [ana, _] = l.x_players;
    let boards = |reb: u32| StatLine {
        reb,
        ast: 2,
        ..StatLine::default()
    };
    let game = store::record_result(&mut l.conn, g, &[(ana, boards(5)), (l.y_player, boards(3))])
        .expect("record");
    assert_eq!((game.home_score, game.away_score), (0, 0));
    assert!(!game.is_forfeit());

    let snapshot = store::load_snapshot(&l.conn, l.season).expect("snapshot");
    let table = compute_standings(&snapshot, l.season, Some(League::A));
    let x = table.iter().find(|r| r.team_id == l.x).expect("x row");
    assert_eq!(x.stats_games_played, 1);
    assert_eq!(x.avg_reb, 5.0);
    assert_eq!(x.forfeit_wins + x.forfeit_losses, 0);

    let players = compute_player_stats(&snapshot, l.season, None);
    let ana_row = players.iter().find(|p| p.player_id == ana).expect("ana row");
    assert_eq!(ana_row.games_played, 1);
    assert_eq!(ana_row.avg_reb, 5.0);
}

#[test]
fn mvp_publish_replaces_previous_candidates() {
    let mut l = setup();
    let g = add_game(&mut l.conn, l.season, "2025-04-02", l.x, l.y);
    let [ana, bo] = l.x_players;
    store::record_result(
        &mut l.conn,
        g,
        &[(ana, pts(30)), (bo, pts(8)), (l.y_player, pts(20))],
    )
    .expect("record");

    let snapshot = store::load_snapshot(&l.conn, l.season).expect("snapshot");
    let window = ImpactWindow::for_candidate_type(CandidateType::Weekly, "2025-04-07").expect("window");
    let candidates = build_candidates(&snapshot, &window, League::A, CandidateType::Weekly);
    assert_eq!(candidates.len(), 3);
    assert_eq!(candidates[0].player_id, ana);
    assert_eq!((candidates[0].team_wins, candidates[0].team_losses), (1, 0));

    store::publish_mvp_candidates(&mut l.conn, League::A, CandidateType::Weekly, &candidates)
        .expect("publish");
    store::publish_mvp_candidates(&mut l.conn, League::A, CandidateType::Weekly, &candidates[..1])
        .expect("republish");
    let stored = store::load_mvp_candidates(&l.conn, League::A, CandidateType::Weekly).expect("load");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].player_id, ana);
    assert_eq!(stored[0].window_from, "2025-04-01");
    assert!(
        store::load_mvp_candidates(&l.conn, League::A, CandidateType::Monthly)
            .expect("load")
            .is_empty()
    );
}

#[test]
fn failed_vote_publish_rolls_back_to_previous_results() {
    let mut l = setup();
    let result = |player_id: u32, rank: u32| VoteResult {
        id: 0,
        event_id: 9,
        category: "MVP A".to_string(),
        player_id,
        score: 4,
        rank,
    };
    store::publish_vote_results(&mut l.conn, 9, &[result(1, 1), result(2, 2)]).expect("publish");
    // rank 0 violates the table check, so the whole swap is abandoned.
    assert!(store::publish_vote_results(&mut l.conn, 9, &[result(3, 1), result(4, 0)]).is_err());
    let stored = store::load_vote_results(&l.conn, 9).expect("load");
    let ids: Vec<u32> = stored.iter().map(|r| r.player_id).collect();
    assert_eq!(ids, vec![1, 2]);
}
