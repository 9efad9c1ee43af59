use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use chrono::Weekday;

use courtside::fixtures::{CrossLeaguePolicy, LegMode, two_leagues};
use courtside::model::{
    Ballot, BoxScoreEntry, Game, League, LeagueSnapshot, Player, StatLine, Team,
};
use courtside::player_stats::compute_player_stats;
use courtside::slots::{SlotRequest, assign_slots};
use courtside::standings::compute_standings;
use courtside::vote_tally::{TallyMode, tally};

const TEAMS_PER_LEAGUE: u32 = 12;
const PLAYERS_PER_TEAM: u32 = 10;

fn sample_snapshot() -> LeagueSnapshot {
    let teams: Vec<Team> = (1..=TEAMS_PER_LEAGUE * 2)
        .map(|id| Team {
            id,
            name: format!("Team {id}"),
            league: if id <= TEAMS_PER_LEAGUE { League::A } else { League::B },
            active: true,
        })
        .collect();
    let players: Vec<Player> = teams
        .iter()
        .flat_map(|t| {
            (0..PLAYERS_PER_TEAM).map(move |n| Player {
                id: t.id * 100 + n,
                name: format!("P{}-{n}", t.id),
                team_id: t.id,
                active: true,
            })
        })
        .collect();

    let ids: Vec<u32> = teams.iter().map(|t| t.id).collect();
    let (a, b) = ids.split_at(TEAMS_PER_LEAGUE as usize);
    let plan = two_leagues(a, b, LegMode::Double, CrossLeaguePolicy::Skip);
    let mut games = Vec::new();
    let mut box_scores = Vec::new();
    for (round_idx, round) in plan.into_rounds().into_iter().enumerate() {
        for p in round {
            let id = games.len() as u32 + 1;
            let (hs, as_) = (40 + (id * 7) % 30, 40 + (id * 11) % 30);
            for (team, score) in [(p.home, hs), (p.away, as_)] {
                for n in 0..PLAYERS_PER_TEAM {
                    box_scores.push(BoxScoreEntry {
                        id: box_scores.len() as u32 + 1,
                        game_id: id,
                        player_id: team * 100 + n,
                        team_id: team,
                        line: StatLine {
                            pts: score / PLAYERS_PER_TEAM,
                            reb: n % 5,
                            ast: n % 3,
                            fgm: 2,
                            fga: 5,
                            ..StatLine::default()
                        },
                    });
                }
            }
            games.push(Game {
                id,
                season_id: 1,
                date: format!("2025-{:02}-{:02}", 1 + round_idx / 28, 1 + round_idx % 28),
                time: "19:00".to_string(),
                home_team_id: p.home,
                away_team_id: p.away,
                home_score: hs,
                away_score: as_,
                finished: true,
                forfeit: id % 17 == 0,
                winner_id: None,
                loser_id: None,
                result_recorded_at: None,
                access_token: None,
            });
        }
    }
    LeagueSnapshot {
        season_id: 1,
        teams,
        players,
        games,
        box_scores,
    }
}

fn bench_schedule_generation(c: &mut Criterion) {
    let a: Vec<u32> = (1..=TEAMS_PER_LEAGUE).collect();
    let b: Vec<u32> = (TEAMS_PER_LEAGUE + 1..=TEAMS_PER_LEAGUE * 2).collect();
    let request = SlotRequest {
        start_date: "2025-01-06".to_string(),
        weekdays: vec![Weekday::Mon, Weekday::Thu],
        times: vec!["19:00".to_string(), "20:30".to_string()],
        shuffle_seed: Some(11),
    };
    c.bench_function("two_league_schedule", |bch| {
        bch.iter(|| {
            let plan = two_leagues(black_box(&a), black_box(&b), LegMode::Double, CrossLeaguePolicy::Skip);
            let scheduled = assign_slots(&plan.into_rounds(), &request).unwrap();
            black_box(scheduled.len());
        })
    });
}

fn bench_standings(c: &mut Criterion) {
    let snapshot = sample_snapshot();
    c.bench_function("standings_both_leagues", |b| {
        b.iter(|| {
            for league in League::ALL {
                let rows = compute_standings(black_box(&snapshot), 1, Some(league));
                black_box(rows.len());
            }
        })
    });
}

fn bench_player_stats(c: &mut Criterion) {
    let snapshot = sample_snapshot();
    c.bench_function("player_season_stats", |b| {
        b.iter(|| {
            let rows = compute_player_stats(black_box(&snapshot), 1, None);
            black_box(rows.len());
        })
    });
}

fn bench_positioned_tally(c: &mut Criterion) {
    let positions = ["Guard", "Forward", "Center"];
    let ballots: Vec<Ballot> = (0..2_000u32)
        .map(|i| Ballot {
            id: i,
            event_id: 1,
            user_id: i / 5,
            player_id: 100 + (i * 13) % 240,
            category: format!("All-A/{}", positions[(i % 3) as usize]),
            weight: 1,
        })
        .collect();
    c.bench_function("positioned_tally", |b| {
        b.iter(|| {
            let out = tally(1, black_box(&ballots), TallyMode::Positioned).unwrap();
            black_box(out.len());
        })
    });
}

criterion_group!(
    perf,
    bench_schedule_generation,
    bench_standings,
    bench_player_stats,
    bench_positioned_tally
);
criterion_main!(perf);
