use std::collections::{HashMap, HashSet};

use chrono::{Datelike, NaiveDate, Weekday};

use courtside::fixtures::{CrossLeaguePolicy, LegMode, single_league, two_leagues};
use courtside::slots::{GameSpec, SlotRequest, assign_slots, manual_game, parse_weekdays_list};

fn request(start: &str, weekdays: Vec<Weekday>, times: &[&str], seed: Option<u64>) -> SlotRequest {
    SlotRequest {
        start_date: start.to_string(),
        weekdays,
        times: times.iter().map(|t| t.to_string()).collect(),
        shuffle_seed: seed,
    }
}

#[test]
fn four_team_single_leg_season() {
    let plan = single_league(&["A", "B", "C", "D"], LegMode::Single);
    let rounds = plan.into_rounds();
    assert_eq!(rounds.len(), 3);
    assert!(rounds.iter().all(|r| r.len() == 2));

    let mut appearances: HashMap<&str, usize> = HashMap::new();
    let mut pairs = HashSet::new();
    for p in rounds.iter().flatten() {
        *appearances.entry(p.home).or_default() += 1;
        *appearances.entry(p.away).or_default() += 1;
        let mut key = [p.home, p.away];
        key.sort_unstable();
        assert!(pairs.insert(key), "pair {key:?} scheduled twice");
    }
    assert_eq!(pairs.len(), 6);
    assert!(appearances.values().all(|n| *n == 3));

    let scheduled = assign_slots(
        &rounds,
        &request("2025-03-03", vec![Weekday::Mon, Weekday::Wed], &["19:00"], None),
    )
    .expect("valid slot request");
    assert_eq!(scheduled.len(), 6);
    let dates: Vec<&str> = scheduled.iter().map(|m| m.date.as_str()).collect();
    assert_eq!(
        dates,
        vec![
            "2025-03-03",
            "2025-03-03",
            "2025-03-05",
            "2025-03-05",
            "2025-03-10",
            "2025-03-10"
        ]
    );
}

#[test]
fn two_league_season_keeps_every_team_busy_once_per_round() {
    let a = [1u32, 2, 3, 4];
    let b = [11u32, 12, 13, 14];
    let plan = two_leagues(&a, &b, LegMode::Double, CrossLeaguePolicy::Skip);
    assert_eq!(plan.leg_one.len(), 3);
    assert_eq!(plan.cross.len(), 4);
    assert_eq!(plan.leg_two.len(), 3);

    for round in plan.rounds() {
        let mut seen = HashSet::new();
        for p in &round {
            assert!(seen.insert(p.home));
            assert!(seen.insert(p.away));
        }
    }

    let cross_pairs: HashSet<(u32, u32)> = plan
        .cross
        .iter()
        .flatten()
        .map(|p| if p.home < p.away { (p.home, p.away) } else { (p.away, p.home) })
        .collect();
    assert_eq!(cross_pairs.len(), 16);

    for (one, two) in plan.leg_one.iter().zip(&plan.leg_two) {
        let swapped: Vec<(u32, u32)> = one.iter().map(|p| (p.away, p.home)).collect();
        let second: Vec<(u32, u32)> = two.iter().map(|p| (p.home, p.away)).collect();
        assert_eq!(swapped, second);
    }
    // 2 * 6 per leg, twice, plus 16 cross games.
    assert_eq!(plan.match_count(), 40);
}

#[test]
fn unequal_leagues_skip_or_wrap_cross_phase() {
    let a = [1u32, 2, 3, 4];
    let b = [11u32, 12, 13];
    let skipped = two_leagues(&a, &b, LegMode::Single, CrossLeaguePolicy::Skip);
    assert!(skipped.cross.is_empty());

    let wrapped = two_leagues(&a, &b, LegMode::Single, CrossLeaguePolicy::Wrap);
    let pairs: HashSet<(u32, u32)> = wrapped
        .cross
        .iter()
        .flatten()
        .map(|p| if p.home < p.away { (p.home, p.away) } else { (p.away, p.home) })
        .collect();
    assert_eq!(pairs.len(), 12);
    assert_eq!(wrapped.cross.iter().map(|r| r.len()).sum::<usize>(), 12);
}

#[test]
fn seeded_schedule_is_reproducible_and_matches_weekdays() {
    let teams: Vec<u32> = (1..=6).collect();
    let rounds = single_league(&teams, LegMode::Double).into_rounds();
    let weekdays = parse_weekdays_list("1,3").expect("weekday list");
    let req = request("2025-09-01", weekdays, &["18:30", "20:00"], Some(7));

    let first = assign_slots(&rounds, &req).expect("schedule");
    let second = assign_slots(&rounds, &req).expect("schedule");
    assert_eq!(first, second);
    assert_eq!(first.len(), 30);

    for m in &first {
        let day = NaiveDate::parse_from_str(&m.date, "%Y-%m-%d").expect("stored date format");
        assert!(matches!(day.weekday(), Weekday::Tue | Weekday::Thu));
    }

    let mut slots: HashMap<(String, String), HashSet<String>> = HashMap::new();
    for m in &first {
        let tokens = slots.entry((m.date.clone(), m.time.clone())).or_default();
        assert!(tokens.insert(m.access_token.clone()));
    }

    let specs: Vec<GameSpec> = first.into_iter().map(GameSpec::from).collect();
    assert!(specs.iter().all(|s| s.access_token.is_some()));
}

#[test]
fn invalid_input_is_rejected_before_anything_is_built() {
    let rounds = single_league(&[1u32, 2], LegMode::Single).into_rounds();
    assert!(assign_slots(&rounds, &request("2025-09-01", Vec::new(), &["19:00"], None)).is_err());
    assert!(assign_slots(&rounds, &request("2025-9-1x", vec![Weekday::Mon], &["19:00"], None)).is_err());
    assert!(assign_slots(&rounds, &request("2025-09-01", vec![Weekday::Mon], &["25:99"], None)).is_err());
    assert!(manual_game("2025-09-01", "19:00", 4, 4, None).is_err());
    assert!(manual_game("2025-02-30", "19:00", 4, 5, None).is_err());
}
