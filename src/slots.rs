use std::collections::VecDeque;

use chrono::{Datelike, Days, NaiveDate, NaiveTime, Weekday};
use log::{debug, info};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::LeagueError;
use crate::fixtures::Round;
use crate::model::TeamId;

const DATE_FMT: &str = "%Y-%m-%d";
const TIME_FMT: &str = "%H:%M";
const TOKEN_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const TOKEN_LEN: usize = 4;

#[derive(Debug, Clone)]
pub struct SlotRequest {
    pub start_date: String,
    pub weekdays: Vec<Weekday>,
    pub times: Vec<String>,
    pub shuffle_seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledMatch<T> {
    pub round: usize,
    pub date: String,
    pub time: String,
    pub home: T,
    pub away: T,
    pub access_token: String,
}

/// A game ready to be inserted; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSpec {
    pub date: String,
    pub time: String,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub access_token: Option<String>,
}

impl From<ScheduledMatch<TeamId>> for GameSpec {
    fn from(m: ScheduledMatch<TeamId>) -> Self {
        GameSpec {
            date: m.date,
            time: m.time,
            home_team_id: m.home,
            away_team_id: m.away,
            access_token: Some(m.access_token),
        }
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate, LeagueError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FMT)
        .map_err(|_| LeagueError::InvalidDate(raw.to_string()))
}

/// Validates `HH:MM` and returns it zero-padded.
pub fn parse_time(raw: &str) -> Result<String, LeagueError> {
    let t = NaiveTime::parse_from_str(raw.trim(), TIME_FMT)
        .map_err(|_| LeagueError::InvalidTime(raw.to_string()))?;
    Ok(t.format(TIME_FMT).to_string())
}

/// Comma separated start times, e.g. `"19:00, 20:30"`.
pub fn parse_times_list(raw: &str) -> Result<Vec<String>, LeagueError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_time)
        .collect()
}

/// Accepts 0..=6 (Monday = 0) or an English day name.
pub fn parse_weekday(raw: &str) -> Result<Weekday, LeagueError> {
    const BY_INDEX: [Weekday; 7] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ];
    let s = raw.trim();
    if let Ok(idx) = s.parse::<usize>() {
        return BY_INDEX
            .get(idx)
            .copied()
            .ok_or_else(|| LeagueError::InvalidWeekday(raw.to_string()));
    }
    s.parse::<Weekday>()
        .map_err(|_| LeagueError::InvalidWeekday(raw.to_string()))
}

pub fn parse_weekdays_list(raw: &str) -> Result<Vec<Weekday>, LeagueError> {
    raw.split([',', ' '])
        .filter(|s| !s.trim().is_empty())
        .map(parse_weekday)
        .collect()
}

/// `aaaa`, `bbbb`, ... `zzzz`, then `aaaa1`, `bbbb1`, ...
pub fn access_token(index: usize) -> String {
    let letter = TOKEN_ALPHABET[index % TOKEN_ALPHABET.len()] as char;
    let cycle = index / TOKEN_ALPHABET.len();
    let mut token: String = std::iter::repeat_n(letter, TOKEN_LEN).collect();
    if cycle > 0 {
        token.push_str(&cycle.to_string());
    }
    token
}

/// FIFO of (date, time) slots, refilled one playable day at a time.
#[derive(Debug, Clone)]
pub struct SlotQueue {
    cursor: NaiveDate,
    weekdays: Vec<Weekday>,
    times: Vec<String>,
    queue: VecDeque<(NaiveDate, String)>,
}

impl SlotQueue {
    pub fn new(start: NaiveDate, weekdays: &[Weekday], times: &[String]) -> Result<Self, LeagueError> {
        if weekdays.is_empty() {
            return Err(LeagueError::NoWeekdays);
        }
        if times.is_empty() {
            return Err(LeagueError::NoTimeSlots);
        }
        Ok(Self {
            cursor: start,
            weekdays: weekdays.to_vec(),
            times: times.to_vec(),
            queue: VecDeque::new(),
        })
    }

    pub fn next_slot(&mut self) -> (NaiveDate, String) {
        if self.queue.is_empty() {
            while !self.weekdays.contains(&self.cursor.weekday()) {
                self.cursor = next_day(self.cursor);
            }
            for time in &self.times {
                self.queue.push_back((self.cursor, time.clone()));
            }
            self.cursor = next_day(self.cursor);
        }
        // Refilled above, and `times` is never empty.
        self.queue
            .pop_front()
            .unwrap_or_else(|| (self.cursor, self.times[0].clone()))
    }
}

fn next_day(date: NaiveDate) -> NaiveDate {
    date.checked_add_days(Days::new(1)).unwrap_or(date)
}

/// Gives every round one (date, time) slot; all matches of a round share it.
pub fn assign_slots<T: Clone>(
    rounds: &[Round<T>],
    request: &SlotRequest,
) -> Result<Vec<ScheduledMatch<T>>, LeagueError> {
    let start = parse_date(&request.start_date)?;
    let times = request
        .times
        .iter()
        .map(|t| parse_time(t))
        .collect::<Result<Vec<_>, _>>()?;
    let mut queue = SlotQueue::new(start, &request.weekdays, &times)?;
    let mut rng = request.shuffle_seed.map(StdRng::seed_from_u64);

    let mut out = Vec::new();
    for (round_idx, round) in rounds.iter().enumerate() {
        let (date, time) = queue.next_slot();
        let date = date.format(DATE_FMT).to_string();
        if round.is_empty() {
            debug!("round {round_idx} has no matches, slot {date} {time} left empty");
            continue;
        }
        let mut matches = round.clone();
        if let Some(rng) = rng.as_mut() {
            matches.shuffle(rng);
        }
        for (idx, pairing) in matches.into_iter().enumerate() {
            out.push(ScheduledMatch {
                round: round_idx,
                date: date.clone(),
                time: time.clone(),
                home: pairing.home,
                away: pairing.away,
                access_token: access_token(idx),
            });
        }
    }
    info!(
        "assigned {} matches over {} rounds starting {}",
        out.len(),
        rounds.len(),
        request.start_date
    );
    Ok(out)
}

/// Validates a hand-entered game before it is stored.
pub fn manual_game(
    date: &str,
    time: &str,
    home_team_id: TeamId,
    away_team_id: TeamId,
    access_token: Option<String>,
) -> Result<GameSpec, LeagueError> {
    let date = parse_date(date)?.format(DATE_FMT).to_string();
    let time = parse_time(time)?;
    if home_team_id == away_team_id {
        return Err(LeagueError::SameTeam(home_team_id));
    }
    Ok(GameSpec {
        date,
        time,
        home_team_id,
        away_team_id,
        access_token,
    })
}
