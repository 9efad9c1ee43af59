use std::collections::VecDeque;
use std::str::FromStr;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::LeagueError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LegMode {
    Single,
    Double,
}

/// What to do with the cross-league phase when the two leagues differ in size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CrossLeaguePolicy {
    #[default]
    Skip,
    /// Latin-square rotation over the larger league; out-of-range slots are byes.
    Wrap,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pairing<T> {
    pub home: T,
    pub away: T,
}

impl<T: Clone> Pairing<T> {
    pub fn swapped(&self) -> Self {
        Pairing {
            home: self.away.clone(),
            away: self.home.clone(),
        }
    }
}

impl FromStr for LegMode {
    type Err = LeagueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "single" | "1" => Ok(LegMode::Single),
            "double" | "2" => Ok(LegMode::Double),
            _ => Err(LeagueError::UnknownOption(raw.to_string())),
        }
    }
}

impl FromStr for CrossLeaguePolicy {
    type Err = LeagueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(CrossLeaguePolicy::Skip),
            "wrap" => Ok(CrossLeaguePolicy::Wrap),
            _ => Err(LeagueError::UnknownOption(raw.to_string())),
        }
    }
}

pub type Round<T> = Vec<Pairing<T>>;

/// Season rounds in play order: leg one, cross-league phase, leg two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixturePlan<T> {
    pub leg_one: Vec<Round<T>>,
    pub cross: Vec<Round<T>>,
    pub leg_two: Vec<Round<T>>,
}

impl<T> Default for FixturePlan<T> {
    fn default() -> Self {
        Self {
            leg_one: Vec::new(),
            cross: Vec::new(),
            leg_two: Vec::new(),
        }
    }
}

impl<T: Clone> FixturePlan<T> {
    pub fn rounds(&self) -> Vec<Round<T>> {
        self.leg_one
            .iter()
            .chain(self.cross.iter())
            .chain(self.leg_two.iter())
            .cloned()
            .collect()
    }

    pub fn into_rounds(self) -> Vec<Round<T>> {
        let mut out = self.leg_one;
        out.extend(self.cross);
        out.extend(self.leg_two);
        out
    }

    pub fn match_count(&self) -> usize {
        self.leg_one
            .iter()
            .chain(self.cross.iter())
            .chain(self.leg_two.iter())
            .map(|r| r.len())
            .sum()
    }
}

pub fn validate_roster<T>(teams: &[T]) -> Result<(), LeagueError> {
    if teams.len() < 2 {
        return Err(LeagueError::NotEnoughTeams(teams.len()));
    }
    Ok(())
}

/// Circle-method single round robin. Fewer than two teams yields no rounds.
///
/// Odd rosters get a bye placeholder; pairings against it are dropped but the
/// round itself is kept so that round indices line up across leagues.
pub fn circle_rounds<T: Clone>(teams: &[T]) -> Vec<Round<T>> {
    if teams.len() < 2 {
        return Vec::new();
    }
    let mut slots: Vec<Option<T>> = teams.iter().cloned().map(Some).collect();
    if slots.len() % 2 != 0 {
        slots.push(None);
    }
    let n = slots.len();
    let fixed = slots[0].clone();
    let mut rotating: VecDeque<Option<T>> = slots[1..].iter().cloned().collect();

    let mut rounds = Vec::with_capacity(n - 1);
    for r in 0..n - 1 {
        let mut raw = Vec::with_capacity(n / 2);
        raw.push((fixed.clone(), rotating[n - 2].clone()));
        for i in 0..(n / 2 - 1) {
            raw.push((rotating[i].clone(), rotating[n - 3 - i].clone()));
        }
        let round: Round<T> = raw
            .into_iter()
            .filter_map(|(first, second)| {
                let (first, second) = (first?, second?);
                // Alternate hosting by round parity.
                Some(if r % 2 == 0 {
                    Pairing {
                        home: first,
                        away: second,
                    }
                } else {
                    Pairing {
                        home: second,
                        away: first,
                    }
                })
            })
            .collect();
        rounds.push(round);
        rotating.rotate_right(1);
    }
    rounds
}

/// Return leg: same rounds, same order, home and away swapped in every pairing.
pub fn second_leg<T: Clone>(leg_one: &[Round<T>]) -> Vec<Round<T>> {
    leg_one
        .iter()
        .map(|round| round.iter().map(Pairing::swapped).collect())
        .collect()
}

pub fn single_league<T: Clone>(teams: &[T], legs: LegMode) -> FixturePlan<T> {
    let leg_one = circle_rounds(teams);
    let leg_two = match legs {
        LegMode::Single => Vec::new(),
        LegMode::Double => second_leg(&leg_one),
    };
    debug!(
        "single league plan: {} teams, {} + {} rounds",
        teams.len(),
        leg_one.len(),
        leg_two.len()
    );
    FixturePlan {
        leg_one,
        cross: Vec::new(),
        leg_two,
    }
}

/// Round i of `a` followed by round i of `b`; surplus rounds of the longer list stand alone.
pub fn merge_round_by_round<T: Clone>(a: &[Round<T>], b: &[Round<T>]) -> Vec<Round<T>> {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| {
            let mut round = a.get(i).cloned().unwrap_or_default();
            if let Some(other) = b.get(i) {
                round.extend(other.iter().cloned());
            }
            round
        })
        .collect()
}

pub fn cross_league_rounds<T: Clone>(a: &[T], b: &[T], policy: CrossLeaguePolicy) -> Vec<Round<T>> {
    if a.is_empty() || b.is_empty() {
        warn!(
            "cross-league phase skipped: league sizes {} and {}",
            a.len(),
            b.len()
        );
        return Vec::new();
    }
    let width = if a.len() == b.len() {
        b.len()
    } else {
        match policy {
            CrossLeaguePolicy::Skip => {
                warn!(
                    "cross-league phase skipped: league sizes {} and {} differ",
                    a.len(),
                    b.len()
                );
                return Vec::new();
            }
            CrossLeaguePolicy::Wrap => a.len().max(b.len()),
        }
    };

    (0..width)
        .map(|r| {
            a.iter()
                .enumerate()
                .filter_map(|(i, team_a)| {
                    let team_b = b.get((i + r) % width)?;
                    Some(if r % 2 == 0 {
                        Pairing {
                            home: team_a.clone(),
                            away: team_b.clone(),
                        }
                    } else {
                        Pairing {
                            home: team_b.clone(),
                            away: team_a.clone(),
                        }
                    })
                })
                .collect()
        })
        .collect()
}

pub fn two_leagues<T: Clone>(
    a: &[T],
    b: &[T],
    legs: LegMode,
    policy: CrossLeaguePolicy,
) -> FixturePlan<T> {
    let a_rounds = circle_rounds(a);
    let b_rounds = circle_rounds(b);
    let leg_one = merge_round_by_round(&a_rounds, &b_rounds);
    let cross = cross_league_rounds(a, b, policy);
    let leg_two = match legs {
        LegMode::Single => Vec::new(),
        LegMode::Double => merge_round_by_round(&second_leg(&a_rounds), &second_leg(&b_rounds)),
    };
    debug!(
        "two league plan: {}+{} teams, rounds {} / {} / {}",
        a.len(),
        b.len(),
        leg_one.len(),
        cross.len(),
        leg_two.len()
    );
    FixturePlan {
        leg_one,
        cross,
        leg_two,
    }
}
