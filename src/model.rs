use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LeagueError;

pub type TeamId = u32;
pub type PlayerId = u32;
pub type GameId = u32;
pub type SeasonId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum League {
    A,
    B,
}

impl League {
    pub const ALL: [League; 2] = [League::A, League::B];

    pub fn tag(self) -> &'static str {
        match self {
            League::A => "A",
            League::B => "B",
        }
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} League", self.tag())
    }
}

impl FromStr for League {
    type Err = LeagueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(League::A),
            "B" => Ok(League::B),
            _ => Err(LeagueError::UnknownLeague(raw.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub league: League,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub team_id: TeamId,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    pub name: String,
    pub is_current: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub season_id: SeasonId,
    /// `YYYY-MM-DD`, so string order is calendar order.
    pub date: String,
    pub time: String,
    pub home_team_id: TeamId,
    pub away_team_id: TeamId,
    pub home_score: u32,
    pub away_score: u32,
    pub finished: bool,
    pub forfeit: bool,
    pub winner_id: Option<TeamId>,
    pub loser_id: Option<TeamId>,
    pub result_recorded_at: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    NoResult,
}

impl Outcome {
    pub fn letter(self) -> char {
        match self {
            Outcome::Win => 'W',
            Outcome::Loss => 'L',
            Outcome::NoResult => 'D',
        }
    }
}

impl Game {
    pub fn involves(&self, team_id: TeamId) -> bool {
        self.home_team_id == team_id || self.away_team_id == team_id
    }

    /// Explicit flag, or the legacy 0-0 marker for rows written before the flag existed.
    /// Rows with a recorded-result stamp trust the flag alone.
    pub fn is_forfeit(&self) -> bool {
        self.forfeit
            || (self.result_recorded_at.is_none() && self.home_score == 0 && self.away_score == 0)
    }

    pub fn winner(&self) -> Option<TeamId> {
        if let Some(id) = self.winner_id {
            return Some(id);
        }
        if self.home_score > self.away_score {
            Some(self.home_team_id)
        } else if self.away_score > self.home_score {
            Some(self.away_team_id)
        } else {
            None
        }
    }

    pub fn outcome_for(&self, team_id: TeamId) -> Outcome {
        match self.winner() {
            Some(id) if id == team_id => Outcome::Win,
            Some(_) => Outcome::Loss,
            None => Outcome::NoResult,
        }
    }

    /// (points for, points against) from `team_id`'s side.
    pub fn score_for(&self, team_id: TeamId) -> (u32, u32) {
        if self.home_team_id == team_id {
            (self.home_score, self.away_score)
        } else {
            (self.away_score, self.home_score)
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatLine {
    pub pts: u32,
    pub reb: u32,
    pub ast: u32,
    pub stl: u32,
    pub blk: u32,
    pub foul: u32,
    pub turnover: u32,
    pub fgm: u32,
    pub fga: u32,
    pub three_pm: u32,
    pub three_pa: u32,
    pub ftm: u32,
    pub fta: u32,
}

impl StatLine {
    pub fn add(&mut self, other: &StatLine) {
        self.pts += other.pts;
        self.reb += other.reb;
        self.ast += other.ast;
        self.stl += other.stl;
        self.blk += other.blk;
        self.foul += other.foul;
        self.turnover += other.turnover;
        self.fgm += other.fgm;
        self.fga += other.fga;
        self.three_pm += other.three_pm;
        self.three_pa += other.three_pa;
        self.ftm += other.ftm;
        self.fta += other.fta;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxScoreEntry {
    pub id: u32,
    pub game_id: GameId,
    pub player_id: PlayerId,
    /// Side the player played for; players can be transferred later.
    pub team_id: TeamId,
    pub line: StatLine,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ballot {
    pub id: u32,
    pub event_id: u32,
    pub user_id: u32,
    pub player_id: PlayerId,
    pub category: String,
    pub weight: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteResult {
    pub id: u32,
    pub event_id: u32,
    pub category: String,
    pub player_id: PlayerId,
    pub score: i64,
    pub rank: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandidateType {
    Weekly,
    Monthly,
}

impl CandidateType {
    pub fn tag(self) -> &'static str {
        match self {
            CandidateType::Weekly => "weekly",
            CandidateType::Monthly => "monthly",
        }
    }
}

impl FromStr for CandidateType {
    type Err = LeagueError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "weekly" | "week" => Ok(CandidateType::Weekly),
            "monthly" | "month" => Ok(CandidateType::Monthly),
            _ => Err(LeagueError::UnknownOption(raw.to_string())),
        }
    }
}

/// Per-game averages over a scoring window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AveragedLine {
    pub pts: f64,
    pub reb: f64,
    pub ast: f64,
    pub stl: f64,
    pub blk: f64,
    pub turnover: f64,
    pub fgm: f64,
    pub fga: f64,
    pub ftm: f64,
    pub fta: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MvpCandidate {
    pub id: u32,
    pub player_id: PlayerId,
    pub league: League,
    pub candidate_type: CandidateType,
    pub games: u32,
    pub averages: AveragedLine,
    pub score: f64,
    pub team_wins: u32,
    pub team_losses: u32,
    pub window_from: String,
    pub window_to: String,
}

/// Everything the analytics read for one season, loaded once per request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LeagueSnapshot {
    pub season_id: SeasonId,
    pub teams: Vec<Team>,
    pub players: Vec<Player>,
    pub games: Vec<Game>,
    pub box_scores: Vec<BoxScoreEntry>,
}

impl LeagueSnapshot {
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn finished_games(&self) -> impl Iterator<Item = &Game> + '_ {
        self.games
            .iter()
            .filter(move |g| g.season_id == self.season_id && g.finished)
    }
}

pub fn per_game(total: u32, games: u32) -> f64 {
    if games == 0 {
        0.0
    } else {
        total as f64 / games as f64
    }
}

pub fn percentage(made: u32, attempted: u32) -> f64 {
    if attempted == 0 {
        0.0
    } else {
        made as f64 * 100.0 / attempted as f64
    }
}
