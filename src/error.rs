use thiserror::Error;

use crate::model::{GameId, TeamId};

/// Validation failures surfaced to callers before anything is written.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LeagueError {
    #[error("at least two teams are needed to build a schedule (got {0})")]
    NotEnoughTeams(usize),
    #[error("no playable weekdays selected")]
    NoWeekdays,
    #[error("no start times given")]
    NoTimeSlots,
    #[error("invalid date {0:?}, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid time {0:?}, expected HH:MM")]
    InvalidTime(String),
    #[error("invalid weekday {0:?}")]
    InvalidWeekday(String),
    #[error("home and away team are the same (team {0})")]
    SameTeam(TeamId),
    #[error("team {team} did not play in game {game}")]
    WinnerNotParticipant { game: GameId, team: TeamId },
    #[error("player {player} is not on either side of game {game}")]
    PlayerNotInGame { game: GameId, player: u32 },
    #[error("game {0} not found")]
    UnknownGame(GameId),
    #[error("unknown league {0:?}")]
    UnknownLeague(String),
    #[error("invalid category {0:?}")]
    InvalidCategory(String),
    #[error("unknown option {0:?}")]
    UnknownOption(String),
    #[error("date range {from}..{to} is inverted")]
    InvalidDateRange { from: String, to: String },
}
