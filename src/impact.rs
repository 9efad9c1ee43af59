use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::LeagueError;
use crate::model::{
    AveragedLine, CandidateType, GameId, League, LeagueSnapshot, MvpCandidate, Outcome, PlayerId,
    StatLine, TeamId, per_game,
};
use crate::slots::parse_date;

pub const MVP_CANDIDATES_PER_LEAGUE: usize = 5;

/// Inclusive `YYYY-MM-DD` bounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpactWindow {
    pub from: String,
    pub to: String,
}

impl ImpactWindow {
    pub fn new(from: &str, to: &str) -> Result<Self, LeagueError> {
        let start = parse_date(from)?;
        let end = parse_date(to)?;
        if start > end {
            return Err(LeagueError::InvalidDateRange {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(Self::from_dates(start, end))
    }

    /// Weekly: the seven days ending on `reference`. Monthly: the calendar month containing it.
    pub fn for_candidate_type(kind: CandidateType, reference: &str) -> Result<Self, LeagueError> {
        let day = parse_date(reference)?;
        let invalid = || LeagueError::InvalidDate(reference.to_string());
        let (start, end) = match kind {
            CandidateType::Weekly => (day.checked_sub_days(Days::new(6)).ok_or_else(invalid)?, day),
            CandidateType::Monthly => {
                let first = NaiveDate::from_ymd_opt(day.year(), day.month(), 1).ok_or_else(invalid)?;
                let next_first = if day.month() == 12 {
                    NaiveDate::from_ymd_opt(day.year() + 1, 1, 1)
                } else {
                    NaiveDate::from_ymd_opt(day.year(), day.month() + 1, 1)
                }
                .ok_or_else(invalid)?;
                let last = next_first.checked_sub_days(Days::new(1)).ok_or_else(invalid)?;
                (first, last)
            }
        };
        Ok(Self::from_dates(start, end))
    }

    fn from_dates(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            from: start.format("%Y-%m-%d").to_string(),
            to: end.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn contains(&self, date: &str) -> bool {
        date >= self.from.as_str() && date <= self.to.as_str()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImpactScore {
    pub player_id: PlayerId,
    pub player_name: String,
    pub team_id: TeamId,
    pub league: League,
    pub games: u32,
    pub averages: AveragedLine,
    pub score: f64,
}

/// Counting stats minus turnovers and missed field goals and free throws, all per game.
pub fn impact_score(avg: &AveragedLine) -> f64 {
    (avg.pts + avg.reb + avg.ast + avg.stl + avg.blk)
        - avg.turnover
        - (avg.fga - avg.fgm)
        - (avg.fta - avg.ftm)
}

pub fn averaged(totals: &StatLine, games: u32) -> AveragedLine {
    AveragedLine {
        pts: per_game(totals.pts, games),
        reb: per_game(totals.reb, games),
        ast: per_game(totals.ast, games),
        stl: per_game(totals.stl, games),
        blk: per_game(totals.blk, games),
        turnover: per_game(totals.turnover, games),
        fgm: per_game(totals.fgm, games),
        fga: per_game(totals.fga, games),
        ftm: per_game(totals.ftm, games),
        fta: per_game(totals.fta, games),
    }
}

/// Every player of `league` with at least one game in the window, best first.
pub fn rank_impact(
    snapshot: &LeagueSnapshot,
    window: &ImpactWindow,
    league: League,
) -> Vec<ImpactScore> {
    let in_window: HashSet<GameId> = snapshot
        .finished_games()
        .filter(|g| !g.is_forfeit() && window.contains(&g.date))
        .map(|g| g.id)
        .collect();

    let mut per_player: BTreeMap<PlayerId, (StatLine, HashSet<GameId>)> = BTreeMap::new();
    for entry in snapshot
        .box_scores
        .iter()
        .filter(|e| in_window.contains(&e.game_id))
    {
        let (totals, games) = per_player.entry(entry.player_id).or_default();
        totals.add(&entry.line);
        games.insert(entry.game_id);
    }

    let mut out: Vec<ImpactScore> = per_player
        .into_iter()
        .filter_map(|(player_id, (totals, games))| {
            let player = snapshot.player(player_id)?;
            let team = snapshot.team(player.team_id)?;
            if team.league != league || games.is_empty() {
                return None;
            }
            let n = games.len() as u32;
            let averages = averaged(&totals, n);
            Some(ImpactScore {
                player_id,
                player_name: player.name.clone(),
                team_id: team.id,
                league,
                games: n,
                score: impact_score(&averages),
                averages,
            })
        })
        .collect();
    out.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.player_id.cmp(&b.player_id))
    });
    out
}

pub fn mvp_candidates(
    snapshot: &LeagueSnapshot,
    window: &ImpactWindow,
    league: League,
) -> Vec<ImpactScore> {
    let mut ranked = rank_impact(snapshot, window, league);
    ranked.truncate(MVP_CANDIDATES_PER_LEAGUE);
    ranked
}

/// Wins and losses of a team over the window, forfeits included.
pub fn team_record_in_window(
    snapshot: &LeagueSnapshot,
    team_id: TeamId,
    window: &ImpactWindow,
) -> (u32, u32) {
    snapshot
        .finished_games()
        .filter(|g| g.involves(team_id) && window.contains(&g.date))
        .fold((0, 0), |(w, l), g| match g.outcome_for(team_id) {
            Outcome::Win => (w + 1, l),
            Outcome::Loss => (w, l + 1),
            Outcome::NoResult => (w, l),
        })
}

/// Candidate rows ready for `store::publish_mvp_candidates`.
pub fn build_candidates(
    snapshot: &LeagueSnapshot,
    window: &ImpactWindow,
    league: League,
    kind: CandidateType,
) -> Vec<MvpCandidate> {
    mvp_candidates(snapshot, window, league)
        .into_iter()
        .map(|c| {
            let (team_wins, team_losses) = team_record_in_window(snapshot, c.team_id, window);
            MvpCandidate {
                id: 0,
                player_id: c.player_id,
                league,
                candidate_type: kind,
                games: c.games,
                averages: c.averages,
                score: c.score,
                team_wins,
                team_losses,
                window_from: window.from.clone(),
                window_to: window.to.clone(),
            }
        })
        .collect()
}
