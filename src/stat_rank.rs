use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::player_stats::PlayerSeasonStats;
use crate::standings::StandingsRow;

pub const TEAM_TOP_TIER: u32 = 5;
pub const PLAYER_TOP_TIER: u32 = 10;

/// Uniform shape every cohort member is converted to before ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankEntity {
    pub id: u32,
    pub values: HashMap<String, f64>,
}

impl RankEntity {
    pub fn value(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }
}

pub trait RankSource {
    fn to_rank_entity(&self) -> RankEntity;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldConfig {
    pub key: String,
    pub label: String,
    /// Lower is better (turnovers, points allowed, fouls).
    pub reverse: bool,
}

impl FieldConfig {
    pub fn new(key: &str, label: &str, reverse: bool) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            reverse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tier {
    Top,
    Good,
    Average,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatRankResult {
    pub key: String,
    pub label: String,
    pub value: f64,
    pub rank: u32,
    pub average: f64,
    pub tier: Tier,
}

/// One result per field for `target_id` within `cohort`; empty when the target is absent.
pub fn analyze(
    target_id: u32,
    cohort: &[RankEntity],
    fields: &[FieldConfig],
    top_cutoff: u32,
) -> Vec<StatRankResult> {
    let Some(target) = cohort.iter().find(|e| e.id == target_id) else {
        return Vec::new();
    };
    fields
        .iter()
        .map(|field| {
            let values: Vec<f64> = cohort.iter().map(|e| e.value(&field.key)).collect();
            let value = target.value(&field.key);
            let average = values.iter().sum::<f64>() / values.len() as f64;
            let rank = rank_of(value, &values, field.reverse);
            let tier = if rank <= top_cutoff {
                Tier::Top
            } else if (field.reverse && value <= average) || (!field.reverse && value >= average) {
                Tier::Good
            } else {
                Tier::Average
            };
            StatRankResult {
                key: field.key.clone(),
                label: field.label.clone(),
                value,
                rank,
                average,
                tier,
            }
        })
        .collect()
}

/// 1-based position of the first equal value in best-first order.
fn rank_of(value: f64, values: &[f64], reverse: bool) -> u32 {
    let mut sorted = values.to_vec();
    if reverse {
        sorted.sort_by(|a, b| a.total_cmp(b));
    } else {
        sorted.sort_by(|a, b| b.total_cmp(a));
    }
    sorted
        .iter()
        .position(|v| *v == value)
        .map(|idx| idx as u32 + 1)
        .unwrap_or(sorted.len() as u32)
}

pub fn analyze_sources<S: RankSource>(
    target_id: u32,
    cohort: &[S],
    fields: &[FieldConfig],
    top_cutoff: u32,
) -> Vec<StatRankResult> {
    let entities: Vec<RankEntity> = cohort.iter().map(RankSource::to_rank_entity).collect();
    analyze(target_id, &entities, fields, top_cutoff)
}

pub fn team_fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig::new("avg_pf", "Points scored", false),
        FieldConfig::new("avg_pa", "Points allowed", true),
        FieldConfig::new("avg_reb", "Rebounds", false),
        FieldConfig::new("avg_ast", "Assists", false),
        FieldConfig::new("avg_stl", "Steals", false),
        FieldConfig::new("avg_blk", "Blocks", false),
        FieldConfig::new("avg_turnover", "Turnovers", true),
        FieldConfig::new("fg_pct", "FG%", false),
        FieldConfig::new("three_p_pct", "3P%", false),
        FieldConfig::new("ft_pct", "FT%", false),
    ]
}

pub fn player_fields() -> Vec<FieldConfig> {
    vec![
        FieldConfig::new("avg_pts", "Points", false),
        FieldConfig::new("avg_reb", "Rebounds", false),
        FieldConfig::new("avg_ast", "Assists", false),
        FieldConfig::new("avg_stl", "Steals", false),
        FieldConfig::new("avg_blk", "Blocks", false),
        FieldConfig::new("avg_turnover", "Turnovers", true),
        FieldConfig::new("avg_foul", "Fouls", true),
        FieldConfig::new("fg_pct", "FG%", false),
        FieldConfig::new("three_p_pct", "3P%", false),
        FieldConfig::new("ft_pct", "FT%", false),
    ]
}

fn entity(id: u32, pairs: &[(&str, f64)]) -> RankEntity {
    RankEntity {
        id,
        values: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
    }
}

impl RankSource for StandingsRow {
    fn to_rank_entity(&self) -> RankEntity {
        entity(
            self.team_id,
            &[
                ("points", self.points as f64),
                ("wins", self.wins as f64),
                ("losses", self.losses as f64),
                ("diff", self.diff as f64),
                ("avg_pf", self.avg_pf),
                ("avg_pa", self.avg_pa),
                ("avg_reb", self.avg_reb),
                ("avg_ast", self.avg_ast),
                ("avg_stl", self.avg_stl),
                ("avg_blk", self.avg_blk),
                ("avg_turnover", self.avg_turnover),
                ("avg_foul", self.avg_foul),
                ("fg_pct", self.fg_pct),
                ("three_p_pct", self.three_p_pct),
                ("ft_pct", self.ft_pct),
            ],
        )
    }
}

impl RankSource for PlayerSeasonStats {
    fn to_rank_entity(&self) -> RankEntity {
        entity(
            self.player_id,
            &[
                ("games_played", self.games_played as f64),
                ("avg_pts", self.avg_pts),
                ("avg_reb", self.avg_reb),
                ("avg_ast", self.avg_ast),
                ("avg_stl", self.avg_stl),
                ("avg_blk", self.avg_blk),
                ("avg_turnover", self.avg_turnover),
                ("avg_foul", self.avg_foul),
                ("fg_pct", self.fg_pct),
                ("three_p_pct", self.three_p_pct),
                ("ft_pct", self.ft_pct),
            ],
        )
    }
}
