//! The prediction pipeline.
//!
//! `predict` runs a fixed, strictly linear sequence of adjustment
//! stages over two team profiles and a matchup profile, threading
//! per-team running totals and an append-only breakdown through each
//! stage. The pipeline is pure and synchronous: no I/O, no shared
//! state, identical inputs always produce an identical result.

pub mod baseline;
pub mod breakdown;
pub mod compression;
pub mod defense;
pub mod fatigue;
pub mod home_road;
pub mod matchup;
pub mod pace;
pub mod shootout;
pub mod volatility;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::model::{MatchupProfile, OpponentAllowedStats, TeamProfile};
use crate::tuning::{FormulaConfig, FORMULA_VERSION};

pub use breakdown::{Adjustment, AdjustmentEntry, Breakdown, FormTrend, PaceTag, Side};

/// Everything one prediction needs. Profiles are read-only snapshots
/// built by the model layer; the optional reference line is consumed
/// only by the terminal compression stage.
#[derive(Debug, Clone)]
pub struct PredictionInput {
    pub home: TeamProfile,
    pub away: TeamProfile,
    pub matchup: MatchupProfile,
    /// What the home team's defense allows (used when projecting the
    /// away team's scoring), and vice versa.
    pub home_allowed: OpponentAllowedStats,
    pub away_allowed: OpponentAllowedStats,
    pub rest_days_home: u32,
    pub rest_days_away: u32,
    pub reference_line: Option<f64>,
}

impl PredictionInput {
    pub fn profile(&self, side: Side) -> &TeamProfile {
        match side {
            Side::Home => &self.home,
            Side::Away => &self.away,
        }
    }

    pub fn opponent(&self, side: Side) -> &TeamProfile {
        match side {
            Side::Home => &self.away,
            Side::Away => &self.home,
        }
    }

    /// The allowed stats of the defense `side` is scoring against.
    pub fn opponent_allowed(&self, side: Side) -> &OpponentAllowedStats {
        match side {
            Side::Home => &self.away_allowed,
            Side::Away => &self.home_allowed,
        }
    }

    pub fn rest_days(&self, side: Side) -> u32 {
        match side {
            Side::Home => self.rest_days_home,
            Side::Away => self.rest_days_away,
        }
    }
}

/// Read-only context handed to every stage.
pub struct StageContext<'a> {
    pub input: &'a PredictionInput,
    pub tuning: &'a FormulaConfig,
}

/// Mutable state threaded through the stage sequence.
#[derive(Debug, Clone)]
pub struct PipelineState {
    pub home_points: f64,
    pub away_points: f64,
    pub projected_pace: f64,
    pub pace_tag: PaceTag,
    pub home_trend: FormTrend,
    pub away_trend: FormTrend,
    pub home_volatility: f64,
    pub away_volatility: f64,
    pub breakdown: Breakdown,
}

impl PipelineState {
    fn new() -> Self {
        PipelineState {
            home_points: 0.0,
            away_points: 0.0,
            projected_pace: 100.0,
            pace_tag: PaceTag::Normal,
            home_trend: FormTrend::Normal,
            away_trend: FormTrend::Normal,
            home_volatility: 1.0,
            away_volatility: 1.0,
            breakdown: Vec::new(),
        }
    }

    pub fn points(&self, side: Side) -> f64 {
        match side {
            Side::Home => self.home_points,
            Side::Away => self.away_points,
        }
    }

    pub fn points_mut(&mut self, side: Side) -> &mut f64 {
        match side {
            Side::Home => &mut self.home_points,
            Side::Away => &mut self.away_points,
        }
    }

    pub fn add(&mut self, side: Side, delta: f64) {
        *self.points_mut(side) += delta;
    }

    pub fn scale(&mut self, side: Side, factor: f64) {
        *self.points_mut(side) *= factor;
    }

    pub fn scale_both(&mut self, factor: f64) {
        self.home_points *= factor;
        self.away_points *= factor;
    }

    pub fn trend(&self, side: Side) -> FormTrend {
        match side {
            Side::Home => self.home_trend,
            Side::Away => self.away_trend,
        }
    }

    pub fn set_trend(&mut self, side: Side, trend: FormTrend) {
        match side {
            Side::Home => self.home_trend = trend,
            Side::Away => self.away_trend = trend,
        }
    }

    pub fn set_volatility(&mut self, side: Side, factor: f64) {
        match side {
            Side::Home => self.home_volatility = factor,
            Side::Away => self.away_volatility = factor,
        }
    }

    pub fn push(&mut self, entry: AdjustmentEntry) {
        self.breakdown.push(entry);
    }
}

/// One adjustment stage. Stages are pure over (state, context): they
/// read profiles and the running totals, apply a delta or multiplier,
/// and append their breakdown entries.
pub trait Stage {
    fn name(&self) -> &'static str;
    fn apply(&self, state: &mut PipelineState, ctx: &StageContext<'_>);
}

/// The canonical stage order. Cross-stage dependencies: baseline sets
/// the totals and form trends; pace projection sets the tempo used by
/// shootout and compression; volatility sets the factors compression
/// inspects; compression is terminal and runs exactly once.
pub fn default_stages() -> Vec<Box<dyn Stage>> {
    vec![
        Box::new(baseline::BaselineStage),
        Box::new(pace::PaceProjectionStage),
        Box::new(volatility::VolatilityStage),
        Box::new(defense::DefenseFormStage),
        Box::new(defense::DefenseTierStage),
        Box::new(home_road::HomeCourtStage),
        Box::new(home_road::RoadPenaltyStage),
        Box::new(matchup::MatchupHistoryStage),
        Box::new(matchup::OpponentAllowedStage),
        Box::new(shootout::ShootoutStage),
        Box::new(fatigue::FatigueStage),
        Box::new(compression::CompressionStage),
    ]
}

/// Final, immutable prediction artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PredictionResult {
    pub home_team: String,
    pub away_team: String,
    pub home_projected: f64,
    pub away_projected: f64,
    pub predicted_total: f64,
    pub projected_pace: PaceTag,
    pub breakdown: Breakdown,
    /// Formula-set version this result was computed with; cached
    /// results from an older version must be invalidated wholesale.
    pub formula_version: u32,
}

/// Run the canonical pipeline.
pub fn predict(input: &PredictionInput, tuning: &FormulaConfig) -> PredictionResult {
    run_stages(&default_stages(), input, tuning)
}

/// Run an explicit stage list. Tests use this to exercise subsets; the
/// canonical order comes from [`default_stages`].
pub fn run_stages(
    stages: &[Box<dyn Stage>],
    input: &PredictionInput,
    tuning: &FormulaConfig,
) -> PredictionResult {
    let mut state = PipelineState::new();
    for stage in stages {
        stage.apply(&mut state, &StageContext { input, tuning });
        debug!(
            stage = stage.name(),
            home = state.home_points,
            away = state.away_points,
            "stage applied"
        );
    }

    let result = PredictionResult {
        home_team: input.home.team_id.clone(),
        away_team: input.away.team_id.clone(),
        home_projected: state.home_points,
        away_projected: state.away_points,
        predicted_total: state.home_points + state.away_points,
        projected_pace: state.pace_tag,
        breakdown: state.breakdown,
        formula_version: FORMULA_VERSION,
    };
    info!(
        home = %result.home_team,
        away = %result.away_team,
        total = result.predicted_total,
        pace = ?result.projected_pace,
        adjustments = result.breakdown.len(),
        "prediction complete"
    );
    result
}

#[cfg(test)]
pub(crate) mod test_fixtures {
    use chrono::NaiveDate;

    use super::*;
    use crate::model::{GameLog, MatchupProfile, OpponentAllowedStats, TeamProfile, TeamRanks};
    use crate::tuning::MatchupTuning;

    pub fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
    }

    pub fn log(day: u32, points: f64, pace: f64) -> GameLog {
        GameLog {
            date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            opponent: "OPP".into(),
            home: day % 2 == 0,
            points_for: points,
            points_against: 110.0,
            pace,
            fg_pct: 0.47,
            three_pct: 0.36,
            three_attempts: 34.0,
            opp_fg_pct: 0.465,
            opp_three_pct: 0.355,
            ft_rate: 0.24,
            turnovers: 13.5,
            assists: 26.0,
            off_rating: 114.0,
            def_rating: 112.0,
            opp_season_pace: 99.0,
            opp_def_rank: 15,
            won: day % 3 != 0,
        }
    }

    /// A league-average team profile built from a real log, so every
    /// Option field is populated the way the builder populates it.
    pub fn neutral_profile(team_id: &str) -> TeamProfile {
        let logs: Vec<GameLog> = (1..=20).map(|d| log(d, 112.0, 99.5)).collect();
        TeamProfile::build(
            team_id,
            TeamRanks {
                offense: 15,
                defense: 15,
            },
            &logs,
            as_of(),
        )
        .unwrap()
    }

    pub fn neutral_input() -> PredictionInput {
        let home = neutral_profile("BOS");
        let away = neutral_profile("NYK");
        let matchup = MatchupProfile::build(
            "BOS",
            "NYK",
            &[],
            &[],
            &[],
            &MatchupTuning::default(),
            as_of(),
        );
        let league = crate::tuning::LeagueAverages::default();
        PredictionInput {
            home,
            away,
            matchup,
            home_allowed: OpponentAllowedStats::league_fallback(&league),
            away_allowed: OpponentAllowedStats::league_fallback(&league),
            rest_days_home: 1,
            rest_days_away: 1,
            reference_line: None,
        }
    }
}
