//! The auditable adjustment breakdown.
//!
//! Every stage appends one or more [`AdjustmentEntry`] records to the
//! running breakdown. Each entry carries the stage's tagged
//! [`Adjustment`] variant — with the inputs that produced it and the
//! signed delta or multiplier it applied — plus a short rationale
//! string. Consumers pattern-match on the variant; the rationale is for
//! humans reading a prediction log.

use serde::{Deserialize, Serialize};

/// Which running total an adjustment touched.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn label(self) -> &'static str {
        match self {
            Side::Home => "home",
            Side::Away => "away",
        }
    }
}

/// Projected game tempo classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum PaceTag {
    Fast,
    Normal,
    Slow,
}

/// Recent-form label from the baseline stage, reused by the defense
/// stage to scale rank penalties.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum FormTrend {
    Hot,
    Normal,
    Cold,
}

/// One stage's applied adjustment, tagged per stage.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "stage", rename_all = "snake_case")]
pub enum Adjustment {
    Baseline {
        team: Side,
        season_ppg: f64,
        last5_ppg: f64,
        season_weight: f64,
        trend: FormTrend,
        value: f64,
    },
    PaceProjection {
        base_pace: f64,
        mismatch_penalty: f64,
        turnover_boost: f64,
        ft_rate_penalty: f64,
        elite_defense_penalty: f64,
        projected_pace: f64,
        tag: PaceTag,
        multiplier: f64,
    },
    PaceVolatility {
        team: Side,
        sigma: Option<f64>,
        factor: f64,
    },
    ContextDampener {
        turnover_triggered: bool,
        ft_rate_triggered: bool,
        both_volatile: bool,
        dampener: f64,
    },
    DefenseForm {
        team: Side,
        opp_def_rank: u32,
        base_delta: f64,
        trend: FormTrend,
        scale: f64,
        delta: f64,
    },
    DefenseTier {
        team: Side,
        opp_def_rank: u32,
        multiplier: f64,
    },
    MutualDefense {
        multiplier: f64,
    },
    HomeCourt {
        scaled: bool,
        momentum: f64,
        term: f64,
    },
    RoadPenalty {
        road_win_pct: Option<f64>,
        severity: f64,
        penalty: f64,
    },
    MatchupHistory {
        team: Side,
        h2h_delta: f64,
        pace_split_delta: f64,
        defense_split_delta: f64,
        total: f64,
    },
    OpponentAllowed {
        team: Side,
        fg_component: f64,
        three_component: f64,
        pace_component: f64,
        total: f64,
    },
    Shootout {
        team: Side,
        score: f64,
        bonus: f64,
    },
    Fatigue {
        team: Side,
        extreme_prior: bool,
        delta: f64,
    },
    RestBonus {
        delta_each: f64,
    },
    Compression {
        signals: u32,
        signal_factor: f64,
        battle_factor: f64,
        line_factor: f64,
        total_factor: f64,
        volatility_factor: f64,
        multiplier: f64,
    },
}

impl Adjustment {
    pub fn stage(&self) -> &'static str {
        match self {
            Adjustment::Baseline { .. } => "baseline",
            Adjustment::PaceProjection { .. } => "pace_projection",
            Adjustment::PaceVolatility { .. } => "pace_volatility",
            Adjustment::ContextDampener { .. } => "context_dampener",
            Adjustment::DefenseForm { .. } => "defense_form",
            Adjustment::DefenseTier { .. } => "defense_tier",
            Adjustment::MutualDefense { .. } => "mutual_defense",
            Adjustment::HomeCourt { .. } => "home_court",
            Adjustment::RoadPenalty { .. } => "road_penalty",
            Adjustment::MatchupHistory { .. } => "matchup_history",
            Adjustment::OpponentAllowed { .. } => "opponent_allowed",
            Adjustment::Shootout { .. } => "shootout",
            Adjustment::Fatigue { .. } => "fatigue",
            Adjustment::RestBonus { .. } => "rest_bonus",
            Adjustment::Compression { .. } => "compression",
        }
    }
}

/// A breakdown line: the tagged adjustment plus a short human rationale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdjustmentEntry {
    #[serde(flatten)]
    pub adjustment: Adjustment,
    pub rationale: String,
}

impl AdjustmentEntry {
    pub fn new(adjustment: Adjustment, rationale: impl Into<String>) -> Self {
        AdjustmentEntry {
            adjustment,
            rationale: rationale.into(),
        }
    }

    pub fn stage(&self) -> &'static str {
        self.adjustment.stage()
    }
}

/// Ordered audit trail for one prediction.
pub type Breakdown = Vec<AdjustmentEntry>;
