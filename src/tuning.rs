//! The versioned formula configuration.
//!
//! Every threshold, blend weight, and multiplier used by the prediction
//! pipeline lives here instead of as scattered module constants, so a
//! prediction can be replayed bit-for-bit against the exact formula set
//! that produced it. The whole set is versioned as a unit: any cached
//! `PredictionResult` carries [`FORMULA_VERSION`] and must be discarded
//! when the version moves.

use serde::{Deserialize, Serialize};

/// Bumped whenever any default below changes meaning or value.
pub const FORMULA_VERSION: u32 = 3;

/// Complete tunable set for one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct FormulaConfig {
    pub league: LeagueAverages,
    pub baseline: BaselineTuning,
    pub pace: PaceTuning,
    pub volatility: VolatilityTuning,
    pub defense: DefenseTuning,
    pub home_road: HomeRoadTuning,
    pub matchup: MatchupTuning,
    pub shootout: ShootoutTuning,
    pub fatigue: FatigueTuning,
    pub compression: CompressionTuning,
}

/// League-wide averages used as missing-statistic fallbacks and as the
/// zero point for advantage calculations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LeagueAverages {
    pub ppg: f64,
    pub pace: f64,
    pub fg_pct: f64,
    pub three_pct: f64,
    pub three_attempts: f64,
    pub ft_rate: f64,
    pub turnovers: f64,
}

impl Default for LeagueAverages {
    fn default() -> Self {
        LeagueAverages {
            ppg: 114.0,
            pace: 99.5,
            fg_pct: 0.472,
            three_pct: 0.362,
            three_attempts: 34.0,
            ft_rate: 0.255,
            turnovers: 14.0,
        }
    }
}

/// Smart-baseline blend weights and deviation thresholds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BaselineTuning {
    /// PPG deviation above which the season/recent gap is "extreme".
    pub extreme_ppg_deviation: f64,
    /// Rating-change magnitude that also counts as extreme.
    pub extreme_rating_deviation: f64,
    /// PPG deviation above which the gap is "normal" (vs. minimal).
    pub normal_ppg_deviation: f64,
    /// Season weight per deviation class. Season weight is never below
    /// the recent weight.
    pub season_weight_extreme: f64,
    pub season_weight_normal: f64,
    pub season_weight_minimal: f64,
    /// Recent rating / PPG change at which form is labeled Hot (+) or
    /// Cold (−).
    pub form_threshold: f64,
}

impl Default for BaselineTuning {
    fn default() -> Self {
        BaselineTuning {
            extreme_ppg_deviation: 10.0,
            extreme_rating_deviation: 8.0,
            normal_ppg_deviation: 3.0,
            season_weight_extreme: 0.8,
            season_weight_normal: 0.7,
            season_weight_minimal: 0.6,
            form_threshold: 4.0,
        }
    }
}

/// Advanced pace projection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PaceTuning {
    /// Season weight in the per-team 60/40 season/recent pace blend.
    pub season_weight: f64,
    /// Blended-pace gap thresholds for the style-mismatch penalty.
    pub mismatch_gap_large: f64,
    pub mismatch_gap_small: f64,
    pub mismatch_penalty_large: f64,
    pub mismatch_penalty_small: f64,
    /// Turnover boost: (avg TO − floor) × rate, applied above the floor.
    pub turnover_floor: f64,
    pub turnover_rate: f64,
    /// FT-rate penalty: (avg FT-rate − floor) × rate, above the floor.
    pub ft_rate_floor: f64,
    pub ft_rate_penalty: f64,
    /// Defensive rank at or below which a team counts as elite defense.
    pub elite_defense_rank: u32,
    pub elite_defense_penalty: f64,
    /// Final projected pace clamp.
    pub min_pace: f64,
    pub max_pace: f64,
    /// Tag thresholds.
    pub fast_tag: f64,
    pub slow_tag: f64,
    /// Scoring sensitivity per pace point away from 100.
    pub scoring_sensitivity: f64,
}

impl Default for PaceTuning {
    fn default() -> Self {
        PaceTuning {
            season_weight: 0.6,
            mismatch_gap_large: 8.0,
            mismatch_gap_small: 5.0,
            mismatch_penalty_large: 2.0,
            mismatch_penalty_small: 1.0,
            turnover_floor: 15.0,
            turnover_rate: 0.3,
            ft_rate_floor: 0.25,
            ft_rate_penalty: 10.0,
            elite_defense_rank: 10,
            elite_defense_penalty: 1.5,
            min_pace: 92.0,
            max_pace: 108.0,
            fast_tag: 102.0,
            slow_tag: 97.0,
            scoring_sensitivity: 0.3,
        }
    }
}

/// Pace-volatility dampening.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VolatilityTuning {
    /// Per-team factor by last-10 pace standard deviation.
    pub sigma_high: f64,
    pub factor_high: f64,
    pub sigma_mid: f64,
    pub factor_mid: f64,
    pub sigma_low: f64,
    pub factor_low: f64,
    /// Shared contextual dampener triggers.
    pub turnover_rate_trigger: f64,
    pub turnover_dampener: f64,
    pub ft_rate_trigger: f64,
    pub ft_dampener: f64,
    pub both_volatile_below: f64,
    pub both_volatile_dampener: f64,
    pub dampener_floor: f64,
}

impl Default for VolatilityTuning {
    fn default() -> Self {
        VolatilityTuning {
            sigma_high: 3.5,
            factor_high: 0.85,
            sigma_mid: 2.5,
            factor_mid: 0.92,
            sigma_low: 1.5,
            factor_low: 1.05,
            turnover_rate_trigger: 14.5,
            turnover_dampener: 0.97,
            ft_rate_trigger: 0.28,
            ft_dampener: 0.96,
            both_volatile_below: 0.95,
            both_volatile_dampener: 0.94,
            dampener_floor: 0.90,
        }
    }
}

/// Dynamic + enhanced defense adjustment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DefenseTuning {
    /// Historical scoring delta per opponent defensive-rank tier
    /// (1–5, 6–10, 11–15, 16–20, 21–25, 26–30). Monotone in rank.
    pub tier_deltas: [f64; 6],
    /// Fraction of a penalty kept when the scoring team is Hot, by
    /// opponent strength bucket (ranks 1–10 / 11–20 / 21–30).
    pub hot_keep_elite: f64,
    pub hot_keep_middle: f64,
    pub hot_keep_weak: f64,
    /// Penalty amplification when the scoring team is Cold.
    pub cold_scale: f64,
    /// Independent rank-tiered multiplier, same six tiers.
    pub tier_multipliers: [f64; 6],
    /// DRTG trend (last-5 − season) beyond which the tier multiplier is
    /// nudged by `trend_nudge` (down for an improving defense).
    pub trend_threshold: f64,
    pub trend_nudge: f64,
    /// Mutual-defense penalty when both opponents are ranked at or
    /// below the threshold.
    pub mutual_rank_loose: u32,
    pub mutual_penalty_loose: f64,
    pub mutual_rank_tight: u32,
    pub mutual_penalty_tight: f64,
}

impl Default for DefenseTuning {
    fn default() -> Self {
        DefenseTuning {
            tier_deltas: [-3.5, -2.5, -1.5, -0.5, 1.0, 2.5],
            hot_keep_elite: 0.5,
            hot_keep_middle: 0.4,
            hot_keep_weak: 0.3,
            cold_scale: 1.5,
            tier_multipliers: [0.91, 0.94, 0.97, 1.00, 1.01, 1.03],
            trend_threshold: 2.0,
            trend_nudge: 0.01,
            mutual_rank_loose: 15,
            mutual_penalty_loose: 0.98,
            mutual_rank_tight: 10,
            mutual_penalty_tight: 0.96,
        }
    }
}

/// Home-court and road adjustments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HomeRoadTuning {
    pub home_base: f64,
    pub home_win_pct_scale: f64,
    pub away_road_pct_scale: f64,
    pub momentum: f64,
    pub home_min: f64,
    pub home_max: f64,
    /// Minimum split sample before scaling applies.
    pub min_split_games: u32,
    pub road_pct_scale: f64,
    /// Severity multipliers for road win% in [0.4,0.5), [0.3,0.4), <0.3.
    pub road_severity_mild: f64,
    pub road_severity_bad: f64,
    pub road_severity_awful: f64,
    pub road_min: f64,
}

impl Default for HomeRoadTuning {
    fn default() -> Self {
        HomeRoadTuning {
            home_base: 2.5,
            home_win_pct_scale: 3.0,
            away_road_pct_scale: 2.0,
            momentum: 1.0,
            home_min: 0.0,
            home_max: 6.0,
            min_split_games: 5,
            road_pct_scale: 10.0,
            road_severity_mild: 1.0,
            road_severity_bad: 1.2,
            road_severity_awful: 1.4,
            road_min: -7.0,
        }
    }
}

/// Matchup history and opponent-allowed comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MatchupTuning {
    pub min_h2h_games: u32,
    pub min_split_games: u32,
    pub h2h_rate: f64,
    pub h2h_cap: f64,
    pub split_rate: f64,
    pub split_cap: f64,
    /// Per-team cap on the summed history tweaks.
    pub history_cap: f64,
    /// Opponent season pace thresholds for the fast/slow archetypes.
    pub fast_pace_threshold: f64,
    pub slow_pace_threshold: f64,
    /// Defensive-rank thresholds for the top/bottom archetypes.
    pub top_defense_rank: u32,
    pub bottom_defense_rank: u32,
    /// Opponent-allowed comparison scales and caps.
    pub fg_scale: f64,
    pub fg_cap: f64,
    pub three_scale: f64,
    pub three_cap: f64,
    pub volume_factor_min: f64,
    pub volume_factor_max: f64,
    pub pace_scale: f64,
    pub pace_weight: f64,
    pub pace_cap: f64,
    pub total_cap: f64,
}

impl Default for MatchupTuning {
    fn default() -> Self {
        MatchupTuning {
            min_h2h_games: 2,
            min_split_games: 3,
            h2h_rate: 0.25,
            h2h_cap: 2.0,
            split_rate: 0.2,
            split_cap: 1.5,
            history_cap: 4.0,
            fast_pace_threshold: 101.0,
            slow_pace_threshold: 97.0,
            top_defense_rank: 10,
            bottom_defense_rank: 21,
            fg_scale: 2.0,
            fg_cap: 5.0,
            three_scale: 3.0,
            three_cap: 4.0,
            volume_factor_min: 0.5,
            volume_factor_max: 1.5,
            pace_scale: 1.1,
            pace_weight: 0.5,
            pace_cap: 3.0,
            total_cap: 10.0,
        }
    }
}

/// Shootout / three-point environment bonus.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ShootoutTuning {
    pub team_three_scale: f64,
    pub allowed_three_scale: f64,
    pub recent_three_scale: f64,
    pub pace_scale: f64,
    pub rest_bonus: f64,
    pub b2b_penalty: f64,
    pub b2b_extreme_penalty: f64,
    /// Score thresholds and the fraction of the score converted to a
    /// bonus at each.
    pub score_high: f64,
    pub rate_high: f64,
    pub score_mid: f64,
    pub rate_mid: f64,
    pub score_low: f64,
    pub rate_low: f64,
}

impl Default for ShootoutTuning {
    fn default() -> Self {
        ShootoutTuning {
            team_three_scale: 100.0,
            allowed_three_scale: 100.0,
            recent_three_scale: 50.0,
            pace_scale: 0.15,
            rest_bonus: 1.0,
            b2b_penalty: 1.0,
            b2b_extreme_penalty: 1.5,
            score_high: 10.0,
            rate_high: 0.8,
            score_mid: 6.0,
            rate_mid: 0.6,
            score_low: 3.0,
            rate_low: 0.4,
        }
    }
}

/// Fatigue and rest.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FatigueTuning {
    /// Back-to-back penalties, home and road.
    pub b2b_home: f64,
    pub b2b_road: f64,
    /// Extra penalty when the prior game was extreme.
    pub extreme_prior_extra: f64,
    /// A prior game counts as extreme above this combined total, or
    /// when the team itself scored at least `extreme_own_points`
    /// (the overtime proxy).
    pub extreme_total: f64,
    pub extreme_own_points: f64,
    /// Per-team share of the both-rested bonus (rest ≥ `rested_days`).
    pub rested_days: u32,
    pub rested_bonus_each: f64,
}

impl Default for FatigueTuning {
    fn default() -> Self {
        FatigueTuning {
            b2b_home: 3.0,
            b2b_road: 4.0,
            extreme_prior_extra: 7.0,
            extreme_total: 275.0,
            extreme_own_points: 140.0,
            rested_days: 2,
            rested_bonus_each: 0.75,
        }
    }
}

/// Terminal scoring-compression safeguard.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CompressionTuning {
    /// High-scoring signal detectors.
    pub hot_three_margin: f64,
    pub top_offense_rank: u32,
    pub bottom_defense_rank: u32,
    pub signals_4: f64,
    pub signals_3: f64,
    pub signals_2: f64,
    /// Defensive-battle detector.
    pub battle_pace: f64,
    pub battle_rank: u32,
    pub battle_both: f64,
    pub battle_one: f64,
    /// Reference-line overshoot detector.
    pub line_gap_large: f64,
    pub line_factor_large: f64,
    pub line_gap_small: f64,
    pub line_factor_small: f64,
    /// Absolute-total detector.
    pub total_high: f64,
    pub total_factor_high: f64,
    pub total_mid: f64,
    pub total_factor_mid: f64,
    /// Volatility detector on the mean per-team factor.
    pub volatility_below: f64,
    pub volatility_factor: f64,
}

impl Default for CompressionTuning {
    fn default() -> Self {
        CompressionTuning {
            hot_three_margin: 0.02,
            top_offense_rank: 10,
            bottom_defense_rank: 21,
            signals_4: 0.94,
            signals_3: 0.97,
            signals_2: 0.99,
            battle_pace: 98.0,
            battle_rank: 12,
            battle_both: 0.95,
            battle_one: 0.98,
            line_gap_large: 8.0,
            line_factor_large: 0.96,
            line_gap_small: 5.0,
            line_factor_small: 0.98,
            total_high: 240.0,
            total_factor_high: 0.96,
            total_mid: 235.0,
            total_factor_mid: 0.98,
            volatility_below: 0.92,
            volatility_factor: 0.97,
        }
    }
}
