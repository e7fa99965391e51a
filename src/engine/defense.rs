//! Defense adjustments, in two independent passes.
//!
//! The form pass maps the opponent's defensive rank to a historical
//! scoring delta and scales it by the scoring team's current form: a
//! hot team keeps only part of the penalty, a cold team eats an
//! amplified one. The tier pass applies a rank-tiered multiplier
//! nudged by the opponent's recent defensive-rating trend, plus a
//! mutual penalty when both defenses are strong.

use super::breakdown::{Adjustment, AdjustmentEntry, FormTrend, Side};
use super::{PipelineState, Stage, StageContext};
use crate::tuning::DefenseTuning;

pub struct DefenseFormStage;

impl Stage for DefenseFormStage {
    fn name(&self) -> &'static str {
        "defense_form"
    }

    fn apply(&self, state: &mut PipelineState, ctx: &StageContext<'_>) {
        let tuning = &ctx.tuning.defense;
        for side in [Side::Home, Side::Away] {
            let opp_rank = ctx.input.opponent(side).def_rank;
            let base_delta = tuning.tier_deltas[tier_index(opp_rank)];
            let trend = state.trend(side);
            let scale = form_scale(base_delta, trend, opp_rank, tuning);
            let delta = base_delta * scale;

            state.add(side, delta);
            state.push(AdjustmentEntry::new(
                Adjustment::DefenseForm {
                    team: side,
                    opp_def_rank: opp_rank,
                    base_delta,
                    trend,
                    scale,
                    delta,
                },
                format!(
                    "{} vs #{} defense: {:+.2} ({:?} form x{:.2})",
                    side.label(),
                    opp_rank,
                    delta,
                    trend,
                    scale
                ),
            ));
        }
    }
}

pub struct DefenseTierStage;

impl Stage for DefenseTierStage {
    fn name(&self) -> &'static str {
        "defense_tier"
    }

    fn apply(&self, state: &mut PipelineState, ctx: &StageContext<'_>) {
        let tuning = &ctx.tuning.defense;
        for side in [Side::Home, Side::Away] {
            let opp = ctx.input.opponent(side);
            let mut multiplier = tuning.tier_multipliers[tier_index(opp.def_rank)];
            // An opponent whose defense is trending better than its
            // season mark bites a little harder, and vice versa.
            if opp.recent_def_trend <= -tuning.trend_threshold {
                multiplier -= tuning.trend_nudge;
            } else if opp.recent_def_trend >= tuning.trend_threshold {
                multiplier += tuning.trend_nudge;
            }

            state.scale(side, multiplier);
            state.push(AdjustmentEntry::new(
                Adjustment::DefenseTier {
                    team: side,
                    opp_def_rank: opp.def_rank,
                    multiplier,
                },
                format!(
                    "{} scoring x{:.2} vs #{} defense tier",
                    side.label(),
                    multiplier,
                    opp.def_rank
                ),
            ));
        }

        let home_rank = ctx.input.home.def_rank;
        let away_rank = ctx.input.away.def_rank;
        let mutual = if home_rank <= tuning.mutual_rank_tight && away_rank <= tuning.mutual_rank_tight
        {
            tuning.mutual_penalty_tight
        } else if home_rank <= tuning.mutual_rank_loose && away_rank <= tuning.mutual_rank_loose {
            tuning.mutual_penalty_loose
        } else {
            1.0
        };
        if mutual != 1.0 {
            state.scale_both(mutual);
            state.push(AdjustmentEntry::new(
                Adjustment::MutualDefense { multiplier: mutual },
                format!(
                    "both defenses ranked #{}/#{}: x{:.2} to both",
                    home_rank, away_rank, mutual
                ),
            ));
        }
    }
}

/// Rank 1..=30 into six 5-rank tiers.
fn tier_index(rank: u32) -> usize {
    ((rank.clamp(1, 30) - 1) / 5) as usize
}

/// Form scaling only softens or amplifies penalties; a bonus against a
/// weak defense is left alone.
fn form_scale(base_delta: f64, trend: FormTrend, opp_rank: u32, tuning: &DefenseTuning) -> f64 {
    if base_delta >= 0.0 {
        return 1.0;
    }
    match trend {
        FormTrend::Hot => {
            if opp_rank <= 10 {
                tuning.hot_keep_elite
            } else if opp_rank <= 20 {
                tuning.hot_keep_middle
            } else {
                tuning.hot_keep_weak
            }
        }
        FormTrend::Cold => tuning.cold_scale,
        FormTrend::Normal => 1.0,
    }
}
