//! Terminal compression stage. Projections drift high when several
//! bullish adjustments stack, so the last stage looks for evidence the
//! game will land lower than the raw sum suggests: stacked high-scoring
//! signals, a defensive battle, a big overshoot of the reference line,
//! an extreme absolute total, or volatile teams. Each detector yields a
//! multiplier below one; applicable factors compound and are applied to
//! both totals exactly once.

use super::breakdown::{Adjustment, AdjustmentEntry, PaceTag, Side};
use super::{PipelineState, Stage, StageContext};

pub struct CompressionStage;

impl Stage for CompressionStage {
    fn name(&self) -> &'static str {
        "compression"
    }

    fn apply(&self, state: &mut PipelineState, ctx: &StageContext<'_>) {
        let tuning = &ctx.tuning.compression;
        let total = state.home_points + state.away_points;

        let mut signals = 0u32;
        if state.pace_tag == PaceTag::Fast {
            signals += 1;
        }
        for side in [Side::Home, Side::Away] {
            let profile = ctx.input.profile(side);
            if profile.off_rank <= tuning.top_offense_rank {
                signals += 1;
            }
            if profile.last5.three_pct - profile.season.three_pct >= tuning.hot_three_margin {
                signals += 1;
            }
            if profile.def_rank >= tuning.bottom_defense_rank {
                signals += 1;
            }
        }
        let signal_factor = if signals >= 4 {
            tuning.signals_4
        } else if signals == 3 {
            tuning.signals_3
        } else if signals == 2 {
            tuning.signals_2
        } else {
            1.0
        };

        let slow = state.projected_pace < tuning.battle_pace;
        let strong_defenses = ctx.input.home.def_rank <= tuning.battle_rank
            && ctx.input.away.def_rank <= tuning.battle_rank;
        let battle_factor = match (slow, strong_defenses) {
            (true, true) => tuning.battle_both,
            (true, false) | (false, true) => tuning.battle_one,
            (false, false) => 1.0,
        };

        let line_factor = match ctx.input.reference_line {
            Some(line) if total - line > tuning.line_gap_large => tuning.line_factor_large,
            Some(line) if total - line > tuning.line_gap_small => tuning.line_factor_small,
            _ => 1.0,
        };

        let total_factor = if total > tuning.total_high {
            tuning.total_factor_high
        } else if total > tuning.total_mid {
            tuning.total_factor_mid
        } else {
            1.0
        };

        let mean_volatility = (state.home_volatility + state.away_volatility) / 2.0;
        let volatility_factor = if mean_volatility < tuning.volatility_below {
            tuning.volatility_factor
        } else {
            1.0
        };

        let multiplier =
            signal_factor * battle_factor * line_factor * total_factor * volatility_factor;
        state.scale_both(multiplier);
        state.push(AdjustmentEntry::new(
            Adjustment::Compression {
                signals,
                signal_factor,
                battle_factor,
                line_factor,
                total_factor,
                volatility_factor,
                multiplier,
            },
            if multiplier == 1.0 {
                "no compression triggers; total stands".to_string()
            } else {
                format!(
                    "compressed x{:.3} ({} signals, battle x{:.2}, line x{:.2}, total x{:.2}, volatility x{:.2})",
                    multiplier, signals, battle_factor, line_factor, total_factor, volatility_factor
                )
            },
        ));
    }
}
