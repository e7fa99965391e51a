//! Advanced pace projection. Blends each team's season and recent pace,
//! averages the two, then adjusts for style mismatch, turnover volume,
//! free-throw frequency, and elite defenses. The clamped result is
//! tagged Fast/Normal/Slow and converted into a scoring multiplier for
//! both teams; later stages read the projected pace from the state.

use super::breakdown::{Adjustment, AdjustmentEntry, PaceTag, Side};
use super::{PipelineState, Stage, StageContext};

pub struct PaceProjectionStage;

impl Stage for PaceProjectionStage {
    fn name(&self) -> &'static str {
        "pace_projection"
    }

    fn apply(&self, state: &mut PipelineState, ctx: &StageContext<'_>) {
        let tuning = &ctx.tuning.pace;
        let home = ctx.input.profile(Side::Home);
        let away = ctx.input.profile(Side::Away);

        let blended_home =
            tuning.season_weight * home.season.pace + (1.0 - tuning.season_weight) * home.last5.pace;
        let blended_away =
            tuning.season_weight * away.season.pace + (1.0 - tuning.season_weight) * away.last5.pace;
        let base_pace = (blended_home + blended_away) / 2.0;

        let gap = (blended_home - blended_away).abs();
        let mismatch_penalty = if gap > tuning.mismatch_gap_large {
            -tuning.mismatch_penalty_large
        } else if gap > tuning.mismatch_gap_small {
            -tuning.mismatch_penalty_small
        } else {
            0.0
        };

        let avg_turnovers = (home.season.turnovers + away.season.turnovers) / 2.0;
        let turnover_boost = if avg_turnovers > tuning.turnover_floor {
            (avg_turnovers - tuning.turnover_floor) * tuning.turnover_rate
        } else {
            0.0
        };

        let avg_ft_rate = (home.season.ft_rate + away.season.ft_rate) / 2.0;
        let ft_rate_penalty = if avg_ft_rate > tuning.ft_rate_floor {
            -(avg_ft_rate - tuning.ft_rate_floor) * tuning.ft_rate_penalty
        } else {
            0.0
        };

        let elite_defense_penalty = if home.def_rank <= tuning.elite_defense_rank
            || away.def_rank <= tuning.elite_defense_rank
        {
            -tuning.elite_defense_penalty
        } else {
            0.0
        };

        let projected_pace = (base_pace
            + mismatch_penalty
            + turnover_boost
            + ft_rate_penalty
            + elite_defense_penalty)
            .clamp(tuning.min_pace, tuning.max_pace);

        let tag = if projected_pace >= tuning.fast_tag {
            PaceTag::Fast
        } else if projected_pace <= tuning.slow_tag {
            PaceTag::Slow
        } else {
            PaceTag::Normal
        };

        let multiplier = 1.0 + (projected_pace - 100.0) / 100.0 * tuning.scoring_sensitivity;

        state.projected_pace = projected_pace;
        state.pace_tag = tag;
        state.scale_both(multiplier);
        state.push(AdjustmentEntry::new(
            Adjustment::PaceProjection {
                base_pace,
                mismatch_penalty,
                turnover_boost,
                ft_rate_penalty,
                elite_defense_penalty,
                projected_pace,
                tag,
                multiplier,
            },
            format!(
                "projected pace {:.1} ({:?}) from base {:.1}; scoring x{:.3}",
                projected_pace, tag, base_pace, multiplier
            ),
        ));
    }
}
