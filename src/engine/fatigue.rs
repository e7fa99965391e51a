//! Fatigue adjustment. Back-to-backs cost points (more on the road, and
//! much more after an extreme previous game); two well-rested teams get
//! a small bump to the combined total.

use super::breakdown::{Adjustment, AdjustmentEntry, Side};
use super::{PipelineState, Stage, StageContext};
use crate::model::TeamProfile;
use crate::tuning::FatigueTuning;

pub struct FatigueStage;

impl Stage for FatigueStage {
    fn name(&self) -> &'static str {
        "fatigue"
    }

    fn apply(&self, state: &mut PipelineState, ctx: &StageContext<'_>) {
        let tuning = &ctx.tuning.fatigue;

        for side in [Side::Home, Side::Away] {
            if ctx.input.rest_days(side) != 0 {
                continue;
            }
            let profile = ctx.input.profile(side);
            let extreme = extreme_prior_game(profile, tuning);
            let mut delta = match side {
                Side::Home => -tuning.b2b_home,
                Side::Away => -tuning.b2b_road,
            };
            if extreme {
                delta -= tuning.extreme_prior_extra;
            }
            state.add(side, delta);
            state.push(AdjustmentEntry::new(
                Adjustment::Fatigue {
                    team: side,
                    extreme_prior: extreme,
                    delta,
                },
                if extreme {
                    format!(
                        "{} on a back-to-back after an extreme game: {:+.1}",
                        side.label(),
                        delta
                    )
                } else {
                    format!("{} on a back-to-back: {:+.1}", side.label(), delta)
                },
            ));
        }

        if ctx.input.rest_days_home >= tuning.rested_days
            && ctx.input.rest_days_away >= tuning.rested_days
        {
            state.add(Side::Home, tuning.rested_bonus_each);
            state.add(Side::Away, tuning.rested_bonus_each);
            state.push(AdjustmentEntry::new(
                Adjustment::RestBonus {
                    delta_each: tuning.rested_bonus_each,
                },
                format!(
                    "both teams rested {}+ days: {:+.2} each",
                    tuning.rested_days,
                    tuning.rested_bonus_each
                ),
            ));
        }
    }
}

/// Whether the team's previous game was extreme: a near-280 combined
/// total, or the team itself scoring enough to suggest overtime.
pub(crate) fn extreme_prior_game(profile: &TeamProfile, tuning: &FatigueTuning) -> bool {
    let total = profile.last_game_total.unwrap_or(0.0);
    let own = profile.last_game_points.unwrap_or(0.0);
    total >= tuning.extreme_total || own >= tuning.extreme_own_points
}
