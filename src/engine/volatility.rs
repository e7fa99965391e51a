//! Pace-volatility dampening. Teams with erratic game-to-game pace get
//! their projection pulled toward the middle; steady teams get a small
//! bump. A shared contextual dampener then shaves both totals when the
//! game profile (turnover rate, free throws, two volatile teams)
//! suggests a choppier game than the pace projection implies.

use super::breakdown::{Adjustment, AdjustmentEntry, Side};
use super::{PipelineState, Stage, StageContext};
use crate::tuning::VolatilityTuning;

pub struct VolatilityStage;

impl Stage for VolatilityStage {
    fn name(&self) -> &'static str {
        "pace_volatility"
    }

    fn apply(&self, state: &mut PipelineState, ctx: &StageContext<'_>) {
        let tuning = &ctx.tuning.volatility;

        for side in [Side::Home, Side::Away] {
            let sigma = ctx.input.profile(side).pace_stddev_last10;
            let factor = volatility_factor(sigma, tuning);
            state.set_volatility(side, factor);
            state.scale(side, factor);
            state.push(AdjustmentEntry::new(
                Adjustment::PaceVolatility {
                    team: side,
                    sigma,
                    factor,
                },
                match sigma {
                    Some(s) => format!(
                        "{} pace sigma {:.2} over last 10 -> x{:.2}",
                        side.label(),
                        s,
                        factor
                    ),
                    None => format!("{} has under 10 games; volatility neutral", side.label()),
                },
            ));
        }

        let home = ctx.input.profile(Side::Home);
        let away = ctx.input.profile(Side::Away);

        // Turnovers per 100 possessions, both teams combined.
        let combined_pace = home.season.pace + away.season.pace;
        let turnover_rate = if combined_pace > 0.0 {
            (home.season.turnovers + away.season.turnovers) / combined_pace * 100.0
        } else {
            0.0
        };
        let avg_ft_rate = (home.season.ft_rate + away.season.ft_rate) / 2.0;

        let turnover_triggered = turnover_rate > tuning.turnover_rate_trigger;
        let ft_rate_triggered = avg_ft_rate > tuning.ft_rate_trigger;
        let both_volatile = state.home_volatility < tuning.both_volatile_below
            && state.away_volatility < tuning.both_volatile_below;

        let mut dampener = 1.0;
        if turnover_triggered {
            dampener *= tuning.turnover_dampener;
        }
        if ft_rate_triggered {
            dampener *= tuning.ft_dampener;
        }
        if both_volatile {
            dampener *= tuning.both_volatile_dampener;
        }
        dampener = dampener.max(tuning.dampener_floor);

        state.scale_both(dampener);
        state.push(AdjustmentEntry::new(
            Adjustment::ContextDampener {
                turnover_triggered,
                ft_rate_triggered,
                both_volatile,
                dampener,
            },
            format!(
                "context dampener x{:.3} (to {}, ft {}, both volatile {})",
                dampener, turnover_triggered, ft_rate_triggered, both_volatile
            ),
        ));
    }
}

fn volatility_factor(sigma: Option<f64>, tuning: &VolatilityTuning) -> f64 {
    // Insufficient sample is neutral, not extrapolated.
    let Some(sigma) = sigma else { return 1.0 };
    if sigma > tuning.sigma_high {
        tuning.factor_high
    } else if sigma > tuning.sigma_mid {
        tuning.factor_mid
    } else if sigma < tuning.sigma_low {
        tuning.factor_low
    } else {
        1.0
    }
}
