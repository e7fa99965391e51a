//! Home-court and road adjustments. The home term starts from a fixed
//! base and is scaled by the home team's home record, the visitor's
//! road record, and recent home momentum; the road penalty punishes a
//! genuinely bad traveling team. Both require a minimum split sample
//! before any scaling applies.

use super::breakdown::{Adjustment, AdjustmentEntry, Side};
use super::{PipelineState, Stage, StageContext};

pub struct HomeCourtStage;

impl Stage for HomeCourtStage {
    fn name(&self) -> &'static str {
        "home_court"
    }

    fn apply(&self, state: &mut PipelineState, ctx: &StageContext<'_>) {
        let tuning = &ctx.tuning.home_road;
        let home = ctx.input.profile(Side::Home);
        let away = ctx.input.profile(Side::Away);

        let splits = match (home.home, away.road) {
            (Some(h), Some(r))
                if h.games >= tuning.min_split_games && r.games >= tuning.min_split_games =>
            {
                Some((h, r))
            }
            _ => None,
        };

        let momentum = match home.last3_home_wins {
            Some(3) => tuning.momentum,
            Some(0) => -tuning.momentum,
            _ => 0.0,
        };

        let (scaled, raw_term) = match splits {
            Some((home_split, road_split)) => {
                let scale = 1.0
                    + tuning.home_win_pct_scale * (home_split.win_pct - 0.5)
                    + tuning.away_road_pct_scale * (0.5 - road_split.win_pct);
                (true, tuning.home_base * scale + momentum)
            }
            // Insufficient split sample: unscaled base, no momentum.
            None => (false, tuning.home_base),
        };
        let term = raw_term.clamp(tuning.home_min, tuning.home_max);

        state.add(Side::Home, term);
        state.push(AdjustmentEntry::new(
            Adjustment::HomeCourt {
                scaled,
                momentum,
                term,
            },
            if scaled {
                format!("home-court {:+.2} (record-scaled, momentum {:+.1})", term, momentum)
            } else {
                format!("home-court {:+.2} (unscaled base, thin splits)", term)
            },
        ));
    }
}

pub struct RoadPenaltyStage;

impl Stage for RoadPenaltyStage {
    fn name(&self) -> &'static str {
        "road_penalty"
    }

    fn apply(&self, state: &mut PipelineState, ctx: &StageContext<'_>) {
        let tuning = &ctx.tuning.home_road;
        let away = ctx.input.profile(Side::Away);

        let road = away
            .road
            .filter(|split| split.games >= tuning.min_split_games);

        let (road_win_pct, severity, penalty) = match road {
            Some(split) if split.win_pct < 0.5 => {
                let severity = if split.win_pct >= 0.4 {
                    tuning.road_severity_mild
                } else if split.win_pct >= 0.3 {
                    tuning.road_severity_bad
                } else {
                    tuning.road_severity_awful
                };
                let penalty = (-(0.5 - split.win_pct) * tuning.road_pct_scale * severity)
                    .clamp(tuning.road_min, 0.0);
                (Some(split.win_pct), severity, penalty)
            }
            Some(split) => (Some(split.win_pct), 1.0, 0.0),
            None => (None, 1.0, 0.0),
        };

        state.add(Side::Away, penalty);
        state.push(AdjustmentEntry::new(
            Adjustment::RoadPenalty {
                road_win_pct,
                severity,
                penalty,
            },
            match road_win_pct {
                Some(pct) => format!("road record {:.0}%: {:+.2}", pct * 100.0, penalty),
                None => "road split below sample minimum; neutral".to_string(),
            },
        ));
    }
}
