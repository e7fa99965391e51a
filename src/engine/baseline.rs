//! Smart baseline: blend season and last-5 scoring into one starting
//! number per team, weighting the season more heavily the further
//! recent form has drifted from it. Folding form in here keeps the
//! later stages from double-counting a hot or cold streak.

use super::breakdown::{Adjustment, AdjustmentEntry, FormTrend, Side};
use super::{PipelineState, Stage, StageContext};
use crate::model::TeamProfile;
use crate::tuning::BaselineTuning;

pub struct BaselineStage;

impl Stage for BaselineStage {
    fn name(&self) -> &'static str {
        "baseline"
    }

    fn apply(&self, state: &mut PipelineState, ctx: &StageContext<'_>) {
        for side in [Side::Home, Side::Away] {
            let profile = ctx.input.profile(side);
            let tuning = &ctx.tuning.baseline;

            let season_weight = season_weight(profile, tuning);
            let value =
                season_weight * profile.season.ppg + (1.0 - season_weight) * profile.last5.ppg;
            let trend = classify_trend(profile, tuning);

            state.set_trend(side, trend);
            *state.points_mut(side) = value;
            state.push(AdjustmentEntry::new(
                Adjustment::Baseline {
                    team: side,
                    season_ppg: profile.season.ppg,
                    last5_ppg: profile.last5.ppg,
                    season_weight,
                    trend,
                    value,
                },
                format!(
                    "{} baseline {:.1} from {:.0}/{:.0} season/recent blend ({:?} form)",
                    side.label(),
                    value,
                    season_weight * 100.0,
                    (1.0 - season_weight) * 100.0,
                    trend
                ),
            ));
        }
    }
}

/// Larger season/recent deviation ⇒ more season weight, so a streak
/// never swings the baseline by its full magnitude.
fn season_weight(profile: &TeamProfile, tuning: &BaselineTuning) -> f64 {
    let ppg_dev = profile.recent_ppg_change.abs();
    let rating_dev = profile.recent_rating_change.abs();
    if ppg_dev > tuning.extreme_ppg_deviation || rating_dev > tuning.extreme_rating_deviation {
        tuning.season_weight_extreme
    } else if ppg_dev > tuning.normal_ppg_deviation {
        tuning.season_weight_normal
    } else {
        tuning.season_weight_minimal
    }
}

fn classify_trend(profile: &TeamProfile, tuning: &BaselineTuning) -> FormTrend {
    let hottest = profile.recent_rating_change.max(profile.recent_ppg_change);
    let coldest = profile.recent_rating_change.min(profile.recent_ppg_change);
    if hottest >= tuning.form_threshold {
        FormTrend::Hot
    } else if coldest <= -tuning.form_threshold {
        FormTrend::Cold
    } else {
        FormTrend::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_fixtures::*;
    use super::super::{run_stages, Stage};
    use super::*;
    use crate::model::{GameLog, TeamProfile, TeamRanks};
    use crate::tuning::FormulaConfig;
    use approx::assert_relative_eq;

    fn profile_with_recent(season_ppg: f64, recent_ppg: f64) -> TeamProfile {
        // 15 season games at `season_base` chosen so the overall season
        // average lands on `season_ppg` after the 5 recent games.
        let season_base = (season_ppg * 20.0 - recent_ppg * 5.0) / 15.0;
        let mut logs: Vec<GameLog> = (1..=15).map(|d| log(d, season_base, 99.5)).collect();
        for d in 16..=20 {
            logs.push(log(d, recent_ppg, 99.5));
        }
        TeamProfile::build(
            "BOS",
            TeamRanks {
                offense: 15,
                defense: 15,
            },
            &logs,
            as_of(),
        )
        .unwrap()
    }

    fn baseline_only(input: &super::super::PredictionInput) -> super::super::PredictionResult {
        let stages: Vec<Box<dyn Stage>> = vec![Box::new(BaselineStage)];
        run_stages(&stages, input, &FormulaConfig::default())
    }

    #[test]
    fn minimal_deviation_blends_60_40() {
        let mut input = neutral_input();
        input.home = profile_with_recent(110.0, 112.0);
        let result = baseline_only(&input);
        let expected = 0.6 * 110.0 + 0.4 * 112.0;
        assert_relative_eq!(result.home_projected, expected, epsilon = 1e-9);
    }

    #[test]
    fn normal_deviation_blends_70_30() {
        let mut input = neutral_input();
        input.home = profile_with_recent(110.0, 115.0); // 5 ppg apart
        let result = baseline_only(&input);
        let expected = 0.7 * 110.0 + 0.3 * 115.0;
        assert_relative_eq!(result.home_projected, expected, epsilon = 1e-9);
    }

    #[test]
    fn extreme_deviation_blends_80_20() {
        let mut input = neutral_input();
        input.home = profile_with_recent(110.0, 122.0); // 12 ppg apart
        let result = baseline_only(&input);
        let expected = 0.8 * 110.0 + 0.2 * 122.0;
        assert_relative_eq!(result.home_projected, expected, epsilon = 1e-9);
    }

    #[test]
    fn season_weight_never_below_recent_weight() {
        for (season, recent) in [(110.0, 110.5), (110.0, 116.0), (110.0, 130.0)] {
            let p = profile_with_recent(season, recent);
            let w = season_weight(&p, &FormulaConfig::default().baseline);
            assert!(w >= 0.5, "season weight {} for recent {}", w, recent);
        }
    }

    #[test]
    fn hot_and_cold_trends_come_from_ppg_change() {
        let tuning = FormulaConfig::default().baseline;
        let hot = profile_with_recent(110.0, 116.0);
        assert_eq!(classify_trend(&hot, &tuning), FormTrend::Hot);
        let cold = profile_with_recent(110.0, 104.0);
        assert_eq!(classify_trend(&cold, &tuning), FormTrend::Cold);
        let flat = profile_with_recent(110.0, 111.0);
        assert_eq!(classify_trend(&flat, &tuning), FormTrend::Normal);
    }

    #[test]
    fn baseline_entries_cover_both_teams() {
        let result = baseline_only(&neutral_input());
        assert_eq!(result.breakdown.len(), 2);
        assert!(result
            .breakdown
            .iter()
            .all(|entry| entry.stage() == "baseline"));
    }
}
