//! Shootout / three-point adjustment. Scores the three-point
//! environment of the game per team — shooting quality, the opponent's
//! perimeter leakage, recent form, projected tempo, rest — and converts
//! a high score into a bonus. The bonus is never negative: a bad
//! shooting environment earns nothing here rather than a penalty
//! (slow-downs belong to the pace and compression stages).

use super::breakdown::{Adjustment, AdjustmentEntry, Side};
use super::fatigue::extreme_prior_game;
use super::{PipelineState, Stage, StageContext};

pub struct ShootoutStage;

impl Stage for ShootoutStage {
    fn name(&self) -> &'static str {
        "shootout"
    }

    fn apply(&self, state: &mut PipelineState, ctx: &StageContext<'_>) {
        let tuning = &ctx.tuning.shootout;
        let league = &ctx.tuning.league;

        for side in [Side::Home, Side::Away] {
            let profile = ctx.input.profile(side);
            let allowed = ctx.input.opponent_allowed(side);

            let rest = ctx.input.rest_days(side);
            let rest_factor = if rest >= 2 {
                tuning.rest_bonus
            } else if rest == 0 {
                if extreme_prior_game(profile, &ctx.tuning.fatigue) {
                    -tuning.b2b_extreme_penalty
                } else {
                    -tuning.b2b_penalty
                }
            } else {
                0.0
            };

            let score = (profile.season.three_pct - league.three_pct) * tuning.team_three_scale
                + (allowed.three_pct - league.three_pct) * tuning.allowed_three_scale
                + (profile.last5.three_pct - profile.season.three_pct)
                    * tuning.recent_three_scale
                + (state.projected_pace - 100.0) * tuning.pace_scale
                + rest_factor;

            let bonus = if score > tuning.score_high {
                score * tuning.rate_high
            } else if score > tuning.score_mid {
                score * tuning.rate_mid
            } else if score > tuning.score_low {
                score * tuning.rate_low
            } else {
                0.0
            };

            state.add(side, bonus);
            state.push(AdjustmentEntry::new(
                Adjustment::Shootout {
                    team: side,
                    score,
                    bonus,
                },
                format!(
                    "{} shootout score {:.1} -> bonus {:+.2}",
                    side.label(),
                    score,
                    bonus
                ),
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_fixtures::*;
    use super::super::{run_stages, PredictionInput, Stage};
    use super::*;
    use crate::model::{GameLog, OpponentAllowedStats, TeamProfile, TeamRanks};
    use crate::tuning::FormulaConfig;
    use approx::assert_relative_eq;

    fn shootout_only(input: &PredictionInput) -> super::super::PredictionResult {
        let stages: Vec<Box<dyn Stage>> = vec![Box::new(ShootoutStage)];
        run_stages(&stages, input, &FormulaConfig::default())
    }

    fn shooter(season_three: f64, recent_three: f64) -> TeamProfile {
        let mut logs: Vec<GameLog> = (1..=15)
            .map(|d| {
                let mut g = log(d, 112.0, 99.5);
                g.three_pct = (season_three * 20.0 - recent_three * 5.0) / 15.0;
                g
            })
            .collect();
        for d in 16..=20 {
            let mut g = log(d, 112.0, 99.5);
            g.three_pct = recent_three;
            logs.push(g);
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

    #[test]
    fn bonus_is_never_negative() {
        let mut input = neutral_input();
        // Terrible shooting, back-to-back: deeply negative score.
        input.home = shooter(0.28, 0.25);
        input.rest_days_home = 0;
        let result = shootout_only(&input);
        let entry = result
            .breakdown
            .iter()
            .find_map(|e| match e.adjustment {
                Adjustment::Shootout {
                    team: Side::Home,
                    score,
                    bonus,
                } => Some((score, bonus)),
                _ => None,
            })
            .unwrap();
        assert!(entry.0 < 0.0, "score should be negative, got {}", entry.0);
        assert_relative_eq!(entry.1, 0.0, epsilon = 1e-9);
        assert!(result.home_projected >= 0.0);
    }

    #[test]
    fn hot_shooting_into_a_leaky_defense_earns_the_top_rate() {
        let league = FormulaConfig::default().league;
        let mut input = neutral_input();
        input.home = shooter(league.three_pct + 0.05, league.three_pct + 0.09);
        input.away_allowed = OpponentAllowedStats {
            fg_pct: league.fg_pct,
            three_pct: league.three_pct + 0.04,
            pace: league.pace,
            ppg: league.ppg,
            is_fallback: false,
        };
        input.rest_days_home = 2;
        input.rest_days_away = 2;
        let result = shootout_only(&input);
        let (score, bonus) = result
            .breakdown
            .iter()
            .find_map(|e| match e.adjustment {
                Adjustment::Shootout {
                    team: Side::Home,
                    score,
                    bonus,
                } => Some((score, bonus)),
                _ => None,
            })
            .unwrap();
        // 5 + 4 + (0.04 * 50 = 2) + 0 pace + 1 rest = 12, over the 10
        // threshold: bonus = score * 0.8.
        assert_relative_eq!(score, 12.0, epsilon = 1e-9);
        assert_relative_eq!(bonus, 9.6, epsilon = 1e-9);
    }

    #[test]
    fn mid_tier_scores_use_smaller_rates() {
        let league = FormulaConfig::default().league;
        let mut input = neutral_input();
        input.home = shooter(league.three_pct + 0.04, league.three_pct + 0.04);
        input.rest_days_home = 1;
        let result = shootout_only(&input);
        let (score, bonus) = result
            .breakdown
            .iter()
            .find_map(|e| match e.adjustment {
                Adjustment::Shootout {
                    team: Side::Home,
                    score,
                    bonus,
                } => Some((score, bonus)),
                _ => None,
            })
            .unwrap();
        // 4 + 0 + 0 + 0 + 0 = 4: between 3 and 6 -> rate 0.4.
        assert_relative_eq!(score, 4.0, epsilon = 1e-9);
        assert_relative_eq!(bonus, 1.6, epsilon = 1e-9);
    }

    #[test]
    fn back_to_back_after_extreme_game_drags_the_score_harder() {
        let mut input = neutral_input();
        input.rest_days_home = 0;
        input.home.last_game_total = Some(280.0);
        let base = {
            let mut plain = input.clone();
            plain.home.last_game_total = Some(220.0);
            score_of(&shootout_only(&plain))
        };
        let extreme = score_of(&shootout_only(&input));
        assert_relative_eq!(extreme, base - 0.5, epsilon = 1e-9);
    }

    fn score_of(result: &super::super::PredictionResult) -> f64 {
        result
            .breakdown
            .iter()
            .find_map(|e| match e.adjustment {
                Adjustment::Shootout {
                    team: Side::Home,
                    score,
                    ..
                } => Some(score),
                _ => None,
            })
            .unwrap()
    }
}
