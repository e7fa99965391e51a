//! Matchup adjustments.
//!
//! The history pass applies small, sample-gated tweaks from
//! head-to-head scoring and from each team's record against the
//! opponent's archetype (fast/slow pace, top/bottom defense). The
//! opponent-allowed pass compares what a team does to what its
//! opponent typically gives up, in shooting and tempo, under hard
//! per-component and per-team caps.

use super::breakdown::{Adjustment, AdjustmentEntry, Side};
use super::{PipelineState, Stage, StageContext};
use crate::model::{ArchetypeSplits, SplitSample, TeamProfile};
use crate::tuning::MatchupTuning;

pub struct MatchupHistoryStage;

impl Stage for MatchupHistoryStage {
    fn name(&self) -> &'static str {
        "matchup_history"
    }

    fn apply(&self, state: &mut PipelineState, ctx: &StageContext<'_>) {
        let tuning = &ctx.tuning.matchup;
        let matchup = &ctx.input.matchup;

        for side in [Side::Home, Side::Away] {
            let profile = ctx.input.profile(side);
            let opponent = ctx.input.opponent(side);
            let splits = match side {
                Side::Home => &matchup.home_splits,
                Side::Away => &matchup.away_splits,
            };

            let h2h_ppg = match side {
                Side::Home => matchup.h2h.home_avg_scored,
                Side::Away => matchup.h2h.home_avg_allowed,
            };
            let h2h_delta = if matchup.h2h.games >= tuning.min_h2h_games {
                ((h2h_ppg - profile.season.ppg) * tuning.h2h_rate)
                    .clamp(-tuning.h2h_cap, tuning.h2h_cap)
            } else {
                0.0
            };

            let pace_split_delta =
                split_tweak(pace_archetype(opponent, splits, tuning), profile, tuning);
            let defense_split_delta =
                split_tweak(defense_archetype(opponent, splits, tuning), profile, tuning);

            let total = (h2h_delta + pace_split_delta + defense_split_delta)
                .clamp(-tuning.history_cap, tuning.history_cap);

            state.add(side, total);
            state.push(AdjustmentEntry::new(
                Adjustment::MatchupHistory {
                    team: side,
                    h2h_delta,
                    pace_split_delta,
                    defense_split_delta,
                    total,
                },
                format!(
                    "{} matchup history {:+.2} (h2h {:+.2}, pace split {:+.2}, defense split {:+.2})",
                    side.label(),
                    total,
                    h2h_delta,
                    pace_split_delta,
                    defense_split_delta
                ),
            ));
        }
    }
}

/// The split relevant to the opponent's tempo archetype, if any.
fn pace_archetype(
    opponent: &TeamProfile,
    splits: &ArchetypeSplits,
    tuning: &MatchupTuning,
) -> Option<SplitSample> {
    if opponent.season.pace >= tuning.fast_pace_threshold {
        splits.vs_fast
    } else if opponent.season.pace <= tuning.slow_pace_threshold {
        splits.vs_slow
    } else {
        None
    }
}

fn defense_archetype(
    opponent: &TeamProfile,
    splits: &ArchetypeSplits,
    tuning: &MatchupTuning,
) -> Option<SplitSample> {
    if opponent.def_rank <= tuning.top_defense_rank {
        splits.vs_top_defense
    } else if opponent.def_rank >= tuning.bottom_defense_rank {
        splits.vs_bottom_defense
    } else {
        None
    }
}

fn split_tweak(
    sample: Option<SplitSample>,
    profile: &TeamProfile,
    tuning: &MatchupTuning,
) -> f64 {
    match sample {
        Some(split) if split.games >= tuning.min_split_games => {
            ((split.ppg - profile.season.ppg) * tuning.split_rate)
                .clamp(-tuning.split_cap, tuning.split_cap)
        }
        _ => 0.0,
    }
}

pub struct OpponentAllowedStage;

impl Stage for OpponentAllowedStage {
    fn name(&self) -> &'static str {
        "opponent_allowed"
    }

    fn apply(&self, state: &mut PipelineState, ctx: &StageContext<'_>) {
        let tuning = &ctx.tuning.matchup;
        let league = &ctx.tuning.league;

        for side in [Side::Home, Side::Away] {
            let team = &ctx.input.profile(side).season;
            let allowed = ctx.input.opponent_allowed(side);

            // Advantages in percentage points: the mean of how the team
            // shoots relative to league and how much the opponent leaks
            // relative to league.
            let fg_edge_pp =
                ((team.fg_pct - league.fg_pct) + (allowed.fg_pct - league.fg_pct)) / 2.0 * 100.0;
            let fg_component =
                (fg_edge_pp * tuning.fg_scale).clamp(-tuning.fg_cap, tuning.fg_cap);

            let three_edge_pp = ((team.three_pct - league.three_pct)
                + (allowed.three_pct - league.three_pct))
                / 2.0
                * 100.0;
            let volume_factor = (team.three_attempts / league.three_attempts)
                .clamp(tuning.volume_factor_min, tuning.volume_factor_max);
            let three_component = (three_edge_pp * volume_factor * tuning.three_scale)
                .clamp(-tuning.three_cap, tuning.three_cap);

            let pace_component = ((allowed.pace - team.pace) * tuning.pace_scale
                * tuning.pace_weight)
                .clamp(-tuning.pace_cap, tuning.pace_cap);

            let total = (fg_component + three_component + pace_component)
                .clamp(-tuning.total_cap, tuning.total_cap);

            state.add(side, total);
            state.push(AdjustmentEntry::new(
                Adjustment::OpponentAllowed {
                    team: side,
                    fg_component,
                    three_component,
                    pace_component,
                    total,
                },
                format!(
                    "{} vs opponent-allowed {:+.2} (fg {:+.2}, 3pt {:+.2}, pace {:+.2})",
                    side.label(),
                    total,
                    fg_component,
                    three_component,
                    pace_component
                ),
            ));
        }
    }
}
