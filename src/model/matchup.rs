//! Matchup profile construction: head-to-head history plus each team's
//! scoring splits against opponent archetypes (fast/slow pace, top and
//! bottom defenses). Aggregates carry their sample counts so the stages
//! can gate on them; small samples are never allowed to drive a large
//! adjustment.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::game_log::{GameLog, H2hGame};
use crate::tuning::MatchupTuning;

/// A scoring average tagged with the number of games behind it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SplitSample {
    pub games: u32,
    pub ppg: f64,
}

/// One team's scoring averages against the four opponent archetypes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ArchetypeSplits {
    pub vs_fast: Option<SplitSample>,
    pub vs_slow: Option<SplitSample>,
    pub vs_top_defense: Option<SplitSample>,
    pub vs_bottom_defense: Option<SplitSample>,
}

/// Head-to-head summary from the home team's perspective.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct H2hSummary {
    pub games: u32,
    pub home_avg_scored: f64,
    pub home_avg_allowed: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MatchupProfile {
    pub home_id: String,
    pub away_id: String,
    pub as_of: NaiveDate,
    pub h2h: H2hSummary,
    pub home_splits: ArchetypeSplits,
    pub away_splits: ArchetypeSplits,
}

impl MatchupProfile {
    /// Build the profile for the ordered (home, away) pair from both
    /// teams' game logs and their head-to-head meetings before `as_of`.
    pub fn build(
        home_id: &str,
        away_id: &str,
        h2h_games: &[H2hGame],
        home_logs: &[GameLog],
        away_logs: &[GameLog],
        tuning: &MatchupTuning,
        as_of: NaiveDate,
    ) -> Self {
        let meetings: Vec<&H2hGame> = h2h_games.iter().filter(|g| g.date < as_of).collect();
        let h2h = if meetings.is_empty() {
            H2hSummary::default()
        } else {
            let n = meetings.len() as f64;
            H2hSummary {
                games: meetings.len() as u32,
                home_avg_scored: meetings.iter().map(|g| g.home_points).sum::<f64>() / n,
                home_avg_allowed: meetings.iter().map(|g| g.away_points).sum::<f64>() / n,
            }
        };

        MatchupProfile {
            home_id: home_id.to_string(),
            away_id: away_id.to_string(),
            as_of,
            h2h,
            home_splits: archetype_splits(home_logs, tuning, as_of),
            away_splits: archetype_splits(away_logs, tuning, as_of),
        }
    }
}

fn archetype_splits(logs: &[GameLog], tuning: &MatchupTuning, as_of: NaiveDate) -> ArchetypeSplits {
    let games: Vec<&GameLog> = logs.iter().filter(|g| g.date < as_of).collect();
    ArchetypeSplits {
        vs_fast: sample(&games, |g| g.opp_season_pace >= tuning.fast_pace_threshold),
        vs_slow: sample(&games, |g| g.opp_season_pace <= tuning.slow_pace_threshold),
        vs_top_defense: sample(&games, |g| g.opp_def_rank <= tuning.top_defense_rank),
        vs_bottom_defense: sample(&games, |g| g.opp_def_rank >= tuning.bottom_defense_rank),
    }
}

fn sample(games: &[&GameLog], pred: impl Fn(&GameLog) -> bool) -> Option<SplitSample> {
    let matched: Vec<&&GameLog> = games.iter().filter(|g| pred(g)).collect();
    if matched.is_empty() {
        return None;
    }
    Some(SplitSample {
        games: matched.len() as u32,
        ppg: matched.iter().map(|g| g.points_for).sum::<f64>() / matched.len() as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn log(day: u32, points: f64, opp_pace: f64, opp_def_rank: u32) -> GameLog {
        GameLog {
            date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            opponent: "OPP".into(),
            home: true,
            points_for: points,
            points_against: 110.0,
            pace: 99.0,
            fg_pct: 0.47,
            three_pct: 0.36,
            three_attempts: 34.0,
            opp_fg_pct: 0.46,
            opp_three_pct: 0.35,
            ft_rate: 0.25,
            turnovers: 14.0,
            assists: 26.0,
            off_rating: 114.0,
            def_rating: 112.0,
            opp_season_pace: opp_pace,
            opp_def_rank,
            won: true,
        }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
    }

    #[test]
    fn h2h_averages_come_from_meetings_before_as_of() {
        let meetings = vec![
            H2hGame {
                date: NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
                home_points: 120.0,
                away_points: 100.0,
            },
            H2hGame {
                date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
                home_points: 110.0,
                away_points: 114.0,
            },
            H2hGame {
                date: NaiveDate::from_ymd_opt(2026, 3, 1).unwrap(),
                home_points: 150.0,
                away_points: 150.0,
            },
        ];
        let p = MatchupProfile::build(
            "BOS",
            "NYK",
            &meetings,
            &[],
            &[],
            &MatchupTuning::default(),
            as_of(),
        );
        assert_eq!(p.h2h.games, 2);
        assert_relative_eq!(p.h2h.home_avg_scored, 115.0, epsilon = 1e-12);
        assert_relative_eq!(p.h2h.home_avg_allowed, 107.0, epsilon = 1e-12);
    }

    #[test]
    fn no_meetings_yields_a_zero_sample_summary() {
        let p = MatchupProfile::build(
            "BOS",
            "NYK",
            &[],
            &[],
            &[],
            &MatchupTuning::default(),
            as_of(),
        );
        assert_eq!(p.h2h.games, 0);
        assert!(p.home_splits.vs_fast.is_none());
    }

    #[test]
    fn archetype_splits_tag_by_opponent_pace_and_rank() {
        let logs = vec![
            log(1, 118.0, 103.0, 25), // fast + bottom defense
            log(2, 112.0, 102.0, 8),  // fast + top defense
            log(3, 104.0, 96.0, 8),   // slow + top defense
            log(4, 110.0, 99.0, 15),  // neither archetype
        ];
        let p = MatchupProfile::build(
            "BOS",
            "NYK",
            &[],
            &logs,
            &[],
            &MatchupTuning::default(),
            as_of(),
        );
        let fast = p.home_splits.vs_fast.unwrap();
        assert_eq!(fast.games, 2);
        assert_relative_eq!(fast.ppg, 115.0, epsilon = 1e-12);

        let slow = p.home_splits.vs_slow.unwrap();
        assert_eq!(slow.games, 1);

        let top = p.home_splits.vs_top_defense.unwrap();
        assert_eq!(top.games, 2);
        assert_relative_eq!(top.ppg, 108.0, epsilon = 1e-12);

        let bottom = p.home_splits.vs_bottom_defense.unwrap();
        assert_eq!(bottom.games, 1);
        assert_relative_eq!(bottom.ppg, 118.0, epsilon = 1e-12);
    }
}
