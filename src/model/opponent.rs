//! Opponent-allowed statistics: the season-average shooting, pace, and
//! scoring that a team's opponents have recorded against it. Symmetric
//! by construction — team A's "allowed" numbers are the averages of what
//! every opponent actually did in A's games.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::game_log::GameLog;
use crate::tuning::LeagueAverages;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OpponentAllowedStats {
    pub fg_pct: f64,
    pub three_pct: f64,
    pub pace: f64,
    pub ppg: f64,
    /// True when the team had no games and league averages were
    /// substituted.
    pub is_fallback: bool,
}

impl OpponentAllowedStats {
    /// Derive allowed stats from the team's games before `as_of`,
    /// falling back to league averages when no games exist.
    pub fn from_logs(logs: &[GameLog], league: &LeagueAverages, as_of: NaiveDate) -> Self {
        let games: Vec<&GameLog> = logs.iter().filter(|g| g.date < as_of).collect();
        if games.is_empty() {
            return Self::league_fallback(league);
        }
        let n = games.len() as f64;
        OpponentAllowedStats {
            fg_pct: games.iter().map(|g| g.opp_fg_pct).sum::<f64>() / n,
            three_pct: games.iter().map(|g| g.opp_three_pct).sum::<f64>() / n,
            // Pace is shared by both teams in a game, so the "allowed"
            // pace is just the average pace of the team's games.
            pace: games.iter().map(|g| g.pace).sum::<f64>() / n,
            ppg: games.iter().map(|g| g.points_against).sum::<f64>() / n,
            is_fallback: false,
        }
    }

    pub fn league_fallback(league: &LeagueAverages) -> Self {
        OpponentAllowedStats {
            fg_pct: league.fg_pct,
            three_pct: league.three_pct,
            pace: league.pace,
            ppg: league.ppg,
            is_fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn log(day: u32, opp_fg: f64, opp_three: f64, pace: f64, allowed: f64) -> GameLog {
        GameLog {
            date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            opponent: "OPP".into(),
            home: true,
            points_for: 112.0,
            points_against: allowed,
            pace,
            fg_pct: 0.47,
            three_pct: 0.36,
            three_attempts: 34.0,
            opp_fg_pct: opp_fg,
            opp_three_pct: opp_three,
            ft_rate: 0.25,
            turnovers: 14.0,
            assists: 26.0,
            off_rating: 114.0,
            def_rating: 112.0,
            opp_season_pace: 99.0,
            opp_def_rank: 15,
            won: true,
        }
    }

    #[test]
    fn averages_the_opponent_columns() {
        let logs = vec![
            log(1, 0.50, 0.40, 102.0, 120.0),
            log(2, 0.44, 0.32, 96.0, 104.0),
        ];
        let as_of = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let allowed =
            OpponentAllowedStats::from_logs(&logs, &LeagueAverages::default(), as_of);
        assert!(!allowed.is_fallback);
        assert_relative_eq!(allowed.fg_pct, 0.47, epsilon = 1e-12);
        assert_relative_eq!(allowed.three_pct, 0.36, epsilon = 1e-12);
        assert_relative_eq!(allowed.pace, 99.0, epsilon = 1e-12);
        assert_relative_eq!(allowed.ppg, 112.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_games_substitutes_league_averages() {
        let league = LeagueAverages::default();
        let as_of = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let allowed = OpponentAllowedStats::from_logs(&[], &league, as_of);
        assert!(allowed.is_fallback);
        assert_relative_eq!(allowed.ppg, league.ppg, epsilon = 1e-12);
        assert_relative_eq!(allowed.fg_pct, league.fg_pct, epsilon = 1e-12);
    }
}
