//! Team profile construction.
//!
//! A [`TeamProfile`] is an immutable snapshot of one team's season and
//! recent form as of a given date. It is built fresh per request from
//! the team's game log; nothing in the pipeline mutates it. Fields that
//! need a minimum sample (home/road splits, pace volatility) are
//! `Option` and stay `None` rather than being silently averaged from
//! too little data.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::game_log::GameLog;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("team {0} has no completed games before the as-of date")]
    EmptyGameLog(String),
    #[error("league rank {0} out of range 1..=30")]
    RankOutOfRange(u32),
    #[error("non-finite value in game log for team {0}")]
    NonFiniteInput(String),
}

/// League ranks supplied by the caller (1 = best, 30 = worst). The
/// builder cannot derive these from a single team's log.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamRanks {
    pub offense: u32,
    pub defense: u32,
}

/// Averages over some window of games.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct StatBundle {
    pub ppg: f64,
    pub pace: f64,
    pub off_rating: f64,
    pub def_rating: f64,
    pub fg_pct: f64,
    pub three_pct: f64,
    pub three_attempts: f64,
    pub ft_rate: f64,
    pub turnovers: f64,
    pub assists: f64,
}

/// A home or road split, only materialized at ≥5 games.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct SplitRecord {
    pub games: u32,
    pub win_pct: f64,
    pub ppg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TeamProfile {
    pub team_id: String,
    pub as_of: NaiveDate,
    pub games_played: u32,
    pub season: StatBundle,
    /// Last-5 averages; equals `season` when fewer than 5 games exist.
    pub last5: StatBundle,
    pub home: Option<SplitRecord>,
    pub road: Option<SplitRecord>,
    /// Wins in the last three home games, if three have been played.
    pub last3_home_wins: Option<u32>,
    /// Pace standard deviation over the last 10 games.
    pub pace_stddev_last10: Option<f64>,
    /// Last-5 net rating minus season net rating.
    pub recent_rating_change: f64,
    /// Last-5 PPG minus season PPG.
    pub recent_ppg_change: f64,
    /// Last-5 DRTG minus season DRTG (negative = defense improving).
    pub recent_def_trend: f64,
    pub last_game_total: Option<f64>,
    pub last_game_points: Option<f64>,
    pub off_rank: u32,
    pub def_rank: u32,
}

const MIN_SPLIT_GAMES: usize = 5;
const VOLATILITY_WINDOW: usize = 10;

impl TeamProfile {
    /// Build a profile from the games completed strictly before `as_of`.
    pub fn build(
        team_id: &str,
        ranks: TeamRanks,
        logs: &[GameLog],
        as_of: NaiveDate,
    ) -> Result<Self, ModelError> {
        for rank in [ranks.offense, ranks.defense] {
            if !(1..=30).contains(&rank) {
                return Err(ModelError::RankOutOfRange(rank));
            }
        }

        let mut games: Vec<&GameLog> = logs.iter().filter(|g| g.date < as_of).collect();
        games.sort_by_key(|g| g.date);
        if games.is_empty() {
            return Err(ModelError::EmptyGameLog(team_id.to_string()));
        }
        if games.iter().any(|g| !finite(g)) {
            return Err(ModelError::NonFiniteInput(team_id.to_string()));
        }

        let season = bundle(&games);
        let recent_window = &games[games.len().saturating_sub(5)..];
        let last5 = bundle(recent_window);

        let home_games: Vec<&GameLog> = games.iter().filter(|g| g.home).copied().collect();
        let road_games: Vec<&GameLog> = games.iter().filter(|g| !g.home).copied().collect();

        let last3_home_wins = if home_games.len() >= 3 {
            let last3 = &home_games[home_games.len() - 3..];
            Some(last3.iter().filter(|g| g.won).count() as u32)
        } else {
            None
        };

        let pace_stddev_last10 = if games.len() >= VOLATILITY_WINDOW {
            let window = &games[games.len() - VOLATILITY_WINDOW..];
            Some(stddev(window.iter().map(|g| g.pace)))
        } else {
            None
        };

        let last = games[games.len() - 1];

        Ok(TeamProfile {
            team_id: team_id.to_string(),
            as_of,
            games_played: games.len() as u32,
            recent_rating_change: (last5.off_rating - last5.def_rating)
                - (season.off_rating - season.def_rating),
            recent_ppg_change: last5.ppg - season.ppg,
            recent_def_trend: last5.def_rating - season.def_rating,
            season,
            last5,
            home: split(&home_games),
            road: split(&road_games),
            last3_home_wins,
            pace_stddev_last10,
            last_game_total: Some(last.points_for + last.points_against),
            last_game_points: Some(last.points_for),
            off_rank: ranks.offense,
            def_rank: ranks.defense,
        })
    }
}

fn finite(g: &GameLog) -> bool {
    [
        g.points_for,
        g.points_against,
        g.pace,
        g.fg_pct,
        g.three_pct,
        g.three_attempts,
        g.opp_fg_pct,
        g.opp_three_pct,
        g.ft_rate,
        g.turnovers,
        g.assists,
        g.off_rating,
        g.def_rating,
        g.opp_season_pace,
    ]
    .iter()
    .all(|v| v.is_finite())
}

fn mean(values: impl Iterator<Item = f64>, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

fn stddev(values: impl Iterator<Item = f64> + Clone) -> f64 {
    let n = values.clone().count();
    if n == 0 {
        return 0.0;
    }
    let m = mean(values.clone(), n);
    let var = values.map(|v| (v - m).powi(2)).sum::<f64>() / n as f64;
    var.sqrt()
}

fn bundle(games: &[&GameLog]) -> StatBundle {
    let n = games.len();
    StatBundle {
        ppg: mean(games.iter().map(|g| g.points_for), n),
        pace: mean(games.iter().map(|g| g.pace), n),
        off_rating: mean(games.iter().map(|g| g.off_rating), n),
        def_rating: mean(games.iter().map(|g| g.def_rating), n),
        // Rate fields are clamped into their valid range rather than
        // rejected (out-of-range inputs are a clamp, not an error).
        fg_pct: mean(games.iter().map(|g| g.fg_pct), n).clamp(0.0, 1.0),
        three_pct: mean(games.iter().map(|g| g.three_pct), n).clamp(0.0, 1.0),
        three_attempts: mean(games.iter().map(|g| g.three_attempts), n).max(0.0),
        ft_rate: mean(games.iter().map(|g| g.ft_rate), n).clamp(0.0, 1.0),
        turnovers: mean(games.iter().map(|g| g.turnovers), n).max(0.0),
        assists: mean(games.iter().map(|g| g.assists), n).max(0.0),
    }
}

fn split(games: &[&GameLog]) -> Option<SplitRecord> {
    if games.len() < MIN_SPLIT_GAMES {
        return None;
    }
    let wins = games.iter().filter(|g| g.won).count();
    Some(SplitRecord {
        games: games.len() as u32,
        win_pct: wins as f64 / games.len() as f64,
        ppg: mean(games.iter().map(|g| g.points_for), games.len()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn log(day: u32, home: bool, points: f64, pace: f64, won: bool) -> GameLog {
        GameLog {
            date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            opponent: "OPP".into(),
            home,
            points_for: points,
            points_against: 110.0,
            pace,
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
            opp_season_pace: 99.0,
            opp_def_rank: 15,
            won,
        }
    }

    fn ranks() -> TeamRanks {
        TeamRanks {
            offense: 10,
            defense: 12,
        }
    }

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).unwrap()
    }

    #[test]
    fn empty_log_is_an_error() {
        let err = TeamProfile::build("BOS", ranks(), &[], as_of());
        assert!(matches!(err, Err(ModelError::EmptyGameLog(_))));
    }

    #[test]
    fn games_on_or_after_as_of_are_excluded() {
        let logs = vec![log(1, true, 100.0, 99.0, true), log(15, true, 200.0, 99.0, true)];
        let cutoff = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        let p = TeamProfile::build("BOS", ranks(), &logs, cutoff).unwrap();
        assert_eq!(p.games_played, 1);
        assert_relative_eq!(p.season.ppg, 100.0, epsilon = 1e-12);
    }

    #[test]
    fn last5_equals_season_with_few_games() {
        let logs = vec![
            log(1, true, 100.0, 99.0, true),
            log(2, false, 110.0, 101.0, false),
            log(3, true, 120.0, 97.0, true),
        ];
        let p = TeamProfile::build("BOS", ranks(), &logs, as_of()).unwrap();
        assert_relative_eq!(p.last5.ppg, p.season.ppg, epsilon = 1e-12);
        assert_relative_eq!(p.recent_ppg_change, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn last5_window_takes_most_recent_games() {
        let mut logs: Vec<GameLog> = (1..=10).map(|d| log(d, true, 100.0, 99.0, true)).collect();
        for d in 11..=15 {
            logs.push(log(d, true, 120.0, 99.0, true));
        }
        let p = TeamProfile::build("BOS", ranks(), &logs, as_of()).unwrap();
        assert_relative_eq!(p.last5.ppg, 120.0, epsilon = 1e-12);
        assert_relative_eq!(p.recent_ppg_change, 120.0 - p.season.ppg, epsilon = 1e-12);
    }

    #[test]
    fn splits_require_five_games() {
        let logs = vec![
            log(1, true, 100.0, 99.0, true),
            log(2, true, 100.0, 99.0, true),
            log(3, true, 100.0, 99.0, false),
            log(4, true, 100.0, 99.0, true),
            log(5, false, 100.0, 99.0, false),
        ];
        let p = TeamProfile::build("BOS", ranks(), &logs, as_of()).unwrap();
        assert!(p.home.is_none(), "4 home games must not form a split");
        assert!(p.road.is_none());

        let mut logs = logs;
        logs.push(log(6, true, 104.0, 99.0, true));
        let p = TeamProfile::build("BOS", ranks(), &logs, as_of()).unwrap();
        let home = p.home.expect("5 home games form a split");
        assert_eq!(home.games, 5);
        assert_relative_eq!(home.win_pct, 0.8, epsilon = 1e-12);
    }

    #[test]
    fn last3_home_wins_counts_only_home_games() {
        let logs = vec![
            log(1, true, 100.0, 99.0, false),
            log(2, false, 100.0, 99.0, true),
            log(3, true, 100.0, 99.0, true),
            log(4, false, 100.0, 99.0, false),
            log(5, true, 100.0, 99.0, true),
        ];
        let p = TeamProfile::build("BOS", ranks(), &logs, as_of()).unwrap();
        assert_eq!(p.last3_home_wins, Some(2));
    }

    #[test]
    fn pace_stddev_needs_ten_games() {
        let logs: Vec<GameLog> = (1..=9).map(|d| log(d, true, 100.0, 99.0, true)).collect();
        let p = TeamProfile::build("BOS", ranks(), &logs, as_of()).unwrap();
        assert!(p.pace_stddev_last10.is_none());

        let logs: Vec<GameLog> = (1..=10)
            .map(|d| log(d, true, 100.0, if d % 2 == 0 { 103.0 } else { 95.0 }, true))
            .collect();
        let p = TeamProfile::build("BOS", ranks(), &logs, as_of()).unwrap();
        assert_relative_eq!(p.pace_stddev_last10.unwrap(), 4.0, epsilon = 1e-12);
    }

    #[test]
    fn rank_out_of_range_is_rejected() {
        let logs = vec![log(1, true, 100.0, 99.0, true)];
        let bad = TeamRanks {
            offense: 0,
            defense: 12,
        };
        assert!(matches!(
            TeamProfile::build("BOS", bad, &logs, as_of()),
            Err(ModelError::RankOutOfRange(0))
        ));
    }

    #[test]
    fn rate_fields_are_clamped_not_rejected() {
        let mut g = log(1, true, 100.0, 99.0, true);
        g.fg_pct = 1.4;
        let p = TeamProfile::build("BOS", ranks(), &[g], as_of()).unwrap();
        assert_relative_eq!(p.season.fg_pct, 1.0, epsilon = 1e-12);
    }
}
