use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One completed game from a team's own log, as supplied by the data
/// layer. All rate fields are fractions (0.0–1.0); pace and ratings are
/// per-100-possession values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GameLog {
    pub date: NaiveDate,
    /// Opponent team id.
    pub opponent: String,
    /// True when the team played at home.
    pub home: bool,
    pub points_for: f64,
    pub points_against: f64,
    /// Possessions per 48 minutes in this game.
    pub pace: f64,
    pub fg_pct: f64,
    pub three_pct: f64,
    pub three_attempts: f64,
    /// What the opponent shot against this team in this game.
    pub opp_fg_pct: f64,
    pub opp_three_pct: f64,
    /// FTA relative to FGA.
    pub ft_rate: f64,
    pub turnovers: f64,
    pub assists: f64,
    pub off_rating: f64,
    pub def_rating: f64,
    /// Opponent's season pace at the time of the game, used for
    /// fast/slow archetype tagging.
    pub opp_season_pace: f64,
    /// Opponent's league defensive rank at the time of the game (1 =
    /// best, 30 = worst).
    pub opp_def_rank: u32,
    pub won: bool,
}

/// One head-to-head meeting between the two teams of a matchup, from the
/// perspective of the first (home) team of the ordered pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct H2hGame {
    pub date: NaiveDate,
    pub home_points: f64,
    pub away_points: f64,
}
