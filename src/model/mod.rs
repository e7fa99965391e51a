pub mod game_log;
pub mod matchup;
pub mod opponent;
pub mod team;

pub use game_log::{GameLog, H2hGame};
pub use matchup::{ArchetypeSplits, H2hSummary, MatchupProfile, SplitSample};
pub use opponent::OpponentAllowedStats;
pub use team::{ModelError, SplitRecord, StatBundle, TeamProfile, TeamRanks};
