pub mod games;
pub mod leaderboard;
pub mod players;
