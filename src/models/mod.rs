pub mod game;
pub mod leaderboard;
pub mod player;
