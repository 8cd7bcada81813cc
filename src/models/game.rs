use serde::{Deserialize, Serialize};

/// One player's side of a reported game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerResult {
    pub id: String,
    pub name: String,
    pub faction: String,
    pub warband: String,
    pub score: i64,
}

/// An entry in the append-only game results document. `round_history` is an
/// opaque JSON value from the front end, preserved verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResultEntry {
    pub id: String,
    pub date: String,
    pub battleplan: String,
    pub total_rounds: i64,
    pub player1: PlayerResult,
    pub player2: PlayerResult,
    pub notes: String,
    pub round_history: serde_json::Value,
    pub submitted_at: String,
}

#[derive(Debug, Deserialize)]
pub struct SubmitGameForm {
    pub player1_id: Option<String>,
    pub player1_name: Option<String>,
    pub player1_score: Option<String>,
    pub player1_faction: Option<String>,
    pub player1_warband: Option<String>,
    pub player2_id: Option<String>,
    pub player2_name: Option<String>,
    pub player2_score: Option<String>,
    pub player2_faction: Option<String>,
    pub player2_warband: Option<String>,
    pub battleplan_name: Option<String>,
    pub total_rounds: Option<String>,
    pub game_date: Option<String>,
    pub game_notes: Option<String>,
    pub round_history: Option<String>,
}

/// A game report that passed validation.
#[derive(Debug)]
pub struct GameReport {
    pub player1: PlayerResult,
    pub player2: PlayerResult,
    pub battleplan_name: String,
    pub total_rounds: i64,
    pub game_date: String,
    pub game_notes: String,
    pub round_history: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub struct GameSubmissionOutcome {
    pub message: String,
    pub game_id: String,
}
