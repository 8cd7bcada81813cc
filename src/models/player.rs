use serde::{Deserialize, Serialize};

/// A registered campaign participant, as stored in the players document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub id: String,
    pub name: String,
    pub faction: String,
    pub warband_name: String,
}

/// Raw registration form body. Presence and content are checked in
/// `validation` so missing fields produce a proper 400 instead of a
/// deserialization error.
#[derive(Debug, Deserialize)]
pub struct RegisterPlayerForm {
    pub player_name: Option<String>,
    pub player_faction: Option<String>,
    pub warband_name: Option<String>,
}

/// A registration that passed validation.
#[derive(Debug)]
pub struct Registration {
    pub player_name: String,
    pub player_faction: String,
    pub warband_name: String,
}

#[derive(Debug, Serialize)]
pub struct RegistrationOutcome {
    pub message: String,
    pub player_id: String,
}

#[derive(Debug, Deserialize)]
pub struct DeletePlayerForm {
    pub player_id: Option<String>,
    pub admin_key: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DeletionOutcome {
    pub message: String,
    pub player_id: String,
}
