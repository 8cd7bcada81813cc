use crate::models::player::PlayerRecord;
use serde::{Deserialize, Serialize};

/// One row of the campaign leaderboard document. `player_id` references a
/// `PlayerRecord`; name, faction and warband are denormalized for the site.
///
/// `territories_held` defaults on deserialization because documents written
/// before the field existed do not carry it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub player_id: String,
    pub player_name: String,
    pub faction: String,
    pub warband_name: String,
    pub campaign_points: i64,
    #[serde(default)]
    pub territories_held: i64,
}

impl LeaderboardEntry {
    /// Zero-score entry mirroring a freshly registered player.
    pub fn starter(record: &PlayerRecord) -> Self {
        Self {
            player_id: record.id.clone(),
            player_name: record.name.clone(),
            faction: record.faction.clone(),
            warband_name: record.warband_name.clone(),
            campaign_points: 0,
            territories_held: 0,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AdjustScoreForm {
    pub player_id: Option<String>,
    pub points_change: Option<String>,
    pub territories_change: Option<String>,
    pub admin_key: Option<String>,
}

/// A score adjustment that passed validation. Deltas are signed; the
/// transformation floors the resulting counters at zero.
#[derive(Debug)]
pub struct ScoreAdjustment {
    pub player_id: String,
    pub points_change: i64,
    pub territories_change: i64,
}

#[derive(Debug, Serialize)]
pub struct AdjustScoreOutcome {
    pub message: String,
    pub player_id: String,
    pub campaign_points: i64,
    pub territories_held: i64,
}
