use crate::error::AppError;
use crate::models::leaderboard::LeaderboardEntry;
use crate::models::player::{
    DeletePlayerForm, DeletionOutcome, PlayerRecord, Registration, RegisterPlayerForm,
    RegistrationOutcome,
};
use crate::services::update_collection;
use crate::state::AppState;
use crate::validation;
use uuid::Uuid;

/// Ids keep a readable slug of the player's name; the suffix makes
/// simultaneous registrations of similar names distinct.
fn player_id_for(name: &str) -> String {
    let slug: String = name
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let mut suffix = Uuid::new_v4().simple().to_string();
    suffix.truncate(6);
    format!("{slug}-{suffix}")
}

/// Append a new player, rejecting case-insensitive name or warband
/// collisions with the existing roster.
pub(crate) fn add_player(
    mut players: Vec<PlayerRecord>,
    registration: &Registration,
    id: &str,
) -> Result<(Vec<PlayerRecord>, PlayerRecord), AppError> {
    let taken = players.iter().any(|p| {
        p.name.to_lowercase() == registration.player_name.to_lowercase()
            || p.warband_name.to_lowercase() == registration.warband_name.to_lowercase()
    });
    if taken {
        return Err(AppError::Conflict(format!(
            "Player name \"{}\" or warband name \"{}\" is already registered, please choose unique names",
            registration.player_name, registration.warband_name
        )));
    }

    let record = PlayerRecord {
        id: id.to_string(),
        name: registration.player_name.clone(),
        faction: registration.player_faction.clone(),
        warband_name: registration.warband_name.clone(),
    };
    players.push(record.clone());
    Ok((players, record))
}

/// Remove the player with the given id, yielding the removed record for the
/// follow-up leaderboard write and the commit message.
pub(crate) fn remove_player(
    mut players: Vec<PlayerRecord>,
    player_id: &str,
) -> Result<(Vec<PlayerRecord>, PlayerRecord), AppError> {
    match players.iter().position(|p| p.id == player_id) {
        Some(idx) => {
            let removed = players.remove(idx);
            Ok((players, removed))
        }
        None => Err(AppError::NotFound(format!(
            "Player with id {player_id} not found"
        ))),
    }
}

pub async fn register_player(
    state: &AppState,
    form: RegisterPlayerForm,
) -> Result<RegistrationOutcome, AppError> {
    let registration = Registration {
        player_name: validation::require_name(form.player_name.as_deref(), "player_name")?,
        player_faction: validation::require_name(form.player_faction.as_deref(), "player_faction")?,
        warband_name: validation::require_name(form.warband_name.as_deref(), "warband_name")?,
    };

    // Generated once so a conflict retry does not mint a second id.
    let id = player_id_for(&registration.player_name);

    let record = update_collection(
        state.store.as_ref(),
        &state.config.players_path,
        &format!("Register player {}", registration.player_name),
        |players| add_player(players, &registration, &id),
    )
    .await?;

    update_collection::<LeaderboardEntry, _, _>(
        state.store.as_ref(),
        &state.config.leaderboard_path,
        &format!("Initialize {} in the leaderboard", record.name),
        |mut board| {
            board.push(LeaderboardEntry::starter(&record));
            Ok((board, ()))
        },
    )
    .await?;

    state
        .notifier
        .rebuild(state.config.registration_hook_url.as_deref())
        .await;

    Ok(RegistrationOutcome {
        message: format!(
            "Player {} registered and added to the leaderboard",
            record.name
        ),
        player_id: record.id,
    })
}

pub async fn delete_player(
    state: &AppState,
    form: DeletePlayerForm,
) -> Result<DeletionOutcome, AppError> {
    validation::verify_admin_key(form.admin_key.as_deref(), &state.config.admin_key)?;
    let player_id = validation::require_field(form.player_id.as_deref(), "player_id")?;

    let removed = update_collection(
        state.store.as_ref(),
        &state.config.players_path,
        &format!("Remove player {player_id} from the roster"),
        |players| remove_player(players, &player_id),
    )
    .await?;

    // Best effort: a leaderboard row may never have existed for this player.
    update_collection::<LeaderboardEntry, _, _>(
        state.store.as_ref(),
        &state.config.leaderboard_path,
        &format!("Remove {} from the leaderboard", removed.name),
        |mut board| {
            board.retain(|e| e.player_id != player_id);
            Ok((board, ()))
        },
    )
    .await?;

    state
        .notifier
        .rebuild(state.config.admin_hook_url.as_deref())
        .await;

    Ok(DeletionOutcome {
        message: format!("Player {} removed", removed.name),
        player_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(name: &str, warband: &str) -> Registration {
        Registration {
            player_name: name.to_string(),
            player_faction: "Gloomspite Gitz".to_string(),
            warband_name: warband.to_string(),
        }
    }

    fn record(id: &str, name: &str, warband: &str) -> PlayerRecord {
        PlayerRecord {
            id: id.to_string(),
            name: name.to_string(),
            faction: "Gloomspite Gitz".to_string(),
            warband_name: warband.to_string(),
        }
    }

    #[test]
    fn generated_ids_carry_the_name_slug() {
        let id = player_id_for("Da Grot King!");
        assert!(id.starts_with("dagrotking-"));
        assert_ne!(player_id_for("Da Grot King!"), id);
    }

    #[test]
    fn add_player_appends_record() {
        let (players, added) =
            add_player(Vec::new(), &registration("Zogbak", "Moon Loonz"), "zogbak-abc123")
                .unwrap();
        assert_eq!(players.len(), 1);
        assert_eq!(added.id, "zogbak-abc123");
        assert_eq!(players[0], added);
    }

    #[test]
    fn name_collision_is_case_insensitive() {
        let existing = vec![record("zogbak-1", "Zogbak", "Moon Loonz")];
        let err = add_player(existing, &registration("ZOGBAK", "Other Warband"), "x")
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn warband_collision_is_case_insensitive() {
        let existing = vec![record("zogbak-1", "Zogbak", "Moon Loonz")];
        let err = add_player(existing, &registration("Skraps", "moon loonz"), "x").unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[test]
    fn remove_player_returns_the_removed_record() {
        let players = vec![
            record("a-1", "Alpha", "First"),
            record("b-2", "Beta", "Second"),
        ];
        let (players, removed) = remove_player(players, "a-1").unwrap();
        assert_eq!(removed.name, "Alpha");
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].id, "b-2");
    }

    #[test]
    fn removing_an_unknown_id_is_not_found() {
        let players = vec![record("a-1", "Alpha", "First")];
        let err = remove_player(players, "ghost").unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
