use crate::error::AppError;
use crate::models::game::{
    GameReport, GameResultEntry, GameSubmissionOutcome, PlayerResult, SubmitGameForm,
};
use crate::models::leaderboard::LeaderboardEntry;
use crate::services::leaderboard::sort_by_points;
use crate::services::{read_collection, to_pretty_json, MAX_WRITE_ATTEMPTS};
use crate::state::AppState;
use crate::store::{CommitFile, StoreError};
use crate::validation;
use chrono::{SecondsFormat, Utc};
use tracing::warn;

/// Credit both players' scores and refresh their denormalized fields. A
/// player missing from the leaderboard gets a fresh entry seeded with the
/// submitted score, healing a board that lost a registered player.
pub(crate) fn apply_game_result(
    mut board: Vec<LeaderboardEntry>,
    report: &GameReport,
) -> Vec<LeaderboardEntry> {
    for side in [&report.player1, &report.player2] {
        match board.iter_mut().find(|e| e.player_id == side.id) {
            Some(entry) => {
                entry.campaign_points += side.score;
                entry.faction = side.faction.clone();
                entry.warband_name = side.warband.clone();
            }
            None => {
                warn!(player_id = %side.id, player_name = %side.name,
                    "player missing from leaderboard, adding a new entry");
                board.push(LeaderboardEntry {
                    player_id: side.id.clone(),
                    player_name: side.name.clone(),
                    faction: side.faction.clone(),
                    warband_name: side.warband.clone(),
                    campaign_points: side.score,
                    territories_held: 0,
                });
            }
        }
    }
    sort_by_points(&mut board);
    board
}

pub(crate) fn build_game_entry(
    report: &GameReport,
    id: String,
    submitted_at: String,
) -> GameResultEntry {
    GameResultEntry {
        id,
        date: report.game_date.clone(),
        battleplan: report.battleplan_name.clone(),
        total_rounds: report.total_rounds,
        player1: report.player1.clone(),
        player2: report.player2.clone(),
        notes: report.game_notes.clone(),
        round_history: report.round_history.clone(),
        submitted_at,
    }
}

fn validate_report(form: SubmitGameForm) -> Result<GameReport, AppError> {
    let player1 = PlayerResult {
        id: validation::require_field(form.player1_id.as_deref(), "player1_id")?,
        name: validation::require_name(form.player1_name.as_deref(), "player1_name")?,
        faction: validation::require_name(form.player1_faction.as_deref(), "player1_faction")?,
        warband: validation::require_name(form.player1_warband.as_deref(), "player1_warband")?,
        score: validation::require_score(form.player1_score.as_deref(), "player1_score")?,
    };
    let player2 = PlayerResult {
        id: validation::require_field(form.player2_id.as_deref(), "player2_id")?,
        name: validation::require_name(form.player2_name.as_deref(), "player2_name")?,
        faction: validation::require_name(form.player2_faction.as_deref(), "player2_faction")?,
        warband: validation::require_name(form.player2_warband.as_deref(), "player2_warband")?,
        score: validation::require_score(form.player2_score.as_deref(), "player2_score")?,
    };
    Ok(GameReport {
        player1,
        player2,
        battleplan_name: validation::require_field(form.battleplan_name.as_deref(), "battleplan_name")?,
        total_rounds: validation::require_int(form.total_rounds.as_deref(), "total_rounds")?,
        game_date: validation::require_game_date(form.game_date.as_deref())?,
        game_notes: form
            .game_notes
            .map(|n| n.trim().to_string())
            .unwrap_or_default(),
        round_history: validation::require_round_history(form.round_history.as_deref())?,
    })
}

/// The leaderboard and the game log must change together, so this is the
/// one operation that goes through the atomic multi-document commit.
pub async fn submit_game(
    state: &AppState,
    form: SubmitGameForm,
) -> Result<GameSubmissionOutcome, AppError> {
    let report = validate_report(form)?;

    // Fixed up front so a conflict retry re-commits the same entry.
    let game_id = Utc::now().timestamp_millis().to_string();
    let submitted_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);

    let message = format!(
        "Game report for {}: {} ({}pts) vs {} ({}pts)",
        report.battleplan_name,
        report.player1.name,
        report.player1.score,
        report.player2.name,
        report.player2.score
    );

    let store = state.store.as_ref();
    let mut attempt = 0;
    loop {
        attempt += 1;

        let (board, _) = read_collection::<LeaderboardEntry>(
            store,
            &state.config.leaderboard_path,
        )
        .await?;
        let (mut games, _) = read_collection::<GameResultEntry>(
            store,
            &state.config.game_results_path,
        )
        .await?;

        let board = apply_game_result(board, &report);
        games.push(build_game_entry(&report, game_id.clone(), submitted_at.clone()));

        let files = [
            CommitFile {
                path: state.config.leaderboard_path.clone(),
                bytes: to_pretty_json(&board)?,
            },
            CommitFile {
                path: state.config.game_results_path.clone(),
                bytes: to_pretty_json(&games)?,
            },
        ];

        match store.commit_many(&files, &message).await {
            Ok(()) => break,
            Err(StoreError::Conflict { .. }) if attempt < MAX_WRITE_ATTEMPTS => {
                warn!(attempt, "commit conflict, retrying from a fresh read");
            }
            Err(e) => return Err(e.into()),
        }
    }

    state
        .notifier
        .rebuild(state.config.game_hook_url.as_deref())
        .await;

    Ok(GameSubmissionOutcome {
        message: "Game results submitted, leaderboard and game history updated".to_string(),
        game_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn side(id: &str, name: &str, score: i64) -> PlayerResult {
        PlayerResult {
            id: id.to_string(),
            name: name.to_string(),
            faction: "Skaven".to_string(),
            warband: format!("{name}'s Horde"),
            score,
        }
    }

    fn entry(id: &str, points: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            player_id: id.to_string(),
            player_name: format!("Player {id}"),
            faction: "Old Faction".to_string(),
            warband_name: "Old Warband".to_string(),
            campaign_points: points,
            territories_held: 2,
        }
    }

    fn report(player1: PlayerResult, player2: PlayerResult) -> GameReport {
        GameReport {
            player1,
            player2,
            battleplan_name: "The Vice".to_string(),
            total_rounds: 4,
            game_date: "2026-08-01".to_string(),
            game_notes: String::new(),
            round_history: json!([{"round": 1, "p1": 2, "p2": 1}]),
        }
    }

    #[test]
    fn both_players_are_credited_and_denormalized_fields_refresh() {
        let board = vec![entry("a", 10), entry("b", 4)];
        let report = report(side("a", "Alpha", 3), side("b", "Beta", 5));
        let board = apply_game_result(board, &report);

        let a = board.iter().find(|e| e.player_id == "a").unwrap();
        let b = board.iter().find(|e| e.player_id == "b").unwrap();
        assert_eq!(a.campaign_points, 13);
        assert_eq!(b.campaign_points, 9);
        assert_eq!(a.faction, "Skaven");
        assert_eq!(a.warband_name, "Alpha's Horde");
        // Territories are untouched by game reports.
        assert_eq!(a.territories_held, 2);
    }

    #[test]
    fn missing_player_gets_a_synthesized_entry() {
        let board = vec![entry("a", 10)];
        let report = report(side("a", "Alpha", 2), side("ghost", "Ghost", 7));
        let board = apply_game_result(board, &report);

        let ghost = board.iter().find(|e| e.player_id == "ghost").unwrap();
        assert_eq!(ghost.campaign_points, 7);
        assert_eq!(ghost.territories_held, 0);
        assert_eq!(ghost.player_name, "Ghost");
    }

    #[test]
    fn board_is_sorted_descending_after_the_game() {
        let board = vec![entry("a", 1), entry("b", 2)];
        let report = report(side("a", "Alpha", 10), side("b", "Beta", 0));
        let board = apply_game_result(board, &report);
        assert_eq!(board[0].player_id, "a");
        assert_eq!(board[1].player_id, "b");
    }

    #[test]
    fn game_entry_preserves_the_report_verbatim() {
        let report = report(side("a", "Alpha", 3), side("b", "Beta", 5));
        let entry = build_game_entry(&report, "1722500000000".to_string(), "now".to_string());

        assert_eq!(entry.id, "1722500000000");
        assert_eq!(entry.battleplan, "The Vice");
        assert_eq!(entry.total_rounds, 4);
        assert_eq!(entry.player1, report.player1);
        assert_eq!(entry.player2, report.player2);
        assert_eq!(entry.round_history, json!([{"round": 1, "p1": 2, "p2": 1}]));
    }
}
