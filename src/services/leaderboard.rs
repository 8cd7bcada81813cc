use crate::error::AppError;
use crate::models::leaderboard::{
    AdjustScoreForm, AdjustScoreOutcome, LeaderboardEntry, ScoreAdjustment,
};
use crate::services::update_collection;
use crate::state::AppState;
use crate::validation;

/// Stable sort, so equal scores keep their relative order.
pub(crate) fn sort_by_points(board: &mut [LeaderboardEntry]) {
    board.sort_by(|a, b| b.campaign_points.cmp(&a.campaign_points));
}

/// Apply signed deltas to one player's counters, flooring both at zero,
/// then restore the descending-points order.
pub(crate) fn adjust_entry(
    mut board: Vec<LeaderboardEntry>,
    adjustment: &ScoreAdjustment,
) -> Result<(Vec<LeaderboardEntry>, LeaderboardEntry), AppError> {
    let entry = board
        .iter_mut()
        .find(|e| e.player_id == adjustment.player_id)
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Player with id {} not found in the leaderboard",
                adjustment.player_id
            ))
        })?;

    entry.campaign_points = (entry.campaign_points + adjustment.points_change).max(0);
    entry.territories_held = (entry.territories_held + adjustment.territories_change).max(0);
    let snapshot = entry.clone();

    sort_by_points(&mut board);
    Ok((board, snapshot))
}

pub async fn adjust_score(
    state: &AppState,
    form: AdjustScoreForm,
) -> Result<AdjustScoreOutcome, AppError> {
    validation::verify_admin_key(form.admin_key.as_deref(), &state.config.admin_key)?;
    let adjustment = ScoreAdjustment {
        player_id: validation::require_field(form.player_id.as_deref(), "player_id")?,
        points_change: validation::require_int(form.points_change.as_deref(), "points_change")?,
        territories_change: validation::require_int(
            form.territories_change.as_deref(),
            "territories_change",
        )?,
    };

    let message = format!(
        "Adjust score for {} (points {:+}, territories {:+})",
        adjustment.player_id, adjustment.points_change, adjustment.territories_change
    );
    let updated = update_collection(
        state.store.as_ref(),
        &state.config.leaderboard_path,
        &message,
        |board| adjust_entry(board, &adjustment),
    )
    .await?;

    state
        .notifier
        .rebuild(state.config.admin_hook_url.as_deref())
        .await;

    Ok(AdjustScoreOutcome {
        message: format!("Score adjusted for {}", updated.player_name),
        player_id: updated.player_id,
        campaign_points: updated.campaign_points,
        territories_held: updated.territories_held,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, points: i64, territories: i64) -> LeaderboardEntry {
        LeaderboardEntry {
            player_id: id.to_string(),
            player_name: format!("Player {id}"),
            faction: "Ironjawz".to_string(),
            warband_name: format!("Warband {id}"),
            campaign_points: points,
            territories_held: territories,
        }
    }

    #[test]
    fn deltas_apply_and_floor_at_zero() {
        let board = vec![entry("a", 5, 1)];
        let adjustment = ScoreAdjustment {
            player_id: "a".to_string(),
            points_change: -10,
            territories_change: 2,
        };
        let (board, updated) = adjust_entry(board, &adjustment).unwrap();
        assert_eq!(updated.campaign_points, 0);
        assert_eq!(updated.territories_held, 3);
        assert_eq!(board[0].campaign_points, 0);
    }

    #[test]
    fn board_is_resorted_descending_after_adjustment() {
        let board = vec![entry("a", 10, 0), entry("b", 8, 0), entry("c", 6, 0)];
        let adjustment = ScoreAdjustment {
            player_id: "c".to_string(),
            points_change: 9,
            territories_change: 0,
        };
        let (board, _) = adjust_entry(board, &adjustment).unwrap();
        let order: Vec<&str> = board.iter().map(|e| e.player_id.as_str()).collect();
        assert_eq!(order, ["c", "a", "b"]);
    }

    #[test]
    fn unknown_player_is_not_found() {
        let board = vec![entry("a", 5, 0)];
        let adjustment = ScoreAdjustment {
            player_id: "ghost".to_string(),
            points_change: 1,
            territories_change: 0,
        };
        let err = adjust_entry(board, &adjustment).unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
