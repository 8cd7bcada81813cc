use crate::error::AppError;
use crate::models::leaderboard::AdjustScoreForm;
use crate::services::leaderboard as service;
use crate::state::AppState;
use ntex::web::{self, HttpResponse};

pub async fn adjust(
    state: web::types::State<AppState>,
    form: web::types::Form<AdjustScoreForm>,
) -> Result<HttpResponse, AppError> {
    let outcome = service::adjust_score(&state, form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(&outcome))
}
