use crate::error::AppError;
use crate::models::player::{DeletePlayerForm, RegisterPlayerForm};
use crate::services::players as service;
use crate::state::AppState;
use ntex::web::{self, HttpResponse};

pub async fn register(
    state: web::types::State<AppState>,
    form: web::types::Form<RegisterPlayerForm>,
) -> Result<HttpResponse, AppError> {
    let outcome = service::register_player(&state, form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(&outcome))
}

pub async fn delete(
    state: web::types::State<AppState>,
    form: web::types::Form<DeletePlayerForm>,
) -> Result<HttpResponse, AppError> {
    let outcome = service::delete_player(&state, form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(&outcome))
}
