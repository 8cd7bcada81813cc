use crate::error::AppError;
use crate::models::game::SubmitGameForm;
use crate::services::games as service;
use crate::state::AppState;
use ntex::web::{self, HttpResponse};

pub async fn submit(
    state: web::types::State<AppState>,
    form: web::types::Form<SubmitGameForm>,
) -> Result<HttpResponse, AppError> {
    let outcome = service::submit_game(&state, form.into_inner()).await?;
    Ok(HttpResponse::Ok().json(&outcome))
}
