use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::WithRejection;
use tracing::info;

use murmur_store::Store;
use murmur_types::api::{LoginRequest, LoginResponse};

use crate::error::ApiError;
use crate::validation;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub store: Store,
}

impl AppStateInner {
    pub fn new(store: Store) -> AppState {
        Arc::new(Self { store })
    }
}

/// POST /session. There is no password; the returned identifier is the
/// bearer token for every other call.
pub async fn login(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<LoginRequest>, ApiError>,
) -> Result<impl IntoResponse, ApiError> {
    validation::login_name(&req.name)?;

    let identifier = state.store.login(&req.name)?;
    info!("Session opened for '{}'", req.name);

    Ok((StatusCode::CREATED, Json(LoginResponse { identifier })))
}
