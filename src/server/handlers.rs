//! Study set REST handlers

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use super::error::ApiError;
use super::ServerState;
use crate::study_sets::{NewStudySet, StudySet, StudySetError, StudySetStorage, StudySetUpdate};

type ApiResult<T> = Result<T, ApiError>;

/// Run a storage call on the blocking pool
async fn with_storage<T, F>(state: &Arc<ServerState>, f: F) -> ApiResult<T>
where
    F: FnOnce(&StudySetStorage) -> Result<T, StudySetError> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    tokio::task::spawn_blocking(move || f(&state.storage))
        .await
        .map_err(|e| ApiError::Internal(format!("Task join error: {}", e)))?
        .map_err(ApiError::from)
}

pub async fn health() -> &'static str {
    "ok"
}

/// GET /api/studySets
pub async fn list_study_sets(
    State(state): State<Arc<ServerState>>,
) -> ApiResult<Json<Vec<StudySet>>> {
    let sets = with_storage(&state, |storage| storage.list_sets()).await?;
    Ok(Json(sets))
}

/// GET /api/studySets/{id}
pub async fn get_study_set(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<StudySet>> {
    let set = with_storage(&state, move |storage| storage.get_set(&id)).await?;
    Ok(Json(set))
}

/// POST /api/studySets
pub async fn create_study_set(
    State(state): State<Arc<ServerState>>,
    payload: Result<Json<NewStudySet>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let Json(new) = payload.map_err(|e| {
        log::debug!("Rejected study set body: {}", e);
        ApiError::BadRequest("Missing title or cards array".to_string())
    })?;

    let set = with_storage(&state, move |storage| storage.create_set(new)).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": "Study set created", "id": set.id })),
    ))
}

/// PUT /api/studySets/{id}
pub async fn update_study_set(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
    payload: Result<Json<StudySetUpdate>, JsonRejection>,
) -> ApiResult<impl IntoResponse> {
    let payload = payload.map_err(|e| format!("Malformed study set: {}", e));
    let update = match payload {
        Ok(Json(update)) => update,
        Err(message) => {
            // Unknown ids are reported as 404 whatever the body
            let lookup_id = id.clone();
            with_storage(&state, move |storage| {
                if storage.has_set(&lookup_id) {
                    Ok(())
                } else {
                    Err(StudySetError::NotFound(lookup_id))
                }
            })
            .await?;
            return Err(ApiError::BadRequest(message));
        }
    };

    with_storage(&state, move |storage| storage.update_set(&id, update)).await?;
    Ok(Json(json!({ "message": "Study set updated" })))
}

/// DELETE /api/studySets/{id}
pub async fn delete_study_set(
    State(state): State<Arc<ServerState>>,
    Path(id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    with_storage(&state, move |storage| storage.delete_set(&id)).await?;
    Ok(Json(json!({ "message": "Study set deleted" })))
}
