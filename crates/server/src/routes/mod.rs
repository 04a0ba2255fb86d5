use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
};
use serde_json::{json, Value};

use crate::meshes::{self, MeshFileError, MeshSummary};
use crate::AppState;

/// Health check
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// URLs of all mesh files, in the order to pass to `loadData`
pub async fn list_meshes(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let files = meshes::list(&state.config.data_dir).await.map_err(|e| {
        tracing::error!("List error: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    let urls: Vec<String> = files.iter().map(|f| format!("/data/{f}")).collect();
    Ok(Json(json!({ "meshes": urls })))
}

/// Validated summary of one mesh file
pub async fn mesh_summary(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<Json<MeshSummary>, (StatusCode, Json<Value>)> {
    meshes::summary(&state.config.data_dir, &file)
        .await
        .map(Json)
        .map_err(|e| {
            let status = match &e {
                MeshFileError::BadName(_) => StatusCode::BAD_REQUEST,
                MeshFileError::NotFound(_) => StatusCode::NOT_FOUND,
                MeshFileError::Invalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
                MeshFileError::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            };
            tracing::warn!("Summary error for {}: {}", file, e);
            (status, Json(json!({ "error": e.to_string() })))
        })
}
