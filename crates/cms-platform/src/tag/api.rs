//! Tags API
//!
//! - `GET /:id` and `GET /?tagName=` read a tag
//! - `PUT /:id` and `POST /:id` acknowledge a tag write

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

use crate::shared::api_common::IdResponse;
use crate::shared::error::PlatformError;

use super::service::{GetTagRequest, PutTagRequest, TagModel, TagService};

#[derive(Clone)]
pub struct TagsState {
    pub tag_service: TagService,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TagByNameQuery {
    pub tag_name: Option<String>,
}

async fn get_tag(
    State(state): State<TagsState>,
    Path(id): Path<String>,
) -> Result<Json<TagModel>, PlatformError> {
    let request = GetTagRequest { tag_id: Some(id), tag_name: None };
    Ok(Json(state.tag_service.get(&request).await?))
}

async fn get_tag_by_name(
    State(state): State<TagsState>,
    Query(query): Query<TagByNameQuery>,
) -> Result<Json<TagModel>, PlatformError> {
    let request = GetTagRequest { tag_id: None, tag_name: query.tag_name };
    Ok(Json(state.tag_service.get(&request).await?))
}

async fn put_tag(
    State(state): State<TagsState>,
    Path(id): Path<String>,
    body: Option<Json<PutTagRequest>>,
) -> Json<IdResponse> {
    let mut request = body.map(|Json(r)| r).unwrap_or_default();
    request.id = id;
    Json(IdResponse { id: state.tag_service.put(&request) })
}

async fn update_tag(
    State(state): State<TagsState>,
    Path(id): Path<String>,
    body: Option<Json<PutTagRequest>>,
) -> Json<IdResponse> {
    let mut request = body.map(|Json(r)| r).unwrap_or_default();
    request.id = id;
    debug!(tag_id = %request.id, "Tag update requested");
    Json(IdResponse { id: state.tag_service.update(&request) })
}

pub fn tags_router(state: TagsState) -> Router {
    Router::new()
        .route("/", get(get_tag_by_name))
        .route("/:id", get(get_tag).put(put_tag).post(update_tag))
        .with_state(state)
}
