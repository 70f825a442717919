//! Page Properties API
//!
//! - `GET /:id/properties` and `GET /properties?pageUrl=` read a page
//! - `PUT /:id/properties` creates or replaces a page
//! - `DELETE /:id/properties?version=N` deletes a page

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::shared::error::PlatformError;
use crate::shared::middleware::RequestPrincipal;
use crate::usecase::UnitOfWork;

use super::properties::{
    DeletePagePropertiesCommand, DeletePagePropertiesQuery, DeletePagePropertiesResponse,
    DeletePagePropertiesUseCase, GetPagePropertiesQuery, GetPagePropertiesResponse,
    GetPagePropertiesUseCase, PutPagePropertiesCommand, PutPagePropertiesResponse,
    PutPagePropertiesUseCase,
};

pub struct PagesState<U: UnitOfWork> {
    pub get_properties: Arc<GetPagePropertiesUseCase>,
    pub put_properties: Arc<PutPagePropertiesUseCase<U>>,
    pub delete_properties: Arc<DeletePagePropertiesUseCase<U>>,
}

impl<U: UnitOfWork> Clone for PagesState<U> {
    fn clone(&self) -> Self {
        Self {
            get_properties: self.get_properties.clone(),
            put_properties: self.put_properties.clone(),
            delete_properties: self.delete_properties.clone(),
        }
    }
}

async fn get_page_properties<U: UnitOfWork + 'static>(
    State(state): State<PagesState<U>>,
    Path(id): Path<String>,
    Query(mut query): Query<GetPagePropertiesQuery>,
) -> Result<Json<GetPagePropertiesResponse>, PlatformError> {
    query.page_id = Some(id);
    query.page_url = None;
    let response = state.get_properties.execute(query).await.into_result()?;
    Ok(Json(response))
}

async fn get_page_properties_by_url<U: UnitOfWork + 'static>(
    State(state): State<PagesState<U>>,
    Query(mut query): Query<GetPagePropertiesQuery>,
) -> Result<Json<GetPagePropertiesResponse>, PlatformError> {
    query.page_id = None;
    let response = state.get_properties.execute(query).await.into_result()?;
    Ok(Json(response))
}

async fn put_page_properties<U: UnitOfWork + 'static>(
    State(state): State<PagesState<U>>,
    principal: RequestPrincipal,
    Path(id): Path<String>,
    Json(mut command): Json<PutPagePropertiesCommand>,
) -> Result<Json<PutPagePropertiesResponse>, PlatformError> {
    command.id = id;
    let response = state
        .put_properties
        .execute(command, principal.context())
        .await
        .into_result()?;
    Ok(Json(response))
}

async fn delete_page_properties<U: UnitOfWork + 'static>(
    State(state): State<PagesState<U>>,
    principal: RequestPrincipal,
    Path(id): Path<String>,
    Query(query): Query<DeletePagePropertiesQuery>,
) -> Result<Json<DeletePagePropertiesResponse>, PlatformError> {
    let command = DeletePagePropertiesCommand { id, version: query.version };
    let deleted = state
        .delete_properties
        .execute(command, principal.context())
        .await
        .into_result()?;
    Ok(Json(DeletePagePropertiesResponse { deleted }))
}

pub fn pages_router<U: UnitOfWork + 'static>(state: PagesState<U>) -> Router {
    Router::new()
        .route("/properties", get(get_page_properties_by_url::<U>))
        .route(
            "/:id/properties",
            get(get_page_properties::<U>)
                .put(put_page_properties::<U>)
                .delete(delete_page_properties::<U>),
        )
        .with_state(state)
}
