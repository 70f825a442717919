//! Blog Options API
//!
//! - `GET /templates` lists the templates with the default flagged
//! - `POST /default-template` stores the default template

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::shared::api_common::SuccessResponse;
use crate::shared::middleware::RequestPrincipal;
use crate::usecase::UnitOfWork;

use super::service::{BlogOptionService, SaveDefaultTemplateCommand, TemplateModel};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TemplatesResponse {
    pub success: bool,
    pub data: Vec<TemplateModel>,
}

pub struct BlogOptionsState<U: UnitOfWork> {
    pub blog_options: Arc<BlogOptionService<U>>,
}

impl<U: UnitOfWork> Clone for BlogOptionsState<U> {
    fn clone(&self) -> Self {
        Self {
            blog_options: self.blog_options.clone(),
        }
    }
}

async fn templates<U: UnitOfWork + 'static>(State(state): State<BlogOptionsState<U>>) -> Json<TemplatesResponse> {
    match state.blog_options.templates().await.into_result() {
        Ok(data) => Json(TemplatesResponse { success: true, data }),
        Err(err) => {
            warn!(code = err.code(), error = err.message(), "Failed to list blog templates");
            Json(TemplatesResponse { success: false, data: Vec::new() })
        }
    }
}

async fn save_default_template<U: UnitOfWork + 'static>(
    State(state): State<BlogOptionsState<U>>,
    principal: RequestPrincipal,
    Json(command): Json<SaveDefaultTemplateCommand>,
) -> Json<SuccessResponse> {
    match state
        .blog_options
        .save_default_template(command, principal.context())
        .await
        .into_result()
    {
        Ok(_) => Json(SuccessResponse::ok()),
        Err(err) => {
            warn!(code = err.code(), error = err.message(), "Failed to save blog default template");
            Json(SuccessResponse::failed())
        }
    }
}

pub fn blog_options_router<U: UnitOfWork + 'static>(state: BlogOptionsState<U>) -> Router {
    Router::new()
        .route("/templates", get(templates::<U>))
        .route("/default-template", post(save_default_template::<U>))
        .with_state(state)
}
