//! Blog option service

use std::sync::Arc;

use bson::doc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use utoipa::ToSchema;

use crate::layout::Layout;
use crate::page::PageRepository;
use crate::shared::entity::{active, non_empty, Entity};
use crate::shared::error::PlatformError;
use crate::shared::repository::{Repository, StoreBackend};
use crate::shared::tsid::TsidGenerator;
use crate::usecase::{ChangeSet, ExecutionContext, UnitOfWork, UseCaseError, UseCaseResult};

use super::entity::BlogOption;

/// A layout or master page a blog post can be rendered with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemplateModel {
    pub template_id: String,
    pub title: String,
    pub preview_url: Option<String>,
    pub is_master_page: bool,
    /// The blog default
    pub is_active: bool,
}

/// Ids are parsed leniently; anything that is not a TSID counts as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveDefaultTemplateCommand {
    pub template_id: String,
    pub master_page_id: String,
}

fn read_failed(err: PlatformError) -> UseCaseError {
    UseCaseError::storage("Failed to read blog options", err)
}

pub struct BlogOptionService<U: UnitOfWork> {
    options: Repository<BlogOption>,
    layouts: Repository<Layout>,
    pages: PageRepository,
    unit_of_work: Arc<U>,
}

impl<U: UnitOfWork> BlogOptionService<U> {
    pub fn new(backend: &StoreBackend, unit_of_work: Arc<U>) -> Self {
        Self {
            options: Repository::new(backend),
            layouts: Repository::new(backend),
            pages: PageRepository::new(backend),
            unit_of_work,
        }
    }

    async fn current(&self) -> Result<Option<BlogOption>, UseCaseError> {
        self.options
            .find_sorted(active(doc! {}), Some(doc! { "_id": 1 }))
            .await
            .map(|options| options.into_iter().next())
            .map_err(read_failed)
    }

    /// Layouts by name, then master pages by title.
    pub async fn templates(&self) -> UseCaseResult<Vec<TemplateModel>> {
        let loaded = async {
            let current = self.current().await?;
            let layouts = self
                .layouts
                .find_sorted(active(doc! {}), Some(doc! { "name": 1 }))
                .await
                .map_err(read_failed)?;
            let masters = self.pages.find_master_pages().await.map_err(read_failed)?;
            Ok::<_, UseCaseError>((current, layouts, masters))
        };
        let (current, layouts, masters) = match loaded.await {
            Ok(loaded) => loaded,
            Err(err) => return UseCaseResult::failure(err),
        };

        let default_layout = current.as_ref().and_then(|o| o.default_layout_id.clone());
        let default_master = current.as_ref().and_then(|o| o.default_master_page_id.clone());

        let mut templates: Vec<TemplateModel> = layouts
            .into_iter()
            .map(|layout| TemplateModel {
                is_active: default_layout.as_deref() == Some(layout.id.as_str()),
                template_id: layout.id,
                title: layout.name,
                preview_url: layout.preview_url,
                is_master_page: false,
            })
            .collect();
        templates.extend(masters.into_iter().map(|master| TemplateModel {
            is_active: default_master.as_deref() == Some(master.id.as_str()),
            template_id: master.id,
            title: master.title,
            preview_url: None,
            is_master_page: true,
        }));

        debug!(count = templates.len(), "Listed blog templates");
        UseCaseResult::success(templates)
    }

    /// A master page wins over a layout. With neither, the default is cleared.
    pub async fn save_default_template(
        &self,
        command: SaveDefaultTemplateCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<BlogOption> {
        let layout_id = TsidGenerator::parse_or_default(&command.template_id);
        let master_page_id = TsidGenerator::parse_or_default(&command.master_page_id);

        let staged = async {
            let mut option = self.current().await?.unwrap_or_default();

            match (non_empty(Some(master_page_id.as_str())), non_empty(Some(layout_id.as_str()))) {
                (Some(master_id), _) => {
                    let master = self.pages.find_active_by_id(master_id).await.map_err(read_failed)?;
                    if !master.map(|m| m.is_master_page).unwrap_or(false) {
                        return Err(UseCaseError::not_found(
                            "MASTER_PAGE_NOT_FOUND",
                            format!("Master page '{}' not found", master_id),
                        ));
                    }
                    option.default_master_page_id = Some(master_id.to_string());
                    option.default_layout_id = None;
                }
                (None, Some(layout_id)) => {
                    if !self.layouts.exists(layout_id).await.map_err(read_failed)? {
                        return Err(UseCaseError::not_found(
                            "LAYOUT_NOT_FOUND",
                            format!("Layout '{}' not found", layout_id),
                        ));
                    }
                    option.default_layout_id = Some(layout_id.to_string());
                    option.default_master_page_id = None;
                }
                (None, None) => {
                    option.default_layout_id = None;
                    option.default_master_page_id = None;
                }
            }

            let mut changes = ChangeSet::new(&ctx, BlogOption::ENTITY_TYPE, option.id.clone());
            changes.save(&mut option)?;
            Ok::<_, UseCaseError>((option, changes))
        };

        let (option, changes) = match staged.await {
            Ok(staged) => staged,
            Err(err) => return UseCaseResult::failure(err),
        };

        if let Err(err) = self.unit_of_work.commit(changes, &command).await.into_result() {
            return UseCaseResult::failure(err);
        }

        info!(
            layout_id = option.default_layout_id.as_deref().unwrap_or(""),
            master_page_id = option.default_master_page_id.as_deref().unwrap_or(""),
            "Saved blog default template"
        );
        UseCaseResult::success(option)
    }
}
