//! Get Page Properties Use Case

use std::collections::HashMap;

use bson::doc;
use tracing::debug;

use crate::category::Category;
use crate::content::{Content, PageContent};
use crate::language::Language;
use crate::layout::{Layout, Region};
use crate::master_page::MasterPageService;
use crate::media::{MediaImage, MediaUrlResolver};
use crate::option::OptionService;
use crate::page::{Page, PageRepository};
use crate::shared::entity::{active, ids_in, non_empty, Entity};
use crate::shared::error::PlatformError;
use crate::shared::repository::{Repository, StoreBackend};
use crate::tag::{TagModel, TagRepository};
use crate::url::UrlService;
use crate::usecase::{UseCaseError, UseCaseResult};
use crate::details;

use super::models::{
    CategoryModel, GetPagePropertiesQuery, GetPagePropertiesResponse, ImageModel, LanguageModel,
    LayoutModel, MetadataModel, PageContentModel, PagePropertiesModel, PageTranslationModel,
};

fn read_failed(err: PlatformError) -> UseCaseError {
    UseCaseError::storage("Failed to read page properties", err)
}

/// Reads a page by id or URL together with the sections the caller asks for.
#[derive(Clone)]
pub struct GetPagePropertiesUseCase {
    pages: PageRepository,
    layouts: Repository<Layout>,
    regions: Repository<Region>,
    categories: Repository<Category>,
    languages: Repository<Language>,
    images: Repository<MediaImage>,
    contents: Repository<Content>,
    page_contents: Repository<PageContent>,
    tags: TagRepository,
    options: OptionService,
    urls: UrlService,
    media: MediaUrlResolver,
}

impl GetPagePropertiesUseCase {
    pub fn new(backend: &StoreBackend, media: MediaUrlResolver) -> Self {
        let layouts = Repository::new(backend);
        Self {
            pages: PageRepository::new(backend),
            layouts: layouts.clone(),
            regions: Repository::new(backend),
            categories: Repository::new(backend),
            languages: Repository::new(backend),
            images: Repository::new(backend),
            contents: Repository::new(backend),
            page_contents: Repository::new(backend),
            tags: TagRepository::new(backend),
            options: OptionService::new(layouts, MasterPageService::new(backend)),
            urls: UrlService::new(),
            media,
        }
    }

    pub async fn execute(&self, query: GetPagePropertiesQuery) -> UseCaseResult<GetPagePropertiesResponse> {
        match self.load(&query).await {
            Ok(response) => UseCaseResult::success(response),
            Err(err) => UseCaseResult::failure(err),
        }
    }

    async fn find_page(&self, query: &GetPagePropertiesQuery) -> Result<Page, UseCaseError> {
        let page_id = non_empty(query.page_id.as_deref());
        let page_url = non_empty(query.page_url.as_deref());

        let found = match (page_id, page_url) {
            (Some(id), _) => self.pages.find_active_by_id(id).await.map_err(read_failed)?,
            (None, Some(url)) => {
                let hash = self.urls.url_hash(&self.urls.fix_url(url));
                // duplicates resolve to the oldest id
                self.pages
                    .find_by_url_hash(&hash)
                    .await
                    .map_err(read_failed)?
                    .into_iter()
                    .next()
            }
            (None, None) => {
                return Err(UseCaseError::validation(
                    "PAGE_KEY_REQUIRED",
                    "Either a page id or a page URL is required",
                ))
            }
        };

        found.ok_or_else(|| {
            UseCaseError::not_found_with_details(
                "PAGE_NOT_FOUND",
                "Page not found",
                details! { "pageId" => page_id, "pageUrl" => page_url },
            )
        })
    }

    async fn load(&self, query: &GetPagePropertiesQuery) -> Result<GetPagePropertiesResponse, UseCaseError> {
        let page = self.find_page(query).await?;
        debug!(page_id = %page.id, "Loading page properties");

        let layout = live(&self.layouts, page.layout_id.as_deref()).await?;
        let master = match non_empty(page.master_page_id.as_deref()) {
            Some(id) => self.pages.find_active_by_id(id).await.map_err(read_failed)?,
            None => None,
        };
        let category = live(&self.categories, page.category_id.as_deref()).await?;
        let main_image = live(&self.images, page.main_image_id.as_deref()).await?;
        let featured_image = live(&self.images, page.featured_image_id.as_deref()).await?;
        let secondary_image = live(&self.images, page.secondary_image_id.as_deref()).await?;

        let mut model = PagePropertiesModel::from(&page);
        model.layout_id = layout.as_ref().map(|l| l.id.clone());
        model.master_page_id = master.as_ref().map(|m| m.id.clone());
        model.category_id = category.as_ref().map(|c| c.id.clone());
        model.main_image_id = main_image.as_ref().map(|i| i.id.clone());
        model.featured_image_id = featured_image.as_ref().map(|i| i.id.clone());
        model.secondary_image_id = secondary_image.as_ref().map(|i| i.id.clone());

        let meta_data = query.include_meta_data.then(|| MetadataModel {
            meta_title: page.meta_title.clone(),
            meta_description: page.meta_description.clone(),
            meta_keywords: page.meta_keywords.clone(),
        });

        let category = category.filter(|_| query.include_category).map(|c| CategoryModel {
            id: c.id,
            version: c.audit.version,
            created_by: c.audit.created_by_user,
            created_on: c.audit.created_on,
            last_modified_by: c.audit.modified_by_user,
            last_modified_on: c.audit.modified_on,
            name: c.name,
        });

        let layout = layout.filter(|_| query.include_layout).map(|l| LayoutModel {
            id: l.id,
            version: l.audit.version,
            created_by: l.audit.created_by_user,
            created_on: l.audit.created_on,
            last_modified_by: l.audit.modified_by_user,
            last_modified_on: l.audit.modified_on,
            name: l.name,
            layout_path: l.layout_path,
            preview_url: l.preview_url,
        });

        let (main_image, featured_image, secondary_image) = if query.include_images {
            (
                main_image.map(|i| self.image_model(i)),
                featured_image.map(|i| self.image_model(i)),
                secondary_image.map(|i| self.image_model(i)),
            )
        } else {
            (None, None, None)
        };

        let language = if query.include_language {
            live(&self.languages, page.language_id.as_deref())
                .await?
                .map(|l| LanguageModel {
                    id: l.id,
                    version: l.audit.version,
                    created_by: l.audit.created_by_user,
                    created_on: l.audit.created_on,
                    last_modified_by: l.audit.modified_by_user,
                    last_modified_on: l.audit.modified_on,
                    name: l.name,
                    code: l.code,
                })
        } else {
            None
        };

        let tags = match query.include_tags {
            true => Some(self.load_tags(&page.id).await?),
            false => None,
        };

        let page_contents = match query.include_page_contents {
            true => Some(self.load_page_contents(&page.id).await?),
            false => None,
        };

        let page_options = match query.include_page_options {
            true => Some(self.options.merged_options(&page).await.map_err(read_failed)?),
            false => None,
        };

        let access_rules = query.include_access_rules.then(|| {
            let mut rules = page.access_rules.clone();
            rules.sort_by(|a, b| {
                a.is_for_role
                    .cmp(&b.is_for_role)
                    .then_with(|| a.identity.cmp(&b.identity))
            });
            rules
        });

        let page_translations = match query.include_page_translations {
            true => Some(self.load_translations(&page).await?),
            false => None,
        };

        Ok(GetPagePropertiesResponse {
            page: model,
            meta_data,
            category,
            layout,
            main_image,
            featured_image,
            secondary_image,
            language,
            tags,
            page_contents,
            page_options,
            access_rules,
            page_translations,
        })
    }

    fn image_model(&self, image: MediaImage) -> ImageModel {
        ImageModel {
            url: self.media.resolve(&image.public_url),
            thumbnail_url: self.media.resolve(&image.public_thumbnail_url),
            id: image.id,
            version: image.audit.version,
            created_by: image.audit.created_by_user,
            created_on: image.audit.created_on,
            last_modified_by: image.audit.modified_by_user,
            last_modified_on: image.audit.modified_on,
            title: image.title,
            caption: image.caption,
        }
    }

    async fn load_tags(&self, page_id: &str) -> Result<Vec<TagModel>, UseCaseError> {
        let tag_ids: Vec<String> = self
            .tags
            .find_page_tags(page_id)
            .await
            .map_err(read_failed)?
            .into_iter()
            .map(|link| link.tag_id)
            .collect();
        let tags = self.tags.find_by_ids(&tag_ids).await.map_err(read_failed)?;
        Ok(tags.into_iter().map(TagModel::from).collect())
    }

    async fn load_page_contents(&self, page_id: &str) -> Result<Vec<PageContentModel>, UseCaseError> {
        let placements = self
            .page_contents
            .find_sorted(active(doc! { "pageId": page_id }), Some(doc! { "order": 1, "_id": 1 }))
            .await
            .map_err(read_failed)?;

        let content_ids: Vec<String> = placements.iter().map(|p| p.content_id.clone()).collect();
        let region_ids: Vec<String> = placements.iter().map(|p| p.region_id.clone()).collect();

        let contents: HashMap<String, Content> = self
            .contents
            .find(active(ids_in(&content_ids)))
            .await
            .map_err(read_failed)?
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();
        let regions: HashMap<String, Region> = self
            .regions
            .find(ids_in(&region_ids))
            .await
            .map_err(read_failed)?
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();

        Ok(placements
            .into_iter()
            .filter_map(|placement| {
                let content = contents.get(&placement.content_id)?;
                Some(PageContentModel {
                    id: placement.id.clone(),
                    version: placement.audit.version,
                    content_id: content.id.clone(),
                    content_name: content.name.clone(),
                    content_type: content.kind.label().to_string(),
                    is_published: content.is_published(),
                    region_identifier: regions
                        .get(&placement.region_id)
                        .map(|r| r.region_identifier.clone()),
                    region_id: placement.region_id,
                    order: placement.order,
                })
            })
            .collect())
    }

    async fn load_translations(&self, page: &Page) -> Result<Vec<PageTranslationModel>, UseCaseError> {
        let Some(group) = non_empty(page.language_group_identifier.as_deref()) else {
            return Ok(Vec::new());
        };

        let translations = self.pages.find_by_language_group(group).await.map_err(read_failed)?;
        let language_ids: Vec<String> = translations
            .iter()
            .filter_map(|p| p.language_id.clone())
            .collect();
        let codes: HashMap<String, String> = self
            .languages
            .find(ids_in(&language_ids))
            .await
            .map_err(read_failed)?
            .into_iter()
            .map(|l| (l.id, l.code))
            .collect();

        Ok(translations
            .into_iter()
            .map(|p| PageTranslationModel {
                language_code: p.language_id.as_ref().and_then(|id| codes.get(id).cloned()),
                id: p.id,
                title: p.title,
                page_url: p.page_url,
                language_id: p.language_id,
            })
            .collect())
    }
}

/// Referenced record, or `None` when the id is empty, dangling or soft-deleted.
async fn live<T: Entity>(repo: &Repository<T>, id: Option<&str>) -> Result<Option<T>, UseCaseError> {
    match non_empty(id) {
        Some(id) => repo.find_active_by_id(id).await.map_err(read_failed),
        None => Ok(None),
    }
}
