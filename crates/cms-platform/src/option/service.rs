//! Option merging
//!
//! Start from the layout's option definitions (value = default), then apply
//! each master page from the root down, then the page itself. A matching key
//! takes the new value and the previous effective value becomes its default;
//! an unknown key is appended without a default.

use crate::layout::Layout;
use crate::master_page::MasterPageService;
use crate::page::Page;
use crate::shared::entity::non_empty;
use crate::shared::error::Result;
use crate::shared::repository::Repository;

use super::value::OptionValue;

#[derive(Clone)]
pub struct OptionService {
    layouts: Repository<Layout>,
    master_pages: MasterPageService,
}

impl OptionService {
    pub fn new(layouts: Repository<Layout>, master_pages: MasterPageService) -> Self {
        Self { layouts, master_pages }
    }

    /// Effective options of a page: layout, then master chain, then page.
    pub async fn merged_options(&self, page: &Page) -> Result<Vec<OptionValue>> {
        let chain = self.master_pages.master_chain(page).await?;

        // the layout comes from the root of the master chain
        let layout_id = match chain.first() {
            Some(root) => root.layout_id.clone(),
            None => page.layout_id.clone(),
        };
        let layout = match non_empty(layout_id.as_deref()) {
            Some(id) => self.layouts.find_active_by_id(id).await?,
            None => None,
        };

        let layout_options = layout.as_ref().map(|l| l.options.as_slice()).unwrap_or(&[]);
        let mut levels: Vec<&[OptionValue]> = chain.iter().map(|m| m.options.as_slice()).collect();
        levels.push(page.options.as_slice());

        Ok(merge_options(layout_options, &levels))
    }
}

pub fn merge_options(layout_options: &[OptionValue], levels: &[&[OptionValue]]) -> Vec<OptionValue> {
    let mut merged: Vec<OptionValue> = layout_options
        .iter()
        .map(|definition| OptionValue {
            key: definition.key.clone(),
            value: definition.default_value.clone(),
            default_value: definition.default_value.clone(),
            option_type: definition.option_type,
        })
        .collect();

    for level in levels {
        for option in level.iter() {
            match merged.iter_mut().find(|m| m.key == option.key) {
                Some(existing) => {
                    existing.default_value = existing.value.take();
                    existing.value = option.value.clone();
                    existing.option_type = option.option_type;
                }
                None => merged.push(OptionValue {
                    key: option.key.clone(),
                    value: option.value.clone(),
                    default_value: None,
                    option_type: option.option_type,
                }),
            }
        }
    }

    merged
}
