//! Option value types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptionType {
    #[default]
    Text,
    Integer,
    Float,
    DateTime,
    Boolean,
    JavaScriptUrl,
    CssUrl,
}

/// A keyed option. On layouts `default_value` is the definition's default;
/// on pages `value` is the override.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OptionValue {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub value: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub default_value: Option<String>,
    #[serde(rename = "type", default)]
    pub option_type: OptionType,
}

impl OptionValue {
    /// Layout-level definition.
    pub fn definition(key: impl Into<String>, default_value: Option<&str>, option_type: OptionType) -> Self {
        Self {
            key: key.into(),
            value: None,
            default_value: default_value.map(String::from),
            option_type,
        }
    }

    /// Page or master page override.
    pub fn set(key: impl Into<String>, value: impl Into<String>, option_type: OptionType) -> Self {
        Self {
            key: key.into(),
            value: Some(value.into()),
            default_value: None,
            option_type,
        }
    }
}
