pub mod render;
mod scalar;

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils;

pub use render::{RemoteEndpoints, RenderContext, RenderedView};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewError {
    #[error("view list settings are missing")]
    MissingSettings,

    #[error("view list settings must be a mapping, got {kind}")]
    NotAMapping { kind: &'static str },

    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("list identifier '{id}' is already rendered on this page")]
    DuplicateListId { id: String },
}

/// What a view list is scoped to: a gene, a disease id, or a list of objects.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged, from = "scalar::RawScope")]
pub enum ObjectScope {
    Single(String),
    List(Vec<String>),
}

impl fmt::Display for ObjectScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(",")),
        }
    }
}

impl From<&str> for ObjectScope {
    fn from(value: &str) -> Self {
        Self::Single(value.to_string())
    }
}

impl From<String> for ObjectScope {
    fn from(value: String) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<String>> for ObjectScope {
    fn from(value: Vec<String>) -> Self {
        Self::List(value)
    }
}

/// A request for one remote view list on a page.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ViewListSettings {
    #[serde(default, deserialize_with = "scalar::string")]
    pub viewlistid: String,
    #[serde(default, deserialize_with = "scalar::string")]
    pub object: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_id: Option<ObjectScope>,
    #[serde(
        default,
        deserialize_with = "scalar::optional",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "scalar::set")]
    pub cols_to_skip: BTreeSet<String>,
    #[serde(default, deserialize_with = "scalar::map")]
    pub search: BTreeMap<String, String>,
}

impl ViewListSettings {
    pub fn new(viewlistid: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            viewlistid: viewlistid.into(),
            object: object.into(),
            ..Self::default()
        }
    }

    pub fn with_object_id(mut self, scope: impl Into<ObjectScope>) -> Self {
        self.object_id = Some(scope.into());
        self
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn skip_column(mut self, column: impl Into<String>) -> Self {
        self.cols_to_skip.insert(column.into());
        self
    }

    pub fn search(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.search.insert(field.into(), value.into());
        self
    }

    /// Reads settings from a loosely typed value, as found in config files or
    /// JSON payloads. Absent values and non-mappings are rejected up front.
    pub fn from_value(value: Option<&serde_json::Value>) -> Result<Self, ViewError> {
        let value = value.ok_or(ViewError::MissingSettings)?;
        let kind = json_kind(value);
        if !value.is_object() {
            return Err(ViewError::NotAMapping { kind });
        }
        let settings: Self =
            serde_json::from_value(value.clone()).map_err(|e| ViewError::InvalidField {
                field: "settings",
                reason: e.to_string(),
            })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_yaml_value(value: Option<&serde_yaml::Value>) -> Result<Self, ViewError> {
        let value = value.ok_or(ViewError::MissingSettings)?;
        let json = serde_json::to_value(value).map_err(|e| ViewError::InvalidField {
            field: "settings",
            reason: e.to_string(),
        })?;
        Self::from_value(Some(&json))
    }

    pub fn validate(&self) -> Result<(), ViewError> {
        if utils::is_blank(&self.viewlistid) {
            return Err(ViewError::MissingField {
                field: "viewlistid",
            });
        }
        if !utils::is_safe_list_id(&self.viewlistid) {
            return Err(ViewError::InvalidField {
                field: "viewlistid",
                reason: format!(
                    "'{}' may only contain letters, digits, '_', '.', ':' and '-'",
                    self.viewlistid
                ),
            });
        }
        if utils::is_blank(&self.object) {
            return Err(ViewError::MissingField { field: "object" });
        }
        Ok(())
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "sequence",
        serde_json::Value::Object(_) => "mapping",
    }
}
