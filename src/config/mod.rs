use std::collections::BTreeMap;
use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::view::{ViewError, ViewListSettings};

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    pub install_url: Option<String>,
    #[serde(alias = "base_url")]
    pub lovd_url: Option<String>,
    pub output: Option<String>,
    pub output_format: Option<String>,
    pub no_color: Option<bool>,
    #[serde(default)]
    pub views: BTreeMap<String, serde_yaml::Value>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found '{path}'")]
    NotFound { path: String },

    #[error("failed to read '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{path}': {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse '{path}': {reason}")]
    Parse { path: String, reason: String },

    #[error("invalid config path '{path}'")]
    InvalidPath { path: String },

    #[error("no view named '{name}' in config")]
    UnknownView { name: String },

    #[error("view '{name}': {source}")]
    InvalidView {
        name: String,
        #[source]
        source: ViewError,
    },
}

impl ConfigFile {
    pub fn view(&self, name: &str) -> Result<ViewListSettings, ConfigError> {
        let value = self.views.get(name).ok_or_else(|| ConfigError::UnknownView {
            name: name.to_string(),
        })?;
        ViewListSettings::from_yaml_value(Some(value)).map_err(|source| ConfigError::InvalidView {
            name: name.to_string(),
            source,
        })
    }
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".extview").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(contents) => {
            serde_yaml::from_str::<ConfigFile>(&contents).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(ConfigError::NotFound {
            path: path.display().to_string(),
        }),
        Err(source) => Err(ConfigError::Read {
            path: path.display().to_string(),
            source,
        }),
    }
}

/// Reads a single view-list settings document. JSON and YAML are both
/// accepted; JSON is valid YAML.
pub fn load_settings_file(path: &PathBuf) -> Result<ViewListSettings, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    let value = if contents.trim().is_empty() {
        None
    } else {
        let value: serde_yaml::Value =
            serde_yaml::from_str(&contents).map_err(|e| ConfigError::Parse {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Some(value).filter(|v| !v.is_null())
    };
    ViewListSettings::from_yaml_value(value.as_ref()).map_err(|source| ConfigError::InvalidView {
        name: path.display().to_string(),
        source,
    })
}

fn default_config_yaml() -> String {
    r#"# extview config
#
# Location (default):
#   ~/.extview/config.yml

# Remote LOVD installation serving inc-js.php
# install_url: https://databases.lovd.nl/shared/

# Remote LOVD base URL serving styles.css (defaults to install_url)
# lovd_url: https://databases.lovd.nl/shared/

# Output (optional)
# output: ./viewlist.html
# output_format: html

# Output styling
no_color: false

# Named custom view lists, rendered with `extview custom <name>`
views: {}
#  variants_ivd:
#    viewlistid: CustomVL_IVD
#    object: VariantOnTranscript,VariantOnGenome
#    object_id: IVD
#    cols_to_skip: [chromosome]
#    search:
#      transcriptid: 1
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &PathBuf) -> Result<(), ConfigError> {
    if path.exists() {
        return Ok(());
    }
    let parent = path.parent().ok_or_else(|| ConfigError::InvalidPath {
        path: path.display().to_string(),
    })?;
    std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
        path: parent.display().to_string(),
        source,
    })?;
    std::fs::write(path, default_config_yaml()).map_err(|source| ConfigError::Write {
        path: path.display().to_string(),
        source,
    })?;
    Ok(())
}
