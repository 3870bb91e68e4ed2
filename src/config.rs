use std::path::Path;

use serde::Deserialize;
use url::Url;

use crate::error::ExportError;

pub const DEFAULT_API: &str = "https://api.twist.com/api/v3";
const PLACEHOLDER: &str = "none";

/// Values as written in `config.yaml`, before placeholder checks.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default = "default_api")]
    api: String,
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    workspace_id: Option<RawId>,
    #[serde(default)]
    download_attachments: bool,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
}

fn default_api() -> String {
    DEFAULT_API.to_string()
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api: Url,
    pub token: String,
    pub workspace_id: u64,
    pub download_attachments: bool,
}

impl Config {
    pub fn load(path: &Path) -> Result<Self, ExportError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ExportError::io(format!("read {}", path.display()), e))?;
        Self::from_yaml(&text)
    }

    pub fn from_yaml(text: &str) -> Result<Self, ExportError> {
        let raw: RawConfig = serde_yaml::from_str(text)
            .map_err(|e| ExportError::Config(format!("parse config: {e}")))?;
        raw.validate()
    }

    /// Base URL with the `v3` version segment swapped for `v4`.
    pub fn api_v4(&self) -> Result<Url, ExportError> {
        let swapped = self.api.as_str().replace("v3", "v4");
        Url::parse(&swapped).map_err(|e| ExportError::Config(format!("api {swapped}: {e}")))
    }
}

impl RawConfig {
    fn validate(self) -> Result<Config, ExportError> {
        let token = match self.token {
            Some(t) if !is_placeholder(&t) => t,
            _ => return Err(ExportError::Config("token is not set".to_string())),
        };

        let workspace_id = match self.workspace_id {
            Some(RawId::Number(id)) => id,
            Some(RawId::Text(s)) if !is_placeholder(&s) => s.trim().parse().map_err(|_| {
                ExportError::Config(format!("workspace_id {s:?} is not a number"))
            })?,
            _ => return Err(ExportError::Config("workspace_id is not set".to_string())),
        };

        let api = Url::parse(self.api.trim())
            .map_err(|e| ExportError::Config(format!("api {}: {e}", self.api)))?;

        Ok(Config {
            api,
            token,
            workspace_id,
            download_attachments: self.download_attachments,
        })
    }
}

fn is_placeholder(v: &str) -> bool {
    let v = v.trim();
    v.is_empty() || v == PLACEHOLDER
}
