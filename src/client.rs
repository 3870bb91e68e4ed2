use bytes::Bytes;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::Config;
use crate::error::ExportError;
use crate::model::{Channel, Comment, Id, Thread, User, Workspace};

/// Read-only client for the workspace REST API. Every call is a single
/// round trip; there is no retry and no pagination.
pub struct Client {
    http: reqwest::Client,
    api: Url,
    api_v4: Url,
    token: String,
}

impl Client {
    pub fn new(config: &Config, user_agent: &str) -> anyhow::Result<Self> {
        use anyhow::Context as _;

        let http = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            http,
            api: config.api.clone(),
            api_v4: config.api_v4()?,
            token: config.token.clone(),
        })
    }

    pub async fn get_workspace(&self, id: Id) -> Result<Workspace, ExportError> {
        let url = endpoint(&self.api, "workspaces/getone")?;
        self.get_json(url, &[("id", id.to_string())]).await
    }

    pub async fn get_workspace_users(&self, workspace_id: Id) -> Result<Vec<User>, ExportError> {
        let url = endpoint(&self.api_v4, "workspace_users/get")?;
        self.get_json(url, &[("id", workspace_id.to_string())]).await
    }

    pub async fn get_channels(&self, workspace_id: Id) -> Result<Vec<Channel>, ExportError> {
        let url = endpoint(&self.api, "channels/get")?;
        self.get_json(url, &[("workspace_id", workspace_id.to_string())]).await
    }

    pub async fn get_threads(
        &self,
        workspace_id: Id,
        channel_id: Id,
    ) -> Result<Vec<Thread>, ExportError> {
        let url = endpoint(&self.api, "threads/get")?;
        self.get_json(
            url,
            &[
                ("workspace_id", workspace_id.to_string()),
                ("channel_id", channel_id.to_string()),
            ],
        )
        .await
    }

    pub async fn get_comments(
        &self,
        workspace_id: Id,
        channel_id: Id,
        thread_id: Id,
    ) -> Result<Vec<Comment>, ExportError> {
        let url = endpoint(&self.api, "comments/get")?;
        self.get_json(
            url,
            &[
                ("workspace_id", workspace_id.to_string()),
                ("channel_id", channel_id.to_string()),
                ("thread_id", thread_id.to_string()),
            ],
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, ExportError> {
        let bytes = self.send(&url, query).await?;
        serde_json::from_slice(&bytes).map_err(|source| ExportError::MalformedBody {
            url: url.to_string(),
            source,
        })
    }

    async fn send(&self, url: &Url, query: &[(&str, String)]) -> Result<Bytes, ExportError> {
        let transport = |source: reqwest::Error| ExportError::Transport {
            url: url.to_string(),
            source,
        };

        tracing::debug!(%url, "GET");
        let resp = self
            .http
            .get(url.clone())
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ExportError::Remote {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        resp.bytes().await.map_err(transport)
    }
}

/// Appends `path` to the base URL, keeping any path the base already has.
fn endpoint(base: &Url, path: &str) -> Result<Url, ExportError> {
    let joined = format!("{}/{}", base.as_str().trim_end_matches('/'), path);
    Url::parse(&joined).map_err(|e| ExportError::Config(format!("api {joined}: {e}")))
}
