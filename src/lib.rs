mod archive;
mod attachments;
mod cli;
mod client;
mod config;
mod error;
mod model;
mod output;
mod transcript;

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use archive::Archive;
use attachments::{AttachmentEntry, AttachmentIndex};
use cli::Args;
use client::Client;
use config::Config;
use model::{Channel, Id, Post as _, Thread};

pub use archive::archive_file_name;
pub use cli::Args as CliArgs;
pub use error::ExportError;

/// What a finished export wrote.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub users: usize,
    pub channels: usize,
    pub threads: usize,
    pub comments: usize,
    pub attachments: usize,
    pub attachments_html: PathBuf,
    pub archive_json: PathBuf,
}

pub async fn run(args: Args) -> anyhow::Result<ExportSummary> {
    let config = match Config::load(&args.config) {
        Ok(config) => config,
        Err(err) => {
            log_config_hints(&err);
            return Err(err).with_context(|| format!("load {}", args.config.display()));
        }
    };

    let client = Client::new(&config, &args.user_agent)?;
    export(&config, &client, &args.out).await
}

fn log_config_hints(err: &ExportError) {
    if !matches!(err, ExportError::Config(_)) {
        return;
    }
    tracing::error!("please enter your token and workspace id in the config file");
    tracing::error!(
        "the token should look like 'oauth2:<numbers and letters>'; follow https://developer.twist.com/v3/#oauth-2 to obtain it"
    );
    tracing::error!(
        "the workspace id is the number in the browser URL, e.g. 123456 in https://twist.com/a/123456"
    );
}

async fn export(config: &Config, client: &Client, out_dir: &Path) -> anyhow::Result<ExportSummary> {
    let workspace_id = config.workspace_id;

    let workspace = client
        .get_workspace(workspace_id)
        .await
        .context("fetch workspace")?;
    tracing::info!(workspace = %workspace.name, "scraping workspace");
    let mut archive = Archive::new(workspace);

    tracing::info!("scraping list of users");
    let users = client
        .get_workspace_users(workspace_id)
        .await
        .context("fetch workspace users")?;
    for user in users {
        tracing::info!(user = %user.name, "found user");
        archive.insert_user(user);
    }

    output::create_dir_strict(&output::channels_dir(out_dir))?;

    let channels = client
        .get_channels(workspace_id)
        .await
        .context("fetch channels")?;

    let mut exporter = Exporter {
        client,
        workspace_id,
        out_dir,
        archive,
        attachments: AttachmentIndex::new(config.download_attachments),
    };
    for channel in channels {
        exporter.export_channel(channel).await?;
    }
    let Exporter {
        archive,
        attachments,
        ..
    } = exporter;

    let attachments_html = attachments.write_html(out_dir)?;
    tracing::info!(path = %attachments_html.display(), "wrote attachment index");
    tracing::info!("follow the links in that file to download message attachments");

    let archive_json = archive.write_json(out_dir)?;
    tracing::info!(path = %archive_json.display(), "saved raw archive");

    let summary = ExportSummary {
        users: archive.users.len(),
        channels: archive.channels.len(),
        threads: archive.threads.values().map(Vec::len).sum(),
        comments: archive.comments.values().map(Vec::len).sum(),
        attachments: attachments.len(),
        attachments_html,
        archive_json,
    };
    tracing::info!(
        channels = summary.channels,
        threads = summary.threads,
        comments = summary.comments,
        attachments = summary.attachments,
        "it is finished"
    );
    Ok(summary)
}

/// Crawl state threaded through the channel -> thread -> comment traversal.
struct Exporter<'a> {
    client: &'a Client,
    workspace_id: Id,
    out_dir: &'a Path,
    archive: Archive,
    attachments: AttachmentIndex,
}

impl Exporter<'_> {
    async fn export_channel(&mut self, channel: Channel) -> anyhow::Result<()> {
        tracing::info!(channel = %channel.name, "scraping channel");
        self.archive.push_channel(channel.clone());
        output::create_dir_strict(&output::channel_dir(self.out_dir, &channel.name))?;

        let threads = self
            .client
            .get_threads(self.workspace_id, channel.id)
            .await
            .with_context(|| format!("fetch threads of channel {}", channel.name))?;
        for thread in threads {
            self.export_thread(&channel, thread).await?;
        }
        Ok(())
    }

    async fn export_thread(&mut self, channel: &Channel, thread: Thread) -> anyhow::Result<()> {
        tracing::info!(thread = %thread.title, "scraping thread");

        for attachment in thread.attachments() {
            self.attachments.record(AttachmentEntry::new(channel, &thread, None, attachment))?;
        }

        let path = output::transcript_path(self.out_dir, &channel.name, &thread.title);
        transcript::append(&path, &transcript::format_post(&thread, &self.archive)?)?;

        // Comments are written in the order the API returns them.
        let comments = self
            .client
            .get_comments(self.workspace_id, channel.id, thread.id)
            .await
            .with_context(|| format!("fetch comments of thread {}", thread.title))?;
        for comment in comments {
            transcript::append(&path, &transcript::format_post(&comment, &self.archive)?)?;
            for attachment in comment.attachments() {
                self.attachments.record(AttachmentEntry::new(
                    channel,
                    &thread,
                    Some(&comment),
                    attachment,
                ))?;
            }
            self.archive.push_comment(thread.id, comment);
        }

        self.archive.push_thread(channel.id, thread);
        Ok(())
    }
}
