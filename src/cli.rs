use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Args {
    /// YAML file with `api`, `token`, `workspace_id` and `download_attachments`.
    #[arg(long, default_value = "config.yaml")]
    pub config: PathBuf,

    /// Output directory. Must not already contain a `channels/` folder from a previous export.
    #[arg(long, default_value = "output")]
    pub out: PathBuf,

    /// HTTP User-Agent used for API requests.
    #[arg(long, default_value = "twist-archive/0.1")]
    pub user_agent: String,
}
