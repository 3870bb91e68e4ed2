use clap::Parser as _;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = twist_archive::CliArgs::parse();
    if let Err(err) = twist_archive::run(args).await {
        tracing::error!("export failed: {err:#}");
        std::process::exit(1);
    }
}
