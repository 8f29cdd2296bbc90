//! opinion_monitor CLI: 舆情ダッシュボードを端末に表示する。
//! 引数なしの場合は `show` と同じ。
use clap::Parser;
use tracing_subscriber::EnvFilter;

use opinion_monitor::application::ServiceContainer;
use opinion_monitor::application::service_container::AppConfig;
use opinion_monitor::cli::{Cli, Cmd, run};
use opinion_monitor::utils::{config::EnvConfig, env::load_env};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // .env 読み込み
    load_env();
    EnvConfig::init();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = AppConfig::default();
    if let Some(api_url) = cli.api_url {
        config.api_base_url = api_url;
    }
    let container = ServiceContainer::with_config(config)?;

    if let Err(e) = run(cli.cmd.unwrap_or(Cmd::Show), &container).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    Ok(())
}
