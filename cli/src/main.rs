use clap::Parser;
use governor_cli::GovernorCli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(tracing_subscriber::EnvFilter::from_default_env()).init();

    let cli = GovernorCli::parse();
    governor_cli::run(cli).await
}
