use clap::Args;
use lumen_client::HttpOptimizer;
use lumen_core::config::Config;
use lumen_core::{LumenError, LumenResult};
use tracing::info;

#[derive(Args, Debug, Clone)]
pub struct HealthArgs {
    #[command(flatten)]
    pub config: Config,
}

pub async fn run(config: &Config) -> LumenResult<()> {
    let client = HttpOptimizer::from_settings(&config.api)?;
    let health = client.health().await?;

    if !health.is_ok() {
        return Err(LumenError::Transport(format!(
            "optimizer at {} reports status '{}'",
            client.base_url(),
            health.status
        )));
    }

    info!("✅ Optimizer at {} is up", client.base_url());
    println!("{}", health.status);
    Ok(())
}
