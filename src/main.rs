use blogify::config::{self, Config};
use tracing_subscriber::EnvFilter;

/// Dotenv file loaded before the environment is read. Real environment
/// variables always win over file entries.
const CONFIG_ENV_PATH: &str = "config/config.env";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::from_path(CONFIG_ENV_PATH).ok();
    dotenvy::dotenv().ok();

    let config = config::load_from_env()?;

    init_tracing(&config);
    config.print_summary();

    blogify::server::run(config).await
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_format == "json" {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
