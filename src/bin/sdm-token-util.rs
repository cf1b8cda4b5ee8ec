use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use reqwest::Client;
use sdm_token_util::observability::metrics::get_metrics;
use sdm_token_util::utils::config_loader;
use sdm_token_util::utils::logging::{self, LogLevel};
use sdm_token_util::{ConfigurationProvider, HttpTokenIssuer, MemoryStore, TokenCacheManager};
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "sdm-token-util.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
    /// print prometheus metrics to stderr before exiting
    #[arg(long)]
    dump_metrics: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the plugin settings as JSON
    Settings,
    /// Fetch the client-credentials token
    ClientToken,
    /// Exchange a user token
    UserToken {
        #[arg(long, env = "USER_TOKEN")]
        token: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Load YAML config
    // -------------------------------

    let args = Args::parse();
    let service_config = config_loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level);

    // -------------------------------
    // 2. Build token cache
    // -------------------------------

    let manager = TokenCacheManager::new(MemoryStore::new(), HttpTokenIssuer::new(Client::new()));
    let credentials = || {
        service_config
            .credentials()
            .ok_or_else(|| anyhow!("requires.sdm.credentials missing in {}", args.config))
    };

    // -------------------------------
    // 3. Run command
    // -------------------------------

    match &args.command {
        Command::Settings => {
            println!("{}", serde_json::to_string_pretty(&service_config.plugin_settings())?);
        }
        Command::ClientToken => {
            let token = manager.fetch_client_credentials_token(credentials()?).await?;
            info!("client credentials token fetched");
            println!("{}", token);
        }
        Command::UserToken { token } => {
            let exchanged = manager.fetch_user_token(credentials()?, token).await?;
            info!("user token fetched");
            println!("{}", exchanged);
        }
    }

    if args.dump_metrics {
        eprintln!("{}", get_metrics().render()?);
    }
    Ok(())
}
