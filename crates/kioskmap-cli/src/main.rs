mod geocode;
mod import;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "kioskmap-cli")]
#[command(about = "Station kiosk map command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Import one page of the open-data kiosk dataset
    Import {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,
        /// Rows per page (defaults to `KIOSKMAP_IMPORT_PAGE_SIZE`)
        #[arg(long)]
        size: Option<u32>,
        /// Run against an in-memory store and print the records instead of saving
        #[arg(long)]
        dry_run: bool,
    },
    /// Resolve a station to coordinates and region
    Geocode {
        /// Station name as it appears in the dataset
        station: String,
        /// Line designation, e.g. "7" or "7호선"
        #[arg(long, default_value = "")]
        line: String,
    },
    /// Database utilities
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Check database connectivity
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("kioskmap-cli: no command given; see --help");
        return Ok(());
    };

    let config = kioskmap_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match command {
        Commands::Import {
            page,
            size,
            dry_run,
        } => import::run_import(&config, page, size, dry_run).await,
        Commands::Geocode { station, line } => geocode::run_geocode(&config, &station, &line).await,
        Commands::Db { command } => run_db(&config, command).await,
    }
}

async fn run_db(config: &kioskmap_core::AppConfig, command: DbCommands) -> anyhow::Result<()> {
    let pool = kioskmap_db::connect_pool(
        &config.database_url,
        kioskmap_db::PoolConfig::from_app_config(config),
    )
    .await?;

    match command {
        DbCommands::Ping => {
            kioskmap_db::ping(&pool).await?;
            println!("database: ok");
        }
        DbCommands::Migrate => {
            let applied = kioskmap_db::run_migrations(&pool).await?;
            println!("migrations applied: {applied}");
        }
    }

    pool.close().await;
    Ok(())
}
