//! `questlog` binary.
//!
//! Commands:
//! - `quests [filters...]` - filtered, sorted, paginated quest listing
//! - `quest <id-or-slug>` - one quest with grouped XP rewards
//! - `xp <id-or-slug> --difficulty <name>` - XP at one difficulty and tier
//! - `locations` - every location with its full path
//! - `stats` - catalog overview and level distribution
//! - `import <file.json>` - validate and insert quests with their rewards
//!
//! Output is pretty-printed JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use questlog_cli::commands::{self, XpQuery};
use questlog_cli::config::CliConfig;
use questlog_cli::import;
use questlog_core::catalog::Catalog;
use questlog_core::quest_filter::QuestFilterParams;
use questlog_db::repositories::CatalogRepo;

#[derive(Parser)]
#[command(name = "questlog")]
#[command(about = "Query and maintain the quest catalog")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List quests matching the given filters
    Quests(QuestArgs),
    /// Show one quest by id or slug
    Quest { key: String },
    /// Compute XP for a quest at a difficulty
    Xp {
        /// Quest id or slug
        key: String,
        /// Difficulty name (e.g. Elite)
        #[arg(short, long)]
        difficulty: String,
        #[arg(long)]
        epic: bool,
        #[arg(long)]
        legendary: bool,
        /// Include the difficulty's first-time completion bonus
        #[arg(long)]
        first_time: bool,
    },
    /// List locations with their full paths
    Locations,
    /// Show catalog statistics
    Stats,
    /// Import quests from a JSON file
    Import { file: String },
}

/// Quest filters. Values are passed through as text and parsed leniently:
/// anything unparseable is ignored.
#[derive(Args, Debug, Default)]
struct QuestArgs {
    /// Matches any of the heroic, epic or legendary level
    #[arg(long)]
    level: Option<String>,
    #[arg(long)]
    heroic_level: Option<String>,
    #[arg(long)]
    epic_level: Option<String>,
    #[arg(long)]
    legendary_level: Option<String>,
    /// Inclusive heroic level range, e.g. `5-10`
    #[arg(long)]
    level_range: Option<String>,
    /// Patron name or id
    #[arg(long)]
    patron: Option<String>,
    /// Duration name or id
    #[arg(long)]
    duration: Option<String>,
    /// Adventure pack name or id
    #[arg(long)]
    adventure_pack: Option<String>,
    /// Location name or id
    #[arg(long)]
    location: Option<String>,
    #[arg(long)]
    free_to_play: Option<String>,
    #[arg(long)]
    extreme_challenge: Option<String>,
    /// Case-insensitive substring of the quest name
    #[arg(short, long)]
    search: Option<String>,
    #[arg(long)]
    has_epic: Option<String>,
    #[arg(long)]
    has_legendary: Option<String>,
    #[arg(long)]
    min_favor: Option<String>,
    #[arg(long)]
    max_favor: Option<String>,
    /// name, heroic_level, epic_level, legendary_level, base_favor or created_at
    #[arg(long)]
    sort_by: Option<String>,
    /// asc or desc
    #[arg(long)]
    sort_direction: Option<String>,
    #[arg(long)]
    page: Option<String>,
    #[arg(long)]
    per_page: Option<String>,
}

impl From<QuestArgs> for QuestFilterParams {
    fn from(args: QuestArgs) -> Self {
        Self {
            level: args.level,
            heroic_level: args.heroic_level,
            epic_level: args.epic_level,
            legendary_level: args.legendary_level,
            level_range: args.level_range,
            patron: args.patron,
            duration: args.duration,
            adventure_pack: args.adventure_pack,
            location: args.location,
            free_to_play: args.free_to_play,
            extreme_challenge: args.extreme_challenge,
            search: args.search,
            has_epic: args.has_epic,
            has_legendary: args.has_legendary,
            min_favor: args.min_favor,
            max_favor: args.max_favor,
            sort_by: args.sort_by,
            sort_direction: args.sort_direction,
            page: args.page,
            per_page: args.per_page,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "questlog=info,questlog_cli=info,questlog_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // --- Configuration ---
    let config = CliConfig::from_env()?;

    // --- Database ---
    let pool = questlog_db::create_pool(&config.database_url, config.max_connections)
        .await
        .context("Failed to connect to database")?;
    tracing::debug!(max_connections = config.max_connections, "Database connection pool created");

    questlog_db::health_check(&pool)
        .await
        .context("Database health check failed")?;

    questlog_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::debug!("Database migrations applied");

    // --- Command ---
    match cli.command {
        Commands::Quests(args) => {
            let catalog = load_catalog(&pool).await?;
            print_json(&commands::quests(&catalog, args.into()))
        }
        Commands::Quest { key } => {
            let catalog = load_catalog(&pool).await?;
            print_json(&commands::quest(&catalog, &key)?)
        }
        Commands::Xp {
            key,
            difficulty,
            epic,
            legendary,
            first_time,
        } => {
            let catalog = load_catalog(&pool).await?;
            let query = XpQuery {
                difficulty,
                is_epic: epic,
                is_legendary: legendary,
                first_time,
            };
            print_json(&commands::xp(&catalog, &key, &query)?)
        }
        Commands::Locations => {
            let catalog = load_catalog(&pool).await?;
            print_json(&commands::locations(&catalog)?)
        }
        Commands::Stats => {
            let catalog = load_catalog(&pool).await?;
            print_json(&commands::stats(&catalog))
        }
        Commands::Import { file } => {
            let json = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {file}"))?;
            let entries = import::parse(&json)?;
            print_json(&import::run(&pool, entries).await?)
        }
    }
}

async fn load_catalog(pool: &questlog_db::DbPool) -> Result<Catalog> {
    CatalogRepo::load(pool)
        .await
        .context("Failed to load catalog")
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
