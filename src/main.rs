use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cricket_league::api::state::AppState;
use cricket_league::api::{build_router, Pagination, PaginationMeta};
use cricket_league::config::{AppConfig, StorageBackend};
use cricket_league::standings::{
    refresh_standings, resolve_rules, stored_leaderboard, RefreshOptions, RuleSource,
};
use cricket_league::storage::{audit_store, JsonlStore, LeagueStore, MemoryStore, StorageConfig};

#[derive(Parser)]
#[command(name = "cricket-league")]
#[command(about = "Fantasy cricket league scoring and leaderboards")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides config)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides config
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,

        /// Log all HTTP requests
        #[arg(long)]
        access_log: bool,
    },

    /// Print the stored leaderboard
    Leaderboard {
        /// Only teams in this league
        #[arg(long)]
        league: Option<u32>,

        #[arg(long)]
        page: Option<u32>,

        #[arg(long)]
        page_size: Option<u32>,
    },

    /// Rescore performances and refresh standings
    Recompute {
        /// Only teams in this league
        #[arg(long)]
        league: Option<u32>,

        /// Compute and print without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the rule set a league is scored under
    Rules {
        #[arg(long)]
        league: Option<u32>,
    },

    /// Check stored data for consistency problems
    ValidateStorage,
}

fn open_store(config: &AppConfig) -> Result<Arc<dyn LeagueStore>> {
    let jsonl = JsonlStore::new(StorageConfig::new(config.data_dir.clone()));
    let store: Arc<dyn LeagueStore> = match config.storage.backend {
        StorageBackend::Jsonl => Arc::new(jsonl),
        StorageBackend::Memory => {
            // Seeded from disk; writes stay in memory
            Arc::new(MemoryStore::from_snapshot(jsonl.load_snapshot()?))
        }
    };
    Ok(store)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(&cli.config)?;
    if let Some(data_dir) = cli.data_dir {
        config.data_dir = data_dir;
    }
    let log_level = cli.log_level.unwrap_or_else(|| config.log_level.clone());

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting cricket-league v{}", env!("CARGO_PKG_VERSION"));

    let store = open_store(&config)?;
    let calculator = config.calculator();

    match cli.command {
        Commands::Serve {
            host,
            port,
            access_log,
        } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let state = AppState::new(store, config, calculator);
            let app = build_router(state, access_log);

            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("API: http://{}/api", addr);
            axum::serve(listener, app).await?;
        }
        Commands::Leaderboard {
            league,
            page,
            page_size,
        } => {
            let ranked = stored_leaderboard(store.as_ref(), league).await?;
            let pagination = Pagination::with_limits(
                page,
                page_size,
                config.leaderboard.default_page_size,
                config.leaderboard.max_page_size,
            );
            let meta = PaginationMeta::new(&pagination, ranked.len() as u32);

            println!("{:>4}  {:>5}  {:<28} {:>8} {:>7}", "Rank", "Move", "Team", "Total", "Week");
            for row in pagination.slice(&ranked) {
                let movement = match row.rank_delta {
                    Some(d) if d > 0 => format!("+{}", d),
                    Some(d) => d.to_string(),
                    None => "-".to_string(),
                };
                println!(
                    "{:>4}  {:>5}  {:<28} {:>8} {:>7}",
                    row.rank,
                    movement,
                    row.team.name,
                    row.total_points,
                    row.team.weekly_points.unwrap_or_default()
                );
            }
            println!(
                "\nPage {}/{} ({} teams)",
                meta.page,
                meta.total_pages.max(1),
                meta.total_items
            );
        }
        Commands::Recompute { league, dry_run } => {
            let window = config
                .leaderboard
                .window()
                .unwrap_or_else(|| chrono::Duration::days(7));
            let options = RefreshOptions::new(league, window).dry_run(dry_run);
            let summary =
                refresh_standings(store.as_ref(), &calculator, &config.scoring, &options).await?;

            println!("\n=== Standings Refresh ===");
            println!("Performances scored: {}", summary.performances_scored);
            for rules in &summary.rule_sets {
                println!("Rules for {:?}:    {}", rules.league_id, rules.fingerprint);
            }
            for row in &summary.teams {
                println!(
                    "  {:>3}. {:<28} {:>8}",
                    row.rank, row.team.name, row.total_points
                );
            }
            if dry_run {
                println!("\n(dry run - no data written to disk)");
            }
        }
        Commands::Rules { league } => {
            let resolved = resolve_rules(store.as_ref(), league, &config.scoring).await?;
            match &resolved.source {
                RuleSource::PointsSystem { id, name } => {
                    println!("Points system {} ({})", id, name)
                }
                RuleSource::Fallback => println!("Default rule set"),
            }
            println!("Fingerprint: {}", resolved.fingerprint);
            for (key, weight) in resolved.rule.iter() {
                println!("  {:<24} {}", key, weight);
            }
            let warnings = resolved.rule.warnings();
            if !warnings.is_empty() {
                println!("\nWarnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
        }
        Commands::ValidateStorage => {
            let audit = audit_store(store.as_ref()).await?;
            if audit.is_clean() {
                println!("Storage OK");
                return Ok(());
            }
            for (team_id, problem) in &audit.invalid_teams {
                println!("Team {}: {}", team_id, problem);
            }
            if !audit.orphan_performances.is_empty() {
                println!("Orphan performances: {:?}", audit.orphan_performances);
            }
            if !audit.unscored_teams.is_empty() {
                println!("Teams without totals: {:?}", audit.unscored_teams);
            }
            for (table, count) in &audit.unreadable_rows {
                println!("{}: {} unreadable rows", table, count);
            }
            anyhow::bail!("storage validation found problems");
        }
    }

    Ok(())
}
