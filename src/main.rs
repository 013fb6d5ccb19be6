use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use gym_stats::aggregator::StatsAggregator;
use gym_stats::api::HttpStatsSource;
use gym_stats::config::ApiConfig;
use gym_stats::dashboard::{self, AdminOffsets, Dashboard, UserOffsets};
use gym_stats::logging;
use gym_stats::progress::LoadProgress;
use gym_stats::renderer;
use gym_stats::stats::Scope;
use gym_stats::window::{self, MAX_OFFSET};

#[derive(Parser)]
#[command(name = "gym-stats")]
#[command(about = "Training statistics dashboards for the gym backend", long_about = None)]
struct Cli {
    /// Backend base URL (env: GYM_STATS_API_URL, default http://localhost:8000/)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Bearer token (env: GYM_STATS_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value_t = Format::Md, global = true)]
    format: Format,

    /// Write the dashboard to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Append logs to gym-stats.log in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Md,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// All-users dashboard: categories, subscriptions, timeline and weekly attendance
    Admin {
        /// Months back for the category chart (0 = current month)
        #[arg(long, default_value_t = 0, value_parser = offset_parser())]
        category_month_offset: i32,
        /// Months back for the category x subscription chart
        #[arg(long, default_value_t = 0, value_parser = offset_parser())]
        subscription_month_offset: i32,
        /// Weeks back for the day-of-week chart (0 = current week)
        #[arg(long, default_value_t = 0, value_parser = offset_parser())]
        week_offset: i32,
    },
    /// Personal dashboard for one user
    User {
        #[arg(long)]
        user_id: u64,
        /// Weeks back for the weekly chart
        #[arg(long, default_value_t = 0, value_parser = offset_parser())]
        week_offset: i32,
        /// Months back for the monthly category chart
        #[arg(long, default_value_t = 0, value_parser = offset_parser())]
        month_offset: i32,
    },
    /// Subscription timeline since January of last year
    Timeline {
        /// Restrict to one user (default: all users)
        #[arg(long)]
        user_id: Option<u64>,
    },
}

fn offset_parser() -> clap::builder::RangedI64ValueParser<i32> {
    clap::value_parser!(i32).range(0..=MAX_OFFSET as i64)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init_logging(cli.log_dir.as_deref())?;

    let config = ApiConfig::resolve(cli.api_url, cli.token)?;
    if config.credential.is_none() {
        tracing::warn!("no token configured, requests will be sent unauthenticated");
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;
    let dashboard = runtime.block_on(load(&config, cli.command))?;

    let rendered = match cli.format {
        Format::Md => renderer::md::render(&dashboard)?,
        Format::Json => serde_json::to_string_pretty(&dashboard)
            .context("Failed to serialize dashboard")?,
    };

    match cli.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create output directory: {}", parent.display())
                })?;
            }
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Dashboard written to: {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

async fn load(config: &ApiConfig, command: Commands) -> Result<Dashboard> {
    let source = HttpStatsSource::new(config).context("Failed to create HTTP client")?;
    tracing::info!(base_url = %source.base_url(), "loading statistics");

    let aggregator = StatsAggregator::new(source);
    let today = window::today();

    let dashboard = match command {
        Commands::Admin {
            category_month_offset,
            subscription_month_offset,
            week_offset,
        } => {
            let progress = LoadProgress::start("Loading admin statistics");
            let offsets = AdminOffsets {
                category_month: category_month_offset,
                subscription_month: subscription_month_offset,
                week: week_offset,
            };
            let admin = dashboard::build_admin(&aggregator, today, offsets).await;
            progress.finish(&format!(
                "Admin statistics for {} loaded",
                admin.categories.period
            ));
            Dashboard::Admin(admin)
        }
        Commands::User {
            user_id,
            week_offset,
            month_offset,
        } => {
            let progress =
                LoadProgress::start(&format!("Loading statistics for user {}", user_id));
            let offsets = UserOffsets {
                week: week_offset,
                month: month_offset,
            };
            let user = dashboard::build_user(&aggregator, today, user_id, offsets).await;
            progress.finish(&format!("Statistics for user {} loaded", user_id));
            Dashboard::User(user)
        }
        Commands::Timeline { user_id } => {
            let scope = user_id.map(Scope::User).unwrap_or(Scope::AllUsers);
            let progress = LoadProgress::start(&format!("Loading timeline for {}", scope));
            let panel = dashboard::timeline_panel(&aggregator, scope, today).await;
            progress.finish(&format!("Timeline for {} loaded", scope));
            Dashboard::Timeline(panel)
        }
    };

    Ok(dashboard)
}
