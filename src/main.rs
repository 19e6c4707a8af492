use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tier_scorer::{
    config::Settings,
    jobs::{RecomputationJob, RecomputeOptions},
    models::{JobOutcome, MemberRecord, PerformanceStats, Rank},
    scoring::TierScoreCalculator,
    store::SqliteMemberStore,
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "tier-scorer")]
#[clap(about = "Compute and reconcile roster tier scores", long_about = None)]
struct Cli {
    /// Configuration file (defaults to config/default and config/local)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recompute every active member's tier score and store the changes
    Recompute {
        /// Report what would change without writing
        #[clap(long)]
        dry_run: bool,
    },

    /// Compute the tier score for a single rank and stat line
    Score {
        /// Rank, e.g. gold_iii or "Diamond 1"
        #[clap(short, long)]
        rank: Rank,

        #[clap(long, default_value = "0", allow_negative_numbers = true)]
        wins: i64,

        #[clap(long, default_value = "0", allow_negative_numbers = true)]
        losses: i64,

        #[clap(long, default_value = "0", allow_negative_numbers = true)]
        main_games: i64,

        #[clap(long, default_value = "0", allow_negative_numbers = true)]
        main_wins: i64,

        #[clap(long, default_value = "0", allow_negative_numbers = true)]
        sub_games: i64,

        #[clap(long, default_value = "0", allow_negative_numbers = true)]
        sub_wins: i64,

        /// Number of distinct secondary positions declared
        #[clap(long, default_value = "1")]
        sub_positions: u32,
    },

    /// Print the rank ladder and its base values
    Ladder,

    /// Load member records from a JSON array into the member store
    Seed {
        #[clap(short, long)]
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::new().unwrap_or_else(|e| {
            eprintln!("Using default settings: {}", e);
            Settings::default()
        }),
    };

    init_logging(&settings);

    // Validate settings
    if let Err(e) = settings.validate() {
        error!("Invalid settings: {}", e);
        return Err(anyhow::anyhow!(e));
    }

    let calculator = Arc::new(TierScoreCalculator::new(settings.scoring.clone()));

    match cli.command {
        Commands::Recompute { dry_run } => {
            let mut options = RecomputeOptions::from(&settings);
            options.dry_run |= dry_run;

            let outcome = match SqliteMemberStore::connect(&settings.database).await {
                Ok(store) => {
                    let job = RecomputationJob::new(Arc::new(store), calculator, options);
                    job.run().await
                }
                Err(e) => {
                    error!("Failed to open member store: {}", e);
                    JobOutcome::failed(e)
                }
            };

            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if !outcome.success {
                std::process::exit(1);
            }
        }

        Commands::Score {
            rank,
            wins,
            losses,
            main_games,
            main_wins,
            sub_games,
            sub_wins,
            sub_positions,
        } => {
            let stats = PerformanceStats {
                total_wins: wins,
                total_losses: losses,
                main_games,
                main_wins,
                sub_games,
                sub_wins,
                sub_position_count: sub_positions,
            };
            if !stats.is_well_formed() {
                info!("Counters are inconsistent; win rates will be clamped");
            }

            let breakdown = calculator.breakdown(rank, &stats);
            println!("{}", serde_json::to_string_pretty(&breakdown)?);
        }

        Commands::Ladder => {
            println!("{}", serde_json::to_string_pretty(&calculator.ladder().entries())?);
        }

        Commands::Seed { file } => {
            let raw = std::fs::read_to_string(&file)?;
            let members: Vec<MemberRecord> = serde_json::from_str(&raw)?;

            let store = SqliteMemberStore::connect(&settings.database).await?;
            store.migrate().await?;
            for member in &members {
                store.upsert_member(member).await?;
            }
            info!("Seeded {} members from {}", members.len(), file.display());
        }
    }

    Ok(())
}

fn init_logging(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.app.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
