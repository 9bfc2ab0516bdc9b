use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use betseer::config::{self, Config};
use betseer::evaluator::pipeline::ScoringFailure;
use betseer::evaluator::ScoringPipeline;
use betseer::markets::{BetCandidate, CandidateFeed, FeedSource};
use betseer::monitoring::{render_ranking, Logger, ScoreLog};
use betseer::signals::SignalCollector;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON config file (overrides BETSEER_CONFIG)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Score and rank bet candidates from a JSON file
    Score {
        /// JSON array of candidates
        input: PathBuf,
        /// Fill missing signals from the simulated providers
        #[arg(long)]
        enrich: bool,
        /// Print the ranking as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Generate simulated candidates and score them
    Simulate {
        #[arg(long, default_value_t = 10)]
        count: usize,
        #[arg(long, default_value_t = 42)]
        seed: u64,
        #[arg(long)]
        json: bool,
    },
    /// Print the effective configuration
    Init,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        std::env::var("BETSEER_LOG_LEVEL")
            .ok()
            .and_then(|l| l.parse::<Level>().ok())
            .unwrap_or(Level::INFO)
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    info!("Starting BetSeer");

    let config = config::load_config(cli.config.as_deref())
        .await
        .context("failed to load configuration")?;

    match cli.command {
        Some(Commands::Score { input, enrich, json }) => {
            let source = FeedSource::File(input);
            run_scoring(&config, source, enrich, json).await?;
        }
        Some(Commands::Simulate { count, seed, json }) => {
            info!("Running in SIMULATION mode - all signals are generated");
            let source = FeedSource::Simulated { count, seed };
            run_scoring(&config, source, true, json).await?;
        }
        Some(Commands::Init) => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        None => {
            info!("No command specified. Use --help for available commands.");
        }
    }

    Ok(())
}

async fn run_scoring(config: &Config, source: FeedSource, enrich: bool, json: bool) -> Result<()> {
    // Create channel between the feed and the scoring loop
    let (tx_sender, mut tx_receiver) = mpsc::channel::<BetCandidate>(100);

    // Initialize components
    let feed = CandidateFeed::new(source, tx_sender);
    let collector = SignalCollector::simulated(&config.signal_weights);
    let pipeline = ScoringPipeline::from_config(config);
    let logger = Logger::new(&config.log_dir)?;
    let bankroll = config.bankroll;

    let feed_task = tokio::spawn(async move { feed.start().await });

    let mut scored = Vec::new();
    let mut failures = Vec::new();

    // Main processing loop
    while let Some(candidate) = tx_receiver.recv().await {
        let candidate = if enrich {
            collector.enrich(candidate).await
        } else {
            candidate
        };

        match pipeline.evaluate(&candidate, Some(&bankroll)) {
            Ok(opportunity) => {
                info!(
                    "{}: confidence {:.3}, stake {:.4}, {} risk",
                    opportunity.id, opportunity.confidence, opportunity.recommended_stake, opportunity.risk_tier
                );
                scored.push(opportunity);
            }
            Err(e) => {
                warn!("Skipping {}: {}", candidate.id, e);
                failures.push(ScoringFailure {
                    id: candidate.id.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    match feed_task.await {
        Ok(Ok(delivered)) => info!("Feed delivered {} candidates", delivered),
        Ok(Err(e)) => return Err(e).context("candidate feed failed"),
        Err(e) => return Err(e).context("candidate feed task panicked"),
    }

    let ranked = pipeline.rank(&scored);

    for opportunity in &scored {
        let survived = pipeline.survives(opportunity);
        if let Err(e) = logger.log_score(&ScoreLog::from_opportunity(opportunity, survived)).await {
            error!("Failed to log score: {}", e);
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
    } else {
        print!("{}", render_ranking(&ranked, &failures));
    }

    info!(
        "Scored {} candidates, {} ranked, {} failed. Log: {}",
        scored.len(),
        ranked.len(),
        failures.len(),
        logger.path().display()
    );

    Ok(())
}
