use chrono::{Local, NaiveDateTime};
use clap::Parser;
use itertools::Itertools;
use stock_rating_processor::{
    args::{Args, Command},
    database::{config::StorageConfig, json_store::JsonStore, store::Persistence},
    model::{
        processor::{MatchSubmission, ProcessorError, RatingProcessor},
        structures::character::Character
    },
    sync::{GitSyncWorker, SyncConfig, SyncPublisher}
};
use strum::IntoEnumIterator;
use tracing::{error, info, warn};
use tracing_indicatif::IndicatifLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    let args = Args::parse();

    init_tracing(&args.log_level);

    let config = StorageConfig::from_env(args.data_dir.clone());
    let store = match JsonStore::open(config.clone()) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to open data directory: {}", e);
            std::process::exit(1);
        }
    };
    info!(data_dir = %config.data_dir.display(), "Using data directory");

    let mut processor = RatingProcessor::new(store);
    let worker = if args.sync {
        let (publisher, receiver) = SyncPublisher::channel();
        processor = processor.with_notifier(Box::new(publisher));

        let sync_config = SyncConfig::from_env(true, config.data_dir.clone());
        info!(remote = %sync_config.remote, branch = %sync_config.branch, "Git sync enabled");
        Some(GitSyncWorker::new(sync_config).spawn(receiver))
    } else {
        None
    };

    let result = run(&processor, args.command, Local::now().naive_local());

    // Closing the channel lets the worker drain and exit
    drop(processor);
    if let Some(worker) = worker {
        if let Err(e) = worker.await {
            warn!("Sync worker did not finish cleanly: {}", e);
        }
    }

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn init_tracing(level: &str) {
    let indicatif_layer = IndicatifLayer::new();

    tracing_subscriber::registry()
        .with(EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(indicatif_layer.get_stderr_writer()))
        .with(indicatif_layer)
        .init();
}

fn run<P: Persistence>(processor: &RatingProcessor<P>, command: Command, now: NaiveDateTime) -> Result<(), ProcessorError> {
    match command {
        Command::Submit {
            p1,
            c1,
            p2,
            c2,
            winner,
            three_stock
        } => {
            let submission = MatchSubmission {
                player1: p1,
                character1: c1,
                player2: p2,
                character2: c2,
                winner,
                three_stock
            };
            let record = processor.submit_match(&submission, now)?;

            println!(
                "{} ({}): {} ({:+})",
                record.facts.player1, record.facts.character1, record.projection.new1, record.projection.diff1
            );
            println!(
                "{} ({}): {} ({:+})",
                record.facts.player2, record.facts.character2, record.projection.new2, record.projection.diff2
            );
        }
        Command::Placement { players } => {
            let record = processor.submit_placement(&players, now)?;

            for (place, result) in record.results.iter().enumerate() {
                println!(
                    "{}. {}: {} -> {} ({:+})",
                    place + 1,
                    result.player,
                    result.rating_before,
                    result.rating_after,
                    result.applied_delta
                );
            }
        }
        Command::Leaderboard => {
            for (rank, row) in processor.leaderboard(now.date())?.iter().enumerate() {
                let characters = row.ratings.iter().map(|(c, r)| format!("{} {}", c, r)).join(", ");
                println!("{:>3}. {:<20} {:>6}  {}", rank + 1, row.player, row.global_rating, characters);
            }
        }
        Command::Player { name } => {
            let stats = processor.player_stats(&name, now.date())?;

            println!("{} (global {})", stats.name, stats.global_rating);
            for (character, rating) in &stats.ratings {
                println!("  {:<24} {}", character.as_ref(), rating);
            }
            if let (Some(best), Some(worst)) = (stats.best_character, stats.worst_character) {
                println!("Best: {}  Worst: {}", best, worst);
            }
            println!(
                "Matches: {}  Wins: {}  Losses: {}  Win rate: {:.1}%",
                stats.total_matches, stats.wins, stats.losses, stats.win_rate
            );
            if let Some(rating) = stats.placement_rating {
                println!("Free-for-all: {}", rating);
            }
            if !stats.badges.is_empty() {
                println!("Badges: {}", stats.badges.join(", "));
            }
        }
        Command::HeadToHead { player_a, player_b } => {
            let h2h = processor.head_to_head(&player_a, &player_b)?;
            println!(
                "{} vs {}: {}-{} ({:.1}%)",
                player_a, player_b, h2h.wins, h2h.losses, h2h.win_rate
            );
        }
        Command::Rebuild => {
            let label = now.format("%Y%m%d_%H%M%S").to_string();
            let summary = processor.rebuild(&label)?;
            println!(
                "Rebuilt {} players from {} matches and {} sessions (backup {})",
                summary.players, summary.matches, summary.sessions, label
            );
        }
        Command::Reset { yes } => {
            if !yes {
                warn!("Refusing to reset without --yes");
                return Ok(());
            }
            processor.reset()?;
            println!("All data removed");
        }
        Command::Characters => {
            for character in Character::iter() {
                println!("{}", character);
            }
        }
    }

    Ok(())
}
