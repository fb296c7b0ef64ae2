use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use playback_seeder::config::SeedConfig;
use playback_seeder::generator::GenerationParams;
use playback_seeder::pipeline;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "playback_seeder=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables if .env exists
    let _ = dotenvy::dotenv();

    let config = SeedConfig::from_env().context("Invalid seeder configuration")?;
    tracing::debug!("Loaded {:?}", config);

    let mut rng = match config.seed {
        Some(seed) => {
            tracing::info!("Random seed: {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    let progress = ProgressBar::new(config.record_count as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Generating playback history [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=> "),
    );

    let outcome = pipeline::run(&config, GenerationParams::default(), &mut rng, &progress);

    // Pipeline failures are already logged; they do not change the exit status
    if outcome.is_failure() {
        tracing::warn!("Seeding finished without inserting: {}", outcome);
    } else {
        tracing::info!("Seeding finished: {}", outcome);
    }

    Ok(())
}
