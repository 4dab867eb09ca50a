use anyhow::{bail, Context};
use indicatif::ProgressBar;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing::info;

use userknn::config::AppConfig;
use userknn::filter::CollaborativeFilter;
use userknn::io;

// Holdouts must be identical for every candidate, so the search never draws from entropy.
const DEFAULT_SEARCH_SEED: u64 = 42;

fn main() -> anyhow::Result<()> {
    // get params from config file
    let config_path = std::env::args()
        .nth(1)
        .context("Config file not specified!")?;
    let config = AppConfig::new(&config_path)?;

    tracing_subscriber::fmt()
        .with_max_level(config.log.max_level())
        .init();

    let top_k_choices = config.search.top_k_choices;
    if top_k_choices.is_empty() {
        bail!("search.top_k_choices lists no values");
    }

    let users = io::read_users(&config.data.users_path)
        .with_context(|| format!("reading users from {}", config.data.users_path))?;
    let items = io::read_items(&config.data.items_path)
        .with_context(|| format!("reading hotels from {}", config.data.items_path))?;
    let activity = io::read_activity(&config.data.activity_path)
        .with_context(|| format!("reading activity from {}", config.data.activity_path))?;

    let mut click_predictor = CollaborativeFilter::from_records(&users, &items, &activity, None)?;
    let seed = config.evaluation.seed.unwrap_or(DEFAULT_SEARCH_SEED);
    click_predictor.build_holdout_map(&mut Pcg64::seed_from_u64(seed))?;

    let mut best_value = f64::NEG_INFINITY;
    let mut best_top_k = 0;

    // Progress bar
    let pb = ProgressBar::new(top_k_choices.len() as u64);
    for top_k in top_k_choices {
        // increment progress bar
        pb.inc(1);
        click_predictor.set_top_k(Some(top_k));
        let predictions_leftout = click_predictor.predict(None, true)?;
        let accuracy = click_predictor.evaluate(&predictions_leftout);
        println!("TOPK,{},{:.4}", top_k, accuracy);
        if accuracy > best_value {
            best_value = accuracy;
            best_top_k = top_k;
        }
    }
    pb.finish();

    info!("holdout seed {}", seed);
    println!(
        "Best top_k found: {} (0 = all users) with Accuracy: {:.4}",
        best_top_k, best_value
    );
    Ok(())
}
