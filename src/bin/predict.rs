use anyhow::Context;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use tracing::info;

use userknn::config::AppConfig;
use userknn::dataframeutils::determine_activity_statistics;
use userknn::filter::CollaborativeFilter;
use userknn::io;

fn main() -> anyhow::Result<()> {
    let config_path = std::env::args().nth(1).unwrap_or_default();
    let config = AppConfig::new(&config_path)?;

    tracing_subscriber::fmt()
        .with_max_level(config.log.max_level())
        .init();

    let users = io::read_users(&config.data.users_path)
        .with_context(|| format!("reading users from {}", config.data.users_path))?;
    let items = io::read_items(&config.data.items_path)
        .with_context(|| format!("reading hotels from {}", config.data.items_path))?;
    let activity = io::read_activity(&config.data.activity_path)
        .with_context(|| format!("reading activity from {}", config.data.activity_path))?;

    let mut click_predictor = CollaborativeFilter::from_records(
        &users,
        &items,
        &activity,
        config.model.neighborhood_size(),
    )?;
    determine_activity_statistics(&config.data.activity_path, &click_predictor);

    info!("Building predictions");
    let predictions = click_predictor.predict(None, false)?;

    if config.evaluation.enabled {
        let mut rng = match config.evaluation.seed {
            Some(seed) => Pcg64::seed_from_u64(seed),
            None => Pcg64::from_entropy(),
        };
        click_predictor.build_holdout_map(&mut rng)?;
        info!("Building predictions w/randomly held out clicks for evaluation");
        let predictions_leftout = click_predictor.predict(None, true)?;
        let correct = click_predictor.evaluate(&predictions_leftout);
        let reporter = click_predictor.evaluation_report(&predictions_leftout);
        info!("{}", reporter.get_name());
        info!("{}", reporter.result());
        println!("Got {:.2} accuracy on predicting left out clicks", correct);
    }

    let records = click_predictor.to_records(&predictions);
    io::write_predictions(&config.data.output_path, &records)
        .with_context(|| format!("writing predictions to {}", config.data.output_path))?;
    info!(
        "Wrote {} predictions to {}",
        records.len(),
        config.data.output_path
    );

    Ok(())
}
