use num_format::{Locale, ToFormattedString};
use tdigest::TDigest;
use tracing::info;

use crate::filter::CollaborativeFilter;

pub struct ActivityStats {
    pub descriptive_name: String,
    pub qty_records: usize,
    pub qty_users: usize,
    pub qty_items: usize,
    pub qty_distinct_interactions: usize,
    pub qty_users_without_activity: usize,
    pub density: f64,
    pub interactions_per_user_p50: u64,
    pub interactions_per_user_p90: u64,
    pub interactions_per_user_p99: u64,
    pub interactions_per_user_p100: u64,
}

pub fn determine_activity_statistics(
    descriptive_name: &str,
    filter: &CollaborativeFilter,
) -> ActivityStats {
    let histories = filter.histories();
    let qty_users = filter.users().len();
    let qty_items = filter.items().len();

    let clicks_per_user: Vec<f64> = (0..qty_users)
        .map(|user| histories.items_for_user(user).len() as f64)
        .collect();
    let qty_records = clicks_per_user.iter().sum::<f64>() as usize;
    let qty_users_without_activity = clicks_per_user.iter().filter(|clicks| **clicks == 0.0).count();
    let qty_distinct_interactions = filter.matrix().qty_interactions();
    let density = if qty_users * qty_items > 0 {
        qty_distinct_interactions as f64 / (qty_users * qty_items) as f64
    } else {
        0.0
    };

    let digest = TDigest::new_with_size(100).merge_unsorted(clicks_per_user.clone());
    let percentile = |q: f64| -> u64 {
        if clicks_per_user.is_empty() {
            0
        } else {
            digest.estimate_quantile(q).round() as u64
        }
    };
    let interactions_per_user_p50 = percentile(0.5);
    let interactions_per_user_p90 = percentile(0.9);
    let interactions_per_user_p99 = percentile(0.99);
    let interactions_per_user_p100 = clicks_per_user.iter().cloned().fold(0.0, f64::max) as u64;

    info!("Loaded {}", descriptive_name);
    info!("\tClicks: {}", qty_records.to_formatted_string(&Locale::en));
    info!("\tUsers: {}", qty_users.to_formatted_string(&Locale::en));
    info!("\tHotels: {}", qty_items.to_formatted_string(&Locale::en));
    info!(
        "\tDistinct user-hotel pairs: {} (density {:.6})",
        qty_distinct_interactions.to_formatted_string(&Locale::en),
        density
    );
    info!(
        "\tClicks per user percentiles: p50={} p90={} p99={} p100={}",
        interactions_per_user_p50,
        interactions_per_user_p90,
        interactions_per_user_p99,
        interactions_per_user_p100
    );
    if qty_users_without_activity > 0 {
        info!(
            "\tUsers without clicks: {}",
            qty_users_without_activity.to_formatted_string(&Locale::en)
        );
    }

    ActivityStats {
        descriptive_name: descriptive_name.to_string(),
        qty_records,
        qty_users,
        qty_items,
        qty_distinct_interactions,
        qty_users_without_activity,
        density,
        interactions_per_user_p50,
        interactions_per_user_p90,
        interactions_per_user_p99,
        interactions_per_user_p100,
    }
}
