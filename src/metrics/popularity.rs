use std::cmp;

use crate::interactions::UserHistories;
use crate::io::ItemIdx;
use crate::metrics::PredictionMetric;

/// Mean click count of the predicted items, relative to the most clicked item.
pub struct Popularity {
    sum_of_scores: f64,
    qty: usize,
    clicks_per_item: Vec<usize>,
    max_frequency: usize,
}

impl Popularity {
    pub fn new(histories: &UserHistories, qty_items: usize) -> Popularity {
        let mut clicks_per_item = vec![0_usize; qty_items];
        let mut max_frequency = 0;
        for user in 0..histories.qty_users() {
            for item in histories.items_for_user(user) {
                clicks_per_item[*item] += 1;
                max_frequency = cmp::max(clicks_per_item[*item], max_frequency);
            }
        }

        Popularity {
            sum_of_scores: 0.0,
            qty: 0,
            clicks_per_item,
            max_frequency,
        }
    }
}

impl PredictionMetric for Popularity {
    fn add(&mut self, predicted_item: ItemIdx, _held_out_item: ItemIdx) {
        self.qty += 1;
        if self.max_frequency > 0 {
            if let Some(clicks) = self.clicks_per_item.get(predicted_item) {
                self.sum_of_scores += *clicks as f64 / self.max_frequency as f64;
            }
        }
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            self.sum_of_scores / self.qty as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        "Popularity".to_string()
    }
}
