use crate::interactions::UserHistories;
use crate::io::ItemIdx;
use crate::metrics::accuracy::Accuracy;
use crate::metrics::coverage::Coverage;
use crate::metrics::popularity::Popularity;
use crate::metrics::PredictionMetric;

pub struct EvaluationReporter {
    accuracy: Accuracy,
    coverage: Coverage,
    popularity: Popularity,
}

impl EvaluationReporter {
    pub fn new(histories: &UserHistories, qty_items: usize) -> EvaluationReporter {
        EvaluationReporter {
            accuracy: Accuracy::new(),
            coverage: Coverage::new(qty_items),
            popularity: Popularity::new(histories, qty_items),
        }
    }

    pub fn add(&mut self, predicted_item: ItemIdx, held_out_item: ItemIdx) {
        self.accuracy.add(predicted_item, held_out_item);
        self.coverage.add(predicted_item, held_out_item);
        self.popularity.add(predicted_item, held_out_item);
    }

    pub fn accuracy(&self) -> f64 {
        self.accuracy.result()
    }

    pub fn result(&self) -> String {
        format!(
            "{:.4},{:.4},{:.4}",
            self.accuracy.result(),
            self.coverage.result(),
            self.popularity.result()
        )
    }

    pub fn get_name(&self) -> String {
        format!(
            "{},{},{}",
            self.accuracy.get_name(),
            self.coverage.get_name(),
            self.popularity.get_name()
        )
    }
}
