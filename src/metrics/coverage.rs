use hashbrown::HashSet;

use crate::io::ItemIdx;
use crate::metrics::PredictionMetric;

/// Share of the catalog that shows up as a prediction at least once.
pub struct Coverage {
    qty_catalog_items: usize,
    predicted_items: HashSet<ItemIdx>,
}

impl Coverage {
    pub fn new(qty_catalog_items: usize) -> Coverage {
        Coverage {
            qty_catalog_items,
            predicted_items: HashSet::new(),
        }
    }
}

impl PredictionMetric for Coverage {
    fn add(&mut self, predicted_item: ItemIdx, _held_out_item: ItemIdx) {
        self.predicted_items.insert(predicted_item);
    }

    fn result(&self) -> f64 {
        if self.qty_catalog_items > 0 {
            self.predicted_items.len() as f64 / self.qty_catalog_items as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        "Coverage".to_string()
    }
}
