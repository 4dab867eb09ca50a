use crate::io::ItemIdx;
use crate::metrics::PredictionMetric;

/// Share of users whose prediction is exactly their held out item.
pub struct Accuracy {
    qty_correct: usize,
    qty: usize,
}

impl Default for Accuracy {
    fn default() -> Self {
        Self::new()
    }
}

impl Accuracy {
    pub fn new() -> Accuracy {
        Accuracy {
            qty_correct: 0,
            qty: 0,
        }
    }
}

impl PredictionMetric for Accuracy {
    fn add(&mut self, predicted_item: ItemIdx, held_out_item: ItemIdx) {
        self.qty += 1;
        if predicted_item == held_out_item {
            self.qty_correct += 1;
        }
    }

    fn result(&self) -> f64 {
        if self.qty > 0 {
            self.qty_correct as f64 / self.qty as f64
        } else {
            0.0
        }
    }

    fn get_name(&self) -> String {
        "Accuracy".to_string()
    }
}

#[cfg(test)]
mod accuracy_test {
    use float_cmp::approx_eq;

    use super::*;

    #[test]
    fn should_happyflow_accuracy() {
        let mut undertest = Accuracy::new();
        undertest.add(3, 3);
        undertest.add(1, 1);
        undertest.add(2, 0);
        assert!(approx_eq!(f64, 2.0 / 3.0, undertest.result(), epsilon = 1e-12));
        assert_eq!("Accuracy", undertest.get_name());
    }

    #[test]
    fn should_handle_divide_by_zero() {
        let undertest = Accuracy::new();
        assert!((0.0 - undertest.result()).abs() < f64::EPSILON);
    }
}
