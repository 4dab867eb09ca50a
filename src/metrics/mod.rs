use crate::io::ItemIdx;

pub mod accuracy;
pub mod coverage;
pub mod evaluation_reporter;
pub mod popularity;

pub trait PredictionMetric {
    fn add(&mut self, predicted_item: ItemIdx, held_out_item: ItemIdx);
    fn result(&self) -> f64;
    fn get_name(&self) -> String;
}
