use rand::Rng;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{CfError, Result};
use crate::interactions::{build_interactions, EntityIndex, InteractionMatrix, UserHistories};
use crate::io::{ActivityRecord, ItemIdx, ItemRecord, PredictionRecord, UserIdx, UserRecord};
use crate::metrics::accuracy::Accuracy;
use crate::metrics::evaluation_reporter::EvaluationReporter;
use crate::metrics::PredictionMetric;
use crate::userknn::holdout::HoldoutMap;
use crate::userknn::similarity::UserSimilarity;
use crate::userknn::{self, UserScore};

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct Prediction {
    pub user: UserIdx,
    pub item: ItemIdx,
    pub score: f64,
}

/// User based collaborative filter over a dense binary interaction matrix.
///
/// Everything is rebuilt from the records on construction. The matrix is never
/// written after that, so predictions for different users can run in parallel.
pub struct CollaborativeFilter {
    users: EntityIndex,
    items: EntityIndex,
    matrix: InteractionMatrix,
    histories: UserHistories,
    holdout: Option<HoldoutMap>,
    top_k: Option<usize>,
}

impl CollaborativeFilter {
    /// `top_k` of `None` or `Some(0)` uses every other user as a neighbour.
    pub fn new(
        users: EntityIndex,
        items: EntityIndex,
        activity: &[ActivityRecord],
        top_k: Option<usize>,
    ) -> Result<Self> {
        info!("Building matrix for filtering");
        let (matrix, histories) = build_interactions(&users, &items, activity)?;
        Ok(CollaborativeFilter {
            users,
            items,
            matrix,
            histories,
            holdout: None,
            top_k: top_k.filter(|k| *k > 0),
        })
    }

    pub fn from_records(
        users: &[UserRecord],
        items: &[ItemRecord],
        activity: &[ActivityRecord],
        top_k: Option<usize>,
    ) -> Result<Self> {
        let users = EntityIndex::new(users.iter().map(|record| record.user.as_str()));
        let items = EntityIndex::new(items.iter().map(|record| record.hotel.as_str()));
        CollaborativeFilter::new(users, items, activity, top_k)
    }

    pub fn users(&self) -> &EntityIndex {
        &self.users
    }

    pub fn items(&self) -> &EntityIndex {
        &self.items
    }

    pub fn matrix(&self) -> &InteractionMatrix {
        &self.matrix
    }

    pub fn histories(&self) -> &UserHistories {
        &self.histories
    }

    pub fn holdout(&self) -> Option<&HoldoutMap> {
        self.holdout.as_ref()
    }

    pub fn top_k(&self) -> Option<usize> {
        self.top_k
    }

    pub fn set_top_k(&mut self, top_k: Option<usize>) {
        self.top_k = top_k.filter(|k| *k > 0);
    }

    /// Draws a fresh held out item for every user, replacing any earlier draw.
    pub fn build_holdout_map<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<()> {
        let holdout = HoldoutMap::build(&self.users, &mut self.histories, rng)?;
        self.holdout = Some(holdout);
        Ok(())
    }

    pub fn find_similar_users(&self, user: UserIdx, mask_item: Option<ItemIdx>) -> Vec<UserScore> {
        self.matrix.find_similar_users(user, mask_item, self.top_k)
    }

    pub fn predict_next(&self, user: UserIdx, use_holdout: bool) -> Result<Prediction> {
        let mask_item = if use_holdout {
            let held_out_item = self
                .holdout
                .as_ref()
                .and_then(|holdout| holdout.held_out_item(user))
                .ok_or_else(|| CfError::MissingHoldout(self.users.key(user).to_string()))?;
            Some(held_out_item)
        } else {
            None
        };

        let scored_item = userknn::predict_next(
            &self.matrix,
            user,
            self.histories.items_for_user(user),
            mask_item,
            self.top_k,
        )?;

        match mask_item {
            Some(held_out_item) => debug!(
                "User {}: prediction {}, leave out: {}",
                self.users.key(user),
                self.items.key(scored_item.id),
                self.items.key(held_out_item)
            ),
            None => debug!(
                "User {}: prediction {}",
                self.users.key(user),
                self.items.key(scored_item.id)
            ),
        }

        Ok(Prediction {
            user,
            item: scored_item.id,
            score: scored_item.score,
        })
    }

    /// Predicts for `users`, or for every known user when `None`.
    /// The result follows the order of the requested users.
    pub fn predict(&self, users: Option<&[UserIdx]>, use_holdout: bool) -> Result<Vec<Prediction>> {
        match users {
            Some(users) => users
                .par_iter()
                .map(|user| self.predict_next(*user, use_holdout))
                .collect(),
            None => (0..self.users.len())
                .into_par_iter()
                .map(|user| self.predict_next(user, use_holdout))
                .collect(),
        }
    }

    /// Looks up user keys, failing on the first unknown one.
    pub fn resolve_users<S: AsRef<str>>(&self, keys: &[S]) -> Result<Vec<UserIdx>> {
        keys.iter()
            .map(|key| {
                self.users
                    .position(key.as_ref())
                    .ok_or_else(|| CfError::UnknownUser(key.as_ref().to_string()))
            })
            .collect()
    }

    /// Fraction of `predictions` that hit their held out item.
    ///
    /// Only predictions for users with a held out item are counted, so the
    /// result is 0 when there is no holdout map or nothing to evaluate.
    pub fn evaluate(&self, predictions: &[Prediction]) -> f64 {
        let mut accuracy = Accuracy::new();
        for (prediction, held_out_item) in self.with_held_out_items(predictions) {
            accuracy.add(prediction.item, held_out_item);
        }
        accuracy.result()
    }

    pub fn evaluation_report(&self, predictions: &[Prediction]) -> EvaluationReporter {
        let mut reporter = EvaluationReporter::new(&self.histories, self.items.len());
        for (prediction, held_out_item) in self.with_held_out_items(predictions) {
            reporter.add(prediction.item, held_out_item);
        }
        reporter
    }

    fn with_held_out_items<'a>(
        &'a self,
        predictions: &'a [Prediction],
    ) -> impl Iterator<Item = (&'a Prediction, ItemIdx)> + 'a {
        predictions.iter().filter_map(move |prediction| {
            self.holdout
                .as_ref()
                .and_then(|holdout| holdout.held_out_item(prediction.user))
                .map(|held_out_item| (prediction, held_out_item))
        })
    }

    pub fn to_records(&self, predictions: &[Prediction]) -> Vec<PredictionRecord> {
        predictions
            .iter()
            .map(|prediction| PredictionRecord {
                user: self.users.key(prediction.user).to_string(),
                hotel: self.items.key(prediction.item).to_string(),
            })
            .collect()
    }
}
