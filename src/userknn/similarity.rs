use std::borrow::Cow;
use std::collections::BinaryHeap;

use crate::interactions::InteractionMatrix;
use crate::io::{ItemIdx, UserIdx};
use crate::userknn::UserScore;

pub trait UserSimilarity {
    fn qty_users(&self) -> usize;

    fn qty_items(&self) -> usize;

    fn interactions_for_user(&self, user: UserIdx) -> &[f64];

    /// Correlates `user` with every other user.
    /// param mask_item is read as 0 in the row of `user` only, the other rows stay untouched.
    /// param top_k keeps the `top_k` best scored users, `None` or `Some(0)` keeps everybody.
    fn find_similar_users(
        &self,
        user: UserIdx,
        mask_item: Option<ItemIdx>,
        top_k: Option<usize>,
    ) -> Vec<UserScore> {
        let user_row = masked_row(self.interactions_for_user(user), mask_item);

        let scored_users = (0..self.qty_users())
            .filter(|other_user| *other_user != user)
            .map(|other_user| {
                let similarity =
                    pearson_correlation(&user_row, self.interactions_for_user(other_user));
                UserScore::new(other_user, similarity)
            });

        match top_k {
            Some(k) if k > 0 => top_k_users(scored_users, k),
            _ => scored_users.collect(),
        }
    }
}

impl UserSimilarity for InteractionMatrix {
    fn qty_users(&self) -> usize {
        InteractionMatrix::qty_users(self)
    }

    fn qty_items(&self) -> usize {
        InteractionMatrix::qty_items(self)
    }

    fn interactions_for_user(&self, user: UserIdx) -> &[f64] {
        self.row(user)
    }
}

/// Returns `row` with `mask_item` zeroed. Only copies when there is something to zero.
pub fn masked_row(row: &[f64], mask_item: Option<ItemIdx>) -> Cow<'_, [f64]> {
    match mask_item {
        Some(item) if row.get(item).map_or(false, |value| *value != 0.0) => {
            let mut masked = row.to_vec();
            masked[item] = 0.0;
            Cow::Owned(masked)
        }
        _ => Cow::Borrowed(row),
    }
}

/// Pearson correlation coefficient of two equally long vectors.
///
/// A vector without variance has no defined correlation, we score it 0 so it
/// neither attracts nor repels.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return 0.0;
    }

    let mean_a = a[..n].iter().sum::<f64>() / n as f64;
    let mean_b = b[..n].iter().sum::<f64>() / n as f64;

    let mut covariance = 0.0;
    let mut sum_sq_a = 0.0;
    let mut sum_sq_b = 0.0;
    for (x, y) in a.iter().zip(b.iter()) {
        let dev_a = x - mean_a;
        let dev_b = y - mean_b;
        covariance += dev_a * dev_b;
        sum_sq_a += dev_a * dev_a;
        sum_sq_b += dev_b * dev_b;
    }

    let denominator = (sum_sq_a * sum_sq_b).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        (covariance / denominator).clamp(-1.0, 1.0)
    }
}

/// Keeps the `k` best users. Equal scores keep the user seen first.
/// The result is ordered from most to least similar.
pub fn top_k_users<I>(scored_users: I, k: usize) -> Vec<UserScore>
where
    I: IntoIterator<Item = UserScore>,
{
    let mut top_users: BinaryHeap<UserScore> = BinaryHeap::with_capacity(k);

    for scored_user in scored_users {
        if top_users.len() < k {
            top_users.push(scored_user);
        } else if let Some(mut bottom) = top_users.peek_mut() {
            // ordering is reverse, a smaller element is a better scored user
            if scored_user < *bottom {
                *bottom = scored_user;
            }
        }
    }

    top_users.into_sorted_vec()
}
