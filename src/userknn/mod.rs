use std::cmp::Ordering;

use crate::error::{CfError, Result};
use crate::io::{ItemIdx, UserIdx};
use crate::userknn::similarity::UserSimilarity;

pub mod holdout;
pub mod similarity;

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct UserScore {
    pub id: UserIdx,
    pub score: f64,
}

impl UserScore {
    pub fn new(id: UserIdx, score: f64) -> Self {
        UserScore { id, score }
    }
}

impl Eq for UserScore {}

impl Ord for UserScore {
    fn cmp(&self, other: &Self) -> Ordering {
        // reverse order by score, equal scores rank the lower user index first
        match other.score.partial_cmp(&self.score) {
            Some(Ordering::Less) => Ordering::Less,
            Some(Ordering::Greater) => Ordering::Greater,
            _ => self.id.cmp(&other.id),
        }
    }
}

impl PartialOrd for UserScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(PartialEq, Debug, Clone, Copy)]
pub struct ItemScore {
    pub id: ItemIdx,
    pub score: f64,
}

impl ItemScore {
    pub fn new(id: ItemIdx, score: f64) -> Self {
        ItemScore { id, score }
    }
}

/// Predicts the single next item for `user`.
///
/// Neighbour rows are summed weighted by their similarity, so negatively
/// correlated users push their items down. Items in `seen_items` can never be
/// predicted, except `mask_item`, which is the item held out for evaluation.
///
/// The first item with the highest score wins. When every item is excluded, or
/// nobody carries any signal, this degenerates to the lowest eligible index
/// (index 0 if nothing is eligible).
pub fn predict_next<I: UserSimilarity + ?Sized>(
    index: &I,
    user: UserIdx,
    seen_items: &[ItemIdx],
    mask_item: Option<ItemIdx>,
    top_k: Option<usize>,
) -> Result<ItemScore> {
    let qty_items = index.qty_items();
    if qty_items == 0 {
        return Err(CfError::EmptyCatalog);
    }

    let neighbors = index.find_similar_users(user, mask_item, top_k);

    let mut item_scores = vec![0.0_f64; qty_items];
    for neighbor in neighbors.iter() {
        let neighbor_items = index.interactions_for_user(neighbor.id);
        for (item_score, interaction) in item_scores.iter_mut().zip(neighbor_items) {
            *item_score += interaction * neighbor.score;
        }
    }

    for item in seen_items.iter().filter(|item| Some(**item) != mask_item) {
        item_scores[*item] = f64::NEG_INFINITY;
    }

    let best = item_scores
        .iter()
        .enumerate()
        .fold(ItemScore::new(0, f64::NEG_INFINITY), |best, (item, score)| {
            if *score > best.score {
                ItemScore::new(item, *score)
            } else {
                best
            }
        });

    Ok(best)
}

#[cfg(test)]
mod userknn_test {
    use std::collections::BinaryHeap;

    use float_cmp::approx_eq;

    use super::*;
    use crate::interactions::{build_interactions, EntityIndex, InteractionMatrix};
    use crate::io::ActivityRecord;

    fn matrix_from(users: &[&str], items: &[&str], pairs: &[(&str, &str)]) -> InteractionMatrix {
        let users = EntityIndex::new(users.to_vec());
        let items = EntityIndex::new(items.to_vec());
        let records: Vec<ActivityRecord> = pairs
            .iter()
            .map(|(user, hotel)| ActivityRecord::new(user, hotel))
            .collect();
        build_interactions(&users, &items, &records).unwrap().0
    }

    #[test]
    fn should_predict_the_only_unseen_item() {
        let matrix = matrix_from(
            &["A", "B", "C"],
            &["X", "Y", "Z"],
            &[("A", "X"), ("A", "Y"), ("B", "X"), ("B", "Z"), ("C", "Y"), ("C", "Z")],
        );

        let prediction = predict_next(&matrix, 0, &[0, 1], None, None).unwrap();

        assert_eq!(2, prediction.id);
        // -0.5 * B + -0.5 * C puts Z at -1
        assert!(approx_eq!(f64, -1.0, prediction.score, epsilon = 1e-12));
    }

    #[test]
    fn should_keep_the_masked_item_eligible() {
        let matrix = matrix_from(
            &["A", "B", "C"],
            &["X", "Y", "Z", "W"],
            &[("A", "X"), ("A", "Y"), ("B", "X"), ("B", "Y"), ("C", "Z"), ("C", "W")],
        );

        // A looks like B once Y is hidden, and B clicked Y
        let prediction = predict_next(&matrix, 0, &[0, 1], Some(1), None).unwrap();
        assert_eq!(1, prediction.id);

        let prediction = predict_next(&matrix, 0, &[0, 1], None, None).unwrap();
        assert_ne!(0, prediction.id);
        assert_ne!(1, prediction.id);
    }

    #[test]
    fn should_fall_back_to_lowest_index_when_everything_is_seen() {
        let matrix = matrix_from(
            &["A", "B"],
            &["X", "Y", "Z"],
            &[("A", "X"), ("A", "Y"), ("A", "Z"), ("B", "Y")],
        );

        let prediction = predict_next(&matrix, 0, &[0, 1, 2], None, None).unwrap();
        assert_eq!(0, prediction.id);
        assert_eq!(f64::NEG_INFINITY, prediction.score);
    }

    #[test]
    fn should_fall_back_to_lowest_eligible_index_without_neighbors() {
        let matrix = matrix_from(&["A"], &["X", "Y", "Z"], &[("A", "X")]);

        let prediction = predict_next(&matrix, 0, &[0], None, None).unwrap();
        assert_eq!(1, prediction.id);
        assert_eq!(0.0, prediction.score);
    }

    #[test]
    fn should_refuse_an_empty_catalog() {
        let matrix = matrix_from(&["A"], &[], &[]);
        let prediction = predict_next(&matrix, 0, &[], None, None);
        assert!(matches!(prediction, Err(CfError::EmptyCatalog)));
    }

    #[test]
    fn handle_reverse_ordering_userscore() {
        let largest = UserScore::new(123, 0.9);
        let middle = UserScore::new(234, 0.5);
        let smallest = UserScore::new(543, -0.2);
        let users = vec![largest, smallest, middle];

        let how_many = 2;
        let mut top_users: BinaryHeap<UserScore> = BinaryHeap::with_capacity(how_many);

        for userscore in users.into_iter() {
            if top_users.len() < how_many {
                top_users.push(userscore);
            } else {
                let mut reverse_top = top_users.peek_mut().unwrap();
                if userscore.score > reverse_top.score {
                    // ordering is reverse thus, user score is larger than the reverse top.
                    *reverse_top = userscore;
                }
            }
        }
        // the results are the top `how_many` in reverse order
        assert_eq!(234, top_users.pop().unwrap().id);
        assert_eq!(123, top_users.pop().unwrap().id);
    }

    #[test]
    fn handle_tied_userscores_by_index() {
        let mut users = vec![
            UserScore::new(7, 0.25),
            UserScore::new(2, 0.25),
            UserScore::new(5, 0.5),
        ];
        users.sort();
        let ids: Vec<UserIdx> = users.iter().map(|scored| scored.id).collect();
        assert_eq!(vec![5, 2, 7], ids);
    }
}
