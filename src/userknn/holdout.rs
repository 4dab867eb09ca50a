use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{CfError, Result};
use crate::interactions::{EntityIndex, UserHistories};
use crate::io::{ItemIdx, UserIdx};

/// One withheld item per user, the ground truth for leave-one-out evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoldoutMap {
    held_out_items: Vec<ItemIdx>,
}

impl HoldoutMap {
    /// Shuffles the history of every user with `rng` and holds out its last item.
    ///
    /// The held out item stays in the history, callers exclude it by comparing
    /// against [`HoldoutMap::held_out_item`].
    pub fn build<R: Rng + ?Sized>(
        users: &EntityIndex,
        histories: &mut UserHistories,
        rng: &mut R,
    ) -> Result<HoldoutMap> {
        let mut held_out_items = Vec::with_capacity(users.len());
        for user in 0..users.len() {
            let items = histories.items_for_user_mut(user);
            items.shuffle(rng);
            match items.last() {
                Some(item) => held_out_items.push(*item),
                None => return Err(CfError::EmptyHistory(users.key(user).to_string())),
            }
        }
        Ok(HoldoutMap { held_out_items })
    }

    pub(crate) fn from_items(held_out_items: Vec<ItemIdx>) -> Self {
        HoldoutMap { held_out_items }
    }

    pub fn held_out_item(&self, user: UserIdx) -> Option<ItemIdx> {
        self.held_out_items.get(user).copied()
    }

    pub fn len(&self) -> usize {
        self.held_out_items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held_out_items.is_empty()
    }
}

#[cfg(test)]
mod holdout_test {
    use rand::SeedableRng;
    use rand_pcg::Pcg64;

    use super::*;
    use crate::interactions::build_interactions;
    use crate::io::ActivityRecord;

    fn fixture() -> (EntityIndex, UserHistories) {
        let users = EntityIndex::new(vec!["A", "B", "C"]);
        let items = EntityIndex::new(vec!["X", "Y", "Z"]);
        let records: Vec<ActivityRecord> = [
            ("A", "X"),
            ("A", "Y"),
            ("A", "Z"),
            ("B", "X"),
            ("B", "X"),
            ("C", "Z"),
        ]
        .iter()
        .map(|(user, hotel)| ActivityRecord::new(user, hotel))
        .collect();
        let (_, histories) = build_interactions(&users, &items, &records).unwrap();
        (users, histories)
    }

    #[test]
    fn should_hold_out_one_clicked_item_per_user() {
        let (users, mut histories) = fixture();
        let mut rng = Pcg64::seed_from_u64(42);

        let holdout = HoldoutMap::build(&users, &mut histories, &mut rng).unwrap();

        assert_eq!(3, holdout.len());
        for user in 0..users.len() {
            let item = holdout.held_out_item(user).unwrap();
            assert!(histories.items_for_user(user).contains(&item));
            assert_eq!(Some(&item), histories.items_for_user(user).last());
        }
        assert_eq!(Some(0), holdout.held_out_item(1));
        assert_eq!(Some(2), holdout.held_out_item(2));
        assert_eq!(None, holdout.held_out_item(3));
    }

    #[test]
    fn should_be_reproducible_with_a_seed() {
        let (users, mut first_histories) = fixture();
        let (_, mut second_histories) = fixture();

        let first =
            HoldoutMap::build(&users, &mut first_histories, &mut Pcg64::seed_from_u64(7)).unwrap();
        let second =
            HoldoutMap::build(&users, &mut second_histories, &mut Pcg64::seed_from_u64(7)).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn should_refuse_users_without_history() {
        let users = EntityIndex::new(vec!["A", "B"]);
        let items = EntityIndex::new(vec!["X"]);
        let records = vec![ActivityRecord::new("A", "X")];
        let (_, mut histories) = build_interactions(&users, &items, &records).unwrap();

        let holdout = HoldoutMap::build(&users, &mut histories, &mut Pcg64::seed_from_u64(1));

        assert!(matches!(holdout, Err(CfError::EmptyHistory(user)) if user == "B"));
    }
}
