use hashbrown::HashMap;

use crate::error::{CfError, Result};
use crate::io::{ActivityRecord, ItemIdx, UserIdx};

/// Maps opaque string keys onto dense indices.
///
/// Indices follow first-seen order. A key that shows up twice keeps the
/// position of its first occurrence.
#[derive(Debug, Clone, Default)]
pub struct EntityIndex {
    keys: Vec<String>,
    positions: HashMap<String, usize>,
}

impl EntityIndex {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut index = EntityIndex::default();
        for key in keys {
            let key = key.into();
            if !index.positions.contains_key(&key) {
                index.positions.insert(key.clone(), index.keys.len());
                index.keys.push(key);
            }
        }
        index
    }

    pub fn position(&self, key: &str) -> Option<usize> {
        self.positions.get(key).copied()
    }

    pub fn key(&self, position: usize) -> &str {
        &self.keys[position]
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Dense binary user x item matrix, stored row major.
#[derive(Debug, Clone)]
pub struct InteractionMatrix {
    qty_users: usize,
    qty_items: usize,
    cells: Vec<f64>,
}

impl InteractionMatrix {
    pub fn zeros(qty_users: usize, qty_items: usize) -> Self {
        InteractionMatrix {
            qty_users,
            qty_items,
            cells: vec![0.0; qty_users * qty_items],
        }
    }

    pub fn mark(&mut self, user: UserIdx, item: ItemIdx) {
        self.cells[user * self.qty_items + item] = 1.0;
    }

    pub fn get(&self, user: UserIdx, item: ItemIdx) -> f64 {
        self.cells[user * self.qty_items + item]
    }

    pub fn row(&self, user: UserIdx) -> &[f64] {
        let start = user * self.qty_items;
        &self.cells[start..start + self.qty_items]
    }

    pub fn qty_users(&self) -> usize {
        self.qty_users
    }

    pub fn qty_items(&self) -> usize {
        self.qty_items
    }

    /// Number of non-zero cells.
    pub fn qty_interactions(&self) -> usize {
        self.cells.iter().filter(|cell| **cell != 0.0).count()
    }
}

/// Items each user interacted with, in record order. Repeated clicks stay.
#[derive(Debug, Clone)]
pub struct UserHistories {
    items_per_user: Vec<Vec<ItemIdx>>,
}

impl UserHistories {
    pub fn with_qty_users(qty_users: usize) -> Self {
        UserHistories {
            items_per_user: vec![Vec::new(); qty_users],
        }
    }

    pub fn items_for_user(&self, user: UserIdx) -> &[ItemIdx] {
        &self.items_per_user[user]
    }

    pub(crate) fn items_for_user_mut(&mut self, user: UserIdx) -> &mut Vec<ItemIdx> {
        &mut self.items_per_user[user]
    }

    pub fn qty_users(&self) -> usize {
        self.items_per_user.len()
    }
}

pub fn build_interactions(
    users: &EntityIndex,
    items: &EntityIndex,
    activity: &[ActivityRecord],
) -> Result<(InteractionMatrix, UserHistories)> {
    let mut matrix = InteractionMatrix::zeros(users.len(), items.len());
    let mut histories = UserHistories::with_qty_users(users.len());

    for record in activity {
        let user = users
            .position(&record.user)
            .ok_or_else(|| CfError::UnknownUser(record.user.clone()))?;
        let item = items
            .position(&record.hotel)
            .ok_or_else(|| CfError::UnknownItem(record.hotel.clone()))?;
        histories.items_for_user_mut(user).push(item);
        matrix.mark(user, item);
    }

    Ok((matrix, histories))
}
