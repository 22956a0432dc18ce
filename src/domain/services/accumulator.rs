#[cfg(test)]
#[path = "accumulator_test.rs"]
mod tests;

use dashmap::DashMap;

use crate::domain::models::GenerationOutcome;
use crate::domain::models::ItemStatus;
use crate::domain::models::ItemView;
use crate::domain::models::MenuItem;

/// Collects per dish generation outcomes for one session. Outcomes are keyed
/// by dish name, while reads always walk the items in extraction order, so
/// the order results arrive in never shows through.
pub struct Accumulator {
    items: Vec<MenuItem>,
    statuses: DashMap<String, ItemStatus>,
}

impl Accumulator {
    /// Expects names to already be unique, see `dedupe_items`.
    pub fn new(items: Vec<MenuItem>) -> Accumulator {
        let statuses = DashMap::with_capacity(items.len());
        for item in &items {
            statuses.insert(item.name.to_string(), ItemStatus::Pending);
        }

        return Accumulator { items, statuses };
    }

    /// Records the outcome for a dish. The last write for a name wins, so
    /// merging the same outcome twice is a no-op. Names that were not part of
    /// the extraction are rejected and `false` is returned.
    pub fn merge(&self, name: &str, outcome: GenerationOutcome) -> bool {
        match self.statuses.get_mut(name) {
            Some(mut status) => {
                *status = ItemStatus::from(outcome);
                return true;
            }
            None => {
                tracing::warn!(name = name, "Ignoring outcome for unknown dish");
                return false;
            }
        }
    }

    pub fn status(&self, name: &str) -> Option<ItemStatus> {
        return self.statuses.get(name).map(|e| return e.value().clone());
    }

    pub fn len(&self) -> usize {
        return self.items.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.items.is_empty();
    }

    /// Number of dishes with a terminal outcome.
    pub fn completed(&self) -> usize {
        return self
            .statuses
            .iter()
            .filter(|e| return e.value().is_terminal())
            .count();
    }

    pub fn is_complete(&self) -> bool {
        return self.completed() == self.len();
    }

    pub fn snapshot(&self) -> Vec<ItemView> {
        return self
            .items
            .iter()
            .map(|item| {
                let status = self.status(&item.name).unwrap_or(ItemStatus::Pending);
                return ItemView {
                    item: item.clone(),
                    status,
                };
            })
            .collect();
    }
}
