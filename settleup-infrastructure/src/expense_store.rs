use dashmap::{DashMap, mapref::entry::Entry};
use settleup_application::{ExpenseRepository, GroupId, RawExpense, RepositoryError};
use std::sync::Arc;

/// In-memory expense storage keyed by group.
///
/// # Invariant
/// A group's expense list is only touched while holding its shard lock, so
/// `snapshot` never sees a partially applied `append`.
///
/// Groups without expenses are kept as empty lists rather than removed, to
/// distinguish "created but empty" from "unknown".
#[derive(Clone, Default)]
pub struct InMemoryExpenseRepository {
    inner: Arc<DashMap<GroupId, Vec<RawExpense>>>,
}

impl InMemoryExpenseRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_group(&self, group: &GroupId) -> Result<(), RepositoryError> {
        match self.inner.entry(group.clone()) {
            Entry::Occupied(_) => return Err(RepositoryError::GroupAlreadyExists(group.clone())),
            Entry::Vacant(slot) => {
                slot.insert(Vec::new());
            }
        }
        tracing::debug!(group = %group, "Group created");
        Ok(())
    }

    pub fn contains_group(&self, group: &GroupId) -> bool {
        self.inner.contains_key(group)
    }

    pub fn expense_count(&self, group: &GroupId) -> Option<usize> {
        self.inner.get(group).map(|expenses| expenses.len())
    }
}

impl ExpenseRepository for InMemoryExpenseRepository {
    fn snapshot(&self, group: &GroupId) -> Result<Vec<RawExpense>, RepositoryError> {
        self.inner
            .get(group)
            .map(|expenses| expenses.value().clone())
            .ok_or_else(|| RepositoryError::GroupNotFound(group.clone()))
    }

    fn append(&self, group: &GroupId, expense: RawExpense) -> Result<(), RepositoryError> {
        let Some(mut expenses) = self.inner.get_mut(group) else {
            return Err(RepositoryError::GroupNotFound(group.clone()));
        };
        expenses.push(expense);
        Ok(())
    }
}
