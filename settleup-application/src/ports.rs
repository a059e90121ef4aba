use crate::{
    error::RepositoryError,
    model::{GroupId, RawExpense},
};
use settleup_domain::ParticipantId;
use std::collections::HashMap;

/// Source of truth for each group's expenses.
///
/// `snapshot` must return a consistent copy: appends racing with a snapshot
/// are either fully visible in it or not at all.
pub trait ExpenseRepository: Send + Sync {
    fn snapshot(&self, group: &GroupId) -> Result<Vec<RawExpense>, RepositoryError>;

    fn append(&self, group: &GroupId, expense: RawExpense) -> Result<(), RepositoryError>;
}

pub trait MemberDirectory: Send + Sync {
    fn display_name(&self, member_id: &ParticipantId) -> Option<&str>;
}

impl MemberDirectory for HashMap<ParticipantId, String> {
    fn display_name(&self, member_id: &ParticipantId) -> Option<&str> {
        self.get(member_id).map(String::as_str)
    }
}
