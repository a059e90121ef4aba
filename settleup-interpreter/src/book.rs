use indexmap::IndexMap;
use settleup_application::{AmountInput, GroupId, RawExpense};
use settleup_domain::ParticipantId;
use settleup_parser::{Ledger, Statement};
use std::collections::HashMap;

pub const DEFAULT_GROUP: &str = "default";

#[derive(Debug, Clone, PartialEq)]
pub struct BookEntry {
    pub line: usize,
    pub expense: RawExpense,
}

/// A parsed ledger file regrouped for settlement.
///
/// Groups keep the order in which they first appear in the file. A `group`
/// statement with no expenses still yields an (empty) group.
#[derive(Debug, Default)]
pub struct LedgerBook {
    pub groups: IndexMap<GroupId, Vec<BookEntry>>,
    pub members: HashMap<ParticipantId, String>,
}

impl LedgerBook {
    pub fn from_ledger(ledger: &Ledger<'_>) -> Self {
        let mut book = Self::default();
        let mut current = GroupId::new(DEFAULT_GROUP);

        for item in &ledger.statements {
            match &item.statement {
                Statement::Group(name) => {
                    current = GroupId::new(name);
                    book.groups.entry(current.clone()).or_default();
                }
                Statement::Member { id, display_name } => {
                    book.members
                        .insert(ParticipantId::new(id), (*display_name).to_owned());
                }
                Statement::Expense(expense) => {
                    let mut raw = RawExpense::new(
                        expense.payer,
                        AmountInput::Decimal(expense.amount),
                        expense.participants.iter().copied(),
                    )
                    .with_expense_id(&format!("line {}", item.line));
                    if let Some(policy) = expense.split_policy {
                        raw = raw.with_split_policy(policy);
                    }
                    book.groups.entry(current.clone()).or_default().push(BookEntry {
                        line: item.line,
                        expense: raw,
                    });
                }
            }
        }

        book
    }

    pub fn expense_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}
