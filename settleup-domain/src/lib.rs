#![warn(clippy::uninlined_format_args)]

pub mod error;
pub mod model;
pub mod services;

pub use error::{LedgerError, RecordViolation, ViolationKind};
pub use model::{
    Balances, ExpenseDraft, ExpenseRecord, Money, ParticipantId, Settlement, SplitPolicy, Transfer,
};
pub use services::{
    BalanceCalculator, LedgerValidator, SettlementEngine, SettlementMatcher, apply_transfers,
    merge_balances, split_equally,
};
