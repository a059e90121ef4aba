pub mod balance_calculator;
pub mod ledger_validator;
pub mod settlement_engine;
pub mod settlement_matcher;

pub use balance_calculator::{BalanceCalculator, merge_balances, split_equally};
pub use ledger_validator::LedgerValidator;
pub use settlement_engine::SettlementEngine;
pub use settlement_matcher::{SettlementMatcher, apply_transfers};
