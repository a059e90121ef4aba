use crate::{
    error::LedgerError,
    model::{ExpenseDraft, Settlement},
    services::{BalanceCalculator, LedgerValidator, SettlementMatcher},
};

/// Runs validation, balance calculation and transfer matching over one batch.
#[derive(Default)]
pub struct SettlementEngine;

impl SettlementEngine {
    pub fn settle(&self, drafts: &[ExpenseDraft]) -> Result<Settlement, LedgerError> {
        let records = LedgerValidator.validate(drafts)?;
        let balances = BalanceCalculator.calculate(&records)?;
        let transfers = SettlementMatcher.match_transfers(&balances)?;

        Ok(Settlement {
            balances,
            transfers,
        })
    }
}
