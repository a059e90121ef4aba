use crate::{
    amount::CurrencyContext,
    error::SettlementServiceError,
    model::{AmountInput, GroupId, PersonBalance, RawExpense, SettlementResult},
    ports::ExpenseRepository,
};
use settleup_domain::{ExpenseDraft, LedgerValidator, SettlementEngine};

/// Settles groups whose expenses live in an [`ExpenseRepository`].
#[derive(Clone, Copy)]
pub struct SettlementService<'a> {
    repository: &'a dyn ExpenseRepository,
    currency: &'a CurrencyContext,
}

impl<'a> SettlementService<'a> {
    pub fn new(repository: &'a dyn ExpenseRepository, currency: &'a CurrencyContext) -> Self {
        Self {
            repository,
            currency,
        }
    }

    pub fn currency(&self) -> &CurrencyContext {
        self.currency
    }

    /// Validates one expense on its own and appends it to the group.
    ///
    /// Rejected expenses never reach the repository, so a stored ledger only
    /// fails to settle if the stored data is changed behind the service.
    pub fn record_expense(
        &self,
        group: &GroupId,
        expense: RawExpense,
    ) -> Result<(), SettlementServiceError> {
        self.record_expenses(group, vec![expense])
    }

    /// Validates `expenses` as one batch and appends all of them, or none.
    ///
    /// Validation errors index into `expenses` and name every invalid record.
    pub fn record_expenses(
        &self,
        group: &GroupId,
        expenses: Vec<RawExpense>,
    ) -> Result<(), SettlementServiceError> {
        let drafts = expenses
            .iter()
            .enumerate()
            .map(|(index, expense)| self.to_draft(index, expense))
            .collect::<Result<Vec<_>, _>>()?;
        LedgerValidator.validate(&drafts)?;

        let count = expenses.len();
        for expense in expenses {
            self.repository.append(group, expense)?;
        }
        tracing::debug!(group = %group, expense_count = count, "Expenses recorded");
        Ok(())
    }

    /// Settles the group from a snapshot of its current expenses.
    pub fn settle_group(
        &self,
        group: &GroupId,
    ) -> Result<SettlementResult, SettlementServiceError> {
        let expenses = self.repository.snapshot(group)?;
        let result = self.settle_expenses(group, &expenses)?;
        tracing::info!(
            group = %group,
            expense_count = expenses.len(),
            transfer_count = result.transfers.len(),
            "Settlement calculated"
        );
        Ok(result)
    }

    /// Settles an expense list the caller already holds.
    pub fn settle_expenses(
        &self,
        group: &GroupId,
        expenses: &[RawExpense],
    ) -> Result<SettlementResult, SettlementServiceError> {
        let drafts = expenses
            .iter()
            .enumerate()
            .map(|(index, expense)| self.to_draft(index, expense))
            .collect::<Result<Vec<_>, _>>()?;

        let settlement = SettlementEngine.settle(&drafts)?;

        let balances = settlement
            .balances
            .into_iter()
            .map(|(id, balance)| PersonBalance { id, balance })
            .collect();

        Ok(SettlementResult {
            group: group.clone(),
            balances,
            transfers: settlement.transfers,
        })
    }

    fn to_draft(
        &self,
        index: usize,
        expense: &RawExpense,
    ) -> Result<ExpenseDraft, SettlementServiceError> {
        let amount_minor = match expense.amount {
            AmountInput::Minor(value) => value,
            AmountInput::Decimal(value) => self
                .currency
                .to_minor_units(value)
                .map_err(|source| SettlementServiceError::Amount { index, source })?,
        };

        Ok(ExpenseDraft {
            expense_id: expense.expense_id.clone(),
            payer_id: expense.payer_id.clone(),
            amount_minor,
            participant_ids: expense.participant_ids.clone(),
            split_policy: expense.split_policy.clone(),
        })
    }
}
