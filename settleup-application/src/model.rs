use arcstr::ArcStr;
use rust_decimal::Decimal;
use settleup_domain::{Money, ParticipantId, Transfer};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GroupId(ArcStr);

impl GroupId {
    pub fn new(id: &str) -> Self {
        Self(ArcStr::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An amount as entered by a user or extracted from a receipt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AmountInput {
    /// Already in minor units.
    Minor(i64),
    /// Display currency, e.g. `12.50`.
    Decimal(Decimal),
}

/// An expense as stored by the surrounding system, before any validation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RawExpense {
    pub expense_id: Option<String>,
    pub payer_id: String,
    pub amount: AmountInput,
    pub participant_ids: Vec<String>,
    pub split_policy: Option<String>,
}

impl RawExpense {
    pub fn new<I, S>(payer_id: &str, amount: AmountInput, participant_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expense_id: None,
            payer_id: payer_id.to_owned(),
            amount,
            participant_ids: participant_ids.into_iter().map(Into::into).collect(),
            split_policy: None,
        }
    }

    pub fn with_expense_id(mut self, expense_id: &str) -> Self {
        self.expense_id = Some(expense_id.to_owned());
        self
    }

    pub fn with_split_policy(mut self, policy: &str) -> Self {
        self.split_policy = Some(policy.to_owned());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PersonBalance {
    pub id: ParticipantId,
    pub balance: Money,
}

/// Balances ordered by participant id and the transfers that settle them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettlementResult {
    pub group: GroupId,
    pub balances: Vec<PersonBalance>,
    pub transfers: Vec<Transfer>,
}
