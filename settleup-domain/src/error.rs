use crate::model::{Money, ParticipantId};
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("{} invalid expense record(s): {}", .0.len(), ViolationList(.0))]
    InvalidRecords(Vec<RecordViolation>),
    #[error("Record {index} uses unknown split policy '{policy}'")]
    UnknownPolicy { index: usize, policy: String },
    #[error("Balance of '{participant}' exceeds the representable amount range")]
    Overflow { participant: ParticipantId },
    #[error("Sum of balances must be zero (found {0})")]
    ImbalancedTotal(Money),
}

/// Every problem found in one input record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordViolation {
    pub index: usize,
    pub expense_id: Option<String>,
    pub kinds: Vec<ViolationKind>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    EmptyPayer,
    NonPositiveAmount { amount: i64 },
    NoParticipants,
    EmptyParticipant { position: usize },
    PayerNotParticipant,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPayer => f.write_str("payer id is empty"),
            Self::NonPositiveAmount { amount } => write!(f, "amount {amount} is not positive"),
            Self::NoParticipants => f.write_str("no participants listed"),
            Self::EmptyParticipant { position } => {
                write!(f, "participant #{position} has an empty id")
            }
            Self::PayerNotParticipant => f.write_str("payer is not among the participants"),
        }
    }
}

impl fmt::Display for RecordViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "record {}", self.index)?;
        if let Some(expense_id) = &self.expense_id {
            write!(f, " ({expense_id})")?;
        }
        f.write_str(": ")?;
        for (i, kind) in self.kinds.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{kind}")?;
        }
        Ok(())
    }
}

struct ViolationList<'a>(&'a [RecordViolation]);

impl fmt::Display for ViolationList<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, violation) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{violation}")?;
        }
        Ok(())
    }
}
