use crate::model::GroupId;
use settleup_domain::LedgerError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AmountConversionError {
    #[error("Amount has more decimal places than the currency allows")]
    NonIntegral,
    #[error("Amount does not fit in minor units")]
    OutOfRange,
    #[error("Currency scale {scale} is not supported (max {max_supported})")]
    UnsupportedScale { scale: u32, max_supported: u32 },
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("Group '{0}' not found")]
    GroupNotFound(GroupId),
    #[error("Group '{0}' already exists")]
    GroupAlreadyExists(GroupId),
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SettlementServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("Expense {index}: {source}")]
    Amount {
        index: usize,
        #[source]
        source: AmountConversionError,
    },
}
