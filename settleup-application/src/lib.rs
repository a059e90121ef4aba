#![warn(clippy::uninlined_format_args)]

pub mod amount;
pub mod error;
pub mod model;
pub mod ports;
pub mod settlement_service;

pub use amount::CurrencyContext;
pub use error::{AmountConversionError, RepositoryError, SettlementServiceError};
pub use model::{AmountInput, GroupId, PersonBalance, RawExpense, SettlementResult};
pub use ports::{ExpenseRepository, MemberDirectory};
pub use settlement_service::SettlementService;
