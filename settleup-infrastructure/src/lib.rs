#![warn(clippy::uninlined_format_args)]

pub mod expense_store;

pub use expense_store::InMemoryExpenseRepository;
