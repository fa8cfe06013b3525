pub use aggregation::{CategorySummary, DailyBalance, month_start};
pub use categories::Category;
pub use commands::{CategoryUpdate, NewCategory, NewTransaction, TransactionUpdate};
pub use error::EngineError;
pub use export::{ExportRow, export_filename};
pub use filter::{
    OrderKey, RawTransactionQuery, TransactionFilter, TransactionOrdering, TransactionType,
};
pub use money::Money;
pub use ops::{Engine, EngineBuilder};
pub use provisioning::{DEFAULT_CATEGORIES, SeedReport};
pub use transactions::Transaction;
pub use users::User;

pub mod aggregation;
mod categories;
mod commands;
mod error;
pub mod export;
mod filter;
mod money;
mod ops;
mod provisioning;
mod transactions;
mod users;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
